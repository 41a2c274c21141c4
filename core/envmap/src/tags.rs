/*
 * Licensed to the Apache Software Foundation (ASF) under one
 * or more contributor license agreements.  See the NOTICE file
 * distributed with this work for additional information
 * regarding copyright ownership.  The ASF licenses this file
 * to you under the Apache License, Version 2.0 (the
 * "License"); you may not use this file except in compliance
 * with the License.  You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing,
 * software distributed under the License is distributed on an
 * "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
 * KIND, either express or implied.  See the License for the
 * specific language governing permissions and limitations
 * under the License.
 */

//! Field tag metadata and the parser for raw tag text.
//!
//! Raw tags use the conventional struct tag layout, space separated `key:"value"` pairs:
//!
//! ```text
//! env:"REQUIRED_FIELD,required" envSeparator:"|"
//! ```
//!
//! Recognized keys are listed as constants below. Unknown keys are ignored so the
//! same text can be shared with other consumers.

use crate::error::{ConvertError, TagError};
use crate::record::TagSource;
use crate::serialize::SerializeContext;

pub const ENV_TAG: &str = "env";
pub const PREFIX_TAG: &str = "envPrefix";
pub const SEPARATOR_TAG: &str = "envSeparator";
pub const PAIR_SEPARATOR_TAG: &str = "envPairSeparator";
pub const KEY_VALUE_SEPARATOR_TAG: &str = "envKeyValSeparator";

const REQUIRED_OPTION: &str = "required";
const SECRET_OPTION: &str = "secret";

/// The key tag of a field: output key name plus its options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTag {
    name: String,
    required: bool,
    secret: bool,
}

impl KeyTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            secret: false,
        }
    }

    fn from_tag_value(value: &str) -> Self {
        let mut parts = value.split(',');
        let mut tag = KeyTag::new(parts.next().unwrap_or_default().trim());
        for option in parts {
            match option.trim() {
                REQUIRED_OPTION => tag.required = true,
                SECRET_OPTION => tag.secret = true,
                _ => {}
            }
        }
        tag
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Resolved tag metadata of a single field.
///
/// Built either by `#[derive(Record)]` through the builder methods or from raw text
/// with [`FieldTags::parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTags {
    key: Option<KeyTag>,
    prefix: Option<String>,
    separator: Option<String>,
    pair_separator: Option<String>,
    key_value_separator: Option<String>,
}

impl FieldTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw tag text.
    pub fn parse(raw: &str) -> Result<Self, TagError> {
        let mut tags = FieldTags::new();
        for (key, value) in parse_tag_pairs(raw)? {
            match key.as_str() {
                // An empty key tag is treated like a missing one.
                ENV_TAG if !value.is_empty() => tags.key = Some(KeyTag::from_tag_value(&value)),
                PREFIX_TAG if !value.is_empty() => tags.prefix = Some(value),
                SEPARATOR_TAG => tags.separator = Some(value),
                PAIR_SEPARATOR_TAG => tags.pair_separator = Some(value),
                KEY_VALUE_SEPARATOR_TAG => tags.key_value_separator = Some(value),
                _ => {}
            }
        }
        Ok(tags)
    }

    pub fn key(mut self, name: impl Into<String>) -> Self {
        self.key = Some(KeyTag::new(name));
        self
    }

    pub fn required(mut self) -> Self {
        if let Some(key) = self.key.as_mut() {
            key.required = true;
        }
        self
    }

    pub fn secret(mut self) -> Self {
        if let Some(key) = self.key.as_mut() {
            key.secret = true;
        }
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn pair_separator(mut self, separator: impl Into<String>) -> Self {
        self.pair_separator = Some(separator.into());
        self
    }

    pub fn key_value_separator(mut self, separator: impl Into<String>) -> Self {
        self.key_value_separator = Some(separator.into());
        self
    }

    pub fn key_tag(&self) -> Option<&KeyTag> {
        self.key.as_ref()
    }

    /// Output key name, `None` when the field carries no key tag.
    pub fn key_name(&self) -> Option<&str> {
        self.key.as_ref().map(KeyTag::name)
    }

    /// The `required` marker. It is recorded but never enforced here.
    pub fn is_required(&self) -> bool {
        self.key.as_ref().is_some_and(|key| key.required)
    }

    /// Whether values of this field must be masked in log output.
    pub fn is_secret(&self) -> bool {
        self.key.as_ref().is_some_and(|key| key.secret)
    }

    /// Prefix applied to every key below a nested record, empty when absent.
    pub fn nested_prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or_default()
    }

    /// Serialization context with the per-field separator overrides applied.
    pub fn context(&self) -> SerializeContext {
        let mut ctx = SerializeContext::default();
        if let Some(separator) = &self.separator {
            ctx.separator.clone_from(separator);
        }
        if let Some(separator) = &self.pair_separator {
            ctx.pair_separator.clone_from(separator);
        }
        if let Some(separator) = &self.key_value_separator {
            ctx.key_value_separator.clone_from(separator);
        }
        ctx
    }
}

/// Resolve the tags of a field, attaching the field name to any failure.
pub(crate) fn resolve(field: &'static str, source: TagSource<'_>) -> Result<FieldTags, ConvertError> {
    let tags = match source {
        TagSource::Parsed(tags) => tags,
        TagSource::Raw(raw) => {
            FieldTags::parse(raw).map_err(|source| ConvertError::TagSyntax { field, source })?
        }
    };

    if tags.key_name().is_some_and(str::is_empty) {
        return Err(ConvertError::TagLookup {
            field,
            tag: ENV_TAG,
        });
    }

    Ok(tags)
}

/// Split raw tag text into `(key, unquoted value)` pairs in order of appearance.
pub(crate) fn parse_tag_pairs(raw: &str) -> Result<Vec<(String, String)>, TagError> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut chars = raw.char_indices().peekable();

    loop {
        while chars.next_if(|(_, c)| *c == ' ').is_some() {}
        let Some(&(key_start, _)) = chars.peek() else {
            break;
        };

        let mut key = String::new();
        while let Some((_, c)) = chars.next_if(|(_, c)| is_key_char(*c)) {
            key.push(c);
        }
        if key.is_empty() {
            return Err(TagError::KeySyntax(key_start));
        }

        match chars.next() {
            Some((_, ':')) => {}
            Some((offset, _)) => return Err(TagError::Syntax(offset)),
            None => return Err(TagError::Syntax(raw.len())),
        }

        let value_start = match chars.next() {
            Some((offset, '"')) => offset,
            Some((offset, _)) => return Err(TagError::ValueSyntax(offset)),
            None => return Err(TagError::ValueSyntax(raw.len())),
        };

        let mut value = String::new();
        let mut closed = false;
        while let Some((offset, c)) = chars.next() {
            match c {
                '"' => {
                    closed = true;
                    break;
                }
                '\\' => match chars.next() {
                    Some((_, '"')) => value.push('"'),
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    _ => return Err(TagError::ValueSyntax(offset)),
                },
                _ => value.push(c),
            }
        }
        if !closed {
            return Err(TagError::ValueSyntax(value_start));
        }

        if let Some(&(offset, c)) = chars.peek()
            && c != ' '
        {
            return Err(TagError::Syntax(offset));
        }

        if pairs.iter().any(|(existing, _)| *existing == key) {
            return Err(TagError::DuplicateKey(key));
        }
        pairs.push((key, value));
    }

    Ok(pairs)
}

fn is_key_char(c: char) -> bool {
    c > ' ' && c != ':' && c != '"' && c != '\u{7f}'
}
