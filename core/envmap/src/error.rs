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

//! Conversion error types.

use std::fmt::Display;
use thiserror::Error;

/// Boxed error returned by user supplied serialization hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for a whole conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Raw tag text of a field could not be parsed.
    #[error("parsing struct tag of field {field}: {source}")]
    TagSyntax {
        field: &'static str,
        #[source]
        source: TagError,
    },
    /// A key tag is present but carries nothing usable.
    #[error("get {tag} from tags of field {field}: tag has no name")]
    TagLookup { field: &'static str, tag: &'static str },
    /// A value failed to serialize itself.
    #[error("converting field {field}: {source}")]
    Marshal {
        field: &'static str,
        #[source]
        source: ValueError,
    },
    /// Failure inside a nested record.
    #[error("converting field {field}: {source}")]
    Field {
        field: &'static str,
        #[source]
        source: Box<ConvertError>,
    },
}

impl ConvertError {
    pub(crate) fn nested(field: &'static str, source: ConvertError) -> Self {
        Self::Field {
            field,
            source: Box::new(source),
        }
    }

    /// Dotted path of field names from the root record down to the failing field.
    pub fn path(&self) -> String {
        let mut segments = Vec::new();
        let mut current = self;
        loop {
            match current {
                Self::Field { field, source } => {
                    segments.push(*field);
                    current = source.as_ref();
                }
                Self::TagSyntax { field, .. }
                | Self::TagLookup { field, .. }
                | Self::Marshal { field, .. } => {
                    segments.push(*field);
                    break;
                }
            }
        }
        segments.join(".")
    }
}

/// Errors reported while parsing raw tag text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("bad syntax for struct tag pair at offset {0}")]
    Syntax(usize),
    #[error("bad syntax for struct tag key at offset {0}")]
    KeySyntax(usize),
    #[error("bad syntax for struct tag value at offset {0}")]
    ValueSyntax(usize),
    #[error("duplicate struct tag key {0}")]
    DuplicateKey(String),
}

/// Failure raised by a value while converting itself to text.
#[derive(Debug)]
pub struct ValueError {
    message: String,
    source: Option<BoxError>,
}

impl ValueError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn marshal(source: impl Into<BoxError>) -> Self {
        let source = source.into();
        Self {
            message: format!("marshal text: {source}"),
            source: Some(source),
        }
    }
}

impl Display for ValueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| &**source as &(dyn std::error::Error + 'static))
    }
}
