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

//! Turning leaf values into their environment variable text.
//!
//! An empty result means "omit the key". Zero numbers and zero durations are
//! suppressed this way, so are empty strings and absent values.

use crate::value::EnvValue;

pub const DEFAULT_SEPARATOR: &str = ",";
pub const DEFAULT_PAIR_SEPARATOR: &str = ",";
pub const DEFAULT_KEY_VALUE_SEPARATOR: &str = ":";

/// Separators in effect while serializing one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeContext {
    /// Joins sequence elements.
    pub separator: String,
    /// Joins map entries.
    pub pair_separator: String,
    /// Joins the key and value of a single map entry.
    pub key_value_separator: String,
}

impl Default for SerializeContext {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_owned(),
            pair_separator: DEFAULT_PAIR_SEPARATOR.to_owned(),
            key_value_separator: DEFAULT_KEY_VALUE_SEPARATOR.to_owned(),
        }
    }
}

pub fn serialize(value: &EnvValue, ctx: &SerializeContext) -> String {
    match value {
        EnvValue::Text(text) => text.clone(),
        EnvValue::Int(0) | EnvValue::Uint(0) => String::new(),
        EnvValue::Int(n) => n.to_string(),
        EnvValue::Uint(n) => n.to_string(),
        EnvValue::Float32(f) if *f == 0.0 => String::new(),
        EnvValue::Float32(f) => f.to_string(),
        EnvValue::Float(f) if *f == 0.0 => String::new(),
        EnvValue::Float(f) => f.to_string(),
        EnvValue::Duration(d) if d.is_zero() => String::new(),
        EnvValue::Duration(d) => humantime::format_duration(*d).to_string(),
        EnvValue::Strings(items) => items.join(&ctx.separator),
        EnvValue::Sequence(items) => {
            // Elements never inherit the field's separators.
            let element_ctx = SerializeContext::default();
            items
                .iter()
                .map(|item| serialize(item, &element_ctx))
                .collect::<Vec<_>>()
                .join(&ctx.separator)
        }
        EnvValue::Map(entries) => serialize_map(entries, ctx),
        EnvValue::Scalar(s) => s.clone(),
        EnvValue::Absent => String::new(),
    }
}

/// Entries are ordered by serialized key, then value, so output is stable across runs.
fn serialize_map(entries: &[(EnvValue, EnvValue)], ctx: &SerializeContext) -> String {
    let entry_ctx = SerializeContext::default();
    let mut rendered: Vec<(String, String)> = entries
        .iter()
        .map(|(key, value)| (serialize(key, &entry_ctx), serialize(value, &entry_ctx)))
        .collect();
    rendered.sort();

    rendered
        .into_iter()
        .map(|(key, value)| format!("{key}{}{value}", ctx.key_value_separator))
        .collect::<Vec<_>>()
        .join(&ctx.pair_separator)
}
