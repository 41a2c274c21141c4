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

//! `KEY=VALUE` rendering of a converted map, for `.env` files and manifests.

use crate::EnvMap;

/// One `KEY=VALUE` line per entry, in key order.
pub fn to_env_lines(values: &EnvMap) -> Vec<String> {
    values
        .iter()
        .map(|(key, value)| format!("{key}={}", quote_value(value)))
        .collect()
}

/// The whole map as `.env` file content, newline terminated.
pub fn to_dotenv(values: &EnvMap) -> String {
    let mut out = String::new();
    for line in to_env_lines(values) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn needs_quotes(value: &str) -> bool {
    value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '=' | '$' | '\\'))
}

fn quote_value(value: &str) -> String {
    if !needs_quotes(value) {
        return value.to_owned();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' | '$' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
