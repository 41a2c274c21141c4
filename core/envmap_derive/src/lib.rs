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

//! Proc macro generating `envmap::Record` implementations for configuration structs.
//!
//! The generated `fields()` lists every participating field in declaration order
//! together with its resolved tags, so the runtime walker never inspects types.
//!
//! # Field Classification
//!
//! - **Keyed fields** (`#[env(name = "...")]`): leaf values serialized through `ToEnvValue`
//! - **Nested records** (`#[env(prefix = "...")]`, `#[env(nested)]`, or any
//!   non-primitive type without a `name`): walked recursively
//! - **Unnamed value types** (primitives, strings, durations, collections, or any field
//!   marked `#[env(leaf)]`): contribute nothing
//! - `#[env(skip)]`: excluded entirely

mod record;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derive macro implementing `envmap::Record`.
///
/// # Field Attributes
/// - `#[env(name = "MODE")]` - Output key name, prefixed by every enclosing prefix
/// - `#[env(name = "PORT", required)]` - Record the `required` marker (never enforced)
/// - `#[env(name = "TOKEN", secret)]` - Mask the value in log output
/// - `#[env(prefix = "DB_")]` - Prefix prepended to keys below this field
/// - `#[env(nested)]` - Walk the field as a nested record without adding a prefix
/// - `#[env(separator = "|")]` - Join sequence elements with `|` instead of `,`
/// - `#[env(pair_separator = ";")]` - Join map entries with `;` instead of `,`
/// - `#[env(key_value_separator = "=")]` - Join a map key and value with `=` instead of `:`
/// - `#[env(leaf)]` - Treat as a value type, never walked (for enums or `MarshalText` newtypes)
/// - `#[env(skip)]` - Exclude this field
///
/// # Notes
/// - A field without `name` whose type is not a known value type is walked as a nested
///   record and must implement `Record`. Mark custom value types with `leaf` instead.
///
/// # Examples
///
/// ```ignore
/// #[derive(Record)]
/// pub struct ServerConfig {
///     #[env(name = "MODE")]
///     pub mode: String,                 // MODE
///     #[env(prefix = "HTTP_")]
///     pub http: HttpConfig,             // HTTP_*
///     #[env(name = "PEERS", separator = ";")]
///     pub peers: Vec<String>,           // PEERS=a;b
/// }
///
/// #[derive(Record)]
/// pub struct HttpConfig {
///     #[env(name = "PORT")]
///     pub port: u16,                    // HTTP_PORT, omitted when 0
/// }
/// ```
#[proc_macro_derive(Record, attributes(env))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::generate_impl(&input).into()
}
