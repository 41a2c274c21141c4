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

//! Flatten nested configuration structs into environment variable maps.
//!
//! A configuration struct is described once, and the exact key/value pairs an
//! environment based loader expects are derived from it. This is useful for
//! deployment manifests, documentation and test fixtures.
//!
//! ```
//! use envmap::{Record, with_prefix};
//! use std::time::Duration;
//!
//! #[derive(Record)]
//! struct DbConfig {
//!     #[env(name = "TIMEOUT")]
//!     timeout: Duration,
//! }
//!
//! #[derive(Record)]
//! struct AppConfig {
//!     #[env(name = "MODE")]
//!     mode: String,
//!     #[env(prefix = "DB_")]
//!     db: DbConfig,
//!     #[env(name = "REQUIRED_FIELD", required)]
//!     required_field: i32,
//! }
//!
//! let config = AppConfig {
//!     mode: "prod".into(),
//!     db: DbConfig { timeout: Duration::from_secs(1) },
//!     required_field: 3,
//! };
//!
//! let env = envmap::convert(&config, with_prefix("APP_")).unwrap();
//! assert_eq!(env["APP_MODE"], "prod");
//! assert_eq!(env["APP_DB_TIMEOUT"], "1s");
//! assert_eq!(env["APP_REQUIRED_FIELD"], "3");
//! ```
//!
//! The mapping is one-directional: nothing here reads a map back into a struct.
//!
//! ```compile_fail
//! let env = envmap::EnvMap::new();
//! let _ = envmap::from_env(&env);
//! ```
//!
//! ```compile_fail
//! let env = envmap::EnvMap::new();
//! let options = envmap::ConvertOptions::default();
//! let _ = envmap::decode(&env, options);
//! ```

extern crate self as envmap;

mod convert;
mod error;
mod options;
mod record;
pub mod render;
mod serialize;
mod tags;
mod value;
mod walker;

use std::collections::BTreeMap;

pub use convert::{convert, must_convert};
pub use envmap_derive::Record;
pub use error::{BoxError, ConvertError, TagError, ValueError};
pub use options::{ConvertOptions, with_prefix};
pub use record::{Field, FieldValue, Record, TagSource};
pub use serialize::{
    DEFAULT_KEY_VALUE_SEPARATOR, DEFAULT_PAIR_SEPARATOR, DEFAULT_SEPARATOR, SerializeContext,
    serialize,
};
pub use tags::{
    ENV_TAG, FieldTags, KEY_VALUE_SEPARATOR_TAG, KeyTag, PAIR_SEPARATOR_TAG, PREFIX_TAG,
    SEPARATOR_TAG,
};
pub use value::{EnvValue, MarshalText, ToEnvValue};

/// Result of a conversion: environment variable name to value, ordered by name.
pub type EnvMap = BTreeMap<String, String>;
