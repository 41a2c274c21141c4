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

use crate::EnvMap;
use crate::error::ConvertError;
use crate::options::ConvertOptions;
use crate::record::Record;
use crate::walker::walk;
use tracing::{debug, warn};

/// Convert `root` into a flat environment variable map.
///
/// Nothing is returned when any field fails; the error names the path to the
/// offending field.
pub fn convert<R: Record + ?Sized>(
    root: &R,
    options: ConvertOptions,
) -> Result<EnvMap, ConvertError> {
    debug!("converting record with prefix '{}'", options.prefix);
    let mut values = EnvMap::new();
    walk(&root, &options.prefix, &mut values)?;
    debug!("converted record into {} environment variables", values.len());
    Ok(values)
}

/// Same as [`convert`], but panics on failure.
///
/// Meant for call sites where a malformed configuration type is a programming error.
pub fn must_convert<R: Record + ?Sized>(root: &R, options: ConvertOptions) -> EnvMap {
    match convert(root, options) {
        Ok(values) => values,
        Err(error) => {
            warn!("conversion failed at field {}", error.path());
            panic!("{error}")
        }
    }
}
