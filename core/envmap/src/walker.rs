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

//! Depth-first traversal of a record tree into a flat key/value map.

use crate::EnvMap;
use crate::error::ConvertError;
use crate::record::{FieldValue, Record};
use crate::serialize::serialize;
use crate::tags;
use tracing::{debug, trace};

const SECRET_MASK: &str = "******";

/// Visit every field of `record` in declaration order, inserting non-empty values
/// under `prefix`. The first failure aborts the walk.
pub(crate) fn walk(
    record: &dyn Record,
    prefix: &str,
    out: &mut EnvMap,
) -> Result<(), ConvertError> {
    for field in record.fields() {
        let field_tags = tags::resolve(field.name, field.tags)?;
        let inner_prefix = format!("{prefix}{}", field_tags.nested_prefix());

        let value = match field.value {
            FieldValue::Record(nested) => {
                trace!("descending into field {} with prefix {}", field.name, inner_prefix);
                walk(nested, &inner_prefix, out)
                    .map_err(|source| ConvertError::nested(field.name, source))?;
                continue;
            }
            FieldValue::Leaf(value) => value,
        };

        let Some(key_name) = field_tags.key_name() else {
            continue;
        };
        let env_key = format!("{inner_prefix}{key_name}");

        let env_value = value
            .to_env_value()
            .map_err(|source| ConvertError::Marshal {
                field: field.name,
                source,
            })?;
        let text = serialize(&env_value, &field_tags.context());
        if text.is_empty() {
            trace!("{} omitted, field {} has no value", env_key, field.name);
            continue;
        }

        let display_value = if field_tags.is_secret() {
            SECRET_MASK
        } else {
            text.as_str()
        };
        trace!("{} set to: {} from field {}", env_key, display_value, field.name);

        if let Some(previous) = out.insert(env_key, text) {
            debug!(
                "field {} overwrote an earlier value of the same key ({} chars)",
                field.name,
                previous.len()
            );
        }
    }

    Ok(())
}
