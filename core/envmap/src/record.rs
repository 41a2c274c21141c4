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

//! The record abstraction walked during conversion.

use crate::tags::FieldTags;
use crate::value::ToEnvValue;

/// A struct whose fields can be enumerated for conversion.
///
/// Usually generated with `#[derive(Record)]`. Hand written implementations may pass
/// raw tag text instead of resolved tags:
///
/// ```
/// use envmap::{Field, Record};
///
/// struct Http {
///     port: u16,
/// }
///
/// impl Record for Http {
///     fn fields(&self) -> Vec<Field<'_>> {
///         vec![Field::raw("port", r#"env:"PORT""#, &self.port)]
///     }
/// }
///
/// let env = envmap::convert(&Http { port: 8080 }, Default::default()).unwrap();
/// assert_eq!(env["PORT"], "8080");
/// ```
pub trait Record {
    /// Fields in declaration order.
    fn fields(&self) -> Vec<Field<'_>>;
}

impl<R: Record + ?Sized> Record for &R {
    fn fields(&self) -> Vec<Field<'_>> {
        (**self).fields()
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn fields(&self) -> Vec<Field<'_>> {
        (**self).fields()
    }
}

/// Where the tag metadata of a field comes from.
#[derive(Debug, Clone)]
pub enum TagSource<'a> {
    /// Unparsed tag text, e.g. `env:"MODE" envPrefix:"APP_"`.
    Raw(&'a str),
    /// Metadata already validated, as emitted by the derive macro.
    Parsed(FieldTags),
}

pub enum FieldValue<'a> {
    Record(&'a dyn Record),
    Leaf(&'a dyn ToEnvValue),
}

pub struct Field<'a> {
    pub name: &'static str,
    pub tags: TagSource<'a>,
    pub value: FieldValue<'a>,
}

impl<'a> Field<'a> {
    pub fn leaf(name: &'static str, tags: FieldTags, value: &'a dyn ToEnvValue) -> Self {
        Self {
            name,
            tags: TagSource::Parsed(tags),
            value: FieldValue::Leaf(value),
        }
    }

    pub fn record(name: &'static str, tags: FieldTags, value: &'a dyn Record) -> Self {
        Self {
            name,
            tags: TagSource::Parsed(tags),
            value: FieldValue::Record(value),
        }
    }

    pub fn raw(name: &'static str, tags: &'a str, value: &'a dyn ToEnvValue) -> Self {
        Self {
            name,
            tags: TagSource::Raw(tags),
            value: FieldValue::Leaf(value),
        }
    }

    pub fn raw_record(name: &'static str, tags: &'a str, value: &'a dyn Record) -> Self {
        Self {
            name,
            tags: TagSource::Raw(tags),
            value: FieldValue::Record(value),
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self.value, FieldValue::Record(_))
    }
}
