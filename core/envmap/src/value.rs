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

//! Leaf values and the conversion of Rust types into them.

use crate::error::{BoxError, ValueError};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// A leaf value classified by the rule used to turn it into text.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvValue {
    /// Output of a text marshaling hook, used verbatim.
    Text(String),
    Int(i128),
    Uint(u128),
    /// Single precision float, printed in its own shortest form.
    Float32(f32),
    Float(f64),
    Duration(Duration),
    /// Sequence of plain strings.
    Strings(Vec<String>),
    /// Sequence of arbitrary values, each serialized on its own.
    Sequence(Vec<EnvValue>),
    /// Key/value entries of an associative container.
    Map(Vec<(EnvValue, EnvValue)>),
    /// Anything else, in its display form.
    Scalar(String),
    /// No value at all, e.g. `None`.
    Absent,
}

impl EnvValue {
    pub fn scalar(value: impl std::fmt::Display) -> Self {
        EnvValue::Scalar(value.to_string())
    }

    /// Run the text marshaling hook of `value`.
    pub fn marshal<T: MarshalText + ?Sized>(value: &T) -> Result<Self, ValueError> {
        value
            .marshal_text()
            .map(EnvValue::Text)
            .map_err(ValueError::marshal)
    }
}

/// Hook for types that know their own canonical text form.
///
/// A type implementing it takes priority over every built-in rule once its
/// [`ToEnvValue`] implementation delegates to [`EnvValue::marshal`], which is what
/// [`impl_to_env_value_via_marshal_text!`](crate::impl_to_env_value_via_marshal_text)
/// generates.
pub trait MarshalText {
    fn marshal_text(&self) -> Result<String, BoxError>;
}

/// Conversion of a field value into an [`EnvValue`].
pub trait ToEnvValue {
    fn to_env_value(&self) -> Result<EnvValue, ValueError>;
}

/// Implement [`ToEnvValue`] for types that serialize through [`MarshalText`].
#[macro_export]
macro_rules! impl_to_env_value_via_marshal_text {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::ToEnvValue for $ty {
                fn to_env_value(&self) -> ::std::result::Result<$crate::EnvValue, $crate::ValueError> {
                    $crate::EnvValue::marshal(self)
                }
            }
        )+
    };
}

macro_rules! signed {
    ($($ty:ty),+) => {
        $(
            impl ToEnvValue for $ty {
                fn to_env_value(&self) -> Result<EnvValue, ValueError> {
                    Ok(EnvValue::Int(i128::from(*self)))
                }
            }
        )+
    };
}

macro_rules! unsigned {
    ($($ty:ty),+) => {
        $(
            impl ToEnvValue for $ty {
                fn to_env_value(&self) -> Result<EnvValue, ValueError> {
                    Ok(EnvValue::Uint(u128::from(*self)))
                }
            }
        )+
    };
}

macro_rules! display_scalar {
    ($($ty:ty),+) => {
        $(
            impl ToEnvValue for $ty {
                fn to_env_value(&self) -> Result<EnvValue, ValueError> {
                    Ok(EnvValue::scalar(self))
                }
            }
        )+
    };
}

signed!(i8, i16, i32, i64, i128);
unsigned!(u8, u16, u32, u64, u128);
display_scalar!(
    bool,
    char,
    String,
    str,
    IpAddr,
    Ipv4Addr,
    Ipv6Addr,
    SocketAddr,
    SocketAddrV4,
    SocketAddrV6
);

impl ToEnvValue for isize {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        Ok(EnvValue::Int(*self as i128))
    }
}

impl ToEnvValue for usize {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        Ok(EnvValue::Uint(*self as u128))
    }
}

impl ToEnvValue for f32 {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        Ok(EnvValue::Float32(*self))
    }
}

impl ToEnvValue for f64 {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        Ok(EnvValue::Float(*self))
    }
}

impl ToEnvValue for Duration {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        Ok(EnvValue::Duration(*self))
    }
}

impl ToEnvValue for humantime::Duration {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        Ok(EnvValue::Duration(**self))
    }
}

impl ToEnvValue for Path {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        Ok(EnvValue::scalar(self.display()))
    }
}

impl ToEnvValue for PathBuf {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        self.as_path().to_env_value()
    }
}

impl ToEnvValue for () {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        Ok(EnvValue::Absent)
    }
}

impl<T: ToEnvValue> ToEnvValue for Option<T> {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        match self {
            Some(value) => value.to_env_value(),
            None => Ok(EnvValue::Absent),
        }
    }
}

impl<T: ToEnvValue + ?Sized> ToEnvValue for &T {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        (**self).to_env_value()
    }
}

impl<T: ToEnvValue + ?Sized> ToEnvValue for Box<T> {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        (**self).to_env_value()
    }
}

impl<T: ToEnvValue + ?Sized> ToEnvValue for Arc<T> {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        (**self).to_env_value()
    }
}

impl<T: ToEnvValue + ?Sized> ToEnvValue for Rc<T> {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        (**self).to_env_value()
    }
}

impl<T: ToEnvValue + ToOwned + ?Sized> ToEnvValue for Cow<'_, T> {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        (**self).to_env_value()
    }
}

/// Elements that are plain strings collapse into [`EnvValue::Strings`].
fn sequence<'a, T, I>(items: I) -> Result<EnvValue, ValueError>
where
    T: ToEnvValue + 'a + ?Sized,
    I: IntoIterator<Item = &'a T>,
{
    let values = items
        .into_iter()
        .map(ToEnvValue::to_env_value)
        .collect::<Result<Vec<_>, _>>()?;

    if !values.is_empty() && values.iter().all(|value| matches!(value, EnvValue::Scalar(_))) {
        let strings = values
            .into_iter()
            .filter_map(|value| match value {
                EnvValue::Scalar(s) => Some(s),
                _ => None,
            })
            .collect();
        return Ok(EnvValue::Strings(strings));
    }

    Ok(EnvValue::Sequence(values))
}

fn map<'a, K, V, I>(entries: I) -> Result<EnvValue, ValueError>
where
    K: ToEnvValue + 'a,
    V: ToEnvValue + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    entries
        .into_iter()
        .map(|(key, value)| Ok((key.to_env_value()?, value.to_env_value()?)))
        .collect::<Result<Vec<_>, ValueError>>()
        .map(EnvValue::Map)
}

impl<T: ToEnvValue> ToEnvValue for [T] {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        sequence(self)
    }
}

impl<T: ToEnvValue, const N: usize> ToEnvValue for [T; N] {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        sequence(self)
    }
}

impl<T: ToEnvValue> ToEnvValue for Vec<T> {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        sequence(self)
    }
}

impl<T: ToEnvValue> ToEnvValue for VecDeque<T> {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        sequence(self)
    }
}

impl<T: ToEnvValue> ToEnvValue for BTreeSet<T> {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        sequence(self)
    }
}

impl<K: ToEnvValue, V: ToEnvValue> ToEnvValue for BTreeMap<K, V> {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        map(self)
    }
}

impl<K: ToEnvValue, V: ToEnvValue, S> ToEnvValue for HashMap<K, V, S> {
    fn to_env_value(&self) -> Result<EnvValue, ValueError> {
        map(self)
    }
}
