//! Request parameter bags.
//!
//! Endpoint wrappers describe their parameters as typed `Serialize` structs.
//! [`RequestParams::from_serialize`] flattens such a struct into an ordered
//! map of scalar or array values. Fields serialized as `null` are dropped so
//! an omitted optional field never reaches the server.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::{RestError, RestResult};

/// A single scalar parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl Scalar {
    /// The textual form used in query strings and multipart text parts
    pub fn to_param_string(&self) -> String {
        match self {
            Scalar::String(s) => s.clone(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Scalar::String(s) => Value::String(s.clone()),
            Scalar::Number(n) => Value::Number(n.clone()),
            Scalar::Bool(b) => Value::Bool(*b),
        }
    }

    fn from_json(key: &str, value: Value) -> RestResult<Self> {
        match value {
            Value::String(s) => Ok(Scalar::String(s)),
            Value::Number(n) => Ok(Scalar::Number(n)),
            Value::Bool(b) => Ok(Scalar::Bool(b)),
            other => Err(RestError::InvalidParameter(format!(
                "{} must be a scalar value, got {}",
                key, other
            ))),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value.into())
    }
}

/// A parameter value: either one scalar or an array of scalars
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Scalar(Scalar),
    Array(Vec<Scalar>),
}

impl From<Scalar> for ParamValue {
    fn from(value: Scalar) -> Self {
        ParamValue::Scalar(value)
    }
}

macro_rules! scalar_param_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    ParamValue::Scalar(value.into())
                }
            }

            impl From<Vec<$ty>> for ParamValue {
                fn from(values: Vec<$ty>) -> Self {
                    ParamValue::Array(values.into_iter().map(Into::into).collect())
                }
            }
        )*
    };
}

scalar_param_from!(&str, String, bool, u32, i64);

/// Ordered parameter mapping with unique keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams {
    entries: Vec<(String, ParamValue)>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a serializable struct or map into parameters.
    ///
    /// Nested objects are rejected; `null` fields and `null` array items are
    /// skipped.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> RestResult<Self> {
        let json = serde_json::to_value(value)?;
        let object = match json {
            Value::Object(object) => object,
            Value::Null => return Ok(Self::new()),
            other => {
                return Err(RestError::InvalidParameter(format!(
                    "request parameters must be an object, got {}",
                    other
                )))
            }
        };

        let mut params = Self::new();
        for (key, value) in object {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    let items = items
                        .into_iter()
                        .filter(|item| !item.is_null())
                        .map(|item| Scalar::from_json(&key, item))
                        .collect::<RestResult<Vec<_>>>()?;
                    params.insert(key, ParamValue::Array(items));
                }
                scalar => {
                    let scalar = Scalar::from_json(&key, scalar)?;
                    params.insert(key, ParamValue::Scalar(scalar));
                }
            }
        }
        Ok(params)
    }

    /// Set a parameter, replacing any previous value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style variant of [`RequestParams::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flatten into `(key, value)` pairs. Arrays become repeated keys.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.entries {
            match value {
                ParamValue::Scalar(scalar) => pairs.push((key.clone(), scalar.to_param_string())),
                ParamValue::Array(items) => {
                    for item in items {
                        pairs.push((key.clone(), item.to_param_string()));
                    }
                }
            }
        }
        pairs
    }

    /// JSON object form used for request bodies
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        for (key, value) in &self.entries {
            let json = match value {
                ParamValue::Scalar(scalar) => scalar.to_json(),
                ParamValue::Array(items) => Value::Array(items.iter().map(Scalar::to_json).collect()),
            };
            object.insert(key.clone(), json);
        }
        Value::Object(object)
    }
}
