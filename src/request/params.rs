use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Named request values: query string, body fields, route attributes, or
/// explicit dispatch params.
///
/// Values are JSON so route attributes, form fields and JSON bodies share one
/// representation. Later inserts overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamBag {
    params: HashMap<String, Value>,
}

impl ParamBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Value for `name`, or `default` when absent.
    #[must_use]
    pub fn get_or(&self, name: &str, default: Value) -> Value {
        self.params.get(name).cloned().unwrap_or(default)
    }

    /// String view of a value. Non-string scalars are not coerced.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.params.insert(name.into(), value.into())
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    #[must_use]
    pub fn all(&self) -> &HashMap<String, Value> {
        &self.params
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.params.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Copy every entry of `other` into this bag, overwriting same-named keys.
    pub fn merge(&mut self, other: &ParamBag) {
        for (k, v) in other.iter() {
            self.params.insert(k.clone(), v.clone());
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ParamBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = ParamBag::new();
        for (k, v) in iter {
            bag.insert(k, v);
        }
        bag
    }
}

impl From<HashMap<String, Value>> for ParamBag {
    fn from(params: HashMap<String, Value>) -> Self {
        Self { params }
    }
}

/// Parse an `application/x-www-form-urlencoded` string (query string or form body).
///
/// Keys ending in `[]` collect into an array; any other repeated key keeps the
/// last value.
#[must_use]
pub fn parse_urlencoded(input: &str) -> ParamBag {
    let mut bag = ParamBag::new();
    for (k, v) in url::form_urlencoded::parse(input.trim_start_matches('?').as_bytes()) {
        if let Some(list_key) = k.strip_suffix("[]") {
            let value = Value::String(v.into_owned());
            let slot = bag
                .params
                .entry(list_key.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            match slot {
                Value::Array(items) => items.push(value),
                other => *other = Value::Array(vec![value]),
            }
        } else {
            bag.params.insert(k.into_owned(), Value::String(v.into_owned()));
        }
    }
    bag
}

/// Top-level fields of a JSON object body.
#[must_use]
pub fn params_from_json(body: Value) -> ParamBag {
    match body {
        Value::Object(map) => map.into_iter().collect(),
        other => {
            debug!(body_type = %json_type(&other), "Ignoring non-object JSON body");
            ParamBag::new()
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
