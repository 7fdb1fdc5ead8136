use crate::request::{parse_urlencoded, ParamBag, Request};
use serde_json::Value;
use std::collections::BTreeMap;
use url::{form_urlencoded, Url};

/// Build an absolute URL on the current request's scheme and host.
///
/// `path` defaults to the current request path; an absolute URL with its own
/// host is used as is. The query is the request's
/// query, overlaid by any query embedded in `path`, overlaid by `params`;
/// keys are emitted in sorted order. An empty query adds no `?`.
#[must_use]
pub fn build_url(request: &Request, path: Option<&str>, params: &ParamBag) -> String {
    let (path, embedded) = match path {
        Some(p) => match p.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (p, None),
        },
        None => (request.path(), None),
    };

    let embedded = embedded.map(parse_urlencoded).unwrap_or_default();
    let mut query: BTreeMap<&str, &Value> = request
        .query()
        .iter()
        .map(|(k, v)| (k.as_str(), v))
        .collect();
    query.extend(embedded.iter().map(|(k, v)| (k.as_str(), v)));
    query.extend(params.iter().map(|(k, v)| (k.as_str(), v)));

    let mut url = if is_absolute(path) {
        String::with_capacity(path.len())
    } else {
        let mut base = request.scheme_and_host();
        if !path.starts_with('/') {
            base.push('/');
        }
        base
    };
    url.push_str(path);
    let encoded = encode_query(&query);
    if !encoded.is_empty() {
        url.push('?');
        url.push_str(&encoded);
    }
    url
}

/// A URL carrying its own host (`https://other.example/x`), kept as given.
fn is_absolute(path: &str) -> bool {
    Url::parse(path).is_ok_and(|u| u.has_host())
}

/// Form-urlencode `query`. Arrays become repeated `key[]` pairs, nested
/// objects are emitted as JSON text.
#[must_use]
pub fn encode_query(query: &BTreeMap<&str, &Value>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in query {
        match value {
            Value::Array(items) => {
                let name = format!("{}[]", key);
                for item in items {
                    serializer.append_pair(&name, &scalar_text(item));
                }
            }
            other => {
                serializer.append_pair(key, &scalar_text(other));
            }
        }
    }
    serializer.finish()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
