use http::Method;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a matched path dispatches to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTarget {
    #[serde(default)]
    pub module: String,
    pub controller: String,
    #[serde(default = "default_action")]
    pub action: String,
}

fn default_action() -> String {
    "index".to_string()
}

impl RouteTarget {
    pub fn new(
        module: impl Into<String>,
        controller: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            controller: controller.into(),
            action: action.into(),
        }
    }
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module.is_empty() {
            write!(f, "{}::{}", self.controller, self.action)
        } else {
            write!(f, "{}/{}::{}", self.module, self.controller, self.action)
        }
    }
}

/// A custom route such as `/pets/{id}` bound to a fixed target.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    method: Option<Method>,
    pattern: String,
    regex: Regex,
    param_names: Vec<String>,
    target: RouteTarget,
}

impl RoutePattern {
    /// Compile `pattern`; `method = None` matches every method.
    pub fn new(method: Option<Method>, pattern: &str, target: RouteTarget) -> Result<Self, regex::Error> {
        let (regex, param_names) = path_to_regex(pattern)?;
        Ok(Self {
            method,
            pattern: pattern.to_string(),
            regex,
            param_names,
            target,
        })
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    #[must_use]
    pub fn target(&self) -> &RouteTarget {
        &self.target
    }

    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Path parameters for `path`, URL-decoded, or `None` if the route does not apply.
    #[must_use]
    pub fn captures(&self, method: &Method, path: &str) -> Option<Vec<(String, String)>> {
        if self.method.as_ref().is_some_and(|m| m != method) {
            return None;
        }
        let caps = self.regex.captures(path)?;
        let mut params = Vec::with_capacity(self.param_names.len());
        for (i, name) in self.param_names.iter().enumerate() {
            let raw = caps.get(i + 1).map_or("", |m| m.as_str());
            let value = urlencoding::decode(raw).ok()?.into_owned();
            params.push((name.clone(), value));
        }
        Some(params)
    }
}

/// Convert a path pattern to an anchored regex plus its parameter names.
///
/// `/users/{id}/posts/{postId}` → `^/users/([^/]+)/posts/([^/]+)$` and
/// `["id", "postId"]`. Literal segments are matched verbatim.
pub fn path_to_regex(path: &str) -> Result<(Regex, Vec<String>), regex::Error> {
    if path.trim_matches('/').is_empty() {
        return Ok((Regex::new(r"^/$")?, Vec::new()));
    }

    let mut pattern = String::with_capacity(path.len() + 5);
    pattern.push('^');
    let mut param_names = Vec::with_capacity(path.matches('{').count());

    for segment in path.split('/') {
        if segment.starts_with('{') && segment.ends_with('}') {
            let param_name = segment
                .trim_start_matches('{')
                .trim_end_matches('}')
                .to_string();
            pattern.push_str("/([^/]+)");
            param_names.push(param_name);
        } else if !segment.is_empty() {
            pattern.push('/');
            pattern.push_str(&regex::escape(segment));
        }
    }

    pattern.push_str("/?$");
    let regex = Regex::new(&pattern)?;

    Ok((regex, param_names))
}
