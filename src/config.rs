//! # Application Configuration
//!
//! [`AppConfig`] is read from a YAML (`.yaml`/`.yml`) or TOML (`.toml`) file,
//! chosen by extension. Every section and field is optional:
//!
//! ```yaml
//! views:
//!   dir: views
//!   extension: html
//! routing:
//!   default_module: ""
//!   default_controller: index
//!   default_action: index
//!   routes:
//!     - path: /pets/{id}
//!       method: GET
//!       controller: pet
//!       action: show
//! response:
//!   headers:
//!     content-type: text/html; charset=utf-8
//! logging:
//!   log_level: info
//!   format: json
//! ```
//!
//! ## Environment Variables
//!
//! Applied by [`AppConfig::with_env_overrides`] after the file is parsed:
//! `BRRTC_VIEWS_DIR`, `BRRTC_VIEWS_EXTENSION`, `BRRTC_DEFAULT_MODULE`,
//! `BRRTC_DEFAULT_CONTROLLER`, `BRRTC_DEFAULT_ACTION`, and the
//! `BRRTC_LOG_*` variables described in [`crate::logging`].

use crate::logging::LogConfig;
use crate::response::Response;
use crate::router::{ControllerRouter, RouteTarget};
use anyhow::{anyhow, bail, Context, Result};
use http::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewsConfig {
    /// Directory holding view scripts
    pub dir: PathBuf,
    /// File extension appended to view script names
    pub extension: String,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("views"),
            extension: "html".to_string(),
        }
    }
}

/// A custom route entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub path: String,
    /// Restrict to one HTTP method; any method when absent
    #[serde(default)]
    pub method: Option<String>,
    #[serde(flatten)]
    pub target: RouteTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub default_module: String,
    pub default_controller: String,
    pub default_action: String,
    pub routes: Vec<RouteConfig>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_module: String::new(),
            default_controller: "index".to_string(),
            default_action: "index".to_string(),
            routes: Vec::new(),
        }
    }
}

/// Headers every response built from the template starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseConfig {
    pub headers: BTreeMap<String, String>,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            headers: BTreeMap::from([(
                "content-type".to_string(),
                "text/html; charset=utf-8".to_string(),
            )]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub views: ViewsConfig,
    pub routing: RoutingConfig,
    pub response: ResponseConfig,
    pub logging: LogConfig,
}

impl AppConfig {
    /// Load a YAML or TOML file, by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let config = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text),
            "toml" => Self::from_toml_str(&text),
            other => bail!(
                "Unsupported config format '{}' for {} (expected .yaml, .yml or .toml)",
                other,
                path.display()
            ),
        }
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Apply `BRRTC_*` environment variables on top of the parsed values.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = env::var("BRRTC_VIEWS_DIR") {
            self.views.dir = PathBuf::from(dir);
        }
        if let Ok(ext) = env::var("BRRTC_VIEWS_EXTENSION") {
            self.views.extension = ext;
        }
        if let Ok(module) = env::var("BRRTC_DEFAULT_MODULE") {
            self.routing.default_module = module;
        }
        if let Ok(controller) = env::var("BRRTC_DEFAULT_CONTROLLER") {
            self.routing.default_controller = controller;
        }
        if let Ok(action) = env::var("BRRTC_DEFAULT_ACTION") {
            self.routing.default_action = action;
        }
        self.logging = self.logging.with_env_overrides();
        self
    }

    /// Response every dispatch starts from.
    #[must_use]
    pub fn response_template(&self) -> Response {
        self.response
            .headers
            .iter()
            .fold(Response::default(), |response, (name, value)| {
                response.with_header(name, value.clone())
            })
    }

    /// Router with the configured defaults and custom routes, no controllers yet.
    pub fn router(&self) -> Result<ControllerRouter> {
        let routing = &self.routing;
        let mut router = ControllerRouter::new().with_defaults(
            &routing.default_module,
            &routing.default_controller,
            &routing.default_action,
        );
        for route in &routing.routes {
            let method = route
                .method
                .as_deref()
                .map(|m| {
                    Method::from_bytes(m.to_uppercase().as_bytes())
                        .map_err(|_| anyhow!("Invalid HTTP method '{}' for route {}", m, route.path))
                })
                .transpose()?;
            router
                .add_route(method, &route.path, route.target.clone())
                .with_context(|| format!("Invalid route pattern {}", route.path))?;
        }
        Ok(router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.views.dir, PathBuf::from("views"));
        assert_eq!(config.views.extension, "html");
        assert_eq!(config.routing.default_action, "index");
        assert_eq!(
            config.response_template().header("Content-Type"),
            Some("text/html; charset=utf-8")
        );
    }

    #[test]
    fn test_yaml_partial() {
        let config = AppConfig::from_yaml_str(
            "views:\n  dir: templates\nrouting:\n  routes:\n    - path: /pets/{id}\n      method: get\n      controller: pet\n      action: show\n",
        )
        .unwrap();
        assert_eq!(config.views.dir, PathBuf::from("templates"));
        assert_eq!(config.views.extension, "html");
        let route = &config.routing.routes[0];
        assert_eq!(route.target, RouteTarget::new("", "pet", "show"));

        let router = config.router().unwrap();
        let m = router.route(&Method::GET, "/pets/9").unwrap();
        assert_eq!(m.params.get_str("id"), Some("9"));
    }

    #[test]
    fn test_toml() {
        let config = AppConfig::from_toml_str(
            r#"
[views]
extension = "jinja"

[response.headers]
x-powered-by = "brrtcontroller"

[logging]
format = "pretty"
"#,
        )
        .unwrap();
        assert_eq!(config.views.extension, "jinja");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        let template = config.response_template();
        assert_eq!(template.header("x-powered-by"), Some("brrtcontroller"));
        assert!(template.header("content-type").is_none());
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("app.yml");
        fs::write(&yaml, "routing:\n  default_controller: home\n").unwrap();
        assert_eq!(AppConfig::load(&yaml).unwrap().routing.default_controller, "home");

        let ini = dir.path().join("app.ini");
        fs::write(&ini, "x=1").unwrap();
        let err = AppConfig::load(&ini).unwrap_err();
        assert!(err.to_string().contains("Unsupported config format"));
    }

    #[test]
    fn test_invalid_method_rejected() {
        let config = AppConfig::from_yaml_str(
            "routing:\n  routes:\n    - path: /x\n      method: \"NOT A METHOD\"\n      controller: x\n",
        )
        .unwrap();
        assert!(config.router().is_err());
    }
}
