use super::pattern::{RoutePattern, RouteTarget};
use crate::controller::{
    camel_to_separator, normalize_segment, Controller, ControllerFactory, ControllerIdentity,
    TypedFactory,
};
use crate::error::DispatchError;
use crate::request::ParamBag;
use http::Method;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Resolves action names to method names and (module, controller) pairs to
/// controller factories.
pub trait Router: Send + Sync {
    /// Method name in the controller's action table for `action`.
    fn action_method(&self, action: &str) -> String;

    /// Factory for the controller registered as (`module`, `controller`).
    fn controller_factory(
        &self,
        module: &str,
        controller: &str,
    ) -> Result<Arc<dyn ControllerFactory>, DispatchError>;

    /// Action dispatched when the requested action name is blank.
    fn default_action(&self) -> &str {
        "index"
    }
}

/// Conventional action method name: `"some-other"` → `"some_other_action"`.
#[must_use]
pub fn action_method_name(action: &str) -> String {
    let mut method = camel_to_separator(action.trim(), '_').replace('-', "_");
    method.push_str("_action");
    method
}

/// Result of matching a request path.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    pub target: RouteTarget,
    /// Path parameters, destined for the request attributes
    pub params: ParamBag,
    /// Custom pattern that matched; `None` for the conventional layout
    pub pattern: Option<String>,
}

static SEGMENT_RE: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$"));

fn is_valid_segment(segment: &str) -> bool {
    SEGMENT_RE.as_ref().is_ok_and(|re| re.is_match(segment))
}

type FactoryKey = (String, String);

fn factory_key(module: &str, controller: &str) -> FactoryKey {
    (normalize_segment(module), normalize_segment(controller))
}

/// Router over registered controller types.
///
/// Custom patterns are tried in registration order; otherwise the path is
/// read as `/[module/]controller/action[/key/value...]`, where the module
/// segment is only recognized when it names a registered module. Missing
/// segments fall back to the configured defaults.
#[derive(Clone)]
pub struct ControllerRouter {
    factories: HashMap<FactoryKey, Arc<dyn ControllerFactory>>,
    routes: Vec<RoutePattern>,
    default_module: String,
    default_controller: String,
    default_action: String,
}

impl fmt::Debug for ControllerRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerRouter")
            .field("controllers", &self.controllers())
            .field("routes", &self.routes.iter().map(RoutePattern::pattern).collect::<Vec<_>>())
            .field("default_module", &self.default_module)
            .field("default_controller", &self.default_controller)
            .field("default_action", &self.default_action)
            .finish()
    }
}

impl Default for ControllerRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerRouter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            routes: Vec::new(),
            default_module: String::new(),
            default_controller: "index".to_string(),
            default_action: "index".to_string(),
        }
    }

    /// Defaults for path segments the request leaves out.
    #[must_use]
    pub fn with_defaults(mut self, module: &str, controller: &str, action: &str) -> Self {
        self.default_module = module.to_string();
        self.default_controller = controller.to_string();
        self.default_action = action.to_string();
        self
    }

    /// Register controller type `C` under its derived identity.
    pub fn register<C: Controller>(&mut self) -> &mut Self {
        self.register_factory(Arc::new(TypedFactory::<C>::new()))
    }

    /// Builder form of [`ControllerRouter::register`].
    #[must_use]
    pub fn with_controller<C: Controller>(mut self) -> Self {
        self.register::<C>();
        self
    }

    /// Register a factory; a later factory with the same identity replaces the earlier one.
    pub fn register_factory(&mut self, factory: Arc<dyn ControllerFactory>) -> &mut Self {
        let identity = factory.identity().clone();
        let key = factory_key(identity.module(), identity.controller());
        if self.factories.insert(key, factory).is_some() {
            warn!(
                module = %identity.module(),
                controller = %identity.controller(),
                "Controller registered twice, keeping the latest"
            );
        } else {
            debug!(
                module = %identity.module(),
                controller = %identity.controller(),
                "Controller registered"
            );
        }
        self
    }

    /// Add a custom route; `method = None` matches any method.
    pub fn add_route(
        &mut self,
        method: Option<Method>,
        pattern: &str,
        target: RouteTarget,
    ) -> Result<&mut Self, regex::Error> {
        let route = RoutePattern::new(method, pattern, target)?;
        info!(
            pattern = %route.pattern(),
            target = %route.target(),
            params = ?route.param_names(),
            "Route added"
        );
        self.routes.push(route);
        Ok(self)
    }

    /// Registered identities, sorted by (module, controller).
    #[must_use]
    pub fn controllers(&self) -> Vec<ControllerIdentity> {
        let mut ids: Vec<_> = self.factories.values().map(|f| f.identity().clone()).collect();
        ids.sort_by(|a, b| (a.module(), a.controller()).cmp(&(b.module(), b.controller())));
        ids
    }

    #[must_use]
    pub fn routes(&self) -> &[RoutePattern] {
        &self.routes
    }

    fn modules(&self) -> BTreeSet<&str> {
        self.factories
            .keys()
            .map(|(module, _)| module.as_str())
            .filter(|m| !m.is_empty())
            .collect()
    }

    /// Match a request path to a dispatch target.
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        debug!(method = %method, path = %path, "Route match attempt");

        for route in &self.routes {
            if let Some(captured) = route.captures(method, path) {
                let params: ParamBag = captured.into_iter().collect();
                info!(
                    method = %method,
                    path = %path,
                    pattern = %route.pattern(),
                    target = %route.target(),
                    path_params = ?params,
                    "Route matched"
                );
                return Some(RouteMatch {
                    target: route.target().clone(),
                    params,
                    pattern: Some(route.pattern().to_string()),
                });
            }
        }

        let matched = self.route_conventional(path);
        match &matched {
            Some(m) => info!(
                method = %method,
                path = %path,
                target = %m.target,
                path_params = ?m.params,
                "Route matched"
            ),
            None => warn!(method = %method, path = %path, "No route matched"),
        }
        matched
    }

    fn route_conventional(&self, path: &str) -> Option<RouteMatch> {
        let mut segments = Vec::new();
        for raw in path.split('/').filter(|s| !s.is_empty()) {
            segments.push(urlencoding::decode(raw).ok()?.into_owned());
        }
        let mut rest = segments.as_slice();

        let mut module = self.default_module.clone();
        if let Some(first) = rest.first() {
            if self.modules().contains(normalize_segment(first).as_str()) {
                module.clone_from(first);
                rest = &rest[1..];
            }
        }

        let controller = rest.first().cloned().unwrap_or_else(|| self.default_controller.clone());
        let action = rest.get(1).cloned().unwrap_or_else(|| self.default_action.clone());
        if !is_valid_segment(&controller) || !is_valid_segment(&action) {
            return None;
        }

        let mut params = ParamBag::new();
        for pair in rest.get(2..).unwrap_or_default().chunks(2) {
            let value = pair.get(1).cloned().unwrap_or_default();
            params.insert(pair[0].clone(), value);
        }

        Some(RouteMatch {
            target: RouteTarget::new(module, controller, action),
            params,
            pattern: None,
        })
    }
}

impl Router for ControllerRouter {
    fn default_action(&self) -> &str {
        &self.default_action
    }

    fn action_method(&self, action: &str) -> String {
        if action.trim().is_empty() {
            action_method_name(&self.default_action)
        } else {
            action_method_name(action)
        }
    }

    fn controller_factory(
        &self,
        module: &str,
        controller: &str,
    ) -> Result<Arc<dyn ControllerFactory>, DispatchError> {
        let key = factory_key(module, controller);
        if let Some(factory) = self.factories.get(&key) {
            return Ok(Arc::clone(factory));
        }

        // Without a module, a controller name that is unique across modules still resolves.
        if key.0.is_empty() {
            let mut candidates = self.factories.iter().filter(|((_, c), _)| *c == key.1);
            if let (Some((_, factory)), None) = (candidates.next(), candidates.next()) {
                return Ok(Arc::clone(factory));
            }
        }

        Err(DispatchError::ControllerNotFound {
            module: module.to_string(),
            controller: controller.to_string(),
        })
    }
}
