use super::action::ActionTable;
use super::dispatch;
use super::naming::ControllerIdentity;
use super::url::build_url;
use crate::app::AppContext;
use crate::error::DispatchError;
use crate::request::{ParamBag, Request};
use crate::response::Response;
use crate::view::View;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Static action table of a controller type.
///
/// Usually generated by the `#[actions]` attribute on the controller's
/// `impl` block.
pub trait Actions: Sized + 'static {
    fn actions() -> &'static ActionTable<Self>;
}

/// A request-scoped controller.
///
/// Implementors hold a [`ControllerBase`] and declare where they live; the
/// provided methods run the dispatch lifecycle.
///
/// ```ignore
/// struct CartController { base: ControllerBase }
///
/// impl Controller for CartController {
///     const NAMESPACE: &'static str = "Shop::Web";
///     const NAME: &'static str = "CartController";
///     fn create(base: ControllerBase) -> Self { Self { base } }
///     fn base(&self) -> &ControllerBase { &self.base }
///     fn base_mut(&mut self) -> &mut ControllerBase { &mut self.base }
/// }
///
/// #[actions]
/// impl CartController {
///     pub fn index_action(&mut self) {}
/// }
/// ```
pub trait Controller: Actions + Send {
    /// Declared namespace path; its top-level segment is the module
    const NAMESPACE: &'static str;
    /// Declared type name, e.g. `"CartController"`
    const NAME: &'static str;

    fn create(base: ControllerBase) -> Self;

    fn base(&self) -> &ControllerBase;

    fn base_mut(&mut self) -> &mut ControllerBase;

    /// Runs before every dispatch of this instance. Returning a response
    /// skips the action and auto-rendering.
    fn pre_dispatch(&mut self, _action: &str) -> Result<Option<Response>, DispatchError> {
        Ok(None)
    }

    /// Runs after the action returned successfully, before its result is
    /// turned into a response.
    fn post_dispatch(&mut self, _action: &str) -> Result<(), DispatchError> {
        Ok(())
    }

    /// Identity derived from [`Controller::NAMESPACE`] and [`Controller::NAME`].
    fn identity() -> ControllerIdentity {
        ControllerIdentity::derive(Self::NAMESPACE, Self::NAME)
    }

    /// Construct an instance bound to `context` and `request`.
    fn construct(context: Arc<AppContext>, request: Arc<Request>) -> Self {
        Self::create(ControllerBase::new(Self::identity(), context, request))
    }

    /// Resolve `action`, run the hooks and the action method, and produce the response.
    fn dispatch(&mut self, action: &str, params: &ParamBag) -> Result<Response, DispatchError> {
        dispatch::dispatch(self, action, params)
    }

    /// Dispatch another action of this controller.
    fn forward(&mut self, action: &str) -> Result<Response, DispatchError> {
        dispatch::forward(self, action, None, None)
    }

    /// Dispatch an action of another controller, possibly in another module.
    /// Omitted targets default to this controller's identity.
    fn forward_to(
        &mut self,
        action: &str,
        controller: Option<&str>,
        module: Option<&str>,
    ) -> Result<Response, DispatchError> {
        dispatch::forward(self, action, controller, module)
    }
}

/// State every controller carries: identity, shared context, request,
/// view and auto-render settings.
pub struct ControllerBase {
    identity: ControllerIdentity,
    context: Arc<AppContext>,
    request: Arc<Request>,
    view: View,
    auto_render_view: bool,
    auto_render_view_script: Option<String>,
}

impl fmt::Debug for ControllerBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerBase")
            .field("identity", &self.identity)
            .field("request_id", &self.request.id())
            .field("view", &self.view)
            .field("auto_render_view", &self.auto_render_view)
            .field("auto_render_view_script", &self.auto_render_view_script)
            .finish_non_exhaustive()
    }
}

impl ControllerBase {
    #[must_use]
    pub fn new(identity: ControllerIdentity, context: Arc<AppContext>, request: Arc<Request>) -> Self {
        let view = context.new_view();
        Self {
            identity,
            context,
            request,
            view,
            auto_render_view: true,
            auto_render_view_script: None,
        }
    }

    #[must_use]
    pub fn identity(&self) -> &ControllerIdentity {
        &self.identity
    }

    #[must_use]
    pub fn module(&self) -> &str {
        self.identity.module()
    }

    #[must_use]
    pub fn controller(&self) -> &str {
        self.identity.controller()
    }

    #[must_use]
    pub fn context(&self) -> &Arc<AppContext> {
        &self.context
    }

    #[must_use]
    pub fn request(&self) -> &Arc<Request> {
        &self.request
    }

    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    #[must_use]
    pub fn auto_render_view(&self) -> bool {
        self.auto_render_view
    }

    pub fn set_auto_render_view(&mut self, enabled: bool) {
        self.auto_render_view = enabled;
    }

    #[must_use]
    pub fn auto_render_view_script(&self) -> Option<&str> {
        self.auto_render_view_script.as_deref()
    }

    /// Render `script` instead of the default `module/controller/action`.
    pub fn set_auto_render_view_script(&mut self, script: impl Into<String>) {
        self.auto_render_view_script = Some(script.into());
    }

    /// Query-string parameters.
    #[must_use]
    pub fn get_params(&self) -> &ParamBag {
        self.request.query()
    }

    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&Value> {
        self.request.query().get(name)
    }

    #[must_use]
    pub fn get_param_or(&self, name: &str, default: Value) -> Value {
        self.request.query().get_or(name, default)
    }

    /// Body parameters.
    #[must_use]
    pub fn post_params(&self) -> &ParamBag {
        self.request.body()
    }

    #[must_use]
    pub fn post_param(&self, name: &str) -> Option<&Value> {
        self.request.body().get(name)
    }

    #[must_use]
    pub fn post_param_or(&self, name: &str, default: Value) -> Value {
        self.request.body().get_or(name, default)
    }

    /// Absolute URL on the current host; see [`build_url`].
    #[must_use]
    pub fn url(&self, path: Option<&str>, params: &ParamBag) -> String {
        build_url(&self.request, path, params)
    }
}

/// Object-safe view of a controller, used for forward targets and by the
/// front controller.
pub trait DynController: Send {
    fn identity(&self) -> &ControllerIdentity;

    fn dispatch(&mut self, action: &str, params: &ParamBag) -> Result<Response, DispatchError>;
}

struct Erased<C>(C);

impl<C: Controller> DynController for Erased<C> {
    fn identity(&self) -> &ControllerIdentity {
        self.0.base().identity()
    }

    fn dispatch(&mut self, action: &str, params: &ParamBag) -> Result<Response, DispatchError> {
        Controller::dispatch(&mut self.0, action, params)
    }
}

/// Creates controller instances for a router.
pub trait ControllerFactory: Send + Sync {
    fn identity(&self) -> &ControllerIdentity;

    fn create(&self, context: Arc<AppContext>, request: Arc<Request>) -> Box<dyn DynController>;
}

/// [`ControllerFactory`] for a concrete controller type.
pub struct TypedFactory<C> {
    identity: ControllerIdentity,
    _marker: PhantomData<fn() -> C>,
}

impl<C: Controller> TypedFactory<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            identity: C::identity(),
            _marker: PhantomData,
        }
    }
}

impl<C: Controller> Default for TypedFactory<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for TypedFactory<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedFactory")
            .field("identity", &self.identity)
            .finish()
    }
}

impl<C: Controller> ControllerFactory for TypedFactory<C> {
    fn identity(&self) -> &ControllerIdentity {
        &self.identity
    }

    fn create(&self, context: Arc<AppContext>, request: Arc<Request>) -> Box<dyn DynController> {
        Box::new(Erased(C::construct(context, request)))
    }
}
