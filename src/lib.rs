//! # brrtcontroller
//!
//! MVC-style controller dispatch: action names resolve to controller
//! methods, parameters bind from request data, results normalize into
//! responses, and views render automatically when an action returns nothing.
//!
//! ## Architecture
//!
//! - **[`controller`]** - the [`Controller`] trait, action tables, parameter
//!   binding, the dispatch lifecycle, forwards and the URL builder
//! - **[`router`]** - the [`Router`] trait and [`ControllerRouter`]: action
//!   naming, controller factories, path matching
//! - **[`app`]** - the shared [`AppContext`] and the [`App`] front controller
//! - **[`view`]** - view models and the minijinja-backed [`TemplateRenderer`]
//! - **[`request`]** / **[`response`]** - the HTTP abstraction controllers see
//! - **[`config`]** / **[`logging`]** - YAML/TOML configuration and tracing setup
//!
//! ### Dispatch Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant App
//!     participant Router as ControllerRouter
//!     participant C as Controller
//!     participant View
//!
//!     App->>Router: route(method, path)
//!     Router-->>App: RouteMatch (module, controller, action, params)
//!     App->>Router: controller_factory(module, controller)
//!     App->>C: dispatch(action)
//!     C->>Router: action_method(action)
//!     C->>C: pre_dispatch(action)
//!     C->>C: bind params, invoke action
//!     C->>C: post_dispatch(action)
//!     alt action returned nothing
//!         C->>View: render("module/controller/action")
//!     end
//!     C-->>App: Response
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use brrtcontroller::{
//!     actions, App, Controller, ControllerBase, ControllerRouter, Request, TemplateRenderer,
//! };
//!
//! struct CartController {
//!     base: ControllerBase,
//! }
//!
//! impl Controller for CartController {
//!     const NAMESPACE: &'static str = "Shop::Web";
//!     const NAME: &'static str = "CartController";
//!     fn create(base: ControllerBase) -> Self { Self { base } }
//!     fn base(&self) -> &ControllerBase { &self.base }
//!     fn base_mut(&mut self) -> &mut ControllerBase { &mut self.base }
//! }
//!
//! #[actions]
//! impl CartController {
//!     // renders views/shop/cart/index.html
//!     pub fn index_action(&mut self) {
//!         self.base.view_mut().set("items", 3);
//!     }
//!
//!     pub fn count_action(&mut self, #[param(default = 1)] page: u32) -> String {
//!         format!("page {page}")
//!     }
//! }
//!
//! let router = ControllerRouter::new().with_controller::<CartController>();
//! let app = App::new(router, std::sync::Arc::new(TemplateRenderer::new("views", "html")));
//! let response = app.handle(Request::get("http://shop.test/shop/cart/count?page=2")?);
//! ```
//!
//! ## Runtime Considerations
//!
//! Dispatch is synchronous. A controller instance belongs to one request
//! and is driven through `&mut self`; the context, request and router are
//! shared read-only through `Arc`, so a host may handle requests on as many
//! threads as it likes.

extern crate self as brrtcontroller;

pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod ids;
pub mod logging;
pub mod request;
pub mod response;
pub mod router;
pub mod view;

pub use app::{App, AppContext};
pub use brrtcontroller_macros::actions;
pub use config::AppConfig;
pub use controller::{
    ActionArgs, ActionResult, ActionTable, Actions, Controller, ControllerBase, ControllerFactory,
    ControllerIdentity, DynController, FromParam, IntoActionResult, ParamSpec, TypedFactory,
};
pub use error::DispatchError;
pub use ids::RequestId;
pub use request::{ParamBag, Request};
pub use response::Response;
pub use router::{ControllerRouter, RouteTarget, Router};
pub use view::{TemplateRenderer, View, ViewError, ViewModel, ViewRenderer};

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
    pub use serde_json;
}
