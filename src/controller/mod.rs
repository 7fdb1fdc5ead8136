//! # Controller Module
//!
//! Request-scoped controllers and the dispatch lifecycle that drives them.
//!
//! ## Overview
//!
//! A controller type implements [`Controller`] (identity and hooks) and
//! [`Actions`] (its static [`ActionTable`], normally generated with
//! `#[actions]`). Dispatching an action name:
//!
//! 1. asks the [`Router`](crate::router::Router) for the method name
//!    (`"some-other"` → `"some_other_action"`),
//! 2. refuses reserved, unknown and non-public methods with
//!    [`DispatchError::NotFound`](crate::DispatchError::NotFound),
//! 3. runs [`Controller::pre_dispatch`], which may answer instead of the action,
//! 4. binds parameters from explicit params, request attributes and defaults,
//! 5. invokes the action and then [`Controller::post_dispatch`],
//! 6. turns the result into a [`Response`](crate::Response), auto-rendering
//!    `module/controller/action` when the action returned nothing.
//!
//! ## Forwarding
//!
//! [`Controller::forward`] and [`Controller::forward_to`] re-dispatch within
//! the same request. Another controller is created through the router's
//! [`ControllerFactory`], sharing the context and request.

mod action;
mod core;
pub mod dispatch;
mod naming;
mod url;

pub use action::{
    ActionArgs, ActionDef, ActionFn, ActionResult, ActionTable, FromParam, IntoActionResult,
    ParamSpec, Visibility, RESERVED_METHODS,
};
pub use core::{Actions, Controller, ControllerBase, ControllerFactory, DynController, TypedFactory};
pub use naming::{camel_to_separator, normalize_segment, ControllerIdentity};
pub use url::{build_url, encode_query};
