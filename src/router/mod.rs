//! # Router Module
//!
//! Maps request paths to dispatch targets and resolves the names the
//! dispatcher asks about.
//!
//! ## Overview
//!
//! The [`Router`] trait is what controllers see through the application
//! context:
//!
//! - [`Router::action_method`] turns an action name into the method name
//!   looked up in a controller's action table (`"some-other"` →
//!   `"some_other_action"`),
//! - [`Router::controller_factory`] yields the factory for a
//!   (module, controller) pair, used by forwards and the front controller.
//!
//! [`ControllerRouter`] is the bundled implementation. It also matches
//! request paths, first against custom patterns, then against the
//! conventional `/[module/]controller/action` layout.
//!
//! ## Patterns
//!
//! Custom patterns (`/pets/{id}`) are compiled into anchored regexes at
//! registration. Captured segments are URL-decoded and end up as request
//! attributes, where action parameter binding picks them up.
//!
//! ```rust,ignore
//! let mut router = ControllerRouter::new().with_controller::<PetController>();
//! router.add_route(Some(Method::GET), "/pets/{id}", RouteTarget::new("", "pet", "show"))?;
//!
//! let m = router.route(&Method::GET, "/pets/42").unwrap();
//! assert_eq!(m.params.get_str("id"), Some("42"));
//! ```

mod core;
mod pattern;

pub use core::{action_method_name, ControllerRouter, RouteMatch, Router};
pub use pattern::{path_to_regex, RoutePattern, RouteTarget};
