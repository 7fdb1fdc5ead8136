//! # Application Module
//!
//! [`AppContext`] bundles what controllers share: the router, the view
//! renderer and the response template. [`App`] is the front controller that
//! routes incoming requests to controllers and maps dispatch errors to
//! HTTP statuses.
//!
//! ```rust,ignore
//! let config = AppConfig::load(Path::new("app.yaml"))?.with_env_overrides();
//! let router = config.router()?.with_controller::<CartController>();
//! let app = App::from_config(&config, router);
//!
//! let response = app.handle(Request::get("http://shop.test/cart/show")?);
//! ```

mod context;
mod front;

pub use context::AppContext;
pub use front::App;
