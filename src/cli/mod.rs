//! # CLI Module
//!
//! Command-line utilities for working with controllers, views and routing
//! configuration.
//!
//! ## Commands
//!
//! ### `view-path`
//!
//! Print the view script a controller action auto-renders:
//!
//! ```bash
//! brrtcontroller view-path --namespace Shop::Web --controller UserProfileController --action edit
//! # shop/user-profile/edit
//! ```
//!
//! ### `action-method`
//!
//! Print the method an action name resolves to:
//!
//! ```bash
//! brrtcontroller action-method some-other
//! # some_other_action
//! ```
//!
//! ### `render`
//!
//! Render a view script with JSON variables:
//!
//! ```bash
//! brrtcontroller render --views views --vars '{"name": "World"}' shop/cart/index
//! ```
//!
//! ### `routes`
//!
//! List a config's custom routes, or show where a path dispatches:
//!
//! ```bash
//! brrtcontroller routes --config app.yaml
//! brrtcontroller routes --config app.yaml --method POST /pets/42
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use brrtcontroller::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! run_cli(Cli::parse())?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, run_cli_with_output, Cli, Commands};
