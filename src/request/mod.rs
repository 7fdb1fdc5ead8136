//! # Request Module
//!
//! Read-only request data consumed by controllers:
//!
//! - query-string parameters ([`Request::query`])
//! - body parameters from form or JSON bodies ([`Request::body`])
//! - route attributes captured by the router ([`Request::attributes`])
//! - scheme, host, path and headers
//!
//! All named values live in a [`ParamBag`] of JSON values. Action parameter
//! binding reads explicit dispatch params first and [`Request::attributes`]
//! second.

mod core;
mod params;

pub use core::Request;
pub use params::{params_from_json, parse_urlencoded, ParamBag};
