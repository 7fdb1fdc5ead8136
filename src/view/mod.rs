//! # View Module
//!
//! Views render a script name plus a [`ViewModel`] into the body of a
//! response. Each controller owns a fresh [`View`] (its own model) while all
//! views of an application share one [`ViewRenderer`].
//!
//! [`TemplateRenderer`] is the bundled renderer: minijinja templates stored as
//! `<views_dir>/<module>/<controller>/<action>.<ext>`.

mod core;
mod template;

pub use core::{View, ViewError, ViewModel, ViewRenderer};
pub use template::TemplateRenderer;
