use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Variables handed to the renderer. Later writes to a key overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ViewModel {
    vars: HashMap<String, Value>,
}

impl ViewModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn extend<K: Into<String>, V: Into<Value>>(&mut self, vars: impl IntoIterator<Item = (K, V)>) {
        for (k, v) in vars {
            self.set(k, v);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Errors raised while rendering a view script.
#[derive(Debug)]
pub enum ViewError {
    /// No template exists for the script name
    TemplateNotFound {
        /// Script name as requested by the controller
        name: String,
    },
    /// Script name escapes the views directory (`..`, absolute paths)
    InvalidTemplatePath {
        /// The rejected script name
        name: String,
    },
    /// Template failed to parse or evaluate
    Render {
        /// Script name being rendered
        name: String,
        /// Renderer message
        message: String,
    },
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::TemplateNotFound { name } => {
                write!(f, "View script '{}' not found", name)
            }
            ViewError::InvalidTemplatePath { name } => {
                write!(f, "View script '{}' resolves outside the views directory", name)
            }
            ViewError::Render { name, message } => {
                write!(f, "Failed to render view script '{}': {}", name, message)
            }
        }
    }
}

impl std::error::Error for ViewError {}

/// Turns a view script name plus a [`ViewModel`] into text.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, script: &str, model: &ViewModel) -> Result<String, ViewError>;
}

/// Per-controller view: its own model plus the application's shared renderer.
#[derive(Clone)]
pub struct View {
    model: ViewModel,
    renderer: Arc<dyn ViewRenderer>,
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View").field("model", &self.model).finish_non_exhaustive()
    }
}

impl View {
    #[must_use]
    pub fn new(renderer: Arc<dyn ViewRenderer>) -> Self {
        Self {
            model: ViewModel::new(),
            renderer,
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.model.set(key, value);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.model.get(key)
    }

    #[must_use]
    pub fn model(&self) -> &ViewModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut ViewModel {
        &mut self.model
    }

    /// Render `script` with the model accumulated so far.
    pub fn render(&self, script: &str) -> Result<String, ViewError> {
        debug!(script = %script, vars = self.model.len(), "Rendering view");
        self.renderer.render(script, &self.model)
    }
}
