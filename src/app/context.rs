use crate::config::AppConfig;
use crate::response::Response;
use crate::router::Router;
use crate::view::{TemplateRenderer, View, ViewRenderer};
use std::fmt;
use std::sync::Arc;

/// Services shared by every controller of an application: the router, the
/// view renderer and the response template.
///
/// Read-only once built; controllers hold it through an `Arc`.
pub struct AppContext {
    router: Arc<dyn Router>,
    renderer: Arc<dyn ViewRenderer>,
    response: Response,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("response", &self.response)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    #[must_use]
    pub fn new(router: Arc<dyn Router>, renderer: Arc<dyn ViewRenderer>) -> Self {
        Self {
            router,
            renderer,
            response: Response::default(),
        }
    }

    /// Template renderer and response headers from `config`.
    #[must_use]
    pub fn from_config(config: &AppConfig, router: Arc<dyn Router>) -> Self {
        let renderer = TemplateRenderer::new(config.views.dir.clone(), &config.views.extension);
        Self::new(router, Arc::new(renderer)).with_response_template(config.response_template())
    }

    #[must_use]
    pub fn with_response_template(mut self, response: Response) -> Self {
        self.response = response;
        self
    }

    #[must_use]
    pub fn router(&self) -> &dyn Router {
        self.router.as_ref()
    }

    #[must_use]
    pub fn renderer(&self) -> &Arc<dyn ViewRenderer> {
        &self.renderer
    }

    /// A fresh view with an empty model.
    #[must_use]
    pub fn new_view(&self) -> View {
        View::new(Arc::clone(&self.renderer))
    }

    /// A copy of the response template.
    #[must_use]
    pub fn response(&self) -> Response {
        self.response.clone()
    }
}
