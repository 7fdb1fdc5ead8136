use super::context::AppContext;
use crate::config::AppConfig;
use crate::error::DispatchError;
use crate::request::{ParamBag, Request};
use crate::response::Response;
use crate::router::{ControllerRouter, Router};
use crate::view::ViewRenderer;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Front controller: routes a request, creates the target controller and
/// dispatches it, turning dispatch errors into error responses.
#[derive(Debug, Clone)]
pub struct App {
    router: Arc<ControllerRouter>,
    context: Arc<AppContext>,
}

impl App {
    #[must_use]
    pub fn new(router: ControllerRouter, renderer: Arc<dyn ViewRenderer>) -> Self {
        let router = Arc::new(router);
        let context = AppContext::new(Arc::clone(&router) as Arc<dyn Router>, renderer);
        Self {
            router,
            context: Arc::new(context),
        }
    }

    /// Views and response template from `config`; `router` should come from
    /// [`AppConfig::router`] with controllers registered.
    #[must_use]
    pub fn from_config(config: &AppConfig, router: ControllerRouter) -> Self {
        let router = Arc::new(router);
        let context = AppContext::from_config(config, Arc::clone(&router) as Arc<dyn Router>);
        Self {
            router,
            context: Arc::new(context),
        }
    }

    #[must_use]
    pub fn with_response_template(self, response: Response) -> Self {
        let context = AppContext::new(
            Arc::clone(&self.router) as Arc<dyn Router>,
            Arc::clone(self.context.renderer()),
        )
        .with_response_template(response);
        Self {
            router: self.router,
            context: Arc::new(context),
        }
    }

    #[must_use]
    pub fn context(&self) -> &Arc<AppContext> {
        &self.context
    }

    #[must_use]
    pub fn router(&self) -> &ControllerRouter {
        &self.router
    }

    /// Dispatch `request`, propagating errors.
    ///
    /// Route parameters are added to the request attributes, where action
    /// parameter binding finds them.
    pub fn try_handle(&self, request: Request) -> Result<Response, DispatchError> {
        let Some(matched) = self.router.route(request.method(), request.path()) else {
            return Err(DispatchError::RouteNotFound {
                method: request.method().to_string(),
                path: request.path().to_string(),
            });
        };

        let request = Arc::new(request.with_attributes(&matched.params));
        let target = &matched.target;
        let factory = self
            .router
            .controller_factory(&target.module, &target.controller)?;
        let mut controller = factory.create(Arc::clone(&self.context), request);
        controller.dispatch(&target.action, &ParamBag::new())
    }

    /// Dispatch `request`, answering errors with an error response.
    ///
    /// Not-found errors become 404, parameter conversion errors 400 and
    /// everything else 500. The error detail is logged, never sent.
    #[must_use]
    pub fn handle(&self, request: Request) -> Response {
        let start = Instant::now();
        let request_id = request.id();
        let method = request.method().clone();
        let path = request.path().to_string();

        match self.try_handle(request) {
            Ok(response) => {
                info!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    status = response.status().as_u16(),
                    duration_us = start.elapsed().as_micros(),
                    "Request handled"
                );
                response
            }
            Err(e) => {
                let status = e.status_code();
                if status.is_server_error() {
                    error!(
                        request_id = %request_id,
                        method = %method,
                        path = %path,
                        status = status.as_u16(),
                        error = %e,
                        "Request failed"
                    );
                } else {
                    warn!(
                        request_id = %request_id,
                        method = %method,
                        path = %path,
                        status = status.as_u16(),
                        error = %e,
                        "Request rejected"
                    );
                }
                self.error_response(status)
            }
        }
    }

    /// Convert and dispatch a request handed over by a host HTTP server.
    ///
    /// Requests that cannot be converted are answered with 400.
    #[must_use]
    pub fn handle_http(&self, request: http::Request<Vec<u8>>) -> http::Response<String> {
        match Request::from_http(request) {
            Ok(request) => self.handle(request).into_http(),
            Err(e) => {
                warn!(error = %e, "Rejected malformed request");
                self.error_response(http::StatusCode::BAD_REQUEST).into_http()
            }
        }
    }

    fn error_response(&self, status: http::StatusCode) -> Response {
        let template = self.context.response();
        let base = Response::error(status);
        let body = base.content().to_string();
        template.with_status(status).with_body(body)
    }
}
