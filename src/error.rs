use crate::view::ViewError;
use http::StatusCode;
use std::fmt;

/// Failure of a dispatch or forward chain.
///
/// Errors are never retried or recovered inside the dispatcher; they
/// terminate the chain and surface to the caller. A front controller maps
/// them to HTTP statuses with [`DispatchError::status_code`].
#[derive(Debug)]
pub enum DispatchError {
    /// The action did not resolve to a dispatchable method
    ///
    /// Covers methods missing from the action table, non-public methods and
    /// reserved lifecycle names.
    NotFound {
        /// Action name as requested
        action: String,
        /// Method name the router resolved it to
        method: String,
        /// Why the method was refused
        reason: &'static str,
    },
    /// No route matches the request path
    RouteNotFound {
        /// Request method
        method: String,
        /// Request path
        path: String,
    },
    /// No controller is registered for a forward or route target
    ControllerNotFound {
        /// Requested module
        module: String,
        /// Requested controller
        controller: String,
    },
    /// A required action parameter has no explicit value, request attribute
    /// or default. This is a route/controller contract bug, not a client error.
    InvalidUsage {
        /// Method being bound
        method: String,
        /// Parameter without a source
        param: String,
    },
    /// A bound value could not be converted to the parameter's type
    InvalidParameter {
        /// Parameter name
        param: String,
        /// Conversion failure detail
        message: String,
    },
    /// The view renderer failed
    View(ViewError),
    /// Error raised by action or hook code, propagated unchanged
    Action(anyhow::Error),
}

impl DispatchError {
    /// True for the "resource not found" family (404-class).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DispatchError::NotFound { .. }
                | DispatchError::RouteNotFound { .. }
                | DispatchError::ControllerNotFound { .. }
        )
    }

    /// True for controller/route contract errors.
    #[must_use]
    pub fn is_logic_error(&self) -> bool {
        matches!(self, DispatchError::InvalidUsage { .. })
    }

    /// HTTP status a front controller should answer with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::NotFound { .. }
            | DispatchError::RouteNotFound { .. }
            | DispatchError::ControllerNotFound { .. } => StatusCode::NOT_FOUND,
            DispatchError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            DispatchError::InvalidUsage { .. }
            | DispatchError::View(_)
            | DispatchError::Action(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::NotFound {
                action,
                method,
                reason,
            } => write!(
                f,
                "Action '{}' not found: method '{}' {}",
                action, method, reason
            ),
            DispatchError::RouteNotFound { method, path } => {
                write!(f, "No route matches {} {}", method, path)
            }
            DispatchError::ControllerNotFound { module, controller } => write!(
                f,
                "Controller '{}' not found in module '{}'",
                controller, module
            ),
            DispatchError::InvalidUsage { method, param } => write!(
                f,
                "Action method '{}' requires parameter '{}' but no value or default is available",
                method, param
            ),
            DispatchError::InvalidParameter { param, message } => {
                write!(f, "Invalid value for parameter '{}': {}", param, message)
            }
            DispatchError::View(e) => write!(f, "{}", e),
            DispatchError::Action(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::View(e) => Some(e),
            DispatchError::Action(e) => Some(&**e),
            _ => None,
        }
    }
}

impl From<ViewError> for DispatchError {
    fn from(e: ViewError) -> Self {
        DispatchError::View(e)
    }
}

impl From<anyhow::Error> for DispatchError {
    fn from(e: anyhow::Error) -> Self {
        DispatchError::Action(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = DispatchError::NotFound {
            action: "none".into(),
            method: "none_action".into(),
            reason: "does not exist",
        };
        assert!(not_found.is_not_found());
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let usage = DispatchError::InvalidUsage {
            method: "some_other_action".into(),
            param: "some_param".into(),
        };
        assert!(usage.is_logic_error());
        assert!(!usage.is_not_found());
        assert_eq!(usage.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let bad = DispatchError::InvalidParameter {
            param: "id".into(),
            message: "not an integer".into(),
        };
        assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_action_errors_keep_their_message() {
        let err: DispatchError = anyhow::anyhow!("database unavailable").into();
        assert_eq!(err.to_string(), "database unavailable");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
