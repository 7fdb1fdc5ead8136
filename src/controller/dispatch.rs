//! The dispatch lifecycle shared by every [`Controller`].
//!
//! ```text
//! action ─► Router::action_method ─► validate ─► pre_dispatch ─┬─► bind ─► invoke ─► post_dispatch ─► finish
//!                                                             └─► (short-circuit response)
//! ```

use super::action::{ActionArgs, ActionDef, ActionResult, ActionTable, RESERVED_METHODS};
use super::core::{Controller, ControllerBase};
use crate::app::AppContext;
use crate::error::DispatchError;
use crate::request::ParamBag;
use crate::response::Response;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Dispatch `action` on `controller`.
///
/// A blank `action` is replaced by the router's default action before the
/// hooks run and the view script is named. `params` take precedence over
/// request attributes when binding the action method's parameters; the
/// request itself is never modified.
pub fn dispatch<C: Controller>(
    controller: &mut C,
    action: &str,
    params: &ParamBag,
) -> Result<Response, DispatchError> {
    let context = Arc::clone(controller.base().context());
    let request_id = controller.base().request().id();
    let action = if action.trim().is_empty() {
        context.router().default_action()
    } else {
        action
    };
    let method = context.router().action_method(action);

    let def = match resolve_action(C::actions(), action, &method) {
        Ok(def) => def,
        Err(e) => {
            warn!(
                request_id = %request_id,
                module = %controller.base().module(),
                controller = %controller.base().controller(),
                action = %action,
                method = %method,
                error = %e,
                "Action resolution failed"
            );
            return Err(e);
        }
    };

    debug!(
        request_id = %request_id,
        module = %controller.base().module(),
        controller = %controller.base().controller(),
        action = %action,
        method = %method,
        "Dispatching action"
    );

    if let Some(response) = controller.pre_dispatch(action)? {
        debug!(
            request_id = %request_id,
            action = %action,
            status = response.status().as_u16(),
            "Pre-dispatch returned a response, skipping action"
        );
        return Ok(response);
    }

    let args = bind_params(def, params, controller.base().request().attributes())?;
    let result = def.invoke(controller, &args)?;
    controller.post_dispatch(action)?;

    let response = finish(controller.base(), &context, action, result)?;
    debug!(
        request_id = %request_id,
        action = %action,
        status = response.status().as_u16(),
        body_len = response.content().len(),
        "Action dispatched"
    );
    Ok(response)
}

/// Look up `method` in `table`, refusing reserved, missing and protected methods.
pub fn resolve_action<'t, C>(
    table: &'t ActionTable<C>,
    action: &str,
    method: &str,
) -> Result<&'t ActionDef<C>, DispatchError> {
    let not_found = |reason: &'static str| DispatchError::NotFound {
        action: action.to_string(),
        method: method.to_string(),
        reason,
    };

    if RESERVED_METHODS.contains(&method) {
        return Err(not_found("is reserved"));
    }
    let def = table.get(method).ok_or_else(|| not_found("does not exist"))?;
    if !def.is_public() {
        return Err(not_found("is not public"));
    }
    Ok(def)
}

/// Build the positional argument list for `def`.
///
/// Each formal parameter takes the first of: explicit `params`, request
/// `attributes`, its declared default. Unknown names in either bag are ignored.
pub fn bind_params<C>(
    def: &ActionDef<C>,
    params: &ParamBag,
    attributes: &ParamBag,
) -> Result<ActionArgs, DispatchError> {
    let mut names = Vec::with_capacity(def.params().len());
    let mut values = Vec::with_capacity(def.params().len());
    for spec in def.params() {
        let value = params
            .get(spec.name())
            .or_else(|| attributes.get(spec.name()))
            .or_else(|| spec.default())
            .cloned()
            .ok_or_else(|| DispatchError::InvalidUsage {
                method: def.name().to_string(),
                param: spec.name().to_string(),
            })?;
        names.push(spec.name());
        values.push(value);
    }
    Ok(ActionArgs::new(def.name(), names, values))
}

/// Turn an action's result into the response returned by dispatch.
fn finish(
    base: &ControllerBase,
    context: &AppContext,
    action: &str,
    result: ActionResult,
) -> Result<Response, DispatchError> {
    match result {
        ActionResult::Response(response) => Ok(response),
        ActionResult::Text(body) => Ok(context.response().with_body(body)),
        ActionResult::Empty if base.auto_render_view() => {
            let script = base
                .auto_render_view_script()
                .map_or_else(|| base.identity().view_script(action), str::to_string);
            let body = base.view().render(&script)?;
            Ok(context.response().with_body(body))
        }
        ActionResult::Empty => Ok(context.response().with_body(String::new())),
    }
}

/// Re-dispatch within the current request.
///
/// Omitted targets default to the current identity. The same instance
/// handles same-identity forwards; anything else goes through the router's
/// controller factory with the current context and request. No parameters
/// are carried over.
pub fn forward<C: Controller>(
    controller: &mut C,
    action: &str,
    target_controller: Option<&str>,
    target_module: Option<&str>,
) -> Result<Response, DispatchError> {
    let base = controller.base();
    let identity = base.identity();
    let module = target_module.unwrap_or(identity.module()).to_string();
    let target = target_controller.unwrap_or(identity.controller()).to_string();
    let request_id = base.request().id();

    if identity.matches(&module, &target) {
        debug!(request_id = %request_id, action = %action, "Forwarding within controller");
        return dispatch(controller, action, &ParamBag::new());
    }

    info!(
        request_id = %request_id,
        from_module = %identity.module(),
        from_controller = %identity.controller(),
        module = %module,
        controller = %target,
        action = %action,
        "Forwarding to controller"
    );
    let context = Arc::clone(base.context());
    let request = Arc::clone(base.request());
    let factory = context.router().controller_factory(&module, &target)?;
    let mut forwarded = factory.create(Arc::clone(&context), request);
    forwarded.dispatch(action, &ParamBag::new())
}
