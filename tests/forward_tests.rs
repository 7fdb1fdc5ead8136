//! Tests for forwarding between actions and controllers
//!
//! Same-identity forwards reuse the running instance; anything else goes
//! through the router's controller factory with the current request.

mod common;

use brrtcontroller::{Controller, DispatchError, ParamBag, TypedFactory};
use common::controllers::{ProfileController, TestController};
use common::fixtures::{get, Fixture};
use common::mocks::{MockRouter, RecordingRenderer};
use serde_json::json;
use std::sync::Arc;

#[test]
fn test_forward_within_controller() {
    let fx = Fixture::new(MockRouter::new(), RecordingRenderer::new());
    let mut controller: TestController = fx.controller(get("http://www.example.org/"));

    let response = controller.forward("forward-end").unwrap();

    assert_eq!(response.content(), "eeend");
    assert_eq!(fx.router.action_calls(), vec!["forward-end"]);
    assert!(fx.router.factory_calls().is_empty());
}

#[test]
fn test_forward_from_inside_an_action() {
    let fx = Fixture::new(MockRouter::new(), RecordingRenderer::new());
    let mut controller: TestController = fx.controller(get("http://www.example.org/"));

    let response = controller.dispatch("forward-start", &ParamBag::new()).unwrap();

    assert_eq!(response.content(), "eeend");
    assert_eq!(fx.router.action_calls(), vec!["forward-start", "forward-end"]);
}

#[test]
fn test_forward_with_own_identity_stays_on_instance() {
    let fx = Fixture::new(MockRouter::new(), RecordingRenderer::new());
    let mut controller: TestController = fx.controller(get("http://www.example.org/"));

    let response = controller
        .forward_to("forward-end", Some("test"), Some("Starlit"))
        .unwrap();

    assert_eq!(response.content(), "eeend");
    assert!(fx.router.factory_calls().is_empty());
}

#[test]
fn test_forward_to_other_controller_uses_factory() {
    let router = MockRouter::new().with_factory(
        "sw",
        "mock",
        Arc::new(TypedFactory::<TestController>::new()),
    );
    let fx = Fixture::new(router, RecordingRenderer::new());
    let mut controller: TestController = fx.controller(get("http://www.example.org/"));

    let response = controller
        .forward_to("forward-end", Some("mock"), Some("sw"))
        .unwrap();

    assert_eq!(response.content(), "eeend");
    assert_eq!(
        fx.router.factory_calls(),
        vec![("sw".to_string(), "mock".to_string())]
    );
}

#[test]
fn test_forward_defaults_module_to_current() {
    let fx = Fixture::new(MockRouter::new(), RecordingRenderer::new());
    let mut controller: TestController = fx.controller(get("http://www.example.org/"));

    let err = controller
        .forward_to("index", Some("profile"), None)
        .unwrap_err();

    assert_eq!(
        fx.router.factory_calls(),
        vec![("Starlit".to_string(), "profile".to_string())]
    );
    assert!(matches!(err, DispatchError::ControllerNotFound { .. }));
}

#[test]
fn test_unknown_forward_target_is_not_found() {
    let fx = Fixture::new(MockRouter::new(), RecordingRenderer::new());
    let mut controller: TestController = fx.controller(get("http://www.example.org/"));

    let err = controller
        .forward_to("index", Some("missing"), Some("nowhere"))
        .unwrap_err();

    match &err {
        DispatchError::ControllerNotFound { module, controller } => {
            assert_eq!(module, "nowhere");
            assert_eq!(controller, "missing");
        }
        other => panic!("expected ControllerNotFound, got {:?}", other),
    }
    assert!(err.is_not_found());
}

#[test]
fn test_forwarded_controller_runs_full_lifecycle() {
    let router = MockRouter::new().with_factory(
        "Account",
        "profile",
        Arc::new(TypedFactory::<ProfileController>::new()),
    );
    let renderer = RecordingRenderer::new().with_output("account/profile/show", "profile page");
    let fx = Fixture::new(router, renderer);
    let mut controller: TestController = fx.controller(get("http://www.example.org/"));

    let response = controller.dispatch("forward-other", &ParamBag::new()).unwrap();

    assert_eq!(response.content(), "profile page");
    let rendered = fx.renderer.rendered();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].0, "account/profile/show");
    assert_eq!(rendered[0].1.get("module"), Some(&json!("Account")));
    assert_eq!(rendered[0].1.get("post_dispatched"), Some(&json!("show")));
}

#[test]
fn test_forward_does_not_carry_params() {
    let router = MockRouter::new().with_factory(
        "Account",
        "profile",
        Arc::new(TypedFactory::<ProfileController>::new()),
    );
    let fx = Fixture::new(router, RecordingRenderer::new());
    let request = get("http://www.example.org/?name=query");
    let mut controller: TestController = fx.controller(request);

    let response = controller
        .forward_to("echo", Some("profile"), Some("Account"))
        .unwrap();

    assert_eq!(response.content(), "hello none");
}

#[test]
fn test_forward_shares_request_attributes() {
    let router = MockRouter::new().with_factory(
        "Account",
        "profile",
        Arc::new(TypedFactory::<ProfileController>::new()),
    );
    let fx = Fixture::new(router, RecordingRenderer::new());
    let request = get("http://www.example.org/").with_attribute("name", "attr");
    let mut controller: TestController = fx.controller(request);

    let response = controller
        .forward_to("echo", Some("profile"), Some("Account"))
        .unwrap();

    assert_eq!(response.content(), "hello attr");
}

#[test]
fn test_forward_target_runs_its_own_pre_dispatch() {
    let router = MockRouter::new().with_factory(
        "Account",
        "profile",
        Arc::new(TypedFactory::<ProfileController>::new()),
    );
    let fx = Fixture::new(router, RecordingRenderer::new());
    let mut controller: TestController = fx.controller(get("http://www.example.org/"));

    let response = controller
        .forward_to("guarded", Some("profile"), Some("Account"))
        .unwrap();

    assert_eq!(response.content(), "guarded by profile");
    assert_eq!(fx.router.action_calls(), vec!["guarded"]);
    assert!(fx.renderer.rendered().is_empty());
}
