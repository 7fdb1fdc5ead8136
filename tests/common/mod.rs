#![allow(dead_code)]

pub mod controllers {
    use brrtcontroller::{actions, Controller, ControllerBase, Response};

    /// Controller with one action per dispatch outcome.
    pub struct TestController {
        base: ControllerBase,
    }

    impl Controller for TestController {
        const NAMESPACE: &'static str = "Starlit::App";
        const NAME: &'static str = "TestController";

        fn create(base: ControllerBase) -> Self {
            Self { base }
        }

        fn base(&self) -> &ControllerBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut ControllerBase {
            &mut self.base
        }

        fn pre_dispatch(&mut self, action: &str) -> Result<Option<Response>, brrtcontroller::DispatchError> {
            if action == "pre-test" {
                return Ok(Some(Response::new("preOk")));
            }
            Ok(None)
        }
    }

    #[actions]
    impl TestController {
        pub fn index_action(&mut self) {}

        pub fn some_other_action(
            &mut self,
            some_param: String,
            other_param: String,
            #[param(default = "wow")] param_with_default: String,
        ) -> Response {
            Response::new(format!("{} {} {}", some_param, other_param, param_with_default))
        }

        fn invalid_action(&mut self) {}

        pub fn no_auto_action(&mut self) {
            self.base.set_auto_render_view(false);
        }

        pub fn forward_end_action(&mut self) -> Response {
            Response::new("eeend")
        }

        pub fn pre_test_action(&mut self) -> &'static str {
            "action ran"
        }

        pub fn string_return_action(&mut self) -> &'static str {
            "a string"
        }

        pub fn forward_start_action(&mut self) -> Result<Response, brrtcontroller::DispatchError> {
            self.forward("forward-end")
        }

        pub fn forward_other_action(&mut self) -> Result<Response, brrtcontroller::DispatchError> {
            self.forward_to("show", Some("profile"), Some("Account"))
        }

        pub fn scripted_action(&mut self) {
            self.base.view_mut().set("title", "Scripted");
            self.base.set_auto_render_view_script("shared/page");
        }

        pub fn show_item_action(&mut self, id: u32, tag: Option<String>) -> String {
            match tag {
                Some(tag) => format!("item {} ({})", id, tag),
                None => format!("item {}", id),
            }
        }

        pub fn failing_action(&mut self) -> anyhow::Result<String> {
            anyhow::bail!("database unavailable")
        }
    }

    /// Controller in a second module, reached through forwards.
    pub struct ProfileController {
        base: ControllerBase,
    }

    impl Controller for ProfileController {
        const NAMESPACE: &'static str = "Account::Web";
        const NAME: &'static str = "ProfileController";

        fn create(base: ControllerBase) -> Self {
            Self { base }
        }

        fn base(&self) -> &ControllerBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut ControllerBase {
            &mut self.base
        }

        fn pre_dispatch(&mut self, action: &str) -> Result<Option<Response>, brrtcontroller::DispatchError> {
            if action == "guarded" {
                return Ok(Some(Response::new("guarded by profile")));
            }
            Ok(None)
        }

        fn post_dispatch(&mut self, action: &str) -> Result<(), brrtcontroller::DispatchError> {
            self.base.view_mut().set("post_dispatched", action);
            Ok(())
        }
    }

    #[actions]
    impl ProfileController {
        pub fn show_action(&mut self) {
            let module = self.base.module().to_string();
            self.base.view_mut().set("module", module);
        }

        pub fn guarded_action(&mut self) -> &'static str {
            "guard bypassed"
        }

        pub fn echo_action(&mut self, #[param(default = "none")] name: String) -> String {
            format!("hello {}", name)
        }
    }
}

pub mod mocks {
    use brrtcontroller::router::action_method_name;
    use brrtcontroller::{ControllerFactory, DispatchError, Router, ViewError, ViewModel, ViewRenderer};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Router answering from a fixed (module, controller) table and
    /// recording every call.
    #[derive(Default)]
    pub struct MockRouter {
        factories: HashMap<(String, String), Arc<dyn ControllerFactory>>,
        pub action_calls: Mutex<Vec<String>>,
        pub factory_calls: Mutex<Vec<(String, String)>>,
    }

    impl MockRouter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_factory(
            mut self,
            module: &str,
            controller: &str,
            factory: Arc<dyn ControllerFactory>,
        ) -> Self {
            self.factories
                .insert((module.to_string(), controller.to_string()), factory);
            self
        }

        pub fn action_calls(&self) -> Vec<String> {
            self.action_calls.lock().unwrap().clone()
        }

        pub fn factory_calls(&self) -> Vec<(String, String)> {
            self.factory_calls.lock().unwrap().clone()
        }
    }

    impl Router for MockRouter {
        fn action_method(&self, action: &str) -> String {
            self.action_calls.lock().unwrap().push(action.to_string());
            action_method_name(action)
        }

        fn controller_factory(
            &self,
            module: &str,
            controller: &str,
        ) -> Result<Arc<dyn ControllerFactory>, DispatchError> {
            self.factory_calls
                .lock()
                .unwrap()
                .push((module.to_string(), controller.to_string()));
            self.factories
                .get(&(module.to_string(), controller.to_string()))
                .cloned()
                .ok_or_else(|| DispatchError::ControllerNotFound {
                    module: module.to_string(),
                    controller: controller.to_string(),
                })
        }
    }

    /// Renderer returning a fixed body per script and recording what it rendered.
    #[derive(Default)]
    pub struct RecordingRenderer {
        outputs: HashMap<String, String>,
        pub rendered: Mutex<Vec<(String, ViewModel)>>,
    }

    impl RecordingRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_output(mut self, script: &str, output: &str) -> Self {
            self.outputs.insert(script.to_string(), output.to_string());
            self
        }

        pub fn rendered(&self) -> Vec<(String, ViewModel)> {
            self.rendered.lock().unwrap().clone()
        }

        pub fn scripts(&self) -> Vec<String> {
            self.rendered().into_iter().map(|(s, _)| s).collect()
        }
    }

    impl ViewRenderer for RecordingRenderer {
        fn render(&self, script: &str, model: &ViewModel) -> Result<String, ViewError> {
            self.rendered
                .lock()
                .unwrap()
                .push((script.to_string(), model.clone()));
            self.outputs
                .get(script)
                .cloned()
                .ok_or_else(|| ViewError::TemplateNotFound {
                    name: script.to_string(),
                })
        }
    }
}

pub mod fixtures {
    use super::mocks::{MockRouter, RecordingRenderer};
    use brrtcontroller::{AppContext, Controller, Request};
    use std::sync::Arc;

    /// Shared pieces of a controller test: the mocks stay reachable for assertions.
    pub struct Fixture {
        pub router: Arc<MockRouter>,
        pub renderer: Arc<RecordingRenderer>,
        pub context: Arc<AppContext>,
    }

    impl Fixture {
        pub fn new(router: MockRouter, renderer: RecordingRenderer) -> Self {
            let router = Arc::new(router);
            let renderer = Arc::new(renderer);
            let context = Arc::new(AppContext::new(router.clone(), renderer.clone()));
            Self {
                router,
                renderer,
                context,
            }
        }

        pub fn controller<C: Controller>(&self, request: Request) -> C {
            C::construct(self.context.clone(), Arc::new(request))
        }
    }

    pub fn get(uri: &str) -> Request {
        Request::get(uri).unwrap()
    }
}
