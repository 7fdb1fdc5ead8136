use brrtcontroller::{
    actions, App, Controller, ControllerBase, ControllerRouter, ParamBag, Request, RouteTarget,
    ViewError, ViewModel, ViewRenderer,
};
use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use std::hint::black_box;
use std::sync::Arc;

struct StaticRenderer;

impl ViewRenderer for StaticRenderer {
    fn render(&self, script: &str, model: &ViewModel) -> Result<String, ViewError> {
        Ok(format!("{script}:{}", model.len()))
    }
}

struct AnimalsController {
    base: ControllerBase,
}

impl Controller for AnimalsController {
    const NAMESPACE: &'static str = "Zoo::Web";
    const NAME: &'static str = "AnimalsController";

    fn create(base: ControllerBase) -> Self {
        Self { base }
    }

    fn base(&self) -> &ControllerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ControllerBase {
        &mut self.base
    }
}

#[actions]
impl AnimalsController {
    pub fn index_action(&mut self) {
        self.base.view_mut().set("count", 3);
    }

    pub fn show_action(&mut self, id: u64, #[param(default = "all")] section: String) -> String {
        format!("{id}/{section}")
    }

    pub fn forward_action(&mut self) -> Result<brrtcontroller::Response, brrtcontroller::DispatchError> {
        self.forward("index")
    }
}

fn app() -> App {
    let mut router = ControllerRouter::new().with_controller::<AnimalsController>();
    router
        .add_route(
            Some(Method::GET),
            "/animals/{id}/sections/{section}",
            RouteTarget::new("Zoo", "animals", "show"),
        )
        .unwrap();
    App::new(router, Arc::new(StaticRenderer))
}

fn bench_route_match(c: &mut Criterion) {
    let app = app();
    let paths = [
        "/zoo/animals/index",
        "/zoo/animals/show/id/7/section/reptiles",
        "/animals/12/sections/birds",
        "/animals/show",
    ];
    c.bench_function("route_match", |b| {
        b.iter(|| {
            for path in &paths {
                black_box(app.router().route(&Method::GET, path));
            }
        })
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let app = app();
    let request = Arc::new(Request::get("http://zoo.test/").unwrap().with_attribute("id", "42"));
    let params = ParamBag::new().with("section", "mammals");

    c.bench_function("dispatch_render", |b| {
        b.iter(|| {
            let mut controller = AnimalsController::construct(Arc::clone(app.context()), Arc::clone(&request));
            black_box(controller.dispatch("index", &ParamBag::new()).unwrap())
        })
    });

    c.bench_function("dispatch_bound_params", |b| {
        b.iter(|| {
            let mut controller = AnimalsController::construct(Arc::clone(app.context()), Arc::clone(&request));
            black_box(controller.dispatch("show", &params).unwrap())
        })
    });

    c.bench_function("dispatch_forward", |b| {
        b.iter(|| {
            let mut controller = AnimalsController::construct(Arc::clone(app.context()), Arc::clone(&request));
            black_box(controller.dispatch("forward", &ParamBag::new()).unwrap())
        })
    });
}

fn bench_handle(c: &mut Criterion) {
    let app = app();
    c.bench_function("app_handle", |b| {
        b.iter(|| {
            let request = Request::get("http://zoo.test/animals/12/sections/birds").unwrap();
            black_box(app.handle(request))
        })
    });
}

criterion_group!(benches, bench_route_match, bench_dispatch, bench_handle);
criterion_main!(benches);
