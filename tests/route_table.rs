use axle::config::ConfigService;
use axle::controller::{ActionContext, ActionReply, Controller};
use axle::di::Container;
use axle::error::AxleError;
use axle::interceptor::{Interceptor, InterceptorResult, Next};
use axle::routing::{App, RouteDef, RouteTarget};
use axle::async_trait;
use axum::body::Body;
use axum::http::{HeaderValue, Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

struct GreetingController;

#[async_trait]
impl Controller for GreetingController {
    fn actions() -> &'static [&'static str] {
        &["hello_action"]
    }

    async fn dispatch(&self, action: &str, cx: ActionContext) -> axle::Result<ActionReply> {
        match action {
            "hello_action" => {
                let greeting = cx.query("greeting").unwrap_or("Hello");
                Ok(format!("{greeting} {}", cx.arg(0)?).into())
            }
            other => Err(AxleError::UnknownAction {
                key: "Greeting".to_string(),
                action: other.to_string(),
            }),
        }
    }
}

struct HeaderTag {
    name: &'static str,
    hits: Arc<AtomicUsize>,
}

#[async_trait]
impl Interceptor for HeaderTag {
    async fn intercept(&self, request: Request<Body>, next: Next) -> InterceptorResult {
        self.hits.fetch_add(1, Ordering::SeqCst);
        let mut response = next.run(request).await?;
        response
            .headers_mut()
            .insert(self.name, HeaderValue::from_static("yes"));
        Ok(response)
    }
}

struct QueryRewrite;

#[async_trait]
impl Interceptor for QueryRewrite {
    async fn intercept(&self, mut request: Request<Body>, next: Next) -> InterceptorResult {
        let rewritten = format!("{}?greeting=Intercepted", request.uri().path());
        *request.uri_mut() = rewritten.parse()?;
        next.run(request).await
    }
}

fn greeting_app() -> App {
    let mut container = Container::new();
    container.register_controller("Greeting", GreetingController);
    App::with_config(container, ConfigService::default())
}

async fn get(router: axum::Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router.oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn token_routes_fold_strings_into_html_responses() -> anyhow::Result<()> {
    let router = greeting_app()
        .get("/hello/{name}", "Greeting:hello")?
        .into_router();

    let response = get(router, "/hello/world?greeting=Howdy").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );
    assert_eq!(body_text(response).await, "Howdy world");
    Ok(())
}

#[tokio::test]
async fn handler_targets_fold_json_replies() -> anyhow::Result<()> {
    let table = vec![
        RouteDef::new("/ping").on(
            "GET",
            RouteTarget::handler(|_cx| async { Ok(ActionReply::Json(json!({"pong": true}))) }),
        ),
    ];
    let router = greeting_app().add_routes(table)?.into_router();

    let response = get(router, "/ping").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(body_text(response).await, r#"{"pong":true}"#);
    Ok(())
}

#[tokio::test]
async fn per_route_interceptors_wrap_dispatch() -> anyhow::Result<()> {
    let hits = Arc::new(AtomicUsize::new(0));
    let table = vec![
        RouteDef::new("/hello/{name}")
            .to("Greeting:hello")
            .with(Arc::new(HeaderTag {
                name: "x-route",
                hits: hits.clone(),
            }))
            .named("hello"),
        RouteDef::new("/plain").to("Greeting:hello"),
    ];
    let app = greeting_app().add_routes(table)?;
    assert_eq!(app.url_for("hello", &["ada"])?, "/hello/ada");
    let router = app.into_router();

    let tagged = get(router.clone(), "/hello/ada").await;
    assert_eq!(tagged.headers().get("x-route").unwrap(), "yes");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn interceptor_request_rewrites_reach_the_action() -> anyhow::Result<()> {
    let table = vec![
        RouteDef::new("/hello/{name}")
            .to("Greeting:hello")
            .with(Arc::new(QueryRewrite)),
    ];
    let router = greeting_app().add_routes(table)?.into_router();

    let response = get(router, "/hello/ada?greeting=Howdy").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Intercepted ada");
    Ok(())
}

#[tokio::test]
async fn global_interceptors_cover_every_route_and_the_fallback() -> anyhow::Result<()> {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = greeting_app()
        .get("/hello/{name}", "Greeting:hello")?
        .with_interceptor(Arc::new(HeaderTag {
            name: "x-global",
            hits: hits.clone(),
        }))
        .into_router();

    let hit = get(router.clone(), "/hello/ada").await;
    assert_eq!(hit.headers().get("x-global").unwrap(), "yes");

    let miss = get(router, "/nowhere").await;
    assert_eq!(miss.status(), StatusCode::NOT_FOUND);
    assert_eq!(miss.headers().get("x-global").unwrap(), "yes");
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn unknown_paths_hit_the_default_not_found_page() -> anyhow::Result<()> {
    let router = greeting_app().into_router();
    let response = get(router, "/nowhere").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("404 Page Not Found"));
    Ok(())
}

#[tokio::test]
async fn custom_not_found_handler_is_invoked_on_misses() -> anyhow::Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = calls.clone();
    let router = greeting_app()
        .on_not_found(
            move || {
                counted.fetch_add(1, Ordering::SeqCst);
                async { ActionReply::Text("nothing here".into()) }
            },
            true,
        )
        .into_router();
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let response = get(router, "/nowhere").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "nothing here");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn dispatching_an_unknown_action_renders_404() -> anyhow::Result<()> {
    let router = greeting_app()
        .get("/oops", "Greeting:missing")?
        .into_router();
    let response = get(router, "/oops").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unregistered_controllers_fail_at_dispatch_time() -> anyhow::Result<()> {
    let router = greeting_app().get("/ghost", "Ghost:walk")?.into_router();
    let response = get(router, "/ghost").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}

#[tokio::test]
async fn a_token_reserves_its_route_name_only_once() -> anyhow::Result<()> {
    let app = greeting_app()
        .map_named(&["GET"], "/greet/{name}", "Greeting:hello", "greet.page")?
        .map_named(&["POST"], "/greet-again/{name}", "Greeting:hello", "greet.other")?;

    assert_eq!(app.url_for("greet.page", &["ada"])?, "/greet/ada");
    let err = app.url_for("greet.other", &["ada"]).unwrap_err();
    assert!(matches!(err, AxleError::UnknownRouteName { .. }));
    Ok(())
}

#[tokio::test]
async fn any_routes_accept_every_allowed_verb() -> anyhow::Result<()> {
    let router = greeting_app()
        .any("/hello/{name}", "Greeting:hello")?
        .into_router();

    for method in ["GET", "POST", "PUT", "PATCH", "DELETE"] {
        let request = Request::builder()
            .method(method)
            .uri("/hello/ada")
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "method {method}");
    }
    Ok(())
}
