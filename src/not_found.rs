use crate::controller::ActionReply;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

type NotFoundHandler =
    Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ActionReply> + Send>> + Send + Sync>;

/// Application-wide not-found handling.
///
/// This is the dual-mode accessor split into two methods: [`NotFound::set`]
/// stores a handler without invoking it, and [`NotFound::invoke`] runs the
/// stored handler (or the built-in default) and produces the response. With
/// the halt flag set, the handler's buffered output is carried in a 404
/// response; without it, the handler's response passes through unchanged.
#[derive(Clone)]
pub struct NotFound {
    handler: Arc<RwLock<Option<NotFoundHandler>>>,
    halt: Arc<AtomicBool>,
}

impl NotFound {
    pub fn new() -> Self {
        Self {
            handler: Arc::new(RwLock::new(None)),
            halt: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Register the handler. It is stored, not invoked.
    pub fn set<F, Fut>(&self, handler: F, halt: bool)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionReply> + Send + 'static,
    {
        let handler: NotFoundHandler = Arc::new(move || Box::pin(handler()));
        if let Ok(mut slot) = self.handler.write() {
            *slot = Some(handler);
        }
        self.halt.store(halt, Ordering::Relaxed);
    }

    /// Invoke the registered handler, or the default if none is set.
    pub async fn invoke(&self) -> Response {
        let handler = match self.handler.read() {
            Ok(slot) => slot.clone(),
            Err(_) => None,
        };
        let reply = match handler {
            Some(handler) => handler().await,
            None => Self::default_reply(),
        };
        tracing::warn!(halt = self.halt.load(Ordering::Relaxed), "route not found");
        let buffered = reply.into_response();
        if self.halt.load(Ordering::Relaxed) {
            let (mut parts, body) = buffered.into_parts();
            parts.status = StatusCode::NOT_FOUND;
            Response::from_parts(parts, body)
        } else {
            buffered
        }
    }

    fn default_reply() -> ActionReply {
        ActionReply::Text(
            "<html><head><title>404 Page Not Found</title></head>\
             <body><h1>404 Page Not Found</h1>\
             <p>The page you are looking for could not be found.</p></body></html>"
                .to_string(),
        )
    }
}

impl Default for NotFound {
    fn default() -> Self {
        Self::new()
    }
}
