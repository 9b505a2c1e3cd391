use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub mod layer;

/// standard return type for Interceptors
pub type InterceptorResult = Result<Response, InterceptorError>;

/// A type-erased error for interceptors
pub type InterceptorError = Box<dyn std::error::Error + Send + Sync>;

/// Represents the rest of the chain after the current interceptor
pub struct Next {
    pub(crate) run: Box<
        dyn FnOnce(Request<Body>) -> Pin<Box<dyn Future<Output = InterceptorResult> + Send>>
            + Send,
    >,
}

impl Next {
    /// Create a new Next handler
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(Request<Body>) -> Pin<Box<dyn Future<Output = InterceptorResult> + Send>>
            + Send
            + 'static,
    {
        Self { run: Box::new(f) }
    }

    /// Execute the rest of the chain
    pub async fn run(self, request: Request<Body>) -> InterceptorResult {
        (self.run)(request).await
    }
}

/// The Interceptor trait
///
/// Interceptors wrap controller dispatch: they can inspect or modify the
/// request before the action runs, and the response after it returns.
/// Per-route interceptors run inside the global ones, first in the list
/// outermost.
///
/// # Example
/// ```ignore
/// struct LoggingInterceptor;
///
/// #[async_trait]
/// impl Interceptor for LoggingInterceptor {
///     async fn intercept(&self, req: Request<Body>, next: Next) -> InterceptorResult {
///         tracing::debug!("before action");
///         let res = next.run(req).await?;
///         tracing::debug!("after action");
///         Ok(res)
///     }
/// }
/// ```
#[async_trait]
pub trait Interceptor: Send + Sync + 'static {
    async fn intercept(&self, request: Request<Body>, next: Next) -> InterceptorResult;
}

/// Run `request` through `interceptors` and finally into `base`.
///
/// The chain is assembled back to front so `interceptors[0]` ends up
/// outermost.
pub async fn run_chain(
    interceptors: Arc<Vec<Arc<dyn Interceptor>>>,
    request: Request<Body>,
    base: Next,
) -> InterceptorResult {
    let mut chain = base;
    for i in (0..interceptors.len()).rev() {
        let list = interceptors.clone();
        let inner = chain;
        chain = Next::new(move |req| {
            Box::pin(async move { list[i].intercept(req, inner).await })
        });
    }
    chain.run(request).await
}
