use crate::config::Conventions;
use crate::controller::{ActionContext, ActionReply};
use crate::di::Container;
use crate::error::{AxleError, Result};
use crate::interceptor::{Interceptor, Next, run_chain};
use crate::routing::token::RouteToken;
use axum::extract::{FromRequestParts, Query, RawPathParams, Request};
use axum::response::IntoResponse;
use axum::routing::{MethodRouter, any};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::app::HttpVerb;

/// The terminal step of a route: takes the invocation context, returns the
/// folded action reply. Token routes resolve and dispatch a controller here;
/// closure routes run the user's function directly.
pub(crate) type DispatchFn = Arc<
    dyn Fn(ActionContext) -> Pin<Box<dyn Future<Output = Result<ActionReply>> + Send>>
        + Send
        + Sync,
>;

/// Turns parsed route tokens into axum method routers.
///
/// The built handler resolves the controller at request time
/// (container-instance first, factory fallback), collects the path captures
/// into an [`ActionContext`], dispatches the resolved method and folds the
/// reply into a response. Per-route interceptors wrap the dispatch.
pub struct ControllerResolver {
    container: Arc<Container>,
    conventions: Conventions,
}

impl ControllerResolver {
    pub fn new(container: Arc<Container>, conventions: Conventions) -> Self {
        Self {
            container,
            conventions,
        }
    }

    pub fn parse(&self, token: &str) -> Result<RouteToken> {
        RouteToken::parse(token, &self.conventions)
    }

    pub(crate) fn method_router(
        &self,
        verbs: &[HttpVerb],
        token: &RouteToken,
        interceptors: Arc<Vec<Arc<dyn Interceptor>>>,
    ) -> MethodRouter {
        let container = self.container.clone();
        let key = token.controller_key.clone();
        let method = token.method_name.clone();
        let dispatch: DispatchFn = Arc::new(move |cx| {
            let container = container.clone();
            let key = key.clone();
            let method = method.clone();
            Box::pin(async move {
                let controller = container.resolve_controller(&key)?;
                controller.dispatch(&method, cx).await
            })
        });
        Self::build(verbs, dispatch, interceptors)
    }

    pub(crate) fn method_router_for(
        &self,
        verbs: &[HttpVerb],
        dispatch: DispatchFn,
        interceptors: Arc<Vec<Arc<dyn Interceptor>>>,
    ) -> MethodRouter {
        Self::build(verbs, dispatch, interceptors)
    }

    fn build(
        verbs: &[HttpVerb],
        dispatch: DispatchFn,
        interceptors: Arc<Vec<Arc<dyn Interceptor>>>,
    ) -> MethodRouter {
        let handler = move |request: Request| {
            let dispatch = dispatch.clone();
            let interceptors = interceptors.clone();
            async move {
                // The context is extracted inside the terminal step, from the
                // request as it leaves the interceptor chain.
                let base = Next::new(move |request: Request| {
                    Box::pin(async move {
                        let (mut parts, _body) = request.into_parts();
                        let params =
                            match RawPathParams::from_request_parts(&mut parts, &()).await {
                                Ok(params) => params,
                                Err(rejection) => return Ok(rejection.into_response()),
                            };
                        let query =
                            match Query::<HashMap<String, String>>::try_from_uri(&parts.uri) {
                                Ok(Query(query)) => query,
                                Err(rejection) => return Ok(rejection.into_response()),
                            };
                        let args =
                            params.iter().map(|(_, value)| value.to_owned()).collect();
                        let cx = ActionContext::new(args, query);
                        match dispatch(cx).await {
                            Ok(reply) => Ok(reply.into_response()),
                            Err(err) => {
                                tracing::warn!(error = %err, "controller dispatch failed");
                                Ok(err.into_response())
                            }
                        }
                    })
                });
                match run_chain(interceptors, request, base).await {
                    Ok(response) => response,
                    Err(err) => {
                        tracing::warn!(error = %err, "route interceptor failed");
                        AxleError::Internal(err.to_string()).into_response()
                    }
                }
            }
        };

        if verbs.iter().any(|verb| matches!(verb, HttpVerb::Any)) {
            return any(handler);
        }
        let mut router = MethodRouter::new();
        for verb in verbs {
            if let Some(filter) = verb.filter() {
                router = router.on(filter, handler.clone());
            }
        }
        router
    }
}
