use crate::error::{AxleError, Result};
use async_trait::async_trait;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use std::collections::HashMap;

/// Method names of the CRUD controller contract, with the default suffix.
pub const CRUD_ACTIONS: &[&str] = &[
    "read_action",
    "get_one_action",
    "create_action",
    "update_one_action",
    "update_multiple_action",
    "delete_action",
];

/// Unsuffixed action names used when deriving the six resource route tokens.
pub const CRUD_ACTION_NAMES: &[&str] = &[
    "read",
    "get_one",
    "create",
    "update_one",
    "update_multiple",
    "delete",
];

/// Request-scoped invocation data handed to a controller action: the path
/// captures in declaration order plus the parsed query string.
#[derive(Debug, Clone, Default)]
pub struct ActionContext {
    args: Vec<String>,
    query: HashMap<String, String>,
}

impl ActionContext {
    pub fn new(args: Vec<String>, query: HashMap<String, String>) -> Self {
        Self { args, query }
    }

    /// Positional argument captured from the path.
    pub fn arg(&self, index: usize) -> Result<&str> {
        self.args
            .get(index)
            .map(String::as_str)
            .ok_or(AxleError::MissingArgument { index })
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn query_map(&self) -> &HashMap<String, String> {
        &self.query
    }
}

/// Fold target for controller action return values.
///
/// Mirrors the three-way result normalization of the route layer: a ready
/// response is stored verbatim, a string is wrapped into an HTML response,
/// and structured data passes through as JSON.
#[derive(Debug)]
pub enum ActionReply {
    Response(Response),
    Text(String),
    Json(Value),
}

impl IntoResponse for ActionReply {
    fn into_response(self) -> Response {
        match self {
            ActionReply::Response(response) => response,
            ActionReply::Text(body) => (
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            ActionReply::Json(value) => axum::Json(value).into_response(),
        }
    }
}

impl From<String> for ActionReply {
    fn from(body: String) -> Self {
        ActionReply::Text(body)
    }
}

impl From<&str> for ActionReply {
    fn from(body: &str) -> Self {
        ActionReply::Text(body.to_string())
    }
}

impl From<Value> for ActionReply {
    fn from(value: Value) -> Self {
        ActionReply::Json(value)
    }
}

impl From<Response> for ActionReply {
    fn from(response: Response) -> Self {
        ActionReply::Response(response)
    }
}

/// A routable controller.
///
/// Actions are dispatched by the method name resolved from a route token,
/// so one instance serves every action it advertises. Implement this
/// directly for free-form controllers, or implement [`CrudApi`] to get the
/// six-action dispatch for free.
#[async_trait]
pub trait Controller: Send + Sync + 'static {
    /// Method names this controller can dispatch. Read at registration time
    /// for capability checks, before any instance exists.
    fn actions() -> &'static [&'static str]
    where
        Self: Sized;

    async fn dispatch(&self, action: &str, cx: ActionContext) -> Result<ActionReply>;
}

/// The fixed CRUD action contract backing resource routes.
///
/// The `id` parameter of `get_one_action`, `update_one_action` and
/// `delete_action` is the first positional path capture.
#[async_trait]
pub trait CrudApi: Send + Sync + 'static {
    async fn read_action(&self, cx: &ActionContext) -> Result<ActionReply>;

    async fn get_one_action(&self, id: &str, cx: &ActionContext) -> Result<ActionReply>;

    async fn create_action(&self, cx: &ActionContext) -> Result<ActionReply>;

    async fn update_one_action(&self, id: &str, cx: &ActionContext) -> Result<ActionReply>;

    async fn update_multiple_action(&self, cx: &ActionContext) -> Result<ActionReply>;

    async fn delete_action(&self, id: &str, cx: &ActionContext) -> Result<ActionReply>;
}

#[async_trait]
impl<T: CrudApi> Controller for T {
    fn actions() -> &'static [&'static str] {
        CRUD_ACTIONS
    }

    async fn dispatch(&self, action: &str, cx: ActionContext) -> Result<ActionReply> {
        match action {
            "read_action" => self.read_action(&cx).await,
            "get_one_action" => {
                let id = cx.arg(0)?.to_owned();
                self.get_one_action(&id, &cx).await
            }
            "create_action" => self.create_action(&cx).await,
            "update_one_action" => {
                let id = cx.arg(0)?.to_owned();
                self.update_one_action(&id, &cx).await
            }
            "update_multiple_action" => self.update_multiple_action(&cx).await,
            "delete_action" => {
                let id = cx.arg(0)?.to_owned();
                self.delete_action(&id, &cx).await
            }
            other => Err(AxleError::UnknownAction {
                key: std::any::type_name::<T>().to_string(),
                action: other.to_string(),
            }),
        }
    }
}
