//! # Axle
//!
//! Controller-token routing conventions with dependency injection for axum.
//!
//! Axle is a thin extension over axum that maps routes to
//! `"Controller:action"` tokens. Controllers are registered in a container
//! under string keys derived from configurable prefix/suffix conventions;
//! at request time the token's controller is resolved (container instance
//! first, factory fallback), the action is dispatched with the route's
//! positional captures, and the return value is folded into a response.
//!
//! ## Features
//!
//! - **Token routes**: map paths to `"Controller:action"` strings
//! - **DI container**: typed services plus named controller registrations
//! - **Resource routes**: six conventional CRUD endpoints from one call
//! - **Route names**: first-registration reservation and URL generation
//! - **Not-found handling**: register-or-invoke accessor wired as fallback
//! - **Interceptors**: global and per-route hooks around dispatch
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use axle::prelude::*;
//!
//! struct HomeController;
//!
//! #[async_trait]
//! impl Controller for HomeController {
//!     fn actions() -> &'static [&'static str] {
//!         &["index_action"]
//!     }
//!
//!     async fn dispatch(&self, action: &str, _cx: ActionContext) -> axle::Result<ActionReply> {
//!         match action {
//!             "index_action" => Ok("<h1>Welcome</h1>".into()),
//!             other => Err(AxleError::UnknownAction {
//!                 key: "Home".into(),
//!                 action: other.into(),
//!             }),
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let container = ContainerBuilder::new()
//!         .controller("Home", HomeController)
//!         .build();
//!
//!     let router = App::new(container)
//!         .get("/", "Home:index")?
//!         .into_router();
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod common;
pub mod config;
pub mod controller;
pub mod di;
pub mod error;
pub mod interceptor;
pub mod module;
pub mod not_found;
pub mod routing;

// Re-export core types
pub use common::ApiResponse;
pub use config::{ConfigService, Conventions};
pub use controller::{ActionContext, ActionReply, Controller, CrudApi};
pub use di::{Container, ContainerBuilder, FromContainer};
pub use error::{AxleError, Result};
pub use module::Module;
pub use not_found::NotFound;
pub use routing::{App, HttpVerb, RouteDef, RouteTarget, RouteToken};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use axle::prelude::*;
/// ```
pub mod prelude {
    pub use crate::common::ApiResponse;
    pub use crate::config::{ConfigService, Conventions};
    pub use crate::controller::{ActionContext, ActionReply, Controller, CrudApi};
    pub use crate::di::{Container, ContainerBuilder, FromContainer};
    pub use crate::error::{AxleError, Result};
    pub use crate::interceptor::{Interceptor, InterceptorResult, Next};
    pub use crate::module::Module;
    pub use crate::not_found::NotFound;
    pub use crate::routing::{App, HttpVerb, RouteDef, RouteTarget, RouteToken};
    pub use async_trait::async_trait;
    pub use axum::{
        Json, Router,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    pub use std::sync::Arc;
}
