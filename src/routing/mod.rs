pub mod app;
pub mod names;
pub mod resolver;
pub mod resource;
pub mod token;

pub use app::{App, HttpVerb, RouteDef, RouteTarget};
pub use names::RouteNames;
pub use resolver::ControllerResolver;
pub use token::RouteToken;
