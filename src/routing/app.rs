use crate::config::{ConfigService, Conventions};
use crate::controller::{ActionContext, ActionReply};
use crate::di::Container;
use crate::error::{AxleError, Result};
use crate::interceptor::Interceptor;
use crate::interceptor::layer::InterceptorLayer;
use crate::not_found::NotFound;
use crate::routing::names::RouteNames;
use crate::routing::resolver::{ControllerResolver, DispatchFn};
use crate::routing::token::RouteToken;
use axum::Router;
use axum::routing::MethodFilter;
use std::future::Future;
use std::sync::Arc;

/// HTTP methods accepted by the route mapping surface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumString,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpVerb {
    Any,
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
}

impl HttpVerb {
    /// Parse a verb string, rejecting anything outside the allowed set.
    pub fn parse(method: &str) -> Result<Self> {
        method
            .parse::<HttpVerb>()
            .map_err(|_| AxleError::DisallowedMethod {
                method: method.to_string(),
            })
    }

    /// `None` for [`HttpVerb::Any`], which is routed without a filter.
    pub(crate) fn filter(self) -> Option<MethodFilter> {
        match self {
            HttpVerb::Any => None,
            HttpVerb::Get => Some(MethodFilter::GET),
            HttpVerb::Post => Some(MethodFilter::POST),
            HttpVerb::Put => Some(MethodFilter::PUT),
            HttpVerb::Patch => Some(MethodFilter::PATCH),
            HttpVerb::Delete => Some(MethodFilter::DELETE),
            HttpVerb::Options => Some(MethodFilter::OPTIONS),
            HttpVerb::Head => Some(MethodFilter::HEAD),
        }
    }
}

#[derive(Clone)]
enum TargetKind {
    Token(String),
    Handler(DispatchFn),
}

/// What a route maps to: a `"Controller:action"` token or a plain handler
/// function, mirroring the string-or-callable route surface.
#[derive(Clone)]
pub struct RouteTarget {
    kind: TargetKind,
}

impl RouteTarget {
    pub fn token(token: impl Into<String>) -> Self {
        Self {
            kind: TargetKind::Token(token.into()),
        }
    }

    /// A free handler taking the invocation context directly.
    pub fn handler<F, Fut>(handler: F) -> Self
    where
        F: Fn(ActionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ActionReply>> + Send + 'static,
    {
        Self {
            kind: TargetKind::Handler(Arc::new(move |cx| Box::pin(handler(cx)))),
        }
    }
}

impl From<&str> for RouteTarget {
    fn from(token: &str) -> Self {
        Self::token(token)
    }
}

impl From<String> for RouteTarget {
    fn from(token: String) -> Self {
        Self::token(token)
    }
}

/// One entry of a declarative route table.
///
/// Verbs are validated when the table is added, so building a definition
/// never fails. With no explicit verb, [`RouteDef::to`] maps GET.
pub struct RouteDef {
    path: String,
    targets: Vec<(String, RouteTarget)>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    name: Option<String>,
}

impl RouteDef {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            targets: Vec::new(),
            interceptors: Vec::new(),
            name: None,
        }
    }

    /// Map the path to a target for GET.
    pub fn to(self, target: impl Into<RouteTarget>) -> Self {
        self.on("GET", target)
    }

    /// Map the path to a target for an explicit verb.
    pub fn on(mut self, method: &str, target: impl Into<RouteTarget>) -> Self {
        self.targets.push((method.to_string(), target.into()));
        self
    }

    /// Attach a per-route interceptor.
    pub fn with(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Name the route. Token routes reserve the name on first registration.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// The extension facade: wraps an axum `Router` under construction together
/// with the container, the naming conventions, the route-name reservations
/// and the not-found slot.
///
/// Routes are added with verb helpers, [`App::map`] or a declarative
/// [`RouteDef`] table; [`App::into_router`] finalizes the axum router with
/// the not-found fallback and the global interceptor layer installed.
pub struct App {
    container: Arc<Container>,
    config: ConfigService,
    conventions: Conventions,
    names: Arc<RouteNames>,
    global_interceptors: Vec<Arc<dyn Interceptor>>,
    not_found: NotFound,
    router: Router,
}

impl App {
    /// Create an app over a container, reading conventions from the process
    /// environment.
    pub fn new(container: Container) -> Self {
        Self::with_config(container, ConfigService::new())
    }

    /// Create an app with an explicit configuration.
    pub fn with_config(container: Container, config: ConfigService) -> Self {
        let conventions = Conventions::from_config(&config);
        Self {
            container: Arc::new(container),
            config,
            conventions,
            names: Arc::new(RouteNames::new()),
            global_interceptors: Vec::new(),
            not_found: NotFound::new(),
            router: Router::new(),
        }
    }

    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    pub fn config(&self) -> &ConfigService {
        &self.config
    }

    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    /// Map a path to a target for the given methods.
    pub fn map(
        self,
        methods: &[&str],
        path: &str,
        target: impl Into<RouteTarget>,
    ) -> Result<Self> {
        let verbs = methods
            .iter()
            .map(|method| HttpVerb::parse(method))
            .collect::<Result<Vec<_>>>()?;
        self.register(&verbs, path, target.into(), None, Vec::new())
    }

    /// Map a path for the given methods and reserve a route name for it.
    pub fn map_named(
        self,
        methods: &[&str],
        path: &str,
        target: impl Into<RouteTarget>,
        name: &str,
    ) -> Result<Self> {
        let verbs = methods
            .iter()
            .map(|method| HttpVerb::parse(method))
            .collect::<Result<Vec<_>>>()?;
        self.register(&verbs, path, target.into(), Some(name), Vec::new())
    }

    pub fn any(self, path: &str, target: impl Into<RouteTarget>) -> Result<Self> {
        self.register(&[HttpVerb::Any], path, target.into(), None, Vec::new())
    }

    pub fn get(self, path: &str, target: impl Into<RouteTarget>) -> Result<Self> {
        self.register(&[HttpVerb::Get], path, target.into(), None, Vec::new())
    }

    pub fn post(self, path: &str, target: impl Into<RouteTarget>) -> Result<Self> {
        self.register(&[HttpVerb::Post], path, target.into(), None, Vec::new())
    }

    pub fn put(self, path: &str, target: impl Into<RouteTarget>) -> Result<Self> {
        self.register(&[HttpVerb::Put], path, target.into(), None, Vec::new())
    }

    pub fn patch(self, path: &str, target: impl Into<RouteTarget>) -> Result<Self> {
        self.register(&[HttpVerb::Patch], path, target.into(), None, Vec::new())
    }

    pub fn delete(self, path: &str, target: impl Into<RouteTarget>) -> Result<Self> {
        self.register(&[HttpVerb::Delete], path, target.into(), None, Vec::new())
    }

    pub fn options(self, path: &str, target: impl Into<RouteTarget>) -> Result<Self> {
        self.register(&[HttpVerb::Options], path, target.into(), None, Vec::new())
    }

    pub fn head(self, path: &str, target: impl Into<RouteTarget>) -> Result<Self> {
        self.register(&[HttpVerb::Head], path, target.into(), None, Vec::new())
    }

    /// Add a declarative route table. Per-route interceptors apply to every
    /// verb of their entry; verbs outside the allowed set fail the whole
    /// call.
    pub fn add_routes(mut self, table: Vec<RouteDef>) -> Result<Self> {
        for def in table {
            let RouteDef {
                path,
                targets,
                interceptors,
                name,
            } = def;
            for (method, target) in targets {
                let verb = HttpVerb::parse(&method)?;
                self = self.register(
                    &[verb],
                    &path,
                    target,
                    name.as_deref(),
                    interceptors.clone(),
                )?;
            }
        }
        Ok(self)
    }

    /// Attach an interceptor around every route, including the fallback.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.global_interceptors.push(interceptor);
        self
    }

    /// Register the not-found handler; it is stored, not invoked. With
    /// `halt` set the handler output is wrapped in a 404 response.
    pub fn on_not_found<F, Fut>(self, handler: F, halt: bool) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionReply> + Send + 'static,
    {
        self.not_found.set(handler, halt);
        self
    }

    pub fn not_found(&self) -> &NotFound {
        &self.not_found
    }

    /// Build a URL for a named route.
    pub fn url_for(&self, name: &str, args: &[&str]) -> Result<String> {
        self.names.url_for(name, args)
    }

    pub fn route_names(&self) -> &Arc<RouteNames> {
        &self.names
    }

    /// Finalize into an axum `Router` with the not-found fallback and the
    /// global interceptor layer installed.
    pub fn into_router(self) -> Router {
        let not_found = self.not_found.clone();
        let router = self.router.fallback(move || {
            let not_found = not_found.clone();
            async move { not_found.invoke().await }
        });
        if self.global_interceptors.is_empty() {
            router
        } else {
            router.layer(InterceptorLayer::new(self.global_interceptors))
        }
    }

    pub(crate) fn register(
        mut self,
        verbs: &[HttpVerb],
        path: &str,
        target: RouteTarget,
        name: Option<&str>,
        interceptors: Vec<Arc<dyn Interceptor>>,
    ) -> Result<Self> {
        let resolver = ControllerResolver::new(self.container.clone(), self.conventions.clone());
        let interceptors = Arc::new(interceptors);
        let (method_router, token) = match target.kind {
            TargetKind::Token(token) => {
                if !RouteToken::is_token(&token) {
                    return Err(AxleError::MalformedToken { token });
                }
                let parsed = resolver.parse(&token)?;
                tracing::debug!(
                    token = %token,
                    controller = %parsed.controller_key,
                    method = %parsed.method_name,
                    path,
                    "mapping controller route"
                );
                (
                    resolver.method_router(verbs, &parsed, interceptors),
                    Some(token),
                )
            }
            TargetKind::Handler(dispatch) => {
                tracing::debug!(path, "mapping handler route");
                (
                    resolver.method_router_for(verbs, dispatch, interceptors),
                    None,
                )
            }
        };
        self.router = std::mem::take(&mut self.router).route(path, method_router);
        if let (Some(name), Some(token)) = (name, token.as_deref()) {
            self.names.reserve(token, name, path);
        }
        Ok(self)
    }
}
