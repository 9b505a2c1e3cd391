use crate::controller::CRUD_ACTION_NAMES;
use crate::error::{AxleError, Result};
use crate::interceptor::Interceptor;
use crate::routing::app::{App, HttpVerb, RouteTarget};
use crate::routing::token::RouteToken;
use std::sync::Arc;

/// Verb, path suffix and name suffix for each of the six resource routes,
/// in registration order.
const RESOURCE_ROUTES: &[(HttpVerb, &str, Option<&str>, &str)] = &[
    (HttpVerb::Get, "read", None, "read"),
    (HttpVerb::Get, "get_one", Some("{id}"), "get-one"),
    (HttpVerb::Post, "create", Some("create"), "create"),
    (HttpVerb::Post, "update_one", Some("{id}"), "update-one"),
    (HttpVerb::Post, "update_multiple", None, "update-multiple"),
    (HttpVerb::Delete, "delete", Some("{id}"), "delete"),
];

impl App {
    /// Register the six conventional CRUD routes for a controller alias.
    ///
    /// The controller resolved from `alias` must be registered and advertise
    /// the full CRUD action set; both are checked before any route is added.
    /// Each route is named `{name_prefix}.{action}` and the per-route
    /// interceptors apply to all six.
    pub fn resource(
        mut self,
        base: &str,
        interceptors: Vec<Arc<dyn Interceptor>>,
        alias: &str,
        name_prefix: &str,
    ) -> Result<Self> {
        let trimmed = base.trim_end_matches('/');
        let base = if trimmed.is_empty() { "/" } else { trimmed };

        let probe = RouteToken::parse(&format!("{alias}:read"), self.conventions())?;
        let advertised = self
            .container()
            .controller_actions(&probe.controller_key)
            .ok_or_else(|| AxleError::UnknownController {
                key: probe.controller_key.clone(),
            })?;
        let mut missing = Vec::new();
        for action in CRUD_ACTION_NAMES {
            let token = RouteToken::parse(&format!("{alias}:{action}"), self.conventions())?;
            if !advertised.contains(&token.method_name.as_str()) {
                missing.push(*action);
            }
        }
        if !missing.is_empty() {
            return Err(AxleError::MissingCapability {
                key: probe.controller_key,
                missing: missing.join(", "),
            });
        }

        for (verb, action, suffix, name_suffix) in RESOURCE_ROUTES {
            let path = match suffix {
                Some(suffix) if base == "/" => format!("/{suffix}"),
                Some(suffix) => format!("{base}/{suffix}"),
                None => base.to_string(),
            };
            let token = format!("{alias}:{action}");
            let name = format!("{name_prefix}.{name_suffix}");
            self = self.register(
                &[*verb],
                &path,
                RouteTarget::token(token),
                Some(&name),
                interceptors.clone(),
            )?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigService;
    use crate::controller::{ActionContext, ActionReply, Controller, CrudApi};
    use crate::di::Container;
    use async_trait::async_trait;

    struct Shelf;

    #[async_trait]
    impl CrudApi for Shelf {
        async fn read_action(&self, _cx: &ActionContext) -> crate::Result<ActionReply> {
            Ok("shelf".into())
        }

        async fn get_one_action(
            &self,
            id: &str,
            _cx: &ActionContext,
        ) -> crate::Result<ActionReply> {
            Ok(format!("shelf:{id}").into())
        }

        async fn create_action(&self, _cx: &ActionContext) -> crate::Result<ActionReply> {
            Ok("created".into())
        }

        async fn update_one_action(
            &self,
            id: &str,
            _cx: &ActionContext,
        ) -> crate::Result<ActionReply> {
            Ok(format!("updated:{id}").into())
        }

        async fn update_multiple_action(
            &self,
            _cx: &ActionContext,
        ) -> crate::Result<ActionReply> {
            Ok("updated-all".into())
        }

        async fn delete_action(
            &self,
            id: &str,
            _cx: &ActionContext,
        ) -> crate::Result<ActionReply> {
            Ok(format!("deleted:{id}").into())
        }
    }

    struct ReadOnly;

    #[async_trait]
    impl Controller for ReadOnly {
        fn actions() -> &'static [&'static str] {
            &["read_action"]
        }

        async fn dispatch(
            &self,
            _action: &str,
            _cx: ActionContext,
        ) -> crate::Result<ActionReply> {
            Ok("read".into())
        }
    }

    #[test]
    fn resource_names_all_six_routes() {
        let mut container = Container::new();
        container.register_controller("Shelf", Shelf);
        let app = App::with_config(container, ConfigService::default())
            .resource("/shelves/", Vec::new(), "Shelf", "shelves")
            .unwrap();

        assert_eq!(app.url_for("shelves.read", &[]).unwrap(), "/shelves");
        assert_eq!(
            app.url_for("shelves.get-one", &["7"]).unwrap(),
            "/shelves/7"
        );
        assert_eq!(app.url_for("shelves.create", &[]).unwrap(), "/shelves/create");
        assert_eq!(
            app.url_for("shelves.update-one", &["7"]).unwrap(),
            "/shelves/7"
        );
        assert_eq!(
            app.url_for("shelves.update-multiple", &[]).unwrap(),
            "/shelves"
        );
        assert_eq!(app.url_for("shelves.delete", &["7"]).unwrap(), "/shelves/7");
    }

    #[test]
    fn unregistered_controller_fails_before_any_route_is_added() {
        let app = App::with_config(Container::new(), ConfigService::default());
        let err = app
            .resource("/shelves", Vec::new(), "Shelf", "shelves")
            .err()
            .unwrap();
        assert!(matches!(err, AxleError::UnknownController { .. }));
    }

    #[test]
    fn non_crud_controller_fails_the_capability_check() {
        let mut container = Container::new();
        container.register_controller("ReadOnly", ReadOnly);
        let app = App::with_config(container, ConfigService::default());
        let err = app
            .resource("/readonly", Vec::new(), "ReadOnly", "readonly")
            .err()
            .unwrap();
        match err {
            AxleError::MissingCapability { key, missing } => {
                assert_eq!(key, "ReadOnly");
                assert!(missing.contains("get_one"));
                assert!(!missing.split(", ").any(|action| action == "read"));
            }
            other => panic!("expected MissingCapability, got {other:?}"),
        }
    }
}
