use crate::controller::Controller;
use crate::di::FromContainer;
use crate::error::{AxleError, Result};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::any::{Any, TypeId};
use std::sync::Arc;

type ControllerFactory = Arc<dyn Fn(&Container) -> Result<Arc<dyn Controller>> + Send + Sync>;

#[derive(Clone)]
struct ControllerEntry {
    actions: &'static [&'static str],
    instance: Option<Arc<dyn Controller>>,
    factory: Option<ControllerFactory>,
}

/// Thread-safe dependency injection container.
///
/// Holds two kinds of registrations: typed services keyed by `TypeId`, and
/// named controllers keyed by the string produced from a route token. A
/// controller key may carry a ready instance, a factory, or both; resolution
/// is instance-first with the factory as construction fallback.
pub struct Container {
    services: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    controllers: DashMap<String, ControllerEntry>,
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Self {
            services: self.services.clone(),
            controllers: self.controllers.clone(),
        }
    }
}

impl Container {
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
            controllers: DashMap::new(),
        }
    }

    /// Register a typed service instance.
    pub fn register<T: 'static + Send + Sync>(&mut self, instance: T) -> &mut Self {
        self.services.insert(TypeId::of::<T>(), Arc::new(instance));
        self
    }

    /// Resolve a typed service.
    pub fn resolve<T: 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        let entry = self.services.get(&TypeId::of::<T>()).ok_or_else(|| {
            AxleError::DependencyNotFound {
                type_name: std::any::type_name::<T>().to_string(),
            }
        })?;
        entry
            .value()
            .clone()
            .downcast::<T>()
            .map_err(|_| AxleError::DowncastFailed {
                type_name: std::any::type_name::<T>().to_string(),
            })
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }

    /// Register a ready controller instance under a registry key.
    ///
    /// The instance is shared across requests. It takes precedence over a
    /// factory registered under the same key.
    pub fn register_controller<C: Controller>(
        &mut self,
        key: impl Into<String>,
        instance: C,
    ) -> &mut Self {
        let instance: Arc<dyn Controller> = Arc::new(instance);
        match self.controllers.entry(key.into()) {
            Entry::Occupied(mut entry) => {
                let entry = entry.get_mut();
                entry.instance = Some(instance);
                entry.actions = C::actions();
            }
            Entry::Vacant(slot) => {
                slot.insert(ControllerEntry {
                    actions: C::actions(),
                    instance: Some(instance),
                    factory: None,
                });
            }
        }
        self
    }

    /// Register a controller constructor under a registry key.
    ///
    /// The controller is built from the container on every resolution; this
    /// layer does not cache factory-built instances.
    pub fn register_controller_factory<C>(&mut self, key: impl Into<String>) -> &mut Self
    where
        C: Controller + FromContainer,
    {
        let factory: ControllerFactory = Arc::new(|container| {
            let controller = C::from_container(container)?;
            Ok(Arc::new(controller) as Arc<dyn Controller>)
        });
        match self.controllers.entry(key.into()) {
            Entry::Occupied(mut entry) => {
                let entry = entry.get_mut();
                entry.factory = Some(factory);
                entry.actions = C::actions();
            }
            Entry::Vacant(slot) => {
                slot.insert(ControllerEntry {
                    actions: C::actions(),
                    instance: None,
                    factory: Some(factory),
                });
            }
        }
        self
    }

    /// Resolve a controller by registry key, instance-first.
    pub fn resolve_controller(&self, key: &str) -> Result<Arc<dyn Controller>> {
        let entry = self
            .controllers
            .get(key)
            .ok_or_else(|| AxleError::UnknownController {
                key: key.to_string(),
            })?;
        if let Some(instance) = &entry.instance {
            tracing::debug!(controller = key, "resolved controller from container");
            return Ok(instance.clone());
        }
        if let Some(factory) = &entry.factory {
            let factory = factory.clone();
            // Release the shard before re-entering the container.
            drop(entry);
            tracing::debug!(controller = key, "constructing controller from factory");
            return factory(self);
        }
        Err(AxleError::UnknownController {
            key: key.to_string(),
        })
    }

    /// Actions advertised by the controller registered under `key`.
    pub fn controller_actions(&self, key: &str) -> Option<&'static [&'static str]> {
        self.controllers.get(key).map(|entry| entry.actions)
    }

    pub fn has_controller(&self, key: &str) -> bool {
        self.controllers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ActionContext, ActionReply};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TestService {
        value: i32,
    }

    struct Counter(AtomicUsize);

    struct CountingController {
        counter: Arc<Counter>,
    }

    #[async_trait]
    impl Controller for CountingController {
        fn actions() -> &'static [&'static str] {
            &["ping_action"]
        }

        async fn dispatch(&self, _action: &str, _cx: ActionContext) -> Result<ActionReply> {
            Ok(format!("pong:{}", self.counter.0.load(Ordering::SeqCst)).into())
        }
    }

    impl FromContainer for CountingController {
        fn from_container(container: &Container) -> Result<Self> {
            let counter = container.resolve::<Counter>()?;
            counter.0.fetch_add(1, Ordering::SeqCst);
            Ok(Self { counter })
        }
    }

    #[test]
    fn register_and_resolve_typed_service() {
        let mut container = Container::new();
        container.register(TestService { value: 42 });
        let service = container.resolve::<TestService>().unwrap();
        assert_eq!(service.value, 42);
    }

    #[test]
    fn resolving_a_missing_service_fails() {
        let container = Container::new();
        let err = container.resolve::<TestService>().err().unwrap();
        assert!(matches!(err, AxleError::DependencyNotFound { .. }));
    }

    #[test]
    fn factory_constructs_on_every_resolution() {
        let mut container = Container::new();
        container.register(Counter(AtomicUsize::new(0)));
        container.register_controller_factory::<CountingController>("CountingController");

        container.resolve_controller("CountingController").unwrap();
        container.resolve_controller("CountingController").unwrap();

        let counter = container.resolve::<Counter>().unwrap();
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn instance_takes_precedence_over_factory() {
        let mut container = Container::new();
        container.register(Counter(AtomicUsize::new(0)));
        container.register_controller_factory::<CountingController>("CountingController");
        let shared_counter = container.resolve::<Counter>().unwrap();
        container.register_controller(
            "CountingController",
            CountingController {
                counter: shared_counter.clone(),
            },
        );

        container.resolve_controller("CountingController").unwrap();
        assert_eq!(shared_counter.0.load(Ordering::SeqCst), 0);
    }

    struct WideController;

    #[async_trait]
    impl Controller for WideController {
        fn actions() -> &'static [&'static str] {
            &["read_action", "export_action"]
        }

        async fn dispatch(&self, _action: &str, _cx: ActionContext) -> Result<ActionReply> {
            Ok("wide".into())
        }
    }

    #[test]
    fn re_registration_refreshes_advertised_actions() {
        let mut container = Container::new();
        container.register(Counter(AtomicUsize::new(0)));
        container.register_controller_factory::<CountingController>("Store");
        container.register_controller("Store", WideController);
        assert_eq!(
            container.controller_actions("Store"),
            Some(&["read_action", "export_action"][..])
        );
    }

    #[test]
    fn factory_re_registration_refreshes_advertised_actions() {
        let mut container = Container::new();
        container.register(Counter(AtomicUsize::new(0)));
        container.register_controller("Store", WideController);
        container.register_controller_factory::<CountingController>("Store");
        assert_eq!(
            container.controller_actions("Store"),
            Some(&["ping_action"][..])
        );
    }

    #[test]
    fn unknown_controller_key_fails() {
        let container = Container::new();
        let err = container.resolve_controller("Ghost").err().unwrap();
        assert!(matches!(err, AxleError::UnknownController { .. }));
    }

    #[test]
    fn advertised_actions_are_visible_without_an_instance() {
        let mut container = Container::new();
        container.register(Counter(AtomicUsize::new(0)));
        container.register_controller_factory::<CountingController>("CountingController");
        assert_eq!(
            container.controller_actions("CountingController"),
            Some(&["ping_action"][..])
        );
    }
}
