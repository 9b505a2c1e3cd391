use crate::controller::Controller;
use crate::di::{Container, FromContainer};

/// Builder for constructing a dependency injection container
///
/// Use this to register services and controllers before building the final
/// container handed to the routing layer.
///
/// # Example
/// ```ignore
/// let container = ContainerBuilder::new()
///     .register(BookStore::new())
///     .controller_factory::<BookController>("BookController")
///     .build();
/// ```
pub struct ContainerBuilder {
    container: Container,
}

impl ContainerBuilder {
    /// Create a new container builder
    pub fn new() -> Self {
        Self {
            container: Container::new(),
        }
    }

    /// Register a typed service instance
    pub fn register<T: 'static + Send + Sync>(mut self, instance: T) -> Self {
        self.container.register(instance);
        self
    }

    /// Register a ready controller instance under a registry key
    pub fn controller<C: Controller>(mut self, key: impl Into<String>, instance: C) -> Self {
        self.container.register_controller(key, instance);
        self
    }

    /// Register a controller constructor under a registry key
    pub fn controller_factory<C>(mut self, key: impl Into<String>) -> Self
    where
        C: Controller + FromContainer,
    {
        self.container.register_controller_factory::<C>(key);
        self
    }

    /// Build the container
    pub fn build(self) -> Container {
        self.container
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
