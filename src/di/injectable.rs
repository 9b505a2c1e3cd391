use crate::di::Container;
use crate::error::Result;

/// Construct a controller by resolving its dependencies from the container.
///
/// This is the construction fallback used when a route resolves a controller
/// key that only has a factory registration: the factory calls
/// `from_container` on every request.
///
/// # Example
/// ```
/// use axle::di::{Container, FromContainer};
/// use std::sync::Arc;
///
/// struct Clock;
///
/// struct StatusController {
///     clock: Arc<Clock>,
/// }
///
/// impl FromContainer for StatusController {
///     fn from_container(container: &Container) -> axle::Result<Self> {
///         Ok(Self {
///             clock: container.resolve::<Clock>()?,
///         })
///     }
/// }
/// ```
pub trait FromContainer: Sized + Send + Sync + 'static {
    /// Create an instance by resolving dependencies from the container.
    ///
    /// # Errors
    /// Returns an error if any required dependency is not registered.
    fn from_container(container: &Container) -> Result<Self>;
}
