use crate::di::Container;
use crate::error::Result;

/// Trait for application modules
///
/// A module groups the controller and service registrations of one
/// application area so bootstrap code can register them in a single call.
///
/// # Example
/// ```ignore
/// struct LibraryModule;
///
/// impl Module for LibraryModule {
///     fn register(container: &mut Container) -> Result<()> {
///         container.register(BookStore::new());
///         container.register_controller_factory::<BookController>("Book");
///         Ok(())
///     }
/// }
/// ```
pub trait Module {
    /// Register all providers and controllers in this module
    fn register(container: &mut Container) -> Result<()>;
}
