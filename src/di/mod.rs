mod builder;
mod container;
mod injectable;

pub use builder::ContainerBuilder;
pub use container::Container;
pub use injectable::FromContainer;
