//! Application services: plugin registry, permission gate, and the delayed
//! shutdown supervisor.  This layer composes the domain and infrastructure
//! pieces; it knows nothing about HTTP shapes.

pub mod permission;
pub mod plugin_registry;
pub mod shutdown;

pub use permission::{PermissionError, PermissionGate};
pub use plugin_registry::{PluginRegistry, RegistryError};
pub use shutdown::ShutdownSupervisor;
