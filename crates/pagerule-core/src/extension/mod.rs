//! Extension system.
//!
//! - [`system`]: the [`Extension`] trait and the context a factory receives
//! - [`registry`]: name → factory lookup, global or private
//! - [`sandbox`]: the namespaced SDK each extension is handed

pub mod registry;
pub mod sandbox;
pub mod system;

pub use registry::{ExtensionFactory, ExtensionRegistry};
pub use sandbox::{NamespacedSdk, EXTENSION_NAMESPACE};
pub use system::{ApplyContext, DynExtension, Extension, ExtensionContext};
