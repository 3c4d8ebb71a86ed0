//! Platform abstraction populating the registry

use crate::error::Result;
use crate::registry::RegistryBuilder;

/// Platform able to enumerate video outputs and their modes
///
/// Implementations query the display server or graphics API and add one
/// [`crate::Output`] per device to the builder. The primary device must be added first.
/// The platform runs once, before the registry is handed to the renderer.
pub trait Platform {
    /// Enumerates outputs into the registry builder
    fn enumerate(&self, registry: &mut RegistryBuilder) -> Result<()>;
}
