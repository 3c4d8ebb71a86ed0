//! Video outputs and their modes for the renderer.
//!
//! A [`Platform`] populates the [`Registry`] once on start. After that the registry is
//! read-only: the window creation code picks an [`Output`] and one of its [`Mode`]s, or the
//! mode currently used by the desktop.

#![warn(missing_docs)]

mod error;
mod mode;
mod output;
mod platform;
mod preference;
mod registry;

pub use error::{Error, Result};
pub use mode::{MillihertzRate, Mode, NativeMode, RationalRate, DEFAULT_REFRESH_RATE};
pub use output::{Output, OutputBuilder};
pub use platform::Platform;
pub use preference::Preference;
pub use registry::{Registry, RegistryBuilder};
