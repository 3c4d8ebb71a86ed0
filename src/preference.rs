//! Video mode preference stored by application settings
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mode::{Mode, DEFAULT_REFRESH_RATE};
use crate::registry::Registry;

/// Preferred video mode
///
/// Available modes may change between runs, so the preference has to be resolved against
/// a freshly populated [`Registry`] on every start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preference {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Refresh rate in Hertz
    pub refresh_rate: f32,
    /// Index of the output
    pub output_index: usize,
}

impl Default for Preference {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            refresh_rate: DEFAULT_REFRESH_RATE,
            output_index: 0,
        }
    }
}

impl Preference {
    /// Converts the preference into a custom mode
    pub fn to_mode(&self) -> Result<Mode> {
        Mode::try_new(self.width, self.height, self.refresh_rate, self.output_index)
    }

    /// Returns the registered mode equal to the preference
    pub fn resolve<'a>(&self, registry: &'a Registry) -> Result<&'a Mode> {
        let mode = self.to_mode()?;
        registry
            .find_mode(&mode)
            .ok_or_else(|| Error::ModeUnavailable(mode.to_string()))
    }

    /// Returns the registered mode equal to the preference or the best replacement
    ///
    /// The replacement is the closest mode of the preferred output. If the output is gone,
    /// the desktop mode of the primary output is used.
    pub fn resolve_or_fallback<'a>(&self, registry: &'a Registry) -> Result<&'a Mode> {
        let err = match self.resolve(registry) {
            Ok(mode) => return Ok(mode),
            Err(err) => err,
        };

        let fallback = registry
            .get_output(self.output_index)
            .and_then(|output| output.closest_mode(self.width, self.height, self.refresh_rate))
            .or_else(|| {
                registry
                    .primary()
                    .and_then(|output| output.desktop_mode().or_else(|| output.get_mode(0)))
            })
            .ok_or(Error::NoModes)?;

        warn!("{}, falling back to {}", err, fallback);
        Ok(fallback)
    }
}

impl From<&Mode> for Preference {
    fn from(mode: &Mode) -> Self {
        Self {
            width: mode.width(),
            height: mode.height(),
            refresh_rate: mode.refresh_rate(),
            output_index: mode.output_index(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Output;

    fn registry() -> Registry {
        let mut builder = Registry::builder();
        builder
            .output(
                Output::builder("eDP-1")
                    .mode(Mode::platform(1920, 1080, 60.0, 0).unwrap())
                    .desktop_mode(Mode::platform(2560, 1600, 120.0, 0).unwrap())
                    .build(),
            )
            .output(
                Output::builder("HDMI-1")
                    .mode(Mode::platform(1280, 720, 60.0, 1).unwrap())
                    .mode(Mode::platform(1920, 1080, 75.0, 1).unwrap())
                    .build(),
            );
        builder.build().unwrap()
    }

    #[test]
    fn default_preference_is_default_mode() {
        assert_eq!(Preference::default().to_mode().unwrap(), Mode::default());
    }

    #[test]
    fn preference_from_mode() {
        let mode = Mode::new(1920, 1080, 75.0, 1);
        let preference = Preference::from(&mode);
        assert_eq!(preference.to_mode().unwrap(), mode);
    }

    #[test]
    fn deserialize_partial_settings() {
        let preference: Preference =
            serde_json::from_str(r#"{ "width": 1920, "height": 1080, "output_index": 1 }"#)
                .unwrap();
        assert_eq!(preference.width, 1920);
        assert_eq!(preference.height, 1080);
        assert_eq!(preference.refresh_rate, 60.0);
        assert_eq!(preference.output_index, 1);

        let json = serde_json::to_string(&preference).unwrap();
        let restored: Preference = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, preference);
    }

    #[test]
    fn resolve_available_mode() {
        let registry = registry();
        let preference = Preference {
            width: 1920,
            height: 1080,
            refresh_rate: 75.0,
            output_index: 1,
        };
        let mode = preference.resolve(&registry).unwrap();
        assert!(!mode.is_custom());
        assert_eq!(mode.output_index(), 1);
    }

    #[test]
    fn resolve_unavailable_mode() {
        let registry = registry();
        let preference = Preference {
            width: 1920,
            height: 1080,
            refresh_rate: 144.0,
            output_index: 1,
        };
        assert!(matches!(
            preference.resolve(&registry),
            Err(Error::ModeUnavailable(_))
        ));

        let invalid = Preference {
            width: 0,
            ..Preference::default()
        };
        assert!(matches!(
            invalid.resolve(&registry),
            Err(Error::InvalidMode { .. })
        ));
    }

    #[test]
    fn fallback_to_closest_mode_of_the_output() {
        let registry = registry();
        let preference = Preference {
            width: 1920,
            height: 1080,
            refresh_rate: 144.0,
            output_index: 1,
        };
        let mode = preference.resolve_or_fallback(&registry).unwrap();
        assert_eq!(*mode, Mode::new(1920, 1080, 75.0, 1));
    }

    #[test]
    fn fallback_to_primary_desktop_mode() {
        let registry = registry();
        let preference = Preference {
            output_index: 3,
            ..Preference::default()
        };
        let mode = preference.resolve_or_fallback(&registry).unwrap();
        assert_eq!(*mode, Mode::new(2560, 1600, 120.0, 0));
    }

    #[test]
    fn fallback_without_outputs() {
        let registry = Registry::builder().build().unwrap();
        assert_eq!(
            Preference::default().resolve_or_fallback(&registry),
            Err(Error::NoModes)
        );
    }

    #[test]
    fn fallback_to_primary_without_modes() {
        let mut builder = Registry::builder();
        builder.output(Output::builder("Virtual-1").build()).output(
            Output::builder("HDMI-1")
                .mode(Mode::platform(1280, 720, 60.0, 1).unwrap())
                .build(),
        );
        let registry = builder.build().unwrap();

        let preference = Preference {
            output_index: 1,
            ..Preference::default()
        };
        assert_eq!(
            *preference.resolve(&registry).unwrap(),
            Mode::new(1280, 720, 60.0, 1)
        );
        assert_eq!(
            Preference::default().resolve_or_fallback(&registry),
            Err(Error::NoModes)
        );
    }
}
