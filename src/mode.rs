//! Structure for video mode description.
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Refresh rate used when none was requested
pub const DEFAULT_REFRESH_RATE: f32 = 60.0;

/// Native video mode descriptor of a platform
///
/// Platforms that report refresh rates in their own units attach the native descriptor
/// to a [`Mode`], and the mode derives its refresh rate from it.
pub trait NativeMode: Any + Send + Sync + fmt::Debug {
    /// Returns the refresh rate in Hertz
    fn refresh_rate(&self) -> f32;

    /// Returns the descriptor as [`Any`] for downcasting by the platform
    fn as_any(&self) -> &dyn Any;
}

/// Refresh rate reported as a fraction, e.g. `60000 / 1001`
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct RationalRate {
    numerator: u32,
    denominator: u32,
}

impl RationalRate {
    /// Constructs the rate, both parts must be non-zero
    pub fn new(numerator: u32, denominator: u32) -> Result<Self> {
        if numerator == 0 || denominator == 0 {
            return Err(Error::InvalidRefreshRate {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Rate numerator
    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    /// Rate denominator
    pub fn denominator(&self) -> u32 {
        self.denominator
    }
}

impl NativeMode for RationalRate {
    fn refresh_rate(&self) -> f32 {
        (f64::from(self.numerator) / f64::from(self.denominator)) as f32
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Refresh rate reported in millihertz
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct MillihertzRate(u32);

impl MillihertzRate {
    /// Constructs the rate, zero is not a valid rate
    pub fn new(millihertz: u32) -> Result<Self> {
        if millihertz == 0 {
            return Err(Error::InvalidRefreshRate {
                numerator: millihertz,
                denominator: 1000,
            });
        }
        Ok(Self(millihertz))
    }

    /// Rate in millihertz
    pub fn millihertz(&self) -> u32 {
        self.0
    }
}

impl NativeMode for MillihertzRate {
    fn refresh_rate(&self) -> f32 {
        self.0 as f32 / 1000.0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Information about a video mode.
///
/// Equality compares width, height, refresh rate and output index. Whether the mode was
/// created by the application or reported by the platform does not matter.
#[derive(Debug, Clone)]
pub struct Mode {
    width: u32,
    height: u32,
    refresh_rate: f32,
    output_index: usize,
    custom: bool,
    native: Option<Arc<dyn NativeMode>>,
}

impl Mode {
    /// Constructs custom video mode
    ///
    /// Panics if the size is zero or the refresh rate is not a positive number, use
    /// [`Mode::try_new`] for values coming from user input.
    pub fn new(width: u32, height: u32, refresh_rate: f32, output_index: usize) -> Self {
        match Self::try_new(width, height, refresh_rate, output_index) {
            Ok(mode) => mode,
            Err(err) => panic!("{}", err),
        }
    }

    /// Constructs custom video mode with default refresh rate on the primary output
    pub fn with_resolution(width: u32, height: u32) -> Self {
        Self::new(width, height, DEFAULT_REFRESH_RATE, 0)
    }

    /// Constructs custom video mode or returns an error for invalid values
    pub fn try_new(
        width: u32,
        height: u32,
        refresh_rate: f32,
        output_index: usize,
    ) -> Result<Self> {
        validate(width, height, refresh_rate)?;
        Ok(Self {
            width,
            height,
            refresh_rate,
            output_index,
            custom: true,
            native: None,
        })
    }

    /// Constructs video mode reported by the platform
    pub fn platform(
        width: u32,
        height: u32,
        refresh_rate: f32,
        output_index: usize,
    ) -> Result<Self> {
        let mut mode = Self::try_new(width, height, refresh_rate, output_index)?;
        mode.custom = false;
        Ok(mode)
    }

    /// Attaches native descriptor, refresh rate will be derived from it
    ///
    /// Fails if the descriptor reports a refresh rate that is not a positive number.
    pub fn with_native(mut self, native: impl NativeMode) -> Result<Self> {
        let refresh_rate = native.refresh_rate();
        validate(self.width, self.height, refresh_rate)?;
        self.refresh_rate = refresh_rate;
        self.native = Some(Arc::new(native));
        Ok(self)
    }

    /// Width of the frame buffer in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the frame buffer in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resolution in pixels
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Refresh rate in Hertz
    pub fn refresh_rate(&self) -> f32 {
        self.native
            .as_ref()
            .map(|native| native.refresh_rate())
            .unwrap_or(self.refresh_rate)
    }

    /// Index of the output. 0 is always the primary output, order of others is undefined.
    pub fn output_index(&self) -> usize {
        self.output_index
    }

    /// Checks if the mode was created by the application and not reported by the platform
    pub fn is_custom(&self) -> bool {
        self.custom
    }

    /// Native descriptor of the platform
    pub fn native(&self) -> Option<&dyn NativeMode> {
        self.native.as_deref()
    }

    /// Native descriptor of a concrete type
    pub fn native_as<T: NativeMode>(&self) -> Option<&T> {
        self.native()
            .and_then(|native| native.as_any().downcast_ref::<T>())
    }

    /// Checks if the mode has the resolution
    pub fn matches_resolution(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }
}

fn validate(width: u32, height: u32, refresh_rate: f32) -> Result<()> {
    if width == 0 || height == 0 || !refresh_rate.is_finite() || refresh_rate <= 0.0 {
        return Err(Error::InvalidMode {
            width,
            height,
            refresh_rate,
        });
    }
    Ok(())
}

impl Default for Mode {
    fn default() -> Self {
        Self::new(1280, 720, DEFAULT_REFRESH_RATE, 0)
    }
}

impl PartialEq for Mode {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.output_index == other.output_index
            && self.refresh_rate() == other.refresh_rate()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {}, {} hz",
            self.width,
            self.height,
            self.refresh_rate()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_mode() {
        let mode = Mode::default();
        assert_eq!(mode, Mode::new(1280, 720, 60.0, 0));
        assert_eq!(mode.width(), 1280);
        assert_eq!(mode.height(), 720);
        assert_eq!(mode.refresh_rate(), 60.0);
        assert_eq!(mode.output_index(), 0);
        assert!(mode.is_custom());
        assert!(mode.native().is_none());
    }

    #[test]
    fn custom_flag_is_ignored_by_equality() {
        let custom = Mode::new(1920, 1080, 144.0, 1);
        let platform = Mode::platform(1920, 1080, 144.0, 1).unwrap();
        assert!(custom.is_custom());
        assert!(!platform.is_custom());
        assert_eq!(custom, platform);
        assert_eq!(platform, custom);
    }

    #[test]
    fn single_field_difference_breaks_equality() {
        let mode = Mode::new(1920, 1080, 60.0, 0);
        assert_ne!(mode, Mode::new(1280, 1080, 60.0, 0));
        assert_ne!(mode, Mode::new(1920, 720, 60.0, 0));
        assert_ne!(mode, Mode::new(1920, 1080, 59.94, 0));
        assert_ne!(mode, Mode::new(1920, 1080, 60.0, 1));
    }

    #[test]
    fn equality_is_an_equivalence() {
        let modes = [
            Mode::default(),
            Mode::with_resolution(1280, 720),
            Mode::platform(1280, 720, 60.0, 0).unwrap(),
            Mode::platform(1280, 720, 60.0, 0)
                .unwrap()
                .with_native(RationalRate::new(60, 1).unwrap())
                .unwrap(),
            Mode::new(1920, 1080, 60.0, 0),
            Mode::new(2560, 1440, 165.0, 1),
        ];

        for a in modes.iter() {
            assert_eq!(a, a);
            for b in modes.iter() {
                assert_eq!(a == b, b == a);
                for c in modes.iter() {
                    if a == b && b == c {
                        assert_eq!(a, c);
                    }
                }
            }
        }
    }

    #[test]
    fn refresh_rate_is_derived_from_native_descriptor() {
        let mode = Mode::platform(1920, 1080, 60.0, 0)
            .unwrap()
            .with_native(RationalRate::new(60000, 1001).unwrap())
            .unwrap();
        assert_relative_eq!(mode.refresh_rate(), 59.94006, epsilon = 1e-4);
        assert_ne!(mode, Mode::new(1920, 1080, 60.0, 0));

        let rational = mode.native_as::<RationalRate>().unwrap();
        assert_eq!(rational.numerator(), 60000);
        assert_eq!(rational.denominator(), 1001);
        assert!(mode.native_as::<MillihertzRate>().is_none());

        let mode = Mode::platform(2560, 1440, 1.0, 0)
            .unwrap()
            .with_native(MillihertzRate::new(143_912).unwrap())
            .unwrap();
        assert_relative_eq!(mode.refresh_rate(), 143.912, epsilon = 1e-3);
    }

    #[test]
    fn invalid_native_rates_are_rejected() {
        assert!(RationalRate::new(60, 0).is_err());
        assert!(RationalRate::new(0, 1).is_err());
        assert!(MillihertzRate::new(0).is_err());
    }

    #[derive(Debug)]
    struct FixedRate(f32);

    impl NativeMode for FixedRate {
        fn refresh_rate(&self) -> f32 {
            self.0
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn native_descriptor_with_bad_rate_is_rejected() {
        let mode = Mode::platform(1920, 1080, 60.0, 0).unwrap();
        for rate in [f32::NAN, -5.0, 0.0, f32::INFINITY] {
            assert!(matches!(
                mode.clone().with_native(FixedRate(rate)),
                Err(Error::InvalidMode { .. })
            ));
        }

        let mode = mode.with_native(FixedRate(75.0)).unwrap();
        assert_eq!(mode, mode.clone());
        assert_eq!(mode.refresh_rate(), 75.0);
    }

    #[test]
    fn invalid_modes_are_rejected() {
        assert!(Mode::try_new(0, 720, 60.0, 0).is_err());
        assert!(Mode::try_new(1280, 0, 60.0, 0).is_err());
        assert!(Mode::try_new(1280, 720, 0.0, 0).is_err());
        assert!(Mode::try_new(1280, 720, f32::NAN, 0).is_err());
        assert!(Mode::platform(1280, 720, f32::INFINITY, 0).is_err());
    }

    #[test]
    #[should_panic(expected = "Invalid video mode")]
    fn zero_sized_mode_panics() {
        Mode::new(0, 0, 60.0, 0);
    }

    #[test]
    fn display() {
        assert_eq!(
            Mode::new(1920, 1080, 144.0, 0).to_string(),
            "1920 x 1080, 144 hz"
        );
    }
}
