//! Errors of outputs enumeration and mode lookup

/// Video modes error
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Mode with zero size or bad refresh rate
    #[error("Invalid video mode {width} x {height}, {refresh_rate} hz")]
    InvalidMode {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Requested refresh rate
        refresh_rate: f32,
    },

    /// Native refresh rate descriptor can not be turned into Hertz
    #[error("Invalid refresh rate {numerator}/{denominator}")]
    InvalidRefreshRate {
        /// Rate numerator
        numerator: u32,
        /// Rate denominator
        denominator: u32,
    },

    /// Mode belongs to an output other than the one it is registered in
    #[error("Mode of output {mode_output} registered in output {output}")]
    OutputIndexMismatch {
        /// Position of the output in the registry
        output: usize,
        /// Output index stored in the mode
        mode_output: usize,
    },

    /// Requested mode is not supported by the output
    #[error("Video mode {0} is not available")]
    ModeUnavailable(String),

    /// Registry contains no mode to fall back to
    #[error("No video modes available")]
    NoModes,

    /// Platform enumeration failed
    #[error("Platform error: {0}")]
    Platform(String),
}

/// Video modes result
pub type Result<T> = std::result::Result<T, Error>;
