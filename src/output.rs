//! Structure for output (monitor) description.
use log::debug;

use crate::mode::Mode;

/// Video output device (monitor) with all of its video modes
///
/// Modes are kept in the order the platform reported them. The output can not be cloned:
/// it represents one physical device of one enumeration pass.
#[derive(Debug)]
pub struct Output {
    name: String,
    modes: Vec<Mode>,
    desktop_mode: Option<usize>,
}

impl Output {
    /// Returns output builder
    pub fn builder(name: impl Into<String>) -> OutputBuilder {
        OutputBuilder {
            name: name.into(),
            modes: Vec::new(),
            desktop_mode: None,
        }
    }

    /// Human-readable (kind of) name of the output
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Number of available video modes
    pub fn num_modes(&self) -> usize {
        self.modes.len()
    }

    /// Returns video mode at the index
    ///
    /// Panics if `index` is out of range, check it against [`Output::num_modes`] or use
    /// [`Output::get_mode`].
    pub fn mode(&self, index: usize) -> &Mode {
        match self.modes.get(index) {
            Some(mode) => mode,
            None => panic!(
                "Video mode index {} is out of range for output {:?} with {} modes",
                index,
                self.name,
                self.modes.len()
            ),
        }
    }

    /// Returns video mode at the index if it exists
    pub fn get_mode(&self, index: usize) -> Option<&Mode> {
        self.modes.get(index)
    }

    /// All video modes in enumeration order
    pub fn modes(&self) -> impl Iterator<Item = &Mode> {
        self.modes.iter()
    }

    /// Returns the video mode currently used by the desktop, if the platform reported one
    pub fn desktop_mode(&self) -> Option<&Mode> {
        self.desktop_mode.map(|index| &self.modes[index])
    }

    /// Index of the desktop video mode
    pub fn desktop_mode_index(&self) -> Option<usize> {
        self.desktop_mode
    }

    /// Looks for a mode equal to the requested one
    pub fn find_mode(&self, mode: &Mode) -> Option<&Mode> {
        self.modes.iter().find(|m| *m == mode)
    }

    /// Looks for the mode closest to the requested parameters
    ///
    /// Modes of the same resolution win, the one with nearest refresh rate is returned.
    /// Otherwise the mode with the nearest resolution is picked.
    pub fn closest_mode(&self, width: u32, height: u32, refresh_rate: f32) -> Option<&Mode> {
        let rate_distance = |mode: &Mode| (mode.refresh_rate() - refresh_rate).abs();
        let size_distance = |mode: &Mode| {
            u64::from(mode.width().abs_diff(width)) + u64::from(mode.height().abs_diff(height))
        };

        self.modes
            .iter()
            .filter(|mode| mode.matches_resolution(width, height))
            .min_by(|a, b| rate_distance(*a).total_cmp(&rate_distance(*b)))
            .or_else(|| {
                self.modes.iter().min_by(|a, b| {
                    size_distance(*a)
                        .cmp(&size_distance(*b))
                        .then_with(|| rate_distance(*a).total_cmp(&rate_distance(*b)))
                })
            })
    }
}

/// Builder of an [`Output`], used by platforms during enumeration
#[derive(Debug)]
pub struct OutputBuilder {
    name: String,
    modes: Vec<Mode>,
    desktop_mode: Option<usize>,
}

impl OutputBuilder {
    /// Adds video mode
    pub fn mode(mut self, mode: Mode) -> Self {
        self.push(mode);
        self
    }

    /// Adds several video modes
    pub fn modes(mut self, modes: impl IntoIterator<Item = Mode>) -> Self {
        for mode in modes {
            self.push(mode);
        }
        self
    }

    /// Sets the video mode currently used by the desktop
    ///
    /// An equal mode that was already added becomes the desktop mode, otherwise the mode is
    /// added to the end of the list.
    pub fn desktop_mode(mut self, mode: Mode) -> Self {
        let index = self.push(mode);
        self.desktop_mode = Some(index);
        self
    }

    /// Number of modes added so far
    pub fn num_modes(&self) -> usize {
        self.modes.len()
    }

    /// Constructs the output
    ///
    /// An output without modes is valid, e.g. a disconnected or virtual adapter.
    pub fn build(self) -> Output {
        Output {
            name: self.name,
            modes: self.modes,
            desktop_mode: self.desktop_mode,
        }
    }

    // The first of equal modes is kept
    fn push(&mut self, mode: Mode) -> usize {
        if let Some(index) = self.modes.iter().position(|m| *m == mode) {
            debug!("{}: skip duplicated video mode {}", self.name, mode);
            return index;
        }
        self.modes.push(mode);
        self.modes.len() - 1
    }
}
