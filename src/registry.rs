//! Registry of video outputs available to the renderer
use log::{debug, info};

use crate::error::{Error, Result};
use crate::mode::Mode;
use crate::output::Output;
use crate::platform::Platform;

/// Information about available outputs (monitors) and their video modes
///
/// Registry is populated once by a [`Platform`] and stays read-only afterwards, so it can be
/// shared between threads without locking. Output 0 is the primary one, order of others is
/// defined by the platform.
#[derive(Debug)]
pub struct Registry {
    outputs: Vec<Output>,
}

impl Registry {
    /// Populates the registry using the platform
    pub fn populate<P: Platform + ?Sized>(platform: &P) -> Result<Self> {
        let mut builder = Self::builder();
        platform.enumerate(&mut builder)?;
        builder.build()
    }

    /// Returns registry builder
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            outputs: Vec::new(),
        }
    }

    /// Number of available outputs
    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Returns output at the index
    ///
    /// Panics if `index` is out of range, check it against [`Registry::num_outputs`] or use
    /// [`Registry::get_output`].
    pub fn output(&self, index: usize) -> &Output {
        match self.outputs.get(index) {
            Some(output) => output,
            None => panic!(
                "Output index {} is out of range for {} outputs",
                index,
                self.outputs.len()
            ),
        }
    }

    /// Returns output at the index if it exists
    pub fn get_output(&self, index: usize) -> Option<&Output> {
        self.outputs.get(index)
    }

    /// All outputs in enumeration order
    pub fn outputs(&self) -> impl Iterator<Item = &Output> {
        self.outputs.iter()
    }

    /// Primary output
    pub fn primary(&self) -> Option<&Output> {
        self.outputs.first()
    }

    /// Desktop video mode of the output
    pub fn desktop_mode(&self, output_index: usize) -> Option<&Mode> {
        self.get_output(output_index)
            .and_then(|output| output.desktop_mode())
    }

    /// Looks for a mode equal to the requested one on its output
    pub fn find_mode(&self, mode: &Mode) -> Option<&Mode> {
        self.get_output(mode.output_index())
            .and_then(|output| output.find_mode(mode))
    }
}

/// Builder of a [`Registry`], filled by a [`Platform`]
#[derive(Debug)]
pub struct RegistryBuilder {
    outputs: Vec<Output>,
}

impl RegistryBuilder {
    /// Adds output, the first one is the primary
    pub fn output(&mut self, output: Output) -> &mut Self {
        self.outputs.push(output);
        self
    }

    /// Index the next added output will get
    pub fn next_output_index(&self) -> usize {
        self.outputs.len()
    }

    /// Validates outputs and constructs the registry
    pub fn build(self) -> Result<Registry> {
        for (index, output) in self.outputs.iter().enumerate() {
            if let Some(mode) = output.modes().find(|mode| mode.output_index() != index) {
                return Err(Error::OutputIndexMismatch {
                    output: index,
                    mode_output: mode.output_index(),
                });
            }
        }

        info!("Found {} video outputs", self.outputs.len());
        for (index, output) in self.outputs.iter().enumerate() {
            match output.desktop_mode() {
                Some(mode) => info!("Output {}: {} ({})", index, output.name(), mode),
                None => info!("Output {}: {} (no desktop mode)", index, output.name()),
            }
            for mode in output.modes() {
                debug!("Output {}: {}", index, mode);
            }
        }

        Ok(Registry {
            outputs: self.outputs,
        })
    }
}
