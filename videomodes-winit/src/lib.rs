//! Video outputs enumeration through [`winit`]

use std::any::Any;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use videomodes::{Error, Mode, NativeMode, Output, Platform, RegistryBuilder, Result};
use winit::event_loop::EventLoopWindowTarget;
use winit::monitor::MonitorHandle;

/// Enumeration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Add the current desktop mode to the output if the monitor does not list it
    pub synthesize_desktop_mode: bool,
    /// Skip video modes with fewer bits per pixel
    pub min_bit_depth: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            synthesize_desktop_mode: true,
            min_bit_depth: 0,
        }
    }
}

/// Native video mode of `winit`
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct WinitMode {
    /// Refresh rate in millihertz
    pub refresh_rate_millihertz: u32,
    /// Bits per pixel
    pub bit_depth: u16,
}

impl NativeMode for WinitMode {
    fn refresh_rate(&self) -> f32 {
        self.refresh_rate_millihertz as f32 / 1000.0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Monitor state copied from `winit`
#[derive(Debug, Clone, Default)]
pub struct MonitorInfo {
    /// Human-readable name
    pub name: Option<String>,
    /// Current resolution
    pub size: (u32, u32),
    /// Current refresh rate in millihertz
    pub refresh_rate_millihertz: Option<u32>,
    /// Supported video modes
    pub video_modes: Vec<(u32, u32, WinitMode)>,
}

impl From<&MonitorHandle> for MonitorInfo {
    fn from(monitor: &MonitorHandle) -> Self {
        let size = monitor.size();
        Self {
            name: monitor.name(),
            size: (size.width, size.height),
            refresh_rate_millihertz: monitor.refresh_rate_millihertz(),
            video_modes: monitor
                .video_modes()
                .map(|v| {
                    let size = v.size();
                    (
                        size.width,
                        size.height,
                        WinitMode {
                            refresh_rate_millihertz: v.refresh_rate_millihertz(),
                            bit_depth: v.bit_depth(),
                        },
                    )
                })
                .collect(),
        }
    }
}

/// Platform enumerating monitors of a `winit` event loop
pub struct WinitPlatform<'a, T: 'static> {
    target: &'a EventLoopWindowTarget<T>,
    settings: Settings,
}

impl<'a, T: 'static> WinitPlatform<'a, T> {
    /// Constructs the platform for the event loop
    pub fn new(target: &'a EventLoopWindowTarget<T>) -> Self {
        Self {
            target,
            settings: Settings::default(),
        }
    }

    /// Sets enumeration settings
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    fn monitors(&self) -> Vec<MonitorHandle> {
        let mut monitors = self.target.available_monitors().collect::<Vec<_>>();
        if let Some(primary) = self.target.primary_monitor() {
            if let Some(position) = monitors.iter().position(|m| *m == primary) {
                let primary = monitors.remove(position);
                monitors.insert(0, primary);
            }
        }
        monitors
    }
}

impl<T: 'static> Platform for WinitPlatform<'_, T> {
    fn enumerate(&self, registry: &mut RegistryBuilder) -> Result<()> {
        for monitor in self.monitors() {
            let info = MonitorInfo::from(&monitor);
            let output = describe(registry.next_output_index(), &info, &self.settings);
            registry.output(output);
        }
        Ok(())
    }
}

/// Converts monitor state into an [`Output`] with the given index
///
/// Of the modes that differ only by bit depth the deepest one is kept. A monitor without
/// usable modes still becomes an output, so indices of the following ones do not shift.
pub fn describe(index: usize, info: &MonitorInfo, settings: &Settings) -> Output {
    let name = info
        .name
        .clone()
        .unwrap_or_else(|| format!("Monitor {}", index));

    let mut modes = Vec::with_capacity(info.video_modes.len());
    for (width, height, native) in info.video_modes.iter() {
        if native.bit_depth < settings.min_bit_depth {
            continue;
        }
        let mode = match platform_mode(*width, *height, *native, index) {
            Ok(mode) => mode,
            Err(err) => {
                debug!("{}: skip video mode ({})", name, err);
                continue;
            }
        };
        match modes.iter().position(|m| *m == mode) {
            Some(i) if bit_depth(&modes[i]) < native.bit_depth => modes[i] = mode,
            Some(_) => debug!("{}: skip duplicated video mode {}", name, mode),
            None => modes.push(mode),
        }
    }
    if modes.is_empty() {
        warn!("{}: no usable video modes", name);
    }

    let desktop_mode = desktop_mode(&name, index, info, &modes, settings);

    let mut builder = Output::builder(name).modes(modes);
    if let Some(mode) = desktop_mode {
        builder = builder.desktop_mode(mode);
    }
    builder.build()
}

fn platform_mode(width: u32, height: u32, native: WinitMode, index: usize) -> Result<Mode> {
    if native.refresh_rate_millihertz == 0 {
        return Err(Error::InvalidRefreshRate {
            numerator: 0,
            denominator: 1000,
        });
    }
    Mode::platform(width, height, native.refresh_rate(), index)?.with_native(native)
}

fn bit_depth(mode: &Mode) -> u16 {
    mode.native_as::<WinitMode>()
        .map(|native| native.bit_depth)
        .unwrap_or(0)
}

fn desktop_mode(
    name: &str,
    index: usize,
    info: &MonitorInfo,
    modes: &[Mode],
    settings: &Settings,
) -> Option<Mode> {
    let (width, height) = info.size;

    let refresh_rate_millihertz = match info.refresh_rate_millihertz {
        Some(refresh_rate_millihertz) => refresh_rate_millihertz,
        None => {
            // The rate is unknown: take the fastest mode of the current resolution
            return modes
                .iter()
                .filter(|mode| mode.matches_resolution(width, height))
                .max_by(|a, b| a.refresh_rate().total_cmp(&b.refresh_rate()))
                .cloned();
        }
    };

    let native = WinitMode {
        refresh_rate_millihertz,
        bit_depth: 0,
    };
    let mode = match platform_mode(width, height, native, index) {
        Ok(mode) => mode,
        Err(err) => {
            warn!("{}: invalid desktop mode ({})", name, err);
            return None;
        }
    };

    if let Some(listed) = modes.iter().find(|m| **m == mode) {
        return Some(listed.clone());
    }
    if settings.synthesize_desktop_mode {
        debug!("{}: desktop mode {} is not listed, adding it", name, mode);
        Some(mode)
    } else {
        warn!("{}: desktop mode {} is not listed", name, mode);
        None
    }
}
