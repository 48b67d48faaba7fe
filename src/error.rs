//! Error types for Sense HAT hardware access.

use std::path::PathBuf;

/// Errors raised while reading the sensors or driving the LED matrix.
#[derive(Debug, thiserror::Error)]
pub enum HatError {
    /// A sysfs or device file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file that was being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A file held something other than a number.
    #[error("Invalid reading {value:?} in {path}")]
    InvalidReading {
        /// The file the value came from.
        path: PathBuf,
        /// The trimmed file contents.
        value: String,
    },

    /// No IIO device exposes the requested channel.
    #[error("No IIO device with channel '{channel}' under {root}")]
    SensorNotFound {
        /// Channel name, e.g. `humidityrelative`.
        channel: &'static str,
        /// The directory that was scanned.
        root: PathBuf,
    },

    /// The channel exists but has neither `_input` nor `_raw`.
    #[error("Channel '{channel}' on {device} has no readable value")]
    ChannelUnreadable {
        /// Channel name.
        channel: &'static str,
        /// The IIO device directory.
        device: PathBuf,
    },

    /// No framebuffer named like the Sense HAT LED matrix was found.
    #[error("Sense HAT LED framebuffer not found")]
    FramebufferNotFound,

    /// The LED matrix accepts exactly 64 pixels.
    #[error("LED matrix expects {expected} pixels, got {actual}")]
    PixelCount {
        /// Always 64.
        expected: usize,
        /// Pixels supplied by the caller.
        actual: usize,
    },
}

impl HatError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
