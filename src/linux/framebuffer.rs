//! Sense HAT LED matrix through its Linux framebuffer device

use crate::actuators::matrix::{LedMatrix, PIXELS};
use crate::error::HatError;
use smart_leds::{SmartLedsWrite, RGB8};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Framebuffer name registered by the `rpi-sense-fb` driver
pub const SENSE_HAT_FB_NAME: &str = "RPi-Sense FB";

pub const GRAPHICS_CLASS_PATH: &str = "/sys/class/graphics";
pub const DEV_PATH: &str = "/dev";

/// Writes whole frames of RGB565 pixels to `/dev/fbN`.
#[derive(Debug, Clone)]
pub struct FramebufferMatrix {
    device: PathBuf,
}

impl FramebufferMatrix {
    pub fn open(device: impl Into<PathBuf>) -> Self {
        Self {
            device: device.into(),
        }
    }

    /// Find the framebuffer whose sysfs `name` is [`SENSE_HAT_FB_NAME`].
    pub fn discover(graphics_root: &Path, dev_root: &Path) -> Result<Self, HatError> {
        let entries =
            fs::read_dir(graphics_root).map_err(|e| HatError::io(graphics_root, e))?;

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("fb"))
            })
            .collect();
        candidates.sort();

        for candidate in candidates {
            let Ok(name) = fs::read_to_string(candidate.join("name")) else {
                continue;
            };
            if name.trim() == SENSE_HAT_FB_NAME {
                if let Some(fb) = candidate.file_name() {
                    let device = dev_root.join(fb);
                    tracing::info!("LED matrix framebuffer: {:?}", device);
                    return Ok(Self::open(device));
                }
            }
        }

        Err(HatError::FramebufferNotFound)
    }
}

/// 5-6-5 bit packing used by the Sense HAT framebuffer
pub fn rgb565(color: RGB8) -> u16 {
    (u16::from(color.r >> 3) << 11) | (u16::from(color.g >> 2) << 5) | u16::from(color.b >> 3)
}

impl SmartLedsWrite for FramebufferMatrix {
    type Error = HatError;
    type Color = RGB8;

    /// Write one full frame, row-major from the top-left pixel.
    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let frame: Vec<u8> = iterator
            .into_iter()
            .flat_map(|pixel| rgb565(pixel.into()).to_le_bytes())
            .collect();

        if frame.len() != PIXELS * 2 {
            return Err(HatError::PixelCount {
                expected: PIXELS,
                actual: frame.len() / 2,
            });
        }

        let mut fb = OpenOptions::new()
            .write(true)
            .open(&self.device)
            .map_err(|e| HatError::io(&self.device, e))?;
        fb.write_all(&frame)
            .map_err(|e| HatError::io(&self.device, e))
    }
}

impl LedMatrix for FramebufferMatrix {
    fn fill(&mut self, color: RGB8) -> Result<(), HatError> {
        SmartLedsWrite::write(self, std::iter::repeat(color).take(PIXELS))
    }
}
