//! The 8x8 RGB LED matrix seen as one solid-fill surface

use crate::error::HatError;
use smart_leds::RGB8;

pub const WIDTH: usize = 8;
pub const HEIGHT: usize = 8;
pub const PIXELS: usize = WIDTH * HEIGHT;

pub const OFF: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// A matrix that can be filled with a single color.
///
/// Implemented by [`crate::linux::framebuffer::FramebufferMatrix`] on real hardware.
pub trait LedMatrix {
    /// Paint every pixel with `color`; [`OFF`] blanks the matrix.
    fn fill(&mut self, color: RGB8) -> Result<(), HatError>;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// Records every fill; the handle stays readable after the matrix is moved.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingMatrix {
        pub writes: Arc<Mutex<Vec<RGB8>>>,
        pub fail: Arc<Mutex<bool>>,
    }

    impl RecordingMatrix {
        pub(crate) fn writes(&self) -> Vec<RGB8> {
            self.writes.lock().unwrap().clone()
        }

        pub(crate) fn set_failing(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }
    }

    impl LedMatrix for RecordingMatrix {
        fn fill(&mut self, color: RGB8) -> Result<(), HatError> {
            if *self.fail.lock().unwrap() {
                return Err(HatError::io(
                    PathBuf::from("/dev/fb-test"),
                    std::io::Error::new(std::io::ErrorKind::Other, "unplugged"),
                ));
            }
            self.writes.lock().unwrap().push(color);
            Ok(())
        }
    }

    #[test]
    fn test_geometry() {
        assert_eq!(PIXELS, 64);
        assert_eq!(OFF, RGB8::new(0, 0, 0));
    }
}
