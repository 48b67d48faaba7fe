//! Lightbulb state and the LED matrix writes it drives

use super::color::hsv_to_rgb;
use super::matrix::{LedMatrix, OFF};
use crate::error::HatError;
use serde::Serialize;

/// Light characteristics as last set by the host. Values are stored unvalidated.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LedState {
    pub power: bool,
    /// Degrees, 0-360
    pub hue: f64,
    /// Percent, 0-100
    pub saturation: f64,
    /// Percent, 0-100
    pub brightness: f64,
}

/// Owns the matrix and pushes the full color on every change.
pub struct LedController<M> {
    matrix: M,
    state: LedState,
}

impl<M: LedMatrix> LedController<M> {
    /// Start with everything at zero and blank the matrix.
    pub fn new(matrix: M) -> Result<Self, HatError> {
        let mut controller = Self {
            matrix,
            state: LedState::default(),
        };
        controller.set_leds()?;
        Ok(controller)
    }

    /// Write the current state to the matrix: the HSV color when on, black when off.
    pub fn set_leds(&mut self) -> Result<(), HatError> {
        let color = if self.state.power {
            hsv_to_rgb(self.state.hue, self.state.saturation, self.state.brightness)
        } else {
            OFF
        };
        tracing::debug!(
            "LED matrix fill rgb({}, {}, {}) power={}",
            color.r,
            color.g,
            color.b,
            self.state.power
        );
        self.matrix.fill(color)
    }

    pub fn set_power_state(&mut self, on: bool) -> Result<bool, HatError> {
        self.state.power = on;
        self.set_leds()?;
        Ok(self.state.power)
    }

    pub fn set_hue(&mut self, hue: f64) -> Result<f64, HatError> {
        self.state.hue = hue;
        self.set_leds()?;
        Ok(self.state.hue)
    }

    pub fn set_saturation(&mut self, saturation: f64) -> Result<f64, HatError> {
        self.state.saturation = saturation;
        self.set_leds()?;
        Ok(self.state.saturation)
    }

    pub fn set_brightness(&mut self, brightness: f64) -> Result<f64, HatError> {
        self.state.brightness = brightness;
        self.set_leds()?;
        Ok(self.state.brightness)
    }

    pub fn hue(&self) -> f64 {
        self.state.hue
    }

    pub fn saturation(&self) -> f64 {
        self.state.saturation
    }

    pub fn brightness(&self) -> f64 {
        self.state.brightness
    }

    pub fn state(&self) -> LedState {
        self.state
    }
}
