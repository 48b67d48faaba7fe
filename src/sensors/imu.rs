//! Environmental readings from the Sense HAT IMU board

use crate::error::HatError;

/// One reading of the board's environmental sensors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImuReading {
    /// Board temperature in °C, skewed upwards by CPU heat.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Air pressure in hPa.
    pub pressure: f64,
}

/// Source of [`ImuReading`]s.
///
/// Implemented by [`crate::linux::iio::IioImu`] on real hardware.
pub trait Imu {
    /// Take one blocking reading.
    fn read(&mut self) -> Result<ImuReading, HatError>;
}
