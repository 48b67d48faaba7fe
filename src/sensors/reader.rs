//! Periodic sensor sampling with CPU heat compensation

use super::cputemp::read_cpu_temperature;
use super::imu::{Imu, ImuReading};
use crate::error::HatError;
use serde::Serialize;
use std::path::PathBuf;

/// How strongly CPU heat bleeds into the board temperature sensor
const CPU_HEAT_FACTOR: f64 = 1.3;

/// Latest calibrated readings, replaced as a whole on every successful cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SensorSnapshot {
    /// Corrected ambient temperature in °C
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Air pressure in hPa
    pub pressure: f64,
}

/// Subtract the CPU's contribution from the board temperature.
///
/// Humidity and pressure are passed through untouched.
pub fn calibrate(cpu_temperature: f64, reading: ImuReading) -> SensorSnapshot {
    SensorSnapshot {
        temperature: reading.temperature
            - (cpu_temperature - reading.temperature) / CPU_HEAT_FACTOR,
        humidity: reading.humidity,
        pressure: reading.pressure,
    }
}

/// Reads the CPU temperature file and the IMU, keeping the last good snapshot.
pub struct SensorReader<I> {
    cputemp_path: PathBuf,
    imu: I,
    snapshot: SensorSnapshot,
}

impl<I: Imu> SensorReader<I> {
    pub fn new(cputemp_path: impl Into<PathBuf>, imu: I) -> Self {
        Self {
            cputemp_path: cputemp_path.into(),
            imu,
            snapshot: SensorSnapshot::default(),
        }
    }

    /// Run one sampling cycle.
    ///
    /// Either read failing aborts the cycle and leaves the previous snapshot in place.
    pub fn read_sensors(&mut self) -> Result<SensorSnapshot, HatError> {
        let cpu_temperature = read_cpu_temperature(&self.cputemp_path)?;
        let reading = self.imu.read()?;
        self.snapshot = calibrate(cpu_temperature, reading);
        tracing::debug!(
            "Sensors: cpu {:.2}°C, board {:.2}°C -> {:.2}°C, {:.1}%, {:.1} hPa",
            cpu_temperature,
            reading.temperature,
            self.snapshot.temperature,
            self.snapshot.humidity,
            self.snapshot.pressure
        );
        Ok(self.snapshot)
    }

    pub fn snapshot(&self) -> SensorSnapshot {
        self.snapshot
    }
}
