//! The Sense HAT accessory: one lightbulb and three environmental sensors

use crate::actuators::leds::{LedController, LedState};
use crate::actuators::matrix::LedMatrix;
use crate::config::Config;
use crate::error::HatError;
use crate::sensors::imu::Imu;
use crate::sensors::reader::{SensorReader, SensorSnapshot};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Accessory shared between the host handler and the sensor timer
pub type SharedAccessory<I, M> = Arc<Mutex<Accessory<I, M>>>;

/// One service as presented to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub name: String,
    pub characteristics: Vec<&'static str>,
}

/// Owns all accessory state. Construct once per process.
pub struct Accessory<I, M> {
    services: Vec<ServiceInfo>,
    sensors_interval: Duration,
    led_interval: Duration,
    sensors: SensorReader<I>,
    leds: LedController<M>,
}

impl<I: Imu, M: LedMatrix> Accessory<I, M> {
    /// Blank the matrix, then take the first sensor reading.
    ///
    /// Fails if either initial hardware access fails.
    pub fn new(config: &Config, imu: I, matrix: M) -> Result<Self, HatError> {
        let leds = LedController::new(matrix)?;

        let services = vec![
            ServiceInfo {
                service: "TemperatureSensor",
                name: config.temperature_name().to_string(),
                characteristics: vec!["CurrentTemperature", "AtmosphericPressureLevel"],
            },
            ServiceInfo {
                service: "HumiditySensor",
                name: config.humidity_name().to_string(),
                characteristics: vec!["CurrentRelativeHumidity"],
            },
            ServiceInfo {
                service: "AtmosphericPressureSensor",
                name: config.pressure_name().to_string(),
                characteristics: vec!["AtmosphericPressureLevel"],
            },
            ServiceInfo {
                service: "Lightbulb",
                name: config.display_name().to_string(),
                characteristics: vec!["On", "Brightness", "Hue", "Saturation"],
            },
        ];

        let mut sensors = SensorReader::new(config.cputemp_path(), imu);
        sensors.read_sensors()?;

        Ok(Self {
            services,
            sensors_interval: config.sensors_interval(),
            led_interval: config.led_interval(),
            sensors,
            leds,
        })
    }

    pub fn services(&self) -> &[ServiceInfo] {
        &self.services
    }

    pub fn sensors_interval(&self) -> Duration {
        self.sensors_interval
    }

    /// Reserved, nothing is scheduled with it
    pub fn led_interval(&self) -> Duration {
        self.led_interval
    }

    // --- sensors ---

    pub fn read_sensors(&mut self) -> Result<SensorSnapshot, HatError> {
        self.sensors.read_sensors()
    }

    pub fn sensor_snapshot(&self) -> SensorSnapshot {
        self.sensors.snapshot()
    }

    pub fn get_current_temperature(&self) -> f64 {
        self.sensors.snapshot().temperature
    }

    pub fn get_current_relative_humidity(&self) -> f64 {
        self.sensors.snapshot().humidity
    }

    pub fn get_current_pressure(&self) -> f64 {
        self.sensors.snapshot().pressure
    }

    // --- lightbulb ---

    pub fn set_leds(&mut self) -> Result<(), HatError> {
        self.leds.set_leds()
    }

    pub fn led_state(&self) -> LedState {
        self.leds.state()
    }

    pub fn set_power_state(&mut self, on: bool) -> Result<bool, HatError> {
        self.leds.set_power_state(on)
    }

    /// Re-sends the current color before reporting
    pub fn get_power_state(&mut self) -> Result<bool, HatError> {
        self.set_leds()?;
        Ok(self.leds.state().power)
    }

    pub fn set_hue(&mut self, hue: f64) -> Result<f64, HatError> {
        self.leds.set_hue(hue)
    }

    pub fn get_hue(&self) -> f64 {
        self.leds.hue()
    }

    pub fn set_saturation(&mut self, saturation: f64) -> Result<f64, HatError> {
        self.leds.set_saturation(saturation)
    }

    pub fn get_saturation(&self) -> f64 {
        self.leds.saturation()
    }

    pub fn set_brightness(&mut self, brightness: f64) -> Result<f64, HatError> {
        self.leds.set_brightness(brightness)
    }

    pub fn get_brightness(&self) -> f64 {
        self.leds.brightness()
    }
}

/// Re-read the sensors every `sensors_interval`, forever.
///
/// The first tick is one period out since construction already read once.
/// A failed cycle is logged and the previous snapshot stays in place.
pub async fn poll_sensors<I: Imu, M: LedMatrix>(accessory: SharedAccessory<I, M>) {
    let period = accessory.lock().await.sensors_interval();
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);

    loop {
        ticker.tick().await;
        let mut guard = accessory.lock().await;
        if let Err(e) = guard.read_sensors() {
            tracing::error!("Sensor read failed: {}", e);
        }
    }
}
