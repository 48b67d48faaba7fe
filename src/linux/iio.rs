//! Sense HAT environmental sensors via the kernel IIO sysfs interface
//!
//! The HTS221 provides humidity and temperature, the LPS25H (LPS22HB on
//! newer boards) provides pressure. Both are bound by the `rpi-sense` overlay
//! and show up as `iio:deviceN` directories.

use crate::error::HatError;
use crate::sensors::imu::{Imu, ImuReading};
use crate::shared::read_number;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_IIO_PATH: &str = "/sys/bus/iio/devices";

const HUMIDITY: &str = "humidityrelative";
const PRESSURE: &str = "pressure";
const TEMPERATURE: &str = "temp";

/// Reads the board sensors from two IIO devices.
#[derive(Debug, Clone)]
pub struct IioImu {
    humidity_device: PathBuf,
    pressure_device: PathBuf,
}

impl IioImu {
    /// Locate the humidity and pressure devices under `root`.
    pub fn discover(root: &Path) -> Result<Self, HatError> {
        let imu = Self {
            humidity_device: find_device(root, HUMIDITY)?,
            pressure_device: find_device(root, PRESSURE)?,
        };
        tracing::info!(
            "IIO sensors: humidity {:?}, pressure {:?}",
            imu.humidity_device,
            imu.pressure_device
        );
        Ok(imu)
    }
}

impl Imu for IioImu {
    fn read(&mut self) -> Result<ImuReading, HatError> {
        // IIO units: milli-degrees, milli-percent, kilopascal
        let temperature = read_channel(&self.humidity_device, TEMPERATURE)? / 1000.0;
        let humidity = read_channel(&self.humidity_device, HUMIDITY)? / 1000.0;
        let pressure = read_channel(&self.pressure_device, PRESSURE)? * 10.0;

        Ok(ImuReading {
            temperature,
            humidity,
            pressure,
        })
    }
}

fn has_channel(device: &Path, channel: &str) -> bool {
    ["input", "raw"]
        .iter()
        .any(|kind| device.join(format!("in_{}_{}", channel, kind)).exists())
}

/// First device (in name order) exposing `channel`
fn find_device(root: &Path, channel: &'static str) -> Result<PathBuf, HatError> {
    let entries = fs::read_dir(root).map_err(|e| HatError::io(root, e))?;

    let mut devices: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| has_channel(path, channel))
        .collect();
    devices.sort();

    devices
        .into_iter()
        .next()
        .ok_or_else(|| HatError::SensorNotFound {
            channel,
            root: root.to_path_buf(),
        })
}

fn read_optional(path: &Path) -> Result<Option<f64>, HatError> {
    if path.exists() {
        read_number(path).map(Some)
    } else {
        Ok(None)
    }
}

/// Processed channel value: `_input` if the driver offers it, else `(raw + offset) * scale`.
fn read_channel(device: &Path, channel: &'static str) -> Result<f64, HatError> {
    let input = device.join(format!("in_{}_input", channel));
    if let Some(value) = read_optional(&input)? {
        return Ok(value);
    }

    let raw = device.join(format!("in_{}_raw", channel));
    let Some(raw) = read_optional(&raw)? else {
        return Err(HatError::ChannelUnreadable {
            channel,
            device: device.to_path_buf(),
        });
    };
    let offset = read_optional(&device.join(format!("in_{}_offset", channel)))?.unwrap_or(0.0);
    let scale = read_optional(&device.join(format!("in_{}_scale", channel)))?.unwrap_or(1.0);

    Ok((raw + offset) * scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{scratch_dir, ScratchDir};

    fn write_device(root: &Path, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let device = root.join(name);
        fs::create_dir_all(&device).unwrap();
        for (file, contents) in files {
            fs::write(device.join(file), contents).unwrap();
        }
        device
    }

    fn sense_hat_tree() -> ScratchDir {
        let root = scratch_dir("iio");
        write_device(&root, "trigger0", &[("name", "sysfstrig0\n")]);
        write_device(
            &root,
            "iio:device0",
            &[
                ("name", "hts221\n"),
                ("in_humidityrelative_raw", "-8000\n"),
                ("in_humidityrelative_offset", "20000\n"),
                ("in_humidityrelative_scale", "3.75\n"),
                ("in_temp_raw", "300\n"),
                ("in_temp_offset", "500\n"),
                ("in_temp_scale", "25\n"),
            ],
        );
        write_device(
            &root,
            "iio:device1",
            &[
                ("name", "lps25h\n"),
                ("in_pressure_raw", "4150000\n"),
                ("in_pressure_scale", "0.000024414\n"),
                ("in_temp_raw", "100\n"),
            ],
        );
        root
    }

    #[test]
    fn test_discover_and_read() {
        let root = sense_hat_tree();
        let mut imu = IioImu::discover(&root).unwrap();
        assert!(imu.humidity_device.ends_with("iio:device0"));
        assert!(imu.pressure_device.ends_with("iio:device1"));

        let reading = imu.read().unwrap();
        // (300 + 500) * 25 = 20000 m°C
        assert!((reading.temperature - 20.0).abs() < 1e-9);
        // (-8000 + 20000) * 3.75 = 45000 m%
        assert!((reading.humidity - 45.0).abs() < 1e-9);
        // 4150000 * 0.000024414 kPa
        assert!((reading.pressure - 1013.181).abs() < 1e-6);
    }

    #[test]
    fn test_input_preferred_over_raw() {
        let root = scratch_dir("iio");
        write_device(
            &root,
            "iio:device0",
            &[
                ("in_humidityrelative_input", "51500"),
                ("in_temp_input", "23250"),
                ("in_temp_raw", "1"),
            ],
        );
        write_device(&root, "iio:device1", &[("in_pressure_input", "99.5")]);

        let reading = IioImu::discover(&root).unwrap().read().unwrap();
        assert_eq!(reading.temperature, 23.25);
        assert_eq!(reading.humidity, 51.5);
        assert_eq!(reading.pressure, 995.0);
    }

    #[test]
    fn test_missing_pressure_device() {
        let root = scratch_dir("iio");
        write_device(&root, "iio:device0", &[("in_humidityrelative_raw", "1")]);
        assert!(matches!(
            IioImu::discover(&root),
            Err(HatError::SensorNotFound { channel: "pressure", .. })
        ));
    }

    #[test]
    fn test_missing_temperature_channel() {
        let root = scratch_dir("iio");
        write_device(&root, "iio:device0", &[("in_humidityrelative_raw", "1")]);
        write_device(&root, "iio:device1", &[("in_pressure_raw", "1")]);

        let err = IioImu::discover(&root).unwrap().read().unwrap_err();
        assert!(matches!(err, HatError::ChannelUnreadable { channel: "temp", .. }));
    }
}
