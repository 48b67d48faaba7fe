//! CPU temperature from the thermal zone pseudo-file

use crate::error::HatError;
use crate::shared::read_number;
use std::path::Path;

/// Where the Raspberry Pi kernel publishes the SoC temperature
pub const DEFAULT_CPUTEMP_PATH: &str = "/sys/class/thermal/thermal_zone0/temp";

/// Read the CPU temperature in °C. The file holds integer millidegrees.
pub fn read_cpu_temperature(path: &Path) -> Result<f64, HatError> {
    Ok(read_number(path)? / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::scratch_dir;
    use std::fs;

    #[test]
    fn test_millidegrees_to_celsius() {
        let dir = scratch_dir("cputemp");
        let path = dir.join("temp");
        fs::write(&path, "45000\n").unwrap();
        assert_eq!(read_cpu_temperature(&path).unwrap(), 45.0);

        fs::write(&path, "51234").unwrap();
        assert!((read_cpu_temperature(&path).unwrap() - 51.234).abs() < 1e-9);
    }

    #[test]
    fn test_missing_path_fails() {
        let dir = scratch_dir("cputemp");
        let err = read_cpu_temperature(&dir.join("thermal_zone9")).unwrap_err();
        assert!(err.to_string().contains("thermal_zone9"));
    }
}
