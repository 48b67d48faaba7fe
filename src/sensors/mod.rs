//! Sensors module - CPU temperature, Sense HAT environmental readings and their calibration

pub mod cputemp;
pub mod imu;
pub mod reader;
