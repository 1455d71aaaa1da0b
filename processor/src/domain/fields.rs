//! Attribute names used by the sensor2cloud JSON payloads.
//!
//! Converted quantities are published under `<base>` and their raw
//! counterparts under `<base>_raw`.

pub const CALIBRATION: &str = "calib";

pub const READING_PREFIX: &str = "rdg";

pub const TIMESTAMP: &str = "time";

pub const PRESSURE: &str = "pres";
pub const PRESSURE_RAW: &str = "pres_raw";

pub const TEMPERATURE_ICP: &str = "temp_icp";
pub const TEMPERATURE_ICP_RAW: &str = "temp_icp_raw";

pub const OPTICAL_POWER: &str = "opt";
pub const OPTICAL_POWER_RAW: &str = "opt_raw";

pub const HUMIDITY: &str = "humid";
pub const HUMIDITY_RAW: &str = "humid_raw";

pub const TEMPERATURE_SHTC: &str = "temp_shtc";
pub const TEMPERATURE_SHTC_RAW: &str = "temp_shtc_raw";
