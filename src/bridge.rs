//! Host-facing characteristic accessors
//!
//! Each function answers one get or set request against the shared accessory.

use crate::accessory::Accessory;
use crate::actuators::matrix::LedMatrix;
use crate::sensors::imu::Imu;
use crate::shared::internal_error;
use rmcp::{model::*, ErrorData as McpError};
use schemars::JsonSchema;
use serde::Deserialize;
use std::fmt::Display;
use tokio::sync::Mutex;

// === Parameter Types ===

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PowerParams {
    #[schemars(description = "true to light the LED matrix, false to turn it off")]
    pub on: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct HueParams {
    #[schemars(description = "Hue in degrees (0-360)")]
    pub value: f64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SaturationParams {
    #[schemars(description = "Saturation in percent (0-100)")]
    pub value: f64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BrightnessParams {
    #[schemars(description = "Brightness in percent (0-100)")]
    pub value: f64,
}

fn reply(label: &str, value: impl Display, unit: &str) -> CallToolResult {
    CallToolResult::success(vec![Content::text(format!("{}: {}{}", label, value, unit))])
}

fn json_reply(value: &impl serde::Serialize) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| internal_error(format!("Serialization error: {}", e)))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// === Lightbulb ===

pub async fn get_power_state<I: Imu, M: LedMatrix>(
    accessory: &Mutex<Accessory<I, M>>,
) -> Result<CallToolResult, McpError> {
    let on = accessory
        .lock()
        .await
        .get_power_state()
        .map_err(|e| internal_error(format!("Failed to refresh LED matrix: {}", e)))?;
    Ok(reply("On", on, ""))
}

pub async fn set_power_state<I: Imu, M: LedMatrix>(
    accessory: &Mutex<Accessory<I, M>>,
    params: PowerParams,
) -> Result<CallToolResult, McpError> {
    let on = accessory
        .lock()
        .await
        .set_power_state(params.on)
        .map_err(|e| internal_error(format!("Failed to switch LED matrix: {}", e)))?;
    tracing::info!("Power set to {}", on);
    Ok(reply("On", on, ""))
}

pub async fn get_hue<I: Imu, M: LedMatrix>(
    accessory: &Mutex<Accessory<I, M>>,
) -> Result<CallToolResult, McpError> {
    Ok(reply("Hue", accessory.lock().await.get_hue(), "°"))
}

pub async fn set_hue<I: Imu, M: LedMatrix>(
    accessory: &Mutex<Accessory<I, M>>,
    params: HueParams,
) -> Result<CallToolResult, McpError> {
    let hue = accessory
        .lock()
        .await
        .set_hue(params.value)
        .map_err(|e| internal_error(format!("Failed to set hue: {}", e)))?;
    tracing::info!("Hue set to {}", hue);
    Ok(reply("Hue", hue, "°"))
}

pub async fn get_saturation<I: Imu, M: LedMatrix>(
    accessory: &Mutex<Accessory<I, M>>,
) -> Result<CallToolResult, McpError> {
    Ok(reply("Saturation", accessory.lock().await.get_saturation(), "%"))
}

pub async fn set_saturation<I: Imu, M: LedMatrix>(
    accessory: &Mutex<Accessory<I, M>>,
    params: SaturationParams,
) -> Result<CallToolResult, McpError> {
    let saturation = accessory
        .lock()
        .await
        .set_saturation(params.value)
        .map_err(|e| internal_error(format!("Failed to set saturation: {}", e)))?;
    tracing::info!("Saturation set to {}", saturation);
    Ok(reply("Saturation", saturation, "%"))
}

pub async fn get_brightness<I: Imu, M: LedMatrix>(
    accessory: &Mutex<Accessory<I, M>>,
) -> Result<CallToolResult, McpError> {
    Ok(reply("Brightness", accessory.lock().await.get_brightness(), "%"))
}

pub async fn set_brightness<I: Imu, M: LedMatrix>(
    accessory: &Mutex<Accessory<I, M>>,
    params: BrightnessParams,
) -> Result<CallToolResult, McpError> {
    let brightness = accessory
        .lock()
        .await
        .set_brightness(params.value)
        .map_err(|e| internal_error(format!("Failed to set brightness: {}", e)))?;
    tracing::info!("Brightness set to {}", brightness);
    Ok(reply("Brightness", brightness, "%"))
}

pub async fn get_light_state<I: Imu, M: LedMatrix>(
    accessory: &Mutex<Accessory<I, M>>,
) -> Result<CallToolResult, McpError> {
    let state = accessory.lock().await.led_state();
    json_reply(&state)
}

// === Sensors ===

pub async fn get_current_temperature<I: Imu, M: LedMatrix>(
    accessory: &Mutex<Accessory<I, M>>,
) -> Result<CallToolResult, McpError> {
    Ok(reply(
        "Current temperature",
        accessory.lock().await.get_current_temperature(),
        " °C",
    ))
}

pub async fn get_current_relative_humidity<I: Imu, M: LedMatrix>(
    accessory: &Mutex<Accessory<I, M>>,
) -> Result<CallToolResult, McpError> {
    Ok(reply(
        "Current relative humidity",
        accessory.lock().await.get_current_relative_humidity(),
        "%",
    ))
}

pub async fn get_current_pressure<I: Imu, M: LedMatrix>(
    accessory: &Mutex<Accessory<I, M>>,
) -> Result<CallToolResult, McpError> {
    Ok(reply(
        "Atmospheric pressure",
        accessory.lock().await.get_current_pressure(),
        " hPa",
    ))
}

pub async fn get_sensor_snapshot<I: Imu, M: LedMatrix>(
    accessory: &Mutex<Accessory<I, M>>,
) -> Result<CallToolResult, McpError> {
    let snapshot = accessory.lock().await.sensor_snapshot();
    json_reply(&snapshot)
}

pub async fn get_services<I: Imu, M: LedMatrix>(
    accessory: &Mutex<Accessory<I, M>>,
) -> Result<CallToolResult, McpError> {
    let accessory = accessory.lock().await;
    json_reply(&accessory.services())
}
