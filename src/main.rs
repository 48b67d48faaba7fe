//! sensehat-bridge: MCP accessory bridge for the Raspberry Pi Sense HAT
//!
//! One accessory, four services:
//! - Lightbulb: the 8x8 LED matrix as a single color light (On, Brightness, Hue, Saturation)
//! - TemperatureSensor: CPU-heat corrected temperature plus air pressure
//! - HumiditySensor: relative humidity
//! - AtmosphericPressureSensor: air pressure

use clap::{Parser, Subcommand};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters, ServerHandler},
    model::*,
    ErrorData as McpError,
    ServiceExt,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// === Modules ===

mod accessory;
mod actuators;
mod bridge;
mod config;
mod error;
mod linux;
mod sensors;
mod shared;

use accessory::{Accessory, SharedAccessory};
use config::Config;
use linux::framebuffer::{FramebufferMatrix, DEV_PATH, GRAPHICS_CLASS_PATH};
use linux::iio::IioImu;
use sensors::reader::SensorReader;

// === CLI ===

#[derive(Parser)]
#[command(name = "sensehat-bridge")]
#[command(about = "MCP accessory bridge for the Raspberry Pi Sense HAT")]
struct Cli {
    /// Config file (default: ~/.config/sensehat-bridge/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the config file in your editor
    Config,
    /// Read the sensors once and print the calibrated snapshot
    Read,
}

// === Common Parameter Types ===

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EmptyParams {}

// === Server ===

pub struct SenseHatServer {
    pub tool_router: ToolRouter<Self>,
    pub accessory: SharedAccessory<IioImu, FramebufferMatrix>,
}

impl SenseHatServer {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let (imu, matrix) = open_hardware(config)?;
        let accessory = Accessory::new(config, imu, matrix)?;

        tracing::info!(
            "Accessory '{}' ready: cputemp {:?}, sensors every {:?}",
            config.display_name(),
            config.cputemp_path(),
            accessory.sensors_interval()
        );
        tracing::debug!(
            "led_interval {:?} is reserved, no LED refresh timer is scheduled",
            accessory.led_interval()
        );

        Ok(Self {
            tool_router: Self::tool_router(),
            accessory: std::sync::Arc::new(tokio::sync::Mutex::new(accessory)),
        })
    }
}

// Tool implementations
#[rmcp::tool_router]
impl SenseHatServer {
    // ============================================================
    // LIGHTBULB - LED matrix
    // ============================================================

    #[rmcp::tool(description = "Get whether the LED matrix is on (re-sends the current color to the matrix)")]
    pub async fn get_power_state(
        &self,
        Parameters(_params): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        bridge::get_power_state(&self.accessory).await
    }

    #[rmcp::tool(description = "Turn the LED matrix on or off")]
    pub async fn set_power_state(
        &self,
        Parameters(params): Parameters<bridge::PowerParams>,
    ) -> Result<CallToolResult, McpError> {
        bridge::set_power_state(&self.accessory, params).await
    }

    #[rmcp::tool(description = "Get the LED matrix hue in degrees")]
    pub async fn get_hue(
        &self,
        Parameters(_params): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        bridge::get_hue(&self.accessory).await
    }

    #[rmcp::tool(description = "Set the LED matrix hue in degrees (0-360) and repaint")]
    pub async fn set_hue(
        &self,
        Parameters(params): Parameters<bridge::HueParams>,
    ) -> Result<CallToolResult, McpError> {
        bridge::set_hue(&self.accessory, params).await
    }

    #[rmcp::tool(description = "Get the LED matrix saturation in percent")]
    pub async fn get_saturation(
        &self,
        Parameters(_params): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        bridge::get_saturation(&self.accessory).await
    }

    #[rmcp::tool(description = "Set the LED matrix saturation in percent (0-100) and repaint")]
    pub async fn set_saturation(
        &self,
        Parameters(params): Parameters<bridge::SaturationParams>,
    ) -> Result<CallToolResult, McpError> {
        bridge::set_saturation(&self.accessory, params).await
    }

    #[rmcp::tool(description = "Get the LED matrix brightness in percent")]
    pub async fn get_brightness(
        &self,
        Parameters(_params): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        bridge::get_brightness(&self.accessory).await
    }

    #[rmcp::tool(description = "Set the LED matrix brightness in percent (0-100) and repaint")]
    pub async fn set_brightness(
        &self,
        Parameters(params): Parameters<bridge::BrightnessParams>,
    ) -> Result<CallToolResult, McpError> {
        bridge::set_brightness(&self.accessory, params).await
    }

    #[rmcp::tool(description = "Get power, hue, saturation and brightness in one call (JSON)")]
    pub async fn get_light_state(
        &self,
        Parameters(_params): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        bridge::get_light_state(&self.accessory).await
    }

    // ============================================================
    // SENSORS - latest snapshot, refreshed every sensors_interval
    // ============================================================

    #[rmcp::tool(description = "Get the current temperature in °C, corrected for CPU heat")]
    pub async fn get_current_temperature(
        &self,
        Parameters(_params): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        bridge::get_current_temperature(&self.accessory).await
    }

    #[rmcp::tool(description = "Get the current relative humidity in percent")]
    pub async fn get_current_relative_humidity(
        &self,
        Parameters(_params): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        bridge::get_current_relative_humidity(&self.accessory).await
    }

    #[rmcp::tool(description = "Get the current atmospheric pressure in hPa")]
    pub async fn get_current_pressure(
        &self,
        Parameters(_params): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        bridge::get_current_pressure(&self.accessory).await
    }

    #[rmcp::tool(description = "Get temperature, humidity and pressure in one call (JSON)")]
    pub async fn get_sensor_snapshot(
        &self,
        Parameters(_params): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        bridge::get_sensor_snapshot(&self.accessory).await
    }

    #[rmcp::tool(description = "List the accessory's services with their display names and characteristics (JSON)")]
    pub async fn get_services(
        &self,
        Parameters(_params): Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        bridge::get_services(&self.accessory).await
    }
}

#[rmcp::tool_handler]
impl ServerHandler for SenseHatServer {
    fn get_info(&self) -> ServerInfo {
        let description = String::from(
            "sensehat-bridge: Raspberry Pi Sense HAT accessory.\n\
             - lightbulb: LED matrix power, hue, saturation, brightness\n\
             - sensors: temperature, relative humidity, atmospheric pressure\n",
        );

        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(description),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config) => {
            run_config_command(cli.config)?;
        }
        Some(Commands::Read) => {
            run_read_command(cli.config)?;
        }
        None => {
            run_server(cli.config).await?;
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<PathBuf>) -> Config {
    match path {
        Some(path) => Config::load_from(&path),
        None => Config::load(),
    }
}

fn config_path(path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => Config::path().ok_or_else(|| anyhow::anyhow!("Could not determine config directory")),
    }
}

/// Locate the IIO sensors and the LED framebuffer
fn open_hardware(config: &Config) -> anyhow::Result<(IioImu, FramebufferMatrix)> {
    let imu = IioImu::discover(&config.iio_path())?;
    let matrix = match config.framebuffer() {
        Some(device) => FramebufferMatrix::open(device),
        None => FramebufferMatrix::discover(Path::new(GRAPHICS_CLASS_PATH), Path::new(DEV_PATH))?,
    };
    Ok((imu, matrix))
}

/// Open config file in user's editor
fn run_config_command(path: Option<PathBuf>) -> anyhow::Result<()> {
    let config_path = config_path(path)?;

    // Create config dir if needed
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Create config file from template if it doesn't exist
    if !config_path.exists() {
        let template = include_str!("../config.toml.example");
        std::fs::write(&config_path, template)?;
        println!("Created config file: {}", config_path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| "nano".to_string());

    println!("Opening {} with {}", config_path.display(), editor);

    std::process::Command::new(&editor)
        .arg(&config_path)
        .status()?;

    Ok(())
}

/// One sensor cycle, printed as JSON. Leaves the LED matrix alone.
fn run_read_command(path: Option<PathBuf>) -> anyhow::Result<()> {
    init_tracing();

    let config = load_config(path);
    let imu = IioImu::discover(&config.iio_path())?;
    let snapshot = SensorReader::new(config.cputemp_path(), imu).read_sensors()?;

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Run the MCP server
async fn run_server(path: Option<PathBuf>) -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting sensehat-bridge server");

    let config = load_config(path);
    let server = SenseHatServer::new(&config)?;
    tokio::spawn(accessory::poll_sensors(server.accessory.clone()));

    let service = server.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;

    tracing::info!("sensehat-bridge server stopped");
    Ok(())
}
