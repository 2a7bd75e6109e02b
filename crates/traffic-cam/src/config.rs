use std::{
    collections::HashMap,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::info;
use traffic_cam_client::{config::ClientConfig, geo::BoundingBox};

use crate::{Error, Result};

const CONFIG_DIR: &str = ".traffic-cam";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "kebab-case"))]
pub struct Config {
    pub client: ClientConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "kebab-case"))]
pub struct QueryConfig {
    /// 0 lists every camera in the box.
    pub max_results: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { max_results: 25 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "kebab-case"))]
pub struct ImagesConfig {
    pub path_buf: PathBuf,
    /// Upper bound on image requests in flight while saving a listing.
    #[serde(default = "default_parallel_fetches")]
    pub parallel_fetches: usize,
}

fn default_parallel_fetches() -> usize {
    4
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            path_buf: PathBuf::from("./camera-images"),
            parallel_fetches: default_parallel_fetches(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "kebab-case"))]
pub struct LoggingConfig {
    pub loki: Option<LokiConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "kebab-case"))]
pub struct LokiConfig {
    pub url: String,
    pub labels: Option<HashMap<String, String>>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args<T: serde::de::DeserializeOwned + Clone + Send + Sync + 'static> {
    #[arg(short, long, env, value_parser = toml_from_file::<T>)]
    pub config: Option<T>,
    #[command(subcommand)]
    pub command: Command,
}

impl Args<Config> {
    /// The config passed on the command line, or the one in the default
    /// location. Secrets given as `file:` or `env:` are resolved here.
    pub fn get_config(&self) -> Result<Config> {
        let mut config = if let Some(config) = &self.config {
            config.clone()
        } else {
            let default_path = default_config_path();
            toml_from_file(&default_path)?
        };

        config.client.api_key = from_file_const_or_env(&config.client.api_key)?;
        Ok(config)
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the cameras in a bounding box, closest to its center first
    Cameras {
        #[command(flatten)]
        bounds: BoundsArgs,
        /// Maximum number of cameras to list; 0 for all of them
        #[arg(short, long)]
        max: Option<usize>,
        /// Fetch every listed camera's image and save it
        #[arg(long, default_value = "false")]
        images: bool,
    },
    /// Fetch and save the image of one camera in a bounding box
    Snapshot {
        #[command(flatten)]
        bounds: BoundsArgs,
        #[arg(long)]
        id: i64,
    },
}

#[derive(clap::Args, Debug, Clone, Copy)]
pub struct BoundsArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub top: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub bottom: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub left: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub right: f64,
}

impl From<BoundsArgs> for BoundingBox {
    fn from(value: BoundsArgs) -> Self {
        BoundingBox::new(value.top, value.bottom, value.left, value.right)
    }
}

pub fn default_config_path() -> String {
    if let Ok(home_dir) = std::env::var("HOME") {
        format!("{home_dir}/{CONFIG_DIR}/config.toml")
    } else {
        "config.toml".to_string()
    }
}

pub fn toml_from_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let toml = std::fs::read_to_string(path)?;
    let config_json: serde_json::Value = toml::from_str(&toml)?;
    let config = serde_json::from_value(config_json)?;
    Ok(config)
}

/// `file:<path>` reads the secret from a file, `env:<name>` from an
/// environment variable; anything else is taken literally.
pub fn from_file_const_or_env(value: &str) -> Result<String> {
    if let Some(path) = value.strip_prefix("file:") {
        Ok(std::fs::read_to_string(path)?.trim_end().to_string())
    } else if let Some(name) = value.strip_prefix("env:") {
        std::env::var(name)
            .map_err(|e| Error::General(format!("Environment variable '{name}' not found: {e}")))
    } else {
        Ok(value.to_string())
    }
}

pub async fn check_and_create_config() -> Result<()> {
    let home_dir = std::env::var("HOME").map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "HOME environment variable not set",
        )
    })?;

    let config_dir = Path::new(&home_dir).join(CONFIG_DIR);
    let config_path = config_dir.join("config.toml");

    if !config_path.exists() {
        info!("Configuration file not found. Setting up initial configuration...");

        fs::create_dir_all(&config_dir).map_err(|e| {
            std::io::Error::new(e.kind(), format!("Failed to create config directory: {e}"))
        })?;

        let config_content = prompt_for_config()?;
        fs::write(&config_path, config_content).map_err(|e| {
            std::io::Error::new(e.kind(), format!("Failed to write config file: {e}"))
        })?;

        info!("Configuration file created at: {}", config_path.display());
    }

    Ok(())
}

fn prompt_for_config() -> Result<String> {
    println!("Welcome to traffic-cam setup!");
    println!("Press Enter to use default values shown in brackets.\n");

    let base_url = prompt_with_default("Camera API base URL", "https://api.example.com/v1/")?;
    let api_key = prompt_with_default(
        "API key (or file:<path> / env:<name>)",
        "env:TRAFFIC_CAM_API_KEY",
    )?;
    let timeout = prompt_with_default("Request timeout (e.g., 30s, 1m)", "30s")?;
    let image_format = prompt_with_default("Camera image format (jpeg/png)", "jpeg")?;
    let max_results = prompt_with_default("Maximum cameras per query (0 for all)", "25")?;
    let images_path = prompt_with_default("Directory for saved images", "./camera-images")?;
    let parallel_fetches = prompt_with_default("Parallel image fetches", "4")?;

    let config = format!(
        r#"[client]
base-url = "{base_url}"
api-key = "{api_key}"
timeout = "{timeout}"
image-format = "{image_format}"

[query]
max-results = {max_results}

[images]
path-buf = "{images_path}"
parallel-fetches = {parallel_fetches}
"#
    );

    Ok(config)
}

fn prompt_with_default(prompt: &str, default: &str) -> Result<String> {
    print!("{prompt} [{default}]: ");
    io::stdout()
        .flush()
        .map_err(|e| std::io::Error::new(e.kind(), format!("Failed to flush stdout: {e}")))?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| std::io::Error::new(e.kind(), format!("Failed to read input: {e}")))?;

    let input = input.trim();
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input.to_string())
    }
}
