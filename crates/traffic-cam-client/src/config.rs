use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_CAMERAS_PATH: &str =
    "cameras?top={top}&bottom={bottom}&left={left}&right={right}&format=xml&key={key}";
pub const DEFAULT_IMAGE_PATH: &str = "cameras/{id}/image?key={key}";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "kebab-case"))]
pub struct ClientConfig {
    pub base_url: Url,
    pub api_key: String,
    #[serde(default = "default_cameras_path")]
    pub cameras_path: String,
    #[serde(default = "default_image_path")]
    pub image_path: String,
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
    #[serde(default)]
    pub image_format: ImageFormatConfig,
}

impl ClientConfig {
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            base_url,
            api_key: api_key.into(),
            cameras_path: default_cameras_path(),
            image_path: default_image_path(),
            timeout: default_timeout(),
            image_format: ImageFormatConfig::default(),
        }
    }
}

/// Decoder used for camera images. The image endpoint does not send a usable
/// content type, so the format has to be named up front.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageFormatConfig {
    #[default]
    Jpeg,
    Png,
}

impl From<ImageFormatConfig> for image::ImageFormat {
    fn from(value: ImageFormatConfig) -> Self {
        match value {
            ImageFormatConfig::Jpeg => image::ImageFormat::Jpeg,
            ImageFormatConfig::Png => image::ImageFormat::Png,
        }
    }
}

fn default_cameras_path() -> String {
    DEFAULT_CAMERAS_PATH.to_string()
}

fn default_image_path() -> String {
    DEFAULT_IMAGE_PATH.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}
