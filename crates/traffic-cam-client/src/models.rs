use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::images::Placeholder;

/// Body of the camera-list endpoint: `<cameras>` holding zero or more
/// `<camera>` elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub(crate) struct CameraListRawResponse {
    #[serde(rename = "camera", default)]
    pub cameras: Vec<RawCameraRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct RawCameraRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub orientation: String,
    #[serde(default)]
    pub temporarily_disabled: bool,
    pub refresh_rate: u32,
    pub city_code: Option<String>,
    pub provider_code: Option<String>,
    pub zip: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Live,
    Placeholder(Placeholder),
}

/// A decoded camera frame, or a stand-in when the frame could not be fetched.
#[derive(Debug, Clone)]
pub struct CameraImage {
    pub image: Arc<DynamicImage>,
    pub source: ImageSource,
}

impl CameraImage {
    pub fn live(image: DynamicImage) -> Self {
        Self {
            image: Arc::new(image),
            source: ImageSource::Live,
        }
    }

    pub fn placeholder(placeholder: Placeholder) -> Self {
        Self {
            image: placeholder.image(),
            source: ImageSource::Placeholder(placeholder),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.source, ImageSource::Placeholder(_))
    }
}

/// One entry of the ranked result set, ready for a map UI to bind to.
#[derive(Debug, Clone)]
pub struct Camera {
    pub id: i64,
    /// 1-based rank by distance within the current result set. Reassigned on
    /// every query.
    pub sequence: usize,
    pub name: String,
    pub orientation: String,
    pub refresh_rate: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_from_center: f64,
    pub image: Option<CameraImage>,
    pub last_refresh: Option<DateTime<Utc>>,
}

impl Camera {
    /// Stable identifier derived from the camera id, suitable as a pin key.
    pub fn string_id(&self) -> String {
        format!("camera-{}", self.id)
    }

    pub fn display_label(&self) -> String {
        self.sequence.to_string()
    }

    pub fn set_image(&mut self, image: CameraImage) {
        self.image = Some(image);
        self.last_refresh = Some(Utc::now());
    }

    pub fn is_refresh_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_refresh {
            None => true,
            Some(last) => now - last >= TimeDelta::seconds(i64::from(self.refresh_rate)),
        }
    }
}
