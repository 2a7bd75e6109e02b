use std::path::PathBuf;

use async_trait::async_trait;
use traffic_cam_client::models::Camera;

use crate::Result;

pub mod local;

/// Destination for fetched camera images.
#[async_trait]
pub trait ImageSink: Send + Sync {
    /// Stores the camera's current image and returns where it went.
    async fn save(&self, camera: &Camera) -> Result<PathBuf>;
}
