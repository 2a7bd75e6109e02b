use std::{io::Cursor, path::PathBuf};

use async_trait::async_trait;
use image::ImageFormat;
use tokio::io::AsyncWriteExt;
use tracing::info;
use traffic_cam_client::models::Camera;

use crate::{Error, Result, config::ImagesConfig, sink::ImageSink};

/// Writes images as `<dir>/<camera string id>.png`.
pub struct LocalImageSink {
    pub config: ImagesConfig,
}

impl LocalImageSink {
    pub fn new(config: ImagesConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ImageSink for LocalImageSink {
    #[tracing::instrument(skip(self, camera), fields(camera_id = camera.id))]
    async fn save(&self, camera: &Camera) -> Result<PathBuf> {
        let image = camera
            .image
            .as_ref()
            .ok_or_else(|| Error::General(format!("Camera {} has no image yet", camera.id)))?;

        let mut png = Vec::new();
        image
            .image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        tokio::fs::create_dir_all(&self.config.path_buf).await?;
        let file_path = self
            .config
            .path_buf
            .join(format!("{}.png", camera.string_id()));

        let mut file = tokio::fs::File::create(&file_path).await?;
        file.write_all(&png).await?;
        file.flush().await?;

        info!(
            path = %file_path.display(),
            placeholder = image.is_placeholder(),
            "Saved camera image"
        );
        Ok(file_path)
    }
}

#[cfg(test)]
mod tests {
    use traffic_cam_client::{images::Placeholder, models::CameraImage};

    use super::*;

    fn camera() -> Camera {
        Camera {
            id: 12,
            sequence: 1,
            name: "Bridge".to_string(),
            orientation: "East".to_string(),
            refresh_rate: 2,
            latitude: 0.0,
            longitude: 0.0,
            distance_from_center: 0.0,
            image: None,
            last_refresh: None,
        }
    }

    #[tokio::test]
    async fn test_save_writes_png() {
        let dir = tempfile::tempdir().expect("temp dir");
        let sink = LocalImageSink::new(ImagesConfig {
            path_buf: dir.path().join("nested"),
            ..Default::default()
        });

        let mut camera = camera();
        camera.set_image(CameraImage::placeholder(Placeholder::NotFound));

        let path = sink.save(&camera).await.expect("image saves");
        assert_eq!(path, dir.path().join("nested").join("camera-12.png"));

        let written = image::open(&path).expect("written file is a png");
        assert_eq!(written.width(), Placeholder::NotFound.image().width());
    }

    #[tokio::test]
    async fn test_save_without_image_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let sink = LocalImageSink::new(ImagesConfig {
            path_buf: dir.path().to_path_buf(),
            ..Default::default()
        });

        assert!(matches!(
            sink.save(&camera()).await,
            Err(Error::General(_))
        ));
    }
}
