use std::sync::Arc;

use reqwest::Url;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{
    config::ClientConfig,
    error::Result,
    events::{CameraEvent, CameraEvents},
    geo::BoundingBox,
    images::Placeholder,
    invoke::{ApiStatus, Auto, HttpTransport, ImageDecoder, ReqwestTransport, invoke_get},
    models::{Camera, CameraImage, CameraListRawResponse},
    projection::project_cameras,
};

pub mod config;
pub mod error;
pub mod events;
pub mod geo;
pub mod images;
pub mod invoke;
pub mod models;
pub mod projection;

const INVALID_KEY_MESSAGE: &str = "The API key is not valid for this request.";
const SERVER_ERROR_MESSAGE: &str =
    "The camera service reported an internal error. The problem is likely server-side; please try again later.";

/// Client for the traffic camera API. Owns the current, distance-ranked result
/// set; each query replaces it wholesale.
pub struct TrafficCamClient {
    transport: Arc<dyn HttpTransport>,
    config: ClientConfig,
    cameras: Vec<Camera>,
    truncated: bool,
    events: CameraEvents,
}

impl TrafficCamClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        TrafficCamClient {
            transport,
            config,
            cameras: Vec::new(),
            truncated: false,
            events: CameraEvents::default(),
        }
    }

    /// Cameras from the last query, closest first.
    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn camera(&self, camera_id: i64) -> Option<&Camera> {
        self.cameras.iter().find(|c| c.id == camera_id)
    }

    /// Whether the last query dropped cameras beyond its maximum.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CameraEvent> {
        self.events.subscribe()
    }

    /// Searches `bounding_box` and replaces the result set with the cameras
    /// found, ranked by distance from the box center and capped at
    /// `max_results` (0 for no cap).
    ///
    /// HTTP failures come back as an unsuccessful [`ApiStatus`]; `Err` means
    /// the endpoint URL could not be built from configuration.
    #[tracing::instrument(skip(self))]
    pub async fn get_cameras(
        &mut self,
        bounding_box: &BoundingBox,
        max_results: usize,
    ) -> Result<ApiStatus> {
        let url = self.cameras_url(bounding_box)?;

        let response = invoke_get(
            self.transport.as_ref(),
            url,
            &Auto::<CameraListRawResponse>::default(),
        )
        .await;

        let status = if response.status.success {
            self.truncated = project_cameras(
                response.payload.map(|r| r.cameras),
                &mut self.cameras,
                bounding_box.center(),
                max_results,
            );

            info!(
                count = self.cameras.len(),
                truncated = self.truncated,
                "Camera query complete"
            );
            response.status
        } else {
            self.cameras.clear();
            self.truncated = false;

            let status = explain_failure(response.status);
            warn!(
                status_code = ?status.status_code,
                detail = ?status.message,
                "Camera query failed"
            );
            status
        };

        self.events.emit(CameraEvent::CamerasReplaced {
            count: self.cameras.len(),
            truncated: self.truncated,
        });

        Ok(status)
    }

    /// Fetches the current image for `camera` and stamps it on.
    ///
    /// Always reports success: a 404 puts the "not found" placeholder in place
    /// and any other failure puts the "error" placeholder in place.
    #[tracing::instrument(skip(self, camera), fields(camera_id = camera.id))]
    pub async fn get_camera_image(&self, camera: &mut Camera) -> ApiStatus {
        let (image, status) = self.fetch_image(camera.id).await;
        camera.set_image(image);
        self.events.emit(CameraEvent::ImageRefreshed {
            camera_id: camera.id,
        });
        status
    }

    /// Same as [`Self::get_camera_image`] for a camera in the current result
    /// set. `None` if the last query did not return `camera_id`.
    pub async fn refresh_camera_image(&mut self, camera_id: i64) -> Option<ApiStatus> {
        let index = self.cameras.iter().position(|c| c.id == camera_id)?;

        let (image, status) = self.fetch_image(camera_id).await;
        self.cameras[index].set_image(image);
        self.events.emit(CameraEvent::ImageRefreshed { camera_id });

        Some(status)
    }

    async fn fetch_image(&self, camera_id: i64) -> (CameraImage, ApiStatus) {
        let url = match self.image_url(camera_id) {
            Ok(url) => url,
            Err(err) => {
                warn!(err = %err, camera_id, "Could not build image URL");
                return (
                    CameraImage::placeholder(Placeholder::Error),
                    placeholder_status(None, Placeholder::Error),
                );
            }
        };

        let decoder = ImageDecoder {
            format: self.config.image_format.into(),
        };
        let response = invoke_get(self.transport.as_ref(), url, &decoder).await;
        let status_code = response.status.status_code;

        match (response.payload, status_code) {
            (Some(image), _) => {
                debug!(camera_id, "Fetched camera image");
                (CameraImage::live(image), ApiStatus::ok(status_code))
            }
            (None, Some(404)) => {
                debug!(camera_id, "Camera image not found");
                (
                    CameraImage::placeholder(Placeholder::NotFound),
                    placeholder_status(status_code, Placeholder::NotFound),
                )
            }
            (None, _) => {
                warn!(camera_id, detail = ?response.status.message, "Camera image fetch failed");
                (
                    CameraImage::placeholder(Placeholder::Error),
                    placeholder_status(status_code, Placeholder::Error),
                )
            }
        }
    }

    fn cameras_url(&self, bounding_box: &BoundingBox) -> Result<Url> {
        let path = self
            .config
            .cameras_path
            .replace("{top}", &bounding_box.top().to_string())
            .replace("{bottom}", &bounding_box.bottom().to_string())
            .replace("{left}", &bounding_box.left().to_string())
            .replace("{right}", &bounding_box.right().to_string())
            .replace("{key}", &self.encoded_key());

        Ok(self.config.base_url.join(&path)?)
    }

    fn image_url(&self, camera_id: i64) -> Result<Url> {
        let path = self
            .config
            .image_path
            .replace("{id}", &camera_id.to_string())
            .replace("{key}", &self.encoded_key());

        Ok(self.config.base_url.join(&path)?)
    }

    fn encoded_key(&self) -> String {
        url::form_urlencoded::byte_serialize(self.config.api_key.as_bytes()).collect()
    }
}

/// Swaps the transport's generic message for one a user can act on, where we
/// have one.
fn explain_failure(status: ApiStatus) -> ApiStatus {
    match status.status_code {
        Some(403) => ApiStatus::failed(Some(403), INVALID_KEY_MESSAGE),
        Some(500) => ApiStatus::failed(Some(500), SERVER_ERROR_MESSAGE),
        _ => status,
    }
}

fn placeholder_status(status_code: Option<u16>, placeholder: Placeholder) -> ApiStatus {
    let message = match placeholder {
        Placeholder::NotFound => "Camera image not found; showing placeholder",
        Placeholder::Error => "Camera image unavailable; showing placeholder",
    };

    ApiStatus {
        success: true,
        status_code,
        message: Some(message.to_string()),
    }
}
