use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

/// Change notifications for a UI bound to the client's result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CameraEvent {
    /// The whole collection was replaced by a query, successful or not.
    CamerasReplaced { count: usize, truncated: bool },
    /// An image (live or placeholder) was stamped onto a camera.
    ImageRefreshed { camera_id: i64 },
}

#[derive(Debug, Clone)]
pub struct CameraEvents {
    tx: broadcast::Sender<CameraEvent>,
}

impl Default for CameraEvents {
    fn default() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }
}

impl CameraEvents {
    pub fn subscribe(&self) -> broadcast::Receiver<CameraEvent> {
        self.tx.subscribe()
    }

    pub(crate) fn emit(&self, event: CameraEvent) {
        // No subscribers is fine
        let _ = self.tx.send(event);
    }
}
