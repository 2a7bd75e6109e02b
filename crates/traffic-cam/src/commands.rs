use futures_util::{StreamExt, stream};
use tracing::{info, warn};
use traffic_cam_client::{TrafficCamClient, geo::BoundingBox, invoke::ApiStatus};

use crate::{Error, Result, render::render_cameras, sink::ImageSink};

/// Runs a query and prints the ranked list. With a sink, every listed camera's
/// image is fetched and saved as well, with at most `parallel_fetches` image
/// requests in flight.
pub async fn list_cameras(
    client: &mut TrafficCamClient,
    bounding_box: BoundingBox,
    max_results: usize,
    sink: Option<&dyn ImageSink>,
    parallel_fetches: usize,
) -> Result<()> {
    query(client, &bounding_box, max_results).await?;
    print!("{}", render_cameras(client.cameras(), client.truncated()));

    let Some(sink) = sink else {
        return Ok(());
    };

    let client = &*client;
    let results: Vec<_> = stream::iter(client.cameras().to_vec())
        .map(|mut camera| async move {
            client.get_camera_image(&mut camera).await;
            let result = sink.save(&camera).await;
            (camera.id, result)
        })
        .buffer_unordered(parallel_fetches.max(1))
        .collect()
        .await;

    for (camera_id, result) in results {
        if let Err(err) = result {
            warn!(camera_id, err = ?err, "Failed to save camera image");
        }
    }

    Ok(())
}

/// Queries the box, then fetches and saves the image of `camera_id`.
pub async fn snapshot(
    client: &mut TrafficCamClient,
    bounding_box: BoundingBox,
    camera_id: i64,
    sink: &dyn ImageSink,
) -> Result<()> {
    query(client, &bounding_box, 0).await?;

    let status = client
        .refresh_camera_image(camera_id)
        .await
        .ok_or_else(|| Error::General(format!("Camera {camera_id} is not in this area")))?;

    if let Some(message) = &status.message {
        info!(camera_id, detail = %message, "Image fetched");
    }

    let camera = client
        .camera(camera_id)
        .ok_or_else(|| Error::General(format!("Camera {camera_id} is not in this area")))?;
    let path = sink.save(camera).await?;
    println!("{}", path.display());

    Ok(())
}

async fn query(
    client: &mut TrafficCamClient,
    bounding_box: &BoundingBox,
    max_results: usize,
) -> Result<ApiStatus> {
    let status = client.get_cameras(bounding_box, max_results).await?;

    if !status.success {
        let message = status
            .message
            .clone()
            .unwrap_or_else(|| "Camera query failed".to_string());
        return Err(Error::Api(message));
    }

    Ok(status)
}
