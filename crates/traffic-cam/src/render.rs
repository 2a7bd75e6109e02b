use std::fmt::Write;

use traffic_cam_client::models::Camera;

/// Plain-text listing of a ranked result set, one camera per line.
pub fn render_cameras(cameras: &[Camera], truncated: bool) -> String {
    if cameras.is_empty() {
        return "No cameras found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:>6}  {:>9}  {:>7}  {}",
        "#", "ID", "Miles", "Refresh", "Name"
    );

    for camera in cameras {
        let _ = writeln!(
            out,
            "{:>3}  {:>6}  {:>9.2}  {:>6}s  {} ({})",
            camera.display_label(),
            camera.id,
            camera.distance_from_center,
            camera.refresh_rate,
            camera.name,
            camera.orientation
        );
    }

    if truncated {
        let _ = writeln!(
            out,
            "Showing the {} closest cameras; more are available in this area.",
            cameras.len()
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(sequence: usize, id: i64, distance: f64, name: &str, orientation: &str) -> Camera {
        Camera {
            id,
            sequence,
            name: name.to_string(),
            orientation: orientation.to_string(),
            refresh_rate: 2,
            latitude: 0.0,
            longitude: 0.0,
            distance_from_center: distance,
            image: None,
            last_refresh: None,
        }
    }

    #[test]
    fn test_render_cameras() {
        let cameras = vec![
            camera(1, 1001, 0.42, "Main St & 1st Ave", "Traveling east"),
            camera(2, 87, 1.27, "K St NW", "Northbound"),
            camera(3, 204512, 12.88, "I-395 @ Exit 8", "Traveling south"),
        ];

        insta::assert_snapshot!(render_cameras(&cameras, true));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_cameras(&[], false), "No cameras found.\n");
    }
}
