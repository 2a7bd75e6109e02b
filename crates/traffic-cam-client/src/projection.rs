use std::cmp::Ordering;

use crate::{
    geo::{GeoPoint, distance_miles},
    models::{Camera, RawCameraRecord},
};

const VERBOSE_ORIENTATION: &str = "Traffic closest to camera is t";

/// Shortens the API's verbose orientation phrasing, e.g. "Traffic closest to
/// camera is traveling north" becomes "Traveling north". Only the exact
/// substring is touched.
pub fn clean_orientation(orientation: &str) -> String {
    orientation.replace(VERBOSE_ORIENTATION, "T")
}

/// Replaces the contents of `target` with `records` ranked by distance from
/// `center`, keeping at most `max_results` entries (0 keeps everything).
///
/// Returns `true` when entries were dropped.
pub fn project_cameras(
    records: Option<Vec<RawCameraRecord>>,
    target: &mut Vec<Camera>,
    center: GeoPoint,
    max_results: usize,
) -> bool {
    let records = records.unwrap_or_default();
    target.clear();

    let mut cameras: Vec<Camera> = records
        .into_iter()
        .map(|record| Camera {
            distance_from_center: distance_miles(
                center,
                GeoPoint::new(record.latitude, record.longitude),
            ),
            id: record.id,
            sequence: 0,
            name: record.name,
            orientation: clean_orientation(&record.orientation),
            refresh_rate: record.refresh_rate,
            latitude: record.latitude,
            longitude: record.longitude,
            image: None,
            last_refresh: None,
        })
        .collect();

    // Unplottable cameras (NaN distance, whatever its sign) rank last, in API order.
    cameras.sort_by(|a, b| {
        let (a, b) = (a.distance_from_center, b.distance_from_center);
        a.is_nan()
            .cmp(&b.is_nan())
            .then_with(|| a.partial_cmp(&b).unwrap_or(Ordering::Equal))
    });

    let truncated = max_results > 0 && cameras.len() > max_results;
    if truncated {
        cameras.truncate(max_results);
    }

    target.extend(cameras.into_iter().enumerate().map(|(index, mut camera)| {
        camera.sequence = index + 1;
        camera
    }));

    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::BoundingBox;

    fn record(id: i64, latitude: f64, longitude: f64) -> RawCameraRecord {
        RawCameraRecord {
            id,
            name: format!("Camera {id}"),
            orientation: "Traffic closest to camera is traveling south".to_string(),
            temporarily_disabled: false,
            refresh_rate: 2,
            city_code: None,
            provider_code: None,
            zip: None,
            latitude,
            longitude,
        }
    }

    fn ids(cameras: &[Camera]) -> Vec<i64> {
        cameras.iter().map(|c| c.id).collect()
    }

    fn sequences(cameras: &[Camera]) -> Vec<usize> {
        cameras.iter().map(|c| c.sequence).collect()
    }

    #[test]
    fn test_unlimited_keeps_all_sorted() {
        let center = GeoPoint::new(5.0, 5.0);
        let records = vec![
            record(1, 5.0, 7.0),
            record(2, 5.0, 5.5),
            record(3, 8.0, 5.0),
            record(4, 5.2, 5.0),
        ];

        let mut target = Vec::new();
        let truncated = project_cameras(Some(records), &mut target, center, 0);

        assert!(!truncated);
        assert_eq!(ids(&target), vec![4, 2, 1, 3]);
        assert_eq!(sequences(&target), vec![1, 2, 3, 4]);
        assert!(
            target
                .windows(2)
                .all(|w| w[0].distance_from_center <= w[1].distance_from_center)
        );
    }

    #[test]
    fn test_truncates_to_closest() {
        // Three cameras ranked 5, 1, 9 by distance from (5, 5)
        let bbox = BoundingBox::new(10.0, 0.0, 0.0, 10.0);
        let records = vec![
            record(5, 5.0, 5.5),
            record(1, 5.0, 5.1),
            record(9, 5.0, 5.9),
        ];

        let mut target = Vec::new();
        let truncated = project_cameras(Some(records), &mut target, bbox.center(), 2);

        assert!(truncated);
        assert_eq!(ids(&target), vec![1, 5]);
        assert_eq!(sequences(&target), vec![1, 2]);
    }

    #[test]
    fn test_max_results_at_or_above_count_is_not_truncated() {
        let center = GeoPoint::new(0.0, 0.0);
        let records = vec![record(1, 0.1, 0.0), record(2, 0.2, 0.0)];

        let mut target = Vec::new();
        assert!(!project_cameras(
            Some(records.clone()),
            &mut target,
            center,
            2
        ));
        assert_eq!(target.len(), 2);

        assert!(!project_cameras(Some(records), &mut target, center, 10));
        assert_eq!(target.len(), 2);
    }

    #[test]
    fn test_empty_or_absent_clears_previous_results() {
        let center = GeoPoint::new(0.0, 0.0);
        let mut target = Vec::new();
        project_cameras(
            Some(vec![record(1, 0.1, 0.0), record(2, 0.2, 0.0)]),
            &mut target,
            center,
            1,
        );
        assert_eq!(target.len(), 1);

        assert!(!project_cameras(None, &mut target, center, 1));
        assert!(target.is_empty());

        project_cameras(Some(vec![record(3, 0.1, 0.0)]), &mut target, center, 0);
        assert!(!project_cameras(Some(Vec::new()), &mut target, center, 0));
        assert!(target.is_empty());
    }

    #[test]
    fn test_projection_copies_fields() {
        let center = GeoPoint::new(0.0, 0.0);
        let mut raw = record(7, 0.5, -0.5);
        raw.refresh_rate = 15;

        let mut target = Vec::new();
        project_cameras(Some(vec![raw]), &mut target, center, 0);

        let camera = &target[0];
        assert_eq!(camera.id, 7);
        assert_eq!(camera.name, "Camera 7");
        assert_eq!(camera.orientation, "Traveling south");
        assert_eq!(camera.refresh_rate, 15);
        assert_eq!((camera.latitude, camera.longitude), (0.5, -0.5));
        assert_eq!(
            camera.distance_from_center,
            distance_miles(center, GeoPoint::new(0.5, -0.5))
        );
        assert!(camera.image.is_none());
        assert!(camera.last_refresh.is_none());
    }

    #[test]
    fn test_nan_distances_rank_last() {
        let center = GeoPoint::new(0.0, 0.0);
        let records = vec![
            record(1, 0.1, 0.0),
            record(2, -f64::NAN, 0.0),
            record(3, f64::NAN, 0.0),
            record(4, 0.05, 0.0),
        ];

        let mut target = Vec::new();
        project_cameras(Some(records), &mut target, center, 0);

        assert_eq!(ids(&target), vec![4, 1, 2, 3]);
        assert_eq!(sequences(&target), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_clean_orientation() {
        assert_eq!(
            clean_orientation("Traffic closest to camera is traveling north"),
            "Traveling north"
        );
        assert_eq!(clean_orientation("Northbound"), "Northbound");
        // Case differs, so no substitution
        assert_eq!(
            clean_orientation("traffic closest to camera is traveling north"),
            "traffic closest to camera is traveling north"
        );
        assert_eq!(clean_orientation(""), "");
    }
}
