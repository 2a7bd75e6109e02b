/// Mean earth radius in statute miles.
const EARTH_RADIUS_MILES: f64 = 3958.8;

const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A lat/long rectangle scoping a camera search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    top: f64,
    bottom: f64,
    left: f64,
    right: f64,
}

impl BoundingBox {
    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    /// Simple midpoint of the box. Results are ranked by distance from here.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.top + self.bottom) / 2.0,
            (self.left + self.right) / 2.0,
        )
    }
}

/// Great-circle distance in miles between two points, using the haversine
/// formula.
///
/// # Example
///
/// ```
/// use traffic_cam_client::geo::{GeoPoint, distance_miles};
///
/// // One degree of latitude is roughly 69 miles
/// let dist = distance_miles(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0));
/// assert!((dist - 69.1).abs() < 0.5);
/// ```
pub fn distance_miles(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1_rad = from.latitude * DEG_TO_RAD;
    let lat2_rad = to.latitude * DEG_TO_RAD;
    let delta_lat = (to.latitude - from.latitude) * DEG_TO_RAD;
    let delta_lon = (to.longitude - from.longitude) * DEG_TO_RAD;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_MILES * c
}
