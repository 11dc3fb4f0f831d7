use serde::{Deserialize, Serialize};

/// A `(longitude, latitude)` pair, GeoJSON order.
pub type LonLat = (f64, f64);

/// Corners of the Greater London bounding box.
pub const GREATER_LONDON: [LonLat; 4] = [
    (-0.5103, 51.2868),
    (0.3340, 51.2868),
    (0.3340, 51.6923),
    (-0.5103, 51.6923),
];

const EDGE_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

/// Polygon used to geofence submissions.
///
/// Containment is inclusive: a point lying exactly on an edge or corner is
/// inside. Everything else is decided by even-odd ray casting.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Region {
    corners: Vec<LonLat>,
}

impl Region {
    pub fn new(corners: Vec<LonLat>) -> Self {
        Self { corners }
    }

    pub fn greater_london() -> Self {
        Self::new(GREATER_LONDON.to_vec())
    }

    pub fn corners(&self) -> &[LonLat] {
        &self.corners
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        if !lat.is_finite() || !lon.is_finite() || self.corners.len() < 3 {
            return false;
        }

        let point = (lon, lat);
        if self.edges().any(|(a, b)| on_segment(point, a, b)) {
            return true;
        }

        let mut inside = false;
        for ((x1, y1), (x2, y2)) in self.edges() {
            if (y1 > lat) != (y2 > lat) {
                let x_cross = x1 + (lat - y1) * (x2 - x1) / (y2 - y1);
                if lon < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox {
            min_lon: f64::INFINITY,
            min_lat: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
            max_lat: f64::NEG_INFINITY,
        };
        for &(lon, lat) in &self.corners {
            bbox.min_lon = bbox.min_lon.min(lon);
            bbox.max_lon = bbox.max_lon.max(lon);
            bbox.min_lat = bbox.min_lat.min(lat);
            bbox.max_lat = bbox.max_lat.max(lat);
        }
        bbox
    }

    fn edges(&self) -> impl Iterator<Item = (LonLat, LonLat)> + '_ {
        self.corners
            .iter()
            .copied()
            .zip(self.corners.iter().copied().cycle().skip(1))
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::greater_london()
    }
}

fn on_segment(p: LonLat, a: LonLat, b: LonLat) -> bool {
    let cross = (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0);
    if cross.abs() > EDGE_TOLERANCE {
        return false;
    }
    let within_x = p.0 >= a.0.min(b.0) - EDGE_TOLERANCE && p.0 <= a.0.max(b.0) + EDGE_TOLERANCE;
    let within_y = p.1 >= a.1.min(b.1) - EDGE_TOLERANCE && p.1 <= a.1.max(b.1) + EDGE_TOLERANCE;
    within_x && within_y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn central_london_is_inside() {
        let london = Region::greater_london();
        assert!(london.contains(51.5074, -0.1278));
        assert!(london.contains(51.586, -0.071));
    }

    #[test]
    fn outside_points_are_rejected() {
        let london = Region::greater_london();
        assert!(!london.contains(52.0, -0.1278));
        assert!(!london.contains(51.5, 1.0));
        assert!(!london.contains(48.8566, 2.3522));
        assert!(!london.contains(f64::NAN, -0.1));
    }

    #[test]
    fn boundary_is_inclusive() {
        let london = Region::greater_london();
        // corners
        assert!(london.contains(51.2868, -0.5103));
        assert!(london.contains(51.6923, 0.3340));
        // edges
        assert!(london.contains(51.2868, 0.0));
        assert!(london.contains(51.6923, 0.0));
        assert!(london.contains(51.5, -0.5103));
        assert!(london.contains(51.5, 0.3340));
        // just past an edge
        assert!(!london.contains(51.6924, 0.0));
    }

    #[test]
    fn non_rectangular_polygon() {
        let triangle = Region::new(vec![(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        assert!(triangle.contains(2.0, 2.0));
        assert!(triangle.contains(5.0, 5.0));
        assert!(!triangle.contains(6.0, 6.0));
    }

    #[test]
    fn degenerate_region_contains_nothing() {
        let line = Region::new(vec![(0.0, 0.0), (1.0, 1.0)]);
        assert!(!line.contains(0.5, 0.5));
    }

    #[test]
    fn bounding_box_spans_corners() {
        let bbox = Region::greater_london().bounding_box();
        assert_eq!(bbox.min_lon, -0.5103);
        assert_eq!(bbox.max_lon, 0.3340);
        assert_eq!(bbox.min_lat, 51.2868);
        assert_eq!(bbox.max_lat, 51.6923);
    }
}
