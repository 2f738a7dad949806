// Re-projection of circuit coordinates into the reference on-screen orientation

use log::debug;
use serde::Serialize;

use super::types::{CornerAnnotation, Point2D, TrackGeometry};

/// Default distance between a corner apex and its label, in provider units
pub const DEFAULT_LABEL_OFFSET: f64 = 500.0;

/// Rotate a point about the origin, applying `[[cos, sin], [-sin, cos]]` to the row vector `[x, y]`
pub fn rotate(point: Point2D, angle_rad: f64) -> Point2D {
    let (sin, cos) = angle_rad.sin_cos();
    Point2D::new(point.x * cos - point.y * sin, point.x * sin + point.y * cos)
}

/// Bounding box of projected coordinates, used by renderers to size the canvas
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Smallest box containing every point, None when there are no points
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point2D>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        for point in points {
            bounds.update(*point);
        }
        Some(bounds)
    }

    pub fn update(&mut self, point: Point2D) {
        self.min_x = self.min_x.min(point.x);
        self.max_x = self.max_x.max(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_y = self.max_y.max(point.y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Corner marker after projection: a short line from the apex to the label anchor
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProjectedCorner {
    /// Display label such as "1" or "1A"
    pub label: String,
    pub number: u32,
    pub letter: String,
    /// Corner apex on the track
    pub track_point: Point2D,
    /// Where the label is drawn
    pub label_point: Point2D,
}

/// Track map in reference orientation
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct ProjectedTrack {
    pub centerline: Vec<Point2D>,
    pub corners: Vec<ProjectedCorner>,
    /// Extent of centerline and labels, None for an empty geometry
    pub bounds: Option<BoundingBox>,
}

/// Rotates raw circuit geometry so every track renders the same way up
#[derive(Debug, Clone, Copy)]
pub struct TrackProjector {
    label_offset: f64,
}

impl Default for TrackProjector {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL_OFFSET)
    }
}

impl TrackProjector {
    pub fn new(label_offset: f64) -> Self {
        Self { label_offset }
    }

    /// Project centerline and corner markers with the geometry's own rotation
    pub fn project(&self, geometry: &TrackGeometry) -> ProjectedTrack {
        let angle_rad = geometry.rotation_deg.to_radians();

        let centerline = geometry
            .centerline
            .iter()
            .map(|point| rotate(*point, angle_rad))
            .collect::<Vec<_>>();
        let corners = geometry
            .corners
            .iter()
            .map(|corner| self.project_corner(corner, angle_rad))
            .collect::<Vec<_>>();

        let bounds = BoundingBox::from_points(
            centerline
                .iter()
                .chain(corners.iter().map(|corner| &corner.label_point)),
        );

        debug!(
            "Projected {} centerline points and {} corners by {} degrees",
            centerline.len(),
            corners.len(),
            geometry.rotation_deg
        );

        ProjectedTrack {
            centerline,
            corners,
            bounds,
        }
    }

    fn project_corner(&self, corner: &CornerAnnotation, track_angle_rad: f64) -> ProjectedCorner {
        // The label is pushed out from the apex along the corner's own angle, in the raw frame
        let offset = rotate(
            Point2D::new(self.label_offset, 0.0),
            corner.angle_deg.to_radians(),
        );
        let apex = corner.position();
        let label_anchor = Point2D::new(apex.x + offset.x, apex.y + offset.y);

        ProjectedCorner {
            label: corner.label(),
            number: corner.number,
            letter: corner.letter.clone(),
            track_point: rotate(apex, track_angle_rad),
            label_point: rotate(label_anchor, track_angle_rad),
        }
    }
}
