//! Map rendering boundary: what the host map draws and what it reports back.

use serde::{Deserialize, Serialize};

use crate::entities::polygon;
use crate::repositories::PolygonRepository;

/// Fewest vertices that make a drawable, storable polygon.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// A WGS84 latitude/longitude pair.
///
/// Serialized as `{"latitude": .., "longitude": ..}`; extra fields are ignored on read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and within latitude/longitude ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// One filled shape for the map to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeOverlay {
    /// `None` for the shape still being drawn
    pub polygon_id: Option<i64>,
    pub vertices: Vec<Coordinate>,
    pub fill_color: String,
    pub stroke_color: String,
    pub stroke_width: f32,
    pub opacity: f32,
}

/// A point marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerOverlay {
    pub position: Coordinate,
    pub title: String,
}

/// Input reported by the map host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    Tap(Coordinate),
    ShapeClicked(i64),
}

impl ShapeOverlay {
    /// Build the overlay for a stored polygon, or `None` if its vertex list is
    /// unreadable or too short to draw.
    #[must_use]
    pub fn from_polygon(polygon: &polygon::Model) -> Option<Self> {
        let vertices = PolygonRepository::parse_coordinates(&polygon.coordinates);
        if vertices.len() < MIN_POLYGON_VERTICES {
            return None;
        }
        Some(Self {
            polygon_id: Some(polygon.id),
            vertices,
            fill_color: polygon.fill_color.clone(),
            stroke_color: polygon.stroke_color.clone(),
            stroke_width: polygon.stroke_width,
            opacity: polygon.fill_alpha,
        })
    }
}

/// Overlays for every drawable polygon, in the given order.
#[must_use]
pub fn shape_overlays(polygons: &[polygon::Model]) -> Vec<ShapeOverlay> {
    polygons.iter().filter_map(ShapeOverlay::from_polygon).collect()
}
