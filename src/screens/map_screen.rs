use crate::entities::polygon;
use crate::errors::AppError;
use crate::live::LiveQuery;
use crate::map::{
    shape_overlays, Coordinate, MapEvent, MarkerOverlay, ShapeOverlay, MIN_POLYGON_VERTICES,
};
use crate::repositories::{PolygonRepository, PolygonStyle};
use crate::utils::color::{PREVIEW_FILL_COLOR, PREVIEW_STROKE_COLOR};

/// Home screen: saved shapes on the map plus the shape being drawn.
#[derive(Debug)]
pub struct MapScreen {
    polygons: PolygonRepository,
    saved: LiveQuery<polygon::Model>,
    style: PolygonStyle,
    drawing: bool,
    vertices: Vec<Coordinate>,
}

impl MapScreen {
    /// Subscribe to visible polygons.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial live queries cannot be loaded.
    pub async fn open(polygons: PolygonRepository) -> Result<Self, AppError> {
        let saved = polygons.observe_visible().await?;
        Ok(Self {
            polygons,
            saved,
            style: PolygonStyle::default(),
            drawing: false,
            vertices: Vec::new(),
        })
    }

    /// Style applied to shapes committed from now on.
    #[must_use]
    pub fn with_style(mut self, style: PolygonStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub const fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Vertices tapped so far.
    #[must_use]
    pub fn in_progress(&self) -> &[Coordinate] {
        &self.vertices
    }

    /// Latest saved polygons.
    #[must_use]
    pub fn saved_polygons(&self) -> Vec<polygon::Model> {
        self.saved.current()
    }

    /// Live handle to the saved polygons, for waiting on refreshes.
    pub fn saved_mut(&mut self) -> &mut LiveQuery<polygon::Model> {
        &mut self.saved
    }

    /// React to map input.
    ///
    /// Taps add a vertex while drawing. Clicking a saved shape outside drawing
    /// mode deletes it.
    ///
    /// # Errors
    ///
    /// Returns an error if deleting a clicked shape fails.
    pub async fn handle(&mut self, event: MapEvent) -> Result<(), AppError> {
        match event {
            MapEvent::Tap(point) if self.drawing => {
                self.vertices.push(point);
                tracing::debug!(
                    latitude = point.latitude,
                    longitude = point.longitude,
                    count = self.vertices.len(),
                    "vertex added"
                );
                Ok(())
            }
            MapEvent::Tap(_) => Ok(()),
            MapEvent::ShapeClicked(id) if !self.drawing => self.polygons.delete(id).await,
            MapEvent::ShapeClicked(_) => Ok(()),
        }
    }

    /// Toggle drawing mode.
    ///
    /// Leaving drawing mode with at least three vertices saves the shape and
    /// clears the in-progress list; the new polygon id is returned. With fewer
    /// vertices nothing is saved and the points are kept for the next round.
    ///
    /// # Errors
    ///
    /// Returns an error if the finished shape cannot be saved.
    pub async fn toggle_drawing(&mut self) -> Result<Option<i64>, AppError> {
        self.drawing = !self.drawing;
        if self.drawing || self.vertices.len() < MIN_POLYGON_VERTICES {
            return Ok(None);
        }

        let id = self.polygons.save(&self.vertices, None, &self.style).await?;
        self.vertices.clear();
        Ok(Some(id))
    }

    /// Shapes to draw: saved polygons, then the in-progress preview.
    #[must_use]
    pub fn shapes(&self) -> Vec<ShapeOverlay> {
        let mut shapes = shape_overlays(&self.saved.current());
        if self.vertices.len() >= MIN_POLYGON_VERTICES {
            shapes.push(ShapeOverlay {
                polygon_id: None,
                vertices: self.vertices.clone(),
                fill_color: PREVIEW_FILL_COLOR.to_string(),
                stroke_color: PREVIEW_STROKE_COLOR.to_string(),
                stroke_width: 3.0,
                opacity: 0.3,
            });
        }
        shapes
    }

    /// One marker per in-progress vertex.
    #[must_use]
    pub fn markers(&self) -> Vec<MarkerOverlay> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(index, position)| MarkerOverlay {
                position: *position,
                title: format!("Vertex {}", index + 1),
            })
            .collect()
    }

    /// Banner shown while drawing.
    #[must_use]
    pub fn status_text(&self) -> Option<String> {
        self.drawing.then(|| {
            format!(
                "Drawing Mode - Tap map to add vertices ({} points)",
                self.vertices.len()
            )
        })
    }
}
