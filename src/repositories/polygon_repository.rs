use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use crate::db::Store;
use crate::entities::polygon;
use crate::errors::AppError;
use crate::live::{LiveQuery, Table};
use crate::map::{Coordinate, MIN_POLYGON_VERTICES};
use crate::utils::color::{normalize_hex_color, DEFAULT_FILL_COLOR, DEFAULT_STROKE_COLOR};
use crate::utils::{is_hex_color, now_millis};

/// Rendering style stored with a polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonStyle {
    pub fill_color: String,
    pub stroke_color: String,
    pub stroke_width: f32,
    pub fill_alpha: f32,
}

impl Default for PolygonStyle {
    fn default() -> Self {
        Self {
            fill_color: DEFAULT_FILL_COLOR.to_string(),
            stroke_color: DEFAULT_STROKE_COLOR.to_string(),
            stroke_width: 3.0,
            fill_alpha: 0.3,
        }
    }
}

impl PolygonStyle {
    fn validate(&self) -> Result<(), AppError> {
        validate_colors(&self.fill_color, &self.stroke_color)?;
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(AppError::Validation(
                "Stroke width must be a non-negative number".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.fill_alpha) {
            return Err(AppError::Validation(
                "Fill opacity must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_colors(fill_color: &str, stroke_color: &str) -> Result<(), AppError> {
    for color in [fill_color, stroke_color] {
        if !is_hex_color(color.trim()) {
            return Err(AppError::Validation(format!(
                "Invalid color {color:?}, expected #RRGGBB or #AARRGGBB"
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct PolygonRepository {
    store: Store,
}

impl PolygonRepository {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Visible polygons in creation order, kept current.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn observe_visible(&self) -> Result<LiveQuery<polygon::Model>, AppError> {
        self.store
            .observe(&[Table::Polygons], |db| async move {
                polygon::Entity::find()
                    .filter(polygon::Column::IsVisible.eq(true))
                    .order_by_asc(polygon::Column::CreatedAt)
                    .order_by_asc(polygon::Column::Id)
                    .all(&db)
                    .await
            })
            .await
    }

    /// All polygons, hidden ones included, in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn observe_all(&self) -> Result<LiveQuery<polygon::Model>, AppError> {
        self.store
            .observe(&[Table::Polygons], |db| async move {
                polygon::Entity::find()
                    .order_by_asc(polygon::Column::CreatedAt)
                    .order_by_asc(polygon::Column::Id)
                    .all(&db)
                    .await
            })
            .await
    }

    /// Visible polygons in creation order, as a one-off read.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails.
    pub async fn list_visible(&self) -> Result<Vec<polygon::Model>, AppError> {
        Ok(polygon::Entity::find()
            .filter(polygon::Column::IsVisible.eq(true))
            .order_by_asc(polygon::Column::CreatedAt)
            .order_by_asc(polygon::Column::Id)
            .all(self.store.db())
            .await?)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<polygon::Model>, AppError> {
        Ok(polygon::Entity::find_by_id(id)
            .one(self.store.db())
            .await?)
    }

    /// Persist a closed shape and return its id.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidPolygon`] for fewer than three vertices
    /// - [`AppError::Validation`] for out-of-range coordinates or a bad style
    pub async fn save(
        &self,
        vertices: &[Coordinate],
        name: Option<&str>,
        style: &PolygonStyle,
    ) -> Result<i64, AppError> {
        if vertices.len() < MIN_POLYGON_VERTICES {
            return Err(AppError::InvalidPolygon {
                vertices: vertices.len(),
            });
        }
        if let Some(bad) = vertices.iter().find(|v| !v.is_valid()) {
            return Err(AppError::Validation(format!(
                "Coordinate out of range: {}, {}",
                bad.latitude, bad.longitude
            )));
        }
        style.validate()?;

        let coordinates = Self::serialize_coordinates(vertices)?;
        let now = now_millis();
        let name = name.map(str::trim).filter(|n| !n.is_empty());

        let polygon = polygon::ActiveModel {
            name: Set(name.map(str::to_string)),
            coordinates: Set(coordinates),
            fill_color: Set(normalize_hex_color(&style.fill_color)),
            stroke_color: Set(normalize_hex_color(&style.stroke_color)),
            stroke_width: Set(style.stroke_width),
            fill_alpha: Set(style.fill_alpha),
            is_visible: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let id = polygon::Entity::insert(polygon)
            .exec(self.store.db())
            .await?
            .last_insert_id;

        tracing::debug!(id, vertices = vertices.len(), "polygon saved");
        self.store.notify(&[Table::Polygons]);
        Ok(id)
    }

    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown id.
    pub async fn set_visibility(&self, id: i64, visible: bool) -> Result<(), AppError> {
        let result = polygon::Entity::update_many()
            .col_expr(polygon::Column::IsVisible, Expr::value(visible))
            .filter(polygon::Column::Id.eq(id))
            .exec(self.store.db())
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound { entity: "polygon", id });
        }
        self.store.notify(&[Table::Polygons]);
        Ok(())
    }

    /// Recolor a polygon and bump its `updated_at`.
    ///
    /// # Errors
    ///
    /// [`AppError::Validation`] for a color that is not hex, [`AppError::NotFound`]
    /// for an unknown id.
    pub async fn update_colors(
        &self,
        id: i64,
        fill_color: &str,
        stroke_color: &str,
    ) -> Result<(), AppError> {
        validate_colors(fill_color, stroke_color)?;

        let result = polygon::Entity::update_many()
            .col_expr(
                polygon::Column::FillColor,
                Expr::value(normalize_hex_color(fill_color)),
            )
            .col_expr(
                polygon::Column::StrokeColor,
                Expr::value(normalize_hex_color(stroke_color)),
            )
            .col_expr(polygon::Column::UpdatedAt, Expr::value(now_millis()))
            .filter(polygon::Column::Id.eq(id))
            .exec(self.store.db())
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound { entity: "polygon", id });
        }
        self.store.notify(&[Table::Polygons]);
        Ok(())
    }

    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown id.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = polygon::Entity::delete_by_id(id)
            .exec(self.store.db())
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound { entity: "polygon", id });
        }
        tracing::debug!(id, "polygon deleted");
        self.store.notify(&[Table::Polygons]);
        Ok(())
    }

    /// Remove every polygon; returns how many were deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the delete fails.
    pub async fn delete_all(&self) -> Result<u64, AppError> {
        let removed = polygon::Entity::delete_many()
            .exec(self.store.db())
            .await?
            .rows_affected;
        if removed > 0 {
            self.store.notify(&[Table::Polygons]);
        }
        Ok(removed)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails.
    pub async fn visible_count(&self) -> Result<u64, AppError> {
        Ok(polygon::Entity::find()
            .filter(polygon::Column::IsVisible.eq(true))
            .count(self.store.db())
            .await?)
    }

    /// Decode a stored vertex list. Malformed text yields an empty list.
    #[must_use]
    pub fn parse_coordinates(text: &str) -> Vec<Coordinate> {
        serde_json::from_str(text).unwrap_or_default()
    }

    /// Encode a vertex list as a JSON array of `{latitude, longitude}` objects.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if encoding fails.
    pub fn serialize_coordinates(vertices: &[Coordinate]) -> Result<String, AppError> {
        serde_json::to_string(vertices)
            .map_err(|e| AppError::Internal(format!("Failed to serialize coordinates: {e}")))
    }
}
