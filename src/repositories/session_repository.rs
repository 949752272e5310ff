use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};

use crate::db::Store;
use crate::entities::{battle_session, grid_position, Difficulty, EntityKind};
use crate::errors::AppError;
use crate::live::{LiveQuery, Table};
use crate::utils::now_millis;

/// Parameters for starting a session.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub map_data: Option<String>,
    pub player_count: i32,
    pub difficulty: Difficulty,
}

impl NewSession {
    #[must_use]
    pub fn new(user_id: i64, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            description: None,
            map_data: None,
            player_count: 1,
            difficulty: Difficulty::default(),
        }
    }
}

/// Partial update of a session's details.
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    pub map_data: Option<Option<String>>,
    pub player_count: Option<i32>,
    pub difficulty: Option<Difficulty>,
}

/// Parameters for placing a token on the grid.
#[derive(Debug, Clone)]
pub struct NewPosition {
    pub session_id: i64,
    pub entity_name: String,
    pub entity_type: EntityKind,
    pub x: i32,
    pub y: i32,
    pub health: i32,
    pub max_health: i32,
    pub notes: Option<String>,
}

impl NewPosition {
    #[must_use]
    pub fn new(session_id: i64, name: impl Into<String>, kind: EntityKind, x: i32, y: i32) -> Self {
        Self {
            session_id,
            entity_name: name.into(),
            entity_type: kind,
            x,
            y,
            health: 100,
            max_health: 100,
            notes: None,
        }
    }

    fn into_active_model(self, now: i64) -> Result<grid_position::ActiveModel, AppError> {
        if self.entity_name.trim().is_empty() {
            return Err(AppError::Validation("Entity name is required".to_string()));
        }
        if self.max_health < 1 {
            return Err(AppError::Validation(
                "Max health must be at least 1".to_string(),
            ));
        }

        Ok(grid_position::ActiveModel {
            session_id: Set(self.session_id),
            entity_name: Set(self.entity_name.trim().to_string()),
            entity_type: Set(self.entity_type),
            x_position: Set(self.x),
            y_position: Set(self.y),
            health: Set(self.health.clamp(0, self.max_health)),
            max_health: Set(self.max_health),
            is_active: Set(true),
            notes: Set(self.notes),
            updated_at: Set(now),
            ..Default::default()
        })
    }
}

/// Partial update of a token. Health is clamped to `0..=max_health` after the
/// other fields are applied.
#[derive(Debug, Clone, Default)]
pub struct PositionUpdate {
    pub entity_name: Option<String>,
    pub health: Option<i32>,
    pub max_health: Option<i32>,
    /// `Some(None)` clears the notes
    pub notes: Option<Option<String>>,
}

/// Sessions and the grid positions that belong to them.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    store: Store,
}

impl SessionRepository {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    // ============ Sessions ============

    /// A user's sessions, most recently started first.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn observe_for_user(
        &self,
        user_id: i64,
    ) -> Result<LiveQuery<battle_session::Model>, AppError> {
        self.store
            .observe(&[Table::Sessions], move |db| async move {
                battle_session::Entity::find()
                    .filter(battle_session::Column::UserId.eq(user_id))
                    .order_by_desc(battle_session::Column::StartTime)
                    .order_by_desc(battle_session::Column::Id)
                    .all(&db)
                    .await
            })
            .await
    }

    /// A user's sessions that have not been completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn observe_active(
        &self,
        user_id: i64,
    ) -> Result<LiveQuery<battle_session::Model>, AppError> {
        self.store
            .observe(&[Table::Sessions], move |db| async move {
                battle_session::Entity::find()
                    .filter(battle_session::Column::UserId.eq(user_id))
                    .filter(battle_session::Column::IsCompleted.eq(false))
                    .order_by_desc(battle_session::Column::StartTime)
                    .all(&db)
                    .await
            })
            .await
    }

    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<battle_session::Model>, AppError> {
        Ok(battle_session::Entity::find_by_id(id)
            .one(self.store.db())
            .await?)
    }

    /// Start a session now and return its id.
    ///
    /// # Errors
    ///
    /// [`AppError::Validation`] for an empty name or a player count below 1;
    /// [`AppError::Database`] if the owner does not exist.
    pub async fn start(&self, session: NewSession) -> Result<i64, AppError> {
        let name = session.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Session name is required".to_string()));
        }
        if session.player_count < 1 {
            return Err(AppError::Validation(
                "A session needs at least one player".to_string(),
            ));
        }

        let model = battle_session::ActiveModel {
            user_id: Set(session.user_id),
            name: Set(name.to_string()),
            description: Set(session.description),
            map_data: Set(session.map_data),
            start_time: Set(now_millis()),
            end_time: Set(None),
            is_completed: Set(false),
            player_count: Set(session.player_count),
            difficulty: Set(session.difficulty),
            ..Default::default()
        };

        let id = battle_session::Entity::insert(model)
            .exec(self.store.db())
            .await?
            .last_insert_id;

        tracing::debug!(id, user_id = session.user_id, "session started");
        self.store.notify(&[Table::Sessions]);
        Ok(id)
    }

    /// Apply the set fields of `update` and return the stored session.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown id, [`AppError::Validation`] for an
    /// empty name or a player count below 1.
    pub async fn update_session(
        &self,
        id: i64,
        update: SessionUpdate,
    ) -> Result<battle_session::Model, AppError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound { entity: "session", id })?;

        let mut active = existing.into_active_model();
        if let Some(name) = update.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Validation("Session name is required".to_string()));
            }
            active.name = Set(name.to_string());
        }
        if let Some(description) = update.description {
            active.description = Set(description);
        }
        if let Some(map_data) = update.map_data {
            active.map_data = Set(map_data);
        }
        if let Some(player_count) = update.player_count {
            if player_count < 1 {
                return Err(AppError::Validation(
                    "A session needs at least one player".to_string(),
                ));
            }
            active.player_count = Set(player_count);
        }
        if let Some(difficulty) = update.difficulty {
            active.difficulty = Set(difficulty);
        }

        let model = active.update(self.store.db()).await?;
        self.store.notify(&[Table::Sessions]);
        Ok(model)
    }

    /// Mark a session completed and stamp its end time.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown id.
    pub async fn complete(&self, id: i64) -> Result<(), AppError> {
        let result = battle_session::Entity::update_many()
            .col_expr(battle_session::Column::IsCompleted, Expr::value(true))
            .col_expr(battle_session::Column::EndTime, Expr::value(now_millis()))
            .filter(battle_session::Column::Id.eq(id))
            .exec(self.store.db())
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound { entity: "session", id });
        }
        self.store.notify(&[Table::Sessions]);
        Ok(())
    }

    /// Delete a session; its grid positions go with it.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown id.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = battle_session::Entity::delete_by_id(id)
            .exec(self.store.db())
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound { entity: "session", id });
        }
        tracing::debug!(id, "session deleted");
        self.store.notify(&[Table::Sessions, Table::GridPositions]);
        Ok(())
    }

    /// Delete a user's completed sessions; returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the delete fails.
    pub async fn delete_completed(&self, user_id: i64) -> Result<u64, AppError> {
        let removed = battle_session::Entity::delete_many()
            .filter(battle_session::Column::UserId.eq(user_id))
            .filter(battle_session::Column::IsCompleted.eq(true))
            .exec(self.store.db())
            .await?
            .rows_affected;
        if removed > 0 {
            self.store.notify(&[Table::Sessions, Table::GridPositions]);
        }
        Ok(removed)
    }

    // ============ Grid positions ============

    /// Active positions in a session, ordered by type then name.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn observe_session(
        &self,
        session_id: i64,
    ) -> Result<LiveQuery<grid_position::Model>, AppError> {
        self.store
            .observe(&[Table::GridPositions], move |db| async move {
                grid_position::Entity::find()
                    .filter(grid_position::Column::SessionId.eq(session_id))
                    .filter(grid_position::Column::IsActive.eq(true))
                    .order_by_asc(grid_position::Column::EntityType)
                    .order_by_asc(grid_position::Column::EntityName)
                    .all(&db)
                    .await
            })
            .await
    }

    /// Active positions of one kind in a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn observe_by_type(
        &self,
        session_id: i64,
        kind: EntityKind,
    ) -> Result<LiveQuery<grid_position::Model>, AppError> {
        self.store
            .observe(&[Table::GridPositions], move |db| async move {
                grid_position::Entity::find()
                    .filter(grid_position::Column::SessionId.eq(session_id))
                    .filter(grid_position::Column::EntityType.eq(kind))
                    .filter(grid_position::Column::IsActive.eq(true))
                    .order_by_asc(grid_position::Column::EntityName)
                    .all(&db)
                    .await
            })
            .await
    }

    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails.
    pub async fn find_position(&self, id: i64) -> Result<Option<grid_position::Model>, AppError> {
        Ok(grid_position::Entity::find_by_id(id)
            .one(self.store.db())
            .await?)
    }

    /// Active positions occupying cell `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails.
    pub async fn positions_at(
        &self,
        session_id: i64,
        x: i32,
        y: i32,
    ) -> Result<Vec<grid_position::Model>, AppError> {
        Ok(grid_position::Entity::find()
            .filter(grid_position::Column::SessionId.eq(session_id))
            .filter(grid_position::Column::XPosition.eq(x))
            .filter(grid_position::Column::YPosition.eq(y))
            .filter(grid_position::Column::IsActive.eq(true))
            .all(self.store.db())
            .await?)
    }

    /// Place a token and return its id.
    ///
    /// # Errors
    ///
    /// [`AppError::Validation`] for an empty name or a max health below 1;
    /// [`AppError::Database`] if the session does not exist.
    pub async fn place(&self, position: NewPosition) -> Result<i64, AppError> {
        let session_id = position.session_id;
        let model = position.into_active_model(now_millis())?;
        let id = grid_position::Entity::insert(model)
            .exec(self.store.db())
            .await?
            .last_insert_id;

        tracing::debug!(id, session_id, "position placed");
        self.store.notify(&[Table::GridPositions]);
        Ok(id)
    }

    /// Place several tokens in one statement.
    ///
    /// # Errors
    ///
    /// Fails without inserting anything if any token is invalid.
    pub async fn place_many(&self, positions: Vec<NewPosition>) -> Result<(), AppError> {
        if positions.is_empty() {
            return Ok(());
        }
        let now = now_millis();
        let models = positions
            .into_iter()
            .map(|p| p.into_active_model(now))
            .collect::<Result<Vec<_>, _>>()?;

        grid_position::Entity::insert_many(models)
            .exec(self.store.db())
            .await?;
        self.store.notify(&[Table::GridPositions]);
        Ok(())
    }

    /// Move a token and bump its `updated_at`.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown id.
    pub async fn move_to(&self, id: i64, x: i32, y: i32) -> Result<(), AppError> {
        let result = grid_position::Entity::update_many()
            .col_expr(grid_position::Column::XPosition, Expr::value(x))
            .col_expr(grid_position::Column::YPosition, Expr::value(y))
            .col_expr(grid_position::Column::UpdatedAt, Expr::value(now_millis()))
            .filter(grid_position::Column::Id.eq(id))
            .exec(self.store.db())
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound { entity: "grid position", id });
        }
        self.store.notify(&[Table::GridPositions]);
        Ok(())
    }

    /// Apply the set fields of `update`, clamp health and bump `updated_at`.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown id, [`AppError::Validation`] for an
    /// empty name or a max health below 1.
    pub async fn update_position(
        &self,
        id: i64,
        update: PositionUpdate,
    ) -> Result<grid_position::Model, AppError> {
        let existing = self
            .find_position(id)
            .await?
            .ok_or(AppError::NotFound { entity: "grid position", id })?;

        let max_health = update.max_health.unwrap_or(existing.max_health);
        if max_health < 1 {
            return Err(AppError::Validation(
                "Max health must be at least 1".to_string(),
            ));
        }
        let health = update.health.unwrap_or(existing.health).clamp(0, max_health);

        let mut active = existing.into_active_model();
        if let Some(name) = update.entity_name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Validation("Entity name is required".to_string()));
            }
            active.entity_name = Set(name.to_string());
        }
        if let Some(notes) = update.notes {
            active.notes = Set(notes);
        }
        active.health = Set(health);
        active.max_health = Set(max_health);
        active.updated_at = Set(now_millis());

        let model = active.update(self.store.db()).await?;
        self.store.notify(&[Table::GridPositions]);
        Ok(model)
    }

    /// Soft delete: the token disappears from active queries but keeps its row.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown id.
    pub async fn deactivate(&self, id: i64) -> Result<(), AppError> {
        let result = grid_position::Entity::update_many()
            .col_expr(grid_position::Column::IsActive, Expr::value(false))
            .col_expr(grid_position::Column::UpdatedAt, Expr::value(now_millis()))
            .filter(grid_position::Column::Id.eq(id))
            .exec(self.store.db())
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound { entity: "grid position", id });
        }
        self.store.notify(&[Table::GridPositions]);
        Ok(())
    }

    /// Hard delete every position in a session; returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the delete fails.
    pub async fn clear_session(&self, session_id: i64) -> Result<u64, AppError> {
        let removed = grid_position::Entity::delete_many()
            .filter(grid_position::Column::SessionId.eq(session_id))
            .exec(self.store.db())
            .await?
            .rows_affected;
        if removed > 0 {
            self.store.notify(&[Table::GridPositions]);
        }
        Ok(removed)
    }
}
