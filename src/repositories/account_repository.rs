use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::db::Store;
use crate::entities::account;
use crate::errors::{is_unique_violation, AppError};
use crate::live::{LiveQuery, Table};
use crate::utils::{now_millis, validate_email, validate_username};

/// Partial update of an account's profile fields.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub email: Option<String>,
    /// `Some(None)` clears the avatar
    pub avatar: Option<Option<String>>,
    pub level: Option<i32>,
    pub experience: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct AccountRepository {
    store: Store,
}

impl AccountRepository {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Active accounts ordered by username, kept current.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn observe_active(&self) -> Result<LiveQuery<account::Model>, AppError> {
        self.store
            .observe(&[Table::Accounts], |db| async move {
                account::Entity::find()
                    .filter(account::Column::IsActive.eq(true))
                    .order_by_asc(account::Column::Username)
                    .all(&db)
                    .await
            })
            .await
    }

    /// Active accounts ordered by username, as a one-off read.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails.
    pub async fn list_active(&self) -> Result<Vec<account::Model>, AppError> {
        Ok(account::Entity::find()
            .filter(account::Column::IsActive.eq(true))
            .order_by_asc(account::Column::Username)
            .all(self.store.db())
            .await?)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<account::Model>, AppError> {
        Ok(account::Entity::find_by_id(id)
            .one(self.store.db())
            .await?)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<account::Model>, AppError> {
        Ok(account::Entity::find()
            .filter(account::Column::Username.eq(username.trim()))
            .one(self.store.db())
            .await?)
    }

    /// Usernames stay reserved after deactivation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails.
    pub async fn is_username_available(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.find_by_username(username).await?.is_none())
    }

    /// Register a new account and return its id.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a bad username length or email
    /// - [`AppError::UsernameTaken`] if the username exists, whether caught by
    ///   the lookup or by the unique index
    pub async fn create(&self, username: &str, email: &str) -> Result<i64, AppError> {
        validate_username(username).map_err(AppError::Validation)?;
        validate_email(email).map_err(AppError::Validation)?;

        let username = username.trim();
        if !self.is_username_available(username).await? {
            return Err(AppError::UsernameTaken(username.to_string()));
        }

        let account = account::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email.trim().to_string()),
            avatar: Set(None),
            level: Set(1),
            experience: Set(0),
            created_at: Set(now_millis()),
            is_active: Set(true),
            ..Default::default()
        };

        match account::Entity::insert(account).exec(self.store.db()).await {
            Ok(result) => {
                let id = result.last_insert_id;
                tracing::debug!(id, username, "account created");
                self.store.notify(&[Table::Accounts]);
                Ok(id)
            }
            Err(err) if is_unique_violation(&err) => {
                tracing::warn!(username, "unique constraint rejected account");
                Err(AppError::UsernameTaken(username.to_string()))
            }
            Err(err) => {
                tracing::error!(error = %err, username, "failed to create account");
                Err(err.into())
            }
        }
    }

    /// Apply a partial profile update.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown id, [`AppError::Validation`] for a
    /// bad email or negative level/experience.
    pub async fn update(&self, id: i64, update: AccountUpdate) -> Result<account::Model, AppError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound { entity: "account", id })?;

        let mut active = existing.into_active_model();
        if let Some(email) = update.email {
            validate_email(&email).map_err(AppError::Validation)?;
            active.email = Set(email.trim().to_string());
        }
        if let Some(avatar) = update.avatar {
            active.avatar = Set(avatar);
        }
        if let Some(level) = update.level {
            if level < 1 {
                return Err(AppError::Validation("Level must be at least 1".to_string()));
            }
            active.level = Set(level);
        }
        if let Some(experience) = update.experience {
            if experience < 0 {
                return Err(AppError::Validation(
                    "Experience cannot be negative".to_string(),
                ));
            }
            active.experience = Set(experience);
        }

        let model = active.update(self.store.db()).await?;
        self.store.notify(&[Table::Accounts]);
        Ok(model)
    }

    /// Soft delete: the row and username are kept.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown id.
    pub async fn deactivate(&self, id: i64) -> Result<(), AppError> {
        let result = account::Entity::update_many()
            .col_expr(account::Column::IsActive, Expr::value(false))
            .filter(account::Column::Id.eq(id))
            .exec(self.store.db())
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound { entity: "account", id });
        }
        tracing::info!(id, "account deactivated");
        self.store.notify(&[Table::Accounts]);
        Ok(())
    }

    /// Hard delete; cascades to the account's sessions and their positions.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown id.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = account::Entity::delete_by_id(id)
            .exec(self.store.db())
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound { entity: "account", id });
        }
        self.store
            .notify(&[Table::Accounts, Table::Sessions, Table::GridPositions]);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails.
    pub async fn total_count(&self) -> Result<u64, AppError> {
        Ok(account::Entity::find().count(self.store.db()).await?)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails.
    pub async fn active_count(&self) -> Result<u64, AppError> {
        Ok(account::Entity::find()
            .filter(account::Column::IsActive.eq(true))
            .count(self.store.db())
            .await?)
    }
}
