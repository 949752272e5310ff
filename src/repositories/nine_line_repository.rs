use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::db::Store;
use crate::entities::{nine_liner, RequestStatus, RequestType};
use crate::errors::AppError;
use crate::live::{LiveQuery, Table};
use crate::utils::{now_millis, retention_cutoff};

/// The editable content of a nine-line request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NineLineDraft {
    pub request_type: RequestType,
    /// Lines 1 through 9, in order
    pub lines: [String; 9],
    pub created_by: Option<i64>,
}

impl NineLineDraft {
    #[must_use]
    pub fn new(request_type: RequestType) -> Self {
        Self {
            request_type,
            ..Self::default()
        }
    }

    /// Set line `number` (1-based). Out-of-range numbers are ignored.
    #[must_use]
    pub fn with_line(mut self, number: usize, text: impl Into<String>) -> Self {
        if let Some(line) = number.checked_sub(1).and_then(|i| self.lines.get_mut(i)) {
            *line = text.into();
        }
        self
    }

    #[must_use]
    pub const fn created_by(mut self, account_id: i64) -> Self {
        self.created_by = Some(account_id);
        self
    }

    /// Copy the editable content of a stored request.
    #[must_use]
    pub fn from_model(model: &nine_liner::Model) -> Self {
        Self {
            request_type: model.request_type,
            lines: model.lines().map(str::to_string),
            created_by: model.created_by,
        }
    }

    fn apply(self, active: &mut nine_liner::ActiveModel) {
        let [l1, l2, l3, l4, l5, l6, l7, l8, l9] = self.lines;
        active.request_type = Set(self.request_type);
        active.line1 = Set(l1);
        active.line2 = Set(l2);
        active.line3 = Set(l3);
        active.line4 = Set(l4);
        active.line5 = Set(l5);
        active.line6 = Set(l6);
        active.line7 = Set(l7);
        active.line8 = Set(l8);
        active.line9 = Set(l9);
        active.created_by = Set(self.created_by);
    }
}

/// Result of a transmit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransmitOutcome {
    /// The draft is now TRANSMITTED
    Transmitted { transmitted_at: i64 },
    /// No request with that id
    NotFound,
    /// The request already left DRAFT
    AlreadyTransmitted { status: RequestStatus },
    /// The store failed; the cause is kept for the operator
    StorageFailure(String),
}

impl TransmitOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Transmitted { .. })
    }
}

#[derive(Debug, Clone)]
pub struct NineLineRepository {
    store: Store,
}

impl NineLineRepository {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Every request, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn observe_all(&self) -> Result<LiveQuery<nine_liner::Model>, AppError> {
        self.store
            .observe(&[Table::NineLiners], |db| async move {
                nine_liner::Entity::find()
                    .order_by_desc(nine_liner::Column::CreatedAt)
                    .order_by_desc(nine_liner::Column::Id)
                    .all(&db)
                    .await
            })
            .await
    }

    /// Requests in `status`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn observe_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<LiveQuery<nine_liner::Model>, AppError> {
        self.store
            .observe(&[Table::NineLiners], move |db| async move {
                nine_liner::Entity::find()
                    .filter(nine_liner::Column::Status.eq(status))
                    .order_by_desc(nine_liner::Column::CreatedAt)
                    .order_by_desc(nine_liner::Column::Id)
                    .all(&db)
                    .await
            })
            .await
    }

    /// Requests of one type, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial query fails.
    pub async fn observe_by_type(
        &self,
        request_type: RequestType,
    ) -> Result<LiveQuery<nine_liner::Model>, AppError> {
        self.store
            .observe(&[Table::NineLiners], move |db| async move {
                nine_liner::Entity::find()
                    .filter(nine_liner::Column::RequestType.eq(request_type))
                    .order_by_desc(nine_liner::Column::CreatedAt)
                    .order_by_desc(nine_liner::Column::Id)
                    .all(&db)
                    .await
            })
            .await
    }

    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<nine_liner::Model>, AppError> {
        Ok(nine_liner::Entity::find_by_id(id)
            .one(self.store.db())
            .await?)
    }

    /// Store a new request as DRAFT and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the insert fails.
    pub async fn save_draft(&self, draft: NineLineDraft) -> Result<i64, AppError> {
        let mut active = nine_liner::ActiveModel {
            status: Set(RequestStatus::Draft),
            created_at: Set(now_millis()),
            transmitted_at: Set(None),
            ..Default::default()
        };
        let request_type = draft.request_type;
        draft.apply(&mut active);

        let id = nine_liner::Entity::insert(active)
            .exec(self.store.db())
            .await?
            .last_insert_id;

        tracing::debug!(id, %request_type, "nine-line draft saved");
        self.store.notify(&[Table::NineLiners]);
        Ok(id)
    }

    /// Replace the fields of a request that is still a draft.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown id, [`AppError::InvalidTransition`]
    /// once the request has left DRAFT.
    pub async fn update_draft(
        &self,
        id: i64,
        draft: NineLineDraft,
    ) -> Result<nine_liner::Model, AppError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound { entity: "nine-line request", id })?;

        if !existing.status.is_editable() {
            return Err(AppError::InvalidTransition {
                from: existing.status,
                to: RequestStatus::Draft,
            });
        }

        let mut active = existing.into_active_model();
        draft.apply(&mut active);
        let model = active.update(self.store.db()).await?;
        self.store.notify(&[Table::NineLiners]);
        Ok(model)
    }

    /// Move a draft to TRANSMITTED, stamping the current time.
    ///
    /// Never fails outright: every failure cause is reported in the outcome.
    pub async fn transmit(&self, id: i64) -> TransmitOutcome {
        let transmitted_at = now_millis();

        let updated = nine_liner::Entity::update_many()
            .col_expr(
                nine_liner::Column::Status,
                Expr::value(RequestStatus::Transmitted.as_str()),
            )
            .col_expr(nine_liner::Column::TransmittedAt, Expr::value(transmitted_at))
            .filter(nine_liner::Column::Id.eq(id))
            .filter(nine_liner::Column::Status.eq(RequestStatus::Draft))
            .exec(self.store.db())
            .await;

        match updated {
            Ok(result) if result.rows_affected > 0 => {
                tracing::info!(id, transmitted_at, "nine-line request transmitted");
                self.store.notify(&[Table::NineLiners]);
                TransmitOutcome::Transmitted { transmitted_at }
            }
            Ok(_) => match self.find_by_id(id).await {
                Ok(Some(existing)) => TransmitOutcome::AlreadyTransmitted {
                    status: existing.status,
                },
                Ok(None) => TransmitOutcome::NotFound,
                Err(err) => TransmitOutcome::StorageFailure(err.to_string()),
            },
            Err(err) => {
                tracing::error!(error = %err, id, "failed to transmit nine-line request");
                TransmitOutcome::StorageFailure(err.to_string())
            }
        }
    }

    /// Move a transmitted request to ARCHIVED.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown id, [`AppError::InvalidTransition`]
    /// unless the request is TRANSMITTED.
    pub async fn archive(&self, id: i64) -> Result<(), AppError> {
        let result = nine_liner::Entity::update_many()
            .col_expr(
                nine_liner::Column::Status,
                Expr::value(RequestStatus::Archived.as_str()),
            )
            .filter(nine_liner::Column::Id.eq(id))
            .filter(nine_liner::Column::Status.eq(RequestStatus::Transmitted))
            .exec(self.store.db())
            .await?;

        if result.rows_affected == 0 {
            let existing = self
                .find_by_id(id)
                .await?
                .ok_or(AppError::NotFound { entity: "nine-line request", id })?;
            return Err(AppError::InvalidTransition {
                from: existing.status,
                to: RequestStatus::Archived,
            });
        }

        tracing::debug!(id, "nine-line request archived");
        self.store.notify(&[Table::NineLiners]);
        Ok(())
    }

    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown id.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = nine_liner::Entity::delete_by_id(id)
            .exec(self.store.db())
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound { entity: "nine-line request", id });
        }
        self.store.notify(&[Table::NineLiners]);
        Ok(())
    }

    /// Delete a request that is still a draft.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`] for an unknown id, [`AppError::Validation`] once
    /// the request has been transmitted.
    pub async fn delete_draft(&self, id: i64) -> Result<(), AppError> {
        let result = nine_liner::Entity::delete_many()
            .filter(nine_liner::Column::Id.eq(id))
            .filter(nine_liner::Column::Status.eq(RequestStatus::Draft))
            .exec(self.store.db())
            .await?;

        if result.rows_affected == 0 {
            let existing = self
                .find_by_id(id)
                .await?
                .ok_or(AppError::NotFound { entity: "nine-line request", id })?;
            return Err(AppError::Validation(format!(
                "Only drafts can be deleted, request {id} is {}",
                existing.status
            )));
        }

        tracing::debug!(id, "nine-line draft deleted");
        self.store.notify(&[Table::NineLiners]);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails.
    pub async fn transmitted_count(&self) -> Result<u64, AppError> {
        Ok(nine_liner::Entity::find()
            .filter(nine_liner::Column::Status.eq(RequestStatus::Transmitted))
            .count(self.store.db())
            .await?)
    }

    /// Count requests, optionally narrowed by status and type.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails.
    pub async fn count(
        &self,
        status: Option<RequestStatus>,
        request_type: Option<RequestType>,
    ) -> Result<u64, AppError> {
        let mut query = nine_liner::Entity::find();
        if let Some(status) = status {
            query = query.filter(nine_liner::Column::Status.eq(status));
        }
        if let Some(request_type) = request_type {
            query = query.filter(nine_liner::Column::RequestType.eq(request_type));
        }
        Ok(query.count(self.store.db()).await?)
    }

    /// Delete archived requests created more than `retention_days` ago.
    ///
    /// Returns the number of requests removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the delete fails.
    pub async fn cleanup_old_archived(&self, retention_days: u32) -> Result<u64, AppError> {
        self.cleanup_archived_before(retention_cutoff(now_millis(), retention_days))
            .await
    }

    /// Delete archived requests with `created_at` strictly before `cutoff`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the delete fails.
    pub async fn cleanup_archived_before(&self, cutoff: i64) -> Result<u64, AppError> {
        let removed = nine_liner::Entity::delete_many()
            .filter(nine_liner::Column::Status.eq(RequestStatus::Archived))
            .filter(nine_liner::Column::CreatedAt.lt(cutoff))
            .exec(self.store.db())
            .await?
            .rows_affected;

        tracing::info!(removed, cutoff, "archived nine-line cleanup");
        if removed > 0 {
            self.store.notify(&[Table::NineLiners]);
        }
        Ok(removed)
    }

    /// Requests whose line fields contain `term`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails.
    pub async fn search(&self, term: &str) -> Result<Vec<nine_liner::Model>, AppError> {
        use sea_orm::Condition;

        let term = term.trim();
        let condition = [
            nine_liner::Column::Line1,
            nine_liner::Column::Line2,
            nine_liner::Column::Line3,
            nine_liner::Column::Line4,
            nine_liner::Column::Line5,
            nine_liner::Column::Line6,
            nine_liner::Column::Line7,
            nine_liner::Column::Line8,
            nine_liner::Column::Line9,
        ]
        .into_iter()
        .fold(Condition::any(), |cond, column| cond.add(column.contains(term)));

        Ok(nine_liner::Entity::find()
            .filter(condition)
            .order_by_desc(nine_liner::Column::CreatedAt)
            .order_by_desc(nine_liner::Column::Id)
            .all(self.store.db())
            .await?)
    }

    /// The `limit` newest requests.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] if the query fails.
    pub async fn recent(&self, limit: u64) -> Result<Vec<nine_liner::Model>, AppError> {
        use sea_orm::QuerySelect;

        Ok(nine_liner::Entity::find()
            .order_by_desc(nine_liner::Column::CreatedAt)
            .order_by_desc(nine_liner::Column::Id)
            .limit(limit)
            .all(self.store.db())
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_line_is_one_based() {
        let draft = NineLineDraft::new(RequestType::Medevac)
            .with_line(1, "38S MB 12345 67890")
            .with_line(9, "Egress west")
            .with_line(0, "ignored")
            .with_line(10, "ignored");
        assert_eq!(draft.lines[0], "38S MB 12345 67890");
        assert_eq!(draft.lines[8], "Egress west");
        assert!(draft.lines[1..8].iter().all(String::is_empty));
    }

    #[test]
    fn test_only_transmitted_is_success() {
        assert!(TransmitOutcome::Transmitted { transmitted_at: 1 }.is_success());
        assert!(!TransmitOutcome::NotFound.is_success());
        assert!(!TransmitOutcome::StorageFailure("x".to_string()).is_success());
    }
}
