use std::time::Duration;

use crate::entities::{nine_liner, RequestStatus, RequestType};
use crate::errors::AppError;
use crate::live::LiveQuery;
use crate::repositories::{NineLineDraft, NineLineRepository, TransmitOutcome};
use crate::utils::time::format_millis;

/// Nine-line request form with draft/transmit actions and request history.
#[derive(Debug)]
pub struct ControlsScreen {
    repository: NineLineRepository,
    drafts: LiveQuery<nine_liner::Model>,
    transmitted: LiveQuery<nine_liner::Model>,
    transmit_delay: Duration,
    form: NineLineDraft,
    current_draft_id: Option<i64>,
    is_saving: bool,
    is_transmitting: bool,
    message: String,
}

impl ControlsScreen {
    /// Subscribe to draft and transmitted requests.
    ///
    /// `transmit_delay` simulates the radio transmission before the request is
    /// marked as sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial live queries cannot be loaded.
    pub async fn open(
        repository: NineLineRepository,
        transmit_delay: Duration,
    ) -> Result<Self, AppError> {
        let drafts = repository.observe_by_status(RequestStatus::Draft).await?;
        let transmitted = repository
            .observe_by_status(RequestStatus::Transmitted)
            .await?;

        Ok(Self {
            repository,
            drafts,
            transmitted,
            transmit_delay,
            form: NineLineDraft::default(),
            current_draft_id: None,
            is_saving: false,
            is_transmitting: false,
            message: String::new(),
        })
    }

    #[must_use]
    pub const fn form(&self) -> &NineLineDraft {
        &self.form
    }

    pub fn set_request_type(&mut self, request_type: RequestType) {
        self.form.request_type = request_type;
    }

    /// Set line `number` (1-based).
    pub fn set_line(&mut self, number: usize, text: impl Into<String>) {
        self.form = std::mem::take(&mut self.form).with_line(number, text);
    }

    pub fn set_author(&mut self, account_id: Option<i64>) {
        self.form.created_by = account_id;
    }

    #[must_use]
    pub const fn current_draft_id(&self) -> Option<i64> {
        self.current_draft_id
    }

    #[must_use]
    pub const fn is_saving(&self) -> bool {
        self.is_saving
    }

    #[must_use]
    pub const fn is_transmitting(&self) -> bool {
        self.is_transmitting
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Both actions need line 1 and no action in flight.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.is_saving && !self.is_transmitting && !self.form.lines[0].trim().is_empty()
    }

    /// Save the form as a draft, updating the current draft if there is one.
    pub async fn save_draft(&mut self) -> Option<i64> {
        if !self.can_submit() {
            return None;
        }
        self.is_saving = true;

        let saved = match self.current_draft_id {
            Some(id) => self
                .repository
                .update_draft(id, self.form.clone())
                .await
                .map(|model| model.id),
            None => self.repository.save_draft(self.form.clone()).await,
        };

        self.is_saving = false;
        match saved {
            Ok(id) => {
                self.current_draft_id = Some(id);
                self.message = "Draft saved successfully!".to_string();
                Some(id)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to save nine-line draft");
                self.message = format!("Error saving draft: {err}");
                None
            }
        }
    }

    /// Save (if needed), simulate the transmission delay, then mark the
    /// request as transmitted.
    ///
    /// The delay and status update run on a spawned task, so dropping the
    /// screen mid-transmission does not cancel them. Returns `None` when the
    /// form cannot be submitted.
    pub async fn transmit(&mut self) -> Option<TransmitOutcome> {
        if !self.can_submit() {
            return None;
        }
        self.is_transmitting = true;
        let outcome = self.run_transmission().await;
        self.is_transmitting = false;

        match &outcome {
            TransmitOutcome::Transmitted { transmitted_at } => {
                self.message = format!(
                    "9 LINER TRANSMITTED SUCCESSFULLY\nRequest ID: {}\nTimestamp: {}",
                    self.current_draft_id.unwrap_or_default(),
                    format_millis(*transmitted_at)
                );
                self.form = NineLineDraft {
                    created_by: self.form.created_by,
                    ..NineLineDraft::default()
                };
                self.current_draft_id = None;
            }
            TransmitOutcome::NotFound => {
                self.message = "Transmission failed: request not found".to_string();
            }
            TransmitOutcome::AlreadyTransmitted { status } => {
                self.message = format!("Transmission failed: request is already {status}");
            }
            TransmitOutcome::StorageFailure(detail) => {
                self.message = format!("Transmission failed: {detail}");
            }
        }
        Some(outcome)
    }

    async fn run_transmission(&mut self) -> TransmitOutcome {
        let id = match self.current_draft_id {
            Some(id) => id,
            None => match self.repository.save_draft(self.form.clone()).await {
                Ok(id) => {
                    self.current_draft_id = Some(id);
                    id
                }
                Err(err) => return TransmitOutcome::StorageFailure(err.to_string()),
            },
        };

        let repository = self.repository.clone();
        let delay = self.transmit_delay;
        let transmission = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            repository.transmit(id).await
        });

        transmission
            .await
            .unwrap_or_else(|err| TransmitOutcome::StorageFailure(err.to_string()))
    }

    /// Drafts and transmitted requests, newest first.
    #[must_use]
    pub fn history(&self) -> Vec<nine_liner::Model> {
        let mut all = self.drafts.current();
        all.extend(self.transmitted.current());
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        all
    }

    /// Load a history entry into the form.
    ///
    /// A draft is reopened for editing; anything already sent is copied as a
    /// template for a new request.
    pub fn load_from_history(&mut self, request: &nine_liner::Model) {
        let created_by = self.form.created_by;
        self.form = NineLineDraft {
            created_by,
            ..NineLineDraft::from_model(request)
        };

        if request.status == RequestStatus::Draft {
            self.current_draft_id = Some(request.id);
            self.message = "Draft loaded".to_string();
        } else {
            self.current_draft_id = None;
            self.message = "Request template loaded".to_string();
        }
    }

    /// Delete a draft from the history. Transmitted requests are kept.
    pub async fn delete_draft(&mut self, id: i64) -> bool {
        match self.repository.delete_draft(id).await {
            Ok(()) => {
                if self.current_draft_id == Some(id) {
                    self.current_draft_id = None;
                }
                self.message = "Draft deleted".to_string();
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, id, "failed to delete nine-line draft");
                self.message = format!("Error deleting draft: {err}");
                false
            }
        }
    }

    /// Live handle to transmitted requests, for waiting on refreshes.
    pub fn transmitted_mut(&mut self) -> &mut LiveQuery<nine_liner::Model> {
        &mut self.transmitted
    }

    /// Live handle to drafts, for waiting on refreshes.
    pub fn drafts_mut(&mut self) -> &mut LiveQuery<nine_liner::Model> {
        &mut self.drafts
    }

    /// Start a fresh form, forgetting the current draft.
    pub fn reset(&mut self) {
        self.form = NineLineDraft::default();
        self.current_draft_id = None;
        self.message.clear();
    }
}
