use crate::entities::account;
use crate::errors::AppError;
use crate::live::LiveQuery;
use crate::repositories::AccountRepository;

/// User management: registration form and the active-account list.
#[derive(Debug)]
pub struct UserScreen {
    repository: AccountRepository,
    users: LiveQuery<account::Model>,
    pub username: String,
    pub email: String,
    is_loading: bool,
    message: String,
}

impl UserScreen {
    /// Subscribe to active accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial live queries cannot be loaded.
    pub async fn open(repository: AccountRepository) -> Result<Self, AppError> {
        let users = repository.observe_active().await?;
        Ok(Self {
            repository,
            users,
            username: String::new(),
            email: String::new(),
            is_loading: false,
            message: String::new(),
        })
    }

    /// Latest active accounts, ordered by username.
    #[must_use]
    pub fn users(&self) -> Vec<account::Model> {
        self.users.current()
    }

    /// Live handle to the account list, for waiting on refreshes.
    pub fn users_mut(&mut self) -> &mut LiveQuery<account::Model> {
        &mut self.users
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether the current message reports a failure.
    #[must_use]
    pub fn message_is_error(&self) -> bool {
        self.message.contains("Error") || self.message.contains("exists")
    }

    /// Submit the registration form.
    ///
    /// Validation failures are shown verbatim; the form is cleared on success.
    pub async fn create_user(&mut self) -> Option<i64> {
        if self.username.trim().is_empty() || self.email.trim().is_empty() {
            self.message = "Please fill in all fields".to_string();
            return None;
        }

        self.is_loading = true;
        self.message.clear();
        let result = self.repository.create(&self.username, &self.email).await;
        self.is_loading = false;

        match result {
            Ok(id) => {
                self.message = format!("User created successfully! ID: {id}");
                self.username.clear();
                self.email.clear();
                Some(id)
            }
            Err(err) if err.is_validation() => {
                self.message = err.to_string();
                None
            }
            Err(err) => {
                tracing::error!(error = %err, "error creating user");
                self.message = format!("Error creating user: {err}");
                None
            }
        }
    }

    /// Deactivate an account from the list.
    pub async fn deactivate(&mut self, user: &account::Model) -> bool {
        match self.repository.deactivate(user.id).await {
            Ok(()) => {
                self.message = format!("User {} deactivated", user.username);
                true
            }
            Err(err) => {
                self.message = format!("Error removing user: {err}");
                false
            }
        }
    }
}
