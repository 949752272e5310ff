use crate::config::Config;
use crate::db::Store;
use crate::errors::AppError;
use crate::repositories::{
    AccountRepository, NineLineRepository, PolygonRepository, SessionRepository,
};
use crate::screens::{ControlsScreen, MapScreen, UserScreen};

/// The store plus every repository built on it, shared by screens and the CLI.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Config,
    pub accounts: AccountRepository,
    pub polygons: PolygonRepository,
    pub nine_lines: NineLineRepository,
    pub sessions: SessionRepository,
}

impl AppState {
    #[must_use]
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            accounts: AccountRepository::new(store.clone()),
            polygons: PolygonRepository::new(store.clone()),
            nine_lines: NineLineRepository::new(store.clone()),
            sessions: SessionRepository::new(store.clone()),
            store,
            config,
        }
    }

    /// Open the store named by `config.database_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened.
    pub async fn open(config: Config) -> Result<Self, AppError> {
        let store = Store::open(&config.database_url).await?;
        Ok(Self::new(store, config))
    }

    /// # Errors
    ///
    /// Returns an error if the initial live queries cannot be loaded.
    pub async fn map_screen(&self) -> Result<MapScreen, AppError> {
        MapScreen::open(self.polygons.clone()).await
    }

    /// # Errors
    ///
    /// Returns an error if the initial live queries cannot be loaded.
    pub async fn controls_screen(&self) -> Result<ControlsScreen, AppError> {
        ControlsScreen::open(self.nine_lines.clone(), self.config.transmit_delay).await
    }

    /// # Errors
    ///
    /// Returns an error if the initial live queries cannot be loaded.
    pub async fn user_screen(&self) -> Result<UserScreen, AppError> {
        UserScreen::open(self.accounts.clone()).await
    }
}
