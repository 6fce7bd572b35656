use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::{AppConfig, Backend};
use crate::domain::entities::layout::SheetLayout;
use crate::error::BoardError;
use crate::infra::google::client::GoogleSheetsClient;
use crate::infra::google::credentials::{load_credentials, CREDENTIALS_ENV};
use crate::infra::sqlite::store::SqliteSheetStore;
use crate::usecase::ports::sheet::{SheetClient, SheetError};

fn connection_error(err: anyhow::Error) -> BoardError {
    BoardError::Connection(SheetError::Unavailable(format!("{err:#}")))
}

/// Builds the configured store once for the life of the process and makes
/// sure both board tabs exist with their headers.
pub fn connect(config: &AppConfig) -> Result<Arc<dyn SheetClient>, BoardError> {
    let client: Arc<dyn SheetClient> = match config.backend {
        Backend::Local => {
            let db_path = config.local_db_path().map_err(connection_error)?;
            info!(path = %db_path.display(), "using local board");
            Arc::new(SqliteSheetStore::open(db_path)?)
        }
        Backend::Google => {
            let spreadsheet = config.google.spreadsheet.as_deref().unwrap_or_default();
            let secret = std::env::var(CREDENTIALS_ENV).ok();
            let key = load_credentials(secret.as_deref(), &config.google.credentials_path)
                .map_err(connection_error)?;
            let timeout = Duration::from_secs(config.google.request_timeout_secs);
            let client =
                GoogleSheetsClient::new(spreadsheet, key, timeout).map_err(connection_error)?;
            info!(spreadsheet, "using Google Sheets board");
            Arc::new(client)
        }
    };

    ensure_board_tabs(client.as_ref(), &config.layout())?;
    Ok(client)
}

pub fn ensure_board_tabs(client: &dyn SheetClient, layout: &SheetLayout) -> Result<(), BoardError> {
    for (tab, headers) in layout.tabs() {
        client.ensure_tab(tab, headers)?;
    }
    Ok(())
}
