use anyhow::Context;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::{AppConfig, StorageBackend};
use crate::database::models::user::{admin_role_set, EMAIL_FIELD};
use crate::database::{Collection, DocumentStore, Filter, PostgresStore};

/// Promote directly in storage, bypassing the HTTP admin check. This is how
/// the first admin gets created.
pub async fn handle(email: String, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    if config.database.backend != StorageBackend::Postgres {
        anyhow::bail!("promote needs persistent storage; STORAGE_BACKEND is memory");
    }

    let store = PostgresStore::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    let result = store
        .update_one(Collection::Users, &Filter::eq(EMAIL_FIELD, email.as_str()), admin_role_set())
        .await;
    store.close().await;
    let result = result?;

    if result.matched_count == 0 {
        anyhow::bail!("no user registered with email {}", email);
    }

    let message = if result.modified_count == 0 {
        format!("{} is already an admin", email)
    } else {
        format!("Promoted {} to admin", email)
    };
    output_success(output_format, &message, Some(serde_json::to_value(&result)?))
}
