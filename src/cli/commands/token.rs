use anyhow::Context;
use serde_json::{json, Value};

use crate::auth::TokenService;
use crate::cli::{utils::output_success, OutputFormat};
use crate::config::SecurityConfig;
use crate::database::Document;

pub async fn handle(email: String, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = SecurityConfig::from_env().context("invalid security configuration")?;
    let tokens = TokenService::from_config(&security);

    let mut identity = Document::new();
    identity.insert("email".to_string(), Value::String(email.clone()));
    let token = tokens.issue(identity)?;

    let data = match output_format {
        OutputFormat::Json => json!({ "email": email, "token": token, "expires_in": security.token_ttl_secs }),
        OutputFormat::Text => Value::String(token),
    };
    output_success(output_format, &format!("Issued token for {}", email), Some(data))
}
