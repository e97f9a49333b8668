use anyhow::Context;
use serde_json::Value;

use crate::cli::{utils::output_success, OutputFormat};

pub async fn handle(url: String, output_format: OutputFormat) -> anyhow::Result<()> {
    let endpoint = format!("{}/health", url.trim_end_matches('/'));
    let response = reqwest::get(&endpoint)
        .await
        .with_context(|| format!("failed to reach {}", endpoint))?;

    let status = response.status();
    let body: Value = response.json().await.context("health response was not JSON")?;

    if !status.is_success() {
        anyhow::bail!("{} reported {}: {}", endpoint, status, body);
    }
    output_success(output_format, &format!("{} is healthy", url), Some(body))
}
