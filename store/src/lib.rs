//! HTTP client for the definition store backend. Every write endpoint takes
//! a JSON body and answers with a JSON body; non-2xx or malformed responses
//! are failures for the calling flow.

use anyhow::Context;
use serde::Deserialize;

use common::models::{Definition, LogEntry};

#[derive(Debug, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    pub api: Option<Definition>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    success: bool,
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Fetch the full ordered collection. The store may answer `null` for an
/// empty set.
pub async fn list_definitions(
    client: &reqwest::Client,
    base: &str,
) -> anyhow::Result<Vec<Definition>> {
    let url = endpoint(base, "/api/list");
    let defs: Option<Vec<Definition>> = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .context("definition list was not valid JSON")?;
    let defs = defs.unwrap_or_default();
    log::debug!("listed {} definitions from {}", defs.len(), url);
    Ok(defs)
}

/// Upsert one definition and return the store's authoritative representation
/// (which carries the persistent id and timestamp for new rows).
pub async fn save_definition(
    client: &reqwest::Client,
    base: &str,
    def: &Definition,
) -> anyhow::Result<Definition> {
    let resp: SaveResponse = client
        .post(endpoint(base, "/api/save"))
        .json(def)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .context("save response was not valid JSON")?;
    if !resp.success {
        anyhow::bail!("store rejected save of {}", def.id);
    }
    resp.api
        .with_context(|| format!("store returned no definition for {}", def.id))
}

/// Delete one definition and its logs.
pub async fn delete_definition(
    client: &reqwest::Client,
    base: &str,
    id: &str,
) -> anyhow::Result<()> {
    let resp: StatusResponse = client
        .post(endpoint(base, "/api/delete"))
        .json(&serde_json::json!({ "id": id }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .context("delete response was not valid JSON")?;
    if !resp.success {
        anyhow::bail!("store rejected delete of {}", id);
    }
    log::info!("deleted definition {}", id);
    Ok(())
}

/// Persist `ids` as the new canonical collection order.
pub async fn reorder(client: &reqwest::Client, base: &str, ids: &[String]) -> anyhow::Result<()> {
    let resp: StatusResponse = client
        .post(endpoint(base, "/api/reorder"))
        .json(&serde_json::json!({ "ids": ids }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .context("reorder response was not valid JSON")?;
    if !resp.success {
        anyhow::bail!("store rejected reorder");
    }
    log::debug!("persisted order of {} definitions", ids.len());
    Ok(())
}

/// Fetch the request log for one definition, oldest first. The store may
/// answer `null` when there are no entries.
pub async fn fetch_logs(
    client: &reqwest::Client,
    base: &str,
    id: &str,
) -> anyhow::Result<Vec<LogEntry>> {
    let logs: Option<Vec<LogEntry>> = client
        .get(endpoint(base, "/api/logs"))
        .query(&[("id", id)])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .context("log list was not valid JSON")?;
    Ok(logs.unwrap_or_default())
}

/// Drop every log entry for one definition.
pub async fn clear_logs(client: &reqwest::Client, base: &str, id: &str) -> anyhow::Result<()> {
    let resp: StatusResponse = client
        .post(endpoint(base, "/api/clear-logs"))
        .json(&serde_json::json!({ "id": id }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .context("clear-logs response was not valid JSON")?;
    if !resp.success {
        anyhow::bail!("store rejected clear-logs for {}", id);
    }
    log::info!("cleared logs for definition {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(
            endpoint("http://localhost:8344/", "/api/list"),
            "http://localhost:8344/api/list"
        );
        assert_eq!(
            endpoint("http://localhost:8344", "/api/list"),
            "http://localhost:8344/api/list"
        );
    }

    #[test]
    fn null_list_decodes_as_none() {
        let defs: Option<Vec<Definition>> = serde_json::from_str("null").unwrap();
        assert!(defs.is_none());
    }

    #[test]
    fn save_response_with_definition() {
        let resp: SaveResponse = serde_json::from_str(
            r#"{"success":true,"api":{"id":"p1","name":"Ping","method":"GET","url":"/ping"}}"#,
        )
        .unwrap();
        assert!(resp.success);
        assert_eq!(resp.api.unwrap().id, "p1");
    }

    #[test]
    fn status_response_defaults_to_failure() {
        let resp: StatusResponse = serde_json::from_str("{}").unwrap();
        assert!(!resp.success);
    }
}
