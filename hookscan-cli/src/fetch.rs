//! Download simulator data modules from the upstream repository

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use std::path::{Path, PathBuf};
use std::time::Duration;

const RAW_BASE_URL: &str = "https://raw.githubusercontent.com/smogon/pokemon-showdown";
const USER_AGENT: &str = concat!("hookscan-fetcher/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ATTEMPTS: u32 = 4;
const BACKOFF_STEP: Duration = Duration::from_millis(1500);

pub const BASE_MODULE: &str = "data/abilities.ts";
pub const GEN9_MODULE: &str = "data/mods/gen9/abilities.ts";

/// The rest of the simulator data tables, mirrored by `--all`. Only the
/// ability modules feed `extract`.
const COMPANION_TABLES: [&str; 5] = ["pokedex", "moves", "items", "typechart", "conditions"];

/// Repository paths to download, in processing order
pub fn modules(gen9: bool, all: bool) -> Vec<String> {
    let mut tables = vec!["abilities"];
    if all {
        tables.extend(COMPANION_TABLES);
    }

    let mut modules: Vec<String> = tables.iter().map(|table| format!("data/{table}.ts")).collect();
    if gen9 {
        modules.extend(tables.iter().map(|table| format!("data/mods/gen9/{table}.ts")));
    }
    modules
}

pub fn raw_url(git_ref: &str, path: &str) -> String {
    format!("{RAW_BASE_URL}/{git_ref}/{path}")
}

/// Rate limiting and server-side failures are worth another attempt
fn is_transient(status: StatusCode) -> bool {
    matches!(status, StatusCode::TOO_MANY_REQUESTS | StatusCode::FORBIDDEN) || status.is_server_error()
}

/// Outcome of one fetch run
#[derive(Debug)]
pub struct FetchReport {
    pub fetched: Vec<PathBuf>,
    pub attempted: usize,
}

/// Download every module into `out_dir`, mirroring the repository layout.
/// Missing files are skipped with a warning.
pub async fn fetch_modules(git_ref: &str, out_dir: &Path, gen9: bool, all: bool) -> Result<FetchReport> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    let modules = modules(gen9, all);
    let mut fetched = Vec::new();
    for path in &modules {
        if let Some(destination) = fetch_one(&client, git_ref, path, out_dir).await? {
            fetched.push(destination);
        }
    }

    Ok(FetchReport { fetched, attempted: modules.len() })
}

async fn fetch_one(client: &Client, git_ref: &str, path: &str, out_dir: &Path) -> Result<Option<PathBuf>> {
    let url = raw_url(git_ref, path);

    let mut attempt = 1;
    let response = loop {
        let response = client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?;
        let status = response.status();
        if is_transient(status) && attempt < MAX_ATTEMPTS {
            tracing::warn!(%url, %status, attempt, "transient response, retrying");
            tokio::time::sleep(BACKOFF_STEP * attempt).await;
            attempt += 1;
            continue;
        }
        break response;
    };

    if response.status() == StatusCode::NOT_FOUND {
        tracing::warn!(path, git_ref, "not found upstream, skipping");
        return Ok(None);
    }

    let bytes = response
        .error_for_status()
        .with_context(|| format!("GET {url} failed"))?
        .bytes()
        .await
        .with_context(|| format!("Failed to read body of {url}"))?;

    let destination = out_dir.join(path);
    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(&destination, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", destination.display()))?;

    tracing::info!(path, destination = %destination.display(), bytes = bytes.len(), "fetched");
    Ok(Some(destination))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_selection() {
        assert_eq!(modules(false, false), vec![BASE_MODULE]);
        assert_eq!(modules(true, false), vec![BASE_MODULE, GEN9_MODULE]);
    }

    #[test]
    fn test_all_tables() {
        let everything = modules(true, true);
        assert_eq!(everything.len(), 12);
        assert_eq!(everything[0], BASE_MODULE);
        assert!(everything.contains(&"data/typechart.ts".to_string()));
        assert!(everything.contains(&"data/mods/gen9/moves.ts".to_string()));
        assert_eq!(everything.iter().filter(|path| path.contains("/mods/gen9/")).count(), 6);

        let base_only = modules(false, true);
        assert_eq!(base_only.len(), 6);
        assert!(base_only.iter().all(|path| !path.contains("mods")));
    }

    #[test]
    fn test_raw_url() {
        assert_eq!(
            raw_url("master", BASE_MODULE),
            "https://raw.githubusercontent.com/smogon/pokemon-showdown/master/data/abilities.ts"
        );
    }

    #[test]
    fn test_transient_statuses() {
        assert!(is_transient(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient(StatusCode::FORBIDDEN));
        assert!(is_transient(StatusCode::BAD_GATEWAY));
        assert!(!is_transient(StatusCode::NOT_FOUND));
        assert!(!is_transient(StatusCode::OK));
    }
}
