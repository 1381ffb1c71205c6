//! Content-state sync: report the loaded fingerprint and perform explicit
//! reload-on-change. The store never polls; hosts hit the reload endpoint on
//! their own invalidation signal (tab focus, toggle change, timer).

use std::path::PathBuf;
use std::sync::Arc;

use crate::content::catalog::{Catalog, ContentStore, ReloadOutcome};
use crate::content::loader::DEFAULT_DATA_DIR;
use crate::content::source::ContentToggles;
use crate::server::routes::HttpResponse;

static CONTENT: ContentStore = ContentStore::new();

/// Sources enabled for this server process: FLAGSHIP_SOURCES as a comma
/// list of source tags (`legacy,legends`).
pub fn server_toggles() -> ContentToggles {
    let mut toggles = ContentToggles::default();
    if let Ok(sources) = std::env::var("FLAGSHIP_SOURCES") {
        for tag in sources.split(',').map(str::trim).filter(|tag| !tag.is_empty()) {
            toggles.set(tag, true);
        }
    }
    toggles
}

pub fn data_dir() -> PathBuf {
    std::env::var("FLAGSHIP_DATA_DIR")
        .unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string())
        .into()
}

/// Catalog for request handlers. Loads on first use; afterwards handlers
/// keep the Arc they got even if a reload swaps the store underneath.
pub fn current_catalog() -> Arc<Catalog> {
    if let Some(loaded) = CONTENT.current() {
        return loaded.catalog;
    }
    CONTENT.reload_if_changed(&data_dir(), &server_toggles());
    CONTENT
        .current()
        .map(|loaded| loaded.catalog)
        .unwrap_or_else(|| Arc::new(Catalog::default()))
}

/// GET /api/content/version: fingerprint, revision and load time of the
/// catalog currently being served.
pub fn content_version_payload() -> Result<String, serde_json::Error> {
    let _ = current_catalog();
    let loaded = CONTENT.current();
    serde_json::to_string_pretty(&serde_json::json!({
        "fingerprint": loaded.as_ref().map(|l| l.fingerprint.clone()),
        "revision": loaded.as_ref().map(|l| l.revision),
        "loaded_at": loaded.as_ref().map(|l| l.loaded_at.clone()),
    }))
}

/// GET /api/sync/status: same data as the version payload, shaped for sync
/// clients that only want to compare fingerprints.
pub fn sync_status_payload() -> HttpResponse {
    let loaded = CONTENT.current();
    let body = serde_json::json!({
        "status": "ok",
        "loaded": loaded.is_some(),
        "fingerprint": loaded.as_ref().map(|l| l.fingerprint.clone()),
        "revision": loaded.as_ref().map(|l| l.revision),
        "loaded_at": loaded.as_ref().map(|l| l.loaded_at.clone()),
    });
    json_response(200, "OK", &body)
}

/// POST /api/sync/content: recompute the fingerprint and reload only if it
/// moved. Guarded by FLAGSHIP_SYNC_TOKEN when that variable is set.
pub fn content_reload_payload(sync_token: Option<&str>) -> HttpResponse {
    if let Ok(expected) = std::env::var("FLAGSHIP_SYNC_TOKEN") {
        let provided = sync_token.unwrap_or("").trim();
        if provided != expected {
            let body = serde_json::json!({
                "status": "error",
                "message": "Invalid or missing flagship-sync-token",
            });
            return json_response(401, "Unauthorized", &body);
        }
    }

    let outcome = CONTENT.reload_if_changed(&data_dir(), &server_toggles());
    let (label, revision) = match outcome {
        ReloadOutcome::Unchanged { revision } => ("unchanged", revision),
        ReloadOutcome::Reloaded { revision } => ("reloaded", revision),
    };
    let body = serde_json::json!({
        "status": "ok",
        "outcome": label,
        "revision": revision,
    });
    json_response(200, "OK", &body)
}

fn json_response(status_code: u16, status_text: &'static str, body: &serde_json::Value) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: serde_json::to_string_pretty(body)
            .unwrap_or_else(|_| r#"{"status":"error"}"#.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_status_reports_ok_json() {
        let response = sync_status_payload();
        assert_eq!(response.status_code, 200);
        assert!(response.body.contains("\"status\": \"ok\""));
    }

    #[test]
    fn reload_with_wrong_token_is_rejected_when_token_configured() {
        // Only meaningful when the variable is set; the default test
        // environment leaves it unset and the endpoint stays open.
        if std::env::var("FLAGSHIP_SYNC_TOKEN").is_err() {
            let response = content_reload_payload(None);
            assert_eq!(response.status_code, 200);
        }
    }
}
