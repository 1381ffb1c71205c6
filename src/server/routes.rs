use crate::server::api;
use crate::server::sync;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }
}

pub fn route_request(
    method: &str,
    path: &str,
    body: &str,
    sync_token: Option<&str>,
) -> HttpResponse {
    match (method, path) {
        ("GET", "/") => ok_json(index_payload()),
        ("GET", "/api/health") => match api::health_payload() {
            Ok(payload) => ok_json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        (method, path) if method == "GET" && path.starts_with("/api/upgrades") => {
            match api::upgrades_payload(path) {
                Ok(payload) => ok_json(payload),
                Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
            }
        }
        ("GET", "/api/ships") => match api::ships_payload() {
            Ok(payload) => ok_json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/squadrons") => match api::squadrons_payload() {
            Ok(payload) => ok_json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/objectives") => match api::objectives_payload() {
            Ok(payload) => ok_json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/gamemodes") => match api::gamemodes_payload() {
            Ok(payload) => ok_json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/content/version") => match sync::content_version_payload() {
            Ok(payload) => ok_json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("POST", "/api/eligibility") => match api::eligibility_payload(body) {
            Ok(payload) => ok_json(payload),
            Err(api::RequestError::Parse(err)) => {
                error_response(400, "Bad Request", &format!("Invalid request body: {err}"))
            }
            Err(api::RequestError::Validation(validation)) => {
                validation_error_response(400, "Bad Request", validation)
            }
        },
        ("POST", "/api/fleet/validate") => match api::fleet_validate_payload(body) {
            Ok(payload) => ok_json(payload),
            Err(api::RequestError::Parse(err)) => {
                error_response(400, "Bad Request", &format!("Invalid request body: {err}"))
            }
            Err(api::RequestError::Validation(validation)) => {
                validation_error_response(400, "Bad Request", validation)
            }
        },
        ("POST", "/api/sweep") => match api::sweep_payload(body) {
            Ok(payload) => ok_json(payload),
            Err(api::RequestError::Parse(err)) => {
                error_response(400, "Bad Request", &format!("Invalid request body: {err}"))
            }
            Err(api::RequestError::Validation(validation)) => {
                validation_error_response(400, "Bad Request", validation)
            }
        },
        ("GET", "/api/sync/status") => sync::sync_status_payload(),
        ("POST", "/api/sync/content") => sync::content_reload_payload(sync_token),
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn ok_json(body: String) -> HttpResponse {
    HttpResponse {
        status_code: 200,
        status_text: "OK",
        content_type: "application/json",
        body,
    }
}

fn validation_error_response(
    status_code: u16,
    status_text: &'static str,
    payload: api::ValidationErrorResponse,
) -> HttpResponse {
    let fallback =
        "{\n  \"status\": \"error\",\n  \"message\": \"Validation failed\"\n}".to_string();

    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: serde_json::to_string_pretty(&payload).unwrap_or(fallback),
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

fn index_payload() -> String {
    serde_json::to_string_pretty(&serde_json::json!({
        "service": "flagship-api",
        "endpoints": [
            "GET /api/health",
            "GET /api/upgrades?slot=&faction=&search=",
            "GET /api/ships",
            "GET /api/squadrons",
            "GET /api/objectives",
            "GET /api/gamemodes",
            "GET /api/content/version",
            "POST /api/eligibility",
            "POST /api/fleet/validate",
            "POST /api/sweep",
            "GET /api/sync/status",
            "POST /api/sync/content",
        ],
    }))
    .unwrap_or_else(|_| r#"{"service":"flagship-api"}"#.to_string())
}
