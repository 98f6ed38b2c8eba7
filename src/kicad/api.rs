//! KiCad HTTP library API, independent of the HTTP server
//!
//! [`Api::handle`] takes an already-received request and produces the full
//! response, so routing, authentication and error mapping can be exercised
//! without a socket.

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::catalog::{CatalogError, ErrorKind};
use crate::kicad::model::{PartUpdate, RootLinks};
use crate::kicad::projection::CatalogProjection;

const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

/// An incoming request, reduced to what the API looks at
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    pub method: String,
    /// Request target, possibly with a query string
    pub url: String,
    pub authorization: Option<String>,
    pub host: Option<String>,
    pub forwarded_proto: Option<String>,
    pub body: Vec<u8>,
}

impl ApiRequest {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.authorization = Some(format!("Token {}", token));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    fn path(&self) -> &str {
        self.url.split(['?', '#']).next().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl ApiResponse {
    fn text(status: u16, message: &str) -> Self {
        Self {
            status,
            content_type: TEXT,
            body: format!("{}\n", message).into_bytes(),
        }
    }

    fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(mut body) => {
                body.push(b'\n');
                Self {
                    status: 200,
                    content_type: JSON,
                    body,
                }
            }
            Err(e) => Self::text(500, &format!("failed to encode response: {}", e)),
        }
    }

    fn error(err: &CatalogError) -> Self {
        let status = match err.kind() {
            ErrorKind::Rejected => 400,
            ErrorKind::Missing => 404,
            ErrorKind::Failed => 500,
        };
        if status == 500 {
            warn!(error = %err, "request failed");
        }
        Self::text(status, &err.to_string())
    }

    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or("")
    }
}

/// Routes requests to a [`CatalogProjection`]
pub struct Api {
    projection: CatalogProjection,
    token: Option<String>,
}

impl Api {
    /// An empty token disables authentication
    pub fn new(projection: CatalogProjection, token: Option<String>) -> Self {
        Self {
            projection,
            token: token.filter(|t| !t.is_empty()),
        }
    }

    fn authorized(&self, req: &ApiRequest) -> bool {
        match &self.token {
            None => true,
            Some(token) => req
                .authorization
                .as_deref()
                .and_then(|auth| auth.strip_prefix("Token "))
                .is_some_and(|given| given == token),
        }
    }

    pub fn handle(&mut self, req: &ApiRequest) -> ApiResponse {
        let path = req.path().to_string();
        debug!(method = %req.method, path = %path, "request");

        if path == "/health" {
            return ApiResponse::text(200, "OK");
        }
        if path != "/v1" && !path.starts_with("/v1/") {
            return ApiResponse::text(404, "Not found");
        }
        if !self.authorized(req) {
            return ApiResponse::text(401, "Unauthorized");
        }

        let method = req.method.to_ascii_uppercase();

        if path == "/v1" || path == "/v1/" {
            return match method.as_str() {
                "GET" => ApiResponse::json(&root_links(req)),
                _ => method_not_allowed(),
            };
        }

        if path == "/v1/categories.json" {
            return match method.as_str() {
                "GET" => ApiResponse::json(&self.projection.list_categories()),
                _ => method_not_allowed(),
            };
        }

        if let Some(rest) = path.strip_prefix("/v1/parts/category/") {
            let category = match decode_segment(rest.strip_suffix(".json").unwrap_or(rest)) {
                Ok(c) => c,
                Err(resp) => return resp,
            };
            return match method.as_str() {
                "GET" => ApiResponse::json(&self.projection.list_parts(&category)),
                _ => method_not_allowed(),
            };
        }

        if let Some(rest) = path.strip_prefix("/v1/parts/") {
            if let Some(id) = rest.strip_suffix("/revision") {
                let id = match decode_segment(id) {
                    Ok(id) => id,
                    Err(resp) => return resp,
                };
                return match method.as_str() {
                    "POST" => respond(self.projection.start_new_revision(&id)),
                    _ => method_not_allowed(),
                };
            }

            let id = match decode_segment(rest.strip_suffix(".json").unwrap_or(rest)) {
                Ok(id) => id,
                Err(resp) => return resp,
            };
            return match method.as_str() {
                "GET" => respond(self.projection.part_detail(&id)),
                "PUT" => match serde_json::from_slice::<PartUpdate>(&req.body) {
                    Ok(update) => respond(self.projection.update_part(&id, &update)),
                    Err(e) => ApiResponse::text(400, &format!("Bad request: {}", e)),
                },
                _ => method_not_allowed(),
            };
        }

        ApiResponse::text(404, "Not found")
    }
}

fn respond<T: Serialize>(result: Result<T, CatalogError>) -> ApiResponse {
    match result {
        Ok(value) => ApiResponse::json(&value),
        Err(e) => ApiResponse::error(&e),
    }
}

/// Percent-decode one path segment
fn decode_segment(raw: &str) -> Result<String, ApiResponse> {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .map_err(|e| ApiResponse::text(400, &format!("Bad request: {}", e)))
}

fn method_not_allowed() -> ApiResponse {
    ApiResponse::text(405, "Method not allowed")
}

fn root_links(req: &ApiRequest) -> RootLinks {
    let scheme = match req.forwarded_proto.as_deref() {
        Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
        _ => "http",
    };
    let host = req.host.as_deref().unwrap_or("localhost");
    let base = format!("{}://{}{}", scheme, host, req.path().trim_end_matches('/'));

    RootLinks {
        categories: format!("{}/categories.json", base),
        parts: format!("{}/parts", base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    const PARTS: &str = "IPN,Description,Value,Manufacturer,MPN
CAP-001-0001,100n X7R,100n,Murata,GRM155
RES-001-0003,10k 1%,10k,Yageo,RC0402FR-0710KL
";

    fn api(token: Option<&str>) -> (TempDir, Api) {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("parts.csv"), PARTS).unwrap();
        let projection = CatalogProjection::open(dir.path());
        (dir, Api::new(projection, token.map(str::to_string)))
    }

    fn json(resp: &ApiResponse) -> Value {
        serde_json::from_slice(&resp.body).unwrap()
    }

    #[test]
    fn test_health_needs_no_token() {
        let (_dir, mut api) = api(Some("secret"));
        let resp = api.handle(&ApiRequest::new("GET", "/health"));
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body_str(), "OK\n");
    }

    #[test]
    fn test_token_required_when_configured() {
        let (_dir, mut api) = api(Some("secret"));
        let resp = api.handle(&ApiRequest::new("GET", "/v1/categories.json"));
        assert_eq!(resp.status, 401);

        let resp = api.handle(&ApiRequest::new("GET", "/v1/categories.json").with_token("wrong"));
        assert_eq!(resp.status, 401);

        let resp = api.handle(&ApiRequest::new("GET", "/v1/categories.json").with_token("secret"));
        assert_eq!(resp.status, 200);
    }

    #[test]
    fn test_empty_token_disables_auth() {
        let (_dir, mut api) = api(Some(""));
        let resp = api.handle(&ApiRequest::new("GET", "/v1/categories.json"));
        assert_eq!(resp.status, 200);
    }

    #[test]
    fn test_root_links() {
        let (_dir, mut api) = api(None);
        let mut req = ApiRequest::new("GET", "/v1/");
        req.host = Some("parts.example.com:8080".into());
        req.forwarded_proto = Some("https".into());
        let body = json(&api.handle(&req));
        assert_eq!(body["categories"], "https://parts.example.com:8080/v1/categories.json");
        assert_eq!(body["parts"], "https://parts.example.com:8080/v1/parts");
    }

    #[test]
    fn test_categories_and_parts() {
        let (_dir, mut api) = api(None);
        let resp = api.handle(&ApiRequest::new("GET", "/v1/categories.json"));
        assert_eq!(resp.content_type, "application/json");
        let body = json(&resp);
        assert_eq!(body[0]["id"], "CAP");
        assert_eq!(body[0]["name"], "Capacitors");
        assert_eq!(body[1]["id"], "RES");

        let body = json(&api.handle(&ApiRequest::new("GET", "/v1/parts/category/RES.json")));
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], "RES-001-0003");
        assert_eq!(body[0]["name"], "10k 1%");
    }

    #[test]
    fn test_part_detail_preserves_field_order() {
        let (_dir, mut api) = api(None);
        let resp = api.handle(&ApiRequest::new("GET", "/v1/parts/CAP-001-0001.json"));
        assert_eq!(resp.status, 200);
        let text = resp.body_str();
        let ipn = text.find("\"IPN\"").unwrap();
        let mpn = text.find("\"MPN\"").unwrap();
        assert!(ipn < mpn);

        let body = json(&resp);
        assert_eq!(body["symbolIdStr"], "Device:C");
        assert_eq!(body["revision"], "0001");
        assert_eq!(body["fields"]["Value"]["value"], "100n");
    }

    #[test]
    fn test_error_statuses() {
        let (_dir, mut api) = api(None);
        let resp = api.handle(&ApiRequest::new("GET", "/v1/parts/CAP-404-0001.json"));
        assert_eq!(resp.status, 404);

        let resp = api.handle(
            &ApiRequest::new("PUT", "/v1/parts/CAP-001-0001.json").with_body("not json"),
        );
        assert_eq!(resp.status, 400);

        let resp = api.handle(&ApiRequest::new("DELETE", "/v1/parts/CAP-001-0001.json"));
        assert_eq!(resp.status, 405);

        let resp = api.handle(&ApiRequest::new("GET", "/v1/parts/CAP-001-0001/revision"));
        assert_eq!(resp.status, 405);

        let resp = api.handle(&ApiRequest::new("GET", "/v2/anything"));
        assert_eq!(resp.status, 404);
    }

    #[test]
    fn test_update_and_revision() {
        let (dir, mut api) = api(None);
        let req = ApiRequest::new("PUT", "/v1/parts/RES-001-0003.json").with_body(
            r#"{"description":"10k 1% 0402","sources":[{"manufacturer":"Yageo","mpn":"RC0402"},{"manufacturer":"Vishay","mpn":"CRCW0402"}]}"#,
        );
        let resp = api.handle(&req);
        assert_eq!(resp.status, 200);
        let body = json(&resp);
        assert_eq!(body["name"], "10k 1% 0402");
        assert_eq!(body["fields"]["MPN2"]["value"], "CRCW0402");

        let resp = api.handle(&ApiRequest::new("POST", "/v1/parts/RES-001-0003/revision"));
        assert_eq!(resp.status, 200);
        assert_eq!(json(&resp)["id"], "RES-001-0004");

        let content = fs::read_to_string(dir.path().join("parts.csv")).unwrap();
        assert!(content.contains("RES-001-0003,10k 1% 0402"));
        assert!(content.contains("RES-001-0004,10k 1% 0402"));
    }

    #[test]
    fn test_part_ids_are_percent_decoded() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("x.csv"), "IPN,Description\nodd one,spaced\n50%,percent\n").unwrap();
        let mut api = Api::new(CatalogProjection::open(dir.path()), None);

        let resp = api.handle(&ApiRequest::new("GET", "/v1/parts/odd%20one.json"));
        assert_eq!(resp.status, 200);
        assert_eq!(json(&resp)["name"], "spaced");

        let resp = api.handle(&ApiRequest::new("GET", "/v1/parts/50%25.json"));
        assert_eq!(resp.status, 200);
        assert_eq!(json(&resp)["id"], "50%");

        let resp = api.handle(&ApiRequest::new("GET", "/v1/parts/%FF.json"));
        assert_eq!(resp.status, 400);
    }

    #[test]
    fn test_revision_of_malformed_id_is_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("x.csv"), "IPN,Description\nodd-one,thing\n").unwrap();
        let mut api = Api::new(CatalogProjection::open(dir.path()), None);
        let resp = api.handle(&ApiRequest::new("POST", "/v1/parts/odd-one/revision"));
        assert_eq!(resp.status, 400);
    }
}
