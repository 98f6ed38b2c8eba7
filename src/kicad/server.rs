//! HTTP binding for [`Api`] on top of tiny_http
//!
//! Requests are handled one at a time on the calling thread, so mutations
//! never interleave.

use std::net::SocketAddr;
use thiserror::Error;
use tiny_http::{Header, Request, Response, Server, StatusCode};
use tracing::{info, warn};

use crate::kicad::api::{Api, ApiRequest, ApiResponse};

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to bind {addr}: {message}")]
    Bind { addr: String, message: String },
}

pub struct LibraryServer {
    server: Server,
}

impl LibraryServer {
    /// Bind to `bind:port`; port 0 picks a free port
    pub fn bind(bind: &str, port: u16) -> Result<Self, ServeError> {
        let addr = format!("{}:{}", bind, port);
        let server = Server::http(&addr).map_err(|e| ServeError::Bind {
            addr: addr.clone(),
            message: e.to_string(),
        })?;
        Ok(Self { server })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serve requests until the listener shuts down
    pub fn run(self, mut api: Api) {
        if let Some(addr) = self.local_addr() {
            info!(%addr, "KiCad HTTP library listening");
            info!("  root:       http://{}/v1/", addr);
            info!("  categories: http://{}/v1/categories.json", addr);
            info!("  parts:      http://{}/v1/parts/category/{{category_id}}.json", addr);
            info!("  detail:     http://{}/v1/parts/{{part_id}}.json", addr);
        }

        for mut request in self.server.incoming_requests() {
            let api_request = match read_request(&mut request) {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, "failed to read request body");
                    let bad = Response::from_string("Bad request").with_status_code(StatusCode(400));
                    let _ = request.respond(bad);
                    continue;
                }
            };

            let response = api.handle(&api_request);
            info!(
                method = %api_request.method,
                url = %api_request.url,
                status = response.status,
                "handled"
            );

            if let Err(e) = request.respond(to_response(response)) {
                warn!(error = %e, "failed to send response");
            }
        }
    }
}

fn header_value(request: &Request, name: &'static str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.equiv(name))
        .map(|h| h.value.as_str().to_string())
}

fn read_request(request: &mut Request) -> std::io::Result<ApiRequest> {
    let mut body = Vec::new();
    request.as_reader().read_to_end(&mut body)?;

    Ok(ApiRequest {
        method: request.method().as_str().to_string(),
        url: request.url().to_string(),
        authorization: header_value(request, "Authorization"),
        host: header_value(request, "Host"),
        forwarded_proto: header_value(request, "X-Forwarded-Proto"),
        body,
    })
}

fn to_response(response: ApiResponse) -> Response<std::io::Cursor<Vec<u8>>> {
    let mut out = Response::from_data(response.body).with_status_code(StatusCode(response.status));
    let content_type = Header::from_bytes(&b"Content-Type"[..], response.content_type.as_bytes());
    if let Ok(header) = content_type {
        out = out.with_header(header);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kicad::projection::CatalogProjection;
    use std::io::{Read, Write};
    use std::net::TcpStream;
    use std::thread;
    use tempfile::tempdir;

    fn roundtrip(addr: SocketAddr, raw: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(raw.as_bytes()).unwrap();
        let mut out = String::new();
        stream.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_serves_over_tcp() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("cap.csv"), "IPN,Description\nCAP-001-0001,100n\n").unwrap();
        let api = Api::new(CatalogProjection::open(dir.path()), Some("t0k".into()));

        let server = LibraryServer::bind("127.0.0.1", 0).unwrap();
        let addr = server.local_addr().unwrap();
        thread::spawn(move || server.run(api));

        let out = roundtrip(addr, "GET /health HTTP/1.1\r\nHost: x\r\nConnection: close\r\n\r\n");
        assert!(out.starts_with("HTTP/1.1 200"));
        assert!(out.ends_with("OK\n"));

        let out = roundtrip(
            addr,
            "GET /v1/parts/CAP-001-0001.json HTTP/1.1\r\nHost: x\r\nAuthorization: Token t0k\r\nConnection: close\r\n\r\n",
        );
        assert!(out.starts_with("HTTP/1.1 200"));
        assert!(out.contains("application/json"));
        assert!(out.contains("\"CAP-001-0001\""));

        let out = roundtrip(
            addr,
            "GET /v1/categories.json HTTP/1.1\r\nHost: x\r\nConnection: close\r\n\r\n",
        );
        assert!(out.starts_with("HTTP/1.1 401"));
    }
}
