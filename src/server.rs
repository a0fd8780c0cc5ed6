//! HTTP front for the site.
//!
//! Routing is a pure function, [`route`], from `(site, method, url)` to a
//! [`Reply`]; the [`Server`] only moves bytes between `tiny_http` and that
//! function. Worker threads share one listening socket and one `Arc<Site>`,
//! and nothing else.
//!
//! | Path | Response |
//! |------|----------|
//! | `/`, `/index.html` | home page, `text/html` |
//! | `/index.md` | markdown rendition, `text/markdown` |
//! | anything else | `404` |

use crate::config;
use crate::markdown::{CACHE_CONTROL, TextResponse, TextRoute};
use crate::output;
use crate::render;
use crate::site::Site;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread;
use thiserror::Error;
use tiny_http::{Header, Method, Request, Response};

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
const PLAIN_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("could not listen on {addr}: {source}")]
    Bind {
        addr: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid response header: {0}")]
    Header(&'static str),
}

/// A routed response, before it is handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub cache_control: Option<&'static str>,
    /// `Allow` header, set on 405 replies.
    pub allow: Option<&'static str>,
    pub body: Vec<u8>,
}

impl Reply {
    fn html(body: String) -> Self {
        Self {
            status: 200,
            content_type: HTML_CONTENT_TYPE,
            cache_control: Some(CACHE_CONTROL),
            allow: None,
            body: body.into_bytes(),
        }
    }

    fn not_found() -> Self {
        Self {
            status: 404,
            content_type: PLAIN_CONTENT_TYPE,
            cache_control: None,
            allow: None,
            body: b"404 Not Found".to_vec(),
        }
    }

    fn method_not_allowed() -> Self {
        Self {
            status: 405,
            content_type: PLAIN_CONTENT_TYPE,
            cache_control: None,
            allow: Some("GET, HEAD"),
            body: b"405 Method Not Allowed".to_vec(),
        }
    }

    fn into_response(self) -> Result<Response<std::io::Cursor<Vec<u8>>>, ServeError> {
        let mut response = Response::from_data(self.body)
            .with_status_code(self.status)
            .with_header(header("Content-Type", self.content_type)?);
        if let Some(cache) = self.cache_control {
            response = response.with_header(header("Cache-Control", cache)?);
        }
        if let Some(allow) = self.allow {
            response = response.with_header(header("Allow", allow)?);
        }
        Ok(response)
    }
}

impl From<TextResponse> for Reply {
    fn from(text: TextResponse) -> Self {
        Self {
            status: text.status,
            content_type: text.content_type,
            cache_control: Some(text.cache_control),
            allow: None,
            body: text.body.into_bytes(),
        }
    }
}

fn header(name: &'static str, value: &'static str) -> Result<Header, ServeError> {
    Header::from_bytes(name, value).map_err(|()| ServeError::Header(name))
}

/// Map a request to its reply. Query strings and fragments are ignored.
///
/// HEAD is routed like GET; the transport drops the body.
pub fn route(site: &Site, method: &Method, url: &str) -> Reply {
    if !matches!(method, Method::Get | Method::Head) {
        return Reply::method_not_allowed();
    }
    let path = url.split(['?', '#']).next().unwrap_or("/");
    if let Some(text) = TextRoute::from_path(path) {
        return text.respond(site).into();
    }
    match path {
        "/" | "/index.html" => Reply::html(render::render_home(site).into_string()),
        _ => Reply::not_found(),
    }
}

/// A bound listener serving one [`Site`].
pub struct Server {
    http: tiny_http::Server,
    site: Arc<Site>,
}

impl Server {
    pub fn bind(site: Arc<Site>, addr: &str) -> Result<Self, ServeError> {
        let http = tiny_http::Server::http(addr).map_err(|source| ServeError::Bind {
            addr: addr.to_string(),
            source,
        })?;
        Ok(Self { http, site })
    }

    /// The bound address; resolves port `0` to the port actually assigned.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.http.server_addr().to_ip()
    }

    /// Serve requests on `workers` threads. Blocks for the life of the server.
    pub fn run(&self, workers: usize) {
        thread::scope(|scope| {
            for _ in 0..workers.max(1) {
                scope.spawn(|| self.worker());
            }
        });
    }

    fn worker(&self) {
        for request in self.http.incoming_requests() {
            // A failed write only affects that one client.
            if let Err(e) = self.handle(request) {
                output::print_error(&e);
            }
        }
    }

    fn handle(&self, request: Request) -> Result<(), ServeError> {
        let reply = route(&self.site, request.method(), request.url());
        output::print_request(request.method().as_str(), request.url(), reply.status);
        request.respond(reply.into_response()?)?;
        Ok(())
    }
}

/// Bind the configured address and serve until the process exits.
pub fn serve(site: Arc<Site>) -> Result<(), ServeError> {
    let addr = site.server().addr.clone();
    let workers = config::effective_workers(site.server());
    let server = Server::bind(Arc::clone(&site), &addr)?;
    let bound = server
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or(addr);
    output::print_serve_banner(&site, &bound, workers);
    server.run(workers);
    Ok(())
}
