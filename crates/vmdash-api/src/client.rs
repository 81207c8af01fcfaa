// vmrest HTTP client
//
// Wraps `reqwest::Client` with vmrest-specific URL construction, Basic
// auth, and error-body parsing. Endpoint groups (vms, power, guest,
// nics, folders, networks) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::ErrorBody;

/// The media type vmrest expects on both sides of every exchange.
pub const VMREST_CONTENT_TYPE: &str = "application/vnd.vmware.vmw.rest-v1+json";

/// HTTP Basic credentials for the vmrest daemon.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    pub username: String,
    pub password: SecretString,
}

/// Raw HTTP client for the vmrest API.
///
/// Handles the `{code, message}` error body, `/api`-rooted URL
/// construction, and per-request Basic auth. Methods return decoded
/// payloads -- callers never see HTTP plumbing.
pub struct VmRestClient {
    http: reqwest::Client,
    base_url: Url,
    auth: Option<BasicAuth>,
}

impl VmRestClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the daemon root (e.g. `http://127.0.0.1:8697`).
    pub fn new(
        base_url: Url,
        auth: Option<BasicAuth>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(VMREST_CONTENT_TYPE));
        let http = transport.build_client(headers)?;
        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (tests).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            auth: None,
        }
    }

    /// The daemon base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let full = format!(
            "{}/api/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        );
        Url::parse(&full).expect("invalid API URL")
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let mut req = self.http.request(method, url);
        if let Some(ref auth) = self.auth {
            req = req.basic_auth(&auth.username, Some(auth.password.expose_secret()));
        }
        req
    }

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_body(resp).await
    }

    /// Send a PUT with a JSON body under the vmrest content type.
    pub(crate) async fn put_json<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("PUT {}", url);
        let resp = self
            .request(Method::PUT, url)
            .header(CONTENT_TYPE, VMREST_CONTENT_TYPE)
            .body(encode(body)?)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_body(resp).await
    }

    /// Send a PUT with a JSON body, discarding the (possibly empty)
    /// success body. Port-forward writes answer 200/204 with no payload.
    pub(crate) async fn put_json_no_content(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<(), Error> {
        debug!("PUT {}", url);
        let resp = self
            .request(Method::PUT, url)
            .header(CONTENT_TYPE, VMREST_CONTENT_TYPE)
            .body(encode(body)?)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::expect_success(resp).await
    }

    /// Send a PUT with a raw text body (the power endpoint takes the bare
    /// operation string, not JSON).
    pub(crate) async fn put_text<T: DeserializeOwned>(
        &self,
        url: Url,
        body: String,
    ) -> Result<T, Error> {
        debug!("PUT {}", url);
        let resp = self
            .request(Method::PUT, url)
            .header(CONTENT_TYPE, VMREST_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_body(resp).await
    }

    /// Send a POST with a JSON body under the vmrest content type.
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self
            .request(Method::POST, url)
            .header(CONTENT_TYPE, VMREST_CONTENT_TYPE)
            .body(encode(body)?)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_body(resp).await
    }

    /// Send a DELETE and expect an empty success response.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);
        let resp = self
            .request(Method::DELETE, url)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::expect_success(resp).await
    }

    // ── Response parsing ─────────────────────────────────────────────

    /// Decode a JSON success body, or map the failure into the right
    /// `Error` variant.
    async fn parse_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: "vmrest rejected the credentials".into(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(api_error(status, body));
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// Check status only, discarding any success body.
    async fn expect_success(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: "vmrest rejected the credentials".into(),
            });
        }

        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        Err(api_error(status, body))
    }
}

/// Serialize a request body (failure here is a programming error, but
/// surfaced rather than panicking).
fn encode(body: &impl Serialize) -> Result<String, Error> {
    serde_json::to_string(body).map_err(|e| Error::Deserialization {
        message: format!("request serialization: {e}"),
        body: String::new(),
    })
}

/// Build an `Error::Api` from a non-2xx response, parsing the
/// `{code, message}` body when present.
fn api_error(status: StatusCode, body: String) -> Error {
    let status = status.as_u16();
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => Error::Api {
            message: parsed
                .message
                .unwrap_or_else(|| format!("HTTP {status}")),
            code: parsed.code,
            status,
        },
        Err(_) => Error::Api {
            message: if body.is_empty() {
                format!("HTTP {status}")
            } else {
                body
            },
            code: None,
            status,
        },
    }
}
