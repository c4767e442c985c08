// Twinkly HTTP client
//
// Wraps `reqwest::Client` with `/xled/v1` URL construction, token headers,
// and `{ code, ... }` envelope unwrapping. Endpoint groups (auth, device,
// led) are implemented as inherent methods in separate files to keep this
// module focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::AuthToken;
use crate::error::Error;
use crate::models::{CODE_OK, CodeHeader, Coded};
use crate::transport::TransportConfig;

const API_PREFIX: &str = "xled/v1/";
const TOKEN_HEADER: &str = "X-Auth-Token";

/// Raw HTTP client for one Twinkly controller.
///
/// Holds no session state: the authentication token is owned by the caller
/// and passed into every call that needs it.
#[derive(Debug, Clone)]
pub struct TwinklyClient {
    http: reqwest::Client,
    base_url: Url,
}

impl TwinklyClient {
    /// Create a client for a device reachable at `host` (an IP address or
    /// hostname, optionally with `:port`).
    pub fn new(host: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let root = Url::parse(&format!("http://{host}/"))?;
        let base_url = root.join(API_PREFIX)?;
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client rooted at an arbitrary server URL, appending the API
    /// prefix. Used against mock servers.
    pub fn with_root(http: reqwest::Client, root: &Url) -> Result<Self, Error> {
        let base_url = root.join(API_PREFIX)?;
        Ok(Self { http, base_url })
    }

    /// The API base URL (`http://{host}/xled/v1/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The device host (and port, when not the default).
    pub fn host(&self) -> String {
        match (self.base_url.host_str(), self.base_url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_owned(),
            (None, _) => self.base_url.to_string(),
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the result envelope.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&AuthToken>,
    ) -> Result<T, Error> {
        let url = self.endpoint_url(path)?;
        debug!("GET {}", url);

        let mut builder = self.http.get(url);
        if let Some(token) = token {
            builder = builder.header(TOKEN_HEADER, token.expose());
        }
        let resp = builder.send().await.map_err(Error::Transport)?;

        parse_envelope(path, resp).await
    }

    /// Send a POST request with a JSON body and unwrap the result envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&AuthToken>,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.endpoint_url(path)?;
        debug!("POST {}", url);

        let mut builder = self.http.post(url).json(body);
        if let Some(token) = token {
            builder = builder.header(TOKEN_HEADER, token.expose());
        }
        let resp = builder.send().await.map_err(Error::Transport)?;

        parse_envelope(path, resp).await
    }
}

/// Check the HTTP status, then the `code` field, returning the payload.
async fn parse_envelope<T: DeserializeOwned>(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<T, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(Error::Authentication {
            message: format!("token rejected by {endpoint} (HTTP {status})"),
        });
    }

    if !status.is_success() {
        return Err(Error::Http {
            endpoint: endpoint.to_owned(),
            status: status.as_u16(),
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;
    decode_body(endpoint, &body)
}

/// Read the `code` first, then the payload fields.
fn decode_body<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, Error> {
    let header: CodeHeader = serde_json::from_str(body).map_err(|e| deserialization(&e, body))?;
    if header.code != CODE_OK {
        return Err(Error::DeviceCode {
            endpoint: endpoint.to_owned(),
            code: header.code,
        });
    }

    let envelope: Coded<T> = serde_json::from_str(body).map_err(|e| deserialization(&e, body))?;
    Ok(envelope.body)
}

fn deserialization(err: &serde_json::Error, body: &str) -> Error {
    let preview: String = body.chars().take(200).collect();
    Error::Deserialization {
        message: format!("{err} (body preview: {preview:?})"),
        body: body.to_owned(),
    }
}
