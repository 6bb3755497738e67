//! Google OAuth2 authorization
//!
//! Obtains a short-lived access token (plus an OpenID id token) for the
//! reader's scopes. The browser flow uses a local HTTP server to receive the
//! OAuth callback and exchanges the code immediately; nothing is persisted and
//! no refresh token is requested.
//! Uses synchronous HTTP (ureq) to be executor-agnostic.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Deserialize;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use url::Url;

use crate::models::AccessToken;

/// Scopes requested at login: OpenID identity plus read-only mailbox access
pub const READER_SCOPES: &[&str] = &[
    "openid",
    "email",
    "profile",
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
    "https://www.googleapis.com/auth/gmail.readonly",
];

/// Result of a successful authorization
#[derive(Debug, Clone)]
pub struct TokenGrant {
    /// Bearer token for API calls
    pub access_token: AccessToken,
    /// OpenID Connect id token (JWT), present when `openid` was granted
    pub id_token: Option<String>,
}

/// Something that can hand out an access token for a set of scopes
pub trait Authorizer {
    fn authorize(&self, scopes: &[&str]) -> Result<TokenGrant>;
}

/// Authorizer backed by a token acquired elsewhere
///
/// Useful for scripting: `GMAIL_ACCESS_TOKEN=$(gcloud auth print-access-token)`.
pub struct StaticAuthorizer {
    token: AccessToken,
}

impl StaticAuthorizer {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(token),
        }
    }
}

impl Authorizer for StaticAuthorizer {
    fn authorize(&self, _scopes: &[&str]) -> Result<TokenGrant> {
        if self.token.is_empty() {
            anyhow::bail!("Provided access token is empty");
        }
        Ok(TokenGrant {
            access_token: self.token.clone(),
            id_token: None,
        })
    }
}

/// Token response from Google
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    id_token: Option<String>,
}

/// What the browser sent back to the loopback server
#[derive(Debug, PartialEq)]
enum Callback {
    Code(String),
    Error(String),
    Missing,
}

/// Browser-based Google OAuth2 authorizer
pub struct GmailAuth {
    client_id: String,
    client_secret: String,
}

impl GmailAuth {
    /// Google OAuth2 endpoints
    const AUTH_URL: &'static str = "https://accounts.google.com/o/oauth2/v2/auth";
    const TOKEN_URL: &'static str = "https://oauth2.googleapis.com/token";

    /// Port range to try for local OAuth callback server
    const PORT_RANGE_START: u16 = 8080;
    const PORT_RANGE_END: u16 = 8090;

    /// Create a new GmailAuth instance
    ///
    /// # Arguments
    /// * `client_id` - OAuth2 client ID from Google Cloud Console
    /// * `client_secret` - OAuth2 client secret from Google Cloud Console
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
        }
    }

    /// Build the consent page URL
    fn authorization_url(&self, redirect_uri: &str, scopes: &[&str], state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=online&prompt=select_account&state={}",
            Self::AUTH_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&scopes.join(" ")),
            urlencoding::encode(state),
        )
    }

    /// Start a local TCP server on an available port
    fn start_local_server(&self) -> Result<(TcpListener, u16)> {
        for port in Self::PORT_RANGE_START..=Self::PORT_RANGE_END {
            if let Ok(listener) = TcpListener::bind(format!("127.0.0.1:{}", port)) {
                return Ok((listener, port));
            }
        }
        anyhow::bail!(
            "Could not bind to any port in range {}-{}",
            Self::PORT_RANGE_START,
            Self::PORT_RANGE_END
        )
    }

    /// Wait for OAuth callback and extract authorization code
    fn wait_for_callback(&self, listener: TcpListener, expected_state: &str) -> Result<String> {
        let (mut stream, _) = listener.accept().context("Failed to accept connection")?;

        let mut reader = BufReader::new(&stream);
        let mut request_line = String::new();
        reader
            .read_line(&mut request_line)
            .context("Failed to read request")?;

        let callback = parse_callback(&request_line, expected_state);

        let (status, body) = match callback {
            Callback::Code(_) => ("200 OK", "Signed in. You can close this window."),
            _ => ("400 Bad Request", "Sign-in failed. Please try again."),
        };
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n<html><body><h1>{}</h1></body></html>",
            status, body
        );
        stream.write_all(response.as_bytes()).ok();

        match callback {
            Callback::Code(code) => Ok(code),
            Callback::Error(err) => anyhow::bail!("OAuth error: {}", err),
            Callback::Missing => anyhow::bail!("No authorization code received"),
        }
    }

    /// Exchange an authorization code for tokens
    fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<TokenResponse> {
        let mut response = ureq::post(Self::TOKEN_URL)
            .send_form([
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri),
            ])
            .context("Failed to exchange authorization code")?;

        let token: TokenResponse = response
            .body_mut()
            .read_json()
            .context("Failed to parse token response")?;

        Ok(token)
    }
}

impl Authorizer for GmailAuth {
    fn authorize(&self, scopes: &[&str]) -> Result<TokenGrant> {
        let (listener, port) = self.start_local_server()?;
        let redirect_uri = format!("http://localhost:{}", port);
        let state = random_state();
        let auth_url = self.authorization_url(&redirect_uri, scopes, &state);

        eprintln!("Opening browser for Google sign-in...");
        eprintln!("If the browser doesn't open, visit: {}", auth_url);
        if let Err(e) = open::that(&auth_url) {
            warn!("Failed to open browser: {}", e);
        }

        debug!("Waiting for OAuth callback on port {}", port);
        let code = self.wait_for_callback(listener, &state)?;
        let token = self.exchange_code(&code, &redirect_uri)?;

        info!(
            "Authorization succeeded (id token {})",
            if token.id_token.is_some() { "present" } else { "absent" }
        );
        Ok(TokenGrant {
            access_token: AccessToken::new(token.access_token),
            id_token: token.id_token,
        })
    }
}

/// Parse the request line of the OAuth redirect
///
/// Format: `GET /?state=...&code=AUTH_CODE&scope=... HTTP/1.1`
fn parse_callback(request_line: &str, expected_state: &str) -> Callback {
    let Some(path) = request_line.split_whitespace().nth(1) else {
        return Callback::Missing;
    };
    let Ok(url) = Url::parse(&format!("http://localhost{}", path)) else {
        return Callback::Missing;
    };

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => return Callback::Error(value.into_owned()),
            _ => {}
        }
    }

    match (code, state) {
        (Some(code), Some(state)) if state == expected_state => Callback::Code(code),
        (Some(_), _) => Callback::Error("state mismatch".to_string()),
        _ => Callback::Missing,
    }
}

/// Generate an unguessable-enough CSRF state value
fn random_state() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u128(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default(),
    );
    format!("{:016x}", hasher.finish())
}
