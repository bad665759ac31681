//! Google OAuth2 authentication for the Keep API
//!
//! Implements the authorization code flow with a local HTTP server for
//! the callback. Tokens are cached in the Relay config directory and
//! refreshed ahead of expiry, so the browser round-trip happens once.
//! Uses synchronous HTTP (ureq) like the rest of the crate.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;

/// OAuth2 configuration and token management for Google Keep
pub struct KeepAuth {
    client_id: String,
    client_secret: String,
}

/// Cached token data on disk
#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    access_token: String,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
}

/// Token response from Google
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
    #[allow(dead_code)]
    token_type: String,
}

impl KeepAuth {
    /// Google OAuth2 endpoints
    const AUTH_URL: &'static str = "https://accounts.google.com/o/oauth2/v2/auth";
    const TOKEN_URL: &'static str = "https://oauth2.googleapis.com/token";

    /// Scope granting read and write access to Keep notes
    const KEEP_SCOPE: &'static str = "https://www.googleapis.com/auth/keep";

    /// Token cache filename in the Relay config directory
    const TOKEN_FILE: &'static str = "google-tokens.json";

    /// Seconds of validity a cached token must still have to be used
    const EXPIRY_BUFFER_S: i64 = 300;

    /// Port range to try for the local OAuth callback server
    const PORT_RANGE_START: u16 = 8080;
    const PORT_RANGE_END: u16 = 8090;

    /// Create a new KeepAuth instance
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

    /// Get a valid access token, refreshing or re-authenticating as needed
    pub fn access_token(&self) -> Result<String> {
        if let Ok(token) = self.load_token() {
            if token_usable(&token) {
                return Ok(token.access_token);
            }
            if let Some(refresh_token) = token.refresh_token
                && let Ok(new_token) = self.refresh_access_token(&refresh_token)
            {
                self.save_token(&new_token)?;
                return Ok(new_token.access_token);
            }
        }

        // No usable cache, run the interactive flow
        let token = self.authorization_code_flow()?;
        self.save_token(&token)?;
        Ok(token.access_token)
    }

    /// Check if a cached or refreshable token exists
    pub fn is_authenticated(&self) -> bool {
        if let Ok(token) = self.load_token() {
            if token_usable(&token) {
                return true;
            }
            if let Some(refresh_token) = token.refresh_token {
                return self.refresh_access_token(&refresh_token).is_ok();
            }
        }
        false
    }

    /// Drop the cached tokens (logout)
    ///
    /// Only touches the token cache file, so no OAuth client is needed.
    pub fn logout() -> Result<()> {
        config::remove(Self::TOKEN_FILE)
    }

    /// Perform the interactive authorization code flow
    fn authorization_code_flow(&self) -> Result<TokenResponse> {
        let (listener, port) = self.bind_callback_server()?;
        let redirect_uri = format!("http://localhost:{}", port);

        let auth_url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
            Self::AUTH_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&redirect_uri),
            urlencoding::encode(Self::KEEP_SCOPE),
        );

        println!("\n=== Google Keep Authentication Required ===");
        println!("Opening browser for authentication...");
        println!("If the browser doesn't open, visit: {}", auth_url);

        if let Err(e) = open::that(&auth_url) {
            eprintln!("Failed to open browser: {}. Please open the URL manually.", e);
        }

        println!("Waiting for authorization...");
        let code = self.wait_for_callback(listener)?;

        println!("Exchanging authorization code for tokens...");
        let mut response = ureq::post(Self::TOKEN_URL)
            .send_form([
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code.as_str()),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri.as_str()),
            ])
            .context("Failed to exchange authorization code")?;

        let token: TokenResponse = response
            .body_mut()
            .read_json()
            .context("Failed to parse token response")?;

        println!("Authentication successful!\n");
        Ok(token)
    }

    /// Bind the local callback server to the first free port in range
    fn bind_callback_server(&self) -> Result<(TcpListener, u16)> {
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

    /// Wait for the OAuth callback and extract the authorization code
    fn wait_for_callback(&self, listener: TcpListener) -> Result<String> {
        let (mut stream, _) = listener.accept().context("Failed to accept connection")?;

        let mut reader = BufReader::new(&stream);
        let mut request_line = String::new();
        reader
            .read_line(&mut request_line)
            .context("Failed to read request")?;

        // Request line looks like: GET /?code=AUTH_CODE&scope=... HTTP/1.1
        let code = query_param(&request_line, "code");
        let error = query_param(&request_line, "error");

        let (status, body) = if code.is_some() {
            ("200 OK", "Authentication successful! You can close this window.")
        } else {
            ("400 Bad Request", "Authentication failed. Please try again.")
        };

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n<html><body><h1>{}</h1></body></html>",
            status, body
        );
        stream.write_all(response.as_bytes()).ok();

        if let Some(err) = error {
            anyhow::bail!("OAuth error: {}", err);
        }

        code.context("No authorization code received")
    }

    /// Refresh an access token using a refresh token
    fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        let response = ureq::post(Self::TOKEN_URL)
            .send_form([
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .context("Failed to refresh access token")?;

        let mut token: TokenResponse = response
            .into_body()
            .read_json()
            .context("Failed to parse refresh token response")?;

        // Google omits the refresh token on refresh responses
        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token.to_string());
        }

        Ok(token)
    }

    fn load_token(&self) -> Result<StoredToken> {
        config::load_json(Self::TOKEN_FILE)
    }

    fn save_token(&self, token: &TokenResponse) -> Result<()> {
        let stored = StoredToken {
            access_token: token.access_token.clone(),
            refresh_token: token.refresh_token.clone(),
            expires_at: token
                .expires_in
                .map(|d| chrono::Utc::now().timestamp() + d as i64),
        };
        config::save_json(Self::TOKEN_FILE, &stored)
    }
}

/// A cached token is usable while it has comfortably not expired
fn token_usable(token: &StoredToken) -> bool {
    match token.expires_at {
        Some(expires_at) => expires_at > chrono::Utc::now().timestamp() + KeepAuth::EXPIRY_BUFFER_S,
        None => false,
    }
}

/// Extract one query parameter from an HTTP request line
fn query_param(request_line: &str, key: &str) -> Option<String> {
    let path = request_line.split_whitespace().nth(1)?;
    let query = path.split('?').nth(1)?;
    query.split('&').find_map(|param| {
        let mut parts = param.split('=');
        if parts.next() == Some(key) {
            parts.next().map(|s| s.to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_extracts_code() {
        let line = "GET /?code=abc123&scope=keep HTTP/1.1";
        assert_eq!(query_param(line, "code").as_deref(), Some("abc123"));
        assert_eq!(query_param(line, "scope").as_deref(), Some("keep"));
        assert!(query_param(line, "error").is_none());
    }

    #[test]
    fn test_query_param_without_query_string() {
        assert!(query_param("GET / HTTP/1.1", "code").is_none());
    }

    #[test]
    fn test_token_usable_respects_buffer() {
        let now = chrono::Utc::now().timestamp();
        let fresh = StoredToken {
            access_token: "t".into(),
            refresh_token: None,
            expires_at: Some(now + 3600),
        };
        assert!(token_usable(&fresh));

        // Expires within the buffer window, treat as stale
        let stale = StoredToken {
            access_token: "t".into(),
            refresh_token: None,
            expires_at: Some(now + 60),
        };
        assert!(!token_usable(&stale));

        let unknown = StoredToken {
            access_token: "t".into(),
            refresh_token: None,
            expires_at: None,
        };
        assert!(!token_usable(&unknown));
    }
}
