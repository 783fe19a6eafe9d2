use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::{Client, header::AUTHORIZATION};

use crate::{
    config::Credentials,
    types::{Token, TokenResponse},
};

/// Requests an app access token with the client-credentials grant.
///
/// Client credentials are sent as an HTTP Basic `Authorization` header, the
/// grant type as a form field. The returned token carries no refresh token;
/// a new one is requested once it expires.
///
/// # Errors
///
/// Network failures, non-success status codes (for example `400
/// invalid_client` for wrong credentials) and malformed response bodies are
/// returned as `reqwest::Error`.
pub async fn request_token(
    client: &Client,
    token_url: &str,
    credentials: &Credentials,
) -> Result<Token, reqwest::Error> {
    let res = client
        .post(token_url)
        .header(AUTHORIZATION, basic_auth_header(credentials))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?
        .error_for_status()?;

    let json: TokenResponse = res.json().await?;

    Ok(Token {
        access_token: json.access_token,
        token_type: json.token_type,
        expires_in: json.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}

/// Builds the `Basic base64(client_id:client_secret)` header value.
pub fn basic_auth_header(credentials: &Credentials) -> String {
    let pair = format!("{}:{}", credentials.client_id, credentials.client_secret);
    format!("Basic {}", STANDARD.encode(pair))
}
