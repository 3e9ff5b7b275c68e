// Credential exchange against Microsoft Entra ID

use serde::Deserialize;

use crate::config::Config;
use crate::error::Error;

const TOKEN_ENDPOINT_TEMPLATE: &str =
    "https://login.microsoftonline.com/{tenant}/oauth2/v2.0/token";
const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";

/// Produces a bearer token for the management API. One token is fetched per
/// invocation; nothing is cached.
pub trait TokenProvider {
    fn access_token(&self) -> Result<String, Error>;
}

/// OAuth2 client-credentials flow using the app registration from the
/// environment.
pub struct ClientSecretCredential {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    http: reqwest::blocking::Client,
}

impl ClientSecretCredential {
    pub fn new(config: &Config) -> Self {
        Self {
            tenant_id: config.tenant_id.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            http: reqwest::blocking::Client::new(),
        }
    }
}

impl TokenProvider for ClientSecretCredential {
    fn access_token(&self) -> Result<String, Error> {
        let url = TOKEN_ENDPOINT_TEMPLATE.replace("{tenant}", &self.tenant_id);
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", MANAGEMENT_SCOPE),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .http
            .post(url)
            .form(&params)
            .send()
            .map_err(|err| Error::Authentication(format!("token request failed: {}", err)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(Error::Authentication(format!(
                "token endpoint rejected the request: {}, response: {}",
                status, body
            )));
        }

        let payload: TokenResponse = response
            .json()
            .map_err(|err| Error::Authentication(format!("invalid token response: {}", err)))?;

        if payload.access_token.is_empty() {
            return Err(Error::Authentication(
                "token endpoint returned an empty access token".to_string(),
            ));
        }

        Ok(payload.access_token)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_endpoint_fills_in_the_tenant() {
        let url = TOKEN_ENDPOINT_TEMPLATE.replace("{tenant}", "my-tenant");
        assert_eq!(
            url,
            "https://login.microsoftonline.com/my-tenant/oauth2/v2.0/token"
        );
    }
}
