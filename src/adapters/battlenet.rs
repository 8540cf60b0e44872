use crate::domain::model::{AuctionListing, ItemDetail};
use crate::domain::ports::GameDataApi;
use crate::utils::error::Result;
use crate::utils::validation::{validate_url, Validate};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use url::Url;

pub const DEFAULT_OAUTH_URL: &str = "https://oauth.battle.net/token";
pub const DEFAULT_API_BASE_URL: &str = "https://us.api.blizzard.com";

/// Tokens are refreshed this long before the server-side expiry.
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct ApiEndpoints {
    pub oauth_url: String,
    pub api_base_url: String,
    pub region: String,
    pub locale: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            oauth_url: DEFAULT_OAUTH_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            region: "us".to_string(),
            locale: "en_US".to_string(),
        }
    }
}

impl Validate for ApiEndpoints {
    fn validate(&self) -> Result<()> {
        validate_url("oauth_url", &self.oauth_url)?;
        validate_url("api_base_url", &self.api_base_url)?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

/// Battle.net game-data client using the OAuth client-credentials flow.
pub struct BattleNetClient {
    client: Client,
    client_id: String,
    client_secret: String,
    endpoints: ApiEndpoints,
    api_base: Url,
    token: Mutex<Option<AccessToken>>,
}

impl BattleNetClient {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        Self::with_endpoints(client_id, client_secret, ApiEndpoints::default())
    }

    pub fn with_endpoints(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        endpoints: ApiEndpoints,
    ) -> Result<Self> {
        endpoints.validate()?;
        let api_base = Url::parse(&endpoints.api_base_url)?;

        Ok(Self {
            client: Client::new(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            endpoints,
            api_base,
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        tracing::debug!("Requesting access token from {}", self.endpoints.oauth_url);
        let response = self
            .client
            .post(&self.endpoints.oauth_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?
            .error_for_status()?;

        let token: TokenResponse = response.json().await?;
        let lifetime = token
            .expires_in
            .unwrap_or(0)
            .saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);

        *cached = Some(AccessToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        });
        Ok(token.access_token)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.api_base.join(path)?;
        let token = self.access_token().await?;

        tracing::debug!("Making API request to: {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;
        tracing::debug!("API response status: {}", response.status());

        let body: T = response.error_for_status()?.json().await?;
        Ok(body)
    }
}

#[async_trait::async_trait]
impl GameDataApi for BattleNetClient {
    async fn item_detail(&self, item_id: i64) -> Result<ItemDetail> {
        let namespace = format!("static-{}", self.endpoints.region);
        self.get_json(
            &format!("/data/wow/item/{}", item_id),
            &[
                ("namespace", namespace.as_str()),
                ("locale", self.endpoints.locale.as_str()),
            ],
        )
        .await
    }

    async fn auctions(&self, connected_realm_id: i64) -> Result<AuctionListing> {
        let namespace = format!("dynamic-{}", self.endpoints.region);
        self.get_json(
            &format!("/data/wow/connected-realm/{}/auctions", connected_realm_id),
            &[("namespace", namespace.as_str())],
        )
        .await
    }
}
