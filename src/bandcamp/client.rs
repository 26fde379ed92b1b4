use std::sync::Arc;

use reqwest::{StatusCode, Url, cookie::Jar, header};
use serde::{Serialize, de::DeserializeOwned};

use crate::bandcamp::api_types;
use crate::bandcamp::custom_types::{Collection, Fan, FanId};
use crate::bandcamp::error::{Error, Result};
use crate::bandcamp::valuation::CurrencyRates;

pub const DEFAULT_SITE: &str = "https://bandcamp.com";

const USER_AGENT: &str = concat!("bandcamp-collection/", env!("CARGO_PKG_VERSION"));

/// Client for the undocumented fan API. The `identity` login cookie is set
/// once at construction and only read afterwards.
pub struct Client {
    client: reqwest::Client,
    api_url: Url,
}

impl Client {
    /// `identity` is the value of the `identity` cookie of a logged in session
    pub fn new(identity: &str) -> Result<Self> {
        Self::with_site(identity, DEFAULT_SITE)
    }

    pub fn with_site(identity: &str, site: &str) -> Result<Self> {
        let site = Url::parse(site).map_err(|err| Error::Config(format!("{site}: {err}")))?;
        let api_url = site
            .join("api/")
            .map_err(|err| Error::Config(format!("{site}: {err}")))?;

        let jar = Jar::default();
        jar.add_cookie_str(&format!("identity={identity}; Path=/"), &site);

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_provider(Arc::new(jar))
            .build()?;
        Ok(Self { client, api_url })
    }

    fn endpoint(&self, endpoint: &str) -> Result<Url> {
        self.api_url
            .join(endpoint)
            .map_err(|err| Error::Config(format!("{endpoint}: {err}")))
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?;
        decode_response(status, content_type.as_deref(), &body)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.endpoint(endpoint)?;
        tracing::debug!(%url, "GET");
        self.send(self.client.get(url)).await
    }

    async fn post<T: DeserializeOwned>(&self, endpoint: &str, body: &impl Serialize) -> Result<T> {
        let url = self.endpoint(endpoint)?;
        tracing::debug!(%url, "POST");
        self.send(self.client.post(url).json(body)).await
    }

    /// The fan the identity cookie belongs to
    pub async fn fan(&self) -> Result<Fan> {
        let summary: api_types::CollectionSummary = self.get("fan/2/collection_summary").await?;
        Ok(summary.collection_summary)
    }

    /// Every purchased item, with tracklists and download URLs.
    ///
    /// The request token is derived from the current time, so two calls do
    /// not send identical bodies.
    pub async fn collection(&self, fan_id: FanId) -> Result<Collection> {
        let request = api_types::ItemsRequest::everything(fan_id, chrono::Utc::now());
        let response: api_types::CollectionItems = self
            .post("fancollection/1/collection_items", &request)
            .await?;
        response.try_into()
    }

    /// Every wishlisted item, with tracklists. Downloads are left empty.
    pub async fn wishlist(&self, fan_id: FanId) -> Result<Collection> {
        let request = api_types::ItemsRequest::everything(fan_id, chrono::Utc::now());
        let response: api_types::WishlistItems = self
            .post("fancollection/1/wishlist_items", &request)
            .await?;
        response.try_into()
    }

    /// Currency rates embedded in the fan's profile page
    pub async fn currency_rates(&self, fan: &Fan) -> Result<CurrencyRates> {
        tracing::debug!(url = %fan.url, "GET");
        let response = self.client.get(&fan.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status));
        }
        CurrencyRates::from_page(&response.text().await?)
    }

    /// Total cost of `items` converted to the `target` currency
    pub async fn value(&self, fan: &Fan, items: &Collection, target: &str) -> Result<f64> {
        self.currency_rates(fan).await?.total(items, target)
    }
}

/// Classify a fan API response: non-JSON bodies are status errors, and the
/// error envelope is checked before decoding into `T`.
pub(crate) fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<T> {
    if !content_type.is_some_and(|value| value.starts_with("application/json")) {
        return Err(Error::Status(status));
    }

    if let Ok(envelope) = serde_json::from_slice::<api_types::ErrorEnvelope>(body) {
        if envelope.error {
            return Err(Error::Api(envelope.error_message.unwrap_or_default()));
        }
    }

    Ok(serde_json::from_slice(body)?)
}
