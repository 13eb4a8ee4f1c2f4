use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Proxy};
use url::Url;

use super::mask::CEP_DIGITS;
use super::models::ViaCepResponse;
use crate::config::AppConfig;
use crate::{Error, Result};

/// Source of address data for a cleaned, eight-digit CEP
#[async_trait::async_trait]
pub trait CepLookup: Send + Sync {
    /// Look up a CEP. Any transport, status or parse problem is an error;
    /// a not-found CEP is a successful response carrying `erro`.
    async fn lookup(&self, cep: &str) -> Result<ViaCepResponse>;
}

/// ViaCEP HTTP client
pub struct ViaCepClient {
    client: Client,
    base_url: Url,
}

impl ViaCepClient {
    /// Create a client from the `[lookup]` configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let lookup = &config.lookup;
        let client = Self::build_client(
            lookup.request_timeout_secs,
            &lookup.proxy_url,
            &lookup.user_agent,
        )?;
        let base_url = Self::parse_base_url(&lookup.base_url)?;

        Ok(Self { client, base_url })
    }

    /// Build HTTP client with optional timeout and proxy
    fn build_client(
        timeout_secs: Option<u64>,
        proxy_url: &Option<String>,
        user_agent: &str,
    ) -> Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Ok(ua) = HeaderValue::from_str(user_agent) {
            headers.insert(USER_AGENT, ua);
        }

        let mut builder = Client::builder()
            .default_headers(headers)
            .gzip(true)
            .redirect(reqwest::redirect::Policy::limited(5));

        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if let Some(ref proxy) = proxy_url {
            let proxy = Proxy::all(proxy)
                .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
            tracing::info!("Using HTTP proxy for CEP lookups");
        }

        builder.build().map_err(Error::Http)
    }

    /// Parse the base URL, making sure it ends with a slash so `join` appends
    fn parse_base_url(base_url: &str) -> Result<Url> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let url = Url::parse(&format!("{}/", trimmed))?;
        if url.cannot_be_a_base() {
            return Err(Error::Config(format!("Invalid lookup base URL: {}", base_url)));
        }
        Ok(url)
    }

    /// Endpoint for a cleaned CEP: `{base_url}/{cep}/json/`
    pub fn endpoint(&self, cep: &str) -> Result<Url> {
        if cep.len() != CEP_DIGITS || !cep.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidCep(cep.to_string()));
        }
        Ok(self.base_url.join(&format!("{}/json/", cep))?)
    }
}

#[async_trait::async_trait]
impl CepLookup for ViaCepClient {
    async fn lookup(&self, cep: &str) -> Result<ViaCepResponse> {
        let url = self.endpoint(cep)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        let parsed: ViaCepResponse = serde_json::from_slice(&body)?;

        tracing::debug!(
            "Lookup for {} answered: uf={:?} not_found={}",
            cep,
            parsed.uf,
            parsed.is_not_found()
        );

        Ok(parsed)
    }
}
