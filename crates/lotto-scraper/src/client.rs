//! HTTP client for the operator's retailer page, results page and
//! round-lookup endpoint.

use std::time::Duration;

use lotto_core::AppConfig;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;

use crate::decode::decode_html;
use crate::error::ScraperError;

const DEFAULT_STORE_BASE_URL: &str = "https://dhlottery.co.kr/";
const DEFAULT_API_BASE_URL: &str = "https://www.dhlottery.co.kr/";

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_KO: &str = "ko-KR,ko;q=0.9,en-US;q=0.7,en;q=0.6";

/// Fallback wait when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Body of `common.do?method=getLottoNumber`. Unpublished rounds answer with
/// `returnValue: "fail"` and no draw number.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DrawLookup {
    #[serde(default)]
    return_value: Option<String>,
    #[serde(default)]
    drw_no: Option<u32>,
}

/// Client for the lottery operator's public pages.
///
/// Use [`LottoClient::from_config`] in production and
/// [`LottoClient::with_base_urls`] to point at a mock server in tests.
pub struct LottoClient {
    client: Client,
    store_endpoint: Url,
    results_endpoint: Url,
    api_endpoint: Url,
    referer: String,
}

impl LottoClient {
    /// Creates a client pointed at the production site.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        Self::with_base_urls(
            DEFAULT_STORE_BASE_URL,
            DEFAULT_API_BASE_URL,
            timeout_secs,
            user_agent,
        )
    }

    /// Creates a client from the loaded application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`LottoClient::with_base_urls`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::with_base_urls(
            &config.store_base_url,
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with custom base URLs (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`ScraperError::InvalidBaseUrl`] if either base URL does not
    /// parse.
    pub fn with_base_urls(
        store_base_url: &str,
        api_base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let store_base = parse_base_url(store_base_url)?;
        let api_base = parse_base_url(api_base_url)?;
        let store_endpoint = join_endpoint(&store_base, "store.do")?;
        let results_endpoint = join_endpoint(&store_base, "gameResult.do")?;
        let api_endpoint = join_endpoint(&api_base, "common.do")?;

        Ok(Self {
            client,
            store_endpoint,
            results_endpoint,
            api_endpoint,
            referer: store_base.to_string(),
        })
    }

    /// URL of the rank-1/rank-2 retailer listing for `round`.
    #[must_use]
    pub fn store_page_url(&self, round: u32) -> Url {
        let mut url = self.store_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("method", "topStore")
            .append_pair("drwNo", &round.to_string())
            .append_pair("pageGubun", "L645");
        url
    }

    /// [`LottoClient::store_page_url`] with a literal `{drwNo}` placeholder.
    #[must_use]
    pub fn store_page_url_template(&self) -> String {
        format!("{}?method=topStore&pageGubun=L645&drwNo={{drwNo}}", self.store_endpoint)
    }

    /// [`LottoClient::round_api_url`] with a literal `{drwNo}` placeholder.
    #[must_use]
    pub fn round_api_url_template(&self) -> String {
        format!("{}?method=getLottoNumber&drwNo={{drwNo}}", self.api_endpoint)
    }

    /// URL of the latest-draw results page.
    #[must_use]
    pub fn results_page_url(&self) -> Url {
        let mut url = self.results_endpoint.clone();
        url.query_pairs_mut().append_pair("method", "byWin");
        url
    }

    /// URL of the JSON draw lookup for `round`.
    #[must_use]
    pub fn round_api_url(&self, round: u32) -> Url {
        let mut url = self.api_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("method", "getLottoNumber")
            .append_pair("drwNo", &round.to_string());
        url
    }

    /// Fetches the retailer page for `round` and decodes it to text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] on HTTP 429.
    /// - [`ScraperError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ScraperError::Http`] on network or TLS failure.
    pub async fn fetch_store_page(&self, round: u32) -> Result<String, ScraperError> {
        let html = self.fetch_html(self.store_page_url(round)).await?;
        tracing::debug!(round, chars = html.len(), "fetched store page");
        Ok(html)
    }

    /// Fetches the latest-draw results page and decodes it to text.
    ///
    /// # Errors
    ///
    /// Same as [`LottoClient::fetch_store_page`].
    pub async fn fetch_results_page(&self) -> Result<String, ScraperError> {
        let html = self.fetch_html(self.results_page_url()).await?;
        tracing::debug!(chars = html.len(), "fetched results page");
        Ok(html)
    }

    async fn fetch_html(&self, url: Url) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_KO)
            .header(REFERER, &self.referer)
            .send()
            .await?;
        let response = check_status(response, &url)?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await?;

        tracing::trace!(%url, bytes = bytes.len(), content_type = ?content_type, "decoding html response");
        Ok(decode_html(&bytes, content_type.as_deref()))
    }

    /// Asks the draw-lookup endpoint whether `round` has been published.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] / [`ScraperError::UnexpectedStatus`]
    ///   on a non-2xx status.
    /// - [`ScraperError::Http`] on network failure.
    /// - [`ScraperError::Deserialize`] if the body is not the expected JSON.
    pub async fn round_exists(&self, round: u32) -> Result<bool, ScraperError> {
        let url = self.round_api_url(round);
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_KO)
            .send()
            .await?;
        let response = check_status(response, &url)?;
        let body = response.text().await?;

        let lookup: DrawLookup =
            serde_json::from_str(&body).map_err(|e| ScraperError::Deserialize {
                context: format!("getLottoNumber(drwNo={round})"),
                source: e,
            })?;

        Ok(lookup.return_value.as_deref() == Some("success") && lookup.drw_no == Some(round))
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, ScraperError> {
    // Exactly one trailing slash, so joins append rather than replace the
    // last path segment.
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| ScraperError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })
}

fn join_endpoint(base: &Url, path: &str) -> Result<Url, ScraperError> {
    base.join(path).map_err(|e| ScraperError::InvalidBaseUrl {
        base_url: base.to_string(),
        reason: e.to_string(),
    })
}

fn check_status(response: Response, url: &Url) -> Result<Response, ScraperError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return Err(ScraperError::RateLimited {
            url: url.to_string(),
            retry_after_secs,
        });
    }
    if !status.is_success() {
        return Err(ScraperError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
