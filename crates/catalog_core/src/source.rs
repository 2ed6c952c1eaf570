use std::marker::PhantomData;

use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::{CatalogKind, Creator, Game, GameDetails, Store},
    error::FetchError,
    protocol::{decode_page, redact_api_key, Page, PageRequest},
};
use tracing::{debug, warn};
use url::Url;

use crate::config::CatalogSettings;

const API_KEY_PARAM: &str = "key";
const PAGE_SIZE_PARAM: &str = "page_size";

/// One paginated remote collection. Each call issues exactly one request and
/// never retries; the caller decides what to do with a failure.
#[async_trait]
pub trait RemoteListSource: Send + Sync {
    type Item: Clone + Send + Sync + 'static;

    async fn fetch_page(&self, request: PageRequest) -> Result<Page<Self::Item>, FetchError>;
}

#[derive(Clone)]
pub struct RawgClient {
    http: Client,
    base_url: Url,
    api_key: String,
    page_size: Option<u32>,
}

impl RawgClient {
    pub fn new(base_url: impl AsRef<str>, api_key: impl Into<String>) -> anyhow::Result<Self> {
        Self::with_http(Client::new(), base_url, api_key)
    }

    /// Fails when `base_url` is not an absolute URL that can carry endpoint
    /// paths.
    pub fn with_http(
        http: Client,
        base_url: impl AsRef<str>,
        api_key: impl Into<String>,
    ) -> anyhow::Result<Self> {
        let base_url = parse_base_url(base_url.as_ref())?;
        let api_key = api_key.into();
        if api_key.is_empty() {
            warn!("catalog: no API key configured; requests will likely be rejected");
        }
        Ok(Self {
            http,
            base_url,
            api_key,
            page_size: None,
        })
    }

    pub fn from_settings(settings: &CatalogSettings) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build http client")?;
        let mut client = Self::with_http(http, &settings.base_url, &settings.api_key)?;
        client.page_size = settings.page_size;
        Ok(client)
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn games(&self) -> RawgListSource<Game> {
        self.list_source(CatalogKind::Games)
    }

    pub fn stores(&self) -> RawgListSource<Store> {
        self.list_source(CatalogKind::Stores)
    }

    pub fn creators(&self) -> RawgListSource<Creator> {
        self.list_source(CatalogKind::Creators)
    }

    pub fn list_source<T>(&self, kind: CatalogKind) -> RawgListSource<T> {
        RawgListSource {
            client: self.clone(),
            kind,
            _item: PhantomData,
        }
    }

    pub async fn fetch_game_details(&self, slug: &str) -> Result<GameDetails, FetchError> {
        let url = self.game_details_url(slug)?;
        let body = self.get_bytes(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn game_details_url(&self, slug: &str) -> Result<Url, FetchError> {
        let slug = slug.trim().trim_matches('/');
        if slug.is_empty() {
            return Err(FetchError::decode("game slug must not be empty"));
        }
        Ok(self.endpoint_url(&[CatalogKind::Games.endpoint(), slug], false))
    }

    pub fn request_url(&self, kind: CatalogKind, request: &PageRequest) -> Result<Url, FetchError> {
        match request {
            PageRequest::Initial => Ok(self.endpoint_url(&[kind.endpoint()], true)),
            PageRequest::Cursor(cursor) => self.cursor_url(cursor),
        }
    }

    /// Segments are percent-encoded, so a slug can never reach into the query
    /// or fragment.
    fn endpoint_url(&self, segments: &[&str], paginated: bool) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }

        let mut params = Vec::new();
        if !self.api_key.is_empty() {
            params.push((API_KEY_PARAM, self.api_key.clone()));
        }
        if let (true, Some(page_size)) = (paginated, self.page_size) {
            params.push((PAGE_SIZE_PARAM, page_size.to_string()));
        }
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        url
    }

    /// Cursor URLs come straight from the previous response and normally carry
    /// the key already; it is only appended when missing.
    fn cursor_url(&self, cursor: &str) -> Result<Url, FetchError> {
        let mut url = Url::parse(cursor).map_err(|err| {
            FetchError::decode(format!(
                "invalid next-page url '{}': {err}",
                redact_api_key(cursor)
            ))
        })?;
        let has_key = url.query_pairs().any(|(name, _)| name == API_KEY_PARAM);
        if !has_key && !self.api_key.is_empty() {
            url.query_pairs_mut().append_pair(API_KEY_PARAM, &self.api_key);
        }
        Ok(url)
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        let display_url = redact_key(&url);
        debug!(url = %display_url, "catalog: GET");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::network(redact_error(&err)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: display_url,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::network(redact_error(&err)))?;
        Ok(body.to_vec())
    }
}

pub struct RawgListSource<T> {
    client: RawgClient,
    kind: CatalogKind,
    _item: PhantomData<fn() -> T>,
}

#[async_trait]
impl<T> RemoteListSource for RawgListSource<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    type Item = T;

    async fn fetch_page(&self, request: PageRequest) -> Result<Page<T>, FetchError> {
        let url = self.client.request_url(self.kind, &request)?;
        let body = self.client.get_bytes(url).await?;
        decode_page(&body)
    }
}

fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let mut url =
        Url::parse(raw.trim()).with_context(|| format!("invalid catalog base url '{raw}'"))?;
    if url.cannot_be_a_base() {
        bail!("catalog base url '{raw}' cannot carry endpoint paths");
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn redact_key(url: &Url) -> String {
    redact_api_key(url.as_str())
}

fn redact_error(err: &reqwest::Error) -> String {
    match err.url() {
        Some(url) => err
            .to_string()
            .replace(url.as_str(), &redact_key(url)),
        None => err.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;
