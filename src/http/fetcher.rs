//! A [`Fetch`] implementation over cursor-paginated JSON endpoints
//!
//! Each fetcher is one GET request: an endpoint plus a bound query. After a
//! fetch, continuation fetchers come from the response's `Link` header when
//! present, otherwise from binding the first/last element ID into the
//! configured cursor parameters.

use super::client::HttpClient;
use super::link::Links;
use crate::config::PagingConfig;
use crate::error::{Error, Result};
use crate::paging::{Element, Fetch, Page, PagedContent};
use crate::response::{Composite, Handler, IfStatus};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// One bound GET request producing a page of `E`
///
/// Serializes as endpoint, query and paging parameters. The client handle is
/// not persisted; reattach it with [`HttpFetcher::attach`] after restoring.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct HttpFetcher<E> {
    url: String,
    #[serde(default)]
    query: Vec<(String, String)>,
    #[serde(default)]
    paging: PagingConfig,
    #[serde(skip)]
    client: Option<Arc<HttpClient>>,
    #[serde(skip)]
    element: PhantomData<fn() -> E>,
}

impl<E> HttpFetcher<E> {
    /// Create a fetcher for an endpoint (absolute, or relative to the
    /// client's base URL)
    pub fn new(url: impl Into<String>, paging: PagingConfig) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            paging,
            client: None,
            element: PhantomData,
        }
    }

    /// Add a query parameter
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach the client used to send requests
    #[must_use]
    pub fn with_client(mut self, client: Arc<HttpClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Attach the client in place
    pub fn attach(&mut self, client: &Arc<HttpClient>) {
        self.client = Some(Arc::clone(client));
    }

    /// Endpoint URL or path
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Bound query parameters
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Cursor parameter names
    pub fn paging(&self) -> &PagingConfig {
        &self.paging
    }

    /// Whether a client is attached
    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    /// Value bound to a query parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Query actually sent, including the page size
    pub fn request_query(&self) -> Vec<(String, String)> {
        let mut query = self.query.clone();
        if let Some(limit) = self.paging.limit {
            if self.param(&self.paging.limit_param).is_none() {
                query.push((self.paging.limit_param.clone(), limit.to_string()));
            }
        }
        query
    }

    /// Same endpoint with `param` bound to `cursor`
    ///
    /// Any previously bound cursor is dropped so a fetcher never carries
    /// both an older and a newer bound.
    pub fn bind(&self, param: &str, cursor: impl fmt::Display) -> Self {
        let mut query: Vec<_> = self
            .query
            .iter()
            .filter(|(k, _)| k != &self.paging.older_param && k != &self.paging.newer_param)
            .cloned()
            .collect();
        query.push((param.to_string(), cursor.to_string()));

        Self {
            query,
            ..self.clone()
        }
    }

    /// Absolute URL this fetcher requests, when a client is attached
    pub fn request_url(&self) -> String {
        match &self.client {
            Some(client) => client.build_url(&self.url),
            None => self.url.clone(),
        }
    }

    /// Fetcher for a continuation URL advertised in a `Link` header
    ///
    /// Relative references resolve against [`HttpFetcher::request_url`].
    pub fn follow(&self, link: &str) -> Result<Self> {
        let mut parsed = match Url::parse(link) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Url::parse(&self.request_url())?.join(link)?
            }
            Err(e) => return Err(e.into()),
        };
        let query = parsed.query_pairs().into_owned().collect();
        parsed.set_query(None);

        Ok(Self {
            url: parsed.to_string(),
            query,
            ..self.clone()
        })
    }
}

impl<E: DeserializeOwned + 'static> HttpFetcher<E> {
    /// Response dispatch: decode 200 as a JSON array, surface 4xx/5xx
    pub fn handler() -> Composite<Vec<E>> {
        Composite::default()
            .with(IfStatus::json(200))
            .with(IfStatus::failure(400..600))
    }
}

impl<E> HttpFetcher<E>
where
    E: Element + DeserializeOwned,
    E::Id: fmt::Display,
{
    /// Reattach `client` to every fetcher stored in restored content
    pub fn attach_all(content: &mut PagedContent<Self>, client: &Arc<HttpClient>) {
        for fetcher in content.fetchers_mut() {
            fetcher.attach(client);
        }
    }
}

#[async_trait]
impl<E> Fetch for HttpFetcher<E>
where
    E: Element + DeserializeOwned,
    E::Id: fmt::Display,
{
    type Element = E;

    async fn fetch(&self) -> Result<Page<Self>> {
        let client = self.client.as_ref().ok_or_else(|| {
            Error::config(format!("No HTTP client attached to fetcher for {}", self.url))
        })?;

        let response = client.get(&self.url, &self.request_query()).await?;
        let elements: Vec<E> = Self::handler().decode(&response)?;
        let links = Links::from_headers(&response.headers);

        let previous = match links.prev {
            Some(link) => Some(self.follow(&link)?),
            None => elements
                .first()
                .map(|first| self.bind(&self.paging.newer_param, first.id())),
        };
        let next = match links.next {
            Some(link) => Some(self.follow(&link)?),
            None => elements
                .last()
                .map(|last| self.bind(&self.paging.older_param, last.id())),
        };

        debug!(
            url = %self.url,
            fetched = elements.len(),
            has_previous = previous.is_some(),
            has_next = next.is_some(),
            "Fetched page"
        );
        Page::new(previous, next, elements)
    }
}

impl<E> Clone for HttpFetcher<E> {
    fn clone(&self) -> Self {
        Self {
            url: self.url.clone(),
            query: self.query.clone(),
            paging: self.paging.clone(),
            client: self.client.clone(),
            element: PhantomData,
        }
    }
}

impl<E> PartialEq for HttpFetcher<E> {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url && self.query == other.query && self.paging == other.paging
    }
}

impl<E> fmt::Debug for HttpFetcher<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("url", &self.url)
            .field("query", &self.query)
            .field("has_client", &self.client.is_some())
            .finish_non_exhaustive()
    }
}
