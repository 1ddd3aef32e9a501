use std::future::Future;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::cache::{all_users_key, user_key, CachedValue, ResultCache};
use crate::config::{Config, DEFAULT_MAX_PAGES};
use crate::error::{DirectoryError, Result};
use crate::responses::{DataEnvelope, PagedResponse};
use crate::retry::RetryPolicy;
use crate::types::User;

const API_KEY_HEADER: &str = "x-api-key";

/// Client for the paginated user directory API.
///
/// Every lookup consults the shared [`ResultCache`] first; on a miss the
/// request goes out through the [`RetryPolicy`] and a successful answer is
/// cached with the cache's default TTL.
pub struct UserDirectoryClient {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
    cache: ResultCache,
    retry: RetryPolicy,
    max_pages: u32,
    cancel: CancellationToken,
}

impl UserDirectoryClient {
    pub fn new(base_url: Url, cache: ResultCache) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key: None,
            cache,
            retry: RetryPolicy::default(),
            max_pages: DEFAULT_MAX_PAGES,
            cancel: CancellationToken::new(),
        }
    }

    pub fn from_config(config: &Config, cache: ResultCache) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let mut client = Self::new(config.base_url()?, cache)
            .with_http_client(builder.build()?)
            .with_retry_policy(config.retry_policy())
            .with_max_pages(config.max_pages());
        client.api_key = config.api_key();

        Ok(client)
    }

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Upper bound on page fetches for a single listing.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Requests and backoff sleeps stop with [`DirectoryError::Cancelled`]
    /// once `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Fetch one user, failing with [`DirectoryError::NotFound`] on a 404.
    pub async fn get_user_by_id(&self, id: i64) -> Result<User> {
        if id < 1 {
            return Err(DirectoryError::InvalidArgument(format!(
                "user id must be positive, got {id}"
            )));
        }

        if let Some(user) = self.cache.get_user(id) {
            tracing::debug!(id, "user cache hit");
            return Ok(user);
        }

        let url = self.endpoint(&format!("users/{id}"))?;
        let result = self
            .get_json::<DataEnvelope<User>>(&url)
            .await
            .map_err(|e| match e {
                DirectoryError::UnexpectedStatus { status: 404, .. } => {
                    DirectoryError::NotFound { id }
                }
                other => other,
            });

        match result {
            Ok(envelope) => {
                let user = envelope.data;
                self.cache.insert(user_key(id), CachedValue::User(user.clone()));
                Ok(user)
            }
            Err(e) => {
                log_failure("get_user_by_id", &e);
                Err(e)
            }
        }
    }

    /// Fetch every user from `start_page` through the last page reported by
    /// the upstream, as one ordered collection.
    ///
    /// `total_pages` is re-read from each response. A failure on any page
    /// discards the pages already collected and nothing is cached.
    pub async fn get_all_users(&self, start_page: u32) -> Result<Vec<User>> {
        if start_page < 1 {
            return Err(DirectoryError::InvalidArgument(
                "start page must be at least 1".to_string(),
            ));
        }

        if let Some(users) = self.cache.get_users(start_page) {
            tracing::debug!(start_page, count = users.len(), "user listing cache hit");
            return Ok(users);
        }

        match self.drain_pages(start_page).await {
            Ok(users) => {
                self.cache
                    .insert(all_users_key(start_page), CachedValue::Users(users.clone()));
                Ok(users)
            }
            Err(e) => {
                log_failure("get_all_users", &e);
                Err(e)
            }
        }
    }

    async fn drain_pages(&self, start_page: u32) -> Result<Vec<User>> {
        let mut users = Vec::new();
        let mut page = start_page;
        let mut fetched = 0;

        loop {
            let url = self.page_url(page)?;
            let response: PagedResponse<User> = self.get_json(&url).await?;
            fetched += 1;

            tracing::debug!(
                page = response.page,
                total_pages = response.total_pages,
                count = response.data.len(),
                "fetched user page"
            );

            users.extend(response.data);
            // no page can follow u32::MAX, whatever total_pages says
            let Some(next) = page.checked_add(1) else {
                return Ok(users);
            };
            page = next;

            if page > response.total_pages {
                return Ok(users);
            }

            if fetched >= self.max_pages {
                return Err(DirectoryError::PageLimitExceeded {
                    fetched,
                    last_total_pages: response.total_pages,
                });
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        self.retry.run(&self.cancel, || self.send_once(url)).await
    }

    async fn send_once<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let mut request = self.http.get(url.clone());
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = self
            .cancellable(request.send())
            .await?
            .map_err(|e| DirectoryError::from_transport(e, url.as_str()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::UnexpectedStatus {
                status: status.as_u16(),
                message: self
                    .cancellable(response.text())
                    .await?
                    .unwrap_or_else(|_| "<failed to read response body>".to_string()),
            });
        }

        let body = self
            .cancellable(response.text())
            .await?
            .map_err(|e| DirectoryError::from_transport(e, url.as_str()))?;

        serde_json::from_str(&body).map_err(|source| DirectoryError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn cancellable<T>(&self, fut: impl Future<Output = T>) -> Result<T> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(DirectoryError::Cancelled),
            value = fut => Ok(value),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|_| DirectoryError::InvalidUrl(format!("{}{path}", self.base_url)))
    }

    fn page_url(&self, page: u32) -> Result<Url> {
        let mut url = self.endpoint("users")?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        Ok(url)
    }
}

fn log_failure(operation: &str, err: &DirectoryError) {
    match err {
        DirectoryError::NotFound { id } => {
            tracing::debug!(operation, id, "user not found");
        }
        DirectoryError::Cancelled => {
            tracing::info!(operation, "request was cancelled");
        }
        DirectoryError::Timeout { url } => {
            tracing::error!(operation, %url, "request timed out");
        }
        DirectoryError::Http(e) => {
            tracing::error!(operation, error = %e, "network error");
        }
        DirectoryError::Decode { url, source } => {
            tracing::error!(operation, %url, error = %source, "deserialization error");
        }
        other => {
            tracing::error!(operation, error = %other, "request failed");
        }
    }
}
