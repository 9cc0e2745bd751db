//! Case data client
//!
//! `CaseClient` is an immutable holder for the collaborators every operation
//! needs. It is built once and shared; each call resolves the caseworker id,
//! builds fresh headers from the caller's token and keeps no state behind.
//!
//! Three read strategies are offered:
//! - paginated collection of every case of a type (`retrieve_cases`)
//! - single-shot search, tolerant of a lagging index (`search` and friends)
//! - consistency polling after a write (`*_with_retries`)

use crate::auth::{
    HeaderBuilder, IdamUserResolver, JwtServiceToken, LeaseServiceToken, ServiceTokenGenerator,
    StaticServiceToken, StaticUserResolver, UserResolver,
};
use crate::config::{ClientConfig, ServiceAuthConfig};
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClient, HttpClientConfig, Transport};
use crate::models::{
    CaseDataContent, SearchResult, StartEventResponse, SubmitEvent, SubmitMultipleEvent,
    CREATION_EVENT_SUMMARY, UPDATE_BULK_EVENT_SUMMARY, UPDATE_EVENT_SUMMARY,
};
use crate::pagination::{collect_pages, PageMetadata, PageSource};
use crate::poll::{ConsistencyPoller, Expectation, PollOutcome, RetryPolicy, Sleeper};
use crate::report::report_missing;
use crate::search::{DateRange, SearchQuery};
use crate::types::{JsonValue, Method, MultipleSource, OptionStringExt};
use crate::urls::{CaseTypeLocator, DataStoreUrls};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

// ============================================================================
// Client
// ============================================================================

/// Client for the case data store and its search index
#[derive(Clone)]
pub struct CaseClient {
    transport: Arc<dyn Transport>,
    urls: DataStoreUrls,
    headers: HeaderBuilder,
    users: Arc<dyn UserResolver>,
    poller: ConsistencyPoller,
}

impl CaseClient {
    /// Start building a client for the data store at `base_url`
    pub fn builder(base_url: &Url) -> CaseClientBuilder {
        CaseClientBuilder::new(base_url)
    }

    /// Build a client from configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        CaseClientBuilder::from_config(config)?.build()
    }

    /// URL builder in use
    pub fn urls(&self) -> &DataStoreUrls {
        &self.urls
    }

    /// Poller in use
    pub fn poller(&self) -> &ConsistencyPoller {
        &self.poller
    }

    // ------------------------------------------------------------------------
    // Paginated collection
    // ------------------------------------------------------------------------

    /// Every case of `case_type` in `jurisdiction`, in page order
    pub async fn retrieve_cases<T>(
        &self,
        auth_token: &str,
        case_type: &str,
        jurisdiction: &str,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let headers = self.headers.build(auth_token).await?;
        let locator = self.locator(auth_token, case_type, jurisdiction).await?;
        info!(case_type, jurisdiction, "retrieving all cases");

        let source = CasePages {
            client: self,
            locator,
            headers,
        };
        collect_pages::<T, _>(&source).await
    }

    // ------------------------------------------------------------------------
    // Single-shot search
    // ------------------------------------------------------------------------

    /// Run `query` once; a null result yields no records
    pub async fn search<T>(
        &self,
        auth_token: &str,
        case_type: &str,
        query: &SearchQuery,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let headers = self.headers.build(auth_token).await?;
        let url = self.urls.search(case_type)?;
        debug!(case_type, %query, "search query");

        let result = self.fetch_search::<T>(&url, &headers, query).await?;
        Ok(result.map(|r| r.cases).unwrap_or_default())
    }

    /// Cases matching `references`, without waiting for the index
    pub async fn retrieve_cases_by_reference(
        &self,
        auth_token: &str,
        case_type: &str,
        references: &[String],
    ) -> Result<Vec<SubmitEvent>> {
        let query = SearchQuery::by_case_references(references);
        self.search(auth_token, case_type, &query).await
    }

    /// Schedule projection of the cases matching `references`
    pub async fn retrieve_schedule_by_reference<T>(
        &self,
        auth_token: &str,
        case_type: &str,
        references: &[String],
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let query = SearchQuery::schedule_by_case_references(references);
        self.search(auth_token, case_type, &query).await
    }

    /// Address label projection of the cases matching `references`
    pub async fn retrieve_labels_by_reference<T>(
        &self,
        auth_token: &str,
        case_type: &str,
        references: &[String],
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let query = SearchQuery::labels_by_case_references(references);
        self.search(auth_token, case_type, &query).await
    }

    /// The multiple with `multiple_reference`, without waiting for the index
    pub async fn retrieve_multiples(
        &self,
        auth_token: &str,
        case_type: &str,
        multiple_reference: &str,
    ) -> Result<Vec<SubmitMultipleEvent>> {
        let query = SearchQuery::by_multiple_reference(multiple_reference);
        self.search(auth_token, case_type, &query).await
    }

    /// Cases listed between two ISO dates, optionally at one venue
    pub async fn retrieve_cases_by_listing_date(
        &self,
        auth_token: &str,
        case_type: &str,
        from: &str,
        to: &str,
        venue: &str,
        venue_field: &str,
    ) -> Result<Vec<SubmitEvent>> {
        let range = DateRange::from_dates(from, to)?;
        let query = SearchQuery::listing_date_range(&range, venue, venue_field);
        self.search(auth_token, case_type, &query).await
    }

    /// Cases relevant to `report_type` between two ISO dates
    pub async fn retrieve_cases_for_report(
        &self,
        auth_token: &str,
        case_type: &str,
        from: &str,
        to: &str,
        report_type: &str,
    ) -> Result<Vec<SubmitEvent>> {
        let range = DateRange::from_dates(from, to)?;
        info!(report_type, from = %range.lower_bound(), to = %range.upper_bound(), "report search");
        let query = SearchQuery::report_date_range(&range, report_type);
        self.search(auth_token, case_type, &query).await
    }

    // ------------------------------------------------------------------------
    // Consistency polling
    // ------------------------------------------------------------------------

    /// Repeat `query` until the index reports the expected count
    ///
    /// The outcome carries the last result as fetched; check its state (or
    /// its `total`) before relying on it.
    pub async fn poll_search<T>(
        &self,
        auth_token: &str,
        case_type: &str,
        query: &SearchQuery,
        expectation: Expectation,
    ) -> Result<PollOutcome<SearchResult<T>>>
    where
        T: DeserializeOwned,
    {
        let headers = self.headers.build(auth_token).await?;
        let url = self.urls.search(case_type)?;
        debug!(case_type, %query, expected = expectation.count(), "search query with retries");

        let (url, headers) = (&url, &headers);
        self.poller
            .poll_until_count(
                move |_| self.fetch_search::<T>(url, headers, query),
                expectation,
            )
            .await
    }

    /// Cases matching `references`, polling until one hit per reference
    ///
    /// Logs the references still missing when the poll ends.
    pub async fn retrieve_cases_by_reference_with_retries(
        &self,
        auth_token: &str,
        case_type: &str,
        references: &[String],
    ) -> Result<Vec<SubmitEvent>> {
        let query = SearchQuery::by_case_references(references);
        let outcome = self
            .poll_search::<SubmitEvent>(
                auth_token,
                case_type,
                &query,
                Expectation::one_per(references),
            )
            .await?;

        Ok(match outcome.into_result() {
            Some(result) => {
                report_missing(references, &result.cases);
                result.cases
            }
            None => Vec::new(),
        })
    }

    /// The multiple with `multiple_reference`, polling until exactly one hit
    pub async fn retrieve_multiples_with_retries(
        &self,
        auth_token: &str,
        case_type: &str,
        multiple_reference: &str,
    ) -> Result<Vec<SubmitMultipleEvent>> {
        let query = SearchQuery::by_multiple_reference(multiple_reference);
        let outcome = self
            .poll_search::<SubmitMultipleEvent>(
                auth_token,
                case_type,
                &query,
                Expectation::Singleton,
            )
            .await?;

        Ok(outcome.into_result().map(|r| r.cases).unwrap_or_default())
    }

    /// Member cases of a multiple being created
    ///
    /// A manually created multiple groups cases that were written long ago,
    /// so one search suffices. A multiple created by a bulk job follows
    /// fresh writes and is polled.
    pub async fn retrieve_cases_for_creation(
        &self,
        auth_token: &str,
        case_type: &str,
        references: &[String],
        source: MultipleSource,
    ) -> Result<Vec<SubmitEvent>> {
        match source {
            MultipleSource::Manual => {
                self.retrieve_cases_by_reference(auth_token, case_type, references)
                    .await
            }
            MultipleSource::Automatic => {
                self.retrieve_cases_by_reference_with_retries(auth_token, case_type, references)
                    .await
            }
        }
    }

    // ------------------------------------------------------------------------
    // Writes and single-case reads
    // ------------------------------------------------------------------------

    /// Obtain an event token for creating a case
    pub async fn start_case_creation(
        &self,
        auth_token: &str,
        case_type: &str,
        jurisdiction: &str,
        event_id: &str,
    ) -> Result<StartEventResponse> {
        let headers = self.headers.build(auth_token).await?;
        let locator = self.locator(auth_token, case_type, jurisdiction).await?;
        let url = self.urls.start_case_creation(&locator, event_id)?;
        self.send_expecting(Method::GET, &url, &headers, None).await
    }

    /// Create a case from `data` using a started creation event
    pub async fn submit_case_creation(
        &self,
        auth_token: &str,
        case_type: &str,
        jurisdiction: &str,
        start: &StartEventResponse,
        data: JsonValue,
    ) -> Result<SubmitEvent> {
        let headers = self.headers.build(auth_token).await?;
        let locator = self.locator(auth_token, case_type, jurisdiction).await?;
        let url = self.urls.submit_case_creation(&locator)?;
        let body = CaseDataContent::for_event(start, data, CREATION_EVENT_SUMMARY);
        info!(case_type, event_id = %start.event_id, "submitting case creation");
        self.send_expecting(Method::POST, &url, &headers, Some(to_json(&body)?))
            .await
    }

    /// Read one case by id
    pub async fn retrieve_case(
        &self,
        auth_token: &str,
        case_type: &str,
        jurisdiction: &str,
        case_id: &str,
    ) -> Result<SubmitEvent> {
        let headers = self.headers.build(auth_token).await?;
        let locator = self.locator(auth_token, case_type, jurisdiction).await?;
        let url = self.urls.retrieve_case(&locator, case_id)?;
        self.send_expecting(Method::GET, &url, &headers, None).await
    }

    /// Obtain an event token for updating an existing case
    pub async fn start_event_for_case(
        &self,
        auth_token: &str,
        case_type: &str,
        jurisdiction: &str,
        case_id: &str,
        event_id: &str,
    ) -> Result<StartEventResponse> {
        let headers = self.headers.build(auth_token).await?;
        let locator = self.locator(auth_token, case_type, jurisdiction).await?;
        let url = self
            .urls
            .start_event_for_case(&locator, case_id, event_id)?;
        self.send_expecting(Method::GET, &url, &headers, None).await
    }

    /// Submit `data` for a started event on an existing case
    pub async fn submit_event_for_case(
        &self,
        auth_token: &str,
        case_type: &str,
        jurisdiction: &str,
        case_id: &str,
        start: &StartEventResponse,
        data: JsonValue,
    ) -> Result<SubmitEvent> {
        self.submit_event(
            auth_token,
            case_type,
            jurisdiction,
            case_id,
            start,
            data,
            UPDATE_EVENT_SUMMARY,
        )
        .await
    }

    /// Submit `data` for a started event on an existing multiple
    pub async fn submit_multiple_event_for_case(
        &self,
        auth_token: &str,
        case_type: &str,
        jurisdiction: &str,
        case_id: &str,
        start: &StartEventResponse,
        data: JsonValue,
    ) -> Result<SubmitMultipleEvent> {
        self.submit_event(
            auth_token,
            case_type,
            jurisdiction,
            case_id,
            start,
            data,
            UPDATE_BULK_EVENT_SUMMARY,
        )
        .await
    }

    async fn submit_event<R: DeserializeOwned>(
        &self,
        auth_token: &str,
        case_type: &str,
        jurisdiction: &str,
        case_id: &str,
        start: &StartEventResponse,
        data: JsonValue,
        summary: &str,
    ) -> Result<R> {
        let headers = self.headers.build(auth_token).await?;
        let locator = self.locator(auth_token, case_type, jurisdiction).await?;
        let url = self.urls.submit_event_for_case(&locator, case_id)?;
        let body = CaseDataContent::for_event(start, data, summary);
        info!(case_type, case_id, event_id = %start.event_id, summary, "submitting case event");
        self.send_expecting(Method::POST, &url, &headers, Some(to_json(&body)?))
            .await
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    async fn locator(
        &self,
        auth_token: &str,
        case_type: &str,
        jurisdiction: &str,
    ) -> Result<CaseTypeLocator> {
        let user_id = self.users.user_id(auth_token).await?;
        Ok(CaseTypeLocator::new(user_id, jurisdiction, case_type))
    }

    async fn fetch_search<T>(
        &self,
        url: &Url,
        headers: &HeaderMap,
        query: &SearchQuery,
    ) -> Result<Option<SearchResult<T>>>
    where
        T: DeserializeOwned,
    {
        let body = self
            .transport
            .send(Method::POST, url, headers, Some(query.as_value()))
            .await?;
        body.map(decode).transpose()
    }

    async fn send_expecting<T>(
        &self,
        method: Method,
        url: &Url,
        headers: &HeaderMap,
        body: Option<JsonValue>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .transport
            .send(method, url, headers, body.as_ref())
            .await?;
        match response {
            Some(value) => decode(value),
            None => Err(Error::decode(format!("empty response from {url}"))),
        }
    }
}

impl std::fmt::Debug for CaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaseClient")
            .field("urls", &self.urls)
            .field("poller", &self.poller)
            .finish_non_exhaustive()
    }
}

fn decode<T: DeserializeOwned>(value: JsonValue) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::decode(e.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<JsonValue> {
    serde_json::to_value(value).context("Failed to encode submission")
}

// ============================================================================
// Page source
// ============================================================================

/// Bulk case endpoint of one case type, seen through the caller's headers
struct CasePages<'a> {
    client: &'a CaseClient,
    locator: CaseTypeLocator,
    headers: HeaderMap,
}

#[async_trait]
impl<'a, T> PageSource<T> for CasePages<'a>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn metadata(&self) -> Result<PageMetadata> {
        let url = self.client.urls.pagination_metadata(&self.locator)?;
        let body = self
            .client
            .transport
            .send(Method::GET, &url, &self.headers, None)
            .await?;
        match body {
            Some(value) => decode(value),
            None => Err(Error::page_metadata("pagination metadata response was empty")),
        }
    }

    async fn fetch_page(&self, page: u32) -> Result<Option<Vec<T>>> {
        let url = self.client.urls.retrieve_cases_page(&self.locator, page)?;
        let body = self
            .client
            .transport
            .send(Method::GET, &url, &self.headers, None)
            .await?;
        body.map(decode).transpose()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for `CaseClient`
pub struct CaseClientBuilder {
    base_url: Url,
    transport: Option<Arc<dyn Transport>>,
    service_tokens: Option<Arc<dyn ServiceTokenGenerator>>,
    users: Option<Arc<dyn UserResolver>>,
    policy: RetryPolicy,
    sleeper: Option<Arc<dyn Sleeper>>,
}

impl CaseClientBuilder {
    /// Start a builder for the data store at `base_url`
    pub fn new(base_url: &Url) -> Self {
        Self {
            base_url: base_url.clone(),
            transport: None,
            service_tokens: None,
            users: None,
            policy: RetryPolicy::default(),
            sleeper: None,
        }
    }

    /// Prepare a builder from configuration
    ///
    /// The result can still be customised, e.g. with an interruptible sleeper.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut http = HttpClientConfig::builder()
            .timeout(Duration::from_secs(config.http.timeout_seconds));
        if let Some(ref agent) = config.http.user_agent {
            http = http.user_agent(agent.clone());
        }
        if let Some(ref limit) = config.http.rate_limit {
            http = http.rate_limit(limit.clone());
        }
        let transport = HttpClient::with_config(http.build())?;

        let service_tokens: Arc<dyn ServiceTokenGenerator> = match &config.service_auth {
            ServiceAuthConfig::Static { token } => Arc::new(StaticServiceToken::new(token.clone())),
            ServiceAuthConfig::Lease { url, microservice } => Arc::new(LeaseServiceToken::new(
                &Url::parse(url)?,
                microservice.clone(),
            )?),
            ServiceAuthConfig::Jwt {
                microservice,
                secret,
                lifetime_seconds,
            } => Arc::new(JwtServiceToken::new(
                microservice.clone(),
                secret.clone(),
                *lifetime_seconds,
            )),
        };

        let users: Arc<dyn UserResolver> = match (&config.idam, config.user_id.clone().none_if_empty()) {
            (Some(idam), _) => Arc::new(IdamUserResolver::new(&Url::parse(&idam.base_url)?)?),
            (None, Some(user_id)) => Arc::new(StaticUserResolver::new(user_id)),
            (None, None) => return Err(Error::missing_field("user_id")),
        };

        Ok(Self::new(&config.data_store_url()?)
            .transport(Arc::new(transport))
            .service_tokens(service_tokens)
            .user_resolver(users)
            .retry_policy(config.polling.retry_policy()))
    }

    /// Transport to send requests through (defaults to `HttpClient`)
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Source of service-to-service tokens (required)
    pub fn service_tokens(mut self, generator: Arc<dyn ServiceTokenGenerator>) -> Self {
        self.service_tokens = Some(generator);
        self
    }

    /// Resolver for the caseworker id (required)
    pub fn user_resolver(mut self, resolver: Arc<dyn UserResolver>) -> Self {
        self.users = Some(resolver);
        self
    }

    /// Retry budget for consistency polling
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Pause primitive for consistency polling (defaults to real time)
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<CaseClient> {
        let service_tokens = self
            .service_tokens
            .ok_or_else(|| Error::missing_field("service_tokens"))?;
        let users = self
            .users
            .ok_or_else(|| Error::missing_field("user_resolver"))?;
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpClient::new()?),
        };
        let poller = match self.sleeper {
            Some(sleeper) => ConsistencyPoller::new(self.policy, sleeper),
            None => ConsistencyPoller::with_policy(self.policy),
        };

        Ok(CaseClient {
            transport,
            urls: DataStoreUrls::new(&self.base_url),
            headers: HeaderBuilder::new(service_tokens),
            users,
            poller,
        })
    }
}

impl std::fmt::Debug for CaseClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaseClientBuilder")
            .field("base_url", &self.base_url.as_str())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
