//! Resource fetching with a daily cache and ordered source fallback
//!
//! One strategy covers every resource: a fresh cached record is served
//! without touching the network; otherwise each configured source is
//! tried in order with retry/backoff for transient failures; a total
//! miss falls back to a stale cached record before giving up. The
//! details resource is optional and degrades to "not published" instead
//! of failing the page.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::config::Config;
use crate::constants::{resources, retry};
use crate::data_fetcher::cache::{CacheRecord, CacheStore};
use crate::data_fetcher::models::{
    DashboardData, DetailsPayload, EpisodesPayload, SeasonsPayload, rekey_by_season_number,
};
use crate::data_fetcher::refresh_guard::RefreshGuard;
use crate::error::AppError;

pub struct ResourceFetcher {
    client: Client,
    store: Arc<dyn CacheStore>,
    sources: Vec<String>,
}

impl ResourceFetcher {
    /// Builds a fetcher from the configured source list and an injected
    /// cache store.
    pub fn new(config: &Config, store: Arc<dyn CacheStore>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            store,
            sources: config.sources(),
        })
    }

    /// Upstream serves the files from a raw-content host, so freshness is
    /// forced with a timestamp query instead of cache headers.
    fn resource_url(base: &str, resource: &str, now: DateTime<Utc>) -> String {
        format!("{base}/{resource}?t={}", now.timestamp_millis())
    }

    /// Drops the cached records of every known resource so the next fetch
    /// goes to the network regardless of age.
    pub fn invalidate_all(&self) {
        for resource in [
            resources::SEASONS,
            resources::EPISODES,
            resources::EPISODE_DETAILS,
        ] {
            self.store.remove(resource);
        }
    }

    /// Fetches a required resource, preferring a fresh cached copy.
    ///
    /// 1. A cache record younger than the TTL is returned without a
    ///    network call. A cached payload that no longer parses is treated
    ///    as a miss.
    /// 2. Otherwise every source is tried in order; the first success is
    ///    cached (best-effort) and returned.
    /// 3. If every source fails, a stale cache record is returned as a
    ///    degraded fallback. With no record at all, the failure surfaces
    ///    as `FetchFailed` naming every attempted URL.
    #[instrument(skip(self, now))]
    pub async fn fetch_daily<T: DeserializeOwned>(
        &self,
        resource: &str,
        now: DateTime<Utc>,
    ) -> Result<T, AppError> {
        if let Some(record) = self.store.get(resource) {
            if record.is_fresh(now) {
                match serde_json::from_str::<T>(&record.data) {
                    Ok(parsed) => {
                        debug!("Using fresh cached copy of {resource}");
                        return Ok(parsed);
                    }
                    Err(e) => {
                        warn!("Cached copy of {resource} no longer parses, refetching: {e}");
                    }
                }
            } else {
                debug!("Cached copy of {resource} is stale, attempting refresh");
            }
        }

        let mut attempted = Vec::with_capacity(self.sources.len());
        for base in &self.sources {
            let url = Self::resource_url(base, resource, now);
            attempted.push(url.clone());
            match self.fetch_text(&url).await {
                Ok(body) => match parse_payload::<T>(&body, &url) {
                    Ok(parsed) => {
                        // Cache write failures are swallowed: caching is
                        // best-effort and never blocks the read path.
                        if let Err(e) = self.store.put(resource, CacheRecord::new(body, now)) {
                            warn!("Cache write failed for {resource}: {e}");
                        }
                        return Ok(parsed);
                    }
                    Err(e) => {
                        warn!("Source {base} returned an unusable {resource} payload: {e}");
                    }
                },
                Err(e) => {
                    warn!("Source {base} failed for {resource}: {e}");
                }
            }
        }

        if let Some(record) = self.store.get(resource) {
            if let Ok(parsed) = serde_json::from_str::<T>(&record.data) {
                warn!("All sources failed for {resource}, serving stale cached copy");
                return Ok(parsed);
            }
        }

        error!(
            "Failed to load {resource} from any source: {}",
            attempted.join(", ")
        );
        Err(AppError::fetch_failed(resource, &attempted))
    }

    /// Fetches an optional resource. Any terminal failure, including a
    /// not-found response, degrades to `None` with no user-visible error;
    /// the stale-cache fallback of `fetch_daily` still applies first.
    pub async fn fetch_optional_daily<T: DeserializeOwned>(
        &self,
        resource: &str,
        now: DateTime<Utc>,
    ) -> Option<T> {
        match self.fetch_daily(resource, now).await {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                info!("Optional resource {resource} unavailable, continuing without it: {e}");
                None
            }
        }
    }

    /// Loads the three dashboard resources concurrently and assembles
    /// them. Seasons and episodes are required; the details file is
    /// optional and its absence is preserved as a distinct state.
    #[instrument(skip(self, now))]
    pub async fn fetch_dashboard_data(
        &self,
        now: DateTime<Utc>,
    ) -> Result<DashboardData, AppError> {
        info!("Loading dashboard resources");
        let (seasons, episodes, details) = tokio::join!(
            self.fetch_daily::<SeasonsPayload>(resources::SEASONS, now),
            self.fetch_daily::<EpisodesPayload>(resources::EPISODES, now),
            self.fetch_optional_daily::<DetailsPayload>(resources::EPISODE_DETAILS, now),
        );

        let seasons = seasons?.into_seasons();
        let episodes_by_season = rekey_by_season_number(episodes?.into_map());
        let details_by_season =
            details.map(|payload| rekey_by_season_number(payload.episode_details_by_season));

        info!(
            "Loaded {} seasons, {} episode lists, details {}",
            seasons.len(),
            episodes_by_season.len(),
            if details_by_season.is_some() {
                "published"
            } else {
                "not yet published"
            }
        );

        Ok(DashboardData {
            seasons,
            episodes_by_season,
            details_by_season,
        })
    }

    /// Loads the dashboard under a refresh guard. If another load begins
    /// while this one is in flight, the late result is dropped
    /// (`Ok(None)`) instead of being handed to a superseded consumer.
    /// The network calls themselves are not aborted.
    pub async fn fetch_dashboard_data_guarded(
        &self,
        guard: &RefreshGuard,
        now: DateTime<Utc>,
    ) -> Result<Option<DashboardData>, AppError> {
        let token = guard.begin();
        let data = self.fetch_dashboard_data(now).await?;
        if !guard.is_current(&token) {
            info!("Discarding dashboard load that was superseded while in flight");
            return Ok(None);
        }
        Ok(Some(data))
    }

    /// GET with retry/backoff for transient failures and HTTP status
    /// mapping to specific error variants.
    #[instrument(skip(self))]
    async fn fetch_text(&self, url: &str) -> Result<String, AppError> {
        let mut attempt = 0u32;
        let mut backoff = Duration::from_millis(retry::BASE_DELAY_MS);
        let response = loop {
            match self.client.get(url).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if (status.as_u16() == 429 || status.is_server_error())
                        && attempt < retry::MAX_ATTEMPTS
                    {
                        // Respect Retry-After if provided
                        let retry_after = resp
                            .headers()
                            .get(reqwest::header::RETRY_AFTER)
                            .and_then(|h| h.to_str().ok())
                            .and_then(|s| s.parse::<u64>().ok())
                            .map(Duration::from_secs);
                        let wait = retry_after.unwrap_or(backoff);
                        warn!(
                            "Transient {} from {}. Retrying in {:?} (attempt {}/{})",
                            status,
                            url,
                            wait,
                            attempt + 1,
                            retry::MAX_ATTEMPTS
                        );
                        tokio::time::sleep(wait).await;
                        attempt += 1;
                        backoff = backoff.saturating_mul(2);
                        continue;
                    }
                    break resp;
                }
                Err(e) => {
                    if (e.is_timeout() || e.is_connect()) && attempt < retry::MAX_ATTEMPTS {
                        warn!(
                            "Request error {} for {}. Retrying in {:?} (attempt {}/{})",
                            e,
                            url,
                            backoff,
                            attempt + 1,
                            retry::MAX_ATTEMPTS
                        );
                        tokio::time::sleep(backoff).await;
                        attempt += 1;
                        backoff = backoff.saturating_mul(2);
                        continue;
                    }
                    error!("Request failed for URL {}: {}", url, e);
                    return if e.is_timeout() {
                        Err(AppError::network_timeout(url))
                    } else if e.is_connect() {
                        Err(AppError::network_connection(url, e.to_string()))
                    } else {
                        Err(AppError::HttpFetch(e))
                    };
                }
            }
        };

        let status = response.status();
        debug!("Response status: {status}");

        if !status.is_success() {
            let status_code = status.as_u16();
            let reason = status.canonical_reason().unwrap_or("Unknown error");

            error!("HTTP {} - {} (URL: {})", status_code, reason, url);

            return Err(match status_code {
                404 => AppError::resource_not_found(url),
                429 => AppError::rate_limit(reason, url),
                400..=499 => AppError::client_error(status_code, reason, url),
                502 | 503 => AppError::service_unavailable(status_code, reason, url),
                _ => AppError::server_error(status_code, reason, url),
            });
        }

        let body = response.text().await.map_err(|e| {
            error!("Failed to read response body from URL {}: {}", url, e);
            AppError::HttpFetch(e)
        })?;
        debug!("Response length: {} bytes", body.len());
        Ok(body)
    }
}

/// Parses a payload, classifying failures as empty body, non-JSON, or
/// JSON of an unexpected shape.
fn parse_payload<T: DeserializeOwned>(body: &str, url: &str) -> Result<T, AppError> {
    match serde_json::from_str::<T>(body) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            error!("Failed to parse payload: {} (URL: {})", e, url);
            let trimmed = body.trim();
            if trimmed.is_empty() {
                Err(AppError::no_data("Response body is empty", url))
            } else if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
                Err(AppError::malformed_json("Response is not valid JSON", url))
            } else {
                Err(AppError::unexpected_structure(e.to_string(), url))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::cache::MemoryCacheStore;
    use chrono::TimeDelta;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(primary: &str, fallback: Option<&str>) -> Config {
        Config {
            data_base_url: primary.to_string(),
            fallback_base_url: fallback.map(str::to_string),
            log_file_path: None,
            http_timeout_seconds: 5,
        }
    }

    fn fetcher_for(config: &Config) -> (ResourceFetcher, Arc<MemoryCacheStore>) {
        let store = Arc::new(MemoryCacheStore::new());
        let fetcher = ResourceFetcher::new(config, store.clone()).unwrap();
        (fetcher, store)
    }

    fn seasons_body() -> serde_json::Value {
        json!({ "seasons": [{ "season_number": 49, "title": "Survivor 49" }] })
    }

    #[tokio::test]
    async fn test_fetch_daily_uses_cache_within_ttl() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/seasons.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(seasons_body()))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server.uri(), None);
        let (fetcher, _store) = fetcher_for(&config);
        let now = Utc::now();

        let first: SeasonsPayload = fetcher.fetch_daily("seasons.json", now).await.unwrap();
        assert_eq!(first.into_seasons().len(), 1);

        // Second read an hour later stays inside the TTL window
        let later = now + TimeDelta::hours(1);
        let second: SeasonsPayload = fetcher.fetch_daily("seasons.json", later).await.unwrap();
        assert_eq!(second.into_seasons().len(), 1);

        server.verify().await;
    }

    #[tokio::test]
    async fn test_fetch_daily_refetches_after_ttl() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/seasons.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(seasons_body()))
            .expect(2)
            .mount(&server)
            .await;

        let config = config_for(&server.uri(), None);
        let (fetcher, _store) = fetcher_for(&config);
        let now = Utc::now();

        let _: SeasonsPayload = fetcher.fetch_daily("seasons.json", now).await.unwrap();
        let day_later = now + TimeDelta::hours(25);
        let _: SeasonsPayload = fetcher.fetch_daily("seasons.json", day_later).await.unwrap();

        server.verify().await;
    }

    #[tokio::test]
    async fn test_fetch_daily_adds_cache_busting_query() {
        let server = MockServer::start().await;
        let now = Utc::now();
        Mock::given(method("GET"))
            .and(path("/seasons.json"))
            .and(query_param("t", now.timestamp_millis().to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(seasons_body()))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server.uri(), None);
        let (fetcher, _store) = fetcher_for(&config);

        let result: Result<SeasonsPayload, _> = fetcher.fetch_daily("seasons.json", now).await;
        assert!(result.is_ok());
        server.verify().await;
    }

    #[tokio::test]
    async fn test_fetch_daily_serves_stale_cache_on_network_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/seasons.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let config = config_for(&server.uri(), None);
        let (fetcher, store) = fetcher_for(&config);
        let now = Utc::now();

        // Seed a record well past the TTL
        let stale_stamp = now - TimeDelta::hours(48);
        store
            .put(
                "seasons.json",
                CacheRecord::new(seasons_body().to_string(), stale_stamp),
            )
            .unwrap();

        let payload: SeasonsPayload = fetcher.fetch_daily("seasons.json", now).await.unwrap();
        assert_eq!(payload.into_seasons().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_daily_fails_without_any_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/seasons.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let config = config_for(&server.uri(), None);
        let (fetcher, _store) = fetcher_for(&config);

        let result: Result<SeasonsPayload, _> =
            fetcher.fetch_daily("seasons.json", Utc::now()).await;
        match result {
            Err(AppError::FetchFailed {
                resource,
                attempted,
            }) => {
                assert_eq!(resource, "seasons.json");
                assert!(attempted.contains(&server.uri()));
            }
            other => panic!("Expected FetchFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_daily_promotes_fallback_source() {
        let primary = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/seasons.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&primary)
            .await;

        let secondary = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/seasons.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(seasons_body()))
            .expect(1)
            .mount(&secondary)
            .await;

        let config = config_for(&primary.uri(), Some(&secondary.uri()));
        let (fetcher, _store) = fetcher_for(&config);

        let payload: SeasonsPayload = fetcher
            .fetch_daily("seasons.json", Utc::now())
            .await
            .unwrap();
        assert_eq!(payload.into_seasons().len(), 1);
        secondary.verify().await;
    }

    #[tokio::test]
    async fn test_fetch_optional_daily_degrades_on_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/episode_details.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let config = config_for(&server.uri(), None);
        let (fetcher, _store) = fetcher_for(&config);

        let details: Option<DetailsPayload> = fetcher
            .fetch_optional_daily("episode_details.json", Utc::now())
            .await;
        assert!(details.is_none());
    }

    #[tokio::test]
    async fn test_fetch_dashboard_data_with_optional_details_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/seasons.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(seasons_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/episodes.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "episodes_by_season": {
                    "49": [{ "episode_in_season": 1, "air_date": "September 24, 2025" }]
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/episode_details.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let config = config_for(&server.uri(), None);
        let (fetcher, _store) = fetcher_for(&config);

        let data = fetcher.fetch_dashboard_data(Utc::now()).await.unwrap();
        assert_eq!(data.seasons.len(), 1);
        assert_eq!(data.episodes_for_season(49).len(), 1);
        // Absent details file is a distinct state, not an empty map
        assert!(data.details_by_season.is_none());
    }

    #[tokio::test]
    async fn test_fetch_dashboard_data_fails_when_required_resource_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/seasons.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(seasons_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/episodes.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/episode_details.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let config = config_for(&server.uri(), None);
        let (fetcher, _store) = fetcher_for(&config);

        let result = fetcher.fetch_dashboard_data(Utc::now()).await;
        assert!(matches!(result, Err(AppError::FetchFailed { .. })));
    }

    #[tokio::test]
    async fn test_fetch_daily_accepts_bare_array_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/seasons.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "season_number": 1 }, { "season_number": 2 }])),
            )
            .mount(&server)
            .await;

        let config = config_for(&server.uri(), None);
        let (fetcher, _store) = fetcher_for(&config);

        let payload: SeasonsPayload = fetcher
            .fetch_daily("seasons.json", Utc::now())
            .await
            .unwrap();
        assert_eq!(payload.into_seasons().len(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_all_forces_refetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/seasons.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(seasons_body()))
            .expect(2)
            .mount(&server)
            .await;

        let config = config_for(&server.uri(), None);
        let (fetcher, _store) = fetcher_for(&config);
        let now = Utc::now();

        let _: SeasonsPayload = fetcher.fetch_daily("seasons.json", now).await.unwrap();
        fetcher.invalidate_all();
        let _: SeasonsPayload = fetcher.fetch_daily("seasons.json", now).await.unwrap();

        server.verify().await;
    }

    async fn mount_dashboard_mocks(server: &MockServer, delay: Duration) {
        Mock::given(method("GET"))
            .and(path("/seasons.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(seasons_body())
                    .set_delay(delay),
            )
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/episodes.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "episodes_by_season": {} }))
                    .set_delay(delay),
            )
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/episode_details.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_guarded_load_applies_when_still_current() {
        let server = MockServer::start().await;
        mount_dashboard_mocks(&server, Duration::ZERO).await;

        let config = config_for(&server.uri(), None);
        let (fetcher, _store) = fetcher_for(&config);
        let guard = RefreshGuard::new();

        let data = fetcher
            .fetch_dashboard_data_guarded(&guard, Utc::now())
            .await
            .unwrap();
        assert!(data.is_some());
    }

    #[tokio::test]
    async fn test_guarded_load_dropped_when_superseded_in_flight() {
        let server = MockServer::start().await;
        mount_dashboard_mocks(&server, Duration::from_millis(300)).await;

        let config = config_for(&server.uri(), None);
        let store = Arc::new(MemoryCacheStore::new());
        let fetcher = Arc::new(ResourceFetcher::new(&config, store).unwrap());
        let guard = Arc::new(RefreshGuard::new());

        let in_flight = {
            let fetcher = fetcher.clone();
            let guard = guard.clone();
            tokio::spawn(
                async move { fetcher.fetch_dashboard_data_guarded(&guard, Utc::now()).await },
            )
        };

        // A newer load begins while the first is still waiting on the mock
        tokio::time::sleep(Duration::from_millis(50)).await;
        let _newer = guard.begin();

        let result = in_flight.await.unwrap().unwrap();
        assert!(result.is_none(), "superseded load must be dropped");
    }

    #[test]
    fn test_parse_payload_classifies_failures() {
        let empty = parse_payload::<SeasonsPayload>("   ", "http://example.com");
        assert!(matches!(empty, Err(AppError::NoData { .. })));

        let not_json = parse_payload::<SeasonsPayload>("<html>nope</html>", "http://example.com");
        assert!(matches!(not_json, Err(AppError::MalformedJson { .. })));

        let wrong_shape = parse_payload::<DetailsPayload>("[1, 2, 3]", "http://example.com");
        assert!(matches!(
            wrong_shape,
            Err(AppError::UnexpectedStructure { .. })
        ));
    }
}
