use crate::settings::RegistrySettings;
use async_trait::async_trait;
use snaplink_core::{
    CreateOutcome, CreateParams, CreatedLink, LinkRecord, RegistryError, Slug, SlugRegistry,
    SlugStore, StorageError,
};
use snaplink_generator::Generator;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use url::Url;

type Result<T> = std::result::Result<T, RegistryError>;

/// Redirecting to script URLs would run code in the visitor's page.
const BLOCKED_SCHEME: &str = "javascript";

/// A concrete implementation of the [`SlugRegistry`] trait.
///
/// This service wraps a [`SlugStore`] and a [`Generator`] to handle:
/// - URL and custom slug validation
/// - Slug generation with bounded collision retry
/// - Click accounting on resolve
///
/// Uniqueness is never checked up front; the store's create-if-absent is the
/// only arbiter, so concurrent callers cannot both win the same slug.
#[derive(Debug)]
pub struct RegistryService<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
    settings: RegistrySettings,
}

impl<S, G> Clone for RegistryService<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
            settings: self.settings.clone(),
        }
    }
}

impl<S: SlugStore, G: Generator> RegistryService<S, G> {
    /// Creates a new `RegistryService` with default settings.
    pub fn new(store: S, generator: G) -> Self {
        Self::with_settings(Arc::new(store), generator, RegistrySettings::default())
    }

    /// Creates a service over a store that may be shared with other readers.
    pub fn with_settings(store: Arc<S>, generator: G, settings: RegistrySettings) -> Self {
        Self {
            store,
            generator: Arc::new(generator),
            settings,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    /// Accepts any absolute URL except `javascript:` ones.
    fn validate_url(raw: &str) -> Result<()> {
        if raw.is_empty() {
            return Err(RegistryError::InvalidUrl("URL cannot be empty".to_string()));
        }

        if raw.trim() != raw {
            return Err(RegistryError::InvalidUrl(format!(
                "URL must not have surrounding whitespace: '{}'",
                raw
            )));
        }

        // `Url::parse` only yields absolute URLs; relative input is an error.
        let parsed = Url::parse(raw)
            .map_err(|e| RegistryError::InvalidUrl(format!("{}: {}", raw, e)))?;

        if parsed.scheme() == BLOCKED_SCHEME {
            return Err(RegistryError::InvalidUrl(format!(
                "URL scheme is not allowed: {}",
                parsed.scheme()
            )));
        }

        Ok(())
    }

    /// Runs a store call under the configured deadline.
    async fn with_deadline<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = std::result::Result<T, StorageError>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.settings.store_timeout(), call).await {
            Ok(result) => result.map_err(RegistryError::from),
            Err(_) => {
                warn!(operation, timeout = ?self.settings.store_timeout(), "store call timed out");
                Err(RegistryError::StoreTimeout { operation })
            }
        }
    }

    /// `try_create` under the deadline. A timeout here is ambiguous, so it is
    /// reported as its own outcome rather than as a failure.
    async fn try_create(&self, slug: &Slug, destination_url: &str) -> Result<CreateOutcome> {
        match tokio::time::timeout(
            self.settings.store_timeout(),
            self.store.try_create(slug, destination_url),
        )
        .await
        {
            Ok(result) => result.map_err(RegistryError::from),
            Err(_) => {
                warn!(slug = %slug, "create timed out; outcome unknown");
                Err(RegistryError::CreateOutcomeUnknown {
                    slug: slug.to_string(),
                })
            }
        }
    }

    async fn create_custom(&self, slug: Slug, destination_url: &str) -> Result<LinkRecord> {
        match self.try_create(&slug, destination_url).await? {
            CreateOutcome::Created(record) => Ok(record),
            CreateOutcome::AlreadyExists => {
                debug!(slug = %slug, "custom slug already taken");
                Err(RegistryError::SlugTaken(slug.to_string()))
            }
        }
    }

    async fn create_generated(&self, destination_url: &str) -> Result<LinkRecord> {
        let attempts = self.settings.max_generation_attempts();

        for attempt in 1..=attempts {
            let candidate: Slug = self.generator.generate().into();
            match self.try_create(&candidate, destination_url).await? {
                CreateOutcome::Created(record) => return Ok(record),
                CreateOutcome::AlreadyExists => {
                    warn!(slug = %candidate, attempt, attempts, "generated slug collided");
                }
            }
        }

        Err(RegistryError::SlugGenerationExhausted { attempts })
    }

    /// Parses a path segment into a slug. Malformed input can never have been
    /// stored, so it is reported as unknown rather than as a format error.
    fn known_slug(raw: &str) -> Result<Slug> {
        Slug::new(raw).map_err(|_| RegistryError::UnknownSlug(raw.to_string()))
    }
}

#[async_trait]
impl<S: SlugStore, G: Generator> SlugRegistry for RegistryService<S, G> {
    async fn create(&self, params: CreateParams) -> Result<CreatedLink> {
        Self::validate_url(&params.destination_url)?;

        let custom_slug = params
            .custom_slug
            .filter(|s| !s.is_empty())
            .map(Slug::new)
            .transpose()?;

        let record = match custom_slug {
            Some(slug) => self.create_custom(slug, &params.destination_url).await?,
            None => self.create_generated(&params.destination_url).await?,
        };

        debug!(slug = %record.slug, url = %record.destination_url, "created short link");
        Ok(CreatedLink {
            short_url_path: record.slug.to_path(),
            record,
        })
    }

    async fn resolve(&self, slug: &str) -> Result<LinkRecord> {
        trace!(slug, "resolving slug");
        let slug = Self::known_slug(slug)?;

        if self.with_deadline("get", self.store.get(&slug)).await?.is_none() {
            trace!(slug = %slug, "slug not found");
            return Err(RegistryError::UnknownSlug(slug.to_string()));
        }

        // The increment runs on its own task: once issued it completes even if
        // this future is dropped because the caller went away.
        let store = Arc::clone(&self.store);
        let key = slug.clone();
        let increment = tokio::spawn(async move { store.increment_clicks(&key).await });

        let joined = self
            .with_deadline("increment_clicks", async move {
                increment.await.map_err(|e| {
                    StorageError::Operation(format!("click increment task failed: {e}"))
                })?
            })
            .await?;

        match joined {
            Some(record) => {
                debug!(slug = %slug, clicks = record.clicks, "resolved slug");
                Ok(record)
            }
            None => Err(RegistryError::UnknownSlug(slug.to_string())),
        }
    }

    async fn lookup(&self, slug: &str) -> Result<LinkRecord> {
        let slug = Self::known_slug(slug)?;

        self.with_deadline("get", self.store.get(&slug))
            .await?
            .ok_or_else(|| RegistryError::UnknownSlug(slug.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snaplink_core::ReadSlugStore;
    use snaplink_generator::RandomGenerator;
    use snaplink_storage::InMemorySlugStore;
    use std::sync::Mutex;
    use std::time::Duration;

    fn test_service() -> RegistryService<InMemorySlugStore, RandomGenerator> {
        RegistryService::new(InMemorySlugStore::new(), RandomGenerator::new())
    }

    /// Replays a fixed list of candidates, then repeats the last one.
    struct ScriptedGenerator {
        candidates: Mutex<Vec<&'static str>>,
    }

    impl ScriptedGenerator {
        fn new(mut candidates: Vec<&'static str>) -> Self {
            candidates.reverse();
            Self {
                candidates: Mutex::new(candidates),
            }
        }
    }

    impl Generator for ScriptedGenerator {
        type Output = Slug;

        fn generate(&self) -> Slug {
            let mut candidates = self.candidates.lock().unwrap();
            let next = if candidates.len() > 1 {
                candidates.pop().unwrap()
            } else {
                candidates[0]
            };
            Slug::new_unchecked(next)
        }
    }

    /// Commits to the inner store, then sleeps before acknowledging.
    struct SlowAckStore {
        inner: InMemorySlugStore,
        delay: Duration,
    }

    #[async_trait]
    impl ReadSlugStore for SlowAckStore {
        async fn get(&self, slug: &Slug) -> snaplink_core::error::Result<Option<LinkRecord>> {
            let record = self.inner.get(slug).await;
            tokio::time::sleep(self.delay).await;
            record
        }

        async fn list_all(&self) -> snaplink_core::error::Result<Vec<LinkRecord>> {
            self.inner.list_all().await
        }
    }

    #[async_trait]
    impl SlugStore for SlowAckStore {
        async fn try_create(
            &self,
            slug: &Slug,
            destination_url: &str,
        ) -> snaplink_core::error::Result<CreateOutcome> {
            let outcome = self.inner.try_create(slug, destination_url).await;
            tokio::time::sleep(self.delay).await;
            outcome
        }

        async fn increment_clicks(
            &self,
            slug: &Slug,
        ) -> snaplink_core::error::Result<Option<LinkRecord>> {
            self.inner.increment_clicks(slug).await
        }
    }

    /// A store whose backend is down.
    struct UnavailableStore;

    #[async_trait]
    impl ReadSlugStore for UnavailableStore {
        async fn get(&self, _slug: &Slug) -> snaplink_core::error::Result<Option<LinkRecord>> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }

        async fn list_all(&self) -> snaplink_core::error::Result<Vec<LinkRecord>> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }
    }

    #[async_trait]
    impl SlugStore for UnavailableStore {
        async fn try_create(
            &self,
            _slug: &Slug,
            _destination_url: &str,
        ) -> snaplink_core::error::Result<CreateOutcome> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }

        async fn increment_clicks(
            &self,
            _slug: &Slug,
        ) -> snaplink_core::error::Result<Option<LinkRecord>> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn create_with_generated_slug() {
        let service = test_service();

        let created = service
            .create(CreateParams::generated("https://example.com"))
            .await
            .unwrap();

        assert_eq!(created.slug().as_str().len(), 6);
        assert_eq!(created.short_url_path, format!("/{}", created.slug()));
        assert_eq!(created.record.clicks, 0);
    }

    #[tokio::test]
    async fn create_with_custom_slug() {
        let service = test_service();

        let created = service
            .create(CreateParams::custom("https://example.com", "my-alias"))
            .await
            .unwrap();

        assert_eq!(created.slug().as_str(), "my-alias");
        assert_eq!(created.short_url_path, "/my-alias");
    }

    #[tokio::test]
    async fn empty_custom_slug_means_generated() {
        let service = test_service();

        let created = service
            .create(CreateParams::custom("https://example.com", ""))
            .await
            .unwrap();

        assert_eq!(created.slug().as_str().len(), 6);
    }

    #[tokio::test]
    async fn duplicate_custom_slug_is_taken() {
        let service = test_service();

        service
            .create(CreateParams::custom("https://example1.com", "my-alias"))
            .await
            .unwrap();
        let err = service
            .create(CreateParams::custom("https://example2.com", "my-alias"))
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::SlugTaken(_)));
        let kept = service.lookup("my-alias").await.unwrap();
        assert_eq!(kept.destination_url, "https://example1.com");
    }

    #[tokio::test]
    async fn invalid_url_is_rejected_before_store_access() {
        let service = RegistryService::new(UnavailableStore, RandomGenerator::new());

        for url in [
            "",
            "not-a-valid-url",
            "/relative/path",
            "javascript:alert(1)",
            "JavaScript:alert(1)",
            " https://example.com",
            "https://",
        ] {
            let err = service
                .create(CreateParams::generated(url))
                .await
                .unwrap_err();
            assert!(matches!(err, RegistryError::InvalidUrl(_)), "{url}: {err:?}");
        }
    }

    #[tokio::test]
    async fn any_absolute_url_is_accepted() {
        let service = test_service();

        for url in [
            "https://example.com",
            "http://localhost:8080/path?q=1",
            "ftp://example.com/file",
            "mailto:user@example.com",
        ] {
            let created = service
                .create(CreateParams::generated(url))
                .await
                .unwrap_or_else(|e| panic!("{url}: {e:?}"));
            assert_eq!(created.record.destination_url, url);
        }
    }

    #[tokio::test]
    async fn invalid_custom_slug_is_rejected_before_store_access() {
        let service = RegistryService::new(UnavailableStore, RandomGenerator::new());

        for slug in ["ab", "has space", "slash/slug", "a-very-long-slug-over-20"] {
            let err = service
                .create(CreateParams::custom("https://example.com", slug))
                .await
                .unwrap_err();
            assert!(
                matches!(err, RegistryError::InvalidSlugFormat(_)),
                "{slug}: {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn generated_collision_is_retried() {
        let store = InMemorySlugStore::new();
        store.try_create(&Slug::new_unchecked("taken1"), "https://a.com").await.unwrap();
        let service = RegistryService::new(store, ScriptedGenerator::new(vec!["taken1", "free01"]));

        let created = service
            .create(CreateParams::generated("https://example.com"))
            .await
            .unwrap();

        assert_eq!(created.slug().as_str(), "free01");
    }

    #[tokio::test]
    async fn generation_gives_up_after_configured_attempts() {
        let store = InMemorySlugStore::new();
        store.try_create(&Slug::new_unchecked("taken1"), "https://a.com").await.unwrap();
        let settings = RegistrySettings::builder().max_generation_attempts(4).build();
        let service = RegistryService::with_settings(
            Arc::new(store),
            ScriptedGenerator::new(vec!["taken1"]),
            settings,
        );

        let err = service
            .create(CreateParams::generated("https://example.com"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RegistryError::SlugGenerationExhausted { attempts: 4 }
        ));
        assert!(err.is_retriable());
        assert_eq!(service.store().len(), 1);
    }

    #[tokio::test]
    async fn at_least_one_retry_even_when_configured_lower() {
        let store = InMemorySlugStore::new();
        store.try_create(&Slug::new_unchecked("taken1"), "https://a.com").await.unwrap();
        let settings = RegistrySettings::builder().max_generation_attempts(1).build();
        let service = RegistryService::with_settings(
            Arc::new(store),
            ScriptedGenerator::new(vec!["taken1", "free01"]),
            settings,
        );

        let created = service
            .create(CreateParams::generated("https://example.com"))
            .await
            .unwrap();
        assert_eq!(created.slug().as_str(), "free01");
    }

    #[tokio::test]
    async fn resolve_increments_before_returning() {
        let service = test_service();
        service
            .create(CreateParams::custom("https://example.com", "abc123"))
            .await
            .unwrap();

        let first = service.resolve("abc123").await.unwrap();
        let second = service.resolve("abc123").await.unwrap();

        assert_eq!(first.destination_url, "https://example.com");
        assert_eq!(first.clicks, 1);
        assert_eq!(second.clicks, 2);
        assert_eq!(service.lookup("abc123").await.unwrap().clicks, 2);
    }

    #[tokio::test]
    async fn resolve_unknown_slug() {
        let service = test_service();

        let err = service.resolve("nonexistent").await.unwrap_err();
        assert!(matches!(err, RegistryError::UnknownSlug(_)));

        // Malformed slugs cannot exist, so they are unknown too.
        let err = service.resolve("x").await.unwrap_err();
        assert!(matches!(err, RegistryError::UnknownSlug(_)));
    }

    #[tokio::test]
    async fn lookup_does_not_count_clicks() {
        let service = test_service();
        service
            .create(CreateParams::custom("https://example.com", "abc123"))
            .await
            .unwrap();

        service.lookup("abc123").await.unwrap();
        service.lookup("abc123").await.unwrap();

        assert_eq!(service.lookup("abc123").await.unwrap().clicks, 0);
    }

    #[tokio::test]
    async fn store_failures_are_surfaced() {
        let service = RegistryService::new(UnavailableStore, RandomGenerator::new());

        let err = service
            .create(CreateParams::generated("https://example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Storage(StorageError::Unavailable(_))));
        assert!(err.is_retriable());

        let err = service.resolve("abc123").await.unwrap_err();
        assert!(matches!(err, RegistryError::Storage(StorageError::Unavailable(_))));
    }

    #[tokio::test]
    async fn timed_out_create_reports_unknown_outcome() {
        let store = SlowAckStore {
            inner: InMemorySlugStore::new(),
            delay: Duration::from_millis(500),
        };
        let settings = RegistrySettings::builder()
            .store_timeout(Duration::from_millis(20))
            .build();
        let service =
            RegistryService::with_settings(Arc::new(store), RandomGenerator::new(), settings);

        let err = service
            .create(CreateParams::custom("https://example.com", "slowpoke"))
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::CreateOutcomeUnknown { ref slug } if slug == "slowpoke"));
        // The create did commit even though the caller was told it timed out.
        assert!(service
            .store()
            .inner
            .get(&Slug::new_unchecked("slowpoke"))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn timed_out_read_reports_store_timeout() {
        let inner = InMemorySlugStore::new();
        inner
            .try_create(&Slug::new_unchecked("slowpoke"), "https://example.com")
            .await
            .unwrap();
        let store = SlowAckStore {
            inner,
            delay: Duration::from_millis(500),
        };
        let settings = RegistrySettings::builder()
            .store_timeout(Duration::from_millis(20))
            .build();
        let service =
            RegistryService::with_settings(Arc::new(store), RandomGenerator::new(), settings);

        let err = service.resolve("slowpoke").await.unwrap_err();
        assert!(matches!(err, RegistryError::StoreTimeout { operation: "get" }));
    }
}
