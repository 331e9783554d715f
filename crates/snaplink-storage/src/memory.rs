use async_trait::async_trait;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use jiff::Timestamp;
use parking_lot::Mutex;
use snaplink_core::error::Result;
use snaplink_core::{
    Clock, CreateOutcome, LinkRecord, ReadSlugStore, Slug, SlugStore, SystemClock,
};
use tracing::trace;

/// In-memory storage entry for a link.
#[derive(Debug, Clone)]
struct Entry {
    sequence: u64,
    destination_url: String,
    created_at: Timestamp,
    clicks: u64,
}

impl Entry {
    fn to_record(&self, slug: &str) -> LinkRecord {
        LinkRecord {
            slug: Slug::new_unchecked(slug),
            destination_url: self.destination_url.clone(),
            created_at: self.created_at,
            clicks: self.clicks,
        }
    }
}

/// Hands out insertion sequence numbers and creation timestamps together so
/// that timestamps never go backwards in insertion order, even if the
/// underlying clock does.
#[derive(Debug)]
struct Stamper {
    next_sequence: u64,
    last_created_at: Option<Timestamp>,
}

/// In-memory implementation of the slug store using DashMap.
///
/// Create-if-absent goes through the DashMap entry API, which holds the
/// shard's write lock for the whole check-and-insert, and increments mutate
/// the entry under the same lock, so neither can lose an update.
#[derive(Debug)]
pub struct InMemorySlugStore<C = SystemClock> {
    storage: DashMap<String, Entry>,
    stamper: Mutex<Stamper>,
    clock: C,
}

impl InMemorySlugStore<SystemClock> {
    /// Creates a new in-memory store backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
            stamper: Mutex::new(Stamper {
                next_sequence: 0,
                last_created_at: None,
            }),
            clock: SystemClock,
        }
    }
}

impl<C: Clock> InMemorySlugStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            storage: DashMap::new(),
            stamper: Mutex::new(Stamper {
                next_sequence: 0,
                last_created_at: None,
            }),
            clock,
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    fn stamp(&self) -> (u64, Timestamp) {
        let mut stamper = self.stamper.lock();
        let now = self.clock.now();
        let created_at = match stamper.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        };
        let sequence = stamper.next_sequence;
        stamper.next_sequence += 1;
        stamper.last_created_at = Some(created_at);
        (sequence, created_at)
    }
}

impl Default for InMemorySlugStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<C: Clock> ReadSlugStore for InMemorySlugStore<C> {
    async fn get(&self, slug: &Slug) -> Result<Option<LinkRecord>> {
        Ok(self
            .storage
            .get(slug.as_str())
            .map(|entry| entry.to_record(slug.as_str())))
    }

    async fn list_all(&self) -> Result<Vec<LinkRecord>> {
        let mut snapshot: Vec<(u64, LinkRecord)> = self
            .storage
            .iter()
            .map(|item| (item.value().sequence, item.value().to_record(item.key())))
            .collect();
        snapshot.sort_by_key(|(sequence, _)| *sequence);

        Ok(snapshot.into_iter().map(|(_, record)| record).collect())
    }
}

#[async_trait]
impl<C: Clock> SlugStore for InMemorySlugStore<C> {
    async fn try_create(&self, slug: &Slug, destination_url: &str) -> Result<CreateOutcome> {
        match self.storage.entry(slug.as_str().to_owned()) {
            MapEntry::Occupied(_) => {
                trace!(slug = %slug, "slug already present");
                Ok(CreateOutcome::AlreadyExists)
            }
            MapEntry::Vacant(vacant) => {
                let (sequence, created_at) = self.stamp();
                let entry = Entry {
                    sequence,
                    destination_url: destination_url.to_owned(),
                    created_at,
                    clicks: 0,
                };
                let record = entry.to_record(slug.as_str());
                vacant.insert(entry);
                Ok(CreateOutcome::Created(record))
            }
        }
    }

    async fn increment_clicks(&self, slug: &Slug) -> Result<Option<LinkRecord>> {
        let Some(mut entry) = self.storage.get_mut(slug.as_str()) else {
            return Ok(None);
        };

        entry.clicks = entry.clicks.saturating_add(1);
        Ok(Some(entry.to_record(slug.as_str())))
    }
}
