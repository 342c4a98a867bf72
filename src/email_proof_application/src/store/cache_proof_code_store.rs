use async_trait::async_trait;
use email_proof_core::{
    Clock, CodeGenerator, ProofCache, ProofCode, ProofCodeStore, ProofCodeStoreError, ProofItem,
    ProofItemCollection,
};
use tracing::{debug, error, info, warn};

use super::options::{KeyLayout, StoreOptions, WriteMode};

/// Collection as it was read, along with the raw payload it came from.
struct Snapshot {
    raw: Option<String>,
    collection: ProofItemCollection,
}

/// Proof-code store layered on a shared [`ProofCache`].
///
/// Holds no state of its own. Every call loads the relevant collection from
/// the cache, so any number of instances can serve the same identities.
#[derive(Clone)]
pub struct CacheProofCodeStore<C, G, K>
where
    C: ProofCache,
    G: CodeGenerator,
    K: Clock,
{
    cache: C,
    generator: G,
    clock: K,
    options: StoreOptions,
}

impl<C, G, K> CacheProofCodeStore<C, G, K>
where
    C: ProofCache,
    G: CodeGenerator,
    K: Clock,
{
    pub fn new(cache: C, generator: G, clock: K, options: StoreOptions) -> Self {
        Self {
            cache,
            generator,
            clock,
            options,
        }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    async fn load(&self, key: &str) -> Result<Snapshot, ProofCodeStoreError> {
        let raw = self.cache.get(key).await?;
        let collection = match raw.as_deref() {
            None => ProofItemCollection::new(),
            Some(payload) => ProofItemCollection::decode(payload).unwrap_or_else(|e| {
                error!("Error deserializing proof items under {key}: {e}");
                ProofItemCollection::new()
            }),
        };
        Ok(Snapshot { raw, collection })
    }

    /// Payload to write back, or `None` when the key should go away instead.
    fn encode(
        &self,
        collection: &ProofItemCollection,
    ) -> Result<Option<String>, ProofCodeStoreError> {
        if collection.is_empty() && self.options.key_layout == KeyLayout::PerEmail {
            return Ok(None);
        }
        collection
            .encode()
            .map(Some)
            .map_err(|e| ProofCodeStoreError::Encode(e.to_string()))
    }

    fn prune(&self, collection: &mut ProofItemCollection) {
        let dropped = collection.prune_expired(self.clock.now(), self.options.window());
        if dropped > 0 {
            debug!("Pruned {dropped} expired proof items");
        }
    }

    /// Runs load, `mutate`, store against `key`. `mutate` returns whether it
    /// changed anything; unchanged collections are never written. Expired
    /// items are dropped from whatever does get written.
    ///
    /// Under [`WriteMode::CompareAndSwap`] the whole cycle is repeated while
    /// another writer got in between, so `mutate` may run more than once.
    async fn update<F>(&self, key: &str, mut mutate: F) -> Result<bool, ProofCodeStoreError>
    where
        F: FnMut(&mut ProofItemCollection) -> bool + Send,
    {
        let ttl = self.options.validity_window;

        match self.options.write_mode {
            WriteMode::LastWriterWins => {
                let mut snapshot = self.load(key).await?;
                if !mutate(&mut snapshot.collection) {
                    return Ok(false);
                }
                self.prune(&mut snapshot.collection);
                match self.encode(&snapshot.collection)? {
                    Some(payload) => self.cache.set(key, &payload, ttl).await?,
                    None => self.cache.delete(key).await?,
                }
                Ok(true)
            }
            WriteMode::CompareAndSwap => {
                let attempts = self.options.max_cas_attempts.max(1);
                for attempt in 1..=attempts {
                    let mut snapshot = self.load(key).await?;
                    if !mutate(&mut snapshot.collection) {
                        return Ok(false);
                    }
                    self.prune(&mut snapshot.collection);
                    let replacement = self.encode(&snapshot.collection)?;
                    let swapped = self
                        .cache
                        .compare_and_swap(
                            key,
                            snapshot.raw.as_deref(),
                            replacement.as_deref(),
                            ttl,
                        )
                        .await?;
                    if swapped {
                        return Ok(true);
                    }
                    debug!("Concurrent write on {key}, attempt {attempt} of {attempts}");
                    tokio::task::yield_now().await;
                }
                warn!("Giving up on {key} after {attempts} conflicting writes");
                Err(ProofCodeStoreError::Contention {
                    key: key.to_owned(),
                    attempts,
                })
            }
        }
    }

    async fn load_all_items(&self) -> Result<Vec<ProofItem>, ProofCodeStoreError> {
        match self.options.key_layout {
            KeyLayout::Shared => {
                let snapshot = self.load(&self.options.cache_key).await?;
                Ok(snapshot.collection.into_items())
            }
            KeyLayout::PerEmail => {
                let mut keys = self
                    .cache
                    .keys_with_prefix(&self.options.per_email_prefix())
                    .await?;
                keys.sort();

                let mut items = Vec::new();
                for key in keys {
                    items.extend(self.load(&key).await?.collection.into_items());
                }
                Ok(items)
            }
        }
    }

    async fn find_valid(&self, email: &str) -> Result<Option<ProofItem>, ProofCodeStoreError> {
        let key = self.options.collection_key(email);
        let snapshot = self.load(&key).await?;
        Ok(snapshot
            .collection
            .find_valid(email, self.clock.now(), self.options.window())
            .cloned())
    }
}

#[async_trait]
impl<C, G, K> ProofCodeStore for CacheProofCodeStore<C, G, K>
where
    C: ProofCache,
    G: CodeGenerator,
    K: Clock,
{
    async fn generate_proof_code(&self, email: &str) -> Result<ProofCode, ProofCodeStoreError> {
        debug!("Generating proof code for email address: {email}");
        let code = self.generator.generate();
        let item = ProofItem::new(email, code, self.clock.now());

        let key = self.options.collection_key(email);
        self.update(&key, |collection| {
            collection.supersede(item.clone());
            true
        })
        .await?;

        info!("Stored proof code for email: {email}");
        Ok(code)
    }

    async fn contains(&self, email: &str) -> Result<bool, ProofCodeStoreError> {
        let exists = self.find_valid(email).await?.is_some();
        debug!("Contains check for email {email}: {exists}");
        Ok(exists)
    }

    async fn validate_proof_code(
        &self,
        email: &str,
        submitted: u32,
    ) -> Result<bool, ProofCodeStoreError> {
        let Some(item) = self.find_valid(email).await? else {
            warn!("No proof code found for email: {email}");
            return Ok(false);
        };

        if !item.code.matches(submitted) {
            warn!("Invalid proof code submitted for email: {email}");
            return Ok(false);
        }

        info!("Proof code validated for email: {email}");
        Ok(true)
    }

    async fn delete_proof_code(&self, email: &str) -> Result<(), ProofCodeStoreError> {
        let key = self.options.collection_key(email);
        let removed = self
            .update(&key, |collection| collection.remove_email(email) > 0)
            .await?;

        if removed {
            info!("Deleted proof code for email: {email}");
        } else {
            warn!("No proof code found to delete for email: {email}");
        }
        Ok(())
    }

    async fn list_valid_proof_items(&self) -> Result<Vec<ProofItem>, ProofCodeStoreError> {
        let all = self.load_all_items().await?;
        let total = all.len();
        let now = self.clock.now();
        let window = self.options.window();

        let valid: Vec<ProofItem> = all
            .into_iter()
            .filter(|item| item.is_valid_at(now, window))
            .collect();

        debug!("Retrieved {} valid proof items (total: {total})", valid.len());
        Ok(valid)
    }
}
