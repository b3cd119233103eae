//! Fetch-collaborator boundary.
//!
//! Concrete tracker clients (pagination, rate limits, authentication) live
//! outside the core. They implement [`IssueSource`] and push batches of
//! raw provider records into a channel; [`drain_batches`] is the single
//! writer that merges every batch into the shared collection before
//! resolution starts. Batches carry no ordering guarantee and may re-deliver
//! issues; the merge overwrites by URL, so re-delivery is harmless.

use crate::collection::IssueCollection;
use crate::domain::RawIssue;
use crate::error::{Error, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// A push-based source of raw issue batches for one logical repository.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Fetches all issues, sending them in batches as they arrive.
    ///
    /// Returns when the source is exhausted. Dropping the sender closes
    /// the channel and ends the merge loop.
    ///
    /// # Errors
    ///
    /// Implementations report fetch failures; the core does not retry.
    async fn fetch(&self, batches: mpsc::Sender<Vec<RawIssue>>) -> Result<()>;
}

/// Drains batches into the collection under single-writer discipline.
///
/// This is the serializing merge step: however many sources feed the
/// channel concurrently, exactly one consumer mutates the collection.
/// Returns the normalization errors of rejected records; everything else
/// is merged.
pub async fn drain_batches(
    mut batches: mpsc::Receiver<Vec<RawIssue>>,
    collection: &mut IssueCollection,
) -> Vec<Error> {
    let mut rejected = Vec::new();
    while let Some(batch) = batches.recv().await {
        rejected.extend(collection.merge_batch(batch));
    }
    rejected
}
