//! services/app/src/notes/feed_task.rs
//!
//! This module contains the live feed pipeline: it subscribes to the owner's
//! notes and regroups the full snapshot into the month/day hierarchy on
//! every push.

use crate::state::AppState;
use daily_memo_core::domain::UserId;
use daily_memo_core::feed::{group_by_date, GroupedFeed};
use daily_memo_core::ports::PortResult;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// One emission of the feed pipeline. Consumers re-render the entire feed on
/// every emission; there is no incremental diff.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedUpdate {
    pub feed: GroupedFeed,
    /// True when the most recent push failed and `feed` is the last snapshot
    /// that arrived intact.
    pub stale: bool,
}

pub type FeedStream = Pin<Box<dyn Stream<Item = FeedUpdate> + Send>>;

/// Opens the live query for `owner` and yields a regrouped feed on every
/// push.
///
/// A failed push does not tear the subscription down: the previous grouping
/// is re-emitted flagged `stale` and the listener keeps waiting, so the feed
/// never flashes empty. Cancelling `token` ends the stream; re-subscribing
/// for a different owner must cancel the previous token first so at most one
/// listener is live per view.
pub async fn subscribe(
    state: &AppState,
    owner: &UserId,
    token: CancellationToken,
) -> PortResult<FeedStream> {
    let mut snapshots = state.notes.watch_notes(owner).await?;
    let owner = owner.clone();
    info!("Feed subscription opened for {}", owner);

    let stream = async_stream::stream! {
        let mut last_good = GroupedFeed::default();
        loop {
            let item = tokio::select! {
                _ = token.cancelled() => {
                    info!("Feed subscription for {} cancelled", owner);
                    break;
                }
                item = snapshots.next() => item,
            };
            match item {
                Some(Ok(notes)) => {
                    // The store's query already filters by owner; dropping
                    // anything else keeps the invariant even against a
                    // misbehaving backend.
                    let notes: Vec<_> = notes
                        .into_iter()
                        .filter(|note| note.owner_id == owner)
                        .collect();
                    last_good = group_by_date(notes);
                    yield FeedUpdate { feed: last_good.clone(), stale: false };
                }
                Some(Err(e)) => {
                    warn!("Live query push for {} failed, keeping last feed: {}", owner, e);
                    yield FeedUpdate { feed: last_good.clone(), stale: true };
                }
                None => break,
            }
        }
    };
    Ok(Box::pin(stream))
}
