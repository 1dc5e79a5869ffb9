use super::*;
use crate::ID;
use crate::store::Room;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use tokio::sync::Mutex;
use tokio::sync::OwnedMutexGuard;
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;

type Tx = UnboundedSender<String>;
type Rx = UnboundedReceiver<String>;
type Batch = (ID<Room>, Vec<(u64, Record)>);

/// Handle identifying one subscription.
pub type Ticket = u64;

/// Live subscribers of one match.
#[derive(Debug, Default)]
struct Audience {
    subscribers: BTreeMap<Ticket, Tx>,
}

/// Per-match publish/subscribe registry.
///
/// Subscribers receive JSON text over unbounded channels, so a slow reader
/// only grows its own queue and never stalls the publisher. Publishes to one
/// match are serialized by that match's audience lock, which is what makes
/// delivery FIFO per match. Journal writes happen on a background writer and
/// never hold that lock.
///
/// An audience only lives while someone subscribes to or publishes on it.
pub struct Hub {
    audiences: RwLock<HashMap<ID<Room>, Arc<Mutex<Audience>>>>,
    journal: Arc<dyn Journal>,
    writer: OnceLock<UnboundedSender<Batch>>,
    count: AtomicU64,
    seq: AtomicU64,
}

/// Exclusive publishing rights on one match.
///
/// Hold it across a row commit and publish the resulting snapshot through
/// it: snapshots then reach subscribers in the order they were committed.
pub struct Stage<'a> {
    hub: &'a Hub,
    room: ID<Room>,
    audience: OwnedMutexGuard<Audience>,
}

impl Default for Hub {
    fn default() -> Self {
        Self::new(Arc::new(Discard))
    }
}

impl Hub {
    pub fn new(journal: Arc<dyn Journal>) -> Self {
        Self {
            audiences: RwLock::new(HashMap::new()),
            journal,
            writer: OnceLock::new(),
            count: AtomicU64::new(1),
            seq: AtomicU64::new(0),
        }
    }

    /// Registers a new subscriber for the match.
    pub async fn subscribe(&self, room: ID<Room>) -> (Ticket, Rx) {
        let ticket = self.count.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = unbounded_channel::<String>();
        self.audience(room)
            .await
            .lock()
            .await
            .subscribers
            .insert(ticket, tx);
        log::debug!("[hub {}] subscriber {} joined", room, ticket);
        (ticket, rx)
    }

    /// Removes a subscriber. Unknown tickets and matches are ignored.
    pub async fn unsubscribe(&self, room: ID<Room>, ticket: Ticket) {
        let audience = self.audiences.read().await.get(&room).cloned();
        if let Some(audience) = audience {
            if audience.lock().await.subscribers.remove(&ticket).is_some() {
                log::debug!("[hub {}] subscriber {} left", room, ticket);
            }
            drop(audience);
            self.prune(room).await;
        }
    }

    /// Waits for exclusive publishing rights on the match.
    pub async fn stage(&self, room: ID<Room>) -> Stage<'_> {
        Stage {
            hub: self,
            room,
            audience: self.audience(room).await.lock_owned().await,
        }
    }

    /// Delivers records to every current subscriber, in order.
    pub async fn publish(&self, room: ID<Room>, events: Vec<Event>) {
        self.stage(room).await.publish(events).await;
    }

    /// Forgets the match, ending every subscriber's stream.
    pub async fn close(&self, room: ID<Room>) {
        if let Some(audience) = self.audiences.write().await.remove(&room) {
            let n = audience.lock().await.subscribers.len();
            log::info!("[hub {}] closed with {} subscribers", room, n);
        }
    }

    /// Number of live subscribers of the match.
    pub async fn audience_size(&self, room: ID<Room>) -> usize {
        let audience = self.audiences.read().await.get(&room).cloned();
        match audience {
            Some(audience) => audience.lock().await.subscribers.len(),
            None => 0,
        }
    }

    /// Number of matches with a live audience.
    pub async fn audiences(&self) -> usize {
        self.audiences.read().await.len()
    }
}

impl Hub {
    async fn audience(&self, room: ID<Room>) -> Arc<Mutex<Audience>> {
        if let Some(audience) = self.audiences.read().await.get(&room) {
            return audience.clone();
        }
        self.audiences
            .write()
            .await
            .entry(room)
            .or_default()
            .clone()
    }

    /// Drops the match's audience once nobody subscribes to it and nobody
    /// else holds it. Handles are only cloned under the registry lock.
    async fn prune(&self, room: ID<Room>) {
        let mut audiences = self.audiences.write().await;
        let idle = audiences.get(&room).is_some_and(|audience| {
            Arc::strong_count(audience) == 1
                && audience
                    .try_lock()
                    .is_ok_and(|audience| audience.subscribers.is_empty())
        });
        if idle {
            audiences.remove(&room);
            log::debug!("[hub {}] audience dropped", room);
        }
    }

    /// Queues a batch for the journal writer, starting it on first use.
    fn enqueue(&self, room: ID<Room>, entries: Vec<(u64, Record)>) {
        let writer = self.writer.get_or_init(|| {
            let (tx, mut rx) = unbounded_channel::<Batch>();
            let journal = self.journal.clone();
            tokio::spawn(async move {
                while let Some((room, entries)) = rx.recv().await {
                    if let Err(e) = journal.append(&entries).await {
                        log::warn!("[hub {}] journal append failed: {}", room, e);
                    }
                }
            });
            tx
        });
        if writer.send((room, entries)).is_err() {
            log::warn!("[hub {}] journal writer is gone", room);
        }
    }
}

impl Stage<'_> {
    /// Delivers records to every current subscriber, in order, and lets go
    /// of the match.
    pub async fn publish(self, events: Vec<Event>) {
        let Self {
            hub,
            room,
            mut audience,
        } = self;
        let mut entries = Vec::with_capacity(events.len());
        for event in events {
            let record = Record::new(room, event);
            match record.json() {
                Ok(json) => audience.subscribers.retain(|ticket, tx| {
                    tx.send(json.clone())
                        .inspect_err(|_| log::warn!("[hub {}] dropping subscriber {}", room, ticket))
                        .is_ok()
                }),
                Err(e) => log::error!("[hub {}] unencodable {} record: {}", room, record.kind(), e),
            }
            log::debug!("[hub {}] published {}", room, record.kind());
            entries.push((hub.seq.fetch_add(1, Ordering::Relaxed) + 1, record));
        }
        if !entries.is_empty() {
            hub.enqueue(room, entries);
        }
        drop(audience);
        hub.prune(room).await;
    }
    /// Lets go of the match without publishing anything.
    pub async fn cancel(self) {
        let Self { hub, room, audience } = self;
        drop(audience);
        hub.prune(room).await;
    }
}
