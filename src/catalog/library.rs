use super::*;
use crate::ID;
use crate::Points;
use crate::Unique;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::HashSet;
use tokio::sync::RwLock;

/// Lookups the engine needs from content and identity services.
///
/// Everything here is read-only from the engine's point of view except
/// [`Catalog::unlock`], which must be idempotent per user and dream.
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Whether the identity service knows this user.
    async fn user(&self, id: ID<User>) -> bool;
    /// Profit per return of an asset type. Unknown assets pay nothing.
    async fn profit(&self, asset: &str) -> Points;
    /// The whole event deck, in a stable order.
    async fn event_cards(&self) -> Vec<EventCard>;
    async fn savings_card(&self, id: ID<SavingsCard>) -> Option<SavingsCard>;
    async fn spending_card(&self, id: ID<SpendingCard>) -> Option<SpendingCard>;
    /// The savings deck, in a stable order.
    async fn savings_cards(&self) -> Vec<SavingsCard>;
    /// The spending deck, in a stable order.
    async fn spending_cards(&self) -> Vec<SpendingCard>;
    async fn dream(&self, id: ID<Dream>) -> Option<Dream>;
    /// All dreams ordered by unlock order.
    async fn dreams(&self) -> Vec<Dream>;
    async fn decks(&self) -> Decks;
    async fn unlocked(&self, user: ID<User>, dream: ID<Dream>) -> bool;
    /// Records a dream unlock. Returns false if it was already recorded.
    async fn unlock(&self, user: ID<User>, dream: ID<Dream>) -> bool;
}

/// Deck sizes, for clients deciding what to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decks {
    pub assets: usize,
    pub event: usize,
    pub spending: usize,
    pub savings: usize,
}

/// Serialized catalog contents.
/// `users: None` accepts any user id, leaving identity to the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Contents {
    pub users: Option<Vec<ID<User>>>,
    pub assets: Vec<Asset>,
    pub events: Vec<EventCard>,
    pub savings: Vec<SavingsCard>,
    pub spending: Vec<SpendingCard>,
    pub dreams: Vec<Dream>,
}

impl Contents {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

/// In-memory catalog.
#[derive(Debug)]
pub struct Library {
    users: Option<HashSet<ID<User>>>,
    assets: BTreeMap<String, Asset>,
    events: Vec<EventCard>,
    savings: BTreeMap<ID<SavingsCard>, SavingsCard>,
    spending: BTreeMap<ID<SpendingCard>, SpendingCard>,
    dreams: Vec<Dream>,
    unlocks: RwLock<HashSet<(ID<User>, ID<Dream>)>>,
}

impl Library {
    pub fn new(contents: Contents) -> Self {
        let mut dreams = contents.dreams;
        dreams.sort_by_key(Dream::order);
        Self {
            users: contents.users.map(|v| v.into_iter().collect()),
            assets: contents
                .assets
                .into_iter()
                .map(|a| (a.id().to_string(), a))
                .collect(),
            events: contents.events,
            savings: contents
                .savings
                .into_iter()
                .map(|c| (c.id(), c))
                .collect(),
            spending: contents
                .spending
                .into_iter()
                .map(|c| (c.id(), c))
                .collect(),
            dreams,
            unlocks: RwLock::new(HashSet::new()),
        }
    }
    /// Restricts joins to the given users.
    pub fn closed(mut self, users: impl IntoIterator<Item = ID<User>>) -> Self {
        self.users = Some(users.into_iter().collect());
        self
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new(Contents::builtin())
    }
}

#[async_trait::async_trait]
impl Catalog for Library {
    async fn user(&self, id: ID<User>) -> bool {
        self.users.as_ref().is_none_or(|users| users.contains(&id))
    }
    async fn profit(&self, asset: &str) -> Points {
        self.assets.get(asset).map(Asset::profit).unwrap_or_default()
    }
    async fn event_cards(&self) -> Vec<EventCard> {
        self.events.clone()
    }
    async fn savings_card(&self, id: ID<SavingsCard>) -> Option<SavingsCard> {
        self.savings.get(&id).cloned()
    }
    async fn spending_card(&self, id: ID<SpendingCard>) -> Option<SpendingCard> {
        self.spending.get(&id).cloned()
    }
    async fn savings_cards(&self) -> Vec<SavingsCard> {
        self.savings.values().cloned().collect()
    }
    async fn spending_cards(&self) -> Vec<SpendingCard> {
        self.spending.values().cloned().collect()
    }
    async fn dream(&self, id: ID<Dream>) -> Option<Dream> {
        self.dreams.iter().find(|d| d.id() == id).cloned()
    }
    async fn dreams(&self) -> Vec<Dream> {
        self.dreams.clone()
    }
    async fn decks(&self) -> Decks {
        Decks {
            assets: self.assets.len(),
            event: self.events.len(),
            spending: self.spending.len(),
            savings: self.savings.len(),
        }
    }
    async fn unlocked(&self, user: ID<User>, dream: ID<Dream>) -> bool {
        self.unlocks.read().await.contains(&(user, dream))
    }
    async fn unlock(&self, user: ID<User>, dream: ID<Dream>) -> bool {
        self.unlocks.write().await.insert((user, dream))
    }
}
