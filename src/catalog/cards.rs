use crate::ID;
use crate::Points;
use crate::Unique;
use serde::Deserialize;
use serde::Serialize;

/// Random event drawn from the event deck.
/// Non-negative effects credit on-hand points; negative ones add liabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCard {
    id: ID<Self>,
    title: String,
    message: String,
    effect: Points,
}

impl EventCard {
    pub fn new(id: ID<Self>, title: &str, message: &str, effect: Points) -> Self {
        Self {
            id,
            title: title.to_string(),
            message: message.to_string(),
            effect,
        }
    }
    pub fn title(&self) -> &str {
        &self.title
    }
    pub fn message(&self) -> &str {
        &self.message
    }
    pub fn effect(&self) -> Points {
        self.effect
    }
}

impl Unique for EventCard {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

/// Extra savings granted when a deposit reaches the card's threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Bonus {
    /// Granted only if the player owns at least one asset.
    IfOwnsAsset { bonus: Points },
    /// Granted unconditionally.
    FlatBonus { bonus: Points },
}

impl Bonus {
    /// Bonus earned by a player holding `assets` assets.
    pub fn earned(&self, assets: usize) -> Points {
        match self {
            Self::IfOwnsAsset { bonus } if assets > 0 => *bonus,
            Self::IfOwnsAsset { .. } => 0,
            Self::FlatBonus { bonus } => *bonus,
        }
    }
}

/// Moves on-hand points into savings, possibly with a bonus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsCard {
    id: ID<Self>,
    name: String,
    threshold: Points,
    bonus: Option<Bonus>,
}

impl SavingsCard {
    pub fn new(id: ID<Self>, name: &str, threshold: Points, bonus: Option<Bonus>) -> Self {
        Self {
            id,
            name: name.to_string(),
            threshold,
            bonus,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn threshold(&self) -> Points {
        self.threshold
    }
    pub fn bonus(&self) -> Option<Bonus> {
        self.bonus
    }
    /// Bonus for depositing `amount` while holding `assets` assets.
    pub fn reward(&self, amount: Points, assets: usize) -> Points {
        match self.bonus {
            Some(bonus) if amount >= self.threshold => bonus.earned(assets),
            _ => 0,
        }
    }
}

impl Unique for SavingsCard {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

/// Flat liability increase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingCard {
    id: ID<Self>,
    name: String,
    total: Points,
}

impl SpendingCard {
    pub fn new(id: ID<Self>, name: &str, total: Points) -> Self {
        Self {
            id,
            name: name.to_string(),
            total,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn total(&self) -> Points {
        self.total
    }
}

impl Unique for SpendingCard {
    fn id(&self) -> ID<Self> {
        self.id
    }
}
