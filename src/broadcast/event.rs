use crate::ID;
use crate::Millis;
use crate::Points;
use crate::Seat;
use crate::Tile;
use crate::catalog::Dream;
use crate::catalog::EventCard;
use crate::catalog::SavingsCard;
use crate::catalog::SpendingCard;
use crate::catalog::User;
use crate::store::Room;
use crate::store::Snapshot;
use serde::Serialize;

/// Wire `type` tag of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    DiceResult,
    MoveEvent,
    AssetReturn,
    AssetPurchase,
    CardDraw,
    SavingsPlay,
    SpendingPlay,
    DreamPurchase,
    GameEnd,
    StateUpdate,
    TurnChange,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Self::DiceResult => "dice_result",
            Self::MoveEvent => "move_event",
            Self::AssetReturn => "asset_return",
            Self::AssetPurchase => "asset_purchase",
            Self::CardDraw => "card_draw",
            Self::SavingsPlay => "savings_play",
            Self::SpendingPlay => "spending_play",
            Self::DreamPurchase => "dream_purchase",
            Self::GameEnd => "game_end",
            Self::StateUpdate => "state_update",
            Self::TurnChange => "turn_change",
        };
        write!(f, "{}", tag)
    }
}

/// Payload of one record. Serializes as the bare `data` object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Event {
    #[serde(rename_all = "camelCase")]
    DiceResult { die1: u8, die2: u8, sum: u8 },
    #[serde(rename_all = "camelCase")]
    MoveEvent {
        user_id: Option<ID<User>>,
        token_index: usize,
        steps: Tile,
        position: Tile,
    },
    #[serde(rename_all = "camelCase")]
    AssetReturn {
        asset_id: String,
        amount: Points,
        returns_collected: u8,
    },
    #[serde(rename_all = "camelCase")]
    AssetPurchase {
        user_id: Option<ID<User>>,
        asset_id: String,
        purchase_spot: Tile,
    },
    #[serde(rename_all = "camelCase")]
    CardDraw {
        card_id: ID<EventCard>,
        title: String,
        message: String,
        #[serde(rename = "effect_points")]
        effect_points: Points,
    },
    #[serde(rename_all = "camelCase")]
    SavingsPlay {
        card_id: ID<SavingsCard>,
        amount: Points,
        bonus: Points,
    },
    #[serde(rename_all = "camelCase")]
    SpendingPlay {
        card_id: ID<SpendingCard>,
        total: Points,
    },
    #[serde(rename_all = "camelCase")]
    DreamPurchase {
        user_id: Option<ID<User>>,
        dream_id: ID<Dream>,
        cost: Points,
    },
    #[serde(rename_all = "camelCase")]
    GameEnd {
        winner_id: Option<ID<User>>,
        dream_id: ID<Dream>,
    },
    StateUpdate(Snapshot),
    #[serde(rename_all = "camelCase")]
    TurnChange { next_player_seat: Seat },
}

impl Event {
    pub fn kind(&self) -> Kind {
        match self {
            Self::DiceResult { .. } => Kind::DiceResult,
            Self::MoveEvent { .. } => Kind::MoveEvent,
            Self::AssetReturn { .. } => Kind::AssetReturn,
            Self::AssetPurchase { .. } => Kind::AssetPurchase,
            Self::CardDraw { .. } => Kind::CardDraw,
            Self::SavingsPlay { .. } => Kind::SavingsPlay,
            Self::SpendingPlay { .. } => Kind::SpendingPlay,
            Self::DreamPurchase { .. } => Kind::DreamPurchase,
            Self::GameEnd { .. } => Kind::GameEnd,
            Self::StateUpdate(_) => Kind::StateUpdate,
            Self::TurnChange { .. } => Kind::TurnChange,
        }
    }
}

/// Immutable envelope pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(rename = "type")]
    kind: Kind,
    match_id: ID<Room>,
    data: Event,
    timestamp: Millis,
}

impl Record {
    pub fn new(room: ID<Room>, event: Event) -> Self {
        Self {
            kind: event.kind(),
            match_id: room,
            data: event,
            timestamp: crate::now(),
        }
    }
    pub fn kind(&self) -> Kind {
        self.kind
    }
    pub fn room(&self) -> ID<Room> {
        self.match_id
    }
    pub fn event(&self) -> &Event {
        &self.data
    }
    pub fn timestamp(&self) -> Millis {
        self.timestamp
    }
    pub fn json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
