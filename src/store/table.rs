use super::*;
use crate::Error;
use crate::ID;
use crate::Invalid;
use crate::Seat;
use crate::catalog::User;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::RwLock;

/// Exclusive-access gate for one row. Holding its guard is holding the row.
pub type Gate = Arc<Mutex<()>>;

/// A player row and its gate.
#[derive(Debug)]
pub struct Slot {
    player: Player,
    gate: Gate,
}

/// Committed rows of one room.
#[derive(Debug)]
pub struct Rows {
    room: Room,
    slots: BTreeMap<Seat, Slot>,
}

impl Rows {
    pub fn room(&self) -> &Room {
        &self.room
    }
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.slots.values().map(|s| &s.player)
    }
    pub fn player(&self, seat: Seat) -> Option<&Player> {
        self.slots.get(&seat).map(|s| &s.player)
    }
    pub fn find(&self, user: ID<User>) -> Option<(&Player, Gate)> {
        self.slots
            .values()
            .find(|s| s.player.user() == Some(user))
            .map(|s| (&s.player, s.gate.clone()))
    }
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from((&self.room, self.players()))
    }
}

/// One room's rows plus the gate for the room row itself.
///
/// Gates order: room gate before any player gate. Reads of committed rows
/// never need a gate; writes go through [`Table::commit`] while holding one.
#[derive(Debug)]
pub struct Table {
    gate: Gate,
    rows: RwLock<Rows>,
}

impl Table {
    pub fn new(room: Room) -> Self {
        Self {
            gate: Gate::default(),
            rows: RwLock::new(Rows {
                room,
                slots: BTreeMap::new(),
            }),
        }
    }
    pub fn gate(&self) -> Gate {
        self.gate.clone()
    }
    pub async fn rows(&self) -> tokio::sync::RwLockReadGuard<'_, Rows> {
        self.rows.read().await
    }
    pub async fn seat(&self, player: Player) {
        self.rows.write().await.slots.insert(
            player.seat(),
            Slot {
                player,
                gate: Gate::default(),
            },
        );
    }
    /// Writes player columns on behalf of a holder of the player gate alone.
    /// Refused if the room has changed status since the holder read it,
    /// since nothing else stops a finished match from taking the write.
    pub async fn commit_player(
        &self,
        player: &Player,
        fields: &[Field],
        seen: Status,
    ) -> Result<Snapshot, Error> {
        let mut rows = self.rows.write().await;
        if rows.room.status() != seen {
            return Err(Invalid::NotActive.into());
        }
        if let Some(slot) = rows.slots.get_mut(&player.seat()) {
            slot.player.merge(player, fields.iter().copied());
        }
        Ok(rows.snapshot())
    }
    /// Writes the given player columns, and the room row if given, in one
    /// step. Callers hold the room gate.
    pub async fn commit(
        &self,
        player: Option<(&Player, &[Field])>,
        room: Option<&Room>,
    ) -> Snapshot {
        let mut rows = self.rows.write().await;
        if let Some((player, fields)) = player {
            if let Some(slot) = rows.slots.get_mut(&player.seat()) {
                slot.player.merge(player, fields.iter().copied());
            }
        }
        if let Some(room) = room {
            rows.room = room.clone();
        }
        rows.snapshot()
    }
}
