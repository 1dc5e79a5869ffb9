use super::*;
use crate::Error;
use crate::ID;
use crate::Invalid;
use crate::Seat;
use crate::catalog::User;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

/// Exclusive hold on one player row for the duration of one action.
///
/// The action edits a private copy; nothing is visible to anyone else until
/// [`Lease::commit`]. Dropping a lease without committing discards every
/// edit, which is how validation failures leave state untouched.
#[derive(Debug)]
pub struct Lease {
    table: Arc<Table>,
    room: Room,
    player: Player,
    seen: Status,
    fields: BTreeSet<Field>,
    _gate: OwnedMutexGuard<()>,
}

impl Lease {
    pub(super) fn new(table: Arc<Table>, room: Room, player: Player, gate: OwnedMutexGuard<()>) -> Self {
        let mut player = player;
        player.normalize();
        Self {
            table,
            seen: room.status(),
            room,
            player,
            fields: BTreeSet::new(),
            _gate: gate,
        }
    }
    /// Room row as of acquisition.
    pub fn room(&self) -> &Room {
        &self.room
    }
    pub fn player(&self) -> &Player {
        &self.player
    }
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }
    pub fn user(&self) -> Option<ID<User>> {
        self.player.user()
    }
    /// Marks columns of the working copy to be written on commit.
    pub fn save_fields(&mut self, fields: &[Field]) {
        self.fields.extend(fields.iter().copied());
    }
    /// Writes the saved columns and returns the resulting room snapshot.
    /// The row stays held until the lease is dropped.
    ///
    /// Fails with `NotActive`, writing nothing, if the room changed status
    /// while the lease was held.
    pub async fn commit(&mut self) -> Result<Snapshot, Error> {
        let fields = std::mem::take(&mut self.fields).into_iter().collect::<Vec<_>>();
        self.table
            .commit_player(&self.player, fields.as_slice(), self.seen)
            .await
    }
}

/// Exclusive hold on the room row and one player row.
///
/// Required by anything that moves the turn pointer or changes room status,
/// so at most one such action per room is ever in flight.
#[derive(Debug)]
pub struct TurnLease {
    lease: Lease,
    dirty: bool,
    _gate: OwnedMutexGuard<()>,
}

impl TurnLease {
    pub(super) fn new(lease: Lease, gate: OwnedMutexGuard<()>) -> Self {
        Self {
            lease,
            dirty: false,
            _gate: gate,
        }
    }
    /// Whether the held player owns the current turn.
    pub fn has_turn(&self) -> bool {
        self.lease.player.seat() == self.lease.room.turn()
    }
    /// `(current_turn + 1) mod player_count`, written on commit.
    pub fn advance_turn(&mut self) -> Seat {
        self.dirty = true;
        self.lease.room.advance()
    }
    /// Marks the room finished with the held player's user as winner.
    pub fn finish(&mut self) {
        self.dirty = true;
        let winner = self.lease.player.user();
        self.lease.room.finish(winner);
    }
    /// Writes saved player columns and the room row together.
    pub async fn commit(&mut self) -> Snapshot {
        let fields = std::mem::take(&mut self.lease.fields).into_iter().collect::<Vec<_>>();
        let room = std::mem::take(&mut self.dirty).then_some(&self.lease.room);
        self.lease
            .table
            .commit(Some((&self.lease.player, fields.as_slice())), room)
            .await
    }
}

impl std::ops::Deref for TurnLease {
    type Target = Lease;
    fn deref(&self) -> &Self::Target {
        &self.lease
    }
}
impl std::ops::DerefMut for TurnLease {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.lease
    }
}

/// Exclusive hold on the room row alone, for lifecycle changes.
#[derive(Debug)]
pub struct RoomLease {
    table: Arc<Table>,
    room: Room,
    _gate: OwnedMutexGuard<()>,
}

impl RoomLease {
    pub(super) fn new(table: Arc<Table>, room: Room, gate: OwnedMutexGuard<()>) -> Self {
        Self {
            table,
            room,
            _gate: gate,
        }
    }
    pub fn room(&self) -> &Room {
        &self.room
    }
    /// `waiting → active` with the turn pointer at seat zero.
    pub fn start(&mut self) -> Result<(), Error> {
        if self.room.status() != Status::Waiting {
            return Err(Invalid::NotWaiting.into());
        }
        self.room.start();
        Ok(())
    }
    pub async fn commit(&mut self) -> Snapshot {
        self.table.commit(None, Some(&self.room)).await
    }
}
