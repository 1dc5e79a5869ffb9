use super::*;
use crate::Error;
use crate::ID;
use crate::Invalid;
use crate::Missing;
use crate::Seat;
use crate::Unique;
use crate::catalog::Dream;
use crate::catalog::User;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OwnedMutexGuard;
use tokio::sync::RwLock;

/// Registry of every room and its rows.
#[derive(Debug)]
pub struct Store {
    tables: RwLock<HashMap<ID<Room>, Arc<Table>>>,
    timeout: Duration,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl Store {
    /// `timeout` bounds every row-lock acquisition.
    pub fn new(timeout: Duration) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            timeout,
        }
    }
}

impl Store {
    pub async fn create_room(&self, players: usize, dream: Option<ID<Dream>>) -> Result<Room, Error> {
        if players == 0 {
            return Err(Invalid::PlayerCount.into());
        }
        let room = Room::new(players, dream);
        self.tables
            .write()
            .await
            .insert(room.id(), Arc::new(Table::new(room.clone())));
        log::info!("[store] created room {} for {} players", room.id(), players);
        Ok(room)
    }
    pub async fn join_room(
        &self,
        id: ID<Room>,
        user: Option<ID<User>>,
        seat: Seat,
        cpu: bool,
    ) -> Result<Player, Error> {
        let table = self.table(id).await?;
        let _gate = self.acquire(table.gate()).await?;
        {
            let rows = table.rows().await;
            if rows.room().status() != Status::Waiting {
                return Err(Invalid::NotWaiting.into());
            }
            if seat >= rows.room().players() {
                return Err(Invalid::Seat.into());
            }
            if rows.player(seat).is_some() {
                return Err(Invalid::SeatTaken.into());
            }
            if user.is_some_and(|u| rows.find(u).is_some()) {
                return Err(Invalid::AlreadyJoined.into());
            }
        }
        let player = Player::new(id, user, seat, cpu);
        table.seat(player.clone()).await;
        log::info!("[store] seat {} joined room {} (cpu: {})", seat, id, cpu);
        Ok(player)
    }
    pub async fn start_room(&self, id: ID<Room>) -> Result<Room, Error> {
        let mut lease = self.lock_room(id).await?;
        lease.start()?;
        lease.commit().await;
        log::info!("[store] started room {}", id);
        Ok(lease.room().clone())
    }
    pub async fn get_room(&self, id: ID<Room>) -> Result<Room, Error> {
        Ok(self.table(id).await?.rows().await.room().clone())
    }
    pub async fn contains(&self, id: ID<Room>) -> bool {
        self.tables.read().await.contains_key(&id)
    }
    /// Players ordered by seat.
    pub async fn list_players(&self, id: ID<Room>) -> Result<Vec<Player>, Error> {
        Ok(self.table(id).await?.rows().await.players().cloned().collect())
    }
    /// Committed view of a player, without taking its row.
    pub async fn player(&self, id: ID<Room>, user: ID<User>) -> Result<Player, Error> {
        self.table(id)
            .await?
            .rows()
            .await
            .find(user)
            .map(|(p, _)| p.clone())
            .ok_or(Error::NotFound(Missing::Player))
    }
    pub async fn snapshot(&self, id: ID<Room>) -> Result<Snapshot, Error> {
        Ok(self.table(id).await?.rows().await.snapshot())
    }
    /// Removes a room and, with it, all of its player rows.
    pub async fn discard(&self, id: ID<Room>) -> Result<(), Error> {
        self.tables
            .write()
            .await
            .remove(&id)
            .map(|_| log::info!("[store] discarded room {}", id))
            .ok_or(Error::NotFound(Missing::Room))
    }
}

impl Store {
    /// Takes exclusive hold of the room row.
    pub async fn lock_room(&self, id: ID<Room>) -> Result<RoomLease, Error> {
        let table = self.table(id).await?;
        let gate = self.acquire(table.gate()).await?;
        let room = table.rows().await.room().clone();
        Ok(RoomLease::new(table, room, gate))
    }
    /// Takes exclusive hold of a player's row.
    pub async fn lock_player(&self, id: ID<Room>, user: ID<User>) -> Result<Lease, Error> {
        let table = self.table(id).await?;
        self.lease(table, user).await
    }
    /// Takes exclusive hold of the room row, then the player's row.
    pub async fn lock_turn(&self, id: ID<Room>, user: ID<User>) -> Result<TurnLease, Error> {
        let table = self.table(id).await?;
        let gate = self.acquire(table.gate()).await?;
        let lease = self.lease(table, user).await?;
        Ok(TurnLease::new(lease, gate))
    }
}

impl Store {
    async fn table(&self, id: ID<Room>) -> Result<Arc<Table>, Error> {
        self.tables
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(Error::NotFound(Missing::Room))
    }
    async fn acquire(&self, gate: Gate) -> Result<OwnedMutexGuard<()>, Error> {
        tokio::time::timeout(self.timeout, gate.lock_owned())
            .await
            .map_err(|_| Error::Timeout)
            .inspect_err(|_| log::warn!("[store] gave up waiting for a row after {:?}", self.timeout))
    }
    async fn lease(&self, table: Arc<Table>, user: ID<User>) -> Result<Lease, Error> {
        let (seat, gate) = table
            .rows()
            .await
            .find(user)
            .map(|(p, g)| (p.seat(), g))
            .ok_or(Error::NotFound(Missing::Player))?;
        let guard = self.acquire(gate).await?;
        let (room, player) = {
            let rows = table.rows().await;
            let player = rows
                .player(seat)
                .cloned()
                .ok_or(Error::NotFound(Missing::Player))?;
            (rows.room().clone(), player)
        };
        Ok(Lease::new(table, room, player, guard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::STARTING_POINTS;
    async fn seated(players: usize) -> (Store, Room, Vec<ID<User>>) {
        let store = Store::new(Duration::from_millis(50));
        let room = store.create_room(players, None).await.unwrap();
        let mut users = Vec::new();
        for seat in 0..players {
            let user = ID::default();
            store.join_room(room.id(), Some(user), seat, false).await.unwrap();
            users.push(user);
        }
        (store, room, users)
    }
    #[tokio::test]
    async fn create_requires_a_seat() {
        let store = Store::default();
        assert_eq!(
            store.create_room(0, None).await,
            Err(Error::Invalid(Invalid::PlayerCount))
        );
    }
    #[tokio::test]
    async fn join_seeds_defaults() {
        let store = Store::default();
        let room = store.create_room(2, None).await.unwrap();
        let player = store.join_room(room.id(), None, 1, true).await.unwrap();
        assert_eq!(player.points(), STARTING_POINTS);
        assert_eq!(player.tokens(), &[0, 0, 0, 0]);
        assert_eq!(store.list_players(room.id()).await.unwrap().len(), 1);
    }
    #[tokio::test]
    async fn join_rejects_bad_seats() {
        let store = Store::default();
        let room = store.create_room(2, None).await.unwrap();
        let user = ID::default();
        store.join_room(room.id(), Some(user), 0, false).await.unwrap();
        assert_eq!(
            store.join_room(room.id(), None, 0, true).await,
            Err(Error::Invalid(Invalid::SeatTaken))
        );
        assert_eq!(
            store.join_room(room.id(), None, 2, true).await,
            Err(Error::Invalid(Invalid::Seat))
        );
        assert_eq!(
            store.join_room(room.id(), Some(user), 1, false).await,
            Err(Error::Invalid(Invalid::AlreadyJoined))
        );
    }
    #[tokio::test]
    async fn missing_room() {
        let store = Store::default();
        assert_eq!(
            store.start_room(ID::default()).await,
            Err(Error::NotFound(Missing::Room))
        );
        assert_eq!(
            store.join_room(ID::default(), None, 0, true).await,
            Err(Error::NotFound(Missing::Room))
        );
    }
    #[tokio::test]
    async fn start_activates_once() {
        let (store, room, _) = seated(2).await;
        let started = store.start_room(room.id()).await.unwrap();
        assert!(started.is_active());
        assert_eq!(started.turn(), 0);
        assert_eq!(
            store.start_room(room.id()).await,
            Err(Error::Invalid(Invalid::NotWaiting))
        );
        assert_eq!(
            store.join_room(room.id(), None, 1, true).await,
            Err(Error::Invalid(Invalid::NotWaiting))
        );
    }
    #[tokio::test]
    async fn uncommitted_edits_are_discarded() {
        let (store, room, users) = seated(2).await;
        {
            let mut lease = store.lock_player(room.id(), users[0]).await.unwrap();
            lease.player_mut().credit(500);
            lease.save_fields(&[Field::Points]);
        }
        let player = store.player(room.id(), users[0]).await.unwrap();
        assert_eq!(player.points(), STARTING_POINTS);
    }
    #[tokio::test]
    async fn commit_writes_only_saved_fields() {
        let (store, room, users) = seated(2).await;
        let mut lease = store.lock_player(room.id(), users[0]).await.unwrap();
        lease.player_mut().credit(500);
        lease.player_mut().owe(40);
        lease.save_fields(&[Field::Points]);
        let snapshot = lease.commit().await.unwrap();
        assert_eq!(snapshot.seat(0).unwrap().current_points, STARTING_POINTS + 500);
        assert_eq!(snapshot.seat(0).unwrap().liabilities, 0);
    }
    #[tokio::test]
    async fn turn_lease_advances_atomically() {
        let (store, room, users) = seated(3).await;
        store.start_room(room.id()).await.unwrap();
        let mut lease = store.lock_turn(room.id(), users[0]).await.unwrap();
        assert!(lease.has_turn());
        assert_eq!(lease.advance_turn(), 1);
        assert_eq!(store.get_room(room.id()).await.unwrap().turn(), 0);
        let snapshot = lease.commit().await;
        assert_eq!(snapshot.current_turn, 1);
        assert_eq!(store.get_room(room.id()).await.unwrap().turn(), 1);
    }
    #[tokio::test]
    async fn player_writes_refused_once_the_room_finishes() {
        let (store, room, users) = seated(2).await;
        store.start_room(room.id()).await.unwrap();
        let mut late = store.lock_player(room.id(), users[1]).await.unwrap();
        let mut winner = store.lock_turn(room.id(), users[0]).await.unwrap();
        winner.finish();
        winner.commit().await;
        drop(winner);
        late.player_mut().owe(60);
        late.save_fields(&[Field::Liabilities]);
        assert_eq!(late.commit().await.err(), Some(Error::Invalid(Invalid::NotActive)));
        let player = store.player(room.id(), users[1]).await.unwrap();
        assert_eq!(player.liabilities(), 0);
        assert_eq!(store.get_room(room.id()).await.unwrap().status(), Status::Finished);
    }
    #[tokio::test]
    async fn held_row_times_out() {
        let (store, room, users) = seated(2).await;
        let _held = store.lock_player(room.id(), users[0]).await.unwrap();
        assert_eq!(
            store.lock_player(room.id(), users[0]).await.err(),
            Some(Error::Timeout)
        );
        assert!(store.lock_player(room.id(), users[1]).await.is_ok());
    }
    #[tokio::test]
    async fn held_room_blocks_turn_actions_only() {
        let (store, room, users) = seated(2).await;
        store.start_room(room.id()).await.unwrap();
        let _held = store.lock_turn(room.id(), users[0]).await.unwrap();
        assert_eq!(
            store.lock_turn(room.id(), users[1]).await.err(),
            Some(Error::Timeout)
        );
        assert!(store.lock_player(room.id(), users[1]).await.is_ok());
    }
    #[tokio::test]
    async fn unknown_player() {
        let (store, room, _) = seated(1).await;
        assert_eq!(
            store.lock_player(room.id(), ID::default()).await.err(),
            Some(Error::NotFound(Missing::Player))
        );
    }
    #[tokio::test]
    async fn discard_cascades() {
        let (store, room, users) = seated(2).await;
        store.discard(room.id()).await.unwrap();
        assert!(!store.contains(room.id()).await);
        assert_eq!(
            store.player(room.id(), users[0]).await,
            Err(Error::NotFound(Missing::Room))
        );
        assert_eq!(
            store.discard(room.id()).await,
            Err(Error::NotFound(Missing::Room))
        );
    }
}
