use super::*;
use crate::Error;
use crate::ID;
use crate::Invalid;
use crate::MAX_STEPS;
use crate::Missing;
use crate::Points;
use crate::Seat;
use crate::Tile;
use crate::Unique;
use crate::board::furthest_token;
use crate::broadcast::Event;
use crate::broadcast::Hub;
use crate::catalog::Catalog;
use crate::catalog::Dream;
use crate::catalog::Library;
use crate::catalog::SavingsCard;
use crate::catalog::SpendingCard;
use crate::catalog::User;
use crate::store::Field;
use crate::store::Holding;
use crate::store::Lease;
use crate::store::Player;
use crate::store::Room;
use crate::store::Snapshot;
use crate::store::Store;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Applies player actions to rooms, one atomic unit at a time.
///
/// Every action takes the rows it needs from the [`Store`], validates and
/// computes on private copies, commits, and publishes its events to the
/// [`Hub`] before letting go of the rows. A failed action commits nothing
/// and publishes nothing.
pub struct Engine {
    store: Store,
    hub: Arc<Hub>,
    catalog: Arc<dyn Catalog>,
    rules: Rules,
    dice: Mutex<Box<dyn Dice>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(
            Store::default(),
            Arc::new(Hub::default()),
            Arc::new(Library::default()),
            Rules::default(),
        )
    }
}

impl Engine {
    pub fn new(store: Store, hub: Arc<Hub>, catalog: Arc<dyn Catalog>, rules: Rules) -> Self {
        Self {
            store,
            hub,
            catalog,
            rules,
            dice: Mutex::new(Box::new(SmallRng::from_os_rng())),
        }
    }
    /// Replaces the dice with a deterministic generator.
    pub fn seeded(self, seed: u64) -> Self {
        self.with_dice(Box::new(SmallRng::seed_from_u64(seed)))
    }
    pub fn with_dice(self, dice: Box<dyn Dice>) -> Self {
        Self {
            dice: Mutex::new(dice),
            ..self
        }
    }
    pub fn store(&self) -> &Store {
        &self.store
    }
    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }
    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }
    pub fn rules(&self) -> &Rules {
        &self.rules
    }
}

/// Room lifecycle.
impl Engine {
    pub async fn create(&self, players: usize, dream: Option<ID<Dream>>) -> Result<Room, Error> {
        if let Some(dream) = dream {
            self.catalog
                .dream(dream)
                .await
                .ok_or(Error::NotFound(Missing::Dream))?;
        }
        self.store.create_room(players, dream).await
    }
    pub async fn join(
        &self,
        room: ID<Room>,
        user: Option<ID<User>>,
        seat: Seat,
        cpu: bool,
    ) -> Result<Player, Error> {
        if user.is_none() && !cpu {
            return Err(Invalid::MissingField("userId").into());
        }
        if let Some(user) = user {
            if !self.catalog.user(user).await {
                return Err(Missing::User.into());
            }
        }
        self.store.join_room(room, user, seat, cpu).await
    }
    pub async fn start(&self, room: ID<Room>) -> Result<Room, Error> {
        let mut lease = self.store.lock_room(room).await?;
        lease.start()?;
        let stage = self.hub.stage(room).await;
        lease.commit().await;
        stage
            .publish(vec![Event::TurnChange { next_player_seat: 0 }])
            .await;
        log::info!("[engine {}] started with {} seats", room, lease.room().players());
        Ok(lease.room().clone())
    }
    pub async fn state(&self, room: ID<Room>) -> Result<Snapshot, Error> {
        self.store.snapshot(room).await
    }
    /// Removes the room and its players and ends every stream of the match.
    pub async fn discard(&self, room: ID<Room>) -> Result<(), Error> {
        self.store.discard(room).await?;
        self.hub.close(room).await;
        Ok(())
    }
}

/// Turn actions.
impl Engine {
    /// Throws two dice. Informational only: nothing is stored and the turn
    /// does not move.
    pub async fn roll(&self, room: ID<Room>, user: ID<User>) -> Result<Roll, Error> {
        let lease = self.store.lock_player(room, user).await?;
        Self::active(&lease)?;
        if self.rules.rolls_gated() && lease.player().seat() != lease.room().turn() {
            return Err(Error::Forbidden);
        }
        let roll = {
            let mut dice = self.dice.lock().await;
            Roll(dice.die(), dice.die())
        };
        self.hub
            .publish(
                room,
                vec![Event::DiceResult {
                    die1: roll.0,
                    die2: roll.1,
                    sum: roll.sum(),
                }],
            )
            .await;
        Ok(roll)
    }
    pub async fn move_token(
        &self,
        room: ID<Room>,
        user: ID<User>,
        token: usize,
        steps: Tile,
    ) -> Result<Moved, Error> {
        if !(-MAX_STEPS..=MAX_STEPS).contains(&steps) {
            return Err(Invalid::Steps.into());
        }
        let mut lease = self.store.lock_turn(room, user).await?;
        Self::active(&lease)?;
        if !lease.has_turn() {
            return Err(Error::Forbidden);
        }
        let profits = self.profits(lease.player()).await;
        let step = moves::step(self.rules.board(), lease.player_mut(), token, steps)?;
        let payouts = moves::collect(lease.player_mut(), step.position, &profits);
        lease.save_fields(&[Field::Tokens, Field::Liabilities, Field::Points, Field::Assets]);
        let next = lease.advance_turn();
        let stage = self.hub.stage(room).await;
        let snapshot = lease.commit().await;
        let mut events = vec![Event::MoveEvent {
            user_id: Some(user),
            token_index: token,
            steps,
            position: step.position,
        }];
        events.extend(payouts.iter().cloned().map(|p| Event::AssetReturn {
            asset_id: p.asset_id,
            amount: p.amount,
            returns_collected: p.returns_collected,
        }));
        events.push(Event::StateUpdate(snapshot));
        events.push(Event::TurnChange {
            next_player_seat: next,
        });
        stage.publish(events).await;
        log::debug!(
            "[engine {}] seat {} moved token {} to {} (penalty: {}, payouts: {})",
            room,
            lease.player().seat(),
            token,
            step.position,
            step.penalized,
            payouts.len()
        );
        Ok(Moved {
            position: step.position,
            penalized: step.penalized,
            payouts,
            next,
        })
    }
    /// Buys an asset at the furthest token's tile. Owning it already is not
    /// an error; the purchase is dropped but the turn is still spent.
    pub async fn select_asset(
        &self,
        room: ID<Room>,
        user: ID<User>,
        asset: &str,
    ) -> Result<Selected, Error> {
        if asset.is_empty() {
            return Err(Invalid::MissingField("assetId").into());
        }
        let mut lease = self.store.lock_turn(room, user).await?;
        Self::active(&lease)?;
        if !lease.has_turn() {
            return Err(Error::Forbidden);
        }
        let purchase = furthest_token(lease.player().tokens());
        if !lease.player().owns(asset) {
            lease.player_mut().acquire(Holding::new(asset, purchase));
        }
        lease.save_fields(&[Field::Assets]);
        let next = lease.advance_turn();
        let stage = self.hub.stage(room).await;
        let snapshot = lease.commit().await;
        stage
            .publish(vec![
                Event::AssetPurchase {
                    user_id: Some(user),
                    asset_id: asset.to_string(),
                    purchase_spot: purchase,
                },
                Event::StateUpdate(snapshot),
                Event::TurnChange {
                    next_player_seat: next,
                },
            ])
            .await;
        log::debug!("[engine {}] {} bought {} at {}", room, user, asset, purchase);
        Ok(Selected {
            assets: lease.player().assets().to_vec(),
            next,
        })
    }
}

/// Card plays.
impl Engine {
    /// Draws one event card uniformly at random. Gains go to on-hand points,
    /// losses to liabilities.
    pub async fn draw_event_card(&self, room: ID<Room>, user: ID<User>) -> Result<Drawn, Error> {
        if self.rules.draws_gated() {
            let mut lease = self.store.lock_turn(room, user).await?;
            Self::active(&lease)?;
            if !lease.has_turn() {
                return Err(Error::Forbidden);
            }
            self.draw(&mut lease).await
        } else {
            let mut lease = self.store.lock_player(room, user).await?;
            Self::active(&lease)?;
            self.draw(&mut lease).await
        }
    }
    pub async fn play_savings_card(
        &self,
        room: ID<Room>,
        user: ID<User>,
        card: ID<SavingsCard>,
        amount: Points,
    ) -> Result<Saved, Error> {
        if amount <= 0 {
            return Err(Invalid::Amount.into());
        }
        let mut lease = self.store.lock_player(room, user).await?;
        Self::active(&lease)?;
        let card = self
            .catalog
            .savings_card(card)
            .await
            .ok_or(Error::NotFound(Missing::Card))?;
        if lease.player().points() < amount {
            return Err(Invalid::InsufficientPoints.into());
        }
        let bonus = card.reward(amount, lease.player().assets().len());
        lease.player_mut().debit(amount);
        lease.player_mut().deposit(amount + bonus);
        lease.save_fields(&[Field::Points, Field::Savings]);
        let stage = self.hub.stage(room).await;
        let snapshot = match lease.commit().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                stage.cancel().await;
                return Err(e);
            }
        };
        stage
            .publish(vec![
                Event::SavingsPlay {
                    card_id: card.id(),
                    amount,
                    bonus,
                },
                Event::StateUpdate(snapshot),
            ])
            .await;
        Ok(Saved {
            bonus,
            savings: lease.player().savings(),
            points: lease.player().points(),
        })
    }
    /// Adds the card's total to liabilities. Nothing ever pays them down here.
    pub async fn play_spending_card(
        &self,
        room: ID<Room>,
        user: ID<User>,
        card: ID<SpendingCard>,
    ) -> Result<Points, Error> {
        let mut lease = self.store.lock_player(room, user).await?;
        Self::active(&lease)?;
        let card = self
            .catalog
            .spending_card(card)
            .await
            .ok_or(Error::NotFound(Missing::Card))?;
        lease.player_mut().owe(card.total());
        lease.save_fields(&[Field::Liabilities]);
        let stage = self.hub.stage(room).await;
        let snapshot = match lease.commit().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                stage.cancel().await;
                return Err(e);
            }
        };
        stage
            .publish(vec![
                Event::SpendingPlay {
                    card_id: card.id(),
                    total: card.total(),
                },
                Event::StateUpdate(snapshot),
            ])
            .await;
        Ok(lease.player().liabilities())
    }
}

/// Win condition.
impl Engine {
    /// Buys the dream with on-hand points and ends the match with this
    /// player as winner.
    pub async fn purchase_dream(
        &self,
        room: ID<Room>,
        user: ID<User>,
        dream: ID<Dream>,
    ) -> Result<Won, Error> {
        let mut lease = self.store.lock_turn(room, user).await?;
        Self::active(&lease)?;
        let dream = self
            .catalog
            .dream(dream)
            .await
            .ok_or(Error::NotFound(Missing::Dream))?;
        if lease.room().dream().is_some_and(|bound| bound != dream.id()) {
            return Err(Invalid::WrongDream.into());
        }
        moves::affords(lease.player(), &dream)?;
        if let Some(prerequisite) = dream.prerequisite() {
            if !self.catalog.unlocked(user, prerequisite).await {
                return Err(Invalid::Prerequisite.into());
            }
        }
        lease.player_mut().debit(dream.cost());
        lease.save_fields(&[Field::Points]);
        lease.finish();
        let stage = self.hub.stage(room).await;
        let snapshot = lease.commit().await;
        self.catalog.unlock(user, dream.id()).await;
        stage
            .publish(vec![
                Event::DreamPurchase {
                    user_id: Some(user),
                    dream_id: dream.id(),
                    cost: dream.cost(),
                },
                Event::GameEnd {
                    winner_id: Some(user),
                    dream_id: dream.id(),
                },
                Event::StateUpdate(snapshot),
            ])
            .await;
        log::info!("[engine {}] {} won with {}", room, user, dream.name());
        Ok(Won {
            winner: Some(user),
            dream: dream.id(),
        })
    }
}

impl Engine {
    fn active(lease: &Lease) -> Result<(), Error> {
        if lease.room().is_active() {
            Ok(())
        } else {
            Err(Invalid::NotActive.into())
        }
    }
    async fn profits(&self, player: &Player) -> HashMap<String, Points> {
        let mut profits = HashMap::new();
        for holding in player.assets() {
            let profit = self.catalog.profit(holding.asset()).await;
            profits.insert(holding.asset().to_string(), profit);
        }
        profits
    }
    async fn draw(&self, lease: &mut Lease) -> Result<Drawn, Error> {
        let cards = self.catalog.event_cards().await;
        if cards.is_empty() {
            return Err(Missing::Card.into());
        }
        let pick = self.dice.lock().await.pick(cards.len());
        let card = cards.into_iter().nth(pick).ok_or(Error::NotFound(Missing::Card))?;
        match card.effect() {
            gain if gain >= 0 => lease.player_mut().credit(gain),
            loss => lease.player_mut().owe(-loss),
        }
        lease.save_fields(&[Field::Points, Field::Liabilities]);
        let stage = self.hub.stage(lease.room().id()).await;
        let snapshot = match lease.commit().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                stage.cancel().await;
                return Err(e);
            }
        };
        stage
            .publish(vec![
                Event::CardDraw {
                    card_id: card.id(),
                    title: card.title().to_string(),
                    message: card.message().to_string(),
                    effect_points: card.effect(),
                },
                Event::StateUpdate(snapshot),
            ])
            .await;
        Ok(Drawn {
            points: lease.player().points(),
            liabilities: lease.player().liabilities(),
            card,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::STARTING_POINTS;
    use crate::board::Board;
    use crate::catalog::Asset;
    use crate::catalog::Bonus;
    use crate::catalog::Contents;
    use crate::catalog::EventCard;
    use crate::store::Status;
    use std::time::Duration;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn fixed<T>(n: u128) -> ID<T> {
        ID::from(uuid::Uuid::from_u128(n))
    }
    const FLAT: u128 = 3;
    const OWNS: u128 = 4;
    const PLAIN: u128 = 5;
    const CONCERT: u128 = 6;
    const LAPTOP: u128 = 7;
    const CAR: u128 = 8;

    fn contents() -> Contents {
        Contents {
            users: None,
            assets: vec![Asset::new("a1", "Print Shop", 320), Asset::new("a2", "Tasking", 220)],
            events: vec![
                EventCard::new(fixed(1), "Scholarship", "Grades paid off.", 150),
                EventCard::new(fixed(2), "Phone Repair", "Cracked screen.", -80),
            ],
            savings: vec![
                SavingsCard::new(fixed(FLAT), "Emergency Fund", 100, Some(Bonus::FlatBonus { bonus: 20 })),
                SavingsCard::new(fixed(OWNS), "Reinvest", 200, Some(Bonus::IfOwnsAsset { bonus: 50 })),
                SavingsCard::new(fixed(PLAIN), "Piggy Bank", 0, None),
            ],
            spending: vec![SpendingCard::new(fixed(CONCERT), "Concert", 60)],
            dreams: vec![
                Dream::new(fixed(LAPTOP), "Laptop", "laptop", 500, 1, None),
                Dream::new(fixed(CAR), "Car", "car", 1000, 2, Some(fixed(LAPTOP))),
            ],
        }
    }

    struct Match {
        engine: Arc<Engine>,
        room: ID<Room>,
        users: Vec<ID<User>>,
        rx: UnboundedReceiver<String>,
    }

    impl Match {
        fn engine(rules: Rules) -> Engine {
            Engine::new(
                Store::new(Duration::from_millis(250)),
                Arc::new(Hub::default()),
                Arc::new(Library::new(contents())),
                rules,
            )
            .with_dice(Box::new(Loaded::new(&[3, 4], &[0, 1])))
        }
        async fn new(seats: usize, rules: Rules) -> Self {
            let engine = Arc::new(Self::engine(rules));
            let room = engine.create(seats, None).await.unwrap().id();
            let users = (0..seats).map(|_| ID::default()).collect::<Vec<_>>();
            for (seat, user) in users.iter().enumerate() {
                engine.join(room, Some(*user), seat, false).await.unwrap();
            }
            let (_, rx) = engine.hub().subscribe(room).await;
            engine.start(room).await.unwrap();
            let mut this = Self {
                engine,
                room,
                users,
                rx,
            };
            assert_eq!(this.drain(), vec!["turn_change"]);
            this
        }
        /// Plain board, so moves never trip the skipped-yellow rule.
        async fn plain(seats: usize) -> Self {
            Self::new(seats, Rules::new(Board::new(std::iter::empty::<Tile>()))).await
        }
        fn drain(&mut self) -> Vec<String> {
            self.frames()
                .into_iter()
                .map(|v| v["type"].as_str().unwrap().to_string())
                .collect()
        }
        fn frames(&mut self) -> Vec<serde_json::Value> {
            std::iter::from_fn(|| self.rx.try_recv().ok())
                .map(|json| serde_json::from_str::<serde_json::Value>(&json).unwrap())
                .collect()
        }
        async fn snapshot(&self) -> Snapshot {
            self.engine.state(self.room).await.unwrap()
        }
        async fn tweak(&self, seat: Seat, edit: impl FnOnce(&mut Player)) {
            let store = self.engine.store();
            let mut lease = store.lock_player(self.room, self.users[seat]).await.unwrap();
            edit(lease.player_mut());
            lease.save_fields(&[
                Field::Tokens,
                Field::Points,
                Field::Savings,
                Field::Liabilities,
                Field::Assets,
            ]);
            lease.commit().await.unwrap();
        }
    }

    #[tokio::test]
    async fn start_activates_at_seat_zero() {
        let m = Match::plain(3).await;
        let snapshot = m.snapshot().await;
        assert_eq!(snapshot.status, Status::Active);
        assert_eq!(snapshot.current_turn, 0);
        assert!(snapshot.started_at.is_some());
        assert_eq!(
            m.engine.start(m.room).await.err(),
            Some(Error::Invalid(Invalid::NotWaiting))
        );
    }

    #[tokio::test]
    async fn start_unknown_room() {
        let engine = Match::engine(Rules::default());
        assert_eq!(
            engine.start(ID::default()).await.err(),
            Some(Error::NotFound(Missing::Room))
        );
    }

    #[tokio::test]
    async fn join_needs_a_known_user_or_ai() {
        let engine = Match::engine(Rules::default());
        let room = engine.create(3, None).await.unwrap().id();
        assert!(engine.join(room, None, 0, true).await.is_ok());
        assert_eq!(
            engine.join(room, None, 1, false).await.err(),
            Some(Error::Invalid(Invalid::MissingField("userId")))
        );
        let member = ID::default();
        let closed = Engine::new(
            Store::default(),
            Arc::new(Hub::default()),
            Arc::new(Library::new(contents()).closed([member])),
            Rules::default(),
        );
        let room = closed.create(2, None).await.unwrap().id();
        assert!(closed.join(room, Some(member), 0, false).await.is_ok());
        assert_eq!(
            closed.join(room, Some(ID::default()), 1, false).await.err(),
            Some(Error::NotFound(Missing::User))
        );
    }

    #[tokio::test]
    async fn create_checks_bound_dream() {
        let engine = Match::engine(Rules::default());
        assert!(engine.create(2, Some(fixed(LAPTOP))).await.is_ok());
        assert_eq!(
            engine.create(2, Some(ID::default())).await.err(),
            Some(Error::NotFound(Missing::Dream))
        );
        assert_eq!(
            engine.create(0, None).await.err(),
            Some(Error::Invalid(Invalid::PlayerCount))
        );
    }

    #[tokio::test]
    async fn actions_need_an_active_room() {
        let engine = Match::engine(Rules::default());
        let room = engine.create(2, None).await.unwrap().id();
        let user = ID::default();
        engine.join(room, Some(user), 0, false).await.unwrap();
        assert_eq!(
            engine.move_token(room, user, 0, 3).await.err(),
            Some(Error::Invalid(Invalid::NotActive))
        );
        assert_eq!(
            engine.roll(room, user).await.err(),
            Some(Error::Invalid(Invalid::NotActive))
        );
        assert_eq!(
            engine.play_spending_card(room, user, fixed(CONCERT)).await.err(),
            Some(Error::Invalid(Invalid::NotActive))
        );
    }

    #[tokio::test]
    async fn unknown_room_or_player() {
        let m = Match::plain(2).await;
        assert_eq!(
            m.engine.move_token(ID::default(), m.users[0], 0, 3).await.err(),
            Some(Error::NotFound(Missing::Room))
        );
        assert_eq!(
            m.engine.move_token(m.room, ID::default(), 0, 3).await.err(),
            Some(Error::NotFound(Missing::Player))
        );
    }

    #[tokio::test]
    async fn move_onto_special_tile() {
        let mut m = Match::new(2, Rules::new(Board::new([5]))).await;
        let moved = m.engine.move_token(m.room, m.users[0], 0, 5).await.unwrap();
        assert_eq!(moved.position, 5);
        assert!(!moved.penalized);
        assert_eq!(moved.next, 1);
        let snapshot = m.snapshot().await;
        assert_eq!(snapshot.current_turn, 1);
        assert_eq!(snapshot.players[0].tokens, [5, 0, 0, 0]);
        assert_eq!(snapshot.players[0].liabilities, 0);
        assert_eq!(m.drain(), vec!["move_event", "state_update", "turn_change"]);
    }

    #[tokio::test]
    async fn move_past_reachable_special_is_penalized() {
        let m = Match::new(2, Rules::new(Board::new([3]))).await;
        m.tweak(0, |p| p.place(0, 2)).await;
        let moved = m.engine.move_token(m.room, m.users[0], 0, 3).await.unwrap();
        assert_eq!(moved.position, 5);
        assert!(moved.penalized);
        let snapshot = m.snapshot().await;
        assert_eq!(snapshot.players[0].liabilities, 20);
        assert_eq!(snapshot.current_turn, 1);
    }

    #[tokio::test]
    async fn move_without_reachable_special_is_free() {
        let m = Match::new(2, Rules::new(Board::new([3]))).await;
        let moved = m.engine.move_token(m.room, m.users[0], 0, 5).await.unwrap();
        assert!(!moved.penalized);
        assert_eq!(m.snapshot().await.players[0].liabilities, 0);
    }

    #[tokio::test]
    async fn move_pays_returns_between_move_and_state() {
        let mut m = Match::plain(2).await;
        m.tweak(0, |p| {
            p.acquire(Holding::new("a1", 12));
            p.acquire(Holding::new("a2", 15));
            p.place(0, 20);
        })
        .await;
        let moved = m.engine.move_token(m.room, m.users[0], 0, 3).await.unwrap();
        assert_eq!(moved.position, 23);
        assert_eq!(moved.payouts.len(), 2);
        let snapshot = m.snapshot().await;
        assert_eq!(snapshot.players[0].current_points, STARTING_POINTS + 540);
        assert!(snapshot.players[0].assets.iter().all(|h| h.returns() == 1));
        assert_eq!(
            m.drain(),
            vec!["move_event", "asset_return", "asset_return", "state_update", "turn_change"]
        );
    }

    #[tokio::test]
    async fn turn_cycles_through_every_seat() {
        let m = Match::plain(3).await;
        for round in 0..2 {
            for seat in 0..3 {
                let moved = m
                    .engine
                    .move_token(m.room, m.users[seat], round, 1)
                    .await
                    .unwrap();
                assert_eq!(moved.next, (seat + 1) % 3);
                assert!(m.snapshot().await.current_turn < 3);
            }
        }
        assert_eq!(m.snapshot().await.current_turn, 0);
    }

    #[tokio::test]
    async fn out_of_turn_is_forbidden_and_silent() {
        let mut m = Match::plain(2).await;
        let before = m.snapshot().await;
        assert_eq!(
            m.engine.move_token(m.room, m.users[1], 0, 3).await.err(),
            Some(Error::Forbidden)
        );
        assert_eq!(
            m.engine.select_asset(m.room, m.users[1], "a1").await.err(),
            Some(Error::Forbidden)
        );
        assert_eq!(m.snapshot().await, before);
        assert!(m.drain().is_empty());
    }

    #[tokio::test]
    async fn bad_token_index_changes_nothing() {
        let mut m = Match::plain(2).await;
        let before = m.snapshot().await;
        assert_eq!(
            m.engine.move_token(m.room, m.users[0], 4, 3).await.err(),
            Some(Error::Invalid(Invalid::TokenIndex))
        );
        assert_eq!(m.snapshot().await, before);
        assert!(m.drain().is_empty());
    }

    #[tokio::test]
    async fn asset_bought_at_furthest_token() {
        let mut m = Match::plain(2).await;
        m.tweak(0, |p| {
            p.place(0, 3);
            p.place(1, 17);
            p.place(2, 9);
        })
        .await;
        let selected = m.engine.select_asset(m.room, m.users[0], "a1").await.unwrap();
        assert_eq!(selected.assets, vec![Holding::new("a1", 17)]);
        assert_eq!(selected.next, 1);
        assert_eq!(m.drain(), vec!["asset_purchase", "state_update", "turn_change"]);
    }

    #[tokio::test]
    async fn duplicate_asset_still_spends_the_turn() {
        let m = Match::plain(2).await;
        m.engine.select_asset(m.room, m.users[0], "a1").await.unwrap();
        m.engine.move_token(m.room, m.users[1], 0, 2).await.unwrap();
        let selected = m.engine.select_asset(m.room, m.users[0], "a1").await.unwrap();
        assert_eq!(selected.assets.len(), 1);
        assert_eq!(selected.next, 1);
        assert_eq!(
            m.engine.select_asset(m.room, m.users[1], "").await.err(),
            Some(Error::Invalid(Invalid::MissingField("assetId")))
        );
    }

    #[tokio::test]
    async fn roll_is_informational() {
        let mut m = Match::plain(2).await;
        let roll = m.engine.roll(m.room, m.users[1]).await.unwrap();
        assert_eq!(roll, Roll(3, 4));
        assert_eq!(roll.sum(), 7);
        assert_eq!(m.snapshot().await.current_turn, 0);
        assert_eq!(m.drain(), vec!["dice_result"]);
    }

    #[tokio::test]
    async fn gated_rolls_need_the_turn() {
        let m = Match::new(2, Rules::default().gate_rolls(true)).await;
        assert!(m.engine.roll(m.room, m.users[0]).await.is_ok());
        assert_eq!(
            m.engine.roll(m.room, m.users[1]).await.err(),
            Some(Error::Forbidden)
        );
    }

    #[tokio::test]
    async fn seeded_rolls_stay_on_the_die() {
        let engine = Arc::new(Match::engine(Rules::default()).seeded(11));
        let room = engine.create(1, None).await.unwrap().id();
        let user = ID::default();
        engine.join(room, Some(user), 0, false).await.unwrap();
        engine.start(room).await.unwrap();
        for _ in 0..50 {
            let Roll(a, b) = engine.roll(room, user).await.unwrap();
            assert!((1..=6).contains(&a) && (1..=6).contains(&b));
        }
    }

    #[tokio::test]
    async fn draws_credit_gains_and_owe_losses() {
        let mut m = Match::plain(2).await;
        let gain = m.engine.draw_event_card(m.room, m.users[1]).await.unwrap();
        assert_eq!(gain.card.effect(), 150);
        assert_eq!(gain.points, STARTING_POINTS + 150);
        assert_eq!(gain.liabilities, 0);
        let loss = m.engine.draw_event_card(m.room, m.users[1]).await.unwrap();
        assert_eq!(loss.card.effect(), -80);
        assert_eq!(loss.points, STARTING_POINTS + 150);
        assert_eq!(loss.liabilities, 80);
        assert_eq!(m.snapshot().await.current_turn, 0);
        assert_eq!(
            m.drain(),
            vec!["card_draw", "state_update", "card_draw", "state_update"]
        );
    }

    #[tokio::test]
    async fn gated_draws_need_the_turn() {
        let m = Match::new(2, Rules::default().gate_draws(true)).await;
        assert_eq!(
            m.engine.draw_event_card(m.room, m.users[1]).await.err(),
            Some(Error::Forbidden)
        );
        assert!(m.engine.draw_event_card(m.room, m.users[0]).await.is_ok());
    }

    #[tokio::test]
    async fn savings_transfer_and_bonus() {
        let mut m = Match::plain(2).await;
        let saved = m
            .engine
            .play_savings_card(m.room, m.users[0], fixed(FLAT), 100)
            .await
            .unwrap();
        assert_eq!(saved, Saved { bonus: 20, savings: 120, points: STARTING_POINTS - 100 });
        let saved = m
            .engine
            .play_savings_card(m.room, m.users[0], fixed(FLAT), 50)
            .await
            .unwrap();
        assert_eq!(saved.bonus, 0);
        assert_eq!(saved.savings, 170);
        assert_eq!(
            m.drain(),
            vec!["savings_play", "state_update", "savings_play", "state_update"]
        );
    }

    #[tokio::test]
    async fn asset_bonus_needs_an_asset() {
        let m = Match::plain(2).await;
        let saved = m
            .engine
            .play_savings_card(m.room, m.users[0], fixed(OWNS), 200)
            .await
            .unwrap();
        assert_eq!(saved.bonus, 0);
        m.tweak(0, |p| p.acquire(Holding::new("a2", 4))).await;
        let saved = m
            .engine
            .play_savings_card(m.room, m.users[0], fixed(OWNS), 200)
            .await
            .unwrap();
        assert_eq!(saved.bonus, 50);
        assert_eq!(saved.savings, 450);
    }

    #[tokio::test]
    async fn savings_overdraw_changes_nothing() {
        let mut m = Match::plain(2).await;
        let before = m.snapshot().await;
        assert_eq!(
            m.engine
                .play_savings_card(m.room, m.users[0], fixed(PLAIN), STARTING_POINTS + 1)
                .await
                .err(),
            Some(Error::Invalid(Invalid::InsufficientPoints))
        );
        assert_eq!(
            m.engine
                .play_savings_card(m.room, m.users[0], fixed(PLAIN), 0)
                .await
                .err(),
            Some(Error::Invalid(Invalid::Amount))
        );
        assert_eq!(
            m.engine
                .play_savings_card(m.room, m.users[0], ID::default(), 10)
                .await
                .err(),
            Some(Error::NotFound(Missing::Card))
        );
        assert_eq!(m.snapshot().await, before);
        assert!(m.drain().is_empty());
    }

    #[tokio::test]
    async fn spending_only_adds_liabilities() {
        let mut m = Match::plain(2).await;
        let card = fixed(CONCERT);
        assert_eq!(m.engine.play_spending_card(m.room, m.users[1], card).await, Ok(60));
        assert_eq!(m.engine.play_spending_card(m.room, m.users[1], card).await, Ok(120));
        assert_eq!(
            m.engine
                .play_spending_card(m.room, m.users[1], ID::default())
                .await
                .err(),
            Some(Error::NotFound(Missing::Card))
        );
        assert_eq!(m.snapshot().await.players[1].current_points, STARTING_POINTS);
        assert_eq!(
            m.drain(),
            vec!["spending_play", "state_update", "spending_play", "state_update"]
        );
    }

    fn eligible(p: &mut Player) {
        p.acquire(Holding::new("a1", 3));
        p.acquire(Holding::new("a2", 7));
        p.deposit(500);
    }

    #[tokio::test]
    async fn dream_purchase_ends_the_match() {
        let mut m = Match::plain(2).await;
        m.tweak(0, eligible).await;
        let won = m
            .engine
            .purchase_dream(m.room, m.users[0], fixed(LAPTOP))
            .await
            .unwrap();
        assert_eq!(won, Won { winner: Some(m.users[0]), dream: fixed(LAPTOP) });
        let snapshot = m.snapshot().await;
        assert_eq!(snapshot.status, Status::Finished);
        assert_eq!(snapshot.winner_id, Some(m.users[0]));
        assert!(snapshot.ended_at.is_some());
        assert_eq!(snapshot.players[0].current_points, 700);
        assert_eq!(snapshot.players[0].savings, 500);
        assert!(m.engine.catalog().unlocked(m.users[0], fixed(LAPTOP)).await);
        assert_eq!(m.drain(), vec!["dream_purchase", "game_end", "state_update"]);
        assert_eq!(
            m.engine.move_token(m.room, m.users[1], 0, 1).await.err(),
            Some(Error::Invalid(Invalid::NotActive))
        );
    }

    #[tokio::test]
    async fn unmet_dream_gate_changes_nothing() {
        let mut m = Match::plain(2).await;
        m.tweak(0, |p| p.deposit(500)).await;
        let before = m.snapshot().await;
        assert_eq!(
            m.engine
                .purchase_dream(m.room, m.users[0], fixed(LAPTOP))
                .await
                .err(),
            Some(Error::Invalid(Invalid::AssetCount))
        );
        assert_eq!(
            m.engine
                .purchase_dream(m.room, m.users[0], ID::default())
                .await
                .err(),
            Some(Error::NotFound(Missing::Dream))
        );
        assert_eq!(m.snapshot().await, before);
        assert!(m.drain().is_empty());
    }

    #[tokio::test]
    async fn dream_needs_its_prerequisite() {
        let m = Match::plain(2).await;
        m.tweak(0, eligible).await;
        assert_eq!(
            m.engine
                .purchase_dream(m.room, m.users[0], fixed(CAR))
                .await
                .err(),
            Some(Error::Invalid(Invalid::Prerequisite))
        );
        m.engine.catalog().unlock(m.users[0], fixed(LAPTOP)).await;
        assert!(
            m.engine
                .purchase_dream(m.room, m.users[0], fixed(CAR))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn bound_dream_rejects_others() {
        let engine = Match::engine(Rules::default());
        let room = engine.create(1, Some(fixed(LAPTOP))).await.unwrap().id();
        let user = ID::default();
        engine.join(room, Some(user), 0, false).await.unwrap();
        engine.start(room).await.unwrap();
        engine.catalog().unlock(user, fixed(LAPTOP)).await;
        let mut lease = engine.store().lock_player(room, user).await.unwrap();
        eligible(lease.player_mut());
        lease.save_fields(&[Field::Assets, Field::Savings]);
        lease.commit().await.unwrap();
        drop(lease);
        assert_eq!(
            engine.purchase_dream(room, user, fixed(CAR)).await.err(),
            Some(Error::Invalid(Invalid::WrongDream))
        );
        assert!(engine.purchase_dream(room, user, fixed(LAPTOP)).await.is_ok());
    }

    #[tokio::test]
    async fn concurrent_moves_apply_whole() {
        let mut m = Match::plain(2).await;
        let a = tokio::spawn({
            let engine = m.engine.clone();
            let (room, user) = (m.room, m.users[0]);
            async move { engine.move_token(room, user, 0, 2).await }
        });
        let b = tokio::spawn({
            let engine = m.engine.clone();
            let (room, user) = (m.room, m.users[1]);
            async move { engine.move_token(room, user, 0, 2).await }
        });
        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert!(a.is_ok());
        let snapshot = m.snapshot().await;
        assert_eq!(snapshot.players[0].tokens, [2, 0, 0, 0]);
        match &b {
            Ok(_) => {
                assert_eq!(snapshot.current_turn, 0);
                assert_eq!(snapshot.players[1].tokens, [2, 0, 0, 0]);
            }
            Err(e) => {
                assert_eq!(e, &Error::Forbidden);
                assert_eq!(snapshot.current_turn, 1);
                assert_eq!(snapshot.players[1].tokens, [0, 0, 0, 0]);
            }
        }
        let events = m.drain();
        let moves = events.iter().filter(|t| *t == "move_event").count();
        assert_eq!(moves, 1 + b.is_ok() as usize);
    }

    #[tokio::test]
    async fn concurrent_plays_on_one_row_serialize() {
        let m = Match::plain(2).await;
        let tasks = (0..10)
            .map(|_| {
                let engine = m.engine.clone();
                let (room, user) = (m.room, m.users[0]);
                tokio::spawn(async move {
                    engine.play_savings_card(room, user, fixed(PLAIN), 100).await
                })
            })
            .collect::<Vec<_>>();
        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }
        let snapshot = m.snapshot().await;
        assert_eq!(snapshot.players[0].savings, 1000);
        assert_eq!(snapshot.players[0].current_points, STARTING_POINTS - 1000);
    }

    #[tokio::test]
    async fn interleaved_plays_publish_snapshots_in_commit_order() {
        let mut m = Match::plain(2).await;
        let tasks = (0..20)
            .map(|i| {
                let engine = m.engine.clone();
                let (room, user) = (m.room, m.users[i % 2]);
                tokio::spawn(async move {
                    engine.play_spending_card(room, user, fixed(CONCERT)).await
                })
            })
            .collect::<Vec<_>>();
        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }
        let last = m
            .frames()
            .into_iter()
            .filter(|v| v["type"] == "state_update")
            .last()
            .unwrap();
        let snapshot = m.snapshot().await;
        assert_eq!(snapshot.players[0].liabilities, 600);
        assert_eq!(snapshot.players[1].liabilities, 600);
        assert_eq!(last["data"], serde_json::to_value(&snapshot).unwrap());
    }

    #[tokio::test]
    async fn oversized_steps_change_nothing() {
        let mut m = Match::plain(1).await;
        let user = m.users[0];
        assert!(m.engine.move_token(m.room, user, 0, 3).await.is_ok());
        m.drain();
        let before = m.snapshot().await;
        for steps in [Tile::MAX, Tile::MIN, MAX_STEPS + 1, -MAX_STEPS - 1] {
            assert_eq!(
                m.engine.move_token(m.room, user, 0, steps).await.err(),
                Some(Error::Invalid(Invalid::Steps))
            );
        }
        assert_eq!(m.snapshot().await, before);
        assert!(m.drain().is_empty());
        let moved = m.engine.move_token(m.room, user, 0, MAX_STEPS).await.unwrap();
        assert_eq!(moved.position, 3 + MAX_STEPS);
    }

    #[tokio::test]
    async fn stalled_journal_never_holds_the_match() {
        struct Stalled;
        #[async_trait::async_trait]
        impl crate::broadcast::Journal for Stalled {
            async fn append(&self, _: &[(u64, crate::broadcast::Record)]) -> anyhow::Result<()> {
                futures::future::pending().await
            }
        }
        let engine = Engine::new(
            Store::new(Duration::from_millis(250)),
            Arc::new(Hub::new(Arc::new(Stalled))),
            Arc::new(Library::new(contents())),
            Rules::new(Board::new(std::iter::empty::<Tile>())),
        )
        .with_dice(Box::new(Loaded::new(&[3, 4], &[0, 1])));
        let room = engine.create(2, None).await.unwrap().id();
        let users = [ID::default(), ID::default()];
        for (seat, user) in users.iter().enumerate() {
            engine.join(room, Some(*user), seat, false).await.unwrap();
        }
        let (_, mut rx) = engine.hub().subscribe(room).await;
        let actions = async {
            engine.start(room).await.unwrap();
            engine.move_token(room, users[0], 0, 2).await.unwrap();
            engine.move_token(room, users[1], 0, 2).await.unwrap();
        };
        assert!(tokio::time::timeout(Duration::from_secs(1), actions).await.is_ok());
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn held_row_times_out_without_effect() {
        let mut m = Match::plain(2).await;
        let before = m.snapshot().await;
        let held = m.engine.store().lock_player(m.room, m.users[0]).await.unwrap();
        assert_eq!(
            m.engine.move_token(m.room, m.users[0], 0, 3).await.err(),
            Some(Error::Timeout)
        );
        drop(held);
        assert_eq!(m.snapshot().await, before);
        assert!(m.drain().is_empty());
        assert!(m.engine.move_token(m.room, m.users[0], 0, 3).await.is_ok());
    }

    #[tokio::test]
    async fn discard_ends_streams() {
        let mut m = Match::plain(2).await;
        m.engine.discard(m.room).await.unwrap();
        assert!(m.rx.recv().await.is_none());
        assert_eq!(
            m.engine.state(m.room).await.err(),
            Some(Error::NotFound(Missing::Room))
        );
    }
}
