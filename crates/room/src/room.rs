//! Room module - orchestrates every board of one match
//!
//! A room runs two periodic cycles on its own virtual clock:
//!
//! - **Gravity** (`gravity_ms`): every live piece falls one row or opens its lock window.
//! - **Logic** (`logic_tick_ms`): eliminations and ranks, win detection, targeting, then
//!   lock-delay expiry and bot moves.
//!
//! Attacks are routed between boards here: the attacker's own pending garbage is offset
//! first, the remainder is announced right away and delivered after `garbage_delay_ms`.
//! All mutation happens through `&mut self`, so one room is always single-threaded.
//! Events accumulate in an outbox drained with [`Room::drain_events`].

use std::collections::BTreeMap;
use std::sync::Arc;

use royale_core::{AttackEconomy, Board, ClearResult, SimpleRng};
use tracing::{debug, info};

use crate::agent::{Agent, Contender, PlayerAgent, PlayerView};
use crate::bot::AutomatedAgent;
use crate::config::{GarbageDelivery, RoomConfig};
use crate::error::RoomError;
use crate::event::RoomEvent;
use crate::scheduler::{Scheduler, Task};
use crate::types::{Difficulty, PlayerAction, PlayerId, RoomId};

/// Attacker id used by [`Room::simulate_attack`]
pub const TEST_ATTACKER: &str = "CPU-TEST";

struct Seat {
    agent: Box<dyn Agent>,
    /// Elimination already reported
    death_processed: bool,
}

pub struct Room {
    id: RoomId,
    config: RoomConfig,
    seats: BTreeMap<PlayerId, Seat>,
    economy: Arc<AttackEconomy>,
    rng: SimpleRng,
    scheduler: Scheduler,
    running: bool,
    /// Bumped on restart so deliveries from the previous match are dropped
    epoch: u64,
    events: Vec<RoomEvent>,
}

impl Room {
    pub fn new(id: RoomId, config: RoomConfig) -> Self {
        Self::with_economy(id, config, AttackEconomy::default())
    }

    pub fn with_economy(id: RoomId, config: RoomConfig, economy: AttackEconomy) -> Self {
        Self {
            id,
            rng: SimpleRng::new(config.seed),
            config,
            seats: BTreeMap::new(),
            economy: Arc::new(economy),
            scheduler: Scheduler::new(),
            running: false,
            epoch: 0,
            events: Vec::new(),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.seats.contains_key(id)
    }

    pub fn player_ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.seats.keys()
    }

    pub fn player(&self, id: &PlayerId) -> Option<&PlayerAgent> {
        self.seats.get(id).map(|s| s.agent.player())
    }

    /// Mutable access for scenario setup
    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut PlayerAgent> {
        self.seats.get_mut(id).map(|s| s.agent.player_mut())
    }

    pub fn alive_count(&self) -> usize {
        self.seats
            .values()
            .filter(|s| !s.agent.player().is_eliminated())
            .count()
    }

    fn new_board(&mut self) -> Board {
        let seed = self.rng.fork_seed();
        Board::new(seed, Arc::clone(&self.economy), self.config.board_config())
    }

    fn seat(&mut self, id: PlayerId, agent: Box<dyn Agent>) {
        info!(room = %self.id, player = %id, automated = agent.is_automated(), "player joined");
        self.seats.insert(
            id,
            Seat {
                agent,
                death_processed: false,
            },
        );
    }

    /// Add a human-controlled player with a fresh board
    pub fn add_player(&mut self, id: PlayerId, name: impl Into<String>) -> Result<(), RoomError> {
        if self.seats.contains_key(&id) {
            return Err(RoomError::DuplicatePlayer(id));
        }
        let board = self.new_board();
        let agent = PlayerAgent::new(id.clone(), name, board);
        self.seat(id, Box::new(agent));
        Ok(())
    }

    /// Add a bot that plays on the logic cycle
    pub fn add_bot(
        &mut self,
        id: PlayerId,
        name: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<(), RoomError> {
        if self.seats.contains_key(&id) {
            return Err(RoomError::DuplicatePlayer(id));
        }
        let board = self.new_board();
        let player = PlayerAgent::new(id.clone(), name, board);
        self.seat(id, Box::new(AutomatedAgent::new(player, difficulty)));
        Ok(())
    }

    /// Remove a player; the room stops once it is empty
    pub fn remove_player(&mut self, id: &PlayerId) -> Result<(), RoomError> {
        if self.seats.remove(id).is_none() {
            return Err(RoomError::UnknownPlayer(id.clone()));
        }
        for seat in self.seats.values_mut() {
            let player = seat.agent.player_mut();
            if player.target() == Some(id) {
                player.set_target(None);
            }
        }
        info!(room = %self.id, player = %id, remaining = self.seats.len(), "player left");
        if self.seats.is_empty() {
            self.stop();
        }
        Ok(())
    }

    /// Start both cycles; no-op while running
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.scheduler
            .schedule_in(u64::from(self.config.gravity_ms), Task::Gravity);
        self.scheduler
            .schedule_in(u64::from(self.config.logic_tick_ms), Task::Logic);
        info!(room = %self.id, players = self.seats.len(), "room started");
    }

    /// Cancel both cycles; scheduled garbage deliveries still fire
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.scheduler.cancel_periodic();
        info!(room = %self.id, "room stopped");
    }

    /// Stop, reset every board and agent in place, start again
    pub fn restart(&mut self) {
        self.stop();
        self.epoch += 1;
        let ids: Vec<PlayerId> = self.seats.keys().cloned().collect();
        for id in ids {
            let seed = self.rng.fork_seed();
            if let Some(seat) = self.seats.get_mut(&id) {
                seat.agent.reset(seed);
                seat.death_processed = false;
            }
        }
        self.start();
        self.events.push(RoomEvent::Restarted);
        info!(room = %self.id, epoch = self.epoch, "room restarted");
    }

    /// Take every event raised since the last call
    pub fn drain_events(&mut self) -> Vec<RoomEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run every task due within the next `elapsed_ms` of virtual time
    pub fn advance(&mut self, elapsed_ms: u64) {
        let until = self.scheduler.now() + elapsed_ms;
        while let Some((at, task)) = self.scheduler.pop_due(until) {
            match task {
                Task::Gravity => {
                    self.gravity_tick();
                    if self.running {
                        self.scheduler
                            .schedule_at(at + u64::from(self.config.gravity_ms), Task::Gravity);
                    }
                }
                Task::Logic => {
                    self.logic_tick();
                    if self.running {
                        self.scheduler
                            .schedule_at(at + u64::from(self.config.logic_tick_ms), Task::Logic);
                    }
                }
                Task::DeliverGarbage {
                    target,
                    lines,
                    sender,
                    epoch,
                } => self.deliver_garbage(&target, lines, sender, epoch),
            }
        }
        self.scheduler.advance_to(until);
    }

    /// Milliseconds until the next scheduled task
    pub fn next_due_in(&self) -> Option<u64> {
        self.scheduler.next_due_in()
    }

    /// One gravity step for every live board
    pub fn gravity_tick(&mut self) {
        for seat in self.seats.values_mut() {
            let board = seat.agent.player_mut().board_mut();
            if !board.is_game_over() {
                board.gravity_step();
            }
        }
    }

    /// One logic step: eliminations, win detection, targeting, lock expiry and bots
    pub fn logic_tick(&mut self) {
        self.process_eliminations();
        self.detect_winner();
        self.update_targets();
        if self.running {
            self.run_agents(self.config.logic_tick_ms);
        }
    }

    fn process_eliminations(&mut self) {
        let newly_dead: Vec<PlayerId> = self
            .seats
            .iter()
            .filter(|(_, s)| !s.death_processed && s.agent.player().is_eliminated())
            .map(|(id, _)| id.clone())
            .collect();
        if newly_dead.is_empty() {
            return;
        }

        // Same-tick deaths get distinct ranks in roster order.
        let alive = self.alive_count();
        let count = newly_dead.len();
        for (i, id) in newly_dead.into_iter().enumerate() {
            let rank = alive + (count - i);
            let killer = match self.seats.get_mut(&id) {
                Some(seat) => {
                    seat.death_processed = true;
                    seat.agent.player().board().killer().cloned()
                }
                None => continue,
            };

            let credited = killer.as_ref().and_then(|k| self.seats.get_mut(k)).filter(|s| {
                !s.agent.player().is_eliminated()
            });
            if let Some(seat) = credited {
                seat.agent.player_mut().award_ko();
            }

            info!(room = %self.id, player = %id, rank, killer = ?killer, "player eliminated");
            self.events.push(RoomEvent::Eliminated {
                player: id,
                rank,
                killer,
            });
        }
    }

    fn detect_winner(&mut self) {
        if !self.running || self.seats.is_empty() {
            return;
        }
        let alive: Vec<PlayerId> = self
            .seats
            .iter()
            .filter(|(_, s)| !s.agent.player().is_eliminated())
            .map(|(id, _)| id.clone())
            .collect();

        match alive.as_slice() {
            [winner] if self.seats.len() > 1 => {
                self.stop();
                if let Some(seat) = self.seats.get_mut(winner) {
                    seat.death_processed = true;
                }
                info!(room = %self.id, winner = %winner, "room winner");
                self.events.push(RoomEvent::Eliminated {
                    player: winner.clone(),
                    rank: 1,
                    killer: None,
                });
                self.events.push(RoomEvent::Winner {
                    winner: winner.clone(),
                });
            }
            [] => {
                self.stop();
                info!(room = %self.id, "no survivors");
                self.events.push(RoomEvent::NoSurvivors);
            }
            _ => {}
        }
    }

    fn update_targets(&mut self) {
        for seat in self.seats.values_mut() {
            seat.agent.player_mut().clear_targeted_by();
        }

        // Targets read only elimination/badge/KO state, which this pass never changes.
        let roster = self.contenders();
        let ids: Vec<PlayerId> = self.seats.keys().cloned().collect();
        for id in ids {
            let target = match self.seats.get_mut(&id) {
                Some(seat) => {
                    seat.agent.update_target(&roster, &mut self.rng);
                    seat.agent.player().target().cloned()
                }
                None => continue,
            };
            if let Some(target) = target.and_then(|t| self.seats.get_mut(&t)) {
                target.agent.player_mut().add_targeted_by(id.clone());
            }
        }
    }

    fn contenders(&self) -> Vec<Contender> {
        self.seats
            .values()
            .map(|s| s.agent.player().contender())
            .collect()
    }

    /// Lock-delay expiry and automated moves
    fn run_agents(&mut self, elapsed_ms: u32) {
        let ids: Vec<PlayerId> = self.seats.keys().cloned().collect();
        for id in ids {
            let (locked, action) = match self.seats.get_mut(&id) {
                Some(seat) => {
                    let locked = seat.agent.player_mut().board_mut().tick_lock(elapsed_ms);
                    let clear = locked
                        .then(|| seat.agent.player().board().last_clear().copied())
                        .flatten();
                    (clear, seat.agent.per_tick_update(elapsed_ms))
                }
                None => continue,
            };
            if let Some(clear) = locked {
                self.handle_attack(&id, &clear);
            }
            if let Some(action) = action {
                if let Err(e) = self.handle_input(&id, action) {
                    debug!(room = %self.id, player = %id, code = e.code(), "bot action ignored");
                }
            }
        }
    }

    /// Route an input action to a player
    ///
    /// Hard drops raise a [`RoomEvent::HardDrop`]; any clear they produce is turned into
    /// an attack.
    pub fn handle_input(&mut self, id: &PlayerId, action: PlayerAction) -> Result<(), RoomError> {
        let seat = self
            .seats
            .get_mut(id)
            .ok_or_else(|| RoomError::UnknownPlayer(id.clone()))?;

        let Some(outcome) = seat.agent.handle_input(action) else {
            return Ok(());
        };

        self.events.push(RoomEvent::HardDrop {
            player: id.clone(),
            drop: outcome.drop,
        });
        if let Some(clear) = outcome.clear {
            self.handle_attack(id, &clear);
        }
        Ok(())
    }

    /// Parse and route a raw input string; unknown strings are ignored
    pub fn handle_raw_input(&mut self, id: &PlayerId, action: &str) -> Result<(), RoomError> {
        match PlayerAction::from_str(action) {
            Some(action) => self.handle_input(id, action),
            None if self.seats.contains_key(id) => Ok(()),
            None => Err(RoomError::UnknownPlayer(id.clone())),
        }
    }

    /// Turn a clear into garbage for the attacker's target
    ///
    /// Returns the lines forwarded after offsetting the attacker's own buffer.
    pub fn handle_attack(&mut self, attacker: &PlayerId, clear: &ClearResult) -> u32 {
        let Some(seat) = self.seats.get(attacker) else {
            return 0;
        };
        let player = seat.agent.player();
        let lines = self.economy.calculate_attack(
            clear.kind,
            clear.combo,
            clear.back_to_back,
            player.badges(),
            player.targeted_by().len(),
        );
        if lines == 0 {
            return 0;
        }

        let target = match player.target().cloned() {
            Some(target) => Some(target),
            None => {
                let opponents: Vec<PlayerId> = self
                    .seats
                    .iter()
                    .filter(|(id, s)| *id != attacker && !s.agent.player().is_eliminated())
                    .map(|(id, _)| id.clone())
                    .collect();
                let picked = self.rng.pick(&opponents).cloned();
                if let Some(seat) = self.seats.get_mut(attacker) {
                    seat.agent.player_mut().set_target(picked.clone());
                }
                picked
            }
        };

        let Some(target) = target else {
            return 0;
        };
        let target_alive = self
            .seats
            .get(&target)
            .is_some_and(|s| !s.agent.player().is_eliminated());
        if !target_alive {
            return 0;
        }

        let remaining = match self.seats.get_mut(attacker) {
            Some(seat) => seat.agent.player_mut().board_mut().offset_garbage(lines),
            None => return 0,
        };
        debug!(
            room = %self.id,
            attacker = %attacker,
            target = %target,
            lines,
            remaining,
            "attack"
        );
        if remaining == 0 {
            return 0;
        }

        self.send_garbage(Some(attacker.clone()), target, remaining);
        remaining
    }

    /// Announce an attack now and schedule its delivery
    fn send_garbage(&mut self, sender: Option<PlayerId>, target: PlayerId, lines: u32) {
        self.events.push(RoomEvent::Attack {
            attacker: sender
                .clone()
                .unwrap_or_else(|| PlayerId::from(TEST_ATTACKER)),
            target: target.clone(),
            lines,
        });
        self.scheduler.schedule_in(
            u64::from(self.config.garbage_delay_ms),
            Task::DeliverGarbage {
                target,
                lines,
                sender,
                epoch: self.epoch,
            },
        );
    }

    fn deliver_garbage(
        &mut self,
        target: &PlayerId,
        lines: u32,
        sender: Option<PlayerId>,
        epoch: u64,
    ) {
        if epoch != self.epoch {
            return;
        }
        let Some(seat) = self.seats.get_mut(target) else {
            return;
        };
        let board = seat.agent.player_mut().board_mut();
        if board.is_game_over() {
            return;
        }
        match self.config.garbage_delivery {
            GarbageDelivery::Immediate => board.apply_garbage(lines, sender),
            GarbageDelivery::Buffered => board.receive_garbage(lines, sender),
        }
    }

    /// Debug attack from a pseudo attacker, delivered after the usual delay
    pub fn simulate_attack(&mut self, target: &PlayerId, lines: u32) -> bool {
        let alive = self
            .seats
            .get(target)
            .is_some_and(|s| !s.agent.player().is_eliminated());
        if !alive || lines == 0 {
            return false;
        }
        self.send_garbage(None, target.clone(), lines);
        true
    }

    /// Observer view of every player, in roster order
    pub fn snapshot(&self) -> Vec<PlayerView> {
        self.seats
            .values()
            .map(|s| s.agent.player().view(s.agent.is_automated()))
            .collect()
    }
}
