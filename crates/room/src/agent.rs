//! Agent module - per-player controllers
//!
//! [`PlayerAgent`] owns one board plus the meta-game state around it (target, badges,
//! KOs, targeting mode). The [`Agent`] trait is the capability the room drives; human
//! players and bots both implement it, bots by producing their own actions from
//! [`Agent::per_tick_update`].

use royale_core::{Board, BoardSnapshot, ClearResult, DropInfo, SimpleRng};

use crate::types::{PlayerAction, PlayerId, TargetingMode};

/// Result of a hard drop: where the piece landed and what it cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropOutcome {
    pub drop: DropInfo,
    pub clear: Option<ClearResult>,
}

/// What targeting needs to know about each player in the room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contender {
    pub id: PlayerId,
    pub eliminated: bool,
    pub badges: u32,
    pub kos: u32,
}

/// Observer view of one player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub board: BoardSnapshot,
    pub target: Option<PlayerId>,
    pub badges: u32,
    pub kos: u32,
    pub targeted_by: Vec<PlayerId>,
    pub mode: TargetingMode,
    pub automated: bool,
}

#[derive(Debug, Clone)]
pub struct PlayerAgent {
    id: PlayerId,
    name: String,
    board: Board,
    target: Option<PlayerId>,
    targeted_by: Vec<PlayerId>,
    badges: u32,
    kos: u32,
    mode: TargetingMode,
}

impl PlayerAgent {
    pub fn new(id: PlayerId, name: impl Into<String>, board: Board) -> Self {
        Self {
            id,
            name: name.into(),
            board,
            target: None,
            targeted_by: Vec::new(),
            badges: 0,
            kos: 0,
            mode: TargetingMode::default(),
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn is_eliminated(&self) -> bool {
        self.board.is_game_over()
    }

    pub fn target(&self) -> Option<&PlayerId> {
        self.target.as_ref()
    }

    pub fn set_target(&mut self, target: Option<PlayerId>) {
        self.target = target;
    }

    pub fn targeted_by(&self) -> &[PlayerId] {
        &self.targeted_by
    }

    pub fn clear_targeted_by(&mut self) {
        self.targeted_by.clear();
    }

    pub fn add_targeted_by(&mut self, id: PlayerId) {
        if !self.targeted_by.contains(&id) {
            self.targeted_by.push(id);
        }
    }

    pub fn badges(&self) -> u32 {
        self.badges
    }

    pub fn kos(&self) -> u32 {
        self.kos
    }

    /// Credit one KO and one badge
    pub fn award_ko(&mut self) {
        self.kos += 1;
        self.badges += 1;
    }

    pub fn mode(&self) -> TargetingMode {
        self.mode
    }

    pub fn contender(&self) -> Contender {
        Contender {
            id: self.id.clone(),
            eliminated: self.is_eliminated(),
            badges: self.badges,
            kos: self.kos,
        }
    }

    /// Apply one input action; only a hard drop produces an outcome
    pub fn handle_input(&mut self, action: PlayerAction) -> Option<DropOutcome> {
        if self.board.is_game_over() {
            return None;
        }

        if let Some(mode) = action.targeting_mode() {
            self.mode = mode;
            return None;
        }

        match action {
            PlayerAction::Left => {
                self.board.move_piece(-1, 0);
            }
            PlayerAction::Right => {
                self.board.move_piece(1, 0);
            }
            PlayerAction::Down | PlayerAction::SoftDrop => {
                self.board.move_piece(0, 1);
            }
            PlayerAction::RotateCw => {
                self.board.rotate(true);
            }
            PlayerAction::RotateCcw => {
                self.board.rotate(false);
            }
            PlayerAction::Hold => {
                self.board.hold();
            }
            PlayerAction::HardDrop => {
                let drop = self.board.hard_drop()?;
                return Some(DropOutcome {
                    drop,
                    clear: self.board.last_clear().copied(),
                });
            }
            PlayerAction::TargetRandom
            | PlayerAction::TargetAttackers
            | PlayerAction::TargetBadges
            | PlayerAction::TargetKos => {}
        }
        None
    }

    /// Recompute the target from the room roster
    ///
    /// `contenders` is in room order; ties in Badges/KOs go to the earliest entry.
    pub fn update_target(&mut self, contenders: &[Contender], rng: &mut SimpleRng) {
        let alive: Vec<&Contender> = contenders
            .iter()
            .filter(|c| c.id != self.id && !c.eliminated)
            .collect();
        if alive.is_empty() {
            self.target = None;
            return;
        }
        let is_alive = |id: &PlayerId| alive.iter().any(|c| &c.id == id);

        self.target = match self.mode {
            TargetingMode::Random => match &self.target {
                Some(current) if is_alive(current) => Some(current.clone()),
                _ => rng.pick(&alive).map(|c| c.id.clone()),
            },
            TargetingMode::Attackers => match rng.pick(&self.targeted_by) {
                Some(attacker) if is_alive(attacker) => Some(attacker.clone()),
                Some(_) => Some(alive[0].id.clone()),
                None => rng.pick(&alive).map(|c| c.id.clone()),
            },
            TargetingMode::Badges => max_by_first(&alive, |c| c.badges),
            TargetingMode::Kos => max_by_first(&alive, |c| c.kos),
        };
    }

    /// Back to a fresh match: new board, counters and mode cleared
    pub fn reset(&mut self, seed: u32) {
        self.board.reset(seed);
        self.target = None;
        self.targeted_by.clear();
        self.badges = 0;
        self.kos = 0;
        self.mode = TargetingMode::default();
    }

    pub fn view(&self, automated: bool) -> PlayerView {
        PlayerView {
            id: self.id.clone(),
            name: self.name.clone(),
            board: self.board.snapshot(),
            target: self.target.clone(),
            badges: self.badges,
            kos: self.kos,
            targeted_by: self.targeted_by.clone(),
            mode: self.mode,
            automated,
        }
    }
}

/// Highest key wins; the first entry wins ties
fn max_by_first(alive: &[&Contender], key: impl Fn(&Contender) -> u32) -> Option<PlayerId> {
    let mut best: Option<&Contender> = None;
    for c in alive {
        if best.map_or(true, |b| key(c) > key(b)) {
            best = Some(c);
        }
    }
    best.map(|c| c.id.clone())
}

/// Capability the room drives every player through
pub trait Agent: Send {
    fn player(&self) -> &PlayerAgent;

    fn player_mut(&mut self) -> &mut PlayerAgent;

    fn handle_input(&mut self, action: PlayerAction) -> Option<DropOutcome> {
        self.player_mut().handle_input(action)
    }

    fn update_target(&mut self, contenders: &[Contender], rng: &mut SimpleRng) {
        self.player_mut().update_target(contenders, rng);
    }

    /// Called once per logic cycle; an automated agent may return an action to perform
    fn per_tick_update(&mut self, _elapsed_ms: u32) -> Option<PlayerAction> {
        None
    }

    fn reset(&mut self, seed: u32) {
        self.player_mut().reset(seed);
    }

    fn is_automated(&self) -> bool {
        false
    }
}

impl Agent for PlayerAgent {
    fn player(&self) -> &PlayerAgent {
        self
    }

    fn player_mut(&mut self) -> &mut PlayerAgent {
        self
    }
}
