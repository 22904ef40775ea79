use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use chatmaze_core::chat::User;
use chatmaze_core::events::GameEvent;
use chatmaze_core::player::{Direction, Player};
use chatmaze_core::store::SaveDocument;
use chatmaze_core::time::{Timestamp, elapsed};

use crate::command::{self, Command};
use crate::config::HuntConfig;
use crate::maze::Maze;

/// Width of the empty frame drawn around the maze, in cells.
pub const BORDER: u32 = 1;

/// The round's coin, in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub row: u32,
    pub column: u32,
    /// When a player jumped on it, or `None` while it is still up for grabs.
    pub collected_at: Option<Timestamp>,
}

impl Coin {
    pub fn is_collected(&self) -> bool {
        self.collected_at.is_some()
    }
}

/// The authoritative game state, advanced once per driver tick.
///
/// Every mutation goes through [`Simulation::update`]; renderers read
/// snapshots through [`Simulation::players`], [`Simulation::coin`] and
/// [`Simulation::maze`]. Time is always passed in, so a fixed seed and a
/// fixed sequence of `(now, users)` reproduce the same game exactly.
pub struct Simulation {
    config: HuntConfig,
    maze: Maze,
    coin: Coin,
    players: BTreeMap<String, Player>,
    processed_messages: BTreeSet<String>,
    rng: StdRng,
    round: u32,
}

impl Simulation {
    /// Seeded from `config.seed` when set, otherwise from the OS.
    pub fn new(config: HuntConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_seed(config: HuntConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: HuntConfig, rng: StdRng) -> Self {
        let maze = Maze::new(config.maze_rows, config.maze_columns);
        let mut simulation = Self {
            config,
            maze,
            coin: Coin {
                row: BORDER,
                column: BORDER,
                collected_at: None,
            },
            players: BTreeMap::new(),
            processed_messages: BTreeSet::new(),
            rng,
            round: 0,
        };
        simulation.move_coin();
        simulation
    }

    pub fn config(&self) -> &HuntConfig {
        &self.config
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn coin(&self) -> Coin {
        self.coin
    }

    /// Number of completed rounds since construction.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_processed(&self, message_id: &str) -> bool {
        self.processed_messages.contains(message_id)
    }

    /// Advance the game by one tick.
    ///
    /// Merges the roster into the player registry, runs each new `!` command
    /// once, lets every listed player run at most one queued macro letter,
    /// and respawns the coin once its collection animation has finished.
    pub fn update(&mut self, now: Timestamp, users: &[User]) -> Vec<GameEvent> {
        let mut events = Vec::new();

        for user in users {
            let mut player = match self.players.remove(&user.id) {
                Some(player) => player,
                None => self.spawn(user, now),
            };
            player.messages = user.messages.clone();
            // Covers players who spawned or were loaded onto a key cell.
            self.pick_up_key(&player, &mut events);

            for message in &user.messages {
                player.last_active_at = player.last_active_at.max(message.published_at);
                let Some(text) = message.command_text() else {
                    continue;
                };
                if self.processed_messages.contains(&message.id) {
                    continue;
                }
                self.run_text(now, text, &mut player, &mut events);
                self.processed_messages.insert(message.id.clone());
            }

            self.advance_queue(now, &mut player, &mut events);
            self.players.insert(user.id.clone(), player);
        }

        if let Some(collected_at) = self.coin.collected_at
            && elapsed(now, collected_at) > self.config.animation_length_ms
        {
            self.round += 1;
            self.move_coin();
            tracing::info!(round = self.round, "Coin respawned, new round");
            events.push(GameEvent::RoundReset { round: self.round });
        }

        events
    }

    /// Players active within the retention window, drawn back to front.
    ///
    /// Each snapshot only carries non-command chat from the recent message
    /// window, newest first. The list is ordered by `jumped_at` so the most
    /// recent jumpers end up on top.
    pub fn players(&self, now: Timestamp) -> Vec<Player> {
        let window = self.config.message_window_ms;
        let mut visible: Vec<Player> = self
            .players
            .values()
            .filter(|player| elapsed(now, player.last_active_at) < self.config.player_retention_ms)
            .map(|player| {
                let mut snapshot = player.clone();
                snapshot
                    .messages
                    .retain(|m| !m.is_command() && m.published_at.saturating_add(window) > now);
                snapshot
                    .messages
                    .sort_by(|a, b| b.published_at.cmp(&a.published_at));
                snapshot
            })
            .collect();
        visible.sort_by_key(|player| player.jumped_at);
        visible
    }

    /// Replace the registry and processed-message ledger with saved state.
    pub fn load(&mut self, document: SaveDocument) {
        self.players = document.players;
        for player in self.players.values_mut() {
            player.clear_transient();
        }
        self.processed_messages = document.processed_messages.into_iter().collect();
        tracing::info!(
            players = self.players.len(),
            processed = self.processed_messages.len(),
            "Loaded saved state"
        );
    }

    pub fn save(&self) -> SaveDocument {
        SaveDocument {
            players: self.players.clone(),
            processed_messages: self.processed_messages.iter().cloned().collect(),
        }
    }

    fn spawn(&mut self, user: &User, now: Timestamp) -> Player {
        let row = self
            .rng
            .random_range(BORDER..BORDER + self.config.maze_rows.max(1));
        let column = self
            .rng
            .random_range(BORDER..BORDER + self.config.maze_columns.max(1));
        let character = self.rng.random_range(0..self.config.character_variants.max(1));
        tracing::info!(player_id = %user.id, name = %user.name, row, column, "Player joined");
        Player::spawn(user, row, column, character, now)
    }

    /// Regenerate the maze, put the coin on its terminal cell and send every
    /// player back to the start.
    fn move_coin(&mut self) {
        self.maze.generate(&mut self.rng);
        let (row, column) = self
            .maze
            .terminal()
            .map_or((0, 0), |cell| (cell.row, cell.column));
        self.coin = Coin {
            row: row + BORDER,
            column: column + BORDER,
            collected_at: None,
        };
        for player in self.players.values_mut() {
            player.reset_for_round(BORDER, BORDER);
        }
    }

    fn run_text(
        &mut self,
        now: Timestamp,
        text: &str,
        player: &mut Player,
        events: &mut Vec<GameEvent>,
    ) {
        tracing::debug!(player_id = %player.id, command = text, "Chat command");
        match command::parse(text) {
            Some(command) => self.apply(now, command, player, events),
            None => tracing::trace!(player_id = %player.id, command = text, "Ignored command"),
        }
    }

    fn advance_queue(&mut self, now: Timestamp, player: &mut Player, events: &mut Vec<GameEvent>) {
        if elapsed(now, player.last_action_at()) <= self.config.animation_length_ms {
            return;
        }
        let Some(letter) = player.commands.pop_front() else {
            return;
        };
        match Command::from_letter(letter) {
            Some(command) => self.apply(now, command, player, events),
            None => tracing::trace!(player_id = %player.id, %letter, "Dropped unknown macro letter"),
        }
    }

    fn apply(
        &mut self,
        now: Timestamp,
        command: Command,
        player: &mut Player,
        events: &mut Vec<GameEvent>,
    ) {
        match command {
            Command::Move(direction) => self.move_player(now, direction, player, events),
            Command::Jump => self.jump(now, player, events),
            Command::Customize(number) => {
                player.character = number.rem_euclid(self.config.character_variants.max(1));
            },
            Command::Queue(letters) => player.commands.extend(letters),
        }
    }

    fn move_player(
        &mut self,
        now: Timestamp,
        direction: Direction,
        player: &mut Player,
        events: &mut Vec<GameEvent>,
    ) {
        let (row, column) = (player.row, player.column);
        let open = maze_coords(row, column)
            .is_some_and(|(r, c)| self.maze.can_pass(r, c, direction));

        let (dr, dc) = if open { direction.delta() } else { (0, 0) };
        player.row = clamp_step(row, dr, self.config.board_rows());
        player.column = clamp_step(column, dc, self.config.board_columns());
        player.direction = direction;

        if (player.row, player.column) == (row, column) {
            return;
        }
        player.last_moved_at = now;
        self.pick_up_key(player, events);
    }

    /// Collect the key under `player`, if any.
    fn pick_up_key(&mut self, player: &Player, events: &mut Vec<GameEvent>) {
        if let Some((r, c)) = maze_coords(player.row, player.column)
            && let Some(key) = self.maze.collect(r, c)
        {
            tracing::info!(player_id = %player.id, key = key.0, "Key collected");
            events.push(GameEvent::KeyCollected {
                player_id: player.id.clone(),
                key: key.0,
            });
        }
    }

    fn jump(&mut self, now: Timestamp, player: &mut Player, events: &mut Vec<GameEvent>) {
        player.jumped_at = now;
        if player.row != self.coin.row
            || player.column != self.coin.column
            || self.coin.is_collected()
        {
            return;
        }
        self.coin.collected_at = Some(now);
        player.coins = player.coins.saturating_add(1);
        tracing::info!(player_id = %player.id, coins = player.coins, "Coin collected");
        events.push(GameEvent::CoinCollected {
            player_id: player.id.clone(),
            coins: player.coins,
        });
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.get_mut(id)
    }

    #[cfg(test)]
    pub(crate) fn maze_mut(&mut self) -> &mut Maze {
        &mut self.maze
    }

    #[cfg(test)]
    pub(crate) fn coin_mut(&mut self) -> &mut Coin {
        &mut self.coin
    }
}

/// Board coordinates to maze coordinates; `None` on the border.
fn maze_coords(row: u32, column: u32) -> Option<(u32, u32)> {
    Some((row.checked_sub(BORDER)?, column.checked_sub(BORDER)?))
}

/// Apply `delta` to `value`, clamped to `[0, limit - 1]`.
fn clamp_step(value: u32, delta: i64, limit: u32) -> u32 {
    let max = i64::from(limit.saturating_sub(1));
    u32::try_from((i64::from(value) + delta).clamp(0, max)).unwrap_or(0)
}
