//! Match controller: engine, opponent, counters and score persistence.
//!
//! Every command returns the events presentation needs. In single-player
//! mode a human move that leaves the game open yields
//! [`Event::OpponentScheduled`]; presentation then sends
//! [`GameCommand::OpponentMove`] once after the delay. Human input is
//! ignored until that move lands.

use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::board::Mark;
use super::engine::{GameEngine, GameStatus, MoveResult};
use super::opponent::choose_move;
use super::scores::{ScoreStore, SessionCounters};
use crate::error::Result;
use crate::events::Event;
use crate::storage::{load_json, save_json, GameConfig, KvStore, SCORES_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Human X against the computer O.
    Single,
    /// Two humans sharing the board.
    TwoPlayer,
}

/// Display names bound to each mark for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Players {
    pub x: String,
    pub o: String,
}

impl Players {
    pub fn name(&self, mark: Mark) -> &str {
        match mark {
            Mark::X => &self.x,
            Mark::O => &self.o,
        }
    }
}

/// A user action against the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCommand {
    /// Select a mode; starts a fresh match with zeroed session counters.
    StartMatch {
        mode: Mode,
        player_x: String,
        player_o: String,
    },
    Play { cell: usize },
    /// The deferred computer move.
    OpponentMove,
    /// New board, same match and counters.
    Reset,
    /// Leave the match; session counters are dropped.
    Menu,
    /// Wipe the persisted tally.
    ResetScores,
}

#[derive(Debug, Clone)]
struct Match {
    mode: Mode,
    players: Players,
    engine: GameEngine,
    awaiting_opponent: bool,
}

pub struct GameSession<S: KvStore, R: Rng = Mcg128Xsl64> {
    store: S,
    rng: R,
    config: GameConfig,
    scores: ScoreStore,
    counters: SessionCounters,
    current: Option<Match>,
}

impl<S: KvStore> GameSession<S> {
    /// Session whose random fallback is seeded from `config.seed`, or from
    /// entropy when unset.
    pub fn open(store: S, config: GameConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self::with_rng(store, config, rng)
    }
}

impl<S: KvStore, R: Rng> GameSession<S, R> {
    pub fn with_rng(store: S, config: GameConfig, rng: R) -> Result<Self> {
        let mut scores: ScoreStore = load_json(&store, SCORES_KEY)?.unwrap_or_default();
        scores.recompute_high_score();
        Ok(Self {
            store,
            rng,
            config,
            scores,
            counters: SessionCounters::default(),
            current: None,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn scores(&self) -> &ScoreStore {
        &self.scores
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    pub fn engine(&self) -> Option<&GameEngine> {
        self.current.as_ref().map(|m| &m.engine)
    }

    pub fn players(&self) -> Option<&Players> {
        self.current.as_ref().map(|m| &m.players)
    }

    pub fn awaiting_opponent(&self) -> bool {
        self.current.as_ref().is_some_and(|m| m.awaiting_opponent)
    }

    /// Status line for the current board, or `None` outside a match.
    pub fn status_text(&self) -> Option<String> {
        self.current.as_ref().map(status_text)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply a command.
    ///
    /// # Errors
    /// Only persistence failures are errors; the in-memory result of the
    /// move stands regardless.
    pub fn dispatch(&mut self, command: GameCommand) -> Result<Vec<Event>> {
        match command {
            GameCommand::StartMatch {
                mode,
                player_x,
                player_o,
            } => {
                let players = self.resolve_players(mode, &player_x, &player_o);
                info!(?mode, x = %players.x, o = %players.o, "match started");
                self.counters = SessionCounters::default();
                self.current = Some(Match {
                    mode,
                    players,
                    engine: GameEngine::new(),
                    awaiting_opponent: false,
                });
                Ok(vec![self.board_event(), self.scores_event()])
            }
            GameCommand::Play { cell } => {
                let Some(m) = self.current.as_mut() else {
                    return Ok(Vec::new());
                };
                if m.awaiting_opponent {
                    return Ok(Vec::new());
                }
                match m.engine.place(cell) {
                    Some(result) => self.after_move(result),
                    None => Ok(Vec::new()),
                }
            }
            GameCommand::OpponentMove => {
                let Some(m) = self.current.as_mut() else {
                    return Ok(Vec::new());
                };
                if !m.awaiting_opponent {
                    return Ok(Vec::new());
                }
                m.awaiting_opponent = false;
                let me = m.engine.current();
                let result = choose_move(m.engine.board(), me, &mut self.rng)
                    .and_then(|cell| m.engine.place(cell));
                match result {
                    Some(result) => self.after_move(result),
                    None => Ok(Vec::new()),
                }
            }
            GameCommand::Reset => {
                let Some(m) = self.current.as_mut() else {
                    return Ok(Vec::new());
                };
                m.engine.reset();
                m.awaiting_opponent = false;
                Ok(vec![self.board_event()])
            }
            GameCommand::Menu => {
                if self.current.take().is_none() {
                    return Ok(Vec::new());
                }
                self.counters = SessionCounters::default();
                Ok(vec![self.scores_event()])
            }
            GameCommand::ResetScores => {
                self.scores = ScoreStore::default();
                save_json(&self.store, SCORES_KEY, &self.scores)?;
                info!("score store cleared");
                Ok(vec![self.scores_event()])
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn resolve_players(&self, mode: Mode, player_x: &str, player_o: &str) -> Players {
        let or_default = |name: &str, fallback: &str| {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                fallback.to_string()
            } else {
                trimmed.to_string()
            }
        };
        match mode {
            Mode::Single => Players {
                x: or_default(player_x, "Player"),
                o: or_default(&self.config.opponent_name, "Computer"),
            },
            Mode::TwoPlayer => Players {
                x: or_default(player_x, "Player X"),
                o: or_default(player_o, "Player O"),
            },
        }
    }

    fn after_move(&mut self, result: MoveResult) -> Result<Vec<Event>> {
        debug!(cell = result.cell, mark = %result.mark, "mark placed");
        let mut events = vec![self.board_event()];
        match result.status {
            GameStatus::Won { winner, line } => {
                // Credit the mark that completed the line.
                let name = self
                    .players()
                    .map(|p| p.name(winner).to_string())
                    .unwrap_or_default();
                self.counters.record_win(winner);
                let total = self.scores.record_win(&name);
                info!(winner = %winner, name = %name, total, "game won");
                events.push(Event::GameWon {
                    winner,
                    name,
                    line,
                    at: Utc::now(),
                });
                events.push(self.scores_event());
                save_json(&self.store, SCORES_KEY, &self.scores)?;
            }
            GameStatus::Draw => {
                self.counters.record_draw();
                info!("game drawn");
                events.push(Event::GameDrawn { at: Utc::now() });
                events.push(self.scores_event());
                save_json(&self.store, SCORES_KEY, &self.scores)?;
            }
            GameStatus::InProgress => {
                if let Some(m) = self.current.as_mut() {
                    if m.mode == Mode::Single && m.engine.current() == Mark::O {
                        m.awaiting_opponent = true;
                        events.push(Event::OpponentScheduled {
                            delay_ms: self.config.opponent_delay_ms,
                        });
                    }
                }
            }
        }
        Ok(events)
    }

    fn board_event(&self) -> Event {
        match &self.current {
            Some(m) => Event::BoardChanged {
                board: *m.engine.board(),
                current: m.engine.current(),
                active: m.engine.is_active(),
                status: status_text(m),
                winning_line: m.engine.winning_line(),
            },
            None => Event::BoardChanged {
                board: Default::default(),
                current: Mark::X,
                active: false,
                status: String::new(),
                winning_line: None,
            },
        }
    }

    fn scores_event(&self) -> Event {
        Event::ScoresChanged {
            session: self.counters,
            stored: self.scores.clone(),
        }
    }
}

fn status_text(m: &Match) -> String {
    match m.engine.status() {
        GameStatus::InProgress => {
            let mark = m.engine.current();
            format!("{}'s turn ({mark})", m.players.name(mark))
        }
        GameStatus::Won { winner, .. } => format!("{} wins!", m.players.name(winner)),
        GameStatus::Draw => "It's a draw!".to_string(),
    }
}
