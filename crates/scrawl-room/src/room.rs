//! Room actor: an isolated Tokio task that owns one match end to end.
//!
//! Each room runs in its own task and is driven by three event sources,
//! multiplexed in one `select!` loop: commands from the outside world
//! (joins, guesses, strokes, word choices), ticks from its phase
//! countdown, and expiries from its reconnection grace keeper. Phase
//! writes, membership changes, scoring, and timer ticks are therefore
//! totally ordered — there is no lock to hold wrong and no stale timer
//! callback to race a forced transition.

use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::{IndexedRandom, SliceRandom};
use scrawl_protocol::{
    unix_millis, AnnouncementKind, ChatMessage, Phase, PlayerListEntry,
    ServerMessage,
};
use scrawl_timer::{CountdownEvent, PhaseCountdown};
use scrawl_words::{mask_word, matches_word, WordBank};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use crate::grace::GraceKeeper;
use crate::registry::RoomMap;
use crate::score::{drawer_share, guess_score};
use crate::{Player, PlayerInfo, PlayerSender, RoomConfig, RoomError};

/// Command channel size per room actor.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// Add a player, or resume one still inside their grace window.
    Join {
        client_id: String,
        username: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<PlayerInfo, RoomError>>,
    },

    /// Remove a player. Without `immediate` the slot is held for the
    /// reconnection grace window first.
    Leave { client_id: String, immediate: bool },

    /// A chat line — scored as a guess if it matches, relayed otherwise.
    Chat { message: ChatMessage },

    /// The drawer picked a word; the round starts now.
    ChooseWord { word: String },

    /// A drawing stroke to relay to everyone but the artist.
    Stroke {
        client_id: String,
        payload: serde_json::Value,
    },

    /// Request a metadata snapshot.
    Status { reply: oneshot::Sender<RoomStatus> },

    /// Tear the room down.
    Shutdown,
}

/// A snapshot of room metadata (not a wire type — see
/// [`RoomSummary`](scrawl_protocol::RoomSummary) for what search exposes).
#[derive(Debug, Clone)]
pub struct RoomStatus {
    pub name: String,
    pub phase: Phase,
    pub max_players: usize,
    /// Active players in rotation order.
    pub players: Vec<PlayerInfo>,
    pub drawer_username: Option<String>,
}

/// Handle to a running room actor. Cheap to clone — the registry hands
/// these out and the actors never share state directly.
#[derive(Clone)]
pub struct RoomHandle {
    name: String,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The room's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a player (or resumes them from grace) and returns their
    /// snapshot after the join settled.
    pub async fn join(
        &self,
        client_id: impl Into<String>,
        username: impl Into<String>,
        sender: PlayerSender,
    ) -> Result<PlayerInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Join {
            client_id: client_id.into(),
            username: username.into(),
            sender,
            reply: reply_tx,
        })
        .await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.name.clone()))?
    }

    /// Removes a player. Fire-and-forget; the room broadcasts the
    /// fallout to everyone still in it.
    pub async fn leave(
        &self,
        client_id: impl Into<String>,
        immediate: bool,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Leave {
            client_id: client_id.into(),
            immediate,
        })
        .await
    }

    /// Delivers a chat line for guess checking.
    pub async fn chat(&self, message: ChatMessage) -> Result<(), RoomError> {
        self.send(RoomCommand::Chat { message }).await
    }

    /// Delivers the drawer's word choice.
    pub async fn choose_word(
        &self,
        word: impl Into<String>,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::ChooseWord { word: word.into() }).await
    }

    /// Relays a drawing stroke.
    pub async fn stroke(
        &self,
        client_id: impl Into<String>,
        payload: serde_json::Value,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Stroke {
            client_id: client_id.into(),
            payload,
        })
        .await
    }

    /// Requests the current room status.
    pub async fn status(&self) -> Result<RoomStatus, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Status { reply: reply_tx }).await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.name.clone()))
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.send(RoomCommand::Shutdown).await
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RoomError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| RoomError::Unavailable(self.name.clone()))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    name: String,
    max_players: usize,
    config: RoomConfig,
    words: Arc<WordBank>,
    players: Vec<Player>,
    phase: Phase,
    word: Option<String>,
    word_choices: Option<Vec<String>>,
    /// Usernames credited this round.
    winning_players: HashSet<String>,
    /// The current drawer, tracked by client id so the role survives a
    /// disconnect-and-resume.
    drawing_client_id: Option<String>,
    /// Rotation cursor. Wrapped into range each time a round starts;
    /// joins and leaves in between may skip or repeat a turn.
    drawing_index: usize,
    round_start: Option<Instant>,
    countdown: PhaseCountdown,
    grace: GraceKeeper,
    rooms: RoomMap,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(room = %self.name, max_players = self.max_players, "room started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let stop = match cmd {
                        Some(cmd) => self.handle_command(cmd),
                        None => true,
                    };
                    if stop {
                        break;
                    }
                }
                event = self.countdown.next_event() => match event {
                    CountdownEvent::Tick { remaining, leading } => {
                        self.broadcast_remaining(remaining, leading);
                    }
                    CountdownEvent::Elapsed => self.advance_phase(),
                },
                expired = self.grace.next_expired() => {
                    tracing::info!(
                        room = %self.name,
                        client_id = %expired.client_id,
                        username = %expired.username,
                        "grace window elapsed, player dropped for good"
                    );
                }
            }
        }

        self.rooms.write().await.remove(&self.name);
        if !self.grace.is_empty() {
            tracing::debug!(
                room = %self.name,
                "dropping pending grace entries with the room"
            );
        }
        tracing::info!(room = %self.name, "room closed");
    }

    /// Returns `true` when the actor should stop.
    fn handle_command(&mut self, cmd: RoomCommand) -> bool {
        match cmd {
            RoomCommand::Join {
                client_id,
                username,
                sender,
                reply,
            } => {
                let result = self.handle_join(client_id, username, sender);
                let _ = reply.send(result);
                false
            }
            RoomCommand::Leave {
                client_id,
                immediate,
            } => self.handle_leave(&client_id, immediate),
            RoomCommand::Chat { message } => {
                self.handle_chat(message);
                false
            }
            RoomCommand::ChooseWord { word } => {
                self.word = Some(word);
                self.transition(Phase::GameRunning);
                false
            }
            RoomCommand::Stroke { client_id, payload } => {
                self.handle_stroke(&client_id, payload);
                false
            }
            RoomCommand::Status { reply } => {
                let _ = reply.send(self.status());
                false
            }
            RoomCommand::Shutdown => true,
        }
    }

    // -- Membership ---------------------------------------------------------

    fn handle_join(
        &mut self,
        client_id: String,
        username: String,
        sender: PlayerSender,
    ) -> Result<PlayerInfo, RoomError> {
        if let Some((mut player, index)) = self.grace.resume(&client_id) {
            player.sender = sender;
            player.is_online = true;
            player.is_drawing =
                self.drawing_client_id.as_deref() == Some(client_id.as_str());
            let index = index.min(self.players.len());
            self.players.insert(index, player);
            tracing::info!(
                room = %self.name,
                client_id = %client_id,
                "player resumed within grace window"
            );
        } else {
            if self.players.len() >= self.max_players {
                return Err(RoomError::RoomFull(self.name.clone()));
            }
            if self.players.iter().any(|p| p.username == username) {
                return Err(RoomError::UsernameTaken {
                    room: self.name.clone(),
                    username,
                });
            }
            self.players.push(Player::new(
                client_id.clone(),
                username,
                sender,
            ));
            tracing::info!(
                room = %self.name,
                client_id = %client_id,
                players = self.players.len(),
                "player joined"
            );
        }

        if self.players.len() == 2 && self.phase == Phase::WaitingForPlayers {
            self.players.shuffle(&mut rand::rng());
            self.transition(Phase::WaitingForStart);
        } else if self.players.len() == self.max_players
            && self.phase == Phase::WaitingForStart
        {
            self.players.shuffle(&mut rand::rng());
            self.transition(Phase::NewRound);
        } else if self.players.len() == 1
            && self.phase != Phase::WaitingForPlayers
        {
            self.transition(Phase::WaitingForPlayers);
        }

        // Re-find the joiner: the transitions above may have shuffled.
        let info = match self
            .players
            .iter()
            .find(|p| p.client_id == client_id)
        {
            Some(joined) => {
                self.send_snapshot(joined);
                joined.info()
            }
            None => return Err(RoomError::Unavailable(self.name.clone())),
        };

        self.broadcast_rankings();
        self.broadcast_announcement(
            format!("{} has joined the party", info.username),
            AnnouncementKind::Joined,
        );

        Ok(info)
    }

    /// Returns `true` when the last player is gone and the room should
    /// tear itself down.
    fn handle_leave(&mut self, client_id: &str, immediate: bool) -> bool {
        let Some(index) =
            self.players.iter().position(|p| p.client_id == client_id)
        else {
            return false;
        };

        let mut player = self.players.remove(index);
        player.is_online = false;
        let username = player.username.clone();

        if immediate {
            tracing::info!(
                room = %self.name,
                client_id = %client_id,
                players = self.players.len(),
                "player removed"
            );
        } else {
            self.grace.hold(player, index);
        }

        self.broadcast_rankings();
        self.broadcast_announcement(
            format!("{username} left the party"),
            AnnouncementKind::Left,
        );

        if self.players.is_empty() {
            return true;
        }
        if self.players.len() == 1 {
            self.transition(Phase::WaitingForPlayers);
        }
        false
    }

    // -- Phase machine ------------------------------------------------------

    /// The single phase-change point: cancels whatever countdown was
    /// running, writes the phase, and runs the entry action before
    /// anything else can observe the new state.
    fn transition(&mut self, next: Phase) {
        self.countdown.cancel();
        self.phase = next;
        tracing::debug!(room = %self.name, phase = %next, "phase transition");

        match next {
            Phase::WaitingForPlayers => self.enter_waiting_for_players(),
            Phase::WaitingForStart => self.enter_waiting_for_start(),
            Phase::NewRound => self.enter_new_round(),
            Phase::GameRunning => self.enter_game_running(),
            Phase::ShowWord => self.enter_show_word(),
        }
    }

    /// A countdown ran out; move to the next phase in the cycle.
    fn advance_phase(&mut self) {
        let next = match self.phase {
            Phase::WaitingForStart => Phase::NewRound,
            Phase::NewRound => Phase::GameRunning,
            Phase::GameRunning => Phase::ShowWord,
            Phase::ShowWord => Phase::NewRound,
            // No countdown is ever armed in this phase.
            Phase::WaitingForPlayers => return,
        };
        self.transition(next);
    }

    fn enter_waiting_for_players(&mut self) {
        // No countdown — the phase ends when somebody joins.
        self.broadcast(ServerMessage::PhaseChange {
            phase: Some(Phase::WaitingForPlayers),
            remaining_ms: self.config.waiting_for_players_display.as_millis()
                as u64,
            drawer_username: None,
        });
    }

    fn enter_waiting_for_start(&mut self) {
        self.countdown.arm(self.config.waiting_for_start);
    }

    fn enter_new_round(&mut self) {
        self.word = None;
        let choices = self.words.random_words(3);
        self.word_choices = Some(choices.clone());
        self.next_drawing_player();
        self.broadcast_rankings();

        if let Some(drawer) = self.drawer() {
            drawer.send(ServerMessage::NewWords { candidates: choices });
        }
        self.countdown.arm(self.config.word_choice);
    }

    fn enter_game_running(&mut self) {
        self.winning_players.clear();
        self.round_start = Some(Instant::now());

        // Chosen word, else one of the round's candidates, else any word
        // from the bank.
        let word = self
            .word
            .clone()
            .or_else(|| {
                self.word_choices
                    .as_ref()
                    .and_then(|c| c.choose(&mut rand::rng()).cloned())
            })
            .unwrap_or_else(|| self.words.random_word().to_string());
        self.word = Some(word.clone());

        let Some(drawer_username) = self
            .drawer()
            .map(|p| p.username.clone())
            .or_else(|| {
                self.players
                    .choose(&mut rand::rng())
                    .map(|p| p.username.clone())
            })
        else {
            return;
        };

        let masked = mask_word(&word);
        for player in &self.players {
            let visible = if self.drawing_client_id.as_deref()
                == Some(player.client_id.as_str())
            {
                word.clone()
            } else {
                masked.clone()
            };
            player.send(ServerMessage::GameState {
                drawer_username: drawer_username.clone(),
                word: visible,
            });
        }

        self.countdown.arm(self.config.drawing);
        tracing::info!(
            room = %self.name,
            drawer = %drawer_username,
            seconds = self.config.drawing.as_secs(),
            "drawing phase started"
        );
    }

    fn enter_show_word(&mut self) {
        if self.winning_players.is_empty() {
            let penalty = self.config.no_guess_penalty;
            if let Some(drawer) = self.drawer_mut() {
                drawer.score -= penalty;
            }
        }
        self.broadcast_rankings();

        if let Some(word) = self.word.clone() {
            self.broadcast(ServerMessage::ChosenWord {
                word,
                room_name: self.name.clone(),
            });
        }
        self.countdown.arm(self.config.word_reveal);
    }

    /// Advances the rotation: clear the old drawer's flag, wrap the
    /// cursor if it ran past the end, flag the new drawer.
    fn next_drawing_player(&mut self) {
        for player in &mut self.players {
            player.is_drawing = false;
        }
        if self.players.is_empty() {
            self.drawing_client_id = None;
            return;
        }

        if self.drawing_index >= self.players.len() {
            self.drawing_index = 0;
        }
        let drawer = &mut self.players[self.drawing_index];
        drawer.is_drawing = true;
        self.drawing_client_id = Some(drawer.client_id.clone());
        self.drawing_index = (self.drawing_index + 1) % self.players.len();
    }

    // -- Guessing -----------------------------------------------------------

    fn handle_chat(&mut self, message: ChatMessage) {
        if self.is_guess_correct(&message) {
            self.credit_guess(message.from);
        } else {
            self.broadcast(ServerMessage::Chat(message));
        }
    }

    fn is_guess_correct(&self, message: &ChatMessage) -> bool {
        let Some(word) = &self.word else {
            return false;
        };
        matches_word(&message.message, word)
            && !self.winning_players.contains(&message.from)
            && self
                .drawer()
                .map(|drawer| drawer.username != message.from)
                .unwrap_or(true)
            && self.phase == Phase::GameRunning
    }

    fn credit_guess(&mut self, from: String) {
        let elapsed = self
            .round_start
            .map(|start| start.elapsed())
            .unwrap_or_default();
        let gained = guess_score(
            elapsed,
            self.config.drawing,
            self.config.guess_score_base,
            self.config.guess_score_multiplier,
        );
        if let Some(player) =
            self.players.iter_mut().find(|p| p.username == from)
        {
            player.score += gained;
        }

        let share =
            drawer_share(self.config.drawer_bonus, self.players.len());
        if let Some(drawer) = self.drawer_mut() {
            drawer.score += share;
        }

        self.broadcast_rankings();
        self.broadcast_announcement(
            format!("{from} has guessed the word"),
            AnnouncementKind::Guessed,
        );

        tracing::debug!(
            room = %self.name,
            player = %from,
            gained,
            "correct guess"
        );
        self.winning_players.insert(from);

        // Everyone but the drawer got it: end the round right here,
        // skipping the rest of the countdown and the reveal.
        if self.winning_players.len()
            == self.players.len().saturating_sub(1)
        {
            self.transition(Phase::NewRound);
            self.broadcast_announcement(
                "Everyone guessed it. New round starting".to_string(),
                AnnouncementKind::EveryoneGuessed,
            );
        }
    }

    // -- Strokes ------------------------------------------------------------

    fn handle_stroke(&self, client_id: &str, payload: serde_json::Value) {
        if self.phase != Phase::GameRunning {
            return;
        }
        self.broadcast_except(client_id, ServerMessage::DrawData { payload });
    }

    // -- Outbound -----------------------------------------------------------

    fn broadcast(&self, msg: ServerMessage) {
        for player in &self.players {
            player.send(msg.clone());
        }
    }

    fn broadcast_except(&self, client_id: &str, msg: ServerMessage) {
        for player in
            self.players.iter().filter(|p| p.client_id != client_id)
        {
            player.send(msg.clone());
        }
    }

    fn broadcast_announcement(
        &self,
        message: String,
        kind: AnnouncementKind,
    ) {
        self.broadcast(ServerMessage::Announcement {
            message,
            timestamp: unix_millis(),
            kind,
        });
    }

    /// Scoreboard ordered by score descending, ranks 1-based.
    fn broadcast_rankings(&self) {
        let mut entries: Vec<PlayerListEntry> = self
            .players
            .iter()
            .map(|p| PlayerListEntry {
                username: p.username.clone(),
                is_drawing: p.is_drawing,
                score: p.score,
                rank: 0,
            })
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.rank = i + 1;
        }
        self.broadcast(ServerMessage::PlayersList { players: entries });
    }

    fn broadcast_remaining(&self, remaining: std::time::Duration, leading: bool) {
        self.broadcast(ServerMessage::PhaseChange {
            phase: leading.then_some(self.phase),
            remaining_ms: remaining.as_millis() as u64,
            drawer_username: if leading {
                self.drawer().map(|p| p.username.clone())
            } else {
                None
            },
        });
    }

    /// Catches a joiner up: word state first (masked unless they draw or
    /// the word is being revealed), then the phase with the actual time
    /// left on the live countdown.
    fn send_snapshot(&self, player: &Player) {
        if let (Some(word), Some(drawer)) = (&self.word, self.drawer()) {
            let visible =
                if player.is_drawing || self.phase == Phase::ShowWord {
                    word.clone()
                } else {
                    mask_word(word)
                };
            player.send(ServerMessage::GameState {
                drawer_username: drawer.username.clone(),
                word: visible,
            });
        }

        let remaining = self
            .countdown
            .remaining()
            .unwrap_or_else(|| self.config.phase_duration(self.phase));
        player.send(ServerMessage::PhaseChange {
            phase: Some(self.phase),
            remaining_ms: remaining.as_millis() as u64,
            drawer_username: self.drawer().map(|p| p.username.clone()),
        });
    }

    // -- Lookups ------------------------------------------------------------

    fn drawer(&self) -> Option<&Player> {
        let id = self.drawing_client_id.as_deref()?;
        self.players.iter().find(|p| p.client_id == id)
    }

    fn drawer_mut(&mut self) -> Option<&mut Player> {
        let id = self.drawing_client_id.as_deref()?;
        self.players.iter_mut().find(|p| p.client_id == id)
    }

    fn status(&self) -> RoomStatus {
        RoomStatus {
            name: self.name.clone(),
            phase: self.phase,
            max_players: self.max_players,
            players: self.players.iter().map(Player::info).collect(),
            drawer_username: self.drawer().map(|p| p.username.clone()),
        }
    }
}

/// Spawns a new room actor task and returns a handle to it.
pub(crate) fn spawn_room(
    name: String,
    max_players: usize,
    config: RoomConfig,
    words: Arc<WordBank>,
    rooms: RoomMap,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_SIZE);

    let countdown = PhaseCountdown::new(config.tick_interval);
    let grace = GraceKeeper::new(config.reconnect_grace);
    let actor = RoomActor {
        name: name.clone(),
        max_players,
        config,
        words,
        players: Vec::new(),
        phase: Phase::WaitingForPlayers,
        word: None,
        word_choices: None,
        winning_players: HashSet::new(),
        drawing_client_id: None,
        drawing_index: 0,
        round_start: None,
        countdown,
        grace,
        rooms,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { name, sender: tx }
}
