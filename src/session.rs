use crate::error::{GameError, Result};
use crate::expansion::{parse_expansion, ExpansionRequest, WordExpander};
use crate::feedback::{FeedbackEvent, FeedbackSink, NullFeedback};
use crate::high_score::{HighScoreStore, MemoryHighScoreStore};
use crate::letter_pool::DEFAULT_POOL_SIZE;
use crate::round::RoundState;
use crate::shuffle::shuffle;
use crate::timer::{Countdown, OneShot};
use crate::words::Word;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Countdown resolution: one `tick` per second of play.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    /// 3 lives
    #[default]
    Normal,
    /// 1 life, no backspace
    Hardcore,
}

impl Difficulty {
    pub fn max_lives(self) -> u32 {
        match self {
            Difficulty::Normal => 3,
            Difficulty::Hardcore => 1,
        }
    }

    pub fn allows_backspace(self) -> bool {
        self != Difficulty::Hardcore
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum_macros::Display)]
pub enum GamePhase {
    NotStarted,
    Playing,
    Correct,
    Incorrect,
    Skipped,
    GameOver,
}

/// Why the last round ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    Solved { points: u32, life_regained: bool },
    WrongGuess,
    TimeExpired,
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rules {
    pub round_secs: u32,
    pub hints_per_game: u32,
    pub pool_size: usize,
    /// Every this many consecutive solves gives back a lost life.
    pub streak_for_life: u32,
    /// Pause between a round's result and the next round.
    pub transition: Duration,
    /// Words asked from an expander per request.
    pub expansion_count: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            round_secs: 60,
            hints_per_game: 3,
            pool_size: DEFAULT_POOL_SIZE,
            streak_for_life: 5,
            transition: Duration::from_millis(1500),
            expansion_count: 5,
        }
    }
}

/// Read-only copy of everything a view needs to draw the game.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    pub round_index: usize,
    pub rounds_total: usize,
    pub score: u32,
    pub high_score: u32,
    pub lives: u32,
    pub max_lives: u32,
    pub hints_remaining: u32,
    pub streak: u32,
    pub round: Option<RoundState>,
    pub outcome: Option<RoundOutcome>,
    pub transition_remaining: Option<Duration>,
}

/// Owns a game from `start` to game over: the word queue, lives, score,
/// streak, hints, the active round and both timers.
///
/// Every input is a no-op outside the phase it belongs to.
pub struct SessionController<R: Rng = StdRng> {
    words: Vec<Word>,
    rules: Rules,
    difficulty: Difficulty,
    round_index: usize,
    score: u32,
    high_score: u32,
    lives: u32,
    max_lives: u32,
    hints_remaining: u32,
    streak: u32,
    phase: GamePhase,
    round: Option<RoundState>,
    outcome: Option<RoundOutcome>,
    countdown: Countdown,
    transition: Option<OneShot>,
    store: Box<dyn HighScoreStore>,
    feedback: Box<dyn FeedbackSink>,
    rng: R,
}

impl<R: Rng> SessionController<R> {
    pub fn new(words: Vec<Word>, mut rng: R) -> Self {
        let rules = Rules::default();
        let difficulty = Difficulty::default();
        Self {
            words: shuffle(&words, &mut rng),
            difficulty,
            round_index: 0,
            score: 0,
            high_score: 0,
            lives: difficulty.max_lives(),
            max_lives: difficulty.max_lives(),
            hints_remaining: rules.hints_per_game,
            streak: 0,
            phase: GamePhase::NotStarted,
            round: None,
            outcome: None,
            countdown: Countdown::new(TICK_PERIOD),
            transition: None,
            store: Box::new(MemoryHighScoreStore::default()),
            feedback: Box::new(NullFeedback),
            rules,
            rng,
        }
    }

    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.hints_remaining = rules.hints_per_game;
        self.rules = rules;
        self
    }

    pub fn with_store(mut self, store: impl HighScoreStore + 'static) -> Self {
        self.high_score = store.load();
        self.store = Box::new(store);
        self
    }

    pub fn with_feedback(mut self, feedback: impl FeedbackSink + 'static) -> Self {
        self.feedback = Box::new(feedback);
        self
    }

    /// Begin a new game, dropping whatever the previous one left behind.
    pub fn start(&mut self, difficulty: Difficulty) {
        self.cancel_timers();
        self.difficulty = difficulty;
        self.max_lives = difficulty.max_lives();
        self.lives = self.max_lives;
        self.score = 0;
        self.streak = 0;
        self.hints_remaining = self.rules.hints_per_game;
        self.words = shuffle(&self.words, &mut self.rng);
        self.round_index = 0;
        self.high_score = self.store.load();
        info!(%difficulty, words = self.words.len(), high_score = self.high_score, "game started");
        self.feedback.emit(FeedbackEvent::Start);
        self.setup_round(0);
    }

    /// Enter round `index`, or end the game when the words or lives ran out.
    pub fn setup_round(&mut self, index: usize) {
        self.transition = None;
        self.round_index = index;
        if index >= self.words.len() || self.lives == 0 {
            self.game_over();
            return;
        }

        let word = self.words[index].clone();
        let round = RoundState::new(word, self.rules.pool_size, self.rules.round_secs, &mut self.rng);
        debug!(round = index, word = round.normalized_word(), "round ready");
        self.round = Some(round);
        self.outcome = None;
        self.countdown.reset();
        self.phase = GamePhase::Playing;
    }

    /// One second of the round clock.
    pub fn tick(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let expired = self.round.as_mut().is_some_and(RoundState::tick);
        if expired {
            debug!(round = self.round_index, "time expired");
            self.lose_life(RoundOutcome::TimeExpired, GamePhase::Incorrect);
        }
    }

    /// Advance both timers by wall-clock time.
    pub fn on_elapsed(&mut self, dt: Duration) {
        if let Some(transition) = self.transition.as_mut() {
            if transition.advance(dt) {
                self.advance_round();
                return;
            }
        }

        if self.phase == GamePhase::Playing {
            for _ in 0..self.countdown.advance(dt) {
                if self.phase != GamePhase::Playing {
                    break;
                }
                self.tick();
            }
        }
    }

    pub fn place_letter(&mut self, pool_index: usize) {
        if self.phase != GamePhase::Playing {
            return;
        }
        if let Some(round) = self.round.as_mut() {
            if round.place_letter(pool_index) {
                self.feedback.emit(FeedbackEvent::Click);
            }
        }
    }

    pub fn backspace(&mut self) {
        if self.phase != GamePhase::Playing || !self.difficulty.allows_backspace() {
            return;
        }
        if let Some(round) = self.round.as_mut() {
            if round.backspace() {
                self.feedback.emit(FeedbackEvent::Click);
            }
        }
    }

    /// Reveal one random unsolved position.
    pub fn use_hint(&mut self) {
        if self.hints_remaining == 0 || self.phase != GamePhase::Playing {
            return;
        }
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let Some(&index) = round.hint_candidates().choose(&mut self.rng) else {
            return;
        };
        round.reveal(index);
        self.hints_remaining -= 1;
        debug!(index, hints_remaining = self.hints_remaining, "hint used");
        self.feedback.emit(FeedbackEvent::Click);
    }

    pub fn skip(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.lose_life(RoundOutcome::Skipped, GamePhase::Skipped);
    }

    pub fn submit(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let Some(round) = self.round.as_ref() else {
            return;
        };
        if !round.is_solved() {
            self.lose_life(RoundOutcome::WrongGuess, GamePhase::Incorrect);
            return;
        }

        // bonus uses the streak as it was before this solve
        let points = 10 + round.time_remaining() + self.streak * 5;
        self.score += points;
        self.streak += 1;

        let life_regained = self.rules.streak_for_life > 0
            && self.streak % self.rules.streak_for_life == 0
            && self.lives < self.max_lives;
        if life_regained {
            self.lives += 1;
        }

        debug!(points, streak = self.streak, life_regained, "round solved");
        self.outcome = Some(RoundOutcome::Solved {
            points,
            life_regained,
        });
        self.enter_result(GamePhase::Correct);
        self.feedback.emit(FeedbackEvent::Correct);
    }

    /// Append words and reshuffle the whole queue.
    pub fn expand_word_list(&mut self, new_words: Vec<Word>) -> Result<usize> {
        if new_words.is_empty() {
            return Err(GameError::InvalidInput("no words to add".into()));
        }
        let added = new_words.len();
        self.words.extend(new_words);
        self.words = shuffle(&self.words, &mut self.rng);
        info!(added, total = self.words.len(), "word list expanded");
        Ok(added)
    }

    /// Ask `expander` for more words related to the queue and add them.
    /// Nothing changes unless the whole response is usable.
    pub fn request_expansion(&mut self, expander: &dyn WordExpander) -> Result<usize> {
        let request = ExpansionRequest::from_words(&self.words, self.rules.expansion_count);
        let response = expander.expand(&request).map_err(|e| match e {
            GameError::InvalidInput(_) | GameError::CollaboratorFailure(_) => e,
            other => GameError::CollaboratorFailure(other.to_string()),
        })?;
        let words = parse_expansion(&response)?;
        self.expand_word_list(words)
    }

    /// Cancel pending timers; nothing fires after this.
    pub fn shutdown(&mut self) {
        self.cancel_timers();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            difficulty: self.difficulty,
            round_index: self.round_index,
            rounds_total: self.words.len(),
            score: self.score,
            high_score: self.high_score,
            lives: self.lives,
            max_lives: self.max_lives,
            hints_remaining: self.hints_remaining,
            streak: self.streak,
            round: self.round.clone(),
            outcome: self.outcome,
            transition_remaining: self.pending_transition(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn round_index(&self) -> usize {
        self.round_index
    }

    pub fn word_queue(&self) -> &[Word] {
        &self.words
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn max_lives(&self) -> u32 {
        self.max_lives
    }

    pub fn hints_remaining(&self) -> u32 {
        self.hints_remaining
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    /// Time left before the next round starts, if one is scheduled.
    pub fn pending_transition(&self) -> Option<Duration> {
        self.transition.as_ref().map(OneShot::remaining)
    }

    fn lose_life(&mut self, outcome: RoundOutcome, phase: GamePhase) {
        self.lives = self.lives.saturating_sub(1);
        self.streak = 0;
        self.outcome = Some(outcome);
        debug!(?outcome, lives = self.lives, "life lost");
        self.enter_result(phase);
        self.feedback.emit(FeedbackEvent::Incorrect);
    }

    /// Show the round's result, then move on after the transition delay.
    fn enter_result(&mut self, phase: GamePhase) {
        self.phase = phase;
        // replaces any transition still pending
        self.transition = Some(OneShot::new(self.rules.transition));
    }

    fn advance_round(&mut self) {
        self.setup_round(self.round_index + 1);
    }

    fn game_over(&mut self) {
        self.cancel_timers();
        self.phase = GamePhase::GameOver;
        if self.score > self.high_score {
            self.high_score = self.score;
            if let Err(e) = self.store.save(self.score) {
                warn!("failed to save high score: {e}");
            }
        }
        info!(score = self.score, high_score = self.high_score, rounds = self.round_index, "game over");
        self.feedback.emit(FeedbackEvent::GameOver);
    }

    fn cancel_timers(&mut self) {
        self.transition = None;
        self.countdown.reset();
    }
}
