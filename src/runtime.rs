use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind};

use crate::session::{Difficulty, GamePhase};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait GameEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<GameEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                // key releases are reported on some platforms; only presses count
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    if tx.send(GameEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(GameEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl GameEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: GameEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: GameEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> GameEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => GameEvent::Tick,
        }
    }
}

/// What a key press means to the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Letter(char),
    Backspace,
    Hint,
    Skip,
    Submit,
    SelectDifficulty(Difficulty),
    Start,
    Expand,
    Quit,
}

/// Keys per phase:
/// - menus (not started / game over): Enter starts, `n`/`h` pick difficulty,
///   `e` expands the word list, `q` quits
/// - playing: letters pick from the pool, Backspace, Tab for a hint,
///   Enter submits, Right skips
/// - Esc quits everywhere
pub fn action_for_key(key: &KeyEvent, phase: GamePhase) -> Option<Action> {
    if key.code == KeyCode::Esc {
        return Some(Action::Quit);
    }

    match phase {
        GamePhase::NotStarted | GamePhase::GameOver => match key.code {
            KeyCode::Enter => Some(Action::Start),
            KeyCode::Char('n') => Some(Action::SelectDifficulty(Difficulty::Normal)),
            KeyCode::Char('h') => Some(Action::SelectDifficulty(Difficulty::Hardcore)),
            KeyCode::Char('e') => Some(Action::Expand),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },
        GamePhase::Playing => match key.code {
            KeyCode::Char(c) if c.is_alphabetic() => Some(Action::Letter(c)),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Tab => Some(Action::Hint),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Right => Some(Action::Skip),
            _ => None,
        },
        GamePhase::Correct | GamePhase::Incorrect | GamePhase::Skipped => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::sync::mpsc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        // With no events available, step should yield Tick
        let ev = runner.step();
        match ev {
            GameEvent::Tick => {}
            _ => panic!("expected Tick on timeout"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameEvent::Resize).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(10));
        let runner = Runner::new(es, ticker);

        match runner.step() {
            GameEvent::Resize => {}
            _ => panic!("expected Resize event"),
        }
    }

    #[test]
    fn menu_keys() {
        let phase = GamePhase::NotStarted;
        assert_eq!(action_for_key(&key(KeyCode::Enter), phase), Some(Action::Start));
        assert_eq!(
            action_for_key(&key(KeyCode::Char('h')), phase),
            Some(Action::SelectDifficulty(Difficulty::Hardcore))
        );
        assert_eq!(action_for_key(&key(KeyCode::Char('e')), GamePhase::GameOver), Some(Action::Expand));
        assert_eq!(action_for_key(&key(KeyCode::Char('x')), phase), None);
    }

    #[test]
    fn playing_keys() {
        let phase = GamePhase::Playing;
        assert_eq!(action_for_key(&key(KeyCode::Char('é')), phase), Some(Action::Letter('é')));
        assert_eq!(action_for_key(&key(KeyCode::Char('h')), phase), Some(Action::Letter('h')));
        assert_eq!(action_for_key(&key(KeyCode::Tab), phase), Some(Action::Hint));
        assert_eq!(action_for_key(&key(KeyCode::Enter), phase), Some(Action::Submit));
        assert_eq!(action_for_key(&key(KeyCode::Right), phase), Some(Action::Skip));
        assert_eq!(action_for_key(&key(KeyCode::Char('1')), phase), None);
    }

    #[test]
    fn result_screens_only_quit() {
        for phase in [GamePhase::Correct, GamePhase::Incorrect, GamePhase::Skipped] {
            assert_eq!(action_for_key(&key(KeyCode::Enter), phase), None);
            assert_eq!(action_for_key(&key(KeyCode::Char('a')), phase), None);
            assert_eq!(action_for_key(&key(KeyCode::Esc), phase), Some(Action::Quit));
        }
    }
}
