// Library surface for headless/integration tests and reuse.
// Keep this lean: terminal drawing lives with the binary in main.rs.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod expansion;
pub mod feedback;
pub mod high_score;
pub mod letter_pool;
pub mod normalize;
pub mod round;
pub mod runtime;
pub mod session;
pub mod shuffle;
pub mod timer;
pub mod words;

pub use error::{GameError, Result};
pub use session::{Difficulty, GamePhase, RoundOutcome, SessionController, Snapshot};
pub use words::Word;
