use std::io::{self, Write};

/// Named cues the session emits for an audio/feedback layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum FeedbackEvent {
    #[strum(serialize = "click")]
    Click,
    #[strum(serialize = "correct")]
    Correct,
    #[strum(serialize = "incorrect")]
    Incorrect,
    #[strum(serialize = "start")]
    Start,
    #[strum(serialize = "gameOver")]
    GameOver,
}

/// Receiver of feedback cues. Implementations must swallow their own failures.
pub trait FeedbackSink {
    fn emit(&mut self, event: FeedbackEvent);
}

#[derive(Debug, Default)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn emit(&mut self, _event: FeedbackEvent) {}
}

/// Writes every cue to the tracing log.
#[derive(Debug, Default)]
pub struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn emit(&mut self, event: FeedbackEvent) {
        tracing::trace!(%event, "feedback");
    }
}

/// Rings the terminal bell on bad news. The bell is the only sound a
/// terminal owns, so this is the binary's stand-in for audio playback.
pub struct BellFeedback<W: Write> {
    out: W,
}

impl BellFeedback<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> BellFeedback<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FeedbackSink for BellFeedback<W> {
    fn emit(&mut self, event: FeedbackEvent) {
        tracing::trace!(%event, "feedback");
        if matches!(event, FeedbackEvent::Incorrect | FeedbackEvent::GameOver) {
            // playback problems never reach the game
            let _ = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
        }
    }
}

/// Keeps every cue in order; used by tests and headless drivers.
#[derive(Debug, Default, Clone)]
pub struct RecordingFeedback {
    pub events: std::rc::Rc<std::cell::RefCell<Vec<FeedbackEvent>>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl FeedbackSink for RecordingFeedback {
    fn emit(&mut self, event: FeedbackEvent) {
        self.events.borrow_mut().push(event);
    }
}
