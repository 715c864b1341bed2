use crossterm::event::KeyEvent;
use rand::rngs::StdRng;
use rand::Rng;
use std::path::Path;
use std::time::Duration;

use crate::error::{GameError, Result};
use crate::expansion::WordExpander;
use crate::normalize::normalize;
use crate::runtime::{action_for_key, Action};
use crate::session::{Difficulty, SessionController};
use crate::words::load_csv;

/// Terminal front end state around one session: the menu's difficulty
/// choice, the last notice to show and the optional word expander.
pub struct App<R: Rng = StdRng> {
    pub session: SessionController<R>,
    pub selected: Difficulty,
    pub notice: Option<String>,
    expander: Option<Box<dyn WordExpander>>,
    should_quit: bool,
}

impl<R: Rng> App<R> {
    pub fn new(session: SessionController<R>, selected: Difficulty) -> Self {
        Self {
            session,
            selected,
            notice: None,
            expander: None,
            should_quit: false,
        }
    }

    pub fn with_expander(mut self, expander: impl WordExpander + 'static) -> Self {
        self.expander = Some(Box::new(expander));
        self
    }

    /// Append the words of a `word,clue` CSV file. A file without rows
    /// adds nothing and is not an error.
    pub fn add_words_from<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let words = load_csv(path).map_err(|e| {
            GameError::InvalidInput(format!("cannot read words from {}: {e}", path.display()))
        })?;
        if words.is_empty() {
            tracing::warn!("no words in {}", path.display());
            return Ok(0);
        }
        self.session.expand_word_list(words)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn on_tick(&mut self, dt: Duration) {
        self.session.on_elapsed(dt);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(action) = action_for_key(&key, self.session.phase()) {
            self.apply(action);
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Letter(c) => {
                // accented keys pick the plain pool letter
                let letter = normalize(&c.to_string()).chars().next();
                let slot = letter.and_then(|l| self.session.round().and_then(|r| r.pool_index_of(l)));
                if let Some(slot) = slot {
                    self.session.place_letter(slot);
                }
            }
            Action::Backspace => self.session.backspace(),
            Action::Hint => self.session.use_hint(),
            Action::Skip => self.session.skip(),
            Action::Submit => self.session.submit(),
            Action::SelectDifficulty(d) => self.selected = d,
            Action::Start => {
                self.notice = None;
                self.session.start(self.selected);
            }
            Action::Expand => self.expand(),
            Action::Quit => {
                self.session.shutdown();
                self.should_quit = true;
            }
        }
    }

    fn expand(&mut self) {
        let Some(expander) = self.expander.as_deref() else {
            self.notice = Some("Aucune source de mots configurée (--expand-from)".into());
            return;
        };
        self.notice = Some(match self.session.request_expansion(expander) {
            Ok(added) => format!("Liste de mots enrichie : {added} nouveaux mots ont été ajoutés."),
            Err(e) => {
                tracing::warn!("word expansion failed: {e}");
                format!("Erreur de génération : {e}")
            }
        });
    }
}
