use itertools::Itertools;
use mot_magique::{
    app::App,
    round::RoundState,
    session::{Difficulty, GamePhase, RoundOutcome, Snapshot},
};
use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

pub fn draw<R: Rng>(app: &App<R>, f: &mut Frame) {
    let snapshot = app.session.snapshot();
    let view = GameView {
        snapshot: &snapshot,
        selected: app.selected,
        notice: app.notice.as_deref(),
    };
    f.render_widget(view, f.area());
}

/// Plain terminal rendering of a session snapshot.
struct GameView<'a> {
    snapshot: &'a Snapshot,
    selected: Difficulty,
    notice: Option<&'a str>,
}

impl Widget for GameView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.snapshot.phase {
            GamePhase::NotStarted | GamePhase::GameOver => self.render_menu(area, buf),
            _ => self.render_round(area, buf),
        }
    }
}

impl GameView<'_> {
    fn render_menu(&self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let s = self.snapshot;

        let subtitle = if s.phase == GamePhase::GameOver {
            format!("Partie terminée ! Score : {}", s.score)
        } else {
            "Testez votre vocabulaire français !".to_string()
        };

        let difficulty = |d: Difficulty, label: &str| {
            let style = if d == self.selected {
                Style::default().patch(bold_style).fg(Color::Cyan)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };
            Span::styled(label.to_string(), style)
        };

        let mut lines = vec![
            Line::from(Span::styled(
                "Mot Magique",
                Style::default().patch(bold_style).fg(Color::Magenta),
            )),
            Line::from(subtitle),
            Line::from(""),
            Line::from(format!("Meilleur score : {}", s.high_score)),
            Line::from(""),
            Line::from(vec![
                difficulty(Difficulty::Normal, "(n) Normal : 3 vies"),
                Span::raw("    "),
                difficulty(Difficulty::Hardcore, "(h) Hardcore : 1 vie, pas d'effacement"),
            ]),
            Line::from(""),
            Line::from(format!("{} mots dans la liste", s.rounds_total)),
        ];
        if let Some(notice) = self.notice {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                notice.to_string(),
                Style::default().fg(Color::Yellow),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "(enter) jouer  (e) enrichir la liste  (esc) quitter",
            Style::default().add_modifier(Modifier::ITALIC),
        )));

        let height = lines.len() as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(area.height.saturating_sub(height) / 2),
                Constraint::Length(height),
                Constraint::Min(0),
            ])
            .split(area);

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[1], buf);
    }

    fn render_round(&self, area: Rect, buf: &mut Buffer) {
        let s = self.snapshot;
        let Some(round) = s.round.as_ref() else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // status
                Constraint::Length(1),
                Constraint::Length(3), // clue
                Constraint::Length(3), // guess
                Constraint::Length(3), // pool
                Constraint::Length(2), // result
                Constraint::Min(0),
                Constraint::Length(1), // help
            ])
            .split(area);

        self.status_line(round).render(chunks[0], buf);

        Paragraph::new(round.word().clue.as_str())
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Manche {}/{}",
                s.round_index + 1,
                s.rounds_total
            )))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        guess_line(round).render(chunks[3], buf);
        pool_line(round).render(chunks[4], buf);

        if let Some(result) = result_line(s, round) {
            Paragraph::new(result)
                .alignment(Alignment::Center)
                .render(chunks[5], buf);
        }

        let help = if s.difficulty.allows_backspace() {
            "lettres: choisir  (backspace) effacer  (tab) indice  (enter) valider  (→) passer  (esc) quitter"
        } else {
            "lettres: choisir  (tab) indice  (enter) valider  (→) passer  (esc) quitter"
        };
        Paragraph::new(Span::styled(help, Style::default().add_modifier(Modifier::DIM)))
            .alignment(Alignment::Center)
            .render(chunks[7], buf);
    }

    fn status_line(&self, round: &RoundState) -> Paragraph<'static> {
        let s = self.snapshot;
        let hearts = (0..s.max_lives)
            .map(|i| if i < s.lives { "♥" } else { "♡" })
            .join("");
        let time_style = if round.time_remaining() <= 10 {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        Paragraph::new(Line::from(vec![
            Span::raw(format!("Score {}  ", s.score)),
            Span::styled(hearts, Style::default().fg(Color::Red)),
            Span::raw(format!("  Indices {}  Série {}  ", s.hints_remaining, s.streak)),
            Span::styled(format!("{}s", round.time_remaining()), time_style),
        ]))
        .alignment(Alignment::Center)
    }
}

fn guess_line(round: &RoundState) -> Paragraph<'static> {
    let spans = round
        .guess()
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let style = if round.hinted().contains(&i) {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            let text = slot.map_or("_".to_string(), |c| c.to_uppercase().to_string());
            Span::styled(format!(" {text} "), style)
        })
        .collect_vec();

    Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
}

fn pool_line(round: &RoundState) -> Paragraph<'static> {
    let letters = round
        .letter_pool()
        .iter()
        .map(|slot| slot.map_or("·".to_string(), |c| c.to_uppercase().to_string()))
        .join("  ");

    Paragraph::new(letters)
        .block(Block::default().borders(Borders::ALL).title("Lettres"))
        .alignment(Alignment::Center)
}

fn result_line(s: &Snapshot, round: &RoundState) -> Option<Line<'static>> {
    let answer = round.word().text.to_uppercase();
    let bad = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);

    let line = match s.outcome? {
        RoundOutcome::Solved {
            points,
            life_regained,
        } => {
            let mut text = format!("Correct ! +{points}");
            if life_regained {
                text.push_str("  Vie récupérée !");
            }
            Line::from(Span::styled(
                text,
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ))
        }
        RoundOutcome::WrongGuess => {
            Line::from(Span::styled(format!("Incorrect ! Le mot était : {answer}"), bad))
        }
        RoundOutcome::TimeExpired => {
            Line::from(Span::styled(format!("Temps écoulé ! Le mot était : {answer}"), bad))
        }
        RoundOutcome::Skipped => {
            Line::from(Span::styled(format!("Mot passé. Le mot était : {answer}"), bad))
        }
    };
    Some(line)
}
