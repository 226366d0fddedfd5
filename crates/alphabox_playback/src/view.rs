//! Presentation state rebuilt from replayed events.

use alphabox_sim::{Board, BoardSnapshot, Event, EventLog, Inventory, Letter, RunSummary, Word};

use crate::controller::{PlaybackState, Presenter};

/// The most recent synthesis, as shown to the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynthesisResult {
    /// Letters consumed.
    pub items_used: Vec<Letter>,
    /// Bonus letter produced.
    pub synthesized_letter: Letter,
    /// Powder produced.
    pub powder_gain: u64,
}

/// Everything a front end displays during a replay.
///
/// Counters, powder, board and inventory only move forward as events are
/// applied, so after the last event of a log the view matches the final
/// state of the run that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayView {
    words: Vec<Word>,
    /// Normal boxes opened.
    pub draw_count: u64,
    /// Advanced boxes opened.
    pub advanced_draw_count: u64,
    /// Syntheses performed.
    pub synthesis_count: u64,
    /// Powder balance.
    pub powder_balance: u64,
    /// Current slot contents.
    pub board: BoardSnapshot,
    /// Held letters; `None` before the first snapshot.
    pub inventory: Option<Inventory>,
    /// Latest synthesis, if any.
    pub last_synthesis: Option<SynthesisResult>,
    /// Index of the last applied event.
    pub last_index: Option<usize>,
    /// True once the `complete` event has been applied.
    pub completed: bool,
    /// Last state reported by the controller.
    pub playback: PlaybackState,
}

impl ReplayView {
    /// An empty view for a board of `words`.
    #[must_use]
    pub fn new(words: &[Word]) -> Self {
        Self {
            words: words.to_vec(),
            draw_count: 0,
            advanced_draw_count: 0,
            synthesis_count: 0,
            powder_balance: 0,
            board: Board::empty_snapshot(words),
            inventory: None,
            last_synthesis: None,
            last_index: None,
            completed: false,
            playback: PlaybackState::Idle,
        }
    }

    /// Applies a whole log at once.
    #[must_use]
    pub fn replay(words: &[Word], log: &EventLog) -> Self {
        let mut view = Self::new(words);
        for (index, event) in log.iter().enumerate() {
            view.apply(index, event);
        }
        view
    }

    /// Counters in the shape of a run summary.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            draw_count: self.draw_count,
            advanced_draw_count: self.advanced_draw_count,
            synthesis_count: self.synthesis_count,
            powder_balance: self.powder_balance,
            event_count: self.last_index.map_or(0, |i| i + 1),
        }
    }

    /// The board as text, one word per line, `_` for empty slots.
    #[must_use]
    pub fn render_board(&self) -> String {
        self.board
            .iter()
            .map(|slots| {
                slots
                    .iter()
                    .map(|slot| slot.map_or('_', Letter::as_char))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Presenter for ReplayView {
    fn apply(&mut self, index: usize, event: &Event) {
        match event {
            Event::Draw { draw_count, .. } => self.draw_count = *draw_count,
            Event::AdvancedDraw {
                advanced_draw_count,
                ..
            } => self.advanced_draw_count = *advanced_draw_count,
            Event::Placement { board_snapshot, .. } => self.board.clone_from(board_snapshot),
            Event::Synthesis {
                synthesis_count,
                items_used,
                synthesized_letter,
                powder_gain,
                powder_balance,
                ..
            } => {
                self.synthesis_count = *synthesis_count;
                self.powder_balance = *powder_balance;
                self.last_synthesis = Some(SynthesisResult {
                    items_used: items_used.clone(),
                    synthesized_letter: *synthesized_letter,
                    powder_gain: *powder_gain,
                });
            }
            Event::Complete {
                draw_count,
                advanced_draw_count,
                synthesis_count,
                powder_balance,
            } => {
                self.draw_count = *draw_count;
                self.advanced_draw_count = *advanced_draw_count;
                self.synthesis_count = *synthesis_count;
                self.powder_balance = *powder_balance;
                self.completed = true;
            }
        }
        if let Some(inventory) = event.inventory() {
            self.inventory = Some(inventory.clone());
        }
        self.last_index = Some(index);
    }

    fn on_state_change(&mut self, state: PlaybackState) {
        self.playback = state;
    }

    fn clear(&mut self) {
        *self = Self::new(&self.words);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alphabox_sim::{Catalog, RngSource, SimConfig, SimulationEngine};
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn run() -> (Catalog, EventLog) {
        let engine = SimulationEngine::reference();
        let config = SimConfig::default().select_only(5, &[0]);
        let mut rng = RngSource::new(ChaCha8Rng::seed_from_u64(8));
        let log = engine.run(&config, &mut rng).unwrap();
        (engine.catalog().clone(), log)
    }

    #[test]
    fn test_replay_matches_run_summary() {
        let (catalog, log) = run();
        let view = ReplayView::replay(catalog.words(), &log);

        assert!(view.completed);
        assert_eq!(view.summary(), log.summary().unwrap());
        assert_eq!(view.last_index, Some(log.len() - 1));
    }

    #[test]
    fn test_clear_returns_to_empty() {
        let (catalog, log) = run();
        let mut view = ReplayView::replay(catalog.words(), &log);
        view.clear();
        assert_eq!(view, ReplayView::new(catalog.words()));
        assert_eq!(view.render_board().lines().next(), Some("____"));
    }

    #[test]
    fn test_render_board() {
        let words = vec![Word::new("AB").unwrap(), Word::new("C").unwrap()];
        let mut view = ReplayView::new(&words);
        view.board[0][1] = Some(Letter::new('B').unwrap());
        assert_eq!(view.render_board(), "_B\n_");
    }
}
