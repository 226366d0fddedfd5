//! Plain-text rendering of a replay.

use std::io::Write;

use alphabox_playback::{PlaybackState, Presenter, ReplayView};
use alphabox_sim::{Event, Word};

use crate::error::AppResult;
use crate::events::PlaybackMessage;

/// Writes one line per replayed event, plus the board after each placement.
pub struct TerminalPrinter<W> {
    out: W,
    view: ReplayView,
    started: bool,
}

impl<W: Write> TerminalPrinter<W> {
    /// Creates a printer for a board of `words`.
    pub fn new(words: &[Word], out: W) -> Self {
        Self {
            out,
            view: ReplayView::new(words),
            started: false,
        }
    }

    /// The state rebuilt from the messages seen so far.
    #[must_use]
    pub const fn view(&self) -> &ReplayView {
        &self.view
    }

    /// Consumes the printer, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Renders one message. Returns true once the replay has ended, either
    /// by completing or by being stopped.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the writer fails.
    pub fn handle(&mut self, message: &PlaybackMessage) -> AppResult<bool> {
        match message {
            PlaybackMessage::Applied { index, event } => {
                self.view.apply(*index, event);
                self.write_event(*index, event)?;
                Ok(false)
            }
            PlaybackMessage::StateChanged(state) => {
                self.view.on_state_change(*state);
                match state {
                    PlaybackState::Running => {
                        self.started = true;
                        Ok(false)
                    }
                    PlaybackState::Paused => Ok(false),
                    PlaybackState::Completed => Ok(true),
                    PlaybackState::Idle => Ok(self.started),
                }
            }
            PlaybackMessage::Cleared => {
                self.view.clear();
                Ok(false)
            }
        }
    }

    fn write_event(&mut self, index: usize, event: &Event) -> AppResult<()> {
        let out = &mut self.out;
        match event {
            Event::Draw {
                letter,
                rarity,
                draw_count,
                ..
            } => writeln!(out, "[{index:>5}] draw      #{draw_count:<6} {letter} ({rarity})")?,
            Event::AdvancedDraw {
                letter,
                rarity,
                advanced_draw_count,
                ..
            } => writeln!(
                out,
                "[{index:>5}] advanced  #{advanced_draw_count:<6} {letter} ({rarity})"
            )?,
            Event::Placement { .. } => {
                writeln!(out, "[{index:>5}] placed")?;
                for line in self.view.render_board().lines() {
                    writeln!(out, "          {line}")?;
                }
            }
            Event::Synthesis {
                synthesis_count,
                items_used,
                synthesized_letter,
                powder_gain,
                powder_balance,
                ..
            } => {
                let used: String = items_used.iter().map(|l| l.as_char()).collect();
                writeln!(
                    out,
                    "[{index:>5}] synthesis #{synthesis_count:<6} {used} -> {synthesized_letter}  +{powder_gain} powder ({powder_balance})"
                )?;
            }
            Event::Complete {
                draw_count,
                advanced_draw_count,
                synthesis_count,
                powder_balance,
            } => {
                writeln!(
                    out,
                    "[{index:>5}] complete: {draw_count} draws, {advanced_draw_count} advanced, {synthesis_count} syntheses, {powder_balance} powder"
                )?;
                for line in self.view.render_board().lines() {
                    writeln!(out, "          {line}")?;
                }
            }
        }
        Ok(())
    }
}
