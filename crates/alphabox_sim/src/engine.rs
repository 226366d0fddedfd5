//! # Simulation Engine
//!
//! Runs one game from an empty inventory to completion and records every
//! state change in an [`EventLog`].
//!
//! ## The Loop
//!
//! ```text
//!            ┌──────────────────────────────────────────────────────────┐
//!            ▼                                                          │
//!     normal box ──> advanced box? ──> place ──> complete? ──yes──> done│
//!                                                  │ no                 │
//!                                                  ▼                    │
//!                                   total >= 5 && eligible >= 1 ? ──no──┤
//!                                                  │ yes                │
//!                                                  ▼                    │
//!                                  synthesize ──> place ──> complete? ──┘
//!                                                              │ yes
//!                                                              ▼
//!                                                             done
//! ```
//!
//! ## Completion
//!
//! A run completes when the powder balance covers the acquisition cost of
//! the slots that are still empty (`powder >= required`). This is not the
//! same as a full board: a run may finish with empty slots if enough powder
//! has piled up to pay for them.
//!
//! ## State
//!
//! All mutable state of a run lives in a private per-run value created by
//! [`SimulationEngine::run`] and dropped when it returns. The engine itself
//! is immutable, so one engine can serve any number of runs, sequentially
//! or from several threads.

use crate::board::Board;
use crate::catalog::Catalog;
use crate::config::SimConfig;
use crate::cost::RequiredCost;
use crate::draw::{DrawMode, RandomSource, WeightedDraw};
use crate::error::{SimError, SimResult};
use crate::event::{Event, EventLog};
use crate::inventory::Inventory;
use crate::rarity::RaritySet;

/// Letters burned by one synthesis.
pub const SYNTHESIS_INPUT: u32 = 5;

/// Runs simulations over a catalog.
#[derive(Clone, Debug, Default)]
pub struct SimulationEngine {
    catalog: Catalog,
    max_draws: Option<u64>,
}

impl SimulationEngine {
    /// Creates an unbounded engine.
    #[must_use]
    pub const fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            max_draws: None,
        }
    }

    /// Creates an engine over the reference catalog.
    #[must_use]
    pub fn reference() -> Self {
        Self::new(Catalog::reference())
    }

    /// Bounds the number of normal boxes a run may open. A run that hits
    /// the bound fails with `SimError::DrawLimitExceeded`.
    #[must_use]
    pub const fn with_max_draws(mut self, max_draws: u64) -> Self {
        self.max_draws = Some(max_draws);
        self
    }

    /// The catalog runs are played on.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Runs one game to completion.
    ///
    /// # Errors
    ///
    /// Fails before the first draw if `config` does not validate against the
    /// catalog, and with `SimError::DrawLimitExceeded` if a bounded engine
    /// runs out of draws.
    pub fn run<R: RandomSource + ?Sized>(
        &self,
        config: &SimConfig,
        rng: &mut R,
    ) -> SimResult<EventLog> {
        config.validate(&self.catalog)?;

        let drawer = WeightedDraw::new(self.catalog.rarities());
        let advanced_threshold = config.advanced_box_probability / 100.0;
        let mut run = RunState::new(&self.catalog, config);

        tracing::info!(
            "Run started: {} word(s), required powder {}, advanced {}%, fuel {}",
            config.selected_words.iter().filter(|&&s| s).count(),
            run.cost.initial(),
            config.advanced_box_probability,
            config.synthesis_eligible
        );

        loop {
            if let Some(limit) = self.max_draws {
                if run.draws >= limit {
                    tracing::warn!("Run abandoned after {} draws without completing", limit);
                    return Err(SimError::DrawLimitExceeded(limit));
                }
            }

            run.open_normal_box(&drawer, rng);
            if rng.next_f64() < advanced_threshold {
                run.open_advanced_box(&drawer, rng);
            }

            if run.place_and_check() {
                break;
            }

            if run.can_synthesize() {
                run.synthesize(&drawer, rng);
                if run.place_and_check() {
                    break;
                }
            }
        }

        tracing::info!(
            "Run complete: {} draws, {} advanced, {} syntheses, {} powder ({} events)",
            run.draws,
            run.advanced_draws,
            run.syntheses,
            run.powder,
            run.log.len()
        );

        Ok(run.log)
    }
}

/// Mutable state of a single run.
struct RunState<'c> {
    catalog: &'c Catalog,
    eligible: RaritySet,
    inventory: Inventory,
    board: Board,
    cost: RequiredCost,
    powder: u64,
    draws: u64,
    advanced_draws: u64,
    syntheses: u64,
    log: EventLog,
}

impl<'c> RunState<'c> {
    fn new(catalog: &'c Catalog, config: &SimConfig) -> Self {
        let board = Board::new(catalog.words(), &config.selected_words);
        let cost = RequiredCost::for_board(&board, catalog.rarities());
        Self {
            catalog,
            eligible: config.synthesis_eligible,
            inventory: Inventory::new(catalog.rarities()),
            board,
            cost,
            powder: 0,
            draws: 0,
            advanced_draws: 0,
            syntheses: 0,
            log: EventLog::default(),
        }
    }

    fn open_normal_box<R: RandomSource + ?Sized>(&mut self, drawer: &WeightedDraw<'_>, rng: &mut R) {
        self.draws += 1;
        let drawn = drawer.draw(DrawMode::Normal, rng);
        self.inventory.add(drawn.letter);
        self.log.push(Event::Draw {
            letter: drawn.letter,
            rarity: drawn.rarity,
            draw_count: self.draws,
            inventory_snapshot: self.inventory.clone(),
        });
    }

    fn open_advanced_box<R: RandomSource + ?Sized>(
        &mut self,
        drawer: &WeightedDraw<'_>,
        rng: &mut R,
    ) {
        self.advanced_draws += 1;
        let drawn = drawer.draw(DrawMode::Advanced, rng);
        self.inventory.add(drawn.letter);
        self.log.push(Event::AdvancedDraw {
            letter: drawn.letter,
            rarity: drawn.rarity,
            advanced_draw_count: self.advanced_draws,
            inventory_snapshot: self.inventory.clone(),
        });
    }

    /// Placement pass followed by the completion test. Returns true once the
    /// run is complete (the `complete` event has been recorded).
    fn place_and_check(&mut self) -> bool {
        let filled = self
            .board
            .place_from(&mut self.inventory, self.catalog.rarities(), &mut self.cost);
        if filled > 0 {
            tracing::debug!(
                "Placed {} letter(s), {} powder still required",
                filled,
                self.cost.remaining()
            );
            self.log.push(Event::Placement {
                board_snapshot: self.board.snapshot(),
                inventory_snapshot: self.inventory.clone(),
            });
        }

        if !self.cost.is_covered_by(self.powder) {
            return false;
        }

        if !self.board.is_filled() {
            tracing::debug!(
                "Powder {} covers the remaining {} with empty slots on the board",
                self.powder,
                self.cost.remaining()
            );
        }
        self.log.push(Event::Complete {
            draw_count: self.draws,
            advanced_draw_count: self.advanced_draws,
            synthesis_count: self.syntheses,
            powder_balance: self.powder,
        });
        true
    }

    fn can_synthesize(&self) -> bool {
        self.inventory.total() >= SYNTHESIS_INPUT && self.inventory.total_in(self.eligible) >= 1
    }

    fn synthesize<R: RandomSource + ?Sized>(&mut self, drawer: &WeightedDraw<'_>, rng: &mut R) {
        self.syntheses += 1;

        let used = self.inventory.take_fuel(self.eligible, SYNTHESIS_INPUT);
        debug_assert_eq!(used.len(), SYNTHESIS_INPUT as usize);
        let table = self.catalog.rarities();
        let powder_gain: u64 = used.iter().map(|u| table.powder_value(u.rarity)).sum();

        let bonus = drawer.draw(DrawMode::SynthesisYield, rng);
        self.inventory.add(bonus.letter);
        self.powder += powder_gain;

        tracing::debug!(
            "Synthesis #{}: +{} powder ({} total), bonus {} ({})",
            self.syntheses,
            powder_gain,
            self.powder,
            bonus.letter,
            bonus.rarity
        );

        self.log.push(Event::Synthesis {
            synthesis_count: self.syntheses,
            items_used: used.iter().map(|u| u.letter).collect(),
            synthesized_letter: bonus.letter,
            powder_gain,
            powder_balance: self.powder,
            inventory_snapshot: self.inventory.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{RngSource, SequenceSource};
    use crate::event::EventKind;
    use crate::rarity::{Letter, Rarity};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn seeded(seed: u64) -> RngSource<ChaCha8Rng> {
        RngSource::new(ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_invalid_config_fails_before_drawing() {
        let engine = SimulationEngine::reference();
        let config = SimConfig::default().with_eligible(RaritySet::EMPTY);
        let mut rng = SequenceSource::constant(0.5);

        assert_eq!(engine.run(&config, &mut rng), Err(SimError::NoEligibleRarities));
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn test_run_ends_with_single_complete() {
        let engine = SimulationEngine::reference();
        let config = SimConfig::default();
        let log = engine.run(&config, &mut seeded(1)).unwrap();

        assert!(log.is_complete());
        assert_eq!(log.count(EventKind::Complete), 1);
        let summary = log.summary().unwrap();
        assert_eq!(summary.draw_count, log.count(EventKind::Draw) as u64);
        assert_eq!(summary.advanced_draw_count, log.count(EventKind::AdvancedDraw) as u64);
        assert_eq!(summary.synthesis_count, log.count(EventKind::Synthesis) as u64);
    }

    #[test]
    fn test_same_source_same_log() {
        let engine = SimulationEngine::reference();
        let config = SimConfig::default().select_only(5, &[0]);
        let a = engine.run(&config, &mut seeded(99)).unwrap();
        let b = engine.run(&config, &mut seeded(99)).unwrap();
        assert_eq!(a, b);
    }

    /// Single common word "BE": scripted samples make the run fully
    /// predictable.
    #[test]
    fn test_scripted_run() {
        let rarities = crate::rarity::RarityTable::reference();
        let catalog = Catalog::new(rarities, vec![crate::board::Word::new("BE").unwrap()]).unwrap();
        let engine = SimulationEngine::new(catalog);
        let config = SimConfig::for_catalog(engine.catalog()).with_advanced_probability(0.0);

        // Each iteration: tier roll, letter pick, advanced roll.
        // Common letters in order: B E R C ... ; 17 of them.
        let pick = |i: f64| (i + 0.5) / 17.0;
        let mut rng = SequenceSource::new(vec![
            0.0, pick(0.0), 0.5, // draw B -> placed
            0.0, pick(1.0), 0.5, // draw E -> placed, required 0 -> complete
        ]);

        let log = engine.run(&config, &mut rng).unwrap();
        let kinds: Vec<EventKind> = log.iter().map(Event::kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Draw,
                EventKind::Placement,
                EventKind::Draw,
                EventKind::Placement,
                EventKind::Complete,
            ]
        );
        assert_eq!(
            log.summary().unwrap(),
            crate::event::RunSummary {
                draw_count: 2,
                advanced_draw_count: 0,
                synthesis_count: 0,
                powder_balance: 0,
                event_count: 5,
            }
        );
    }

    #[test]
    fn test_synthesis_burns_five_and_yields_one() {
        let engine = SimulationEngine::reference();
        let config = SimConfig::default();
        let log = engine.run(&config, &mut seeded(5)).unwrap();

        let mut previous_total = 0u32;
        for event in &log {
            if let Event::Synthesis {
                items_used,
                inventory_snapshot,
                powder_gain,
                ..
            } = event
            {
                assert_eq!(items_used.len(), 5);
                assert_eq!(inventory_snapshot.total() + 4, previous_total);
                let table = engine.catalog().rarities();
                let expected: u64 = items_used
                    .iter()
                    .filter_map(|&l| table.rarity_of(l))
                    .map(|r| table.powder_value(r))
                    .sum();
                assert_eq!(*powder_gain, expected);
            }
            if let Some(inventory) = event.inventory() {
                previous_total = inventory.total();
            }
        }
        assert!(log.count(EventKind::Synthesis) > 0);
    }

    #[test]
    fn test_only_eligible_fuel_starts_a_synthesis() {
        let engine = SimulationEngine::reference();
        let config = SimConfig::default().with_eligible(RaritySet::only(Rarity::Rare));
        let log = engine.run(&config, &mut seeded(11)).unwrap();
        let table = engine.catalog().rarities();

        for event in &log {
            if let Event::Synthesis { items_used, .. } = event {
                assert!(items_used
                    .iter()
                    .any(|&l| table.rarity_of(l) == Some(Rarity::Rare)));
            }
        }
    }

    #[test]
    fn test_zero_advanced_probability_never_opens_advanced_boxes() {
        let engine = SimulationEngine::reference();
        let config = SimConfig::default()
            .select_only(5, &[0])
            .with_advanced_probability(0.0);
        for seed in 0..5 {
            let log = engine.run(&config, &mut seeded(seed)).unwrap();
            assert_eq!(log.count(EventKind::AdvancedDraw), 0);
        }
    }

    #[test]
    fn test_draw_limit() {
        // Only 'B' and 'K' are ever drawn, neither needed by STAR: the run can
        // only finish through synthesis powder, which a 3-draw bound cuts off.
        let engine = SimulationEngine::reference().with_max_draws(3);
        let config = SimConfig::default().select_only(5, &[0]);
        let mut rng = SequenceSource::constant(0.0);
        assert_eq!(engine.run(&config, &mut rng), Err(SimError::DrawLimitExceeded(3)));
    }

    #[test]
    fn test_forced_common_fuel_completes_by_powder() {
        // Every sample 0.0: normal box -> 'B', advanced roll 0.0 < 0.01 ->
        // advanced box 'K', synthesis yield -> 'B'. No STAR letter is ever
        // drawn, so powder alone has to cover S + T + A + R.
        let engine = SimulationEngine::reference();
        let config = SimConfig::default().select_only(5, &[0]);
        let mut rng = SequenceSource::constant(0.0);
        let log = engine.run(&config, &mut rng).unwrap();

        let summary = log.summary().unwrap();
        assert!(summary.powder_balance >= 8100);
        assert_eq!(log.count(EventKind::Placement), 0);
        let k = Letter::new('K').unwrap();
        assert!(log.iter().any(|e| matches!(e, Event::AdvancedDraw { letter, .. } if *letter == k)));
    }
}
