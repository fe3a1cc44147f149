use std::fmt::Write as _;
use std::time::{Duration, Instant};

use smallvec::SmallVec;
use tracing::{debug, info, trace};

use crate::clock::{FrameClock, SystemClock};
use crate::config::SpinConfig;
use crate::constants::LOOP_TIME;
use crate::error::ReelResult;
use crate::events::SpinEvent;
use crate::machine::SlotMachine;
use crate::platform;
use crate::symbols::{SymbolAlphabet, SymbolKind};
use crate::systems::{Blur, ReelSurface, SymbolPlacement, SystemTimings};

/// Frames between periodic timing summaries.
const SUMMARY_PERIOD: u64 = 60 * 10;

/// Draws the reels as text, one row per reel, with the symbol nearest the payline in brackets.
#[derive(Debug, Default)]
pub struct TextSurface {
    rows: SmallVec<[TextRow; 4]>,
}

#[derive(Debug, Default, Clone)]
struct TextRow {
    symbols: SmallVec<[(f32, Option<SymbolKind>); 4]>,
    blur: Blur,
}

impl TextSurface {
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Renders the current frame; blurred reels are marked with `~`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            let mut symbols = row.symbols.clone();
            symbols.sort_by(|a, b| a.0.total_cmp(&b.0));

            let payline = symbols
                .iter()
                .enumerate()
                .min_by(|a, b| a.1 .0.abs().total_cmp(&b.1 .0.abs()))
                .map(|(i, _)| i);

            out.push('|');
            for (i, (_, kind)) in symbols.iter().enumerate() {
                let name = kind.map_or("?", SymbolKind::name);
                if Some(i) == payline {
                    let _ = write!(out, " [{name:^6}]");
                } else {
                    let _ = write!(out, "  {name:^6} ");
                }
            }
            out.push_str(if row.blur.is_none() { " |" } else { " ~" });
            out.push('\n');
        }
        out
    }

    fn row(&mut self, reel: usize) -> &mut TextRow {
        if self.rows.len() <= reel {
            self.rows.resize(reel + 1, TextRow::default());
        }
        &mut self.rows[reel]
    }
}

impl ReelSurface for TextSurface {
    fn place_symbol(&mut self, placement: &SymbolPlacement) {
        self.row(placement.reel).symbols.push((placement.origin.y, placement.kind));
    }

    fn apply_blur(&mut self, reel: usize, blur: Blur) {
        self.row(reel).blur = blur;
    }
}

/// Drives a [`SlotMachine`] in real time: spins whenever the reels come to rest, until the
/// requested number of spins has been played out.
pub struct App {
    pub machine: SlotMachine,
    clock: SystemClock,
    surface: TextSurface,
    spins_remaining: usize,
    last_tick: Instant,
}

impl App {
    pub fn new(config: SpinConfig, spins: usize) -> ReelResult<Self> {
        info!(spins, "Initializing reel demo");
        let machine = SlotMachine::new(config, SymbolAlphabet::standard())?;

        Ok(App {
            machine,
            clock: SystemClock::new(),
            surface: TextSurface::default(),
            spins_remaining: spins,
            last_tick: Instant::now(),
        })
    }

    /// Runs a single frame and sleeps out the rest of [`LOOP_TIME`].
    ///
    /// # Returns
    ///
    /// `true` while there are spins left to play, `false` once the last one has stopped.
    pub fn run(&mut self) -> ReelResult<bool> {
        let start = Instant::now();
        let dt = self.last_tick.elapsed();
        self.last_tick = start;
        trace!(dt = ?dt, "Frame");

        if !self.machine.is_spinning() {
            if self.spins_remaining == 0 {
                self.log_summary();
                return Ok(false);
            }
            let now = self.clock.elapsed();
            if self.machine.request_spin(now)? {
                self.spins_remaining -= 1;
            }
        }

        self.machine.tick_with(&mut self.clock);

        self.surface.clear();
        self.machine.present(&mut self.surface);

        for event in self.machine.drain_events() {
            match event {
                SpinEvent::Started { stops } => {
                    debug!(stops = ?stops, remaining = self.spins_remaining, "Reels released");
                }
                SpinEvent::Stopped { payline } => {
                    let names = payline
                        .iter()
                        .map(|kind| kind.map_or("?", SymbolKind::name))
                        .collect::<Vec<_>>();
                    info!(payline = ?names, jackpot = is_jackpot(&payline), "Reels came to rest\n{}", self.surface.render());
                }
            }
        }

        if self.machine.frame_time().frame % SUMMARY_PERIOD == 0 {
            self.log_summary();
        }

        if start.elapsed() < LOOP_TIME {
            let time = LOOP_TIME.saturating_sub(start.elapsed());
            if time != Duration::ZERO {
                platform::sleep(time);
            }
        }

        Ok(true)
    }

    fn log_summary(&self) {
        let frames = self.machine.frame_time().frame;
        let timings = self.machine.world.resource::<SystemTimings>();
        debug!("{}", timings.summary(frames));
    }
}

/// Whether a payline shows the same symbol on every reel.
pub fn is_jackpot(payline: &[Option<SymbolKind>]) -> bool {
    match payline.first() {
        Some(Some(first)) => payline.iter().all(|kind| *kind == Some(*first)),
        _ => false,
    }
}
