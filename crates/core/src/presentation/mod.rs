//! Ambient presentation mode: cycles through preset shape combos.
//!
//! [`Presentation`] is polled with frame timestamps. Every interval it fades
//! the canvas out, then after the fade duration shows the next combo drawn
//! from a [`ComboDeck`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{config::PresentationConfig, scene::ShapeVisibility, Result, ShapesError};

/// Preset shape combinations shown in presentation mode.
pub static COMBOS: [&[&str]; 14] = [
    &["doubleSquare", "hexagon"],
    &["nonagon", "nonagram_9_2", "nonagram_9_4", "tripleTriangle"],
    &["pentagram", "pentagon", "heptagram_7_2", "heptagram_7_3", "heptagon"],
    &["heptagram_7_2", "nonagram_9_2"],
    &["triangleUp", "hexagon", "nonagram_9_2"],
    &["hexagon", "heptagram_7_3", "nonagram_9_2"],
    &["tripleTriangle", "pentagon", "heptagram_7_2"],
    &["heptagon", "heptagram_7_2", "heptagram_7_3"],
    &["hexagon", "triangleUp"],
    &["octagram", "octagon", "doubleSquare"],
    &["tripleTriangle", "nonagram_9_2"],
    &["hexagon", "heptagon", "octagon", "nonagon"],
    &["doubleTriangle", "nonagram_9_4"],
    &["pentagram", "heptagram_7_3", "nonagram_9_4"],
];

/// Draws combo indices at random without repeats until all have been shown,
/// then reshuffles. The combo shown last is never drawn first after a
/// reshuffle.
#[derive(Debug, Clone)]
pub struct ComboDeck {
    len: usize,
    current: usize,
    shown: Vec<usize>,
    rng: StdRng,
}

impl ComboDeck {
    pub fn new(len: usize, mut rng: StdRng) -> Result<Self> {
        if len == 0 {
            return Err(ShapesError::InvalidInput("combo deck needs at least one combo"));
        }
        let current = rng.gen_range(0..len);
        Ok(Self {
            len,
            current,
            shown: vec![current],
            rng,
        })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn draw(&mut self) -> usize {
        if self.shown.len() >= self.len {
            self.shown.clear();
        }

        let mut candidates: Vec<usize> = (0..self.len).filter(|i| !self.shown.contains(i)).collect();
        if self.shown.is_empty() && self.len > 1 {
            candidates.retain(|&i| i != self.current);
        }

        let next = candidates[self.rng.gen_range(0..candidates.len())];
        self.shown.push(next);
        self.current = next;
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationEvent {
    /// The canvas should start fading out.
    FadeOut,
    /// The combo at this index of [`COMBOS`] is now showing; fade back in.
    Show(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Showing,
    FadingOut { since: f64 },
    Stopped,
}

#[derive(Debug, Clone)]
pub struct Presentation {
    config: PresentationConfig,
    deck: ComboDeck,
    phase: Phase,
    next_fade_at: f64,
}

impl Presentation {
    pub fn new(config: PresentationConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: PresentationConfig, rng: StdRng) -> Result<Self> {
        Ok(Self {
            deck: ComboDeck::new(COMBOS.len(), rng)?,
            next_fade_at: config.interval_ms,
            config,
            phase: Phase::Showing,
        })
    }

    /// Shows the deck's first combo and starts the interval timer at `now`.
    pub fn begin(&mut self, now: f64) -> PresentationEvent {
        self.phase = Phase::Showing;
        self.next_fade_at = now + self.config.interval_ms;
        let index = self.deck.current();
        tracing::info!(combo = ?COMBOS[index], "presentation started");
        PresentationEvent::Show(index)
    }

    /// Advances the timers. The interval keeps its own cadence, independent of
    /// the fade.
    pub fn poll(&mut self, now: f64) -> Option<PresentationEvent> {
        match self.phase {
            Phase::Stopped => None,
            Phase::Showing if now >= self.next_fade_at => {
                self.phase = Phase::FadingOut { since: now };
                self.next_fade_at += self.config.interval_ms;
                Some(PresentationEvent::FadeOut)
            }
            Phase::Showing => None,
            Phase::FadingOut { since } if now - since >= self.config.fade_ms => {
                self.phase = Phase::Showing;
                Some(self.show_next())
            }
            Phase::FadingOut { .. } => None,
        }
    }

    /// Manual "next": switches immediately, cancels a pending fade and
    /// restarts the interval at `now`.
    pub fn advance(&mut self, now: f64) -> Option<PresentationEvent> {
        if self.phase == Phase::Stopped {
            return None;
        }
        self.phase = Phase::Showing;
        self.next_fade_at = now + self.config.interval_ms;
        Some(self.show_next())
    }

    pub fn stop(&mut self) {
        self.phase = Phase::Stopped;
        tracing::info!("presentation stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.phase == Phase::Stopped
    }

    pub fn is_fading(&self) -> bool {
        matches!(self.phase, Phase::FadingOut { .. })
    }

    pub fn current(&self) -> usize {
        self.deck.current()
    }

    fn show_next(&mut self) -> PresentationEvent {
        let index = self.deck.draw();
        tracing::info!(combo = ?COMBOS[index], "current combo");
        PresentationEvent::Show(index)
    }
}

/// Shows exactly the shapes of combo `index`.
pub fn apply_combo(index: usize, visibility: &mut ShapeVisibility) -> Result<()> {
    let combo: &[&str] = COMBOS
        .get(index)
        .ok_or(ShapesError::InvalidInput("combo index out of range"))?;
    visibility.apply_combo(combo);
    Ok(())
}
