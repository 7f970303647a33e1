//! Per-frame scheduling of animation modules.
//!
//! The [`Scheduler`] owns its modules and hands out [`ModuleHandle`]s on
//! registration. Modules never see the scheduler; they are driven through
//! [`AnimModule::update`] once per tick with the frame timestamp and the
//! elapsed time since the previous tick, both in milliseconds.

use std::any::Any;

use crate::{style::StyleSurface, Result, ShapesError};

/// Timing handed to every module on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tick {
    /// Host timestamp of the current frame, in milliseconds.
    pub time: f64,
    /// Milliseconds since the previous tick (since 0 on the first tick).
    pub dt: f64,
}

/// Anything that does work once per frame.
pub trait AnimModule: Any {
    fn update(&mut self, tick: Tick, surface: &mut dyn StyleSurface) -> Result<()>;

    /// Short label used in log output.
    fn label(&self) -> &str;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Stable reference to a registered module. Stale handles (to a module that
/// was unregistered) never resolve to a module registered later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleHandle {
    index: usize,
    generation: u32,
}

struct Slot {
    generation: u32,
    module: Option<Box<dyn AnimModule>>,
}

/// Registry of modules driven once per display frame.
#[derive(Default)]
pub struct Scheduler {
    slots: Vec<Slot>,
    free: Vec<usize>,
    last_time: f64,
    ticks: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `module` and returns the handle that removes it.
    pub fn register<M: AnimModule>(&mut self, module: M) -> ModuleHandle {
        let module: Box<dyn AnimModule> = Box::new(module);
        tracing::debug!(module = module.label(), "registering module");

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.module = Some(module);
            return ModuleHandle {
                index,
                generation: slot.generation,
            };
        }

        self.slots.push(Slot {
            generation: 0,
            module: Some(module),
        });
        ModuleHandle {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Removes a module; it is not updated on any later tick.
    pub fn unregister(&mut self, handle: ModuleHandle) -> Option<Box<dyn AnimModule>> {
        let slot = self.slots.get_mut(handle.index)?;
        if slot.generation != handle.generation {
            return None;
        }
        let module = slot.module.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        tracing::debug!(module = module.label(), "unregistered module");
        Some(module)
    }

    pub fn contains(&self, handle: ModuleHandle) -> bool {
        self.slots
            .get(handle.index)
            .is_some_and(|slot| slot.generation == handle.generation && slot.module.is_some())
    }

    /// Typed access to a registered module, e.g. to change its configuration
    /// between ticks.
    pub fn module_mut<M: AnimModule>(&mut self, handle: ModuleHandle) -> Option<&mut M> {
        let slot = self.slots.get_mut(handle.index)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.module.as_mut()?.as_any_mut().downcast_mut::<M>()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.module.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Runs one frame: every registered module is updated in slot order. A
    /// module that fails is logged and skipped; the rest still run.
    pub fn tick(&mut self, now: f64, surface: &mut dyn StyleSurface) -> Tick {
        let tick = Tick {
            time: now,
            dt: now - self.last_time,
        };
        self.last_time = now;
        self.ticks += 1;

        for module in self.slots.iter_mut().filter_map(|slot| slot.module.as_mut()) {
            if let Err(err) = module.update(tick, surface) {
                tracing::warn!(module = module.label(), error = %err, time = now, "module update failed");
            }
        }
        tick
    }

    /// Drives ticks from `source` until it runs dry, calling `after_frame`
    /// once the modules of each frame have run. Returns the number of frames.
    pub fn start<F, S>(&mut self, source: &mut F, surface: &mut S, mut after_frame: impl FnMut(Tick)) -> u64
    where
        F: FrameSource + ?Sized,
        S: StyleSurface,
    {
        let mut frames = 0;
        while let Some(now) = source.next_frame() {
            let tick = self.tick(now, surface);
            after_frame(tick);
            frames += 1;
        }
        tracing::debug!(frames, "frame source finished");
        frames
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("modules", &self.len())
            .field("last_time", &self.last_time)
            .field("ticks", &self.ticks)
            .finish()
    }
}

/// A display-refresh signal: one monotonically increasing timestamp (ms) per
/// frame, `None` once the host goes away.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<f64>;
}

/// Synthetic refresh signal ticking at a fixed interval.
#[derive(Debug, Clone)]
pub struct FrameClock {
    time_ms: f64,
    interval_ms: f64,
    remaining: Option<u64>,
}

impl FrameClock {
    /// A clock at `fps` frames per second producing `frames` frames, or
    /// running forever when `frames` is `None`. `fps` must be positive and
    /// finite.
    pub fn new(fps: f64, frames: Option<u64>) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(ShapesError::InvalidInput("frame rate must be positive and finite"));
        }
        Ok(Self {
            time_ms: 0.0,
            interval_ms: 1000.0 / fps,
            remaining: frames,
        })
    }

    pub fn starting_at(mut self, time_ms: f64) -> Self {
        self.time_ms = time_ms - self.interval_ms;
        self
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }
}

impl FrameSource for FrameClock {
    fn next_frame(&mut self) -> Option<f64> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        self.time_ms += self.interval_ms;
        Some(self.time_ms)
    }
}

impl<I: Iterator<Item = f64>> FrameSource for std::iter::Fuse<I> {
    fn next_frame(&mut self) -> Option<f64> {
        self.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        contrast::{ContrastConfig, TextContrast},
        oscillator::{ColorShift, OscillatorConfig},
        style::{StyleTree, BACKGROUND_COLOR},
    };

    #[derive(Default)]
    struct Recorder {
        seen: Vec<Tick>,
        fail: bool,
    }

    impl AnimModule for Recorder {
        fn update(&mut self, tick: Tick, _surface: &mut dyn StyleSurface) -> Result<()> {
            self.seen.push(tick);
            if self.fail {
                return Err(ShapesError::msg("recorder told to fail"));
            }
            Ok(())
        }

        fn label(&self) -> &str {
            "recorder"
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn first_tick_delta_is_measured_from_zero() {
        let mut tree = StyleTree::new();
        let mut scheduler = Scheduler::new();
        let handle = scheduler.register(Recorder::default());

        scheduler.tick(5000.0, &mut tree);
        scheduler.tick(5016.0, &mut tree);

        let recorder = scheduler.module_mut::<Recorder>(handle).unwrap();
        assert_eq!(
            recorder.seen,
            vec![
                Tick { time: 5000.0, dt: 5000.0 },
                Tick { time: 5016.0, dt: 16.0 },
            ]
        );
    }

    #[test]
    fn unregistered_modules_stop_receiving_ticks() {
        let mut tree = StyleTree::new();
        let mut scheduler = Scheduler::new();
        let a = scheduler.register(Recorder::default());
        let b = scheduler.register(Recorder::default());

        scheduler.tick(16.0, &mut tree);
        let removed = scheduler.unregister(a);
        assert!(removed.is_some());
        assert!(scheduler.unregister(a).is_none());
        scheduler.tick(32.0, &mut tree);

        assert!(!scheduler.contains(a));
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.module_mut::<Recorder>(b).unwrap().seen.len(), 2);
    }

    #[test]
    fn stale_handles_do_not_reach_reused_slots() {
        let mut scheduler = Scheduler::new();
        let old = scheduler.register(Recorder::default());
        scheduler.unregister(old);
        let new = scheduler.register(Recorder::default());

        assert_ne!(old, new);
        assert!(scheduler.module_mut::<Recorder>(old).is_none());
        assert!(scheduler.module_mut::<Recorder>(new).is_some());
    }

    #[test]
    fn failing_module_does_not_abort_the_tick() {
        let mut tree = StyleTree::new();
        let mut scheduler = Scheduler::new();
        let bad = scheduler.register(Recorder {
            fail: true,
            ..Default::default()
        });
        let good = scheduler.register(Recorder::default());

        scheduler.tick(10.0, &mut tree);
        scheduler.tick(20.0, &mut tree);

        assert_eq!(scheduler.module_mut::<Recorder>(bad).unwrap().seen.len(), 2);
        assert_eq!(scheduler.module_mut::<Recorder>(good).unwrap().seen.len(), 2);
    }

    #[test]
    fn start_runs_until_the_source_ends() {
        let mut tree = StyleTree::new();
        let mut scheduler = Scheduler::new();
        let handle = scheduler.register(Recorder::default());

        let mut clock = FrameClock::new(50.0, Some(3)).unwrap();
        let mut after = Vec::new();
        let frames = scheduler.start(&mut clock, &mut tree, |tick| after.push(tick.time));

        assert_eq!(frames, 3);
        assert_eq!(after, vec![20.0, 40.0, 60.0]);
        let seen = &scheduler.module_mut::<Recorder>(handle).unwrap().seen;
        assert!(seen.iter().all(|tick| (tick.dt - 20.0).abs() < 1e-9));
    }

    #[test]
    fn synthetic_timestamps_drive_ticks() {
        let mut tree = StyleTree::new();
        let mut scheduler = Scheduler::new();
        scheduler.register(Recorder::default());
        let mut source = vec![1.0, 2.5, 7.0].into_iter().fuse();

        let frames = scheduler.start(&mut source, &mut tree, |_| {});
        assert_eq!(frames, 3);
        assert_eq!(scheduler.ticks(), 3);
    }

    #[test]
    fn frame_clock_can_start_at_an_offset() {
        let mut clock = FrameClock::new(10.0, Some(2)).unwrap().starting_at(1000.0);
        assert_eq!(clock.next_frame(), Some(1000.0));
        assert_eq!(clock.next_frame(), Some(1100.0));
        assert_eq!(clock.next_frame(), None);
    }

    #[test]
    fn frame_clock_rejects_unusable_rates() {
        for fps in [0.0, -30.0, f64::NAN, f64::INFINITY] {
            let err = FrameClock::new(fps, Some(1)).unwrap_err();
            assert!(matches!(err, ShapesError::InvalidInput(_)), "fps {fps}");
        }
    }

    #[test]
    fn contrast_follows_the_background_within_one_tick() {
        let mut tree = StyleTree::new();
        let root = tree.insert("html", None);
        let svg = tree.insert("svg", Some(root));

        let mut scheduler = Scheduler::new();
        // pale yellow, held still
        let background = scheduler.register(ColorShift::new(
            root,
            OscillatorConfig {
                starting_hue: Some(60.0),
                hue_speed_rpm: 0.0,
                sat_min: 100.0,
                sat_max: 100.0,
                light_min: 75.0,
                light_max: 75.0,
                ..Default::default()
            },
        ));
        scheduler.register(TextContrast::new(svg, ContrastConfig::targeting("--line")));

        scheduler.tick(16.0, &mut tree);
        assert_eq!(
            tree.property(root, BACKGROUND_COLOR),
            Some("hsl(60.0, 100.0%, 75.0%)")
        );
        assert_eq!(tree.property(svg, "--line"), Some("#000000"));

        let shift = scheduler.module_mut::<ColorShift>(background).unwrap();
        shift.config.light_min = 20.0;
        shift.config.light_max = 20.0;

        scheduler.tick(32.0, &mut tree);
        assert_eq!(
            tree.property(root, BACKGROUND_COLOR),
            Some("hsl(60.0, 100.0%, 20.0%)")
        );
        assert_eq!(tree.property(svg, "--line"), Some("#ffffff"));
    }
}
