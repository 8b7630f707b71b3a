//! Scripted shows. A [`Demo`] holds triggers scheduled against its own
//! clock; the host advances it every frame and fires whatever came due.
//! [`Cycle`] is the endless screensaver mode.

use crate::catalog::{self, FireworkKind, FireworkType, SPARKLE_COLORS, Tint};
use crate::sim::explosion::uniform;
use crate::sim::{Bounds, EventSink, Simulation};

const LAUNCH_X: (f32, f32) = (0.12, 0.88);
const LAUNCH_FLOOR: f32 = 20.0;
const APEX: (f32, f32) = (0.12, 0.62);
const PREVIEW_Y: (f32, f32) = (0.35, 0.55);

const OPENING_DELAY: f32 = 0.8;
const OPENING_BURSTS: usize = 20;
const OPENING_X: (f32, f32) = (0.3, 0.7);
const OPENING_Y: (f32, f32) = (0.18, 0.33);
const OPENING_SIZE: f32 = 0.6;
const OPENING_MULTI_CHANCE: f32 = 0.4;

const AUTO_SHOW_DELAY: f32 = 0.6;

const CYCLE_FIRST: f32 = 0.5;
const CYCLE_GAP: (f32, f32) = (0.3, 1.1);

/// A request to put something in the sky.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Trigger {
    Launch {
        x: f32,
        y: f32,
        apex_y: f32,
        kind: FireworkType,
    },
    Burst {
        x: f32,
        y: f32,
        kind: FireworkType,
    },
}

impl Trigger {
    /// A rocket from a random spot along the bottom edge.
    pub fn launch(bounds: Bounds, kind: &FireworkType, rng: &mut fastrand::Rng) -> Self {
        Trigger::Launch {
            x: bounds.width * uniform(rng, LAUNCH_X),
            y: bounds.height - LAUNCH_FLOOR,
            apex_y: bounds.height * uniform(rng, APEX),
            kind: *kind,
        }
    }

    /// A burst near the middle of the sky.
    pub fn preview(bounds: Bounds, kind: &FireworkType, rng: &mut fastrand::Rng) -> Self {
        Trigger::Burst {
            x: bounds.width / 2.0,
            y: bounds.height * uniform(rng, PREVIEW_Y),
            kind: *kind,
        }
    }

    pub fn fire(&self, sim: &mut Simulation, sink: &mut dyn EventSink) {
        match *self {
            Trigger::Launch { x, y, apex_y, kind } => {
                log::debug!("launch {} at ({x:.0}, {y:.0}) apex {apex_y:.0}", kind.id);
                sim.launch(x, y, apex_y, &kind, sink);
            }
            Trigger::Burst { x, y, kind } => {
                let sparks = sim.burst(x, y, &kind, sink);
                log::debug!("burst {} at ({x:.0}, {y:.0}), {sparks} sparks", kind.id);
            }
        }
    }
}

#[derive(Debug)]
struct Cue {
    at: f32,
    trigger: Trigger,
}

#[derive(Debug, Default)]
pub struct Demo {
    clock: f32,
    cues: Vec<Cue>,
}

impl Demo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires `trigger` `delay` seconds from now. Cues due at the same time
    /// come out in the order they were scheduled.
    pub fn schedule(&mut self, delay: f32, trigger: Trigger) {
        let at = self.clock + delay.max(0.0);
        let idx = self.cues.partition_point(|c| c.at <= at);
        self.cues.insert(idx, Cue { at, trigger });
    }

    /// Moves the clock forward and hands back every cue that came due.
    pub fn advance(&mut self, dt: f32) -> Vec<Trigger> {
        if self.cues.is_empty() {
            self.clock = 0.0;
            return Vec::new();
        }
        self.clock += dt.max(0.0);
        let due = self.cues.partition_point(|c| c.at <= self.clock);
        self.cues.drain(..due).map(|c| c.trigger).collect()
    }

    pub fn pending(&self) -> usize {
        self.cues.len()
    }

    pub fn is_idle(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn cancel(&mut self) {
        self.cues.clear();
    }

    /// The welcome sparkle: a cluster of small bursts high in the sky.
    pub fn opening(&mut self, bounds: Bounds, rng: &mut fastrand::Rng) {
        for _ in 0..OPENING_BURSTS {
            let x = bounds.width * uniform(rng, OPENING_X);
            let y = bounds.height * uniform(rng, OPENING_Y);
            let color = SPARKLE_COLORS[rng.usize(0..SPARKLE_COLORS.len())];
            let tint = if rng.f32() < OPENING_MULTI_CHANCE {
                Tint::Multi
            } else {
                Tint::Solid(color)
            };
            let kind = FireworkType::custom(tint, OPENING_SIZE);
            self.schedule(OPENING_DELAY, Trigger::Burst { x, y, kind });
        }
    }

    /// Picks a kind at random and sends up its first type shortly after.
    pub fn auto_show(&mut self, bounds: Bounds, rng: &mut fastrand::Rng) -> &'static FireworkKind {
        let kind = catalog::random_kind(rng);
        let trigger = Trigger::launch(bounds, kind.default_type(), rng);
        self.schedule(AUTO_SHOW_DELAY, trigger);
        kind
    }
}

/// Endless random launches, one every 0.3 to 1.1 seconds.
#[derive(Debug)]
pub struct Cycle {
    time: f32,
    next_launch: f32,
}

impl Default for Cycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Cycle {
    pub fn new() -> Self {
        Self {
            time: 0.0,
            next_launch: CYCLE_FIRST,
        }
    }

    pub fn advance(&mut self, dt: f32, bounds: Bounds, rng: &mut fastrand::Rng) -> Option<Trigger> {
        self.time += dt.max(0.0);
        // Keep the clock small enough for f32 precision.
        if self.time > 10000.0 {
            self.time -= 10000.0;
            self.next_launch -= 10000.0;
        }

        if self.time < self.next_launch {
            return None;
        }
        self.next_launch = self.time + uniform(rng, CYCLE_GAP);
        Some(Trigger::launch(bounds, catalog::random_type(rng), rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Bounds = Bounds {
        width: 1280.0,
        height: 720.0,
    };

    fn burst_at(x: f32) -> Trigger {
        Trigger::Burst {
            x,
            y: 0.0,
            kind: FireworkType::custom(Tint::Multi, 1.0),
        }
    }

    #[test]
    fn cues_fire_once_in_time_order() {
        let mut demo = Demo::new();
        demo.schedule(0.5, burst_at(2.0));
        demo.schedule(0.2, burst_at(1.0));
        demo.schedule(0.5, burst_at(3.0));

        assert!(demo.advance(0.1).is_empty());
        assert_eq!(demo.advance(0.15), vec![burst_at(1.0)]);
        assert_eq!(demo.advance(0.3), vec![burst_at(2.0), burst_at(3.0)]);
        assert!(demo.advance(1.0).is_empty());
        assert!(demo.is_idle());
    }

    #[test]
    fn opening_is_twenty_small_bursts() {
        let mut rng = fastrand::Rng::with_seed(8);
        let mut demo = Demo::new();
        demo.opening(BOUNDS, &mut rng);
        assert_eq!(demo.pending(), 20);
        assert!(demo.advance(0.5).is_empty());

        let due = demo.advance(0.4);
        assert_eq!(due.len(), 20);
        for t in due {
            let Trigger::Burst { x, y, kind } = t else {
                panic!("opening only bursts");
            };
            assert_eq!(kind.size, 0.6);
            assert!((0.3 * 1280.0..=0.7 * 1280.0).contains(&x));
            assert!((0.18 * 720.0..=0.33 * 720.0).contains(&y));
        }
    }

    #[test]
    fn auto_show_launches_first_type() {
        let mut rng = fastrand::Rng::with_seed(4);
        let mut demo = Demo::new();
        let kind = demo.auto_show(BOUNDS, &mut rng);

        let due = demo.advance(0.7);
        assert_eq!(due.len(), 1);
        let Trigger::Launch { y, apex_y, kind: ty, .. } = due[0] else {
            panic!("auto show launches a rocket");
        };
        assert_eq!(ty.id, kind.default_type().id);
        assert_eq!(y, 700.0);
        assert!(apex_y < y);
    }

    #[test]
    fn cancel_drops_pending_cues() {
        let mut rng = fastrand::Rng::with_seed(4);
        let mut demo = Demo::new();
        demo.opening(BOUNDS, &mut rng);
        demo.cancel();
        assert!(demo.advance(5.0).is_empty());
    }

    #[test]
    fn cycle_launches_regularly() {
        let mut rng = fastrand::Rng::with_seed(6);
        let mut cycle = Cycle::new();
        let mut launches = 0;
        for _ in 0..600 {
            if let Some(t) = cycle.advance(1.0 / 60.0, BOUNDS, &mut rng) {
                assert!(matches!(t, Trigger::Launch { .. }));
                launches += 1;
            }
        }
        // Ten seconds at one launch every 0.3..1.1 s.
        assert!((9..=33).contains(&launches), "{launches} launches");
    }

    #[test]
    fn fired_triggers_reach_the_simulation() {
        let mut rng = fastrand::Rng::with_seed(1);
        let mut sim = Simulation::with_seed(BOUNDS, 1);
        let kind = catalog::CATALOG[0].default_type();

        Trigger::launch(BOUNDS, kind, &mut rng).fire(&mut sim, &mut ());
        Trigger::preview(BOUNDS, kind, &mut rng).fire(&mut sim, &mut ());

        let counts = sim.counts();
        assert_eq!(counts.rockets, 1);
        assert_eq!(counts.smoke, 2);
        assert!(counts.sparks >= 50);
    }
}
