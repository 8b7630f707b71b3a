//! Fireworks particle simulation.
//!
//! Everything on screen is an [`Effect`]: rockets on their way up, sparks
//! thrown out by a burst and the smoke puffs left behind. [`step`] advances
//! a collection of them by one clamped time increment and hands back what is
//! still alive. [`Simulation`] bundles the collection with its bounds and
//! random source for callers that drive it frame by frame.
//!
//! Coordinates are screen-style: `y` grows downward.

pub mod effect;
pub mod event;
pub mod explosion;

pub use effect::{Effect, Rocket, Smoke, Spark};
pub use event::{EventSink, SimEvent};

use crate::catalog::FireworkType;
use explosion::uniform;

/// Longest time increment a single step will integrate (50 ms).
pub const MAX_STEP: f32 = 0.05;

pub const SPARK_GRAVITY: f32 = 220.0;
const SPARK_DRAG_X: f32 = 0.995;
const SPARK_DRAG_Y: f32 = 0.998;

/// How far past the sides or bottom a spark may travel before it is dropped.
pub const OFFSCREEN_MARGIN: f32 = 80.0;

const FLIGHT_TIME: (f32, f32) = (0.7, 1.4);
const LAUNCH_SMOKE_OFFSET: f32 = 8.0;

/// Visible area in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Sparks above the top are kept; gravity brings them back.
    fn keeps(&self, x: f32, y: f32) -> bool {
        x >= -OFFSCREEN_MARGIN && x <= self.width + OFFSCREEN_MARGIN && y <= self.height + OFFSCREEN_MARGIN
    }
}

/// Clamps a measured frame delta to `[0, MAX_STEP]`. Non-finite deltas become 0.
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() { dt.clamp(0.0, MAX_STEP) } else { 0.0 }
}

/// Advances every effect by `dt` seconds and returns the survivors.
///
/// Rockets that reach their apex are replaced by their burst. Records born
/// during the step come after the survivors and are not advanced until the
/// next call. A zero (or clamped-to-zero) `dt` returns `effects` untouched.
pub fn step(
    effects: Vec<Effect>,
    dt: f32,
    bounds: Bounds,
    rng: &mut fastrand::Rng,
    sink: &mut dyn EventSink,
) -> Vec<Effect> {
    let dt = clamp_dt(dt);
    if dt == 0.0 {
        return effects;
    }

    let mut survivors = Vec::with_capacity(effects.len());
    let mut spawned = Vec::new();

    for effect in effects {
        match effect {
            Effect::Rocket(mut rocket) => {
                rocket.x += rocket.vx * dt;
                rocket.y += rocket.vy * dt;

                if rocket.y <= rocket.apex_y {
                    let sparks = explosion::burst(rng, rocket.x, rocket.y, &rocket.kind, &mut spawned);
                    sink.notify(SimEvent::Explosion {
                        x: rocket.x,
                        y: rocket.y,
                        sparks,
                    });
                } else {
                    survivors.push(Effect::Rocket(rocket));
                }
            }
            Effect::Spark(mut spark) => {
                spark.vy += SPARK_GRAVITY * dt;
                spark.vx *= SPARK_DRAG_X;
                spark.vy *= SPARK_DRAG_Y;
                spark.x += spark.vx * dt;
                spark.y += spark.vy * dt;
                spark.life -= dt / spark.max_life;

                if spark.life > 0.0 && bounds.keeps(spark.x, spark.y) {
                    survivors.push(Effect::Spark(spark));
                }
            }
            Effect::Smoke(mut smoke) => {
                smoke.x += smoke.vx * dt;
                smoke.y += smoke.vy * dt;
                smoke.life -= dt / smoke.max_life;

                if smoke.life > 0.0 {
                    survivors.push(Effect::Smoke(smoke));
                }
            }
        }
    }

    survivors.append(&mut spawned);
    survivors
}

/// Tally of the live collection by variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub rockets: usize,
    pub sparks: usize,
    pub smoke: usize,
}

pub struct Simulation {
    effects: Vec<Effect>,
    bounds: Bounds,
    rng: fastrand::Rng,
}

impl Simulation {
    pub fn new(bounds: Bounds) -> Self {
        Self::with_rng(bounds, fastrand::Rng::new())
    }

    pub fn with_seed(bounds: Bounds, seed: u64) -> Self {
        Self::with_rng(bounds, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(bounds: Bounds, rng: fastrand::Rng) -> Self {
        Self {
            effects: Vec::new(),
            bounds,
            rng,
        }
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn counts(&self) -> Counts {
        self.effects.iter().fold(Counts::default(), |mut c, e| {
            match e {
                Effect::Rocket(_) => c.rockets += 1,
                Effect::Spark(_) => c.sparks += 1,
                Effect::Smoke(_) => c.smoke += 1,
            }
            c
        })
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// The simulation's random source. Hosts draw launch placement from it
    /// so a seeded run is reproducible end to end.
    pub fn rng(&mut self) -> &mut fastrand::Rng {
        &mut self.rng
    }

    pub fn step(&mut self, dt: f32, sink: &mut dyn EventSink) {
        let effects = std::mem::take(&mut self.effects);
        self.effects = step(effects, dt, self.bounds, &mut self.rng, sink);
    }

    /// Sends a rocket up from `(x, y)` towards `apex_y` and leaves a puff of
    /// smoke at the launch site. Flight time is picked at random.
    pub fn launch(&mut self, x: f32, y: f32, apex_y: f32, kind: &FireworkType, sink: &mut dyn EventSink) {
        let flight = uniform(&mut self.rng, FLIGHT_TIME);
        let vy = -(y - apex_y).max(0.0) / flight;

        self.effects.push(Effect::Rocket(Rocket {
            x,
            y,
            vx: 0.0,
            vy,
            apex_y,
            kind: *kind,
        }));
        let puff = explosion::smoke(&mut self.rng, x, y - LAUNCH_SMOKE_OFFSET, explosion::LAUNCH_SMOKE_RADIUS);
        self.effects.push(Effect::Smoke(puff));

        sink.notify(SimEvent::Launch { x, y });
    }

    /// Bursts a shell in place without a rocket. Returns the spark count.
    pub fn burst(&mut self, x: f32, y: f32, kind: &FireworkType, sink: &mut dyn EventSink) -> usize {
        let sparks = explosion::burst(&mut self.rng, x, y, kind, &mut self.effects);
        sink.notify(SimEvent::Explosion { x, y, sparks });
        sparks
    }

    pub fn clear(&mut self) {
        self.effects = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Tint;

    const BOUNDS: Bounds = Bounds {
        width: 800.0,
        height: 600.0,
    };
    const RED: FireworkType = FireworkType::custom(Tint::Solid((255, 0, 0)), 1.0);

    fn spark(x: f32, y: f32, life: f32) -> Effect {
        Effect::Spark(Spark {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            life,
            max_life: 2.0,
            radius: 1.0,
            color: (255, 255, 255),
        })
    }

    fn smoke(life: f32, max_life: f32) -> Effect {
        Effect::Smoke(Smoke {
            x: 100.0,
            y: 100.0,
            vx: 0.0,
            vy: -10.0,
            life,
            max_life,
            radius: 30.0,
        })
    }

    #[test]
    fn clamps_dt() {
        assert_eq!(clamp_dt(0.016), 0.016);
        assert_eq!(clamp_dt(2.0), MAX_STEP);
        assert_eq!(clamp_dt(-1.0), 0.0);
        assert_eq!(clamp_dt(f32::NAN), 0.0);
        assert_eq!(clamp_dt(f32::INFINITY), 0.0);
    }

    #[test]
    fn zero_step_is_identity() {
        let mut rng = fastrand::Rng::with_seed(1);
        let effects = vec![spark(10.0, 10.0, 0.5), smoke(0.3, 2.0)];
        let out = step(effects.clone(), 0.0, BOUNDS, &mut rng, &mut ());
        assert_eq!(out, effects);

        let out = step(effects.clone(), -0.5, BOUNDS, &mut rng, &mut ());
        assert_eq!(out, effects);
    }

    #[test]
    fn long_pause_is_clamped() {
        let mut rng = fastrand::Rng::with_seed(1);
        let out = step(vec![smoke(1.0, 1.0)], 10.0, BOUNDS, &mut rng, &mut ());
        assert_eq!(out.len(), 1);
        let life = out[0].life().unwrap();
        assert!((life - (1.0 - MAX_STEP)).abs() < 1e-6);
    }

    #[test]
    fn spark_falls_and_fades() {
        let mut rng = fastrand::Rng::with_seed(1);
        let out = step(vec![spark(100.0, 100.0, 1.0)], 0.02, BOUNDS, &mut rng, &mut ());
        let Effect::Spark(s) = &out[0] else {
            panic!("expected spark");
        };
        assert!(s.vy > 0.0);
        assert!(s.y > 100.0);
        assert!((s.life - (1.0 - 0.02 / 2.0)).abs() < 1e-6);
    }

    #[test]
    fn spark_removed_when_life_runs_out() {
        let mut rng = fastrand::Rng::with_seed(1);
        let out = step(vec![spark(100.0, 100.0, 0.005)], 0.016, BOUNDS, &mut rng, &mut ());
        assert!(out.is_empty());
    }

    #[test]
    fn spark_removed_off_screen() {
        let mut rng = fastrand::Rng::with_seed(1);
        let below = spark(100.0, BOUNDS.height + OFFSCREEN_MARGIN + 1.0, 1.0);
        let left = spark(-OFFSCREEN_MARGIN - 1.0, 100.0, 1.0);
        let right = spark(BOUNDS.width + OFFSCREEN_MARGIN + 1.0, 100.0, 1.0);
        let above = spark(100.0, -OFFSCREEN_MARGIN - 50.0, 1.0);

        let out = step(vec![below, left, right, above], 0.001, BOUNDS, &mut rng, &mut ());
        assert_eq!(out.len(), 1);
        assert!(out[0].position().1 < 0.0);
    }

    #[test]
    fn smoke_rises_and_expires() {
        let mut rng = fastrand::Rng::with_seed(1);
        let out = step(vec![smoke(1.0, 2.0)], 0.05, BOUNDS, &mut rng, &mut ());
        assert!(out[0].position().1 < 100.0);

        let out = step(vec![smoke(0.01, 2.0)], 0.05, BOUNDS, &mut rng, &mut ());
        assert!(out.is_empty());
    }

    #[test]
    fn rocket_explodes_at_apex() {
        let mut sim = Simulation::with_seed(BOUNDS, 9);
        let mut events = Vec::new();
        sim.launch(100.0, 500.0, 150.0, &RED, &mut events);
        assert_eq!(sim.counts(), Counts { rockets: 1, sparks: 0, smoke: 1 });

        let mut frames = 0;
        while sim.counts().rockets == 1 {
            sim.step(0.016, &mut events);
            frames += 1;
            assert!(frames < 200, "rocket never exploded");
        }

        let explosions: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Explosion { y, sparks, .. } => Some((*y, *sparks)),
                _ => None,
            })
            .collect();
        assert_eq!(explosions.len(), 1);
        let (y, sparks) = explosions[0];
        assert!(y <= 150.0);
        assert_eq!(sim.counts().sparks, sparks);
        assert_eq!(sim.counts().smoke, 2);
        assert_eq!(events[0], SimEvent::Launch { x: 100.0, y: 500.0 });
    }

    #[test]
    fn spark_count_follows_seed() {
        let seed = 1234;
        let mut sim = Simulation::with_seed(BOUNDS, seed);
        sim.launch(100.0, 500.0, 150.0, &RED, &mut ());
        while sim.counts().rockets == 1 {
            sim.step(1.0 / 60.0, &mut ());
        }

        // Replay the draws: flight time, three for the launch smoke, then the count.
        let mut rng = fastrand::Rng::with_seed(seed);
        for _ in 0..4 {
            rng.f32();
        }
        let expected = explosion::spark_count(&mut rng, RED.size);
        assert_eq!(sim.counts().sparks, expected);
    }

    #[test]
    fn rocket_at_or_below_apex_bursts_next_step() {
        let mut sim = Simulation::with_seed(BOUNDS, 3);
        sim.launch(100.0, 100.0, 200.0, &RED, &mut ());
        sim.step(0.016, &mut ());
        assert_eq!(sim.counts().rockets, 0);
        assert!(sim.counts().sparks >= 50);
    }

    #[test]
    fn new_records_not_advanced_in_birth_step() {
        let mut rng = fastrand::Rng::with_seed(5);
        let rocket = Effect::Rocket(Rocket {
            x: 50.0,
            y: 100.0,
            vx: 0.0,
            vy: -100.0,
            apex_y: 100.0,
            kind: RED,
        });
        let out = step(vec![rocket], 0.016, BOUNDS, &mut rng, &mut ());
        assert!(out.iter().all(|e| e.life() == Some(1.0)));
    }

    #[test]
    fn burst_places_sparks_and_smoke() {
        let mut sim = Simulation::with_seed(BOUNDS, 11);
        let mut events = Vec::new();
        let n = sim.burst(400.0, 200.0, &RED, &mut events);
        assert_eq!(sim.counts(), Counts { rockets: 0, sparks: n, smoke: 1 });
        assert_eq!(events, vec![SimEvent::Explosion { x: 400.0, y: 200.0, sparks: n }]);
    }

    #[test]
    fn clear_empties_collection() {
        let mut sim = Simulation::with_seed(BOUNDS, 2);
        sim.launch(100.0, 500.0, 150.0, &RED, &mut ());
        sim.burst(400.0, 200.0, &RED, &mut ());
        sim.clear();
        assert!(sim.is_empty());
        sim.step(0.016, &mut ());
        assert!(sim.is_empty());
    }
}
