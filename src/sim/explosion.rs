use super::effect::{Effect, Smoke, Spark};
use crate::catalog::{FireworkType, Tint};
use crate::color;
use std::f32::consts::TAU;

const SPARK_COUNT: (f32, f32) = (50.0, 130.0);
const SPARK_SPEED: (f32, f32) = (60.0, 280.0);
const SPARK_SPEED_SPREAD: (f32, f32) = (0.5, 1.4);
const SPARK_LIFE: (f32, f32) = (1.4, 2.6);
const SPARK_RADIUS: (f32, f32) = (1.0, 3.5);

const SMOKE_LIFE: (f32, f32) = (2.0, 3.8);
const SMOKE_DRIFT: f32 = 10.0;
const SMOKE_RISE: (f32, f32) = (10.0, 30.0);

/// Radius of the puff left where a shell bursts, before size scaling.
pub const BURST_SMOKE_RADIUS: f32 = 80.0;
/// Radius of the puff left at the launch site.
pub const LAUNCH_SMOKE_RADIUS: f32 = 26.0;

pub(crate) fn uniform(rng: &mut fastrand::Rng, (min, max): (f32, f32)) -> f32 {
    min + rng.f32() * (max - min)
}

/// Number of sparks a burst of the given size throws.
pub fn spark_count(rng: &mut fastrand::Rng, size: f32) -> usize {
    (uniform(rng, SPARK_COUNT) * size).floor().max(0.0) as usize
}

pub fn smoke(rng: &mut fastrand::Rng, x: f32, y: f32, radius: f32) -> Smoke {
    Smoke {
        x,
        y,
        vx: uniform(rng, (-SMOKE_DRIFT, SMOKE_DRIFT)),
        vy: -uniform(rng, SMOKE_RISE),
        life: 1.0,
        max_life: uniform(rng, SMOKE_LIFE),
        radius,
    }
}

/// Appends a burst at `(x, y)` to `out`: the sparks followed by one smoke
/// puff. Returns the number of sparks.
pub fn burst(rng: &mut fastrand::Rng, x: f32, y: f32, kind: &FireworkType, out: &mut Vec<Effect>) -> usize {
    let count = spark_count(rng, kind.size);
    out.reserve(count + 1);

    for _ in 0..count {
        let angle = rng.f32() * TAU;
        let speed = uniform(rng, SPARK_SPEED) * uniform(rng, SPARK_SPEED_SPREAD) * kind.size;
        let color = match kind.tint {
            Tint::Solid(c) => c,
            Tint::Multi => color::hsl(rng.u32(0..360) as f32, 1.0, 0.6),
        };

        out.push(Effect::Spark(Spark {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            life: 1.0,
            max_life: uniform(rng, SPARK_LIFE),
            radius: uniform(rng, SPARK_RADIUS),
            color,
        }));
    }

    out.push(Effect::Smoke(smoke(rng, x, y, BURST_SMOKE_RADIUS * kind.size)));
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FireworkType;

    const RED: FireworkType = FireworkType::custom(Tint::Solid((255, 0, 0)), 1.0);

    #[test]
    fn spark_count_range_scales_with_size() {
        let mut rng = fastrand::Rng::with_seed(1);
        for _ in 0..500 {
            let n = spark_count(&mut rng, 1.0);
            assert!((50..130).contains(&n));
            let n = spark_count(&mut rng, 0.5);
            assert!((25..65).contains(&n));
        }
    }

    #[test]
    fn burst_ends_with_one_smoke() {
        let mut rng = fastrand::Rng::with_seed(2);
        let mut out = Vec::new();
        let n = burst(&mut rng, 10.0, 20.0, &RED, &mut out);

        assert_eq!(out.len(), n + 1);
        assert!(out[..n].iter().all(Effect::is_spark));
        match out.last() {
            Some(Effect::Smoke(s)) => {
                assert_eq!((s.x, s.y), (10.0, 20.0));
                assert_eq!(s.radius, BURST_SMOKE_RADIUS);
                assert!(s.vy < 0.0);
            }
            other => panic!("expected smoke, got {other:?}"),
        }
    }

    #[test]
    fn spark_parameters_within_ranges() {
        let mut rng = fastrand::Rng::with_seed(3);
        let mut out = Vec::new();
        let size = 1.4;
        burst(&mut rng, 0.0, 0.0, &FireworkType::custom(Tint::Multi, size), &mut out);

        for effect in &out {
            if let Effect::Spark(s) = effect {
                let speed = (s.vx * s.vx + s.vy * s.vy).sqrt();
                assert!(speed >= 60.0 * 0.5 * size - 1e-3);
                assert!(speed <= 280.0 * 1.4 * size + 1e-3);
                assert!((1.4..=2.6).contains(&s.max_life));
                assert!((1.0..=3.5).contains(&s.radius));
                assert_eq!(s.life, 1.0);
            }
        }
    }

    #[test]
    fn multi_tint_varies_colours() {
        let mut rng = fastrand::Rng::with_seed(4);
        let mut out = Vec::new();
        burst(&mut rng, 0.0, 0.0, &FireworkType::custom(Tint::Multi, 1.0), &mut out);

        let mut colors: Vec<_> = out
            .iter()
            .filter_map(|e| match e {
                Effect::Spark(s) => Some(s.color),
                _ => None,
            })
            .collect();
        colors.sort_unstable();
        colors.dedup();
        assert!(colors.len() > 5);
    }

    #[test]
    fn solid_tint_keeps_colour() {
        let mut rng = fastrand::Rng::with_seed(5);
        let mut out = Vec::new();
        burst(&mut rng, 0.0, 0.0, &RED, &mut out);
        assert!(out.iter().all(|e| match e {
            Effect::Spark(s) => s.color == (255, 0, 0),
            _ => true,
        }));
    }
}
