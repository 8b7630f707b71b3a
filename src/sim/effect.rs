use crate::catalog::FireworkType;
use crate::color::Rgb;

/// Ascending shell. Detonates once `y` reaches `apex_y`.
#[derive(Clone, Debug, PartialEq)]
pub struct Rocket {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub apex_y: f32,
    pub kind: FireworkType,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Spark {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Remaining life fraction, 1 at birth.
    pub life: f32,
    pub max_life: f32,
    pub radius: f32,
    pub color: Rgb,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Smoke {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: f32,
    pub max_life: f32,
    pub radius: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Rocket(Rocket),
    Spark(Spark),
    Smoke(Smoke),
}

impl Effect {
    pub fn position(&self) -> (f32, f32) {
        match self {
            Effect::Rocket(r) => (r.x, r.y),
            Effect::Spark(s) => (s.x, s.y),
            Effect::Smoke(s) => (s.x, s.y),
        }
    }

    /// Life fraction for particles; rockets have none.
    pub fn life(&self) -> Option<f32> {
        match self {
            Effect::Rocket(_) => None,
            Effect::Spark(s) => Some(s.life),
            Effect::Smoke(s) => Some(s.life),
        }
    }

    pub fn is_rocket(&self) -> bool {
        matches!(self, Effect::Rocket(_))
    }

    pub fn is_spark(&self) -> bool {
        matches!(self, Effect::Spark(_))
    }

    pub fn is_smoke(&self) -> bool {
        matches!(self, Effect::Smoke(_))
    }
}

impl From<Rocket> for Effect {
    fn from(rocket: Rocket) -> Self {
        Effect::Rocket(rocket)
    }
}

impl From<Spark> for Effect {
    fn from(spark: Spark) -> Self {
        Effect::Spark(spark)
    }
}

impl From<Smoke> for Effect {
    fn from(smoke: Smoke) -> Self {
        Effect::Smoke(smoke)
    }
}
