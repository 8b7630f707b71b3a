//! The firework kinds on offer and the type descriptors each one can be
//! launched with. A type descriptor is all the simulation needs to know
//! about an explosion: its colour (or multi-colour) and a size multiplier.

use crate::color::Rgb;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tint {
    Solid(Rgb),
    /// Every spark picks its own random hue.
    Multi,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FireworkType {
    pub id: &'static str,
    pub label: &'static str,
    pub tint: Tint,
    pub size: f32,
}

impl FireworkType {
    /// A type with no catalog entry, used by scripted bursts.
    pub const fn custom(tint: Tint, size: f32) -> Self {
        Self {
            id: "custom",
            label: "Custom",
            tint,
            size,
        }
    }
}

#[derive(Debug)]
pub struct FireworkKind {
    pub id: &'static str,
    pub name: &'static str,
    pub desc: &'static str,
    pub types: &'static [FireworkType],
}

impl FireworkKind {
    pub fn find_type(&self, id: &str) -> Option<&'static FireworkType> {
        self.types.iter().find(|t| t.id == id)
    }

    pub fn default_type(&self) -> &'static FireworkType {
        &self.types[0]
    }
}

const fn ty(id: &'static str, label: &'static str, tint: Tint, size: f32) -> FireworkType {
    FireworkType { id, label, tint, size }
}

pub static CATALOG: [FireworkKind; 4] = [
    FireworkKind {
        id: "rocket",
        name: "Rocket",
        desc: "Soars high and bursts into a starfield.",
        types: &[
            ty("r.red", "Red Starburst", Tint::Solid((0xff, 0x3b, 0x30)), 1.0),
            ty("r.gold", "Gold Shower", Tint::Solid((0xff, 0xd6, 0x0a)), 1.2),
            ty("r.multi", "Rainbow Burst", Tint::Multi, 1.1),
        ],
    },
    FireworkKind {
        id: "anar",
        name: "Anar (Fountain)",
        desc: "Ground fountain with glitter.",
        types: &[
            ty("a.silver", "Silver Sparkle", Tint::Solid((0xe5, 0xe7, 0xeb)), 0.9),
            ty("a.blue", "Blue Cascade", Tint::Solid((0x60, 0xa5, 0xfa)), 1.0),
        ],
    },
    FireworkKind {
        id: "chakri",
        name: "Chakri (Spinner)",
        desc: "Spinning wheel of light.",
        types: &[
            ty("c.neon", "Neon Loop", Tint::Solid((0x7c, 0x3a, 0xed)), 0.8),
            ty("c.sun", "Sunburst", Tint::Solid((0xf9, 0x73, 0x16)), 1.0),
        ],
    },
    FireworkKind {
        id: "bombetta",
        name: "Bombetta",
        desc: "Cluster shells with layered booms.",
        types: &[
            ty("b.purp", "Purple Bloom", Tint::Solid((0x8b, 0x5c, 0xf6)), 1.4),
            ty("b.cyan", "Cyan Ring", Tint::Solid((0x06, 0xb6, 0xd4)), 1.2),
        ],
    },
];

// Colours of the opening sparkle.
pub const SPARKLE_COLORS: [Rgb; 3] = [(0xff, 0xd6, 0x0a), (0xff, 0x3b, 0x30), (0x60, 0xa5, 0xfa)];

pub fn find_kind(id: &str) -> Option<&'static FireworkKind> {
    CATALOG.iter().find(|k| k.id == id)
}

pub fn kind_index(id: &str) -> Option<usize> {
    CATALOG.iter().position(|k| k.id == id)
}

pub fn random_kind(rng: &mut fastrand::Rng) -> &'static FireworkKind {
    &CATALOG[rng.usize(0..CATALOG.len())]
}

/// Random type from anywhere in the catalog.
pub fn random_type(rng: &mut fastrand::Rng) -> &'static FireworkType {
    let kind = random_kind(rng);
    &kind.types[rng.usize(0..kind.types.len())]
}
