use crate::catalog::{self, CATALOG};
use crate::color::{self, Rgb};
use crate::error::{Error, Result};
use clap::Parser;
use std::path::PathBuf;

const KEYS_HELP: &str = "\
Keys:
  space      launch the selected type
  p          preview the selected type
  a          auto show (random kind)
  1-4        select kind
  tab, t     next type
  m          mute / unmute
  c, click   clear the sky
  q, esc     quit";

#[derive(Parser, Debug)]
#[command(author, version, about = "Fireworks in the terminal", long_about = None, after_help = KEYS_HELP)]
pub struct Args {
    /// Background color as hex (e.g. 1a1b26)
    #[arg(long, value_name = "RRGGBB")]
    pub bg_color: Option<String>,

    /// Firework kind selected at start
    #[arg(long, default_value = "rocket")]
    pub kind: String,

    /// Type of the selected kind (defaults to its first type)
    #[arg(long = "type", value_name = "ID")]
    pub ty: Option<String>,

    /// Keep launching random fireworks, screensaver style
    #[arg(long)]
    pub auto: bool,

    /// Skip the opening sparkle
    #[arg(long)]
    pub no_opening: bool,

    /// Start with the bell muted
    #[arg(long)]
    pub mute: bool,

    /// Seed for a reproducible show
    #[arg(long)]
    pub seed: Option<u64>,

    /// List firework kinds and types, then exit
    #[arg(long)]
    pub list: bool,

    /// Write logs to this file (RUST_LOG sets the filter)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bg_color: Rgb,
    /// Index into the catalog.
    pub kind: usize,
    /// Index into the kind's types.
    pub ty: usize,
    pub auto: bool,
    pub opening: bool,
    pub muted: bool,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bg_color: (0, 0, 0),
            kind: 0,
            ty: 0,
            auto: false,
            opening: true,
            muted: false,
            seed: None,
            log_file: None,
        }
    }
}

impl TryFrom<Args> for Config {
    type Error = Error;

    fn try_from(args: Args) -> Result<Self> {
        let bg_color = match &args.bg_color {
            Some(hex) => color::parse_hex(hex).ok_or_else(|| Error::InvalidColor(hex.clone()))?,
            None => (0, 0, 0),
        };

        let kind = catalog::kind_index(&args.kind).ok_or_else(|| Error::UnknownKind(args.kind.clone()))?;
        let ty = match &args.ty {
            Some(id) => CATALOG[kind]
                .types
                .iter()
                .position(|t| t.id == id.as_str())
                .ok_or_else(|| Error::UnknownType {
                    kind: args.kind.clone(),
                    ty: id.clone(),
                })?,
            None => 0,
        };

        Ok(Self {
            bg_color,
            kind,
            ty,
            auto: args.auto,
            opening: !args.no_opening,
            muted: args.mute,
            seed: args.seed,
            log_file: args.log_file,
        })
    }
}
