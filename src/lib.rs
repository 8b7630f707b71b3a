//! Fireworks for the terminal.
//!
//! [`sim`] is the particle simulation and knows nothing about terminals.
//! [`scene`] hosts it: input, scripted shows from [`demo`], the bell from
//! [`audio`] and half-block rendering.

pub mod audio;
pub mod catalog;
pub mod color;
pub mod config;
pub mod demo;
pub mod error;
pub mod scene;
pub mod sim;
