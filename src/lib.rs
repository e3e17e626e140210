//! Exhaust Blaster: spray the exhaust pipes of cars driving up a
//! perspective road before they disappear over the horizon.
//!
//! The library holds every rule of the game and no terminal code; the
//! binary adds the crossterm renderer and the input/frame loop.

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod game;
pub mod geometry;
pub mod session;
pub mod timer;
