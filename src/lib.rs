//! Emojify - photo to emoji mosaic server
//!
//! Turns uploaded photos into mosaics built from a library of emoji tiles.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
