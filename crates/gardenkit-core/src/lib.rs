#![forbid(unsafe_code)]

//! Core: identifiers, geometry, clocks, and host input events.

pub mod clock;
pub mod event;
pub mod geometry;
pub mod id;
