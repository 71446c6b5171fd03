//! LUMEN Catalog - Static lookup tables
//!
//! Everything in this crate is immutable after construction:
//! - Effect catalog (name -> cost, duration)
//! - Achievement catalog (id -> label, reward)
//! - Ambient-responder personalities (name -> phrase set)
//!
//! Catalogs are validated when built; unknown keys at lookup time are an
//! explicit `None`, never a silent default.

pub mod achievements;
pub mod effects;
pub mod personality;

pub use achievements::*;
pub use effects::*;
pub use personality::*;
