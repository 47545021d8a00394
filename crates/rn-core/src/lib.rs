//! `rn-core` — foundational types shared by the road network crates.
//!
//! This crate is a dependency of every other `rn-*` crate.  It has no `rn-*`
//! dependencies and a single required external one (`thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `ObjectId`                                  |
//! | [`geo`]         | `Point`, Euclidean distance, interpolation            |
//! | [`config`]      | `RoadConfig`                                          |
//! | [`error`]       | `RoadError`, `RoadResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::RoadConfig;
pub use error::{RoadError, RoadResult};
pub use geo::Point;
pub use ids::{NodeId, ObjectId};
