//! `rn-model` — road users placed on a graph, moved along paths, and found by
//! proximity.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`model`]     | `RoadModel` — registration, lookups, routing, movement    |
//! | [`user`]      | `RoadUser` trait, `AsAny` downcast helper                 |
//! | [`position`]  | `Position`, `PathProgress`                                |
//! | [`query`]     | `Filter`, `Located`, closest / k-closest / radius queries |
//! | [`error`]     | `ModelError`, `ModelResult<T>`                            |
//!
//! The model borrows its graph immutably, so any number of models (or
//! routing threads) can share one network.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Position`, `PathProgress` and the re-exported core types. |

pub mod error;
pub mod model;
pub mod position;
pub mod query;
mod registry;
pub mod user;


pub use error::{ModelError, ModelResult};
pub use model::RoadModel;
pub use position::{PathProgress, Position};
pub use query::{Filter, Located};
pub use user::{AsAny, RoadUser};
