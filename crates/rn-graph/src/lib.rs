//! `rn-graph` — directed road graphs, node snapping, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`graph`]   | `Graph` trait, `Connection`                                 |
//! | [`list`]    | `ListGraph` — adjacency-list backing                        |
//! | [`table`]   | `TableGraph` — adjacency-table backing                      |
//! | [`nodes`]   | `NodeSet` — node interning + R-tree used by both backings   |
//! | [`router`]  | `PathFinder` trait, `Route`, `DijkstraPathFinder`           |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                              |
//!
//! Both backings satisfy the same `Graph` contract and are interchangeable
//! anywhere a `&dyn Graph` is accepted.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod error;
pub mod graph;
pub mod list;
pub mod nodes;
pub mod router;
pub mod table;

#[cfg(test)]
mod tests;

pub use error::{GraphError, GraphResult};
pub use graph::{Connection, Graph};
pub use list::ListGraph;
pub use nodes::NodeSet;
pub use router::{DijkstraPathFinder, PathFinder, Route, path_length, shortest_path};
pub use table::TableGraph;
