//! qr-core - qualitative reasoning engine
//!
//! Enumerates the admissible state space of a declarative model of
//! entities, quantities, and qualitative relationships, derives the
//! directed transition graph between those states, and optionally finds
//! the shortest behavioural path between two of them via A*.
//!
//! Data flows strictly forward through the modules below: a [`Model`]
//! produces an admissible [`State`] set ([`enumerator`]), which produces a
//! [`transitions::TransitionGraph`], which [`path`] searches and
//! [`export`] renders. [`solve`] wires enumeration and transition
//! generation together for the common case.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod admissibility;
pub mod enumerator;
pub mod error;
pub mod export;
pub mod loader;
pub mod model;
pub mod path;
pub mod solve;
pub mod state;
pub mod transitions;
pub mod value;

pub use admissibility::is_admissible;
pub use error::{QrError, Result};
pub use export::{export_graph, ExportEdge, ExportGraph, ExportNode};
pub use loader::{load_model, load_state};
pub use model::{Entity, EntityRelation, Model, Quantity, QuantityId, Relation, RelationId, RelationKind};
pub use path::{find_path, reconstruct_path, PathOutcome};
pub use solve::{solve, solve_path, solve_with_subset_cap, Solution};
pub use state::{State, StateId};
pub use transitions::{generate_graph, TransitionGraph, DEFAULT_SUBSET_CAP};
pub use value::{Derivative, Landmark, Sign};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
