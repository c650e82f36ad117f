//! Strongly typed genetic programming substrate.
//!
//! Generates, type-checks, and genetically recombines populations of typed
//! syntax trees built from a user-supplied set of typed basis functions:
//!
//! - **Type system** ([`types`]): base, generic, and parametrized types with
//!   a directional structural compatibility check — a constraint filter, not
//!   type inference.
//! - **Operator table** ([`lang`]): an immutable registry of typed symbols,
//!   indexed by return type and eagerly checked for the closure property so
//!   generation never discovers a missing producer mid-tree.
//! - **Trees** ([`tree`]): immutable-shape typed expression trees with
//!   cached depth and subtree size, well-typed by construction.
//! - **Generation** ([`generate`]): Koza's `full` / `grow` strategies and the
//!   `ramped half-and-half` population initializer, all type-constrained.
//! - **Variation** ([`variation`]): subtree crossover and subtree/point
//!   mutations that turn well-typed trees into well-typed trees, never
//!   validating after the fact.
//! - **Selection** ([`selection`]): tournament selection under Pareto
//!   dominance with uniform tie-breaking.
//! - **Solutions** ([`solution`]): trees paired with write-once,
//!   multi-objective fitness vectors.
//! - **Evolution** ([`evolve`]): a generational loop wiring the above to a
//!   caller-supplied fitness evaluator.
//!
//! # Architecture
//!
//! The substrate is single-threaded and CPU-bound per call; every function
//! that draws randomness takes a caller-supplied `rand::Rng`, so a fixed
//! seed reproduces a run exactly and parallel workers can hold independent
//! streams. Once built, the operator table and all type values are
//! read-only; with the `parallel` feature, population evaluation fans out
//! over rayon without locks.
//!
//! What the crate does *not* do: execute or inspect basis functions (a
//! symbol's name is an opaque callable reference for the consuming
//! environment), evaluate fitness (caller-supplied), or persist trees.
//!
//! # Example
//!
//! ```
//! use stgp::lang::{OperatorTable, Symbol};
//! use stgp::random::create_rng;
//! use stgp::types::Type;
//!
//! let int = Type::base("Int");
//! let table = OperatorTable::new(vec![
//!     Symbol::terminal("one", int.clone()),
//!     Symbol::terminal("x", int.clone()),
//!     Symbol::operator("add", vec![int.clone(), int.clone()], int.clone()),
//! ])?;
//!
//! let mut rng = create_rng(42);
//! let tree = stgp::generate::full(&table, &int, 3, &mut rng)?;
//! assert!(tree.iter().filter(|n| n.is_leaf()).all(|n| n.depth() == 3));
//! # Ok::<(), stgp::Error>(())
//! ```

pub mod error;
pub mod evolve;
pub mod generate;
pub mod lang;
pub mod random;
pub mod selection;
pub mod solution;
pub mod tree;
pub mod types;
pub mod variation;

pub use error::Error;
pub use lang::{OperatorTable, Symbol, SymbolKind};
pub use solution::{Direction, Fitness, Objective, Solution};
pub use tree::{Node, Tree};
pub use types::{is_compatible, Type};
