//! Crate-wide error taxonomy.
//!
//! Errors split into three families:
//!
//! - **Construction errors** ([`Error::ClosureViolation`], [`Error::TypeMismatch`],
//!   [`Error::ArityMismatch`]): the caller supplied an operator set or a tree
//!   fragment that cannot be made well-typed. Fatal to the call; fix the inputs.
//! - **Search failures** ([`Error::Generation`], [`Error::IncompatibleCrossover`]):
//!   a random draw found no legal candidate. Recoverable — retry with a
//!   different seed or reselect parents.
//! - **Contract violations** ([`Error::InvalidTournament`],
//!   [`Error::MissingFitness`], [`Error::FitnessAlreadyAssigned`],
//!   [`Error::InvalidConfig`]): the caller broke an API precondition.
//!
//! Point-mutation no-ops (no alternative symbol exists) are *not* errors; those
//! operators return the parent tree unchanged.

use crate::types::Type;
use std::fmt;
use thiserror::Error;

/// Which kind of symbol a generation step was required to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// Only terminals were eligible (at the depth bound).
    Terminal,
    /// Only operators were eligible (`full` below the depth bound).
    Operator,
    /// Terminals and operators were both eligible (`grow` below the bound).
    Any,
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateKind::Terminal => write!(f, "terminal"),
            CandidateKind::Operator => write!(f, "operator"),
            CandidateKind::Any => write!(f, "terminal or operator"),
        }
    }
}

/// The error type for all fallible operations in this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Raised at operator-table construction: a declared parameter type has no
    /// compatible producer anywhere in the table.
    #[error("closure violation: no symbol produces a value for parameter type `{parameter}` required by `{required_by}`")]
    ClosureViolation {
        /// The parameter type nothing can produce.
        parameter: Type,
        /// The symbol whose signature requires it.
        required_by: String,
    },

    /// Raised when `full` or `grow` finds no candidate of the mandated kind
    /// for a required type. The engine never substitutes an incompatible node.
    #[error("generation failed: no {kind} returns a value compatible with `{required}` at depth {depth}")]
    Generation {
        /// The type the position demanded.
        required: Type,
        /// The kind of symbol that was mandated at this depth.
        kind: CandidateKind,
        /// Depth (distance from the root) of the failing position.
        depth: usize,
    },

    /// Raised after crossover exhausted its bounded retries without finding a
    /// compatible donor subtree. Treat as "no offspring produced".
    #[error("crossover found no compatible donor subtree after {attempts} attempts")]
    IncompatibleCrossover {
        /// Number of distinct sites tried in the first parent.
        attempts: usize,
    },

    /// A subtree's return type does not satisfy the slot it was attached to.
    #[error("type mismatch at {site}: expected `{expected}`, found `{offered}`")]
    TypeMismatch {
        /// Human-readable location, e.g. `argument 1 of \`add\``.
        site: String,
        /// The type the slot demands.
        expected: Type,
        /// The return type that was offered.
        offered: Type,
    },

    /// A node was built with the wrong number of children for its symbol.
    #[error("arity mismatch for `{symbol}`: expected {expected} children, got {actual}")]
    ArityMismatch {
        symbol: String,
        expected: usize,
        actual: usize,
    },

    /// A tree index was outside the pre-order range `0..tree.size()`.
    #[error("node index {index} out of bounds for tree of size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Tournament preconditions were violated (size zero, size exceeding the
    /// population, or a fitness vector misaligned with the objectives).
    #[error("invalid tournament: {0}")]
    InvalidTournament(String),

    /// A sampled individual has no assigned fitness.
    #[error("individual {index} has no assigned fitness")]
    MissingFitness { index: usize },

    /// `Solution::assign_fitness` was called twice; fitness is write-once.
    #[error("fitness has already been assigned to this solution")]
    FitnessAlreadyAssigned,

    /// An `EvolveConfig` failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
