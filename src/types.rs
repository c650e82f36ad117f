//! The type system: base, generic, and parametrized types with a directional
//! compatibility relation.
//!
//! Terminology:
//!
//! - A type `A` **contains** a type `B` if a value of type `B` can safely
//!   occupy a slot expecting values of type `A`.
//! - A type `C` is *more general than* `D` if `D` cannot contain `C`.
//!
//! A [`Type::Generic`] is the most general kind: it names a set of contained
//! types and can be resolved to any of them. A [`Type::Parametrized`] is a
//! generic instantiated with positional parameters, e.g. `Collection<Int>`:
//!
//! ```
//! use stgp::types::Type;
//!
//! let int = Type::base("Int");
//! let float = Type::base("Float");
//! let number = Type::generic("Number", vec![int.clone(), float.clone()]);
//!
//! let list = Type::base("List");
//! let set = Type::base("Set");
//! let collection = Type::generic("Collection", vec![list, set]);
//!
//! let coll_of_numbers = Type::parametrized(
//!     "Collection<Number>", collection.clone(), vec![number],
//! );
//! let coll_of_ints = Type::parametrized(
//!     "Collection<Int>", collection.clone(), vec![int],
//! );
//!
//! // Collection<Int> fits anywhere Collection<Number> is expected,
//! // and both fit anywhere a bare Collection is expected.
//! assert!(coll_of_numbers.contains(&coll_of_ints));
//! assert!(collection.contains(&coll_of_numbers));
//! assert!(!coll_of_ints.contains(&coll_of_numbers));
//! ```
//!
//! Compatibility is a structural constraint filter, not type inference: the
//! check is directional ("does a value of type A satisfy a required type B"),
//! positional, and arity-exact. It is a pure function over immutable values —
//! no locks, no caches — and terminates because every recursive step descends
//! into a strictly smaller type value.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A type in the system: the identity of every value slot and return value.
///
/// Two `Type` values are equal only if they are structurally identical,
/// including names. Identity participates in hashing so types can key lookup
/// tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// A concrete base type, identified by name.
    Base {
        /// The name of this type.
        name: String,
    },
    /// A named union of types. Contains any type that one of its members
    /// contains.
    Generic {
        /// The name of this type.
        name: String,
        /// The set of types this generic can be resolved to. Ordering is part
        /// of the value's identity; keep construction order stable.
        contained: Vec<Type>,
    },
    /// A generic instantiated with positional parameters, e.g. `List<Int>`.
    Parametrized {
        /// The name of this type.
        name: String,
        /// The base generic (or base type) being instantiated.
        base: Box<Type>,
        /// The positional parameters of the instantiation.
        parameters: Vec<Type>,
    },
}

impl Type {
    /// Creates a concrete base type.
    pub fn base(name: impl Into<String>) -> Self {
        Type::Base { name: name.into() }
    }

    /// Creates a generic type that can resolve to any of `contained`.
    pub fn generic(name: impl Into<String>, contained: Vec<Type>) -> Self {
        Type::Generic {
            name: name.into(),
            contained,
        }
    }

    /// Creates a parametrized instantiation of `base`.
    pub fn parametrized(name: impl Into<String>, base: Type, parameters: Vec<Type>) -> Self {
        Type::Parametrized {
            name: name.into(),
            base: Box::new(base),
            parameters,
        }
    }

    /// Returns the name of this type.
    pub fn name(&self) -> &str {
        match self {
            Type::Base { name }
            | Type::Generic { name, .. }
            | Type::Parametrized { name, .. } => name,
        }
    }

    /// Whether a value of type `candidate` can safely occupy a slot expecting
    /// values of this type.
    ///
    /// The relation is reflexive and directional. Rules, by the kind of the
    /// required type:
    ///
    /// - **Base** contains only an identical base type.
    /// - **Parametrized** contains an identical parametrized type, or one
    ///   whose base is contained by this base and whose parameters are
    ///   contained positionally with the same arity. There is no variance
    ///   beyond this structural, positional rule.
    /// - **Generic** contains a base type contained by any of its members, a
    ///   parametrized type whose base it contains, and another generic when
    ///   they are identical, when any member contains the candidate, or when
    ///   every member of the candidate is contained by this generic.
    ///
    /// Returns `false` for genuinely unrelated types; never panics.
    pub fn contains(&self, candidate: &Type) -> bool {
        match (self, candidate) {
            (Type::Base { .. }, Type::Base { .. }) => self == candidate,
            (Type::Base { .. }, _) => false,
            (
                Type::Parametrized {
                    base, parameters, ..
                },
                Type::Parametrized {
                    base: candidate_base,
                    parameters: candidate_parameters,
                    ..
                },
            ) => {
                self == candidate
                    || (base.contains(candidate_base)
                        && parameters.len() == candidate_parameters.len()
                        && parameters
                            .iter()
                            .zip(candidate_parameters)
                            .all(|(required, offered)| required.contains(offered)))
            }
            (Type::Parametrized { .. }, _) => false,
            (Type::Generic { contained, .. }, Type::Base { .. }) => {
                contained.iter().any(|member| member.contains(candidate))
            }
            (
                Type::Generic { .. },
                Type::Parametrized {
                    base: candidate_base,
                    ..
                },
            ) => self.contains(candidate_base),
            (
                Type::Generic { contained, .. },
                Type::Generic {
                    contained: candidate_contained,
                    ..
                },
            ) => {
                self == candidate
                    || contained.iter().any(|member| member.contains(candidate))
                    || candidate_contained
                        .iter()
                        .all(|member| self.contains(member))
            }
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The compatibility contract: whether a value of type `offered` satisfies a
/// slot requiring `required`.
///
/// This is [`Type::contains`] read in constraint-filter direction; it exists
/// so call sites that talk about "required" and "offered" types read
/// naturally.
pub fn is_compatible(required: &Type, offered: &Type) -> bool {
    required.contains(offered)
}

// ============================================================================
// Tests
// ============================================================================
