//! Typed symbols and the operator table.
//!
//! A [`Symbol`] is a typed basis function: an identifier plus a return type,
//! and — for operators — an ordered parameter signature. Terminals (constants
//! and input variables) carry no parameters. The crate never inspects or
//! executes the thing a symbol names; the name is an opaque handle for
//! whatever execution environment consumes the trees.
//!
//! An [`OperatorTable`] is the immutable registry the generation engine and
//! the genetic operators draw candidates from. It groups symbols by return
//! type for lookup and eagerly enforces the **closure property**: every
//! parameter type declared anywhere in the table has at least one compatible
//! producer, so generation can never discover a gap mid-tree. Construction
//! fails with [`Error::ClosureViolation`] otherwise.
//!
//! Once built, a table is shared read-only (symbols are handed out as
//! `Arc<Symbol>`); concurrent reads are safe and no locking is involved.

use crate::error::Error;
use crate::types::Type;
use log::debug;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether a symbol is a leaf producer or an internal-node basis function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SymbolKind {
    /// A leaf: a constant or input variable with no parameters.
    Terminal,
    /// A basis function taking one or more typed arguments.
    Operator {
        /// The ordered parameter types of the function.
        signature: Vec<Type>,
    },
}

/// A typed basis function or terminal.
///
/// Symbols are compared and hashed by name, kind, and return type; two
/// registrations with identical type structure and name are the same symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Symbol {
    name: String,
    kind: SymbolKind,
    return_type: Type,
}

impl Symbol {
    /// Creates a terminal: a leaf-producing constant or input variable.
    pub fn terminal(name: impl Into<String>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Terminal,
            return_type,
        }
    }

    /// Creates an operator: an internal-node basis function.
    ///
    /// # Panics
    /// Panics if `signature` is empty — a parameterless symbol is a terminal,
    /// use [`Symbol::terminal`].
    pub fn operator(name: impl Into<String>, signature: Vec<Type>, return_type: Type) -> Self {
        assert!(
            !signature.is_empty(),
            "an operator takes at least one argument; use Symbol::terminal"
        );
        Self {
            name: name.into(),
            kind: SymbolKind::Operator { signature },
            return_type,
        }
    }

    /// The symbol's identifier — an opaque reference to a callable in the
    /// consuming execution environment.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The terminal/operator tag.
    pub fn kind(&self) -> &SymbolKind {
        &self.kind
    }

    /// The type a node holding this symbol produces.
    pub fn return_type(&self) -> &Type {
        &self.return_type
    }

    /// The ordered parameter types; empty for terminals.
    pub fn signature(&self) -> &[Type] {
        match &self.kind {
            SymbolKind::Terminal => &[],
            SymbolKind::Operator { signature } => signature,
        }
    }

    /// Number of arguments this symbol takes.
    pub fn arity(&self) -> usize {
        self.signature().len()
    }

    /// Whether this symbol is a terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, SymbolKind::Terminal)
    }
}

impl fmt::Display for Symbol {
    /// Formats as `name(Param, ...) -> Return`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, parameter) in self.signature().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{parameter}")?;
        }
        write!(f, ") -> {}", self.return_type)
    }
}

/// An immutable, closure-checked registry of symbols, indexed by return type.
///
/// Lookup resolves compatibility against the distinct return types in the
/// index rather than against every symbol, and candidate lists come back in
/// registration order so uniform random choice under a fixed seed is
/// reproducible.
#[derive(Debug, Clone)]
pub struct OperatorTable {
    symbols: Vec<Arc<Symbol>>,
    by_return: Vec<(Type, Vec<Arc<Symbol>>)>,
}

impl OperatorTable {
    /// Builds a table from a sequence of symbols.
    ///
    /// Duplicate registrations are collapsed. Fails with
    /// [`Error::ClosureViolation`] if any declared parameter type has no
    /// compatible producer among the supplied symbols.
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Result<Self, Error> {
        let mut seen = HashSet::new();
        let mut unique: Vec<Arc<Symbol>> = Vec::new();
        for symbol in symbols {
            if seen.insert(symbol.clone()) {
                unique.push(Arc::new(symbol));
            }
        }

        let mut by_return: Vec<(Type, Vec<Arc<Symbol>>)> = Vec::new();
        for symbol in &unique {
            match by_return
                .iter_mut()
                .find(|(return_type, _)| return_type == symbol.return_type())
            {
                Some((_, group)) => group.push(Arc::clone(symbol)),
                None => by_return.push((symbol.return_type().clone(), vec![Arc::clone(symbol)])),
            }
        }

        let table = Self {
            symbols: unique,
            by_return,
        };
        table.check_closure()?;

        debug!(
            "operator table: {} symbols ({} terminals, {} operators), {} distinct return types",
            table.symbols.len(),
            table.symbols.iter().filter(|s| s.is_terminal()).count(),
            table.symbols.iter().filter(|s| !s.is_terminal()).count(),
            table.by_return.len(),
        );
        Ok(table)
    }

    /// Every declared parameter type must have at least one producer.
    fn check_closure(&self) -> Result<(), Error> {
        let mut checked: HashSet<&Type> = HashSet::new();
        for symbol in &self.symbols {
            for parameter in symbol.signature() {
                if !checked.insert(parameter) {
                    continue;
                }
                if self.symbols_returning(parameter).is_empty() {
                    return Err(Error::ClosureViolation {
                        parameter: parameter.clone(),
                        required_by: symbol.name().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// All symbols whose return type satisfies `required`, in registration
    /// order.
    pub fn symbols_returning(&self, required: &Type) -> Vec<Arc<Symbol>> {
        let mut out = Vec::new();
        for (return_type, group) in &self.by_return {
            if required.contains(return_type) {
                out.extend(group.iter().cloned());
            }
        }
        out
    }

    /// Terminals whose return type satisfies `required`.
    ///
    /// Depth-bounded generation uses this to force leaf selection at the
    /// depth limit.
    pub fn terminals_returning(&self, required: &Type) -> Vec<Arc<Symbol>> {
        let mut out = self.symbols_returning(required);
        out.retain(|symbol| symbol.is_terminal());
        out
    }

    /// Operators whose return type satisfies `required`.
    pub fn operators_returning(&self, required: &Type) -> Vec<Arc<Symbol>> {
        let mut out = self.symbols_returning(required);
        out.retain(|symbol| !symbol.is_terminal());
        out
    }

    /// All registered symbols, in registration order.
    pub fn symbols(&self) -> &[Arc<Symbol>] {
        &self.symbols
    }

    /// All registered terminals, in registration order.
    pub fn terminals(&self) -> Vec<Arc<Symbol>> {
        self.symbols
            .iter()
            .filter(|symbol| symbol.is_terminal())
            .cloned()
            .collect()
    }

    /// All registered operators, in registration order.
    pub fn operators(&self) -> Vec<Arc<Symbol>> {
        self.symbols
            .iter()
            .filter(|symbol| !symbol.is_terminal())
            .cloned()
            .collect()
    }

    /// Number of distinct symbols in the table.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the table holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
