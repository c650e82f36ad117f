//! Type-constrained random tree generation.
//!
//! Implements Koza's `full` and `grow` strategies augmented with type
//! information, plus the `ramped half-and-half` population initializer that
//! mixes both across a range of depths (Koza 1992; Montana 1995).
//!
//! Depth is measured from the root (depth 0). Both strategies mandate
//! terminals at `depth == max_depth`; below the bound, `full` draws only from
//! compatible operators (so every branch reaches exactly `max_depth`) while
//! `grow` draws uniformly from the union of compatible operators and
//! terminals (so recursion stops wherever a terminal is picked). A position
//! whose required type has no candidate of the mandated kind fails with
//! [`Error::Generation`] — an incompatible node is never substituted.
//!
//! All randomness comes from the caller-supplied generator, so a fixed seed
//! reproduces a run exactly.

use crate::error::{CandidateKind, Error};
use crate::lang::{OperatorTable, Symbol};
use crate::tree::{Node, Tree};
use crate::types::Type;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::sync::Arc;

/// Generates a tree in which every leaf sits at exactly `max_depth`.
///
/// At depths below `max_depth` only compatible operators are eligible; at
/// `max_depth`, only compatible terminals. Choice within the eligible set is
/// uniform.
pub fn full<R: Rng>(
    table: &OperatorTable,
    return_type: &Type,
    max_depth: usize,
    rng: &mut R,
) -> Result<Tree, Error> {
    Ok(Tree::new(full_node(table, return_type, 0, max_depth, rng)?))
}

/// Generates a tree whose leaves sit at depths `<= max_depth`.
///
/// At depths below `max_depth` the eligible set is the union of compatible
/// operators and terminals, chosen uniformly; picking a terminal ends the
/// branch. At `max_depth`, only terminals are eligible. Produces
/// irregular-shaped trees.
pub fn grow<R: Rng>(
    table: &OperatorTable,
    return_type: &Type,
    max_depth: usize,
    rng: &mut R,
) -> Result<Tree, Error> {
    Ok(Tree::new(grow_node(table, return_type, 0, max_depth, rng)?))
}

/// Generates a population of varied size and shape: each individual draws a
/// uniform depth from `[min_depth, max_depth]` and a fair coin between
/// [`full`] and [`grow`].
///
/// This is the default population initializer; committing to one shape or
/// depth biases search.
///
/// # Panics
/// Panics if `min_depth > max_depth`.
pub fn ramped_half_and_half<R: Rng>(
    table: &OperatorTable,
    return_type: &Type,
    min_depth: usize,
    max_depth: usize,
    population_size: usize,
    rng: &mut R,
) -> Result<Vec<Tree>, Error> {
    assert!(
        min_depth <= max_depth,
        "min_depth must not exceed max_depth"
    );

    let mut population = Vec::with_capacity(population_size);
    for _ in 0..population_size {
        let depth = rng.random_range(min_depth..=max_depth);
        let tree = if rng.random_bool(0.5) {
            full(table, return_type, depth, rng)?
        } else {
            grow(table, return_type, depth, rng)?
        };
        population.push(tree);
    }
    Ok(population)
}

pub(crate) fn full_node<R: Rng>(
    table: &OperatorTable,
    required: &Type,
    depth: usize,
    max_depth: usize,
    rng: &mut R,
) -> Result<Node, Error> {
    if depth >= max_depth {
        let symbol = pick(
            table.terminals_returning(required),
            required,
            CandidateKind::Terminal,
            depth,
            rng,
        )?;
        Node::terminal(symbol)
    } else {
        let symbol = pick(
            table.operators_returning(required),
            required,
            CandidateKind::Operator,
            depth,
            rng,
        )?;
        let mut children = Vec::with_capacity(symbol.arity());
        for parameter in symbol.signature() {
            children.push(full_node(table, parameter, depth + 1, max_depth, rng)?);
        }
        Node::new(symbol, children)
    }
}

pub(crate) fn grow_node<R: Rng>(
    table: &OperatorTable,
    required: &Type,
    depth: usize,
    max_depth: usize,
    rng: &mut R,
) -> Result<Node, Error> {
    let (candidates, kind) = if depth >= max_depth {
        (table.terminals_returning(required), CandidateKind::Terminal)
    } else {
        (table.symbols_returning(required), CandidateKind::Any)
    };
    let symbol = pick(candidates, required, kind, depth, rng)?;
    let mut children = Vec::with_capacity(symbol.arity());
    for parameter in symbol.signature() {
        children.push(grow_node(table, parameter, depth + 1, max_depth, rng)?);
    }
    Node::new(symbol, children)
}

/// Uniform choice from a candidate list, or a [`Error::Generation`] naming
/// what was required and where.
fn pick<R: Rng>(
    candidates: Vec<Arc<Symbol>>,
    required: &Type,
    kind: CandidateKind,
    depth: usize,
    rng: &mut R,
) -> Result<Arc<Symbol>, Error> {
    candidates
        .choose(rng)
        .cloned()
        .ok_or_else(|| Error::Generation {
            required: required.clone(),
            kind,
            depth,
        })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Symbol;
    use crate::random::create_rng;

    fn int() -> Type {
        Type::base("Int")
    }

    fn bool_ty() -> Type {
        Type::base("Bool")
    }

    /// The minimal closed table: Int and Bool terminals plus a binary Int
    /// operator.
    fn minimal_table() -> OperatorTable {
        OperatorTable::new(vec![
            Symbol::terminal("one", int()),
            Symbol::terminal("true", bool_ty()),
            Symbol::operator("add", vec![int(), int()], int()),
        ])
        .expect("closure holds")
    }

    fn richer_table() -> OperatorTable {
        OperatorTable::new(vec![
            Symbol::terminal("one", int()),
            Symbol::terminal("x", int()),
            Symbol::operator("add", vec![int(), int()], int()),
            Symbol::operator("mul", vec![int(), int()], int()),
            Symbol::operator("neg", vec![int()], int()),
        ])
        .expect("closure holds")
    }

    fn assert_well_typed(tree: &Tree) {
        fn check(node: &crate::tree::Node) {
            for (expected, child) in node.symbol().signature().iter().zip(node.children()) {
                assert!(
                    expected.contains(child.return_type()),
                    "child `{}` does not satisfy `{}`",
                    child.return_type(),
                    expected
                );
                check(child);
            }
        }
        check(tree.root());
    }

    // ---- full ----

    #[test]
    fn test_full_depth_one_is_exact() {
        // With one operator and one Int terminal, full at depth 1 has a
        // single possible outcome.
        let table = minimal_table();
        let mut rng = create_rng(42);
        for _ in 0..20 {
            let tree = full(&table, &int(), 1, &mut rng).expect("generable");
            assert_eq!(tree.to_string(), "add(one, one)");
        }
    }

    #[test]
    fn test_full_every_leaf_at_max_depth() {
        let table = richer_table();
        let mut rng = create_rng(42);
        for depth in 0..5 {
            let tree = full(&table, &int(), depth, &mut rng).expect("generable");
            assert_well_typed(&tree);
            for node in tree.iter() {
                if node.is_leaf() {
                    assert_eq!(node.depth(), depth);
                }
            }
        }
    }

    #[test]
    fn test_full_depth_zero_is_terminal() {
        let table = minimal_table();
        let mut rng = create_rng(42);
        let tree = full(&table, &int(), 0, &mut rng).expect("generable");
        assert_eq!(tree.size(), 1);
        assert!(tree.root().symbol().is_terminal());
    }

    #[test]
    fn test_full_fails_without_operator_for_type() {
        // Bool has a terminal but no operator; full below the bound must
        // fail rather than substitute a terminal.
        let table = minimal_table();
        let mut rng = create_rng(42);
        let err = full(&table, &bool_ty(), 2, &mut rng).expect_err("no Bool operator");
        assert!(matches!(
            err,
            Error::Generation {
                kind: CandidateKind::Operator,
                depth: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_full_root_type_respected() {
        let table = minimal_table();
        let mut rng = create_rng(42);
        let tree = full(&table, &bool_ty(), 0, &mut rng).expect("generable");
        assert_eq!(tree.return_type(), &bool_ty());
    }

    // ---- grow ----

    #[test]
    fn test_grow_leaves_within_bound() {
        let table = richer_table();
        let mut rng = create_rng(42);
        for _ in 0..50 {
            let tree = grow(&table, &int(), 4, &mut rng).expect("generable");
            assert_well_typed(&tree);
            assert!(tree.height() <= 4);
        }
    }

    #[test]
    fn test_grow_depth_one_both_shapes_occur() {
        let table = minimal_table();
        let mut rng = create_rng(42);
        let mut saw_terminal = false;
        let mut saw_operator = false;
        for _ in 0..200 {
            let tree = grow(&table, &int(), 1, &mut rng).expect("generable");
            match tree.to_string().as_str() {
                "one" => saw_terminal = true,
                "add(one, one)" => saw_operator = true,
                other => panic!("unexpected tree `{other}`"),
            }
        }
        assert!(saw_terminal && saw_operator);
    }

    #[test]
    fn test_grow_produces_irregular_shapes() {
        let table = richer_table();
        let mut rng = create_rng(42);
        let heights: Vec<usize> = (0..100)
            .map(|_| {
                grow(&table, &int(), 5, &mut rng)
                    .expect("generable")
                    .height()
            })
            .collect();
        let min = heights.iter().min().copied().unwrap_or(0);
        let max = heights.iter().max().copied().unwrap_or(0);
        assert!(min < max, "expected varied heights, got constant {min}");
    }

    #[test]
    fn test_grow_fails_without_terminal_for_type() {
        // A type producible only by operators cannot close a branch.
        let table = OperatorTable::new(vec![
            Symbol::terminal("one", int()),
            Symbol::operator("lt", vec![int(), int()], bool_ty()),
        ])
        .expect("closure holds");
        let mut rng = create_rng(42);
        let err = grow(&table, &bool_ty(), 0, &mut rng).expect_err("no Bool terminal");
        assert!(matches!(
            err,
            Error::Generation {
                kind: CandidateKind::Terminal,
                ..
            }
        ));
    }

    // ---- ramped half-and-half ----

    #[test]
    fn test_ramped_population_size_and_bounds() {
        let table = richer_table();
        let mut rng = create_rng(42);
        let population =
            ramped_half_and_half(&table, &int(), 1, 4, 64, &mut rng).expect("generable");
        assert_eq!(population.len(), 64);
        for tree in &population {
            assert_well_typed(tree);
            assert!(tree.height() <= 4);
            assert_eq!(tree.return_type(), &int());
        }
    }

    #[test]
    fn test_ramped_varies_heights() {
        let table = richer_table();
        let mut rng = create_rng(42);
        let population =
            ramped_half_and_half(&table, &int(), 1, 4, 64, &mut rng).expect("generable");
        let heights: std::collections::HashSet<usize> =
            population.iter().map(Tree::height).collect();
        assert!(heights.len() > 1, "expected shape diversity");
    }

    #[test]
    fn test_ramped_reproducible_with_seed() {
        let table = richer_table();
        let a = ramped_half_and_half(&table, &int(), 1, 4, 16, &mut create_rng(7))
            .expect("generable");
        let b = ramped_half_and_half(&table, &int(), 1, 4, 16, &mut create_rng(7))
            .expect("generable");
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "min_depth must not exceed max_depth")]
    fn test_ramped_rejects_inverted_bounds() {
        let table = minimal_table();
        let mut rng = create_rng(42);
        let _ = ramped_half_and_half(&table, &int(), 3, 1, 4, &mut rng);
    }
}
