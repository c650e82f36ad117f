//! Structure-preserving, type-preserving genetic operators.
//!
//! Every operator here takes one or two parent trees plus the operator table
//! and produces a *new* tree without mutating the parents; replaced subtrees
//! are rebuilt copy-on-construct, so the output is well-typed by construction
//! and no validation pass runs afterwards.
//!
//! Site selection is uniform over all nodes of the (first) parent — not
//! depth-weighted — so retry behavior and test statistics are unbiased.
//!
//! Point mutations that find no alternative symbol are **no-ops**: they
//! return a tree deep-equal to the parent. That is a valid, observable
//! outcome, not an error.

use crate::error::Error;
use crate::generate;
use crate::lang::{OperatorTable, Symbol};
use crate::tree::{Node, Tree};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use std::sync::Arc;

/// Default bound on crossover's internal site retries.
pub const DEFAULT_CROSSOVER_ATTEMPTS: usize = 8;

/// Subtree crossover: replaces a random subtree of `parent_a` with a
/// compatible subtree drawn from `parent_b`.
///
/// A site in `parent_a` is chosen uniformly at random; the donor set is every
/// node of `parent_b` whose return type satisfies the type that site demands,
/// and one donor is chosen uniformly from it. When a site has no compatible
/// donor, a different site is tried — distinct sites, up to `max_attempts`
/// of them — after which the call fails with
/// [`Error::IncompatibleCrossover`]. Callers should treat that as "no
/// offspring produced" and reselect parents, not as fatal.
pub fn crossover_subtree<R: Rng>(
    parent_a: &Tree,
    parent_b: &Tree,
    max_attempts: usize,
    rng: &mut R,
) -> Result<Tree, Error> {
    let attempts = max_attempts.max(1).min(parent_a.size());
    let mut sites: Vec<usize> = (0..parent_a.size()).collect();
    sites.shuffle(rng);

    for &site in sites.iter().take(attempts) {
        let Some(required) = parent_a.required_type(site) else {
            continue;
        };
        let donors: Vec<&Node> = parent_b
            .iter()
            .filter(|node| required.contains(node.return_type()))
            .collect();
        if let Some(donor) = donors.choose(rng) {
            return parent_a.with_replaced(site, (*donor).clone());
        }
    }
    Err(Error::IncompatibleCrossover { attempts })
}

/// Subtree mutation: regenerates a random subtree from scratch.
///
/// The site is chosen uniformly; the replacement is generated for the type
/// that site demands, with a fresh depth budget of `max_depth` minus the
/// site's depth and a fair coin between the `full` and `grow` strategies.
pub fn mutate_subtree<R: Rng>(
    parent: &Tree,
    table: &OperatorTable,
    max_depth: usize,
    rng: &mut R,
) -> Result<Tree, Error> {
    let site = rng.random_range(0..parent.size());
    let out_of_bounds = || Error::IndexOutOfBounds {
        index: site,
        size: parent.size(),
    };
    let site_depth = parent.get(site).ok_or_else(out_of_bounds)?.depth();
    let required = parent.required_type(site).ok_or_else(out_of_bounds)?;
    let budget = max_depth.saturating_sub(site_depth);

    let replacement = if rng.random_bool(0.5) {
        generate::full_node(table, &required, 0, budget, rng)?
    } else {
        generate::grow_node(table, &required, 0, budget, rng)?
    };
    parent.with_replaced(site, replacement)
}

/// Point mutation of an interior node: swaps its operator for another
/// compatible operator with the *same* parameter signature, keeping the
/// children as they are.
///
/// No-op (offspring equals parent) when the tree has no interior node or no
/// alternative operator exists.
pub fn mutate_interior_node<R: Rng>(
    parent: &Tree,
    table: &OperatorTable,
    rng: &mut R,
) -> Result<Tree, Error> {
    let interior: Vec<usize> = parent
        .iter()
        .enumerate()
        .filter(|(_, node)| !node.symbol().is_terminal())
        .map(|(index, _)| index)
        .collect();
    let Some(&site) = interior.choose(rng) else {
        return Ok(parent.clone());
    };

    let out_of_bounds = || Error::IndexOutOfBounds {
        index: site,
        size: parent.size(),
    };
    let node = parent.get(site).ok_or_else(out_of_bounds)?;
    let required = parent.required_type(site).ok_or_else(out_of_bounds)?;

    let alternatives: Vec<Arc<Symbol>> = table
        .operators_returning(&required)
        .into_iter()
        .filter(|candidate| {
            candidate.signature() == node.symbol().signature() && candidate != node.symbol()
        })
        .collect();
    let Some(symbol) = alternatives.choose(rng) else {
        return Ok(parent.clone());
    };

    let replacement = Node::new(Arc::clone(symbol), node.children().to_vec())?;
    parent.with_replaced(site, replacement)
}

/// Point mutation of a leaf: swaps a random terminal for another terminal
/// satisfying the same required type.
///
/// No-op when no other compatible terminal exists.
pub fn mutate_leaf_node<R: Rng>(
    parent: &Tree,
    table: &OperatorTable,
    rng: &mut R,
) -> Result<Tree, Error> {
    let leaves: Vec<usize> = parent
        .iter()
        .enumerate()
        .filter(|(_, node)| node.symbol().is_terminal())
        .map(|(index, _)| index)
        .collect();
    let Some(&site) = leaves.choose(rng) else {
        return Ok(parent.clone());
    };

    let out_of_bounds = || Error::IndexOutOfBounds {
        index: site,
        size: parent.size(),
    };
    let node = parent.get(site).ok_or_else(out_of_bounds)?;
    let required = parent.required_type(site).ok_or_else(out_of_bounds)?;

    let alternatives: Vec<Arc<Symbol>> = table
        .terminals_returning(&required)
        .into_iter()
        .filter(|candidate| candidate != node.symbol())
        .collect();
    let Some(symbol) = alternatives.choose(rng) else {
        return Ok(parent.clone());
    };

    let replacement = Node::terminal(Arc::clone(symbol))?;
    parent.with_replaced(site, replacement)
}

// ============================================================================
// Tests
// ============================================================================
