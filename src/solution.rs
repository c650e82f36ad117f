//! Candidate solutions, objectives, and multi-objective fitness.
//!
//! A [`Solution`] owns one [`Tree`] and an optional [`Fitness`]. Fitness is
//! assigned exactly once, by an external evaluator the crate never calls on
//! its own; the crate only stores the result. A [`Fitness`] is an ordered
//! vector of scalar values aligned to a fixed list of [`Objective`]s, and
//! comparison between fitnesses is Pareto dominance: `a` dominates `b` iff
//! `a` is at least as good on every objective and strictly better on at
//! least one, with "better" defined per objective by its [`Direction`].

use crate::error::Error;
use crate::tree::Tree;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The direction in which an objective's scalar metric improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Lower values are better.
    Minimize,
    /// Higher values are better.
    Maximize,
}

/// A named optimization direction over one scalar metric.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Objective {
    name: String,
    direction: Direction,
}

impl Objective {
    /// Creates an objective.
    pub fn new(name: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            direction,
        }
    }

    /// The objective's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Which way the metric improves.
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// An ordered vector of objective values, aligned positionally to a fixed
/// list of [`Objective`]s.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fitness {
    values: Vec<f64>,
}

impl Fitness {
    /// Wraps a vector of objective values.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// The objective values, in objective order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Pareto dominance: whether `self` is at least as good as `other` on
    /// every objective and strictly better on at least one.
    ///
    /// The vectors and `objectives` must be positionally aligned; mismatched
    /// lengths are a caller bug (checked in debug builds).
    pub fn dominates(&self, other: &Fitness, objectives: &[Objective]) -> bool {
        debug_assert_eq!(self.values.len(), other.values.len());
        debug_assert_eq!(self.values.len(), objectives.len());

        let mut self_better = false;
        let mut other_better = false;
        for ((a, b), objective) in self.values.iter().zip(&other.values).zip(objectives) {
            match objective.direction() {
                Direction::Minimize => {
                    if a < b {
                        self_better = true;
                    } else if b < a {
                        other_better = true;
                    }
                }
                Direction::Maximize => {
                    if a > b {
                        self_better = true;
                    } else if b > a {
                        other_better = true;
                    }
                }
            }
        }
        self_better && !other_better
    }
}

/// One individual: a typed tree plus its (write-once) fitness.
#[derive(Debug, Clone)]
pub struct Solution {
    tree: Tree,
    fitness: Option<Fitness>,
}

impl Solution {
    /// Wraps a freshly produced tree; fitness starts unassigned.
    pub fn new(tree: Tree) -> Self {
        Self {
            tree,
            fitness: None,
        }
    }

    /// The solution's tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The assigned fitness, if the external evaluator has run.
    pub fn fitness(&self) -> Option<&Fitness> {
        self.fitness.as_ref()
    }

    /// Whether a fitness has been assigned.
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Stores the evaluator's result. Fitness is write-once; a second call
    /// fails with [`Error::FitnessAlreadyAssigned`].
    pub fn assign_fitness(&mut self, fitness: Fitness) -> Result<(), Error> {
        if self.fitness.is_some() {
            return Err(Error::FitnessAlreadyAssigned);
        }
        self.fitness = Some(fitness);
        Ok(())
    }

    /// Whether this solution Pareto-dominates `other`. `false` when either
    /// solution is unevaluated.
    pub fn dominates(&self, other: &Solution, objectives: &[Objective]) -> bool {
        match (self.fitness(), other.fitness()) {
            (Some(a), Some(b)) => a.dominates(b, objectives),
            _ => false,
        }
    }
}

/// Indices of the population's Pareto front: every individual dominated by
/// no other. Unevaluated individuals never dominate, so they can only appear
/// in the front of an entirely unevaluated population.
pub fn pareto_front(population: &[Solution], objectives: &[Objective]) -> Vec<usize> {
    (0..population.len())
        .filter(|&i| {
            !(0..population.len())
                .any(|j| j != i && population[j].dominates(&population[i], objectives))
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
