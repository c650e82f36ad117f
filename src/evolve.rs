//! The generational evolutionary loop.
//!
//! Ties the substrate together: ramped half-and-half initialization,
//! Pareto tournament selection, subtree crossover with a mutation fallback,
//! and rate-gated subtree/point mutations. Fitness evaluation stays with the
//! caller — [`evolve`] takes a closure from tree to fitness vector and only
//! stores what it returns.
//!
//! With the `parallel` feature enabled, evaluation runs across the
//! population on rayon worker threads; the operator table and type values
//! are read-only shared state, so no locking is involved.

use crate::error::Error;
use crate::generate::ramped_half_and_half;
use crate::lang::OperatorTable;
use crate::random::create_rng;
use crate::selection::tournament_select;
use crate::solution::{pareto_front, Fitness, Objective, Solution};
use crate::tree::Tree;
use crate::types::Type;
use crate::variation::{
    crossover_subtree, mutate_interior_node, mutate_leaf_node, mutate_subtree,
    DEFAULT_CROSSOVER_ATTEMPTS,
};
use log::debug;
use rand::Rng;

/// Parameters of the evolutionary loop.
///
/// # Builder Pattern
///
/// ```
/// use stgp::evolve::EvolveConfig;
///
/// let config = EvolveConfig::default()
///     .with_population_size(200)
///     .with_max_generations(30)
///     .with_tournament_size(5)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolveConfig {
    /// Number of individuals in the population.
    pub population_size: usize,

    /// Number of generations to run.
    pub max_generations: usize,

    /// Entrants per selection tournament. Higher = stronger pressure.
    pub tournament_size: usize,

    /// Probability of producing an offspring by crossover (0.0–1.0).
    /// Otherwise the selected parent is cloned.
    pub crossover_rate: f64,

    /// Probability of subtree-mutating an offspring (0.0–1.0).
    pub subtree_mutation_rate: f64,

    /// Probability of point-mutating an offspring (0.0–1.0); the point
    /// mutation targets an interior node or a leaf with equal probability.
    pub point_mutation_rate: f64,

    /// Minimum depth drawn by the ramped half-and-half initializer.
    pub min_depth: usize,

    /// Maximum tree depth, for initialization and mutation budgets alike.
    pub max_depth: usize,

    /// Bound on crossover's internal site retries before it reports an
    /// incompatible pairing.
    pub crossover_attempts: usize,

    /// Random seed for reproducibility. `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl Default for EvolveConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 50,
            tournament_size: 3,
            crossover_rate: 0.9,
            subtree_mutation_rate: 0.1,
            point_mutation_rate: 0.1,
            min_depth: 1,
            max_depth: 5,
            crossover_attempts: DEFAULT_CROSSOVER_ATTEMPTS,
            seed: None,
        }
    }
}

impl EvolveConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the subtree mutation rate.
    pub fn with_subtree_mutation_rate(mut self, rate: f64) -> Self {
        self.subtree_mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the point mutation rate.
    pub fn with_point_mutation_rate(mut self, rate: f64) -> Self {
        self.point_mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the depth range used by the initializer.
    pub fn with_depth_range(mut self, min_depth: usize, max_depth: usize) -> Self {
        self.min_depth = min_depth;
        self.max_depth = max_depth;
        self
    }

    /// Sets the crossover retry bound.
    pub fn with_crossover_attempts(mut self, attempts: usize) -> Self {
        self.crossover_attempts = attempts;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.max_generations == 0 {
            return Err("max_generations must be at least 1".into());
        }
        if self.tournament_size == 0 {
            return Err("tournament_size must be at least 1".into());
        }
        if self.tournament_size > self.population_size {
            return Err("tournament_size must not exceed population_size".into());
        }
        if self.min_depth > self.max_depth {
            return Err("min_depth must not exceed max_depth".into());
        }
        if self.crossover_attempts == 0 {
            return Err("crossover_attempts must be at least 1".into());
        }
        Ok(())
    }
}

/// Result of an evolutionary run.
#[derive(Debug, Clone)]
pub struct EvolveResult {
    /// The final, fully evaluated population.
    pub population: Vec<Solution>,

    /// Number of generations executed.
    pub generations: usize,

    /// Indices into `population` of its Pareto front.
    pub pareto_front: Vec<usize>,
}

/// Runs the evolutionary loop.
///
/// `evaluate` is the caller's fitness function; it must return a vector
/// aligned to `objectives`. It is called once per fresh individual — in
/// parallel across the population when the `parallel` feature is enabled.
///
/// Crossover pairings that fail with [`Error::IncompatibleCrossover`] are
/// recovered by subtree-mutating the first parent instead; all other errors
/// propagate.
pub fn evolve<F>(
    table: &OperatorTable,
    return_type: &Type,
    objectives: &[Objective],
    evaluate: F,
    config: &EvolveConfig,
) -> Result<EvolveResult, Error>
where
    F: Fn(&Tree) -> Fitness + Sync,
{
    config.validate().map_err(Error::InvalidConfig)?;

    let mut rng = match config.seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    };

    let trees = ramped_half_and_half(
        table,
        return_type,
        config.min_depth,
        config.max_depth,
        config.population_size,
        &mut rng,
    )?;
    let mut population: Vec<Solution> = trees.into_iter().map(Solution::new).collect();
    evaluate_population(&evaluate, &mut population)?;

    for generation in 0..config.max_generations {
        let mut next: Vec<Solution> = Vec::with_capacity(config.population_size);

        while next.len() < config.population_size {
            let parent = tournament_select(&population, config.tournament_size, objectives, &mut rng)?;

            let mut child = if rng.random_range(0.0..1.0) < config.crossover_rate {
                let mate =
                    tournament_select(&population, config.tournament_size, objectives, &mut rng)?;
                match crossover_subtree(
                    population[parent].tree(),
                    population[mate].tree(),
                    config.crossover_attempts,
                    &mut rng,
                ) {
                    Ok(tree) => tree,
                    // no offspring from this pairing; mutate the first
                    // parent instead of stalling the loop
                    Err(Error::IncompatibleCrossover { .. }) => {
                        mutate_subtree(population[parent].tree(), table, config.max_depth, &mut rng)?
                    }
                    Err(other) => return Err(other),
                }
            } else {
                population[parent].tree().clone()
            };

            if rng.random_range(0.0..1.0) < config.subtree_mutation_rate {
                child = mutate_subtree(&child, table, config.max_depth, &mut rng)?;
            }
            if rng.random_range(0.0..1.0) < config.point_mutation_rate {
                child = if rng.random_bool(0.5) {
                    mutate_interior_node(&child, table, &mut rng)?
                } else {
                    mutate_leaf_node(&child, table, &mut rng)?
                };
            }

            next.push(Solution::new(child));
        }

        evaluate_population(&evaluate, &mut next)?;
        population = next;

        debug!(
            "generation {}/{}: population {}, front size {}",
            generation + 1,
            config.max_generations,
            population.len(),
            pareto_front(&population, objectives).len(),
        );
    }

    let front = pareto_front(&population, objectives);
    Ok(EvolveResult {
        population,
        generations: config.max_generations,
        pareto_front: front,
    })
}

#[cfg(feature = "parallel")]
fn evaluate_population<F>(evaluate: &F, population: &mut [Solution]) -> Result<(), Error>
where
    F: Fn(&Tree) -> Fitness + Sync,
{
    use rayon::prelude::*;

    population.par_iter_mut().try_for_each(|solution| {
        let fitness = evaluate(solution.tree());
        solution.assign_fitness(fitness)
    })
}

#[cfg(not(feature = "parallel"))]
fn evaluate_population<F>(evaluate: &F, population: &mut [Solution]) -> Result<(), Error>
where
    F: Fn(&Tree) -> Fitness + Sync,
{
    for solution in population.iter_mut() {
        let fitness = evaluate(solution.tree());
        solution.assign_fitness(fitness)?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
