//! Tournament selection under Pareto dominance.
//!
//! Selection determines which individuals become parents. Tournament
//! selection samples a small group and keeps the best; with a fitness
//! *vector* rather than a scalar, "best" is the Pareto rule: an entrant wins
//! outright only if it is dominated by no other entrant, and mutual
//! non-dominance is settled by a uniform random draw — never by insertion
//! order, which would bias selection toward earlier-created individuals.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective GA: NSGA-II"

use crate::error::Error;
use crate::solution::{Objective, Solution};
use rand::seq::IndexedRandom;
use rand::Rng;

/// Selects one individual from `population` by Pareto tournament.
///
/// Samples `tournament_size` *distinct* individuals uniformly at random
/// (without replacement within the tournament), discards every entrant
/// dominated by another entrant, and returns the index of a uniformly random
/// member of the remaining non-dominated set.
///
/// # Errors
///
/// - [`Error::InvalidTournament`] if `tournament_size` is zero, exceeds the
///   population size, or an entrant's fitness vector is not aligned to
///   `objectives`.
/// - [`Error::MissingFitness`] if a sampled individual is unevaluated.
pub fn tournament_select<R: Rng>(
    population: &[Solution],
    tournament_size: usize,
    objectives: &[Objective],
    rng: &mut R,
) -> Result<usize, Error> {
    if tournament_size == 0 {
        return Err(Error::InvalidTournament(
            "tournament_size must be at least 1".to_string(),
        ));
    }
    if tournament_size > population.len() {
        return Err(Error::InvalidTournament(format!(
            "tournament_size {} exceeds population size {}",
            tournament_size,
            population.len()
        )));
    }

    let entrants: Vec<usize> =
        rand::seq::index::sample(rng, population.len(), tournament_size).into_vec();

    let mut fitnesses = Vec::with_capacity(entrants.len());
    for &index in &entrants {
        let fitness = population[index]
            .fitness()
            .ok_or(Error::MissingFitness { index })?;
        if fitness.values().len() != objectives.len() {
            return Err(Error::InvalidTournament(format!(
                "individual {} carries {} objective values, expected {}",
                index,
                fitness.values().len(),
                objectives.len()
            )));
        }
        fitnesses.push(fitness);
    }

    let non_dominated: Vec<usize> = (0..entrants.len())
        .filter(|&i| {
            !(0..entrants.len()).any(|j| j != i && fitnesses[j].dominates(fitnesses[i], objectives))
        })
        .map(|i| entrants[i])
        .collect();

    // Dominance is a strict partial order, so a non-empty tournament always
    // has at least one non-dominated entrant.
    non_dominated
        .choose(rng)
        .copied()
        .ok_or_else(|| Error::InvalidTournament("empty tournament".to_string()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Symbol;
    use crate::random::create_rng;
    use crate::solution::{Direction, Fitness};
    use crate::tree::{Node, Tree};
    use crate::types::Type;
    use std::sync::Arc;

    fn leaf_tree() -> Tree {
        let one = Arc::new(Symbol::terminal("one", Type::base("Int")));
        Tree::new(Node::terminal(one).expect("terminal"))
    }

    fn population_with(values: &[Vec<f64>]) -> Vec<Solution> {
        values
            .iter()
            .map(|v| {
                let mut s = Solution::new(leaf_tree());
                s.assign_fitness(Fitness::new(v.clone())).expect("write");
                s
            })
            .collect()
    }

    fn min_objectives(n: usize) -> Vec<Objective> {
        (0..n)
            .map(|i| Objective::new(format!("obj{i}"), Direction::Minimize))
            .collect()
    }

    #[test]
    fn test_full_tournament_picks_the_dominant() {
        let objectives = min_objectives(1);
        let population = population_with(&[vec![10.0], vec![5.0], vec![1.0], vec![8.0]]);
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let winner = tournament_select(&population, 4, &objectives, &mut rng)
                .expect("valid tournament");
            assert_eq!(winner, 2);
        }
    }

    #[test]
    fn test_winner_never_dominated_by_population() {
        let objectives = min_objectives(2);
        let population = population_with(&[
            vec![1.0, 5.0],
            vec![3.0, 3.0],
            vec![5.0, 1.0],
            vec![4.0, 4.0],
            vec![6.0, 6.0],
        ]);
        let mut rng = create_rng(42);
        for _ in 0..500 {
            let winner =
                tournament_select(&population, 3, &objectives, &mut rng).expect("valid tournament");
            // Dominance within a tournament implies dominance in the
            // population slice, so the winner is never (6, 6).
            assert_ne!(winner, 4);
        }
    }

    #[test]
    fn test_selection_pressure_favors_better() {
        let objectives = min_objectives(1);
        let population = population_with(&[vec![10.0], vec![5.0], vec![1.0], vec![8.0]]);
        let mut rng = create_rng(42);
        let mut counts = [0u32; 4];
        let n = 10_000;
        for _ in 0..n {
            let winner =
                tournament_select(&population, 2, &objectives, &mut rng).expect("valid tournament");
            counts[winner] += 1;
        }
        // fitness 1.0 wins every tournament it enters: P = 1 - C(3,2)/C(4,2) = 1/2
        assert!(
            counts[2] > 4_000,
            "expected the best individual to dominate selection, got {counts:?}"
        );
        assert!(counts[2] > counts[0]);
    }

    #[test]
    fn test_tie_break_is_uniform_among_non_dominated() {
        // Two mutually non-dominating individuals; tournament of both must
        // split roughly evenly rather than follow insertion order.
        let objectives = min_objectives(2);
        let population = population_with(&[vec![1.0, 5.0], vec![5.0, 1.0]]);
        let mut rng = create_rng(42);
        let mut counts = [0u32; 2];
        let n = 10_000;
        for _ in 0..n {
            let winner =
                tournament_select(&population, 2, &objectives, &mut rng).expect("valid tournament");
            counts[winner] += 1;
        }
        for &c in &counts {
            assert!(
                c > 4_000,
                "expected a roughly even split between non-dominated entrants, got {counts:?}"
            );
        }
    }

    #[test]
    fn test_tournament_size_one_is_uniform() {
        let objectives = min_objectives(1);
        let population = population_with(&[vec![10.0], vec![5.0], vec![1.0], vec![8.0]]);
        let mut rng = create_rng(42);
        let mut counts = [0u32; 4];
        let n = 10_000;
        for _ in 0..n {
            let winner =
                tournament_select(&population, 1, &objectives, &mut rng).expect("valid tournament");
            counts[winner] += 1;
        }
        for &c in &counts {
            assert!(c > 1_500, "expected uniform selection, got {counts:?}");
        }
    }

    #[test]
    fn test_oversized_tournament_is_an_error() {
        let objectives = min_objectives(1);
        let population = population_with(&[vec![1.0], vec![2.0]]);
        let mut rng = create_rng(42);
        let err = tournament_select(&population, 3, &objectives, &mut rng)
            .expect_err("tournament larger than population");
        assert!(matches!(err, Error::InvalidTournament(_)));
    }

    #[test]
    fn test_zero_tournament_is_an_error() {
        let objectives = min_objectives(1);
        let population = population_with(&[vec![1.0]]);
        let mut rng = create_rng(42);
        let err = tournament_select(&population, 0, &objectives, &mut rng)
            .expect_err("zero entrants");
        assert!(matches!(err, Error::InvalidTournament(_)));
    }

    #[test]
    fn test_unevaluated_entrant_is_an_error() {
        let objectives = min_objectives(1);
        let mut population = population_with(&[vec![1.0]]);
        population.push(Solution::new(leaf_tree()));
        let mut rng = create_rng(42);
        let err = tournament_select(&population, 2, &objectives, &mut rng)
            .expect_err("one entrant lacks fitness");
        assert_eq!(err, Error::MissingFitness { index: 1 });
    }

    #[test]
    fn test_misaligned_fitness_is_an_error() {
        let objectives = min_objectives(2);
        let population = population_with(&[vec![1.0], vec![2.0]]);
        let mut rng = create_rng(42);
        let err = tournament_select(&population, 2, &objectives, &mut rng)
            .expect_err("fitness vector shorter than objectives");
        assert!(matches!(err, Error::InvalidTournament(_)));
    }
}
