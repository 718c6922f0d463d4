//! Acceptance policies steering the local search.
//!
//! The engine enumerates moves and evaluates them exactly; a
//! [`Metaheuristic`] only decides whether an evaluated, feasible candidate
//! replaces the current solution.
//!
//! - [`GreedyDescent`] — Accept strict improvements only
//! - [`SimulatedAnnealing`] — Metropolis acceptance with geometric cooling
//!   and a short tabu list on move attributes

use std::collections::{HashSet, VecDeque};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::moves::MoveKey;
use crate::config::{MetaheuristicKind, SolverConfig};

/// Acceptance policy of a local search run.
pub trait Metaheuristic: Send {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Resets internal state before a run.
    fn on_start(&mut self);

    /// Decides whether `candidate` replaces `current`.
    ///
    /// Values are routing costs. `key` is the attribute of the move that
    /// produced the candidate and `best` the lowest cost seen so far.
    fn accept(&mut self, key: Option<MoveKey>, current: i64, candidate: i64, best: i64) -> bool;

    /// Called after a move was committed; `reverse` undoes it.
    fn on_accept(&mut self, reverse: Option<MoveKey>) {
        let _ = reverse;
    }

    /// Called once per completed sweep.
    fn on_sweep_end(&mut self) {}
}

impl std::fmt::Debug for dyn Metaheuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Metaheuristic {{ name: {} }}", self.name())
    }
}

/// Builds the policy selected in `config`, seeded with `seed`.
pub fn from_config(config: &SolverConfig, seed: u64) -> Box<dyn Metaheuristic> {
    match config.metaheuristic {
        MetaheuristicKind::GreedyDescent => Box::new(GreedyDescent),
        MetaheuristicKind::SimulatedAnnealing => Box::new(SimulatedAnnealing::new(
            config.initial_temperature,
            config.cooling_factor,
            config.tabu_tenure,
            seed,
        )),
    }
}

/// Accepts a candidate only if it is strictly better than the current solution.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyDescent;

impl Metaheuristic for GreedyDescent {
    fn name(&self) -> &str {
        "GreedyDescent"
    }

    fn on_start(&mut self) {}

    #[inline]
    fn accept(&mut self, _key: Option<MoveKey>, current: i64, candidate: i64, _best: i64) -> bool {
        candidate < current
    }
}

/// Fixed-tenure memory of move attributes.
#[derive(Debug, Clone)]
pub struct TabuList {
    tenure: usize,
    queue: VecDeque<MoveKey>,
    set: HashSet<MoveKey>,
}

impl TabuList {
    /// Creates a list remembering the last `tenure` attributes; 0 disables it.
    pub fn new(tenure: usize) -> Self {
        Self {
            tenure,
            queue: VecDeque::with_capacity(tenure),
            set: HashSet::with_capacity(tenure),
        }
    }

    /// Records `key`, expiring the oldest entry when full.
    pub fn push(&mut self, key: MoveKey) {
        if self.tenure == 0 {
            return;
        }
        if self.queue.len() >= self.tenure {
            if let Some(oldest) = self.queue.pop_front() {
                self.set.remove(&oldest);
            }
        }
        if self.set.insert(key) {
            self.queue.push_back(key);
        }
    }

    /// Returns `true` if `key` is currently forbidden.
    #[inline]
    pub fn contains(&self, key: &MoveKey) -> bool {
        self.set.contains(key)
    }

    /// Forgets every entry.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.set.clear();
    }

    /// Number of remembered attributes.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is remembered.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Simulated annealing with a tabu list.
///
/// Improving candidates are always accepted. A worsening candidate with
/// objective increase Δ is accepted with probability `exp(-Δ / T)`, where the
/// temperature `T` is multiplied by the cooling factor after every sweep.
/// Moves whose attribute is tabu are rejected unless they beat the best
/// objective found so far (aspiration).
#[derive(Debug, Clone)]
pub struct SimulatedAnnealing {
    initial_temperature: f64,
    temperature: f64,
    cooling_factor: f64,
    min_temperature: f64,
    tabu: TabuList,
    seed: u64,
    rng: StdRng,
}

impl SimulatedAnnealing {
    /// Creates the policy.
    ///
    /// # Panics
    ///
    /// Panics if `cooling_factor` is not strictly between 0 and 1.
    pub fn new(initial_temperature: f64, cooling_factor: f64, tabu_tenure: usize, seed: u64) -> Self {
        assert!(
            cooling_factor > 0.0 && cooling_factor < 1.0,
            "cooling factor must be in (0, 1), got {cooling_factor}"
        );
        Self {
            initial_temperature,
            temperature: initial_temperature,
            cooling_factor,
            min_temperature: 1e-3,
            tabu: TabuList::new(tabu_tenure),
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Current temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Returns `true` once worsening moves are no longer accepted.
    pub fn is_frozen(&self) -> bool {
        self.temperature <= self.min_temperature
    }

    /// Tabu memory.
    pub fn tabu(&self) -> &TabuList {
        &self.tabu
    }
}

impl Metaheuristic for SimulatedAnnealing {
    fn name(&self) -> &str {
        "SimulatedAnnealing"
    }

    fn on_start(&mut self) {
        self.temperature = self.initial_temperature;
        self.tabu.clear();
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    fn accept(&mut self, key: Option<MoveKey>, current: i64, candidate: i64, best: i64) -> bool {
        if key.is_some_and(|k| self.tabu.contains(&k)) {
            return candidate < best;
        }
        if candidate < current {
            return true;
        }
        if self.is_frozen() {
            return false;
        }
        let delta = candidate.saturating_sub(current) as f64;
        let p = (-delta / self.temperature).exp();
        self.rng.random::<f64>() < p
    }

    fn on_accept(&mut self, reverse: Option<MoveKey>) {
        if let Some(k) = reverse {
            self.tabu.push(k);
        }
    }

    fn on_sweep_end(&mut self) {
        self.temperature *= self.cooling_factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greedy_strict() {
        let mut g = GreedyDescent;
        assert!(g.accept(None, 10, 9, 9));
        assert!(!g.accept(None, 10, 10, 10));
        assert!(!g.accept(None, 10, 11, 10));
    }

    #[test]
    fn test_tabu_list_expires() {
        let mut t = TabuList::new(2);
        t.push(MoveKey::Swap(1, 2));
        t.push(MoveKey::Swap(1, 3));
        t.push(MoveKey::Swap(1, 4));
        assert_eq!(t.len(), 2);
        assert!(!t.contains(&MoveKey::Swap(1, 2)));
        assert!(t.contains(&MoveKey::Swap(1, 4)));
    }

    #[test]
    fn test_tabu_disabled() {
        let mut t = TabuList::new(0);
        t.push(MoveKey::Swap(1, 2));
        assert!(t.is_empty());
    }

    #[test]
    fn test_annealing_tabu_and_aspiration() {
        let mut sa = SimulatedAnnealing::new(100.0, 0.5, 4, 7);
        sa.on_start();
        let key = MoveKey::NodeToVehicle(3, 0);
        sa.on_accept(Some(key));
        // improving but tabu and not a new best
        assert!(!sa.accept(Some(key), 50, 45, 40));
        // tabu but beats the best
        assert!(sa.accept(Some(key), 50, 35, 40));
        // not tabu, improving
        assert!(sa.accept(Some(MoveKey::Swap(1, 2)), 50, 45, 40));
    }

    #[test]
    fn test_annealing_freezes() {
        let mut sa = SimulatedAnnealing::new(1.0, 0.1, 0, 7);
        sa.on_start();
        for _ in 0..5 {
            sa.on_sweep_end();
        }
        assert!(sa.is_frozen());
        assert!(!sa.accept(None, 10, 11, 10));
    }

    #[test]
    fn test_annealing_is_reproducible() {
        let run = || {
            let mut sa = SimulatedAnnealing::new(10.0, 0.9, 0, 99);
            sa.on_start();
            (0..50).map(|i| sa.accept(None, 100, 100 + i % 7, 90)).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_from_config() {
        let config = SolverConfig::default();
        assert_eq!(from_config(&config, 1).name(), "GreedyDescent");
        let config = config.with_metaheuristic(MetaheuristicKind::SimulatedAnnealing);
        assert_eq!(from_config(&config, 1).name(), "SimulatedAnnealing");
    }
}
