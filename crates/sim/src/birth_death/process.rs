//! Forward simulation of the occurrence birth-death process.

use rand::Rng;
use rand_distr::{Distribution, Exp1};
use serde::{Deserialize, Serialize};

use super::{BirthDeathParameters, ObservationKind, Observations};
use crate::errors::{ParameterError, SimulationError};
use crate::tree::{Node, NodeId, NodeKind, PhyloTree};

/// Output of a conditioned tree simulation.
#[derive(Debug, Clone)]
pub struct SimulatedTrees {
    /// Tree restricted to sampled lineages.
    pub reconstructed: PhyloTree,
    /// Event records, see [`ObservationKind`].
    pub observations: Observations,
    /// Complete tree including unsampled lineages.
    pub full: PhyloTree,
    /// Number of simulations run until the conditioning was met.
    pub attempts: usize,
}

/// Capability to simulate trees under a birth-death-sampling model.
pub trait TreeSimulator {
    /// Simulate from `origin` (time before present) down to the present,
    /// conditioned on at least one lineage being sampled at present.
    fn simulate_conditioned_on_survival<R: Rng + ?Sized>(
        &self,
        params: &BirthDeathParameters,
        origin: f64,
        rng: &mut R,
    ) -> Result<SimulatedTrees, SimulationError>;
}

/// Gillespie simulation forward in time with rejection-based conditioning.
///
/// Each attempt starts a single lineage at the origin. With `n` live
/// lineages the next event happens after an Exponential(n * (lambda + mu +
/// psi + omega)) waiting time and hits a uniformly chosen lineage:
///
/// - birth splits it in two,
/// - death ends it unsampled,
/// - psi-sampling ends it with probability r, otherwise leaves a
///   zero-length sampled-ancestor leaf and lets it continue,
/// - an omega occurrence ends it with probability r, otherwise it only
///   leaves a record.
///
/// Lineages reaching the present are sampled with probability rho.
/// Attempts repeat until at least one lineage is rho-sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardBirthDeath {
    /// Give up after this many unconditioned simulations.
    pub max_attempts: usize,
    /// Fail once this many lineages are alive at the same time.
    pub max_lineages: usize,
}

impl Default for ForwardBirthDeath {
    fn default() -> Self {
        Self {
            max_attempts: 100_000,
            max_lineages: 100_000,
        }
    }
}

impl ForwardBirthDeath {
    pub fn new(max_attempts: usize, max_lineages: usize) -> Self {
        Self {
            max_attempts,
            max_lineages,
        }
    }

    /// Run a single simulation without conditioning.
    ///
    /// Returns the full tree and the event records.
    pub fn simulate_once<R: Rng + ?Sized>(
        &self,
        params: &BirthDeathParameters,
        origin: f64,
        rng: &mut R,
    ) -> Result<(PhyloTree, Observations), SimulationError> {
        params.validate()?;
        if !origin.is_finite() || origin <= 0.0 {
            return Err(ParameterError::InvalidOrigin(origin).into());
        }

        let mut builder = TreeBuilder::default();
        let mut observations = Observations::new();
        // Parent node of every open lineage; the first one starts at the origin.
        let mut live: Vec<Option<NodeId>> = vec![None];

        let total_rate = params.event_rate();
        let birth_bound = params.birth;
        let death_bound = birth_bound + params.death;
        let psi_bound = death_bound + params.psi;

        let mut t = origin;
        while total_rate > 0.0 && !live.is_empty() {
            let draw: f64 = Exp1.sample(rng);
            t -= draw / (live.len() as f64 * total_rate);
            if t <= 0.0 {
                break;
            }

            let i = rng.random_range(0..live.len());
            let parent = live[i];
            let u = rng.random::<f64>() * total_rate;

            if u < birth_bound {
                if live.len() >= self.max_lineages {
                    return Err(SimulationError::LineageLimit {
                        limit: self.max_lineages,
                    });
                }
                let node = builder.add(parent, t, NodeKind::Internal);
                live[i] = Some(node);
                live.push(Some(node));
            } else if u < death_bound {
                builder.add(parent, t, NodeKind::Extinct);
                live.swap_remove(i);
            } else if u < psi_bound {
                if rng.random::<f64>() < params.removal {
                    let leaf = builder.add(parent, t, NodeKind::PsiSampled);
                    observations.push(ObservationKind::PsiRemoved, t, Some(builder.label(leaf)));
                    live.swap_remove(i);
                } else {
                    let junction = builder.add(parent, t, NodeKind::Internal);
                    let leaf = builder.add(Some(junction), t, NodeKind::SampledAncestor);
                    observations.push(ObservationKind::PsiAncestor, t, Some(builder.label(leaf)));
                    live[i] = Some(junction);
                }
            } else if rng.random::<f64>() < params.removal {
                let leaf = builder.add(parent, t, NodeKind::OccurrenceRemoved);
                observations.push(ObservationKind::OmegaRemoved, t, Some(builder.label(leaf)));
                live.swap_remove(i);
            } else {
                observations.push(ObservationKind::OmegaKept, t, None);
            }
        }

        for parent in live {
            if rng.random::<f64>() < params.rho {
                let leaf = builder.add(parent, 0.0, NodeKind::RhoSampled);
                observations.push(ObservationKind::RhoSampled, 0.0, Some(builder.label(leaf)));
            } else {
                let leaf = builder.add(parent, 0.0, NodeKind::Unsampled);
                observations.push(ObservationKind::ExtantUnsampled, 0.0, Some(builder.label(leaf)));
            }
        }

        let tree = builder.finish(origin)?;
        Ok((tree, observations))
    }
}

impl TreeSimulator for ForwardBirthDeath {
    fn simulate_conditioned_on_survival<R: Rng + ?Sized>(
        &self,
        params: &BirthDeathParameters,
        origin: f64,
        rng: &mut R,
    ) -> Result<SimulatedTrees, SimulationError> {
        for attempt in 1..=self.max_attempts {
            let (full, observations) = self.simulate_once(params, origin, rng)?;
            if observations.count(ObservationKind::RhoSampled) == 0 {
                continue;
            }
            if let Some(reconstructed) = full.reconstructed() {
                return Ok(SimulatedTrees {
                    reconstructed,
                    observations,
                    full,
                    attempts: attempt,
                });
            }
        }

        Err(SimulationError::NoSurvivingTree {
            attempts: self.max_attempts,
        })
    }
}

/// Arena under construction. Node ids are creation indices, and labels are
/// derived from them (`n{id}` internal, `t{id}` leaves).
#[derive(Default)]
struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    fn add(&mut self, parent: Option<NodeId>, time: f64, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        let prefix = if kind == NodeKind::Internal { 'n' } else { 't' };
        self.nodes.push(Node {
            label: format!("{prefix}{id}"),
            parent,
            children: Vec::new(),
            time,
            kind,
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        id
    }

    fn label(&self, id: NodeId) -> String {
        self.nodes[id].label.clone()
    }

    /// Node 0 is the only parentless node.
    fn finish(self, origin: f64) -> Result<PhyloTree, SimulationError> {
        Ok(PhyloTree::from_nodes(self.nodes, 0, origin)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use std::collections::HashSet;

    fn epidemic() -> BirthDeathParameters {
        BirthDeathParameters::new(1.5, 1.0, 0.9, 0.3, 0.5, 0.3).unwrap()
    }

    #[test]
    fn test_pure_birth_samples_everything() {
        let params = BirthDeathParameters::new(1.0, 0.0, 1.0, 0.0, 0.0, 0.0).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let trees = ForwardBirthDeath::default()
            .simulate_conditioned_on_survival(&params, 2.0, &mut rng)
            .unwrap();

        assert_eq!(trees.attempts, 1);
        assert_eq!(trees.reconstructed.leaf_labels(), trees.full.leaf_labels());
        assert_eq!(
            trees.observations.count(ObservationKind::RhoSampled),
            trees.full.leaves().len()
        );
        assert_eq!(trees.observations.counts()[..4], [0, 0, 0, 0]);
    }

    #[test]
    fn test_zero_rates_give_single_lineage() {
        let params = BirthDeathParameters::new(0.0, 0.0, 1.0, 0.0, 0.0, 0.0).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let trees = ForwardBirthDeath::default()
            .simulate_conditioned_on_survival(&params, 3.0, &mut rng)
            .unwrap();

        assert_eq!(trees.full.len(), 1);
        assert!((trees.full.branch_length(trees.full.root()) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_certain_extinction_gives_up() {
        let params = BirthDeathParameters::new(0.0, 10.0, 1.0, 0.0, 0.0, 0.0).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let result = ForwardBirthDeath::new(5, 1000).simulate_conditioned_on_survival(
            &params,
            5.0,
            &mut rng,
        );
        assert_eq!(result.unwrap_err(), SimulationError::NoSurvivingTree { attempts: 5 });
    }

    #[test]
    fn test_explosive_growth_hits_lineage_limit() {
        let params = BirthDeathParameters::new(10.0, 0.0, 1.0, 0.0, 0.0, 0.0).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let result = ForwardBirthDeath::new(10, 50).simulate_conditioned_on_survival(
            &params,
            5.0,
            &mut rng,
        );
        assert_eq!(result.unwrap_err(), SimulationError::LineageLimit { limit: 50 });
    }

    #[test]
    fn test_invalid_origin() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let result = ForwardBirthDeath::default().simulate_once(&epidemic(), -1.0, &mut rng);
        assert!(matches!(
            result,
            Err(SimulationError::Parameter(ParameterError::InvalidOrigin(_)))
        ));
    }

    #[test]
    fn test_empty_builder_reports_tree_error() {
        let err = TreeBuilder::default().finish(1.0).unwrap_err();
        assert_eq!(err, SimulationError::Tree(crate::errors::TreeError::Empty));
    }

    #[test]
    fn test_observations_match_leaf_kinds() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let sim = ForwardBirthDeath::default();
        for _ in 0..20 {
            let (full, obs) = sim.simulate_once(&epidemic(), 3.0, &mut rng).unwrap();
            let leaves_of = |kind| full.leaves_of_kind(kind).len();

            assert_eq!(obs.count(ObservationKind::PsiRemoved), leaves_of(NodeKind::PsiSampled));
            assert_eq!(
                obs.count(ObservationKind::PsiAncestor),
                leaves_of(NodeKind::SampledAncestor)
            );
            assert_eq!(
                obs.count(ObservationKind::OmegaRemoved),
                leaves_of(NodeKind::OccurrenceRemoved)
            );
            assert_eq!(obs.count(ObservationKind::RhoSampled), leaves_of(NodeKind::RhoSampled));
            assert_eq!(obs.count(ObservationKind::ExtantUnsampled), leaves_of(NodeKind::Unsampled));
            assert!(obs
                .get(ObservationKind::OmegaKept)
                .iter()
                .all(|rec| rec.taxon.is_none() && rec.time > 0.0 && rec.time < 3.0));
        }
    }

    #[test]
    fn test_node_times_decrease_towards_leaves() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let trees = ForwardBirthDeath::default()
            .simulate_conditioned_on_survival(&epidemic(), 4.0, &mut rng)
            .unwrap();

        for tree in [&trees.full, &trees.reconstructed] {
            for id in 0..tree.len() {
                let node = tree.node(id);
                assert!(node.time >= 0.0 && node.time <= tree.origin());
                assert!(tree.branch_length(id) >= 0.0);
            }
        }
    }

    #[test]
    fn test_reconstructed_leaves_subset_of_full() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let sim = ForwardBirthDeath::default();
        for _ in 0..10 {
            let trees = sim
                .simulate_conditioned_on_survival(&epidemic(), 3.0, &mut rng)
                .unwrap();
            let full: HashSet<&str> = trees.full.leaf_labels().into_iter().collect();
            for label in trees.reconstructed.leaf_labels() {
                assert!(full.contains(label));
            }
            assert!(trees
                .reconstructed
                .leaves()
                .iter()
                .all(|&id| trees.reconstructed.node(id).kind.is_sampled()));
            assert!(trees.observations.count(ObservationKind::RhoSampled) >= 1);
        }
    }

    #[test]
    fn test_same_seed_same_trees() {
        let sim = ForwardBirthDeath::default();
        let mut rng1 = Xoshiro256PlusPlus::seed_from_u64(99);
        let mut rng2 = Xoshiro256PlusPlus::seed_from_u64(99);
        let a = sim.simulate_conditioned_on_survival(&epidemic(), 3.0, &mut rng1).unwrap();
        let b = sim.simulate_conditioned_on_survival(&epidemic(), 3.0, &mut rng2).unwrap();

        assert_eq!(a.full, b.full);
        assert_eq!(a.observations, b.observations);
        assert_eq!(a.attempts, b.attempts);
    }
}
