use super::grounded_prefix::all_fixed_and_distinct;
use super::grounded_prefix::GroundedPrefix;
use super::scc::StronglyConnectedComponents;
use crate::basic_types::Contradiction;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainId;
use crate::engine::PruningEvent;
use crate::propagation::Domains;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::propagators::check_distinct_variables;

/// The arguments of [`Circuit`].
#[derive(Clone, Debug)]
pub struct CircuitArgs {
    successors: Vec<DomainId>,
}

impl CircuitArgs {
    /// `successors[i]` is the (1-based) node which follows node `i + 1`.
    pub fn new(successors: Vec<DomainId>) -> Result<Self, ModelError> {
        check_distinct_variables(&successors)?;
        Ok(CircuitArgs { successors })
    }
}

/// The number of nodes as a value of the successor variables.
pub(super) fn num_nodes(successors: &[DomainId]) -> Result<i32, ModelError> {
    i32::try_from(successors.len()).map_err(|_| {
        ModelError::IllegalArgument(format!("{} nodes do not fit the domains", successors.len()))
    })
}

/// The value of the successor variables which refers to `node`.
pub(super) fn node_value(node: usize) -> i32 {
    // Nodes are positions of a list whose length fits in an `i32`.
    node as i32 + 1
}

impl PropagatorConstructor for CircuitArgs {
    type PropagatorImpl = Circuit;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<Circuit, ModelError> {
        let num_nodes = num_nodes(&self.successors)?;

        Ok(Circuit {
            variables: GroundedPrefix::new(self.successors.clone(), &mut context),
            successors: self.successors,
            num_nodes,
            components: StronglyConnectedComponents::default(),
        })
    }
}

/// The successor variables describe a single tour through all nodes: following the successors
/// from any node visits every node exactly once before returning to it.
///
/// On top of the all-different reasoning, fixed chains are kept from closing early and the
/// graph of possible successors has to stay strongly connected.
#[derive(Clone, Debug)]
pub struct Circuit {
    variables: GroundedPrefix,
    successors: Vec<DomainId>,
    num_nodes: i32,
    components: StronglyConnectedComponents,
}

impl Circuit {
    /// Forbids the last node of every fixed chain which does not yet cover all nodes to return
    /// to the first node of that chain.
    fn break_subtours(&self, context: &mut PropagationContext) -> PropagationStatus {
        let num_nodes = self.successors.len();
        let fixed_successor = self
            .successors
            .iter()
            .map(|&x| {
                context
                    .fixed_value(x)
                    .and_then(|value| usize::try_from(i64::from(value) - 1).ok())
            })
            .collect::<Vec<_>>();

        let mut has_fixed_predecessor = vec![false; num_nodes];
        for &next in fixed_successor.iter().flatten() {
            has_fixed_predecessor[next] = true;
        }

        for start in 0..num_nodes {
            if fixed_successor[start].is_none() || has_fixed_predecessor[start] {
                continue;
            }

            let mut end = start;
            let mut length = 1;
            while let Some(next) = fixed_successor[end] {
                end = next;
                length += 1;
                if length > num_nodes {
                    return Err(Contradiction);
                }
            }

            if length < num_nodes {
                let _ = context.remove(self.successors[end], node_value(start))?;
            }
        }

        Ok(())
    }
}

impl Propagator for Circuit {
    fn name(&self) -> &str {
        "Circuit"
    }

    fn arguments(&self) -> Vec<DomainId> {
        self.successors.clone()
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Any
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        loop {
            let prunings = context.pruning_count();

            for (node, &x) in self.successors.iter().enumerate() {
                let _ = context.set_bounds(x, 1, self.num_nodes)?;
                if self.num_nodes > 1 {
                    let _ = context.remove(x, node_value(node))?;
                }
            }

            self.variables.propagate(context)?;
            self.break_subtours(context)?;

            let components = self
                .components
                .compute(context.domains(), &self.successors);
            if components.len() > 1 {
                return Err(Contradiction);
            }

            if context.pruning_count() == prunings {
                break;
            }
        }

        if self.variables.num_grounded(context) == self.successors.len() {
            context.remove_constraint();
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        if !all_fixed_and_distinct(domains, &self.successors) {
            return false;
        }

        let mut node = 0;
        for step in 1..=self.successors.len() {
            let Some(next) = domains
                .fixed_value(self.successors[node])
                .and_then(|value| usize::try_from(i64::from(value) - 1).ok())
                .filter(|&next| next < self.successors.len())
            else {
                return false;
            };

            node = next;
            if node == 0 {
                return step == self.successors.len();
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    fn successors(solver: &mut TestSolver, num_nodes: i32) -> Vec<DomainId> {
        (0..num_nodes)
            .map(|_| solver.new_variable(1, num_nodes))
            .collect()
    }

    #[test]
    fn the_last_node_closes_the_tour() {
        let mut solver = TestSolver::default();
        let xs = successors(&mut solver, 3);

        let handle = solver
            .new_propagator(CircuitArgs::new(xs.clone()).expect("distinct variables"))
            .expect("a tour exists");
        for (node, &x) in xs.iter().enumerate() {
            assert!(!solver.contains(x, node_value(node)));
        }

        solver.assign(xs[0], 2);
        solver.assign(xs[1], 3);
        solver.propagate().expect("a tour exists");

        assert_eq!(solver.fixed_value(xs[2]), Some(1));
        assert!(solver.satisfied(handle));
        assert!(solver.is_entailed(handle));
    }

    #[test]
    fn chains_cannot_close_early() {
        let mut solver = TestSolver::default();
        let xs = successors(&mut solver, 4);

        let _ = solver
            .new_propagator(CircuitArgs::new(xs.clone()).expect("distinct variables"))
            .expect("a tour exists");

        solver.assign(xs[0], 2);
        solver.propagate().expect("a tour exists");
        assert!(!solver.contains(xs[1], 1));

        solver.assign(xs[1], 3);
        solver.propagate().expect("a tour exists");
        assert!(!solver.contains(xs[2], 1));
        assert_eq!(solver.fixed_value(xs[2]), Some(4));
        assert_eq!(solver.fixed_value(xs[3]), Some(1));
    }

    #[test]
    fn two_separate_cycles_fail() {
        let mut solver = TestSolver::default();
        let xs = vec![
            solver.new_variable(1, 2),
            solver.new_variable(1, 2),
            solver.new_variable(3, 4),
            solver.new_variable(3, 4),
        ];

        let result = solver.new_propagator(CircuitArgs::new(xs).expect("distinct variables"));

        assert!(result.is_err());
    }

    #[test]
    fn restoring_reopens_the_tour() {
        let mut solver = TestSolver::default();
        let xs = successors(&mut solver, 4);

        let handle = solver
            .new_propagator(CircuitArgs::new(xs.clone()).expect("distinct variables"))
            .expect("a tour exists");

        solver.new_checkpoint();
        solver.assign(xs[0], 3);
        solver.assign(xs[2], 2);
        solver.propagate().expect("a tour exists");
        assert_eq!(solver.fixed_value(xs[1]), Some(4));
        assert_eq!(solver.fixed_value(xs[3]), Some(1));
        assert!(solver.is_entailed(handle));

        solver.restore(0);
        assert!(!solver.is_entailed(handle));
        assert_eq!(solver.domain(xs[1]).values().collect::<Vec<_>>(), vec![1, 3, 4]);
    }
}
