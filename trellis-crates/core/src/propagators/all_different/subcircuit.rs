use super::circuit::node_value;
use super::circuit::num_nodes;
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

/// The arguments of [`Subcircuit`].
#[derive(Clone, Debug)]
pub struct SubcircuitArgs {
    successors: Vec<DomainId>,
}

impl SubcircuitArgs {
    /// `successors[i]` is the (1-based) node which follows node `i + 1`, or `i + 1` itself if the
    /// node is not part of the tour.
    pub fn new(successors: Vec<DomainId>) -> Result<Self, ModelError> {
        check_distinct_variables(&successors)?;
        Ok(SubcircuitArgs { successors })
    }
}

impl PropagatorConstructor for SubcircuitArgs {
    type PropagatorImpl = Subcircuit;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<Subcircuit, ModelError> {
        let num_nodes = num_nodes(&self.successors)?;

        Ok(Subcircuit {
            variables: GroundedPrefix::new(self.successors.clone(), &mut context),
            successors: self.successors,
            num_nodes,
            components: StronglyConnectedComponents::default(),
        })
    }
}

/// The nodes which do not loop on themselves form a single tour (or there are none).
#[derive(Clone, Debug)]
pub struct Subcircuit {
    variables: GroundedPrefix,
    successors: Vec<DomainId>,
    num_nodes: i32,
    components: StronglyConnectedComponents,
}

impl Propagator for Subcircuit {
    fn name(&self) -> &str {
        "Subcircuit"
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

            for &x in &self.successors {
                let _ = context.set_bounds(x, 1, self.num_nodes)?;
            }

            self.variables.propagate(context)?;

            let components = self
                .components
                .compute(context.domains(), &self.successors);

            // A node which cannot loop on itself is on the tour, and the tour lies within a
            // single component.
            let mut tour = None;
            for (index, component) in components.iter().enumerate() {
                let on_tour = component
                    .iter()
                    .any(|&node| !context.contains(self.successors[node], node_value(node)));
                if !on_tour {
                    continue;
                }

                if component.len() == 1 || tour.is_some() {
                    return Err(Contradiction);
                }
                tour = Some(index);
            }

            for (index, component) in components.iter().enumerate() {
                let outside_tour = match tour {
                    Some(tour) => index != tour,
                    None => component.len() == 1,
                };

                if outside_tour {
                    for &node in component {
                        let _ = context.assign(self.successors[node], node_value(node))?;
                    }
                }
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

        let successor = |node: usize| {
            domains
                .fixed_value(self.successors[node])
                .and_then(|value| usize::try_from(i64::from(value) - 1).ok())
                .filter(|&next| next < self.successors.len())
        };

        let on_tour = (0..self.successors.len())
            .filter(|&node| successor(node) != Some(node))
            .collect::<Vec<_>>();
        let Some(&start) = on_tour.first() else {
            return true;
        };

        let mut node = start;
        for step in 1..=on_tour.len() {
            let Some(next) = successor(node) else {
                return false;
            };

            node = next;
            if node == start {
                return step == on_tour.len();
            }
        }

        false
    }
}
