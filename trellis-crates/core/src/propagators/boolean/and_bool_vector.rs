use super::check_booleans;
use super::junction::agrees;
use super::junction::Junction;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainId;
use crate::engine::PruningEvent;
use crate::propagation::Domains;
use crate::propagation::NegatablePropagator;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;

/// The arguments of [`AndBoolVector`].
#[derive(Clone, Debug)]
pub struct AndBoolVectorArgs {
    xs: Vec<DomainId>,
    result: DomainId,
}

impl AndBoolVectorArgs {
    pub fn new(xs: Vec<DomainId>, result: DomainId) -> Self {
        AndBoolVectorArgs { xs, result }
    }
}

impl PropagatorConstructor for AndBoolVectorArgs {
    type PropagatorImpl = AndBoolVector;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<AndBoolVector, ModelError> {
        check_booleans(context.domains(), self.xs.iter().chain([&self.result]))?;

        Ok(AndBoolVector {
            xs: Junction::new(self.xs, 1, &mut context),
            result: self.result,
        })
    }
}

/// `result = 1` exactly when every variable is 1.
#[derive(Clone, Debug)]
pub struct AndBoolVector {
    xs: Junction,
    result: DomainId,
}

impl Propagator for AndBoolVector {
    fn name(&self) -> &str {
        "AndBoolVector"
    }

    fn arguments(&self) -> Vec<DomainId> {
        let mut arguments = self.xs.variables().to_vec();
        arguments.push(self.result);
        arguments
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Ground
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.xs.propagate(context, self.result, false)
    }

    fn satisfied(&self, domains: Domains) -> bool {
        agrees(domains, &self.xs, self.result, false)
    }
}

impl NegatablePropagator for AndBoolVector {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.xs.propagate(context, self.result, true)
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        agrees(domains, &self.xs, self.result, true)
    }

    fn not_consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Ground
    }
}
