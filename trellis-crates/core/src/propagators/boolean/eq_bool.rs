use super::check_booleans;
use crate::basic_types::Contradiction;
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
use crate::propagation::ReadDomains;

/// `result = 1` exactly when all variables take the same value.
#[derive(Clone, Debug)]
pub struct EqBool {
    xs: Vec<DomainId>,
    result: DomainId,
}

impl EqBool {
    pub fn new(xs: Vec<DomainId>, result: DomainId) -> Self {
        EqBool { xs, result }
    }

    /// The number of variables fixed to 0, fixed to 1, and not fixed.
    fn counts(&self, domains: Domains) -> (usize, usize, usize) {
        self.xs
            .iter()
            .fold((0, 0, 0), |(zeros, ones, open), &x| match domains.fixed_value(x) {
                Some(0) => (zeros + 1, ones, open),
                Some(_) => (zeros, ones + 1, open),
                None => (zeros, ones, open + 1),
            })
    }

    /// Whether the variables are all equal, if the domains decide it.
    fn all_equal(&self, domains: Domains) -> Option<bool> {
        match self.counts(domains) {
            (zeros, ones, _) if zeros > 0 && ones > 0 => Some(false),
            (_, _, 0) => Some(true),
            _ => None,
        }
    }

    fn propagate(&self, context: &mut PropagationContext, negated: bool) -> PropagationStatus {
        let result_for = |equal: bool| i32::from(equal != negated);

        if let Some(equal) = self.all_equal(context.domains()) {
            let _ = context.assign(self.result, result_for(equal))?;
            context.remove_constraint();
            return Ok(());
        }

        let (zeros, ones, open) = self.counts(context.domains());
        match context.fixed_value(self.result) {
            Some(value) if value == result_for(true) => {
                if zeros + ones == 0 {
                    return Ok(());
                }

                let value = i32::from(ones > 0);
                for &x in &self.xs {
                    let _ = context.assign(x, value)?;
                }
                context.remove_constraint();
            }
            Some(_) if open == 1 => {
                if zeros + ones == 0 {
                    // A single variable is always equal to itself.
                    return Err(Contradiction);
                }

                let value = i32::from(ones == 0);
                for &x in &self.xs {
                    if !context.is_fixed(x) {
                        let _ = context.assign(x, value)?;
                    }
                }
                context.remove_constraint();
            }
            _ => {}
        }

        Ok(())
    }
}

impl PropagatorConstructor for EqBool {
    type PropagatorImpl = EqBool;

    fn create(self, context: PropagatorConstructorContext) -> Result<EqBool, ModelError> {
        check_booleans(context.domains(), self.xs.iter().chain([&self.result]))?;
        Ok(self)
    }
}

impl Propagator for EqBool {
    fn name(&self) -> &str {
        "EqBool"
    }

    fn arguments(&self) -> Vec<DomainId> {
        let mut arguments = self.xs.clone();
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
        self.propagate(context, false)
    }

    fn satisfied(&self, domains: Domains) -> bool {
        match (self.all_equal(domains), domains.fixed_value(self.result)) {
            (Some(equal), Some(result)) => i32::from(equal) == result,
            _ => false,
        }
    }
}

impl NegatablePropagator for EqBool {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.propagate(context, true)
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        match (self.all_equal(domains), domains.fixed_value(self.result)) {
            (Some(equal), Some(result)) => i32::from(equal) != result,
            _ => false,
        }
    }

    fn not_consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Ground
    }
}
