use super::count_members;
use super::to_count;
use super::Tally;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainId;
use crate::engine::IntervalDomain;
use crate::engine::PruningEvent;
use crate::propagation::Domains;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::propagators::check_distinct_variables;

/// The arguments of [`Count`].
#[derive(Clone, Debug)]
pub struct CountArgs {
    xs: Vec<DomainId>,
    value: i32,
    counter: DomainId,
}

impl CountArgs {
    /// Fails if a variable occurs more than once, counter included.
    pub fn new(xs: Vec<DomainId>, value: i32, counter: DomainId) -> Result<Self, ModelError> {
        check_distinct_variables(&xs)?;
        if xs.contains(&counter) {
            return Err(ModelError::IllegalArgument(format!(
                "the counter {counter} is also one of the counted variables"
            )));
        }

        Ok(CountArgs { xs, value, counter })
    }
}

impl PropagatorConstructor for CountArgs {
    type PropagatorImpl = Count;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<Count, ModelError> {
        Ok(Count {
            tally: Tally::new(self.xs, IntervalDomain::singleton(self.value), &mut context),
            counter: self.counter,
        })
    }
}

/// `counter` is the number of variables which take a given value.
#[derive(Clone, Debug)]
pub struct Count {
    tally: Tally,
    counter: DomainId,
}

impl Propagator for Count {
    fn name(&self) -> &str {
        "Count"
    }

    fn arguments(&self) -> Vec<DomainId> {
        let mut arguments = self.tally.variables().to_vec();
        arguments.push(self.counter);
        arguments
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn consistency_pruning_event(&self, var: DomainId) -> PruningEvent {
        if var == self.counter {
            PruningEvent::Bound
        } else {
            PruningEvent::Any
        }
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.tally.update(context);

        let members = to_count(self.tally.members(context));
        let possible_members = to_count(self.tally.possible_members(context));
        let _ = context.set_bounds(self.counter, members, possible_members)?;

        if members < possible_members {
            if context.lower_bound(self.counter) == possible_members {
                self.tally.force_unsettled(context, true)?;
            } else if context.upper_bound(self.counter) == members {
                self.tally.force_unsettled(context, false)?;
            }
        }

        if self.tally.is_complete(context) && context.is_fixed(self.counter) {
            context.remove_constraint();
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        let (members, possible_members) =
            count_members(domains, self.tally.variables(), self.tally.values());

        members == possible_members && domains.fixed_value(self.counter) == Some(to_count(members))
    }
}
