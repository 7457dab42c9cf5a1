use super::count_members;
use super::Tally;
use crate::basic_types::Contradiction;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainId;
use crate::engine::IntervalDomain;
use crate::propagation::Domains;
use crate::propagation::NegatablePropagator;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagators::check_distinct_variables;

/// The arguments of [`AtLeast`].
#[derive(Clone, Debug)]
pub struct AtLeastArgs {
    xs: Vec<DomainId>,
    counter: usize,
    value: i32,
}

impl AtLeastArgs {
    /// At least `counter` variables of `xs` equal `value`.
    pub fn new(xs: Vec<DomainId>, counter: i32, value: i32) -> Result<Self, ModelError> {
        check_distinct_variables(&xs)?;
        let counter = usize::try_from(counter).map_err(|_| {
            ModelError::IllegalArgument(format!("cannot count at least {counter} variables"))
        })?;

        Ok(AtLeastArgs { xs, counter, value })
    }
}

impl PropagatorConstructor for AtLeastArgs {
    type PropagatorImpl = AtLeast;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<AtLeast, ModelError> {
        Ok(AtLeast {
            tally: Tally::new(self.xs, IntervalDomain::singleton(self.value), &mut context),
            counter: self.counter,
        })
    }
}

/// At least a given number of variables take a given value.
///
/// The negation is that at most one less than that number of variables takes the value.
#[derive(Clone, Debug)]
pub struct AtLeast {
    tally: Tally,
    counter: usize,
}

impl Propagator for AtLeast {
    fn name(&self) -> &str {
        "AtLeast"
    }

    fn arguments(&self) -> Vec<DomainId> {
        self.tally.variables().to_vec()
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.tally.update(context);

        let possible_members = self.tally.possible_members(context);
        if possible_members < self.counter {
            return Err(Contradiction);
        }

        if possible_members == self.counter {
            self.tally.force_unsettled(context, true)?;
        }

        if self.tally.members(context) >= self.counter {
            context.remove_constraint();
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        let (members, _) = count_members(domains, self.tally.variables(), self.tally.values());
        members >= self.counter
    }
}

impl NegatablePropagator for AtLeast {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.tally.update(context);

        let members = self.tally.members(context);
        if members >= self.counter {
            return Err(Contradiction);
        }

        if members + 1 == self.counter {
            self.tally.force_unsettled(context, false)?;
        }

        Ok(())
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        let (_, possible_members) =
            count_members(domains, self.tally.variables(), self.tally.values());
        possible_members < self.counter
    }
}
