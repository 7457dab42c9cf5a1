use super::count_members;
use super::Tally;
use crate::basic_types::Contradiction;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainId;
use crate::engine::IntervalDomain;
use crate::propagation::Domains;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagators::check_distinct_variables;

/// The arguments of [`CountBounds`].
#[derive(Clone, Debug)]
pub struct CountBoundsArgs {
    xs: Vec<DomainId>,
    value: i32,
    lower_bound: usize,
    upper_bound: usize,
}

impl CountBoundsArgs {
    /// Between `lower_bound` and `upper_bound` (inclusive) variables of `xs` equal `value`.
    pub fn new(
        xs: Vec<DomainId>,
        value: i32,
        lower_bound: i32,
        upper_bound: i32,
    ) -> Result<Self, ModelError> {
        check_distinct_variables(&xs)?;

        let (Ok(lower), Ok(upper)) = (usize::try_from(lower_bound), usize::try_from(upper_bound))
        else {
            return Err(ModelError::IllegalArgument(format!(
                "[{lower_bound}, {upper_bound}] is not a range of counts"
            )));
        };
        if lower > upper {
            return Err(ModelError::IllegalArgument(format!(
                "[{lower_bound}, {upper_bound}] is not a range of counts"
            )));
        }

        Ok(CountBoundsArgs {
            xs,
            value,
            lower_bound: lower,
            upper_bound: upper,
        })
    }
}

impl PropagatorConstructor for CountBoundsArgs {
    type PropagatorImpl = CountBounds;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<CountBounds, ModelError> {
        Ok(CountBounds {
            tally: Tally::new(self.xs, IntervalDomain::singleton(self.value), &mut context),
            lower_bound: self.lower_bound,
            upper_bound: self.upper_bound,
        })
    }
}

/// The number of variables which take a given value lies within constant bounds.
#[derive(Clone, Debug)]
pub struct CountBounds {
    tally: Tally,
    lower_bound: usize,
    upper_bound: usize,
}

impl Propagator for CountBounds {
    fn name(&self) -> &str {
        "CountBounds"
    }

    fn arguments(&self) -> Vec<DomainId> {
        self.tally.variables().to_vec()
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        self.tally.update(context);

        let members = self.tally.members(context);
        let possible_members = self.tally.possible_members(context);
        if members > self.upper_bound || possible_members < self.lower_bound {
            return Err(Contradiction);
        }

        if members < possible_members {
            if members == self.upper_bound {
                self.tally.force_unsettled(context, false)?;
            } else if possible_members == self.lower_bound {
                self.tally.force_unsettled(context, true)?;
            }
        }

        if self.tally.members(context) >= self.lower_bound
            && self.tally.possible_members(context) <= self.upper_bound
        {
            context.remove_constraint();
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        let (members, possible_members) =
            count_members(domains, self.tally.variables(), self.tally.values());

        members >= self.lower_bound && possible_members <= self.upper_bound
    }
}
