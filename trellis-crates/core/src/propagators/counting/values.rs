use super::matching::maximum_matching;
use super::to_count;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::containers::HashSet;
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

/// The arguments of [`Values`].
#[derive(Clone, Debug)]
pub struct ValuesArgs {
    xs: Vec<DomainId>,
    count: DomainId,
}

impl ValuesArgs {
    /// Fails if a variable occurs more than once, `count` included.
    pub fn new(xs: Vec<DomainId>, count: DomainId) -> Result<Self, ModelError> {
        check_distinct_variables(&xs)?;
        if xs.contains(&count) {
            return Err(ModelError::IllegalArgument(format!(
                "the counter {count} is also one of the counted variables"
            )));
        }

        Ok(ValuesArgs { xs, count })
    }
}

impl PropagatorConstructor for ValuesArgs {
    type PropagatorImpl = Values;

    fn create(self, _context: PropagatorConstructorContext) -> Result<Values, ModelError> {
        Ok(Values {
            xs: self.xs,
            count: self.count,
        })
    }
}

/// `count` is the number of distinct values taken by the variables.
///
/// The number of distinct values of the fixed variables bounds `count` from below, the size of
/// a maximum matching between variables and values bounds it from above.
#[derive(Clone, Debug)]
pub struct Values {
    xs: Vec<DomainId>,
    count: DomainId,
}

impl Values {
    fn fixed_values(&self, domains: Domains) -> HashSet<i32> {
        self.xs
            .iter()
            .filter_map(|&x| domains.fixed_value(x))
            .collect()
    }
}

impl Propagator for Values {
    fn name(&self) -> &str {
        "Values"
    }

    fn arguments(&self) -> Vec<DomainId> {
        let mut arguments = self.xs.clone();
        arguments.push(self.count);
        arguments
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn consistency_pruning_event(&self, var: DomainId) -> PruningEvent {
        if var == self.count {
            PruningEvent::Bound
        } else {
            PruningEvent::Any
        }
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        loop {
            let prunings = context.pruning_count();

            let fixed_values = self.fixed_values(context.domains());
            let lower_bound = if self.xs.is_empty() {
                0
            } else {
                fixed_values.len().max(1)
            };
            let upper_bound = {
                let domains = self
                    .xs
                    .iter()
                    .map(|&x| context.domain(x))
                    .collect::<Vec<_>>();
                maximum_matching(&domains)
            };
            let _ = context.set_bounds(self.count, to_count(lower_bound), to_count(upper_bound))?;

            if context.upper_bound(self.count) == to_count(fixed_values.len()) {
                // No new values can appear.
                let allowed = IntervalDomain::from_values(fixed_values.iter().copied());
                for &x in &self.xs {
                    let _ = context.intersect(x, &allowed)?;
                }
            } else if context.lower_bound(self.count) == to_count(self.xs.len()) {
                // Every variable takes a value of its own.
                for &x in &self.xs {
                    if let Some(value) = context.fixed_value(x) {
                        for &other in &self.xs {
                            if other != x {
                                let _ = context.remove(other, value)?;
                            }
                        }
                    }
                }
            }

            if context.pruning_count() == prunings {
                break;
            }
        }

        if self.satisfied(context.domains()) {
            context.remove_constraint();
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        self.xs.iter().all(|&x| domains.is_fixed(x))
            && domains.fixed_value(self.count)
                == Some(to_count(self.fixed_values(domains).len()))
    }
}
