use crate::basic_types::PropagationStatus;
use crate::containers::HashSet;
use crate::engine::DomainId;
use crate::engine::TimeStamp;
use crate::propagation::Domains;
use crate::propagation::HasAssignments;
use crate::propagation::PropagationContext;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The variables of an all-different relation, with the fixed ones swapped to the front.
///
/// The value of a variable in the prefix has been removed from every variable after it, so only
/// the suffix has to be scanned for newly fixed variables.
#[derive(Clone, Debug)]
pub(crate) struct GroundedPrefix {
    xs: Vec<DomainId>,
    grounded: TimeStamp<usize>,
}

impl GroundedPrefix {
    pub(crate) fn new(xs: Vec<DomainId>, context: &mut PropagatorConstructorContext) -> Self {
        GroundedPrefix {
            xs,
            grounded: context.new_time_stamp(0),
        }
    }

    /// The variables, in an order which changes as they become fixed.
    pub(crate) fn variables(&self) -> &[DomainId] {
        &self.xs
    }

    pub(crate) fn num_grounded(&self, domains: &impl HasAssignments) -> usize {
        self.grounded.value(domains)
    }

    /// Removes the value of every newly fixed variable from the variables which are not fixed,
    /// until no more variables become fixed.
    pub(crate) fn propagate(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        let mut grounded = self.grounded.value(context);

        loop {
            let mut changed = false;

            for index in grounded..self.xs.len() {
                let Some(value) = context.fixed_value(self.xs[index]) else {
                    continue;
                };

                self.xs.swap(index, grounded);
                let var = self.xs[grounded];
                grounded += 1;

                for &other in &self.xs[grounded..] {
                    changed |= context.remove(other, value)?;
                }

                context.detach(var);
            }

            if !changed {
                break;
            }
        }

        self.grounded.update(context, grounded);
        Ok(())
    }
}

/// Whether every variable is fixed and no two share a value.
pub(crate) fn all_fixed_and_distinct(domains: Domains, xs: &[DomainId]) -> bool {
    let mut seen: HashSet<_> = HashSet::default();

    xs.iter().all(|&x| {
        domains
            .fixed_value(x)
            .is_some_and(|value| seen.insert(value))
    })
}
