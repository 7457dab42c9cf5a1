use crate::basic_types::PropagationStatus;
use crate::engine::DomainId;
use crate::engine::TimeStamp;
use crate::propagation::Domains;
use crate::propagation::PropagationContext;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The 0/1 variables of a conjunction or a disjunction.
///
/// One value of the variables is neutral: a conjunction stays open while its variables are 1, a
/// disjunction while they are 0. A single variable with the other value decides the junction.
/// Variables fixed to the neutral value are swapped into a prefix which is not scanned again.
#[derive(Clone, Debug)]
pub(super) struct Junction {
    xs: Vec<DomainId>,
    neutral: i32,
    settled: TimeStamp<usize>,
}

impl Junction {
    pub(super) fn new(
        xs: Vec<DomainId>,
        neutral: i32,
        context: &mut PropagatorConstructorContext,
    ) -> Self {
        Junction {
            xs,
            neutral,
            settled: context.new_time_stamp(0),
        }
    }

    pub(super) fn variables(&self) -> &[DomainId] {
        &self.xs
    }

    fn deciding(&self) -> i32 {
        1 - self.neutral
    }

    /// Moves the variables newly fixed to the neutral value into the prefix. Returns whether a
    /// variable is fixed to the deciding value.
    fn settle(&mut self, context: &mut PropagationContext) -> bool {
        let mut settled = self.settled.value(context);
        let mut decided = false;

        for index in settled..self.xs.len() {
            match context.fixed_value(self.xs[index]) {
                Some(value) if value == self.neutral => {
                    self.xs.swap(index, settled);
                    context.detach(self.xs[settled]);
                    settled += 1;
                }
                Some(_) => {
                    decided = true;
                    break;
                }
                None => {}
            }
        }

        self.settled.update(context, settled);
        decided
    }

    /// Enforces that `result` is the value of the junction, or its complement when `negated` is
    /// set.
    pub(super) fn propagate(
        &mut self,
        context: &mut PropagationContext,
        result: DomainId,
        negated: bool,
    ) -> PropagationStatus {
        let result_for = |value: i32| if negated { 1 - value } else { value };

        if self.settle(context) {
            let _ = context.assign(result, result_for(self.deciding()))?;
            context.remove_constraint();
            return Ok(());
        }

        // Every variable after the prefix is open.
        let settled = self.settled.value(context);
        if settled == self.xs.len() {
            let _ = context.assign(result, result_for(self.neutral))?;
            context.remove_constraint();
            return Ok(());
        }

        match context.fixed_value(result) {
            Some(value) if value == result_for(self.neutral) => {
                for &x in &self.xs[settled..] {
                    let _ = context.assign(x, self.neutral)?;
                }
                context.remove_constraint();
            }
            Some(_) if settled + 1 == self.xs.len() => {
                let _ = context.assign(self.xs[settled], self.deciding())?;
                context.remove_constraint();
            }
            _ => {}
        }

        Ok(())
    }

    /// The value of the junction, if the domains determine it.
    pub(super) fn value(&self, domains: Domains) -> Option<i32> {
        if self
            .xs
            .iter()
            .any(|&x| domains.fixed_value(x) == Some(self.deciding()))
        {
            Some(self.deciding())
        } else if self
            .xs
            .iter()
            .all(|&x| domains.fixed_value(x) == Some(self.neutral))
        {
            Some(self.neutral)
        } else {
            None
        }
    }
}

/// Whether `result` is fixed, the junction is decided, and the two are (with `negated`, are not)
/// equal.
pub(super) fn agrees(
    domains: Domains,
    junction: &Junction,
    result: DomainId,
    negated: bool,
) -> bool {
    match (junction.value(domains), domains.fixed_value(result)) {
        (Some(value), Some(fixed)) => (value == fixed) != negated,
        _ => false,
    }
}
