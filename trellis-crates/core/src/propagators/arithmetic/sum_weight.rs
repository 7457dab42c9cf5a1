use num::Integer;

use super::bounds;
use super::check_overflow;
use super::remove;
use super::set_bounds;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainId;
use crate::engine::PruningEvent;
use crate::engine::TimeStamp;
use crate::propagation::Domains;
use crate::propagation::NegatablePropagator;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The arguments of `Σ weights[i] * xs[i] = sum`.
#[derive(Clone, Debug)]
pub struct SumWeightArgs {
    xs: Vec<DomainId>,
    weights: Vec<i32>,
    sum: DomainId,
}

impl SumWeightArgs {
    pub fn new(xs: Vec<DomainId>, weights: Vec<i32>, sum: DomainId) -> Result<Self, ModelError> {
        if xs.len() != weights.len() {
            return Err(ModelError::LengthMismatch {
                expected: xs.len(),
                actual: weights.len(),
            });
        }

        Ok(SumWeightArgs { xs, weights, sum })
    }
}

impl PropagatorConstructor for SumWeightArgs {
    type PropagatorImpl = SumWeight;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<SumWeight, ModelError> {
        let mut largest_sum = 0_i64;
        for (&x, &weight) in self.xs.iter().zip(self.weights.iter()) {
            let (lower_bound, upper_bound) = bounds(context.domains(), x);
            largest_sum += i64::from(weight).abs() * lower_bound.abs().max(upper_bound.abs());
            check_overflow("SumWeight", largest_sum)?;
        }

        Ok(SumWeight {
            xs: self.xs,
            weights: self.weights,
            sum: self.sum,
            num_fixed: context.new_time_stamp(0),
            fixed_sum: context.new_time_stamp(0),
        })
    }
}

/// `Σ weights[i] * xs[i] = sum`, bounds consistent.
///
/// Fixed terms are swapped to the front of the list, where they are only accounted for by
/// their total.
#[derive(Clone, Debug)]
pub struct SumWeight {
    xs: Vec<DomainId>,
    weights: Vec<i32>,
    sum: DomainId,
    /// `xs[..num_fixed]` are fixed.
    num_fixed: TimeStamp<usize>,
    /// The weighted sum of `xs[..num_fixed]`.
    fixed_sum: TimeStamp<i64>,
}

impl SumWeight {
    /// The terms which are fixed and accounted for in the running total.
    pub fn settled(&self, domains: Domains) -> &[DomainId] {
        &self.xs[..self.num_fixed.value(&domains)]
    }

    /// Moves the fixed terms after the cursor in front of it.
    fn compact(&mut self, context: &mut PropagationContext) {
        let mut num_fixed = self.num_fixed.value(context);
        let mut fixed_sum = self.fixed_sum.value(context);

        for i in num_fixed..self.xs.len() {
            if let Some(value) = context.fixed_value(self.xs[i]) {
                self.xs.swap(i, num_fixed);
                self.weights.swap(i, num_fixed);
                fixed_sum += i64::from(self.weights[num_fixed]) * i64::from(value);
                context.detach(self.xs[num_fixed]);
                num_fixed += 1;
            }
        }

        self.num_fixed.update(context, num_fixed);
        self.fixed_sum.update(context, fixed_sum);
    }

    fn term_bounds(&self, domains: Domains, index: usize) -> (i64, i64) {
        let weight = i64::from(self.weights[index]);
        let (lower_bound, upper_bound) = bounds(domains, self.xs[index]);

        let (a, b) = (weight * lower_bound, weight * upper_bound);
        (a.min(b), a.max(b))
    }

    fn sum_bounds(&self, domains: Domains, from: usize, fixed_sum: i64) -> (i64, i64) {
        (from..self.xs.len())
            .map(|index| self.term_bounds(domains, index))
            .fold((fixed_sum, fixed_sum), |(min, max), (term_min, term_max)| {
                (min + term_min, max + term_max)
            })
    }
}

impl Propagator for SumWeight {
    fn name(&self) -> &str {
        "SumWeight"
    }

    fn arguments(&self) -> Vec<DomainId> {
        let mut arguments = self.xs.clone();
        arguments.push(self.sum);
        arguments
    }

    fn consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Bound
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        loop {
            self.compact(context);
            let pruning_count = context.pruning_count();

            let num_fixed = self.num_fixed.value(context);
            let fixed_sum = self.fixed_sum.value(context);
            let (min, max) = self.sum_bounds(context.domains(), num_fixed, fixed_sum);
            let _ = set_bounds(context, self.sum, min, max)?;

            let (ls, us) = bounds(context.domains(), self.sum);
            for index in num_fixed..self.xs.len() {
                let weight = i64::from(self.weights[index]);
                if weight == 0 {
                    continue;
                }

                // `min` and `max` predate this pass, in which this term has not been narrowed yet.
                let (term_min, term_max) = self.term_bounds(context.domains(), index);
                let rest_min = min - term_min;
                let rest_max = max - term_max;
                let (lower, upper) = (ls - rest_max, us - rest_min);

                let (lower_bound, upper_bound) = if weight > 0 {
                    (Integer::div_ceil(&lower, &weight), Integer::div_floor(&upper, &weight))
                } else {
                    (Integer::div_ceil(&upper, &weight), Integer::div_floor(&lower, &weight))
                };
                let _ = set_bounds(context, self.xs[index], lower_bound, upper_bound)?;
            }

            if context.pruning_count() == pruning_count {
                break;
            }
        }

        if self.num_fixed.value(context) == self.xs.len() && context.is_fixed(self.sum) {
            context.remove_constraint();
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        if !self.xs.iter().all(|&x| domains.is_fixed(x)) {
            return false;
        }

        let (total, _) = self.sum_bounds(domains, 0, 0);
        domains.fixed_value(self.sum).map(i64::from) == Some(total)
    }
}

impl NegatablePropagator for SumWeight {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        let unfixed = (0..self.xs.len())
            .filter(|&index| !context.is_fixed(self.xs[index]))
            .collect::<Vec<_>>();

        match (unfixed.as_slice(), context.fixed_value(self.sum)) {
            ([], _) => {
                let (total, _) = self.sum_bounds(context.domains(), 0, 0);
                let _ = remove(context, self.sum, total)?;
            }
            (&[index], Some(sum)) => {
                let weight = i64::from(self.weights[index]);
                let (min, _) = self.sum_bounds(context.domains(), 0, 0);
                let (term_min, _) = self.term_bounds(context.domains(), index);
                let remainder = i64::from(sum) - (min - term_min);

                if weight != 0 && remainder % weight == 0 {
                    let _ = remove(context, self.xs[index], remainder / weight)?;
                }
            }
            _ => {}
        }

        if self.not_satisfied(context.domains()) {
            context.remove_constraint();
        }

        Ok(())
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        let (min, max) = self.sum_bounds(domains, 0, 0);
        let (ls, us) = bounds(domains, self.sum);

        min > us || max < ls
    }

    fn not_consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Ground
    }
}
