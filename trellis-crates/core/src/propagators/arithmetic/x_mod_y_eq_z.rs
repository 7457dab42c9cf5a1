use super::bounds;
use super::contains;
use super::remove;
use super::set_bounds;
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

/// `x mod y = z`, where the remainder has the sign of `x`; `y` is never 0.
#[derive(Clone, Copy, Debug)]
pub struct XmodYeqZ {
    x: DomainId,
    y: DomainId,
    z: DomainId,
}

impl XmodYeqZ {
    pub fn new(x: DomainId, y: DomainId, z: DomainId) -> XmodYeqZ {
        XmodYeqZ { x, y, z }
    }

    /// The remainder is smaller than the divisor in absolute value, at most the dividend in
    /// absolute value and has the sign of the dividend.
    fn propagate_remainder_bounds(&self, context: &mut PropagationContext) -> PropagationStatus {
        let (lx, ux) = bounds(context.domains(), self.x);
        let (ly, uy) = bounds(context.domains(), self.y);
        let largest_remainder = ly.abs().max(uy.abs()) - 1;

        let lower_bound = if lx >= 0 { 0 } else { lx.max(-largest_remainder) };
        let upper_bound = if ux <= 0 { 0 } else { ux.min(largest_remainder) };
        let _ = set_bounds(context, self.z, lower_bound, upper_bound)?;

        Ok(())
    }

    /// A remainder of a fixed sign forces the dividend to that sign and to be at least as large
    /// in absolute value.
    fn propagate_dividend_sign(&self, context: &mut PropagationContext) -> PropagationStatus {
        let (lz, uz) = bounds(context.domains(), self.z);

        if lz > 0 {
            let _ = set_bounds(context, self.x, lz, i64::from(i32::MAX))?;
        } else if uz < 0 {
            let _ = set_bounds(context, self.x, i64::from(i32::MIN), uz)?;
        }

        Ok(())
    }

    /// Moves the bounds of `x` to the nearest values whose remainder is in the domain of `z`.
    fn propagate_dividend_bounds(
        &self,
        context: &mut PropagationContext,
        divisor: i64,
    ) -> PropagationStatus {
        let supports = |domains: Domains, value: i32| {
            contains(domains, self.z, i64::from(value) % divisor)
        };

        let mut lower_bound = context.lower_bound(self.x);
        while !supports(context.domains(), lower_bound) {
            lower_bound = context
                .domain(self.x)
                .next_value(lower_bound)
                .ok_or(Contradiction)?;
        }
        let _ = context.set_lower_bound(self.x, lower_bound)?;

        let mut upper_bound = context.upper_bound(self.x);
        while !supports(context.domains(), upper_bound) {
            upper_bound = context
                .domain(self.x)
                .previous_value(upper_bound)
                .ok_or(Contradiction)?;
        }
        let _ = context.set_upper_bound(self.x, upper_bound)?;

        Ok(())
    }
}

impl PropagatorConstructor for XmodYeqZ {
    type PropagatorImpl = XmodYeqZ;

    fn create(self, _context: PropagatorConstructorContext) -> Result<XmodYeqZ, ModelError> {
        Ok(self)
    }
}

impl Propagator for XmodYeqZ {
    fn name(&self) -> &str {
        "XmodYeqZ"
    }

    fn arguments(&self) -> Vec<DomainId> {
        vec![self.x, self.y, self.z]
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn consistency_pruning_event(&self, var: DomainId) -> PruningEvent {
        if var == self.z {
            PruningEvent::Any
        } else {
            PruningEvent::Bound
        }
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        let _ = context.remove(self.y, 0)?;

        loop {
            let pruning_count = context.pruning_count();

            self.propagate_remainder_bounds(context)?;
            self.propagate_dividend_sign(context)?;

            if let (Some(x), Some(y)) = (context.fixed_value(self.x), context.fixed_value(self.y)) {
                let _ = context.assign(self.z, (i64::from(x) % i64::from(y)) as i32)?;
            } else if let Some(y) = context.fixed_value(self.y) {
                self.propagate_dividend_bounds(context, i64::from(y))?;
            }

            if context.pruning_count() == pruning_count {
                break;
            }
        }

        if [self.x, self.y, self.z]
            .iter()
            .all(|&var| context.is_fixed(var))
        {
            context.remove_constraint();
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        match (
            domains.fixed_value(self.x),
            domains.fixed_value(self.y),
            domains.fixed_value(self.z),
        ) {
            (Some(x), Some(y), Some(z)) => y != 0 && i64::from(x) % i64::from(y) == i64::from(z),
            _ => false,
        }
    }
}

impl NegatablePropagator for XmodYeqZ {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        if let (Some(x), Some(y)) = (context.fixed_value(self.x), context.fixed_value(self.y)) {
            if y != 0 {
                let _ = remove(context, self.z, i64::from(x) % i64::from(y))?;
            }
            context.remove_constraint();
        }

        Ok(())
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        match (domains.fixed_value(self.x), domains.fixed_value(self.y)) {
            (_, Some(0)) => true,
            (Some(x), Some(y)) => !contains(domains, self.z, i64::from(x) % i64::from(y)),
            _ => false,
        }
    }

    fn not_consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Ground
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn the_remainder_is_bounded_by_the_divisor() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(-10, 10);
        let y = solver.new_variable(3, 4);
        let z = solver.new_variable(-100, 100);

        let _ = solver
            .new_propagator(XmodYeqZ::new(x, y, z))
            .expect("non-empty domains");

        solver.assert_bounds(z, -3, 3);
    }

    #[test]
    fn the_dividend_moves_to_supported_values() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(-10, 10);
        let y = solver.new_variable(5, 5);
        let z = solver.new_variable(1, 2);

        let _ = solver
            .new_propagator(XmodYeqZ::new(x, y, z))
            .expect("non-empty domains");

        solver.assert_bounds(x, 1, 7);
    }

    #[test]
    fn the_remainder_takes_the_sign_of_the_dividend() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(-7, -7);
        let y = solver.new_variable(-2, 3);
        let z = solver.new_variable(-10, 10);

        let _ = solver
            .new_propagator(XmodYeqZ::new(x, y, z))
            .expect("non-empty domains");
        solver.assert_bounds(z, -2, 0);

        solver.assign(y, 2);
        solver.propagate().expect("non-empty domains");
        assert_eq!(solver.fixed_value(z), Some(-1));
    }

    #[test]
    fn the_negation_excludes_the_remainder() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(17, 17);
        let y = solver.new_variable(5, 5);
        let z = solver.new_variable(0, 4);

        let constraint = XmodYeqZ::new(x, y, z);
        assert!(!constraint.not_satisfied(solver.store.domains()));

        let _ = solver
            .new_propagator(crate::propagators::NotArgs::new(constraint))
            .expect("non-empty domains");
        assert!(!solver.contains(z, 2));
    }
}
