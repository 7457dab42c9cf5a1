use super::bounds;
use super::remove;
use super::saturate;
use super::set_bounds;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainId;
use crate::engine::IntervalDomain;
use crate::engine::PruningEvent;
use crate::propagation::Domains;
use crate::propagation::NegatablePropagator;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// `|x - y| = z`.
#[derive(Clone, Copy, Debug)]
pub struct Distance {
    x: DomainId,
    y: DomainId,
    z: DomainId,
}

impl Distance {
    pub fn new(x: DomainId, y: DomainId, z: DomainId) -> Distance {
        Distance { x, y, z }
    }
}

/// The bounds of `|x - y|`.
fn distance_bounds(domains: Domains, x: DomainId, y: DomainId) -> (i64, i64) {
    let (lx, ux) = bounds(domains, x);
    let (ly, uy) = bounds(domains, y);
    let (lower, upper) = (lx - uy, ux - ly);

    let max = lower.abs().max(upper.abs());
    let min = if lower <= 0 && upper >= 0 {
        0
    } else {
        lower.abs().min(upper.abs())
    };

    (min, max)
}

/// `{center - distance, center + distance}`, leaving out values beyond 32 bits.
fn at_distance(center: i64, distance: i64) -> IntervalDomain {
    IntervalDomain::from_values(
        [center - distance, center + distance]
            .into_iter()
            .filter_map(|value| i32::try_from(value).ok()),
    )
}

/// Narrows `var` given that `other` is fixed to `center`.
fn propagate_from_fixed(
    context: &mut PropagationContext,
    var: DomainId,
    center: i64,
    z: DomainId,
) -> PropagationStatus {
    let (lz, uz) = bounds(context.domains(), z);

    let _ = set_bounds(context, var, center - uz, center + uz)?;
    if lz > 0 {
        let _ = context.remove_range(var, saturate(center - lz + 1), saturate(center + lz - 1))?;
    }
    if lz == uz {
        let _ = context.intersect(var, &at_distance(center, lz))?;
    }

    Ok(())
}

impl PropagatorConstructor for Distance {
    type PropagatorImpl = Distance;

    fn create(self, _context: PropagatorConstructorContext) -> Result<Distance, ModelError> {
        Ok(self)
    }
}

impl Propagator for Distance {
    fn name(&self) -> &str {
        "Distance"
    }

    fn arguments(&self) -> Vec<DomainId> {
        vec![self.x, self.y, self.z]
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Bound
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        loop {
            let pruning_count = context.pruning_count();

            let (min, max) = distance_bounds(context.domains(), self.x, self.y);
            let _ = set_bounds(context, self.z, min, max)?;

            let (_, uz) = bounds(context.domains(), self.z);
            let (lx, ux) = bounds(context.domains(), self.x);
            let _ = set_bounds(context, self.y, lx - uz, ux + uz)?;
            let (ly, uy) = bounds(context.domains(), self.y);
            let _ = set_bounds(context, self.x, ly - uz, uy + uz)?;

            if let Some(y) = context.fixed_value(self.y) {
                propagate_from_fixed(context, self.x, i64::from(y), self.z)?;
            }
            if let Some(x) = context.fixed_value(self.x) {
                propagate_from_fixed(context, self.y, i64::from(x), self.z)?;
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
            (Some(x), Some(y), Some(z)) => (i64::from(x) - i64::from(y)).abs() == i64::from(z),
            _ => false,
        }
    }
}

impl NegatablePropagator for Distance {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        let x = context.fixed_value(self.x).map(i64::from);
        let y = context.fixed_value(self.y).map(i64::from);
        let z = context.fixed_value(self.z).map(i64::from);

        match (x, y, z) {
            (Some(x), Some(y), _) => {
                let _ = remove(context, self.z, (x - y).abs())?;
            }
            // A negative distance differs from every |x - y|.
            (_, _, Some(z)) if z < 0 => {}
            (Some(x), None, Some(z)) => {
                let _ = remove(context, self.y, x - z)?;
                let _ = remove(context, self.y, x + z)?;
            }
            (None, Some(y), Some(z)) => {
                let _ = remove(context, self.x, y - z)?;
                let _ = remove(context, self.x, y + z)?;
            }
            _ => return Ok(()),
        }

        context.remove_constraint();
        Ok(())
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        let (min, max) = distance_bounds(domains, self.x, self.y);
        let (lz, uz) = bounds(domains, self.z);

        if min > uz || max < lz {
            return true;
        }

        match (
            domains.fixed_value(self.x),
            domains.fixed_value(self.y),
            domains.fixed_value(self.z),
        ) {
            (Some(x), Some(y), Some(z)) => (i64::from(x) - i64::from(y)).abs() != i64::from(z),
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
    use crate::propagators::NotArgs;

    #[test]
    fn the_distance_is_bounded() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 3);
        let y = solver.new_variable(7, 9);
        let z = solver.new_variable(0, 100);

        let _ = solver
            .new_propagator(Distance::new(x, y, z))
            .expect("non-empty domains");

        solver.assert_bounds(z, 4, 8);
    }

    #[test]
    fn a_fixed_point_and_distance_leave_two_candidates() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);
        let y = solver.new_variable(5, 5);
        let z = solver.new_variable(3, 3);

        let _ = solver
            .new_propagator(Distance::new(x, y, z))
            .expect("non-empty domains");

        assert_eq!(solver.domain(x).values().collect::<Vec<_>>(), vec![2, 8]);
    }

    #[test]
    fn a_minimum_distance_punches_a_hole() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);
        let y = solver.new_variable(5, 5);
        let z = solver.new_variable(2, 4);

        let _ = solver
            .new_propagator(Distance::new(x, y, z))
            .expect("non-empty domains");

        assert_eq!(
            solver.domain(x).values().collect::<Vec<_>>(),
            vec![1, 2, 3, 7, 8, 9]
        );
    }

    #[test]
    fn negation_removes_the_values_at_the_fixed_distance() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 6);
        let y = solver.new_variable(3, 3);
        let z = solver.new_variable(2, 2);

        let _ = solver
            .new_propagator(NotArgs::new(Distance::new(x, y, z)))
            .expect("non-empty domains");

        assert_eq!(
            solver.domain(x).values().collect::<Vec<_>>(),
            vec![0, 2, 3, 4, 6]
        );
    }

    #[test]
    fn negation_keeps_every_value_for_a_negative_distance() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 4);
        let y = solver.new_variable(2, 2);
        let z = solver.new_variable(-1, -1);

        let handle = solver
            .new_propagator(NotArgs::new(Distance::new(x, y, z)))
            .expect("a negative distance is never reached");

        solver.assert_bounds(x, 0, 4);
        assert_eq!(solver.domain(x).size(), 5);
        assert!(solver.is_entailed(handle));
    }
}
