//! The catalogue of constraints which can be imposed on a [`Store`](crate::Store).
//!
//! Constraints without state beyond their arguments are their own
//! [`PropagatorConstructor`](crate::propagation::PropagatorConstructor), e.g.
//! [`XplusYeqZ::new`]. Constraints which allocate backtrackable state or which validate their
//! arguments are described by an `Args` struct, e.g. [`SumWeightArgs::new`], which creates the
//! propagator when it is imposed.
//!
//! The relations, arithmetic constraints and meta constraints are
//! [negatable](crate::propagation::NegatablePropagator) and can be used inside meta constraints.
mod all_different;
mod arithmetic;
mod boolean;
mod counting;
mod meta;
mod nogoods;
mod ordering;
mod relations;

pub use all_different::*;
pub use arithmetic::*;
pub use boolean::*;
pub use counting::*;
pub use meta::*;
pub use nogoods::*;
pub use ordering::*;
pub use relations::*;

use crate::basic_types::ModelError;
use crate::containers::HashSet;
use crate::engine::DomainId;
use crate::propagation::Domains;
use crate::propagation::ReadDomains;

/// Fails unless the domain of `var` lies within `{0, 1}`.
pub(crate) fn check_boolean(domains: Domains, var: DomainId) -> Result<(), ModelError> {
    if domains.lower_bound(var) < 0 || domains.upper_bound(var) > 1 {
        return Err(ModelError::NonBooleanVariable(var));
    }

    Ok(())
}

/// Rejects lists in which a variable occurs more than once.
pub(crate) fn check_distinct_variables(xs: &[DomainId]) -> Result<(), ModelError> {
    let mut seen: HashSet<_> = HashSet::default();

    match xs.iter().find(|&&x| !seen.insert(x)) {
        Some(duplicate) => Err(ModelError::IllegalArgument(format!(
            "variable {duplicate} occurs more than once"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn duplicate_variables_are_rejected() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 3);
        let y = solver.new_variable(0, 3);

        assert!(check_distinct_variables(&[x, y]).is_ok());
        assert!(matches!(
            check_distinct_variables(&[x, y, x]),
            Err(ModelError::IllegalArgument(_))
        ));
    }

    #[test]
    fn boolean_domains_lie_within_zero_and_one() {
        let mut solver = TestSolver::default();
        let b = solver.new_variable(0, 1);
        let one = solver.new_variable(1, 1);
        let x = solver.new_variable(-1, 1);

        assert!(check_boolean(solver.store.domains(), b).is_ok());
        assert!(check_boolean(solver.store.domains(), one).is_ok());
        assert_eq!(
            check_boolean(solver.store.domains(), x),
            Err(ModelError::NonBooleanVariable(x))
        );
    }
}
