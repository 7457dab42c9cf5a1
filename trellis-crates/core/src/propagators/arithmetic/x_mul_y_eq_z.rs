use num::Integer;

use super::bounds;
use super::check_overflow;
use super::contains;
use super::min_max;
use super::remove;
use super::set_bounds;
use crate::basic_types::Contradiction;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainId;
use crate::engine::EmptyDomain;
use crate::engine::PruningEvent;
use crate::propagation::Domains;
use crate::propagation::NegatablePropagator;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// `x * y = z`, bounds consistent.
#[derive(Clone, Copy, Debug)]
pub struct XmulYeqZ {
    x: DomainId,
    y: DomainId,
    z: DomainId,
}

impl XmulYeqZ {
    pub fn new(x: DomainId, y: DomainId, z: DomainId) -> XmulYeqZ {
        XmulYeqZ { x, y, z }
    }
}

fn product_bounds(domains: Domains, x: DomainId, y: DomainId) -> (i64, i64) {
    let (lx, ux) = bounds(domains, x);
    let (ly, uy) = bounds(domains, y);

    min_max([lx * ly, lx * uy, ux * ly, ux * uy])
}

/// Narrows `factor` to the integers `f` for which `f * other` can lie within the bounds of
/// `product`.
///
/// Nothing can be derived while the bounds of `other` include 0.
fn propagate_factor(
    context: &mut PropagationContext,
    factor: DomainId,
    other: DomainId,
    product: DomainId,
) -> Result<bool, EmptyDomain> {
    let (lo, uo) = bounds(context.domains(), other);
    if lo <= 0 && uo >= 0 {
        return Ok(false);
    }

    let (lp, up) = bounds(context.domains(), product);
    let corners = [(lp, lo), (lp, uo), (up, lo), (up, uo)];

    let lower_bound = corners
        .iter()
        .map(|(p, o)| Integer::div_ceil(p, o))
        .min()
        .unwrap_or(i64::MIN);
    let upper_bound = corners
        .iter()
        .map(|(p, o)| Integer::div_floor(p, o))
        .max()
        .unwrap_or(i64::MAX);

    set_bounds(context, factor, lower_bound, upper_bound)
}

impl PropagatorConstructor for XmulYeqZ {
    type PropagatorImpl = XmulYeqZ;

    fn create(self, context: PropagatorConstructorContext) -> Result<XmulYeqZ, ModelError> {
        let (min, max) = product_bounds(context.domains(), self.x, self.y);

        check_overflow("XmulYeqZ", min)?;
        check_overflow("XmulYeqZ", max)?;

        Ok(self)
    }
}

impl Propagator for XmulYeqZ {
    fn name(&self) -> &str {
        "XmulYeqZ"
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
            let (min, max) = product_bounds(context.domains(), self.x, self.y);
            let mut changed = set_bounds(context, self.z, min, max)?;

            if !context.contains(self.z, 0) {
                changed |= context.remove(self.x, 0)?;
                changed |= context.remove(self.y, 0)?;
            }

            changed |= propagate_factor(context, self.x, self.y, self.z)?;
            changed |= propagate_factor(context, self.y, self.x, self.z)?;

            if !changed {
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
            (Some(x), Some(y), Some(z)) => i64::from(x) * i64::from(y) == i64::from(z),
            _ => false,
        }
    }
}

/// Removes the value of `other` for which `fixed * other = product`, both `fixed` and `product`
/// being fixed.
fn remove_quotient(
    context: &mut PropagationContext,
    other: DomainId,
    fixed: i64,
    product: i64,
) -> PropagationStatus {
    if fixed == 0 {
        // 0 * other = 0 for every value of other.
        return if product == 0 { Err(Contradiction) } else { Ok(()) };
    }

    if product % fixed == 0 {
        let _ = remove(context, other, product / fixed)?;
    }

    Ok(())
}

impl NegatablePropagator for XmulYeqZ {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        let x = context.fixed_value(self.x).map(i64::from);
        let y = context.fixed_value(self.y).map(i64::from);
        let z = context.fixed_value(self.z).map(i64::from);

        match (x, y, z) {
            (Some(x), Some(y), _) => {
                let _ = remove(context, self.z, x * y)?;
            }
            (Some(x), None, Some(z)) => remove_quotient(context, self.y, x, z)?,
            (None, Some(y), Some(z)) => remove_quotient(context, self.x, y, z)?,
            _ => return Ok(()),
        }

        if self.not_satisfied(context.domains()) {
            context.remove_constraint();
        }

        Ok(())
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        let (min, max) = product_bounds(domains, self.x, self.y);
        let (lz, uz) = bounds(domains, self.z);

        if min > uz || max < lz {
            return true;
        }

        match (
            domains.fixed_value(self.x),
            domains.fixed_value(self.y),
            domains.fixed_value(self.z),
        ) {
            (Some(x), Some(y), Some(z)) => i64::from(x) * i64::from(y) != i64::from(z),
            (Some(x), Some(y), None) => {
                !contains(domains, self.z, i64::from(x) * i64::from(y))
            }
            _ => false,
        }
    }

    fn not_consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Ground
    }
}
