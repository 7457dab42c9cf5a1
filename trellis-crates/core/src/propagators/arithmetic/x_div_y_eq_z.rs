use super::bounds;
use super::min_max;
use super::remove;
use super::set_bounds;
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

/// `x / y = z`, where the division truncates towards zero; `y` is never 0.
///
/// The quotient is bounds consistent. The dividend is bounded by `y * z` widened by the largest
/// possible remainder, and made exact once both `y` and `z` are fixed.
#[derive(Clone, Copy, Debug)]
pub struct XdivYeqZ {
    x: DomainId,
    y: DomainId,
    z: DomainId,
}

impl XdivYeqZ {
    pub fn new(x: DomainId, y: DomainId, z: DomainId) -> XdivYeqZ {
        XdivYeqZ { x, y, z }
    }
}

/// The negative and the positive part of the bounds of the divisor.
fn sign_regions(domains: Domains, y: DomainId) -> impl Iterator<Item = (i64, i64)> {
    let (ly, uy) = bounds(domains, y);

    [(ly, uy.min(-1)), (ly.max(1), uy)]
        .into_iter()
        .filter(|(lower, upper)| lower <= upper)
}

/// The bounds of `x / y` over the bounds of `x` and the non-zero bounds of `y`.
fn quotient_bounds(domains: Domains, x: DomainId, y: DomainId) -> Option<(i64, i64)> {
    let (lx, ux) = bounds(domains, x);

    let quotients = sign_regions(domains, y)
        .flat_map(|(lower, upper)| [lx / lower, lx / upper, ux / lower, ux / upper])
        .collect::<Vec<_>>();

    (!quotients.is_empty()).then(|| min_max(quotients))
}

/// The values of `x` with `x / y = z` for fixed `y` and `z`.
fn dividend_bounds(y: i64, z: i64) -> (i64, i64) {
    let product = y * z;
    let remainder = y.abs() - 1;

    match product.signum() {
        1 => (product, product + remainder),
        -1 => (product - remainder, product),
        _ => (-remainder, remainder),
    }
}

impl PropagatorConstructor for XdivYeqZ {
    type PropagatorImpl = XdivYeqZ;

    fn create(self, _context: PropagatorConstructorContext) -> Result<XdivYeqZ, ModelError> {
        Ok(self)
    }
}

impl Propagator for XdivYeqZ {
    fn name(&self) -> &str {
        "XdivYeqZ"
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
        let _ = context.remove(self.y, 0)?;

        loop {
            let mut changed = false;

            if let Some((lower, upper)) = quotient_bounds(context.domains(), self.x, self.y) {
                changed |= set_bounds(context, self.z, lower, upper)?;
            }

            let y = context.fixed_value(self.y).map(i64::from);
            let z = context.fixed_value(self.z).map(i64::from);
            if let (Some(y), Some(z)) = (y, z) {
                let (lower, upper) = dividend_bounds(y, z);
                changed |= set_bounds(context, self.x, lower, upper)?;
            } else {
                let (lz, uz) = bounds(context.domains(), self.z);
                let (ly, uy) = bounds(context.domains(), self.y);
                let (min, max) = min_max([ly * lz, ly * uz, uy * lz, uy * uz]);
                let remainder = ly.abs().max(uy.abs()) - 1;
                changed |= set_bounds(context, self.x, min - remainder, max + remainder)?;
            }

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
            (Some(x), Some(y), Some(z)) => y != 0 && i64::from(x) / i64::from(y) == i64::from(z),
            _ => false,
        }
    }
}

impl NegatablePropagator for XdivYeqZ {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        if let (Some(x), Some(y)) = (context.fixed_value(self.x), context.fixed_value(self.y)) {
            if y != 0 {
                let _ = remove(context, self.z, i64::from(x) / i64::from(y))?;
            }
            context.remove_constraint();
        }

        Ok(())
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        let Some((lower, upper)) = quotient_bounds(domains, self.x, self.y) else {
            // The only value left for the divisor is 0.
            return true;
        };

        let (lz, uz) = bounds(domains, self.z);
        if lower > uz || upper < lz {
            return true;
        }

        match (
            domains.fixed_value(self.x),
            domains.fixed_value(self.y),
            domains.fixed_value(self.z),
        ) {
            (Some(x), Some(y), Some(z)) => i64::from(x) / i64::from(y) != i64::from(z),
            _ => false,
        }
    }

    fn not_consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Ground
    }
}
