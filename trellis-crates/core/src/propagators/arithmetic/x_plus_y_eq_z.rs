use super::bounds;
use super::check_overflow;
use super::remove;
use super::set_bounds;
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

/// `x + y = z`.
///
/// Bounds consistent; once one of the summands is fixed the other summand and `z` are made
/// domain consistent.
#[derive(Clone, Copy, Debug)]
pub struct XplusYeqZ {
    x: DomainId,
    y: DomainId,
    z: DomainId,
}

impl XplusYeqZ {
    pub fn new(x: DomainId, y: DomainId, z: DomainId) -> XplusYeqZ {
        XplusYeqZ { x, y, z }
    }

    fn propagate_bounds(&self, context: &mut PropagationContext) -> PropagationStatus {
        loop {
            let (lx, ux) = bounds(context.domains(), self.x);
            let (ly, uy) = bounds(context.domains(), self.y);
            let mut changed = set_bounds(context, self.z, lx + ly, ux + uy)?;

            let (lz, uz) = bounds(context.domains(), self.z);
            changed |= set_bounds(context, self.x, lz - uy, uz - ly)?;

            let (lx, ux) = bounds(context.domains(), self.x);
            changed |= set_bounds(context, self.y, lz - ux, uz - lx)?;

            if !changed {
                return Ok(());
            }
        }
    }

    /// With the summand other than `other` fixed to `value`, `z` has to be in `other + value` and
    /// `other` in `z - value`.
    fn propagate_domains(
        &self,
        context: &mut PropagationContext,
        other: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let Some(negated) = value.checked_neg() else {
            return Ok(false);
        };

        let domain_other = context.domain(other).clone();
        let mut changed = context.intersect_shifted(self.z, &domain_other, value)?;
        let domain_z = context.domain(self.z).clone();
        changed |= context.intersect_shifted(other, &domain_z, negated)?;

        Ok(changed)
    }
}

impl PropagatorConstructor for XplusYeqZ {
    type PropagatorImpl = XplusYeqZ;

    fn create(self, context: PropagatorConstructorContext) -> Result<XplusYeqZ, ModelError> {
        let (lx, ux) = bounds(context.domains(), self.x);
        let (ly, uy) = bounds(context.domains(), self.y);

        check_overflow("XplusYeqZ", lx + ly)?;
        check_overflow("XplusYeqZ", ux + uy)?;

        Ok(self)
    }
}

impl Propagator for XplusYeqZ {
    fn name(&self) -> &str {
        "XplusYeqZ"
    }

    fn arguments(&self) -> Vec<DomainId> {
        vec![self.x, self.y, self.z]
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Bound
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        loop {
            self.propagate_bounds(context)?;

            let mut changed = false;
            if let Some(value) = context.fixed_value(self.x) {
                changed |= self.propagate_domains(context, self.y, value)?;
            }
            if let Some(value) = context.fixed_value(self.y) {
                changed |= self.propagate_domains(context, self.x, value)?;
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
            (Some(x), Some(y), Some(z)) => i64::from(x) + i64::from(y) == i64::from(z),
            _ => false,
        }
    }
}

impl NegatablePropagator for XplusYeqZ {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        let x = context.fixed_value(self.x).map(i64::from);
        let y = context.fixed_value(self.y).map(i64::from);
        let z = context.fixed_value(self.z).map(i64::from);

        match (x, y, z) {
            (Some(x), Some(y), _) => {
                let _ = remove(context, self.z, x + y)?;
            }
            (Some(x), None, Some(z)) => {
                let _ = remove(context, self.y, z - x)?;
            }
            (None, Some(y), Some(z)) => {
                let _ = remove(context, self.x, z - y)?;
            }
            _ => return Ok(()),
        }

        context.remove_constraint();
        Ok(())
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        let (lx, ux) = bounds(domains, self.x);
        let (ly, uy) = bounds(domains, self.y);
        let (lz, uz) = bounds(domains, self.z);

        lx + ly > uz
            || ux + uy < lz
            || (domains.is_fixed(self.x)
                && domains.is_fixed(self.y)
                && domains.is_fixed(self.z)
                && lx + ly != lz)
    }

    fn not_consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Ground
    }
}
