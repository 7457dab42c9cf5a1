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

/// `|x| = y`, domain consistent.
#[derive(Clone, Copy, Debug)]
pub struct AbsXeqY {
    x: DomainId,
    y: DomainId,
}

impl AbsXeqY {
    pub fn new(x: DomainId, y: DomainId) -> AbsXeqY {
        AbsXeqY { x, y }
    }
}

/// `{|v| | v in domain}`.
fn absolute_values(domain: &IntervalDomain) -> IntervalDomain {
    let non_negative = domain.intersect_range(0, i32::MAX);
    let non_positive = domain.intersect_range(i32::MIN, 0);

    non_negative.union(&non_positive.negated())
}

impl PropagatorConstructor for AbsXeqY {
    type PropagatorImpl = AbsXeqY;

    fn create(self, _context: PropagatorConstructorContext) -> Result<AbsXeqY, ModelError> {
        Ok(self)
    }
}

impl Propagator for AbsXeqY {
    fn name(&self) -> &str {
        "AbsXeqY"
    }

    fn arguments(&self) -> Vec<DomainId> {
        vec![self.x, self.y]
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        let absolute_x = absolute_values(context.domain(self.x));
        let _ = context.intersect(self.y, &absolute_x)?;

        let domain_y = context.domain(self.y);
        let signed_y = domain_y.union(&domain_y.negated());
        let _ = context.intersect(self.x, &signed_y)?;

        if context.is_fixed(self.x) {
            context.remove_constraint();
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        match (domains.fixed_value(self.x), domains.fixed_value(self.y)) {
            (Some(x), Some(y)) => x.checked_abs() == Some(y),
            _ => false,
        }
    }
}

impl NegatablePropagator for AbsXeqY {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        if let Some(x) = context.fixed_value(self.x) {
            if let Some(absolute) = x.checked_abs() {
                let _ = context.remove(self.y, absolute)?;
            }
        }

        // A negative y differs from every absolute value.
        if let Some(y) = context.fixed_value(self.y).filter(|&y| y >= 0) {
            let _ = context.remove(self.x, y)?;
            if let Some(negated) = y.checked_neg() {
                let _ = context.remove(self.x, negated)?;
            }
        }

        if self.not_satisfied(context.domains()) {
            context.remove_constraint();
        }

        Ok(())
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        !absolute_values(domains.domain(self.x)).is_intersecting(domains.domain(self.y))
    }

    fn not_consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        PruningEvent::Ground
    }
}
