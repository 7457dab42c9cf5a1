use super::Relation;
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

/// `x relation y`.
///
/// Equality is domain consistent, the orderings are bounds consistent and disequality only
/// prunes once one of the sides is fixed.
#[derive(Clone, Copy, Debug)]
pub struct XRelY {
    x: DomainId,
    relation: Relation,
    y: DomainId,
}

impl XRelY {
    pub fn new(x: DomainId, relation: Relation, y: DomainId) -> XRelY {
        XRelY { x, relation, y }
    }
}

impl PropagatorConstructor for XRelY {
    type PropagatorImpl = XRelY;

    fn create(self, _context: PropagatorConstructorContext) -> Result<XRelY, ModelError> {
        Ok(self)
    }
}

/// Rewrites `x relation y` such that the relation is one of `==`, `!=`, `<` and `<=`.
fn orient(x: DomainId, relation: Relation, y: DomainId) -> (DomainId, Relation, DomainId) {
    match relation {
        Relation::Gt | Relation::Ge => (y, relation.swapped(), x),
        _ => (x, relation, y),
    }
}

fn enforce(
    context: &mut PropagationContext,
    x: DomainId,
    relation: Relation,
    y: DomainId,
) -> PropagationStatus {
    let (a, relation, b) = orient(x, relation, y);

    match relation {
        Relation::Eq => {
            let domain_b = context.domain(b).clone();
            let _ = context.intersect(a, &domain_b)?;
            let domain_a = context.domain(a).clone();
            let _ = context.intersect(b, &domain_a)?;
        }
        Relation::Ne => {
            if let Some(value) = context.fixed_value(a) {
                let _ = context.remove(b, value)?;
            }
            if let Some(value) = context.fixed_value(b) {
                let _ = context.remove(a, value)?;
            }
        }
        Relation::Lt => {
            let upper_bound = context.upper_bound(b).checked_sub(1).ok_or(Contradiction)?;
            let _ = context.set_upper_bound(a, upper_bound)?;
            let lower_bound = context.lower_bound(a).checked_add(1).ok_or(Contradiction)?;
            let _ = context.set_lower_bound(b, lower_bound)?;
        }
        Relation::Le => {
            let _ = context.set_upper_bound(a, context.upper_bound(b))?;
            let _ = context.set_lower_bound(b, context.lower_bound(a))?;
        }
        Relation::Gt | Relation::Ge => unreachable!("oriented relations are never > or >="),
    }

    if is_entailed(context.domains(), a, relation, b) {
        context.remove_constraint();
    }

    Ok(())
}

fn is_entailed(domains: Domains, x: DomainId, relation: Relation, y: DomainId) -> bool {
    let (a, relation, b) = orient(x, relation, y);

    match relation {
        Relation::Eq => match (domains.fixed_value(a), domains.fixed_value(b)) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        },
        Relation::Ne => !domains.domain(a).is_intersecting(domains.domain(b)),
        Relation::Lt => domains.upper_bound(a) < domains.lower_bound(b),
        Relation::Le => domains.upper_bound(a) <= domains.lower_bound(b),
        Relation::Gt | Relation::Ge => unreachable!("oriented relations are never > or >="),
    }
}

fn pruning_event(relation: Relation) -> PruningEvent {
    match relation {
        Relation::Eq => PruningEvent::Any,
        Relation::Ne => PruningEvent::Ground,
        _ => PruningEvent::Bound,
    }
}

impl Propagator for XRelY {
    fn name(&self) -> &str {
        "XRelY"
    }

    fn arguments(&self) -> Vec<DomainId> {
        vec![self.x, self.y]
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        pruning_event(self.relation)
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        enforce(context, self.x, self.relation, self.y)
    }

    fn satisfied(&self, domains: Domains) -> bool {
        is_entailed(domains, self.x, self.relation, self.y)
    }
}

impl NegatablePropagator for XRelY {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        enforce(context, self.x, self.relation.negated(), self.y)
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        is_entailed(domains, self.x, self.relation.negated(), self.y)
    }

    fn not_consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        pruning_event(self.relation.negated())
    }
}
