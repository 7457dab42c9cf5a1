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

/// `x relation c` for a constant `c`.
#[derive(Clone, Copy, Debug)]
pub struct XRelC {
    x: DomainId,
    relation: Relation,
    c: i32,
}

impl XRelC {
    pub fn new(x: DomainId, relation: Relation, c: i32) -> XRelC {
        XRelC { x, relation, c }
    }
}

impl PropagatorConstructor for XRelC {
    type PropagatorImpl = XRelC;

    fn create(self, _context: PropagatorConstructorContext) -> Result<XRelC, ModelError> {
        Ok(self)
    }
}

fn enforce(
    context: &mut PropagationContext,
    x: DomainId,
    relation: Relation,
    c: i32,
) -> PropagationStatus {
    let _ = match relation {
        Relation::Eq => context.assign(x, c)?,
        Relation::Ne => context.remove(x, c)?,
        Relation::Lt => context.set_upper_bound(x, c.checked_sub(1).ok_or(Contradiction)?)?,
        Relation::Le => context.set_upper_bound(x, c)?,
        Relation::Gt => context.set_lower_bound(x, c.checked_add(1).ok_or(Contradiction)?)?,
        Relation::Ge => context.set_lower_bound(x, c)?,
    };

    // Every remaining value satisfies the relation.
    context.remove_constraint();
    Ok(())
}

fn is_entailed(domains: Domains, x: DomainId, relation: Relation, c: i32) -> bool {
    match relation {
        Relation::Eq => domains.fixed_value(x) == Some(c),
        Relation::Ne => !domains.contains(x, c),
        Relation::Lt => domains.upper_bound(x) < c,
        Relation::Le => domains.upper_bound(x) <= c,
        Relation::Gt => domains.lower_bound(x) > c,
        Relation::Ge => domains.lower_bound(x) >= c,
    }
}

fn pruning_event(relation: Relation) -> PruningEvent {
    match relation {
        Relation::Eq | Relation::Ne => PruningEvent::Any,
        _ => PruningEvent::Bound,
    }
}

impl Propagator for XRelC {
    fn name(&self) -> &str {
        "XRelC"
    }

    fn arguments(&self) -> Vec<DomainId> {
        vec![self.x]
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        pruning_event(self.relation)
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        enforce(context, self.x, self.relation, self.c)
    }

    fn satisfied(&self, domains: Domains) -> bool {
        is_entailed(domains, self.x, self.relation, self.c)
    }
}

impl NegatablePropagator for XRelC {
    fn not_consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        enforce(context, self.x, self.relation.negated(), self.c)
    }

    fn not_satisfied(&self, domains: Domains) -> bool {
        is_entailed(domains, self.x, self.relation.negated(), self.c)
    }

    fn not_consistency_pruning_event(&self, _var: DomainId) -> PruningEvent {
        pruning_event(self.relation.negated())
    }
}
