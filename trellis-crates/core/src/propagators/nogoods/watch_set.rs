use crate::engine::DomainId;
use crate::engine::PruningEvent;
use crate::propagation::HasAssignments;
use crate::propagation::PropagationContext;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The assignment `var = value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Literal {
    pub(crate) var: DomainId,
    pub(crate) value: i32,
}

impl Literal {
    pub(crate) fn is_true(&self, domains: &impl HasAssignments) -> bool {
        domains.fixed_value(self.var) == Some(self.value)
    }

    pub(crate) fn is_false(&self, domains: &impl HasAssignments) -> bool {
        !domains.contains(self.var, self.value)
    }
}

/// A list of literals of which the first two are watched: the owner is subscribed to their
/// variables and to no others.
///
/// When a watched literal becomes true, [`WatchSet::rearm`] moves the watch to an unwatched
/// literal which is not true. The watches only have to be valid for the current domains, so
/// they are not restored on backtracking.
#[derive(Clone, Debug)]
pub(crate) struct WatchSet {
    literals: Vec<Literal>,
}

impl WatchSet {
    /// Subscribes the propagator being created to the variables of the first two literals,
    /// instead of to all of its arguments.
    pub(crate) fn new(literals: Vec<Literal>, context: &mut PropagatorConstructorContext) -> Self {
        context.will_not_register_any_events();
        for literal in literals.iter().take(2) {
            context.watch(literal.var, PruningEvent::Any);
        }

        WatchSet { literals }
    }

    pub(crate) fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// The literals in the watched slots.
    pub(crate) fn watched(&self) -> &[Literal] {
        &self.literals[..self.literals.len().min(2)]
    }

    /// Moves the watch of `slot` to an unwatched literal which is not true. Returns `false`, and
    /// leaves the watches untouched, if every unwatched literal is true.
    pub(crate) fn rearm(&mut self, context: &mut PropagationContext, slot: usize) -> bool {
        let Some(offset) = self.literals[2..]
            .iter()
            .position(|literal| !literal.is_true(context))
        else {
            return false;
        };

        let replacement = offset + 2;
        context.unwatch(self.literals[slot].var);
        context.watch(self.literals[replacement].var, PruningEvent::Any);
        self.literals.swap(slot, replacement);

        true
    }
}
