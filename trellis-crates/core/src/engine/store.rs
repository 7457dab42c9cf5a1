use enumset::EnumSet;
use itertools::Itertools;
use log::debug;
use log::trace;
use log::warn;

use super::Assignments;
use super::DomainId;
use super::EmptyDomain;
use super::EventSink;
use super::IntDomainEvent;
use super::IntervalDomain;
use super::PropagatorQueue;
use super::PruningEvent;
use super::StoreOptions;
use super::StoreStatistics;
use super::TimeStamp;
use super::TrailedValues;
use super::VariableWeights;
use super::WatchLists;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::basic_types::Trail;
use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::propagation::Domains;
use crate::propagation::EnqueueDecision;
use crate::propagation::ImposeRequests;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorId;
use crate::propagation::PropagatorStore;
use crate::statistics::log_statistic_postfix;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::print_trellis_assert_warning_message;
use crate::trellis_assert_eq_simple;
use crate::trellis_assert_simple;

/// What the store knows about an imposed constraint besides the propagator itself.
#[derive(Debug)]
struct ConstraintInfo {
    /// `"<name><n>"`, where `n` counts the constraints with the same name imposed on this store.
    identifier: String,
    arguments: Vec<DomainId>,
    priority: Priority,
    /// Set through [`PropagationContext::remove_constraint`].
    entailed: TimeStamp<bool>,
    /// The store restored a level below the one at which the constraint was imposed.
    retired: bool,
}

/// Owns the variables and constraints of a model and computes the fixpoint of the propagators.
///
/// The store is driven by a search procedure which
/// 1. opens a level with [`Store::new_checkpoint`],
/// 2. narrows a domain through one of the decision operations (e.g. [`Store::assign`]),
/// 3. calls [`Store::consistency`], and
/// 4. calls [`Store::restore`] to undo every change made above a level.
#[derive(Debug)]
pub struct Store {
    options: StoreOptions,
    assignments: Assignments,
    trailed_values: TrailedValues,
    watch_lists: WatchLists,
    events: EventSink,
    propagators: PropagatorStore,
    constraints: KeyedVec<PropagatorId, ConstraintInfo>,
    queue: PropagatorQueue,
    /// The constraints which have to be retired when their level is undone.
    imposed_during_search: Trail<PropagatorId>,
    remove_level_listeners: Vec<PropagatorId>,
    late_remove_level_listeners: Vec<PropagatorId>,
    weights: VariableWeights,
    variable_names: KeyedVec<DomainId, Option<String>>,
    constraint_counters: HashMap<String, usize>,
    statistics: StoreStatistics,
}

impl Default for Store {
    fn default() -> Self {
        Store::new(StoreOptions::default())
    }
}

impl Store {
    pub fn new(options: StoreOptions) -> Store {
        print_trellis_assert_warning_message!();

        Store {
            options,
            assignments: Assignments::default(),
            trailed_values: TrailedValues::default(),
            watch_lists: WatchLists::default(),
            events: EventSink::default(),
            propagators: PropagatorStore::default(),
            constraints: KeyedVec::default(),
            queue: PropagatorQueue::default(),
            imposed_during_search: Trail::default(),
            remove_level_listeners: Vec::new(),
            late_remove_level_listeners: Vec::new(),
            weights: VariableWeights::default(),
            variable_names: KeyedVec::default(),
            constraint_counters: HashMap::default(),
            statistics: StoreStatistics::default(),
        }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }
}

// Variables
impl Store {
    /// Creates a variable with domain `{lower_bound..upper_bound}`.
    pub fn new_variable(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        trellis_assert_simple!(
            lower_bound <= upper_bound,
            "the domain of a new variable cannot be empty"
        );
        self.new_variable_with_domain(IntervalDomain::new(lower_bound, upper_bound))
    }

    pub fn new_named_variable(
        &mut self,
        name: impl Into<String>,
        lower_bound: i32,
        upper_bound: i32,
    ) -> DomainId {
        let domain_id = self.new_variable(lower_bound, upper_bound);
        self.variable_names[domain_id] = Some(name.into());
        domain_id
    }

    /// Creates a variable whose domain consists of exactly the given values.
    pub fn new_sparse_variable(&mut self, values: impl IntoIterator<Item = i32>) -> DomainId {
        self.new_variable_with_domain(IntervalDomain::from_values(values))
    }

    pub fn new_variable_with_domain(&mut self, domain: IntervalDomain) -> DomainId {
        let domain_id = self.assignments.grow(domain);
        self.watch_lists.grow();
        self.weights.grow();
        let _ = self.variable_names.push(None);

        domain_id
    }

    pub fn variable_name(&self, var: DomainId) -> Option<&str> {
        self.variable_names[var].as_deref()
    }

    pub fn num_variables(&self) -> usize {
        self.assignments.num_domains()
    }

    pub fn variables(&self) -> impl Iterator<Item = DomainId> {
        self.assignments.domain_ids()
    }
}

// Queries
impl Store {
    pub fn domain(&self, var: DomainId) -> &IntervalDomain {
        self.assignments.domain(var)
    }

    pub fn lower_bound(&self, var: DomainId) -> i32 {
        self.domain(var).min()
    }

    pub fn upper_bound(&self, var: DomainId) -> i32 {
        self.domain(var).max()
    }

    pub fn size(&self, var: DomainId) -> u64 {
        self.domain(var).size()
    }

    pub fn contains(&self, var: DomainId, value: i32) -> bool {
        self.domain(var).contains(value)
    }

    pub fn is_fixed(&self, var: DomainId) -> bool {
        self.domain(var).is_singleton()
    }

    pub fn fixed_value(&self, var: DomainId) -> Option<i32> {
        self.domain(var).singleton_value()
    }

    /// A read-only view on the domains and [`TimeStamp`]s of the store.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(&self.assignments, &self.trailed_values)
    }

    pub fn weight(&self, var: DomainId) -> u64 {
        self.weights.weight(var)
    }

    pub fn weights(&self) -> &VariableWeights {
        &self.weights
    }

    /// The number of narrowings performed on the store so far.
    pub fn pruning_count(&self) -> u64 {
        self.assignments.num_prunings()
    }
}

// Decisions
impl Store {
    fn record_decision(&mut self, var: DomainId, events: EnumSet<IntDomainEvent>) -> bool {
        let changed = !events.is_empty();
        self.events.record(var, events, None);
        changed
    }

    pub fn set_lower_bound(&mut self, var: DomainId, value: i32) -> Result<bool, EmptyDomain> {
        let events = self.assignments.set_lower_bound(var, value)?;
        Ok(self.record_decision(var, events))
    }

    pub fn set_upper_bound(&mut self, var: DomainId, value: i32) -> Result<bool, EmptyDomain> {
        let events = self.assignments.set_upper_bound(var, value)?;
        Ok(self.record_decision(var, events))
    }

    pub fn set_bounds(&mut self, var: DomainId, min: i32, max: i32) -> Result<bool, EmptyDomain> {
        let events = self.assignments.set_bounds(var, min, max)?;
        Ok(self.record_decision(var, events))
    }

    pub fn intersect(&mut self, var: DomainId, domain: &IntervalDomain) -> Result<bool, EmptyDomain> {
        let events = self.assignments.intersect(var, domain)?;
        Ok(self.record_decision(var, events))
    }

    pub fn subtract(&mut self, var: DomainId, domain: &IntervalDomain) -> Result<bool, EmptyDomain> {
        let events = self.assignments.subtract(var, domain)?;
        Ok(self.record_decision(var, events))
    }

    pub fn remove(&mut self, var: DomainId, value: i32) -> Result<bool, EmptyDomain> {
        let events = self.assignments.remove(var, value)?;
        Ok(self.record_decision(var, events))
    }

    pub fn remove_range(&mut self, var: DomainId, min: i32, max: i32) -> Result<bool, EmptyDomain> {
        let events = self.assignments.remove_range(var, min, max)?;
        Ok(self.record_decision(var, events))
    }

    pub fn assign(&mut self, var: DomainId, value: i32) -> Result<bool, EmptyDomain> {
        let events = self.assignments.assign(var, value)?;
        Ok(self.record_decision(var, events))
    }
}

// Levels
impl Store {
    /// The current level; the root is level 0.
    pub fn level(&self) -> usize {
        self.assignments.level()
    }

    /// Opens a new level. Every change made from now on is undone by restoring the current level.
    pub fn new_checkpoint(&mut self) {
        self.assignments.new_level();
        self.trailed_values.new_level();
        self.imposed_during_search.new_level();
    }

    /// Undoes every change made above `level`: domains and [`TimeStamp`]s return to the state
    /// they had at `level`, and constraints imposed above `level` are retired.
    ///
    /// Propagators registered as remove-level listeners are called before the state is restored,
    /// late remove-level listeners after.
    pub fn restore(&mut self, level: usize) {
        trellis_assert_simple!(level < self.level(), "can only restore an earlier level");

        for removed_level in ((level + 1)..=self.level()).rev() {
            for &propagator_id in self.remove_level_listeners.iter() {
                self.propagators[propagator_id].remove_level(removed_level);
            }
        }

        self.assignments.synchronise(level);
        self.trailed_values.synchronise(level);
        let retired = self
            .imposed_during_search
            .synchronise(level)
            .collect::<Vec<_>>();
        for propagator_id in retired {
            self.retire(propagator_id);
        }

        // Notifications for undone changes are meaningless now. Surviving constraints keep a
        // pending first run.
        self.events.clear();
        let constraints = &self.constraints;
        self.queue
            .retain(|propagator_id| !constraints[propagator_id].retired);

        let domains = Domains::new(&self.assignments, &self.trailed_values);
        for &propagator_id in self.late_remove_level_listeners.iter() {
            self.propagators[propagator_id].synchronise(domains);
        }

        self.statistics.num_restores += 1;
    }

    fn retire(&mut self, propagator_id: PropagatorId) {
        let info = &mut self.constraints[propagator_id];
        info.retired = true;

        for &var in info.arguments.iter() {
            self.watch_lists.unwatch(var, propagator_id);
        }
        self.remove_level_listeners
            .retain(|&listener| listener != propagator_id);
        self.late_remove_level_listeners
            .retain(|&listener| listener != propagator_id);

        self.statistics.num_retired_constraints += 1;
        debug!("retired {}", info.identifier);
    }
}

// Constraints
impl Store {
    /// Imposes a constraint, subscribing it to each of its arguments with its
    /// [`Propagator::consistency_pruning_event`], and schedules it for propagation.
    ///
    /// Errors in the model are reported immediately; a constraint which cannot be satisfied under
    /// the current domains is only detected by the next call to [`Store::consistency`].
    pub fn impose<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, ModelError>
    where
        Constructor: PropagatorConstructor,
    {
        self.impose_with_pruning_events(constructor, &[])
    }

    /// Like [`Store::impose`], but the subscription to the given variables uses the given events
    /// instead of the ones requested by the propagator.
    pub fn impose_with_pruning_events<Constructor>(
        &mut self,
        constructor: Constructor,
        pruning_events: &[(DomainId, PruningEvent)],
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, ModelError>
    where
        Constructor: PropagatorConstructor,
    {
        let propagator_id = self.propagators.next_id();

        let mut requests = ImposeRequests::default();
        let context = PropagatorConstructorContext::new(
            &self.assignments,
            &mut self.trailed_values,
            propagator_id,
            &mut requests,
        );
        let propagator = constructor.create(context)?;

        let identifier = self.next_constraint_identifier(propagator.name());
        let arguments = propagator.arguments();
        let priority = propagator.priority();
        let entailed = TimeStamp::new(self.trailed_values.grow(0));

        if !requests.skip_subscription {
            for &var in arguments.iter().unique() {
                let pruning_event = pruning_events
                    .iter()
                    .find(|(overridden, _)| *overridden == var)
                    .map(|&(_, pruning_event)| pruning_event)
                    .unwrap_or_else(|| propagator.consistency_pruning_event(var));

                self.watch_lists
                    .watch(var, propagator_id, pruning_event, &mut self.trailed_values);
            }
        }
        for (var, pruning_event) in requests.watches {
            self.watch_lists
                .watch(var, propagator_id, pruning_event, &mut self.trailed_values);
        }
        if requests.remove_level_listener {
            self.remove_level_listeners.push(propagator_id);
        }
        if requests.late_remove_level_listener {
            self.late_remove_level_listeners.push(propagator_id);
        }

        let handle = self.propagators.push(propagator);
        trellis_assert_eq_simple!(handle.propagator_id(), propagator_id);

        debug!("imposed {identifier} at level {}", self.level());
        let _ = self.constraints.push(ConstraintInfo {
            identifier,
            arguments,
            priority,
            entailed,
            retired: false,
        });

        if self.level() > 0 {
            self.imposed_during_search.push(propagator_id);
        }

        self.queue.enqueue_propagator(propagator_id, priority);
        self.statistics.num_imposed_constraints += 1;

        Ok(handle)
    }

    fn next_constraint_identifier(&mut self, name: &str) -> String {
        let counter = self
            .constraint_counters
            .entry(name.to_owned())
            .or_insert(0);
        *counter += 1;

        format!("{name}{counter}")
    }

    /// The number of constraints imposed on the store, including retired ones.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// The identifier of the constraint, e.g. `"Among3"` for the third `Among` constraint.
    pub fn constraint_id<P>(&self, handle: PropagatorHandle<P>) -> &str {
        &self.constraints[handle.propagator_id()].identifier
    }

    pub fn arguments<P>(&self, handle: PropagatorHandle<P>) -> &[DomainId] {
        &self.constraints[handle.propagator_id()].arguments
    }

    /// The propagator behind `handle`.
    pub fn propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators.get_propagator(handle)
    }

    /// Whether the constraint removed itself through
    /// [`PropagationContext::remove_constraint`] and has not been restored since.
    pub fn is_entailed<P>(&self, handle: PropagatorHandle<P>) -> bool {
        self.constraints[handle.propagator_id()]
            .entailed
            .read(&self.trailed_values)
    }

    /// Whether changes to `var` currently wake up the constraint.
    pub fn is_watching<P>(&self, var: DomainId, handle: PropagatorHandle<P>) -> bool {
        let info = &self.constraints[handle.propagator_id()];

        !info.retired
            && !info.entailed.read(&self.trailed_values)
            && self
                .watch_lists
                .is_watching(var, handle.propagator_id(), &self.trailed_values)
    }
}

// Propagation
impl Store {
    /// Runs the scheduled propagators until none of them can narrow a domain any further.
    ///
    /// On a contradiction the remaining schedule is dropped; the caller is expected to restore an
    /// earlier level.
    pub fn consistency(&mut self) -> PropagationStatus {
        self.statistics.num_consistency_calls += 1;
        self.notify_watchers();

        let mut num_calls = 0_u64;
        while let Some(propagator_id) = self.queue.pop() {
            if !self.is_active(propagator_id) {
                continue;
            }

            num_calls += 1;
            let mut result = self.propagate(propagator_id);
            if result.is_ok() && self.options.check_fixpoints {
                result = self.check_fixpoint(propagator_id);
            }

            if let Err(contradiction) = result {
                self.statistics.num_propagator_calls += num_calls;
                self.statistics
                    .average_propagator_calls_per_fixpoint
                    .add_term(num_calls);
                self.handle_failure(propagator_id);
                return Err(contradiction);
            }

            self.notify_watchers();
        }
        trellis_assert_simple!(self.queue.is_empty() && self.events.is_empty());

        self.statistics.num_propagator_calls += num_calls;
        self.statistics
            .average_propagator_calls_per_fixpoint
            .add_term(num_calls);
        Ok(())
    }

    fn is_active(&self, propagator_id: PropagatorId) -> bool {
        let info = &self.constraints[propagator_id];
        !info.retired && !info.entailed.read(&self.trailed_values)
    }

    fn propagate(&mut self, propagator_id: PropagatorId) -> PropagationStatus {
        let mut context = PropagationContext::new(
            &mut self.assignments,
            &mut self.trailed_values,
            &mut self.watch_lists,
            &mut self.events,
            propagator_id,
            self.constraints[propagator_id].entailed,
        );

        self.propagators[propagator_id].consistency(&mut context)
    }

    fn check_fixpoint(&mut self, propagator_id: PropagatorId) -> PropagationStatus {
        if !self.is_active(propagator_id) {
            return Ok(());
        }

        let num_prunings = self.assignments.num_prunings();
        let result = self.propagate(propagator_id);

        if result.is_err() || self.assignments.num_prunings() != num_prunings {
            self.statistics.num_fixpoint_violations += 1;
            warn!(
                "{} did not reach its fixpoint",
                self.constraints[propagator_id].identifier
            );
        }

        result
    }

    fn handle_failure(&mut self, propagator_id: PropagatorId) {
        self.queue.clear();
        self.events.clear();
        self.statistics.num_failures += 1;

        if self.options.increase_weights_on_failure {
            self.propagators[propagator_id].increase_weight(&mut self.weights);
        }

        debug!(
            "{} failed at level {}",
            self.constraints[propagator_id].identifier,
            self.level()
        );
    }

    /// Hands the recorded domain changes to the watchers of the changed variables and schedules
    /// the ones which ask for it.
    fn notify_watchers(&mut self) {
        for change in self.events.take() {
            for watcher in self.watch_lists.watchers(change.domain_id) {
                if Some(watcher.propagator) == change.source
                    || !watcher.pruning_event.is_triggered_by(change.events)
                    || !watcher.active.read(&self.trailed_values)
                {
                    continue;
                }

                let info = &self.constraints[watcher.propagator];
                if info.retired || info.entailed.read(&self.trailed_values) {
                    continue;
                }

                let domains = Domains::new(&self.assignments, &self.trailed_values);
                let decision = self.propagators[watcher.propagator].notify(
                    domains,
                    change.domain_id,
                    change.events,
                );

                if decision == EnqueueDecision::Enqueue {
                    trace!("enqueueing {} after a change to {}", info.identifier, change.domain_id);
                    self.queue
                        .enqueue_propagator(watcher.propagator, info.priority);
                }
            }
        }
    }
}

// Statistics
impl Store {
    /// How often a propagator narrowed a domain when run again right after it returned. Always 0
    /// unless [`StoreOptions::check_fixpoints`] is set.
    pub fn num_fixpoint_violations(&self) -> u64 {
        self.statistics.num_fixpoint_violations
    }

    /// Logs the statistics of the store followed by the statistics of every active constraint.
    pub fn log_statistics(&self) {
        self.statistics.log(StatisticLogger::new("store"));

        for propagator_id in self.constraints.keys() {
            let info = &self.constraints[propagator_id];
            if info.retired {
                continue;
            }

            self.propagators[propagator_id].log_statistics(StatisticLogger::new(&info.identifier));
        }

        log_statistic_postfix();
    }
}
