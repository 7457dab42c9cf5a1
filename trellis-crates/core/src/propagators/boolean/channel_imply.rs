use super::check_booleans;
use crate::basic_types::ModelError;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainId;
use crate::engine::PruningEvent;
use crate::engine::TimeStamp;
use crate::propagation::Domains;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The arguments of [`ChannelImply`].
#[derive(Clone, Debug)]
pub struct ChannelImplyArgs {
    x: DomainId,
    bs: Vec<DomainId>,
    values: Vec<i32>,
}

impl ChannelImplyArgs {
    /// Fails unless there is exactly one value per 0/1 variable.
    pub fn new(x: DomainId, bs: Vec<DomainId>, values: Vec<i32>) -> Result<Self, ModelError> {
        if bs.len() != values.len() {
            return Err(ModelError::LengthMismatch {
                expected: bs.len(),
                actual: values.len(),
            });
        }

        Ok(ChannelImplyArgs { x, bs, values })
    }
}

impl PropagatorConstructor for ChannelImplyArgs {
    type PropagatorImpl = ChannelImply;

    fn create(self, mut context: PropagatorConstructorContext) -> Result<ChannelImply, ModelError> {
        check_booleans(context.domains(), &self.bs)?;

        Ok(ChannelImply {
            x: self.x,
            channels: self.bs.into_iter().zip(self.values).collect(),
            disabled: context.new_time_stamp(0),
        })
    }
}

/// `b_i = 1` implies `x = values_i`.
///
/// Channels whose variable is 0 are swapped into a prefix and no longer looked at.
#[derive(Clone, Debug)]
pub struct ChannelImply {
    x: DomainId,
    channels: Vec<(DomainId, i32)>,
    disabled: TimeStamp<usize>,
}

impl Propagator for ChannelImply {
    fn name(&self) -> &str {
        "ChannelImply"
    }

    fn arguments(&self) -> Vec<DomainId> {
        std::iter::once(self.x)
            .chain(self.channels.iter().map(|&(b, _)| b))
            .collect()
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn consistency_pruning_event(&self, var: DomainId) -> PruningEvent {
        if var == self.x {
            PruningEvent::Any
        } else {
            PruningEvent::Ground
        }
    }

    fn consistency(&mut self, context: &mut PropagationContext) -> PropagationStatus {
        let mut disabled = self.disabled.value(context);

        loop {
            let mut changed = false;

            for index in disabled..self.channels.len() {
                let (b, value) = self.channels[index];
                if !context.contains(self.x, value) {
                    changed |= context.assign(b, 0)?;
                }

                match context.fixed_value(b) {
                    Some(0) => {
                        self.channels.swap(index, disabled);
                        context.detach(b);
                        disabled += 1;
                    }
                    Some(_) => changed |= context.assign(self.x, value)?,
                    None => {}
                }
            }

            if !changed {
                break;
            }
        }

        self.disabled.update(context, disabled);

        // The remaining channels all point at the value of `x`.
        if context.is_fixed(self.x) || disabled == self.channels.len() {
            context.remove_constraint();
        }

        Ok(())
    }

    fn satisfied(&self, domains: Domains) -> bool {
        self.channels.iter().all(|&(b, value)| {
            domains.upper_bound(b) == 0 || domains.fixed_value(self.x) == Some(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn a_set_channel_fixes_x() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 5);
        let bs = vec![solver.new_variable(0, 1), solver.new_variable(0, 1)];

        let handle = solver
            .new_propagator(
                ChannelImplyArgs::new(x, bs.clone(), vec![2, 4]).expect("matching lengths"),
            )
            .expect("consistent");

        solver.assign(bs[1], 1);
        solver.propagate().expect("consistent");

        assert_eq!(solver.fixed_value(x), Some(4));
        assert_eq!(solver.fixed_value(bs[0]), Some(0));
        assert!(solver.is_entailed(handle));
    }

    #[test]
    fn removed_values_disable_their_channels() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 5);
        let bs = vec![solver.new_variable(0, 1), solver.new_variable(0, 1)];

        let handle = solver
            .new_propagator(
                ChannelImplyArgs::new(x, bs.clone(), vec![2, 4]).expect("matching lengths"),
            )
            .expect("consistent");

        solver.remove(x, 2);
        solver.propagate().expect("consistent");

        assert_eq!(solver.fixed_value(bs[0]), Some(0));
        assert!(!solver.is_fixed(bs[1]));
        assert!(!solver.is_watching(bs[0], handle));
    }

    #[test]
    fn two_set_channels_with_different_values_fail() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 5);
        let bs = vec![solver.new_variable(1, 1), solver.new_variable(1, 1)];

        let result = solver.new_propagator(
            ChannelImplyArgs::new(x, bs, vec![2, 4]).expect("matching lengths"),
        );

        assert!(result.is_err());
    }

    #[test]
    fn lengths_must_match() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 5);
        let b = solver.new_variable(0, 1);

        assert_eq!(
            ChannelImplyArgs::new(x, vec![b], vec![1, 2]).map(|_| ()),
            Err(ModelError::LengthMismatch {
                expected: 1,
                actual: 2
            })
        );
    }
}
