use std::fmt::Debug;

use super::NegatablePropagator;
use super::Propagator;
use super::PropagatorConstructorContext;
use crate::basic_types::ModelError;

/// Creates a fully initialised [`Propagator`] when a constraint is imposed on a store.
///
/// Structural checks which do not depend on the store (array lengths, duplicate arguments) belong
/// in the constructor of `Self`; checks which need the initial domains (0/1 domains, overflow)
/// belong in [`PropagatorConstructor::create`].
pub trait PropagatorConstructor {
    /// The propagator that is produced by this constructor.
    type PropagatorImpl: Propagator;

    /// Create the propagator instance from `Self`.
    fn create(
        self,
        context: PropagatorConstructorContext,
    ) -> Result<Self::PropagatorImpl, ModelError>;
}

/// A constructor of a [`NegatablePropagator`] whose concrete type has been erased, which is how
/// meta constraints store their children.
pub trait NegatableConstructor: Debug {
    fn create_negatable(
        self: Box<Self>,
        context: PropagatorConstructorContext,
    ) -> Result<Box<dyn NegatablePropagator>, ModelError>;
}

impl<Constructor> NegatableConstructor for Constructor
where
    Constructor: PropagatorConstructor + Debug,
    Constructor::PropagatorImpl: NegatablePropagator,
{
    fn create_negatable(
        self: Box<Self>,
        context: PropagatorConstructorContext,
    ) -> Result<Box<dyn NegatablePropagator>, ModelError> {
        let propagator = (*self).create(context)?;
        Ok(Box::new(propagator))
    }
}
