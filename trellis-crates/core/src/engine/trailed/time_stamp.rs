use std::marker::PhantomData;

use super::TrailedInteger;
use super::TrailedValues;
use crate::propagation::HasAssignments;
use crate::propagation::PropagationContext;

/// A scalar which can be stored in a [`TimeStamp`].
pub trait TimeStampValue: Copy {
    fn into_i64(self) -> i64;

    fn from_i64(value: i64) -> Self;
}

impl TimeStampValue for i64 {
    fn into_i64(self) -> i64 {
        self
    }

    fn from_i64(value: i64) -> Self {
        value
    }
}

impl TimeStampValue for i32 {
    fn into_i64(self) -> i64 {
        self as i64
    }

    fn from_i64(value: i64) -> Self {
        value as i32
    }
}

impl TimeStampValue for usize {
    fn into_i64(self) -> i64 {
        self as i64
    }

    fn from_i64(value: i64) -> Self {
        value as usize
    }
}

impl TimeStampValue for bool {
    fn into_i64(self) -> i64 {
        self as i64
    }

    fn from_i64(value: i64) -> Self {
        value != 0
    }
}

/// A backtrackable cell.
///
/// After the store restores level `l`, [`TimeStamp::value`] returns the value the cell held at
/// level `l`. Time stamps are created by constructors through
/// [`PropagatorConstructorContext::new_time_stamp`](crate::propagation::PropagatorConstructorContext::new_time_stamp)
/// and written from within a consistency call.
#[derive(Debug)]
pub struct TimeStamp<T> {
    cell: TrailedInteger,
    value_type: PhantomData<T>,
}

impl<T> Clone for TimeStamp<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TimeStamp<T> {}

impl<T: TimeStampValue> TimeStamp<T> {
    pub(crate) fn new(cell: TrailedInteger) -> Self {
        TimeStamp {
            cell,
            value_type: PhantomData,
        }
    }

    pub fn value(&self, context: &impl HasAssignments) -> T {
        self.read(context.trailed_values())
    }

    pub fn update(&self, context: &mut PropagationContext, value: T) {
        self.write(context.trailed_values, value);
    }

    pub(crate) fn read(&self, trailed_values: &TrailedValues) -> T {
        T::from_i64(trailed_values.read(self.cell))
    }

    pub(crate) fn write(&self, trailed_values: &mut TrailedValues, value: T) {
        trailed_values.assign(self.cell, value.into_i64());
    }
}
