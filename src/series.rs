/// Generator of numbers series.
use std::ops::{Add, AddAssign};

/// Generator (iterator) state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct SeriesWithStep<T: Copy> {
    max: T,
    step: T,
    next: T,
}

impl<T> SeriesWithStep<T>
where
    T: Copy + Add + AddAssign + PartialOrd,
    <T as Add>::Output: PartialOrd<T>,
{
    /// Caller is responsible to ensure that
    /// maximum serial value (max+step) isn't greater than type's maximum.
    ///
    /// Panics if one of the parameters is out of bounds.
    #[inline]
    pub(crate) fn new(min: T, max: T, step: T) -> Self {
        if max < min {
            panic!("max value is less than min value");
        }

        if min + step == min {
            panic!("step value is 0");
        }

        Self {
            next: min,
            max,
            step,
        }
    }
}

impl<T> Iterator for SeriesWithStep<T>
where
    T: Copy + Add + AddAssign + PartialOrd,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.max {
            None
        } else {
            let current = self.next;
            self.next += self.step;
            Some(current)
        }
    }
}
