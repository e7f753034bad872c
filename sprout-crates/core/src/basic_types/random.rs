use std::fmt::Debug;
use std::ops::Range;

use rand::Rng;
use rand::SeedableRng;

use crate::sprout_assert_simple;

/// Abstraction for randomness, in order to swap out different source of randomness.
///
/// Randomness is only used to break ties between equally good choices (e.g. which concrete
/// operator to report for an abstract plan step), so tests can plug in a deterministic source.
pub trait Random: Debug {
    /// Generates a random usize in the provided range with equal probability; this can be seen as
    /// sampling from a uniform distribution in the range `[range.start, range.end)`
    ///
    /// # Example
    /// ```rust
    /// # use rand::rngs::SmallRng;
    /// # use rand::SeedableRng;
    /// # use sprout_core::Random;
    /// let mut rng = SmallRng::seed_from_u64(42);
    /// let elements = vec!["This", "is", "a", "test"];
    /// let selected_index = rng.generate_usize_in_range(0..elements.len());
    /// assert!(selected_index < elements.len());
    /// ```
    fn generate_usize_in_range(&mut self, range: Range<usize>) -> usize;

    /// Shuffles `elements` uniformly at random (Fisher-Yates).
    fn shuffle<T>(&mut self, elements: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..elements.len()).rev() {
            let j = self.generate_usize_in_range(0..i + 1);
            elements.swap(i, j);
        }
    }
}

// We provide a blanket implementation of the trait for any type which implements `SeedableRng`,
// `Rng` and `Debug` to ensure that we can use any "regular" random generator where we expect an
// implementation of Random.
impl<T> Random for T
where
    T: SeedableRng + Rng + Debug,
{
    fn generate_usize_in_range(&mut self, range: Range<usize>) -> usize {
        sprout_assert_simple!(!range.is_empty(), "cannot sample from an empty range");
        self.gen_range(range)
    }
}
