use rand::{Rng, rng};

/// A trait for random sources that return random integers.
///
/// Used to assign a machine ID when none is configured. This abstraction
/// allows plugging in a deterministic source in tests.
///
/// # Example
/// ```
/// use snowid::RandSource;
///
/// struct FixedRand;
/// impl RandSource<u16> for FixedRand {
///     fn rand(&self) -> u16 {
///         1234
///     }
/// }
///
/// let rng = FixedRand;
/// assert_eq!(rng.rand(), 1234);
/// ```
pub trait RandSource<T> {
    /// Returns a random integer.
    fn rand(&self) -> T;
}

/// A `RandSource` that uses the thread-local RNG (`rand::rng()`).
///
/// This type does not store the RNG; it accesses the thread-local generator on
/// each call, so it is freely shareable across threads.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource<u16> for ThreadRandom {
    fn rand(&self) -> u16 {
        rng().random()
    }
}
