mod random;

pub use random::*;

#[cfg(test)]
pub(crate) use random::tests::TestRandom;
