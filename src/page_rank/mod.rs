//! Two ways of ranking the pages of a [`Corpus`](crate::Corpus): a random
//! surfer that is simulated step by step, and the power iteration that
//! converges to the surfer's stationary distribution.

pub mod iterated;
pub mod sampled;
pub mod transition;
mod traits;
pub use self::traits::*;

pub use self::iterated::{iterate_rank, IteratedPageRank};
pub use self::sampled::{sample_rank, SampledPageRank};
pub use self::transition::{transition, TransitionModel};
