use crate::{Corpus, Error, Result};
use std::{collections::HashMap, hash::Hash};

/// Page -> probability. Covers every page of the corpus it was computed on.
pub type Distribution<P> = HashMap<P, f64, ahash::RandomState>;

pub const DEFAULT_DAMPING: f64 = 0.85;

pub fn norm_1<K: Eq + Hash>(v: &HashMap<K, f64, ahash::RandomState>) -> f64 {
    v.values().map(|x| x.abs()).sum()
}

pub fn norm_inf<K: Eq + Hash>(v: &HashMap<K, f64, ahash::RandomState>) -> f64 {
    v.values().map(|x| x.abs()).fold(0.0, f64::max)
}

pub(crate) fn round_to(x: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (x * scale).round() / scale
}

pub(crate) fn check_damping(damping: f64) -> Result<()> {
    if damping > 0.0 && damping < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "damping must lie in (0, 1), got {damping}"
        )))
    }
}

pub(crate) fn check_corpus<P>(corpus: &Corpus<P>) -> Result<()> {
    if corpus.is_empty() {
        Err(Error::InvalidInput("corpus is empty".to_string()))
    } else {
        Ok(())
    }
}
