use crate::{common::*, Corpus, Distribution, Error, Page};
use algograph::graph::*;
use std::collections::BTreeMap;

/// Where a random surfer goes next.
///
/// From a page with `k` links the surfer follows one of them with probability
/// `damping / k` each, and otherwise jumps to any page with probability
/// `(1 - damping) / N`. From a dangling page it jumps uniformly.
pub struct TransitionModel<'a, P> {
    corpus: &'a Corpus<P>,
    damping: f64,
}

impl<'a, P: Page> TransitionModel<'a, P> {
    pub fn new(corpus: &'a Corpus<P>, damping: f64) -> crate::Result<Self> {
        check_corpus(corpus)?;
        check_damping(damping)?;
        Ok(Self { corpus, damping })
    }

    pub fn corpus(&self) -> &'a Corpus<P> {
        self.corpus
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// The full next-page distribution from `page`.
    pub fn next(&self, page: &P) -> crate::Result<Distribution<P>> {
        let u = self.corpus.vertex(page).ok_or_else(|| {
            Error::InvalidInput(format!("{page:?} is not in the corpus"))
        })?;
        Ok(self
            .weights(u)
            .into_iter()
            .map(|(v, w)| (self.corpus.page(&v).clone(), w))
            .collect())
    }

    /// Probabilities of every vertex, ordered by vertex.
    pub(crate) fn weights(&self, u: VertexId) -> Vec<(VertexId, f64)> {
        let n = self.corpus.len() as f64;
        let graph = self.corpus.graph();
        let k = graph.out_edges(&u).count();
        if k == 0 {
            return self.corpus.vertices().map(|v| (v, 1.0 / n)).collect();
        }
        let unit = self.damping / (k as f64);
        let mut weights: BTreeMap<_, _> = self
            .corpus
            .vertices()
            .map(|v| (v, (1.0 - self.damping) / n))
            .collect();
        for e in graph.out_edges(&u) {
            if let Some(w) = weights.get_mut(&e.sink) {
                *w += unit;
            }
        }
        weights.into_iter().collect()
    }
}

/// One-shot form of [`TransitionModel::next`].
pub fn transition<P: Page>(
    corpus: &Corpus<P>,
    page: &P,
    damping: f64,
) -> crate::Result<Distribution<P>> {
    TransitionModel::new(corpus, damping)?.next(page)
}
