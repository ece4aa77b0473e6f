use super::*;
use crate::{common::*, Corpus, Distribution, Error, Page};
use algograph::graph::{QueryableGraph, VertexId};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

/// Power iteration of the PageRank recurrence
/// `rank'(p) = (1 - d) / N + d * sum(rank(q) / |out(q)|)` over every `q -> p`.
///
/// Runs on the normalized corpus, so dangling pages spread their rank over
/// all pages. Each sweep reads only the previous sweep's values.
pub struct IteratedPageRank<P> {
    corpus: Corpus<P>,
    damping: f64,
    epsilon: f64,
    decimals: Option<u32>,
    max_iterations: usize,
    transitions: BTreeMap<(VertexId, VertexId), f64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub damping: f64,
    /// Stop once no page moves by more than this between two sweeps.
    pub epsilon: f64,
    /// Round every value to this many decimal places after each sweep.
    pub decimals: Option<u32>,
    pub max_iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            epsilon: 0.001,
            decimals: Some(5),
            max_iterations: 1000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Result<P> {
    pub page_rank: Distribution<P>,
    pub delta: Distribution<P>,
    pub iterations: usize,
}

impl<P: Page> IteratedPageRank<P> {
    pub fn new(corpus: &Corpus<P>, config: &Config) -> crate::Result<Self> {
        check_corpus(corpus)?;
        let damping = config.damping;
        check_damping(damping)?;
        let epsilon = config.epsilon;
        if epsilon.is_nan() || epsilon <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "epsilon must be positive, got {epsilon}"
            )));
        }
        if config.max_iterations == 0 {
            return Err(Error::InvalidInput(
                "max_iterations must be at least 1".to_string(),
            ));
        }

        let corpus = corpus.normalized();
        let transitions = {
            let g = corpus.graph();
            let mut transitions = BTreeMap::new();
            for u in corpus.vertices() {
                let n = g.out_edges(&u).count();
                let unit = damping / (n as f64);
                for v in g.out_edges(&u).map(|e| e.sink) {
                    if let Some(w) = transitions.get_mut(&(u, v)) {
                        *w += unit;
                    } else {
                        transitions.insert((u, v), unit);
                    }
                }
            }
            transitions
        };
        Ok(Self {
            corpus,
            damping,
            epsilon,
            decimals: config.decimals,
            max_iterations: config.max_iterations,
            transitions,
        })
    }
}

impl<P: Page> PageRank<P> for IteratedPageRank<P> {
    type Result = self::Result<P>;

    fn calc(&self) -> crate::Result<Self::Result> {
        let n = self.corpus.len() as f64;
        let teleport = (1.0 - self.damping) / n;
        let mut p: HashMap<VertexId, f64, ahash::RandomState> =
            self.corpus.vertices().map(|v| (v, 1.0 / n)).collect();
        let mut r = HashMap::with_hasher(ahash::RandomState::new());
        let mut delta = HashMap::with_hasher(ahash::RandomState::new());
        for iteration in 1..=self.max_iterations {
            for v in self.corpus.vertices() {
                r.insert(v, teleport);
            }
            for ((v0, v1), w) in self.transitions.iter() {
                let from = p[v0];
                if let Some(to) = r.get_mut(v1) {
                    *to += from * w;
                }
            }
            if let Some(decimals) = self.decimals {
                for x in r.values_mut() {
                    *x = round_to(*x, decimals);
                }
            }

            delta.clear();
            for v in self.corpus.vertices() {
                delta.insert(v, p[&v] - r[&v]);
            }
            debug!(
                iteration,
                max_delta = norm_inf(&delta),
                l1_delta = norm_1(&delta),
                "sweep"
            );

            if norm_inf(&delta) <= self.epsilon {
                info!(iterations = iteration, pages = self.corpus.len(), "converged");
                return Ok(Self::Result {
                    page_rank: self.by_page(&r),
                    delta: self.by_page(&delta),
                    iterations: iteration,
                });
            }

            std::mem::swap(&mut p, &mut r);
            r.clear();
        }

        let max_delta = norm_inf(&delta);
        warn!(
            iterations = self.max_iterations,
            delta = max_delta,
            "page rank did not converge"
        );
        Err(Error::NonConvergence {
            iterations: self.max_iterations,
            delta: max_delta,
        })
    }
}

impl<P: Page> IteratedPageRank<P> {
    fn by_page(&self, xs: &HashMap<VertexId, f64, ahash::RandomState>) -> Distribution<P> {
        xs.iter()
            .map(|(v, x)| (self.corpus.page(v).clone(), *x))
            .collect()
    }
}

impl<P: Page> PageRankResult<P> for self::Result<P> {
    fn page_rank(&self) -> &Distribution<P> {
        &self.page_rank
    }

    fn into_page_rank(self) -> Distribution<P> {
        self.page_rank
    }

    fn debug<'a>(&'a self, corpus: &'a Corpus<P>) -> impl std::fmt::Debug + 'a {
        ResultDebug {
            corpus,
            result: self,
        }
    }
}

pub struct ResultDebug<'a, P> {
    corpus: &'a Corpus<P>,
    result: &'a self::Result<P>,
}

impl<P: Page> std::fmt::Debug for ResultDebug<'_, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for page in self.corpus.pages() {
            let p = self.result.page_rank.get(page).copied().unwrap_or_default();
            let d = self.result.delta.get(page).copied().unwrap_or_default();
            writeln!(f, "{page:?}: {p:?}, {d:?}")?;
        }
        Ok(())
    }
}

/// Ranks `corpus` by power iteration with the default threshold, rounding
/// and sweep cap.
pub fn iterate_rank<P: Page>(corpus: &Corpus<P>, damping: f64) -> crate::Result<Distribution<P>> {
    let config = Config {
        damping,
        ..Config::default()
    };
    let ranker = IteratedPageRank::new(corpus, &config)?;
    Ok(ranker.calc()?.into_page_rank())
}
