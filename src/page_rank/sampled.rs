use super::*;
use crate::{common::*, Corpus, Distribution, Error, Page};
use algograph::graph::VertexId;
use rand::prelude::*;
use std::{cell::RefCell, collections::HashMap};
use tracing::debug;

/// Estimates ranks by walking a random surfer over the corpus and counting
/// how often each page is visited.
pub struct SampledPageRank<'a, P, R> {
    model: TransitionModel<'a, P>,
    samples: usize,
    rng: RefCell<R>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub damping: f64,
    pub samples: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            samples: 10_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Result<P> {
    pub page_rank: Distribution<P>,
    pub visits: HashMap<P, usize, ahash::RandomState>,
    pub samples: usize,
}

impl<'a, P: Page, R: Rng> SampledPageRank<'a, P, R> {
    pub fn new(corpus: &'a Corpus<P>, config: &Config, rng: R) -> crate::Result<Self> {
        let model = TransitionModel::new(corpus, config.damping)?;
        if config.samples == 0 {
            return Err(Error::InvalidInput(
                "number of samples must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            model,
            samples: config.samples,
            rng: RefCell::new(rng),
        })
    }
}

impl<P: Page, R: Rng> PageRank<P> for SampledPageRank<'_, P, R> {
    type Result = self::Result<P>;

    fn calc(&self) -> crate::Result<Self::Result> {
        let corpus = self.model.corpus();
        let vertices: Vec<VertexId> = corpus.vertices().collect();
        let mut rng = self.rng.borrow_mut();

        let mut visits: HashMap<VertexId, usize, ahash::RandomState> =
            vertices.iter().map(|v| (*v, 0)).collect();
        let mut cur = *vertices
            .choose(&mut *rng)
            .ok_or_else(|| Error::InvalidInput("corpus is empty".to_string()))?;
        *visits.entry(cur).or_default() += 1;
        for _ in 1..self.samples {
            let weights = self.model.weights(cur);
            let (next, _) = weights
                .choose_weighted(&mut *rng, |(_, w)| *w)
                .map_err(|e| Error::InvalidInput(format!("bad transition weights: {e}")))?;
            cur = *next;
            *visits.entry(cur).or_default() += 1;
        }

        let n = self.samples as f64;
        let page_rank: Distribution<P> = visits
            .iter()
            .map(|(v, c)| (corpus.page(v).clone(), *c as f64 / n))
            .collect();
        let unvisited = visits.values().filter(|c| **c == 0).count();
        debug!(
            samples = self.samples,
            pages = corpus.len(),
            unvisited,
            "random walk finished"
        );
        Ok(Self::Result {
            page_rank,
            visits: visits
                .into_iter()
                .map(|(v, c)| (corpus.page(&v).clone(), c))
                .collect(),
            samples: self.samples,
        })
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
            let c = self.result.visits.get(page).copied().unwrap_or_default();
            writeln!(f, "{page:?}: {p:?}, {c}/{}", self.result.samples)?;
        }
        Ok(())
    }
}

/// Ranks `corpus` by a random walk of `n` steps drawn from `rng`.
pub fn sample_rank<P: Page, R: Rng>(
    corpus: &Corpus<P>,
    damping: f64,
    n: usize,
    rng: R,
) -> crate::Result<Distribution<P>> {
    let config = Config { damping, samples: n };
    let ranker = SampledPageRank::new(corpus, &config, rng)?;
    Ok(ranker.calc()?.into_page_rank())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;

    fn four_pages() -> Corpus<&'static str> {
        Corpus::new([
            ("1.html", vec!["2.html"]),
            ("2.html", vec!["1.html", "3.html"]),
            ("3.html", vec!["2.html", "4.html"]),
            ("4.html", vec!["2.html"]),
        ])
        .unwrap()
    }

    #[test]
    fn sums_to_one() {
        let corpus = four_pages();
        let rng = SmallRng::seed_from_u64(3407);
        let ranks = sample_rank(&corpus, 0.85, 10_000, rng).unwrap();
        assert_eq!(ranks.len(), 4);
        let sum: f64 = ranks.values().sum();
        assert!((sum - 1.0).abs() < 1e-9, "sum={sum}");
    }

    #[test]
    fn close_to_iterated() {
        let corpus = four_pages();
        let mut rng = SmallRng::seed_from_u64(3407);
        let sampled = sample_rank(&corpus, 0.85, 100_000, &mut rng).unwrap();
        let iterated = iterate_rank(&corpus, 0.85).unwrap();
        for page in corpus.pages() {
            let s = sampled[page];
            let i = iterated[page];
            assert!((s - i).abs() < 0.05, "{page}: sampled={s}, iterated={i}");
        }
    }

    #[test]
    fn reproducible_with_same_seed() {
        let corpus = four_pages();
        let a = sample_rank(&corpus, 0.85, 1_000, SmallRng::seed_from_u64(7)).unwrap();
        let b = sample_rank(&corpus, 0.85, 1_000, SmallRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unvisited_pages_reported_as_zero() {
        let corpus = four_pages();
        let cfg = Config {
            damping: 0.85,
            samples: 1,
        };
        let ranker = SampledPageRank::new(&corpus, &cfg, SmallRng::seed_from_u64(1)).unwrap();
        let res = ranker.calc().unwrap();
        assert_eq!(res.page_rank.len(), 4);
        assert_eq!(res.visits.len(), 4);
        assert_eq!(res.page_rank.values().filter(|p| **p == 1.0).count(), 1);
        assert_eq!(res.page_rank.values().filter(|p| **p == 0.0).count(), 3);
        assert_eq!(res.visits.values().sum::<usize>(), 1);
    }

    #[test]
    fn visits_add_up() {
        let corpus = four_pages();
        let cfg = Config::default();
        let ranker = SampledPageRank::new(&corpus, &cfg, SmallRng::seed_from_u64(11)).unwrap();
        let res = ranker.calc().unwrap();
        assert_eq!(res.samples, cfg.samples);
        assert_eq!(res.visits.values().sum::<usize>(), cfg.samples);
        let dbg = format!("{:?}", res.debug(&corpus));
        assert_eq!(dbg.lines().count(), 4);
        assert!(dbg.starts_with("\"1.html\""), "{dbg}");
    }

    #[test]
    fn dangling_page_still_walks() {
        let corpus = Corpus::new([("a", vec![]), ("b", vec!["a"])]).unwrap();
        let ranks = sample_rank(&corpus, 0.85, 20_000, SmallRng::seed_from_u64(5)).unwrap();
        assert!(ranks[&"a"] > ranks[&"b"], "{ranks:?}");
    }

    #[test]
    fn invalid_input() {
        let corpus = four_pages();
        let rng = SmallRng::seed_from_u64(0);
        assert!(matches!(
            sample_rank(&corpus, 0.85, 0, rng.clone()),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            sample_rank(&corpus, 1.5, 10, rng.clone()),
            Err(Error::InvalidInput(_))
        ));
        let empty = Corpus::<&str>::new(Vec::<(&str, Vec<&str>)>::new()).unwrap();
        assert!(matches!(
            sample_rank(&empty, 0.85, 10, rng),
            Err(Error::InvalidInput(_))
        ));
    }
}
