use crate::{Error, Result};
use algograph::graph::*;
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fmt::Debug,
    hash::Hash,
};

/// Anything usable as a page identifier.
pub trait Page: Clone + Eq + Hash + Ord + Debug {}

impl<T: Clone + Eq + Hash + Ord + Debug> Page for T {}

/// An immutable link graph: every page together with the pages it links to.
///
/// Every link target is itself a page of the corpus. Duplicated links collapse
/// into one and self-links are dropped on construction, so a page with an
/// empty link set is exactly a dangling page.
pub struct Corpus<P> {
    graph: directed::TreeBackedGraph,
    vertices: BTreeMap<P, VertexId>,
    pages: HashMap<VertexId, P, ahash::RandomState>,
}

impl<P: Page> Corpus<P> {
    /// Builds a corpus from `(page, out-links)` pairs.
    ///
    /// A page listed more than once gets the union of its link sets. Linking
    /// to a page that is not itself listed is an [`Error::InvalidInput`].
    pub fn new<I, L>(links: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, L)>,
        L: IntoIterator<Item = P>,
    {
        let mut merged: BTreeMap<P, BTreeSet<P>> = BTreeMap::new();
        for (page, outs) in links {
            let sinks = merged.entry(page.clone()).or_default();
            sinks.extend(outs.into_iter().filter(|v| *v != page));
        }
        for (page, sinks) in merged.iter() {
            if let Some(unknown) = sinks.iter().find(|v| !merged.contains_key(*v)) {
                return Err(Error::InvalidInput(format!(
                    "{page:?} links to {unknown:?}, which is not in the corpus"
                )));
            }
        }
        Ok(Self::build(&merged))
    }

    fn build(links: &BTreeMap<P, BTreeSet<P>>) -> Self {
        let mut graph = directed::TreeBackedGraph::new();
        let mut vertices = BTreeMap::new();
        let mut pages = HashMap::with_hasher(ahash::RandomState::new());
        for page in links.keys() {
            let v = graph.add_vertex();
            vertices.insert(page.clone(), v);
            pages.insert(v, page.clone());
        }
        for (page, sinks) in links.iter() {
            let u = vertices[page];
            for sink in sinks.iter() {
                graph.add_edge(u, vertices[sink]);
            }
        }
        Self {
            graph,
            vertices,
            pages,
        }
    }

    /// A copy of this corpus where every dangling page links to every page,
    /// itself included. No probability mass leaks out of such a graph.
    pub fn normalized(&self) -> Self {
        let all: BTreeSet<P> = self.vertices.keys().cloned().collect();
        let links: BTreeMap<P, BTreeSet<P>> = self
            .vertices
            .iter()
            .map(|(page, u)| {
                let sinks: BTreeSet<P> = self
                    .graph
                    .out_edges(u)
                    .map(|e| self.pages[&e.sink].clone())
                    .collect();
                if sinks.is_empty() {
                    (page.clone(), all.clone())
                } else {
                    (page.clone(), sinks)
                }
            })
            .collect();
        Self::build(&links)
    }

    pub fn contains(&self, page: &P) -> bool {
        self.vertices.contains_key(page)
    }

    /// Pages this page links to, in order. `None` for an unknown page.
    pub fn links(&self, page: &P) -> Option<BTreeSet<&P>> {
        let u = self.vertices.get(page)?;
        Some(
            self.graph
                .out_edges(u)
                .map(|e| &self.pages[&e.sink])
                .collect(),
        )
    }

    pub fn out_degree(&self, page: &P) -> Option<usize> {
        let u = self.vertices.get(page)?;
        Some(self.graph.out_edges(u).count())
    }

    pub fn dangling(&self) -> impl Iterator<Item = &P> + '_ {
        self.vertices
            .iter()
            .filter(|(_, u)| self.graph.out_edges(u).next().is_none())
            .map(|(page, _)| page)
    }

    pub(crate) fn vertex(&self, page: &P) -> Option<VertexId> {
        self.vertices.get(page).copied()
    }
}

impl<P> Corpus<P> {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// All pages in ascending order.
    pub fn pages(&self) -> impl Iterator<Item = &P> + '_ {
        self.vertices.keys()
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_size()
    }

    pub(crate) fn graph(&self) -> &directed::TreeBackedGraph {
        &self.graph
    }

    /// Vertices in the same order as [`Corpus::pages`].
    pub(crate) fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.values().copied()
    }

    pub(crate) fn page(&self, v: &VertexId) -> &P {
        &self.pages[v]
    }
}

impl<P: Page> Debug for Corpus<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for page in self.pages() {
            map.entry(page, &self.links(page).unwrap_or_default());
        }
        map.finish()
    }
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct RandomCorpus {
    pub links: BTreeMap<u8, BTreeSet<u8>>,
}

#[cfg(test)]
impl RandomCorpus {
    pub fn corpus(&self) -> Corpus<u8> {
        Corpus::new(self.links.clone()).unwrap()
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for RandomCorpus {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        use quickcheck::Arbitrary;
        const N: usize = 10;

        let n = usize::arbitrary(g) % N + 1;
        let mut links: BTreeMap<u8, BTreeSet<u8>> =
            (0..n as u8).map(|p| (p, BTreeSet::new())).collect();
        for _ in 0..(n * 2) {
            let u = (usize::arbitrary(g) % n) as u8;
            let v = (usize::arbitrary(g) % n) as u8;
            links.get_mut(&u).unwrap().insert(v);
        }
        Self { links }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn abc() -> Corpus<&'static str> {
        Corpus::new([("a", vec!["b", "c"]), ("b", vec!["c"]), ("c", vec![])]).unwrap()
    }

    #[test]
    fn basic_queries() {
        let corpus = abc();
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.link_count(), 3);
        assert_eq!(corpus.pages().copied().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert!(corpus.contains(&"a"));
        assert!(!corpus.contains(&"z"));
        assert_eq!(
            corpus.links(&"a").unwrap().into_iter().copied().collect::<Vec<_>>(),
            ["b", "c"]
        );
        assert_eq!(corpus.out_degree(&"c"), Some(0));
        assert_eq!(corpus.out_degree(&"z"), None);
        assert_eq!(corpus.dangling().copied().collect::<Vec<_>>(), ["c"]);
    }

    #[test]
    fn self_links_and_duplicates_collapse() {
        let corpus = Corpus::new([("a", vec!["a", "b", "b"]), ("b", vec![]), ("a", vec!["b"])])
            .unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.out_degree(&"a"), Some(1));
        assert_eq!(corpus.dangling().copied().collect::<Vec<_>>(), ["b"]);
    }

    #[test]
    fn unknown_link_target() {
        let res = Corpus::new([("a", vec!["b"])]);
        assert!(matches!(res, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn empty() {
        let corpus = Corpus::<String>::new(Vec::<(String, Vec<String>)>::new()).unwrap();
        assert!(corpus.is_empty());
        assert_eq!(corpus.normalized().len(), 0);
    }

    #[test]
    fn normalized_leaves_original_alone() {
        let corpus = abc();
        let normalized = corpus.normalized();
        assert_eq!(corpus.out_degree(&"c"), Some(0));
        assert_eq!(normalized.out_degree(&"c"), Some(3));
        assert!(normalized.links(&"c").unwrap().contains(&"c"));
        assert_eq!(normalized.out_degree(&"a"), Some(2));
        assert_eq!(normalized.dangling().count(), 0);
    }

    #[test]
    fn debug_lists_links() {
        let corpus = Corpus::new([(1, vec![2]), (2, vec![])]).unwrap();
        assert_eq!(format!("{corpus:?}"), "{1: {2}, 2: {}}");
    }

    #[quickcheck]
    fn normalized_has_no_dangling_page(g: RandomCorpus) {
        let corpus = g.corpus();
        let normalized = corpus.normalized();
        assert_eq!(normalized.len(), corpus.len());
        assert_eq!(normalized.dangling().count(), 0);
        for page in corpus.pages() {
            if corpus.out_degree(page) != Some(0) {
                assert_eq!(corpus.links(page), normalized.links(page));
            }
        }
    }
}
