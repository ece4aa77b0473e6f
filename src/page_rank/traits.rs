use crate::{Corpus, Distribution};

pub trait PageRank<P> {
    type Result: PageRankResult<P>;

    fn calc(&self) -> crate::Result<Self::Result>;
}

pub trait PageRankResult<P> {
    fn page_rank(&self) -> &Distribution<P>;
    fn into_page_rank(self) -> Distribution<P>
    where
        Self: Sized;
    fn debug<'a>(&'a self, corpus: &'a Corpus<P>) -> impl std::fmt::Debug + 'a;
}
