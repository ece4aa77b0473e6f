mod common;
pub use self::common::*;
pub mod corpus;
pub use self::corpus::{Corpus, Page};
pub mod crawl;
pub use self::crawl::crawl;
pub mod error;
pub use self::error::{Error, Result};

pub mod page_rank;
