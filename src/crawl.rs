//! Builds a [`Corpus`] from a directory of HTML pages.

use crate::{Corpus, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::Path,
};
use tracing::{info, warn};
use walkdir::WalkDir;

lazy_static! {
    static ref ANCHOR_HREF: Regex =
        Regex::new(r#"<a\s+(?:[^>]*?)href="([^"]*)""#).expect("Invalid regex");
}

/// Every `href` target of an `<a>` tag in `html`.
pub fn extract_links(html: &str) -> BTreeSet<String> {
    ANCHOR_HREF
        .captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Reads every `*.html` file directly inside `dir`. Pages are named by file
/// name; links to anything that is not one of those pages are dropped, and so
/// are self-links.
pub fn crawl<Q: AsRef<Path>>(dir: Q) -> Result<Corpus<String>> {
    let dir = dir.as_ref();
    let mut pages: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };
        if !name.ends_with(".html") {
            continue;
        }
        let contents = fs::read_to_string(entry.path())?;
        let mut links = extract_links(&contents);
        links.remove(name);
        pages.insert(name.to_string(), links);
    }

    let known: BTreeSet<String> = pages.keys().cloned().collect();
    for links in pages.values_mut() {
        links.retain(|l| known.contains(l));
    }
    let corpus = Corpus::new(pages)?;
    info!(
        dir = %dir.display(),
        pages = corpus.len(),
        links = corpus.link_count(),
        "crawled corpus"
    );
    Ok(corpus)
}
