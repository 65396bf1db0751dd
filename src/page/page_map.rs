use crate::page::Page;
use crate::url::normalize_url;
use std::collections::hash_map::{self, HashMap};
use url::Url;

/// The result of a crawl: canonical URL to page record
#[derive(Debug, Clone, Default)]
pub struct PageMap {
    pages: HashMap<Url, Page>,
}

impl PageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record under its own URL, returning any record it replaced
    pub fn insert(&mut self, page: Page) -> Option<Page> {
        self.pages.insert(page.url.clone(), page)
    }

    pub fn get(&self, url: &Url) -> Option<&Page> {
        self.pages.get(url)
    }

    /// Looks a page up by URL string, canonicalizing it first
    ///
    /// Returns `None` for unparsable input as well as unknown URLs.
    pub fn get_str(&self, url: &str) -> Option<&Page> {
        normalize_url(url).ok().and_then(|url| self.pages.get(&url))
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.pages.contains_key(url)
    }

    /// String form of [`PageMap::contains`], canonicalizing first
    pub fn contains_str(&self, url: &str) -> bool {
        self.get_str(url).is_some()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn urls(&self) -> impl Iterator<Item = &Url> {
        self.pages.keys()
    }

    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, Url, Page> {
        self.pages.iter()
    }

    pub fn into_inner(self) -> HashMap<Url, Page> {
        self.pages
    }
}

impl From<HashMap<Url, Page>> for PageMap {
    fn from(pages: HashMap<Url, Page>) -> Self {
        Self { pages }
    }
}

impl IntoIterator for PageMap {
    type Item = (Url, Page);
    type IntoIter = hash_map::IntoIter<Url, Page>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.into_iter()
    }
}

impl<'a> IntoIterator for &'a PageMap {
    type Item = (&'a Url, &'a Page);
    type IntoIter = hash_map::Iter<'a, Url, Page>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}
