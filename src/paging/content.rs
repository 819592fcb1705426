//! Accumulated, globally ordered paged content
//!
//! `PagedContent` merges freshly fetched pages into one deduplicated
//! collection. The concatenated IDs of all pages stay strictly descending:
//! every mutation builds the candidate page list first, validates it, and only
//! then swaps it in.

use super::page::Page;
use super::types::{find_order_violation, Element, Fetch, PagingDirection};
use crate::error::{Error, Result};
use crate::identity::CompositeIdentity;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

type Id<F> = <<F as Fetch>::Element as Element>::Id;

/// The accumulated pages of one feed
#[derive(Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "F: Serialize, F::Element: Serialize",
    deserialize = "F: Deserialize<'de>, F::Element: Deserialize<'de>"
))]
pub struct PagedContent<F: Fetch> {
    #[serde(default)]
    pages: Vec<Page<F>>,
}

impl<F: Fetch> Default for PagedContent<F> {
    fn default() -> Self {
        Self { pages: Vec::new() }
    }
}

impl<F: Fetch> PagedContent<F> {
    /// Create empty content
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages in order, newest first
    pub fn pages(&self) -> &[Page<F>] {
        &self.pages
    }

    /// Identities of the pages, in order
    pub fn id(&self) -> Vec<CompositeIdentity> {
        self.pages.iter().map(Page::id).collect()
    }

    /// All elements, flattened in page order
    pub fn all_elements(&self) -> Vec<F::Element> {
        self.iter_elements().cloned().collect()
    }

    /// Borrowing iterator over all elements in order
    pub fn iter_elements(&self) -> impl Iterator<Item = &F::Element> + '_ {
        self.pages.iter().flat_map(|page| page.elements().iter())
    }

    /// All element IDs in order
    pub fn ids(&self) -> impl Iterator<Item = &Id<F>> + '_ {
        self.iter_elements().map(Element::id)
    }

    /// Set of accumulated element IDs
    pub fn element_ids(&self) -> HashSet<Id<F>> {
        self.ids().cloned().collect()
    }

    /// Whether an element with this ID has been accumulated
    pub fn contains(&self, id: &Id<F>) -> bool {
        self.get(id).is_some()
    }

    /// Look up an element by ID
    pub fn get(&self, id: &Id<F>) -> Option<&F::Element> {
        self.pages
            .iter()
            .filter(|page| covers(page, id))
            .find_map(|page| page.position(id).map(|index| &page.elements()[index]))
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    /// Whether there are no elements
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(Page::is_empty)
    }

    /// Number of pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Newest page
    pub fn first_page(&self) -> Option<&Page<F>> {
        self.pages.first()
    }

    /// Oldest page
    pub fn last_page(&self) -> Option<&Page<F>> {
        self.pages.last()
    }

    /// Fetcher for data newer than everything accumulated
    pub fn previous_fetcher(&self) -> Option<&F> {
        self.first_page().and_then(Page::previous)
    }

    /// Fetcher for data older than everything accumulated
    pub fn next_fetcher(&self) -> Option<&F> {
        self.last_page().and_then(Page::next)
    }

    /// Boundary fetcher for a direction
    pub fn fetcher(&self, direction: PagingDirection) -> Option<&F> {
        match direction {
            PagingDirection::Previous => self.previous_fetcher(),
            PagingDirection::Next => self.next_fetcher(),
        }
    }

    /// Mutable access to every stored fetcher
    pub fn fetchers_mut(&mut self) -> impl Iterator<Item = &mut F> + '_ {
        self.pages.iter_mut().flat_map(|page| page.fetchers_mut())
    }

    /// Drop elements whose IDs are already accumulated
    ///
    /// Fetchers are carried over unchanged. Idempotent for a given content.
    pub fn reduce_page_to_fit(&self, page: &Page<F>) -> Page<F> {
        let known = self.element_ids();
        let elements = page
            .elements()
            .iter()
            .filter(|element| !known.contains(element.id()))
            .cloned()
            .collect();
        // A filtered subsequence of a descending page is still descending
        Page::from_validated(page.previous().cloned(), page.next().cloned(), elements)
    }

    /// Merge a page, inferring its placement from its ID range
    ///
    /// Newer pages are prepended and older pages appended. A page whose new
    /// elements would interleave with accumulated ones is rejected. Returns
    /// the number of elements added.
    pub fn merge(&mut self, page: Page<F>) -> Result<usize> {
        let reduced = self.reduce_page_to_fit(&page);
        let direction = match (reduced.last_id(), reduced.first_id()) {
            (None, _) | (_, None) => return Ok(self.skip_empty(&page)),
            (Some(lowest), Some(highest)) => {
                match (self.ids().next(), self.ids().last()) {
                    (Some(newest), _) if lowest > newest => PagingDirection::Previous,
                    (_, Some(oldest)) if highest < oldest => PagingDirection::Next,
                    (None, None) => PagingDirection::Next,
                    _ => {
                        return Err(Error::invariant(format!(
                            "page {} interleaves with accumulated content",
                            page.id().fun_name()
                        )))
                    }
                }
            }
        };
        self.insert(reduced, direction)
    }

    /// Merge a page arriving from a known direction
    ///
    /// `Previous` prepends, `Next` appends. Returns the number of elements
    /// added; the content is unchanged on error.
    pub fn merge_in(&mut self, page: Page<F>, direction: PagingDirection) -> Result<usize> {
        let reduced = self.reduce_page_to_fit(&page);
        if reduced.is_empty() {
            return Ok(self.skip_empty(&page));
        }
        self.insert(reduced, direction)
    }

    fn skip_empty(&self, page: &Page<F>) -> usize {
        debug!(
            page = %page.id().fun_name(),
            fetched = page.len(),
            "Page adds no new elements"
        );
        0
    }

    fn insert(&mut self, page: Page<F>, direction: PagingDirection) -> Result<usize> {
        let added = page.len();
        let page_name = page.id().fun_name();

        let mut candidate = Vec::with_capacity(self.pages.len() + 1);
        match direction {
            PagingDirection::Previous => {
                candidate.push(page);
                candidate.extend(self.pages.iter().cloned());
            }
            PagingDirection::Next => {
                candidate.extend(self.pages.iter().cloned());
                candidate.push(page);
            }
        }

        if let Err(e) = check_pages(&candidate) {
            warn!(page = %page_name, ?direction, "Rejected page merge: {e}");
            return Err(e);
        }

        self.pages = candidate;
        debug!(
            page = %page_name,
            ?direction,
            added,
            total = self.len(),
            "Merged page"
        );
        Ok(added)
    }

    /// Update one element's fields in place, returning whether it was found
    pub fn replace_element(&mut self, element: F::Element) -> bool {
        let id = element.id().clone();
        match self.pages.iter_mut().find(|page| covers(page, &id)) {
            Some(page) => page.replace_element(element),
            None => false,
        }
    }

    /// Re-check every page and the global ordering, e.g. after restoring
    pub fn validate(&self) -> Result<()> {
        for page in &self.pages {
            page.validate()?;
        }
        check_pages(&self.pages)
    }

    /// Drop all pages
    pub fn clear(&mut self) {
        self.pages.clear();
    }
}

/// Whether `id` falls within the ID range of `page`
fn covers<F: Fetch>(page: &Page<F>, id: &Id<F>) -> bool {
    match (page.first_id(), page.last_id()) {
        (Some(first), Some(last)) => id <= first && id >= last,
        _ => false,
    }
}

fn check_pages<F: Fetch>(pages: &[Page<F>]) -> Result<()> {
    let ids = pages.iter().flat_map(|page| page.ids());
    match find_order_violation(ids) {
        Some(index) => Err(Error::invariant(format!(
            "merged content is not strictly descending at element {index}"
        ))),
        None => Ok(()),
    }
}

impl<F> PartialEq for PagedContent<F>
where
    F: Fetch + PartialEq,
    F::Element: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.pages == other.pages
    }
}

impl<F: Fetch + fmt::Debug> fmt::Debug for PagedContent<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedContent")
            .field("pages", &self.pages)
            .field("elements", &self.len())
            .finish()
    }
}
