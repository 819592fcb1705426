//! A single fetched window of elements

use super::types::{find_order_violation, Element, Fetch, PagingDirection};
use crate::error::{Error, Result};
use crate::identity::CompositeIdentity;
use serde::{Deserialize, Serialize};
use std::fmt;

type Id<F> = <<F as Fetch>::Element as Element>::Id;

/// One immutable fetched window plus its continuation fetchers
///
/// Elements are strictly descending by ID. `previous` fetches the adjacent
/// newer window, `next` the adjacent older one. A missing fetcher means no
/// continuation is known in that direction, not that the feed is exhausted.
#[derive(Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "F: Serialize, F::Element: Serialize",
    deserialize = "F: Deserialize<'de>, F::Element: Deserialize<'de>"
))]
pub struct Page<F: Fetch> {
    id: CompositeIdentity,
    previous: Option<F>,
    next: Option<F>,
    elements: Vec<F::Element>,
}

impl<F: Fetch> Page<F> {
    /// Create a page, rejecting elements that are not strictly descending
    pub fn new(previous: Option<F>, next: Option<F>, elements: Vec<F::Element>) -> Result<Self> {
        if let Some(index) = find_order_violation(elements.iter().map(Element::id)) {
            return Err(Error::malformed_page(format!(
                "element {index} (id {:?}) does not sort below id {:?}",
                elements[index].id(),
                elements[index - 1].id()
            )));
        }
        Ok(Self::from_validated(previous, next, elements))
    }

    /// Create a page with no elements
    pub fn empty(previous: Option<F>, next: Option<F>) -> Self {
        Self::from_validated(previous, next, Vec::new())
    }

    pub(crate) fn from_validated(
        previous: Option<F>,
        next: Option<F>,
        elements: Vec<F::Element>,
    ) -> Self {
        Self {
            id: CompositeIdentity::new(elements.iter().map(Element::id)),
            previous,
            next,
            elements,
        }
    }

    /// Identity over the element IDs
    pub fn id(&self) -> CompositeIdentity {
        self.id
    }

    /// Fetcher for the adjacent newer window
    pub fn previous(&self) -> Option<&F> {
        self.previous.as_ref()
    }

    /// Fetcher for the adjacent older window
    pub fn next(&self) -> Option<&F> {
        self.next.as_ref()
    }

    /// Fetcher for the given direction
    pub fn fetcher(&self, direction: PagingDirection) -> Option<&F> {
        match direction {
            PagingDirection::Previous => self.previous(),
            PagingDirection::Next => self.next(),
        }
    }

    /// Mutable access to both continuation fetchers, e.g. to reattach
    /// transport state after deserializing
    pub fn fetchers_mut(&mut self) -> impl Iterator<Item = &mut F> + '_ {
        self.previous.iter_mut().chain(self.next.iter_mut())
    }

    /// Elements in descending ID order
    pub fn elements(&self) -> &[F::Element] {
        &self.elements
    }

    /// Consume the page, keeping only its elements
    pub fn into_elements(self) -> Vec<F::Element> {
        self.elements
    }

    /// Element IDs in page order
    pub fn ids(&self) -> impl Iterator<Item = &Id<F>> + '_ {
        self.elements.iter().map(Element::id)
    }

    /// Highest (newest) ID on the page
    pub fn first_id(&self) -> Option<&Id<F>> {
        self.elements.first().map(Element::id)
    }

    /// Lowest (oldest) ID on the page
    pub fn last_id(&self) -> Option<&Id<F>> {
        self.elements.last().map(Element::id)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the page has no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Swap in field-updated elements
    ///
    /// The new elements must carry exactly the same ID sequence; only field
    /// values may change. On mismatch the page is left untouched.
    pub fn replace_elements(&mut self, elements: Vec<F::Element>) -> Result<()> {
        if !self.ids().eq(elements.iter().map(Element::id)) {
            return Err(Error::invariant(format!(
                "replacement for page {} changes its ID sequence",
                self.id.fun_name()
            )));
        }
        self.elements = elements;
        Ok(())
    }

    /// Replace the element with the same ID, returning whether one was found
    pub fn replace_element(&mut self, element: F::Element) -> bool {
        match self
            .elements
            .binary_search_by(|probe| element.id().cmp(probe.id()))
        {
            Ok(index) => {
                self.elements[index] = element;
                true
            }
            Err(_) => false,
        }
    }

    /// Position of an ID on this page
    pub fn position(&self, id: &Id<F>) -> Option<usize> {
        self.elements
            .binary_search_by(|probe| id.cmp(probe.id()))
            .ok()
    }

    /// Re-check the page invariants, e.g. after deserializing
    pub fn validate(&self) -> Result<()> {
        if let Some(index) = find_order_violation(self.ids()) {
            return Err(Error::malformed_page(format!(
                "page {} is out of order at element {index}",
                self.id.fun_name()
            )));
        }
        if CompositeIdentity::new(self.ids()) != self.id {
            return Err(Error::malformed_page(format!(
                "page {} identity does not match its elements",
                self.id.fun_name()
            )));
        }
        Ok(())
    }
}

impl<F> PartialEq for Page<F>
where
    F: Fetch + PartialEq,
    F::Element: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.previous == other.previous
            && self.next == other.next
            && self.elements == other.elements
    }
}

impl<F: Fetch + fmt::Debug> fmt::Debug for Page<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("id", &self.id.fun_name())
            .field("previous", &self.previous)
            .field("next", &self.next)
            .field("elements", &self.elements.len())
            .finish()
    }
}
