// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge sentinel binding: pick the edge child and lay out the render sequence.
//!
//! The edge child is the last child normally and the first child in reverse
//! mode. [`Layout`] walks the host's children in order without moving them and
//! marks exactly one of them as the edge, so the host can wrap it in a
//! locatable container and report the mounted element back.

use core::iter::FusedIterator;

use crate::indicator::{IndicatorContent, LoadingIndicator};

/// Index of the edge child in a sequence of `len` children.
///
/// Returns `None` for an empty sequence. With a single child, the first and
/// last child coincide.
#[must_use]
pub fn edge_index(len: usize, reverse: bool) -> Option<usize> {
    match len {
        0 => None,
        _ if reverse => Some(0),
        _ => Some(len - 1),
    }
}

/// One entry of the render sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Slot<'a, C> {
    /// The loading indicator, emitted ahead of the children when shown.
    ///
    /// Its content comes from [`Layout::loading_content`].
    Loading,
    /// A child rendered as-is.
    Child {
        /// Position in the host's child sequence.
        index: usize,
        /// The host's child.
        child: &'a C,
    },
    /// The edge child; the host wraps it and reports the mounted element.
    Edge {
        /// Position in the host's child sequence.
        index: usize,
        /// The host's child.
        child: &'a C,
    },
}

impl<'a, C> Slot<'a, C> {
    /// Returns the child, if this slot holds one.
    #[must_use]
    pub fn child(&self) -> Option<&'a C> {
        match *self {
            Self::Loading => None,
            Self::Child { child, .. } | Self::Edge { child, .. } => Some(child),
        }
    }

    /// Returns `true` for the edge slot.
    #[must_use]
    pub fn is_edge(&self) -> bool {
        matches!(self, Self::Edge { .. })
    }
}

/// Render sequence for one pass over the host's children.
#[derive(Debug)]
pub struct Layout<'a, C> {
    children: &'a [C],
    edge: Option<usize>,
    loading: bool,
}

impl<C> Clone for Layout<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Layout<'_, C> {}

impl<'a, C> Layout<'a, C> {
    /// Lays out `children`, marking the edge child for `reverse`.
    #[must_use]
    pub fn new(children: &'a [C], reverse: bool, loading: bool) -> Self {
        Self {
            children,
            edge: edge_index(children.len(), reverse),
            loading,
        }
    }

    /// Index of the edge child, if any.
    #[must_use]
    pub fn edge_index(&self) -> Option<usize> {
        self.edge
    }

    /// The edge child, if any.
    #[must_use]
    pub fn edge_child(&self) -> Option<&'a C> {
        self.edge.map(|index| &self.children[index])
    }

    /// Returns `true` if the loading indicator slot is emitted.
    #[must_use]
    pub fn shows_loading(&self) -> bool {
        self.loading
    }

    /// Content to render in the [`Slot::Loading`] position, or `None` when
    /// this layout emits no loading slot.
    #[must_use]
    pub fn loading_content<'i, I>(
        &self,
        indicator: &'i LoadingIndicator<I>,
    ) -> Option<IndicatorContent<'i, I>> {
        self.loading.then(|| indicator.content())
    }

    /// Number of children (the loading slot is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterates the render sequence.
    #[must_use]
    pub fn iter(&self) -> LayoutIter<'a, C> {
        LayoutIter {
            children: self.children,
            edge: self.edge,
            loading: self.loading,
            next: 0,
        }
    }
}

impl<'a, C> IntoIterator for Layout<'a, C> {
    type Item = Slot<'a, C>;
    type IntoIter = LayoutIter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, C> IntoIterator for &Layout<'a, C> {
    type Item = Slot<'a, C>;
    type IntoIter = LayoutIter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`Layout`].
#[derive(Debug)]
pub struct LayoutIter<'a, C> {
    children: &'a [C],
    edge: Option<usize>,
    loading: bool,
    next: usize,
}

impl<'a, C> Iterator for LayoutIter<'a, C> {
    type Item = Slot<'a, C>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.loading {
            self.loading = false;
            return Some(Slot::Loading);
        }
        let index = self.next;
        let child = self.children.get(index)?;
        self.next += 1;
        Some(if self.edge == Some(index) {
            Slot::Edge { index, child }
        } else {
            Slot::Child { index, child }
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.children.len() - self.next + usize::from(self.loading);
        (n, Some(n))
    }
}

impl<C> ExactSizeIterator for LayoutIter<'_, C> {}

impl<C> FusedIterator for LayoutIter<'_, C> {}

/// Tracks the identity of the mounted edge element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeBinder<E> {
    current: Option<E>,
    changes: u64,
}

impl<E> Default for EdgeBinder<E> {
    fn default() -> Self {
        Self {
            current: None,
            changes: 0,
        }
    }
}

impl<E: PartialEq> EdgeBinder<E> {
    /// Creates a binder with no edge element.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the mounted edge element, `None` when unmounted.
    ///
    /// Returns `true` if the identity changed.
    pub fn bind(&mut self, element: Option<E>) -> bool {
        if self.current == element {
            return false;
        }
        self.current = element;
        self.changes += 1;
        true
    }

    /// The current edge element.
    #[must_use]
    pub fn current(&self) -> Option<&E> {
        self.current.as_ref()
    }

    /// Number of identity changes so far.
    #[must_use]
    pub fn changes(&self) -> u64 {
        self.changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn edge_index_picks_last_or_first() {
        assert_eq!(edge_index(0, false), None);
        assert_eq!(edge_index(0, true), None);
        assert_eq!(edge_index(1, false), Some(0));
        assert_eq!(edge_index(1, true), Some(0));
        assert_eq!(edge_index(5, false), Some(4));
        assert_eq!(edge_index(5, true), Some(0));
    }

    #[test]
    fn exactly_one_edge_for_any_non_empty_sequence() {
        for len in 1..8 {
            let children: Vec<usize> = (0..len).collect();
            for reverse in [false, true] {
                let layout = Layout::new(&children, reverse, false);
                let edges: Vec<usize> = layout
                    .iter()
                    .filter(Slot::is_edge)
                    .filter_map(|slot| slot.child().copied())
                    .collect();
                let expected = if reverse { 0 } else { len - 1 };
                assert_eq!(edges, [expected]);
            }
        }
    }

    #[test]
    fn layout_preserves_order_and_prepends_loading() {
        let children = ["a", "b", "c"];
        let layout = Layout::new(&children, false, true);
        let slots: Vec<Slot<'_, &str>> = layout.iter().collect();
        assert_eq!(
            slots,
            [
                Slot::Loading,
                Slot::Child {
                    index: 0,
                    child: &"a"
                },
                Slot::Child {
                    index: 1,
                    child: &"b"
                },
                Slot::Edge {
                    index: 2,
                    child: &"c"
                },
            ]
        );
        assert_eq!(layout.iter().len(), 4);
        assert_eq!(layout.len(), 3);
    }

    #[test]
    fn loading_content_follows_the_loading_flag() {
        let children = [1_u8, 2];
        let indicator = LoadingIndicator::custom("Fetching ...");

        let shown = Layout::new(&children, false, true);
        assert_eq!(
            shown.loading_content(&indicator),
            Some(IndicatorContent::Custom(&"Fetching ..."))
        );
        assert_eq!(
            shown.loading_content(&LoadingIndicator::<&str>::new()),
            Some(IndicatorContent::Text(crate::DEFAULT_LOADING_TEXT))
        );

        let hidden = Layout::new(&children, false, false);
        assert_eq!(hidden.loading_content(&indicator), None);
    }

    #[test]
    fn empty_layout_has_no_edge() {
        let children: [u8; 0] = [];
        let layout = Layout::new(&children, false, false);
        assert!(layout.is_empty());
        assert_eq!(layout.edge_child(), None);
        assert_eq!(layout.iter().count(), 0);
    }

    #[test]
    fn binder_reports_identity_changes_only() {
        let mut binder = EdgeBinder::new();
        assert!(!binder.bind(None));
        assert!(binder.bind(Some(3)));
        assert!(!binder.bind(Some(3)));
        assert!(binder.bind(Some(4)));
        assert!(binder.bind(None));
        assert_eq!(binder.current(), None);
        assert_eq!(binder.changes(), 3);
    }
}
