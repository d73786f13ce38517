// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pagination trigger: turn qualifying visibility entries into page requests.
//!
//! The host owns the page cursor. The trigger never reads it; it hands the
//! host an updater ([`next_page`]) to apply to whatever the current value is,
//! so requests queued before a re-render are never lost to a stale copy.

use understory_intersection::IntersectionEntry;

/// Updater applied by the host to its current page value.
pub type PageUpdate = fn(usize) -> usize;

/// Advances a page value by one.
#[must_use]
pub fn next_page(page: usize) -> usize {
    page.saturating_add(1)
}

/// How repeated triggers on the same edge element are suppressed.
///
/// There is no time-based throttling under either policy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TriggerPolicy {
    /// Keep observing after a trigger.
    ///
    /// Every qualifying entry requests a page. Suppression relies on the host
    /// flipping `has_more` to `false` or mounting a new edge element once the
    /// page arrives.
    #[default]
    Persistent,
    /// Release the edge element before requesting a page.
    ///
    /// The element stays released until the edge identity changes, so a burst
    /// of entries within one layout pass produces a single request.
    OneShot,
}

impl TriggerPolicy {
    /// Returns `true` if a trigger releases the edge element.
    #[must_use]
    pub fn releases_on_fire(self) -> bool {
        matches!(self, Self::OneShot)
    }
}

/// Returns `true` if `entry` should request a page.
///
/// Only a transition to visible qualifies, and only for the element currently
/// registered; entries for released elements are stale.
#[must_use]
pub fn qualifies<E: PartialEq>(entry: &IntersectionEntry<E>, observed: Option<&E>) -> bool {
    entry.is_intersecting && observed.is_some_and(|target| *target == entry.target)
}
