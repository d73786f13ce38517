// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Watcher and factory traits.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::entry::IntersectionEntry;
use crate::error::WatchError;
use crate::options::WatchOptions;

/// A configured visibility watcher.
///
/// A watcher holds registrations, not ownership: hosts keep their element
/// handles and hand clones to [`observe`](Self::observe).
///
/// ## Delivery
///
/// Crossings are queued inside the watcher as they are detected and handed out
/// in detection order by [`take_records`](Self::take_records). The host's event
/// loop drains the queue and forwards the batch to whoever owns the watcher,
/// so delivery is never re-entrant and never concurrent with itself.
///
/// ## Release
///
/// [`unobserve`](Self::unobserve) and [`disconnect`](Self::disconnect) take
/// effect immediately: queued records for released targets are discarded and
/// no further records are produced for them.
pub trait IntersectionWatcher {
    /// Handle type identifying observed targets.
    type Element: Clone + PartialEq + Debug;

    /// Starts observing `target`. Observing a target twice is a no-op.
    fn observe(&mut self, target: Self::Element);

    /// Stops observing `target`, if it is observed.
    fn unobserve(&mut self, target: &Self::Element);

    /// Stops observing every target.
    fn disconnect(&mut self);

    /// Returns `true` if `target` is currently observed.
    fn is_observing(&self, target: &Self::Element) -> bool;

    /// Drains queued crossings in the order they were detected.
    fn take_records(&mut self) -> Vec<IntersectionEntry<Self::Element>>;
}

/// Creates watchers, one per configuration.
pub trait WatcherFactory {
    /// Root container handle type.
    type Root: Clone + PartialEq + Debug;
    /// Watcher type produced by this factory.
    type Watcher: IntersectionWatcher;

    /// Creates a watcher for `options`.
    ///
    /// Returns [`WatchError`] when the environment cannot provide one.
    fn create(&mut self, options: &WatchOptions<Self::Root>) -> Result<Self::Watcher, WatchError>;
}
