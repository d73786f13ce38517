// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometric reference watcher over `kurbo` rectangles.
//!
//! [`RectWatcher`] does not observe anything by itself. The host calls
//! [`RectWatcher::measure`] whenever layout or scrolling may have moved the
//! observed targets, passing the resolved root rectangle and a lookup for the
//! current target bounds. The watcher compares each target against its last
//! known state and queues an entry for every crossing.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Rect;
//! use understory_intersection::{IntersectionWatcher, RectWatcher, WatchOptions};
//!
//! let mut watcher = RectWatcher::<u32, ()>::new(WatchOptions::default().with_threshold(0.5));
//! watcher.observe(7);
//!
//! let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);
//! let mut row = Rect::new(0.0, 150.0, 100.0, 170.0);
//!
//! // First measurement always reports the initial state.
//! assert_eq!(watcher.measure(viewport, 0, |_| Some(row)), 1);
//! assert!(!watcher.take_records()[0].is_intersecting);
//!
//! // No crossing, nothing queued.
//! assert_eq!(watcher.measure(viewport, 1, |_| Some(row)), 0);
//!
//! // Scroll the row into view.
//! row = Rect::new(0.0, 60.0, 100.0, 80.0);
//! assert_eq!(watcher.measure(viewport, 2, |_| Some(row)), 1);
//! assert!(watcher.take_records()[0].is_intersecting);
//! ```

use alloc::vec::Vec;
use core::fmt::Debug;
use core::marker::PhantomData;

use kurbo::Rect;
use smallvec::SmallVec;

use crate::entry::IntersectionEntry;
use crate::error::WatchError;
use crate::geometry::evaluate;
use crate::options::{Root, WatchOptions};
use crate::watcher::{IntersectionWatcher, WatcherFactory};

#[derive(Clone, Debug)]
struct Tracked<E> {
    target: E,
    // `None` until the first measurement.
    visible: Option<bool>,
}

/// Watcher driven by host-supplied rectangles.
#[derive(Clone, Debug)]
pub struct RectWatcher<E, R> {
    options: WatchOptions<R>,
    targets: SmallVec<[Tracked<E>; 2]>,
    records: Vec<IntersectionEntry<E>>,
}

impl<E: Clone + PartialEq + Debug, R> RectWatcher<E, R> {
    /// Creates a watcher with no registrations.
    #[must_use]
    pub fn new(options: WatchOptions<R>) -> Self {
        Self {
            options,
            targets: SmallVec::new(),
            records: Vec::new(),
        }
    }

    /// Returns the options this watcher was created with.
    #[must_use]
    pub fn options(&self) -> &WatchOptions<R> {
        &self.options
    }

    /// Returns the root the host should resolve before calling [`measure`](Self::measure).
    #[must_use]
    pub fn root(&self) -> &Root<R> {
        self.options.root()
    }

    /// Number of observed targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` if nothing is observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Re-evaluates every observed target against `root`.
    ///
    /// `root` is the resolved root rectangle before the margin is applied.
    /// `bounds_of` returns the current bounds of a target in the same space,
    /// or `None` if the target is not laid out; such targets keep their
    /// previous state.
    ///
    /// Returns the number of entries queued by this pass.
    pub fn measure(
        &mut self,
        root: Rect,
        time: u64,
        mut bounds_of: impl FnMut(&E) -> Option<Rect>,
    ) -> usize {
        let mut queued = 0;
        for tracked in &mut self.targets {
            let Some(bounds) = bounds_of(&tracked.target) else {
                continue;
            };
            let visibility = evaluate(bounds, root, &self.options);
            if tracked.visible == Some(visibility.is_intersecting) {
                continue;
            }
            tracked.visible = Some(visibility.is_intersecting);
            tracing::trace!(
                element = ?tracked.target,
                ratio = visibility.ratio,
                visible = visibility.is_intersecting,
                "visibility crossing"
            );
            self.records.push(IntersectionEntry::from_visibility(
                tracked.target.clone(),
                bounds,
                &visibility,
                time,
            ));
            queued += 1;
        }
        queued
    }
}

impl<E: Clone + PartialEq + Debug, R> IntersectionWatcher for RectWatcher<E, R> {
    type Element = E;

    fn observe(&mut self, target: E) {
        if self.is_observing(&target) {
            return;
        }
        self.targets.push(Tracked {
            target,
            visible: None,
        });
    }

    fn unobserve(&mut self, target: &E) {
        self.targets.retain(|t| t.target != *target);
        self.records.retain(|r| r.target != *target);
    }

    fn disconnect(&mut self) {
        self.targets.clear();
        self.records.clear();
    }

    fn is_observing(&self, target: &E) -> bool {
        self.targets.iter().any(|t| t.target == *target)
    }

    fn take_records(&mut self) -> Vec<IntersectionEntry<E>> {
        core::mem::take(&mut self.records)
    }
}

/// Factory for [`RectWatcher`]. Always available.
#[derive(Debug)]
pub struct RectWatcherFactory<E, R> {
    _marker: PhantomData<fn() -> (E, R)>,
}

impl<E, R> RectWatcherFactory<E, R> {
    /// Creates a factory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<E, R> Default for RectWatcherFactory<E, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, R> Clone for RectWatcherFactory<E, R> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E, R> WatcherFactory for RectWatcherFactory<E, R>
where
    E: Clone + PartialEq + Debug,
    R: Clone + PartialEq + Debug,
{
    type Root = R;
    type Watcher = RectWatcher<E, R>;

    fn create(&mut self, options: &WatchOptions<R>) -> Result<Self::Watcher, WatchError> {
        Ok(RectWatcher::new(options.clone()))
    }
}
