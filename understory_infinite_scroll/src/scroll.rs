// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The infinite-scroll controller: watcher lifecycle and registration.
//!
//! ## Lifecycle
//!
//! - One watcher exists per `(root, threshold, margin)` configuration. It is
//!   created in [`InfiniteScroll::new`] and replaced by
//!   [`InfiniteScroll::set_props`] only when that tuple changes.
//! - At most one element is registered: the mounted edge element, while
//!   `has_more` holds and the mount is live. Every change releases the old
//!   registration before adding the new one.
//! - [`InfiniteScroll::unmount`] (also run on drop) disconnects and drops the
//!   watcher, so nothing can be delivered afterwards.
//!
//! If the factory cannot provide a watcher, the failure is logged and the
//! controller never triggers. It retries only when the configuration changes.

use core::fmt;

use understory_intersection::{
    IntersectionEntry, IntersectionWatcher, WatchOptions, WatcherFactory,
};

use crate::edge::{EdgeBinder, Layout};
use crate::props::ScrollProps;
use crate::trigger::{PageUpdate, next_page, qualifies};

/// Element handle type of the watchers produced by factory `F`.
pub type ElementOf<F> = <<F as WatcherFactory>::Watcher as IntersectionWatcher>::Element;

/// Headless infinite-scroll controller.
///
/// `F` creates the intersection watcher; `P` is the host's page-advance
/// callback, invoked with [`next_page`] once per qualifying entry.
pub struct InfiniteScroll<F: WatcherFactory, P> {
    factory: F,
    set_page: P,
    props: ScrollProps<F::Root>,
    watch_options: WatchOptions<F::Root>,
    watcher: Option<F::Watcher>,
    edge: EdgeBinder<ElementOf<F>>,
    observed: Option<ElementOf<F>>,
    // Set by a one-shot trigger; cleared when the edge identity changes.
    spent: bool,
    requests: u64,
    mounted: bool,
}

impl<F, P> InfiniteScroll<F, P>
where
    F: WatcherFactory,
    P: FnMut(PageUpdate),
{
    /// Creates a mounted controller and its watcher.
    ///
    /// No element is observed until the host reports the mounted edge
    /// element with [`set_edge_element`](Self::set_edge_element) or
    /// [`sync_children`](Self::sync_children).
    pub fn new(mut factory: F, set_page: P, props: ScrollProps<F::Root>) -> Self {
        let watch_options = props.watch_options();
        let watcher = create_watcher(&mut factory, &watch_options);
        Self {
            factory,
            set_page,
            props,
            watch_options,
            watcher,
            edge: EdgeBinder::new(),
            observed: None,
            spent: false,
            requests: 0,
            mounted: true,
        }
    }

    /// Handles a batch of visibility entries.
    ///
    /// Each entry that reports the currently registered edge element as
    /// visible requests one page. Entries for released elements and
    /// transitions to hidden are ignored. Under
    /// [`TriggerPolicy::OneShot`](crate::TriggerPolicy::OneShot) the edge is
    /// released before the host callback runs.
    ///
    /// Returns the number of pages requested.
    pub fn on_intersection(&mut self, entries: &[IntersectionEntry<ElementOf<F>>]) -> usize {
        let mut requested = 0;
        for entry in entries {
            if !qualifies(entry, self.observed.as_ref()) {
                tracing::trace!(
                    element = ?entry.target,
                    visible = entry.is_intersecting,
                    "entry ignored"
                );
                continue;
            }
            if self.props.policy.releases_on_fire() {
                self.spent = true;
                self.release_registration();
            }
            (self.set_page)(next_page);
            self.requests += 1;
            requested += 1;
            tracing::debug!(element = ?entry.target, requests = self.requests, "page requested");
        }
        requested
    }

    /// Drains the watcher's queued entries and handles them.
    ///
    /// Returns the number of pages requested.
    pub fn process_records(&mut self) -> usize {
        let Some(watcher) = self.watcher.as_mut() else {
            return 0;
        };
        let records = watcher.take_records();
        self.on_intersection(&records)
    }
}

impl<F: WatcherFactory, P> InfiniteScroll<F, P> {
    /// Applies new host props.
    ///
    /// Changing the root, threshold, or margin discards the watcher and its
    /// registration and re-registers the edge on a fresh one. `has_more`,
    /// `reverse`, `show_loading`, and the policy never recreate the watcher.
    pub fn set_props(&mut self, props: ScrollProps<F::Root>) {
        if !self.mounted {
            tracing::debug!("props ignored after unmount");
            return;
        }
        let options = props.watch_options();
        self.props = props;
        // Only a one-shot policy keeps a fired edge released.
        if !self.props.policy.releases_on_fire() {
            self.spent = false;
        }
        if options != self.watch_options {
            tracing::debug!(from = ?self.watch_options, to = ?options, "reconfiguring watcher");
            self.release_watcher();
            self.watch_options = options;
            self.watcher = create_watcher(&mut self.factory, &self.watch_options);
        }
        self.sync_registration();
    }

    /// Updates only `has_more`.
    ///
    /// `false` releases the edge immediately, even if it stays mounted.
    pub fn set_has_more(&mut self, has_more: bool) {
        if !self.mounted || self.props.has_more == has_more {
            return;
        }
        self.props.has_more = has_more;
        self.sync_registration();
    }

    /// Lays out `children` for rendering under the current props.
    #[must_use]
    pub fn layout<'a, C>(&self, children: &'a [C]) -> Layout<'a, C> {
        Layout::new(children, self.props.reverse, self.props.show_loading)
    }

    /// Reports the mounted edge element, or `None` when it unmounted.
    ///
    /// Registration is redone only when the identity changes.
    pub fn set_edge_element(&mut self, element: Option<ElementOf<F>>) {
        if !self.mounted {
            return;
        }
        if self.edge.bind(element) {
            self.spent = false;
            tracing::debug!(edge = ?self.edge.current(), "edge element changed");
            self.sync_registration();
        }
    }

    /// Lays out `children` and reports the edge child's element in one step.
    ///
    /// `element_of` maps the edge child to its mounted element handle.
    pub fn sync_children<'a, C>(
        &mut self,
        children: &'a [C],
        element_of: impl FnOnce(&C) -> ElementOf<F>,
    ) -> Layout<'a, C> {
        let layout = self.layout(children);
        self.set_edge_element(layout.edge_child().map(element_of));
        layout
    }

    /// Releases the watcher and every registration.
    ///
    /// Idempotent. Later calls that would register anything are ignored.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.release_watcher();
        self.edge.bind(None);
        tracing::debug!(requests = self.requests, "unmounted");
    }

    /// Current props.
    #[must_use]
    pub fn props(&self) -> &ScrollProps<F::Root> {
        &self.props
    }

    /// Configuration of the current watcher.
    #[must_use]
    pub fn watch_options(&self) -> &WatchOptions<F::Root> {
        &self.watch_options
    }

    /// The mounted edge element.
    #[must_use]
    pub fn edge_element(&self) -> Option<&ElementOf<F>> {
        self.edge.current()
    }

    /// The element currently registered with the watcher.
    #[must_use]
    pub fn observed_element(&self) -> Option<&ElementOf<F>> {
        self.observed.as_ref()
    }

    /// Returns `true` if an edge element is registered.
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.observed.is_some()
    }

    /// The watcher, if one could be created and the controller is mounted.
    #[must_use]
    pub fn watcher(&self) -> Option<&F::Watcher> {
        self.watcher.as_ref()
    }

    /// Mutable access to the watcher, for hosts that drive it directly
    /// (for example [`RectWatcher::measure`](understory_intersection::RectWatcher::measure)).
    pub fn watcher_mut(&mut self) -> Option<&mut F::Watcher> {
        self.watcher.as_mut()
    }

    /// Total pages requested so far.
    #[must_use]
    pub fn page_requests(&self) -> u64 {
        self.requests
    }

    /// Returns `false` after [`unmount`](Self::unmount).
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn sync_registration(&mut self) {
        let desired = if self.mounted && self.props.has_more && !self.spent {
            self.edge.current().cloned()
        } else {
            None
        };
        if self.observed == desired {
            return;
        }
        self.release_registration();
        let (Some(target), Some(watcher)) = (desired, self.watcher.as_mut()) else {
            return;
        };
        watcher.observe(target.clone());
        tracing::debug!(element = ?target, "observing edge");
        self.observed = Some(target);
    }

    fn release_registration(&mut self) {
        let Some(old) = self.observed.take() else {
            return;
        };
        if let Some(watcher) = self.watcher.as_mut() {
            watcher.unobserve(&old);
        }
        tracing::debug!(element = ?old, "released edge");
    }

    fn release_watcher(&mut self) {
        self.observed = None;
        if let Some(mut watcher) = self.watcher.take() {
            watcher.disconnect();
        }
    }
}

impl<F: WatcherFactory, P> Drop for InfiniteScroll<F, P> {
    fn drop(&mut self) {
        self.release_watcher();
    }
}

impl<F: WatcherFactory, P> fmt::Debug for InfiniteScroll<F, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfiniteScroll")
            .field("props", &self.props)
            .field("watch_options", &self.watch_options)
            .field("has_watcher", &self.watcher.is_some())
            .field("edge", &self.edge.current())
            .field("observed", &self.observed)
            .field("spent", &self.spent)
            .field("requests", &self.requests)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

fn create_watcher<F: WatcherFactory>(
    factory: &mut F,
    options: &WatchOptions<F::Root>,
) -> Option<F::Watcher> {
    match factory.create(options) {
        Ok(watcher) => {
            tracing::debug!(?options, "watcher created");
            Some(watcher)
        }
        Err(err) => {
            tracing::warn!(%err, "intersection watcher unavailable; pagination disabled");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TriggerPolicy;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::Cell;
    use understory_intersection::Root;
    use understory_intersection::sim::{SimulatedEntry, SimulatedEnvironment};

    type Env = SimulatedEnvironment<u32, u8>;

    fn counter() -> (Rc<Cell<usize>>, impl FnMut(PageUpdate)) {
        let page = Rc::new(Cell::new(0));
        let host = Rc::clone(&page);
        (page, move |update: PageUpdate| host.set(update(host.get())))
    }

    #[test]
    fn creates_one_watcher_and_observes_nothing_until_edge_mounts() {
        let env = Env::new();
        let (_, set_page) = counter();
        let scroll = InfiniteScroll::new(env.clone(), set_page, ScrollProps::new());
        assert_eq!(env.live_watchers(), 1);
        assert_eq!(env.observation_count(), 0);
        assert!(!scroll.is_observing());
    }

    #[test]
    fn edge_change_releases_previous_registration() {
        let env = Env::new();
        let (_, set_page) = counter();
        let mut scroll = InfiniteScroll::new(env.clone(), set_page, ScrollProps::new());

        scroll.set_edge_element(Some(10));
        assert_eq!(env.observed_targets(), [10]);
        scroll.set_edge_element(Some(20));
        assert_eq!(env.observed_targets(), [20]);
        scroll.set_edge_element(None);
        assert_eq!(env.observation_count(), 0);
        assert_eq!(env.created(), 1);
    }

    #[test]
    fn has_more_false_releases_a_still_mounted_edge() {
        let env = Env::new();
        let (page, set_page) = counter();
        let mut scroll = InfiniteScroll::new(env.clone(), set_page, ScrollProps::new());
        scroll.set_edge_element(Some(1));

        scroll.set_has_more(false);
        assert_eq!(env.observation_count(), 0);
        assert_eq!(env.simulate(SimulatedEntry::visible()), 0);
        assert_eq!(scroll.process_records(), 0);
        assert_eq!(page.get(), 0);

        // Re-arming picks the same edge up again.
        scroll.set_has_more(true);
        assert_eq!(env.observed_targets(), [1]);
    }

    #[test]
    fn stale_records_are_dropped() {
        let env = Env::new();
        let (page, set_page) = counter();
        let mut scroll = InfiniteScroll::new(env.clone(), set_page, ScrollProps::new());
        scroll.set_edge_element(Some(1));

        let stale = [IntersectionEntry::signal(99, true)];
        assert_eq!(scroll.on_intersection(&stale), 0);
        let hidden = [IntersectionEntry::signal(1, false)];
        assert_eq!(scroll.on_intersection(&hidden), 0);
        assert_eq!(page.get(), 0);
    }

    #[test]
    fn persistent_policy_fires_once_per_entry() {
        let env = Env::new();
        let (page, set_page) = counter();
        let mut scroll = InfiniteScroll::new(env.clone(), set_page, ScrollProps::new());
        scroll.set_edge_element(Some(1));

        let burst = [
            IntersectionEntry::signal(1, true),
            IntersectionEntry::signal(1, true),
        ];
        assert_eq!(scroll.on_intersection(&burst), 2);
        assert_eq!(page.get(), 2);
        assert!(scroll.is_observing());
    }

    #[test]
    fn one_shot_policy_releases_until_edge_changes() {
        let env = Env::new();
        let (page, set_page) = counter();
        let props = ScrollProps::new().with_policy(TriggerPolicy::OneShot);
        let mut scroll = InfiniteScroll::new(env.clone(), set_page, props);
        scroll.set_edge_element(Some(1));

        let burst = [
            IntersectionEntry::signal(1, true),
            IntersectionEntry::signal(1, true),
        ];
        assert_eq!(scroll.on_intersection(&burst), 1);
        assert_eq!(page.get(), 1);
        assert_eq!(env.observation_count(), 0);

        // Unrelated prop updates do not re-arm the spent edge.
        scroll.set_props(
            ScrollProps::new()
                .with_policy(TriggerPolicy::OneShot)
                .with_loading(true),
        );
        assert_eq!(env.observation_count(), 0);

        scroll.set_edge_element(Some(2));
        assert_eq!(env.observed_targets(), [2]);
    }

    #[test]
    fn switching_to_persistent_re_arms_a_spent_edge() {
        let env = Env::new();
        let (page, set_page) = counter();
        let props = ScrollProps::new().with_policy(TriggerPolicy::OneShot);
        let mut scroll = InfiniteScroll::new(env.clone(), set_page, props);
        scroll.set_edge_element(Some(1));

        env.simulate(SimulatedEntry::visible());
        assert_eq!(scroll.process_records(), 1);
        assert!(!scroll.is_observing());

        scroll.set_props(ScrollProps::new().with_policy(TriggerPolicy::Persistent));
        assert!(scroll.is_observing());
        assert_eq!(env.observed_targets(), [1]);

        assert_eq!(env.simulate(SimulatedEntry::visible()), 1);
        assert_eq!(scroll.process_records(), 1);
        assert_eq!(page.get(), 2);
        // Persistent keeps the edge registered after the trigger.
        assert_eq!(env.observed_targets(), [1]);
    }

    #[test]
    fn reconfiguration_replaces_the_watcher() {
        let env = Env::new();
        let (_, set_page) = counter();
        let mut scroll = InfiniteScroll::new(env.clone(), set_page, ScrollProps::new());
        scroll.set_edge_element(Some(1));

        // Non-geometric props keep the watcher.
        scroll.set_props(ScrollProps::new().with_reverse(true).with_loading(true));
        assert_eq!(env.created(), 1);

        let props = ScrollProps::new()
            .with_root(Root::Element(7))
            .with_threshold(0.9)
            .with_margin(50.0);
        scroll.set_props(props.clone());
        assert_eq!(env.created(), 2);
        assert_eq!(env.live_watchers(), 1);
        assert_eq!(env.live_options(), [props.watch_options()]);
        assert_eq!(env.observed_targets(), [1]);
    }

    #[test]
    fn unavailable_capability_degrades_to_never_triggering() {
        let env = Env::new();
        env.set_available(false);
        let (page, set_page) = counter();
        let mut scroll = InfiniteScroll::new(env.clone(), set_page, ScrollProps::new());
        scroll.set_edge_element(Some(1));

        assert!(scroll.watcher().is_none());
        assert!(!scroll.is_observing());
        assert_eq!(scroll.process_records(), 0);
        assert_eq!(page.get(), 0);

        // A new configuration retries.
        env.set_available(true);
        scroll.set_props(ScrollProps::new().with_margin(10.0));
        assert!(scroll.watcher().is_some());
        assert_eq!(env.observed_targets(), [1]);
    }

    #[test]
    fn unmount_and_drop_release_everything() {
        let env = Env::new();
        let (page, set_page) = counter();
        let mut scroll = InfiniteScroll::new(env.clone(), set_page, ScrollProps::new());
        scroll.set_edge_element(Some(1));
        env.simulate(SimulatedEntry::visible());

        scroll.unmount();
        assert_eq!(env.live_watchers(), 0);
        assert_eq!(env.pending(), 0);
        assert_eq!(scroll.process_records(), 0);

        scroll.set_edge_element(Some(2));
        scroll.set_props(ScrollProps::new().with_margin(1.0));
        assert_eq!(env.created(), 1);
        assert_eq!(page.get(), 0);
        scroll.unmount();

        let (_, set_page) = counter();
        let mut other = InfiniteScroll::new(env.clone(), set_page, ScrollProps::new());
        other.set_edge_element(Some(3));
        assert_eq!(env.live_watchers(), 1);
        drop(other);
        assert_eq!(env.live_watchers(), 0);
    }

    #[test]
    fn layout_follows_props() {
        let env = Env::new();
        let (_, set_page) = counter();
        let scroll = InfiniteScroll::new(
            env,
            set_page,
            ScrollProps::new().with_reverse(true).with_loading(true),
        );
        let children = [5_u32, 6, 7];
        let layout = scroll.layout(&children);
        assert_eq!(layout.edge_child(), Some(&5));
        assert!(layout.shows_loading());
        let slots: Vec<_> = layout.iter().collect();
        assert_eq!(slots.len(), 4);
    }
}
