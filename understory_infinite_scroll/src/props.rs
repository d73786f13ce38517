// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-supplied configuration.

use understory_intersection::{Root, WatchOptions};

use crate::trigger::TriggerPolicy;

/// Inputs the host passes on every render, apart from the children and the
/// page-advance callback.
///
/// The defaults match a plain forward list measured against the environment's
/// default root: `has_more = true`, no loading indicator, zero threshold and
/// margin, [`TriggerPolicy::Persistent`].
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollProps<R> {
    /// `false` once the host has no further pages; the edge is released.
    pub has_more: bool,
    /// Whether the loading indicator slot is emitted.
    pub show_loading: bool,
    /// Bind the first child instead of the last (content loads above).
    pub reverse: bool,
    /// Fraction of the edge element that must be visible, `0.0..=1.0`.
    pub threshold: f64,
    /// Uniform pixel margin applied to the root before testing.
    pub margin: f64,
    /// Container against which visibility is measured.
    pub root: Root<R>,
    /// How duplicate triggers on one edge element are suppressed.
    pub policy: TriggerPolicy,
}

impl<R> Default for ScrollProps<R> {
    fn default() -> Self {
        Self {
            has_more: true,
            show_loading: false,
            reverse: false,
            threshold: 0.0,
            margin: 0.0,
            root: Root::Default,
            policy: TriggerPolicy::Persistent,
        }
    }
}

impl<R> ScrollProps<R> {
    /// Creates default props.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets [`has_more`](Self::has_more).
    #[must_use]
    pub fn with_has_more(mut self, has_more: bool) -> Self {
        self.has_more = has_more;
        self
    }

    /// Sets [`show_loading`](Self::show_loading).
    #[must_use]
    pub fn with_loading(mut self, show_loading: bool) -> Self {
        self.show_loading = show_loading;
        self
    }

    /// Sets [`reverse`](Self::reverse).
    #[must_use]
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Sets [`threshold`](Self::threshold).
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets [`margin`](Self::margin).
    #[must_use]
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Sets [`root`](Self::root).
    #[must_use]
    pub fn with_root(mut self, root: Root<R>) -> Self {
        self.root = root;
        self
    }

    /// Sets [`policy`](Self::policy).
    #[must_use]
    pub fn with_policy(mut self, policy: TriggerPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl<R: Clone> ScrollProps<R> {
    /// Watcher configuration derived from these props.
    ///
    /// Threshold and margin are sanitized by [`WatchOptions`], so props that
    /// differ only in out-of-range values map to the same watcher.
    #[must_use]
    pub fn watch_options(&self) -> WatchOptions<R> {
        WatchOptions::new(self.root.clone())
            .with_threshold(self.threshold)
            .with_margin(self.margin)
    }
}
