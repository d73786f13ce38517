// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Watcher configuration: root, threshold, and margin.

use kurbo::Rect;

/// Container against which target visibility is measured.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Root<R> {
    /// Let the environment resolve the root, typically the nearest scrollable
    /// ancestor of the target (or the top-level viewport).
    Default,
    /// An explicit container handle owned by the host.
    Element(R),
}

impl<R> Default for Root<R> {
    fn default() -> Self {
        Self::Default
    }
}

impl<R> Root<R> {
    /// Returns the explicit container handle, if any.
    #[must_use]
    pub fn element(&self) -> Option<&R> {
        match self {
            Self::Default => None,
            Self::Element(root) => Some(root),
        }
    }

    /// Returns `true` if the environment resolves the root.
    #[must_use]
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

/// Configuration for a single watcher instance.
///
/// Two options compare equal when root, threshold, and margin all match; a
/// change in any of them calls for a new watcher instance.
///
/// - `threshold` is the fraction (`0.0..=1.0`) of the target that must be
///   inside the root for it to count as visible. `0.0` means any contact.
/// - `margin` extends the root's bounds by the same amount on all four sides
///   before testing. Negative values shrink the root.
#[derive(Clone, Debug, PartialEq)]
pub struct WatchOptions<R> {
    root: Root<R>,
    threshold: f64,
    margin: f64,
}

impl<R> Default for WatchOptions<R> {
    fn default() -> Self {
        Self::new(Root::Default)
    }
}

impl<R> WatchOptions<R> {
    /// Creates options for `root` with a zero threshold and zero margin.
    #[must_use]
    pub fn new(root: Root<R>) -> Self {
        Self {
            root,
            threshold: 0.0,
            margin: 0.0,
        }
    }

    /// Sets the visibility threshold.
    ///
    /// Non-finite values become `0.0`; finite values are clamped into `0.0..=1.0`.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = sanitize_threshold(threshold);
        self
    }

    /// Sets the uniform root margin in pixels. Non-finite values become `0.0`.
    #[must_use]
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = if margin.is_finite() { margin } else { 0.0 };
        self
    }

    /// Returns the root.
    #[must_use]
    pub fn root(&self) -> &Root<R> {
        &self.root
    }

    /// Returns the sanitized threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the margin.
    #[must_use]
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Applies the margin to a resolved root rectangle.
    #[must_use]
    pub fn root_bounds(&self, root: Rect) -> Rect {
        root.inflate(self.margin, self.margin)
    }
}

fn sanitize_threshold(threshold: f64) -> f64 {
    if threshold.is_finite() {
        threshold.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
