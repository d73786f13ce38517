// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility change records.

use kurbo::Rect;

use crate::geometry::Visibility;

/// A single visibility crossing reported by a watcher.
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionEntry<E> {
    /// The observed target.
    pub target: E,
    /// `true` if the target is now sufficiently visible for the watcher's threshold.
    pub is_intersecting: bool,
    /// Fraction of the target's area inside the (margin-adjusted) root, `0.0..=1.0`.
    pub intersection_ratio: f64,
    /// Target bounds at the time of the crossing.
    pub bounding_rect: Rect,
    /// Part of the target inside the root; zero-sized when not intersecting.
    pub intersection_rect: Rect,
    /// Margin-adjusted root bounds, if the root could be resolved.
    pub root_bounds: Option<Rect>,
    /// Host-supplied timestamp.
    pub time: u64,
}

impl<E> IntersectionEntry<E> {
    /// Builds an entry from an evaluated [`Visibility`].
    #[must_use]
    pub fn from_visibility(target: E, bounds: Rect, visibility: &Visibility, time: u64) -> Self {
        Self {
            target,
            is_intersecting: visibility.is_intersecting,
            intersection_ratio: visibility.ratio,
            bounding_rect: bounds,
            intersection_rect: visibility.intersection,
            root_bounds: Some(visibility.root_bounds),
            time,
        }
    }

    /// Builds an entry carrying only the visibility signal.
    ///
    /// The ratio is `1.0` when visible and `0.0` otherwise; all rectangles are zero.
    #[must_use]
    pub fn signal(target: E, is_intersecting: bool) -> Self {
        Self {
            target,
            is_intersecting,
            intersection_ratio: if is_intersecting { 1.0 } else { 0.0 },
            bounding_rect: Rect::ZERO,
            intersection_rect: Rect::ZERO,
            root_bounds: None,
            time: 0,
        }
    }
}
