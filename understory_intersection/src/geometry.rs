// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure visibility geometry.

use kurbo::Rect;

use crate::options::WatchOptions;

/// Result of testing one target rectangle against a root.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Visibility {
    /// Fraction of the target inside the margin-adjusted root.
    pub ratio: f64,
    /// `true` if the ratio satisfies the threshold.
    ///
    /// With a zero threshold, a target touching the root edge counts as
    /// intersecting even though its ratio is `0.0`.
    pub is_intersecting: bool,
    /// Part of the target inside the root, or [`Rect::ZERO`].
    pub intersection: Rect,
    /// Margin-adjusted root bounds used for the test.
    pub root_bounds: Rect,
}

/// Evaluates `target` against `root` under `options`.
///
/// Both rectangles are in the same coordinate space. The root is expanded by
/// the margin before testing. A zero-area target that touches the root has a
/// ratio of `1.0`.
#[must_use]
pub fn evaluate<R>(target: Rect, root: Rect, options: &WatchOptions<R>) -> Visibility {
    let target = target.abs();
    let root_bounds = options.root_bounds(root);
    let hidden = Visibility {
        ratio: 0.0,
        is_intersecting: false,
        intersection: Rect::ZERO,
        root_bounds,
    };

    // A negative margin larger than the root leaves nothing to intersect.
    if root_bounds.x0 > root_bounds.x1 || root_bounds.y0 > root_bounds.y1 {
        return hidden;
    }
    let touching = target.x0 <= root_bounds.x1
        && target.x1 >= root_bounds.x0
        && target.y0 <= root_bounds.y1
        && target.y1 >= root_bounds.y0;
    if !touching {
        return hidden;
    }

    let intersection = target.intersect(root_bounds);
    let area = target.area();
    let ratio = if area > 0.0 {
        (intersection.area() / area).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let threshold = options.threshold();
    let is_intersecting = if threshold <= 0.0 {
        true
    } else {
        ratio >= threshold
    };

    Visibility {
        ratio,
        is_intersecting,
        intersection,
        root_bounds,
    }
}
