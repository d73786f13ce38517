// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_intersection --heading-base-level=0

//! Understory Intersection: headless visibility watching against a root container.
//!
//! This crate models the "intersection observer" capability as a small,
//! renderer-agnostic interface. A watcher is configured once with a root, a
//! visibility threshold, and a uniform margin; targets are then registered and
//! released, and the watcher queues an [`IntersectionEntry`] whenever a target's
//! visibility relative to the root crosses the threshold.
//!
//! The core pieces are:
//!
//! - [`WatchOptions`]: root, threshold, and margin for one watcher instance.
//! - [`IntersectionWatcher`]: register/release targets and drain queued entries.
//! - [`WatcherFactory`]: creates one watcher per configuration.
//! - [`evaluate`]: the pure geometry used by [`RectWatcher`].
//! - [`RectWatcher`]: a reference watcher over `kurbo` rectangles that hosts
//!   drive by calling [`RectWatcher::measure`] after layout or scrolling.
//! - `sim` (feature `sim`): a simulated environment whose watchers only report
//!   the entries a test synthesizes.
//!
//! This crate does **not** know about widgets, display trees, or scroll
//! containers. Hosts own the element handles (`E`) and root handles (`R`) and
//! provide the geometry.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_intersection::{IntersectionWatcher, RectWatcher, Root, WatchOptions};
//!
//! // Watch against the default root with a 50px pre-fetch margin.
//! let options = WatchOptions::<()>::new(Root::Default).with_margin(50.0);
//! let mut watcher = RectWatcher::new(options);
//! watcher.observe("sentinel");
//!
//! let viewport = Rect::new(0.0, 0.0, 300.0, 300.0);
//! // The sentinel sits just below the fold, but inside the margin.
//! let queued = watcher.measure(viewport, 0, |_| Some(Rect::new(0.0, 320.0, 300.0, 340.0)));
//! assert_eq!(queued, 1);
//!
//! let records = watcher.take_records();
//! assert!(records[0].is_intersecting);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod entry;
mod error;
mod geometry;
mod options;
mod rect;
#[cfg(feature = "sim")]
pub mod sim;
mod watcher;

pub use entry::IntersectionEntry;
pub use error::WatchError;
pub use geometry::{Visibility, evaluate};
pub use options::{Root, WatchOptions};
pub use rect::{RectWatcher, RectWatcherFactory};
pub use watcher::{IntersectionWatcher, WatcherFactory};
