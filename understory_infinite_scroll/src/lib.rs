// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_infinite_scroll --heading-base-level=0

//! Understory Infinite Scroll: a headless "load more at the edge" trigger.
//!
//! This crate detects when a list has been scrolled near its end and asks the
//! host for the next page. It watches a single sentinel, the *edge element*:
//! the last rendered child, or the first one in reverse mode (content loading
//! above, as in chat history). When the edge becomes visible relative to a
//! root container, the host's page-advance callback runs once.
//!
//! The pieces are:
//!
//! - [`Layout`]: walks the host's children in render order, marks the edge
//!   child, and optionally emits a [`Slot::Loading`] position first.
//! - [`InfiniteScroll`]: owns one intersection watcher per configuration,
//!   keeps exactly the current edge element registered while more pages
//!   exist, and turns qualifying entries into page requests.
//! - [`TriggerPolicy`]: whether a trigger also releases the edge until it
//!   changes.
//! - [`LoadingIndicator`]: default or host content for the loading slot,
//!   resolved per pass with [`Layout::loading_content`].
//!
//! The watcher itself comes from `understory_intersection` through a
//! [`WatcherFactory`](understory_intersection::WatcherFactory), so the trigger
//! logic runs the same against the geometric
//! [`RectWatcher`](understory_intersection::RectWatcher) and against a
//! simulated environment in tests.
//!
//! This crate deliberately does **not** virtualize, fetch, or render anything.
//! Host frameworks are responsible for:
//!
//! - Owning the page cursor and the `has_more` flag.
//! - Rendering the [`Layout`] and reporting the mounted edge element.
//! - Fetching the requested page and rendering the new children.
//! - Delivering queued entries, typically by calling
//!   [`InfiniteScroll::process_records`] from their event loop.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use understory_infinite_scroll::{InfiniteScroll, PageUpdate, ScrollProps};
//! use understory_intersection::sim::{SimulatedEntry, SimulatedEnvironment};
//!
//! let env = SimulatedEnvironment::<u32, ()>::new();
//! let page = Rc::new(Cell::new(0));
//! let host_page = Rc::clone(&page);
//! let mut scroll = InfiniteScroll::new(
//!     env.clone(),
//!     move |update: PageUpdate| host_page.set(update(host_page.get())),
//!     ScrollProps::new(),
//! );
//!
//! // Render five rows; the last one becomes the edge element.
//! let rows = [0_u32, 1, 2, 3, 4];
//! let layout = scroll.sync_children(&rows, |row| *row);
//! assert_eq!(layout.edge_child(), Some(&4));
//!
//! // The edge scrolls into view.
//! env.simulate(SimulatedEntry::visible());
//! assert_eq!(scroll.process_records(), 1);
//! assert_eq!(page.get(), 1);
//!
//! // No more pages: the edge is released even though it is still mounted.
//! scroll.set_has_more(false);
//! assert_eq!(env.simulate(SimulatedEntry::visible()), 0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod edge;
mod indicator;
mod props;
mod scroll;
mod trigger;

pub use edge::{EdgeBinder, Layout, LayoutIter, Slot, edge_index};
pub use indicator::{DEFAULT_LOADING_TEXT, IndicatorContent, LoadingIndicator};
pub use props::ScrollProps;
pub use scroll::{ElementOf, InfiniteScroll};
pub use trigger::{PageUpdate, TriggerPolicy, next_page, qualifies};
