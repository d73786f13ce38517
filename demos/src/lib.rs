// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A paged-feed host shared by the demos.
//!
//! [`PagedFeed`] plays the part of an application: it owns the page cursor,
//! fetches fixed-size pages from an in-memory data set, lays rows out in a
//! single column, and drives an [`InfiniteScroll`] over the geometric
//! [`RectWatcher`](understory_intersection::RectWatcher) once per frame.

use std::cell::Cell;
use std::rc::Rc;

use kurbo::Rect;
use understory_infinite_scroll::{
    IndicatorContent, InfiniteScroll, LoadingIndicator, PageUpdate, ScrollProps, Slot,
};
use understory_intersection::RectWatcherFactory;

/// Controller type driven by [`PagedFeed`]. Rows are identified by their
/// position in the full data set.
pub type FeedScroll = InfiniteScroll<RectWatcherFactory<usize, ()>, Box<dyn FnMut(PageUpdate)>>;

/// Shape of the simulated feed.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedConfig {
    /// Rows in the full data set.
    pub total: usize,
    /// Rows per fetched page.
    pub page_size: usize,
    /// Height of every row.
    pub row_height: f64,
    /// Visible region of the column.
    pub viewport: Rect,
    /// Load older rows above the current ones, as in chat history.
    pub reverse: bool,
    /// Prefetch margin around the viewport.
    pub margin: f64,
    /// Custom loading text; `None` uses the default indicator.
    pub loading_text: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            total: 50,
            page_size: 10,
            row_height: 40.0,
            viewport: Rect::new(0.0, 0.0, 320.0, 300.0),
            reverse: false,
            margin: 0.0,
            loading_text: None,
        }
    }
}

/// What one [`PagedFeed::frame`] did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Pages requested by the controller.
    pub requested: usize,
    /// Rows fetched in response.
    pub fetched: usize,
}

/// In-memory paged feed hosting an [`InfiniteScroll`].
pub struct PagedFeed {
    config: FeedConfig,
    rows: Vec<usize>,
    page: Rc<Cell<usize>>,
    loaded_pages: usize,
    scroll: FeedScroll,
    indicator: LoadingIndicator<String>,
    offset: f64,
    clock: u64,
}

impl core::fmt::Debug for PagedFeed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PagedFeed")
            .field("config", &self.config)
            .field("rows", &self.rows.len())
            .field("page", &self.page.get())
            .field("offset", &self.offset)
            .field("scroll", &self.scroll)
            .finish_non_exhaustive()
    }
}

impl PagedFeed {
    /// Mounts the feed and loads the first page.
    ///
    /// Reverse feeds start scrolled to the bottom.
    pub fn new(config: FeedConfig) -> Self {
        let page = Rc::new(Cell::new(0));
        let cursor = Rc::clone(&page);
        let set_page: Box<dyn FnMut(PageUpdate)> =
            Box::new(move |update: PageUpdate| cursor.set(update(cursor.get())));
        let props = ScrollProps::new()
            .with_reverse(config.reverse)
            .with_margin(config.margin)
            .with_loading(true);
        let scroll = InfiniteScroll::new(RectWatcherFactory::new(), set_page, props);
        let indicator = match &config.loading_text {
            Some(text) => LoadingIndicator::custom(text.clone()),
            None => LoadingIndicator::new(),
        };

        let mut feed = Self {
            config,
            rows: Vec::new(),
            page,
            loaded_pages: 0,
            scroll,
            indicator,
            offset: 0.0,
            clock: 0,
        };
        feed.load_pending();
        if feed.config.reverse {
            feed.offset = feed.max_offset();
        }
        feed.render();
        feed
    }

    /// Rows currently loaded, top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// The host's page cursor.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page.get()
    }

    /// Returns `true` while the data set has unloaded rows.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.rows.len() < self.config.total
    }

    /// Current scroll offset from the top of the column.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Largest offset that keeps the viewport filled.
    #[must_use]
    pub fn max_offset(&self) -> f64 {
        let content = self.rows.len() as f64 * self.config.row_height;
        (content - self.config.viewport.height()).max(0.0)
    }

    /// The controller.
    #[must_use]
    pub fn scroll(&self) -> &FeedScroll {
        &self.scroll
    }

    /// Bounds of `row` in viewport space, or `None` if it is not loaded.
    #[must_use]
    pub fn row_bounds(&self, row: usize) -> Option<Rect> {
        row_rect(&self.rows, row, self.offset, &self.config)
    }

    /// Scrolls to `offset`, clamped to the content, and runs a frame.
    pub fn scroll_to(&mut self, offset: f64) -> Frame {
        self.offset = offset.clamp(0.0, self.max_offset());
        self.frame()
    }

    /// Scrolls by `delta` and runs a frame.
    pub fn scroll_by(&mut self, delta: f64) -> Frame {
        self.scroll_to(self.offset + delta)
    }

    /// Measures the edge, delivers queued entries, fetches any requested
    /// page, and re-renders.
    pub fn frame(&mut self) -> Frame {
        self.clock += 1;
        let (rows, offset, config) = (&self.rows, self.offset, &self.config);
        if let Some(watcher) = self.scroll.watcher_mut() {
            watcher.measure(config.viewport, self.clock, |row| {
                row_rect(rows, *row, offset, config)
            });
        }
        let requested = self.scroll.process_records();
        let fetched = self.load_pending();
        if self.config.reverse && fetched > 0 {
            // Keep the rows on screen in place while older ones land above.
            self.offset += fetched as f64 * self.config.row_height;
        }
        self.render();
        Frame { requested, fetched }
    }

    /// Text rendering of the current layout, one line per slot.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let layout = self.scroll.layout(&self.rows);
        let loading = match layout.loading_content(&self.indicator) {
            Some(IndicatorContent::Text(text)) => text.to_string(),
            Some(IndicatorContent::Custom(text)) => text.clone(),
            None => String::new(),
        };
        layout
            .iter()
            .map(|slot| match slot {
                Slot::Loading => loading.clone(),
                Slot::Edge { child, .. } => format!("row {child} <- edge"),
                Slot::Child { child, .. } => format!("row {child}"),
            })
            .collect()
    }

    fn load_pending(&mut self) -> usize {
        let mut fetched = 0;
        while self.loaded_pages <= self.page.get() && self.has_more() {
            let start = self.loaded_pages * self.config.page_size;
            let end = (start + self.config.page_size).min(self.config.total);
            if self.config.reverse {
                // Older rows sit above; the oldest ends up on top.
                self.rows.splice(0..0, (start..end).rev());
            } else {
                self.rows.extend(start..end);
            }
            tracing::info!(page = self.loaded_pages, rows = end - start, "fetched page");
            fetched += end - start;
            self.loaded_pages += 1;
        }
        fetched
    }

    fn render(&mut self) {
        let has_more = self.has_more();
        if self.scroll.props().show_loading != has_more {
            let props = self.scroll.props().clone().with_loading(has_more);
            self.scroll.set_props(props);
        }
        self.scroll.set_has_more(has_more);
        self.scroll.sync_children(&self.rows, |row| *row);
    }
}

fn row_rect(rows: &[usize], row: usize, offset: f64, config: &FeedConfig) -> Option<Rect> {
    let position = rows.iter().position(|r| *r == row)?;
    let top = config.viewport.y0 + position as f64 * config.row_height - offset;
    Some(Rect::new(
        config.viewport.x0,
        top,
        config.viewport.x1,
        top + config.row_height,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolling_to_the_bottom_loads_the_next_page() {
        let mut feed = PagedFeed::new(FeedConfig::default());
        assert_eq!(feed.rows().len(), 10);
        assert_eq!(feed.scroll().edge_element(), Some(&9));

        // The first frame reports the edge below the fold.
        assert_eq!(feed.frame(), Frame::default());

        let frame = feed.scroll_to(feed.max_offset());
        assert_eq!(
            frame,
            Frame {
                requested: 1,
                fetched: 10
            }
        );
        assert_eq!(feed.page(), 1);
        assert_eq!(feed.scroll().edge_element(), Some(&19));
    }

    #[test]
    fn whole_feed_loads_and_then_stops() {
        let mut feed = PagedFeed::new(FeedConfig::default());
        for _ in 0..20 {
            feed.scroll_to(feed.max_offset());
        }
        assert_eq!(feed.rows(), (0..50).collect::<Vec<_>>());
        assert_eq!(feed.page(), 4);
        assert!(!feed.has_more());
        assert!(!feed.scroll().is_observing());
        assert!(!feed.lines().iter().any(|line| line.starts_with("Loading")));
    }

    #[test]
    fn reverse_feed_loads_above_and_keeps_position() {
        let config = FeedConfig {
            reverse: true,
            ..FeedConfig::default()
        };
        let mut feed = PagedFeed::new(config);
        assert_eq!(feed.offset(), feed.max_offset());
        assert_eq!(feed.scroll().edge_element(), Some(&9));
        assert_eq!(feed.frame().requested, 0);

        let frame = feed.scroll_to(0.0);
        assert_eq!(frame.requested, 1);
        assert_eq!(feed.rows()[0], 19);
        assert_eq!(feed.scroll().edge_element(), Some(&19));
        // Row 9 was on top at offset zero and is still there.
        assert_eq!(
            feed.row_bounds(9).map(|r| r.y0),
            Some(feed.config.viewport.y0)
        );
    }

    #[test]
    fn margin_requests_before_the_last_row_shows() {
        let config = FeedConfig {
            margin: 60.0,
            ..FeedConfig::default()
        };
        let mut feed = PagedFeed::new(config);
        // At offset 30 the last row starts at 330, inside the root that now ends at 360.
        assert_eq!(feed.scroll_to(30.0).requested, 1);
    }

    #[test]
    fn lines_show_the_indicator_first() {
        let config = FeedConfig {
            loading_text: Some("Fetching ...".to_string()),
            ..FeedConfig::default()
        };
        let feed = PagedFeed::new(config);
        let lines = feed.lines();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "Fetching ...");
        assert_eq!(lines[10], "row 9 <- edge");
    }
}
