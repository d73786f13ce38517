// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Infinite scroll over a paged feed.
//!
//! Scroll a 300px viewport down a feed of 50 rows fetched ten at a time, then
//! scroll a chat-style feed upwards through its history.
//!
//! Run:
//! - `cargo run -p understory_demos --example paged_feed`
//! - `RUST_LOG=understory_infinite_scroll=debug cargo run -p understory_demos --example paged_feed`

use tracing_subscriber::EnvFilter;
use understory_demos::{FeedConfig, PagedFeed};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("== Forward feed ==");
    let mut feed = PagedFeed::new(FeedConfig {
        margin: 80.0,
        ..FeedConfig::default()
    });
    let mut step = 0;
    while feed.has_more() && step < 100 {
        let frame = feed.scroll_by(60.0);
        if frame.requested > 0 {
            println!(
                "offset {:>6.1}: page {} requested, {} rows now loaded",
                feed.offset(),
                feed.page(),
                feed.rows().len()
            );
        }
        step += 1;
    }
    println!("Loaded every row after {step} scroll steps.");
    for line in feed.lines().iter().rev().take(3).rev() {
        println!("  {line}");
    }

    println!();
    println!("== Chat history ==");
    let mut chat = PagedFeed::new(FeedConfig {
        total: 30,
        reverse: true,
        loading_text: Some("Fetching older messages ...".to_string()),
        ..FeedConfig::default()
    });
    for line in chat.lines().iter().take(3) {
        println!("  {line}");
    }
    let mut step = 0;
    while chat.has_more() && step < 100 {
        let frame = chat.scroll_by(-90.0);
        if frame.requested > 0 {
            println!(
                "offset {:>6.1}: page {} requested, {} older rows prepended",
                chat.offset(),
                chat.page(),
                frame.fetched
            );
        }
        step += 1;
    }
    println!(
        "Reached the start of the conversation; edge released: {}",
        !chat.scroll().is_observing()
    );
}
