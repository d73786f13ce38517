// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading indicator slot. Purely presentational.

/// Text shown when the host supplies no indicator content.
pub const DEFAULT_LOADING_TEXT: &str = "Loading more ...";

/// Indicator content, resolved for rendering.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IndicatorContent<'a, I> {
    /// The default text.
    Text(&'static str),
    /// Host-supplied content.
    Custom(&'a I),
}

/// Content rendered in the [`Slot::Loading`](crate::Slot::Loading) position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadingIndicator<I> {
    content: Option<I>,
}

impl<I> Default for LoadingIndicator<I> {
    fn default() -> Self {
        Self { content: None }
    }
}

impl<I> LoadingIndicator<I> {
    /// An indicator showing [`DEFAULT_LOADING_TEXT`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An indicator showing host content.
    #[must_use]
    pub fn custom(content: I) -> Self {
        Self {
            content: Some(content),
        }
    }

    /// Content to render.
    #[must_use]
    pub fn content(&self) -> IndicatorContent<'_, I> {
        match &self.content {
            Some(content) => IndicatorContent::Custom(content),
            None => IndicatorContent::Text(DEFAULT_LOADING_TEXT),
        }
    }
}
