// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Error returned when a watcher cannot be created.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WatchError {
    /// The environment provides no intersection capability.
    Unavailable,
    /// The explicit root handle does not refer to a live container.
    UnresolvedRoot,
}

impl fmt::Display for WatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => {
                f.write_str("intersection watching is not available in this environment")
            }
            Self::UnresolvedRoot => f.write_str("the watch root does not refer to a live container"),
        }
    }
}

impl core::error::Error for WatchError {}
