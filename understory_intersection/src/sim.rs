// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated environment: watchers that report only synthesized entries.
//!
//! [`SimulatedEnvironment`] is a [`WatcherFactory`] whose watchers register
//! into a registry shared with the environment handle. Tests keep a clone of
//! the handle, hand another to the code under test, and then call
//! [`SimulatedEnvironment::simulate`] to queue entries on every matching
//! registration. Dropping a watcher removes it from the registry, so the
//! handle can also verify that nothing leaks.
//!
//! ## Minimal example
//!
//! ```
//! use understory_intersection::sim::{SimulatedEntry, SimulatedEnvironment};
//! use understory_intersection::{IntersectionWatcher, WatchOptions, WatcherFactory};
//!
//! let env = SimulatedEnvironment::<&str, ()>::new();
//! let mut watcher = env.clone().create(&WatchOptions::default()).unwrap();
//! watcher.observe("last");
//!
//! // No target named: every registration receives the entry.
//! assert_eq!(env.simulate(SimulatedEntry::ratio(1.0)), 1);
//! let records = watcher.take_records();
//! assert!(records[0].is_intersecting);
//! assert_eq!(records[0].target, "last");
//!
//! drop(watcher);
//! assert_eq!(env.live_watchers(), 0);
//! ```

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt::Debug;

use hashbrown::HashMap;

use crate::entry::IntersectionEntry;
use crate::error::WatchError;
use crate::options::{Root, WatchOptions};
use crate::watcher::{IntersectionWatcher, WatcherFactory};

/// A partially specified entry, normalized per receiving registration.
///
/// - An unspecified visibility flag is derived from `ratio > 0`.
/// - An unspecified ratio is `1.0` when visible and `0.0` otherwise.
/// - With no target, the entry goes to every registration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulatedEntry<E> {
    /// Only registrations for this target receive the entry.
    pub target: Option<E>,
    /// Explicit visibility flag.
    pub is_intersecting: Option<bool>,
    /// Explicit intersection ratio.
    pub ratio: Option<f64>,
}

impl<E> SimulatedEntry<E> {
    /// An entry reporting the target as visible.
    #[must_use]
    pub fn visible() -> Self {
        Self {
            target: None,
            is_intersecting: Some(true),
            ratio: None,
        }
    }

    /// An entry reporting the target as hidden.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            target: None,
            is_intersecting: Some(false),
            ratio: None,
        }
    }

    /// An entry carrying only a ratio.
    #[must_use]
    pub fn ratio(ratio: f64) -> Self {
        Self {
            target: None,
            is_intersecting: None,
            ratio: Some(ratio),
        }
    }

    /// Restricts the entry to registrations of `target`.
    #[must_use]
    pub fn for_target(mut self, target: E) -> Self {
        self.target = Some(target);
        self
    }

    fn normalize(&self, target: E, time: u64) -> IntersectionEntry<E> {
        let is_intersecting = self
            .is_intersecting
            .unwrap_or_else(|| self.ratio.is_some_and(|r| r > 0.0));
        let mut entry = IntersectionEntry::signal(target, is_intersecting);
        if let Some(ratio) = self.ratio {
            entry.intersection_ratio = ratio;
        }
        entry.time = time;
        entry
    }
}

#[derive(Debug)]
struct Slot<E, R> {
    options: WatchOptions<R>,
    targets: Vec<E>,
    records: Vec<IntersectionEntry<E>>,
}

#[derive(Debug)]
struct Registry<E, R> {
    watchers: HashMap<u64, Slot<E, R>>,
    detached_roots: Vec<R>,
    next_id: u64,
    created: usize,
    clock: u64,
    available: bool,
}

/// Shared handle to a simulated environment.
#[derive(Debug)]
pub struct SimulatedEnvironment<E, R> {
    shared: Rc<RefCell<Registry<E, R>>>,
}

impl<E, R> Clone for SimulatedEnvironment<E, R> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<E, R> Default for SimulatedEnvironment<E, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, R> SimulatedEnvironment<E, R> {
    /// Creates an environment that can create watchers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Rc::new(RefCell::new(Registry {
                watchers: HashMap::new(),
                detached_roots: Vec::new(),
                next_id: 0,
                created: 0,
                clock: 0,
                available: true,
            })),
        }
    }

    /// Controls whether [`create`](WatcherFactory::create) succeeds.
    pub fn set_available(&self, available: bool) {
        self.shared.borrow_mut().available = available;
    }

    /// Makes watchers rooted at `root` fail with [`WatchError::UnresolvedRoot`].
    pub fn detach_root(&self, root: R) {
        self.shared.borrow_mut().detached_roots.push(root);
    }

    /// Number of watchers that exist and have not been dropped.
    #[must_use]
    pub fn live_watchers(&self) -> usize {
        self.shared.borrow().watchers.len()
    }

    /// Total number of watchers ever created.
    #[must_use]
    pub fn created(&self) -> usize {
        self.shared.borrow().created
    }

    /// Total number of registrations across live watchers.
    #[must_use]
    pub fn observation_count(&self) -> usize {
        self.shared
            .borrow()
            .watchers
            .values()
            .map(|slot| slot.targets.len())
            .sum()
    }

    /// Total number of queued, undrained entries.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.shared
            .borrow()
            .watchers
            .values()
            .map(|slot| slot.records.len())
            .sum()
    }
}

impl<E: Clone + PartialEq, R: Clone> SimulatedEnvironment<E, R> {
    /// Targets registered on live watchers.
    #[must_use]
    pub fn observed_targets(&self) -> Vec<E> {
        self.shared
            .borrow()
            .watchers
            .values()
            .flat_map(|slot| slot.targets.iter().cloned())
            .collect()
    }

    /// Options of live watchers.
    #[must_use]
    pub fn live_options(&self) -> Vec<WatchOptions<R>> {
        self.shared
            .borrow()
            .watchers
            .values()
            .map(|slot| slot.options.clone())
            .collect()
    }

    /// Queues `entry` on every matching registration.
    ///
    /// Returns the number of registrations that received it; `0` means no
    /// live watcher observes a matching target.
    pub fn simulate(&self, entry: SimulatedEntry<E>) -> usize {
        let mut registry = self.shared.borrow_mut();
        registry.clock += 1;
        let time = registry.clock;
        let mut delivered = 0;
        for slot in registry.watchers.values_mut() {
            for target in &slot.targets {
                if entry.target.as_ref().is_none_or(|t| t == target) {
                    slot.records.push(entry.normalize(target.clone(), time));
                    delivered += 1;
                }
            }
        }
        delivered
    }
}

impl<E, R> WatcherFactory for SimulatedEnvironment<E, R>
where
    E: Clone + PartialEq + Debug,
    R: Clone + PartialEq + Debug,
{
    type Root = R;
    type Watcher = SimulatedWatcher<E, R>;

    fn create(&mut self, options: &WatchOptions<R>) -> Result<Self::Watcher, WatchError> {
        let mut registry = self.shared.borrow_mut();
        if !registry.available {
            return Err(WatchError::Unavailable);
        }
        if let Root::Element(root) = options.root()
            && registry.detached_roots.contains(root)
        {
            return Err(WatchError::UnresolvedRoot);
        }
        let id = registry.next_id;
        registry.next_id += 1;
        registry.created += 1;
        registry.watchers.insert(
            id,
            Slot {
                options: options.clone(),
                targets: Vec::new(),
                records: Vec::new(),
            },
        );
        drop(registry);
        Ok(SimulatedWatcher {
            id,
            shared: Rc::clone(&self.shared),
        })
    }
}

/// Watcher created by a [`SimulatedEnvironment`].
///
/// Dropping it releases its registry slot.
#[derive(Debug)]
pub struct SimulatedWatcher<E, R> {
    id: u64,
    shared: Rc<RefCell<Registry<E, R>>>,
}

impl<E, R> SimulatedWatcher<E, R> {
    fn with_slot<T>(&self, f: impl FnOnce(&mut Slot<E, R>) -> T) -> Option<T> {
        self.shared.borrow_mut().watchers.get_mut(&self.id).map(f)
    }
}

impl<E: Clone + PartialEq + Debug, R> IntersectionWatcher for SimulatedWatcher<E, R> {
    type Element = E;

    fn observe(&mut self, target: E) {
        self.with_slot(|slot| {
            if !slot.targets.contains(&target) {
                slot.targets.push(target);
            }
        });
    }

    fn unobserve(&mut self, target: &E) {
        self.with_slot(|slot| {
            slot.targets.retain(|t| t != target);
            slot.records.retain(|r| r.target != *target);
        });
    }

    fn disconnect(&mut self) {
        self.with_slot(|slot| {
            slot.targets.clear();
            slot.records.clear();
        });
    }

    fn is_observing(&self, target: &E) -> bool {
        self.with_slot(|slot| slot.targets.contains(target))
            .unwrap_or_default()
    }

    fn take_records(&mut self) -> Vec<IntersectionEntry<E>> {
        self.with_slot(|slot| core::mem::take(&mut slot.records))
            .unwrap_or_default()
    }
}

impl<E, R> Drop for SimulatedWatcher<E, R> {
    fn drop(&mut self) {
        self.shared.borrow_mut().watchers.remove(&self.id);
    }
}
