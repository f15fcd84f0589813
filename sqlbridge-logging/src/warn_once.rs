use std::{
    collections::{HashSet, VecDeque},
    sync::Mutex,
};

use lazy_static::lazy_static;
use log::warn;

/// Default number of distinct messages remembered by the process-wide set
pub const DEFAULT_WARN_ONCE_CAPACITY: usize = 1024;

lazy_static! {
    static ref WARNED: WarnOnce = WarnOnce::new(DEFAULT_WARN_ONCE_CAPACITY);
}

/// Emits each distinct warning message only once.
///
/// Messages are compared by exact text. At most `capacity` messages are
/// remembered, once full the oldest is forgotten and may be emitted again.
pub struct WarnOnce {
    capacity: usize,
    seen: Mutex<Seen>,
}

#[derive(Default)]
struct Seen {
    set: HashSet<String>,
    order: VecDeque<String>,
}

impl WarnOnce {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            seen: Mutex::new(Seen::default()),
        }
    }

    /// Records the message, returning true if it has not been seen before
    pub fn check(&self, msg: &str) -> bool {
        let mut seen = match self.seen.lock() {
            Ok(seen) => seen,
            Err(poisoned) => poisoned.into_inner(),
        };

        if seen.set.contains(msg) {
            return false;
        }

        if seen.order.len() >= self.capacity {
            if let Some(oldest) = seen.order.pop_front() {
                seen.set.remove(&oldest);
            }
        }

        seen.set.insert(msg.to_string());
        seen.order.push_back(msg.to_string());
        true
    }

    /// Logs the warning unless the same text was already logged
    pub fn warn(&self, msg: &str) -> bool {
        let emit = self.check(msg);
        if emit {
            warn!("{}", msg);
        }
        emit
    }

    /// Number of messages currently remembered
    pub fn len(&self) -> usize {
        match self.seen.lock() {
            Ok(seen) => seen.order.len(),
            Err(poisoned) => poisoned.into_inner().order.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Logs the warning through the process-wide deduplication set.
///
/// Returns whether the warning was emitted.
pub fn warn_once(msg: impl AsRef<str>) -> bool {
    WARNED.warn(msg.as_ref())
}
