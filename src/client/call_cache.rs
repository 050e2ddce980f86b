use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

pub(super) const CALL_CACHE_SIZE: usize = 300;

/// Links a command call to the replies the bot sent for it, so deleting the
/// call can take the replies with it. Only the most recent calls are kept.
pub(super) struct CallCache {
    inner: Mutex<Inner>,
    capacity: usize,
}

struct Inner {
    replies: HashMap<u64, Vec<u64>>,
    /// Call ids, oldest first
    order: VecDeque<u64>,
}

impl CallCache {
    pub(super) fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                replies: HashMap::new(),
                order: VecDeque::with_capacity(capacity),
            }),
            capacity,
        }
    }

    pub(super) fn link(&self, call_id: u64, reply_id: u64) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(replies) = inner.replies.get_mut(&call_id) {
            replies.push(reply_id);
            return;
        }
        while inner.order.len() >= self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.replies.remove(&oldest);
                }
                None => break,
            }
        }
        inner.order.push_back(call_id);
        inner.replies.insert(call_id, vec![reply_id]);
    }

    /// Remove a call and return its replies.
    pub(super) fn take(&self, call_id: u64) -> Vec<u64> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match inner.replies.remove(&call_id) {
            Some(replies) => {
                inner.order.retain(|id| *id != call_id);
                replies
            }
            None => Vec::new(),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).order.len()
    }
}
