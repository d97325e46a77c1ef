//! Saved segment list: ordering and the two-step delete confirmations.

use crate::store::SegmentStore;
use crate::types::Segment;

/// Newest first; segments without a timestamp go last. Ties keep storage order.
pub fn sort_by_recency(mut segments: Vec<Segment>) -> Vec<Segment> {
    // Option orders None before Some, so reversing puts undated records at the end
    segments.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    segments
}

/// Delete-all is only offered once there is more than one segment
pub fn can_delete_all(count: usize) -> bool {
    count > 1
}

/// Which delete, if any, is waiting for its second click.
///
/// A single slot: arming one item disarms any other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteConfirm {
    armed_id: Option<String>,
    all_armed: bool,
}

impl DeleteConfirm {
    pub fn is_armed(&self, id: &str) -> bool {
        self.armed_id.as_deref() == Some(id)
    }

    pub fn is_all_armed(&self) -> bool {
        self.all_armed
    }

    pub fn arm(&mut self, id: &str) {
        self.armed_id = Some(id.to_string());
    }

    pub fn disarm(&mut self) {
        self.armed_id = None;
    }

    /// Second click on an item. Deletes only if that item is the armed one.
    pub fn confirm(&mut self, store: &SegmentStore, id: &str) -> bool {
        if !self.is_armed(id) {
            return false;
        }
        self.armed_id = None;
        store.remove(id);
        true
    }

    /// First click on "delete all"; ignored when there is nothing to bulk delete.
    pub fn arm_all(&mut self, count: usize) {
        self.all_armed = can_delete_all(count);
    }

    pub fn disarm_all(&mut self) {
        self.all_armed = false;
    }

    pub fn confirm_all(&mut self, store: &SegmentStore) -> bool {
        if !self.all_armed {
            return false;
        }
        self.all_armed = false;
        self.armed_id = None;
        store.remove_all();
        true
    }
}
