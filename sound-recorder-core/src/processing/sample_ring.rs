/// Bounded circular queue of audio samples.
///
/// Shared between the device callback and the processing thread; wrap
/// in `Arc<parking_lot::Mutex<SampleRing>>` for cross-thread access.
///
/// Overflow drops the oldest samples so the queue always holds the most
/// recent audio. `push` reports how many samples were lost.
#[derive(Debug)]
pub struct SampleRing {
    data: Box<[f32]>,
    head: usize,
    len: usize,
}

impl SampleRing {
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "sample ring capacity must be non-zero");
        Self {
            data: vec![0.0; capacity].into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    /// Append samples, evicting the oldest on overflow.
    ///
    /// Returns the number of samples dropped (from the incoming slice
    /// if it exceeds capacity outright, otherwise from the queue head).
    pub fn push(&mut self, samples: &[f32]) -> usize {
        let cap = self.data.len();
        let mut dropped = 0;

        let mut src = samples;
        if src.len() > cap {
            dropped += src.len() - cap;
            src = &src[src.len() - cap..];
        }
        if src.is_empty() {
            return dropped;
        }

        let overflow = (self.len + src.len()).saturating_sub(cap);
        if overflow > 0 {
            self.head = (self.head + overflow) % cap;
            self.len -= overflow;
            dropped += overflow;
        }

        let write = (self.head + self.len) % cap;
        let first = (cap - write).min(src.len());
        self.data[write..write + first].copy_from_slice(&src[..first]);
        if first < src.len() {
            self.data[..src.len() - first].copy_from_slice(&src[first..]);
        }
        self.len += src.len();
        dropped
    }

    /// Remove and return up to `count` samples, oldest first.
    pub fn pop(&mut self, count: usize) -> Vec<f32> {
        let take = count.min(self.len);
        if take == 0 {
            return Vec::new();
        }

        let cap = self.data.len();
        let mut out = Vec::with_capacity(take);
        let first = (cap - self.head).min(take);
        out.extend_from_slice(&self.data[self.head..self.head + first]);
        if first < take {
            out.extend_from_slice(&self.data[..take - first]);
        }
        self.head = (self.head + take) % cap;
        self.len -= take;
        out
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_pop_in_order() {
        let mut ring = SampleRing::with_capacity(8);
        assert_eq!(ring.push(&[1.0, 2.0, 3.0]), 0);

        assert_eq!(ring.len(), 3);
        assert_eq!(ring.pop(3), vec![1.0, 2.0, 3.0]);
        assert!(ring.is_empty());
    }

    #[test]
    fn pop_more_than_available() {
        let mut ring = SampleRing::with_capacity(8);
        ring.push(&[1.0, 2.0]);

        assert_eq!(ring.pop(5), vec![1.0, 2.0]);
        assert!(ring.pop(5).is_empty());
    }

    #[test]
    fn overflow_evicts_oldest_and_reports_drops() {
        let mut ring = SampleRing::with_capacity(4);
        ring.push(&[1.0, 2.0, 3.0, 4.0]);

        assert_eq!(ring.push(&[5.0, 6.0]), 2);
        assert_eq!(ring.pop(4), vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn push_larger_than_capacity_keeps_tail() {
        let mut ring = SampleRing::with_capacity(3);
        assert_eq!(ring.push(&[1.0, 2.0, 3.0, 4.0, 5.0]), 2);

        assert_eq!(ring.pop(3), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn wraparound_preserves_order() {
        let mut ring = SampleRing::with_capacity(4);
        ring.push(&[1.0, 2.0, 3.0]);
        ring.pop(2);
        ring.push(&[4.0, 5.0, 6.0]);

        assert_eq!(ring.len(), 4);
        assert_eq!(ring.pop(4), vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn clear_empties_queue() {
        let mut ring = SampleRing::with_capacity(4);
        ring.push(&[1.0, 2.0]);
        ring.clear();

        assert!(ring.is_empty());
        assert!(ring.pop(4).is_empty());
        assert_eq!(ring.capacity(), 4);
    }

    #[test]
    fn empty_push_is_a_no_op() {
        let mut ring = SampleRing::with_capacity(4);
        assert_eq!(ring.push(&[]), 0);
        assert!(ring.is_empty());
    }
}
