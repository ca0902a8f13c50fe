//! Latest-value hand-off between extractor and renderer
//!
//! A triple buffer holding `Option<Arc<FeatureSnapshot>>`.  The writer replaces the whole
//! value, the reader always sees a complete one.  Nothing queues up: a snapshot that is
//! not read before the next publish is dropped.
use crate::analyzer::FeatureSnapshot;
use std::sync::Arc;

type Slot = Option<Arc<FeatureSnapshot>>;

/// Create a connected publisher/subscriber pair, initially holding no snapshot
pub fn channel() -> (Publisher, Subscriber) {
    let (input, output) = triple_buffer::TripleBuffer::<Slot>::default().split();

    (Publisher { input }, Subscriber { output })
}

pub struct Publisher {
    input: triple_buffer::Input<Slot>,
}

impl Publisher {
    /// Replace the current snapshot
    pub fn publish(&mut self, snapshot: FeatureSnapshot) -> Arc<FeatureSnapshot> {
        let snapshot = Arc::new(snapshot);
        self.input.write(Some(snapshot.clone()));
        snapshot
    }

    /// Replace the current snapshot with "none"
    pub fn clear(&mut self) {
        self.input.write(None);
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Publisher({:p})", self)
    }
}

pub struct Subscriber {
    output: triple_buffer::Output<Slot>,
}

impl Subscriber {
    /// The most recently published snapshot
    pub fn latest(&mut self) -> Option<Arc<FeatureSnapshot>> {
        self.output.read().clone()
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Subscriber({:p})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer;

    #[test]
    fn test_initially_empty() {
        let (_, mut sub) = channel();

        assert!(sub.latest().is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let (mut publ, mut sub) = channel();

        publ.publish(analyzer::extract(&[0; 8], &[128; 8]));
        let second = publ.publish(analyzer::extract(&[255; 8], &[128; 8]));

        let latest = sub.latest().unwrap();
        assert!(Arc::ptr_eq(&latest, &second));
        assert_eq!(latest.volume, 1.0);
    }

    #[test]
    fn test_old_snapshot_stays_valid() {
        let (mut publ, mut sub) = channel();

        publ.publish(analyzer::extract(&[10; 8], &[128; 8]));
        let held = sub.latest().unwrap();
        publ.publish(analyzer::extract(&[20; 8], &[128; 8]));

        assert_eq!(held.frequency_bins, vec![10; 8]);
        assert_eq!(sub.latest().unwrap().frequency_bins, vec![20; 8]);
    }

    #[test]
    fn test_clear() {
        let (mut publ, mut sub) = channel();

        publ.publish(analyzer::extract(&[10; 8], &[128; 8]));
        publ.clear();

        assert!(sub.latest().is_none());
    }
}
