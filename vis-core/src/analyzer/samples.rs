//! Sample Buffer
use std::collections;
use std::sync;

pub type Sample = f32;

type Ring = sync::Arc<parking_lot::Mutex<collections::VecDeque<[Sample; 2]>>>;

/// Fixed-size ring of the most recent stereo samples
///
/// The capture callback pushes into it from its own thread, the analysis engine copies
/// out the tail on the frame-loop thread.  Clones share the same storage.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    ring: Ring,
    rate: usize,
}

impl SampleBuffer {
    /// Buffer of `size` silent samples
    pub fn new(size: usize, rate: usize) -> SampleBuffer {
        let ring = collections::VecDeque::from(vec![[0.0; 2]; size]);

        SampleBuffer {
            ring: sync::Arc::new(parking_lot::Mutex::new(ring)),
            rate,
        }
    }

    /// Sample rate of the captured data
    #[inline]
    pub fn rate(&self) -> usize {
        self.rate
    }

    /// Capacity, which never changes
    pub fn len(&self) -> usize {
        self.ring.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append samples, dropping the oldest ones
    pub fn push(&self, new: &[[Sample; 2]]) {
        let mut ring = self.ring.lock();
        let capacity = ring.len();
        let new = &new[new.len().saturating_sub(capacity)..];

        ring.drain(..new.len());
        ring.extend(new.iter().copied());

        debug_assert_eq!(capacity, ring.len());
    }

    /// Copy the newest `out.len()` samples, downmixed to mono, into `out`
    ///
    /// If the buffer holds fewer samples, the front of `out` is padded with silence.
    pub fn fill_mono(&self, out: &mut [Sample]) {
        let ring = self.ring.lock();
        let pad = out.len().saturating_sub(ring.len());
        let start = ring.len() - (out.len() - pad);

        let (silence, data) = out.split_at_mut(pad);
        for o in silence.iter_mut() {
            *o = 0.0;
        }
        for (o, [l, r]) in data.iter_mut().zip(ring.range(start..)) {
            *o = (l + r) / 2.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(range: std::ops::Range<usize>) -> Vec<[Sample; 2]> {
        range.map(|i| [i as Sample, i as Sample]).collect()
    }

    fn mono(buf: &SampleBuffer, n: usize) -> Vec<Sample> {
        let mut out = vec![-1.0; n];
        buf.fill_mono(&mut out);
        out
    }

    #[test]
    fn test_simple() {
        let buf = SampleBuffer::new(16, 8000);

        buf.push(&[[1.0; 2]; 8]);

        assert_eq!(buf.len(), 16);
        assert_eq!(mono(&buf, 16).iter().filter(|s| **s == 1.0).count(), 8);
        assert_eq!(&mono(&buf, 16)[8..], &[1.0; 8]);
    }

    #[test]
    fn test_overflow() {
        let buf = SampleBuffer::new(16, 8000);

        buf.push(&ramp(100..120));
        buf.push(&ramp(0..32));

        assert_eq!(buf.len(), 16);
        assert_eq!(
            mono(&buf, 16),
            (16..32).map(|i| i as Sample).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_tail() {
        let buf = SampleBuffer::new(32, 8000);

        buf.push(&ramp(0..32));

        assert_eq!(mono(&buf, 4), vec![28.0, 29.0, 30.0, 31.0]);
    }

    #[test]
    fn test_oversized_request() {
        let buf = SampleBuffer::new(4, 8000);
        buf.push(&ramp(1..5));

        assert_eq!(mono(&buf, 6), vec![0.0, 0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_downmix() {
        let buf = SampleBuffer::new(8, 8000);
        buf.push(&[[1.0, 0.0], [0.5, -0.5], [-1.0, -1.0]]);

        assert_eq!(mono(&buf, 3), vec![0.5, 0.0, -1.0]);
    }

    #[test]
    fn test_shared() {
        let buf = SampleBuffer::new(8, 44100);
        let writer = buf.clone();

        std::thread::spawn(move || writer.push(&[[0.25; 2]; 2]))
            .join()
            .unwrap();

        assert_eq!(buf.rate(), 44100);
        assert_eq!(mono(&buf, 2), vec![0.25, 0.25]);
    }
}
