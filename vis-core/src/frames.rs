use crate::analyzer::FeatureSnapshot;
use crate::{extractor, snapshot};
use std::sync::{atomic, Arc};
use std::time;

#[derive(Debug, Clone)]
pub struct Frame {
    pub time: f32,
    pub frame: usize,
    snapshot: Option<Arc<FeatureSnapshot>>,
}

impl Frame {
    /// The snapshot current at the start of this frame, `None` while capture is inactive
    pub fn snapshot(&self) -> Option<&FeatureSnapshot> {
        self.snapshot.as_deref()
    }

    pub fn info<F, O>(&self, f: F) -> O
    where
        F: FnOnce(Option<&FeatureSnapshot>) -> O,
    {
        f(self.snapshot())
    }
}

/// Cancellation token for a frame loop
///
/// Cloneable and thread-safe, so a signal handler or another thread can end the loop.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<atomic::AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, atomic::Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(atomic::Ordering::SeqCst)
    }
}

/// The per-frame loop
///
/// Every [`advance`](#method.advance) runs one extractor tick and then hands out the latest
/// snapshot, so analysis and drawing share a single timeline.
#[derive(Debug)]
pub struct Frames {
    extractor: extractor::FeatureExtractor,
    info: snapshot::Subscriber,
    stop: StopHandle,
    start_time: time::Instant,
    frame: usize,
}

impl Frames {
    pub fn new(extractor: extractor::FeatureExtractor, info: snapshot::Subscriber) -> Frames {
        Frames {
            extractor,
            info,
            stop: StopHandle::default(),
            start_time: time::Instant::now(),
            frame: 0,
        }
    }

    pub fn extractor(&self) -> &extractor::FeatureExtractor {
        &self.extractor
    }

    pub fn extractor_mut(&mut self) -> &mut extractor::FeatureExtractor {
        &mut self.extractor
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    /// Tick the extractor and produce the next frame
    ///
    /// Once stopped, no further ticks run and the frame carries no snapshot.
    pub fn advance(&mut self) -> Frame {
        let snapshot = if self.stop.is_stopped() {
            None
        } else {
            self.extractor.tick();
            self.info.latest()
        };

        let frame = self.frame;
        self.frame += 1;

        Frame {
            time: crate::helpers::time(self.start_time),
            frame,
            snapshot,
        }
    }

    pub fn iter<'a>(&'a mut self) -> FramesIter<'a> {
        FramesIter { frames: self }
    }
}

#[derive(Debug)]
pub struct FramesIter<'a> {
    frames: &'a mut Frames,
}

impl<'a> Iterator for FramesIter<'a> {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.frames.is_stopped() {
            return None;
        }

        Some(self.frames.advance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analyzer, recorder};

    #[derive(Debug)]
    struct Loud(analyzer::SampleBuffer);

    impl recorder::Recorder for Loud {
        fn sample_buffer<'a>(&'a self) -> &'a analyzer::SampleBuffer {
            &self.0
        }
    }

    fn frames() -> Frames {
        crate::Visualizer::new()
            .recorder({
                let mut r = recorder::RecorderBuilder::new();
                r.buffer_size(1024).recorder("none");
                r
            })
            .analyser({
                let mut a = analyzer::AnalyserBuilder::new();
                a.fft_size(64)
                    .window(analyzer::window::none)
                    .smoothing(0.0)
                    .decibels(-100.0, -30.0);
                a
            })
            .frames()
    }

    #[test]
    fn test_idle_frames() {
        let mut frames = frames();

        for (i, frame) in frames.iter().take(3).enumerate() {
            assert_eq!(frame.frame, i);
            assert!(frame.snapshot().is_none());
        }
    }

    #[test]
    fn test_active_frames() {
        let mut frames = frames();
        frames
            .extractor_mut()
            .activate_with(|| {
                let buf = analyzer::SampleBuffer::new(1024, 8000);
                buf.push(&[[0.5; 2]; 1024]);
                Ok(Box::new(Loud(buf)))
            })
            .unwrap();

        let frame = frames.advance();
        let volume = frame.info(|s| s.map(|s| s.volume));

        assert_eq!(frame.snapshot().unwrap().bins(), 32);
        assert!(volume.unwrap() > 0.0);

        frames.extractor_mut().deactivate();
        assert!(frames.advance().snapshot().is_none());
    }

    #[test]
    fn test_stop_handle() {
        let mut frames = frames();
        let stop = frames.stop_handle();

        let mut count = 0;
        for frame in frames.iter() {
            count += 1;
            if frame.frame == 4 {
                stop.stop();
            }
        }

        assert_eq!(count, 5);
        assert!(frames.is_stopped());
        assert!(frames.iter().next().is_none());
    }

    #[test]
    fn test_time_monotonic() {
        let mut frames = frames();

        let a = frames.advance();
        let b = frames.advance();

        assert!(b.time >= a.time);
        assert_eq!(b.frame, a.frame + 1);
    }
}
