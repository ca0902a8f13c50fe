use crate::analyzer;
use crate::recorder;

/// Builder wiring a recorder and an analysis engine into a frame loop
#[derive(Debug, Default)]
pub struct Visualizer {
    pub analyser: Option<analyzer::AnalyserBuilder>,
    pub recorder: Option<recorder::RecorderBuilder>,
}

impl Visualizer {
    pub fn new() -> Visualizer {
        Default::default()
    }

    pub fn analyser(mut self, a: analyzer::AnalyserBuilder) -> Visualizer {
        self.analyser = Some(a);
        self
    }

    pub fn recorder(mut self, r: recorder::RecorderBuilder) -> Visualizer {
        self.recorder = Some(r);
        self
    }

    /// Build the frame loop, capture starts inactive
    pub fn frames(self) -> crate::Frames {
        let (publisher, subscriber) = crate::snapshot::channel();
        let extractor = crate::FeatureExtractor::new(
            self.recorder.unwrap_or_default(),
            self.analyser.unwrap_or_default(),
            publisher,
        );

        crate::Frames::new(extractor, subscriber)
    }
}
