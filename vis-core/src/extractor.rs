//! Feature Extractor
//!
//! Owns the capture session and publishes one [`FeatureSnapshot`] per tick.
//!
//! [`FeatureSnapshot`]: ../analyzer/features/struct.FeatureSnapshot.html
use crate::analyzer::{self, FeatureSnapshot};
use crate::recorder::{self, CaptureError};
use crate::snapshot;
use std::sync::Arc;

/// Microphone stream plus the analysis engine reading from it
#[derive(Debug)]
struct CaptureSession {
    recorder: Box<dyn recorder::Recorder>,
    analyser: analyzer::FrequencyAnalyser,
}

#[derive(Debug)]
pub struct FeatureExtractor {
    recorder: recorder::RecorderBuilder,
    analyser: analyzer::AnalyserBuilder,
    publisher: snapshot::Publisher,
    session: Option<CaptureSession>,
}

impl FeatureExtractor {
    pub fn new(
        recorder: recorder::RecorderBuilder,
        analyser: analyzer::AnalyserBuilder,
        publisher: snapshot::Publisher,
    ) -> FeatureExtractor {
        FeatureExtractor {
            recorder,
            analyser,
            publisher,
            session: None,
        }
    }

    /// Whether a capture session is running
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Open the configured input device and start analysing
    ///
    /// A no-op while already active.  On failure no session is left behind and the
    /// extractor stays inactive.
    pub fn activate(&mut self) -> Result<(), CaptureError> {
        let builder = self.recorder.clone();
        self.activate_with(move || builder.build())
    }

    /// Like [`activate`](#method.activate) but with a custom way of opening the recorder
    pub fn activate_with<F>(&mut self, open: F) -> Result<(), CaptureError>
    where
        F: FnOnce() -> Result<Box<dyn recorder::Recorder>, CaptureError>,
    {
        if self.session.is_some() {
            log::debug!("Capture already active");
            return Ok(());
        }

        let recorder = open().map_err(|e| {
            log::error!("Can't start capture: {}", e);
            e
        })?;
        let analyser = self.analyser.plan();

        log::info!(
            "Capture started ({} Hz, {} bins)",
            recorder.sample_buffer().rate(),
            analyser.bins()
        );

        self.session = Some(CaptureSession { recorder, analyser });
        Ok(())
    }

    /// Stop capture and clear the published snapshot
    ///
    /// Safe to call in any state, any number of times.  Failures while releasing the
    /// device are logged and otherwise ignored.
    pub fn deactivate(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.recorder.stop() {
                log::warn!("{}", e);
            }
            log::info!("Capture stopped");
        }

        self.publisher.clear();
    }

    /// React to the surrounding program's "should capture" flag
    pub fn set_active(&mut self, active: bool) -> Result<(), CaptureError> {
        match (active, self.is_active()) {
            (true, false) => self.activate(),
            (false, true) => {
                self.deactivate();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Run one analysis tick
    ///
    /// Returns the published snapshot, or `None` while inactive.
    pub fn tick(&mut self) -> Option<Arc<FeatureSnapshot>> {
        let session = self.session.as_mut()?;

        session.analyser.analyze(session.recorder.sample_buffer());
        let snapshot = analyzer::extract(
            session.analyser.frequency_bins(),
            session.analyser.time_bins(),
        );
        log::trace!(
            "Features: vol={:.3} bass={:.3} mid={:.3} treble={:.3}",
            snapshot.volume,
            snapshot.bass,
            snapshot.mid,
            snapshot.treble
        );

        Some(self.publisher.publish(snapshot))
    }
}

impl Drop for FeatureExtractor {
    fn drop(&mut self) {
        self.deactivate();
    }
}
