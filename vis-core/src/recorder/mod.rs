#[cfg(feature = "cpalrecord")]
pub mod cpal;

use crate::analyzer;

/// Why capture could not be started or stopped
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CaptureError {
    /// The platform refused access to the microphone
    #[error("microphone access denied: {0}")]
    PermissionDenied(String),

    /// There is no usable input device
    #[error("no input device available: {0}")]
    DeviceUnavailable(String),

    /// Releasing the stream failed, only ever logged
    #[error("failed to release input stream: {0}")]
    Release(String),
}

pub trait Recorder: std::fmt::Debug {
    /// Return the sample buffer where this recorder pushes data into
    fn sample_buffer<'a>(&'a self) -> &'a analyzer::SampleBuffer;

    /// Stop delivering samples and release the hardware stream
    ///
    /// Must be safe to call more than once.
    fn stop(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecorderBuilder {
    pub buffer_size: Option<usize>,
    pub recorder: Option<String>,
}

impl RecorderBuilder {
    pub fn new() -> RecorderBuilder {
        Default::default()
    }

    pub fn buffer_size(&mut self, buffer_size: usize) -> &mut RecorderBuilder {
        self.buffer_size = Some(buffer_size);
        self
    }

    pub fn recorder<S: Into<String>>(&mut self, rec: S) -> &mut RecorderBuilder {
        self.recorder = Some(rec.into());
        self
    }

    /// Ring size for the recorder, `"audio.buffer"` unless set
    #[cfg_attr(not(feature = "cpalrecord"), allow(dead_code))]
    fn ring_size(&self) -> usize {
        self.buffer_size
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.buffer", 4096))
    }

    /// Open the input device
    ///
    /// This is where the platform may ask the user for permission, so the call can block.
    pub fn build(&self) -> Result<Box<dyn Recorder>, CaptureError> {
        let recorder = self
            .recorder
            .clone()
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.recorder", "cpal".to_string()));

        match &*recorder {
            #[cfg(feature = "cpalrecord")]
            "cpal" => self::cpal::CPalBuilder {
                buffer_size: Some(self.ring_size()),
            }
            .build(),

            other => Err(CaptureError::DeviceUnavailable(format!(
                "recorder {:?} is not available in this build",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_recorder() {
        let err = RecorderBuilder::new()
            .buffer_size(1024)
            .recorder("tape")
            .build()
            .unwrap_err();

        assert!(matches!(err, CaptureError::DeviceUnavailable(_)));
    }

    #[test]
    fn test_explicit_buffer_size() {
        let mut b = RecorderBuilder::new();
        b.buffer_size(2048).recorder("tape");

        assert_eq!(b.ring_size(), 2048);
        assert!(b.build().is_err());
    }

    #[test]
    fn test_error_display() {
        let e = CaptureError::PermissionDenied("user said no".into());

        assert_eq!(e.to_string(), "microphone access denied: user said no");
    }
}
