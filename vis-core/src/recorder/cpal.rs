use crate::analyzer;
use crate::recorder::CaptureError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

#[derive(Debug, Default)]
pub struct CPalBuilder {
    pub buffer_size: Option<usize>,
}

impl CPalBuilder {
    pub fn new() -> CPalBuilder {
        Default::default()
    }

    pub fn buffer_size(&mut self, buffer_size: usize) -> &mut CPalBuilder {
        self.buffer_size = Some(buffer_size);
        self
    }

    pub fn create(&self) -> Result<CPalRecorder, CaptureError> {
        CPalRecorder::new(self.buffer_size.unwrap_or(4096))
    }

    pub fn build(&self) -> Result<Box<dyn super::Recorder>, CaptureError> {
        Ok(Box::new(self.create()?))
    }
}

/// Microphone capture from the default input device
pub struct CPalRecorder {
    rate: usize,
    buffer: analyzer::SampleBuffer,
    stream: Option<cpal::Stream>,
}

impl std::fmt::Debug for CPalRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "CPalRecorder {{ rate: {:?}, open: {:?} }}",
            self.rate,
            self.stream.is_some()
        )
    }
}

impl CPalRecorder {
    fn new(buffer_size: usize) -> Result<CPalRecorder, CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or_else(|| {
            CaptureError::DeviceUnavailable(format!("{:?} has no default input", host.id()))
        })?;

        let supported = device.default_input_config().map_err(|e| match e {
            e @ cpal::DefaultStreamConfigError::DeviceNotAvailable => {
                CaptureError::DeviceUnavailable(e.to_string())
            }
            cpal::DefaultStreamConfigError::BackendSpecific { err } => classify(err.description),
            other => CaptureError::DeviceUnavailable(other.to_string()),
        })?;

        let rate = supported.sample_rate().0 as usize;
        let channels = (supported.channels() as usize).max(1);
        let format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();

        log::debug!("CPal:");
        log::debug!(
            "    Device      = {}",
            device.name().unwrap_or_else(|_| "unknown".to_string())
        );
        log::debug!("    Sample Rate = {:6}", rate);
        log::debug!("    Channels    = {:6}", channels);
        log::debug!("    Format      = {:?}", format);
        log::debug!("    Buffer Size = {:6}", buffer_size);

        let buf = analyzer::SampleBuffer::new(buffer_size, rate);

        let stream = match format {
            cpal::SampleFormat::F32 => input_stream::<f32>(&device, &config, channels, &buf),
            cpal::SampleFormat::I16 => input_stream::<i16>(&device, &config, channels, &buf),
            cpal::SampleFormat::U16 => input_stream::<u16>(&device, &config, channels, &buf),
            other => Err(CaptureError::DeviceUnavailable(format!(
                "unsupported sample format {:?}",
                other
            ))),
        }?;

        stream.play().map_err(|e| match e {
            e @ cpal::PlayStreamError::DeviceNotAvailable => {
                CaptureError::DeviceUnavailable(e.to_string())
            }
            cpal::PlayStreamError::BackendSpecific { err } => classify(err.description),
            #[allow(unreachable_patterns)]
            other => CaptureError::DeviceUnavailable(other.to_string()),
        })?;

        Ok(CPalRecorder {
            rate,
            buffer: buf,
            stream: Some(stream),
        })
    }
}

fn input_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    buf: &analyzer::SampleBuffer,
) -> Result<cpal::Stream, CaptureError>
where
    T: cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    use cpal::Sample;

    let buf = buf.clone();
    let mut chunk_buffer = vec![[0.0; 2]; 256];

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                for chunk in data.chunks(chunk_buffer.len() * channels) {
                    let len = chunk.len() / channels;

                    for (b, frame) in chunk_buffer.iter_mut().zip(chunk.chunks_exact(channels)) {
                        let l = frame[0].to_sample::<f32>();
                        let r = frame.get(1).map(|s| s.to_sample::<f32>()).unwrap_or(l);
                        *b = [l, r];
                    }

                    buf.push(&chunk_buffer[..len]);
                }
            },
            |err| log::error!("Input stream error: {}", err),
            None,
        )
        .map_err(|e| match e {
            e @ cpal::BuildStreamError::DeviceNotAvailable => {
                CaptureError::DeviceUnavailable(e.to_string())
            }
            cpal::BuildStreamError::BackendSpecific { err } => classify(err.description),
            other => CaptureError::DeviceUnavailable(other.to_string()),
        })
}

/// Backends report refused permissions as free-form errors
fn classify(description: String) -> CaptureError {
    let lower = description.to_lowercase();
    if ["permission", "denied", "access", "authoriz", "not allowed"]
        .iter()
        .any(|p| lower.contains(p))
    {
        CaptureError::PermissionDenied(description)
    } else {
        CaptureError::DeviceUnavailable(description)
    }
}

impl super::Recorder for CPalRecorder {
    fn sample_buffer<'a>(&'a self) -> &'a analyzer::SampleBuffer {
        &self.buffer
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        match self.stream.take() {
            Some(stream) => {
                log::debug!("Closing input stream");
                stream
                    .pause()
                    .map_err(|e| CaptureError::Release(e.to_string()))
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert!(matches!(
            classify("Access denied by user".into()),
            CaptureError::PermissionDenied(_)
        ));
        assert!(matches!(
            classify("Not authorized to record".into()),
            CaptureError::PermissionDenied(_)
        ));
        assert!(matches!(
            classify("snd_pcm_open failed: No such device".into()),
            CaptureError::DeviceUnavailable(_)
        ));
    }
}
