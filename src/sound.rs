use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use log::warn;

/// A 440 Hz sine stream that follows the sound timer: playing while
/// the timer is nonzero, paused otherwise. A machine with no audio
/// output degrades to silence instead of refusing to start.
pub struct Sound {
    stream: Option<cpal::Stream>,
    playing: bool,
}

impl Sound {
    pub fn new() -> Self {
        let stream = match Self::build_stream() {
            Ok(stream) => Some(stream),
            Err(err) => {
                warn!("audio unavailable, running silent: {err:#}");
                None
            }
        };
        Self {
            stream,
            playing: false,
        }
    }

    pub fn set_active(&mut self, on: bool) {
        if on == self.playing {
            return;
        }
        if let Some(stream) = &self.stream {
            let toggled = if on {
                stream.play().map_err(anyhow::Error::from)
            } else {
                stream.pause().map_err(anyhow::Error::from)
            };
            if let Err(err) = toggled {
                warn!("audio toggle failed: {err}");
            }
        }
        self.playing = on;
    }

    fn build_stream() -> anyhow::Result<cpal::Stream> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("no output device available")?;
        let config = device
            .supported_output_configs()?
            .next()
            .context("no supported output config")?
            .with_max_sample_rate();
        let sample_format = config.sample_format();
        let config = config.into();

        match sample_format {
            cpal::SampleFormat::I8 => Self::make_stream::<i8>(&device, &config),
            cpal::SampleFormat::I16 => Self::make_stream::<i16>(&device, &config),
            cpal::SampleFormat::I32 => Self::make_stream::<i32>(&device, &config),
            cpal::SampleFormat::I64 => Self::make_stream::<i64>(&device, &config),
            cpal::SampleFormat::U8 => Self::make_stream::<u8>(&device, &config),
            cpal::SampleFormat::U16 => Self::make_stream::<u16>(&device, &config),
            cpal::SampleFormat::U32 => Self::make_stream::<u32>(&device, &config),
            cpal::SampleFormat::U64 => Self::make_stream::<u64>(&device, &config),
            cpal::SampleFormat::F32 => Self::make_stream::<f32>(&device, &config),
            cpal::SampleFormat::F64 => Self::make_stream::<f64>(&device, &config),
            sample_format => anyhow::bail!("unsupported sample format '{sample_format}'"),
        }
    }

    fn make_stream<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
    ) -> anyhow::Result<cpal::Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;

        // sinusoid of maximum amplitude
        let mut sample_clock = 0f32;
        let mut next_value = move || {
            sample_clock = (sample_clock + 1.0) % sample_rate;
            (sample_clock * 440.0 * 2.0 * std::f32::consts::PI / sample_rate).sin()
        };

        let err_fn = |err| warn!("audio stream error: {err}");

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                Self::write_data(data, channels, &mut next_value)
            },
            err_fn,
            None,
        )?;
        // streams come up running on some hosts, start parked
        stream.pause()?;
        Ok(stream)
    }

    fn write_data<T>(output: &mut [T], channels: usize, next_sample: &mut dyn FnMut() -> f32)
    where
        T: Sample + FromSample<f32>,
    {
        for frame in output.chunks_mut(channels) {
            let value: T = T::from_sample(next_sample());
            for sample in frame.iter_mut() {
                *sample = value;
            }
        }
    }
}
