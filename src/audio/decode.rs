use std::io::Cursor;

use serde::{Deserialize, Serialize};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::pcm::{RawAudioBuffer, DEFAULT_SAMPLE_RATE};
use crate::error::SourceError;

/// Turns the bytes of an audio source into interleaved stereo i16 PCM.
pub trait PcmDecoder {
    /// `extension` is a file-type hint such as `"mp3"`, when known.
    fn decode(&self, bytes: &[u8], extension: Option<&str>) -> Result<RawAudioBuffer, SourceError>;
}

/// Container/codec decoding through symphonia.
///
/// Mono streams are duplicated into both channels; channels past the
/// second are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaDecoder;

impl PcmDecoder for SymphoniaDecoder {
    fn decode(&self, bytes: &[u8], extension: Option<&str>) -> Result<RawAudioBuffer, SourceError> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = extension {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe().format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(SourceError::NoTrack)?;

        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate;

        let mut decoder =
            symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

        let mut interleaved: Vec<i16> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
                Err(e) => return Err(e.into()),
            };

            let spec = *decoded.spec();
            let channels = spec.channels.count().max(1);
            if sample_rate.is_none() {
                sample_rate = Some(spec.rate);
            }

            let mut sample_buf = SampleBuffer::<i16>::new(decoded.frames() as u64, spec);
            sample_buf.copy_interleaved_ref(decoded);

            for frame in sample_buf.samples().chunks_exact(channels) {
                let left = frame[0];
                let right = if channels > 1 { frame[1] } else { left };
                interleaved.push(left);
                interleaved.push(right);
            }
        }

        let sample_rate = sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE);
        let buffer = RawAudioBuffer::new(interleaved, sample_rate);
        log::debug!(
            "Decoded audio: {} frames, {}Hz, {:.1}s",
            buffer.samples().len() / 2,
            sample_rate,
            buffer.duration_seconds()
        );

        Ok(buffer)
    }
}

/// Reads bytes as interleaved little-endian i16 stereo at a fixed rate.
#[derive(Debug, Clone, Copy)]
pub struct RawPcmDecoder {
    pub sample_rate: u32,
}

impl Default for RawPcmDecoder {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl PcmDecoder for RawPcmDecoder {
    fn decode(&self, bytes: &[u8], _extension: Option<&str>) -> Result<RawAudioBuffer, SourceError> {
        Ok(RawAudioBuffer::from_le_bytes(bytes, self.sample_rate))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Decode with symphonia, falling back to raw PCM if that fails
    #[default]
    Auto,
    /// Decode with symphonia only
    Decode,
    /// Treat the bytes as raw 16-bit little-endian stereo PCM
    Raw,
}

/// Decode `bytes` according to `mode`. An explicit `sample_rate` overrides
/// whatever the stream reports.
pub fn decode_pcm(
    bytes: &[u8],
    extension: Option<&str>,
    mode: DecodeMode,
    sample_rate: Option<u32>,
) -> Result<RawAudioBuffer, SourceError> {
    let raw = RawPcmDecoder {
        sample_rate: sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE),
    };

    let buffer = match mode {
        DecodeMode::Raw => raw.decode(bytes, extension)?,
        DecodeMode::Decode => SymphoniaDecoder.decode(bytes, extension)?,
        DecodeMode::Auto => match SymphoniaDecoder.decode(bytes, extension) {
            Ok(buffer) => buffer,
            Err(err) => {
                log::warn!("{}; reading bytes as raw 16-bit stereo PCM", err);
                raw.decode(bytes, extension)?
            }
        },
    };

    Ok(match sample_rate {
        Some(rate) => buffer.with_sample_rate(rate),
        None => buffer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal 16-bit PCM WAV file.
    fn wav_bytes(channels: u16, sample_rate: u32, samples: &[i16]) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let block_align = channels * 2;
        let mut out = Vec::with_capacity(44 + data_len as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * u32::from(block_align)).to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for s in samples {
            out.extend_from_slice(&s.to_le_bytes());
        }
        out
    }

    #[test]
    fn raw_mode_reads_bytes_verbatim() {
        let buffer = decode_pcm(&[0x02, 0x00, 0xfe, 0xff], None, DecodeMode::Raw, None).unwrap();
        assert_eq!(buffer.samples(), &[2, -2]);
        assert_eq!(buffer.sample_rate(), DEFAULT_SAMPLE_RATE);
    }

    #[test]
    fn stereo_wav_is_decoded_with_its_rate() {
        let samples: Vec<i16> = (0..2000).map(|i| (i % 200) as i16 * 10).collect();
        let wav = wav_bytes(2, 48_000, &samples);
        let buffer = decode_pcm(&wav, Some("wav"), DecodeMode::Decode, None).unwrap();
        assert_eq!(buffer.sample_rate(), 48_000);
        assert_eq!(buffer.samples(), samples.as_slice());
    }

    #[test]
    fn mono_wav_is_duplicated_to_stereo() {
        let wav = wav_bytes(1, 44_100, &[5, -7, 9]);
        let buffer = SymphoniaDecoder.decode(&wav, Some("wav")).unwrap();
        assert_eq!(buffer.samples(), &[5, 5, -7, -7, 9, 9]);
    }

    #[test]
    fn explicit_rate_overrides_stream_rate() {
        let wav = wav_bytes(2, 48_000, &[1, 1, 2, 2]);
        let buffer = decode_pcm(&wav, Some("wav"), DecodeMode::Auto, Some(22_050)).unwrap();
        assert_eq!(buffer.sample_rate(), 22_050);
    }

    #[test]
    fn decode_mode_rejects_garbage() {
        let junk = vec![0x42u8; 512];
        assert!(decode_pcm(&junk, None, DecodeMode::Decode, None).is_err());
    }

    #[test]
    fn auto_mode_falls_back_to_raw() {
        let junk = vec![0x42u8; 512];
        let buffer = decode_pcm(&junk, None, DecodeMode::Auto, None).unwrap();
        assert_eq!(buffer.samples().len(), 256);
        assert!(buffer.samples().iter().all(|&s| s == 0x4242));
    }
}
