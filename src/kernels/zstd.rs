// In: src/kernels/zstd.rs

//! Streaming Zstandard codec stages.
//!
//! These are the optional first and last stages of the pipeline. Both wrap
//! the `zstd` crate: compression drains a streaming `Encoder` as chunks
//! arrive, decompression drives the incremental raw decoder so that frame
//! boundaries and chunk boundaries are independent. Each stage holds only a
//! codec context and a bounded scratch buffer; neither ever buffers the
//! whole stream. This module is a safe, panic-free wrapper around the
//! `zstd` crate.

use std::io::Write;
use std::mem;

use zstd::stream::raw::{Decoder as RawDecoder, InBuffer, Operation, OutBuffer};
use zstd::stream::write::Encoder;

use crate::error::CasepipeError;
use crate::pipeline::traits::Stage;

/// Capacity of the decoder's scratch output buffer per inner loop turn.
const DECODE_BUF_SIZE: usize = 64 * 1024;

fn codec_err(e: std::io::Error) -> CasepipeError {
    CasepipeError::Codec(e.to_string())
}

//==================================================================================
// 1. Compression Stage
//==================================================================================

/// Streaming zstd compression. The encoder buffers internally up to its
/// block size; every `process` call drains whatever it has emitted so far.
pub struct ZstdCompressStage {
    // `None` only after `finish`, which consumes the encoder to flush the
    // end-of-frame marker.
    encoder: Option<Encoder<'static, Vec<u8>>>,
}

impl ZstdCompressStage {
    pub fn new(level: i32) -> Result<Self, CasepipeError> {
        let encoder = Encoder::new(Vec::new(), level).map_err(codec_err)?;
        Ok(Self {
            encoder: Some(encoder),
        })
    }
}

impl Stage for ZstdCompressStage {
    fn name(&self) -> &'static str {
        "compress"
    }

    fn process(&mut self, chunk: &[u8]) -> Result<Vec<u8>, CasepipeError> {
        let encoder = self.encoder.as_mut().ok_or_else(|| {
            CasepipeError::Internal("compress stage fed after finish".into())
        })?;
        encoder.write_all(chunk).map_err(codec_err)?;
        Ok(mem::take(encoder.get_mut()))
    }

    fn finish(&mut self) -> Result<Vec<u8>, CasepipeError> {
        let encoder = self.encoder.take().ok_or_else(|| {
            CasepipeError::Internal("compress stage finished twice".into())
        })?;
        // `finish` is essential to finalize the zstd frame.
        encoder.finish().map_err(codec_err)
    }
}

//==================================================================================
// 2. Decompression Stage
//==================================================================================

/// Streaming zstd decompression over arbitrary chunk boundaries.
///
/// Malformed input fails the `process` call that observes it; input that
/// simply stops mid-frame is caught by `finish`, so a truncated stream can
/// never pass for a complete one.
pub struct ZstdDecompressStage {
    decoder: RawDecoder<'static>,
    scratch: Vec<u8>,
    /// True while the decoder is inside an unfinished frame.
    in_frame: bool,
}

impl ZstdDecompressStage {
    pub fn new() -> Result<Self, CasepipeError> {
        let decoder = RawDecoder::new().map_err(codec_err)?;
        Ok(Self {
            decoder,
            scratch: vec![0u8; DECODE_BUF_SIZE],
            in_frame: false,
        })
    }
}

impl Stage for ZstdDecompressStage {
    fn name(&self) -> &'static str {
        "decompress"
    }

    fn process(&mut self, chunk: &[u8]) -> Result<Vec<u8>, CasepipeError> {
        if chunk.is_empty() && !self.in_frame {
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        let mut input = InBuffer::around(chunk);

        // One chunk may span several frames or stop mid-frame, and a single
        // scratch-buffer's worth of output may not drain everything the
        // decoder holds. Keep running until the input is consumed AND the
        // decoder stops filling the scratch buffer.
        loop {
            let consumed_before = input.pos;
            let decoder = &mut self.decoder;
            let mut dst = OutBuffer::around(self.scratch.as_mut_slice());

            let hint = decoder.run(&mut input, &mut dst).map_err(codec_err)?;
            self.in_frame = hint != 0;

            out.extend_from_slice(dst.as_slice());
            let produced = dst.pos();
            let input_done = input.pos >= chunk.len();

            // A completely filled scratch buffer means more output may be
            // pending inside the decoder even with no input left.
            if input_done && produced < DECODE_BUF_SIZE {
                break;
            }
            if !input_done && input.pos == consumed_before && produced == 0 {
                return Err(CasepipeError::Codec(
                    "decoder made no progress on compressed input".into(),
                ));
            }
        }

        Ok(out)
    }

    fn finish(&mut self) -> Result<Vec<u8>, CasepipeError> {
        if self.in_frame {
            return Err(CasepipeError::Codec(
                "compressed input ended mid-frame (truncated stream)".into(),
            ));
        }
        Ok(Vec::new())
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Drives a stage over `input` in `step`-sized chunks, then finishes it.
    fn run_chunked(
        stage: &mut dyn Stage,
        input: &[u8],
        step: usize,
    ) -> Result<Vec<u8>, CasepipeError> {
        let mut out = Vec::new();
        for chunk in input.chunks(step.max(1)) {
            out.extend(stage.process(chunk)?);
        }
        out.extend(stage.finish()?);
        Ok(out)
    }

    #[test]
    fn test_compress_stage_emits_a_valid_frame() {
        let original = b"hello world, this is a test of zstd compression. hello world.".to_vec();

        let mut stage = ZstdCompressStage::new(3).unwrap();
        let compressed = run_chunked(&mut stage, &original, 7).unwrap();

        assert!(compressed.len() < original.len());
        let decompressed = zstd::stream::decode_all(&compressed[..]).unwrap();
        assert_eq!(decompressed, original);
    }

    #[test]
    fn test_decompress_stage_inverts_encode_all() {
        let original: Vec<u8> = (0u32..4096).flat_map(|i| i.to_le_bytes()).collect();
        let compressed = zstd::stream::encode_all(&original[..], 3).unwrap();

        let mut stage = ZstdDecompressStage::new().unwrap();
        // A small step forces frame headers to straddle chunk boundaries.
        let decompressed = run_chunked(&mut stage, &compressed, 5).unwrap();
        assert_eq!(decompressed, original);
    }

    #[test]
    fn test_stage_roundtrip() {
        let original = vec![42u8; 100_000];

        let mut compress = ZstdCompressStage::new(1).unwrap();
        let compressed = run_chunked(&mut compress, &original, 1024).unwrap();

        let mut decompress = ZstdDecompressStage::new().unwrap();
        let roundtripped = run_chunked(&mut decompress, &compressed, 1024).unwrap();
        assert_eq!(roundtripped, original);
    }

    #[test]
    fn test_decompress_rejects_garbage() {
        let garbage = vec![0xDE, 0xAD, 0xBE, 0xEF, 0x01, 0x02, 0x03];

        let mut stage = ZstdDecompressStage::new().unwrap();
        let result = run_chunked(&mut stage, &garbage, garbage.len());
        assert!(matches!(result, Err(CasepipeError::Codec(_))));
    }

    #[test]
    fn test_decompress_rejects_truncated_frame() {
        let original = b"some compressible payload, repeated a few times over.".repeat(20);
        let compressed = zstd::stream::encode_all(&original[..], 3).unwrap();
        let truncated = &compressed[..compressed.len() / 2];

        let mut stage = ZstdDecompressStage::new().unwrap();
        let result = run_chunked(&mut stage, truncated, truncated.len());
        assert!(matches!(result, Err(CasepipeError::Codec(_))));
    }

    #[test]
    fn test_empty_input_roundtrips_to_empty() {
        // An empty input still yields a valid (empty) frame on the way out...
        let mut compress = ZstdCompressStage::new(3).unwrap();
        let compressed = run_chunked(&mut compress, b"", 1).unwrap();
        assert!(!compressed.is_empty());
        assert_eq!(zstd::stream::decode_all(&compressed[..]).unwrap(), b"");

        // ...and decompressing zero bytes yields zero bytes without error.
        let mut decompress = ZstdDecompressStage::new().unwrap();
        let decompressed = run_chunked(&mut decompress, b"", 1).unwrap();
        assert!(decompressed.is_empty());
    }

    #[test]
    fn test_compress_stage_cannot_be_fed_after_finish() {
        let mut stage = ZstdCompressStage::new(3).unwrap();
        stage.process(b"abc").unwrap();
        stage.finish().unwrap();
        assert!(matches!(
            stage.process(b"def"),
            Err(CasepipeError::Internal(_))
        ));
    }
}
