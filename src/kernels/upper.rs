// In: src/kernels/upper.rs

//! The uppercase transform kernel.
//!
//! The mapping itself is the Unicode default (locale-independent) uppercase
//! mapping, applied to a lossy UTF-8 decode of the stream. The subtle part is
//! chunking: a chunk boundary may split a multi-byte character, so the stage
//! carries the trailing incomplete sequence (at most 3 bytes) into the next
//! chunk instead of corrupting it. Output is therefore invariant under
//! re-chunking of the input.

use crate::error::CasepipeError;
use crate::pipeline::traits::Stage;

//==================================================================================
// 1. Pure Kernel Functions
//==================================================================================

/// Splits `bytes` into `(complete, pending)`, where `pending` is a trailing
/// UTF-8 sequence whose continuation bytes have not arrived yet.
///
/// Only a genuinely incomplete trailing sequence is split off; bytes that can
/// never become valid UTF-8 stay in `complete` and are handled by the lossy
/// decode. `pending` is at most 3 bytes.
pub fn split_trailing_incomplete(bytes: &[u8]) -> (&[u8], &[u8]) {
    let len = bytes.len();
    // A UTF-8 sequence is at most 4 bytes, so only a lead byte within the
    // last 3 positions can start a sequence that runs past the end.
    let start = len.saturating_sub(3);
    for i in (start..len).rev() {
        let b = bytes[i];
        let needed = match b {
            0xF0..=0xFF => 4,
            0xE0..=0xEF => 3,
            0xC0..=0xDF => 2,
            _ => 0,
        };
        if needed > 0 {
            if i + needed > len {
                return bytes.split_at(i);
            }
            break;
        }
        if b < 0x80 {
            break;
        }
        // Continuation byte: keep scanning backwards for its lead.
    }
    (bytes, &[])
}

/// Uppercases a byte buffer as text.
///
/// Valid UTF-8 runs are mapped through `str::to_uppercase`; invalid sequences
/// become U+FFFD, matching `String::from_utf8_lossy`.
pub fn uppercase_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(&chunk.valid().to_uppercase());
        if !chunk.invalid().is_empty() {
            out.push(char::REPLACEMENT_CHARACTER);
        }
    }
    out.into_bytes()
}

//==================================================================================
// 2. The Stage
//==================================================================================

/// The mandatory transform stage. Holds at most 3 carried bytes between
/// chunks; no other state.
pub struct UppercaseStage {
    carry: Vec<u8>,
}

impl UppercaseStage {
    pub fn new() -> Self {
        Self { carry: Vec::new() }
    }
}

impl Default for UppercaseStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for UppercaseStage {
    fn name(&self) -> &'static str {
        "uppercase"
    }

    fn process(&mut self, chunk: &[u8]) -> Result<Vec<u8>, CasepipeError> {
        if chunk.is_empty() {
            return Ok(Vec::new());
        }

        if self.carry.is_empty() {
            let (complete, pending) = split_trailing_incomplete(chunk);
            self.carry.extend_from_slice(pending);
            return Ok(uppercase_bytes(complete));
        }

        let mut data = std::mem::take(&mut self.carry);
        data.extend_from_slice(chunk);
        let (complete, pending) = split_trailing_incomplete(&data);
        self.carry = pending.to_vec();
        Ok(uppercase_bytes(complete))
    }

    fn finish(&mut self) -> Result<Vec<u8>, CasepipeError> {
        // A sequence still pending at end of input can never complete; the
        // lossy decode turns it into U+FFFD.
        let pending = std::mem::take(&mut self.carry);
        Ok(uppercase_bytes(&pending))
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
