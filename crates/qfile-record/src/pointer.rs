//! Pointer records and backward-jump cycle detection.
//!
//! A pointer payload is a decimal byte offset, optionally preceded by blanks.
//! Offset zero is a placeholder and never moves the stream. Every jump to an
//! offset at or before the previous target counts as a reverse jump; a
//! forward jump clears the count. Well-formed files need about one reverse
//! jump per insertion, so a runaway count means the pointers form a cycle.

use std::io::{Seek, SeekFrom};

use qfile_stream::StreamIdentity;
use tracing::{debug, warn};

use crate::codec::DEFAULT_MAX_REVERSE_JUMPS;
use crate::error::{RecordError, Result};

/// Cycle-detection state for one stream at a time.
#[derive(Debug, Clone)]
pub struct LoopGuard {
    identity: Option<String>,
    last_offset: u64,
    reverse_jumps: u32,
    limit: u32,
}

impl Default for LoopGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopGuard {
    /// Create a guard with the default limit.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_REVERSE_JUMPS)
    }

    /// Create a guard that trips after `limit` reverse jumps.
    pub fn with_limit(limit: u32) -> Self {
        Self {
            identity: None,
            last_offset: 0,
            reverse_jumps: 0,
            limit,
        }
    }

    /// Identity of the stream the state belongs to.
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Target of the last successful jump.
    pub fn last_offset(&self) -> u64 {
        self.last_offset
    }

    /// Reverse jumps since the last forward jump.
    pub fn reverse_jumps(&self) -> u32 {
        self.reverse_jumps
    }

    /// Configured limit.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Forget all state.
    pub fn reset(&mut self) {
        self.identity = None;
        self.last_offset = 0;
        self.reverse_jumps = 0;
    }

    /// Account for a jump to `offset` on `identity`, before seeking.
    pub fn check(&mut self, identity: &str, offset: u64) -> Result<()> {
        if self.identity.as_deref() != Some(identity) {
            self.reset();
            self.identity = Some(identity.to_string());
        }

        if offset <= self.last_offset {
            self.reverse_jumps = self.reverse_jumps.saturating_add(1);
            if self.reverse_jumps > self.limit {
                warn!(identity, offset, limit = self.limit, "too many reverse jump records");
                return Err(RecordError::TooManyReverseJumps { limit: self.limit });
            }
        } else {
            self.reverse_jumps = 0;
        }
        Ok(())
    }

    /// Remember `offset` as the target of a completed jump.
    pub fn commit(&mut self, offset: u64) {
        self.last_offset = offset;
    }
}

/// Parse a pointer payload into an offset.
pub fn parse_pointer(text: &str) -> Result<u64> {
    let digits = text.trim_start();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RecordError::MalformedPointer(text.to_string()));
    }
    digits
        .parse()
        .map_err(|_| RecordError::MalformedPointer(text.to_string()))
}

/// Seek `stream` to the offset named by a pointer payload.
///
/// Offset zero succeeds without touching the stream or the guard.
pub fn follow_pointer<S>(stream: &mut S, guard: &mut LoopGuard, text: &str) -> Result<()>
where
    S: Seek + StreamIdentity + ?Sized,
{
    let offset = match parse_pointer(text) {
        Ok(offset) => offset,
        Err(err) => {
            warn!(identity = stream.identity(), "{err}");
            return Err(err);
        }
    };
    if offset == 0 {
        return Ok(());
    }

    guard.check(stream.identity(), offset)?;
    stream
        .seek(SeekFrom::Start(offset))
        .map_err(|source| RecordError::Seek { offset, source })?;
    guard.commit(offset);
    debug!(identity = stream.identity(), offset, "followed pointer record");
    Ok(())
}
