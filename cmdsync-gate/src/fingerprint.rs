//! Fingerprint engine — deterministic digest of an unordered command set.
//!
//! Canonicalization: stable-sort by command name (byte order), produce each
//! command's canonical payload, concatenate the payloads in sorted order
//! with a u64-LE length prefix per payload, then hash with xxHash64 seed 0
//! and render as 16 lowercase hex characters.
//!
//! Permutation invariance is the core correctness property: two command
//! sets that are permutations of each other always digest identically.

use xxhash_rust::xxh64::xxh64;

use cmdsync_core::CommandDescriptor;

use crate::error::SyncError;
use crate::transport::PayloadSource;

/// Width of a rendered fingerprint in hex characters.
pub const FINGERPRINT_HEX_LEN: usize = 16;

/// Computes command-set fingerprints and remembers the last one for
/// introspection.
#[derive(Debug, Default)]
pub struct FingerprintEngine {
    current: Option<String>,
}

impl FingerprintEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently computed digest, if any.
    pub fn current_hex(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Digest `commands` using `payloads` for canonical serialization.
    ///
    /// Payloads are produced concurrently (production may involve a
    /// translation round-trip) and reassembled in sorted order, so
    /// concurrency never affects the result.
    pub async fn digest(
        &mut self,
        commands: &[CommandDescriptor],
        payloads: &dyn PayloadSource,
    ) -> Result<String, SyncError> {
        let mut sorted: Vec<&CommandDescriptor> = commands.iter().collect();
        sorted.sort_by(|a, b| a.name.0.as_bytes().cmp(b.name.0.as_bytes()));

        let parts =
            futures::future::try_join_all(sorted.into_iter().map(|c| payloads.payload(c))).await?;

        // Length-prefix each payload so "ab"+"c" and "a"+"bc" cannot frame
        // to the same byte sequence.
        let mut buf = Vec::new();
        for part in &parts {
            buf.extend_from_slice(&(part.len() as u64).to_le_bytes());
            buf.extend_from_slice(part);
        }

        let hex = format!("{:016x}", xxh64(&buf, 0));
        self.current = Some(hex.clone());
        Ok(hex)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
