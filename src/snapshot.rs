//! Binary snapshots of a [`RuleCatalog`].
//!
//! A snapshot is a 32-byte fixed header followed by a bincode-encoded
//! payload.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"RAST"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Engine version (u16, little-endian)
//! 8       4     Flags (u32, reserved)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! The format version must match exactly; the engine version is
//! informational. Stored trees travel in their JSON serialized form, so a
//! decoded catalog is checked by deserializing every one of them.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{Node, Rule, RuleCatalog, RuleError, RuleId};

const MAGIC: &[u8; 4] = b"RAST";
const FORMAT_VERSION: u16 = 1;
const ENGINE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;

/// Errors raised while writing or reading a catalog snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode catalog: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("not a rule catalog snapshot: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: snapshot is v{found}, engine supports v{supported}")]
    IncompatibleVersion { found: u16, supported: u16 },

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("payload too large: {0} bytes")]
    PayloadTooLarge(usize),

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("stored tree of rule {id} is invalid: {source}")]
    InvalidTree {
        id: RuleId,
        #[source]
        source: RuleError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedCatalog {
    metadata: CatalogMetadata,
    rules: Vec<SerializedRule>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogMetadata {
    rule_count: usize,
    next_id: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedRule {
    id: u64,
    name: String,
    text: String,
    ast: String,
}

fn catalog_to_serialized(catalog: &RuleCatalog) -> SerializedCatalog {
    let rules = catalog
        .rules()
        .map(|rule| SerializedRule {
            id: rule.id.get(),
            name: rule.name.clone(),
            text: rule.text.clone(),
            ast: rule.ast.clone(),
        })
        .collect();
    SerializedCatalog {
        metadata: CatalogMetadata {
            rule_count: catalog.len(),
            next_id: catalog.next_id,
        },
        rules,
    }
}

fn serialized_to_catalog(ser: SerializedCatalog) -> Result<RuleCatalog, SnapshotError> {
    validate(&ser)?;

    let mut catalog = RuleCatalog {
        rules: BTreeMap::new(),
        names: HashMap::with_capacity(ser.rules.len()),
        next_id: ser.metadata.next_id,
    };
    for sr in ser.rules {
        let id = RuleId::new(sr.id);
        catalog.names.insert(sr.name.clone(), id);
        catalog.rules.insert(
            id,
            Rule {
                id,
                name: sr.name,
                text: sr.text,
                ast: sr.ast,
            },
        );
    }
    Ok(catalog)
}

fn validate(ser: &SerializedCatalog) -> Result<(), SnapshotError> {
    if ser.metadata.rule_count != ser.rules.len() {
        return Err(SnapshotError::Validation(format!(
            "metadata says {} rules but payload has {}",
            ser.metadata.rule_count,
            ser.rules.len()
        )));
    }
    if ser.metadata.next_id == 0 {
        return Err(SnapshotError::Validation("next id must be at least 1".to_owned()));
    }

    let mut ids = HashSet::with_capacity(ser.rules.len());
    let mut names = HashSet::with_capacity(ser.rules.len());
    for rule in &ser.rules {
        if rule.id == 0 || rule.id >= ser.metadata.next_id {
            return Err(SnapshotError::Validation(format!(
                "rule id {} out of range (next id {})",
                rule.id, ser.metadata.next_id
            )));
        }
        if !ids.insert(rule.id) {
            return Err(SnapshotError::Validation(format!("duplicate rule id {}", rule.id)));
        }
        if !names.insert(rule.name.as_str()) {
            return Err(SnapshotError::Validation(format!(
                "duplicate rule name '{}'",
                rule.name
            )));
        }
        Node::from_json(&rule.ast).map_err(|source| SnapshotError::InvalidTree {
            id: RuleId::new(rule.id),
            source,
        })?;
    }
    Ok(())
}

fn write_header(buf: &mut Vec<u8>, payload: &[u8]) -> Result<(), SnapshotError> {
    let payload_len =
        u32::try_from(payload.len()).map_err(|_| SnapshotError::PayloadTooLarge(payload.len()))?;
    let hash = blake3::hash(payload);

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&ENGINE_VERSION.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // flags (reserved)
    buf.extend_from_slice(&payload_len.to_le_bytes());
    buf.extend_from_slice(&hash.as_bytes()[..16]);
    Ok(())
}

#[allow(clippy::cast_possible_truncation)] // HEADER_SIZE is 32, always fits in u32
fn read_header(bytes: &[u8]) -> Result<(u16, u32, [u8; 16]), SnapshotError> {
    if bytes.len() < HEADER_SIZE {
        return Err(SnapshotError::LengthMismatch {
            expected: HEADER_SIZE as u32,
            actual: bytes.len(),
        });
    }
    if &bytes[0..4] != MAGIC {
        return Err(SnapshotError::BadMagic);
    }

    let format_version = u16::from_le_bytes([bytes[4], bytes[5]]);
    // bytes[6..8] engine version, bytes[8..12] flags
    let payload_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);
    let mut hash = [0u8; 16];
    hash.copy_from_slice(&bytes[16..32]);

    Ok((format_version, payload_len, hash))
}

pub(crate) fn encode(catalog: &RuleCatalog) -> Result<Vec<u8>, SnapshotError> {
    let serialized = catalog_to_serialized(catalog);
    let payload = bincode::serde::encode_to_vec(&serialized, bincode::config::standard())?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    write_header(&mut buf, &payload)?;
    buf.extend_from_slice(&payload);
    debug!(rules = catalog.len(), bytes = buf.len(), "encoded catalog snapshot");
    Ok(buf)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<RuleCatalog, SnapshotError> {
    let (format_version, payload_len, stored_hash) = read_header(bytes)?;
    if format_version != FORMAT_VERSION {
        warn!(found = format_version, "incompatible snapshot version");
        return Err(SnapshotError::IncompatibleVersion {
            found: format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload_end = HEADER_SIZE + payload_len as usize;
    if bytes.len() < payload_end {
        return Err(SnapshotError::LengthMismatch {
            expected: payload_len,
            actual: bytes.len() - HEADER_SIZE,
        });
    }
    let payload = &bytes[HEADER_SIZE..payload_end];

    if blake3::hash(payload).as_bytes()[..16] != stored_hash {
        warn!("snapshot checksum mismatch");
        return Err(SnapshotError::ChecksumMismatch);
    }

    let (serialized, _): (SerializedCatalog, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
    let catalog = serialized_to_catalog(serialized)?;
    debug!(rules = catalog.len(), "decoded catalog snapshot");
    Ok(catalog)
}

impl RuleCatalog {
    /// Encode the catalog as a checksummed binary snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Encode`] if bincode fails, or
    /// [`SnapshotError::PayloadTooLarge`] past 4 GiB.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        encode(self)
    }

    /// Decode a snapshot produced by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] on format, integrity or validation
    /// failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        decode(bytes)
    }

    /// Write a snapshot to a file.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] on encoding or I/O failure.
    pub fn to_binary_file(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Read a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] on I/O, format, integrity or validation
    /// failure.
    pub fn from_binary_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}
