//! Append-only mutation log
//!
//! Every mutation of a log-backed [`MemoryEngine`](crate::MemoryEngine) is
//! appended as one framed record before it is applied:
//!
//! ```text
//! +-----------+-----------+----------------------+
//! | len (u32) | crc (u32) | rmp-serde payload    |
//! +-----------+-----------+----------------------+
//! ```
//!
//! Both header fields are little-endian; the checksum covers the payload.
//! Replay stops at the first truncated or corrupt record and the file is
//! cut back to the last good record, so a crash mid-append loses at most
//! that append.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use kvmcp_core::Key;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{EngineError, Result};

const HEADER_LEN: usize = 8;

/// One logged mutation.
///
/// Values are stored as JSON text so that replay reproduces the exact
/// document that was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) enum WalRecord {
    /// Key written
    Set {
        key: Key,
        value: String,
        commit: u64,
        expires_at: Option<i64>,
    },

    /// Key removed
    Delete { key: Key, commit: u64 },

    /// Message queued
    Enqueue {
        value: String,
        commit: u64,
        ready_at: i64,
        keys_if_undelivered: Vec<Key>,
        backoff_schedule: Option<Vec<u64>>,
    },

    /// High-water commit, written last by compaction
    Checkpoint { commit: u64 },
}

impl WalRecord {
    pub(crate) fn commit(&self) -> u64 {
        match self {
            WalRecord::Set { commit, .. }
            | WalRecord::Delete { commit, .. }
            | WalRecord::Enqueue { commit, .. }
            | WalRecord::Checkpoint { commit } => *commit,
        }
    }
}

/// Writer half of the log.
pub(crate) struct Wal {
    path: PathBuf,
    file: File,
    /// Length of the acknowledged prefix of the file
    len: u64,
    /// Set when a failed append could not be cut back
    poisoned: bool,
}

impl Wal {
    /// Open (creating if needed) the log at `path` and replay it.
    pub(crate) fn open(path: &Path) -> Result<(Self, Vec<WalRecord>)> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path)?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let (records, valid_len) = decode_all(&bytes);
        if valid_len < bytes.len() {
            warn!(
                path = %path.display(),
                discarded = bytes.len() - valid_len,
                "truncating torn tail of mutation log"
            );
            file.set_len(valid_len as u64)?;
        }
        debug!(path = %path.display(), records = records.len(), "replayed mutation log");

        Ok((
            Self {
                path: path.to_path_buf(),
                file,
                len: valid_len as u64,
                poisoned: false,
            },
            records,
        ))
    }

    /// Append one record.
    ///
    /// Bytes past the acknowledged length, such as the remains of a failed
    /// append, are cut before writing. Replay stops at the first bad frame,
    /// so anything written after one would be lost on reopen.
    pub(crate) fn append(&mut self, record: &WalRecord) -> Result<()> {
        if self.poisoned {
            return Err(EngineError::Io(io::Error::new(
                io::ErrorKind::Other,
                "mutation log is unusable after a failed append",
            )));
        }
        let frame = encode(record)?;

        let on_disk = self.file.metadata()?.len();
        if on_disk > self.len {
            warn!(
                path = %self.path.display(),
                discarded = on_disk - self.len,
                "cutting unacknowledged bytes from mutation log"
            );
            self.truncate_to_acknowledged()?;
        }

        let written = self
            .file
            .write_all(&frame)
            .and_then(|()| self.file.flush());
        if let Err(e) = written {
            warn!(path = %self.path.display(), error = %e, "mutation log append failed");
            self.truncate_to_acknowledged()?;
            return Err(e.into());
        }
        self.len += frame.len() as u64;
        Ok(())
    }

    fn truncate_to_acknowledged(&mut self) -> Result<()> {
        if let Err(e) = self.file.set_len(self.len) {
            self.poisoned = true;
            return Err(e.into());
        }
        Ok(())
    }

    /// Replace the log with `records`, atomically via rename, and fsync.
    pub(crate) fn compact(&mut self, records: &[WalRecord]) -> Result<()> {
        let tmp = self.path.with_extension("compact");
        {
            let mut out = BufWriter::new(File::create(&tmp)?);
            for record in records {
                out.write_all(&encode(record)?)?;
            }
            let file = out
                .into_inner()
                .map_err(|e| EngineError::Io(e.into_error()))?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        self.file = OpenOptions::new().read(true).append(true).open(&self.path)?;
        self.len = self.file.metadata()?.len();
        self.poisoned = false;
        debug!(path = %self.path.display(), records = records.len(), "compacted mutation log");
        Ok(())
    }

    /// Flush file contents to stable storage.
    pub(crate) fn sync(&self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }
}

fn encode(record: &WalRecord) -> Result<Vec<u8>> {
    let payload = rmp_serde::to_vec(record)?;
    let len = u32::try_from(payload.len())
        .map_err(|_| EngineError::Serialization("log record too large".into()))?;
    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.write_u32::<LittleEndian>(len)?;
    frame.write_u32::<LittleEndian>(crc32fast::hash(&payload))?;
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Decode records until the first bad frame; returns the records and the
/// byte length of the valid prefix.
fn decode_all(bytes: &[u8]) -> (Vec<WalRecord>, usize) {
    let mut records = Vec::new();
    let mut offset = 0;

    while bytes.len() - offset >= HEADER_LEN {
        let mut header = Cursor::new(&bytes[offset..offset + HEADER_LEN]);
        let (len, crc) = match (
            header.read_u32::<LittleEndian>(),
            header.read_u32::<LittleEndian>(),
        ) {
            (Ok(len), Ok(crc)) => (len as usize, crc),
            _ => break,
        };
        let start = offset + HEADER_LEN;
        let Some(payload) = bytes.get(start..start + len) else {
            break;
        };
        if crc32fast::hash(payload) != crc {
            break;
        }
        match rmp_serde::from_slice::<WalRecord>(payload) {
            Ok(record) => records.push(record),
            Err(_) => break,
        }
        offset = start + len;
    }

    (records, offset)
}
