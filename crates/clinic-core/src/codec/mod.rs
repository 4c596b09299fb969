//! Flat binary snapshots, one file per entity type.
//!
//! ```text
//! count:i32 LE | [available:i32 LE] | record[count]
//! ```
//!
//! The `available` counter is only present for patients, doctors and
//! receptionists. Records are fixed-size (see [`Record::SIZE`]). There is no
//! version or checksum.

mod layout;
mod records;

pub use layout::{RecordReader, RecordWriter};

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::log::CODEC;
use crate::models::EntityKind;
use crate::store::{Entity, EntityStore, IdPolicy};

/// Codec errors.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Snapshot not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Corrupt {kind} snapshot: {reason}")]
    CorruptSnapshot { kind: EntityKind, reason: String },

    #[error("Corrupt {kind} record {index}: invalid {field} value {value}")]
    CorruptRecord {
        kind: EntityKind,
        index: usize,
        field: &'static str,
        value: i32,
    },
}

pub type CodecResult<T> = Result<T, CodecError>;

/// An enum field held a value with no matching variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDiscriminant {
    pub field: &'static str,
    pub value: i32,
}

/// A record with a fixed on-disk layout.
pub trait Record: Entity + Sized {
    /// Encoded size in bytes, padding included.
    const SIZE: usize;
    /// Whether the snapshot header carries an `available` counter.
    const AVAILABLE_COUNTER: bool;

    fn encode(&self, w: &mut RecordWriter<'_>);

    fn decode(r: &mut RecordReader<'_>) -> Result<Self, InvalidDiscriminant>;
}

/// Write a whole store to `out`.
pub fn encode_snapshot<T: Record, W: Write>(store: &EntityStore<T>, out: &mut W) -> CodecResult<()> {
    out.write_i32::<LittleEndian>(store.len() as i32)?;
    if T::AVAILABLE_COUNTER {
        out.write_i32::<LittleEndian>(store.available() as i32)?;
    }

    let mut buf = vec![0u8; T::SIZE];
    for record in store.iter() {
        record.encode(&mut RecordWriter::new(&mut buf));
        out.write_all(&buf)?;
    }
    Ok(())
}

/// Read a whole store from `input`.
///
/// The header is bounds-checked before it is trusted to size any read.
pub fn decode_snapshot<T: Record, R: Read>(input: &mut R, id_policy: IdPolicy) -> CodecResult<EntityStore<T>> {
    let count = read_header::<T, _>(input, "count")?;
    let capacity = T::KIND.capacity();
    if count < 0 || count as usize > capacity {
        return Err(corrupt::<T>(format!("count {count} outside 0..={capacity}")));
    }
    let count = count as usize;

    let available = if T::AVAILABLE_COUNTER {
        let available = read_header::<T, _>(input, "available")?;
        if available < 0 || available as usize > count {
            return Err(corrupt::<T>(format!("available {available} outside 0..={count}")));
        }
        Some(available as usize)
    } else {
        None
    };

    let mut records = Vec::with_capacity(count);
    let mut buf = vec![0u8; T::SIZE];
    for index in 0..count {
        input.read_exact(&mut buf).map_err(|e| truncated::<T>(e, index))?;
        let record = T::decode(&mut RecordReader::new(&buf)).map_err(|bad| CodecError::CorruptRecord {
            kind: T::KIND,
            index,
            field: bad.field,
            value: bad.value,
        })?;
        records.push(record);
    }

    EntityStore::from_records(records, available, id_policy).map_err(|e| corrupt::<T>(e.to_string()))
}

/// Rewrite the snapshot at `path`.
///
/// With `atomic` the bytes go to a sibling temp file that is renamed over
/// `path`; without it the file is truncated in place, so a crash mid-write
/// can leave it short.
pub fn save<T: Record>(store: &EntityStore<T>, path: &Path, atomic: bool) -> CodecResult<()> {
    let mut bytes = Vec::with_capacity(8 + store.len() * T::SIZE);
    encode_snapshot(store, &mut bytes)?;

    if atomic {
        let tmp = temp_path(path);
        {
            let mut file = File::create(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, path)?;
    } else {
        let mut file = File::create(path)?;
        file.write_all(&bytes)?;
    }

    debug!(
        target: CODEC,
        kind = %T::KIND,
        records = store.len(),
        bytes = bytes.len(),
        path = %path.display(),
        "Saved snapshot"
    );
    Ok(())
}

/// Load the snapshot at `path`.
pub fn load<T: Record>(path: &Path, id_policy: IdPolicy) -> CodecResult<EntityStore<T>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(CodecError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    let mut reader = io::BufReader::new(file);
    let store = decode_snapshot(&mut reader, id_policy)?;
    debug!(target: CODEC, kind = %T::KIND, records = store.len(), "Loaded snapshot");
    Ok(store)
}

/// Load the snapshot at `path`, starting empty when it is missing or
/// unreadable.
pub fn load_or_default<T: Record>(path: &Path, id_policy: IdPolicy) -> EntityStore<T> {
    match load(path, id_policy) {
        Ok(store) => store,
        Err(CodecError::NotFound(_)) => {
            info!(target: CODEC, kind = %T::KIND, path = %path.display(), "No snapshot, starting empty");
            EntityStore::with_policy(id_policy)
        }
        Err(e) => {
            warn!(target: CODEC, kind = %T::KIND, path = %path.display(), error = %e, "Unreadable snapshot, starting empty");
            EntityStore::with_policy(id_policy)
        }
    }
}

fn read_header<T: Record, R: Read>(input: &mut R, field: &str) -> CodecResult<i32> {
    input.read_i32::<LittleEndian>().map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => corrupt::<T>(format!("missing {field} header")),
        _ => CodecError::Io(e),
    })
}

fn truncated<T: Record>(e: io::Error, index: usize) -> CodecError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => corrupt::<T>(format!("truncated at record {index}")),
        _ => CodecError::Io(e),
    }
}

fn corrupt<T: Record>(reason: String) -> CodecError {
    CodecError::CorruptSnapshot { kind: T::KIND, reason }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Appointment, Doctor, Gender, Patient, Role, User, MAX_DOCTORS};

    fn patients() -> EntityStore<Patient> {
        let mut store = EntityStore::new();
        store
            .add(Patient::new("Alice", 30, Gender::Female, "01712345678", "Dhaka", "A+"))
            .unwrap();
        store
            .add(Patient::new("Bob", 41, Gender::Male, "01812345678", "Khulna", "O-"))
            .unwrap();
        store.deactivate(1002).unwrap();
        store
    }

    #[test]
    fn test_patient_snapshot_header() {
        let mut bytes = Vec::new();
        encode_snapshot(&patients(), &mut bytes).unwrap();

        assert_eq!(bytes.len(), 8 + 2 * Patient::SIZE);
        assert_eq!(&bytes[0..4], &2i32.to_le_bytes());
        assert_eq!(&bytes[4..8], &1i32.to_le_bytes());
    }

    #[test]
    fn test_user_snapshot_has_no_available_counter() {
        let mut store = EntityStore::new();
        store
            .insert_with_id(User::new(0, "admin", "admin123", Role::Admin), 3001)
            .unwrap();
        let mut bytes = Vec::new();
        encode_snapshot(&store, &mut bytes).unwrap();

        assert_eq!(bytes.len(), 4 + User::SIZE);
        assert_eq!(&bytes[4..8], &3001i32.to_le_bytes());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let store = patients();
        let mut bytes = Vec::new();
        encode_snapshot(&store, &mut bytes).unwrap();

        let back: EntityStore<Patient> = decode_snapshot(&mut bytes.as_slice(), IdPolicy::LiveCount).unwrap();
        assert_eq!(back, store);
        assert_eq!(back.available(), 1);
        assert_eq!(back.unavailable(), 1);
    }

    #[test]
    fn test_count_above_capacity_is_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(MAX_DOCTORS as i32 + 1).to_le_bytes());
        bytes.extend_from_slice(&0i32.to_le_bytes());

        let err = decode_snapshot::<Doctor, _>(&mut bytes.as_slice(), IdPolicy::LiveCount).unwrap_err();
        assert!(matches!(
            err,
            CodecError::CorruptSnapshot {
                kind: EntityKind::Doctor,
                ..
            }
        ));
    }

    #[test]
    fn test_negative_count_is_rejected() {
        let bytes = (-1i32).to_le_bytes();
        let err = decode_snapshot::<Appointment, _>(&mut bytes.as_slice(), IdPolicy::LiveCount).unwrap_err();
        assert!(matches!(err, CodecError::CorruptSnapshot { .. }));
    }

    #[test]
    fn test_available_above_count_is_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0i32.to_le_bytes());
        bytes.extend_from_slice(&1i32.to_le_bytes());
        let err = decode_snapshot::<Patient, _>(&mut bytes.as_slice(), IdPolicy::LiveCount).unwrap_err();
        assert!(matches!(err, CodecError::CorruptSnapshot { .. }));
    }

    #[test]
    fn test_truncated_records_are_rejected() {
        let mut bytes = Vec::new();
        encode_snapshot(&patients(), &mut bytes).unwrap();
        bytes.truncate(bytes.len() - 10);

        let err = decode_snapshot::<Patient, _>(&mut bytes.as_slice(), IdPolicy::LiveCount).unwrap_err();
        match err {
            CodecError::CorruptSnapshot { reason, .. } => assert!(reason.contains("record 1")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_file_is_corrupt() {
        let bytes: &[u8] = &[];
        let err = decode_snapshot::<User, _>(&mut &bytes[..], IdPolicy::LiveCount).unwrap_err();
        assert!(matches!(err, CodecError::CorruptSnapshot { .. }));
    }

    #[test]
    fn test_bad_discriminant_reports_index() {
        let mut store = EntityStore::new();
        store
            .add(Appointment::new(1001, 2001, "01-01-2025", "10:00 AM", "Checkup"))
            .unwrap();
        let mut bytes = Vec::new();
        encode_snapshot(&store, &mut bytes).unwrap();
        // status lives in the last 4 bytes of the only record
        let len = bytes.len();
        bytes[len - 4..].copy_from_slice(&7i32.to_le_bytes());

        let err = decode_snapshot::<Appointment, _>(&mut bytes.as_slice(), IdPolicy::LiveCount).unwrap_err();
        assert!(matches!(
            err,
            CodecError::CorruptRecord {
                index: 0,
                field: "status",
                value: 7,
                ..
            }
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patients.dat");
        let store = patients();

        save(&store, &path, true).unwrap();
        assert!(!temp_path(&path).exists());
        let back: EntityStore<Patient> = load(&path, IdPolicy::LiveCount).unwrap();
        assert_eq!(back, store);

        save(&store, &path, false).unwrap();
        let back: EntityStore<Patient> = load(&path, IdPolicy::LiveCount).unwrap();
        assert_eq!(back, store);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doctors.dat");
        let err = load::<Doctor>(&path, IdPolicy::LiveCount).unwrap_err();
        assert!(matches!(err, CodecError::NotFound(_)));

        let store: EntityStore<Doctor> = load_or_default(&path, IdPolicy::LiveCount);
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_or_default_recovers_from_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patients.dat");
        std::fs::write(&path, [0xff, 0xff]).unwrap();

        let store: EntityStore<Patient> = load_or_default(&path, IdPolicy::Monotonic);
        assert!(store.is_empty());
        assert_eq!(store.id_policy(), IdPolicy::Monotonic);
    }
}
