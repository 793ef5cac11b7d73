//! On-disk record of transfers that have not completed yet

use crate::error::Result;
use crate::transport::TransferRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

/// A spooled transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpoolRecord {
    /// Transfer id
    pub id: Uuid,
    /// When the transfer was enqueued
    pub enqueued_at: DateTime<Utc>,
    /// The request itself
    pub request: TransferRequest,
}

impl SpoolRecord {
    pub(crate) fn new(request: TransferRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            enqueued_at: Utc::now(),
            request,
        }
    }
}

/// One directory per session, one JSON file per outstanding transfer
#[derive(Debug)]
pub(crate) struct Spool {
    dir: PathBuf,
}

impl Spool {
    pub(crate) fn open(dir: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Persist a record; written to a temp file first so readers never see
    /// half a record
    pub(crate) fn store(&self, record: &SpoolRecord) -> Result<()> {
        let path = self.record_path(record.id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(record)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    pub(crate) fn remove(&self, id: Uuid) -> io::Result<()> {
        match fs::remove_file(self.record_path(id)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    /// Outstanding records, oldest first. Unreadable records are skipped.
    pub(crate) fn pending(&self) -> Result<Vec<SpoolRecord>> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let parsed = fs::read(&path)
                .map_err(crate::error::Error::from)
                .and_then(|bytes| Ok(serde_json::from_slice::<SpoolRecord>(&bytes)?));
            match parsed {
                Ok(record) => records.push(record),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable spool record"),
            }
        }
        records.sort_by_key(|r| r.enqueued_at);
        Ok(records)
    }
}
