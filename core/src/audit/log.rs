use crate::audit::event::{finalize_event, AuditEvent, ZERO_HASH_64};
use crate::error::{CoreError, CoreResult};
use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

pub struct AuditLog {
    path: PathBuf,
    last_hash: String,
}

impl AuditLog {
    pub fn open_or_create(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            File::create(&path)?;
            return Ok(Self {
                path,
                last_hash: ZERO_HASH_64.to_string(),
            });
        }

        let reader = BufReader::new(File::open(&path)?);
        let mut last_hash = ZERO_HASH_64.to_string();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let v: Value = serde_json::from_str(&line)?;
            let eh = v
                .get("event_hash")
                .and_then(|x| x.as_str())
                .ok_or_else(|| {
                    CoreError::InvalidInput("audit log line missing event_hash".to_string())
                })?;
            last_hash = eh.to_string();
        }
        Ok(Self { path, last_hash })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn last_hash(&self) -> &str {
        &self.last_hash
    }

    pub fn append(&mut self, mut event: AuditEvent) -> CoreResult<AuditEvent> {
        event.prev_event_hash = self.last_hash.clone();
        let event = finalize_event(event)?;
        let line = serde_json::to_string(&event)?;
        let mut f = OpenOptions::new().append(true).open(&self.path)?;
        f.write_all(line.as_bytes())?;
        f.write_all(b"\n")?;
        self.last_hash = event.event_hash.clone();
        Ok(event)
    }
}

/// Re-reads a log and checks every link of the hash chain.
pub fn verify_chain(path: impl AsRef<Path>) -> CoreResult<usize> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut prev = ZERO_HASH_64.to_string();
    let mut count = 0;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: AuditEvent = serde_json::from_str(&line)?;
        if event.prev_event_hash != prev {
            return Err(CoreError::InvalidInput(format!(
                "audit chain broken at event {}",
                count + 1
            )));
        }
        let recomputed = crate::audit::event::compute_event_hash(&event)?;
        if recomputed != event.event_hash {
            return Err(CoreError::InvalidInput(format!(
                "audit event {} hash mismatch",
                count + 1
            )));
        }
        prev = event.event_hash;
        count += 1;
    }
    Ok(count)
}
