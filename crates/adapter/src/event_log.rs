//! JSONL event log
//!
//! Every [`BoardEvent`] the driver emits can be appended to a file, one JSON
//! object per line. Writing happens on a background task so pacing never waits
//! on disk.

use anyhow::{anyhow, Result};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::protocol::BoardEvent;

/// Handle to a running log writer. Dropping every sender ends the task.
pub struct EventLog {
    tx: mpsc::UnboundedSender<BoardEvent>,
    task: JoinHandle<()>,
}

impl EventLog {
    /// Open (append) `path` and start the writer task
    pub async fn open(path: &str) -> Result<Self> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| anyhow!("event log: open {} failed: {}", path, e))?;

        let (tx, mut rx) = mpsc::unbounded_channel::<BoardEvent>();
        let path = path.to_string();
        let task = tokio::spawn(async move {
            let mut buf: Vec<u8> = Vec::with_capacity(4096);

            while let Some(event) = rx.recv().await {
                if let Err(e) = encode_line(&mut buf, &event) {
                    eprintln!("[EventLog] encode for {} failed, event skipped: {}", path, e);
                    continue;
                }
                if let Err(e) = file.write_all(&buf).await {
                    eprintln!("[EventLog] write to {} failed: {}", path, e);
                    break;
                }
            }

            let _ = file.flush().await;
        });

        Ok(Self { tx, task })
    }

    pub fn record(&self, event: &BoardEvent) {
        let _ = self.tx.send(event.clone());
    }

    /// Stop accepting events and wait until everything queued is on disk
    pub async fn close(self) {
        drop(self.tx);
        let _ = self.task.await;
    }
}

/// Replace `buf` with `event` as one JSON line
fn encode_line(buf: &mut Vec<u8>, event: &BoardEvent) -> serde_json::Result<()> {
    buf.clear();
    serde_json::to_writer(&mut *buf, event)?;
    buf.push(b'\n');
    Ok(())
}
