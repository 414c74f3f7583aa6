//! Fire-and-forget saves on a worker thread

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use manifest_domain::repository::AppDataRepository;
use manifest_domain::AppDocument;
use manifest_types::Error;
use tracing::{debug, warn};

/// Wraps a repository so `save` returns immediately. Queued snapshots are
/// coalesced: the worker only writes the latest one it has seen.
pub struct BackgroundWriter<R> {
    inner: Arc<R>,
    tx: Option<Sender<AppDocument>>,
    worker: Option<JoinHandle<()>>,
}

impl<R> BackgroundWriter<R>
where
    R: AppDataRepository + Send + Sync + 'static,
{
    pub fn new(inner: R) -> Self {
        let inner = Arc::new(inner);
        let (tx, rx) = mpsc::channel();
        let repo = Arc::clone(&inner);
        let worker = thread::spawn(move || run_worker(repo.as_ref(), rx));
        Self {
            inner,
            tx: Some(tx),
            worker: Some(worker),
        }
    }
}

impl<R> BackgroundWriter<R> {
    /// Write whatever is still queued and stop the worker
    pub fn flush_and_join(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        drop(self.tx.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Background writer thread panicked");
            }
        }
    }
}

fn run_worker<R: AppDataRepository>(repo: &R, rx: Receiver<AppDocument>) {
    while let Ok(mut document) = rx.recv() {
        let mut skipped = 0usize;
        while let Ok(newer) = rx.try_recv() {
            document = newer;
            skipped += 1;
        }
        if skipped > 0 {
            debug!(skipped, "Coalesced queued snapshots");
        }
        if let Err(e) = repo.save(&document) {
            warn!(error = %e, "Background save failed");
        }
    }
}

impl<R> AppDataRepository for BackgroundWriter<R>
where
    R: AppDataRepository + Send + Sync + 'static,
{
    fn load(&self) -> Result<Option<AppDocument>, Error> {
        self.inner.load()
    }

    fn save(&self, document: &AppDocument) -> Result<(), Error> {
        match &self.tx {
            Some(tx) if tx.send(document.clone()).is_ok() => Ok(()),
            // worker gone: write through
            _ => self.inner.save(document),
        }
    }
}

impl<R> Drop for BackgroundWriter<R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
