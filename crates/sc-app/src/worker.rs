use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use sc_core::error::CoreError;
use sc_core::frame::FramePayload;
use sc_core::keypoint::KeypointSet;
use sc_core::traits::PoseDetector;

type Reply = Result<KeypointSet, CoreError>;

struct Job {
    frame: FramePayload,
    reply: flume::Sender<Reply>,
}

/// Pool de threads d'inférence alimenté par une file bornée.
///
/// Connection threads submit a frame and block on a one-shot reply. When
/// the queue is full, submitters wait, which caps how much detection work
/// can pile up. Dropping the pool closes the queue and joins every worker.
///
/// The pool is itself a [`PoseDetector`], so callers do not need to know
/// whether detection is pooled.
pub struct InferencePool {
    jobs: Option<flume::Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
    name: &'static str,
}

impl InferencePool {
    /// Spawns `workers` threads running `detector`.
    ///
    /// # Errors
    /// Returns an error if a worker thread cannot be spawned.
    pub fn new(detector: Arc<dyn PoseDetector>, workers: usize, queue_depth: usize) -> Result<Self> {
        let (tx, rx) = flume::bounded::<Job>(queue_depth.max(1));
        let name = detector.name();
        let mut handles = Vec::with_capacity(workers.max(1));
        for i in 0..workers.max(1) {
            let rx = rx.clone();
            let detector = Arc::clone(&detector);
            let handle = std::thread::Builder::new()
                .name(format!("inference-{i}"))
                .spawn(move || {
                    while let Ok(job) = rx.recv() {
                        let result = detector.detect(&job.frame);
                        // Submitter gone: nobody to answer.
                        let _ = job.reply.send(result);
                    }
                    log::debug!("inference worker {i} stopped");
                })
                .with_context(|| format!("spawning inference worker {i}"))?;
            handles.push(handle);
        }
        log::info!(
            "Pool d'inférence : {} workers ({name}), file de {}",
            handles.len(),
            queue_depth.max(1)
        );
        Ok(Self {
            jobs: Some(tx),
            workers: handles,
            name,
        })
    }

    /// Submits a frame and waits for its keypoints.
    ///
    /// # Errors
    /// Returns [`CoreError::DetectorUnavailable`] if the pool is shutting down,
    /// or the detector's own error.
    pub fn submit(&self, frame: FramePayload) -> Result<KeypointSet, CoreError> {
        let jobs = self.jobs.as_ref().ok_or(CoreError::DetectorUnavailable)?;
        let (reply, rx) = flume::bounded(1);
        jobs.send(Job { frame, reply })
            .map_err(|_| CoreError::DetectorUnavailable)?;
        rx.recv().map_err(|_| CoreError::DetectorUnavailable)?
    }

    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

impl PoseDetector for InferencePool {
    fn detect(&self, frame: &FramePayload) -> Result<KeypointSet, CoreError> {
        self.submit(frame.clone())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for InferencePool {
    fn drop(&mut self) {
        self.jobs.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::error!("inference worker panicked");
            }
        }
    }
}
