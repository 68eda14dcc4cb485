//! Background thread that computes expected values off the interactive path.
//!
//! Every submission gets a ticket. Only the reply for the most recent ticket is
//! ever handed back; older replies are dropped on arrival, and the thread
//! abandons an enumeration as soon as a newer ticket exists.

use crate::{expected_value_interruptible, DeckSnapshot, StatsError, WorkerError};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub type Ticket = u64;

/// Marks the worker as shutting down; no real ticket is ever zero.
const SHUTDOWN: Ticket = 0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpectationRequest {
    pub ticket: Ticket,
    pub snapshot: DeckSnapshot,
    pub hand_size: usize,
    pub digits: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpectationReply {
    pub ticket: Ticket,
    pub result: Result<f64, StatsError>,
}

#[derive(Debug)]
pub struct ExpectationWorker {
    requests: Option<Sender<ExpectationRequest>>,
    replies: Receiver<ExpectationReply>,
    latest: Arc<AtomicU64>,
    next_ticket: Ticket,
    pending: bool,
    handle: Option<JoinHandle<()>>,
}

impl ExpectationWorker {
    pub fn spawn() -> Result<Self, WorkerError> {
        let (request_tx, request_rx) = mpsc::channel();
        let (reply_tx, reply_rx) = mpsc::channel();
        let latest = Arc::new(AtomicU64::new(SHUTDOWN));
        let shared = Arc::clone(&latest);
        let handle = thread::Builder::new()
            .name("expectation-worker".to_string())
            .spawn(move || serve(request_rx, reply_tx, shared))
            .map_err(|err| WorkerError::Spawn(err.to_string()))?;
        Ok(Self {
            requests: Some(request_tx),
            replies: reply_rx,
            latest,
            next_ticket: 1,
            pending: false,
            handle: Some(handle),
        })
    }

    /// Queues a computation, superseding any earlier one still outstanding.
    pub fn submit(
        &mut self,
        snapshot: DeckSnapshot,
        hand_size: usize,
        digits: u32,
    ) -> Result<Ticket, WorkerError> {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.latest.store(ticket, Ordering::Release);
        let request = ExpectationRequest {
            ticket,
            snapshot,
            hand_size,
            digits,
        };
        self.requests
            .as_ref()
            .ok_or(WorkerError::Disconnected)?
            .send(request)
            .map_err(|_| WorkerError::Disconnected)?;
        self.pending = true;
        debug!(ticket, "expectation request submitted");
        Ok(ticket)
    }

    /// True while the latest submission has not produced a reply yet.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn latest_ticket(&self) -> Option<Ticket> {
        match self.latest.load(Ordering::Acquire) {
            SHUTDOWN => None,
            ticket => Some(ticket),
        }
    }

    /// Returns the reply for the latest submission if it has arrived.
    pub fn poll(&mut self) -> Result<Option<ExpectationReply>, WorkerError> {
        loop {
            match self.replies.try_recv() {
                Ok(reply) => {
                    if let Some(reply) = self.accept(reply) {
                        return Ok(Some(reply));
                    }
                }
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Disconnected) => return Err(self.disconnected()),
            }
        }
    }

    /// Blocks up to `timeout` for the reply to the latest submission.
    pub fn wait(&mut self, timeout: Duration) -> Result<Option<ExpectationReply>, WorkerError> {
        let deadline = Instant::now() + timeout;
        while self.pending {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.replies.recv_timeout(remaining) {
                Ok(reply) => {
                    if let Some(reply) = self.accept(reply) {
                        return Ok(Some(reply));
                    }
                }
                Err(RecvTimeoutError::Timeout) => return Ok(None),
                Err(RecvTimeoutError::Disconnected) => return Err(self.disconnected()),
            }
        }
        Ok(None)
    }

    fn accept(&mut self, reply: ExpectationReply) -> Option<ExpectationReply> {
        if reply.ticket != self.latest.load(Ordering::Acquire) {
            debug!(ticket = reply.ticket, "discarding superseded expectation");
            return None;
        }
        self.pending = false;
        Some(reply)
    }

    fn disconnected(&mut self) -> WorkerError {
        self.pending = false;
        WorkerError::Disconnected
    }
}

impl Drop for ExpectationWorker {
    fn drop(&mut self) {
        self.latest.store(SHUTDOWN, Ordering::Release);
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("expectation worker panicked");
            }
        }
    }
}

fn serve(
    requests: Receiver<ExpectationRequest>,
    replies: Sender<ExpectationReply>,
    latest: Arc<AtomicU64>,
) {
    while let Ok(mut request) = requests.recv() {
        // Only the newest queued request matters.
        while let Ok(newer) = requests.try_recv() {
            request = newer;
        }
        let ticket = request.ticket;
        if latest.load(Ordering::Acquire) != ticket {
            continue;
        }
        let superseded = || latest.load(Ordering::Acquire) != ticket;
        let result = match expected_value_interruptible(
            &request.snapshot,
            request.hand_size,
            request.digits,
            Some(&superseded),
        ) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => {
                debug!(ticket, "expectation abandoned for a newer request");
                continue;
            }
            Err(err) => Err(err),
        };
        debug!(ticket, ?result, "expectation finished");
        if replies.send(ExpectationReply { ticket, result }).is_err() {
            break;
        }
    }
}
