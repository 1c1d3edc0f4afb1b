use std::{
    io,
    pin::Pin,
    sync::{Arc, Mutex, PoisonError},
    task::{Context, Poll},
};

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// The output sink failed to close. Recorded as a diagnostic by the watcher,
/// never propagated to callers.
#[derive(Debug, Error)]
#[error("failed to close output sink: {0}")]
pub struct StreamCloseError(#[from] io::Error);

pub(crate) type OutputSink = Box<dyn AsyncWrite + Send + Unpin>;

/// Shared slot holding the output sink until it is closed.
///
/// Closing takes the sink out of the slot, so a second close finds the slot
/// empty and is a no-op. The watcher and `ProcessHandle::stop` both go
/// through [`close_sink`].
pub(crate) type SinkSlot = Arc<tokio::sync::Mutex<Option<OutputSink>>>;

pub(crate) fn sink_slot(sink: Option<OutputSink>) -> SinkSlot {
    Arc::new(tokio::sync::Mutex::new(sink))
}

/// Shuts the sink down and empties the slot. Idempotent: an already-empty
/// slot returns `Ok`.
pub(crate) async fn close_sink(slot: &SinkSlot) -> Result<(), StreamCloseError> {
    let sink = slot.lock().await.take();
    match sink {
        Some(mut sink) => Ok(sink.shutdown().await?),
        None => Ok(()),
    }
}

/// Copies one child stream into the shared sink until EOF.
///
/// Keeps draining the pipe after the sink is gone or rejects a write, so the
/// child never blocks on a full pipe.
pub(crate) async fn pump_into(mut reader: impl AsyncRead + Unpin, slot: SinkSlot) {
    let mut chunk = [0u8; 8 * 1024];
    let mut writable = true;
    loop {
        let read = match reader.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(read) => read,
        };
        if !writable {
            continue;
        }
        let mut sink = slot.lock().await;
        match sink.as_mut() {
            Some(out) => {
                if let Err(err) = out.write_all(&chunk[..read]).await {
                    debug!(error = %err, "output sink rejected write, draining rest of stream");
                    writable = false;
                }
            }
            None => writable = false,
        }
    }
}

/// An in-memory output sink.
///
/// Clones share the same underlying buffer, so a caller can hand one clone to
/// [`ProcessBuilder::with_output`](crate::ProcessBuilder::with_output) and
/// read the captured bytes from another once the process has finished.
#[derive(Clone, Debug, Default)]
pub struct OutputBuffer {
    inner: Arc<Mutex<BufferInner>>,
}

#[derive(Debug, Default)]
struct BufferInner {
    bytes: Vec<u8>,
    closed: bool,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far. Still readable after close.
    pub fn contents(&self) -> Vec<u8> {
        self.lock_inner().bytes.clone()
    }

    /// Captured bytes decoded as UTF-8, invalid sequences replaced.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.lock_inner().bytes).into_owned()
    }

    pub fn is_closed(&self) -> bool {
        self.lock_inner().closed
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, BufferInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AsyncWrite for OutputBuffer {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let mut inner = self.lock_inner();
        if inner.closed {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "output buffer is closed",
            )));
        }
        inner.bytes.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.lock_inner().closed = true;
        Poll::Ready(Ok(()))
    }
}
