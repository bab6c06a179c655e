//! The direction I/O loop (§4.6): the thinnest possible glue between a raw
//! byte stream and the dispatcher. It owns no protocol knowledge beyond
//! "find a complete frame and hand it to the dispatcher"; the actual wire
//! transport, compression, and fd-mirroring are injected as narrow trait
//! objects.

use std::os::unix::io::RawFd;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::Result;
use crate::fd::FdTranslationMap;
use crate::protocol::dispatch::{handle_message, DispatchOutcome};
use crate::protocol::object::ObjectTable;
use crate::protocol::state::ProtoState;
use crate::protocol::wire::{peek_message_size, ByteWindow, FdWindow};
use crate::telemetry::logger::{LogLevel, Logger};
use crate::telemetry::metrics::Metrics;
use crate::log_via;

/// Accepts a complete, possibly-rewritten framed message (plus any fds that
/// travelled with it) for transmission to the peer.
pub trait MessageSink: Send {
    fn send(&mut self, bytes: &[u8], fds: &[RawFd]) -> std::io::Result<()>;
}

/// A sink that records everything sent to it, useful for tests and for
/// same-host relaying where the "transmission" is simply appending to a
/// queue another task drains.
#[derive(Debug, Default)]
pub struct InMemorySink {
    pub sent: Vec<(Vec<u8>, Vec<RawFd>)>,
}

impl MessageSink for InMemorySink {
    fn send(&mut self, bytes: &[u8], fds: &[RawFd]) -> std::io::Result<()> {
        self.sent.push((bytes.to_vec(), fds.to_vec()));
        Ok(())
    }
}

/// A sink that hands each forwarded message off to a channel, for a
/// separate task to write to the real peer socket. Descriptors travel
/// alongside the bytes in the same channel message so the writer task can
/// keep them paired.
pub struct ChannelSink {
    tx: tokio::sync::mpsc::UnboundedSender<(Vec<u8>, Vec<RawFd>)>,
}

impl ChannelSink {
    pub fn new(tx: tokio::sync::mpsc::UnboundedSender<(Vec<u8>, Vec<RawFd>)>) -> Self {
        Self { tx }
    }
}

impl MessageSink for ChannelSink {
    fn send(&mut self, bytes: &[u8], fds: &[RawFd]) -> std::io::Result<()> {
        self.tx
            .send((bytes.to_vec(), fds.to_vec()))
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::BrokenPipe, "peer writer task gone"))
    }
}

/// Drives the dispatcher over one direction of a connection: reads bytes
/// from `input`, decodes and dispatches complete frames, and forwards the
/// result to `sink`. File descriptors are supplied out of band via
/// [`DirectionLoop::push_fds`], since this crate does not itself decode
/// `SCM_RIGHTS` ancillary data (an external collaborator's job, see the
/// module docs).
pub struct DirectionLoop<'a, R> {
    input: R,
    objects: ObjectTable,
    state: ProtoState,
    fd_map: &'a mut dyn FdTranslationMap,
    sink: &'a mut dyn MessageSink,
    logger: &'a dyn Logger,
    metrics: Arc<Metrics>,
    from_client: bool,
    on_display_side: bool,
    buf: Vec<u8>,
    fds: Vec<RawFd>,
}

impl<'a, R: AsyncRead + Unpin> DirectionLoop<'a, R> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        input: R,
        objects: ObjectTable,
        state: ProtoState,
        fd_map: &'a mut dyn FdTranslationMap,
        sink: &'a mut dyn MessageSink,
        logger: &'a dyn Logger,
        metrics: Arc<Metrics>,
        from_client: bool,
        on_display_side: bool,
    ) -> Self {
        Self {
            input,
            objects,
            state,
            fd_map,
            sink,
            logger,
            metrics,
            from_client,
            on_display_side,
            buf: Vec::new(),
            fds: Vec::new(),
        }
    }

    /// Feed descriptors received alongside the byte stream, in arrival
    /// order, before the next [`DirectionLoop::run`] iteration consumes
    /// them.
    pub fn push_fds(&mut self, fds: &[RawFd]) {
        self.fds.extend_from_slice(fds);
    }

    /// Run until the input stream closes or a hard parse error occurs.
    pub async fn run(&mut self) -> Result<()> {
        let mut chunk = [0u8; 4096];
        loop {
            let n = self.input.read(&mut chunk).await?;
            if n == 0 {
                return Ok(());
            }
            self.buf.extend_from_slice(&chunk[..n]);
            self.drain_complete_messages()?;
        }
    }

    fn drain_complete_messages(&mut self) -> Result<()> {
        while self.buf.len() >= 8 {
            let declared = peek_message_size(&self.buf) as usize;
            if declared < 8 || self.buf.len() < declared {
                break;
            }

            let total_len = self.buf.len();
            let fd_total = self.fds.len();
            let mut byte_window = ByteWindow::new(&mut self.buf[..], 0, declared);
            let mut fd_window = FdWindow::new(&mut self.fds, 0, fd_total);

            let outcome = handle_message(
                &mut self.objects,
                self.fd_map,
                &mut self.state,
                self.logger,
                self.from_client,
                self.on_display_side,
                &mut byte_window,
                &mut fd_window,
            )?;

            let forward_len = byte_window.zone_end;
            let fds_consumed = fd_window.zone_start;

            match outcome {
                DispatchOutcome::Known => {
                    let fds_to_send: Vec<RawFd> = self.fds[..fds_consumed].to_vec();
                    if forward_len > 0 {
                        let _ = self.sink.send(&self.buf[..forward_len], &fds_to_send);
                        self.metrics.record_message(forward_len as u64);
                    }
                }
                DispatchOutcome::Unknown { fd_window_not_advanced } => {
                    if fd_window_not_advanced {
                        log_via!(
                            self.logger,
                            LogLevel::Debug,
                            "forwarding unknown message without fd accounting"
                        );
                    }
                    let _ = self.sink.send(&self.buf[..declared], &[]);
                    self.metrics.record_message(declared as u64);
                }
            }

            self.buf.drain(0..declared);
            self.fds.drain(0..fds_consumed);
            let _ = total_len;
        }
        Ok(())
    }
}
