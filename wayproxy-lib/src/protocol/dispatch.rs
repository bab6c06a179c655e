//! The message dispatcher: decode one framed message's arguments according
//! to its signature and invoke the registered handler. Direct translation
//! of `handle_message`/`invoke_msg_handler` in the reference
//! implementation's `parsing.c`, with the `ffi_call` native argument list
//! replaced by a typed [`Argument`] slice.

use thiserror::Error;

use super::argument::Argument;
use super::interface::HandlerContext;
use super::object::{ObjectEntry, ObjectTable};
use super::registry::UNKNOWN;
use super::signature::{parse_signature, ArgKind};
use super::state::ProtoState;
use super::wire::{read_header, ByteWindow, FdWindow};
use crate::fd::FdTranslationMap;
use crate::interval::ceildiv;
use crate::log_via;
use crate::telemetry::logger::{LogLevel, Logger};

/// Hard failures that abort the connection, as distinct from the
/// *unknown*/*overflow* outcomes that are ordinary control flow.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DispatchError {
    #[error("message length field {declared} disagrees with window size {actual}")]
    LengthMismatch { declared: u16, actual: usize },
}

/// The result of attempting to dispatch one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The object and opcode were recognised; a handler may or may not have
    /// run (it does not run on a decode overflow, or when the object has no
    /// handler registered for that opcode). Either way the caller should
    /// forward whatever bytes/fds the window now holds.
    Known,
    /// The object id or opcode was not recognised. The caller must forward
    /// the message verbatim. `fd_window_not_advanced` is always `true`: the
    /// fd zone is left untouched because the number of descriptors an
    /// unrecognised message carries cannot be known without its signature
    /// (see the design notes); the caller should log this rather than
    /// silently inherit the desynchronisation risk.
    Unknown { fd_window_not_advanced: bool },
}

/// Decode and dispatch the one message occupying `byte_window`, consuming
/// `h`-typed arguments from `fd_window`.
#[allow(clippy::too_many_arguments)]
pub fn handle_message(
    objects: &mut ObjectTable,
    fd_map: &mut dyn FdTranslationMap,
    state: &mut ProtoState,
    logger: &dyn Logger,
    from_client: bool,
    on_display_side: bool,
    byte_window: &mut ByteWindow,
    fd_window: &mut FdWindow,
) -> Result<DispatchOutcome, DispatchError> {
    let msg_bytes = byte_window.message().to_vec();
    if msg_bytes.len() < 8 {
        return Err(DispatchError::LengthMismatch { declared: 0, actual: msg_bytes.len() });
    }
    let header = read_header(&msg_bytes);
    if header.length_bytes as usize != msg_bytes.len() {
        return Err(DispatchError::LengthMismatch {
            declared: header.length_bytes,
            actual: msg_bytes.len(),
        });
    }

    let Some(entry) = objects.get(header.object_id).copied() else {
        log_via!(logger, LogLevel::Trace, "unidentified object {}", header.object_id);
        return Ok(DispatchOutcome::Unknown { fd_window_not_advanced: true });
    };

    let msg_def = if from_client {
        entry.interface.request(header.opcode)
    } else {
        entry.interface.event(header.opcode)
    };
    let Some(msg_def) = msg_def else {
        log_via!(
            logger,
            LogLevel::Trace,
            "unidentified opcode {} on interface {}",
            header.opcode,
            entry.interface.name
        );
        return Ok(DispatchOutcome::Unknown { fd_window_not_advanced: true });
    };

    let sig_args = parse_signature(msg_def.signature);
    let mut payload_words: Vec<u32> =
        msg_bytes[8..].chunks_exact(4).map(|c| u32::from_le_bytes(c.try_into().unwrap())).collect();

    let mut args = Vec::with_capacity(sig_args.len());
    let mut i = 0usize;
    let mut fds_used = 0usize;

    for sa in &sig_args {
        match sa.kind {
            ArgKind::Int => {
                let Some(w) = payload_words.get(i) else {
                    return overflow(logger, &header, msg_def.name, "byte");
                };
                args.push(Argument::Int(*w as i32));
                i += 1;
            }
            ArgKind::Uint => {
                let Some(w) = payload_words.get(i) else {
                    return overflow(logger, &header, msg_def.name, "byte");
                };
                args.push(Argument::Uint(*w));
                i += 1;
            }
            ArgKind::Fixed => {
                let Some(w) = payload_words.get(i) else {
                    return overflow(logger, &header, msg_def.name, "byte");
                };
                args.push(Argument::Fixed(*w as i32));
                i += 1;
            }
            ArgKind::Object => {
                let Some(w) = payload_words.get(i) else {
                    return overflow(logger, &header, msg_def.name, "byte");
                };
                args.push(Argument::Object(if *w == 0 { None } else { Some(*w) }));
                i += 1;
            }
            ArgKind::NewId => {
                let Some(w) = payload_words.get(i) else {
                    return overflow(logger, &header, msg_def.name, "byte");
                };
                let new_id = *w;
                i += 1;
                let descriptor = msg_def.new_id_interface.unwrap_or(&UNKNOWN);
                let new_entry = ObjectEntry { id: new_id, interface: descriptor };
                if let Err(e) = objects.insert(new_entry) {
                    log_via!(logger, LogLevel::Warn, "{e}, dropping message");
                    return Ok(DispatchOutcome::Known);
                }
                // Requests pass the numeric id the caller already chose;
                // events pass the entry itself, since the callee picked the
                // id and needs more than a bare number to act on it.
                args.push(if from_client {
                    Argument::NewId(new_id)
                } else {
                    Argument::NewIdEvent(new_entry)
                });
            }
            ArgKind::String | ArgKind::Array => {
                let Some(w) = payload_words.get(i) else {
                    return overflow(logger, &header, msg_def.name, "byte");
                };
                let len = *w;
                i += 1;
                let word_count = ceildiv(len as i64, 4) as usize;
                if i + word_count > payload_words.len() {
                    return overflow(logger, &header, msg_def.name, "byte");
                }
                let byte_start = 8 + i * 4;
                let byte_end = byte_start + len as usize;
                let slice = &msg_bytes[byte_start..byte_end];
                args.push(if sa.kind == ArgKind::String {
                    Argument::Str(slice)
                } else {
                    Argument::Array(slice)
                });
                i += word_count;
            }
            ArgKind::Fd => {
                if fds_used >= fd_window.remaining() {
                    return overflow(logger, &header, msg_def.name, "fd");
                }
                let fd = fd_window.fds[fd_window.zone_start + fds_used];
                args.push(Argument::Fd(fd));
                fds_used += 1;
            }
        }
    }
    if i != payload_words.len() {
        log_via!(
            logger,
            LogLevel::Warn,
            "parse length mismatch for {}.{}: used {} expected {}",
            entry.interface.name,
            msg_def.name,
            i * 4,
            payload_words.len() * 4
        );
    }

    let mut drop_this_msg = false;
    let mut fds_changed = false;
    let mut out_message_length = payload_words.len() as u32;

    if let Some(handler) = msg_def.handler {
        let available_space = byte_window.available_space() as u32;
        let mut ctx = HandlerContext {
            objects,
            fd_map,
            state,
            logger,
            object_id: header.object_id,
            on_display_side,
            from_client,
            message: &mut payload_words,
            message_length: payload_words.len() as u32,
            message_available_space: available_space,
            fd_window,
            drop_this_msg: false,
            fds_changed: false,
        };
        handler(&mut ctx, &args);
        drop_this_msg = ctx.drop_this_msg;
        fds_changed = ctx.fds_changed;
        out_message_length = ctx.message_length;
    }

    if drop_this_msg {
        fd_window.compact_front(fds_used);
        byte_window.zone_end = byte_window.zone_start;
    } else {
        if !fds_changed {
            fd_window.advance(fds_used);
        }
        let new_len = out_message_length.min(payload_words.len() as u32) as usize;
        let new_byte_len = 8 + new_len * 4;
        let header_word1 = ((new_byte_len as u32) << 16) | header.opcode as u32;
        let buf = byte_window.message_mut();
        buf[4..8].copy_from_slice(&header_word1.to_le_bytes());
        for (k, w) in payload_words[..new_len].iter().enumerate() {
            buf[8 + k * 4..8 + k * 4 + 4].copy_from_slice(&w.to_le_bytes());
        }
        byte_window.zone_end = byte_window.zone_start + new_byte_len;
    }

    Ok(DispatchOutcome::Known)
}

fn overflow(
    logger: &dyn Logger,
    header: &super::wire::Header,
    message: &str,
    kind: &str,
) -> Result<DispatchOutcome, DispatchError> {
    log_via!(
        logger,
        LogLevel::Warn,
        "message parse overflow for object {} ({message}, {kind})",
        header.object_id
    );
    Ok(DispatchOutcome::Known)
}
