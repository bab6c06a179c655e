//! Interface descriptors: the static vtables the dispatcher resolves
//! `(object, opcode)` pairs against. Translates `struct wl_interface` /
//! `struct wl_message` from the reference implementation into `'static`
//! Rust data plus a typed handler function pointer in place of `ffi_call`.

use super::argument::Argument;
use super::object::ObjectTable;
use super::wire::FdWindow;
use crate::fd::FdTranslationMap;
use crate::protocol::state::ProtoState;
use crate::telemetry::logger::Logger;

/// One request or event: its name (for logging), wire signature, the
/// interface a `new_id` argument should be registered under (if any), and
/// the handler to invoke once arguments are decoded.
pub struct MessageSignature {
    pub name: &'static str,
    pub signature: &'static str,
    /// Declared type of this message's `new_id` argument, if it has one.
    /// `wl_registry.bind` has none statically (the bound interface is
    /// supplied positionally by the client), which the registry handles by
    /// leaving this `None` and tracking the bound object generically.
    pub new_id_interface: Option<&'static InterfaceDescriptor>,
    pub handler: Option<HandlerFn>,
}

/// The vtable for one interface: its name and its ordered request/event
/// tables, indexed by opcode exactly as `msg = &intf->methods[meth]` does in
/// the reference implementation.
pub struct InterfaceDescriptor {
    pub name: &'static str,
    pub requests: &'static [MessageSignature],
    pub events: &'static [MessageSignature],
}

impl InterfaceDescriptor {
    pub fn request(&self, opcode: u16) -> Option<&'static MessageSignature> {
        self.requests.get(opcode as usize)
    }

    pub fn event(&self, opcode: u16) -> Option<&'static MessageSignature> {
        self.events.get(opcode as usize)
    }
}

/// Everything a handler may read or mutate, gathered in one place so the
/// handler function pointer type stays uniform across every (interface,
/// opcode) pair.
///
/// Mirrors the context struct implied by the reference implementation's
/// `invoke_msg_handler` call (object table, fd map, in-out message buffer,
/// in-out fd window), extended with `state` so handlers can reach the
/// buffer-geometry and surface-attachment bookkeeping needed to turn
/// `wl_surface` requests into damage-set updates.
pub struct HandlerContext<'a> {
    pub objects: &'a mut ObjectTable,
    pub fd_map: &'a mut dyn FdTranslationMap,
    pub state: &'a mut ProtoState,
    pub logger: &'a dyn Logger,
    pub object_id: u32,
    pub on_display_side: bool,
    pub from_client: bool,

    /// The message payload words, excluding the 8-byte header, available
    /// for in-place rewriting.
    pub message: &'a mut [u32],
    /// How many of `message`'s words are the message body; handlers may
    /// shrink this if they truncate the payload.
    pub message_length: u32,
    pub message_available_space: u32,
    pub fd_window: &'a mut FdWindow<'a>,

    /// Set by a handler to drop this message instead of forwarding it.
    pub drop_this_msg: bool,
    /// Set by a handler that has already adjusted `fd_window` itself, so
    /// the dispatcher's default "advance by the number of `h` args consumed"
    /// step is skipped.
    pub fds_changed: bool,
}

/// A handler function: receives the shared context and the arguments
/// decoded according to the message's signature, in order.
pub type HandlerFn = fn(&mut HandlerContext, &[Argument]);
