//! The Wayland wire protocol layer: framing, signatures, the object table,
//! the generic dispatcher, and the concrete interface registry this proxy
//! understands.

pub mod argument;
pub mod dispatch;
pub mod handlers;
pub mod interface;
pub mod object;
pub mod registry;
pub mod signature;
pub mod state;
pub mod wire;

pub use argument::Argument;
pub use dispatch::{handle_message, DispatchError, DispatchOutcome};
pub use interface::{HandlerContext, HandlerFn, InterfaceDescriptor, MessageSignature};
pub use object::{DuplicateIdError, ObjectEntry, ObjectTable};
pub use state::ProtoState;
