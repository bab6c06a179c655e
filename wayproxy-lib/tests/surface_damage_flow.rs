//! End-to-end exercise of the dispatcher against the concrete interface
//! registry: walks a `wl_shm`/`wl_compositor` session through pool, buffer,
//! surface, damage and commit, the way a real client would, and checks the
//! resulting damage set.
//!
//! `wl_registry.bind` targets are inserted directly rather than dispatched,
//! since this proxy does not statically know which interface a bind targets
//! (see the open question recorded in `protocol::registry`); a real
//! deployment resolves that from the registry's advertised interface name.

use wayproxy_lib::protocol::dispatch::handle_message;
use wayproxy_lib::protocol::object::{ObjectEntry, ObjectTable};
use wayproxy_lib::protocol::registry::{WL_COMPOSITOR, WL_DISPLAY, WL_SHM};
use wayproxy_lib::protocol::state::ProtoState;
use wayproxy_lib::protocol::wire::{ByteWindow, FdWindow};
use wayproxy_lib::{FdTranslationMap, PassthroughFdMap, TracingLogger};

fn message(object_id: u32, opcode: u16, words: &[u32]) -> Vec<u8> {
    let len = 8 + words.len() * 4;
    let mut bytes = Vec::with_capacity(len);
    bytes.extend_from_slice(&object_id.to_le_bytes());
    let w1 = ((len as u32) << 16) | opcode as u32;
    bytes.extend_from_slice(&w1.to_le_bytes());
    for w in words {
        bytes.extend_from_slice(&w.to_le_bytes());
    }
    bytes
}

struct Fixture {
    objects: ObjectTable,
    state: ProtoState,
    fd_map: PassthroughFdMap,
    fds: Vec<std::os::unix::io::RawFd>,
    logger: TracingLogger,
}

impl Fixture {
    fn new(margin: i32) -> Self {
        let mut objects = ObjectTable::new();
        objects.insert(ObjectEntry { id: 1, interface: &WL_DISPLAY }).unwrap();
        objects.insert(ObjectEntry { id: 2, interface: &WL_COMPOSITOR }).unwrap();
        objects.insert(ObjectEntry { id: 3, interface: &WL_SHM }).unwrap();
        Self {
            objects,
            state: ProtoState::with_margin(margin),
            fd_map: PassthroughFdMap,
            fds: Vec::new(),
            logger: TracingLogger,
        }
    }

    fn dispatch(&mut self, bytes: &mut Vec<u8>) {
        let fd_total = self.fds.len();
        let mut fd_window = FdWindow::new(&mut self.fds, 0, fd_total);
        let len = bytes.len();
        let mut byte_window = ByteWindow::new(bytes, 0, len);
        handle_message(
            &mut self.objects,
            &mut self.fd_map,
            &mut self.state,
            &self.logger,
            true,
            false,
            &mut byte_window,
            &mut fd_window,
        )
        .expect("well-formed message should dispatch");
    }
}

#[test]
fn full_session_produces_expected_damage_interval() {
    let mut f = Fixture::new(16);
    f.fds.push(99); // stand-in shm pool fd

    // wl_shm.create_pool(new_id=4, fd, size=4096): signature "nhi".
    let mut m = message(3, 0, &[4, 4096]);
    f.dispatch(&mut m);
    assert_eq!(f.objects.get(4).unwrap().interface.name, "wl_shm_pool");

    // wl_shm_pool.create_buffer(new_id=5, offset=0, width=64, height=64, stride=256, format=0).
    let mut m = message(4, 0, &[5, 0, 64, 64, 256, 0]);
    f.dispatch(&mut m);
    assert_eq!(f.objects.get(5).unwrap().interface.name, "wl_buffer");
    assert!(f.state.buffer(5).is_some());

    // wl_compositor.create_surface(new_id=6).
    let mut m = message(2, 0, &[6]);
    f.dispatch(&mut m);
    assert_eq!(f.objects.get(6).unwrap().interface.name, "wl_surface");

    // wl_surface.attach(buffer=5, x=0, y=0): opcode 1, signature "?oii".
    let mut m = message(6, 1, &[5, 0, 0]);
    f.dispatch(&mut m);
    assert_eq!(f.state.surface(6).unwrap().attached_buffer, Some(5));

    // wl_surface.damage_buffer(x=4, y=2, width=8, height=3): opcode 9.
    let mut m = message(6, 9, &[4, 2, 8, 3]);
    f.dispatch(&mut m);
    assert_eq!(f.state.surface(6).unwrap().pending_buffer_damage.len(), 1);

    // wl_surface.commit: opcode 6.
    let mut m = message(6, 6, &[]);
    f.dispatch(&mut m);

    assert!(f.state.surface(6).unwrap().pending_buffer_damage.is_empty());
    let damage = f.state.damage_set_mut(5).unwrap();
    let intervals = damage.intervals().unwrap();
    assert_eq!(intervals.len(), 1);
    assert_eq!(intervals[0].start, 2 * 256 + 4 * 4);
    assert_eq!(intervals[0].width, 8 * 4);
    assert_eq!(intervals[0].stride, 256);
    assert_eq!(intervals[0].rep, 3);

    // wl_buffer.destroy drops the bookkeeping and the object table entry (E8).
    let mut m = message(5, 0, &[]);
    f.dispatch(&mut m);
    assert!(f.state.buffer(5).is_none());
    assert!(f.state.damage_set_mut(5).is_none());
    assert!(f.objects.get(5).is_none());

    // A stale damage_buffer/commit pair against the now-destroyed buffer id
    // is inert: no panic, no damage recorded anywhere.
    let mut m = message(6, 9, &[0, 0, 1, 1]);
    f.dispatch(&mut m);
    let mut m = message(6, 6, &[]);
    f.dispatch(&mut m);
    assert!(f.state.damage_set_mut(5).is_none());
}

#[test]
fn unrecognised_global_forwards_as_unknown_without_corrupting_state() {
    let mut f = Fixture::new(16);
    // object 999 was never bound to anything; the dispatcher should treat
    // this as Unknown and not panic or mutate any tracked state.
    let mut m = message(999, 0, &[1, 2, 3]);
    let fd_total = f.fds.len();
    let mut fd_window = FdWindow::new(&mut f.fds, 0, fd_total);
    let len = m.len();
    let mut byte_window = ByteWindow::new(&mut m, 0, len);
    let outcome = handle_message(
        &mut f.objects,
        &mut f.fd_map,
        &mut f.state,
        &f.logger,
        true,
        false,
        &mut byte_window,
        &mut fd_window,
    )
    .unwrap();
    assert!(matches!(
        outcome,
        wayproxy_lib::DispatchOutcome::Unknown { fd_window_not_advanced: true }
    ));
}

#[test]
fn passthrough_fd_map_translate_matches_input() {
    let mut map = PassthroughFdMap;
    assert_eq!(map.translate(7), 7);
}
