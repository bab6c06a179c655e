//! Per-connection protocol state: the bookkeeping the interface registry's
//! handlers need to turn `wl_surface` requests into damage-set updates, but
//! that the dispatcher core (§4.3/§4.4) has no opinion about. One instance
//! lives per direction's object table, owned by the same I/O loop.

use std::collections::HashMap;

use crate::damage::DamageSet;

/// Default merge margin (bytes) used when a connection's state is built
/// without an explicit configured value.
pub const DEFAULT_MERGE_MARGIN: i32 = 1024;

/// Shared-memory geometry for one `wl_buffer`, as declared by the
/// `wl_shm_pool.create_buffer` request that created it.
#[derive(Debug, Clone, Copy)]
pub struct BufferMeta {
    pub offset: i32,
    pub width: i32,
    pub height: i32,
    pub stride: i32,
    pub format: u32,
}

impl BufferMeta {
    /// Bytes per pixel for this buffer's declared SHM format.
    ///
    /// Only the two formats every compositor must support are recognised by
    /// name; anything else falls back to 4 bytes/pixel, which is correct for
    /// the overwhelming majority of real formats and never worse than a
    /// conservative overestimate for the rest.
    pub fn bytes_per_pixel(&self) -> i32 {
        match self.format {
            // wl_shm.format::argb8888 / xrgb8888
            0 | 1 => 4,
            _ => 4,
        }
    }
}

/// Pending, not-yet-committed damage recorded against one surface, in
/// whichever unit (`damage` or `damage_buffer`) the client used.
#[derive(Debug, Clone, Copy)]
pub struct PendingRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Everything tracked for one live `wl_surface`: which buffer it is
/// currently attached to and the rectangles accumulated since the last
/// commit.
#[derive(Debug, Clone, Default)]
pub struct SurfaceMeta {
    pub attached_buffer: Option<u32>,
    /// Pending rectangles from `wl_surface.damage` (surface-local units).
    /// Surface-local scaling is not modelled, so these are treated
    /// identically to buffer-unit rectangles at commit time.
    pub pending_damage: Vec<PendingRect>,
    /// Pending rectangles from `wl_surface.damage_buffer` (buffer units).
    pub pending_buffer_damage: Vec<PendingRect>,
}

/// The full per-connection protocol state threaded through every handler
/// invocation via [`crate::protocol::interface::HandlerContext`].
#[derive(Debug)]
pub struct ProtoState {
    buffers: HashMap<u32, BufferMeta>,
    damage_sets: HashMap<u32, DamageSet>,
    surfaces: HashMap<u32, SurfaceMeta>,
    pub merge_margin: i32,
}

impl Default for ProtoState {
    fn default() -> Self {
        Self::with_margin(DEFAULT_MERGE_MARGIN)
    }
}

impl ProtoState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_margin(merge_margin: i32) -> Self {
        Self {
            buffers: HashMap::new(),
            damage_sets: HashMap::new(),
            surfaces: HashMap::new(),
            merge_margin,
        }
    }

    pub fn register_buffer(&mut self, buffer_id: u32, meta: BufferMeta) {
        self.buffers.insert(buffer_id, meta);
        self.damage_sets.entry(buffer_id).or_insert_with(DamageSet::new);
    }

    pub fn buffer(&self, buffer_id: u32) -> Option<&BufferMeta> {
        self.buffers.get(&buffer_id)
    }

    /// Drop all bookkeeping for a destroyed buffer: geometry and damage set.
    pub fn destroy_buffer(&mut self, buffer_id: u32) {
        self.buffers.remove(&buffer_id);
        self.damage_sets.remove(&buffer_id);
    }

    pub fn damage_set_mut(&mut self, buffer_id: u32) -> Option<&mut DamageSet> {
        self.damage_sets.get_mut(&buffer_id)
    }

    pub fn surface_mut(&mut self, surface_id: u32) -> &mut SurfaceMeta {
        self.surfaces.entry(surface_id).or_default()
    }

    pub fn surface(&self, surface_id: u32) -> Option<&SurfaceMeta> {
        self.surfaces.get(&surface_id)
    }

    pub fn destroy_surface(&mut self, surface_id: u32) {
        self.surfaces.remove(&surface_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_destroy_removes_geometry_and_damage_set() {
        let mut s = ProtoState::new();
        s.register_buffer(5, BufferMeta { offset: 0, width: 64, height: 64, stride: 256, format: 0 });
        assert!(s.buffer(5).is_some());
        assert!(s.damage_set_mut(5).is_some());
        s.destroy_buffer(5);
        assert!(s.buffer(5).is_none());
        assert!(s.damage_set_mut(5).is_none());
    }

    #[test]
    fn surface_mut_creates_default_entry() {
        let mut s = ProtoState::new();
        assert!(s.surface(1).is_none());
        s.surface_mut(1).attached_buffer = Some(7);
        assert_eq!(s.surface(1).unwrap().attached_buffer, Some(7));
    }
}
