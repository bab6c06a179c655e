//! Concrete handlers for the interfaces in [`crate::protocol::registry`].
//! This is where the dispatcher's generic argument decoding meets the
//! buffer-damage bookkeeping: the only place in this crate that calls into
//! [`crate::damage`] from live protocol traffic rather than from a test.

use crate::interval::ExtInterval;
use crate::log_via;
use crate::telemetry::logger::LogLevel;

use super::argument::Argument;
use super::interface::HandlerContext;
use super::state::PendingRect;

/// `wl_display.delete_id` (event): the compositor has recycled an object
/// id. Remove the table entry generically so a later reuse of the same id
/// is accepted rather than rejected as a duplicate.
pub fn handle_delete_id(ctx: &mut HandlerContext, args: &[Argument]) {
    let Some(Argument::Uint(id)) = args.first() else { return };
    ctx.objects.remove(*id);
    ctx.state.destroy_buffer(*id);
    ctx.state.destroy_surface(*id);
}

/// `wl_shm_pool.create_buffer`: record the declared geometry of the new
/// buffer so later `wl_surface.damage_buffer` rectangles can be translated
/// into byte ranges.
///
/// Signature `niiiiu`: new_id, offset, width, height, stride, format.
pub fn handle_shm_pool_create_buffer(ctx: &mut HandlerContext, args: &[Argument]) {
    let (Some(Argument::NewId(buffer_id)), Some(Argument::Int(offset)), Some(Argument::Int(width)),
        Some(Argument::Int(height)), Some(Argument::Int(stride)), Some(Argument::Uint(format))) =
        (args.first(), args.get(1), args.get(2), args.get(3), args.get(4), args.get(5))
    else {
        log_via!(ctx.logger, LogLevel::Warn, "create_buffer: argument shape mismatch");
        return;
    };
    ctx.state.register_buffer(
        *buffer_id,
        super::state::BufferMeta { offset: *offset, width: *width, height: *height, stride: *stride, format: *format },
    );
}

/// `wl_buffer.destroy`: drop the geometry and damage set recorded for this
/// buffer, and remove its object table entry so the id can be reused. A
/// later reference to the same id from a stale `damage_buffer` is then
/// simply inert, since [`super::state::ProtoState::damage_set_mut`] returns
/// `None`.
pub fn handle_buffer_destroy(ctx: &mut HandlerContext, _args: &[Argument]) {
    ctx.objects.remove(ctx.object_id);
    ctx.state.destroy_buffer(ctx.object_id);
}

/// `wl_surface.attach`: record which buffer this surface now points to.
/// Signature `?oii`: buffer (nullable), x, y.
pub fn handle_surface_attach(ctx: &mut HandlerContext, args: &[Argument]) {
    let Some(Argument::Object(buffer)) = args.first() else { return };
    ctx.state.surface_mut(ctx.object_id).attached_buffer = *buffer;
}

/// `wl_surface.damage`: accumulate a surface-local damage rectangle.
/// Signature `iiii`: x, y, width, height.
pub fn handle_surface_damage(ctx: &mut HandlerContext, args: &[Argument]) {
    if let Some(rect) = decode_rect(args) {
        ctx.state.surface_mut(ctx.object_id).pending_damage.push(rect);
    }
}

/// `wl_surface.damage_buffer`: accumulate a buffer-unit damage rectangle.
/// Signature `iiii`: x, y, width, height.
pub fn handle_surface_damage_buffer(ctx: &mut HandlerContext, args: &[Argument]) {
    if let Some(rect) = decode_rect(args) {
        ctx.state.surface_mut(ctx.object_id).pending_buffer_damage.push(rect);
    }
}

/// `wl_surface.commit`: flush both pending rectangle lists into the damage
/// set of the currently attached buffer, then clear them.
pub fn handle_surface_commit(ctx: &mut HandlerContext, _args: &[Argument]) {
    let Some(attached) = ctx.state.surface(ctx.object_id).and_then(|s| s.attached_buffer) else {
        return;
    };
    let Some(meta) = ctx.state.buffer(attached).copied() else {
        return;
    };

    let rects: Vec<PendingRect> = {
        let Some(surface) = ctx.state.surface(ctx.object_id) else { return };
        surface.pending_damage.iter().chain(surface.pending_buffer_damage.iter()).copied().collect()
    };
    if rects.is_empty() {
        return;
    }

    let margin = ctx.state.merge_margin;
    let intervals: Vec<ExtInterval> = rects.iter().map(|r| rect_to_interval(r, &meta)).collect();
    if let Some(damage_set) = ctx.state.damage_set_mut(attached) {
        damage_set.insert(&intervals, margin);
    }

    let surface = ctx.state.surface_mut(ctx.object_id);
    surface.pending_damage.clear();
    surface.pending_buffer_damage.clear();
}

/// `wl_surface.destroy`: drop the surface's bookkeeping.
pub fn handle_surface_destroy(ctx: &mut HandlerContext, _args: &[Argument]) {
    ctx.state.destroy_surface(ctx.object_id);
}

fn decode_rect(args: &[Argument]) -> Option<PendingRect> {
    let (Some(Argument::Int(x)), Some(Argument::Int(y)), Some(Argument::Int(width)), Some(Argument::Int(height))) =
        (args.first(), args.get(1), args.get(2), args.get(3))
    else {
        return None;
    };
    Some(PendingRect { x: *x, y: *y, width: *width, height: *height })
}

/// Translate a damage rectangle into the extended-interval shape implied by
/// the buffer's row stride: row `y` occupies `[offset + y*stride + x*bpp,
/// offset + y*stride + (x+width)*bpp)`, repeated `height` times.
fn rect_to_interval(rect: &PendingRect, meta: &super::state::BufferMeta) -> ExtInterval {
    let bpp = meta.bytes_per_pixel();
    let row_start = meta.offset + rect.y * meta.stride + rect.x * bpp;
    let row_width = rect.width * bpp;
    ExtInterval { start: row_start, width: row_width, stride: meta.stride, rep: rect.height.max(1) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::state::BufferMeta;

    #[test]
    fn e7_damage_buffer_rect_maps_to_expected_interval() {
        let meta = BufferMeta { offset: 0, width: 640, height: 480, stride: 64, format: 0 };
        let rect = PendingRect { x: 4, y: 2, width: 8, height: 3 };
        let iv = rect_to_interval(&rect, &meta);
        assert_eq!(iv, ExtInterval { start: 2 * 64 + 4 * 4, width: 8 * 4, stride: 64, rep: 3 });
    }
}
