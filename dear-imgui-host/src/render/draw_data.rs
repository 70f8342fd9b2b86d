//! Draw data as produced by a GUI backend.
//!
//! A [`DrawData`] is owned by the backend and only valid until its next frame
//! begins. Hosts keep what they need by transferring it into owned
//! [`DrawList`](super::DrawList)s.

use bytemuck::{Pod, Zeroable};

use crate::math::{ColorU32, Rect, Vector2};
use crate::texture::TextureId;

/// Clip rectangle used when nothing narrower has been pushed.
pub const UNBOUNDED_CLIP_RECT: [f32; 4] = [-8192.0, -8192.0, 8192.0, 8192.0];

/// Vertex format of backend draw lists
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct DrawVert {
    /// Position (2D)
    pub pos: [f32; 2],
    /// UV coordinates
    pub uv: [f32; 2],
    /// Color (packed RGBA)
    pub col: u32,
}

/// Index type of backend draw lists
pub type DrawIdx = u16;

/// One draw call: a run of indices sharing a clip rectangle and a texture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawCmd {
    /// Number of indices to draw
    pub elem_count: u32,
    /// Clip rectangle in canvas space, `[x1, y1, x2, y2]`
    pub clip_rect: [f32; 4],
    /// Texture to sample
    pub texture_id: TextureId,
    /// Added to every index of this command
    pub vtx_offset: u32,
    /// First index of this command in the index buffer
    pub idx_offset: u32,
}

/// Backend-side draw list with a small primitive builder.
#[derive(Clone, Debug, Default)]
pub struct CmdList {
    cmd_buffer: Vec<DrawCmd>,
    vtx_buffer: Vec<DrawVert>,
    idx_buffer: Vec<DrawIdx>,
    clip_stack: Vec<[f32; 4]>,
}

impl CmdList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties the list, keeping its allocations.
    pub fn clear(&mut self) {
        self.cmd_buffer.clear();
        self.vtx_buffer.clear();
        self.idx_buffer.clear();
        self.clip_stack.clear();
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmd_buffer
    }

    pub fn vtx_buffer(&self) -> &[DrawVert] {
        &self.vtx_buffer
    }

    pub fn idx_buffer(&self) -> &[DrawIdx] {
        &self.idx_buffer
    }

    /// Whether nothing has been drawn into this list.
    pub fn is_empty(&self) -> bool {
        self.cmd_buffer.iter().all(|cmd| cmd.elem_count == 0)
    }

    /// Current clip rectangle
    pub fn clip_rect(&self) -> [f32; 4] {
        self.clip_stack
            .last()
            .copied()
            .unwrap_or(UNBOUNDED_CLIP_RECT)
    }

    /// Pushes a clip rectangle, narrowed by the current one.
    pub fn push_clip_rect(&mut self, rect: Rect) {
        let current = Rect::from_clip_rect(self.clip_rect());
        self.clip_stack
            .push(rect.intersection(&current).to_clip_rect());
    }

    pub fn pop_clip_rect(&mut self) {
        let popped = self.clip_stack.pop();
        debug_assert!(popped.is_some(), "clip rect stack underflow");
    }

    /// Adds an axis-aligned textured quad.
    pub fn prim_rect_uv(
        &mut self,
        rect: Rect,
        uv_min: Vector2,
        uv_max: Vector2,
        col: ColorU32,
        texture_id: TextureId,
    ) {
        let corners = [
            ([rect.min[0], rect.min[1]], [uv_min[0], uv_min[1]]),
            ([rect.max[0], rect.min[1]], [uv_max[0], uv_min[1]]),
            ([rect.max[0], rect.max[1]], [uv_max[0], uv_max[1]]),
            ([rect.min[0], rect.max[1]], [uv_min[0], uv_max[1]]),
        ];
        let cmd = self.reserve(4, 6, texture_id);
        let base = (self.vtx_buffer.len() as u32 - self.cmd_buffer[cmd].vtx_offset) as DrawIdx;
        for (pos, uv) in corners {
            self.vtx_buffer.push(DrawVert { pos, uv, col });
        }
        self.idx_buffer
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        self.cmd_buffer[cmd].elem_count += 6;
    }

    /// Adds a solid quad sampling a single texel (usually the atlas white texel).
    pub fn prim_rect(&mut self, rect: Rect, white_uv: Vector2, col: ColorU32, texture_id: TextureId) {
        self.prim_rect_uv(rect, white_uv, white_uv, col, texture_id);
    }

    /// Returns the command that the next primitive should extend, starting a
    /// new one when the clip rectangle or texture changes or when 16-bit
    /// indices would overflow.
    fn reserve(&mut self, vtx_count: usize, idx_count: usize, texture_id: TextureId) -> usize {
        let clip_rect = self.clip_rect();
        let vtx_len = self.vtx_buffer.len() as u32;
        let idx_len = self.idx_buffer.len() as u32;
        let reusable = self.cmd_buffer.last().is_some_and(|last| {
            last.clip_rect == clip_rect
                && last.texture_id == texture_id
                && last.idx_offset + last.elem_count == idx_len
                && (vtx_len - last.vtx_offset) as usize + vtx_count <= DrawIdx::MAX as usize + 1
        });
        if !reusable {
            let vtx_offset = match self.cmd_buffer.last() {
                Some(last)
                    if (vtx_len - last.vtx_offset) as usize + vtx_count
                        <= DrawIdx::MAX as usize + 1 =>
                {
                    last.vtx_offset
                }
                _ => vtx_len,
            };
            self.cmd_buffer.push(DrawCmd {
                elem_count: 0,
                clip_rect,
                texture_id,
                vtx_offset,
                idx_offset: idx_len,
            });
        }
        self.vtx_buffer.reserve(vtx_count);
        self.idx_buffer.reserve(idx_count);
        self.cmd_buffer.len() - 1
    }
}

/// Output of one backend frame.
#[derive(Clone, Debug, Default)]
pub struct DrawData {
    /// Top-left of the rendered area, in canvas space
    pub display_pos: Vector2,
    /// Size of the rendered area, in canvas space
    pub display_size: Vector2,
    /// Canvas units to framebuffer pixels
    pub framebuffer_scale: Vector2,
    draw_lists: Vec<CmdList>,
}

impl DrawData {
    pub fn new(display_pos: Vector2, display_size: Vector2) -> Self {
        Self {
            display_pos,
            display_size,
            framebuffer_scale: [1.0, 1.0],
            draw_lists: Vec::new(),
        }
    }

    /// Draw lists in back-to-front order
    pub fn draw_lists(&self) -> &[CmdList] {
        &self.draw_lists
    }

    pub fn draw_lists_count(&self) -> usize {
        self.draw_lists.len()
    }

    /// Replaces the lists of this frame, returning the previous storage for reuse.
    pub fn set_draw_lists(&mut self, lists: Vec<CmdList>) -> Vec<CmdList> {
        std::mem::replace(&mut self.draw_lists, lists)
    }

    pub fn total_vtx_count(&self) -> usize {
        self.draw_lists.iter().map(|list| list.vtx_buffer.len()).sum()
    }

    pub fn total_idx_count(&self) -> usize {
        self.draw_lists.iter().map(|list| list.idx_buffer.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WHITE_UV: Vector2 = [0.5, 0.5];

    #[test]
    fn quads_with_same_state_share_a_command() {
        let mut list = CmdList::new();
        list.prim_rect(Rect::new([0.0, 0.0], [10.0, 10.0]), WHITE_UV, 0xFFFFFFFF, TextureId::null());
        list.prim_rect(Rect::new([10.0, 0.0], [20.0, 10.0]), WHITE_UV, 0xFF0000FF, TextureId::null());

        assert_eq!(list.commands().len(), 1);
        assert_eq!(list.commands()[0].elem_count, 12);
        assert_eq!(list.vtx_buffer().len(), 8);
        assert_eq!(&list.idx_buffer()[6..], &[4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn texture_or_clip_change_starts_a_command() {
        let mut list = CmdList::new();
        let rect = Rect::new([0.0, 0.0], [4.0, 4.0]);
        list.prim_rect(rect, WHITE_UV, 0xFFFFFFFF, TextureId::null());
        list.prim_rect_uv(rect, [0.0, 0.0], [1.0, 1.0], 0xFFFFFFFF, TextureId::new(3));
        list.push_clip_rect(Rect::new([1.0, 1.0], [2.0, 2.0]));
        list.prim_rect_uv(rect, [0.0, 0.0], [1.0, 1.0], 0xFFFFFFFF, TextureId::new(3));
        list.pop_clip_rect();

        let commands = list.commands();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[1].texture_id, TextureId::new(3));
        assert_eq!(commands[1].idx_offset, 6);
        assert_eq!(commands[2].clip_rect, [1.0, 1.0, 2.0, 2.0]);
    }

    #[test]
    fn nested_clip_rects_intersect() {
        let mut list = CmdList::new();
        list.push_clip_rect(Rect::new([0.0, 0.0], [100.0, 100.0]));
        list.push_clip_rect(Rect::new([50.0, 50.0], [200.0, 200.0]));
        assert_eq!(list.clip_rect(), [50.0, 50.0, 100.0, 100.0]);
        list.pop_clip_rect();
        assert_eq!(list.clip_rect(), [0.0, 0.0, 100.0, 100.0]);
    }

    #[test]
    fn vertices_are_plain_bytes() {
        let vert = DrawVert {
            pos: [1.0, 2.0],
            uv: [0.0, 1.0],
            col: 0xFF00FF00,
        };
        let bytes: &[u8] = bytemuck::bytes_of(&vert);
        assert_eq!(bytes.len(), std::mem::size_of::<DrawVert>());
        assert_eq!(std::mem::size_of::<DrawVert>(), 20);
    }
}
