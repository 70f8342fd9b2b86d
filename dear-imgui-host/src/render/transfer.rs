//! Owned copies of backend draw lists.
//!
//! Backend draw data is transient. Each processed tick copies it into
//! [`DrawList`]s owned by the context proxy, replacing the previous frame
//! wholesale while reusing allocations. Painting then reads the owned lists
//! as many times as the host needs.

use super::draw_data::{CmdList, DrawCmd, DrawData, DrawIdx, DrawVert};
use crate::math::{Rect, unpack_color};
use crate::transform::CanvasTransform;

/// Vertex in the host's format: screen-space position, UV and RGBA8 color.
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct HostVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub color: [u8; 4],
}

/// Index type of host vertex buffers
pub type HostIndex = u32;

/// Draw command of an owned list
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub cmd: DrawCmd,
}

impl DrawCommand {
    /// Number of indices to draw
    pub fn num_elements(&self) -> u32 {
        self.cmd.elem_count
    }

    /// Clip rectangle transformed by `transform`
    pub fn clip_rect(&self, transform: &CanvasTransform) -> Rect {
        transform.transform_rect(Rect::from_clip_rect(self.cmd.clip_rect))
    }
}

/// Owned copy of one backend draw list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    vtx_buffer: Vec<DrawVert>,
    idx_buffer: Vec<DrawIdx>,
    commands: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces this list's content with a copy of `source`.
    pub fn transfer_from(&mut self, source: &CmdList) {
        self.vtx_buffer.clear();
        self.vtx_buffer.extend_from_slice(source.vtx_buffer());
        self.idx_buffer.clear();
        self.idx_buffer.extend_from_slice(source.idx_buffer());
        self.commands.clear();
        self.commands.extend_from_slice(source.commands());
    }

    pub fn vtx_buffer(&self) -> &[DrawVert] {
        &self.vtx_buffer
    }

    pub fn idx_buffer(&self) -> &[DrawIdx] {
        &self.idx_buffer
    }

    /// Vertex buffer as raw bytes for direct upload
    pub fn vtx_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vtx_buffer)
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    pub fn num_commands(&self) -> usize {
        self.commands.len()
    }

    pub fn command(&self, index: usize) -> Option<DrawCommand> {
        self.commands.get(index).map(|&cmd| DrawCommand { cmd })
    }

    /// Writes every vertex into `out` in host format, positions mapped through
    /// `transform`. UVs are copied verbatim.
    pub fn copy_vertex_data(&self, out: &mut Vec<HostVertex>, transform: &CanvasTransform) {
        out.clear();
        out.extend(self.vtx_buffer.iter().map(|vert| HostVertex {
            pos: transform.transform_point(vert.pos),
            uv: vert.uv,
            color: unpack_color(vert.col),
        }));
    }

    /// Writes `count` indices starting at `offset` into `out`, rebased by
    /// `vtx_offset` so they address the full vertex buffer.
    pub fn copy_index_data(
        &self,
        out: &mut Vec<HostIndex>,
        offset: usize,
        count: usize,
        vtx_offset: u32,
    ) {
        out.clear();
        let end = (offset + count).min(self.idx_buffer.len());
        let start = offset.min(end);
        out.extend(
            self.idx_buffer[start..end]
                .iter()
                .map(|&idx| idx as HostIndex + vtx_offset),
        );
    }
}

/// Replaces `lists` with copies of the lists in `draw_data`.
///
/// Missing draw data or an empty frame clears `lists`; otherwise it is
/// resized to the number of backend lists and each entry is overwritten.
pub fn transfer_draw_data(draw_data: Option<&DrawData>, lists: &mut Vec<DrawList>) {
    let sources = draw_data.map(DrawData::draw_lists).unwrap_or_default();
    if sources.is_empty() {
        lists.clear();
        return;
    }
    lists.resize_with(sources.len(), DrawList::default);
    for (list, source) in lists.iter_mut().zip(sources) {
        list.transfer_from(source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::TextureId;
    use pretty_assertions::assert_eq;

    fn list_with_quads(quads: usize) -> CmdList {
        let mut list = CmdList::new();
        for i in 0..quads {
            let x = i as f32 * 10.0;
            list.prim_rect(
                Rect::new([x, 0.0], [x + 10.0, 10.0]),
                [0.5, 0.5],
                0xFF0000FF,
                TextureId::null(),
            );
        }
        list
    }

    fn frame(lists: Vec<CmdList>) -> DrawData {
        let mut data = DrawData::new([0.0, 0.0], [800.0, 600.0]);
        data.set_draw_lists(lists);
        data
    }

    #[test]
    fn transfer_replaces_previous_content() {
        let mut lists = Vec::new();
        transfer_draw_data(Some(&frame(vec![list_with_quads(3), list_with_quads(1)])), &mut lists);
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].vtx_buffer().len(), 12);

        transfer_draw_data(Some(&frame(vec![list_with_quads(1)])), &mut lists);
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].vtx_buffer().len(), 4);
        assert_eq!(lists[0].idx_buffer().len(), 6);
    }

    #[test]
    fn empty_or_missing_frame_clears_lists() {
        let mut lists = Vec::new();
        transfer_draw_data(Some(&frame(vec![list_with_quads(2)])), &mut lists);
        transfer_draw_data(Some(&frame(Vec::new())), &mut lists);
        assert!(lists.is_empty());

        transfer_draw_data(Some(&frame(vec![list_with_quads(2)])), &mut lists);
        transfer_draw_data(None, &mut lists);
        assert!(lists.is_empty());
    }

    #[test]
    fn transfer_copies_verbatim() {
        let source = list_with_quads(2);
        let mut owned = DrawList::new();
        owned.transfer_from(&source);
        assert_eq!(owned.vtx_buffer(), source.vtx_buffer());
        assert_eq!(owned.idx_buffer(), source.idx_buffer());
        assert_eq!(owned.commands(), source.commands());
    }

    #[test]
    fn vertex_copy_transforms_positions_only() {
        let mut owned = DrawList::new();
        owned.transfer_from(&list_with_quads(1));
        let transform = CanvasTransform::from_scale_translation(2.0, [5.0, 7.0]);

        let mut out = Vec::new();
        owned.copy_vertex_data(&mut out, &transform);

        assert_eq!(out.len(), 4);
        assert_eq!(out[2].pos, [25.0, 27.0]);
        assert_eq!(out[2].uv, [0.5, 0.5]);
        assert_eq!(out[2].color, [255, 0, 0, 255]);
    }

    #[test]
    fn index_copy_rebases_and_clamps() {
        let mut owned = DrawList::new();
        owned.transfer_from(&list_with_quads(2));

        let mut out = Vec::new();
        owned.copy_index_data(&mut out, 6, 6, 0);
        assert_eq!(out, vec![4, 5, 6, 4, 6, 7]);

        owned.copy_index_data(&mut out, 6, 100, 10);
        assert_eq!(out, vec![14, 15, 16, 14, 16, 17]);
    }
}
