//! Emits captured draw lists as host draw elements.

use super::transfer::{DrawList, HostIndex, HostVertex};
use crate::math::Rect;
use crate::texture::TextureRegistry;
use crate::transform::CanvasTransform;

/// Receiver of host draw elements.
///
/// Every `draw_custom_verts` call is bracketed by `push_clip` and `pop_clip`.
pub trait PaintSink<T> {
    fn push_clip(&mut self, rect: Rect);

    /// Draws indexed triangles with the given texture. `indices` address
    /// `vertices`; both slices are only valid for the duration of the call.
    fn draw_custom_verts(&mut self, texture: &T, vertices: &[HostVertex], indices: &[HostIndex]);

    fn pop_clip(&mut self);
}

/// Scratch buffers reused across paints.
#[derive(Debug, Default)]
pub struct PaintBuffers {
    vertices: Vec<HostVertex>,
    indices: Vec<HostIndex>,
}

impl PaintBuffers {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Counters of one paint pass
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PaintStats {
    pub draw_lists: usize,
    pub draw_calls: usize,
    pub vertices: usize,
    pub indices: usize,
}

/// Paints `draw_lists` through `sink`.
///
/// Vertices are mapped with `canvas_to_screen`, each command's clip rectangle
/// is mapped the same way and intersected with `host_clip`, and texture ids
/// are resolved through `textures`. The draw lists are only read, so the same
/// frame can be painted any number of times.
pub fn paint_draw_lists<T, S>(
    draw_lists: &[DrawList],
    canvas_to_screen: &CanvasTransform,
    host_clip: Rect,
    textures: &TextureRegistry<T>,
    buffers: &mut PaintBuffers,
    sink: &mut S,
) -> PaintStats
where
    S: PaintSink<T> + ?Sized,
{
    let mut stats = PaintStats {
        draw_lists: draw_lists.len(),
        ..PaintStats::default()
    };

    for draw_list in draw_lists {
        draw_list.copy_vertex_data(&mut buffers.vertices, canvas_to_screen);
        stats.vertices += buffers.vertices.len();

        for index in 0..draw_list.num_commands() {
            let Some(command) = draw_list.command(index) else {
                continue;
            };
            let count = command.num_elements() as usize;
            if count == 0 {
                continue;
            }
            draw_list.copy_index_data(
                &mut buffers.indices,
                command.cmd.idx_offset as usize,
                count,
                command.cmd.vtx_offset,
            );

            let texture = textures.resolve(command.cmd.texture_id);
            let clip = command.clip_rect(canvas_to_screen).intersection(&host_clip);

            sink.push_clip(clip);
            sink.draw_custom_verts(texture, &buffers.vertices, &buffers.indices);
            sink.pop_clip();

            stats.draw_calls += 1;
            stats.indices += buffers.indices.len();
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::draw_data::{CmdList, DrawData};
    use crate::render::transfer::transfer_draw_data;
    use crate::texture::{TextureId, TextureRegistration};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        clips: Vec<Rect>,
        draws: Vec<(&'static str, Vec<HostVertex>, Vec<HostIndex>)>,
        depth: i32,
    }

    impl PaintSink<&'static str> for Recorder {
        fn push_clip(&mut self, rect: Rect) {
            self.depth += 1;
            self.clips.push(rect);
        }

        fn draw_custom_verts(&mut self, texture: &&'static str, vertices: &[HostVertex], indices: &[HostIndex]) {
            assert_eq!(self.depth, 1);
            self.draws.push((*texture, vertices.to_vec(), indices.to_vec()));
        }

        fn pop_clip(&mut self) {
            self.depth -= 1;
        }
    }

    fn captured() -> Vec<DrawList> {
        let mut list = CmdList::new();
        list.push_clip_rect(Rect::new([0.0, 0.0], [50.0, 50.0]));
        list.prim_rect(Rect::new([0.0, 0.0], [10.0, 10.0]), [0.5, 0.5], 0xFFFFFFFF, TextureId::null());
        list.prim_rect_uv(
            Rect::new([10.0, 10.0], [20.0, 20.0]),
            [0.0, 0.0],
            [1.0, 1.0],
            0xFFFFFFFF,
            TextureId::new(1),
        );
        list.pop_clip_rect();
        let mut data = DrawData::new([0.0, 0.0], [100.0, 100.0]);
        data.set_draw_lists(vec![list]);

        let mut lists = Vec::new();
        transfer_draw_data(Some(&data), &mut lists);
        lists
    }

    fn textures() -> TextureRegistry<&'static str> {
        let mut textures = TextureRegistry::new();
        textures.set_placeholder("plain", "plain");
        textures
            .register("icons", "icons", TextureRegistration::Unique)
            .unwrap();
        textures
    }

    #[test]
    fn commands_become_clipped_draw_elements() {
        let lists = captured();
        let mut recorder = Recorder::default();
        let stats = paint_draw_lists(
            &lists,
            &CanvasTransform::from_translation([100.0, 0.0]),
            Rect::new([0.0, 0.0], [120.0, 30.0]),
            &textures(),
            &mut PaintBuffers::new(),
            &mut recorder,
        );

        assert_eq!(stats.draw_calls, 2);
        assert_eq!(recorder.depth, 0);
        assert_eq!(recorder.draws[0].0, "plain");
        assert_eq!(recorder.draws[1].0, "icons");
        assert_eq!(recorder.clips[0], Rect::new([100.0, 0.0], [120.0, 30.0]));
        assert_eq!(recorder.draws[1].2, vec![4, 5, 6, 4, 6, 7]);
        assert_eq!(recorder.draws[0].1[0].pos, [100.0, 0.0]);
    }

    #[test]
    fn painting_twice_emits_identical_output() {
        let lists = captured();
        let textures = textures();
        let mut buffers = PaintBuffers::new();
        let transform = CanvasTransform::from_scale_translation(1.5, [3.0, 4.0]);
        let clip = Rect::new([0.0, 0.0], [1000.0, 1000.0]);

        let mut first = Recorder::default();
        paint_draw_lists(&lists, &transform, clip, &textures, &mut buffers, &mut first);
        let mut second = Recorder::default();
        paint_draw_lists(&lists, &transform, clip, &textures, &mut buffers, &mut second);

        assert_eq!(first.clips, second.clips);
        assert_eq!(first.draws, second.draws);
    }
}
