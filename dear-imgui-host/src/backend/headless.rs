//! Minimal in-process GUI backend.
//!
//! `HeadlessBackend` implements just enough of an immediate-mode GUI to drive
//! context proxies without a native library: windows are hover regions with
//! a background, widgets are rectangles, images and glyph quads, and buttons
//! are the only activatable items. Window rectangles persist to the context's
//! ini file.

use std::collections::HashMap;
use std::fs;
use std::mem;
use std::path::Path;

use thiserror::Error;

use super::{ContextId, GuiBackend, RootWindowBackend};
use crate::drawer::RootWindowFlags;
use crate::fonts::{FontId, SharedFontAtlas};
use crate::input::{KeyMapSlot, MOUSE_BUTTON_COUNT, MouseButton, MouseCursor};
use crate::io::Io;
use crate::math::{ColorU32, Rect, Vector2};
use crate::render::{CmdList, DrawData};
use crate::texture::TextureId;

const ROOT_WINDOW_NAME: &str = "##Root";
const WINDOW_BG: ColorU32 = 0xF00F_0F0F;
const MENU_BAR_BG: ColorU32 = 0xFF24_2424;
const BUTTON: ColorU32 = 0x9AFA_9642;
const BUTTON_HOVERED: ColorU32 = 0xFFFA_9642;
const BUTTON_ACTIVE: ColorU32 = 0xFFFA_870F;
const TEXT: ColorU32 = 0xFFFF_FFFF;
const FRAMERATE_SMOOTHING: f32 = 0.1;

/// Errors reported by [`HeadlessBackend`].
#[derive(Debug, Error)]
pub enum HeadlessError {
    #[error("context limit of {limit} reached")]
    TooManyContexts { limit: usize },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum WindowKind {
    Regular,
    Root,
}

#[derive(Debug)]
struct Window {
    name: String,
    kind: WindowKind,
    rect: Rect,
    list: CmdList,
    submitted: bool,
    was_submitted: bool,
}

#[derive(Debug)]
struct Context {
    io: Io,
    font_atlas: SharedFontAtlas,
    frame_active: bool,
    frame_count: u64,
    windows: Vec<Window>,
    window_stack: Vec<usize>,
    background: CmdList,
    font_stack: Vec<FontId>,
    any_window_hovered: bool,
    active_item: Option<String>,
    active_item_seen: bool,
    mouse_cursor: MouseCursor,
    mouse_down_prev: [bool; MOUSE_BUTTON_COUNT],
    mouse_clicked: [bool; MOUSE_BUTTON_COUNT],
    mouse_released: [bool; MOUSE_BUTTON_COUNT],
    root_window_flags: Option<RootWindowFlags>,
    saved_rects: HashMap<String, Rect>,
    settings_loaded: bool,
    draw_data: DrawData,
}

impl Context {
    fn new(font_atlas: SharedFontAtlas) -> Self {
        Self {
            io: Io::default(),
            font_atlas,
            frame_active: false,
            frame_count: 0,
            windows: Vec::new(),
            window_stack: Vec::new(),
            background: CmdList::new(),
            font_stack: Vec::new(),
            any_window_hovered: false,
            active_item: None,
            active_item_seen: false,
            mouse_cursor: MouseCursor::Arrow,
            mouse_down_prev: [false; MOUSE_BUTTON_COUNT],
            mouse_clicked: [false; MOUSE_BUTTON_COUNT],
            mouse_released: [false; MOUSE_BUTTON_COUNT],
            root_window_flags: None,
            saved_rects: HashMap::new(),
            settings_loaded: false,
            draw_data: DrawData::default(),
        }
    }

    fn current_list(&mut self) -> &mut CmdList {
        match self.window_stack.last() {
            Some(&index) => &mut self.windows[index].list,
            None => &mut self.background,
        }
    }

    /// Top-left of the current window, widget coordinates are relative to it
    fn origin(&self) -> Vector2 {
        self.window_stack
            .last()
            .map_or([0.0, 0.0], |&index| self.windows[index].rect.min)
    }

    fn to_canvas(&self, rect: Rect) -> Rect {
        let [x, y] = self.origin();
        Rect::new(
            [rect.min[0] + x, rect.min[1] + y],
            [rect.max[0] + x, rect.max[1] + y],
        )
    }

    fn load_settings(&mut self) {
        self.settings_loaded = true;
        let Some(path) = self.io.ini_filename().map(Path::to_path_buf) else {
            return;
        };
        match fs::read_to_string(&path) {
            Ok(contents) => {
                self.saved_rects = parse_window_settings(&contents);
                host_debug!(
                    "Loaded {} window rects from {}",
                    self.saved_rects.len(),
                    path.display()
                );
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => host_warn!("Failed to read {}: {}", path.display(), err),
        }
    }

    fn save_settings(&self) {
        let Some(path) = self.io.ini_filename() else {
            return;
        };
        if self.saved_rects.is_empty() {
            return;
        }
        if let Err(err) = fs::write(path, format_window_settings(&self.saved_rects)) {
            host_warn!("Failed to write {}: {}", path.display(), err);
        }
    }

    fn begin_window(&mut self, name: &str, rect: Rect, kind: WindowKind) {
        assert!(self.frame_active, "windows can only be submitted inside a frame");
        let index = match self.windows.iter().position(|w| w.name == name) {
            Some(index) => index,
            None => {
                let rect = match kind {
                    WindowKind::Regular => self.saved_rects.get(name).copied().unwrap_or(rect),
                    WindowKind::Root => rect,
                };
                self.windows.push(Window {
                    name: name.to_owned(),
                    kind,
                    rect,
                    list: CmdList::new(),
                    submitted: false,
                    was_submitted: false,
                });
                self.windows.len() - 1
            }
        };

        let window = &mut self.windows[index];
        if kind == WindowKind::Root {
            window.rect = rect;
        }
        let first_submission = !window.submitted;
        window.submitted = true;
        let window_rect = window.rect;
        window.list.push_clip_rect(window_rect);
        self.window_stack.push(index);

        let draw_background = match kind {
            WindowKind::Regular => true,
            WindowKind::Root => !self
                .root_window_flags
                .is_some_and(|flags| flags.contains(RootWindowFlags::NO_BACKGROUND)),
        };
        if first_submission && draw_background {
            let (tex_id, white_uv) = {
                let atlas = self.font_atlas.borrow();
                (atlas.tex_id(), atlas.white_uv())
            };
            self.windows[index]
                .list
                .prim_rect(window_rect, white_uv, WINDOW_BG, tex_id);
        }
    }

    fn end_window(&mut self) {
        let Some(index) = self.window_stack.pop() else {
            panic!("end_window called without a matching begin_window");
        };
        let window = &mut self.windows[index];
        window.list.pop_clip_rect();
        if window.kind == WindowKind::Regular {
            self.saved_rects.insert(window.name.clone(), window.rect);
        }
    }
}

/// Reference [`GuiBackend`] with no native dependencies.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    contexts: HashMap<ContextId, Context>,
    current: Option<ContextId>,
    next_id: u32,
    context_limit: Option<usize>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that refuses to create more than `limit` live contexts
    pub fn with_context_limit(limit: usize) -> Self {
        Self {
            context_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Number of live contexts
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    pub fn has_context(&self, id: ContextId) -> bool {
        self.contexts.contains_key(&id)
    }

    fn ctx(&self) -> &Context {
        let Some(ctx) = self.current.and_then(|id| self.contexts.get(&id)) else {
            panic!("no current GUI context");
        };
        ctx
    }

    fn ctx_mut(&mut self) -> &mut Context {
        let Some(ctx) = self.current.and_then(|id| self.contexts.get_mut(&id)) else {
            panic!("no current GUI context");
        };
        ctx
    }

    /// Frames started by the current context
    pub fn frame_count(&self) -> u64 {
        self.ctx().frame_count
    }

    /// Rectangle of a window of the current context, as last submitted or
    /// loaded from its ini file
    pub fn window_rect(&self, name: &str) -> Option<Rect> {
        let ctx = self.ctx();
        ctx.windows
            .iter()
            .find(|w| w.name == name)
            .map(|w| w.rect)
            .or_else(|| ctx.saved_rects.get(name).copied())
    }

    /// Flags of the root window submitted this frame
    pub fn root_window_flags(&self) -> Option<RootWindowFlags> {
        self.ctx().root_window_flags
    }

    pub fn begin_window(&mut self, name: &str, rect: Rect) {
        self.ctx_mut().begin_window(name, rect, WindowKind::Regular);
    }

    pub fn end_window(&mut self) {
        self.ctx_mut().end_window();
    }

    /// Submits a window and runs `f` with it as the current window.
    pub fn window<R>(&mut self, name: &str, rect: Rect, f: impl FnOnce(&mut Self) -> R) -> R {
        self.begin_window(name, rect);
        let result = f(self);
        self.end_window();
        result
    }

    /// Solid rectangle relative to the current window
    pub fn fill_rect(&mut self, rect: Rect, col: ColorU32) {
        let ctx = self.ctx_mut();
        let rect = ctx.to_canvas(rect);
        let (tex_id, white_uv) = {
            let atlas = ctx.font_atlas.borrow();
            (atlas.tex_id(), atlas.white_uv())
        };
        ctx.current_list().prim_rect(rect, white_uv, col, tex_id);
    }

    /// Textured rectangle relative to the current window
    pub fn image(&mut self, texture_id: TextureId, rect: Rect, uv_min: Vector2, uv_max: Vector2, tint: ColorU32) {
        let ctx = self.ctx_mut();
        let rect = ctx.to_canvas(rect);
        ctx.current_list()
            .prim_rect_uv(rect, uv_min, uv_max, tint, texture_id);
    }

    /// Text with the current font, `pos` being the top-left of the first line
    pub fn text(&mut self, pos: Vector2, col: ColorU32, text: &str) {
        let ctx = self.ctx_mut();
        let [x0, y0] = ctx.to_canvas(Rect::new(pos, pos)).min;
        let font_id = ctx.font_stack.last().copied().unwrap_or(FontId(0));
        let atlas = ctx.font_atlas.clone();
        let atlas = atlas.borrow();
        let Some(font) = atlas.font(font_id) else {
            host_trace!("Font {} missing, text skipped", font_id.index());
            return;
        };
        let tex_id = atlas.tex_id();
        let list = ctx.current_list();
        let (mut x, mut y) = (x0, y0);
        for ch in text.chars() {
            if ch == '\n' {
                x = x0;
                y += font.size();
                continue;
            }
            let Some(glyph) = font.find_glyph(ch) else {
                continue;
            };
            if glyph.visible {
                list.prim_rect_uv(
                    Rect::new([x + glyph.x0, y + glyph.y0], [x + glyph.x1, y + glyph.y1]),
                    [glyph.u0, glyph.v0],
                    [glyph.u1, glyph.v1],
                    col,
                    tex_id,
                );
            }
            x += glyph.advance_x;
        }
    }

    /// Button relative to the current window. Returns `true` on the frame the
    /// left mouse button is released over it after being pressed over it.
    pub fn button(&mut self, label: &str, rect: Rect) -> bool {
        let ctx = self.ctx_mut();
        let canvas_rect = ctx.to_canvas(rect);
        let clip = Rect::from_clip_rect(ctx.current_list().clip_rect());
        let mouse = ctx.io.mouse_pos();
        let hovered = canvas_rect.contains(mouse) && clip.contains(mouse);
        let left = MouseButton::Left.index();

        if hovered {
            ctx.mouse_cursor = MouseCursor::Hand;
            if ctx.mouse_clicked[left] {
                ctx.active_item = Some(label.to_owned());
            }
        }

        let mut pressed = false;
        let is_active = ctx.active_item.as_deref() == Some(label);
        if is_active {
            ctx.active_item_seen = true;
            if ctx.mouse_released[left] {
                ctx.active_item = None;
                pressed = hovered;
            }
        }

        let col = match (is_active && !pressed, hovered) {
            (true, _) => BUTTON_ACTIVE,
            (false, true) => BUTTON_HOVERED,
            (false, false) => BUTTON,
        };
        self.fill_rect(rect, col);
        self.text([rect.min[0] + 4.0, rect.min[1] + 2.0], TEXT, label);
        pressed
    }

    /// Whether the key mapped to `slot` is down
    pub fn is_key_down(&self, slot: KeyMapSlot) -> bool {
        let io = &self.ctx().io;
        io.key_map(slot).is_some_and(|index| io.key_down(index))
    }

    pub fn set_mouse_cursor(&mut self, cursor: MouseCursor) {
        self.ctx_mut().mouse_cursor = cursor;
    }
}

impl GuiBackend for HeadlessBackend {
    type Error = HeadlessError;

    fn create_context(&mut self, font_atlas: &SharedFontAtlas) -> Result<ContextId, HeadlessError> {
        if let Some(limit) = self.context_limit {
            if self.contexts.len() >= limit {
                return Err(HeadlessError::TooManyContexts { limit });
            }
        }
        self.next_id += 1;
        let id = ContextId(self.next_id);
        self.contexts.insert(id, Context::new(font_atlas.clone()));
        host_trace!("Headless context {:?} created", id);
        Ok(id)
    }

    fn destroy_context(&mut self, id: ContextId) {
        if let Some(ctx) = self.contexts.remove(&id) {
            ctx.save_settings();
        }
        if self.current == Some(id) {
            self.current = None;
        }
    }

    fn current_context(&self) -> Option<ContextId> {
        self.current
    }

    fn set_current_context(&mut self, id: Option<ContextId>) {
        if let Some(id) = id {
            assert!(self.contexts.contains_key(&id), "context {:?} does not exist", id);
        }
        self.current = id;
    }

    fn io(&self) -> &Io {
        &self.ctx().io
    }

    fn io_mut(&mut self) -> &mut Io {
        &mut self.ctx_mut().io
    }

    fn new_frame(&mut self) {
        let id = self.current;
        let ctx = self.ctx_mut();
        if ctx.frame_active {
            host_warn!(
                "Context {:?} starts a new frame while frame {} was never rendered; discarding it",
                id,
                ctx.frame_count
            );
            ctx.frame_active = false;
        }
        assert!(
            ctx.font_atlas.borrow().is_built(),
            "font atlas must be built before the first frame"
        );
        if !ctx.settings_loaded {
            ctx.load_settings();
        }

        ctx.frame_active = true;
        ctx.frame_count += 1;
        ctx.mouse_cursor = MouseCursor::Arrow;
        ctx.root_window_flags = None;
        ctx.active_item_seen = false;
        ctx.font_stack.clear();
        ctx.window_stack.clear();
        ctx.background.clear();

        for button in MouseButton::ALL {
            let index = button.index();
            let down = ctx.io.mouse_down(button);
            ctx.mouse_clicked[index] = down && !ctx.mouse_down_prev[index];
            ctx.mouse_released[index] = !down && ctx.mouse_down_prev[index];
            ctx.mouse_down_prev[index] = down;
        }

        let mouse = ctx.io.mouse_pos();
        ctx.any_window_hovered = ctx
            .windows
            .iter()
            .any(|w| w.kind == WindowKind::Regular && w.was_submitted && w.rect.contains(mouse));
        for window in &mut ctx.windows {
            window.submitted = false;
            window.list.clear();
        }
    }

    fn render(&mut self) -> Option<&DrawData> {
        let ctx = self.ctx_mut();
        assert!(ctx.frame_active, "render called outside of a frame");
        assert!(ctx.window_stack.is_empty(), "render called with windows still open");
        ctx.frame_active = false;

        if !ctx.active_item_seen {
            ctx.active_item = None;
        }

        let mut lists = Vec::new();
        if !ctx.background.is_empty() {
            lists.push(mem::take(&mut ctx.background));
        }
        for window in &mut ctx.windows {
            window.was_submitted = window.submitted;
            if window.submitted && !window.list.is_empty() {
                lists.push(mem::take(&mut window.list));
            }
        }

        let io = &mut ctx.io;
        io.set_want_capture_mouse(ctx.any_window_hovered || ctx.active_item.is_some());
        io.set_want_capture_keyboard(ctx.active_item.is_some());
        let dt = io.delta_time();
        if dt > 0.0 {
            let framerate = io.framerate() + (1.0 / dt - io.framerate()) * FRAMERATE_SMOOTHING;
            io.set_framerate(framerate);
        }
        io.clear_input_characters();
        io.set_mouse_wheel(0.0);
        io.set_mouse_wheel_h(0.0);

        ctx.draw_data = DrawData::new([0.0, 0.0], io.display_size());
        ctx.draw_data.set_draw_lists(lists);
        Some(&ctx.draw_data)
    }

    fn is_any_item_active(&self) -> bool {
        self.ctx().active_item.is_some()
    }

    fn is_any_window_hovered(&self) -> bool {
        self.ctx().any_window_hovered
    }

    fn mouse_cursor(&self) -> MouseCursor {
        self.ctx().mouse_cursor
    }

    fn push_font(&mut self, font: FontId) {
        self.ctx_mut().font_stack.push(font);
    }

    fn pop_font(&mut self) {
        let popped = self.ctx_mut().font_stack.pop();
        debug_assert!(popped.is_some(), "font stack underflow");
    }
}

impl RootWindowBackend for HeadlessBackend {
    fn begin_root_window(&mut self, flags: RootWindowFlags) {
        let ctx = self.ctx_mut();
        ctx.root_window_flags = Some(flags);
        let rect = Rect::from_pos_size([0.0, 0.0], ctx.io.display_size());
        ctx.begin_window(ROOT_WINDOW_NAME, rect, WindowKind::Root);

        if flags.contains(RootWindowFlags::MENU_BAR) {
            let height = {
                let atlas = ctx.font_atlas.borrow();
                atlas.font(FontId(0)).map_or(13.0, |font| font.size()) + 6.0
            };
            self.fill_rect(Rect::new([0.0, 0.0], [rect.max[0], height]), MENU_BAR_BG);
        }
    }

    fn end_root_window(&mut self) {
        self.ctx_mut().end_window();
    }
}

fn parse_window_settings(contents: &str) -> HashMap<String, Rect> {
    let mut rects = HashMap::new();
    let mut current: Option<(String, Vector2, Vector2)> = None;

    let parse_pair = |value: &str| -> Option<Vector2> {
        let (x, y) = value.split_once(',')?;
        Some([x.trim().parse().ok()?, y.trim().parse().ok()?])
    };

    for line in contents.lines().map(str::trim) {
        if let Some(name) = line
            .strip_prefix("[Window][")
            .and_then(|rest| rest.strip_suffix(']'))
        {
            if let Some((name, pos, size)) = current.take() {
                rects.insert(name, Rect::from_pos_size(pos, size));
            }
            current = Some((name.to_owned(), [0.0, 0.0], [0.0, 0.0]));
        } else if line.starts_with('[') {
            if let Some((name, pos, size)) = current.take() {
                rects.insert(name, Rect::from_pos_size(pos, size));
            }
        } else if let Some((_, pos, size)) = current.as_mut() {
            if let Some(value) = line.strip_prefix("Pos=").and_then(parse_pair) {
                *pos = value;
            } else if let Some(value) = line.strip_prefix("Size=").and_then(parse_pair) {
                *size = value;
            }
        }
    }
    if let Some((name, pos, size)) = current {
        rects.insert(name, Rect::from_pos_size(pos, size));
    }
    rects
}

fn format_window_settings(rects: &HashMap<String, Rect>) -> String {
    let mut names: Vec<&String> = rects.keys().collect();
    names.sort();
    let mut out = String::new();
    for name in names {
        let rect = rects[name];
        out.push_str(&format!(
            "[Window][{}]\nPos={},{}\nSize={},{}\n\n",
            name,
            rect.min[0],
            rect.min[1],
            rect.width(),
            rect.height()
        ));
    }
    out
}
