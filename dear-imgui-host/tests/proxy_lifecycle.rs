use std::cell::RefCell;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use dear_imgui_host::*;
use pretty_assertions::assert_eq;

fn settings(dir: &tempfile::TempDir) -> ModuleSettings {
    ModuleSettings {
        settings_base_dir: Some(dir.path().to_path_buf()),
        ..ModuleSettings::default()
    }
}

fn manager_with(backend: HeadlessBackend, dir: &tempfile::TempDir) -> ContextManager<HeadlessBackend, CpuTexture> {
    let mut manager = ContextManager::new(backend, settings(dir));
    manager
        .build_fonts(&FontSet::default(), &mut CpuTextureHost::new())
        .unwrap();
    manager
}

fn manager(dir: &tempfile::TempDir) -> ContextManager<HeadlessBackend, CpuTexture> {
    manager_with(HeadlessBackend::new(), dir)
}

#[derive(Clone, Default)]
struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

struct RecordingDrawer {
    journal: Journal,
}

impl ImGuiDrawer<HeadlessBackend> for RecordingDrawer {
    fn on_initialize(&mut self, ui: &mut CurrentContext<'_, HeadlessBackend>) {
        self.journal.push(format!("initialize current={}", ui.current_context() == Some(ui.id())));
    }

    fn on_tick(&mut self, delta_seconds: f32) {
        self.journal.push(format!("tick {delta_seconds}"));
    }

    fn on_draw(&mut self, ui: &mut CurrentContext<'_, HeadlessBackend>) {
        let io = ui.io();
        let chars: String = io.input_queue_characters().iter().collect();
        self.journal.push(format!("draw chars={chars:?} wheel={}", io.mouse_wheel()));
    }

    fn on_destroy(&mut self, ui: &mut CurrentContext<'_, HeadlessBackend>) {
        self.journal.push(format!("destroy current={}", ui.current_context() == Some(ui.id())));
    }
}

#[test]
fn empty_tick_produces_empty_frame() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager(&dir);
    let mut proxy = manager.create_proxy("Test", NoopDrawer).unwrap();

    manager.advance_frame();
    let outcome = proxy.tick(1.0 / 60.0, [800.0, 600.0]);

    assert_eq!(outcome, TickOutcome::Completed);
    assert!(proxy.draw_data().is_empty());
    assert!(!proxy.has_active_item());
    assert!(!proxy.is_mouse_hovering_any_window());
    assert_eq!(proxy.display_size(), [800.0, 600.0]);
    assert_eq!(proxy.mouse_cursor(), MouseCursor::Arrow);
}

#[test]
fn drawer_hooks_run_in_order_with_context_current() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager(&dir);
    let journal = Journal::default();
    let mut proxy = manager
        .create_proxy("Hooks", RecordingDrawer { journal: journal.clone() })
        .unwrap();

    manager.advance_frame();
    proxy.tick(0.5, [800.0, 600.0]);
    proxy.destroy();

    assert_eq!(
        journal.take(),
        vec![
            "initialize current=true",
            "tick 0.5",
            "draw chars=\"\" wheel=0",
            "destroy current=true",
        ]
    );
}

#[test]
fn transient_input_is_consumed_once() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager(&dir);
    let journal = Journal::default();
    let mut proxy = manager
        .create_proxy("Input", RecordingDrawer { journal: journal.clone() })
        .unwrap();
    journal.take();

    let input = proxy.input_state_mut();
    input.add_character('h');
    input.add_character('i');
    input.add_mouse_wheel_delta(1.0);
    input.add_mouse_wheel_delta(0.5);

    manager.advance_frame();
    proxy.tick(1.0 / 60.0, [800.0, 600.0]);
    assert!(proxy.input_state().characters().is_empty());
    assert_eq!(proxy.input_state().mouse_wheel_delta(), 0.0);

    assert_eq!(proxy.tick(1.0 / 60.0, [800.0, 600.0]), TickOutcome::Skipped);
    manager.advance_frame();
    proxy.tick(1.0 / 60.0, [800.0, 600.0]);

    let draws: Vec<String> = journal
        .take()
        .into_iter()
        .filter(|entry| entry.starts_with("draw"))
        .collect();
    assert_eq!(
        draws,
        vec!["draw chars=\"hi\" wheel=1.5", "draw chars=\"\" wheel=0"]
    );
}

#[test]
fn second_tick_in_same_frame_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager(&dir);
    let mut proxy = manager.create_proxy("Skip", NoopDrawer).unwrap();

    manager.advance_frame();
    assert!(proxy.tick(1.0 / 60.0, [800.0, 600.0]).is_completed());
    assert_eq!(proxy.tick(1.0 / 60.0, [1024.0, 768.0]), TickOutcome::Skipped);
    assert_eq!(proxy.display_size(), [800.0, 600.0]);
    assert_eq!(proxy.last_frame_number(), Some(manager.frame_number()));

    manager.advance_frame();
    assert!(proxy.tick(1.0 / 60.0, [1024.0, 768.0]).is_completed());
    assert_eq!(proxy.display_size(), [1024.0, 768.0]);
}

#[test]
fn draw_lists_are_replaced_every_tick() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager(&dir);
    let windows = Rc::new(RefCell::new(2usize));
    let count = windows.clone();
    let mut proxy = manager
        .create_proxy("Replace", move |ui: &mut CurrentContext<'_, HeadlessBackend>| {
            for index in 0..*count.borrow() {
                let origin = index as f32 * 100.0;
                ui.window(
                    &format!("Window {index}"),
                    Rect::new([origin, 0.0], [origin + 80.0, 80.0]),
                    |ui| ui.fill_rect(Rect::new([0.0, 0.0], [10.0, 10.0]), colors::WHITE),
                );
            }
        })
        .unwrap();

    manager.advance_frame();
    proxy.tick(1.0 / 60.0, [800.0, 600.0]);
    assert_eq!(proxy.draw_data().len(), 2);
    for list in proxy.draw_data() {
        assert_eq!(list.vtx_buffer().len(), 8);
        assert_eq!(list.idx_buffer().len(), 12);
    }

    *windows.borrow_mut() = 1;
    manager.advance_frame();
    proxy.tick(1.0 / 60.0, [800.0, 600.0]);
    assert_eq!(proxy.draw_data().len(), 1);

    *windows.borrow_mut() = 0;
    manager.advance_frame();
    proxy.tick(1.0 / 60.0, [800.0, 600.0]);
    assert!(proxy.draw_data().is_empty());
}

#[test]
fn panicking_drawer_leaves_previous_frame() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager(&dir);
    let fail = Rc::new(RefCell::new(false));
    let should_fail = fail.clone();
    let mut proxy = manager
        .create_proxy("Panics", move |ui: &mut CurrentContext<'_, HeadlessBackend>| {
            ui.fill_rect(Rect::new([0.0, 0.0], [4.0, 4.0]), colors::WHITE);
            if *should_fail.borrow() {
                ui.window("Half", Rect::new([0.0, 0.0], [50.0, 50.0]), |_| {
                    panic!("drawer failure");
                });
            }
        })
        .unwrap();

    manager.advance_frame();
    proxy.tick(1.0 / 60.0, [800.0, 600.0]);
    assert_eq!(proxy.draw_data().len(), 1);
    let vertices = proxy.draw_data()[0].vtx_buffer().to_vec();

    *fail.borrow_mut() = true;
    manager.advance_frame();
    let result = catch_unwind(AssertUnwindSafe(|| {
        proxy.tick(1.0 / 60.0, [640.0, 480.0]);
    }));
    assert!(result.is_err());
    assert_eq!(proxy.draw_data()[0].vtx_buffer(), vertices.as_slice());
    assert_eq!(proxy.display_size(), [800.0, 600.0]);

    *fail.borrow_mut() = false;
    manager.advance_frame();
    assert!(proxy.tick(1.0 / 60.0, [640.0, 480.0]).is_completed());
    assert_eq!(proxy.draw_data().len(), 1);
    assert_eq!(proxy.draw_data()[0].vtx_buffer().len(), 4);
    assert_eq!(proxy.display_size(), [640.0, 480.0]);
    assert_eq!(proxy.last_frame_number(), Some(manager.frame_number()));
}

#[test]
fn reentrant_tick_panics() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager(&dir);
    let inner = Rc::new(RefCell::new(manager.create_proxy("Inner", NoopDrawer).unwrap()));
    let nested = inner.clone();
    let mut outer = manager
        .create_proxy("Outer", move |_: &mut CurrentContext<'_, HeadlessBackend>| {
            nested.borrow_mut().tick(1.0 / 60.0, [10.0, 10.0]);
        })
        .unwrap();

    manager.advance_frame();
    let result = catch_unwind(AssertUnwindSafe(|| {
        outer.tick(1.0 / 60.0, [800.0, 600.0]);
    }));
    let message = result
        .unwrap_err()
        .downcast::<String>()
        .map(|message| *message)
        .unwrap_or_default();
    assert!(message.contains("re-entrantly"), "{message}");
}

#[test]
fn proxy_requires_built_fonts() {
    let dir = tempfile::tempdir().unwrap();
    let manager: ContextManager<HeadlessBackend, CpuTexture> =
        ContextManager::new(HeadlessBackend::new(), settings(&dir));
    let err = manager.create_proxy("Early", NoopDrawer).unwrap_err();
    assert!(matches!(err, ImGuiHostError::InvalidOperation { .. }));
}

#[test]
fn backend_failure_propagates_from_construction() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_with(HeadlessBackend::with_context_limit(1), &dir);
    let _first = manager.create_proxy("First", NoopDrawer).unwrap();

    let err = manager.create_proxy("Second", NoopDrawer).unwrap_err();
    let source = match err {
        ImGuiHostError::Backend(source) => source,
        other => panic!("expected backend error, got {other:?}"),
    };
    assert!(matches!(
        source.downcast_ref::<HeadlessError>(),
        Some(HeadlessError::TooManyContexts { limit: 1 })
    ));
}

#[test]
fn destroy_releases_backend_context() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager(&dir);
    let proxy = manager.create_proxy("Gone", NoopDrawer).unwrap();
    let id = proxy.context_id();
    assert!(manager.backend().borrow().has_context(id));

    proxy.destroy();
    assert!(!manager.backend().borrow().has_context(id));
    assert_eq!(manager.backend().borrow().context_count(), 0);

    {
        let _dropped = manager.create_proxy("Dropped", NoopDrawer).unwrap();
    }
    assert_eq!(manager.backend().borrow().context_count(), 0);
}

#[test]
fn ini_directory_is_created_and_window_state_persists() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager(&dir);
    let draw = |ui: &mut CurrentContext<'_, HeadlessBackend>| {
        ui.window("Console", Rect::new([20.0, 30.0], [220.0, 130.0]), |_| {});
    };

    let mut proxy = manager.create_proxy("Persist", draw).unwrap();
    let ini = proxy.ini_filename().to_path_buf();
    assert_eq!(ini, dir.path().join("ImGui").join("Persist.ini"));
    assert!(ini.parent().unwrap().is_dir());

    manager.advance_frame();
    proxy.tick(1.0 / 60.0, [800.0, 600.0]);
    proxy.destroy();

    let contents = std::fs::read_to_string(&ini).unwrap();
    assert!(contents.contains("[Window][Console]"), "{contents}");
}

#[test]
fn settings_directory_failure_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"").unwrap();
    let settings = ModuleSettings {
        settings_base_dir: Some(blocker),
        ..ModuleSettings::default()
    };
    let mut manager: ContextManager<HeadlessBackend, CpuTexture> =
        ContextManager::new(HeadlessBackend::new(), settings);
    manager
        .build_fonts(&FontSet::default(), &mut CpuTextureHost::new())
        .unwrap();

    let err = manager.create_proxy("Blocked", NoopDrawer).unwrap_err();
    assert!(matches!(err, ImGuiHostError::Io { .. }));
}

#[test]
fn root_window_decorator_wraps_drawing() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager(&dir);
    let drawer = RootWindowDrawer::new(
        |ui: &mut CurrentContext<'_, HeadlessBackend>| {
            ui.fill_rect(Rect::new([10.0, 10.0], [20.0, 20.0]), colors::WHITE);
        },
        RootWindowFlags::MENU_BAR | RootWindowFlags::DOCKSPACE,
    );
    let mut proxy = manager.create_proxy("Root", drawer).unwrap();

    manager.advance_frame();
    proxy.tick(1.0 / 60.0, [800.0, 600.0]);

    assert_eq!(proxy.draw_data().len(), 1);
    let commands = proxy.draw_data()[0].commands();
    assert_eq!(commands[0].clip_rect, [0.0, 0.0, 800.0, 600.0]);
    assert!(!proxy.is_mouse_hovering_any_window());
    let flags = proxy.with_context(|ui| ui.root_window_flags());
    assert_eq!(flags, Some(RootWindowFlags::MENU_BAR | RootWindowFlags::DOCKSPACE));
}

#[test]
fn button_click_updates_cached_state() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager(&dir);
    let clicks = Rc::new(RefCell::new(0));
    let counter = clicks.clone();
    let mut proxy = manager
        .create_proxy("Buttons", move |ui: &mut CurrentContext<'_, HeadlessBackend>| {
            ui.window("Panel", Rect::new([0.0, 0.0], [200.0, 200.0]), |ui| {
                if ui.button("Apply", Rect::new([10.0, 10.0], [90.0, 30.0])) {
                    *counter.borrow_mut() += 1;
                }
            });
        })
        .unwrap();

    let frame = |proxy: &mut ContextProxy<HeadlessBackend>, down: bool| {
        proxy.input_state_mut().set_mouse_position([20.0, 20.0]);
        proxy.input_state_mut().set_mouse_down(MouseButton::Left, down);
        manager.advance_frame();
        proxy.tick(1.0 / 60.0, [800.0, 600.0]);
    };

    frame(&mut proxy, false);
    assert_eq!(proxy.mouse_cursor(), MouseCursor::Hand);
    assert!(!proxy.has_active_item());

    frame(&mut proxy, true);
    assert!(proxy.has_active_item());
    assert!(proxy.is_mouse_hovering_any_window());
    assert!(proxy.wants_mouse_capture());

    frame(&mut proxy, false);
    assert!(!proxy.has_active_item());
    assert_eq!(*clicks.borrow(), 1);
}
