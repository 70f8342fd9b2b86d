use dear_imgui_host::{
    ContextManager, CpuTexture, CpuTextureHost, FontSet, HeadlessBackend, ImGuiWidget, Key,
    ModuleSettings, MouseButton, NoopDrawer, Reply,
};
use dear_imgui_host_winit::{HiDpiMode, WinitPlatform, events};
use pretty_assertions::assert_eq;
use winit::dpi::PhysicalPosition;
use winit::event::{
    DeviceId, ElementState, Ime, MouseButton as WinitMouseButton, MouseScrollDelta, Touch,
    TouchPhase, WindowEvent,
};
use winit::keyboard::{Key as WinitKey, KeyCode, KeyLocation, NamedKey, PhysicalKey};

fn device() -> DeviceId {
    // SAFETY: the id is only compared, never handed back to the platform.
    unsafe { DeviceId::dummy() }
}

fn setup(
    dir: &tempfile::TempDir,
    settings: ModuleSettings,
) -> (ContextManager<HeadlessBackend, CpuTexture>, ImGuiWidget<HeadlessBackend>) {
    let settings = ModuleSettings {
        settings_base_dir: Some(dir.path().to_path_buf()),
        ..settings
    };
    let mut manager = ContextManager::new(HeadlessBackend::new(), settings);
    manager
        .build_fonts(&FontSet::default(), &mut CpuTextureHost::new())
        .unwrap();
    let proxy = manager.create_proxy("Window", NoopDrawer).unwrap();
    let widget = ImGuiWidget::new(proxy, manager.settings());
    (manager, widget)
}

fn moved(x: f64, y: f64) -> WindowEvent {
    WindowEvent::CursorMoved {
        device_id: device(),
        position: PhysicalPosition::new(x, y),
    }
}

fn mouse(state: ElementState, button: WinitMouseButton) -> WindowEvent {
    WindowEvent::MouseInput {
        device_id: device(),
        state,
        button,
    }
}

fn wheel(delta: MouseScrollDelta) -> WindowEvent {
    WindowEvent::MouseWheel {
        device_id: device(),
        delta,
        phase: TouchPhase::Moved,
    }
}

fn touch(phase: TouchPhase, x: f64, y: f64) -> WindowEvent {
    WindowEvent::Touch(Touch {
        device_id: device(),
        phase,
        location: PhysicalPosition::new(x, y),
        force: None,
        id: 0,
    })
}

#[test]
fn pointer_events_use_logical_coordinates() {
    let dir = tempfile::tempdir().unwrap();
    let (_manager, mut widget) = setup(&dir, ModuleSettings::default());
    let mut platform = WinitPlatform::new();
    platform.set_hidpi_mode(HiDpiMode::Locked(2.0));

    assert_eq!(platform.handle_window_event(&mut widget, &moved(200.0, 100.0)), Reply::Handled);
    assert_eq!(platform.cursor_position(), [100.0, 50.0]);
    assert_eq!(widget.proxy().input_state().mouse_position(), [100.0, 50.0]);

    let reply = platform.handle_window_event(
        &mut widget,
        &mouse(ElementState::Pressed, WinitMouseButton::Left),
    );
    assert_eq!(reply, Reply::Handled);
    assert!(widget.proxy().input_state().is_mouse_down(MouseButton::Left));

    platform.handle_window_event(
        &mut widget,
        &mouse(ElementState::Released, WinitMouseButton::Left),
    );
    assert!(!widget.proxy().input_state().is_mouse_down(MouseButton::Left));
}

#[test]
fn wheel_deltas_accumulate_in_notches() {
    let dir = tempfile::tempdir().unwrap();
    let (_manager, mut widget) = setup(&dir, ModuleSettings::default());
    let mut platform = WinitPlatform::new();

    platform.handle_window_event(&mut widget, &wheel(MouseScrollDelta::LineDelta(1.0, 2.0)));
    platform.handle_window_event(
        &mut widget,
        &wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 50.0))),
    );

    let state = widget.proxy().input_state();
    assert_eq!(state.mouse_wheel_delta(), 2.5);
    assert_eq!(state.mouse_wheel_h_delta(), 1.0);
}

#[test]
fn leaving_the_window_releases_buttons() {
    let dir = tempfile::tempdir().unwrap();
    let (_manager, mut widget) = setup(&dir, ModuleSettings::default());
    let mut platform = WinitPlatform::new();

    platform.handle_window_event(&mut widget, &WindowEvent::CursorEntered { device_id: device() });
    assert!(widget.is_hovered());
    platform.handle_window_event(
        &mut widget,
        &mouse(ElementState::Pressed, WinitMouseButton::Right),
    );
    assert!(widget.proxy().input_state().is_mouse_down(MouseButton::Right));

    platform.handle_window_event(&mut widget, &WindowEvent::CursorLeft { device_id: device() });
    assert!(!widget.is_hovered());
    assert!(!widget.proxy().input_state().is_mouse_down(MouseButton::Right));
}

#[test]
fn key_presses_carry_text() {
    let dir = tempfile::tempdir().unwrap();
    let (_manager, mut widget) = setup(&dir, ModuleSettings::default());

    let reply = events::handle_key(
        &WinitKey::Character("a".into()),
        PhysicalKey::Code(KeyCode::KeyA),
        KeyLocation::Standard,
        ElementState::Pressed,
        Some("a"),
        &mut widget,
    );
    assert_eq!(reply, Reply::Handled);
    events::handle_key(
        &WinitKey::Named(NamedKey::Shift),
        PhysicalKey::Code(KeyCode::ShiftRight),
        KeyLocation::Right,
        ElementState::Pressed,
        None,
        &mut widget,
    );

    let state = widget.proxy().input_state();
    assert!(state.is_key_down(Key::A.index()));
    assert!(state.is_key_down(Key::RightShift.index()));
    assert!(state.is_shift_down());
    assert_eq!(state.characters(), &['a']);

    events::handle_key(
        &WinitKey::Character("a".into()),
        PhysicalKey::Code(KeyCode::KeyA),
        KeyLocation::Standard,
        ElementState::Released,
        Some("a"),
        &mut widget,
    );
    let state = widget.proxy().input_state();
    assert!(!state.is_key_down(Key::A.index()));
    assert_eq!(state.characters(), &['a']);
}

#[test]
fn shortcuts_work_on_non_latin_layouts() {
    let dir = tempfile::tempdir().unwrap();
    let (_manager, mut widget) = setup(&dir, ModuleSettings::default());

    events::handle_key(
        &WinitKey::Named(NamedKey::Control),
        PhysicalKey::Code(KeyCode::ControlLeft),
        KeyLocation::Left,
        ElementState::Pressed,
        None,
        &mut widget,
    );
    events::handle_key(
        &WinitKey::Character("с".into()),
        PhysicalKey::Code(KeyCode::KeyC),
        KeyLocation::Standard,
        ElementState::Pressed,
        None,
        &mut widget,
    );

    let state = widget.proxy().input_state();
    assert!(state.is_control_down());
    assert!(state.is_key_down(Key::C.index()));
}

#[test]
fn control_characters_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let (_manager, mut widget) = setup(&dir, ModuleSettings::default());

    assert_eq!(events::handle_character_input('\u{8}', &mut widget), Reply::Unhandled);
    events::handle_character_input('\t', &mut widget);
    assert_eq!(widget.proxy().input_state().characters(), &['\t']);
}

#[test]
fn committed_ime_text_is_typed() {
    let dir = tempfile::tempdir().unwrap();
    let (_manager, mut widget) = setup(&dir, ModuleSettings::default());
    let mut platform = WinitPlatform::new();

    platform.handle_window_event(
        &mut widget,
        &WindowEvent::Ime(Ime::Preedit("ni".to_owned(), None)),
    );
    assert!(widget.proxy().input_state().characters().is_empty());

    let reply =
        platform.handle_window_event(&mut widget, &WindowEvent::Ime(Ime::Commit("你好".to_owned())));
    assert_eq!(reply, Reply::Handled);
    assert_eq!(widget.proxy().input_state().characters(), &['你', '好']);
}

#[test]
fn window_focus_loss_releases_keys() {
    let dir = tempfile::tempdir().unwrap();
    let (_manager, mut widget) = setup(&dir, ModuleSettings::default());
    let mut platform = WinitPlatform::new();

    events::handle_key(
        &WinitKey::Named(NamedKey::Control),
        PhysicalKey::Code(KeyCode::ControlLeft),
        KeyLocation::Left,
        ElementState::Pressed,
        None,
        &mut widget,
    );
    assert!(widget.proxy().input_state().is_control_down());

    let reply = platform.handle_window_event(&mut widget, &WindowEvent::Focused(false));
    assert_eq!(reply, Reply::Unhandled);
    let state = widget.proxy().input_state();
    assert!(!state.is_key_down(Key::LeftCtrl.index()));
    assert!(!state.is_control_down());
}

#[test]
fn touches_track_position() {
    let dir = tempfile::tempdir().unwrap();
    let (_manager, mut widget) = setup(&dir, ModuleSettings::default());
    let mut platform = WinitPlatform::new();

    platform.handle_window_event(&mut widget, &touch(TouchPhase::Started, 10.0, 20.0));
    assert!(widget.proxy().input_state().is_touch_down());
    platform.handle_window_event(&mut widget, &touch(TouchPhase::Moved, 30.0, 40.0));
    assert_eq!(widget.proxy().input_state().touch_position(), [30.0, 40.0]);
    platform.handle_window_event(&mut widget, &touch(TouchPhase::Cancelled, 30.0, 40.0));
    assert!(!widget.proxy().input_state().is_touch_down());
}

#[test]
fn shared_mouse_input_keeps_routing() {
    let dir = tempfile::tempdir().unwrap();
    let settings = ModuleSettings {
        share_mouse_input: true,
        ..ModuleSettings::default()
    };
    let (_manager, mut widget) = setup(&dir, settings);
    let mut platform = WinitPlatform::new();

    assert_eq!(platform.handle_window_event(&mut widget, &moved(5.0, 5.0)), Reply::Unhandled);
    assert_eq!(widget.proxy().input_state().mouse_position(), [5.0, 5.0]);
}
