//! Host widget the proxy's output is displayed in.

use std::rc::{Rc, Weak};

use crate::math::Vector2;
use crate::transform::CanvasTransform;

/// Widget in the host's widget tree that displays a proxy.
pub trait HostWidget {
    fn has_keyboard_focus(&self) -> bool;

    /// Size of the widget in host pixels
    fn absolute_size(&self) -> Vector2;

    /// Transform from widget-local space to screen space
    fn widget_to_screen(&self) -> CanvasTransform;
}

/// Non-owning handle to a [`HostWidget`]. Reads degrade to "not focused" and
/// zero geometry once the widget is gone.
#[derive(Clone)]
pub struct HostWidgetHandle(Weak<dyn HostWidget>);

impl HostWidgetHandle {
    pub fn new<W: HostWidget + 'static>(widget: &Rc<W>) -> Self {
        let widget: Rc<dyn HostWidget> = widget.clone();
        Self(Rc::downgrade(&widget))
    }

    pub fn upgrade(&self) -> Option<Rc<dyn HostWidget>> {
        self.0.upgrade()
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    pub fn has_keyboard_focus(&self) -> bool {
        self.upgrade().is_some_and(|widget| widget.has_keyboard_focus())
    }

    pub fn absolute_size(&self) -> Vector2 {
        self.upgrade()
            .map_or([0.0, 0.0], |widget| widget.absolute_size())
    }

    pub fn widget_to_screen(&self) -> CanvasTransform {
        self.upgrade()
            .map_or(CanvasTransform::IDENTITY, |widget| widget.widget_to_screen())
    }
}

impl std::fmt::Debug for HostWidgetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostWidgetHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Panel {
        focused: Cell<bool>,
    }

    impl HostWidget for Panel {
        fn has_keyboard_focus(&self) -> bool {
            self.focused.get()
        }

        fn absolute_size(&self) -> Vector2 {
            [640.0, 480.0]
        }

        fn widget_to_screen(&self) -> CanvasTransform {
            CanvasTransform::from_translation([10.0, 20.0])
        }
    }

    #[test]
    fn handle_tracks_widget_lifetime() {
        let panel = Rc::new(Panel {
            focused: Cell::new(true),
        });
        let handle = HostWidgetHandle::new(&panel);
        assert!(handle.has_keyboard_focus());
        assert_eq!(handle.absolute_size(), [640.0, 480.0]);
        assert_eq!(handle.widget_to_screen().translation(), [10.0, 20.0]);

        drop(panel);
        assert!(!handle.is_alive());
        assert!(!handle.has_keyboard_focus());
        assert_eq!(handle.absolute_size(), [0.0, 0.0]);
        assert_eq!(handle.widget_to_screen(), CanvasTransform::IDENTITY);
    }
}
