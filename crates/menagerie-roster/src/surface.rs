//! Show/hide contract for avatar bodies, canvases and the fixed hub surfaces.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

pub trait Visibility {
    fn set_visible(&mut self, visible: bool);
    fn is_visible(&self) -> bool;
}

/// A named element that only tracks whether it is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    name: String,
    visible: bool,
}

impl Surface {
    /// New surface, initially hidden.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Visibility for Surface {
    fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            trace!(surface = %self.name, visible, "Surface visibility changed");
        }
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

impl<V: Visibility + ?Sized> Visibility for Rc<RefCell<V>> {
    fn set_visible(&mut self, visible: bool) {
        self.borrow_mut().set_visible(visible);
    }

    fn is_visible(&self) -> bool {
        self.borrow().is_visible()
    }
}
