//! The ordered set of selectable avatars plus the two fixed surfaces.

use menagerie_locomotion::Character;

use crate::error::RosterError;
use crate::surface::Visibility;

/// One selectable avatar: its visible body, its control canvas and the
/// controllable model driven by input.
pub struct AvatarSlot {
    pub id: String,
    pub body: Box<dyn Visibility>,
    pub canvas: Box<dyn Visibility>,
    /// `None` when the avatar was set up without a controllable model; such a
    /// slot cannot be selected.
    pub model: Option<Character>,
}

impl AvatarSlot {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        body: impl Visibility + 'static,
        canvas: impl Visibility + 'static,
        model: Option<Character>,
    ) -> Self {
        Self {
            id: id.into(),
            body: Box::new(body),
            canvas: Box::new(canvas),
            model,
        }
    }
}

impl std::fmt::Debug for AvatarSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarSlot")
            .field("id", &self.id)
            .field("body_visible", &self.body.is_visible())
            .field("canvas_visible", &self.canvas.is_visible())
            .field("model", &self.model)
            .finish()
    }
}

/// Validated, non-empty avatar roster.
pub struct Roster {
    slots: Vec<AvatarSlot>,
    pub(crate) hub: Box<dyn Visibility>,
    pub(crate) return_surface: Box<dyn Visibility>,
}

impl Roster {
    pub fn new(
        slots: Vec<AvatarSlot>,
        hub: impl Visibility + 'static,
        return_surface: impl Visibility + 'static,
    ) -> Result<Self, RosterError> {
        if slots.is_empty() {
            return Err(RosterError::EmptyRoster);
        }
        Ok(Self {
            slots,
            hub: Box::new(hub),
            return_surface: Box::new(return_surface),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false` for a constructed roster.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&AvatarSlot> {
        self.slots.get(index)
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut AvatarSlot> {
        self.slots.get_mut(index)
    }

    pub fn slots(&self) -> impl Iterator<Item = &AvatarSlot> {
        self.slots.iter()
    }

    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = &mut AvatarSlot> {
        self.slots.iter_mut()
    }

    /// Index of the slot with `id`.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == id)
    }

    #[must_use]
    pub fn hub_visible(&self) -> bool {
        self.hub.is_visible()
    }

    #[must_use]
    pub fn return_visible(&self) -> bool {
        self.return_surface.is_visible()
    }
}
