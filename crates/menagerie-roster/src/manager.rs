//! Avatar exclusivity: at most one avatar receives input and is shown at a
//! time, and the follow camera always tracks it.

use glam::Vec2;
use menagerie_input::{ActionState, MoveAxes, resolve_intent};
use menagerie_locomotion::Character;
use menagerie_player::{FollowCamera, FollowTarget};
use tracing::{debug, error, info};

use crate::error::RosterError;
use crate::roster::Roster;

/// Sole writer of each character's active flag and of the camera target.
pub struct AvatarManager {
    roster: Roster,
    camera: FollowCamera,
    active: Option<usize>,
    overlay_open: bool,
}

impl AvatarManager {
    /// Take ownership of `roster` and apply the start state: hub shown, return
    /// surface hidden, every avatar hidden and inactive.
    #[must_use]
    pub fn new(roster: Roster, camera: FollowCamera) -> Self {
        let mut manager = Self {
            roster,
            camera,
            active: None,
            overlay_open: false,
        };
        for slot in manager.roster.slots_mut() {
            if let Some(model) = slot.model.as_mut() {
                model.set_active(false);
            }
            slot.body.set_visible(false);
            slot.canvas.set_visible(false);
        }
        manager.show_hub(true);
        info!(avatars = manager.roster.len(), "Avatar manager ready");
        manager
    }

    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Identifier of the active character, as handed to the chat overlay.
    #[must_use]
    pub fn active_character_id(&self) -> Option<&str> {
        self.active
            .and_then(|i| self.roster.slot(i))
            .map(|slot| slot.id.as_str())
    }

    #[must_use]
    pub fn is_overlay_open(&self) -> bool {
        self.overlay_open
    }

    #[must_use]
    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn character(&self, index: usize) -> Option<&Character> {
        self.roster.slot(index).and_then(|slot| slot.model.as_ref())
    }

    /// Make avatar `index` the only active one and point the camera at it.
    ///
    /// Re-selecting the active avatar restarts it, which cancels any timed
    /// move in progress. An open overlay is closed.
    pub fn select_avatar(&mut self, index: i32) -> Result<(), RosterError> {
        let len = self.roster.len();
        let Some(index) = usize::try_from(index).ok().filter(|&i| i < len) else {
            error!(index, len, "Avatar selection out of range");
            return Err(RosterError::IndexOutOfRange { index, len });
        };
        if let Some(id) = self
            .roster
            .slot(index)
            .filter(|slot| slot.model.is_none())
            .map(|slot| slot.id.clone())
        {
            error!(avatar = %id, "Selected avatar has no model");
            return Err(RosterError::MissingModel(id));
        }

        if self.overlay_open {
            debug!("Closing overlay for avatar switch");
            self.overlay_open = false;
        }
        if let Some(previous) = self.active.take() {
            self.deactivate(previous);
        }
        self.activate(index);
        self.active = Some(index);
        self.camera.set_target(FollowTarget(index));
        self.show_hub(false);

        info!(
            index,
            avatar = self.active_character_id().unwrap_or_default(),
            "Avatar selected"
        );
        Ok(())
    }

    /// Deactivate and hide every avatar and show the hub. Idempotent.
    pub fn back_to_main_hub(&mut self) {
        if let Some(previous) = self.active.take() {
            self.deactivate(previous);
            info!(index = previous, "Returned to hub");
        }
        self.overlay_open = false;
        for slot in self.roster.slots_mut() {
            slot.body.set_visible(false);
            slot.canvas.set_visible(false);
        }
        self.show_hub(true);
    }

    /// Pause the active avatar's input and hide its controls while the chat
    /// overlay is up. The body stays where it is.
    pub fn open_overlay(&mut self) -> Result<(), RosterError> {
        let Some(index) = self.active else {
            error!("Overlay opened with no active avatar");
            return Err(RosterError::NoActiveAvatar);
        };
        if self.overlay_open {
            error!("Overlay is already open");
            return Err(RosterError::OverlayAlreadyOpen);
        }
        if let Some(slot) = self.roster.slot_mut(index) {
            if let Some(model) = slot.model.as_mut() {
                model.set_active(false);
            }
            slot.canvas.set_visible(false);
        }
        self.roster.return_surface.set_visible(false);
        self.overlay_open = true;
        debug!(index, "Overlay opened");
        Ok(())
    }

    /// Undo [`open_overlay`](Self::open_overlay).
    pub fn close_overlay(&mut self) -> Result<(), RosterError> {
        let Some(index) = self.active else {
            error!("Overlay closed with no active avatar");
            return Err(RosterError::NoActiveAvatar);
        };
        if !self.overlay_open {
            error!("Overlay closed without being opened");
            return Err(RosterError::OverlayNotOpen);
        }
        if let Some(slot) = self.roster.slot_mut(index) {
            if let Some(model) = slot.model.as_mut() {
                model.set_active(true);
            }
            slot.canvas.set_visible(true);
        }
        self.roster.return_surface.set_visible(true);
        self.overlay_open = false;
        debug!(index, "Overlay closed");
        Ok(())
    }

    /// One frame: resolve camera-relative intent, step the active character
    /// unless the overlay is open, then let the camera follow it.
    pub fn tick(&mut self, actions: &ActionState, stick: Vec2, dt: f32) {
        let Some(index) = self.active else {
            return;
        };
        let forward = self.camera.forward();
        let overlay_open = self.overlay_open;
        let Some(model) = self
            .roster
            .slot_mut(index)
            .and_then(|slot| slot.model.as_mut())
        else {
            return;
        };

        if overlay_open {
            // Camera keeps following but takes no look input.
            let target = model.position();
            self.camera.update(target, &ActionState::new(), dt);
            return;
        }

        let intent = resolve_intent(MoveAxes::gather(actions, stick), forward);
        model.step(intent, actions, dt);
        let target = model.position();
        self.camera.update(target, actions, dt);
    }

    /// Forward a physics contact for avatar `index`.
    pub fn notify_collision(&mut self, index: usize, tag: &str) {
        if let Some(model) = self
            .roster
            .slot_mut(index)
            .and_then(|slot| slot.model.as_mut())
        {
            model.on_collision(tag);
        }
    }

    /// Whether avatar `index`'s body should be integrated this frame.
    ///
    /// Only a live character is simulated: hidden avatars and one paused
    /// under the overlay stay frozen in place.
    #[must_use]
    pub fn is_simulated(&self, index: usize) -> bool {
        self.character(index).is_some_and(Character::is_active)
    }

    fn activate(&mut self, index: usize) {
        if let Some(slot) = self.roster.slot_mut(index) {
            if let Some(model) = slot.model.as_mut() {
                model.set_active(true);
            }
            slot.body.set_visible(true);
            slot.canvas.set_visible(true);
        }
    }

    fn deactivate(&mut self, index: usize) {
        if let Some(slot) = self.roster.slot_mut(index) {
            if let Some(model) = slot.model.as_mut() {
                model.set_active(false);
            }
            slot.body.set_visible(false);
            slot.canvas.set_visible(false);
        }
    }

    fn show_hub(&mut self, hub: bool) {
        self.roster.hub.set_visible(hub);
        self.roster.return_surface.set_visible(!hub);
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
