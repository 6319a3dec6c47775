//! Builds the avatar roster from config with headless collaborators and runs
//! their physics.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use menagerie_config::Config;
use menagerie_locomotion::{AnimatorState, Character, KinematicBody};
use menagerie_player::FollowCamera;
use menagerie_roster::{AvatarManager, AvatarSlot, Roster, RosterError, Surface};
use tracing::{debug, info};

/// Distance between avatars along X at spawn.
pub const AVATAR_SPACING: f32 = 3.0;

pub struct Scene {
    pub manager: AvatarManager,
    bodies: Vec<Rc<RefCell<KinematicBody>>>,
    animators: Vec<Rc<RefCell<AnimatorState>>>,
}

impl Scene {
    pub fn from_config(config: &Config) -> Result<Self, RosterError> {
        let mut slots = Vec::with_capacity(config.roster.avatars.len());
        let mut bodies = Vec::with_capacity(slots.capacity());
        let mut animators = Vec::with_capacity(slots.capacity());

        for (i, entry) in config.roster.avatars.iter().enumerate() {
            let spawn = Vec3::new(i as f32 * AVATAR_SPACING, 0.0, 0.0);
            let body = Rc::new(RefCell::new(KinematicBody::new(spawn)));
            let animator = Rc::new(RefCell::new(AnimatorState::new()));
            let model = Character::builder(entry.id.clone())
                .body(Rc::clone(&body))
                .animator(Rc::clone(&animator))
                .kind(entry.kind, &config.movement)
                .build()?;
            debug!(avatar = %entry.id, kind = ?entry.kind, ?spawn, "Avatar spawned");

            slots.push(AvatarSlot::new(
                entry.id.clone(),
                Surface::new(format!("{} body", entry.id)),
                Surface::new(format!("{} canvas", entry.id)),
                Some(model),
            ));
            bodies.push(body);
            animators.push(animator);
        }

        let roster = Roster::new(slots, Surface::new("hub"), Surface::new("return"))?;
        info!(avatars = roster.len(), "Scene built");
        Ok(Self {
            manager: AvatarManager::new(roster, FollowCamera::from_config(&config.camera)),
            bodies,
            animators,
        })
    }

    /// Integrate the live avatar's body by `dt` and forward its landing.
    /// Inactive avatars are frozen.
    pub fn step_physics(&mut self, dt: f32) {
        for (index, body) in self.bodies.iter().enumerate() {
            if !self.manager.is_simulated(index) {
                continue;
            }
            let contact = body.borrow_mut().integrate(dt);
            if let Some(contact) = contact {
                self.manager.notify_collision(index, contact.tag);
            }
        }
    }

    #[must_use]
    pub fn avatar_count(&self) -> usize {
        self.bodies.len()
    }

    /// Last value written to animator parameter `name` of avatar `index`.
    #[must_use]
    pub fn animation_flag(&self, index: usize, name: &str) -> bool {
        self.animators
            .get(index)
            .is_some_and(|anim| anim.borrow().get_bool(name))
    }
}

#[cfg(test)]
impl Scene {
    pub(crate) fn body_position(&self, index: usize) -> Option<Vec3> {
        use menagerie_locomotion::Body as _;
        self.bodies.get(index).map(|body| body.borrow().position())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use menagerie_config::RosterConfig;
    use menagerie_input::{Action, ActionState};
    use menagerie_roster::Visibility;

    use super::*;

    #[test]
    fn test_scene_from_default_config() {
        let scene = Scene::from_config(&Config::default()).unwrap();
        assert_eq!(scene.avatar_count(), 4);
        assert_eq!(scene.body_position(2), Some(Vec3::new(6.0, 0.0, 0.0)));
        assert!(scene.manager.roster().hub_visible());
        assert!(
            scene
                .manager
                .roster()
                .slots()
                .all(|slot| !slot.body.is_visible())
        );
    }

    #[test]
    fn test_empty_roster_config_fails() {
        let config = Config {
            roster: RosterConfig {
                avatars: Vec::new(),
            },
            ..Config::default()
        };
        assert_eq!(
            Scene::from_config(&config).err(),
            Some(RosterError::EmptyRoster)
        );
    }

    #[test]
    fn test_physics_lands_jumping_avatar() {
        let mut scene = Scene::from_config(&Config::default()).unwrap();
        scene.manager.select_avatar(1).unwrap();
        let mut actions = ActionState::new();
        actions.set_value(Action::Jump, 1.0);
        scene.manager.tick(&actions, Vec2::ZERO, 1.0 / 60.0);
        let grounded = |scene: &Scene| {
            scene
                .manager
                .character(1)
                .is_some_and(|c| c.flags().grounded)
        };
        assert!(!grounded(&scene));

        for _ in 0..120 {
            scene.step_physics(1.0 / 60.0);
        }
        assert_eq!(scene.body_position(1).map(|p| p.y), Some(0.0));
        assert!(grounded(&scene));
        assert!(!scene.animation_flag(1, menagerie_locomotion::params::JUMPING));
    }

    #[test]
    fn test_hidden_hovering_avatar_stays_put() {
        let mut scene = Scene::from_config(&Config::default()).unwrap();
        scene.manager.select_avatar(1).unwrap();
        let mut actions = ActionState::new();
        for pressed in [Action::Jump, Action::Run, Action::Jump, Action::HoverLift] {
            actions.begin_frame();
            actions.set_value(pressed, 1.0);
            scene.manager.tick(&actions, Vec2::ZERO, 1.0 / 60.0);
            scene.step_physics(1.0 / 60.0);
        }
        assert!(scene.manager.character(1).unwrap().flags().hovering);
        assert!(scene.manager.character(1).unwrap().velocity().y > 0.0);

        scene.manager.back_to_main_hub();
        let parked = scene.body_position(1);
        for _ in 0..600 {
            scene.step_physics(1.0 / 60.0);
        }
        assert_eq!(scene.body_position(1), parked);
        assert_eq!(scene.manager.character(1).unwrap().velocity(), Vec3::ZERO);
    }
}
