//! World factory function and core resource registration.

use bevy_ecs::prelude::*;

use crate::{InputState, TimeRes};

/// Registers the core resources ([`TimeRes`], [`InputState`]) with default values.
pub fn register_core_resources(world: &mut World) {
    world.insert_resource(TimeRes::default());
    world.insert_resource(InputState::default());
}

/// Creates an ECS world with all core resources pre-inserted.
pub fn create_world() -> World {
    let mut world = World::new();
    register_core_resources(&mut world);
    world
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_world_has_all_resources() {
        let world = create_world();
        assert!(world.contains_resource::<TimeRes>());
        assert!(world.contains_resource::<InputState>());
    }

    #[test]
    fn test_world_starts_with_no_entities() {
        let world = create_world();
        assert_eq!(world.entities().len(), 0);
    }

    #[test]
    #[should_panic]
    fn test_missing_resource_panics_at_runtime() {
        let world = World::new();
        let _time = world.resource::<TimeRes>();
    }
}
