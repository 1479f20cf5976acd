//! Recording body used by the controller tests.

use std::cell::RefCell;

use glam::Vec3;

use crate::body::{GroundSensor, PlayerBody, SphereCast};

/// In-memory body that records every call and answers ground queries from a
/// flat floor at `floor_y`.
#[derive(Debug)]
pub struct MockBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub gravity_enabled: bool,
    pub gravity_toggles: Vec<bool>,
    pub yaw: f32,
    pub accelerations: Vec<Vec3>,
    pub moves: Vec<Vec3>,
    /// Floor height; `None` means there is nothing below.
    pub floor_y: Option<f32>,
    pub casts: RefCell<Vec<SphereCast>>,
}

impl Default for MockBody {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            gravity_enabled: true,
            gravity_toggles: Vec::new(),
            yaw: 0.0,
            accelerations: Vec::new(),
            moves: Vec::new(),
            floor_y: None,
            casts: RefCell::new(Vec::new()),
        }
    }
}

impl MockBody {
    /// A body standing on a floor at height zero.
    pub fn on_floor() -> Self {
        Self {
            floor_y: Some(0.0),
            ..Self::default()
        }
    }
}

impl PlayerBody for MockBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn add_acceleration(&mut self, acceleration: Vec3, dt: f32) {
        self.accelerations.push(acceleration);
        self.velocity += acceleration * dt;
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity_toggles.push(enabled);
        self.gravity_enabled = enabled;
    }

    fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
    }

    fn move_by(&mut self, displacement: Vec3, dt: f32) -> bool {
        self.moves.push(displacement);
        self.position += displacement;
        if dt > 0.0 {
            self.velocity = displacement / dt;
        }
        match self.floor_y {
            Some(floor) if self.position.y <= floor => {
                self.position.y = floor;
                true
            }
            _ => false,
        }
    }
}

impl GroundSensor for MockBody {
    fn sphere_cast(&self, cast: &SphereCast) -> bool {
        self.casts.borrow_mut().push(*cast);
        match self.floor_y {
            Some(floor) => cast.origin.y - cast.radius - cast.max_distance <= floor,
            None => false,
        }
    }
}
