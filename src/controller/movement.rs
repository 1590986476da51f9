use std::collections::HashSet;

use glam::Vec3;

use crate::config::{LOGICAL_RATE, MOVE_SPEED, RISE_RATE};
use crate::model::ViewerPose;

/// Movement directions, declared in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Movement {
    Left,
    Right,
    Forward,
    Back,
    Rise,
}

impl Movement {
    pub const PRIORITY: [Movement; 5] = [
        Movement::Left,
        Movement::Right,
        Movement::Forward,
        Movement::Back,
        Movement::Rise,
    ];

    /// The single direction honored this frame when several are held
    pub fn winner(held: &HashSet<Movement>) -> Option<Movement> {
        Self::PRIORITY.into_iter().find(|m| held.contains(m))
    }
}

/// Moves the viewer one key at a time
#[derive(Debug, Clone)]
pub struct MovementController {
    pub move_speed: f32,
    pub rise_rate: f32,
    pub logical_rate: f32,
}

impl MovementController {
    pub fn new() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            rise_rate: RISE_RATE,
            logical_rate: LOGICAL_RATE,
        }
    }

    /// Displace the eye along `side` or `forward` for the highest-priority held
    /// direction. Movement is never combined: holding W and A strafes only.
    pub fn move_viewer(
        &self,
        held: &HashSet<Movement>,
        pose: &mut ViewerPose,
        forward: Vec3,
        side: Vec3,
        dt: f32,
    ) -> Vec3 {
        let step = dt * self.move_speed;
        let logical = dt * self.logical_rate;

        match Movement::winner(held) {
            Some(Movement::Left) => {
                pose.position.x -= logical;
                pose.eye += side * step;
            }
            Some(Movement::Right) => {
                pose.position.x += logical;
                pose.eye -= side * step;
            }
            Some(Movement::Forward) => {
                pose.position.y += logical;
                pose.eye += forward * step;
            }
            Some(Movement::Back) => {
                pose.position.y -= logical;
                pose.eye -= forward * step;
            }
            Some(Movement::Rise) => {
                pose.position.z += logical;
                pose.eye.z += dt * self.rise_rate;
            }
            None => {}
        }

        pose.eye
    }
}

impl Default for MovementController {
    fn default() -> Self {
        Self::new()
    }
}
