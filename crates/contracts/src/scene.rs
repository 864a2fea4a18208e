//! SceneRecord - global-frame ground truth
//!
//! Either synthesized by the model or decoded from an inbound payload.
//! Constructed fresh every step, never kept across steps.

use serde::{Deserialize, Serialize};

/// Object identifier as carried on the wire
pub type Identifier = u64;

/// Simulation timestamp split into whole seconds and nanoseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl Timestamp {
    /// Stamp from simulation time in seconds.
    ///
    /// `seconds = floor(t)`, `nanos` is the truncated fractional remainder.
    pub fn from_sim_time(time: f64) -> Self {
        let whole = time.floor();
        Self {
            seconds: whole as i64,
            nanos: ((time - whole) * 1_000_000_000.0) as u32,
        }
    }

    /// Back to seconds (f64)
    pub fn as_secs_f64(&self) -> f64 {
        self.seconds as f64 + self.nanos as f64 * 1e-9
    }
}

/// 3D vector (position / velocity / acceleration)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3d {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Bounding box dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimension3d {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

/// Orientation (or orientation rate), radians
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation3d {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

/// Kinematic state of a moving object
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseMoving {
    pub dimension: Dimension3d,
    pub position: Vector3d,
    pub velocity: Vector3d,
    pub acceleration: Vector3d,
    pub orientation: Orientation3d,
    pub orientation_rate: Orientation3d,
}

/// Vehicle classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    #[default]
    Unknown,
    Other,
    Car,
    Truck,
    Motorbike,
    Bicycle,
}

/// Brake light state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrakeLightState {
    #[default]
    Unknown,
    Other,
    Off,
    Normal,
    Strong,
}

/// Ground truth vehicle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Identifier,
    pub vehicle_type: VehicleType,
    /// Set on the vehicle carrying the simulated sensor
    pub is_ego: bool,
    pub brake_light: BrakeLightState,
    pub base: BaseMoving,
}

/// Global ground truth snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundTruth {
    pub timestamp: Timestamp,
    pub vehicles: Vec<Vehicle>,
}

/// Global-frame scene handed to the fusion stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    pub timestamp: Timestamp,
    pub ego_vehicle_id: Identifier,
    pub ground_truth: GroundTruth,
}

impl SceneRecord {
    /// Number of vehicles in the ground truth
    pub fn vehicle_count(&self) -> usize {
        self.ground_truth.vehicles.len()
    }
}
