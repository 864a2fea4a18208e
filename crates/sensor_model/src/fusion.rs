//! Ego-relative detection model.
//!
//! Converts a global-frame scene into a detection list:
//! 1. locate the ego vehicle (origin of the relative frame)
//! 2. translate every other vehicle by the ego origin and rotate it by the
//!    *target* vehicle's own yaw/pitch/roll
//! 3. gate on range and a forward cone around the local x-axis
//! 4. attach a range-only existence probability
//!
//! Sensor mounting offset is not modelled: relative coordinates are taken
//! from the centre of the ego bounding box.

use contracts::{
    DetectedObject, DetectionRecord, FusionConfig, Identifier, Orientation3d, SceneRecord,
    Timestamp, Vector3d, Vehicle,
};
use nalgebra::{Matrix3, Vector3};
use tracing::{debug, info, trace};

/// Combined Z-Y-X (yaw, pitch, roll) rotation matrix
pub fn rotation_matrix(orientation: &Orientation3d) -> Matrix3<f64> {
    let (sin_yaw, cos_yaw) = orientation.yaw.sin_cos();
    let (sin_pitch, cos_pitch) = orientation.pitch.sin_cos();
    let (sin_roll, cos_roll) = orientation.roll.sin_cos();

    Matrix3::new(
        cos_yaw * cos_pitch,
        cos_yaw * sin_pitch * sin_roll - sin_yaw * cos_roll,
        cos_yaw * sin_pitch * cos_roll + sin_yaw * sin_roll,
        sin_yaw * cos_pitch,
        sin_yaw * sin_pitch * sin_roll + cos_yaw * cos_roll,
        sin_yaw * sin_pitch * cos_roll - cos_yaw * sin_roll,
        -sin_pitch,
        cos_pitch * sin_roll,
        cos_pitch * cos_roll,
    )
}

/// Rotate `point` by `orientation`
pub fn rotate_point(point: Vector3d, orientation: &Orientation3d) -> Vector3d {
    let rotated = rotation_matrix(orientation) * Vector3::new(point.x, point.y, point.z);
    Vector3d::new(rotated.x, rotated.y, rotated.z)
}

/// Relative geometry of one candidate vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeGeometry {
    pub relative: Vector3d,
    pub distance: f64,
}

/// Detection model
#[derive(Debug, Clone, Default)]
pub struct FusionEngine {
    config: FusionConfig,
}

impl FusionEngine {
    pub fn new(config: FusionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Global position of the ego vehicle
    ///
    /// Every vehicle whose id equals the declared ego id, or whose own ego
    /// flag is set, overwrites the origin; the last match wins. No match
    /// leaves the origin at zero.
    pub fn locate_ego(&self, scene: &SceneRecord) -> Vector3d {
        debug!(ego_id = scene.ego_vehicle_id, "looking for ego vehicle");
        let mut origin = Vector3d::ZERO;
        for vehicle in &scene.ground_truth.vehicles {
            trace!(id = vehicle.id, is_ego = vehicle.is_ego, "checking vehicle");
            if is_ego(vehicle, scene.ego_vehicle_id) {
                debug!(id = vehicle.id, "found ego vehicle");
                origin = vehicle.base.position;
            }
        }
        debug!(x = origin.x, y = origin.y, z = origin.z, "current ego position");
        origin
    }

    /// Translate by the ego origin, then rotate by the vehicle's own orientation
    pub fn relative_geometry(&self, vehicle: &Vehicle, origin: Vector3d) -> RelativeGeometry {
        let position = vehicle.base.position;
        let translated = Vector3d::new(
            position.x - origin.x,
            position.y - origin.y,
            position.z - origin.z,
        );
        let relative = rotate_point(translated, &vehicle.base.orientation);
        let distance =
            (relative.x * relative.x + relative.y * relative.y + relative.z * relative.z).sqrt();
        RelativeGeometry { relative, distance }
    }

    /// Range and forward-cone gate
    ///
    /// A zero distance makes the cone ratio NaN, which fails the gate.
    pub fn in_scope(&self, geometry: &RelativeGeometry) -> bool {
        geometry.distance <= self.config.max_range
            && geometry.relative.x / geometry.distance > self.config.min_forward_cosine
    }

    /// `cos((d - peak) / width)`, deliberately not clamped
    pub fn existence_probability(&self, distance: f64) -> f64 {
        ((distance - self.config.probability_peak_range) / self.config.probability_width).cos()
    }

    /// Build the detection record for end-of-step time `time`
    pub fn fuse(&self, scene: &SceneRecord, time: f64) -> DetectionRecord {
        let origin = self.locate_ego(scene);
        let mut objects = Vec::new();

        for vehicle in &scene.ground_truth.vehicles {
            let tracking_id = objects.len() as Identifier;
            let position = vehicle.base.position;

            if is_ego(vehicle, scene.ego_vehicle_id) {
                debug!(
                    index = tracking_id,
                    id = vehicle.id,
                    rel_x = position.x - origin.x,
                    rel_y = position.y - origin.y,
                    rel_z = position.z - origin.z,
                    "ignoring ego vehicle"
                );
                continue;
            }

            let geometry = self.relative_geometry(vehicle, origin);
            if !self.in_scope(&geometry) {
                debug!(
                    index = tracking_id,
                    id = vehicle.id,
                    rel_x = position.x - origin.x,
                    rel_y = position.y - origin.y,
                    rel_z = position.z - origin.z,
                    "ignoring vehicle outside sensor scope"
                );
                continue;
            }

            let object = DetectedObject {
                tracking_id,
                position,
                dimension: vehicle.base.dimension,
                existence_probability: self.existence_probability(geometry.distance),
            };
            debug!(
                index = tracking_id,
                id = vehicle.id,
                probability = object.existence_probability,
                rel_x = geometry.relative.x,
                rel_y = geometry.relative.y,
                rel_z = geometry.relative.z,
                x = position.x,
                y = position.y,
                z = position.z,
                "output vehicle"
            );
            objects.push(object);
        }

        info!(mapped = objects.len(), "mapped vehicles to output");

        DetectionRecord {
            timestamp: Timestamp::from_sim_time(time),
            ego_vehicle_id: scene.ego_vehicle_id,
            ground_truth: Some(scene.ground_truth.clone()),
            objects,
        }
    }
}

#[inline]
fn is_ego(vehicle: &Vehicle, ego_id: Identifier) -> bool {
    vehicle.id == ego_id || vehicle.is_ego
}
