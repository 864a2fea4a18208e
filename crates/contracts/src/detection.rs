//! DetectionRecord - published sensor output

use serde::{Deserialize, Serialize};

use crate::{Dimension3d, GroundTruth, Identifier, SceneRecord, Timestamp, Vector3d};

/// A single object reported by the sensor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    /// 0-based, sequential over the detections of one step
    pub tracking_id: Identifier,

    /// Absolute (global-frame) position, copied from the ground truth
    pub position: Vector3d,

    /// Bounding box dimensions, copied from the ground truth
    pub dimension: Dimension3d,

    /// Range-only existence probability, not clamped
    pub existence_probability: f64,
}

/// Record serialized into the outbound payload
///
/// Carries the scene it was derived from (when there was one) together with
/// the detection list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub timestamp: Timestamp,
    pub ego_vehicle_id: Identifier,
    pub ground_truth: Option<GroundTruth>,
    pub objects: Vec<DetectedObject>,
}

impl DetectionRecord {
    /// View as a scene, dropping any detections.
    ///
    /// A record without ground truth yields an empty scene.
    pub fn into_scene(self) -> SceneRecord {
        SceneRecord {
            timestamp: self.timestamp,
            ego_vehicle_id: self.ego_vehicle_id,
            ground_truth: self.ground_truth.unwrap_or_default(),
        }
    }

    /// Number of detected objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

/// Ground-truth scene published as-is (no detections)
impl From<SceneRecord> for DetectionRecord {
    fn from(scene: SceneRecord) -> Self {
        Self {
            timestamp: scene.timestamp,
            ego_vehicle_id: scene.ego_vehicle_id,
            ground_truth: Some(scene.ground_truth),
            objects: Vec::new(),
        }
    }
}
