//! Conversions between wire messages and `contracts` domain types
//!
//! Decoding is lenient: absent sub-messages become zero/default values, unknown
//! enum values map to `Unknown`.

use contracts::{
    BaseMoving, BrakeLightState, DetectedObject, DetectionRecord, Dimension3d, GroundTruth,
    Orientation3d, Timestamp, Vector3d, Vehicle, VehicleType,
};

use crate::proto;
use crate::proto::vehicle::light_state;

// ===== Leaf values =====

impl From<Timestamp> for proto::Timestamp {
    fn from(ts: Timestamp) -> Self {
        Self {
            seconds: ts.seconds,
            nanos: ts.nanos,
        }
    }
}

impl From<proto::Timestamp> for Timestamp {
    fn from(ts: proto::Timestamp) -> Self {
        Self {
            seconds: ts.seconds,
            nanos: ts.nanos,
        }
    }
}

impl From<Vector3d> for proto::Vector3d {
    fn from(v: Vector3d) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<proto::Vector3d> for Vector3d {
    fn from(v: proto::Vector3d) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Dimension3d> for proto::Dimension3d {
    fn from(d: Dimension3d) -> Self {
        Self {
            length: d.length,
            width: d.width,
            height: d.height,
        }
    }
}

impl From<proto::Dimension3d> for Dimension3d {
    fn from(d: proto::Dimension3d) -> Self {
        Self {
            length: d.length,
            width: d.width,
            height: d.height,
        }
    }
}

impl From<Orientation3d> for proto::Orientation3d {
    fn from(o: Orientation3d) -> Self {
        Self {
            roll: o.roll,
            pitch: o.pitch,
            yaw: o.yaw,
        }
    }
}

impl From<proto::Orientation3d> for Orientation3d {
    fn from(o: proto::Orientation3d) -> Self {
        Self {
            roll: o.roll,
            pitch: o.pitch,
            yaw: o.yaw,
        }
    }
}

fn identifier(value: u64) -> Option<proto::Identifier> {
    Some(proto::Identifier { value })
}

fn identifier_value(id: Option<proto::Identifier>) -> u64 {
    id.map(|id| id.value).unwrap_or_default()
}

/// Optional sub-message to domain value, absent -> default
fn or_default<P, D>(value: Option<P>) -> D
where
    D: From<P> + Default,
{
    value.map(D::from).unwrap_or_default()
}

// ===== Enumerations =====

fn vehicle_type_to_wire(vehicle_type: VehicleType) -> proto::vehicle::Type {
    match vehicle_type {
        VehicleType::Unknown => proto::vehicle::Type::Unknown,
        VehicleType::Other => proto::vehicle::Type::Other,
        VehicleType::Car => proto::vehicle::Type::Car,
        VehicleType::Truck => proto::vehicle::Type::Truck,
        VehicleType::Motorbike => proto::vehicle::Type::Motorbike,
        VehicleType::Bicycle => proto::vehicle::Type::Bicycle,
    }
}

fn vehicle_type_from_wire(raw: i32) -> VehicleType {
    match proto::vehicle::Type::try_from(raw) {
        Ok(proto::vehicle::Type::Other) => VehicleType::Other,
        Ok(proto::vehicle::Type::Car) => VehicleType::Car,
        Ok(proto::vehicle::Type::Truck) => VehicleType::Truck,
        Ok(proto::vehicle::Type::Motorbike) => VehicleType::Motorbike,
        Ok(proto::vehicle::Type::Bicycle) => VehicleType::Bicycle,
        Ok(proto::vehicle::Type::Unknown) | Err(_) => VehicleType::Unknown,
    }
}

fn brake_light_to_wire(state: BrakeLightState) -> light_state::BrakeLightState {
    match state {
        BrakeLightState::Unknown => light_state::BrakeLightState::Unknown,
        BrakeLightState::Other => light_state::BrakeLightState::Other,
        BrakeLightState::Off => light_state::BrakeLightState::Off,
        BrakeLightState::Normal => light_state::BrakeLightState::Normal,
        BrakeLightState::Strong => light_state::BrakeLightState::Strong,
    }
}

fn brake_light_from_wire(raw: i32) -> BrakeLightState {
    match light_state::BrakeLightState::try_from(raw) {
        Ok(light_state::BrakeLightState::Other) => BrakeLightState::Other,
        Ok(light_state::BrakeLightState::Off) => BrakeLightState::Off,
        Ok(light_state::BrakeLightState::Normal) => BrakeLightState::Normal,
        Ok(light_state::BrakeLightState::Strong) => BrakeLightState::Strong,
        Ok(light_state::BrakeLightState::Unknown) | Err(_) => BrakeLightState::Unknown,
    }
}

// ===== Composite messages =====

impl From<&BaseMoving> for proto::BaseMoving {
    fn from(base: &BaseMoving) -> Self {
        Self {
            dimension: Some(base.dimension.into()),
            position: Some(base.position.into()),
            orientation: Some(base.orientation.into()),
            velocity: Some(base.velocity.into()),
            acceleration: Some(base.acceleration.into()),
            orientation_rate: Some(base.orientation_rate.into()),
        }
    }
}

impl From<proto::BaseMoving> for BaseMoving {
    fn from(base: proto::BaseMoving) -> Self {
        Self {
            dimension: or_default(base.dimension),
            position: or_default(base.position),
            velocity: or_default(base.velocity),
            acceleration: or_default(base.acceleration),
            orientation: or_default(base.orientation),
            orientation_rate: or_default(base.orientation_rate),
        }
    }
}

impl From<&Vehicle> for proto::Vehicle {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: identifier(vehicle.id),
            base: Some((&vehicle.base).into()),
            r#type: vehicle_type_to_wire(vehicle.vehicle_type) as i32,
            light_state: Some(proto::vehicle::LightState {
                brake_light_state: brake_light_to_wire(vehicle.brake_light) as i32,
            }),
            ego_vehicle: vehicle.is_ego,
        }
    }
}

impl From<proto::Vehicle> for Vehicle {
    fn from(vehicle: proto::Vehicle) -> Self {
        Self {
            id: identifier_value(vehicle.id),
            vehicle_type: vehicle_type_from_wire(vehicle.r#type),
            is_ego: vehicle.ego_vehicle,
            brake_light: vehicle
                .light_state
                .map(|ls| brake_light_from_wire(ls.brake_light_state))
                .unwrap_or_default(),
            base: or_default(vehicle.base),
        }
    }
}

impl From<&GroundTruth> for proto::GroundTruth {
    fn from(gt: &GroundTruth) -> Self {
        Self {
            timestamp: Some(gt.timestamp.into()),
            vehicle: gt.vehicles.iter().map(Into::into).collect(),
        }
    }
}

impl From<proto::GroundTruth> for GroundTruth {
    fn from(gt: proto::GroundTruth) -> Self {
        Self {
            timestamp: or_default(gt.timestamp),
            vehicles: gt.vehicle.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&DetectedObject> for proto::DetectedObject {
    fn from(obj: &DetectedObject) -> Self {
        Self {
            tracking_id: identifier(obj.tracking_id),
            object: Some(proto::BaseMoving {
                dimension: Some(obj.dimension.into()),
                position: Some(obj.position.into()),
                ..Default::default()
            }),
            existence_probability: obj.existence_probability,
        }
    }
}

impl From<proto::DetectedObject> for DetectedObject {
    fn from(obj: proto::DetectedObject) -> Self {
        let base = obj.object.unwrap_or_default();
        Self {
            tracking_id: identifier_value(obj.tracking_id),
            position: or_default(base.position),
            dimension: or_default(base.dimension),
            existence_probability: obj.existence_probability,
        }
    }
}

impl From<&DetectionRecord> for proto::SensorData {
    fn from(record: &DetectionRecord) -> Self {
        Self {
            timestamp: Some(record.timestamp.into()),
            ego_vehicle_id: identifier(record.ego_vehicle_id),
            ground_truth: record
                .ground_truth
                .as_ref()
                .map(|gt| proto::SensorDataGroundTruth {
                    global_ground_truth: Some(gt.into()),
                }),
            object: record.objects.iter().map(Into::into).collect(),
        }
    }
}

impl From<proto::SensorData> for DetectionRecord {
    fn from(data: proto::SensorData) -> Self {
        Self {
            timestamp: or_default(data.timestamp),
            ego_vehicle_id: identifier_value(data.ego_vehicle_id),
            ground_truth: data
                .ground_truth
                .and_then(|gt| gt.global_ground_truth)
                .map(Into::into),
            objects: data.object.into_iter().map(Into::into).collect(),
        }
    }
}
