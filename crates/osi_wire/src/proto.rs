//! Wire messages (protobuf)
//!
//! Hand-maintained `prost` definitions for the subset of the OSI 2.x
//! `SensorData` schema this sensor reads and writes. Tags must stay stable:
//! the host and upstream models rely on them.

/// Unique object identifier
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Identifier {
    #[prost(uint64, tag = "1")]
    pub value: u64,
}

/// Simulation time
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Timestamp {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
    #[prost(uint32, tag = "2")]
    pub nanos: u32,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Vector3d {
    #[prost(double, tag = "1")]
    pub x: f64,
    #[prost(double, tag = "2")]
    pub y: f64,
    #[prost(double, tag = "3")]
    pub z: f64,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Dimension3d {
    #[prost(double, tag = "1")]
    pub length: f64,
    #[prost(double, tag = "2")]
    pub width: f64,
    #[prost(double, tag = "3")]
    pub height: f64,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Orientation3d {
    #[prost(double, tag = "1")]
    pub roll: f64,
    #[prost(double, tag = "2")]
    pub pitch: f64,
    #[prost(double, tag = "3")]
    pub yaw: f64,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct BaseMoving {
    #[prost(message, optional, tag = "1")]
    pub dimension: Option<Dimension3d>,
    #[prost(message, optional, tag = "2")]
    pub position: Option<Vector3d>,
    #[prost(message, optional, tag = "3")]
    pub orientation: Option<Orientation3d>,
    #[prost(message, optional, tag = "4")]
    pub velocity: Option<Vector3d>,
    #[prost(message, optional, tag = "5")]
    pub acceleration: Option<Vector3d>,
    #[prost(message, optional, tag = "6")]
    pub orientation_rate: Option<Orientation3d>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Vehicle {
    #[prost(message, optional, tag = "1")]
    pub id: Option<Identifier>,
    #[prost(message, optional, tag = "2")]
    pub base: Option<BaseMoving>,
    #[prost(enumeration = "vehicle::Type", tag = "3")]
    pub r#type: i32,
    #[prost(message, optional, tag = "4")]
    pub light_state: Option<vehicle::LightState>,
    #[prost(bool, tag = "5")]
    pub ego_vehicle: bool,
}

/// Nested types of [`Vehicle`]
pub mod vehicle {
    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct LightState {
        #[prost(enumeration = "light_state::BrakeLightState", tag = "1")]
        pub brake_light_state: i32,
    }

    pub mod light_state {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum BrakeLightState {
            Unknown = 0,
            Other = 1,
            Off = 2,
            Normal = 3,
            Strong = 4,
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Type {
        Unknown = 0,
        Other = 1,
        Car = 2,
        Truck = 3,
        Motorbike = 4,
        Bicycle = 5,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GroundTruth {
    #[prost(message, optional, tag = "1")]
    pub timestamp: Option<Timestamp>,
    #[prost(message, repeated, tag = "2")]
    pub vehicle: Vec<Vehicle>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SensorDataGroundTruth {
    #[prost(message, optional, tag = "1")]
    pub global_ground_truth: Option<GroundTruth>,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct DetectedObject {
    #[prost(message, optional, tag = "1")]
    pub tracking_id: Option<Identifier>,
    #[prost(message, optional, tag = "2")]
    pub object: Option<BaseMoving>,
    #[prost(double, tag = "3")]
    pub existence_probability: f64,
}

/// Top-level payload exchanged with the host
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SensorData {
    #[prost(message, optional, tag = "1")]
    pub timestamp: Option<Timestamp>,
    #[prost(message, optional, tag = "2")]
    pub ego_vehicle_id: Option<Identifier>,
    #[prost(message, optional, tag = "3")]
    pub ground_truth: Option<SensorDataGroundTruth>,
    #[prost(message, repeated, tag = "4")]
    pub object: Vec<DetectedObject>,
}
