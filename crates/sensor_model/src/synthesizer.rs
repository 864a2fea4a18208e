//! Closed-form ground-truth scenario.
//!
//! Vehicle `i` drives along x at constant speed and sways laterally:
//!
//! - `x(t) = x_offset + t * x_speed`
//! - `y(t) = y_offset + A * sin(t / x_speed)`
//!
//! Velocity and acceleration are the exact time derivatives. Pure function of
//! `t`, no internal state.

use contracts::{
    BaseMoving, BrakeLightState, GroundTruth, Identifier, Orientation3d, ScenarioConfig,
    SceneRecord, Timestamp, Vector3d, Vehicle, VehicleType,
};
use tracing::debug;

/// Ground-truth scene generator
#[derive(Debug, Clone)]
pub struct ScenarioSynthesizer {
    scenario: ScenarioConfig,
}

impl Default for ScenarioSynthesizer {
    fn default() -> Self {
        Self::new(ScenarioConfig::default())
    }
}

impl ScenarioSynthesizer {
    pub fn new(scenario: ScenarioConfig) -> Self {
        Self { scenario }
    }

    pub fn scenario(&self) -> &ScenarioConfig {
        &self.scenario
    }

    /// Scene at end-of-step simulation time `time`
    pub fn synthesize(&self, time: f64) -> SceneRecord {
        let timestamp = Timestamp::from_sim_time(time);
        let amplitude = self.scenario.lateral_amplitude;

        let vehicles = self
            .scenario
            .lanes
            .iter()
            .enumerate()
            .map(|(i, lane)| {
                let phase = time / lane.x_speed;
                let base = BaseMoving {
                    dimension: self.scenario.dimension,
                    position: Vector3d::new(
                        lane.x_offset + time * lane.x_speed,
                        lane.y_offset + phase.sin() * amplitude,
                        0.0,
                    ),
                    velocity: Vector3d::new(lane.x_speed, phase.cos() * amplitude / lane.x_speed, 0.0),
                    acceleration: Vector3d::new(
                        0.0,
                        -phase.sin() * amplitude / (lane.x_speed * lane.x_speed),
                        0.0,
                    ),
                    orientation: Orientation3d::default(),
                    orientation_rate: Orientation3d::default(),
                };

                let vehicle = Vehicle {
                    id: i as Identifier,
                    vehicle_type: VehicleType::Car,
                    is_ego: i == self.scenario.ego_index,
                    brake_light: BrakeLightState::Off,
                    base,
                };

                debug!(
                    index = i,
                    id = vehicle.id,
                    x = base.position.x,
                    y = base.position.y,
                    z = base.position.z,
                    vx = base.velocity.x,
                    vy = base.velocity.y,
                    "GT: adding vehicle"
                );
                vehicle
            })
            .collect();

        SceneRecord {
            timestamp,
            ego_vehicle_id: self.scenario.ego_index as Identifier,
            ground_truth: GroundTruth {
                timestamp,
                vehicles,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_vehicles_ego_four() {
        let scene = ScenarioSynthesizer::default().synthesize(3.7);
        assert_eq!(scene.vehicle_count(), 10);
        assert_eq!(scene.ego_vehicle_id, 4);

        let egos: Vec<_> = scene
            .ground_truth
            .vehicles
            .iter()
            .filter(|v| v.is_ego)
            .map(|v| v.id)
            .collect();
        assert_eq!(egos, vec![4]);
    }

    #[test]
    fn test_deterministic() {
        let synth = ScenarioSynthesizer::default();
        assert_eq!(synth.synthesize(12.34), synth.synthesize(12.34));
    }

    #[test]
    fn test_positions_at_t1() {
        let scene = ScenarioSynthesizer::default().synthesize(1.0);
        let v0 = &scene.ground_truth.vehicles[0];
        assert_eq!(v0.base.position.x, 29.0);
        assert!((v0.base.position.y - (3.0 + (1.0f64 / 29.0).sin() * 0.25)).abs() < 1e-12);

        let ego = &scene.ground_truth.vehicles[4];
        assert_eq!(ego.base.position.x, 26.0);
        assert!((ego.base.position.y - (1.0f64 / 26.0).sin() * 0.25).abs() < 1e-12);
        assert_eq!(ego.base.position.z, 0.0);
    }

    #[test]
    fn test_derivatives() {
        let synth = ScenarioSynthesizer::default();
        let t = 5.0;
        let h = 1e-4;
        let y = |t: f64| synth.synthesize(t).ground_truth.vehicles[2].base.position.y;
        let vy = |t: f64| synth.synthesize(t).ground_truth.vehicles[2].base.velocity.y;

        let numeric_v = (y(t + h) - y(t - h)) / (2.0 * h);
        let numeric_a = (vy(t + h) - vy(t - h)) / (2.0 * h);
        let state = synth.synthesize(t).ground_truth.vehicles[2].base;

        assert!((state.velocity.y - numeric_v).abs() < 1e-8);
        assert!((state.acceleration.y - numeric_a).abs() < 1e-8);
        assert_eq!(state.velocity.x, 31.0);
        assert_eq!(state.acceleration.x, 0.0);
    }

    #[test]
    fn test_fixed_shape_and_type() {
        let scene = ScenarioSynthesizer::default().synthesize(0.5);
        for v in &scene.ground_truth.vehicles {
            assert_eq!(v.vehicle_type, VehicleType::Car);
            assert_eq!(v.brake_light, BrakeLightState::Off);
            assert_eq!(v.base.dimension.length, 5.0);
            assert_eq!(v.base.dimension.width, 2.0);
            assert_eq!(v.base.dimension.height, 1.5);
            assert_eq!(v.base.orientation, Orientation3d::default());
        }
    }

    #[test]
    fn test_timestamps() {
        let scene = ScenarioSynthesizer::default().synthesize(2.5);
        assert_eq!(scene.timestamp, Timestamp { seconds: 2, nanos: 500_000_000 });
        assert_eq!(scene.ground_truth.timestamp, scene.timestamp);
    }
}
