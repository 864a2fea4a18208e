//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! Covers:
//! - Slot layout snapshot
//! - Sensor model driven as a host would (slots + addresses)
//! - The same chain through the exported FMI entry points

#[cfg(test)]
mod support {
    use contracts::{
        vr, BaseMoving, DetectionRecord, GroundTruth, Identifier, PayloadSlotSet, Vector3d,
        Vehicle,
    };
    use sensor_model::{Address, SensorModel};

    pub fn vehicle(id: Identifier, x: f64, y: f64, z: f64) -> Vehicle {
        Vehicle {
            id,
            base: BaseMoving {
                position: Vector3d::new(x, y, z),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn record(ego: Identifier, vehicles: Vec<Vehicle>) -> DetectionRecord {
        DetectionRecord {
            ego_vehicle_id: ego,
            ground_truth: Some(GroundTruth {
                vehicles,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// Point the model's inbound slots at `bytes`
    pub fn feed(model: &mut SensorModel, bytes: &[u8]) {
        let (hi, lo) = Address::from_ptr(bytes.as_ptr()).encode();
        model
            .value_table_mut()
            .set_integers(
                &[
                    vr::INTEGER_SENSORDATA_IN_BASELO,
                    vr::INTEGER_SENSORDATA_IN_BASEHI,
                    vr::INTEGER_SENSORDATA_IN_SIZE,
                ],
                &[lo, hi, bytes.len() as i32],
            )
            .unwrap();
    }

    pub fn out_slots(model: &SensorModel) -> PayloadSlotSet {
        let mut v = [0; 3];
        model
            .value_table()
            .get_integers(
                &[
                    vr::INTEGER_SENSORDATA_OUT_BASELO,
                    vr::INTEGER_SENSORDATA_OUT_BASEHI,
                    vr::INTEGER_SENSORDATA_OUT_SIZE,
                ],
                &mut v,
            )
            .unwrap();
        PayloadSlotSet {
            address_low: v[0],
            address_high: v[1],
            size: v[2],
        }
    }

    /// Copy the bytes a published slot set points at
    pub fn host_read(slots: &PayloadSlotSet) -> Vec<u8> {
        let ptr = Address::decode(slots.address_high, slots.address_low).as_ptr();
        unsafe { std::slice::from_raw_parts(ptr, slots.size as usize).to_vec() }
    }

    pub fn published(model: &SensorModel) -> DetectionRecord {
        osi_wire::decode_detection_record(&host_read(&out_slots(model))).unwrap()
    }
}

#[cfg(test)]
mod contract_tests {
    use contracts::{vr, PayloadSlotSet, StepStatus, ValueKind};

    #[test]
    fn test_slot_layout_snapshot() {
        assert_eq!(
            [
                vr::INTEGER_SENSORDATA_IN_BASELO,
                vr::INTEGER_SENSORDATA_IN_BASEHI,
                vr::INTEGER_SENSORDATA_IN_SIZE,
                vr::INTEGER_SENSORDATA_OUT_BASELO,
                vr::INTEGER_SENSORDATA_OUT_BASEHI,
                vr::INTEGER_SENSORDATA_OUT_SIZE,
                vr::INTEGER_COUNT,
            ],
            [0, 1, 2, 3, 4, 5, 6]
        );
        assert_eq!([vr::BOOLEAN_SOURCE, vr::BOOLEAN_VALID], [0, 1]);
        assert_eq!(ValueKind::Integer.capacity(), 7);
    }

    #[test]
    fn test_status_codes_match_fmi() {
        assert_eq!(StepStatus::Ok as i32, 0);
        assert_eq!(StepStatus::Discard as i32, 2);
        assert_eq!(StepStatus::Error as i32, 3);
        assert_eq!(StepStatus::Fatal as i32, 4);
        assert!(!PayloadSlotSet::EMPTY.is_present());
    }
}

#[cfg(test)]
mod e2e_tests {
    use contracts::{vr, InputFallback, PayloadSlotSet, SensorModelConfig, StepStatus};
    use prost::Message;
    use sensor_model::SensorModel;

    use crate::support::*;

    #[test]
    fn test_no_input_publishes_ground_truth() {
        let mut model = SensorModel::default();
        model.start(0.0);
        assert_eq!(model.do_step(0.0, 1.0, true), StepStatus::Ok);

        let mut valid = [false];
        model
            .value_table()
            .get_booleans(&[vr::BOOLEAN_VALID], &mut valid)
            .unwrap();
        let mut count = [0];
        model
            .value_table()
            .get_integers(&[vr::INTEGER_COUNT], &mut count)
            .unwrap();
        assert!(valid[0]);
        assert_eq!(count[0], 10);

        let record = published(&model);
        assert_eq!(record.ego_vehicle_id, 4);
        let gt = record.ground_truth.unwrap();
        let ego = gt.vehicles.iter().find(|v| v.id == 4).unwrap();
        assert_eq!(ego.base.position.x, 26.0);
        assert!(ego.is_ego);
    }

    #[test]
    fn test_range_and_fov_gating() {
        let input = osi_wire::encode_detection_record(&record(
            0,
            vec![
                vehicle(0, 0.0, 0.0, 0.0),
                vehicle(1, 200.0, 0.0, 0.0),
                vehicle(2, 100.0, 0.0, 0.0),
                vehicle(3, 10.0, 20.0, 0.0),
            ],
        ));

        let mut model = SensorModel::default();
        feed(&mut model, &input);
        assert_eq!(model.do_step(0.0, 0.1, true), StepStatus::Ok);
        assert_eq!(model.value_table().count(), 1);

        let out = published(&model);
        assert_eq!(out.objects.len(), 1);
        let obj = out.objects[0];
        assert_eq!(obj.tracking_id, 0);
        assert_eq!(obj.position.x, 100.0);
        assert!((obj.existence_probability - (25.0f64 / 75.0).cos()).abs() < 1e-12);
        // Inbound scene is carried through
        assert_eq!(out.ground_truth.unwrap().vehicles.len(), 4);
    }

    #[test]
    fn test_probability_at_peak_range() {
        let input = osi_wire::encode_detection_record(&record(
            7,
            vec![vehicle(7, 20.0, 0.0, 0.0), vehicle(8, 95.0, 0.0, 0.0)],
        ));
        let mut model = SensorModel::default();
        feed(&mut model, &input);
        model.do_step(0.0, 0.1, true);

        let out = published(&model);
        assert_eq!(out.objects.len(), 1);
        assert!((out.objects[0].existence_probability - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_previous_payload_survives_next_step() {
        let mut model = SensorModel::default();
        model.do_step(0.0, 1.0, true);
        let first = out_slots(&model);
        let first_bytes = host_read(&first);

        model.do_step(1.0, 1.0, true);
        let second = out_slots(&model);

        assert_ne!(
            (first.address_high, first.address_low),
            (second.address_high, second.address_low)
        );
        // The address handed out one step earlier still reads the same bytes
        assert_eq!(host_read(&first), first_bytes);
        assert_eq!(
            osi_wire::decode_detection_record(&first_bytes)
                .unwrap()
                .timestamp
                .seconds,
            1
        );
    }

    #[test]
    fn test_source_into_sensor_over_time() {
        let mut source = SensorModel::default();
        source
            .value_table_mut()
            .set_booleans(&[vr::BOOLEAN_SOURCE], &[true])
            .unwrap();
        let mut sensor = SensorModel::new(SensorModelConfig {
            fallback: InputFallback::Reset,
            ..Default::default()
        });

        let mut t = 0.0;
        for _ in 0..5 {
            source.do_step(t, 0.5, true);
            let bytes = host_read(&out_slots(&source));
            feed(&mut sensor, &bytes);
            assert_eq!(sensor.do_step(t, 0.5, true), StepStatus::Ok);

            let out = published(&sensor);
            assert_eq!(out.object_count() as i32, sensor.value_table().count());
            let ego_x = 26.0 * (t + 0.5);
            for obj in &out.objects {
                assert!(obj.position.x > ego_x);
                assert!(obj.position.x - ego_x <= 150.0);
            }
            t += 0.5;
        }
    }

    #[test]
    fn test_garbage_input_resets_outputs() {
        let garbage = [0x0a_u8, 0x64, 0x01];
        let mut model = SensorModel::default();
        model.do_step(0.0, 1.0, true);

        feed(&mut model, &garbage);
        assert_eq!(model.do_step(1.0, 1.0, true), StepStatus::Ok);
        assert!(!model.value_table().valid());
        assert_eq!(model.value_table().count(), 0);
        assert_eq!(out_slots(&model), PayloadSlotSet::EMPTY);
    }

    #[test]
    fn test_wire_bytes_match_prost_encoding() {
        let rec = record(0, vec![vehicle(0, 1.0, 2.0, 3.0)]);
        let bytes = osi_wire::encode_detection_record(&rec);
        assert_eq!(
            &bytes[..],
            &osi_wire::SensorData::from(&rec).encode_to_vec()[..]
        );
    }
}

#[cfg(test)]
mod config_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::StepStatus;
    use sensor_model::SensorModel;

    use crate::support::*;

    #[test]
    fn test_loaded_config_drives_the_model() {
        let config = ConfigLoader::load_from_str(
            r#"
fallback = "reset"

[fusion]
max_range = 50.0
"#,
            ConfigFormat::Toml,
        )
        .unwrap();

        let mut model = SensorModel::new(config);
        model.do_step(0.0, 1.0, true);
        assert!(!model.value_table().valid());

        let input = osi_wire::encode_detection_record(&record(
            0,
            vec![vehicle(0, 0.0, 0.0, 0.0), vehicle(1, 100.0, 0.0, 0.0)],
        ));
        feed(&mut model, &input);
        assert_eq!(model.do_step(1.0, 1.0, true), StepStatus::Ok);
        assert!(model.value_table().valid());
        assert_eq!(model.value_table().count(), 0);
    }
}

#[cfg(test)]
mod fmi_tests {
    use std::ffi::CStr;
    use std::ptr;

    use contracts::{vr, StepStatus};
    use osmp_sensor_fmu::types::{FmiCallbackFunctions, FmiComponent, FMI_FALSE, FMI_TRUE};
    use osmp_sensor_fmu::*;

    use crate::support::*;

    unsafe fn instantiate(name: &CStr) -> FmiComponent {
        fmiInstantiateSlave(
            name.as_ptr(),
            c"{8c4e810f-3df3-4a00-8276-176fa3c9f000}".as_ptr(),
            ptr::null(),
            ptr::null(),
            0.0,
            FMI_FALSE,
            FMI_FALSE,
            FmiCallbackFunctions::default(),
            FMI_FALSE,
        )
    }

    unsafe fn get_ints(c: FmiComponent, refs: &[u32]) -> Vec<i32> {
        let mut out = vec![0; refs.len()];
        assert_eq!(
            fmiGetInteger(c, refs.as_ptr(), refs.len(), out.as_mut_ptr()),
            StepStatus::Ok
        );
        out
    }

    #[test]
    fn test_source_to_sensor_through_entry_points() {
        unsafe {
            let source = instantiate(c"source");
            let sensor = instantiate(c"sensor");
            assert!(!source.is_null() && !sensor.is_null());

            let flag = [FMI_TRUE];
            assert_eq!(
                fmiSetBoolean(source, [vr::BOOLEAN_SOURCE].as_ptr(), 1, flag.as_ptr()),
                StepStatus::Ok
            );
            assert_eq!(fmiInitializeSlave(source, 0.0, FMI_FALSE, 0.0), StepStatus::Ok);
            assert_eq!(fmiInitializeSlave(sensor, 0.0, FMI_FALSE, 0.0), StepStatus::Ok);

            assert_eq!(fmiDoStep(source, 0.0, 1.0, FMI_TRUE), StepStatus::Ok);
            let out = get_ints(
                source,
                &[
                    vr::INTEGER_SENSORDATA_OUT_BASELO,
                    vr::INTEGER_SENSORDATA_OUT_BASEHI,
                    vr::INTEGER_SENSORDATA_OUT_SIZE,
                ],
            );
            assert!(out[2] > 0);

            let in_refs = [
                vr::INTEGER_SENSORDATA_IN_BASELO,
                vr::INTEGER_SENSORDATA_IN_BASEHI,
                vr::INTEGER_SENSORDATA_IN_SIZE,
            ];
            assert_eq!(
                fmiSetInteger(sensor, in_refs.as_ptr(), 3, out.as_ptr()),
                StepStatus::Ok
            );
            assert_eq!(fmiDoStep(sensor, 0.0, 1.0, FMI_TRUE), StepStatus::Ok);

            let mut valid = [FMI_FALSE];
            fmiGetBoolean(sensor, [vr::BOOLEAN_VALID].as_ptr(), 1, valid.as_mut_ptr());
            assert_eq!(valid[0], FMI_TRUE);

            let result = get_ints(
                sensor,
                &[
                    vr::INTEGER_SENSORDATA_OUT_BASELO,
                    vr::INTEGER_SENSORDATA_OUT_BASEHI,
                    vr::INTEGER_SENSORDATA_OUT_SIZE,
                    vr::INTEGER_COUNT,
                ],
            );
            let slots = contracts::PayloadSlotSet {
                address_low: result[0],
                address_high: result[1],
                size: result[2],
            };
            let record = osi_wire::decode_detection_record(&host_read(&slots)).unwrap();
            assert_eq!(record.object_count() as i32, result[3]);
            assert!(result[3] > 0);

            assert_eq!(fmiTerminateSlave(source), StepStatus::Ok);
            assert_eq!(fmiTerminateSlave(sensor), StepStatus::Ok);
            fmiFreeSlaveInstance(source);
            fmiFreeSlaveInstance(sensor);
        }
    }

    #[test]
    fn test_reset_zeroes_slots() {
        unsafe {
            let c = instantiate(c"resettable");
            fmiDoStep(c, 0.0, 1.0, FMI_TRUE);
            assert_eq!(get_ints(c, &[vr::INTEGER_COUNT]), vec![10]);

            assert_eq!(fmiResetSlave(c), StepStatus::Ok);
            assert_eq!(
                get_ints(c, &[vr::INTEGER_SENSORDATA_OUT_SIZE, vr::INTEGER_COUNT]),
                vec![0, 0]
            );
            fmiFreeSlaveInstance(c);
        }
    }

    #[test]
    fn test_bad_reference_rejected_without_side_effects() {
        unsafe {
            let c = instantiate(c"strict");
            let refs = [vr::BOOLEAN_VALID, 2];
            let values = [FMI_TRUE, FMI_TRUE];
            assert_eq!(
                fmiSetBoolean(c, refs.as_ptr(), 2, values.as_ptr()),
                StepStatus::Error
            );

            let mut valid = [FMI_TRUE];
            fmiGetBoolean(c, [vr::BOOLEAN_VALID].as_ptr(), 1, valid.as_mut_ptr());
            assert_eq!(valid[0], FMI_FALSE);
            fmiFreeSlaveInstance(c);
        }
    }
}

#[cfg(test)]
mod property_tests {
    use contracts::Vector3d;
    use proptest::prelude::*;
    use sensor_model::FusionEngine;

    use crate::support::*;

    proptest! {
        #[test]
        fn prop_detections_respect_range_and_cone(
            xs in proptest::collection::vec((-300.0f64..300.0, -300.0f64..300.0), 0..20)
        ) {
            let vehicles = std::iter::once(vehicle(0, 0.0, 0.0, 0.0))
                .chain(xs.iter().enumerate().map(|(i, &(x, y))| vehicle(i as u64 + 1, x, y, 0.0)))
                .collect();
            let scene = record(0, vehicles).into_scene();
            let out = FusionEngine::default().fuse(&scene, 0.0);

            for (i, obj) in out.objects.iter().enumerate() {
                prop_assert_eq!(obj.tracking_id, i as u64);
                let Vector3d { x, y, z } = obj.position;
                let d = (x * x + y * y + z * z).sqrt();
                prop_assert!(d <= 150.0);
                prop_assert!(x / d > 0.866025);
            }
        }
    }
}
