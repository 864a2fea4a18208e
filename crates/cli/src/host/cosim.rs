//! Source -> sensor chain driven through the slot protocol.
//!
//! The harness only touches the models the way a co-simulation master does:
//! batch get/set on value references, and reading `size` bytes at the address
//! an instance published.

use contracts::{vr, DetectedObject, DetectionRecord, PayloadSlotSet, SensorModelConfig, StepStatus};
use sensor_model::{Address, SensorModel};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{CliError, Result};

const SOURCE: &str = "source";
const SENSOR: &str = "sensor";

const OUT_REFS: [u32; 3] = [
    vr::INTEGER_SENSORDATA_OUT_BASELO,
    vr::INTEGER_SENSORDATA_OUT_BASEHI,
    vr::INTEGER_SENSORDATA_OUT_SIZE,
];
const IN_REFS: [u32; 3] = [
    vr::INTEGER_SENSORDATA_IN_BASELO,
    vr::INTEGER_SENSORDATA_IN_BASEHI,
    vr::INTEGER_SENSORDATA_IN_SIZE,
];

/// What the sensor instance reported for one communication step
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// End-of-step time
    pub time: f64,
    pub mode: Option<String>,
    pub valid: bool,
    pub count: i32,
    pub payload_bytes: usize,
    pub objects: Vec<DetectedObject>,
}

/// Two model instances wired output-to-input
pub struct CoSimulation {
    source: SensorModel,
    sensor: SensorModel,
    time: f64,
    step_size: f64,
}

impl CoSimulation {
    pub fn new(config: SensorModelConfig, start_time: f64, step_size: f64) -> Result<Self> {
        let mut source = SensorModel::new(config.clone());
        source
            .value_table_mut()
            .set_booleans(&[vr::BOOLEAN_SOURCE], &[true])?;
        let mut sensor = SensorModel::new(config);

        source.start(start_time);
        sensor.start(start_time);

        info!(start_time, step_size, "co-simulation initialized");
        Ok(Self {
            source,
            sensor,
            time: start_time,
            step_size,
        })
    }

    /// Current communication point
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Step the source, forward its payload, step the sensor, read the result
    pub fn step(&mut self) -> Result<StepReport> {
        let (current, step) = (self.time, self.step_size);
        let end = current + step;

        check(SOURCE, end, self.source.do_step(current, step, true))?;
        let forwarded = read_out_slots(&self.source)?;
        debug!(
            size = forwarded.size,
            addr_hi = forwarded.address_high,
            addr_lo = forwarded.address_low,
            "forwarding source payload"
        );
        write_in_slots(&mut self.sensor, &forwarded)?;

        check(SENSOR, end, self.sensor.do_step(current, step, true))?;

        let table = self.sensor.value_table();
        let mut valid = [false];
        table.get_booleans(&[vr::BOOLEAN_VALID], &mut valid)?;
        let mut count = [0];
        table.get_integers(&[vr::INTEGER_COUNT], &mut count)?;
        let published = read_out_slots(&self.sensor)?;

        let objects = if valid[0] && published.is_present() {
            let bytes = read_payload(SENSOR, &published)?;
            osi_wire::decode_detection_record(&bytes)?.objects
        } else {
            Vec::new()
        };

        self.time = end;
        Ok(StepReport {
            time: end,
            mode: self.sensor.last_mode().map(|m| m.to_string()),
            valid: valid[0],
            count: count[0],
            payload_bytes: published.size.max(0) as usize,
            objects,
        })
    }

    /// Latest record published by the source instance
    pub fn source_record(&self) -> Result<Option<DetectionRecord>> {
        let slots = read_out_slots(&self.source)?;
        if !slots.is_present() {
            return Ok(None);
        }
        let bytes = read_payload(SOURCE, &slots)?;
        Ok(Some(osi_wire::decode_detection_record(&bytes)?))
    }

    pub fn terminate(&mut self) -> Result<()> {
        check(SOURCE, self.time, self.source.terminate())?;
        check(SENSOR, self.time, self.sensor.terminate())?;
        Ok(())
    }
}

fn check(instance: &'static str, time: f64, status: StepStatus) -> Result<()> {
    if status.is_ok() {
        Ok(())
    } else {
        Err(CliError::StepFailed {
            instance,
            time,
            status,
        })
    }
}

fn read_out_slots(model: &SensorModel) -> Result<PayloadSlotSet> {
    let mut values = [0; 3];
    model.value_table().get_integers(&OUT_REFS, &mut values)?;
    Ok(PayloadSlotSet {
        address_low: values[0],
        address_high: values[1],
        size: values[2],
    })
}

fn write_in_slots(model: &mut SensorModel, slots: &PayloadSlotSet) -> Result<()> {
    model.value_table_mut().set_integers(
        &IN_REFS,
        &[slots.address_low, slots.address_high, slots.size],
    )?;
    Ok(())
}

/// Copy `size` bytes from the published address
fn read_payload(instance: &'static str, slots: &PayloadSlotSet) -> Result<Vec<u8>> {
    let address = Address::decode(slots.address_high, slots.address_low);
    if address.is_null() || slots.size < 0 {
        return Err(CliError::payload(
            instance,
            format!("address {address} with size {}", slots.size),
        ));
    }
    // SAFETY: the instance keeps the published buffer alive and unmodified
    // until its next step, and nothing steps it while this borrow exists.
    let bytes = unsafe { std::slice::from_raw_parts(address.as_ptr(), slots.size as usize) };
    Ok(bytes.to_vec())
}
