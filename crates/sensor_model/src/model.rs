//! Step glue and instance lifecycle.

use contracts::{
    ContractError, DetectionRecord, InputFallback, PayloadSlotSet, SensorModelConfig, StepStatus,
};
use observability::metrics::{self, StepMode};
use osi_wire::SensorData;
use tracing::{debug, error, info, warn};

use crate::address::Address;
use crate::fusion::FusionEngine;
use crate::payload_store::PublishedPayloadStore;
use crate::synthesizer::ScenarioSynthesizer;
use crate::value_table::ValueTable;

/// One sensor model instance
///
/// Not thread-safe; the host drives each instance from a single thread.
#[derive(Debug)]
pub struct SensorModel {
    table: ValueTable,
    store: PublishedPayloadStore,
    synthesizer: ScenarioSynthesizer,
    fusion: FusionEngine,
    fallback: InputFallback,
    start_time: f64,
    last_time: Option<f64>,
    last_mode: Option<StepMode>,
}

impl Default for SensorModel {
    fn default() -> Self {
        Self::new(SensorModelConfig::default())
    }
}

impl SensorModel {
    /// Construct and initialise
    pub fn new(config: SensorModelConfig) -> Self {
        let mut model = Self {
            table: ValueTable::new(),
            store: PublishedPayloadStore::new(),
            synthesizer: ScenarioSynthesizer::new(config.scenario),
            fusion: FusionEngine::new(config.fusion),
            fallback: config.fallback,
            start_time: 0.0,
            last_time: None,
            last_mode: None,
        };
        model.init();
        model
    }

    /// Zero every slot
    pub fn init(&mut self) {
        self.table.reset();
        self.last_time = None;
        self.last_mode = None;
    }

    pub fn start(&mut self, start_time: f64) {
        debug!(start_time, "start");
        self.start_time = start_time;
    }

    /// Advance to `current_time + step_size` and publish the result
    pub fn do_step(&mut self, current_time: f64, step_size: f64, new_step: bool) -> StepStatus {
        let time = current_time + step_size;
        debug!(current_time, step_size, new_step, time, "do_step");

        match self.step(time) {
            Ok(mode) => {
                self.last_time = Some(time);
                self.last_mode = Some(mode);
                metrics::record_step(mode);
                StepStatus::Ok
            }
            Err(e) => {
                error!(error = %e, time, "step failed");
                self.reset_outputs();
                StepStatus::Error
            }
        }
    }

    pub fn terminate(&mut self) -> StepStatus {
        info!(last_time = ?self.last_time, "terminate");
        StepStatus::Ok
    }

    /// Back to the freshly instantiated state, dropping retained payloads
    pub fn reset(&mut self) -> StepStatus {
        self.init();
        self.store.release();
        StepStatus::Ok
    }

    pub fn value_table(&self) -> &ValueTable {
        &self.table
    }

    pub fn value_table_mut(&mut self) -> &mut ValueTable {
        &mut self.table
    }

    pub fn payload_store(&self) -> &PublishedPayloadStore {
        &self.store
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// End time of the last successful step
    pub fn last_time(&self) -> Option<f64> {
        self.last_time
    }

    pub fn last_mode(&self) -> Option<StepMode> {
        self.last_mode
    }

    fn step(&mut self, time: f64) -> Result<StepMode, ContractError> {
        if self.table.source() {
            return self.publish_ground_truth(time);
        }

        let inbound = self.table.payload_in();
        if inbound.size > 0 {
            return match self.read_inbound(&inbound) {
                Ok(record) => self.publish_detections(record, time),
                Err(e) => {
                    warn!(error = %e, size = inbound.size, "dropping inbound payload");
                    metrics::record_decode_failure();
                    self.reset_outputs();
                    Ok(StepMode::Reset)
                }
            };
        }

        match self.fallback {
            InputFallback::Synthesize => self.publish_ground_truth(time),
            InputFallback::Reset => {
                debug!("no inbound payload, resetting outputs");
                self.reset_outputs();
                Ok(StepMode::Reset)
            }
        }
    }

    fn read_inbound(&self, slots: &PayloadSlotSet) -> Result<DetectionRecord, ContractError> {
        let address = Address::decode(slots.address_high, slots.address_low);
        let size = slots.size as usize;
        debug!(
            addr_hi = format_args!("{:08X}", slots.address_high),
            addr_lo = format_args!("{:08X}", slots.address_low),
            %address,
            size,
            "using inbound payload"
        );

        if address.is_null() {
            return Err(ContractError::payload_decode(size, "null inbound address"));
        }

        // SAFETY: the host guarantees `size` readable bytes at the address it
        // wrote into the inbound slots for the duration of this step.
        let bytes = unsafe { std::slice::from_raw_parts(address.as_ptr(), size) };
        osi_wire::decode_detection_record(bytes)
    }

    fn publish_ground_truth(&mut self, time: f64) -> Result<StepMode, ContractError> {
        let scene = self.synthesizer.synthesize(time);
        let count = scene.vehicle_count();
        let record = DetectionRecord::from(scene);

        self.publish(&record)?;
        self.table.set_count(count as i32);
        Ok(StepMode::Source)
    }

    fn publish_detections(
        &mut self,
        record: DetectionRecord,
        time: f64,
    ) -> Result<StepMode, ContractError> {
        let detections = self.fusion.fuse(&record.into_scene(), time);
        let count = detections.object_count();

        self.publish(&detections)?;
        self.table.set_count(count as i32);
        metrics::record_detections(count);
        Ok(StepMode::Fuse)
    }

    fn publish(&mut self, record: &DetectionRecord) -> Result<(), ContractError> {
        let slots = self.store.publish(&SensorData::from(record))?;
        metrics::record_payload_bytes(slots.size as usize);
        self.table.set_payload_out(slots);
        self.table.set_valid(true);
        Ok(())
    }

    fn reset_outputs(&mut self) {
        let slots = self.store.reset();
        self.table.set_payload_out(slots);
        self.table.set_valid(false);
        self.table.set_count(0);
    }
}
