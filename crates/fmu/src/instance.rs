//! Per-instance state behind an `fmiComponent` handle.

use std::ffi::{c_char, CString};
use std::path::{Path, PathBuf};

use config_loader::ConfigLoader;
use contracts::{ContractError, SensorModelConfig, StepStatus};
use observability::ObservabilityConfig;
use sensor_model::SensorModel;
use tracing::{debug, info};

/// Configuration file looked up under `<fmuLocation>/resources/`
pub const CONFIG_FILE_NAME: &str = "osmp_sensor.toml";

/// Arguments of `fmiInstantiateSlave` that the instance keeps
#[derive(Debug, Clone, Default)]
pub struct InstantiateArgs {
    pub instance_name: String,
    pub guid: String,
    pub location: String,
    pub mime_type: String,
    pub timeout: f64,
    pub visible: bool,
    pub interactive: bool,
    pub logging_on: bool,
}

/// One live FMU slave
#[derive(Debug)]
pub struct FmuInstance {
    args: InstantiateArgs,
    logging_on: bool,
    model: SensorModel,
    /// Backing storage for pointers handed out by `fmiGetString`
    string_cache: Vec<CString>,
}

impl FmuInstance {
    /// Load configuration, set up logging and construct the model
    ///
    /// # Errors
    /// A configuration file that exists but fails to parse or validate.
    pub fn instantiate(args: InstantiateArgs) -> Result<Self, ContractError> {
        let config = match config_path(&args.location) {
            Some(path) => ConfigLoader::load_optional(&path)?.unwrap_or_default(),
            None => SensorModelConfig::default(),
        };

        // Already installed by an earlier instance or by the host process
        let _ = observability::init_with_config(ObservabilityConfig::from(&config.logging));

        info!(
            target: "fmi",
            instance = %args.instance_name,
            guid = %args.guid,
            location = %args.location,
            mime_type = %args.mime_type,
            timeout = args.timeout,
            visible = args.visible,
            interactive = args.interactive,
            logging_on = args.logging_on,
            "fmiInstantiateSlave"
        );

        Ok(Self {
            logging_on: args.logging_on,
            args,
            model: SensorModel::new(config),
            string_cache: Vec::new(),
        })
    }

    pub fn instance_name(&self) -> &str {
        &self.args.instance_name
    }

    pub fn args(&self) -> &InstantiateArgs {
        &self.args
    }

    pub fn logging_on(&self) -> bool {
        self.logging_on
    }

    pub fn model(&self) -> &SensorModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut SensorModel {
        &mut self.model
    }

    /// Entry-point trace, emitted only while debug logging is on
    pub fn log_call(&self, call: &str) {
        if self.logging_on {
            debug!(target: "fmi", instance = %self.args.instance_name, "{call}");
        }
    }

    pub fn set_debug_logging(&mut self, on: bool) -> StepStatus {
        self.logging_on = on;
        StepStatus::Ok
    }

    pub fn initialize(&mut self, start_time: f64, stop_time: Option<f64>) -> StepStatus {
        debug!(target: "fmi", start_time, ?stop_time, "initialize");
        self.model.start(start_time);
        StepStatus::Ok
    }

    pub fn do_step(&mut self, current: f64, step: f64, new_step: bool) -> StepStatus {
        self.model.do_step(current, step, new_step)
    }

    pub fn terminate(&mut self) -> StepStatus {
        self.model.terminate()
    }

    pub fn reset(&mut self) -> StepStatus {
        self.string_cache.clear();
        self.model.reset()
    }

    /// String slots as C pointers valid until the next call on this instance
    pub fn get_strings(&mut self, refs: &[u32]) -> Result<Vec<*const c_char>, ContractError> {
        let values = self.model.value_table().get_strings(refs)?;
        self.string_cache = values
            .into_iter()
            .map(|s| CString::new(s).map_err(|e| ContractError::ffi(e.to_string())))
            .collect::<Result<_, _>>()?;
        Ok(self.string_cache.iter().map(|s| s.as_ptr()).collect())
    }
}

/// `<location>/resources/osmp_sensor.toml`, if the location is a usable path
pub fn config_path(location: &str) -> Option<PathBuf> {
    let trimmed = location
        .strip_prefix("file://")
        .or_else(|| location.strip_prefix("file:"))
        .unwrap_or(location);
    if trimmed.is_empty() {
        return None;
    }
    Some(Path::new(trimmed).join("resources").join(CONFIG_FILE_NAME))
}
