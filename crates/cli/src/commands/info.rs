//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{vr, SensorModelConfig, ValueKind};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::commands::run::load_config;

/// One published value reference
#[derive(Debug, Clone, Serialize)]
struct VariableInfo {
    name: &'static str,
    kind: ValueKind,
    value_reference: u32,
    causality: &'static str,
}

/// Model info for JSON output
#[derive(Serialize)]
struct ModelInfo {
    fmi_version: &'static str,
    variables: Vec<VariableInfo>,
    config: SensorModelConfig,
}

const fn var(
    name: &'static str,
    kind: ValueKind,
    value_reference: u32,
    causality: &'static str,
) -> VariableInfo {
    VariableInfo {
        name,
        kind,
        value_reference,
        causality,
    }
}

fn variables() -> Vec<VariableInfo> {
    vec![
        var("source", ValueKind::Boolean, vr::BOOLEAN_SOURCE, "parameter"),
        var("valid", ValueKind::Boolean, vr::BOOLEAN_VALID, "output"),
        var(
            "OSMPSensorDataIn.base.lo",
            ValueKind::Integer,
            vr::INTEGER_SENSORDATA_IN_BASELO,
            "input",
        ),
        var(
            "OSMPSensorDataIn.base.hi",
            ValueKind::Integer,
            vr::INTEGER_SENSORDATA_IN_BASEHI,
            "input",
        ),
        var(
            "OSMPSensorDataIn.size",
            ValueKind::Integer,
            vr::INTEGER_SENSORDATA_IN_SIZE,
            "input",
        ),
        var(
            "OSMPSensorDataOut.base.lo",
            ValueKind::Integer,
            vr::INTEGER_SENSORDATA_OUT_BASELO,
            "output",
        ),
        var(
            "OSMPSensorDataOut.base.hi",
            ValueKind::Integer,
            vr::INTEGER_SENSORDATA_OUT_BASEHI,
            "output",
        ),
        var(
            "OSMPSensorDataOut.size",
            ValueKind::Integer,
            vr::INTEGER_SENSORDATA_OUT_SIZE,
            "output",
        ),
        var("count", ValueKind::Integer, vr::INTEGER_COUNT, "output"),
    ]
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    info!("Collecting model info");

    let model_info = ModelInfo {
        fmi_version: "1.0",
        variables: variables(),
        config,
    };

    if args.json {
        let json = serde_json::to_string_pretty(&model_info)
            .context("Failed to serialize model info")?;
        println!("{}", json);
    } else {
        print_model_info(&model_info)?;
    }

    Ok(())
}

fn print_model_info(model_info: &ModelInfo) -> Result<()> {
    println!("\n=== OSMP Dummy Sensor (FMI {}) ===\n", model_info.fmi_version);
    println!("Variables:");
    for v in &model_info.variables {
        println!(
            "  {:<8} vr={:<2} {:<7} {}",
            v.kind.to_string(),
            v.value_reference,
            v.causality,
            v.name
        );
    }

    println!("\nEffective configuration:");
    let toml = config_loader::ConfigLoader::to_toml(&model_info.config)
        .context("Failed to render configuration")?;
    for line in toml.lines() {
        println!("  {}", line);
    }
    println!();
    Ok(())
}
