//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{InputFallback, SensorModelConfig};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    max_range: f64,
    fov_half_angle_deg: f64,
    vehicle_count: usize,
    ego_index: usize,
    fallback: InputFallback,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    max_range: config.fusion.max_range,
                    fov_half_angle_deg: config.fusion.min_forward_cosine.acos().to_degrees(),
                    vehicle_count: config.scenario.lanes.len(),
                    ego_index: config.scenario.ego_index,
                    fallback: config.fallback,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Non-fatal issues
fn collect_warnings(config: &SensorModelConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let fusion = &config.fusion;

    if fusion.min_forward_cosine <= 0.0 {
        warnings.push(format!(
            "min_forward_cosine {} admits vehicles at or behind the lateral axis",
            fusion.min_forward_cosine
        ));
    }

    // cos() of the probability model is negative further than width * pi/2 from the peak
    let half_span = fusion.probability_width * std::f64::consts::FRAC_PI_2;
    let negative_below = fusion.probability_peak_range - half_span;
    let negative_above = fusion.probability_peak_range + half_span;
    if negative_below > 0.0 {
        warnings.push(format!(
            "existence probability is negative below {:.1} m",
            negative_below.min(fusion.max_range)
        ));
    }
    if negative_above < fusion.max_range {
        warnings.push(format!(
            "existence probability turns negative beyond {:.1} m (max_range {:.1} m)",
            negative_above, fusion.max_range
        ));
    }

    if config.scenario.lanes.len() == 1 {
        warnings.push("scenario has only the ego vehicle - nothing can be detected".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Max range: {} m", summary.max_range);
            println!("  FOV half-angle: {:.1}°", summary.fov_half_angle_deg);
            println!(
                "  Scenario vehicles: {} (ego {})",
                summary.vehicle_count, summary.ego_index
            );
            println!("  No-input fallback: {:?}", summary.fallback);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
