//! 配置校验模块
//!
//! 校验规则：
//! - max_range > 0
//! - min_forward_cosine 位于 [-1, 1]
//! - probability_width > 0
//! - 至少一条车道，ego_index 在车道表范围内
//! - 每条车道 x_speed != 0，车辆尺寸 > 0

use contracts::{ContractError, FusionConfig, ScenarioConfig, SensorModelConfig};

/// 校验 SensorModelConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &SensorModelConfig) -> Result<(), ContractError> {
    validate_fusion(&config.fusion)?;
    validate_scenario(&config.scenario)?;
    Ok(())
}

/// 校验融合参数
fn validate_fusion(fusion: &FusionConfig) -> Result<(), ContractError> {
    if !(fusion.max_range > 0.0) {
        return Err(ContractError::config_validation(
            "fusion.max_range",
            format!("max_range must be > 0, got {}", fusion.max_range),
        ));
    }

    if !(-1.0..=1.0).contains(&fusion.min_forward_cosine) {
        return Err(ContractError::config_validation(
            "fusion.min_forward_cosine",
            format!(
                "min_forward_cosine must be within [-1, 1], got {}",
                fusion.min_forward_cosine
            ),
        ));
    }

    if !(fusion.probability_width > 0.0) {
        return Err(ContractError::config_validation(
            "fusion.probability_width",
            format!(
                "probability_width must be > 0, got {}",
                fusion.probability_width
            ),
        ));
    }

    Ok(())
}

/// 校验场景车道表
fn validate_scenario(scenario: &ScenarioConfig) -> Result<(), ContractError> {
    if scenario.lanes.is_empty() {
        return Err(ContractError::config_validation(
            "scenario.lanes",
            "at least one lane is required",
        ));
    }

    if scenario.ego_index >= scenario.lanes.len() {
        return Err(ContractError::config_validation(
            "scenario.ego_index",
            format!(
                "ego_index {} out of range for {} lanes",
                scenario.ego_index,
                scenario.lanes.len()
            ),
        ));
    }

    // x_speed 作为横摆相位的除数
    if let Some(idx) = scenario.lanes.iter().position(|lane| lane.x_speed == 0.0) {
        return Err(ContractError::config_validation(
            format!("scenario.lanes[{idx}].x_speed"),
            "x_speed must be non-zero",
        ));
    }

    let dim = &scenario.dimension;
    for (name, value) in [
        ("length", dim.length),
        ("width", dim.width),
        ("height", dim.height),
    ] {
        if !(value > 0.0) {
            return Err(ContractError::config_validation(
                format!("scenario.dimension.{name}"),
                format!("{name} must be > 0, got {value}"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::ScenarioLane;

    fn field_of(err: ContractError) -> String {
        match err {
            ContractError::ConfigValidation { field, .. } => field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&SensorModelConfig::default()).is_ok());
    }

    #[test]
    fn test_non_positive_range() {
        let mut config = SensorModelConfig::default();
        config.fusion.max_range = 0.0;
        assert_eq!(field_of(validate(&config).unwrap_err()), "fusion.max_range");
    }

    #[test]
    fn test_nan_range_rejected() {
        let mut config = SensorModelConfig::default();
        config.fusion.max_range = f64::NAN;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_cosine_bounds() {
        let mut config = SensorModelConfig::default();
        config.fusion.min_forward_cosine = 1.5;
        assert_eq!(
            field_of(validate(&config).unwrap_err()),
            "fusion.min_forward_cosine"
        );

        config.fusion.min_forward_cosine = -1.0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_width() {
        let mut config = SensorModelConfig::default();
        config.fusion.probability_width = 0.0;
        assert_eq!(
            field_of(validate(&config).unwrap_err()),
            "fusion.probability_width"
        );
    }

    #[test]
    fn test_empty_lanes() {
        let mut config = SensorModelConfig::default();
        config.scenario.lanes.clear();
        config.scenario.ego_index = 0;
        assert_eq!(field_of(validate(&config).unwrap_err()), "scenario.lanes");
    }

    #[test]
    fn test_ego_index_out_of_range() {
        let mut config = SensorModelConfig::default();
        config.scenario.ego_index = 10;
        assert_eq!(field_of(validate(&config).unwrap_err()), "scenario.ego_index");
    }

    #[test]
    fn test_zero_speed_lane() {
        let mut config = SensorModelConfig::default();
        config.scenario.lanes[3] = ScenarioLane {
            x_offset: 0.0,
            y_offset: 0.0,
            x_speed: 0.0,
        };
        assert_eq!(
            field_of(validate(&config).unwrap_err()),
            "scenario.lanes[3].x_speed"
        );
    }

    #[test]
    fn test_negative_dimension() {
        let mut config = SensorModelConfig::default();
        config.scenario.dimension.width = -2.0;
        assert_eq!(
            field_of(validate(&config).unwrap_err()),
            "scenario.dimension.width"
        );
    }

    #[test]
    fn test_first_error_wins() {
        let mut config = SensorModelConfig::default();
        config.fusion.max_range = -1.0;
        config.scenario.lanes.clear();
        assert_eq!(field_of(validate(&config).unwrap_err()), "fusion.max_range");
    }
}
