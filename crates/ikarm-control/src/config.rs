//! 控制器配置

use crate::error::ControlError;
use serde::{Deserialize, Serialize};

/// 旋转电机节点类型码
pub const ROTATIONAL_MOTOR_TYPE: u16 = 54;

/// 控制器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// 每隔多少个基础仿真步长计算一次 IK
    ///
    /// 目标不动时不会重新求解，此值只在目标持续移动时影响计算量。
    pub ik_step_size: u32,

    /// 目标节点 DEF 名称
    pub target_def: String,

    /// 电机节点类型码
    pub motor_node_type: u16,

    /// 位姿变化阈值
    ///
    /// `0.0` 表示精确比较（任何变化都触发求解）；
    /// 大于 0 时，只有某个分量的变化超过该值才触发求解。
    pub change_tolerance: f64,

    /// 求解器最低版本（如 `"0.32"`）
    pub min_solver_version: String,

    /// 目标缺失时生成的替代标记
    pub spawn: SpawnConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            ik_step_size: 10,
            target_def: "TARGET".to_string(),
            motor_node_type: ROTATIONAL_MOTOR_TYPE,
            change_tolerance: 0.0,
            min_solver_version: "0.32".to_string(),
            spawn: SpawnConfig::default(),
        }
    }
}

impl ControllerConfig {
    /// 校验配置
    pub fn validate(&self) -> Result<(), ControlError> {
        if self.ik_step_size == 0 {
            return Err(ControlError::InvalidConfig(
                "ik_step_size must be > 0".to_string(),
            ));
        }
        if self.target_def.trim().is_empty() {
            return Err(ControlError::InvalidConfig(
                "target_def must not be empty".to_string(),
            ));
        }
        if !self.change_tolerance.is_finite() || self.change_tolerance < 0.0 {
            return Err(ControlError::InvalidConfig(format!(
                "change_tolerance must be finite and >= 0, got {}",
                self.change_tolerance
            )));
        }
        self.spawn.validate()
    }
}

/// 替代目标标记配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// 相对机械臂基座的位置（米，基座坐标系）
    pub offset: [f64; 3],

    /// 球体半径（米）
    pub radius: f64,

    /// RGB 颜色
    pub color: [f64; 3],

    /// 透明度
    pub transparency: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            offset: [0.3, 0.0, 0.4],
            radius: 0.05,
            color: [1.0, 0.0, 0.0],
            transparency: 0.5,
        }
    }
}

impl SpawnConfig {
    fn validate(&self) -> Result<(), ControlError> {
        if !self.offset.iter().all(|v| v.is_finite()) {
            return Err(ControlError::InvalidConfig(format!(
                "spawn.offset must be finite, got {:?}",
                self.offset
            )));
        }
        if !(self.radius > 0.0) {
            return Err(ControlError::InvalidConfig(format!(
                "spawn.radius must be > 0, got {}",
                self.radius
            )));
        }
        if !(0.0..=1.0).contains(&self.transparency) {
            return Err(ControlError::InvalidConfig(format!(
                "spawn.transparency must be within [0, 1], got {}",
                self.transparency
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ControllerConfig::default();
        assert_eq!(config.ik_step_size, 10);
        assert_eq!(config.target_def, "TARGET");
        assert_eq!(config.motor_node_type, 54);
        assert_eq!(config.change_tolerance, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ControllerConfig {
            ik_step_size: 0,
            ..ControllerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ControlError::InvalidConfig(_))));

        let config = ControllerConfig {
            target_def: "  ".to_string(),
            ..ControllerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ControllerConfig {
            change_tolerance: -1.0,
            ..ControllerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ControllerConfig {
            change_tolerance: f64::NAN,
            ..ControllerConfig::default()
        };
        assert!(config.validate().is_err());

        let mut config = ControllerConfig::default();
        config.spawn.radius = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config: ControllerConfig = toml::from_str(
            r#"
            ik_step_size = 4
            change_tolerance = 1e-6

            [spawn]
            radius = 0.1
            "#,
        )
        .unwrap();
        assert_eq!(config.ik_step_size, 4);
        assert_eq!(config.change_tolerance, 1e-6);
        assert_eq!(config.spawn.radius, 0.1);
        assert_eq!(config.spawn.offset, [0.3, 0.0, 0.4]);
        assert_eq!(config.target_def, "TARGET");
    }
}
