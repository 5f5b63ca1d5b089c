//! 设备与场景节点类型定义

use num_enum::FromPrimitive;

/// 设备句柄（设备列表中的索引）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub usize);

/// 场景节点句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// 仿真器节点类型码
///
/// 只有旋转电机需要在控制器中识别，其余类型码原样保留。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u16)]
pub enum NodeType {
    /// 旋转电机（类型码 54）
    RotationalMotor = 54,
    /// 其他设备类型
    #[num_enum(catch_all)]
    Other(u16),
}

impl NodeType {
    /// 仿真器原始类型码
    pub fn code(self) -> u16 {
        match self {
            NodeType::RotationalMotor => 54,
            NodeType::Other(code) => code,
        }
    }
}

/// 设备信息
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    pub id: DeviceId,
    pub name: String,
    pub node_type: NodeType,
}

/// 仿真步进结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// 仿真继续
    Continue,
    /// 仿真已终止（终止哨兵）
    Terminated,
}

impl StepOutcome {
    pub fn is_terminated(self) -> bool {
        self == StepOutcome::Terminated
    }
}

/// 待生成节点描述（带 DEF 名称的球体标记）
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    /// DEF 名称（用于 `node_by_def` 查找）
    pub def_name: String,
    /// 世界坐标位置（米）
    pub translation: [f64; 3],
    /// 轴角表示的姿态 `[x, y, z, angle]`
    pub rotation: [f64; 4],
    /// 球体半径（米）
    pub radius: f64,
    /// RGB 颜色（0..1）
    pub color: [f64; 3],
    /// 透明度（0 不透明，1 完全透明）
    pub transparency: f64,
}

impl NodeSpec {
    /// 创建默认外观的球体节点
    pub fn sphere(def_name: impl Into<String>, translation: [f64; 3], radius: f64) -> Self {
        Self {
            def_name: def_name.into(),
            translation,
            rotation: [0.0, 0.0, 1.0, 0.0],
            radius,
            color: [1.0, 0.0, 0.0],
            transparency: 0.0,
        }
    }

    pub fn with_color(mut self, color: [f64; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn with_transparency(mut self, transparency: f64) -> Self {
        self.transparency = transparency;
        self
    }

    /// 渲染为场景描述字符串（可直接导入场景树）
    pub fn to_vrml(&self) -> String {
        let [x, y, z] = self.translation;
        let [ax, ay, az, angle] = self.rotation;
        let [r, g, b] = self.color;
        format!(
            "DEF {} Solid {{ translation {x} {y} {z} rotation {ax} {ay} {az} {angle} \
             children [ Shape {{ appearance PBRAppearance {{ baseColor {r} {g} {b} \
             transparency {} }} geometry Sphere {{ radius {} }} }} ] }}",
            self.def_name, self.transparency, self.radius
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_from_code() {
        assert_eq!(NodeType::from(54u16), NodeType::RotationalMotor);
        assert_eq!(NodeType::from(49u16), NodeType::Other(49));
        assert_eq!(NodeType::from(54u16).code(), 54);
        assert_eq!(NodeType::Other(7).code(), 7);
    }

    #[test]
    fn test_step_outcome() {
        assert!(StepOutcome::Terminated.is_terminated());
        assert!(!StepOutcome::Continue.is_terminated());
    }

    #[test]
    fn test_sphere_vrml() {
        let spec = NodeSpec::sphere("TARGET", [0.1, 0.2, 0.3], 0.05)
            .with_color([1.0, 0.0, 0.0])
            .with_transparency(0.5);
        let vrml = spec.to_vrml();
        assert!(vrml.starts_with("DEF TARGET Solid"));
        assert!(vrml.contains("translation 0.1 0.2 0.3"));
        assert!(vrml.contains("radius 0.05"));
        assert!(vrml.contains("transparency 0.5"));
    }
}
