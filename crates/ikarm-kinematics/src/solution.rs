//! IK 解

/// IK 求解结果
///
/// 与运动链一一对应的有序角度序列：第 0 个元素是基座帧（不对应任何电机），
/// 其后依次为各驱动关节的目标角度（弧度）。
#[derive(Debug, Clone, PartialEq)]
pub struct JointSolution {
    values: Vec<f64>,
}

impl JointSolution {
    /// 从完整序列构建（第 0 个元素为基座帧）
    ///
    /// 空序列视为只有基座帧 `0.0`。
    pub fn from_chain(values: Vec<f64>) -> Self {
        if values.is_empty() {
            return Self { values: vec![0.0] };
        }
        Self { values }
    }

    /// 由基座帧值和关节角构建
    pub fn with_base(base: f64, joints: impl IntoIterator<Item = f64>) -> Self {
        let mut values = vec![base];
        values.extend(joints);
        Self { values }
    }

    /// 基座帧值
    pub fn base(&self) -> f64 {
        self.values[0]
    }

    /// 驱动关节角度（跳过第 0 个元素）
    pub fn actuated(&self) -> &[f64] {
        &self.values[1..]
    }

    /// 完整序列（含基座帧）
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// 驱动关节数
    pub fn joint_count(&self) -> usize {
        self.values.len() - 1
    }
}
