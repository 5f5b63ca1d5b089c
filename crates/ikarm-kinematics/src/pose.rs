//! 位姿类型
//!
//! 位置为 `Vector3<f64>`（米），姿态为 3x3 旋转矩阵 `Matrix3<f64>`，
//! 与仿真器导出的行优先 9 元素数组互相转换。

use nalgebra::{Matrix3, Vector3};

/// 刚体位姿（位置 + 旋转矩阵）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// 位置（米）
    pub position: Vector3<f64>,
    /// 旋转矩阵
    pub rotation: Matrix3<f64>,
}

/// 目标标记相对机械臂基座的位姿，控制循环的输入
pub type TargetPose = Pose;

impl Pose {
    pub fn new(position: Vector3<f64>, rotation: Matrix3<f64>) -> Self {
        Self { position, rotation }
    }

    /// 原点 + 单位旋转
    pub fn identity() -> Self {
        Self::new(Vector3::zeros(), Matrix3::identity())
    }

    /// 全零位姿（旋转矩阵也为零）
    ///
    /// 不是合法旋转，用作"尚未观测"的初值，任何真实位姿都与之不同。
    pub fn zeros() -> Self {
        Self::new(Vector3::zeros(), Matrix3::zeros())
    }

    /// 从仿真器原始数组构建（姿态为行优先 3x3）
    pub fn from_raw(position: [f64; 3], orientation: [f64; 9]) -> Self {
        Self::new(
            Vector3::from(position),
            Matrix3::from_row_slice(&orientation),
        )
    }

    /// 转为仿真器原始数组（姿态为行优先 3x3）
    pub fn to_raw(&self) -> ([f64; 3], [f64; 9]) {
        let r = &self.rotation;
        (
            [self.position.x, self.position.y, self.position.z],
            [
                r[(0, 0)],
                r[(0, 1)],
                r[(0, 2)],
                r[(1, 0)],
                r[(1, 1)],
                r[(1, 2)],
                r[(2, 0)],
                r[(2, 1)],
                r[(2, 2)],
            ],
        )
    }

    /// 以 `base` 为参考系表达本位姿
    ///
    /// `p_rel = R_baseᵀ (p - p_base)`，`R_rel = R_baseᵀ R`。
    /// 假设 `base.rotation` 为正交矩阵（转置即逆）。
    pub fn relative_to(&self, base: &Pose) -> Pose {
        let base_inv = base.rotation.transpose();
        Pose::new(
            base_inv * (self.position - base.position),
            base_inv * self.rotation,
        )
    }

    /// 把本坐标系下的点变换到父坐标系
    pub fn transform_point(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * point + self.position
    }

    /// 逐分量比较，任一分量差的绝对值超过 `tolerance`（或为 NaN）即认为不同
    pub fn differs_from(&self, other: &Pose, tolerance: f64) -> bool {
        self.position
            .iter()
            .zip(other.position.iter())
            .chain(self.rotation.iter().zip(other.rotation.iter()))
            .any(|(a, b)| !((a - b).abs() <= tolerance))
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn rot_z(angle: f64) -> Matrix3<f64> {
        let (s, c) = angle.sin_cos();
        Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
    }

    #[test]
    fn test_from_raw_is_row_major() {
        let pose = Pose::from_raw(
            [1.0, 2.0, 3.0],
            [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
        );
        assert_eq!(pose.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(pose.rotation[(0, 1)], 2.0);
        assert_eq!(pose.rotation[(1, 0)], 4.0);

        let (position, orientation) = pose.to_raw();
        assert_eq!(position, [1.0, 2.0, 3.0]);
        assert_eq!(orientation, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_relative_to_identity_base() {
        let target = Pose::new(Vector3::new(0.3, -0.1, 0.5), rot_z(0.4));
        let relative = target.relative_to(&Pose::identity());
        assert_relative_eq!(relative.position, target.position);
        assert_relative_eq!(relative.rotation, target.rotation);
    }

    #[test]
    fn test_relative_to_rotated_base() {
        // 基座位于 (1, 0, 0)，绕 z 轴转 90°
        let base = Pose::new(Vector3::new(1.0, 0.0, 0.0), rot_z(FRAC_PI_2));
        // 目标在基座的世界 +y 方向 0.5 米处，即基座自身 x 轴方向
        let target = Pose::new(Vector3::new(1.0, 0.5, 0.2), rot_z(FRAC_PI_2));

        let relative = target.relative_to(&base);
        assert_relative_eq!(
            relative.position,
            Vector3::new(0.5, 0.0, 0.2),
            epsilon = 1e-12
        );
        assert_relative_eq!(relative.rotation, Matrix3::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_transform_point_inverts_relative() {
        let base = Pose::new(Vector3::new(0.2, -0.3, 0.1), rot_z(0.7));
        let target = Pose::new(Vector3::new(0.5, 0.4, 0.9), Matrix3::identity());
        let relative = target.relative_to(&base);
        assert_relative_eq!(
            base.transform_point(&relative.position),
            target.position,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_differs_from() {
        let a = Pose::identity();
        let mut b = a;
        assert!(!a.differs_from(&b, 0.0));

        b.position.x += 1e-3;
        assert!(a.differs_from(&b, 0.0));
        assert!(a.differs_from(&b, 1e-4));
        assert!(!a.differs_from(&b, 1e-2));

        let mut c = a;
        c.rotation[(2, 2)] = f64::NAN;
        assert!(a.differs_from(&c, 1.0));
    }

    #[test]
    fn test_zeros_differs_from_any_rotation() {
        assert!(Pose::zeros().differs_from(&Pose::identity(), 0.5));
    }
}
