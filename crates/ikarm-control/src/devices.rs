//! 电机与位置传感器发现

use ikarm_sim::{DeviceId, DeviceInfo, SimError, Supervisor};
use tracing::{debug, info, warn};

/// 电机及其配对的位置传感器
#[derive(Debug, Clone, PartialEq)]
pub struct MotorChannel {
    pub motor: DeviceInfo,
    pub sensor: Option<DeviceId>,
}

/// 枚举设备列表，筛选类型码为 `motor_type` 的电机
///
/// 每个电机的位置传感器以 `sampling_ms` 为周期使能；
/// 返回顺序与设备列表顺序一致（即与 IK 运动链关节顺序一致）。
pub fn discover_motors<S: Supervisor + ?Sized>(
    supervisor: &mut S,
    motor_type: u16,
    sampling_ms: u32,
) -> Result<Vec<MotorChannel>, SimError> {
    let count = supervisor.device_count();
    let mut motors = Vec::new();

    for index in 0..count {
        let device = supervisor.device(index)?;
        debug!(
            name = %device.name,
            node_type = device.node_type.code(),
            "Found device"
        );
        if device.node_type.code() != motor_type {
            continue;
        }

        let sensor = supervisor.position_sensor(device.id);
        match sensor {
            Some(sensor) => supervisor.enable_sensor(sensor, sampling_ms)?,
            None => warn!(
                motor = %device.name,
                "Motor has no position sensor, IK seed falls back to 0.0"
            ),
        }
        motors.push(MotorChannel {
            motor: device,
            sensor,
        });
    }

    info!(motors = motors.len(), devices = count, "Discovered arm motors");
    Ok(motors)
}
