//! ソルバーの出力。リターゲット側へそのまま渡す (単位はラジアン)

use serde::Serialize;

use crate::vector::Vector3;

/// 体の左右
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// 左右で回転の向きを揃えるための符号 (右 = 1, 左 = -1)
    pub fn invert(self) -> f32 {
        match self {
            Side::Right => 1.0,
            Side::Left => -1.0,
        }
    }
}

/// 腰の位置と回転
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct HipRig {
    /// ワールド位置。推定は無効化しているので常にゼロ
    pub position: Vector3,
    pub rotation: Vector3,
}

/// 腰 + 背骨
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HipsRig {
    pub hips: HipRig,
    pub spine: Vector3,
}

/// 片腕
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArmRig {
    pub upper_arm: Vector3,
    pub lower_arm: Vector3,
    pub hand: Vector3,
}

/// 腕をおろした休止姿勢の上腕z回転
pub const RESTING_UPPER_ARM_Z: f32 = 1.25;

impl ArmRig {
    /// 腕が画面外のときの休止姿勢
    pub fn resting(side: Side) -> Self {
        Self {
            upper_arm: Vector3::new(0.0, 0.0, RESTING_UPPER_ARM_Z * side.invert()),
            ..Self::default()
        }
    }
}

/// 片脚
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LegRig {
    pub upper_leg: Vector3,
    pub lower_leg: Vector3,
}

impl LegRig {
    /// 脚が画面外のときの休止姿勢 (直立)
    pub fn resting() -> Self {
        Self::default()
    }
}

/// 全身のリグ
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PoseRig {
    pub hips: HipRig,
    pub spine: Vector3,
    pub right_upper_arm: Vector3,
    pub right_lower_arm: Vector3,
    pub right_hand: Vector3,
    pub left_upper_arm: Vector3,
    pub left_lower_arm: Vector3,
    pub left_hand: Vector3,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_upper_leg: Option<Vector3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_lower_leg: Option<Vector3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_upper_leg: Option<Vector3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_lower_leg: Option<Vector3>,
}

impl PoseRig {
    pub fn new(hips: HipsRig, right_arm: ArmRig, left_arm: ArmRig, legs: Option<(LegRig, LegRig)>) -> Self {
        let (right_leg, left_leg) = match legs {
            Some((right, left)) => (Some(right), Some(left)),
            None => (None, None),
        };
        Self {
            hips: hips.hips,
            spine: hips.spine,
            right_upper_arm: right_arm.upper_arm,
            right_lower_arm: right_arm.lower_arm,
            right_hand: right_arm.hand,
            left_upper_arm: left_arm.upper_arm,
            left_lower_arm: left_arm.lower_arm,
            left_hand: left_arm.hand,
            right_upper_leg: right_leg.map(|l| l.upper_leg),
            right_lower_leg: right_leg.map(|l| l.lower_leg),
            left_upper_leg: left_leg.map(|l| l.upper_leg),
            left_lower_leg: left_leg.map(|l| l.lower_leg),
        }
    }
}
