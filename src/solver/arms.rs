use std::f32::consts::{FRAC_PI_2, PI};

use crate::angle::clamp;
use crate::landmark::{LandmarkIndex, LandmarkPose};
use crate::rig::{ArmRig, Side};
use crate::vector::Vector3;

/// 肘の最大屈曲 (ラジアン)
pub const ELBOW_BEND_LIMIT: f32 = 2.6;
/// 手首の可動域 (ラジアン)
pub const WRIST_LIMIT: f32 = 0.6;

/// 腕で使うランドマーク
struct ArmLandmarks {
    shoulder: LandmarkIndex,
    elbow: LandmarkIndex,
    wrist: LandmarkIndex,
    pinky: LandmarkIndex,
    index: LandmarkIndex,
}

impl ArmLandmarks {
    fn for_side(side: Side) -> Self {
        use LandmarkIndex::*;
        match side {
            Side::Left => Self {
                shoulder: LeftShoulder,
                elbow: LeftElbow,
                wrist: LeftWrist,
                pinky: LeftPinky,
                index: LeftIndex,
            },
            Side::Right => Self {
                shoulder: RightShoulder,
                elbow: RightElbow,
                wrist: RightWrist,
                pinky: RightPinky,
                index: RightIndex,
            },
        }
    }
}

/// 腕の各セグメントの向き (正規化単位)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmSegments {
    pub upper: Vector3,
    pub lower: Vector3,
    pub hand: Vector3,
    /// 肘の曲がり具合 (0 = 伸展, 1 = 完全屈曲)
    pub bend: f32,
}

impl ArmSegments {
    pub fn from_pose(pose3d: &LandmarkPose, side: Side) -> Self {
        let lm = ArmLandmarks::for_side(side);
        let shoulder = pose3d.position(lm.shoulder);
        let elbow = pose3d.position(lm.elbow);
        let wrist = pose3d.position(lm.wrist);
        // 手の向きは手首→指の付け根 (小指と人差し指の中点)
        let knuckles = pose3d.position(lm.pinky).lerp(&pose3d.position(lm.index), 0.5);

        Self {
            upper: Vector3::roll_pitch_yaw(&shoulder, &elbow),
            lower: Vector3::roll_pitch_yaw(&elbow, &wrist),
            hand: Vector3::roll_pitch_yaw(&wrist, &knuckles),
            bend: 1.0 - Vector3::angle_between(&shoulder, &elbow, &wrist),
        }
    }
}

/// 片腕の回転を計算する
pub fn calc_arm(pose3d: &LandmarkPose, side: Side) -> ArmRig {
    rig_arm(&ArmSegments::from_pose(pose3d, side), side)
}

/// 正規化単位 → ラジアン、関節の可動域でクランプ
///
/// ひねり (x) は推定が不安定なので全セグメントで0。
pub fn rig_arm(segments: &ArmSegments, side: Side) -> ArmRig {
    let invert = side.invert();
    let ArmSegments { upper, lower, hand, bend } = *segments;

    let upper_arm = Vector3::new(0.0, upper.y * PI * invert, upper.z * PI * invert);

    let lower_arm = Vector3::new(
        0.0,
        clamp(bend * PI, 0.0, ELBOW_BEND_LIMIT) * invert,
        clamp((lower.z - upper.z) * PI, -FRAC_PI_2, FRAC_PI_2) * invert,
    );

    let hand = Vector3::new(
        0.0,
        clamp((hand.y - lower.y) * PI, -WRIST_LIMIT, WRIST_LIMIT) * invert,
        clamp((hand.z - lower.z) * PI, -WRIST_LIMIT, WRIST_LIMIT) * invert,
    );

    ArmRig {
        upper_arm,
        lower_arm,
        hand,
    }
}
