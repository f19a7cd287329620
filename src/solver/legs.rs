use std::f32::consts::PI;

use crate::angle::clamp;
use crate::landmark::{LandmarkIndex, LandmarkPose};
use crate::rig::{LegRig, Side};
use crate::vector::Vector3;

/// 太ももの前後振りの可動域 (後ろ, 前)
pub const HIP_SWING_LIMIT: (f32, f32) = (-0.8, 2.0);
/// 太ももの横振りの可動域
pub const HIP_SPREAD_LIMIT: f32 = 0.8;
/// 膝の最大屈曲
pub const KNEE_BEND_LIMIT: f32 = 2.6;

fn leg_landmarks(side: Side) -> (LandmarkIndex, LandmarkIndex, LandmarkIndex) {
    match side {
        Side::Left => (LandmarkIndex::LeftHip, LandmarkIndex::LeftKnee, LandmarkIndex::LeftAnkle),
        Side::Right => (LandmarkIndex::RightHip, LandmarkIndex::RightKnee, LandmarkIndex::RightAnkle),
    }
}

/// 片脚の回転を計算する
///
/// 太ももは鉛直下向きからの振り角、膝は腰-膝-足首の角度から。
/// y下向きのワールド座標を前提とする。呼び出し側で
/// [`LandmarkIndex::LOWER_BODY_COUNT`] 個以上あることを検証しておくこと。
pub fn calc_leg(pose3d: &LandmarkPose, side: Side) -> LegRig {
    let (hip_idx, knee_idx, ankle_idx) = leg_landmarks(side);
    let hip = pose3d.position(hip_idx);
    let knee = pose3d.position(knee_idx);
    let ankle = pose3d.position(ankle_idx);

    let thigh = knee - hip;
    // 前後: カメラ側 (z負) へ振ると正
    let swing = (-thigh.z).atan2(thigh.y);
    // 左右: x方向へ開くと符号付きで増える
    let spread = thigh.x.atan2(thigh.y);
    let bend = 1.0 - Vector3::angle_between(&hip, &knee, &ankle);

    LegRig {
        upper_leg: Vector3::new(
            clamp(swing, HIP_SWING_LIMIT.0, HIP_SWING_LIMIT.1),
            0.0,
            clamp(spread, -HIP_SPREAD_LIMIT, HIP_SPREAD_LIMIT),
        ),
        lower_leg: Vector3::new(-clamp(bend * PI, 0.0, KNEE_BEND_LIMIT), 0.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::Landmark;

    fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    fn make_leg_pose(hip: (f32, f32, f32), knee: (f32, f32, f32), ankle: (f32, f32, f32)) -> LandmarkPose {
        let mut landmarks = vec![Landmark::default(); LandmarkIndex::COUNT];
        let set = |landmarks: &mut Vec<Landmark>, right: LandmarkIndex, left: LandmarkIndex, p: (f32, f32, f32)| {
            landmarks[right as usize] = Landmark::new(-p.0, p.1, p.2);
            landmarks[left as usize] = Landmark::new(p.0, p.1, p.2);
        };
        set(&mut landmarks, LandmarkIndex::RightHip, LandmarkIndex::LeftHip, hip);
        set(&mut landmarks, LandmarkIndex::RightKnee, LandmarkIndex::LeftKnee, knee);
        set(&mut landmarks, LandmarkIndex::RightAnkle, LandmarkIndex::LeftAnkle, ankle);
        LandmarkPose::new(landmarks).unwrap()
    }

    #[test]
    fn test_standing_is_neutral() {
        let pose = make_leg_pose((0.1, 0.0, 0.0), (0.1, 0.45, 0.0), (0.1, 0.9, 0.0));
        for side in [Side::Left, Side::Right] {
            let rig = calc_leg(&pose, side);
            assert!(approx_eq(rig.upper_leg.x, 0.0, 1e-6));
            assert!(approx_eq(rig.upper_leg.z, 0.0, 1e-6));
            assert!(approx_eq(rig.lower_leg.x, 0.0, 1e-3));
        }
    }

    #[test]
    fn test_spread_is_mirrored() {
        // 左脚をx正方向へ開く (右脚は鏡像)
        let pose = make_leg_pose((0.1, 0.0, 0.0), (0.3, 0.4, 0.0), (0.5, 0.8, 0.0));
        let left = calc_leg(&pose, Side::Left);
        let right = calc_leg(&pose, Side::Right);
        let expected = 0.2f32.atan2(0.4);
        assert!(approx_eq(left.upper_leg.z, expected, 1e-5));
        assert!(approx_eq(right.upper_leg.z, -expected, 1e-5));
    }

    #[test]
    fn test_knee_raise() {
        // 太ももを前へ水平に上げ、すねは真下
        let pose = make_leg_pose((0.1, 0.0, 0.0), (0.1, 0.0, -0.45), (0.1, 0.45, -0.45));
        let rig = calc_leg(&pose, Side::Left);
        assert!(approx_eq(rig.upper_leg.x, PI / 2.0, 1e-5));
        assert!(approx_eq(rig.lower_leg.x, -PI / 2.0, 1e-4));
    }

    #[test]
    fn test_limits() {
        // 太ももを真上に
        let pose = make_leg_pose((0.1, 0.0, 0.0), (0.1, -0.45, -0.01), (0.1, -0.01, -0.02));
        let rig = calc_leg(&pose, Side::Left);
        assert_eq!(rig.upper_leg.x, HIP_SWING_LIMIT.1);
        assert_eq!(rig.lower_leg.x, -KNEE_BEND_LIMIT);
    }
}
