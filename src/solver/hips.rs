use tracing::trace;

use crate::angle::correct_pair_rotation;
use crate::landmark::{LandmarkIndex, LandmarkPose};
use crate::rig::{HipRig, HipsRig};
use crate::vector::{OrientationModel, PlanarOrientation, Vector3};

/// 2D画像上の胴体 (腰中点・肩中点)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Torso2d {
    pub hip_center: Vector3,
    pub shoulder_center: Vector3,
    /// 腰中点→肩中点の距離
    pub spine_length: f32,
}

impl Torso2d {
    pub fn from_pose(pose2d: &LandmarkPose) -> Self {
        let hip_left = pose2d.position(LandmarkIndex::LeftHip);
        let hip_right = pose2d.position(LandmarkIndex::RightHip);
        let shoulder_left = pose2d.position(LandmarkIndex::LeftShoulder);
        let shoulder_right = pose2d.position(LandmarkIndex::RightShoulder);
        let hip_center = hip_left.lerp(&hip_right, 0.5);
        let shoulder_center = shoulder_left.lerp(&shoulder_right, 0.5);
        Self {
            hip_center,
            shoulder_center,
            spine_length: hip_center.distance(&shoulder_center),
        }
    }

    /// 腰のワールド位置
    ///
    /// 2D胴体からの推定は精度不足のため無効化しており、常にゼロを返す。
    pub fn hip_position(&self) -> Vector3 {
        Vector3::ZERO
    }
}

/// 腰と背骨の回転を計算する (既定の向き推定)
pub fn calc_hips(pose3d: &LandmarkPose, pose2d: &LandmarkPose) -> HipsRig {
    calc_hips_with(&PlanarOrientation, pose3d, pose2d)
}

/// 向き推定モデルを指定して腰と背骨の回転を計算する
pub fn calc_hips_with<M: OrientationModel + ?Sized>(
    model: &M,
    pose3d: &LandmarkPose,
    pose2d: &LandmarkPose,
) -> HipsRig {
    let (hips, spine) = solve_normalized(model, pose3d, pose2d);
    rig_hips(hips, spine)
}

/// 正規化単位 (π = 1) のままの腰・背骨
pub fn solve_normalized<M: OrientationModel + ?Sized>(
    model: &M,
    pose3d: &LandmarkPose,
    pose2d: &LandmarkPose,
) -> (HipRig, Vector3) {
    let torso = Torso2d::from_pose(pose2d);
    trace!(spine_length = torso.spine_length, "2D torso");

    let hip_rotation = model.roll_pitch_yaw(
        &pose3d.position(LandmarkIndex::LeftHip),
        &pose3d.position(LandmarkIndex::RightHip),
    );
    let hips = HipRig {
        position: torso.hip_position(),
        rotation: correct_pair_rotation(hip_rotation),
    };

    let spine_rotation = model.roll_pitch_yaw(
        &pose3d.position(LandmarkIndex::LeftShoulder),
        &pose3d.position(LandmarkIndex::RightShoulder),
    );
    let spine = correct_pair_rotation(spine_rotation);

    (hips, spine)
}

/// 正規化単位 → ラジアン。位置はそのまま
pub fn rig_hips(hips: HipRig, spine: Vector3) -> HipsRig {
    HipsRig {
        hips: HipRig {
            position: hips.position,
            rotation: hips.rotation.to_radians(),
        },
        spine: spine.to_radians(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::Landmark;
    use std::f32::consts::PI;

    fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    fn approx_eq_v(a: &Vector3, b: &Vector3, eps: f32) -> bool {
        approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps) && approx_eq(a.z, b.z, eps)
    }

    fn make_pose(
        left_hip: (f32, f32, f32),
        right_hip: (f32, f32, f32),
        left_shoulder: (f32, f32, f32),
        right_shoulder: (f32, f32, f32),
    ) -> LandmarkPose {
        let mut landmarks = vec![Landmark::default(); LandmarkIndex::UPPER_BODY_COUNT];
        let mut set = |idx: LandmarkIndex, p: (f32, f32, f32)| {
            landmarks[idx as usize] = Landmark::new(p.0, p.1, p.2);
        };
        set(LandmarkIndex::LeftHip, left_hip);
        set(LandmarkIndex::RightHip, right_hip);
        set(LandmarkIndex::LeftShoulder, left_shoulder);
        set(LandmarkIndex::RightShoulder, right_shoulder);
        LandmarkPose::new(landmarks).unwrap()
    }

    fn facing_pose() -> LandmarkPose {
        make_pose(
            (-0.1, 0.0, 0.0),
            (0.1, 0.0, 0.0),
            (-0.15, 0.5, 0.0),
            (0.15, 0.5, 0.0),
        )
    }

    fn image_pose() -> LandmarkPose {
        make_pose(
            (0.45, 0.6, 0.0),
            (0.55, 0.6, 0.0),
            (0.4, 0.3, 0.0),
            (0.6, 0.3, 0.0),
        )
    }

    /// 固定の生値を返す向き推定
    struct FixedOrientation(Vector3);

    impl OrientationModel for FixedOrientation {
        fn roll_pitch_yaw(&self, _a: &Vector3, _b: &Vector3) -> Vector3 {
            self.0
        }
    }

    #[test]
    fn test_torso_2d() {
        let torso = Torso2d::from_pose(&image_pose());
        assert!(approx_eq_v(&torso.hip_center, &Vector3::new(0.5, 0.6, 0.0), 1e-6));
        assert!(approx_eq_v(&torso.shoulder_center, &Vector3::new(0.5, 0.3, 0.0), 1e-6));
        assert!(approx_eq(torso.spine_length, 0.3, 1e-6));
        assert_eq!(torso.hip_position(), Vector3::ZERO);
    }

    #[test]
    fn test_facing_camera() {
        let rig = calc_hips(&facing_pose(), &image_pose());
        let expected = Vector3::new(0.0, PI / 2.0, 0.0);
        assert!(approx_eq_v(&rig.hips.rotation, &expected, 1e-6), "{:?}", rig.hips.rotation);
        assert!(approx_eq_v(&rig.spine, &expected, 1e-6), "{:?}", rig.spine);
        assert_eq!(rig.hips.position, Vector3::ZERO);
    }

    #[test]
    fn test_zero_case_before_scaling() {
        let (hips, spine) = solve_normalized(&PlanarOrientation, &facing_pose(), &image_pose());
        assert!(approx_eq(hips.rotation.y, 0.5, 1e-6));
        assert!(approx_eq(spine.y, 0.5, 1e-6));
    }

    #[test]
    fn test_turned_and_tilted_hips_regression() {
        // 右腰が少し下がり、カメラ側へ回った姿勢
        let pose = make_pose(
            (-0.1, 0.0, 0.0),
            (0.1, 0.02, -0.1),
            (-0.15, 0.5, 0.05),
            (0.15, 0.45, -0.2),
        );
        let (hips, spine) = solve_normalized(&PlanarOrientation, &pose, &image_pose());
        assert_eq!(hips.rotation.x, 0.0);
        assert!(approx_eq(hips.rotation.y, 0.352_416_4, 1e-5));
        assert!(approx_eq(hips.rotation.z, 0.007_548_1, 1e-5));
        assert_eq!(spine.x, 0.0);
        assert!(approx_eq(spine.y, 0.278_857_9, 1e-5));
        assert!(approx_eq(spine.z, -0.031_841_3, 1e-5));

        let rig = rig_hips(hips, spine);
        assert!(approx_eq(rig.hips.rotation.y, 1.107_148_7, 1e-4));
        assert!(approx_eq(rig.hips.rotation.z, 0.023_713_0, 1e-4));
        assert!(approx_eq(rig.spine.z, -0.100_032_3, 1e-4));
    }

    /// 体を回した状態 (生のyaw = angle / π) で右側だけ dy 上下させたポーズ
    fn turned_pose(angle: f32, dy: f32) -> LandmarkPose {
        let (s, c) = angle.sin_cos();
        make_pose(
            (-0.1 * c, 0.0, -0.1 * s),
            (0.1 * c, dy, 0.1 * s),
            (-0.15 * c, 0.5, -0.15 * s),
            (0.15 * c, 0.5 + dy, 0.15 * s),
        )
    }

    #[test]
    fn test_level_roll_is_continuous_when_turned() {
        // 生のyaw -0.3 → 補正後 0.2 で roll の減衰はまだ効かない
        let up = calc_hips(&turned_pose(-0.3 * PI, 0.0005), &image_pose());
        let down = calc_hips(&turned_pose(-0.3 * PI, -0.0005), &image_pose());
        assert!(approx_eq(up.hips.rotation.y, 0.2 * PI, 1e-4));
        for (a, b) in [(up.hips.rotation.z, down.hips.rotation.z), (up.spine.z, down.spine.z)] {
            assert!(approx_eq(a, -b, 1e-5), "{} vs {}", a, b);
            assert!(a.abs() < 0.01, "roll jumped: {}", a);
        }
    }

    #[test]
    fn test_radian_round_trip() {
        let pose = make_pose(
            (-0.1, 0.01, 0.03),
            (0.12, -0.02, -0.08),
            (-0.2, 0.48, 0.1),
            (0.1, 0.52, -0.12),
        );
        let (hips, spine) = solve_normalized(&PlanarOrientation, &pose, &image_pose());
        let rig = rig_hips(hips, spine);
        let back = rig.hips.rotation.scale(1.0 / PI);
        assert!(approx_eq_v(&back, &hips.rotation, 1e-6));
        let back = rig.spine.scale(1.0 / PI);
        assert!(approx_eq_v(&back, &spine, 1e-6));
        assert_eq!(rig.hips.position, hips.position);
    }

    #[test]
    fn test_injected_model_wraps_yaw() {
        let model = FixedOrientation(Vector3::new(0.3, 0.75, 0.2));
        let (hips, spine) = solve_normalized(&model, &facing_pose(), &image_pose());
        // 0.75 - 2 + 0.5 = -0.75 → 完全に横向きで roll は抑制
        assert!(approx_eq(hips.rotation.y, -0.75, 1e-6));
        assert_eq!(hips.rotation.z, 0.0);
        assert_eq!(hips.rotation.x, 0.0);
        assert_eq!(hips.rotation, spine);
    }

    #[test]
    fn test_injected_model_folds_roll() {
        let model = FixedOrientation(Vector3::new(0.0, -0.45, -0.3));
        let rig = calc_hips_with(&model, &facing_pose(), &image_pose());
        // yaw 0.05 は減衰なし、roll -0.3 → -0.7
        assert!(approx_eq(rig.hips.rotation.y, 0.05 * PI, 1e-5));
        assert!(approx_eq(rig.hips.rotation.z, -0.7 * PI, 1e-5));
        assert!(approx_eq(rig.spine.z, -0.7 * PI, 1e-5));
    }

    #[test]
    fn test_each_call_is_independent() {
        let a = calc_hips(&facing_pose(), &image_pose());
        let turned = make_pose(
            (-0.1, 0.0, 0.1),
            (0.1, 0.0, -0.1),
            (-0.15, 0.5, 0.1),
            (0.15, 0.5, -0.1),
        );
        let _ = calc_hips(&turned, &image_pose());
        let b = calc_hips(&facing_pose(), &image_pose());
        assert_eq!(a, b);
    }
}
