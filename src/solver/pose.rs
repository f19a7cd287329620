use std::borrow::Cow;

use tracing::debug;

use crate::config::{Runtime, SolverConfig};
use crate::error::{Result, RigError};
use crate::landmark::{LandmarkIndex, LandmarkPose};
use crate::rig::{ArmRig, HipsRig, LegRig, PoseRig, Side};

use super::arms::calc_arm;
use super::hips::calc_hips;
use super::legs::calc_leg;

/// 1フレームのランドマークから全身のリグを計算する
///
/// 設定以外の状態は持たない。各フレームは独立に解く。
#[derive(Debug, Clone)]
pub struct PoseSolver {
    config: SolverConfig,
}

impl PoseSolver {
    pub fn new() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// 設定から作成
    pub fn from_config(config: &SolverConfig) -> Result<Self> {
        if config.runtime == Runtime::Tfjs && (config.image_width == 0 || config.image_height == 0) {
            return Err(RigError::InvalidImageSize {
                width: config.image_width,
                height: config.image_height,
            });
        }
        Ok(Self {
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// 腰と背骨だけを計算する。2D座標の正規化は [`solve`](Self::solve) と同じ
    pub fn solve_hips(&self, pose3d: &LandmarkPose, pose2d: &LandmarkPose) -> HipsRig {
        calc_hips(pose3d, &self.normalize_2d(pose2d))
    }

    pub fn solve(&self, pose3d: &LandmarkPose, pose2d: &LandmarkPose) -> Result<PoseRig> {
        if self.config.enable_legs {
            pose3d.require(LandmarkIndex::LOWER_BODY_COUNT)?;
            pose2d.require(LandmarkIndex::LOWER_BODY_COUNT)?;
        }
        let pose2d = self.normalize_2d(pose2d);

        let hips = calc_hips(pose3d, &pose2d);
        let right_arm = self.solve_arm(pose3d, &pose2d, Side::Right);
        let left_arm = self.solve_arm(pose3d, &pose2d, Side::Left);

        let legs = if self.config.enable_legs {
            Some((
                self.solve_leg(pose3d, &pose2d, Side::Right),
                self.solve_leg(pose3d, &pose2d, Side::Left),
            ))
        } else {
            None
        };

        Ok(PoseRig::new(hips, right_arm, left_arm, legs))
    }

    /// tfjsのピクセル座標を正規化座標に揃える
    fn normalize_2d<'a>(&self, pose2d: &'a LandmarkPose) -> Cow<'a, LandmarkPose> {
        match self.config.runtime {
            Runtime::Mediapipe => Cow::Borrowed(pose2d),
            Runtime::Tfjs => Cow::Owned(pose2d.normalized(
                self.config.image_width as f32,
                self.config.image_height as f32,
            )),
        }
    }

    fn solve_arm(&self, pose3d: &LandmarkPose, pose2d: &LandmarkPose, side: Side) -> ArmRig {
        if self.hand_offscreen(pose3d, pose2d, side) {
            debug!(?side, "hand offscreen, resting arm");
            ArmRig::resting(side)
        } else {
            calc_arm(pose3d, side)
        }
    }

    fn solve_leg(&self, pose3d: &LandmarkPose, pose2d: &LandmarkPose, side: Side) -> LegRig {
        if self.leg_offscreen(pose3d, pose2d, side) {
            debug!(?side, "knee offscreen, resting leg");
            LegRig::resting()
        } else {
            calc_leg(pose3d, side)
        }
    }

    /// 手首が見えていない、腰より下に落ちている、または画面下端を超えている
    fn hand_offscreen(&self, pose3d: &LandmarkPose, pose2d: &LandmarkPose, side: Side) -> bool {
        let wrist_idx = match side {
            Side::Left => LandmarkIndex::LeftWrist,
            Side::Right => LandmarkIndex::RightWrist,
        };
        let wrist = pose3d.get(wrist_idx);
        let hip_line = pose3d
            .position(LandmarkIndex::LeftHip)
            .lerp(&pose3d.position(LandmarkIndex::RightHip), 0.5)
            .y;

        !wrist.is_visible(self.config.hand_visibility)
            || wrist.position.y - hip_line > self.config.hand_drop
            || pose2d.position(wrist_idx).y > self.config.screen_bottom
    }

    /// 膝が見えていない、または画面下端を超えている
    fn leg_offscreen(&self, pose3d: &LandmarkPose, pose2d: &LandmarkPose, side: Side) -> bool {
        let knee_idx = match side {
            Side::Left => LandmarkIndex::LeftKnee,
            Side::Right => LandmarkIndex::RightKnee,
        };
        !pose3d.get(knee_idx).is_visible(self.config.leg_visibility)
            || pose2d.position(knee_idx).y > self.config.screen_bottom
    }
}

impl Default for PoseSolver {
    fn default() -> Self {
        Self::new()
    }
}
