use crate::error::{Result, RigError};
use crate::vector::Vector3;

/// BlazePose の 33 ランドマークインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    pub const COUNT: usize = 33;

    /// 腰・肩・腕の計算に必要な最小ランドマーク数 (RightHip まで)
    pub const UPPER_BODY_COUNT: usize = LandmarkIndex::RightHip as usize + 1;

    /// 脚の計算に必要な最小ランドマーク数 (RightAnkle まで)
    pub const LOWER_BODY_COUNT: usize = LandmarkIndex::RightAnkle as usize + 1;
}

/// 単一ランドマーク
///
/// 3Dではモデルのワールド座標 (腰中心が原点, y下向き)、
/// 2Dでは画像座標 (z = 0)。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub position: Vector3,
    /// 可視度 (0.0〜1.0)。モデルが出さない場合は None
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// `[x, y, z, visibility?]` から作成
    pub fn from_slice(values: &[f32]) -> Result<Self> {
        Ok(Self {
            position: Vector3::from_slice(values)?,
            visibility: values.get(3).copied(),
        })
    }

    /// `[x, y]` から2Dランドマークを作成。3要素目以降は無視
    pub fn from_slice_2d(values: &[f32]) -> Result<Self> {
        Ok(Self {
            position: Vector3::from_slice_2d(values)?,
            visibility: None,
        })
    }

    /// 可視度が閾値以上か。可視度が無ければ見えているとみなす
    pub fn is_visible(&self, threshold: f32) -> bool {
        self.visibility.map_or(true, |v| v >= threshold)
    }
}

/// 1フレーム分のランドマーク列
///
/// 作成時に [`LandmarkIndex::UPPER_BODY_COUNT`] 個以上あることを検証する。
/// 脚のランドマークが必要な場合は [`LandmarkPose::require`] で追加検証する。
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkPose {
    landmarks: Vec<Landmark>,
}

impl LandmarkPose {
    pub fn new(landmarks: Vec<Landmark>) -> Result<Self> {
        let pose = Self { landmarks };
        pose.require(LandmarkIndex::UPPER_BODY_COUNT)?;
        Ok(pose)
    }

    /// `[[x, y, z, vis?], ...]` から3Dポーズを作成
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self> {
        let landmarks = rows
            .iter()
            .map(|row| Landmark::from_slice(row.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(landmarks)
    }

    /// `[[x, y], ...]` から2Dポーズを作成
    pub fn from_rows_2d<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self> {
        let landmarks = rows
            .iter()
            .map(|row| Landmark::from_slice_2d(row.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(landmarks)
    }

    pub fn require(&self, count: usize) -> Result<()> {
        if self.landmarks.len() < count {
            return Err(RigError::MissingLandmarks {
                required: count,
                got: self.landmarks.len(),
            });
        }
        Ok(())
    }

    /// インデックスでランドマークを取得
    ///
    /// 検証済みの範囲外を指定すると panic する。
    pub fn get(&self, index: LandmarkIndex) -> &Landmark {
        &self.landmarks[index as usize]
    }

    pub fn position(&self, index: LandmarkIndex) -> Vector3 {
        self.get(index).position
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// 全ランドマークの座標を軸ごとに割る (ピクセル → 正規化座標)
    pub fn normalized(&self, width: f32, height: f32) -> Self {
        let landmarks = self
            .landmarks
            .iter()
            .map(|lm| Landmark {
                position: Vector3::new(lm.position.x / width, lm.position.y / height, lm.position.z),
                visibility: lm.visibility,
            })
            .collect();
        Self { landmarks }
    }
}
