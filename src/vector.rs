use std::f32::consts::PI;
use std::ops::Sub;

use nalgebra::Vector3 as NaVector3;
use serde::Serialize;

use crate::error::{Result, RigError};

/// 長さゼロとみなす閾値
const EPSILON: f32 = 1e-6;

/// 3次元ベクトル
///
/// 回転として使う場合、ソルバー内部では π = 1 の正規化単位、
/// リグ出力ではラジアン。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// `[x, y, z, ...]` から作成。3要素未満はエラー
    pub fn from_slice(values: &[f32]) -> Result<Self> {
        match values {
            [x, y, z, ..] => Ok(Self::new(*x, *y, *z)),
            _ => Err(RigError::ShortArray {
                expected: 3,
                got: values.len(),
            }),
        }
    }

    /// `[x, y, ...]` から2Dベクトルを作成 (z = 0)。2要素未満はエラー
    pub fn from_slice_2d(values: &[f32]) -> Result<Self> {
        match values {
            [x, y, ..] => Ok(Self::new(*x, *y, 0.0)),
            _ => Err(RigError::ShortArray {
                expected: 2,
                got: values.len(),
            }),
        }
    }

    /// 成分ごとの線形補間。tは範囲外でも外挿する
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self::new(
            (1.0 - t) * self.x + t * other.x,
            (1.0 - t) * self.y + t * other.y,
            (1.0 - t) * self.z + t * other.z,
        )
    }

    /// ユークリッド距離
    pub fn distance(&self, other: &Self) -> f32 {
        (self.to_na() - other.to_na()).norm()
    }

    /// 各成分に同じ係数を掛ける
    pub fn scale(&self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// 正規化単位 (π = 1) → ラジアン
    pub fn to_radians(&self) -> Self {
        self.scale(PI)
    }

    /// 線分 a→b の向き (roll/pitch/yaw、正規化単位)
    ///
    /// d = b - a として、各成分は座標平面内での d の仰角:
    /// - x (pitch): atan2(d.z, |d.y|)
    /// - y (yaw):   atan2(d.z, |d.x|)
    /// - z (roll):  atan2(d.y, |d.x|)
    ///
    /// 基準軸側に絶対値を取るので、a/b を入れ替えると符号だけが反転し、
    /// ±π の折り返しは起きない。各成分は [-0.5, 0.5]。
    pub fn roll_pitch_yaw(a: &Self, b: &Self) -> Self {
        let d = *b - *a;
        Self::new(
            d.z.atan2(d.y.abs()) / PI,
            d.z.atan2(d.x.abs()) / PI,
            d.y.atan2(d.x.abs()) / PI,
        )
    }

    /// bを頂点とする a-b-c の角度。π = 1 に正規化 (1 = 一直線)
    ///
    /// どちらかの腕の長さがゼロなら一直線とみなす。
    pub fn angle_between(a: &Self, b: &Self, c: &Self) -> f32 {
        let ba = a.to_na() - b.to_na();
        let bc = c.to_na() - b.to_na();
        if ba.norm() < EPSILON || bc.norm() < EPSILON {
            return 1.0;
        }
        ba.angle(&bc) / PI
    }

    pub fn to_na(&self) -> NaVector3<f32> {
        NaVector3::new(self.x, self.y, self.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// 左右対称な2点 (左右の腰・肩など) から向きを推定するモデル
///
/// 戻り値は正規化単位。ソルバーはこのトレイト越しに向きを取り出すので、
/// 推定方法を差し替えてもソルバー側の補正はそのまま使える。
pub trait OrientationModel {
    fn roll_pitch_yaw(&self, a: &Vector3, b: &Vector3) -> Vector3;
}

/// 既定の向き推定
///
/// pitch/yaw は [`Vector3::roll_pitch_yaw`] と同じ。roll だけは
/// 反対側の横軸 (-|d.x|) から測る: atan2(d.y, -|d.x|)。
///
/// 水平な2点は ±1 になり、補正の [`fold_roll`](crate::angle::fold_roll)
/// で 0 に畳まれる。|roll| は常に [0.5, 1] なので fold の不連続点 (0) には
/// 近づかない。a/b の入れ替えで符号が反転するのは同じ (水平なら ±1 は同じ向き)。
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarOrientation;

impl OrientationModel for PlanarOrientation {
    fn roll_pitch_yaw(&self, a: &Vector3, b: &Vector3) -> Vector3 {
        let d = *b - *a;
        let segment = Vector3::roll_pitch_yaw(a, b);
        Vector3::new(segment.x, segment.y, d.y.atan2(-d.x.abs()) / PI)
    }
}
