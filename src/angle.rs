//! 正規化単位 (π = 1) の角度補正
//!
//! 向き推定の生値をリグに渡せる連続な値にする。定数はすべて
//! 経験的に調整されたもので、テストで値を固定している。

use crate::vector::Vector3;

/// 横向き判定の開始 (|yaw|)
pub const TURN_AROUND_START: f32 = 0.2;
/// 横向き判定の飽和 (|yaw|)
pub const TURN_AROUND_END: f32 = 0.4;

pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// [min, max] を [0, 1] に線形に写す。範囲外はクランプ
pub fn remap(value: f32, min: f32, max: f32) -> f32 {
    (clamp(value, min, max) - min) / (max - min)
}

/// yawの ±π 折り返しを戻し、0.5 だけ中心をずらす
///
/// 0.5 を超える値は一周分 (2) 戻してから +0.5。
/// 入力域 [-1, 1] → 出力域 [-0.5, 1.0]。
pub fn unwrap_yaw(yaw: f32) -> f32 {
    let yaw = if yaw > 0.5 { yaw - 2.0 } else { yaw };
    yaw + 0.5
}

/// 左右の傾きの取り違えを解消する
///
/// 正なら 1 - z、負なら -1 - z、0 はそのまま。[-1, 1] 上で
/// 2回適用すると元に戻る。
pub fn fold_roll(roll: f32) -> f32 {
    if roll > 0.0 {
        1.0 - roll
    } else if roll < 0.0 {
        -1.0 - roll
    } else {
        roll
    }
}

/// 横を向くほど roll を弱める係数 (0 = そのまま, 1 = 完全に抑制)
pub fn turn_around(yaw: f32) -> f32 {
    remap(yaw.abs(), TURN_AROUND_START, TURN_AROUND_END)
}

/// 左右対称2点から得た生の向きを補正する
///
/// 1. yawの折り返し補正
/// 2. rollの左右取り違え解消
/// 3. 横向き時のroll減衰
/// 4. x軸は精度が出ないので0
pub fn correct_pair_rotation(raw: Vector3) -> Vector3 {
    let yaw = unwrap_yaw(raw.y);
    let roll = fold_roll(raw.z) * (1.0 - turn_around(yaw));
    Vector3::new(0.0, yaw, roll)
}
