//! ソルバー境界での入力検証エラー

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RigError {
    /// 配列からベクトルを作るのに要素数が足りない
    #[error("array too short: need {expected} values, got {got}")]
    ShortArray { expected: usize, got: usize },

    /// ランドマーク数が必要なインデックスに届かない
    #[error("pose has {got} landmarks, need at least {required}")]
    MissingLandmarks { required: usize, got: usize },

    /// tfjs入力の正規化に使う画像サイズが不正
    #[error("invalid image size {width}x{height}")]
    InvalidImageSize { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, RigError>;
