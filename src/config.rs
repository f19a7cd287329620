use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub solver: SolverConfig,
}

/// 2Dランドマークの座標系
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    /// 正規化座標 (0.0〜1.0)
    #[default]
    Mediapipe,
    /// ピクセル座標。画像サイズで割って正規化する
    Tfjs,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolverConfig {
    #[serde(default)]
    pub runtime: Runtime,
    /// 画像幅（ピクセル、tfjsのみ使用）
    #[serde(default = "default_image_width")]
    pub image_width: u32,
    /// 画像高さ（ピクセル、tfjsのみ使用）
    #[serde(default = "default_image_height")]
    pub image_height: u32,
    /// 脚を計算するか
    #[serde(default = "default_enable_legs")]
    pub enable_legs: bool,
    /// 手首の可視度がこれ未満なら腕を休止姿勢にする
    #[serde(default = "default_hand_visibility")]
    pub hand_visibility: f32,
    /// 3D手首が腰のラインからこれ以上下がったら休止姿勢にする
    #[serde(default = "default_hand_drop")]
    pub hand_drop: f32,
    /// 膝の可視度がこれ未満なら脚を休止姿勢にする
    #[serde(default = "default_leg_visibility")]
    pub leg_visibility: f32,
    /// 2D座標のyがこれを超えたら画面外
    #[serde(default = "default_screen_bottom")]
    pub screen_bottom: f32,
}

fn default_image_width() -> u32 { 640 }
fn default_image_height() -> u32 { 480 }
fn default_enable_legs() -> bool { true }
fn default_hand_visibility() -> f32 { 0.23 }
fn default_hand_drop() -> f32 { 0.1 }
fn default_leg_visibility() -> f32 { 0.63 }
fn default_screen_bottom() -> f32 { 0.995 }

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            runtime: Runtime::default(),
            image_width: default_image_width(),
            image_height: default_image_height(),
            enable_legs: default_enable_legs(),
            hand_visibility: default_hand_visibility(),
            hand_drop: default_hand_drop(),
            leg_visibility: default_leg_visibility(),
            screen_bottom: default_screen_bottom(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// 読めなければデフォルト設定
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}; using default config", e);
                Self::default()
            }
        }
    }
}
