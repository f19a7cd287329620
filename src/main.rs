use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use pose_rig::config::Config;
use pose_rig::{LandmarkPose, PoseSolver};

const CONFIG_PATH: &str = "pose-rig.toml";

/// ランドマーク列 (JSON lines) をリグ回転 (JSON lines) に変換する
#[derive(Parser, Debug)]
#[command(name = "pose-rig", version = env!("GIT_VERSION"), about, long_about = None)]
struct Cli {
    /// 設定ファイル
    #[arg(short, long, default_value = CONFIG_PATH)]
    config: PathBuf,

    /// 入力ファイル (省略時は標準入力)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// 腰と背骨だけを出力
    #[arg(long)]
    hips_only: bool,

    /// 整形して出力
    #[arg(long)]
    pretty: bool,

    /// デバッグログ
    #[arg(short, long)]
    verbose: bool,
}

/// 入力1行分
#[derive(Debug, Deserialize)]
struct Frame {
    pose3d: Vec<Vec<f32>>,
    pose2d: Vec<Vec<f32>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 標準出力はデータ用。ログは標準エラーへ
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("pose-rig {}", env!("GIT_VERSION"));

    let config = Config::load_or_default(&cli.config);
    let solver = PoseSolver::from_config(&config.solver)?;
    let solver_config = solver.config();
    info!(
        "runtime={:?} legs={} image={}x{}",
        solver_config.runtime,
        solver_config.enable_legs,
        solver_config.image_width,
        solver_config.image_height
    );

    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = run(&solver, &cli, reader, &mut out)?;

    info!("solved {} frames, skipped {}", summary.solved, summary.skipped);
    Ok(())
}

/// 処理したフレーム数
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    solved: usize,
    skipped: usize,
}

/// 1行1フレームで読み、解けた行だけを出力する
///
/// 壊れた行 (UTF-8でない、JSONでない、ランドマーク不足) は警告して飛ばす。
fn run<R: BufRead, W: Write>(solver: &PoseSolver, cli: &Cli, mut reader: R, out: &mut W) -> Result<Summary> {
    let mut summary = Summary::default();
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let result = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => solve_line(solver, line, cli),
            Err(e) => Err(e).context("invalid UTF-8"),
        };
        match result {
            Ok(json) => {
                writeln!(out, "{}", json)?;
                summary.solved += 1;
            }
            Err(e) => {
                warn!("line {}: {:#}", line_no, e);
                summary.skipped += 1;
            }
        }
    }
    out.flush()?;
    Ok(summary)
}

fn solve_line(solver: &PoseSolver, line: &str, cli: &Cli) -> Result<String> {
    let frame: Frame = serde_json::from_str(line).context("malformed frame")?;
    let pose3d = LandmarkPose::from_rows(&frame.pose3d).context("pose3d")?;
    let pose2d = LandmarkPose::from_rows_2d(&frame.pose2d).context("pose2d")?;
    debug!("frame: {} landmarks (3d), {} (2d)", pose3d.len(), pose2d.len());

    let json = if cli.hips_only {
        let rig = solver.solve_hips(&pose3d, &pose2d);
        to_json(&rig, cli.pretty)?
    } else {
        let rig = solver.solve(&pose3d, &pose2d)?;
        to_json(&rig, cli.pretty)?
    };
    Ok(json)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
