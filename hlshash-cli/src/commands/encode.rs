use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::AppError;

/// One rung of the output ladder
struct Rendition {
    width: u32,
    height: u32,
    video_kbps: u32,
    max_kbps: u32,
    buffer_kbps: u32,
    audio_kbps: u32,
}

const LADDER: [Rendition; 3] = [
    Rendition {
        width: 1920,
        height: 1080,
        video_kbps: 5000,
        max_kbps: 5350,
        buffer_kbps: 7500,
        audio_kbps: 192,
    },
    Rendition {
        width: 1280,
        height: 720,
        video_kbps: 2800,
        max_kbps: 2996,
        buffer_kbps: 4200,
        audio_kbps: 128,
    },
    Rendition {
        width: 854,
        height: 480,
        video_kbps: 1400,
        max_kbps: 1498,
        buffer_kbps: 2100,
        audio_kbps: 96,
    },
];

const SEGMENT_SECONDS: u32 = 10;

pub const MASTER_PLAYLIST: &str = "master.m3u8";

fn filter_graph() -> String {
    let outputs: String = (1..=LADDER.len()).map(|i| format!("[v{i}]")).collect();
    let mut graph = format!("[0:v]split={}{outputs}", LADDER.len());
    for (i, rendition) in LADDER.iter().enumerate() {
        graph.push_str(&format!(
            ";[v{n}]scale=w={w}:h={h}[v{n}out]",
            n = i + 1,
            w = rendition.width,
            h = rendition.height
        ));
    }
    graph
}

fn var_stream_map() -> String {
    (0..LADDER.len())
        .map(|i| format!("v:{i},a:{i}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Arguments for an ffmpeg run writing `master.m3u8`,
/// `stream_<n>/playlist.m3u8` and `stream_<n>/data<NNN>.ts` below `output`
pub fn ffmpeg_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-i".into(), input.into()];
    args.push("-filter_complex".into());
    args.push(filter_graph().into());

    for (i, rendition) in LADDER.iter().enumerate() {
        args.extend(
            [
                "-map".to_string(),
                format!("[v{}out]", i + 1),
                format!("-c:v:{i}"),
                "libx264".to_string(),
                format!("-b:v:{i}"),
                format!("{}k", rendition.video_kbps),
                format!("-maxrate:v:{i}"),
                format!("{}k", rendition.max_kbps),
                format!("-bufsize:v:{i}"),
                format!("{}k", rendition.buffer_kbps),
            ]
            .map(OsString::from),
        );
    }

    for (i, rendition) in LADDER.iter().enumerate() {
        args.extend(
            [
                "-map".to_string(),
                "a:0".to_string(),
                "-c:a".to_string(),
                "aac".to_string(),
                format!("-b:a:{i}"),
                format!("{}k", rendition.audio_kbps),
                "-ac".to_string(),
                "2".to_string(),
            ]
            .map(OsString::from),
        );
    }

    let segment_seconds = SEGMENT_SECONDS.to_string();
    args.extend(
        [
            "-f",
            "hls",
            "-hls_time",
            segment_seconds.as_str(),
            "-hls_playlist_type",
            "vod",
            "-hls_flags",
            "independent_segments",
            "-hls_segment_type",
            "mpegts",
        ]
        .map(OsString::from),
    );

    args.push("-hls_segment_filename".into());
    args.push(output.join("stream_%v").join("data%03d.ts").into());
    // Relative to the parent of the per-variant directories
    args.push("-master_pl_name".into());
    args.push(MASTER_PLAYLIST.into());
    args.push("-var_stream_map".into());
    args.push(var_stream_map().into());
    args.push(output.join("stream_%v").join("playlist.m3u8").into());

    args
}

/// Encode `input` into an HLS ladder below `output` and return the path of
/// the master playlist
pub async fn encode_hls(ffmpeg: &str, input: &Path, output: &Path) -> Result<PathBuf, AppError> {
    if !input.is_file() {
        return Err(AppError::InvalidInput(format!(
            "Input video not found: {}",
            input.display()
        )));
    }
    tokio::fs::create_dir_all(output).await?;

    let args = ffmpeg_args(input, output);
    debug!("Running {} {:?}", ffmpeg, args);
    info!(
        "Encoding {} into {} renditions at {}",
        input.display(),
        LADDER.len(),
        output.display()
    );

    let status = Command::new(ffmpeg)
        .args(&args)
        .stdin(Stdio::null())
        .status()
        .await
        .map_err(|e| AppError::Encoder(format!("Failed to run {ffmpeg}: {e}")))?;

    if !status.success() {
        return Err(AppError::Encoder(format!("{ffmpeg} exited with {status}")));
    }

    let master = output.join(MASTER_PLAYLIST);
    info!("Encoding finished, master playlist at {}", master.display());
    Ok(master)
}
