use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Define CLI arguments
#[derive(Parser)]
#[command(
    version,
    about = "Content-addressed HLS playlist converter",
    long_about = "Rewrites an HLS playlist tree so that every segment and sub-playlist is\n\
                  named by the SHA-256 of its content (<hash>.ts, <hash>.m3u8).\n\
                  \n\
                  Trees can be read from a local path or an HTTP(S) URL and written to a\n\
                  directory or uploaded to an HTTP server with PUT."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true, help = "Enable detailed debug logging")]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "FILE", help = "Copy log output to a file")]
    pub log_file: Option<PathBuf>,

    /// Show progress bars for operations
    #[arg(
        short = 'P',
        long = "progress",
        global = true,
        default_value = "false",
        help = "Show progress bars while segments are converted"
    )]
    pub show_progress: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Rename every playlist and segment to its SHA-256 and write the result to a directory
    Convert {
        /// A URL or path to the .m3u8 file
        input: String,

        /// Folder to output HLS playlists and chunks
        #[arg(default_value = "output")]
        output: PathBuf,

        #[command(flatten)]
        network: NetworkArgs,
    },

    /// Convert a playlist tree and upload every artifact to an HTTP server with PUT
    Upload {
        /// A URL or path to the .m3u8 file
        input: String,

        /// Base URL artifacts are uploaded below
        server: String,

        #[command(flatten)]
        network: NetworkArgs,
    },

    /// Encode a video file into a three-rendition HLS ladder with ffmpeg
    Encode {
        /// The video file
        input: PathBuf,

        /// Folder to output HLS playlists and chunks
        #[arg(default_value = "output")]
        output: PathBuf,

        /// ffmpeg executable to run
        #[arg(long, default_value = "ffmpeg")]
        ffmpeg: String,
    },
}

/// Options shared by every command that talks to the network
#[derive(Args, Debug, Clone)]
pub struct NetworkArgs {
    /// Overall timeout in seconds
    #[arg(
        long,
        default_value = "60",
        help = "Overall timeout in seconds for HTTP requests (0 disables)"
    )]
    pub timeout: u64,

    /// Connection timeout in seconds
    #[arg(
        long,
        default_value = "10",
        help = "Connection timeout in seconds (time to establish initial connection)"
    )]
    pub connect_timeout: u64,

    /// Read timeout in seconds
    #[arg(
        long,
        default_value = "120",
        help = "Maximum time in seconds to read one playlist or segment (0 disables)"
    )]
    pub read_timeout: u64,

    /// Custom HTTP headers
    #[arg(
        long = "header",
        short = 'H',
        help = "Add custom HTTP header to requests (can be used multiple times). Format: 'Name: Value'",
        value_name = "HEADER"
    )]
    pub headers: Vec<String>,

    /// Proxy URL (e.g., "http://proxy.example.com:8080")
    #[arg(
        long,
        help = "Proxy server URL (e.g., \"http://proxy.example.com:8080\")"
    )]
    pub proxy: Option<String>,

    /// Proxy type (http, https, socks5, all)
    #[arg(
        long,
        default_value = "http",
        help = "Proxy type (http, https, socks5, all)",
        value_parser = ["http", "https", "socks5", "all"]
    )]
    pub proxy_type: String,

    /// Proxy username
    #[arg(long, help = "Username for proxy authentication")]
    pub proxy_user: Option<String>,

    /// Proxy password
    #[arg(long, help = "Password for proxy authentication")]
    pub proxy_pass: Option<String>,

    /// Disable all proxy settings
    #[arg(
        long,
        help = "Disable all proxy settings (including system proxy)"
    )]
    pub no_proxy: bool,

    /// Number of segments converted at once
    #[arg(
        long,
        default_value = "4",
        help = "Maximum number of segments of one playlist fetched and stored concurrently"
    )]
    pub concurrency: usize,

    /// Maximum playlist nesting
    #[arg(
        long,
        default_value = "8",
        help = "Maximum nesting of sub-playlists below the root playlist"
    )]
    pub max_depth: usize,
}
