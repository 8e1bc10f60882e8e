use std::path::Path;

use hlshash_engine::{
    ArtifactKind, ContentHash, ConverterConfig, DirectorySink, OnEvent, PlaylistConverter,
};
use tracing::info;

use super::attach_events;
use crate::error::AppError;
use crate::output::ReportingSink;

/// Convert the tree at `input` into `output`, printing each stored file
pub async fn run_convert(
    input: &str,
    output: &Path,
    config: ConverterConfig,
    on_event: Option<OnEvent>,
) -> Result<ContentHash, AppError> {
    tokio::fs::create_dir_all(output).await?;

    let converter = attach_events(PlaylistConverter::new(config)?, on_event);
    let root = output.to_path_buf();
    let sink = ReportingSink::new(
        DirectorySink::new(output),
        Box::new(move |path: &str, _len: usize| {
            info!("{}", root.join(path).display());
        }),
    );

    let hash = converter.convert(input, &sink).await?;
    let master = output.join(hash.file_name(ArtifactKind::Playlist));
    info!("Root playlist: {}", master.display());
    println!("{}", master.display());
    Ok(hash)
}
