use hlshash_engine::ConvertEvent;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc, time::Duration};

fn segment_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} {msg}\n[{elapsed_precise}] [{bar:40.green/white}] {pos}/{len} segments")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

fn variant_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

#[derive(Default)]
struct Bars {
    /// Media playlists being converted, keyed by locator
    playlists: HashMap<String, ProgressBar>,
    /// The media playlist segment events belong to. Variants are converted
    /// one at a time so there is at most one.
    active: Option<String>,
    variants: Option<ProgressBar>,
    bytes: u64,
}

#[derive(Clone)]
pub struct ProgressManager {
    multi: MultiProgress,
    bars: Arc<Mutex<Bars>>,
    disabled: bool,
}

impl ProgressManager {
    pub fn new(multi: MultiProgress) -> Self {
        Self {
            multi,
            bars: Arc::new(Mutex::new(Bars::default())),
            disabled: false,
        }
    }

    pub fn new_disabled(multi: MultiProgress) -> Self {
        Self {
            multi,
            bars: Arc::new(Mutex::new(Bars::default())),
            disabled: true,
        }
    }

    pub fn handle_event(&self, event: ConvertEvent) {
        if self.disabled {
            return;
        }

        let mut bars = self.bars.lock();
        match event {
            ConvertEvent::PlaylistStarted {
                locator, segments, ..
            } if segments > 0 => {
                let bar = self.multi.add(ProgressBar::new(segments as u64));
                bar.set_style(segment_style());
                bar.set_message(format!("Converting {locator}"));
                bar.enable_steady_tick(Duration::from_millis(500));
                bars.bytes = 0;
                bars.active = Some(locator.clone());
                bars.playlists.insert(locator, bar);
            }
            ConvertEvent::PlaylistStarted { .. } => {}
            ConvertEvent::VariantStarted {
                index,
                total,
                label,
                ..
            } => {
                let bar = bars.variants.get_or_insert_with(|| {
                    let bar = self.multi.add(ProgressBar::new_spinner());
                    bar.set_style(variant_style());
                    bar.enable_steady_tick(Duration::from_millis(200));
                    bar
                });
                bar.set_message(format!("Variant {index}/{total}: {label}"));
            }
            ConvertEvent::SegmentStored { total, bytes, .. } => {
                bars.bytes += bytes;
                let stored = bars.bytes;
                let bar = bars
                    .active
                    .as_ref()
                    .and_then(|locator| bars.playlists.get(locator));
                if let Some(bar) = bar {
                    // Repeated references are stored once
                    bar.set_length(total as u64);
                    bar.inc(1);
                    bar.set_message(format!("Stored {}", indicatif::HumanBytes(stored)));
                }
            }
            ConvertEvent::PlaylistStored {
                locator,
                depth,
                file_name,
                ..
            } => {
                if let Some(bar) = bars.playlists.remove(&locator) {
                    bar.finish_with_message(format!("{locator} -> {file_name}"));
                }
                if bars.active.as_deref() == Some(locator.as_str()) {
                    bars.active = None;
                }
                if depth == 0 {
                    if let Some(bar) = bars.variants.take() {
                        bar.finish_and_clear();
                    }
                }
            }
        }
    }
}
