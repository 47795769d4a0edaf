use indicatif::{ProgressBar, ProgressStyle};

/// Single bar mirroring the feed's row count, advanced once per record.
pub fn sync_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    let style = ProgressStyle::with_template(
        "Progress |{bar:40}| {percent}% || {pos}/{len} products",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█░");
    bar.set_style(style);
    bar
}
