// Terminal layer: a spinner while requests are in flight, optional prompts
// for the metadata fields, and the closing summary on stdout.

use crate::pipeline::{AssetRequest, PinnedAsset};
use anyhow::Result;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

/// Spinner drawn on stderr, idle until [`start_spinner`]. Hidden
/// automatically when stderr is not a terminal.
pub fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner
}

pub fn start_spinner(spinner: &ProgressBar, message: &'static str) {
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
}

/// Log sink for the fmt layer: clears the spinner line, writes to stdout,
/// then lets the spinner redraw.
#[derive(Clone)]
pub struct SuspendingWriter {
    bar: ProgressBar,
}

impl SuspendingWriter {
    pub fn new(bar: ProgressBar) -> Self {
        SuspendingWriter { bar }
    }
}

impl Write for SuspendingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bar.suspend(|| io::stdout().lock().write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.bar.suspend(|| io::stdout().lock().flush())
    }
}

/// Ask for name and description, pre-filled with the configured values.
pub fn prompt_asset(asset: AssetRequest) -> Result<AssetRequest> {
    let name: String = Input::new()
        .with_prompt("Name")
        .with_initial_text(asset.name)
        .interact_text()?;
    let description: String = Input::new()
        .with_prompt("Description")
        .with_initial_text(asset.description)
        .interact_text()?;

    Ok(AssetRequest {
        name,
        description,
        ..asset
    })
}

/// `ipfs://<hash>` -> `<gateway>/ipfs/<hash>`. Other URIs pass through.
pub fn gateway_link(uri: &str, gateway: &str) -> String {
    match uri.strip_prefix("ipfs://") {
        Some(hash) => format!("{}/ipfs/{}", gateway.trim_end_matches('/'), hash),
        None => uri.to_string(),
    }
}

pub fn print_summary(pinned: &PinnedAsset, gateway: &str) {
    println!("Image:    {}", pinned.image_uri);
    println!("Metadata: {}", pinned.metadata_uri);
    println!("Gateway:  {}", gateway_link(&pinned.metadata_uri, gateway));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suspending_writer_passes_bytes_through() {
        let bar = ProgressBar::hidden();
        let mut writer = SuspendingWriter::new(bar.clone());
        assert_eq!(writer.write(b"INFO Pushed image to IPFS\n").unwrap(), 26);
        writer.flush().unwrap();
        assert!(!bar.is_finished());
    }

    #[test]
    fn gateway_link_rewrites_ipfs_uris() {
        assert_eq!(
            gateway_link("ipfs://QmAbc", "https://gateway.pinata.cloud/"),
            "https://gateway.pinata.cloud/ipfs/QmAbc"
        );
        assert_eq!(
            gateway_link("https://example.com/x", "https://gateway.pinata.cloud"),
            "https://example.com/x"
        );
    }
}
