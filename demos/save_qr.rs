//! Save a QR code into a scratch folder
//!
//! Usage: cargo run --example save_qr -- [TEXT]

use qrstash::{NoopOpener, OsFileSystem, OutputLocation, QrEncoder, QrStash, RenderOptions};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let text = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Hello from qrstash!".to_string());

    let stash = QrStash::new(
        OutputLocation::new(std::env::temp_dir(), "qrstash-demo"),
        "demo_",
        "png",
        QrEncoder::new(RenderOptions::default()),
        OsFileSystem,
        Box::new(NoopOpener),
    );

    let saved = stash.save(&text)?;
    println!("✓ QR code saved to {}", saved.path.display());
    println!("  {}x{} px, version {}", saved.width, saved.height, saved.version);
    println!("{}", saved.preview);

    Ok(())
}
