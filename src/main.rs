//! Finger painting demo.
//!
//! ```bash
//! cargo run --release -- --source mouse
//! cargo run --release --features leapmotion -- --source leap
//! ```

use clap::Parser;
use tracing::info;

use fingerpaint_rs::{
    app::App,
    config::{Config, SourceKind},
    renderer::WindowRenderer,
    tracking::{FrameSource, MouseHand},
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fingerpaint_rs=info,fingerpaint=info".into()),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let mut source = open_source(config.source)?;
    let mut renderer = WindowRenderer::new(
        "fingerpaint",
        config.window_width,
        config.window_height,
        config.plane_height,
        config.target_fps,
    )?;

    info!(
        source = ?config.source,
        buffer_width = config.buffer_width,
        buffer_height = config.buffer_height,
        "painting; Space = rotate, C = clear, Esc = quit"
    );

    let mut app = App::new(&config);
    app.run(source.as_mut(), &mut renderer)?;
    Ok(())
}

fn open_source(kind: SourceKind) -> anyhow::Result<Box<dyn FrameSource>> {
    match kind {
        SourceKind::Mouse => Ok(Box::new(MouseHand::new())),
        #[cfg(feature = "leapmotion")]
        SourceKind::Leap => {
            use anyhow::Context as _;
            let leap = fingerpaint_rs::tracking::LeapSource::open()
                .context("opening LeapC connection")?;
            Ok(Box::new(leap))
        }
        #[cfg(not(feature = "leapmotion"))]
        SourceKind::Leap => {
            anyhow::bail!("built without LeapC support; rebuild with `--features leapmotion`")
        }
    }
}
