//! mic-canvas - paint what the microphone hears
//!
//! Space starts and stops listening, 1/2/3 (or Tab) switch between the pure, cubic and waves
//! modes, Up/Down change the sensitivity.

mod app;
mod cli;
mod present;

use anyhow::Context;
use clap::Parser;
use mic_canvas::Renderer;
use std::time::Duration;
use vis_core::analyzer;
use winit::event_loop::EventLoop;

/// Pace of the headless loop, roughly one display refresh
const HEADLESS_FRAME: Duration = Duration::from_millis(16);

fn headless(args: &cli::Args, mut frames: vis_core::Frames) -> anyhow::Result<()> {
    let (width, height) = args.size();
    let engine = args.engine_config();
    let mut renderer = Renderer::new(width, height);

    let stop = frames.stop_handle();
    let last = args.frames.max(1) - 1;

    for frame in frames.iter() {
        renderer.render(frame.snapshot(), args.mode, &engine, frame.time);

        let f = frame
            .snapshot()
            .map(|s| s.features().scaled(&engine))
            .unwrap_or_default();
        let meter: String = analyzer::signal_segments(f.volume)
            .iter()
            .map(|lit| if *lit { '#' } else { '.' })
            .collect();
        println!(
            "{:5} [{}] vol {:.2}  bass {:.2}  mid {:.2}  treble {:.2}",
            frame.frame, meter, f.volume, f.bass, f.mid, f.treble
        );

        if frame.frame >= last {
            stop.stop();
        } else {
            std::thread::sleep(HEADLESS_FRAME);
        }
    }

    if let Some(path) = &args.png {
        renderer
            .surface()
            .pixmap()
            .save_png(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Wrote last frame to {}", path.display());
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    vis_core::default_log();
    vis_core::default_config();

    let args = cli::Args::parse();
    log::debug!("{:?}", args);

    let mut frames = vis_core::Visualizer::new().frames();
    if args.capture {
        // Denied or missing microphones leave capture off, the canvas still runs
        if let Err(e) = frames.extractor_mut().activate() {
            log::error!("Can't start listening: {}", e);
        }
    }

    if args.headless {
        return headless(&args, frames);
    }

    let mut app = app::App::new(frames, args.mode, args.engine_config(), args.size());
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.run_app(&mut app).context("Event loop failed")?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
