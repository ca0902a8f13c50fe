//! Print the extracted features of the default microphone as a text meter.
use vis_core::analyzer;

fn main() {
    vis_core::default_log();
    vis_core::default_config();

    let mut frames = vis_core::Visualizer::new()
        .analyser(
            analyzer::AnalyserBuilder::new()
                .window(analyzer::window::blackman)
                .clone(),
        )
        .frames();

    if let Err(e) = frames.extractor_mut().activate() {
        eprintln!("{}", e);
        return;
    }

    for frame in frames.iter() {
        frame.info(|snapshot| {
            let f = snapshot.map(|s| s.features()).unwrap_or_default();
            let meter: String = analyzer::signal_segments(f.volume)
                .iter()
                .map(|lit| if *lit { '#' } else { '.' })
                .collect();

            println!(
                "[{}] vol {:.2}  bass {:.2}  mid {:.2}  treble {:.2}",
                meter, f.volume, f.bass, f.mid, f.treble
            );
        });

        std::thread::sleep(std::time::Duration::from_millis(16));
    }
}
