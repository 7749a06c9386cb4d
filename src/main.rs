use std::env;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use speedview::{AttributeSet, DeluxeSpeedView, GaugeCommand, Typeface, WindowConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

struct Args {
    font: Option<PathBuf>,
    attrs: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        font: None,
        attrs: None,
    };
    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--font" => args.font = iter.next().map(PathBuf::from),
            "--attrs" => args.attrs = iter.next().map(PathBuf::from),
            "-h" | "--help" => {
                return Err("usage: speedview [--font PATH] [--attrs PATH]".to_string());
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging();
    let args = parse_args()?;

    let mut view = DeluxeSpeedView::new();
    if let Some(path) = args.attrs {
        let attrs = AttributeSet::from_file(&path)?;
        tracing::info!(path = %path.display(), "applying style attributes");
        view.apply_attributes(&attrs);
    }
    match args.font {
        Some(path) => {
            let face = Typeface::from_file(&path)?;
            view.gauge_mut().set_typeface(Some(Arc::new(face)));
        }
        None => tracing::warn!("no --font given, text is not drawn"),
    }
    view.gauge_mut().set_tick_number(9);

    let (sender, receiver) = mpsc::channel();

    // Random target speeds, with the effects flipped now and then
    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let mut commands = vec![GaugeCommand::SpeedTo(rng.random_range(0.0..100.0))];
            if rng.random_range(0.0..1.0) < 0.05 {
                commands.push(GaugeCommand::SetWithEffects(rng.random_bool(0.5)));
            }
            if commands.into_iter().any(|cmd| sender.send(cmd).is_err()) {
                break;
            }
            thread::sleep(Duration::from_millis(1500));
        }
    });

    tracing::info!("displaying deluxe speedometer, close the window to exit");
    view.show_with_commands(WindowConfig::default(), receiver)?;
    Ok(())
}
