use std::path::PathBuf;
use std::process::ExitCode;

use constellation::config::EngineConfig;
use constellation::error::RunError;
use constellation::raster;

const USAGE: &str = "usage: constellation [config.json] [--headless <frames> <out.png>]";

struct Args {
    config: Option<PathBuf>,
    headless: Option<(u32, PathBuf)>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config: None,
        headless: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--headless" => {
                let frames = iter
                    .next()
                    .and_then(|s| s.parse().ok())
                    .ok_or("--headless needs a frame count")?;
                let out = iter.next().ok_or("--headless needs an output path")?;
                args.headless = Some((frames, PathBuf::from(out)));
            }
            "-h" | "--help" => return Err(USAGE.into()),
            path if args.config.is_none() => args.config = Some(PathBuf::from(path)),
            other => return Err(format!("unexpected argument {}\n{}", other, USAGE)),
        }
    }
    Ok(args)
}

fn run(args: Args) -> Result<(), RunError> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    match args.headless {
        Some((frames, out)) => {
            let surface = raster::render_headless(&config, frames);
            surface.save_png(&out)?;
            log::info!("wrote {}", out.display());
            Ok(())
        }
        None => constellation::window::run(config),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
