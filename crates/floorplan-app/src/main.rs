//! Command-line entry point.
//!
//! `floorplan [--config path] [--shortcuts] [script.json]`

use floorplan_app::{AppConfig, AppError, Step, load_script};
use std::path::PathBuf;

struct Args {
    config: Option<PathBuf>,
    script: Option<PathBuf>,
    shortcuts: bool,
}

fn parse_args() -> Result<Args, AppError> {
    let mut args = Args {
        config: None,
        script: None,
        shortcuts: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = iter
                    .next()
                    .ok_or_else(|| AppError::Usage("--config needs a path".to_string()))?;
                args.config = Some(PathBuf::from(path));
            }
            "--shortcuts" => args.shortcuts = true,
            flag if flag.starts_with('-') => {
                return Err(AppError::Usage(format!("unknown option {}", flag)));
            }
            _ if args.script.is_none() => args.script = Some(PathBuf::from(arg)),
            _ => return Err(AppError::Usage("only one script may be given".to_string())),
        }
    }
    Ok(args)
}

fn try_main() -> Result<(), AppError> {
    let args = parse_args()?;
    if args.shortcuts {
        floorplan_core::shortcuts::log_all();
    }

    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let steps: Vec<Step> = match &args.script {
        Some(path) => load_script(path)?,
        None => Vec::new(),
    };

    floorplan_app::run(&config, &steps)?;
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Starting floor plan editor");

    if let Err(err) = try_main() {
        log::error!("{}", err);
        eprintln!("floorplan: {}", err);
        std::process::exit(1);
    }
}
