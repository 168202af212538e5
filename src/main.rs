use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use lightway::{Options, Viewer};

/// Light-tunnel scene viewer.
#[derive(Debug, Parser)]
#[command(name = "lightway", version, about)]
struct Args {
    /// Binary glTF model to load (defaults to the preset's model path).
    model: Option<String>,

    /// TOML options preset.
    #[arg(long, value_name = "FILE")]
    preset: Option<PathBuf>,

    /// Print the options JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
}

fn run(args: Args) -> Result<(), lightway::LightwayError> {
    if args.print_schema {
        let schema = serde_json::to_string_pretty(&Options::json_schema())
            .map_err(|e| lightway::LightwayError::OptionsParse(e.to_string()))?;
        println!("{schema}");
        return Ok(());
    }

    let options = match &args.preset {
        Some(path) => {
            log::info!("loading preset {}", path.display());
            Options::load(path)?
        }
        None => Options::default(),
    };

    let mut builder = Viewer::builder().with_options(options);
    if let Some(model) = args.model {
        builder = builder.with_model(model);
    }
    builder.build().run()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
