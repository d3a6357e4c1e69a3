use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use jpg2ico::cli::{Cli, Commands, ConvertArgs};
use jpg2ico::{Converter, IconDir, ImageCodec, logger};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logger::init(cli.verbose).context("failed to initialise logging")?;

    let code = match cli.command {
        None => convert(ConvertArgs::default()),
        Some(Commands::Convert(args)) => convert(args),
        Some(Commands::Inspect { file }) => inspect(&file),
    };
    Ok(code)
}

fn convert(args: ConvertArgs) -> ExitCode {
    let converter = Converter::new(ImageCodec::new(args.filter.into())).with_sizes(args.sizes);
    tracing::debug!(source = %args.source.display(), sizes = %converter.sizes(), filter = ?args.filter, "starting conversion");
    let outcome = converter.run(&args.source, &args.destination);
    if args.strict && !outcome.is_success() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn inspect(file: &Path) -> ExitCode {
    let dir = match std::fs::read(file) {
        Ok(bytes) => IconDir::parse(&bytes).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    match dir {
        Ok(dir) => {
            println!("{}: {} image(s)", file.display(), dir.len());
            for entry in &dir.entries {
                println!("  {}", entry);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("Cannot read '{}': {}", file.display(), e);
            ExitCode::FAILURE
        }
    }
}
