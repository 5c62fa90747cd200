pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use clap::Parser;
use docslim_core::Result;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Convert {
            input,
            out,
            output_dir,
            config,
            quality,
            dpi,
            width_inches,
            scratch,
        } => handlers::handle_convert(
            input,
            out,
            output_dir,
            config,
            handlers::Overrides {
                quality,
                dpi,
                width_inches,
                scratch,
            },
        ),
        Commands::Inspect { input } => handlers::handle_inspect(input),
        Commands::Shell { config, output_dir } => handlers::handle_shell(config, output_dir),
    }
}
