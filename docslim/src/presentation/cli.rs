use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "docslim: shrink images embedded in .docx files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert opaque images in a .docx to scaled JPEG and write a new .docx
    Convert {
        input: PathBuf,

        /// output path (defaults to <output-dir>/converted_<name>)
        #[arg(long)]
        out: Option<PathBuf>,

        /// directory for the default output path
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,

        /// settings file with an [ImageSettings] section (defaults to ./settings.cfg when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// JPEG quality 1-100 (overrides the settings file)
        #[arg(long)]
        quality: Option<u8>,

        /// output density in pixels per inch (overrides the settings file)
        #[arg(long)]
        dpi: Option<u32>,

        /// physical width images are scaled to, in inches
        #[arg(long)]
        width_inches: Option<u32>,

        /// parent directory for the temporary working tree
        #[arg(long)]
        scratch: Option<PathBuf>,
    },

    /// List media entries and how a conversion would treat them
    Inspect { input: PathBuf },

    /// Prompt for files to convert until `exit`
    Shell {
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
    },
}
