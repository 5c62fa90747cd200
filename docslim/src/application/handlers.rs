use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use docslim_core::{
    ConvertOptions, DocError, Result, SizeStats, convert, list_media, load_settings,
};
use tracing::debug;

const DEFAULT_SETTINGS: &str = "settings.cfg";

/// Command-line values that take precedence over the settings file.
#[derive(Default)]
pub struct Overrides {
    pub quality: Option<u8>,
    pub dpi: Option<u32>,
    pub width_inches: Option<u32>,
    pub scratch: Option<PathBuf>,
}

pub fn resolve_options(config: Option<&Path>, overrides: Overrides) -> Result<ConvertOptions> {
    let mut opts = ConvertOptions::default();
    match config {
        Some(path) => opts = load_settings(path)?.apply_to(opts)?,
        None => {
            let fallback = Path::new(DEFAULT_SETTINGS);
            if fallback.is_file() {
                opts = load_settings(fallback)?.apply_to(opts)?;
            } else {
                debug!("no {DEFAULT_SETTINGS}; using built-in image settings");
            }
        }
    }
    if let Some(q) = overrides.quality {
        opts.quality = q;
    }
    if let Some(d) = overrides.dpi {
        opts.dpi = d;
    }
    if let Some(w) = overrides.width_inches {
        opts.width_inches = w;
    }
    opts.scratch_root = overrides.scratch;
    opts.validate()?;
    Ok(opts)
}

/// Accept only existing files with a `.docx` extension.
pub fn validate_input(input: &Path) -> Result<()> {
    if !input.is_file() {
        return Err(DocError::InvalidInput(format!(
            "the file '{}' does not exist",
            input.display()
        )));
    }
    let is_docx = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("docx"));
    if !is_docx {
        return Err(DocError::InvalidInput(format!(
            "the file '{}' is not a .docx file",
            input.display()
        )));
    }
    Ok(())
}

pub fn default_output(input: &Path, output_dir: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.docx".to_string());
    output_dir.join(format!("converted_{name}"))
}

pub fn size_report(stats: &SizeStats) -> String {
    format!(
        "Original file size: {:.2} KB\nConverted file size: {:.2} KB\nSpace saved: {:.2} KB ({:.2}% reduction)",
        stats.original_bytes as f64 / 1024.0,
        stats.converted_bytes as f64 / 1024.0,
        stats.saved_bytes() as f64 / 1024.0,
        stats.reduction_pct()
    )
}

fn convert_one(input: &Path, out: &Path, opts: &ConvertOptions, w: &mut dyn Write) -> Result<()> {
    validate_input(input)?;
    writeln!(w, "Converting images in the document...")?;
    let report = convert(input, out, opts)?;
    writeln!(
        w,
        "File has been successfully converted and saved as: {}",
        out.display()
    )?;
    writeln!(
        w,
        "Images converted: {} (transparent: {}, unrecognized: {}, failed: {})",
        report.converted,
        report.skipped_transparent,
        report.skipped_unrecognized,
        report.failed.len()
    )?;
    let stats = SizeStats::from_paths(input, out)?;
    writeln!(w, "{}", size_report(&stats))?;
    Ok(())
}

pub fn handle_convert(
    input: PathBuf,
    out: Option<PathBuf>,
    output_dir: PathBuf,
    config: Option<PathBuf>,
    overrides: Overrides,
) -> Result<()> {
    let opts = resolve_options(config.as_deref(), overrides)?;
    let out = out.unwrap_or_else(|| default_output(&input, &output_dir));
    let mut stdout = std::io::stdout().lock();
    convert_one(&input, &out, &opts, &mut stdout)
}

pub fn handle_inspect(input: PathBuf) -> Result<()> {
    let rows = list_media(&input)?;
    if rows.is_empty() {
        println!("no media entries");
    }
    for r in rows {
        let dims = r
            .dimensions
            .map(|(w, h)| format!("{w}x{h}"))
            .unwrap_or_else(|| "-".to_string());
        println!("{:<40} {:>10} bytes  {:>11}  {}", r.path, r.size, dims, r.class);
    }
    Ok(())
}

pub fn handle_shell(config: Option<PathBuf>, output_dir: PathBuf) -> Result<()> {
    let opts = resolve_options(config.as_deref(), Overrides::default())?;
    let stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    run_shell(stdin, &mut stdout, &opts, &output_dir)
}

fn prompt(input: &mut impl BufRead, w: &mut dyn Write, msg: &str) -> Result<Option<String>> {
    write!(w, "{msg}")?;
    w.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Interactive loop: ask for a path, convert it, offer another round.
pub fn run_shell(
    mut input: impl BufRead,
    w: &mut dyn Write,
    opts: &ConvertOptions,
    output_dir: &Path,
) -> Result<()> {
    loop {
        let Some(path) = prompt(
            &mut input,
            w,
            "Enter the path to the .docx file (or type 'exit' to quit): ",
        )?
        else {
            break;
        };
        if path.eq_ignore_ascii_case("exit") {
            break;
        }

        let src = PathBuf::from(&path);
        if let Err(e) = validate_input(&src) {
            writeln!(w, "Error: {e}. Please try again.")?;
            continue;
        }
        let out = default_output(&src, output_dir);
        if let Err(e) = convert_one(&src, &out, opts, w) {
            writeln!(w, "File conversion failed: {e}")?;
        }

        match prompt(&mut input, w, "Would you like to convert another file? (y/n): ")? {
            Some(a) if a.eq_ignore_ascii_case("y") => {}
            _ => break,
        }
    }
    writeln!(w, "Exiting the program. Goodbye!")?;
    Ok(())
}
