//! # sfnt-subset CLI
//!
//! Usage:
//!   sfnt-subset font.ttf --glyphs 3,36,37 -o subset.ttf
//!   sfnt-subset font.ttf --text "Invoice" --cmap
//!   sfnt-subset fonts.ttc --collection-index 1 --config opts.json

mod cli;

use std::error::Error;
use std::fs;
use std::process::ExitCode;

use clap::Parser;
use sfnt_subset::font::select::glyph_ids_for_text;
use sfnt_subset::{SubsetError, SubsetOptions, SubsetResult};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::Arguments::parse();

    let result = match run(&args) {
        Ok(result) => result,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = fs::write(&args.output, &result.ttf_data) {
        log::error!("Failed to write {}: {}", args.output.display(), e);
        return ExitCode::FAILURE;
    }

    log::info!(
        "Written {} bytes ({} glyphs) to {}",
        result.ttf_data.len(),
        result.retained_glyphs.len(),
        args.output.display()
    );
    ExitCode::SUCCESS
}

fn run(args: &cli::Arguments) -> Result<SubsetResult, Box<dyn Error>> {
    let mut options = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|source| SubsetError::Io {
                font: path.display().to_string(),
                source,
            })?;
            SubsetOptions::from_json(&json)?
        }
        None => SubsetOptions::default(),
    };
    args.update_options(&mut options);

    let font_name = args.font.display().to_string();

    if let Some(text) = &args.text {
        let index = cli::text_face_index(&options).ok_or(
            "--text needs --collection-index when the config sets directoryOffset",
        )?;
        let data = fs::read(&args.font).map_err(|source| SubsetError::Io {
            font: font_name.clone(),
            source,
        })?;
        options
            .glyphs
            .extend(glyph_ids_for_text(&font_name, &data, index, text)?);
    }

    Ok(sfnt_subset::subset_file(&args.font, &options)?)
}
