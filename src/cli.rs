use std::path::PathBuf;

use sfnt_subset::SubsetOptions;

#[derive(clap::Parser, Debug)]
#[command(
    name = "sfnt-subset",
    version,
    about = "Strip a TrueType font down to the glyphs a document uses",
    long_about = None
)]
pub struct Arguments {
    /// Font file to subset (.ttf, or .ttc with --collection-index)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub font: PathBuf,

    /// Where to write the subset font
    #[arg(short, long, default_value = "subset.ttf")]
    pub output: PathBuf,

    /// Glyph IDs to keep, comma separated
    #[arg(long, value_delimiter = ',')]
    pub glyphs: Vec<u16>,

    /// Keep the glyphs this text maps to through the font's cmap
    #[arg(long)]
    pub text: Option<String>,

    /// Keep the cmap and OS/2 tables
    #[clap(long, action = clap::ArgAction::SetTrue)]
    pub cmap: bool,

    /// Keep the cmap, OS/2 and name tables
    #[clap(long, action = clap::ArgAction::SetTrue)]
    pub extras: bool,

    /// Member of a TrueType collection to subset
    #[arg(long)]
    pub collection_index: Option<u32>,

    /// JSON file with subset options; flags given here override it
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}

impl Arguments {
    pub fn update_options(&self, options: &mut SubsetOptions) {
        options.glyphs.extend(self.glyphs.iter().copied());

        if self.cmap {
            options.include_cmap = true;
        }

        if self.extras {
            options.include_extras = true;
        }

        if let Some(index) = self.collection_index {
            options.collection_index = Some(index);
        }
    }
}

/// Face whose cmap maps `--text`: the collection member being subset, or
/// face 0 of a plain font. `None` when only a raw directory offset is set,
/// since that names no face ttf-parser can open.
pub fn text_face_index(options: &SubsetOptions) -> Option<u32> {
    match (options.collection_index, options.directory_offset) {
        (Some(index), _) => Some(index),
        (None, 0) => Some(0),
        (None, _) => None,
    }
}
