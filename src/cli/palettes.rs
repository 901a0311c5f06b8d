use anyhow::{anyhow, Result};
use clap::Args;
use palette_styler::{catalog, contrast, PaletteStyler};
use serde::Serialize;

use super::output::{emit_structured, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct CssArgs {
    /// Palette name or index
    #[arg(default_value = "0")]
    pub palette: String,

    /// Override the font stack
    #[arg(long)]
    pub font: Option<String>,
}

#[derive(Serialize)]
struct PaletteRow<'a> {
    index: usize,
    name: &'a str,
    colors: &'a [&'a str],
    text: String,
}

pub fn cmd_palettes(output: OutputFormat) -> Result<()> {
    let rows: Vec<PaletteRow<'_>> = catalog::PALETTES
        .iter()
        .enumerate()
        .map(|(index, entry)| PaletteRow {
            index,
            name: entry.name,
            colors: &entry.colors,
            text: contrast::readable_text(entry.colors[0], entry.colors[1]),
        })
        .collect();

    if emit_structured(&output, &rows)? {
        return Ok(());
    }
    for row in &rows {
        println!(
            "{:>2}  {:<8} text={}  {}",
            row.index,
            row.name,
            row.text,
            row.colors.join(" ")
        );
    }
    Ok(())
}

pub fn cmd_css(args: CssArgs) -> Result<()> {
    let entry = catalog::lookup(&args.palette)
        .ok_or_else(|| anyhow!("unknown palette '{}'", args.palette))?;
    let mut theme = entry.to_theme();
    if let Some(font) = args.font {
        theme = theme.with_font(font);
    }
    let sheet = PaletteStyler::new().stylesheet(&theme);
    println!("{}", sheet.css);
    Ok(())
}
