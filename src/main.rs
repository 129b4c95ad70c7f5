use crate::animation::Timeline;
use crate::config::{builtin_variants, load_variant_file, VariantConfig};
use crate::encode::GifAssembler;
use crate::render::markup;
use crate::render::surface::Surface;
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use itertools::Itertools;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

mod animation;
mod config;
mod encode;
mod render;

/// Render looping animated badge GIFs from HTML/CSS via headless Chromium.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Directory the GIF files are written into.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Generate only the named variant instead of the full set.
    #[arg(long, value_name = "NAME")]
    only: Option<String>,

    /// Load variant definitions from a YAML file instead of the built-ins.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let variants = selected_variants(&cli)?;
    fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("creating output directory {}", cli.output_dir.display()))?;

    for variant in &variants {
        let path = generate_variant(variant, &cli.output_dir).await?;
        println!("saved {}", path.display());
    }
    println!("done, {} file(s) written", variants.len());
    Ok(())
}

fn selected_variants(cli: &Cli) -> Result<Vec<VariantConfig>> {
    let mut variants = match &cli.config {
        Some(path) => load_variant_file(path)
            .with_context(|| format!("loading variants from {}", path.display()))?,
        None => builtin_variants(),
    };
    if let Some(only) = &cli.only {
        let known = variants.iter().map(|v| v.name.clone()).join(", ");
        variants.retain(|v| &v.name == only);
        if variants.is_empty() {
            return Err(anyhow!("unknown variant '{only}' (have: {known})"));
        }
    }
    if variants.is_empty() {
        return Err(anyhow!("no variants to generate"));
    }
    Ok(variants)
}

async fn generate_variant(variant: &VariantConfig, output_dir: &Path) -> Result<PathBuf> {
    println!("generating {} badge ({} frames)...", variant.name, variant.frame_count);

    let surface = Surface::launch(&variant.viewport)
        .await
        .with_context(|| format!("launching browser for variant '{}'", variant.name))?;

    // Close the surface on either path so the browser never outlives the variant.
    let payload = match render_frames(&surface, variant).await {
        Ok(payload) => {
            surface.close().await?;
            payload
        }
        Err(err) => {
            let _ = surface.close().await;
            return Err(err);
        }
    };

    let path = output_dir.join(format!("lozenge-{}.gif", variant.name));
    fs::write(&path, payload).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

async fn render_frames(surface: &Surface, variant: &VariantConfig) -> Result<Vec<u8>> {
    surface.load(&markup::badge_document(variant)).await?;

    let bounds = surface.locate(markup::BADGE_SELECTOR).await?;
    let clip = bounds.padded(variant.viewport.padding as f64).round_out();
    let scale = variant.viewport.scale_factor;
    let mut assembler = GifAssembler::new(
        (clip.width * scale) as u32,
        (clip.height * scale) as u32,
        variant.delay_ms,
    );

    // Apply, capture, encode; one frame at a time. The surface's style
    // state is shared, so the loop must not overlap captures.
    let timeline = Timeline::for_variant(variant);
    for frame in 0..variant.frame_count {
        let params = timeline.params_at(frame, variant.frame_count);
        surface.apply(&params).await?;
        let png = surface.capture(&clip).await?;
        assembler
            .push_png(&png)
            .with_context(|| format!("encoding frame {} of '{}'", frame + 1, variant.name))?;
        print!("\rframe {}/{}", frame + 1, variant.frame_count);
        std::io::stdout().flush().ok();
    }
    println!();

    Ok(assembler.finish()?)
}
