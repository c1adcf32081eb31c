//! maskmesh: labeled NIfTI mask -> tagged triangulated surfaces.
//!
//! Reads a segmentation mask, reconstructs one surface per positive label in
//! parallel, and writes the union to a mesh file. The output extension picks
//! the flavor: `.stl` is geometry-only, `.ply` keeps a per-face `label`
//! attribute for downstream coloring.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mask_io::load_mask_volume;
use mask_reconstruct::{export_attributed, export_plain, reconstruct_mask, ReconstructParams};

/// Reconstruct a labeled segmentation mask into tagged surfaces.
#[derive(Parser, Debug)]
#[command(name = "maskmesh")]
#[command(about = "Reconstruct labeled NIfTI masks into tagged surfaces", version)]
struct Args {
    /// Input NIfTI mask (.nii or .nii.gz).
    input: PathBuf,

    /// Output mesh path; .stl writes plain geometry, .ply keeps labels.
    /// Defaults to the input stem with .ply.
    output: Option<PathBuf>,

    /// Worker thread count (0 = hardware concurrency, or 4 if undetectable).
    #[arg(default_value_t = 0)]
    threads: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let output = args.output.unwrap_or_else(|| default_output(&args.input));

    let volume = load_mask_volume(&args.input)
        .with_context(|| format!("reading mask volume {}", args.input.display()))?;
    let (nx, ny, nz) = volume.dims();
    info!(
        nx,
        ny,
        nz,
        spacing = ?volume.spacing().as_slice(),
        origin = ?volume.origin().coords.as_slice(),
        "loaded mask volume"
    );

    let params = ReconstructParams::default().with_threads(args.threads);
    let built = reconstruct_mask(&volume, &params)
        .with_context(|| format!("reconstructing {}", args.input.display()))?;
    info!("{}", built.report);

    match output.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("stl") => {
            export_plain(&built.meshes, &output)
                .with_context(|| format!("exporting STL to {}", output.display()))?;
        }
        Some(ext) if ext.eq_ignore_ascii_case("ply") => {
            export_attributed(&built.meshes, &output)
                .with_context(|| format!("exporting PLY to {}", output.display()))?;
        }
        _ => bail!(
            "unsupported output extension on {}; use .stl or .ply",
            output.display()
        ),
    }

    info!(path = %output.display(), surfaces = built.meshes.len(), "export complete");
    Ok(())
}

/// Input stem with `.ply`, next to the input file.
fn default_output(input: &std::path::Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "mask".into(), std::ffi::OsStr::to_os_string);
    let mut name = PathBuf::from(stem);
    // `.nii.gz` leaves `.nii` in the stem; strip it too
    if let Some(inner) = name.file_stem() {
        if name.extension().and_then(|e| e.to_str()) == Some("nii") {
            name = PathBuf::from(inner.to_os_string());
        }
    }
    let mut output = input.with_file_name(name);
    output.set_extension("ply");
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_strips_nii_gz() {
        let out = default_output(std::path::Path::new("/data/brain_mask.nii.gz"));
        assert_eq!(out, PathBuf::from("/data/brain_mask.ply"));
    }

    #[test]
    fn default_output_strips_plain_nii() {
        let out = default_output(std::path::Path::new("scan.nii"));
        assert_eq!(out, PathBuf::from("scan.ply"));
    }
}
