use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use geojson::{Feature, FeatureCollection, GeoJson};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use rog_shared::boundary::{BoundaryManifestEntry, ld_slug};

/// Convert a directory tree of KML boundary files into GeoJSON plus the
/// manifest the portal loads at `/boundaries/manifest.json`.
#[derive(Parser)]
#[command(
    name = "rog-kml-convert",
    version = env!("CARGO_PKG_VERSION"),
    about = "Batch-convert KML boundary files to GeoJSON with a manifest"
)]
struct Cli {
    /// Directory scanned recursively for .kml files
    input_dir: PathBuf,

    /// Destination for .geojson files and manifest.json
    output_dir: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cli) {
        tracing::error!(error = %e, "conversion failed");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("cannot create {}", cli.output_dir.display()))?;

    let mut manifest: Vec<BoundaryManifestEntry> = Vec::new();
    let mut converted = 0usize;
    let mut failed = 0usize;

    for entry in WalkDir::new(&cli.input_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if !path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("kml"))
        {
            continue;
        }

        // Per-file failures are logged and counted, never fatal to the batch.
        match convert_file(path, &cli.input_dir, &cli.output_dir) {
            Ok(entry) => {
                tracing::info!(slug = %entry.slug, "converted {}", path.display());
                manifest.push(entry);
                converted += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping {}", path.display());
                failed += 1;
            }
        }
    }

    manifest.sort_by(|a, b| {
        let a_key = format!("{}/{}", a.region, a.slug);
        let b_key = format!("{}/{}", b.region, b.slug);
        a_key.cmp(&b_key)
    });
    let manifest_path = cli.output_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(&manifest_path, json)
        .with_context(|| format!("cannot write {}", manifest_path.display()))?;

    tracing::info!(converted, failed, "wrote {}", manifest_path.display());
    Ok(())
}

fn convert_file(path: &Path, input_root: &Path, output_dir: &Path) -> Result<BoundaryManifestEntry> {
    let text = fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let parsed: kml::Kml = text
        .parse()
        .with_context(|| format!("invalid KML in {}", path.display()))?;
    let collection: geo_types::GeometryCollection<f64> = kml::quick_collection(parsed)
        .with_context(|| format!("no convertible geometry in {}", path.display()))?;
    anyhow::ensure!(!collection.0.is_empty(), "KML contains no geometry");

    let features: Vec<Feature> = collection
        .iter()
        .map(|geometry| Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(geometry))),
            id: None,
            properties: None,
            foreign_members: None,
        })
        .collect();
    let doc = GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    });

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .context("file name is not valid UTF-8")?;
    let stem_slug = ld_slug(stem);

    // The output tree mirrors the input tree, so identically named files in
    // different regions never overwrite each other.
    let relative = path.strip_prefix(input_root).unwrap_or(path);
    let mut dirs: Vec<&str> = Vec::new();
    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            dirs.push(
                component
                    .as_os_str()
                    .to_str()
                    .context("directory name is not valid UTF-8")?,
            );
        }
    }

    let mut out_dir = output_dir.to_path_buf();
    for dir in &dirs {
        out_dir.push(dir);
    }
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("cannot create {}", out_dir.display()))?;
    let out_path = out_dir.join(format!("{stem_slug}.geojson"));
    fs::write(&out_path, doc.to_string())
        .with_context(|| format!("cannot write {}", out_path.display()))?;

    // Region is the first path component under the input root; the slug is
    // the path remainder. Top-level files fall back to their own name.
    let (region, slug) = match dirs.split_first() {
        Some((region, rest)) => {
            let mut slug_parts: Vec<&str> = rest.to_vec();
            slug_parts.push(stem_slug.as_str());
            (region.to_string(), slug_parts.join("/"))
        }
        None => (stem.to_string(), stem_slug.clone()),
    };

    let mut url_parts = dirs.clone();
    url_parts.push(stem_slug.as_str());
    let geojson_url = format!("/boundaries/{}.geojson", url_parts.join("/"));

    Ok(BoundaryManifestEntry {
        region,
        slug,
        kml_source: Some(relative.to_string_lossy().into_owned()),
        geojson_url,
    })
}
