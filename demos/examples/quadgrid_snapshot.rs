// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scatter random rectangles into a spatial hash grid, query the cell under a
//! cursor, and render the whole structure to SVG.
//!
//! Run:
//! - `cargo run -p understory_demos --example quadgrid_snapshot -- --cursor-x 230 --cursor-y 140 -o grid.svg`
//! - `RUST_LOG=understory_quadgrid=trace cargo run -p understory_demos --example quadgrid_snapshot`
//!   to watch cells being created and quadtrees splitting.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use understory_demos::svg::{SvgPainter, Theme};
use understory_quadgrid::{Rect, SpatialHashGrid};

#[derive(Parser)]
#[command(
    name = "quadgrid_snapshot",
    about = "Render a spatial hash grid of quadtrees to SVG"
)]
struct Args {
    /// Side length of a grid cell.
    #[arg(long, default_value_t = 100.0)]
    cell_size: f64,

    /// Items a quadtree node holds before splitting.
    #[arg(long, default_value_t = understory_quadgrid::DEFAULT_CAPACITY)]
    capacity: usize,

    /// Number of random rectangles to insert.
    #[arg(long, default_value_t = 50)]
    count: u32,

    /// Upper bound for rectangle widths.
    #[arg(long, default_value_t = 10.0)]
    max_width: f64,

    /// Upper bound for rectangle heights.
    #[arg(long, default_value_t = 10.0)]
    max_height: f64,

    /// Side length of the square canvas; origins are drawn from `[0, canvas)`.
    #[arg(long, default_value_t = 500.0)]
    canvas: f64,

    /// Seed for reproducible snapshots. Uses OS entropy when absent.
    #[arg(long)]
    seed: Option<u64>,

    /// Cursor position along x.
    #[arg(long, default_value_t = 0.0)]
    cursor_x: f64,

    /// Cursor position along y.
    #[arg(long, default_value_t = 0.0)]
    cursor_y: f64,

    /// Use the dark palette.
    #[arg(long)]
    dark: bool,

    /// Write the SVG here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    ensure!(args.cell_size > 0.0, "--cell-size must be positive");
    ensure!(args.capacity > 0, "--capacity must be positive");
    ensure!(args.canvas > 0.0, "--canvas must be positive");
    ensure!(
        args.max_width > 0.0 && args.max_height > 0.0,
        "--max-width and --max-height must be positive"
    );

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut grid = SpatialHashGrid::with_capacity(args.cell_size, args.capacity);
    for i in 0..args.count {
        let bounds = Rect::new(
            rng.random_range(0.0..args.canvas),
            rng.random_range(0.0..args.canvas),
            rng.random_range(0.0..args.max_width),
            rng.random_range(0.0..args.max_height),
        );
        grid.insert(bounds, i);
    }
    info!(
        inserted = args.count,
        stored = grid.len(),
        cells = grid.cell_count(),
        "populated grid"
    );

    // The cursor cell uses floor division, independent of the grid's hashing.
    let col = (args.cursor_x / args.cell_size).floor();
    let row = (args.cursor_y / args.cell_size).floor();
    let cursor_cell = kurbo::Rect::from_origin_size(
        (col * args.cell_size, row * args.cell_size),
        (args.cell_size, args.cell_size),
    );
    let range = Rect::from(cursor_cell);
    let hits = grid.query(&range);
    info!(cell = %format!("{col},{row}"), hits = hits.len(), "queried cursor cell");
    for hit in &hits {
        debug!(data = hit.data, bounds = ?hit.bounds, "hit");
    }

    let mut painter = SvgPainter::new(
        args.canvas,
        args.canvas,
        if args.dark { Theme::Dark } else { Theme::Light },
    );
    grid.paint(&mut painter);
    painter.highlight_range(&range);
    for hit in &hits {
        painter.highlight_hit(&hit.bounds);
    }
    let center = cursor_cell.center();
    painter.badge(&hits.len().to_string(), center.x, center.y + 10.0);
    let svg = painter.finish();

    match &args.output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            file.write_all(svg.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote snapshot");
        }
        None => io::stdout()
            .lock()
            .write_all(svg.as_bytes())
            .context("failed to write snapshot to stdout")?,
    }

    Ok(())
}
