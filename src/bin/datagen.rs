//! A data generation utility for creating a synthetic benchmark corpus.
//!
//! This binary writes small, reproducible Matrix Market files into the two corpus
//! folders the benchmark reads from:
//!
//! - `matrici_def_pos`: 1-D and 2-D finite-difference Laplacians, stored as symmetric.
//! - `matrici_non_def_pos`: 1-D convection-diffusion operators and random, diagonally
//!   dominant unsymmetric matrices drawn from a seeded generator.

use anyhow::{Context, Result, anyhow, ensure};
use clap::Parser;
use rand::{Rng, SeedableRng, rngs::StdRng};
use solver_bench::runner::ProblemClass;
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Command-line interface for the corpus generator.
#[derive(Parser, Debug)]
#[clap(
    name = "datagen",
    about = "Writes a synthetic Matrix Market corpus for the solver benchmark."
)]
struct DataGenArgs {
    /// Matrix dimensions to generate. 2-D Laplacians use the nearest square grid.
    #[clap(long, value_delimiter = ',', default_values_t = vec![100, 1000, 10000])]
    sizes: Vec<usize>,
    /// Seed for the random unsymmetric matrices.
    #[clap(long, default_value_t = 42)]
    seed: u64,
    /// Off-diagonal entries per row of the random matrices.
    #[clap(long, default_value_t = 5)]
    density: usize,
    /// The data directory receiving the two corpus folders.
    #[clap(long, value_name = "PATH", default_value = "data")]
    output_dir: PathBuf,
}

/// Storage symmetry written in the Matrix Market banner.
#[derive(Clone, Copy, Debug)]
enum Symmetry {
    General,
    Symmetric,
}

impl Symmetry {
    fn as_str(&self) -> &'static str {
        match self {
            Symmetry::General => "general",
            Symmetry::Symmetric => "symmetric",
        }
    }
}

/// Entries of a square matrix keyed by `(row, col)`, zero-based.
type Entries = BTreeMap<(usize, usize), f64>;

/// Writes `entries` as a Matrix Market coordinate file.
///
/// Symmetric matrices are written with their lower triangle only.
fn write_matrix_market(path: &Path, n: usize, entries: &Entries, symmetry: Symmetry) -> Result<()> {
    let stored: Vec<_> = entries
        .iter()
        .filter(|((i, j), _)| matches!(symmetry, Symmetry::General) || i >= j)
        .collect();

    let file = File::create(path).with_context(|| format!("Failed to create {path:?}"))?;
    let mut out = BufWriter::new(file);
    writeln!(out, "%%MatrixMarket matrix coordinate real {}", symmetry.as_str())?;
    writeln!(out, "% generated by solver_bench datagen")?;
    writeln!(out, "{} {} {}", n, n, stored.len())?;
    for ((i, j), v) in stored {
        writeln!(out, "{} {} {}", i + 1, j + 1, v)?;
    }
    out.flush()?;
    log::info!("Wrote {:?} ({}x{}, {} stored entries)", path, n, n, entries.len());
    Ok(())
}

/// `tridiag(-1, 2, -1)`.
fn laplace_1d(n: usize) -> Entries {
    let mut entries = Entries::new();
    for i in 0..n {
        entries.insert((i, i), 2.0);
        if i + 1 < n {
            entries.insert((i, i + 1), -1.0);
            entries.insert((i + 1, i), -1.0);
        }
    }
    entries
}

/// The 5-point Laplacian on an `m x m` grid.
fn laplace_2d(m: usize) -> Entries {
    let idx = |r: usize, c: usize| r * m + c;
    let mut entries = Entries::new();
    for r in 0..m {
        for c in 0..m {
            let k = idx(r, c);
            entries.insert((k, k), 4.0);
            if r + 1 < m {
                entries.insert((k, idx(r + 1, c)), -1.0);
                entries.insert((idx(r + 1, c), k), -1.0);
            }
            if c + 1 < m {
                entries.insert((k, idx(r, c + 1)), -1.0);
                entries.insert((idx(r, c + 1), k), -1.0);
            }
        }
    }
    entries
}

/// Upwind 1-D convection-diffusion with Peclet-like coefficient `pe`.
fn convection_diffusion_1d(n: usize, pe: f64) -> Entries {
    let mut entries = Entries::new();
    for i in 0..n {
        entries.insert((i, i), 2.0 + pe);
        if i > 0 {
            entries.insert((i, i - 1), -1.0 - pe);
        }
        if i + 1 < n {
            entries.insert((i, i + 1), -1.0);
        }
    }
    entries
}

/// Random unsymmetric matrix made strictly diagonally dominant, hence nonsingular.
fn random_diagonally_dominant(n: usize, density: usize, rng: &mut StdRng) -> Entries {
    let mut entries = Entries::new();
    for i in 0..n {
        let mut row_sum = 0.0;
        for _ in 0..density.min(n.saturating_sub(1)) {
            let j = rng.random_range(0..n);
            if j == i || entries.contains_key(&(i, j)) {
                continue;
            }
            let v: f64 = rng.random_range(-1.0..1.0);
            row_sum += v.abs();
            entries.insert((i, j), v);
        }
        entries.insert((i, i), row_sum + 1.0 + rng.random::<f64>());
    }
    entries
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    let args = DataGenArgs::parse();
    ensure!(
        args.sizes.iter().all(|&n| n >= 2),
        "Every size must be at least 2, got {:?}",
        args.sizes
    );
    log::info!("Starting corpus generation with parameters: {:?}", &args);

    let def_pos_dir = args.output_dir.join(ProblemClass::DefPos.corpus_dir());
    let non_def_pos_dir = args.output_dir.join(ProblemClass::NonDefPos.corpus_dir());
    for dir in [&def_pos_dir, &non_def_pos_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {dir:?}"))?;
    }

    let mut rng = StdRng::seed_from_u64(args.seed);

    for &n in &args.sizes {
        write_matrix_market(
            &def_pos_dir.join(format!("laplace1d_{n}.mtx")),
            n,
            &laplace_1d(n),
            Symmetry::Symmetric,
        )?;

        let m = (n as f64).sqrt().round().max(2.0) as usize;
        write_matrix_market(
            &def_pos_dir.join(format!("laplace2d_{m}x{m}.mtx")),
            m * m,
            &laplace_2d(m),
            Symmetry::Symmetric,
        )?;

        write_matrix_market(
            &non_def_pos_dir.join(format!("convdiff1d_{n}.mtx")),
            n,
            &convection_diffusion_1d(n, 0.5),
            Symmetry::General,
        )?;

        write_matrix_market(
            &non_def_pos_dir.join(format!("random_dd_{n}.mtx")),
            n,
            &random_diagonally_dominant(n, args.density, &mut rng),
            Symmetry::General,
        )?;
    }

    log::info!("Corpus generation completed in {:?}.", args.output_dir);
    Ok(())
}
