use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fracton::entropy::{
    entanglement_entropy_par, entanglement_entropy_with_progress, geodesics_per_length,
    EntropyProgress,
};
use fracton::tiling::Kernel;
use fracton::{EntropyCfg, FractonModel};
use polars::df;
use polars::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod table;

use provenance::Payload;

#[derive(Parser)]
#[command(name = "fracton-cli")]
#[command(about = "Experiment runner for the hyperbolic fracton model")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

/// Lattice parameters shared by every subcommand.
#[derive(Args, Clone, Debug, Serialize)]
struct Lattice {
    /// Edges per polygon
    #[arg(long, default_value_t = 4)]
    p: usize,
    /// Polygons per vertex
    #[arg(long, default_value_t = 5)]
    q: usize,
    /// Layers around the central polygon; the outermost one is the border
    #[arg(long, default_value_t = 3)]
    nlayers: usize,
    /// Layer growth rule: `edge` or `vertex`
    #[arg(long, default_value = "edge")]
    kernel: String,
}

impl Lattice {
    fn build(&self) -> Result<FractonModel> {
        let kernel: Kernel = self.kernel.parse()?;
        let model = FractonModel::new(self.p, self.q, self.nlayers, Some(kernel))
            .with_context(|| format!("building {{{},{}}} model", self.p, self.q))?;
        tracing::info!(
            p = self.p,
            q = self.q,
            nlayers = self.nlayers,
            polygons = model.len(),
            border = model.border().len(),
            geodesics = model.geodesics().len(),
            "model"
        );
        Ok(model)
    }
}

#[derive(Subcommand)]
enum Action {
    /// Entanglement entropy profile over border cut lengths
    Entropy {
        #[command(flatten)]
        lattice: Lattice,
        /// Ignore geodesics this close to the origin
        #[arg(long, default_value_t = 0.0)]
        black_hole_radius: f64,
        /// Use every n-th border polygon as a cut origin
        #[arg(long, default_value_t = 1)]
        freq: usize,
        /// Sweep cut origins on the rayon pool (no progress events)
        #[arg(long)]
        parallel: bool,
        #[arg(long)]
        out: PathBuf,
    },
    /// Border two-point correlations after random wedge flips
    Correlations {
        #[command(flatten)]
        lattice: Lattice,
        /// Number of wedge flips applied to the ordered state
        #[arg(long, default_value_t = 0)]
        decorrelate: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Histogram of geodesics by the number of border polygons they cut off
    Lengths {
        #[command(flatten)]
        lattice: Lattice,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a model summary with provenance to stdout
    Report {
        #[command(flatten)]
        lattice: Lattice,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Entropy {
            lattice,
            black_hole_radius,
            freq,
            parallel,
            out,
        } => entropy(lattice, EntropyCfg::new(black_hole_radius, freq), parallel, out),
        Action::Correlations {
            lattice,
            decorrelate,
            seed,
            out,
        } => correlations(lattice, decorrelate, seed, out),
        Action::Lengths { lattice, out } => lengths(lattice, out),
        Action::Report { lattice } => report(lattice),
    }
}

fn entropy(lattice: Lattice, cfg: EntropyCfg, parallel: bool, out: PathBuf) -> Result<()> {
    let model = lattice.build()?;
    let values = if parallel {
        entanglement_entropy_par(&model, &cfg)
    } else {
        let mut logged = 0;
        entanglement_entropy_with_progress(&model, &cfg, &mut |pr: EntropyProgress| {
            // Roughly ten events per sweep.
            let decile = pr.step * 10 / pr.total.max(1);
            if decile > logged {
                logged = decile;
                tracing::info!(
                    step = pr.step,
                    total = pr.total,
                    elapsed_s = pr.elapsed.as_secs_f64(),
                    remaining_s = pr.remaining.as_secs_f64(),
                    "entropy progress"
                );
            }
        })
    };
    let cut: Vec<u32> = (1..=values.len() as u32).collect();
    let mut df = df!("cut_length" => cut, "entropy" => values)?;
    table::write(&mut df, &out)?;
    let params = json!({
        "lattice": lattice,
        "black_hole_radius": cfg.black_hole_radius,
        "freq": cfg.freq,
        "parallel": parallel,
    });
    finish("entropy", &out, params)
}

fn correlations(lattice: Lattice, decorrelate: usize, seed: u64, out: PathBuf) -> Result<()> {
    let mut model = lattice.build()?;
    let mut rng = StdRng::seed_from_u64(seed);
    model.decorrelate(decorrelate, &mut rng);
    let hamiltonian = model.hamiltonian();
    tracing::info!(decorrelate, seed, hamiltonian, "decorrelated");

    let corr = model.border_correlations();
    let separation: Vec<u32> = (1..=corr.len() as u32).collect();
    let mut df = df!("separation" => separation, "correlation" => corr)?;
    table::write(&mut df, &out)?;
    let params = json!({
        "lattice": lattice,
        "decorrelate": decorrelate,
        "seed": seed,
        "hamiltonian": hamiltonian,
    });
    finish("correlations", &out, params)
}

fn lengths(lattice: Lattice, out: PathBuf) -> Result<()> {
    let model = lattice.build()?;
    let counts = geodesics_per_length(&model);
    let length: Vec<u32> = (1..=counts.len() as u32).collect();
    let mut df = df!("length" => length, "geodesics" => counts)?;
    table::write(&mut df, &out)?;
    finish("lengths", &out, json!({ "lattice": lattice }))
}

#[track_caller]
fn finish(command: &'static str, out: &Path, params: serde_json::Value) -> Result<()> {
    let sidecar = provenance::write_sidecar(out, Payload::new(command, params))?;
    tracing::info!(out = %out.display(), sidecar = %sidecar.display(), "{command} written");
    Ok(())
}

fn report(lattice: Lattice) -> Result<()> {
    let model = lattice.build()?;
    let groups = model.interactions();
    let obj = json!({
        "fracton_version": fracton::VERSION,
        "code_rev": provenance::current_git_rev(),
        "params": { "lattice": lattice },
        "model": {
            "polygons": model.len(),
            "bulk": model.bulk().len(),
            "border": model.border().len(),
            "geodesics": model.geodesics().len(),
            "interactions": groups.len(),
            "largest_interaction": groups.iter().map(Vec::len).max().unwrap_or(0),
            "hamiltonian": model.hamiltonian(),
        },
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn small() -> Lattice {
        Lattice {
            p: 4,
            q: 5,
            nlayers: 2,
            kernel: "edge".to_string(),
        }
    }

    #[test]
    fn flags_parse_into_subcommands() {
        let cmd = Cmd::try_parse_from([
            "fracton-cli",
            "entropy",
            "--p",
            "5",
            "--q",
            "4",
            "--freq",
            "3",
            "--parallel",
            "--out",
            "run/e.csv",
        ])
        .unwrap();
        match cmd.action {
            Action::Entropy {
                lattice,
                freq,
                parallel,
                black_hole_radius,
                ..
            } => {
                assert_eq!((lattice.p, lattice.q, lattice.nlayers), (5, 4, 3));
                assert_eq!(lattice.kernel, "edge");
                assert_eq!(freq, 3);
                assert!(parallel);
                assert_eq!(black_hole_radius, 0.0);
            }
            _ => panic!("expected entropy"),
        }
        assert!(Cmd::try_parse_from(["fracton-cli", "lengths"]).is_err());
    }

    #[test]
    fn unknown_kernel_is_reported() {
        let lattice = Lattice {
            kernel: "spiral".to_string(),
            ..small()
        };
        assert!(lattice.build().is_err());
    }

    #[test]
    fn entropy_writes_table_and_sidecar() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("entropy.csv");
        entropy(small(), EntropyCfg::default(), false, out.clone()).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        let model = small().build().unwrap();
        assert_eq!(text.lines().count(), model.border().len());
        assert!(dir.path().join("entropy.provenance.json").exists());
    }

    #[test]
    fn correlations_record_the_seed() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("corr.parquet");
        correlations(small(), 10, 42, out.clone()).unwrap();
        assert!(out.exists());
        let sidecar = fs::read(dir.path().join("corr.provenance.json")).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&sidecar).unwrap();
        assert_eq!(doc["command"], "correlations");
        assert_eq!(doc["params"]["seed"], 42);
        assert_eq!(doc["params"]["decorrelate"], 10);
    }

    #[test]
    fn lengths_has_one_row_per_border_polygon() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("lengths.csv");
        lengths(small(), out.clone()).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        let model = small().build().unwrap();
        // Header plus |border| buckets.
        assert_eq!(text.lines().count(), model.border().len() + 1);
        assert!(text.starts_with("length,geodesics"));
    }
}
