//! Entanglement-entropy proxy from geodesics crossing boundary cuts.
//!
//! Model
//! - A cut is a pair of border centers `(z1, z2)` with `z2` taken from the
//!   half-circle neighbors of `z1`. A geodesic crosses the cut when exactly one
//!   of its ideal endpoints lies in the angular wedge spanned by `z1` and `z2`.
//! - Crossings at neighbor offset `k` are added to bucket `k` and to its
//!   mirror `len-1-k`, so the raw counts are palindromic.
//! - The profile halves the central bucket (the antipodal cut is seen from
//!   both ends) and divides by `|border|`.
//! - With a positive `black_hole_radius`, geodesics with
//!   `distance_to_origin <= black_hole_radius` never count. Radius 0 (no
//!   horizon) keeps every geodesic, diameters included.
//!
//! The sweep over cut origins is independent per origin; the rayon version
//! folds private accumulators and sums them.

use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::cfg::EntropyCfg;
use crate::geodesic::is_between;
use crate::model::FractonModel;
use crate::Point;

/// Emitted once per sampled cut origin.
#[derive(Clone, Copy, Debug)]
pub struct EntropyProgress {
    /// 1-based count of origins processed.
    pub step: usize,
    pub total: usize,
    pub elapsed: Duration,
    /// Linear extrapolation from the mean time per origin.
    pub remaining: Duration,
}

struct Sweep {
    centers: Vec<Point>,
    valid: Vec<[Point; 2]>,
    len: usize,
}

impl Sweep {
    fn new(model: &FractonModel, black_hole_radius: f64) -> Self {
        let valid: Vec<[Point; 2]> = model
            .geodesics()
            .iter()
            .filter(|g| black_hole_radius <= 0.0 || g.distance_to_origin() > black_hole_radius)
            .map(|g| g.endpoints())
            .collect();
        tracing::debug!(
            valid = valid.len(),
            total = model.geodesics().len(),
            black_hole_radius,
            "entropy sweep"
        );
        Self {
            centers: model.border_centers(),
            valid,
            len: model.border().len().saturating_sub(1),
        }
    }

    /// Add the crossings of every cut starting at border position `idx`.
    fn accumulate(&self, idx: usize, neigh: &[usize], wedges: &mut [u64]) {
        let z1 = self.centers[idx];
        let last = self.len - 1;
        for (k, &j) in neigh.iter().enumerate() {
            let z2 = self.centers[j];
            for &[e0, e1] in &self.valid {
                if is_between(e0, z1, z2) != is_between(e1, z1, z2) {
                    wedges[k] += 1;
                    wedges[last - k] += 1;
                }
            }
        }
    }
}

/// Raw crossing counts (before halving and normalization).
/// Length `|border| - 1`, empty for fewer than two border polygons.
pub fn wedge_counts(model: &FractonModel, cfg: &EntropyCfg) -> Vec<u64> {
    sweep_sequential(model, cfg, None)
}

/// Entropy profile over cut sizes, sampling every `freq`-th cut origin.
pub fn entanglement_entropy(model: &FractonModel, black_hole_radius: f64, freq: usize) -> Vec<f64> {
    let cfg = EntropyCfg::new(black_hole_radius, freq);
    normalize(sweep_sequential(model, &cfg, None), model.border().len())
}

/// `entanglement_entropy` with a progress callback after each cut origin.
pub fn entanglement_entropy_with_progress(
    model: &FractonModel,
    cfg: &EntropyCfg,
    progress: &mut dyn FnMut(EntropyProgress),
) -> Vec<f64> {
    normalize(sweep_sequential(model, cfg, Some(progress)), model.border().len())
}

/// Parallel sweep; same result as `entanglement_entropy`.
pub fn entanglement_entropy_par(model: &FractonModel, cfg: &EntropyCfg) -> Vec<f64> {
    let sweep = Sweep::new(model, cfg.black_hole_radius);
    if sweep.len == 0 {
        return Vec::new();
    }
    let neigh = model.border_neigh();
    let len = sweep.len;
    let raw = (0..model.border().len())
        .into_par_iter()
        .step_by(cfg.step())
        .fold(
            || vec![0u64; len],
            |mut acc, idx| {
                sweep.accumulate(idx, &neigh[idx], &mut acc);
                acc
            },
        )
        .reduce(
            || vec![0u64; len],
            |mut a, b| {
                a.iter_mut().zip(b).for_each(|(x, y)| *x += y);
                a
            },
        );
    normalize(raw, model.border().len())
}

fn sweep_sequential(
    model: &FractonModel,
    cfg: &EntropyCfg,
    mut progress: Option<&mut dyn FnMut(EntropyProgress)>,
) -> Vec<u64> {
    let sweep = Sweep::new(model, cfg.black_hole_radius);
    if sweep.len == 0 {
        return Vec::new();
    }
    let mut wedges = vec![0u64; sweep.len];
    let n = model.border().len();
    let stride = cfg.step();
    let total = n.div_ceil(stride);
    let start = Instant::now();
    for (done, idx) in (0..n).step_by(stride).enumerate() {
        sweep.accumulate(idx, &model.border_neigh()[idx], &mut wedges);
        if let Some(report) = progress.as_deref_mut() {
            let step = done + 1;
            let elapsed = start.elapsed();
            let remaining = elapsed.mul_f64((total - step) as f64 / step as f64);
            report(EntropyProgress {
                step,
                total,
                elapsed,
                remaining,
            });
        }
    }
    wedges
}

fn normalize(raw: Vec<u64>, border_len: usize) -> Vec<f64> {
    if raw.is_empty() {
        return Vec::new();
    }
    let mut out: Vec<f64> = raw.into_iter().map(|w| w as f64).collect();
    let mid = (out.len() - 1) / 2;
    out[mid] /= 2.0;
    let n = border_len as f64;
    out.iter_mut().for_each(|w| *w /= n);
    out
}

/// Histogram of geodesics by how many border centers they tag −1.
///
/// Length `|border|`. A geodesic tagging `m` centers lands in bucket `m-1`;
/// `m = 0` wraps around to the last bucket.
pub fn geodesics_per_length(model: &FractonModel) -> Vec<u64> {
    let centers = model.border_centers();
    let n = centers.len();
    let mut hist = vec![0u64; n];
    if n == 0 {
        return hist;
    }
    for g in model.geodesics() {
        let m = centers.iter().filter(|&&z| g.is_inside(z) == -1).count();
        let bucket = if m == 0 { n - 1 } else { m - 1 };
        hist[bucket] += 1;
    }
    hist
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> FractonModel {
        FractonModel::new(5, 4, 2, None).unwrap()
    }

    fn max_distance(m: &FractonModel) -> f64 {
        m.geodesics()
            .iter()
            .map(|g| g.distance_to_origin())
            .fold(0.0, f64::max)
    }

    #[test]
    fn profile_has_one_bucket_per_cut_size() {
        let m = model();
        let s = entanglement_entropy(&m, 0.0, 1);
        assert_eq!(s.len(), m.border().len() - 1);
        assert!(s.iter().all(|&v| v >= 0.0));
        assert!(s.iter().sum::<f64>() > 0.0);
    }

    #[test]
    fn horizon_beyond_every_geodesic_gives_zero() {
        let m = model();
        let s = entanglement_entropy(&m, max_distance(&m), 1);
        assert!(!s.is_empty());
        assert!(s.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn raw_counts_are_palindromic() {
        for m in [model(), FractonModel::new(4, 5, 2, None).unwrap()] {
            for freq in [1, 2, 5] {
                let raw = wedge_counts(&m, &EntropyCfg::new(0.0, freq));
                let len = raw.len();
                for k in 0..len {
                    assert_eq!(raw[k], raw[len - 1 - k]);
                }
            }
        }
    }

    #[test]
    fn normalization_halves_the_center() {
        let m = model();
        let cfg = EntropyCfg::new(0.0, 1);
        let raw = wedge_counts(&m, &cfg);
        let s = entanglement_entropy(&m, 0.0, 1);
        let n = m.border().len() as f64;
        let mid = (raw.len() - 1) / 2;
        for (k, (&r, &v)) in raw.iter().zip(&s).enumerate() {
            let expected = if k == mid { r as f64 / 2.0 / n } else { r as f64 / n };
            assert!((v - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn horizon_only_removes_crossings() {
        let m = model();
        let all = wedge_counts(&m, &EntropyCfg::new(0.0, 1));
        let some = wedge_counts(&m, &EntropyCfg::new(0.5 * max_distance(&m), 1));
        assert!(all.iter().zip(&some).all(|(a, b)| b <= a));
    }

    #[test]
    fn subsampling_only_removes_crossings() {
        let m = model();
        let full = entanglement_entropy(&m, 0.0, 1);
        let sparse = entanglement_entropy(&m, 0.0, 3);
        assert_eq!(full.len(), sparse.len());
        assert!(full.iter().zip(&sparse).all(|(f, s)| s <= f));
        // freq 0 is treated as 1
        assert_eq!(entanglement_entropy(&m, 0.0, 0), full);
    }

    #[test]
    fn parallel_sweep_matches_sequential() {
        let m = FractonModel::new(4, 5, 2, None).unwrap();
        for freq in [1, 2, 3] {
            let seq = entanglement_entropy(&m, 0.1, freq);
            let par = entanglement_entropy_par(&m, &EntropyCfg::new(0.1, freq));
            assert_eq!(seq, par);
        }
    }

    #[test]
    fn progress_reports_every_sampled_origin() {
        let m = model();
        let n = m.border().len();
        let mut steps = Vec::new();
        let s = entanglement_entropy_with_progress(&m, &EntropyCfg::new(0.0, 2), &mut |p| {
            assert_eq!(p.total, n.div_ceil(2));
            steps.push(p.step);
        });
        assert_eq!(steps, (1..=n.div_ceil(2)).collect::<Vec<_>>());
        assert_eq!(s, entanglement_entropy(&m, 0.0, 2));
    }

    #[test]
    fn diameters_count_only_without_a_horizon() {
        let m = FractonModel::new(7, 3, 2, None).unwrap();
        let diameters = m.geodesics().iter().filter(|g| g.is_diameter()).count();
        assert_eq!(diameters, 7);
        assert_eq!(Sweep::new(&m, 0.0).valid.len(), m.geodesics().len());
        assert_eq!(Sweep::new(&m, 1e-12).valid.len(), m.geodesics().len() - diameters);
        let raw = wedge_counts(&m, &EntropyCfg::default());
        let without = wedge_counts(&m, &EntropyCfg::new(1e-12, 1));
        assert!(raw.iter().zip(&without).all(|(a, b)| b <= a));
        assert!(raw.iter().sum::<u64>() > without.iter().sum::<u64>());
    }

    #[test]
    fn tiny_borders_give_empty_profiles() {
        let m = FractonModel::new(4, 5, 0, None).unwrap();
        assert!(entanglement_entropy(&m, 0.0, 1).is_empty());
        assert!(entanglement_entropy_par(&m, &EntropyCfg::default()).is_empty());
        assert!(wedge_counts(&m, &EntropyCfg::default()).is_empty());
        assert_eq!(geodesics_per_length(&m), vec![0]);
    }

    #[test]
    fn length_histogram_counts_every_geodesic() {
        let m = model();
        let hist = geodesics_per_length(&m);
        assert_eq!(hist.len(), m.border().len());
        assert_eq!(hist.iter().sum::<u64>(), m.geodesics().len() as u64);
    }

    #[test]
    fn length_histogram_buckets_by_outer_count() {
        let m = FractonModel::new(4, 5, 1, None).unwrap();
        let hist = geodesics_per_length(&m);
        let n = m.border().len();
        let mut expected = vec![0u64; n];
        for row in m.border_sides() {
            let minus = row.iter().filter(|&&s| s == -1).count();
            expected[if minus == 0 { n - 1 } else { minus - 1 }] += 1;
        }
        assert_eq!(hist, expected);
    }
}
