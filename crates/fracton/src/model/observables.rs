//! Energy, border correlators and the random wedge flip.

use rand::Rng;

use super::FractonModel;

/// What one `decorrelate_step` did: the geodesic index drawn and the sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flip {
    pub geodesic: usize,
    pub sign: i8,
}

impl FractonModel {
    /// `-Σ_groups Π_{i∈group} spin[i]`.
    pub fn hamiltonian(&self) -> i64 {
        let energy: i64 = self
            .interactions
            .iter()
            .map(|group| group.iter().map(|&i| i64::from(self.spins[i])).product::<i64>())
            .sum();
        -energy
    }

    /// Per border position `i` and offset `k`: `s[border[i]]·s[border[neigh[i][k]]]`.
    /// Shape `|border| × ⌊|border|/2⌋`.
    pub fn border_correlations_each_spin(&self) -> Vec<Vec<i64>> {
        self.border_neigh
            .iter()
            .enumerate()
            .map(|(i, neigh)| {
                let si = i64::from(self.spins[self.border[i]]);
                neigh
                    .iter()
                    .map(|&j| si * i64::from(self.spins[self.border[j]]))
                    .collect()
            })
            .collect()
    }

    /// Border two-point correlator summed over positions, one entry per offset.
    pub fn border_correlations(&self) -> Vec<i64> {
        let mut out = vec![0i64; self.border.len() / 2];
        for row in self.border_correlations_each_spin() {
            for (acc, c) in out.iter_mut().zip(row) {
                *acc += c;
            }
        }
        out
    }

    /// For every geodesic, the side tags of all border centers.
    pub fn border_sides(&self) -> Vec<Vec<i8>> {
        let centers = self.border_centers();
        self.geodesics
            .iter()
            .map(|g| g.inside_tags(&centers))
            .collect()
    }

    /// Draw a geodesic uniformly and a sign uniformly from {−1, +1}, then
    /// multiply every spin by `sign · is_inside(center)`.
    ///
    /// Returns `None` (and changes nothing) when there are no geodesics.
    pub fn decorrelate_step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Flip> {
        if self.geodesics.is_empty() {
            return None;
        }
        let geodesic = rng.gen_range(0..self.geodesics.len());
        let sign: i8 = rng.gen_range(0..2i8) * 2 - 1;
        let g = self.geodesics[geodesic];
        for (s, &c) in self.spins.iter_mut().zip(&self.centers) {
            *s *= sign * g.is_inside(c);
        }
        Some(Flip { geodesic, sign })
    }

    /// `n` independent wedge flips.
    pub fn decorrelate<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) {
        for _ in 0..n {
            if self.decorrelate_step(rng).is_none() {
                break;
            }
        }
    }
}
