//! Gauss–Legendre quadrature rules on `[-1, 1]`.

use crate::error::{Error, Result};

/// 1-D Gauss–Legendre rule: `n` points integrate polynomials up to
/// degree `2n − 1` exactly.
pub struct GaussLegendre {
    /// Point coordinates on `[-1, 1]`.
    pub points: Vec<f64>,
    /// Integration weights (summing to 2).
    pub weights: Vec<f64>,
}

impl GaussLegendre {
    /// Rule with `n` points, `1 ≤ n ≤ 10`.
    pub fn new(n: usize) -> Result<Self> {
        // Symmetric abscissa/weight pairs; 0 denotes the center point
        let pairs: &[(f64, f64)] = match n {
            1 => &[(0.0, 2.0)],
            2 => &[(0.5773502691896257, 1.0)],
            3 => &[
                (0.0, 0.8888888888888888),
                (0.7745966692414834, 0.5555555555555556),
            ],
            4 => &[
                (0.3399810435848563, 0.6521451548625461),
                (0.8611363115940526, 0.3478548451374538),
            ],
            5 => &[
                (0.0, 0.5688888888888889),
                (0.5384693101056831, 0.4786286704993665),
                (0.9061798459386640, 0.2369268850561891),
            ],
            6 => &[
                (0.2386191860831969, 0.4679139345726910),
                (0.6612093864662645, 0.3607615730481386),
                (0.9324695142031521, 0.1713244923791704),
            ],
            7 => &[
                (0.0, 0.4179591836734694),
                (0.4058451513773972, 0.3818300505051189),
                (0.7415311855993945, 0.2797053914892766),
                (0.9491079123427585, 0.1294849661688697),
            ],
            8 => &[
                (0.1834346424956498, 0.3626837833783620),
                (0.5255324099163290, 0.3137066458778873),
                (0.7966664774136267, 0.2223810344533745),
                (0.9602898564975363, 0.1012285362903763),
            ],
            9 => &[
                (0.0, 0.3302393550012598),
                (0.3242534234038089, 0.3123470770400029),
                (0.6133714327005904, 0.2606106964029354),
                (0.8360311073266358, 0.1806481606948574),
                (0.9681602395076261, 0.0812743883615744),
            ],
            10 => &[
                (0.1488743389816312, 0.2955242247147529),
                (0.4333953941292472, 0.2692667193099963),
                (0.6794095682990244, 0.2190863625159820),
                (0.8650633666889845, 0.1494513491505806),
                (0.9739065285171717, 0.0666713443086881),
            ],
            _ => {
                return Err(Error::ShapeOrderMismatch {
                    kind: "Gauss-Legendre rule",
                    n_nodes: n,
                })
            }
        };

        let mut points = Vec::with_capacity(n);
        let mut weights = Vec::with_capacity(n);
        for &(x, w) in pairs {
            if x == 0.0 {
                points.push(0.0);
                weights.push(w);
            } else {
                points.push(-x);
                weights.push(w);
                points.push(x);
                weights.push(w);
            }
        }

        // Ascending points keep the tensor loops deterministic
        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by(|&a, &b| points[a].total_cmp(&points[b]));
        let points = order.iter().map(|&i| points[i]).collect();
        let weights = order.iter().map(|&i| weights[i]).collect();

        Ok(Self { points, weights })
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }
}
