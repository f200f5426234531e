//! Small dense determinant/adjoint kernels.
//!
//! These closed forms are the only matrix-inversion path used by the
//! Newton reference-coordinate solver: `J⁻¹ = adj(J) / det(J)`.
//! Matrices are row-major flat slices.

/// One term of the 3×3 cofactor expansion.
fn det3_part(m: &[f64], a: usize, b: usize, c: usize) -> f64 {
    m[a] * (m[3 + b] * m[6 + c] - m[3 + c] * m[6 + b])
}

/// One 2×2-block product of the 4×4 expansion.
fn det4_part(m: &[f64], j: usize, k: usize, p: usize, q: usize) -> f64 {
    (m[j * 4] * m[k * 4 + 1] - m[k * 4] * m[j * 4 + 1])
        * (m[p * 4 + 2] * m[q * 4 + 3] - m[q * 4 + 2] * m[p * 4 + 3])
}

/// Determinant of a 2×2 row-major matrix.
pub fn det2(m: &[f64]) -> f64 {
    m[0] * m[3] - m[1] * m[2]
}

/// Determinant of a 3×3 row-major matrix.
pub fn det3(m: &[f64]) -> f64 {
    det3_part(m, 0, 1, 2) - det3_part(m, 1, 0, 2) + det3_part(m, 2, 0, 1)
}

/// Determinant of a 4×4 row-major matrix via pairwise 2×2 blocks.
pub fn det4(m: &[f64]) -> f64 {
    det4_part(m, 0, 1, 2, 3) - det4_part(m, 0, 2, 1, 3) + det4_part(m, 0, 3, 1, 2)
        + det4_part(m, 1, 2, 0, 3)
        - det4_part(m, 1, 3, 0, 2)
        + det4_part(m, 2, 3, 0, 1)
}

/// Determinant of a `size × size` row-major matrix.
///
/// Sizes 1–4 use the closed forms; larger sizes expand cofactors along
/// column 0. Must not be called with `size == 0`.
pub fn determinant(data: &[f64], size: usize) -> f64 {
    match size {
        1 => data[0],
        2 => det2(data),
        3 => det3(data),
        4 => det4(data),
        _ => {
            let mut det = 0.0;
            let mut sign = 1.0;
            let mut minor = vec![0.0; (size - 1) * (size - 1)];
            for row in 0..size {
                // Minor matrix, expanding along the first column
                let mut i0 = 0;
                for i in 0..size {
                    if i == row {
                        continue;
                    }
                    for j in 1..size {
                        minor[i0 * (size - 1) + j - 1] = data[i * size + j];
                    }
                    i0 += 1;
                }
                det += sign * determinant(&minor, size - 1) * data[row * size];
                sign = -sign;
            }
            det
        }
    }
}

/// Adjoint (transpose of the cofactor matrix) of a `size × size`
/// row-major matrix, written into `adj`.
///
/// Satisfies `adj(M) · M = det(M) · I`.
pub fn adjoint_into(mat: &[f64], adj: &mut [f64], size: usize) {
    let mut minor = vec![0.0; (size - 1) * (size - 1)];

    for row in 0..size {
        for col in 0..size {
            let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };

            // Minor matrix, deleting (row, col)
            let mut i0 = 0;
            for i in 0..size {
                if i == row {
                    continue;
                }
                let mut j0 = 0;
                for j in 0..size {
                    if j == col {
                        continue;
                    }
                    minor[i0 * (size - 1) + j0] = mat[i * size + j];
                    j0 += 1;
                }
                i0 += 1;
            }

            // Adjoint is the TRANSPOSE of the cofactor matrix
            adj[col * size + row] = sign * determinant(&minor, size - 1);
        }
    }
}

/// Allocating variant of [`adjoint_into`].
pub fn adjoint(mat: &[f64], size: usize) -> Vec<f64> {
    let mut adj = vec![0.0; size * size];
    adjoint_into(mat, &mut adj, size);
    adj
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_det_small_sizes() {
        assert_relative_eq!(det2(&[1.0, 2.0, 3.0, 4.0]), -2.0);

        let m3 = [2.0, 0.0, 1.0, 1.0, 3.0, -1.0, 0.0, 2.0, 4.0];
        // 2*(12+2) - 0 + 1*(2-0) = 30
        assert_relative_eq!(det3(&m3), 30.0);

        let m4 = [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 2.0, 0.0, 0.0, //
            0.0, 0.0, 3.0, 0.0, //
            0.0, 0.0, 0.0, 4.0,
        ];
        assert_relative_eq!(det4(&m4), 24.0);
    }

    #[test]
    fn test_generic_matches_specialized() {
        let m3 = [2.0, 0.5, 1.0, -1.0, 3.0, -1.0, 0.0, 2.0, 4.0];
        assert_relative_eq!(determinant(&m3, 3), det3(&m3));

        let m4 = [
            4.0, 1.0, 0.0, 2.0, //
            -1.0, 3.0, 1.0, 0.0, //
            2.0, 0.0, 5.0, 1.0, //
            0.0, 2.0, 1.0, 3.0,
        ];
        assert_relative_eq!(determinant(&m4, 4), det4(&m4));
    }

    #[test]
    fn test_cofactor_recursion_above_four() {
        // 5x5 diagonal
        let mut m5 = [0.0; 25];
        for i in 0..5 {
            m5[i * 5 + i] = (i + 1) as f64;
        }
        assert_relative_eq!(determinant(&m5, 5), 120.0);
    }

    #[test]
    fn test_adjoint_contract() {
        // adj(M)·M = det(M)·I
        let m = [2.0, 0.5, 1.0, -1.0, 3.0, -1.0, 0.0, 2.0, 4.0];
        let adj = adjoint(&m, 3);
        let det = det3(&m);

        for i in 0..3 {
            for j in 0..3 {
                let mut prod = 0.0;
                for k in 0..3 {
                    prod += adj[i * 3 + k] * m[k * 3 + j];
                }
                let expected = if i == j { det } else { 0.0 };
                assert_relative_eq!(prod, expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_adjoint_2x2() {
        let m = [3.0, 1.0, 2.0, 5.0];
        let adj = adjoint(&m, 2);
        assert_relative_eq!(adj[0], 5.0);
        assert_relative_eq!(adj[1], -1.0);
        assert_relative_eq!(adj[2], -2.0);
        assert_relative_eq!(adj[3], 3.0);
    }
}
