//! 1-D Lagrange polynomials on arbitrary node sets.

/// Evaluate the `mode`-th Lagrange polynomial defined on the nodes `xs`
/// at the point `y`:
///
/// L_m(y) = Π_{i≠m} (y − x_i) / (x_m − x_i)
///
/// The nodes must be pairwise distinct; callers must supply at least two.
pub fn lagrange(xs: &[f64], y: f64, mode: usize) -> f64 {
    let xm = xs[mode];
    let mut lag = 1.0;

    for (i, &xi) in xs.iter().enumerate() {
        if i != mode {
            lag *= (y - xi) / (xm - xi);
        }
    }

    lag
}

/// Evaluate the derivative of the `mode`-th Lagrange polynomial at `y`:
///
/// L'_m(y) = Σ_{i≠m} (1/(x_m−x_i)) Π_{j≠m,i} (y − x_j) / (x_m − x_j)
pub fn dlagrange(xs: &[f64], y: f64, mode: usize) -> f64 {
    let n = xs.len();
    let xm = xs[mode];
    let mut dlag = 0.0;

    for i in 0..n {
        if i == mode {
            continue;
        }

        let mut num = 1.0;
        let mut den = 1.0;

        for j in 0..n {
            if j != mode && j != i {
                num *= y - xs[j];
            }
            if j != mode {
                den *= xm - xs[j];
            }
        }

        dlag += num / den;
    }

    dlag
}

/// `n` equispaced node positions spanning `[-1, 1]`.
///
/// This is the node set every Lagrange element in the kernel is built on.
pub fn uniform_nodes(n: usize) -> Vec<f64> {
    let dxi = 2.0 / (n as f64 - 1.0);
    (0..n).map(|i| -1.0 + i as f64 * dxi).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kronecker_property() {
        // L_m(x_i) = δ_mi on the defining nodes
        let xs = uniform_nodes(5);
        for m in 0..5 {
            for (i, &xi) in xs.iter().enumerate() {
                let expected = if i == m { 1.0 } else { 0.0 };
                assert_relative_eq!(lagrange(&xs, xi, m), expected, epsilon = 1e-13);
            }
        }
    }

    #[test]
    fn test_partition_of_unity() {
        let xs = uniform_nodes(4);
        for &y in &[-1.0, -0.37, 0.0, 0.5, 0.99, 1.0] {
            let sum: f64 = (0..4).map(|m| lagrange(&xs, y, m)).sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-13);
        }
    }

    #[test]
    fn test_derivative_against_finite_difference() {
        let xs = uniform_nodes(4);
        let h = 1e-6;
        for m in 0..4 {
            for &y in &[-0.8, -0.1, 0.3, 0.7] {
                let fd = (lagrange(&xs, y + h, m) - lagrange(&xs, y - h, m)) / (2.0 * h);
                assert_relative_eq!(dlagrange(&xs, y, m), fd, epsilon = 1e-7);
            }
        }
    }

    #[test]
    fn test_derivative_sum_is_zero() {
        // d/dy Σ L_m = d/dy 1 = 0
        let xs = uniform_nodes(6);
        for &y in &[-1.0, -0.2, 0.6, 1.0] {
            let sum: f64 = (0..6).map(|m| dlagrange(&xs, y, m)).sum();
            assert_relative_eq!(sum, 0.0, epsilon = 1e-11);
        }
    }

    #[test]
    fn test_uniform_nodes_span() {
        let xs = uniform_nodes(3);
        assert_relative_eq!(xs[0], -1.0);
        assert_relative_eq!(xs[1], 0.0);
        assert_relative_eq!(xs[2], 1.0);
    }
}
