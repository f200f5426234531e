use overset_kernel::{compute_volume, physical_position, ref_loc_newton, shape_hex};
use approx::assert_relative_eq;

/// 8-node hex on the unit cube, gmsh corner order.
fn unit_cube() -> Vec<f64> {
    vec![
        0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, //
        1.0, 1.0, 0.0, //
        0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0, //
        1.0, 0.0, 1.0, //
        1.0, 1.0, 1.0, //
        0.0, 1.0, 1.0,
    ]
}

/// 27-node hex on `[0,1]³` with one face node bowed outward, in gmsh
/// ordering.
fn curved_hex27() -> Vec<f64> {
    let map = overset_kernel::basis::gmsh_to_structured_hex(27).unwrap();
    let mut structured = Vec::with_capacity(27 * 3);
    for k in 0..3 {
        for j in 0..3 {
            for i in 0..3 {
                let mut x = i as f64 / 2.0;
                let y = j as f64 / 2.0;
                let z = k as f64 / 2.0;
                if i == 2 && j == 1 && k == 1 {
                    x += 0.15; // bow the +x face center outward
                }
                structured.push(x);
                structured.push(y);
                structured.push(z);
            }
        }
    }
    let mut gmsh = vec![0.0; 27 * 3];
    for (g, &s) in map.iter().enumerate() {
        gmsh[3 * g..3 * g + 3].copy_from_slice(&structured[3 * s..3 * s + 3]);
    }
    gmsh
}

#[test]
fn test_identity_hex_center() {
    let xv = unit_cube();
    let r = ref_loc_newton(&xv, &[0.5, 0.5, 0.5], 3).unwrap();
    assert!(r.inside);
    for d in 0..3 {
        assert_relative_eq!(r.rst[d], 0.0, epsilon = 1e-10);
    }
}

#[test]
fn test_identity_hex_corner() {
    let xv = unit_cube();
    let r = ref_loc_newton(&xv, &[1.0, 0.0, 0.0], 3).unwrap();
    assert!(r.inside);
    for d in 0..3 {
        assert_relative_eq!(r.rst[d].abs(), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn test_identity_hex_outside() {
    let xv = unit_cube();
    let r = ref_loc_newton(&xv, &[1.5, 0.5, 0.5], 3).unwrap();
    assert!(!r.inside);
}

#[test]
fn test_round_trip_curved_hex() {
    // Map strictly interior reference points through the curved element
    // and recover them by Newton
    let xv = curved_hex27();
    for &rst0 in &[
        [0.0, 0.0, 0.0],
        [0.6, -0.3, 0.2],
        [-0.8, 0.7, -0.5],
        [0.25, 0.25, 0.9],
    ] {
        let p = physical_position(&xv, 3, rst0).unwrap();
        let r = ref_loc_newton(&xv, &[p.x, p.y, p.z], 3).unwrap();
        assert!(r.inside, "reference point {rst0:?} should be recovered inside");
        for d in 0..3 {
            assert_relative_eq!(r.rst[d], rst0[d], epsilon = 1e-9);
        }
    }
}

#[test]
fn test_axis_aligned_volume_is_exact() {
    let l = 3.0;
    let xv: Vec<f64> = unit_cube().iter().map(|v| v * l).collect();
    let vol = compute_volume(&xv, 3).unwrap();
    assert_relative_eq!(vol, l * l * l, epsilon = 1e-12 * l * l * l);
}

#[test]
fn test_shape_consistency_with_position() {
    // physical_position is the shape-weighted vertex sum
    let xv = curved_hex27();
    let rst = [0.3, -0.2, 0.55];
    let mut sh = vec![0.0; 27];
    shape_hex(rst, &mut sh).unwrap();

    let mut expect = [0.0f64; 3];
    for (n, &s) in sh.iter().enumerate() {
        for d in 0..3 {
            expect[d] += s * xv[3 * n + d];
        }
    }

    let p = physical_position(&xv, 3, rst).unwrap();
    assert_relative_eq!(p.x, expect[0], epsilon = 1e-13);
    assert_relative_eq!(p.y, expect[1], epsilon = 1e-13);
    assert_relative_eq!(p.z, expect[2], epsilon = 1e-13);
}
