use overset_kernel::{
    classify_cells, classify_cells_serial, classify_element, CutConfig, CutFlag, CutType,
};
use approx::assert_relative_eq;

/// 8-node hex spanning `[x0,x0+1] × [0,1] × [z0,z0+1]`, gmsh corners.
fn unit_hex(x0: f64, z0: f64) -> Vec<f64> {
    vec![
        x0, 0.0, z0, //
        x0 + 1.0, 0.0, z0, //
        x0 + 1.0, 1.0, z0, //
        x0, 1.0, z0, //
        x0, 0.0, z0 + 1.0, //
        x0 + 1.0, 0.0, z0 + 1.0, //
        x0 + 1.0, 1.0, z0 + 1.0, //
        x0, 1.0, z0 + 1.0,
    ]
}

/// Large planar quad at height `z`, wound CCW from above so the outward
/// normal is +z.
fn cutting_quad_up(z: f64) -> Vec<f64> {
    vec![
        -2.0, -2.0, z, //
        3.0, -2.0, z, //
        3.0, 3.0, z, //
        -2.0, 3.0, z,
    ]
}

/// Same quad wound the other way: outward normal −z.
fn cutting_quad_down(z: f64) -> Vec<f64> {
    vec![
        -2.0, -2.0, z, //
        -2.0, 3.0, z, //
        3.0, 3.0, z, //
        3.0, -2.0, z,
    ]
}

#[test]
fn test_clean_blanking() {
    // Cutting quad just below the element with its outward normal
    // pointing up into it: the element lies on the surface's inside
    let cell = unit_hex(0.0, 0.0);
    let facet = cutting_quad_up(-0.1);

    let cut = classify_element(&cell, &facet, 4, CutType::Overset, &CutConfig::default())
        .unwrap();
    assert_eq!(cut.flag, CutFlag::Hole);
}

#[test]
fn test_clearly_outside() {
    // Cutting quad two units below, normal pointing away: active
    // element, and the accumulated distance is the true gap
    let cell = unit_hex(0.0, 0.0);
    let facet = cutting_quad_down(-2.0);

    let cut = classify_element(&cell, &facet, 4, CutType::Overset, &CutConfig::default())
        .unwrap();
    assert_eq!(cut.flag, CutFlag::Normal);
    assert_relative_eq!(cut.distance, 2.0, epsilon = 1e-9);
}

#[test]
fn test_column_of_cells_against_wall() {
    // Stack of three cells crossing a wall surface at z = 1.5. The
    // stored normal points up; the wall convention flips it downward,
    // so the cell below gets blanked, the crossing cell is cut, and the
    // cell above stays active
    let mut cells = unit_hex(0.0, 0.0);
    cells.extend(unit_hex(0.0, 1.0));
    cells.extend(unit_hex(0.0, 2.0));
    let facet = cutting_quad_up(1.5);

    let flags = classify_cells_serial(&cells, 8, &facet, 4, CutType::Wall, &CutConfig::default())
        .unwrap();
    assert_eq!(flags, vec![CutFlag::Hole, CutFlag::Cut, CutFlag::Normal]);
}

#[test]
fn test_parallel_matches_serial() {
    let mut cells = Vec::new();
    for i in 0..4 {
        for k in 0..4 {
            cells.extend(unit_hex(i as f64, k as f64));
        }
    }
    let mut facets = cutting_quad_up(1.25);
    facets.extend(cutting_quad_up(2.75));

    let cfg = CutConfig::default();
    let serial =
        classify_cells_serial(&cells, 8, &facets, 4, CutType::Overset, &cfg).unwrap();
    let parallel = classify_cells(&cells, 8, &facets, 4, CutType::Overset, &cfg).unwrap();

    assert_eq!(serial, parallel);
    // Every cell must have received a terminal flag
    assert!(serial.iter().all(|&f| f != CutFlag::Unassigned));
}

#[test]
fn test_curved_element_classification() {
    // 27-node hex with a bulged top face still classifies cleanly
    // against a facet above it
    let n_side = 3;
    let mut cell = Vec::with_capacity(27 * 3);
    for k in 0..n_side {
        for j in 0..n_side {
            for i in 0..n_side {
                let x = i as f64 / 2.0;
                let y = j as f64 / 2.0;
                let mut z = k as f64 / 2.0;
                if k == 2 && i == 1 && j == 1 {
                    z += 0.2; // bulge the top-center node upward
                }
                cell.push(x);
                cell.push(y);
                cell.push(z);
            }
        }
    }
    // Scatter from structured into gmsh ordering
    let map = overset_kernel::basis::gmsh_to_structured_hex(27).unwrap();
    let mut gmsh_cell = vec![0.0; 27 * 3];
    for (g, &s) in map.iter().enumerate() {
        gmsh_cell[3 * g..3 * g + 3].copy_from_slice(&cell[3 * s..3 * s + 3]);
    }

    let facet = cutting_quad_up(1.5);
    let cut = classify_element(&gmsh_cell, &facet, 4, CutType::Overset, &CutConfig::default())
        .unwrap();
    assert_eq!(cut.flag, CutFlag::Normal);
    // Nearest approach is from the bulge tip at z = 1.2
    assert_relative_eq!(cut.distance, 0.3, epsilon = 1e-9);
}
