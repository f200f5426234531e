//! Classify a block of hex cells against a cutting surface and print
//! the resulting blanking pattern, layer by layer.

use overset_kernel::{classify_cells, CutConfig, CutFlag, CutType};

fn main() -> overset_kernel::Result<()> {
    const N: usize = 6;

    // N×N×N block of unit hexes filling [0,N]³ (gmsh corner ordering)
    let mut cells = Vec::with_capacity(N * N * N * 24);
    for k in 0..N {
        for j in 0..N {
            for i in 0..N {
                let (x, y, z) = (i as f64, j as f64, k as f64);
                #[rustfmt::skip]
                cells.extend_from_slice(&[
                    x,       y,       z,
                    x + 1.0, y,       z,
                    x + 1.0, y + 1.0, z,
                    x,       y + 1.0, z,
                    x,       y,       z + 1.0,
                    x + 1.0, y,       z + 1.0,
                    x + 1.0, y + 1.0, z + 1.0,
                    x,       y + 1.0, z + 1.0,
                ]);
            }
        }
    }

    // Cutting surface: a tilted plane of quad facets sweeping through
    // the block, outward normals pointing up
    let mut facets = Vec::new();
    for j in 0..N {
        for i in 0..N {
            let (x, y) = (i as f64, j as f64);
            let zf = |x: f64, y: f64| 1.5 + 0.25 * x + 0.1 * y;
            #[rustfmt::skip]
            facets.extend_from_slice(&[
                x,       y,       zf(x, y),
                x + 1.0, y,       zf(x + 1.0, y),
                x + 1.0, y + 1.0, zf(x + 1.0, y + 1.0),
                x,       y + 1.0, zf(x, y + 1.0),
            ]);
        }
    }

    let flags = classify_cells(&cells, 8, &facets, 4, CutType::Overset, &CutConfig::default())?;

    let count = |f: CutFlag| flags.iter().filter(|&&v| v == f).count();
    println!(
        "{} cells: {} hole, {} cut, {} normal",
        flags.len(),
        count(CutFlag::Hole),
        count(CutFlag::Cut),
        count(CutFlag::Normal)
    );

    for k in (0..N).rev() {
        println!("layer z = {k}..{}", k + 1);
        for j in (0..N).rev() {
            let row: String = (0..N)
                .map(|i| match flags[i + N * (j + N * k)] {
                    CutFlag::Hole => 'H',
                    CutFlag::Cut => 'X',
                    CutFlag::Normal => '.',
                    CutFlag::Unassigned => '?',
                })
                .collect();
            println!("  {row}");
        }
    }

    Ok(())
}
