use std::time::Instant;

use crate::simulation::error::Result;
use crate::simulation::integrator::propagate;
use crate::simulation::lattice::Lattice;
use crate::simulation::model::Model;
use crate::simulation::states::NVec3;

/// Helper to build the reference lattice with `num_cells` cells
fn make_lattice(num_cells: usize, divisions: usize) -> Result<Lattice> {
    Lattice::with_divisions(10.0, 8.0, num_cells, divisions, divisions)
}

/// Time raw `propagate` for a range of cell counts
pub fn bench_propagate() -> Result<()> {
    let cells = [12, 120, 1_200, 12_000, 120_000];
    let reps = 5; // averaged runs per size
    let start = NVec3::new(0.4, -0.1, 0.0);

    for n in cells {
        let lattice = make_lattice(n, 5)?;

        // Warm up
        let _ = propagate(&start, &lattice);

        let t0 = Instant::now();
        let mut samples = 0;
        for _ in 0..reps {
            samples += propagate(&start, &lattice).len();
        }
        let secs = t0.elapsed().as_secs_f64() / reps as f64;
        let rate = (samples / reps) as f64 / secs;

        println!("cells = {n:7}, run = {secs:10.6} s, {rate:12.0} samples/s");
    }
    Ok(())
}

/// Time a full start/commit/continue/commit cycle against subdivision count
/// Output is CSV
pub fn bench_run_curve() -> Result<()> {
    println!("divisions,start_commit_ms,continue_commit_ms");

    for divisions in 1..=20 {
        let mut model = Model::with_lattice(make_lattice(1_000, divisions)?);

        let t0 = Instant::now();
        model.start(0.4, -0.1)?;
        model.commit()?;
        let ms_start = t0.elapsed().as_secs_f64() * 1000.0;

        let t1 = Instant::now();
        model.continue_run()?;
        model.commit()?;
        let ms_continue = t1.elapsed().as_secs_f64() * 1000.0;

        println!("{},{:.6},{:.6}", divisions, ms_start, ms_continue);
    }
    Ok(())
}
