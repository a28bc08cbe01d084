use fodosim::{propagate, Lattice, Model, NVec3};

use proptest::prelude::*;

fn lattice_strategy() -> impl Strategy<Value = Lattice> {
    (0.5..20.0f64, 0.5..50.0f64, 1usize..12, 1usize..8, 1usize..8).prop_map(
        |(drift, focal, cells, quad_n, drift_n)| {
            Lattice::with_divisions(drift, focal, cells, quad_n, drift_n).unwrap()
        },
    )
}

fn start_strategy() -> impl Strategy<Value = NVec3> {
    (-1.0..1.0f64, -0.5..0.5f64).prop_map(|(x, xp)| NVec3::new(x, xp, 0.0))
}

fn close(a: &NVec3, b: &NVec3) -> bool {
    let scale = 1.0_f64.max(a.amax()).max(b.amax());
    (a - b).amax() <= 1e-12 * scale
}

proptest! {
    #[test]
    fn sample_count_matches_lattice(start in start_strategy(), lattice in lattice_strategy()) {
        let expected = lattice.num_cells()
            * 2 * (lattice.quad_divisions() + lattice.drift_divisions());
        prop_assert_eq!(propagate(&start, &lattice).len(), expected);
    }

    #[test]
    fn propagation_is_bit_reproducible(start in start_strategy(), lattice in lattice_strategy()) {
        prop_assert_eq!(propagate(&start, &lattice), propagate(&start, &lattice));
    }

    #[test]
    fn path_length_is_monotonic(start in start_strategy(), lattice in lattice_strategy()) {
        let out = propagate(&start, &lattice);
        let mut prev = start[2];
        for v in &out {
            prop_assert!(v[2] >= prev);
            prev = v[2];
        }
        let total = lattice.num_cells() as f64 * lattice.cell_length();
        prop_assert!((prev - total).abs() <= 1e-9 * total.max(1.0));
    }

    #[test]
    fn continue_then_commit_equals_one_run(
        start in start_strategy(),
        lattice in lattice_strategy(),
        extra in 1usize..12,
    ) {
        let mut split = Model::with_lattice(lattice.clone());
        split.start(start[0], start[1]).unwrap();
        split.commit().unwrap();
        split.set_lattice(lattice.with_num_cells(extra).unwrap()).unwrap();
        split.continue_run().unwrap();
        split.commit().unwrap();

        let whole = lattice.with_num_cells(lattice.num_cells() + extra).unwrap();
        let expected = propagate(&start, &whole);

        let orbit = split.active_particle().unwrap().orbit().points();
        prop_assert_eq!(orbit.len(), expected.len() + 1);
        prop_assert_eq!(orbit[0], start);
        for (u, v) in orbit[1..].iter().zip(&expected) {
            prop_assert!(close(u, v), "{:?} != {:?}", u, v);
        }
    }

    #[test]
    fn extent_bounds_every_sample(start in start_strategy(), lattice in lattice_strategy()) {
        let mut model = Model::with_lattice(lattice);
        model.start(start[0], start[1]).unwrap();
        let staged = model.staged().unwrap().to_vec();
        let min = model.min_extent().unwrap();
        let max = model.max_extent().unwrap();
        for v in &staged {
            for i in 0..3 {
                prop_assert!(min[i] <= v[i] && v[i] <= max[i]);
            }
        }
    }
}
