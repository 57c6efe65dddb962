mod common;

use common::synthetic_image::{checkerboard, diagonal_gradient, random_image};
use ift_segmenter::{
    validate_result, GrayImage, IftSolver, PathCost, SeedSet, SolverOptions, TieBreakPolicy,
};

#[test]
fn diagonal_gradient_with_two_seeds() {
    // 5x5 ramp I = 25(x+y); seed 1 at the origin, seed 2 mid-grid with a
    // handicap of 5. Every 4-connected arc costs 25.
    let image = diagonal_gradient(5, 5, 25);
    let mut seeds = SeedSet::new();
    seeds.add(image.pixel(0, 0), Some(1), 0.0);
    seeds.add(image.pixel(2, 2), Some(2), 5.0);
    let cost = PathCost::intensity_diff_sum();

    let mut solver = IftSolver::default();
    let result = solver.run_basic(&image, &cost, &seeds);

    assert_eq!(result.cost(image.pixel(1, 0)), 25.0);
    assert_eq!(result.cost(image.pixel(0, 1)), 25.0);
    assert_eq!(result.cost(image.pixel(2, 2)), 5.0);
    // The far corner is cheaper through the handicapped seed: 5 + 4*25.
    assert_eq!(result.cost(image.pixel(4, 4)), 105.0);
    assert_eq!(result.root_of(image.pixel(4, 4)), image.pixel(2, 2));
    assert_eq!(result.label(image.pixel(3, 3)), 2);
    assert!(validate_result(&result, &image, &cost, &seeds));
}

#[test]
fn left_column_seeds_flood_the_whole_grid() {
    // A connected grid with a seeded left column leaves nothing unreached.
    let image = diagonal_gradient(4, 4, 10);
    let mut seeds = SeedSet::new();
    for y in 0..4 {
        seeds.add(image.pixel(0, y), Some(1), 0.0);
    }
    let cost = PathCost::intensity_diff_sum();

    let mut solver = IftSolver::default();
    let result = solver.run_basic(&image, &cost, &seeds);

    assert!(result.is_complete());
    for p in image.all_pixels() {
        assert!(result.cost(p).is_finite(), "unreached pixel {p}");
        assert_eq!(result.label(p), 1);
    }
}

#[test]
fn max_cost_crosses_the_ridge_at_its_height() {
    // Bottleneck cost: every monotone path out of the corner climbs a 0->9
    // step once, so the far corner costs exactly 9.
    let image = GrayImage::from_rows(&[vec![0u8, 9, 0], vec![9, 9, 9], vec![0, 9, 0]]).unwrap();
    let mut seeds = SeedSet::new();
    seeds.add(image.pixel(0, 0), Some(1), 0.0);
    let cost = PathCost::intensity_diff_max();

    let mut solver = IftSolver::default();
    let result = solver.run_basic(&image, &cost, &seeds);

    assert_eq!(result.cost(image.pixel(2, 2)), 9.0);
    assert!(result.is_complete());
    assert!(validate_result(&result, &image, &cost, &seeds));
}

#[test]
fn bucket_and_heap_engines_agree_on_integer_costs() {
    let image = random_image(50, 50, 7);
    let mut seeds = SeedSet::new();
    seeds.add(image.pixel(5, 5), Some(1), 0.0);
    seeds.add(image.pixel(40, 10), Some(2), 0.0);
    seeds.add(image.pixel(25, 45), Some(3), 0.0);
    let cost = PathCost::intensity_diff_sum();

    let mut solver = IftSolver::default();
    let heap_result = solver.run_basic(&image, &cost, &seeds);
    let bucket_result = solver.run_optimized(&image, &cost, &seeds);

    // Cost maps must match exactly; labels may differ only where multiple
    // equal-cost optimal paths exist, so they are not compared here.
    assert!(heap_result.results_match(&bucket_result, 0.0));
    assert!(heap_result.is_complete());
    assert!(validate_result(&bucket_result, &image, &cost, &seeds));
}

#[test]
fn hybrid_engine_agrees_with_the_heap() {
    let image = random_image(30, 30, 11);
    let mut seeds = SeedSet::new();
    seeds.add(image.pixel(3, 3), Some(1), 0.0);
    seeds.add(image.pixel(25, 20), Some(2), 0.0);
    let cost = PathCost::intensity_diff_sum();

    let mut solver = IftSolver::default();
    let heap_result = solver.run_basic(&image, &cost, &seeds);
    let hybrid_result = solver.run_hybrid(&image, &cost, &seeds);

    assert!(heap_result.results_match(&hybrid_result, 0.0));
}

#[test]
fn explicit_max_cost_hint_changes_nothing_when_sufficient() {
    let image = random_image(20, 20, 3);
    let mut seeds = SeedSet::new();
    seeds.add(image.pixel(2, 2), Some(1), 0.0);
    let cost = PathCost::intensity_diff_sum();

    let mut plain = IftSolver::default();
    let reference = plain.run_optimized(&image, &cost, &seeds);

    let mut hinted = IftSolver::new(SolverOptions {
        max_cost_hint: Some(cost.max_cost_estimate(&image) * 2),
        ..SolverOptions::default()
    });
    let result = hinted.run_optimized(&image, &cost, &seeds);

    assert!(reference.results_match(&result, 0.0));
}

#[test]
fn gradient_weights_take_the_discretized_path_and_stay_consistent() {
    use ift_segmenter::{ArcWeight, Extension};
    let image = random_image(16, 16, 5);
    let mut seeds = SeedSet::new();
    seeds.add(image.pixel(8, 8), Some(1), 0.0);
    let cost = PathCost::new(Extension::Sum, ArcWeight::Gradient { sigma: 1.0 });
    assert!(!cost.is_integer_cost());

    // The conservative default K can undershoot summed gradients, so bound
    // the bucket range explicitly (any cost above K would be dropped).
    let mut solver = IftSolver::new(SolverOptions {
        max_cost_hint: Some(4000),
        ..SolverOptions::default()
    });
    let result = solver.run_optimized(&image, &cost, &seeds);

    // Discretization may reorder near-equal pops, but every stored cost must
    // still be the exact cost of its own predecessor path.
    assert!(result.is_complete());
    assert!(validate_result(&result, &image, &cost, &seeds));
}

#[test]
fn fifo_and_lifo_partition_the_checkerboard_identically_off_the_tie_line() {
    // Opposite-corner seeds on a unit checkerboard: every arc costs the same,
    // so C = 188 * manhattan distance to the nearer corner, and ties sit on
    // the anti-diagonal x + y = 4.
    let image = checkerboard(5, 5, 32, 220);
    let mut seeds = SeedSet::new();
    seeds.add(image.pixel(0, 0), Some(1), 0.0);
    seeds.add(image.pixel(4, 4), Some(2), 0.0);
    let cost = PathCost::intensity_diff_sum();

    let mut solver = IftSolver::default();
    let fifo = solver.run_tiebreak(&image, &cost, &seeds, TieBreakPolicy::Fifo);
    let lifo = solver.run_tiebreak(&image, &cost, &seeds, TieBreakPolicy::Lifo);

    assert!(fifo.is_complete());
    assert!(lifo.is_complete());
    assert!(fifo.results_match(&lifo, 0.0));

    for p in image.all_pixels() {
        let near = (p.x + p.y).min(8 - p.x - p.y);
        assert_eq!(fifo.cost(p), f64::from(188 * near), "cost at {p}");
        if p.x + p.y < 4 {
            assert_eq!(fifo.label(p), 1, "fifo label at {p}");
            assert_eq!(lifo.label(p), 1, "lifo label at {p}");
        } else if p.x + p.y > 4 {
            assert_eq!(fifo.label(p), 2, "fifo label at {p}");
            assert_eq!(lifo.label(p), 2, "lifo label at {p}");
        }
    }
    assert!(validate_result(&fifo, &image, &cost, &seeds));
    assert!(validate_result(&lifo, &image, &cost, &seeds));
}

#[test]
fn random_tiebreak_still_produces_an_optimal_forest() {
    let image = checkerboard(7, 7, 32, 220);
    let mut seeds = SeedSet::new();
    seeds.add(image.pixel(0, 0), Some(1), 0.0);
    seeds.add(image.pixel(6, 6), Some(2), 0.0);
    let cost = PathCost::intensity_diff_sum();

    let mut solver = IftSolver::default();
    let reference = solver.run_basic(&image, &cost, &seeds);
    let random = solver.run_tiebreak(&image, &cost, &seeds, TieBreakPolicy::Random);

    assert!(reference.results_match(&random, 0.0));
    assert!(validate_result(&random, &image, &cost, &seeds));
}

#[test]
fn forest_invariants_hold_on_a_random_image() {
    let image = random_image(20, 20, 99);
    let mut seeds = SeedSet::new();
    seeds.add(image.pixel(1, 1), Some(1), 0.0);
    seeds.add(image.pixel(18, 4), Some(2), 0.0);
    seeds.add(image.pixel(9, 17), Some(3), 0.0);
    let cost = PathCost::intensity_diff_sum();

    let mut solver = IftSolver::default();
    let result = solver.run_basic(&image, &cost, &seeds);
    assert!(result.is_complete());

    for p in image.all_pixels() {
        // Consistency: C(p) = extend(C(P(p)), w(P(p), p)).
        if let Some(pred) = result.predecessor(p) {
            let expected = cost.extend(result.cost(pred), cost.arc_weight(pred, p));
            assert!(
                (result.cost(p) - expected).abs() < 1e-9,
                "inconsistent cost at {p}"
            );
        }
        // Rootedness + label propagation: the walk ends at a seed whose
        // label the pixel inherited.
        let root = result.root_of(p);
        assert!(result.is_root(root), "walk from {p} ended off-root");
        assert!(seeds.is_seed(root), "root {root} of {p} is not a seed");
        assert_eq!(result.label(p), seeds.label_of(root), "label at {p}");
    }

    // Seed fidelity.
    for seed in seeds.active_seeds() {
        assert_eq!(result.cost(seed.pixel), seed.handicap);
        assert_eq!(result.label(seed.pixel), seed.label);
    }
}

#[test]
fn rerunning_on_own_labels_is_a_fixed_point() {
    let image = random_image(12, 12, 21);
    let mut seeds = SeedSet::new();
    seeds.add(image.pixel(0, 0), Some(1), 0.0);
    seeds.add(image.pixel(11, 11), Some(2), 0.0);
    let cost = PathCost::intensity_diff_sum();

    let mut solver = IftSolver::default();
    let first = solver.run_basic(&image, &cost, &seeds);
    assert!(first.is_complete());

    // Re-seed every pixel with its converged cost and label.
    let mut reseeded = SeedSet::new();
    for p in image.all_pixels() {
        reseeded.add(p, Some(first.label(p)), first.cost(p));
    }
    let second = solver.run_basic(&image, &cost, &reseeded);

    assert!(first.results_match(&second, 1e-9));
    for p in image.all_pixels() {
        assert_eq!(first.label(p), second.label(p), "label moved at {p}");
    }
}

#[test]
fn single_column_image_terminates_with_a_path() {
    let rows: Vec<Vec<u8>> = (0..6).map(|y| vec![(y * 20) as u8]).collect();
    let image = GrayImage::from_rows(&rows).unwrap();
    let mut seeds = SeedSet::new();
    seeds.add(image.pixel(0, 0), Some(1), 0.0);
    let cost = PathCost::intensity_diff_sum();

    let mut solver = IftSolver::default();
    let result = solver.run_basic(&image, &cost, &seeds);

    assert!(result.is_complete());
    let path = result.optimal_path(image.pixel(0, 5));
    assert_eq!(path.len(), 6);
    assert_eq!(result.cost(image.pixel(0, 5)), 100.0);
}

#[test]
fn segmentation_image_echoes_labels() {
    let image = checkerboard(5, 5, 32, 220);
    let mut seeds = SeedSet::new();
    seeds.add(image.pixel(0, 0), Some(3), 0.0);
    let cost = PathCost::intensity_diff_sum();

    let mut solver = IftSolver::default();
    let result = solver.run_basic(&image, &cost, &seeds);

    let seg = result.create_segmentation_image();
    assert_eq!(seg.width(), 5);
    for y in 0..5 {
        for x in 0..5 {
            assert_eq!(seg.value(x, y), 3);
        }
    }
}
