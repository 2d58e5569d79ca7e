//! Behavioural test suite for the tile coder.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use float_eq::assert_float_eq;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;

use super::*;

/// A 1-D coder over `[0, 1]` with every tiling aligned to the lower bound.
fn aligned_1d(tile_counts: Vec<Vec<usize>>, bias: bool) -> TileCoder {
    let offsets = vec![vec![0.0]; tile_counts.len()];
    TileCoder::with_offsets(vec![0.0], vec![1.0], tile_counts, offsets, bias).unwrap()
}

/// A jittered 2-D coder used by the randomized checks.
fn jittered_2d(bias: bool) -> TileCoder {
    TileCoder::new(
        vec![-1.2, -0.07],
        vec![0.6, 0.07],
        vec![vec![8, 8], vec![8, 8], vec![5, 7], vec![3, 3]],
        2718,
        bias,
    )
    .unwrap()
}

/// Samples points in and somewhat around the coder's box.
fn sample_points(coder: &TileCoder, n: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            coder
                .min_bound()
                .iter()
                .zip(coder.max_bound())
                .map(|(lo, hi)| {
                    let margin = (hi - lo) * 0.25;
                    rng.gen_range(lo - margin..hi + margin)
                })
                .collect()
        })
        .collect()
}

mod determinism {
    use super::*;

    #[test]
    fn same_seed_same_offsets() {
        let a = jittered_2d(false);
        let b = jittered_2d(false);
        assert_eq!(a.offsets(), b.offsets());
    }

    #[test]
    fn same_seed_same_encoding() {
        let a = jittered_2d(true);
        let b = jittered_2d(true);
        for p in sample_points(&a, 50, 1) {
            assert_eq!(a.encode(&p), b.encode(&p));
        }
    }

    #[test]
    fn different_seeds_jitter_differently() {
        let a = TileCoder::new(vec![0.0], vec![1.0], vec![vec![10]; 4], 1, false).unwrap();
        let b = TileCoder::new(vec![0.0], vec![1.0], vec![vec![10]; 4], 2, false).unwrap();
        assert_ne!(a.offsets(), b.offsets());
    }
}

mod sparsity {
    use super::*;

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn exactly_one_active_tile_per_tiling(#[case] bias: bool) {
        let coder = jittered_2d(bias);
        let expected = coder.num_tilings() + usize::from(bias);
        for p in sample_points(&coder, 200, 7) {
            let dense = coder.encode(&p);
            assert_eq!(dense.len(), coder.vec_len());
            assert!(dense.iter().all(|&x| x == 0.0 || x == 1.0));
            assert_float_eq!(dense.iter().sum::<f64>(), expected as f64, abs <= 0.0);
        }
    }

    #[test]
    fn each_tiling_activates_inside_its_own_block() {
        let coder = jittered_2d(false);
        let sizes = [64, 64, 35, 9];
        for p in sample_points(&coder, 100, 3) {
            let mut start = 0;
            for (&index, size) in coder.encode_indices(&p).iter().zip(sizes) {
                assert!((start..start + size).contains(&index));
                start += size;
            }
        }
    }
}

mod agreement {
    use super::*;

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn indices_match_dense_positions(#[case] bias: bool) {
        let coder = jittered_2d(bias);
        for p in sample_points(&coder, 200, 11) {
            let from_dense: BTreeSet<usize> =
                dense_to_indices(&coder.encode(&p)).unwrap().into_iter().collect();
            let from_indices: BTreeSet<usize> = coder.encode_indices(&p).into_iter().collect();
            assert_eq!(from_dense, from_indices);
        }
    }

    #[test]
    fn batch_columns_match_single_encoding() {
        let coder = jittered_2d(true);
        let points = sample_points(&coder, 40, 5);
        let batch = Array2::from_shape_fn((2, points.len()), |(d, i)| points[i][d]);

        let encoded = coder.encode_batch(&batch);
        assert_eq!(encoded.dim(), (coder.vec_len(), points.len()));
        for (i, p) in points.iter().enumerate() {
            assert_eq!(encoded.column(i).to_vec(), coder.encode(p));
        }
    }

    #[test]
    fn empty_batch_encodes_to_empty_matrix() {
        let coder = jittered_2d(false);
        let encoded = coder.encode_batch(&Array2::zeros((2, 0)));
        assert_eq!(encoded.dim(), (coder.vec_len(), 0));
    }

    #[test]
    #[should_panic(expected = "dimension count")]
    fn batch_with_wrong_row_count_panics() {
        jittered_2d(false).encode_batch(&Array2::zeros((3, 1)));
    }
}

mod clamping {
    use super::*;

    #[test]
    fn below_min_maps_to_first_tile() {
        let coder = aligned_1d(vec![vec![4]], false);
        assert_eq!(coder.encode_indices(&[-5.0]), coder.encode_indices(&[0.0]));
        assert_eq!(coder.encode_indices(&[0.0]), vec![0]);
    }

    #[test]
    fn above_max_maps_to_last_tile() {
        let coder = aligned_1d(vec![vec![4]], false);
        assert_eq!(coder.encode_indices(&[5.0]), coder.encode_indices(&[1.0]));
        assert_eq!(coder.encode_indices(&[1.0]), vec![3]);
    }

    #[test]
    fn infinities_clamp_to_edges() {
        let coder = aligned_1d(vec![vec![4]], false);
        assert_eq!(coder.encode_indices(&[f64::NEG_INFINITY]), vec![0]);
        assert_eq!(coder.encode_indices(&[f64::INFINITY]), vec![3]);
    }
}

mod bias_unit {
    use super::*;

    #[test]
    fn bias_position_always_set() {
        let coder = jittered_2d(true);
        for p in sample_points(&coder, 50, 13) {
            assert_eq!(coder.encode(&p)[BIAS_INDEX], 1.0);
            assert_eq!(coder.encode_indices(&p)[0], BIAS_INDEX);
        }
    }

    #[test]
    fn bias_shifts_tiling_indices_by_one() {
        let plain = jittered_2d(false);
        let biased = jittered_2d(true);
        assert_eq!(biased.vec_len(), plain.vec_len() + 1);
        for p in sample_points(&plain, 50, 17) {
            let shifted: Vec<usize> = plain.encode_indices(&p).iter().map(|i| i + 1).collect();
            assert_eq!(biased.encode_indices(&p)[1..], shifted[..]);
        }
    }
}

mod length {
    use super::*;

    #[rstest]
    #[case(vec![0.0, 0.0], vec![vec![2, 2]], false, 4)]
    #[case(vec![0.0, 0.0], vec![vec![5, 5], vec![3, 3]], false, 34)]
    #[case(vec![0.0], vec![vec![10], vec![10], vec![10]], false, 30)]
    #[case(vec![0.0], vec![vec![10], vec![10], vec![10]], true, 31)]
    #[case(vec![0.0, 0.0, 0.0], vec![vec![2, 3, 4], vec![1, 1, 1]], true, 26)]
    fn vec_len_is_sum_of_tiling_products(
        #[case] min_bound: Vec<f64>,
        #[case] tile_counts: Vec<Vec<usize>>,
        #[case] bias: bool,
        #[case] expected: usize,
    ) {
        let max_bound = vec![1.0; min_bound.len()];
        let coder = TileCoder::new(min_bound, max_bound, tile_counts, 0, bias).unwrap();
        assert_eq!(coder.vec_len(), expected);
    }
}

mod worked_example {
    use super::*;

    #[rstest]
    #[case(0.25, vec![1.0, 0.0])]
    #[case(0.75, vec![0.0, 1.0])]
    #[case(1.0, vec![0.0, 1.0])]
    fn two_tile_unit_interval(#[case] x: f64, #[case] expected: Vec<f64>) {
        let coder = aligned_1d(vec![vec![2]], false);
        assert_eq!(coder.encode(&[x]), expected);
    }
}

mod concurrency {
    use super::*;

    #[test]
    fn concurrent_callers_see_consistent_results() {
        let coder = Arc::new(
            TileCoder::new(vec![0.0, 0.0], vec![1.0, 1.0], vec![vec![6, 6]; 32], 42, true)
                .unwrap(),
        );
        let points = sample_points(&coder, 64, 23);
        let expected: Vec<Vec<usize>> = points.iter().map(|p| coder.encode_indices(p)).collect();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let coder = Arc::clone(&coder);
                let points = points.clone();
                thread::spawn(move || {
                    points
                        .iter()
                        .map(|p| coder.encode_indices(p))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
