// Demonstration: tile-code a few points and show dense, index and batch output.
//
// Run from the repo root:
//   cargo run --example tile_coding -- --tilings 4 --tiles 5 --seed 7

use std::env;

use ndarray::Array2;
use tilerl::tile_coding::dense_to_indices;
use tilerl::TileCodingConfig;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let tilings: usize = arg_value(&args, "--tilings")
        .and_then(|s| s.parse().ok())
        .unwrap_or(4);
    let tiles: usize = arg_value(&args, "--tiles")
        .and_then(|s| s.parse().ok())
        .unwrap_or(5);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(7);

    let config = TileCodingConfig::uniform(vec![0.0, -1.0], vec![1.0, 1.0], tilings, tiles, seed)
        .with_bias_unit(true);
    let coder = match config.build() {
        Ok(coder) => coder,
        Err(e) => {
            eprintln!("Invalid tile coder configuration: {}", e);
            std::process::exit(2);
        }
    };
    println!("{}", coder);
    println!("Feature vector length: {}", coder.vec_len());

    let points = [[0.1, -0.9], [0.5, 0.0], [0.99, 0.99], [3.0, -7.0]];
    for p in &points {
        let dense = coder.encode(p);
        println!(
            "{:?} -> indices {:?} (dense non-zeros {:?})",
            p,
            coder.encode_indices(p),
            dense_to_indices(&dense).unwrap_or_default()
        );
    }

    let batch = Array2::from_shape_fn((2, points.len()), |(d, i)| points[i][d]);
    let encoded = coder.encode_batch(&batch);
    println!("Batch output shape: {:?}", encoded.dim());
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
