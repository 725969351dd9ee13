use log::LevelFilter;
use ndarray::Array2;
use ndarray_rand::RandomExt;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::StandardNormal;
use rpkd::{Index, TreeParams};

fn main() {
    simple_logging::log_to_stderr(LevelFilter::Info);

    let mut rng = SmallRng::seed_from_u64(0);
    let points = Array2::random_using((32, 3), StandardNormal, &mut rng);
    let params = TreeParams::new(4);

    for index in vec![
        Index::build_rotation(points.view(), &params, &mut rng).unwrap(),
        Index::build_convolution(points.view(), &params, &mut rng).unwrap(),
    ] {
        index.log_tree();
        let query = points.row(7);
        let candidates = index.search(query).unwrap();
        println!(
            "{}: {} leaves, depth {}, point 7 lands with {:?}",
            index.strategy(),
            index.leaf_count(),
            index.depth(),
            candidates
        );
    }
}
