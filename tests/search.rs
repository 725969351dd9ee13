use approx::assert_abs_diff_eq;
use ndarray::{array, Array1, Array2};
use ndarray_rand::RandomExt;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::StandardNormal;
use rpkd::*;

#[test]
fn test_rotation_query_matches_matrix() {
    let mut rng = SmallRng::seed_from_u64(5);
    let data = Array2::random_using((200, 8), StandardNormal, &mut rng);
    let rotation = Rotation::prepare(data.view(), &mut rng).unwrap();
    let projected = rotation.project_matrix(data.view()).unwrap();
    assert_eq!(projected.values().dim(), (200, 8));
    for (row, expected) in data.outer_iter().zip(projected.values().outer_iter()) {
        let query = rotation.project_query(row).unwrap();
        assert_eq!(query.len(), 8);
        for (&a, &b) in query.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-9);
        }
    }
    for level in 0..20 {
        let column = rotation.project_for_level(data.view(), level).unwrap();
        assert_eq!(column, projected.column(level));
    }
}

#[test]
fn test_in_sample_queries_find_themselves() {
    let mut rng = SmallRng::seed_from_u64(6);
    let data = Array2::random_using((500, 8), StandardNormal, &mut rng);
    let params = TreeParams::new(10);
    let indices = vec![
        Index::build_rotation(data.view(), &params, &mut rng).unwrap(),
        Index::build_convolution(data.view(), &params, &mut rng).unwrap(),
    ];
    for index in &indices {
        for (ix, row) in data.outer_iter().enumerate() {
            let found = index.search(row).unwrap();
            assert!(
                found.contains(&ix),
                "{} index lost point {}",
                index.strategy(),
                ix
            );
            assert!(found.len() <= 10);
        }
    }
}

#[test]
fn test_deterministic_descent() {
    let mut rng = SmallRng::seed_from_u64(7);
    let data = Array2::random_using((400, 6), StandardNormal, &mut rng);
    let queries = Array2::random_using((50, 6), StandardNormal, &mut rng);
    let index = Index::build_convolution(data.view(), &TreeParams::new(8), &mut rng).unwrap();
    for query in queries.outer_iter() {
        let leaf = index.search_leaf(query).unwrap();
        assert!(leaf.is_leaf());
        let first = index.search(query).unwrap().to_vec();
        assert_eq!(leaf.indices().unwrap(), &first[..]);
        for _ in 0..3 {
            assert_eq!(index.search(query).unwrap(), &first[..]);
            assert_eq!(index.search_leaf(query).unwrap().id(), leaf.id());
        }
    }
}

#[test]
fn test_equal_goes_right() {
    let data = array![[0.0], [1.0], [2.0], [3.0]];
    let rotation = Rotation::from_matrix(Array2::eye(1)).unwrap();
    let tree = Tree::build_with(data.view(), &TreeParams::new(2), rotation, &MedianSplit).unwrap();
    assert_eq!(tree.root().threshold(), Some(1.5));
    assert_eq!(tree.search(array![1.5].view()).unwrap(), &[2, 3]);
    assert_eq!(tree.search(array![1.4999].view()).unwrap(), &[0, 1]);
    assert_eq!(tree.search(array![-100.0].view()).unwrap(), &[0, 1]);
    assert_eq!(tree.search(array![100.0].view()).unwrap(), &[2, 3]);
}

#[test]
fn test_convolution_descent() {
    // With one dimension the convolution just scales every point by the seed.
    let data = array![[0.0], [1.0], [2.0], [3.0]];
    let convolution = Convolution::from_seed(array![2.0]).unwrap();
    let params = TreeParams::new(2);
    let tree = Tree::build_with(data.view(), &params, convolution, &MedianSplit).unwrap();
    assert_eq!(tree.root().threshold(), Some(3.0));
    assert_eq!(tree.search(array![1.5].view()).unwrap(), &[2, 3]);
    assert_eq!(tree.search(array![1.0].view()).unwrap(), &[0, 1]);
    assert_eq!(tree.projection().kernel(), array![2.0]);
}

#[test]
fn test_query_dimension_mismatch() {
    let mut rng = SmallRng::seed_from_u64(8);
    let data = Array2::random_using((30, 4), StandardNormal, &mut rng);
    let params = TreeParams::new(5);
    for index in vec![
        Index::build_rotation(data.view(), &params, &mut rng).unwrap(),
        Index::build_convolution(data.view(), &params, &mut rng).unwrap(),
    ] {
        assert_eq!(
            index.search(array![1.0, 2.0, 3.0].view()),
            Err(Error::DimensionMismatch {
                expected: 4,
                found: 3
            })
        );
        assert!(index.search_leaf(Array1::zeros(5).view()).is_err());
    }
}

#[test]
fn test_shared_readers() {
    let mut rng = SmallRng::seed_from_u64(9);
    let data = Array2::random_using((300, 5), StandardNormal, &mut rng);
    let index = Index::build_rotation(data.view(), &TreeParams::new(6), &mut rng).unwrap();
    let expected = data
        .outer_iter()
        .map(|row| index.search(row).unwrap().to_vec())
        .collect::<Vec<_>>();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for (row, expected) in data.outer_iter().zip(&expected) {
                    assert_eq!(index.search(row).unwrap(), &expected[..]);
                }
            });
        }
    });
}
