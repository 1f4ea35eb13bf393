use ndarray::Array2;
use ndarray_rand::{
    rand::{rngs::StdRng, SeedableRng},
    rand_distr::Uniform,
    RandomExt,
};
use proptest::prelude::*;
use sparsemat::{read_matrix, write_matrix, SparseMatrix, Value};

fn build(n_rows: usize, n_cols: usize, entries: &[(usize, usize, Value)]) -> SparseMatrix {
    let mut m = SparseMatrix::new(n_rows, n_cols).unwrap();
    for &(i, j, v) in entries {
        m.set_element(i, j, v).unwrap();
    }
    m
}

fn matrix_strategy(n_rows: usize, n_cols: usize) -> impl Strategy<Value = SparseMatrix> {
    prop::collection::vec((0..n_rows, 0..n_cols, -50 as Value..50), 0..40)
        .prop_map(move |entries| build(n_rows, n_cols, &entries))
}

fn shape_strategy() -> impl Strategy<Value = (usize, usize)> {
    (1usize..12, 1usize..12)
}

fn same_shape_pair() -> impl Strategy<Value = (SparseMatrix, SparseMatrix)> {
    shape_strategy().prop_flat_map(|(r, c)| (matrix_strategy(r, c), matrix_strategy(r, c)))
}

fn conformant_pair() -> impl Strategy<Value = (SparseMatrix, SparseMatrix)> {
    (1usize..10, 1usize..10, 1usize..10)
        .prop_flat_map(|(r, k, c)| (matrix_strategy(r, k), matrix_strategy(k, c)))
}

fn serialize(m: &SparseMatrix) -> String {
    let mut out = Vec::new();
    write_matrix(m, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

proptest! {
    /// Property: writing then reading yields the same matrix
    #[test]
    fn prop_text_round_trip((m, _) in same_shape_pair()) {
        let text = serialize(&m);
        let (back, report) = read_matrix(text.as_bytes()).unwrap();
        prop_assert_eq!(report.processed, m.nnz());
        prop_assert_eq!(report.skipped, 0);
        prop_assert_eq!(back, m);
    }

    /// Property: entry lines are strictly increasing by (row, col)
    #[test]
    fn prop_output_sorted((m, _) in same_shape_pair()) {
        let text = serialize(&m);
        let coords: Vec<(usize, usize)> = text
            .lines()
            .skip(2)
            .map(|line| {
                let fields: Vec<&str> = line[1..line.len() - 1].split(", ").collect();
                let i: usize = fields[0].parse().unwrap();
                let j: usize = fields[1].parse().unwrap();
                (i, j)
            })
            .collect();
        prop_assert_eq!(coords.len(), m.nnz());
        prop_assert!(coords.windows(2).all(|w| w[0] < w[1]));
    }

    /// Property: writing zero clears the cell and never grows nnz
    #[test]
    fn prop_zero_write_deletes((m, _) in same_shape_pair(), i in 0usize..12, j in 0usize..12) {
        let mut m = m;
        let (i, j) = (i % m.n_rows(), j % m.n_cols());
        let before = m.nnz();
        m.set_element(i, j, 0).unwrap();
        prop_assert_eq!(m.get_element(i, j).unwrap(), 0);
        prop_assert!(m.nnz() <= before);
    }

    /// Property: adding the zero matrix is the identity
    #[test]
    fn prop_additive_identity((m, _) in same_shape_pair()) {
        let zero = SparseMatrix::new(m.n_rows(), m.n_cols()).unwrap();
        prop_assert_eq!(m.add(&zero).unwrap(), m.clone());
        prop_assert_eq!(zero.add(&m).unwrap(), m);
    }

    /// Property: (M + N) - N == M
    #[test]
    fn prop_add_subtract_inverse((m, n) in same_shape_pair()) {
        let back = m.add(&n).unwrap().subtract(&n).unwrap();
        prop_assert_eq!(back, m);
    }

    /// Property: addition agrees with the dense sum
    #[test]
    fn prop_add_matches_dense((m, n) in same_shape_pair()) {
        prop_assert_eq!(m.add(&n).unwrap().to_dense(), m.to_dense() + n.to_dense());
        prop_assert_eq!(m.subtract(&n).unwrap().to_dense(), m.to_dense() - n.to_dense());
    }

    /// Property: multiplying by the identity leaves M unchanged
    #[test]
    fn prop_identity_multiply((m, _) in same_shape_pair()) {
        let right = SparseMatrix::identity(m.n_cols()).unwrap();
        let left = SparseMatrix::identity(m.n_rows()).unwrap();
        prop_assert_eq!(m.multiply(&right).unwrap(), m.clone());
        prop_assert_eq!(left.multiply(&m).unwrap(), m);
    }

    /// Property: sparse product agrees with the dense product
    #[test]
    fn prop_multiply_matches_dense((a, b) in conformant_pair()) {
        let c = a.multiply(&b).unwrap();
        prop_assert_eq!(c.shape(), (a.n_rows(), b.n_cols()));
        prop_assert_eq!(c.to_dense(), a.to_dense().dot(&b.to_dense()));
        prop_assert!(c.iter().all(|(_, _, v)| v != 0));
    }

    /// Property: parallel multiplication matches the sequential result
    #[test]
    fn prop_parallel_multiply((a, b) in conformant_pair(), n_workers in 1usize..6) {
        prop_assert_eq!(a.multiply_parallel(&b, n_workers).unwrap(), a.multiply(&b).unwrap());
    }
}

#[test]
fn test_random_dense_products() {
    let mut rng = StdRng::seed_from_u64(4102000);
    for &(r, k, c) in &[(1, 1, 1), (7, 3, 5), (16, 16, 16), (31, 2, 40)] {
        let dist = Uniform::new_inclusive(-3 as Value, 3);
        let a: Array2<Value> = Array2::random_using((r, k), dist, &mut rng);
        let b: Array2<Value> = Array2::random_using((k, c), dist, &mut rng);

        let sa = SparseMatrix::from_dense(a.view()).unwrap();
        let sb = SparseMatrix::from_dense(b.view()).unwrap();
        assert_eq!(sa.nnz(), a.iter().filter(|&&v| v != 0).count());

        let expected = a.dot(&b);
        assert_eq!(sa.multiply(&sb).unwrap().to_dense(), expected);
        assert_eq!(sa.multiply_parallel(&sb, 4).unwrap().to_dense(), expected);
    }
}
