use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::{pymodule, types::PyModule, Bound, PyErr, PyResult, Python};

use crate::brute::{generate_rules, mine};
use crate::error::BasketError;
use crate::fp::{fp_growth, FrequentLevel};
use crate::store::transactions_from_one_hot;

impl From<BasketError> for PyErr {
    fn from(error: BasketError) -> Self {
        PyValueError::new_err(error.to_string())
    }
}

type ItemsetRows = Vec<Vec<usize>>;

fn level_to_array<'py>(py: Python<'py>, level: &FrequentLevel) -> PyResult<Bound<'py, PyArray2<usize>>> {
    let size = level.itemset_size;
    let mut data = vec![0usize; level.len() * size];

    for (i, (itemset, _)) in level.iter_itemsets().enumerate() {
        data[i * size..(i + 1) * size].copy_from_slice(itemset);
    }

    let array = Array2::from_shape_vec((level.len(), size), data)
        .map_err(|_| PyValueError::new_err("Failed to create array"))?;
    Ok(array.into_pyarray(py))
}

#[pymodule]
fn basket<'py>(m: &Bound<'py, PyModule>) -> PyResult<()> {
    /// Exhaustive frequent itemsets of a one-hot matrix: (itemsets, supports).
    #[pyfn(m)]
    #[pyo3(name = "brute_force")]
    fn brute_force_py<'py>(
        transactions: PyReadonlyArray2<'py, i32>,
        min_support: f64,
    ) -> PyResult<(ItemsetRows, Vec<f64>)> {
        let transactions = transactions_from_one_hot(transactions.as_array());
        let frequent = mine(&transactions, min_support)?;

        let mut rows: Vec<_> = frequent.iter().collect();
        rows.sort_unstable_by(|a, b| a.0.len().cmp(&b.0.len()).then(a.0.cmp(b.0)));
        Ok(rows
            .into_iter()
            .map(|(itemset, support)| (itemset.items().to_vec(), support))
            .unzip())
    }

    /// Rules of the exhaustive miner: (antecedents, consequents, supports, confidences).
    #[pyfn(m)]
    #[pyo3(name = "brute_force_rules")]
    fn brute_force_rules_py<'py>(
        transactions: PyReadonlyArray2<'py, i32>,
        min_support: f64,
        min_confidence: f64,
    ) -> PyResult<(ItemsetRows, ItemsetRows, Vec<f64>, Vec<f64>)> {
        let transactions = transactions_from_one_hot(transactions.as_array());
        let frequent = mine(&transactions, min_support)?;
        let rules = generate_rules(&frequent, min_confidence)?;

        let mut antecedents = Vec::with_capacity(rules.len());
        let mut consequents = Vec::with_capacity(rules.len());
        let mut supports = Vec::with_capacity(rules.len());
        let mut confidences = Vec::with_capacity(rules.len());
        for rule in rules {
            supports.push(rule.support);
            confidences.push(rule.confidence);
            antecedents.push(rule.antecedent.into_vec());
            consequents.push(rule.consequent.into_vec());
        }
        Ok((antecedents, consequents, supports, confidences))
    }

    /// FP-growth itemsets, one (n_itemsets, k) array per size k.
    #[pyfn(m)]
    #[pyo3(name = "fp_growth")]
    fn fp_growth_py<'py>(
        py: Python<'py>,
        transactions: PyReadonlyArray2<'py, i32>,
        min_support: f64,
    ) -> PyResult<Vec<Bound<'py, PyArray2<usize>>>> {
        let levels = fp_growth(transactions.as_array(), min_support)?;

        levels
            .iter()
            .filter(|level| !level.is_empty())
            .map(|level| level_to_array(py, level))
            .collect()
    }

    Ok(())
}
