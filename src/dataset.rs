use std::path::{Path, PathBuf};

use csv::StringRecord;
use tracing::{debug, info};

use crate::error::{BasketError, Result};
use crate::store::TransactionStore;

const ITEM_NAME_COLUMN: &str = "Item Name";
const TRANSACTION_COLUMN: &str = "Transaction";

/// One of the bundled store datasets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSpec {
    pub choice: &'static str,
    pub name: &'static str,
    pub key: &'static str,
}

pub static CATALOGUE: [DatasetSpec; 5] = [
    DatasetSpec::new("1", "Amazon", "amazon"),
    DatasetSpec::new("2", "K-mart", "kmart"),
    DatasetSpec::new("3", "Best Buy", "bestbuy"),
    DatasetSpec::new("4", "Nike", "nike"),
    DatasetSpec::new("5", "Walmart", "walmart"),
];

impl DatasetSpec {
    const fn new(choice: &'static str, name: &'static str, key: &'static str) -> Self {
        Self { choice, name, key }
    }

    pub fn by_choice(choice: &str) -> Result<&'static DatasetSpec> {
        let choice = choice.trim();
        CATALOGUE
            .iter()
            .find(|spec| spec.choice == choice)
            .ok_or_else(|| BasketError::UnknownDataset {
                choice: choice.to_owned(),
            })
    }

    pub fn items_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(format!("{}_items.csv", self.key))
    }

    pub fn transactions_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(format!("{}_transactions.csv", self.key))
    }

    pub fn load(&self, data_dir: &Path) -> Result<TransactionStore> {
        let store = load(
            &self.items_path(data_dir),
            &self.transactions_path(data_dir),
        )?;
        info!(
            dataset = self.name,
            items = store.catalogue_len(),
            transactions = store.len(),
            "loaded dataset"
        );
        Ok(store)
    }
}

/// Loads an items CSV and a transactions CSV into a store.
pub fn load(items_path: &Path, transactions_path: &Path) -> Result<TransactionStore> {
    let catalogue = read_column(items_path, ITEM_NAME_COLUMN)?;
    let transactions = read_column(transactions_path, TRANSACTION_COLUMN)?;
    debug!(
        items = catalogue.len(),
        transactions = transactions.len(),
        "read dataset files"
    );

    Ok(TransactionStore::from_names(
        catalogue.iter().map(|name| name.trim()),
        transactions.iter().map(|row| split_items(row)),
    ))
}

/// The comma-separated item list of one transaction cell.
pub fn split_items(cell: &str) -> Vec<&str> {
    cell.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

fn read_column(path: &Path, column: &'static str) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(BasketError::MissingDataFile {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_path(path)?;
    let headers = reader.headers()?.clone();
    let position = column_position(&headers, column).ok_or_else(|| BasketError::MissingColumn {
        path: path.to_path_buf(),
        column,
    })?;

    let mut values = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let value = record.get(position).ok_or_else(|| BasketError::MalformedRow {
            path: path.to_path_buf(),
            row: index + 1,
            column,
        })?;
        values.push(value.to_owned());
    }
    Ok(values)
}

fn column_position(headers: &StringRecord, column: &str) -> Option<usize> {
    headers.iter().position(|header| header == column)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write_dataset(dir: &Path, items: &str, transactions: &str) {
        fs::write(dir.join("amazon_items.csv"), items).unwrap();
        fs::write(dir.join("amazon_transactions.csv"), transactions).unwrap();
    }

    #[test]
    fn test_catalogue_lookup() {
        assert_eq!(CATALOGUE.len(), 5);
        for (position, spec) in CATALOGUE.iter().enumerate() {
            assert_eq!(spec.choice, (position + 1).to_string());
            assert_eq!(DatasetSpec::by_choice(spec.choice).unwrap(), spec);
        }
        assert_eq!(DatasetSpec::by_choice("3").unwrap().name, "Best Buy");
        assert_eq!(DatasetSpec::by_choice(" 5 ").unwrap().key, "walmart");
        assert!(matches!(
            DatasetSpec::by_choice("6").unwrap_err(),
            BasketError::UnknownDataset { .. }
        ));
    }

    #[test]
    fn test_split_items() {
        assert_eq!(
            split_items(" A Beginner's Guide, Java: The Complete Reference ,,"),
            vec!["A Beginner's Guide", "Java: The Complete Reference"]
        );
    }

    #[test]
    fn test_load_quoted_transactions() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(
            dir.path(),
            "Item #,Item Name\n1,Milk\n2,Bread\n3,Eggs\n",
            "Transaction ID,Transaction\n\
             Trans1,\"Milk, Bread\"\n\
             Trans2,\"Bread, Eggs, Bread\"\n\
             Trans3,Milk\n",
        );

        let spec = DatasetSpec::by_choice("1").unwrap();
        let store = spec.load(dir.path()).unwrap();

        assert_eq!(store.catalogue_len(), 3);
        assert_eq!(store.len(), 3);
        assert_eq!(store.transactions()[1].items(), &[1, 2]);
        assert_eq!(store.transactions()[2].items(), &[0]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let spec = DatasetSpec::by_choice("2").unwrap();
        let err = spec.load(dir.path()).unwrap_err();
        assert!(matches!(err, BasketError::MissingDataFile { .. }));
    }

    #[test]
    fn test_load_short_row_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(
            dir.path(),
            "Item #,Item Name\n1,Milk\n2,Bread\n",
            "Transaction ID,Transaction\n\
             T1,\"Milk, Bread\"\n\
             T2\n\
             T3,Milk\n",
        );

        let err = DatasetSpec::by_choice("1")
            .unwrap()
            .load(dir.path())
            .unwrap_err();
        assert!(matches!(
            err,
            BasketError::MalformedRow { row: 2, column: "Transaction", .. }
        ));
    }

    #[test]
    fn test_load_empty_field_keeps_empty_transaction() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(
            dir.path(),
            "Item #,Item Name\n1,Milk\n2,Bread\n",
            "Transaction ID,Transaction\n\
             T1,\"Milk, Bread\"\n\
             T2,Bread\n\
             T3,Milk\n\
             T4,\n",
        );

        let store = DatasetSpec::by_choice("1").unwrap().load(dir.path()).unwrap();
        assert_eq!(store.len(), 4);
        assert!(store.transactions()[3].is_empty());

        let milk = crate::brute::Itemset::new(vec![0]);
        let support = crate::brute::support(&milk, store.transactions()).unwrap();
        assert_eq!(support, 0.5);
    }

    #[test]
    fn test_load_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(
            dir.path(),
            "Item #,Name\n1,Milk\n",
            "Transaction ID,Transaction\nT1,Milk\n",
        );
        let err = DatasetSpec::by_choice("1")
            .unwrap()
            .load(dir.path())
            .unwrap_err();
        assert!(matches!(
            err,
            BasketError::MissingColumn { column: "Item Name", .. }
        ));
    }
}
