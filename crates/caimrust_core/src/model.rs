use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::errors::CaimError;
use crate::scheme::DiscretizationScheme;

/// Finalized discretization for one column: the interval scheme plus one
/// nominal label per interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnModel {
    pub column: String,
    pub scheme: DiscretizationScheme,
    pub labels: Vec<String>,
}

impl ColumnModel {
    /// CAIM itself does not name intervals, so bins are labeled by index.
    pub fn with_index_labels(column: &str, scheme: DiscretizationScheme) -> Self {
        let labels = (0..scheme.interval_count())
            .map(|i| format!("bin_{}", i))
            .collect();
        ColumnModel {
            column: column.to_string(),
            scheme,
            labels,
        }
    }

    /// Label of the interval containing `x`. Values outside the fitted
    /// range land in the first or last interval.
    pub fn label_for(&self, x: f64) -> &str {
        &self.labels[self.scheme.interval_index_of(x)]
    }

    /// Rewrite a column of values to interval labels. Missing input cells
    /// stay missing, they are never given a label.
    pub fn project(&self, values: &[f64]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|&v| {
                if v.is_nan() {
                    None
                } else {
                    Some(self.label_for(v).to_string())
                }
            })
            .collect()
    }
}

/// The persisted output of a fit: one entry per included column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaimModel {
    columns: Vec<ColumnModel>,
}

impl CaimModel {
    pub fn new(columns: Vec<ColumnModel>) -> Self {
        CaimModel { columns }
    }

    pub fn columns(&self) -> &[ColumnModel] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnModel> {
        self.columns.iter().find(|c| c.column == name)
    }

    pub fn project_column(&self, name: &str, values: &[f64]) -> Result<Vec<Option<String>>, CaimError> {
        let column = self.column(name).ok_or_else(|| CaimError::UnknownColumn {
            column: name.to_string(),
        })?;
        Ok(column.project(values))
    }

    /// Serialize the model. Boundary doubles survive the round trip
    /// bit-exactly; the byte layout itself is not part of the contract.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), CaimError> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CaimError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn two_bin_model() -> ColumnModel {
        let mut scheme = DiscretizationScheme::new(1.0, 13.0);
        scheme.insert_bound(7.0).unwrap();
        ColumnModel::with_index_labels("fare", scheme)
    }

    #[test]
    fn test_index_labels() {
        let model = two_bin_model();
        assert_eq!(model.labels, vec!["bin_0", "bin_1"]);
    }

    #[test]
    fn test_project_keeps_missing_missing() {
        let model = two_bin_model();
        let out = model.project(&[2.0, f64::NAN, 8.0]);
        assert_eq!(
            out,
            vec![
                Some("bin_0".to_string()),
                None,
                Some("bin_1".to_string())
            ]
        );
    }

    #[test]
    fn test_project_clamps_out_of_range() {
        let model = two_bin_model();
        assert_eq!(model.label_for(-100.0), "bin_0");
        assert_eq!(model.label_for(100.0), "bin_1");
    }

    #[test]
    fn test_project_unknown_column() {
        let model = CaimModel::new(vec![two_bin_model()]);
        assert!(model.project_column("fare", &[2.0]).is_ok());
        assert!(matches!(
            model.project_column("age", &[2.0]),
            Err(CaimError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_round_trip_is_exact() {
        let mut scheme = DiscretizationScheme::new(0.1, 97.3);
        // Awkward doubles on purpose; the round trip must preserve bits.
        for v in [7.0 / 3.0, 6.95, 50.4958, 79.65] {
            scheme.insert_bound(v).unwrap();
        }
        let model = CaimModel::new(vec![ColumnModel::with_index_labels("fare", scheme)]);
        let mut buf = Vec::new();
        model.to_writer(&mut buf).unwrap();
        let restored = CaimModel::from_reader(buf.as_slice()).unwrap();
        assert_eq!(restored, model);
        let restored_bounds = restored.columns()[0].scheme.cut_points();
        let bounds = model.columns()[0].scheme.cut_points();
        for (a, b) in bounds.iter().zip(&restored_bounds) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}
