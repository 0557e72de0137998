use std::path::Path;

use crate::error::ModelError;
use crate::feature::Feature;

/// Column holding the observed yield (t/ha).
pub const TARGET_COLUMN: &str = "Hasil Kasar";

/// Rows following the header that carry Orange type/flag metadata.
const METADATA_ROWS: usize = 2;

/// Normalized feature rows with their observed yield.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSet {
    pub features: Vec<[f64; 8]>,
    pub targets: Vec<f64>,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_csv_str(&text)
    }

    /// Parses an Orange-exported CSV: header, two metadata rows, then data.
    /// Rows with an empty or non-numeric value in any used column are dropped.
    pub fn from_csv_str(text: &str) -> Result<Self, ModelError> {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());
        let header = split_record(lines.next().ok_or(ModelError::MissingHeader)?);

        let column = |name: &str| {
            header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ModelError::MissingColumn(name.to_string()))
        };
        let mut feature_idx = [0usize; 8];
        for feature in Feature::ALL {
            feature_idx[feature.index()] = column(feature.column())?;
        }
        let target_idx = column(TARGET_COLUMN)?;

        let mut set = TrainingSet::default();
        for line in lines.skip(METADATA_ROWS) {
            let record = split_record(line);
            let cell = |i: usize| record.get(i).and_then(|v| v.parse::<f64>().ok());

            let Some(target) = cell(target_idx).filter(|v| v.is_finite()) else {
                continue;
            };
            let mut row = [0.0; 8];
            let mut complete = true;
            for (slot, idx) in row.iter_mut().zip(feature_idx) {
                match cell(idx).filter(|v| v.is_finite()) {
                    Some(v) => *slot = v,
                    None => {
                        complete = false;
                        break;
                    }
                }
            }
            if complete {
                set.features.push(row);
                set.targets.push(target);
            }
        }

        if set.is_empty() {
            return Err(ModelError::Empty);
        }
        Ok(set)
    }
}

/// Splits one CSV record, honouring double-quoted fields.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "NDVI_BOHOR,TMIN_All,TMAX_All,RAIN1,TotalSRAD,SOIL_pH,\"SOIL_CEC (meq/100)\",SOIL_OC,Hasil Kasar";

    #[test]
    fn skips_metadata_and_incomplete_rows() {
        let csv = format!(
            "{HEADER}\n\
             continuous,continuous,continuous,continuous,continuous,continuous,continuous,continuous,continuous\n\
             ,,,,,,,,class\n\
             0.5,0.4,0.6,0.2,0.5,0.5,0.3,0.2,4.1\n\
             0.6,0.5,,0.2,0.5,0.5,0.3,0.2,4.4\n\
             0.7,0.5,0.6,0.3,0.6,0.5,0.4,0.2,n/a\n\
             0.8,0.6,0.5,0.4,0.7,0.6,0.5,0.3,5.2\n"
        );
        let set = TrainingSet::from_csv_str(&csv).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.targets, vec![4.1, 5.2]);
        assert_eq!(set.features[1][0], 0.8);
    }

    #[test]
    fn missing_target_column_is_reported() {
        let csv = "NDVI_BOHOR,TMIN_All\nx,y\nz,w\n0.1,0.2\n";
        let err = TrainingSet::from_csv_str(csv).unwrap_err();
        assert!(matches!(err, ModelError::MissingColumn(_)));
    }

    #[test]
    fn header_only_is_empty() {
        let csv = format!("{HEADER}\nmeta\nmeta\n");
        assert!(matches!(
            TrainingSet::from_csv_str(&csv),
            Err(ModelError::Empty)
        ));
    }

    #[test]
    fn quoted_fields_keep_commas() {
        assert_eq!(
            split_record("a,\"b, c\",\"d \"\"e\"\"\""),
            vec!["a", "b, c", "d \"e\""]
        );
    }
}
