use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::portal::domain::{FundFlow, FundRecord, RecordId};

#[derive(Debug)]
pub enum FundImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    UnknownType { line: usize, value: String },
}

impl fmt::Display for FundImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FundImportError::Io(err) => write!(f, "failed to read fund export: {err}"),
            FundImportError::Csv(err) => write!(f, "invalid fund CSV data: {err}"),
            FundImportError::UnknownType { line, value } => write!(
                f,
                "line {line}: fund type '{value}' is neither income nor expense"
            ),
        }
    }
}

impl std::error::Error for FundImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FundImportError::Io(err) => Some(err),
            FundImportError::Csv(err) => Some(err),
            FundImportError::UnknownType { .. } => None,
        }
    }
}

impl From<std::io::Error> for FundImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for FundImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads fund ledger lines from a CSV export.
///
/// Expected header: `id,type,month,amount,department,expense_type,project,needed_amount,
/// invoice_images,product_images`. `id` may be blank (a positional id is assigned) and the
/// image columns hold `;`-separated URLs.
pub struct FundRecordImporter;

impl FundRecordImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<FundRecord>, FundImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<FundRecord>, FundImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for (index, row) in csv_reader.deserialize::<FundRow>().enumerate() {
            let row = row?;
            // header is line 1
            records.push(row.into_record(index + 2)?);
        }

        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
struct FundRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    month: String,
    amount: i64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    department: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    expense_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    project: Option<String>,
    #[serde(default)]
    needed_amount: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    invoice_images: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    product_images: Option<String>,
}

impl FundRow {
    fn into_record(self, line: usize) -> Result<FundRecord, FundImportError> {
        let flow = match self.kind.to_ascii_lowercase().as_str() {
            "income" | "收入" => FundFlow::Income {
                department: self.department,
            },
            "expense" | "支出" => FundFlow::Expense {
                expense_type: self.expense_type,
                project: self.project,
                needed_amount: self.needed_amount,
            },
            _ => {
                return Err(FundImportError::UnknownType {
                    line,
                    value: self.kind,
                })
            }
        };

        Ok(FundRecord {
            id: RecordId(self.id.unwrap_or_else(|| format!("csv-{line}"))),
            month: self.month,
            amount: self.amount,
            flow,
            invoice_images: split_images(self.invoice_images),
            product_images: split_images(self.product_images),
        })
    }
}

fn split_images(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(';')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str =
        "id,type,month,amount,department,expense_type,project,needed_amount,invoice_images,product_images\n";

    #[test]
    fn imports_income_and_expense_rows() {
        let csv = format!(
            "{HEADER}inc1,income,1月,500,技术部,,,,,\n\
             ,expense,2月,750,,活动支出,下午茶,800,a.png; b.png,c.png\n"
        );
        let records = FundRecordImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, RecordId::from("inc1"));
        assert_eq!(
            records[0].flow,
            FundFlow::Income {
                department: Some("技术部".to_string())
            }
        );

        let expense = &records[1];
        assert_eq!(expense.id, RecordId::from("csv-3"));
        assert_eq!(
            expense.flow,
            FundFlow::Expense {
                expense_type: Some("活动支出".to_string()),
                project: Some("下午茶".to_string()),
                needed_amount: Some(800),
            }
        );
        assert_eq!(expense.invoice_images, vec!["a.png", "b.png"]);
        assert_eq!(expense.product_images, vec!["c.png"]);
    }

    #[test]
    fn blank_department_survives_import_for_the_matrix_to_skip() {
        let csv = format!("{HEADER}x,income,1月,100,,,,,,\n");
        let records = FundRecordImporter::from_reader(Cursor::new(csv)).expect("import succeeds");
        assert_eq!(records[0].flow, FundFlow::Income { department: None });
    }

    #[test]
    fn unknown_type_reports_line() {
        let csv = format!("{HEADER}x,transfer,1月,100,,,,,,\n");
        let error = FundRecordImporter::from_reader(Cursor::new(csv)).expect_err("rejected");
        match error {
            FundImportError::UnknownType { line, value } => {
                assert_eq!(line, 2);
                assert_eq!(value, "transfer");
            }
            other => panic!("expected unknown type, got {other:?}"),
        }
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = FundRecordImporter::from_path("./does-not-exist.csv").expect_err("io error");
        assert!(matches!(error, FundImportError::Io(_)));
    }
}
