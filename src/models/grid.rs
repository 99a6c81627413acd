use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One grid row as returned by the data endpoint.
///
/// Records are immutable once fetched; they carry no identity beyond their
/// position in the loaded sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRecord {
    // The upstream feed capitalizes the name key.
    #[serde(rename = "Name")]
    pub name: String,
    pub email: String,
    pub country: String,
    pub phone: String,
}

impl RowRecord {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        country: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            country: country.into(),
            phone: phone.into(),
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Country => &self.country,
            Field::Phone => &self.phone,
        }
    }
}

/// Field key a column maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Country,
    Phone,
}

/// One column definition: header label, source field and a width ratio
/// shared by the tabular encoders.
#[derive(Debug, Clone)]
pub struct GridColumn {
    pub header: String,
    pub field: Field,
    pub width: f64,
}

impl GridColumn {
    pub fn new(header: impl Into<String>, field: Field, width: f64) -> Self {
        Self {
            header: header.into(),
            field,
            width,
        }
    }
}

/// The fixed four-column layout of the grid.
pub fn default_columns() -> Vec<GridColumn> {
    vec![
        GridColumn::new("Name", Field::Name, 2.0),
        GridColumn::new("Email", Field::Email, 3.0),
        GridColumn::new("Country", Field::Country, 2.0),
        GridColumn::new("Phone", Field::Phone, 2.0),
    ]
}

/// Rows held in memory for the duration of a run, plus when they were fetched.
#[derive(Debug, Clone)]
pub struct GridSnapshot {
    pub rows: Vec<RowRecord>,
    pub fetched_at: DateTime<Local>,
}

impl GridSnapshot {
    pub fn new(rows: Vec<RowRecord>) -> Self {
        Self {
            rows,
            fetched_at: Local::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_record_deserializes_capitalized_name_key() {
        let json = r#"{"Name":"Ada","email":"ada@x.com","country":"UK","phone":"1"}"#;
        let record: RowRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, RowRecord::new("Ada", "ada@x.com", "UK", "1"));
    }

    #[test]
    fn field_accessor_follows_column_order() {
        let record = RowRecord::new("Grace", "grace@x.com", "US", "2");
        let values: Vec<&str> = default_columns()
            .iter()
            .map(|col| record.field(col.field))
            .collect();
        assert_eq!(values, vec!["Grace", "grace@x.com", "US", "2"]);
    }

    #[test]
    fn default_columns_match_grid_headers() {
        let columns = default_columns();
        let headers: Vec<&str> = columns
            .iter()
            .map(|col| col.header.as_str())
            .collect();
        assert_eq!(headers, vec!["Name", "Email", "Country", "Phone"]);
    }
}
