pub mod grid;

pub use grid::{default_columns, Field, GridColumn, GridSnapshot, RowRecord};
