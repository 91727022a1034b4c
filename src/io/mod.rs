pub mod output;
pub mod row;
pub mod table;

pub use row::{Language, Row, SortSentinels};
pub use table::{read_table, ColumnSpec, Delimiter, TableReader};
