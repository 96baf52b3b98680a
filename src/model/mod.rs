//! Data model for column values

mod sample;
mod schema;
mod value;

pub use sample::ColumnSample;
pub use schema::CellType;
pub use value::CellValue;
