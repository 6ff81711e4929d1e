//! Tabular data holders consumed by scale sorts and computed parameters.

mod container;
mod payload;

pub use container::{DataContainer, DataRow, RowsInput};
pub use payload::DataPayload;

pub(crate) use container::row_field;
