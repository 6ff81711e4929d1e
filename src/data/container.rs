use serde_json::{Map, Value};
use tracing::debug;

use crate::core::dispatch::UpdateDispatcher;
use crate::core::value::DomainValue;

/// One record of tabular data, keyed by field name.
pub type DataRow = Map<String, Value>;

/// Initial rows handed to a container: known up front or awaiting an
/// external load.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RowsInput {
    /// Rows arrive later through [`DataContainer::resolve_rows`].
    #[default]
    Pending,
    Ready(Vec<DataRow>),
}

impl From<Vec<DataRow>> for RowsInput {
    fn from(rows: Vec<DataRow>) -> Self {
        Self::Ready(rows)
    }
}

/// A named, identified table of rows.
///
/// Containers are read-only after their rows are available; scales read from
/// them during sorts and computed parameters hand their rows to replayed
/// events.
#[derive(Debug)]
pub struct DataContainer {
    id: String,
    name: String,
    loading: bool,
    rows: Vec<DataRow>,
    dispatcher: UpdateDispatcher,
}

impl DataContainer {
    pub fn new(id: impl Into<String>, name: impl Into<String>, rows: RowsInput) -> Self {
        let (loading, rows) = match rows {
            RowsInput::Pending => (true, Vec::new()),
            RowsInput::Ready(rows) => (false, rows),
        };
        Self {
            id: id.into(),
            name: name.into(),
            loading,
            rows,
            dispatcher: UpdateDispatcher::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True while pending rows have not been resolved yet. Row reads return
    /// an empty slice until resolution.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    /// Rows as a JSON array, the shape handed to computed parameters.
    #[must_use]
    pub fn rows_value(&self) -> Value {
        Value::Array(self.rows.iter().cloned().map(Value::Object).collect())
    }

    /// Completed load of pending rows. Calling this on an already resolved
    /// container is ignored.
    pub fn resolve_rows(&mut self, rows: Vec<DataRow>) {
        if !self.loading {
            debug!(container = %self.id, "ignoring row resolution for a container that is not loading");
            return;
        }
        self.rows = rows;
        self.loading = false;
        self.dispatcher.emit_update();
    }

    pub fn on_update(&mut self, subscriber: impl Into<String>, callback: impl FnMut() + 'static) {
        self.dispatcher.on_update(subscriber, callback);
    }

    pub fn unsubscribe(&mut self, subscriber: &str) {
        self.dispatcher.unsubscribe(subscriber);
    }
}

/// Value of field `key` in the first row whose `row_key` field equals
/// `row_value`. `None` when no row matches or the field is absent/null.
#[must_use]
pub(crate) fn row_field(
    rows: &[DataRow],
    row_key: &str,
    row_value: &DomainValue,
    key: &str,
) -> Option<DomainValue> {
    rows.iter()
        .find(|row| {
            row.get(row_key)
                .and_then(DomainValue::from_json)
                .is_some_and(|value| value == *row_value)
        })
        .and_then(|row| row.get(key))
        .and_then(DomainValue::from_json)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{DataContainer, DataRow, RowsInput, row_field};
    use crate::core::value::DomainValue;

    fn rows() -> Vec<DataRow> {
        [
            json!({ "sample_id": "S1", "signatures": 4 }),
            json!({ "sample_id": "S2", "signatures": 1.5 }),
            json!({ "sample_id": "S3" }),
        ]
        .into_iter()
        .map(|row| row.as_object().expect("row object").clone())
        .collect()
    }

    #[test]
    fn row_field_matches_by_key_column() {
        let rows = rows();
        assert_eq!(
            row_field(&rows, "sample_id", &DomainValue::from("S2"), "signatures"),
            Some(DomainValue::from(1.5)),
        );
        // Absent field and absent row both come back empty.
        assert_eq!(
            row_field(&rows, "sample_id", &DomainValue::from("S3"), "signatures"),
            None,
        );
        assert_eq!(
            row_field(&rows, "sample_id", &DomainValue::from("S9"), "signatures"),
            None,
        );
    }

    #[test]
    fn pending_rows_resolve_once() {
        let mut container = DataContainer::new("muts", "Mutations", RowsInput::Pending);
        assert!(container.is_loading());
        assert!(container.rows().is_empty());

        container.resolve_rows(rows());
        assert!(!container.is_loading());
        assert_eq!(container.rows().len(), 3);

        container.resolve_rows(Vec::new());
        assert_eq!(container.rows().len(), 3);
    }

    #[test]
    fn rows_value_is_a_json_array() {
        let container = DataContainer::new("muts", "Mutations", RowsInput::Ready(rows()));
        let value = container.rows_value();
        assert_eq!(value.as_array().map(Vec::len), Some(3));
        assert_eq!(value[0]["sample_id"], json!("S1"));
    }
}
