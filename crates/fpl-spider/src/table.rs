use crate::extract::Fragment;
use serde::Serialize;
use serde_json::{Map, Value};

pub(crate) static NULL: Value = Value::Null;

/// One row: column name to value, in column order.
pub type Row = Map<String, Value>;

/// Rows and columns produced by one load.
///
/// Every row carries every column, in the order of `columns`; fields a record lacked are
/// `null`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Turns a fragment into a table. `name` labels the single column of scalar rows.
    pub fn from_fragment(fragment: Fragment, name: &str) -> Self {
        match fragment {
            Fragment::Records(records) => Self::from_records(records, name),
            Fragment::Object(object) => Self::from_records(vec![Value::Object(object)], name),
            Fragment::Scalar(value) => {
                let mut row = Row::new();
                row.insert(name.to_string(), value);
                Self::from_rows(vec![row])
            }
        }
    }

    fn from_records(records: Vec<Value>, name: &str) -> Self {
        let rows = records
            .into_iter()
            .map(|record| match record {
                Value::Object(row) => row,
                other => {
                    let mut row = Row::new();
                    row.insert(name.to_string(), other);
                    row
                }
            })
            .collect();
        Self::from_rows(rows)
    }

    /// Builds the column list from first appearance, then pads every row.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut table = Self {
            columns: Vec::new(),
            rows,
        };
        for row in &table.rows {
            for column in row.keys() {
                if !table.columns.contains(column) {
                    table.columns.push(column.clone());
                }
            }
        }
        table.normalise();
        table
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sets `column` to `value` on every row. An existing column keeps its position and is
    /// overwritten; a new one is appended.
    pub fn enrich(&mut self, column: &str, value: &Value) {
        if !self.columns.iter().any(|c| c == column) {
            self.columns.push(column.to_string());
        }
        for row in &mut self.rows {
            row.insert(column.to_string(), value.clone());
        }
    }

    /// Appends the rows of `other`; columns become the union of both tables.
    pub fn append(&mut self, other: Table) {
        for column in other.columns {
            if !self.columns.contains(&column) {
                self.columns.push(column);
            }
        }
        self.rows.extend(other.rows);
        self.normalise();
    }

    /// Values of `column`, top to bottom.
    pub fn column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.rows
            .iter()
            .map(move |row| row.get(column).unwrap_or(&NULL))
    }

    // rebuild each row so that its keys follow `columns`, filling gaps with null
    fn normalise(&mut self) {
        let columns = &self.columns;
        for row in &mut self.rows {
            let in_order = row.len() == columns.len()
                && row.keys().zip(columns.iter()).all(|(key, column)| key == column);
            if in_order {
                continue;
            }

            let mut old = std::mem::take(row);
            *row = columns
                .iter()
                .map(|column| {
                    let value = old.remove(column).unwrap_or(Value::Null);
                    (column.clone(), value)
                })
                .collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(table: &Table) -> Value {
        Value::Array(table.rows.iter().cloned().map(Value::Object).collect())
    }

    #[test]
    fn records_become_rows() {
        let fragment = Fragment::Records(vec![
            json!({"id": 1, "name": "Arsenal"}),
            json!({"id": 2, "name": "Aston Villa"}),
        ]);
        let table = Table::from_fragment(fragment, "teams");
        assert_eq!(table.columns, ["id", "name"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn union_of_columns_pads_with_null() {
        let fragment = Fragment::Records(vec![
            json!({"id": 1, "web_name": "Raya"}),
            json!({"id": 2, "news": "Knock - 75%"}),
        ]);
        let table = Table::from_fragment(fragment, "elements");
        assert_eq!(table.columns, ["id", "web_name", "news"]);
        assert_eq!(
            rows(&table),
            json!([
                {"id": 1, "web_name": "Raya", "news": null},
                {"id": 2, "web_name": null, "news": "Knock - 75%"}
            ])
        );
    }

    #[test]
    fn scalar_is_one_row_one_column() {
        let table = Table::from_fragment(Fragment::Scalar(json!(8823456)), "total_players");
        assert_eq!(table.columns, ["total_players"]);
        assert_eq!(rows(&table), json!([{"total_players": 8823456}]));
    }

    #[test]
    fn non_object_items_take_the_fragment_name() {
        let table = Table::from_fragment(Fragment::Records(vec![json!(1), json!("x")]), "chips");
        assert_eq!(table.columns, ["chips"]);
        assert_eq!(rows(&table), json!([{"chips": 1}, {"chips": "x"}]));
    }

    #[test]
    fn object_is_one_row() {
        let object = json!({"scoring": {"goals": 4}, "league_h2h_tiebreak": "points", "squad_size": 15});
        let Value::Object(object) = object else {
            unreachable!()
        };
        let table = Table::from_fragment(Fragment::Object(object), "game_settings");
        assert_eq!(table.columns, ["scoring", "league_h2h_tiebreak", "squad_size"]);
        assert_eq!(
            rows(&table),
            json!([{"scoring": {"goals": 4}, "league_h2h_tiebreak": "points", "squad_size": 15}])
        );
    }

    #[test]
    fn empty_objects_keep_their_rows() {
        let table = Table::from_fragment(Fragment::Records(vec![json!({}), json!({})]), "t");
        assert!(table.columns.is_empty());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn empty_records_give_empty_table() {
        let table = Table::from_fragment(Fragment::Records(vec![]), "picks");
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }

    #[test]
    fn enrich_overwrites_in_place() {
        let fragment = Fragment::Records(vec![json!({"entry": 9, "points": 50})]);
        let mut table = Table::from_fragment(fragment, "entry_history");
        table.enrich("entry", &json!(7));
        table.enrich("event", &json!(3));
        assert_eq!(table.columns, ["entry", "points", "event"]);
        assert_eq!(rows(&table), json!([{"entry": 7, "points": 50, "event": 3}]));
    }

    #[test]
    fn append_unions_columns() {
        let mut a = Table::from_fragment(Fragment::Records(vec![json!({"a": 1})]), "t");
        let b = Table::from_fragment(Fragment::Records(vec![json!({"b": 2})]), "t");
        a.append(b);
        assert_eq!(a.columns, ["a", "b"]);
        assert_eq!(rows(&a), json!([{"a": 1, "b": null}, {"a": null, "b": 2}]));
        assert_eq!(a.column("b").collect::<Vec<_>>(), [&Value::Null, &json!(2)]);
    }
}
