use serde_json::Value;
use tokio_postgres::types::{ToSql, Type};

/// Postgres column type inferred from the values of one column.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ColumnType {
    BigInt,
    Double,
    Boolean,
    Text,
    Jsonb,
}

impl ColumnType {
    /// Type of a column holding `values`. Integers widen to doubles; any other mix, and any
    /// nested value, is stored as `JSONB`. A column of nulls is `TEXT`.
    pub(crate) fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        values
            .into_iter()
            .filter_map(Self::of)
            .reduce(|acc, ty| match (acc, ty) {
                (a, b) if a == b => a,
                (ColumnType::BigInt, ColumnType::Double) | (ColumnType::Double, ColumnType::BigInt) => {
                    ColumnType::Double
                }
                _ => ColumnType::Jsonb,
            })
            .unwrap_or(ColumnType::Text)
    }

    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(ColumnType::Boolean),
            Value::Number(n) if n.is_i64() => Some(ColumnType::BigInt),
            Value::Number(_) => Some(ColumnType::Double),
            Value::String(_) => Some(ColumnType::Text),
            Value::Array(_) | Value::Object(_) => Some(ColumnType::Jsonb),
        }
    }

    pub(crate) fn sql(self) -> &'static str {
        match self {
            ColumnType::BigInt => "BIGINT",
            ColumnType::Double => "DOUBLE PRECISION",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Text => "TEXT",
            ColumnType::Jsonb => "JSONB",
        }
    }

    pub(crate) fn pg_type(self) -> Type {
        match self {
            ColumnType::BigInt => Type::INT8,
            ColumnType::Double => Type::FLOAT8,
            ColumnType::Boolean => Type::BOOL,
            ColumnType::Text => Type::TEXT,
            ColumnType::Jsonb => Type::JSONB,
        }
    }

    /// Converts one JSON value for a binary COPY. JSON `null` becomes SQL `NULL`.
    pub(crate) fn cell(self, value: &Value) -> Box<dyn ToSql + Sync + Send> {
        match self {
            ColumnType::BigInt => Box::new(value.as_i64()),
            ColumnType::Double => Box::new(value.as_f64()),
            ColumnType::Boolean => Box::new(value.as_bool()),
            ColumnType::Text => Box::new(value.as_str().map(str::to_string)),
            ColumnType::Jsonb => Box::new((!value.is_null()).then(|| value.clone())),
        }
    }
}

/// Double-quotes an identifier, so API field names are used verbatim.
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn qualified(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

///////////////////////////////////////////////////////
// write-replace
///////////////////////////////////////////////////////

pub(crate) fn create_schema(schema: &str) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(schema))
}

pub(crate) fn drop_table(schema: &str, table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", qualified(schema, table))
}

pub(crate) fn create_table(schema: &str, table: &str, columns: &[(&str, ColumnType)]) -> String {
    let columns = columns
        .iter()
        .map(|(name, ty)| format!("{} {}", quote_ident(name), ty.sql()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({columns})", qualified(schema, table))
}

pub(crate) fn copy_in(schema: &str, table: &str, columns: &[&str]) -> String {
    let columns = columns
        .iter()
        .map(|name| quote_ident(name))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "COPY {} ({columns}) FROM STDIN WITH (FORMAT binary)",
        qualified(schema, table)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn infer_types() {
        assert_eq!(ColumnType::infer(&[json!(1), json!(null), json!(3)]), ColumnType::BigInt);
        assert_eq!(ColumnType::infer(&[json!(1), json!(2.5)]), ColumnType::Double);
        assert_eq!(ColumnType::infer(&[json!("4.5"), json!("5.0")]), ColumnType::Text);
        assert_eq!(ColumnType::infer(&[json!(true)]), ColumnType::Boolean);
        assert_eq!(ColumnType::infer(&[json!([1, 2])]), ColumnType::Jsonb);
        assert_eq!(ColumnType::infer(&[json!(1), json!("1")]), ColumnType::Jsonb);
        assert_eq!(ColumnType::infer(&[json!(null)]), ColumnType::Text);
        assert_eq!(ColumnType::infer(std::iter::empty::<&Value>()), ColumnType::Text);
    }

    #[test]
    fn null_cells_are_sql_null() {
        let types = [
            ColumnType::BigInt,
            ColumnType::Double,
            ColumnType::Boolean,
            ColumnType::Text,
            ColumnType::Jsonb,
        ];
        for ty in types {
            assert_eq!(format!("{:?}", ty.cell(&Value::Null)), "None", "{ty:?}");
        }
    }

    #[test]
    fn cells_follow_column_type() {
        let cell = |ty: ColumnType, value: Value| format!("{:?}", ty.cell(&value));
        assert_eq!(cell(ColumnType::BigInt, json!(42)), "Some(42)");
        // integers in a widened column
        assert_eq!(cell(ColumnType::Double, json!(3)), "Some(3.0)");
        assert_eq!(cell(ColumnType::Double, json!(4.5)), "Some(4.5)");
        assert_eq!(cell(ColumnType::Boolean, json!(true)), "Some(true)");
        assert_eq!(cell(ColumnType::Text, json!("Raya")), "Some(\"Raya\")");
        assert_ne!(cell(ColumnType::Jsonb, json!([1, 2])), "None");
    }

    #[test]
    fn create_table_quotes_identifiers() {
        let stmt = create_table(
            "fpl",
            "standings",
            &[("entry", ColumnType::BigInt), ("player \"name\"", ColumnType::Text)],
        );
        assert_eq!(
            stmt,
            "CREATE TABLE \"fpl\".\"standings\" (\"entry\" BIGINT, \"player \"\"name\"\"\" TEXT)"
        );
    }

    #[test]
    fn copy_statement() {
        assert_eq!(
            copy_in("fpl", "total_players", &["total_players"]),
            "COPY \"fpl\".\"total_players\" (\"total_players\") FROM STDIN WITH (FORMAT binary)"
        );
        assert_eq!(drop_table("fpl", "teams"), "DROP TABLE IF EXISTS \"fpl\".\"teams\"");
    }
}
