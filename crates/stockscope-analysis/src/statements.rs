//! Statement normalization: period-indexed frames → line item tables.

use polars::prelude::{Column, DataFrame, DataType};
use stockscope_core::{
    DataError, FinancialStatements, LineItem, PeriodType, Result, StatementKind, StatementTable,
    Value, date_from_epoch_days, sanitize,
};

/// Name of the column holding period identifiers.
pub const PERIOD_COLUMN: &str = "period";

/// Renders the period column as string labels (`YYYY-MM-DD` for dates).
fn period_labels(column: &Column) -> Result<Vec<String>> {
    match column.dtype() {
        DataType::Date | DataType::Datetime(_, _) => {
            let days = column.cast(&DataType::Date)?.cast(&DataType::Int32)?;
            let labels = days
                .as_materialized_series()
                .i32()?
                .into_iter()
                .map(|day| {
                    day.and_then(date_from_epoch_days)
                        .map_or_else(|| "N/A".to_string(), |d| d.format("%Y-%m-%d").to_string())
                })
                .collect();
            Ok(labels)
        }
        _ => {
            let text = column.cast(&DataType::String)?;
            let labels = text
                .as_materialized_series()
                .str()?
                .into_iter()
                .map(|label| label.unwrap_or("N/A").to_string())
                .collect();
            Ok(labels)
        }
    }
}

/// Converts one line item column into values, keeping integers as integers.
fn cell_values(column: &Column) -> Result<Vec<Value>> {
    let dtype = column.dtype();
    let values = if dtype.is_float() {
        let cast = column.cast(&DataType::Float64)?;
        cast.as_materialized_series()
            .f64()?
            .into_iter()
            .map(|v| sanitize(Value::from(v)))
            .collect()
    } else if matches!(dtype, DataType::UInt64) {
        column
            .as_materialized_series()
            .u64()?
            .into_iter()
            .map(|v| sanitize(Value::from(v)))
            .collect()
    } else if dtype.is_integer() {
        let cast = column.cast(&DataType::Int64)?;
        cast.as_materialized_series()
            .i64()?
            .into_iter()
            .map(Value::from)
            .collect()
    } else if matches!(dtype, DataType::Boolean) {
        column
            .as_materialized_series()
            .bool()?
            .into_iter()
            .map(Value::from)
            .collect()
    } else {
        let cast = column.cast(&DataType::String)?;
        cast.as_materialized_series()
            .str()?
            .into_iter()
            .map(Value::from)
            .collect()
    };
    Ok(values)
}

/// Transposes a period-indexed statement frame into line item → period → value.
///
/// A missing or empty frame yields an empty table. A non-empty frame must have
/// a [`PERIOD_COLUMN`]; every other column is a line item. Line items keep the
/// column order and periods keep the row order.
pub fn normalize_statement(frame: Option<&DataFrame>) -> Result<StatementTable> {
    let Some(df) = frame.filter(|df| df.height() > 0) else {
        return Ok(StatementTable::new());
    };

    let period = df.column(PERIOD_COLUMN).map_err(|_| {
        DataError::Parse(format!("Statement frame has no '{PERIOD_COLUMN}' column"))
    })?;
    let labels = period_labels(period)?;

    let mut table = StatementTable::new();
    for column in df.get_columns() {
        if column.name().as_str() == PERIOD_COLUMN {
            continue;
        }
        let values = labels.iter().cloned().zip(cell_values(column)?).collect();
        table.push(LineItem::new(column.name().as_str(), values));
    }
    Ok(table)
}

/// Normalizes a set of statement frames into the six-table record.
///
/// Statement slots with no frame are left empty.
pub fn normalize_statements<'a, I>(frames: I) -> Result<FinancialStatements>
where
    I: IntoIterator<Item = (StatementKind, PeriodType, Option<&'a DataFrame>)>,
{
    let mut statements = FinancialStatements::default();
    for (kind, period_type, frame) in frames {
        statements.set(kind, period_type, normalize_statement(frame)?);
    }
    Ok(statements)
}
