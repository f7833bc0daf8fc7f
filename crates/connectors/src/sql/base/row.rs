use crate::sql::base::error::DbError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use core::fmt;
use model::core::value::Value;
use mysql_async::{
    Column as MySqlColumn, Row as MySqlRow, Value as MySqlValue,
    consts::{ColumnFlags, ColumnType},
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use std::{error::Error, fmt::Formatter};
use tokio_postgres::{
    Row as PgRow,
    types::{FromSql, Kind, Type},
};

/// MySQL's pseudo character set for binary strings.
const MYSQL_BINARY_CHARSET: u16 = 63;

pub enum DbRow<'a> {
    MySqlRow(&'a MySqlRow),
    PostgresRow(&'a PgRow),
}

impl DbRow<'_> {
    /// Decodes every cell of the row, in column order. A cell the driver
    /// cannot represent fails the whole row.
    pub fn to_values(&self) -> Result<Vec<Value>, DbError> {
        match self {
            DbRow::MySqlRow(row) => Ok(row
                .columns_ref()
                .iter()
                .enumerate()
                .map(|(idx, column)| match row.as_ref(idx) {
                    Some(raw) => mysql_cell(raw, column),
                    None => Value::Null,
                })
                .collect()),
            DbRow::PostgresRow(row) => (0..row.len()).map(|idx| pg_cell(row, idx)).collect(),
        }
    }
}

impl fmt::Debug for DbRow<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DbRow::MySqlRow(row) => write!(f, "{row:?}"),
            DbRow::PostgresRow(row) => write!(f, "{row:?}"),
        }
    }
}

fn is_binary(column: &MySqlColumn) -> bool {
    column.character_set() == MYSQL_BINARY_CHARSET
        || (column.flags().contains(ColumnFlags::BINARY_FLAG)
            && !matches!(
                column.column_type(),
                ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL
            ))
}

fn utf8_or_bytes(bytes: Vec<u8>) -> Value {
    String::from_utf8(bytes)
        .map(Value::String)
        .unwrap_or_else(|err| Value::Bytes(err.into_bytes()))
}

pub(crate) fn mysql_cell(raw: &MySqlValue, column: &MySqlColumn) -> Value {
    match raw {
        MySqlValue::NULL => Value::Null,
        MySqlValue::Int(v) => Value::Int(*v),
        MySqlValue::UInt(v) => Value::Uint(*v),
        MySqlValue::Float(v) => Value::Float(f64::from(*v)),
        MySqlValue::Double(v) => Value::Float(*v),
        MySqlValue::Bytes(bytes) => mysql_bytes(bytes, column),
        MySqlValue::Date(year, month, day, hour, minute, second, micros) => {
            let Some(date) =
                NaiveDate::from_ymd_opt(i32::from(*year), u32::from(*month), u32::from(*day))
            else {
                // zero dates such as 0000-00-00 have no calendar equivalent
                return Value::Null;
            };
            match column.column_type() {
                ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE => Value::Date(date),
                _ => date
                    .and_hms_micro_opt(
                        u32::from(*hour),
                        u32::from(*minute),
                        u32::from(*second),
                        *micros,
                    )
                    .map(|naive| Value::Timestamp(naive.and_utc()))
                    .unwrap_or(Value::Null),
            }
        }
        MySqlValue::Time(negative, days, hours, minutes, seconds, micros) => {
            if !negative
                && *days == 0
                && let Some(time) = NaiveTime::from_hms_micro_opt(
                    u32::from(*hours),
                    u32::from(*minutes),
                    u32::from(*seconds),
                    *micros,
                )
            {
                return Value::Time(time);
            }
            // TIME spans -838:59:59..838:59:59, beyond a time of day
            let sign = if *negative { "-" } else { "" };
            let total_hours = u64::from(*days) * 24 + u64::from(*hours);
            Value::String(format!(
                "{sign}{total_hours}:{minutes:02}:{seconds:02}.{micros:06}"
            ))
        }
    }
}

fn mysql_bytes(bytes: &[u8], column: &MySqlColumn) -> Value {
    match column.column_type() {
        ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
            let text = String::from_utf8_lossy(bytes);
            text.parse::<f64>()
                .map(Value::Float)
                .unwrap_or_else(|_| Value::String(text.into_owned()))
        }
        ColumnType::MYSQL_TYPE_JSON => serde_json::from_slice(bytes)
            .map(Value::Json)
            .unwrap_or_else(|_| utf8_or_bytes(bytes.to_vec())),
        ColumnType::MYSQL_TYPE_BIT | ColumnType::MYSQL_TYPE_GEOMETRY => {
            Value::Bytes(bytes.to_vec())
        }
        ColumnType::MYSQL_TYPE_TINY_BLOB
        | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
        | ColumnType::MYSQL_TYPE_LONG_BLOB
        | ColumnType::MYSQL_TYPE_BLOB
        | ColumnType::MYSQL_TYPE_VAR_STRING
        | ColumnType::MYSQL_TYPE_VARCHAR
        | ColumnType::MYSQL_TYPE_STRING
            if is_binary(column) =>
        {
            Value::Bytes(bytes.to_vec())
        }
        _ => utf8_or_bytes(bytes.to_vec()),
    }
}

/// Cells whose binary wire format is their text: the character types,
/// enum labels and text-like extension types such as `citext`.
#[derive(Debug, PartialEq)]
pub(crate) struct PgText(String);

impl<'a> FromSql<'a> for PgText {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        <&str as FromSql>::from_sql(ty, raw).map(|text| PgText(text.to_string()))
    }

    fn accepts(ty: &Type) -> bool {
        matches!(ty.kind(), Kind::Enum(_)) || <&str as FromSql>::accepts(ty)
    }
}

fn pg_get<'a, T>(row: &'a PgRow, idx: usize) -> Result<Option<T>, tokio_postgres::Error>
where
    T: FromSql<'a>,
{
    row.try_get::<_, Option<T>>(idx)
}

pub(crate) fn pg_cell(row: &PgRow, idx: usize) -> Result<Value, DbError> {
    let column = &row.columns()[idx];
    let pg_type = column.type_();

    let decoded = match pg_type.name() {
        "bool" => pg_get::<bool>(row, idx).map(|v| v.map(Value::Boolean)),
        "int2" => pg_get::<i16>(row, idx).map(|v| v.map(|v| Value::Int(i64::from(v)))),
        "int4" => pg_get::<i32>(row, idx).map(|v| v.map(|v| Value::Int(i64::from(v)))),
        "int8" => pg_get::<i64>(row, idx).map(|v| v.map(Value::Int)),
        "oid" => pg_get::<u32>(row, idx).map(|v| v.map(|v| Value::Uint(u64::from(v)))),
        "float4" => pg_get::<f32>(row, idx).map(|v| v.map(|v| Value::Float(f64::from(v)))),
        "float8" => pg_get::<f64>(row, idx).map(|v| v.map(Value::Float)),
        "numeric" => pg_get::<Decimal>(row, idx).map(|v| {
            v.map(|d| d.to_f64().map(Value::Float).unwrap_or_else(|| Value::String(d.to_string())))
        }),
        "json" | "jsonb" => pg_get::<serde_json::Value>(row, idx).map(|v| v.map(Value::Json)),
        "uuid" => pg_get::<uuid::Uuid>(row, idx).map(|v| v.map(Value::Uuid)),
        "bytea" => pg_get::<Vec<u8>>(row, idx).map(|v| v.map(Value::Bytes)),
        "date" => pg_get::<NaiveDate>(row, idx).map(|v| v.map(Value::Date)),
        "time" => pg_get::<NaiveTime>(row, idx).map(|v| v.map(Value::Time)),
        "timestamp" => pg_get::<NaiveDateTime>(row, idx)
            .map(|v| v.map(|naive| Value::Timestamp(naive.and_utc()))),
        "timestamptz" => {
            pg_get::<chrono::DateTime<Utc>>(row, idx).map(|v| v.map(Value::Timestamp))
        }
        _ => pg_get::<PgText>(row, idx).map(|v| v.map(|PgText(text)| Value::String(text))),
    };

    decoded
        .map(|value| value.unwrap_or(Value::Null))
        .map_err(|source| DbError::Decode {
            column: column.name().to_string(),
            pg_type: pg_type.name().to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn mood_enum() -> Type {
        Type::new(
            "mood".into(),
            91_001,
            Kind::Enum(vec!["sad".into(), "happy".into()]),
            "public".into(),
        )
    }

    fn col(column_type: ColumnType) -> MySqlColumn {
        MySqlColumn::new(column_type)
    }

    #[test]
    fn mysql_decimals_become_floats() {
        let value = mysql_cell(
            &MySqlValue::Bytes(b"12.50".to_vec()),
            &col(ColumnType::MYSQL_TYPE_NEWDECIMAL),
        );
        assert_eq!(value, Value::Float(12.5));
    }

    #[test]
    fn mysql_json_is_parsed() {
        let value = mysql_cell(
            &MySqlValue::Bytes(br#"{"a":1}"#.to_vec()),
            &col(ColumnType::MYSQL_TYPE_JSON),
        );
        assert_eq!(value, Value::Json(serde_json::json!({"a": 1})));
    }

    #[test]
    fn mysql_text_and_invalid_utf8() {
        let column = col(ColumnType::MYSQL_TYPE_VAR_STRING);
        assert_eq!(
            mysql_cell(&MySqlValue::Bytes(b"abc".to_vec()), &column),
            Value::String("abc".into())
        );
        assert_eq!(
            mysql_cell(&MySqlValue::Bytes(vec![0xff, 0xfe]), &column),
            Value::Bytes(vec![0xff, 0xfe])
        );
    }

    #[test]
    fn mysql_dates_follow_the_column_type() {
        let raw = MySqlValue::Date(2024, 2, 29, 13, 5, 7, 0);
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            mysql_cell(&raw, &col(ColumnType::MYSQL_TYPE_DATE)),
            Value::Date(date)
        );
        assert_eq!(
            mysql_cell(&raw, &col(ColumnType::MYSQL_TYPE_DATETIME)),
            Value::Timestamp(Utc.with_ymd_and_hms(2024, 2, 29, 13, 5, 7).unwrap())
        );
        assert_eq!(
            mysql_cell(
                &MySqlValue::Date(0, 0, 0, 0, 0, 0, 0),
                &col(ColumnType::MYSQL_TYPE_DATE)
            ),
            Value::Null
        );
    }

    #[test]
    fn mysql_times_beyond_a_day_stay_textual() {
        let column = col(ColumnType::MYSQL_TYPE_TIME);
        assert_eq!(
            mysql_cell(&MySqlValue::Time(false, 0, 1, 2, 3, 0), &column),
            Value::Time(NaiveTime::from_hms_opt(1, 2, 3).unwrap())
        );
        assert_eq!(
            mysql_cell(&MySqlValue::Time(true, 1, 2, 0, 0, 0), &column),
            Value::String("-26:00:00.000000".into())
        );
    }

    #[test]
    fn mysql_numbers_keep_their_sign() {
        let column = col(ColumnType::MYSQL_TYPE_LONGLONG);
        assert_eq!(mysql_cell(&MySqlValue::Int(-4), &column), Value::Int(-4));
        assert_eq!(
            mysql_cell(&MySqlValue::UInt(u64::MAX), &column),
            Value::Uint(u64::MAX)
        );
        assert_eq!(mysql_cell(&MySqlValue::NULL, &column), Value::Null);
    }

    #[test]
    fn pg_enums_and_text_types_decode_as_text() {
        let mood = mood_enum();
        assert!(<PgText as FromSql>::accepts(&mood));
        assert!(<PgText as FromSql>::accepts(&Type::TEXT));
        assert!(<PgText as FromSql>::accepts(&Type::BPCHAR));
        assert_eq!(
            <PgText as FromSql>::from_sql(&mood, b"happy").unwrap(),
            PgText("happy".into())
        );
    }

    #[test]
    fn pg_types_without_a_text_encoding_are_refused() {
        for ty in [Type::INTERVAL, Type::INET, Type::MONEY, Type::INT4_ARRAY] {
            assert!(!<PgText as FromSql>::accepts(&ty), "{ty} accepted");
        }
    }
}
