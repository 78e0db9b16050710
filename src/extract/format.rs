use anyhow::{anyhow, bail, Context, Result};
use chrono::{Days, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use tiberius::numeric::Numeric;
use tiberius::time::{Date, DateTime, DateTime2, DateTimeOffset, SmallDateTime, Time};
use tiberius::ColumnData;

use crate::common::row::Row;
use crate::common::value::SqlValue;

/// Converts a tiberius row into a [`Row`], keeping the select order.
pub fn convert_row(row: tiberius::Row) -> Result<Row> {
    let column_names: Vec<String> = row
        .columns()
        .iter()
        .map(|column| column.name().to_string())
        .collect();

    let mut converted = Row::new();

    for (column_name, item) in column_names.into_iter().zip(row) {
        let value = convert_column_value(item)
            .with_context(|| format!("Invalid value in column {}", column_name))?;
        converted.push(column_name, value);
    }

    Ok(converted)
}

pub fn convert_column_value(item: ColumnData<'static>) -> Result<SqlValue> {
    let value: SqlValue = match item {
        ColumnData::U8(val) => val.map(|v| SqlValue::Int(v.into())).into(),
        ColumnData::I16(val) => val.map(|v| SqlValue::Int(v.into())).into(),
        ColumnData::I32(val) => val.map(|v| SqlValue::Int(v.into())).into(),
        ColumnData::I64(val) => val.map(SqlValue::Int).into(),
        ColumnData::F32(val) => val.map(|v| SqlValue::Float(v.into())).into(),
        ColumnData::F64(val) => val.map(SqlValue::Float).into(),
        ColumnData::Bit(val) => val.map(SqlValue::Bool).into(),
        ColumnData::String(val) => val.map(|v| SqlValue::Text(v.into_owned())).into(),
        ColumnData::Guid(val) => val.map(|v| SqlValue::Text(v.to_string())).into(),
        ColumnData::Binary(val) => val.map(|v| SqlValue::Bytes(v.into_owned())).into(),
        ColumnData::Numeric(val) => val.map(|v| SqlValue::Text(format_numeric(&v))).into(),
        ColumnData::Xml(val) => val
            .map(|v| SqlValue::Text(v.into_owned().into_string()))
            .into(),
        ColumnData::Time(val) => transpose(val.map(convert_time))?,
        ColumnData::Date(val) => transpose(val.map(convert_date))?,
        ColumnData::SmallDateTime(val) => transpose(val.map(convert_small_datetime))?,
        ColumnData::DateTime(val) => transpose(val.map(convert_datetime))?,
        ColumnData::DateTime2(val) => transpose(val.map(convert_datetime2))?,
        ColumnData::DateTimeOffset(val) => transpose(val.map(convert_datetime_offset))?,
    };

    Ok(value)
}

fn transpose(value: Option<Result<SqlValue>>) -> Result<SqlValue> {
    value.unwrap_or(Ok(SqlValue::Null))
}

pub fn format_numeric(numeric: &Numeric) -> String {
    format_decimal(numeric.value(), numeric.scale())
}

/// Renders an unscaled integer with `scale` fractional digits, e.g. `(-105, 2)` as `-1.05`.
pub fn format_decimal(value: i128, scale: u8) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let digits = value.unsigned_abs().to_string();

    if scale == 0 {
        return format!("{}{}", sign, digits);
    }

    let scale = scale as usize;
    let padded = format!("{:0>width$}", digits, width = scale + 1);
    let (int_part, dec_part) = padded.split_at(padded.len() - scale);

    format!("{}{}.{}", sign, int_part, dec_part)
}

fn convert_time(time: Time) -> Result<SqlValue> {
    from_increments(time.increments(), time.scale()).map(SqlValue::Time)
}

fn convert_date(date: Date) -> Result<SqlValue> {
    from_days(date.days().into(), 1).map(SqlValue::Date)
}

fn convert_small_datetime(dt: SmallDateTime) -> Result<SqlValue> {
    let datetime = NaiveDateTime::new(
        from_days(dt.days().into(), 1900)?,
        from_minutes(dt.seconds_fragments().into())?,
    );
    Ok(SqlValue::DateTime(datetime))
}

fn convert_datetime(dt: DateTime) -> Result<SqlValue> {
    let datetime = NaiveDateTime::new(
        from_days(dt.days().into(), 1900)?,
        from_sec_fragments(dt.seconds_fragments())?,
    );
    Ok(SqlValue::DateTime(datetime))
}

fn convert_datetime2(dt: DateTime2) -> Result<SqlValue> {
    naive_datetime2(&dt).map(SqlValue::DateTime)
}

fn convert_datetime_offset(dto: DateTimeOffset) -> Result<SqlValue> {
    // The wire value is UTC, the offset only says how to display it
    let utc = naive_datetime2(&dto.datetime2())?;
    let offset = FixedOffset::east_opt(i32::from(dto.offset()) * 60)
        .ok_or_else(|| anyhow!("Invalid time zone offset: {} minutes", dto.offset()))?;

    Ok(SqlValue::DateTimeOffset(offset.from_utc_datetime(&utc)))
}

fn naive_datetime2(dt: &DateTime2) -> Result<NaiveDateTime> {
    Ok(NaiveDateTime::new(
        from_days(dt.date().days().into(), 1)?,
        from_increments(dt.time().increments(), dt.time().scale())?,
    ))
}

pub fn from_days(days: i64, base_year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(base_year, 1, 1)
        .and_then(|base| {
            if days >= 0 {
                base.checked_add_days(Days::new(days.unsigned_abs()))
            } else {
                base.checked_sub_days(Days::new(days.unsigned_abs()))
            }
        })
        .ok_or_else(|| anyhow!("Date out of range: {} days after {}-01-01", days, base_year))
}

pub fn from_minutes(minutes: u32) -> Result<NaiveTime> {
    NaiveTime::from_num_seconds_from_midnight_opt(minutes * 60, 0)
        .ok_or_else(|| anyhow!("Time out of range: {} minutes after midnight", minutes))
}

/// Time of a legacy `datetime`, counted in 1/300 second fragments.
pub fn from_sec_fragments(seconds_fragments: u32) -> Result<NaiveTime> {
    // Rounded to the nearest nanosecond, a fragment is 3.333... ms
    let nanoseconds = (u64::from(seconds_fragments) * 1_000_000_000 + 150) / 300;
    let seconds = nanoseconds / 1_000_000_000;
    let nanoseconds_remainder = nanoseconds % 1_000_000_000;

    NaiveTime::from_num_seconds_from_midnight_opt(seconds as u32, nanoseconds_remainder as u32)
    .ok_or_else(|| anyhow!("Time out of range: {} second fragments", seconds_fragments))
}

/// Time counted in increments of `10^-scale` seconds.
pub fn from_increments(increments: u64, scale: u8) -> Result<NaiveTime> {
    if scale > 9 {
        bail!("Invalid time scale: {}", scale);
    }

    let nanoseconds = u128::from(increments) * 10u128.pow(9 - u32::from(scale));
    let seconds = nanoseconds / 1_000_000_000;
    let nanoseconds_remainder = nanoseconds % 1_000_000_000;

    u32::try_from(seconds)
        .ok()
        .and_then(|seconds| {
            NaiveTime::from_num_seconds_from_midnight_opt(seconds, nanoseconds_remainder as u32)
        })
        .ok_or_else(|| anyhow!("Time out of range: {} increments at scale {}", increments, scale))
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use chrono::Datelike;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn integers_widen_to_int() {
        assert_eq!(
            convert_column_value(ColumnData::U8(Some(7))).unwrap(),
            SqlValue::Int(7)
        );
        assert_eq!(
            convert_column_value(ColumnData::I16(Some(-3))).unwrap(),
            SqlValue::Int(-3)
        );
        assert_eq!(
            convert_column_value(ColumnData::I32(None)).unwrap(),
            SqlValue::Null
        );
        assert_eq!(
            convert_column_value(ColumnData::Bit(Some(true))).unwrap(),
            SqlValue::Bool(true)
        );
    }

    #[test]
    fn strings_and_binaries_are_owned() {
        assert_eq!(
            convert_column_value(ColumnData::String(Some(Cow::Borrowed("Home")))).unwrap(),
            SqlValue::from("Home")
        );
        assert_eq!(
            convert_column_value(ColumnData::Binary(Some(Cow::Owned(vec![1, 2])))).unwrap(),
            SqlValue::Bytes(vec![1, 2])
        );
        assert_eq!(
            convert_column_value(ColumnData::String(None)).unwrap(),
            SqlValue::Null
        );
    }

    #[test]
    fn numerics_keep_their_scale() {
        assert_eq!(format_decimal(-105, 2), "-1.05");
        assert_eq!(format_decimal(5, 3), "0.005");
        assert_eq!(format_decimal(42, 0), "42");
        assert_eq!(format_decimal(1234500, 2), "12345.00");

        let numeric = Numeric::new_with_scale(31415, 4);
        assert_eq!(
            convert_column_value(ColumnData::Numeric(Some(numeric))).unwrap(),
            SqlValue::from("3.1415")
        );
    }

    #[test]
    fn date_counts_days_from_year_one() {
        let expected = date(2021, 1, 1);
        let days = (expected.num_days_from_ce() - 1) as u32;

        assert_eq!(
            convert_column_value(ColumnData::Date(Some(Date::new(days)))).unwrap(),
            SqlValue::Date(expected)
        );
    }

    #[test]
    fn legacy_datetime_counts_from_1900() {
        let noon_fragments = 12 * 3600 * 300;
        let value = DateTime::new(36524, noon_fragments);

        assert_eq!(
            convert_column_value(ColumnData::DateTime(Some(value))).unwrap(),
            SqlValue::DateTime(date(2000, 1, 1).and_hms_opt(12, 0, 0).unwrap())
        );
    }

    #[test]
    fn legacy_datetime_reaches_before_1900() {
        let value = DateTime::new(-1, 0);

        assert_eq!(
            convert_column_value(ColumnData::DateTime(Some(value))).unwrap(),
            SqlValue::DateTime(date(1899, 12, 31).and_hms_opt(0, 0, 0).unwrap())
        );
    }

    #[test]
    fn small_datetime_counts_minutes() {
        let value = SmallDateTime::new(36524, 90);

        assert_eq!(
            convert_column_value(ColumnData::SmallDateTime(Some(value))).unwrap(),
            SqlValue::DateTime(date(2000, 1, 1).and_hms_opt(1, 30, 0).unwrap())
        );
    }

    #[test]
    fn datetime_offset_keeps_instant_and_offset() {
        let days = (date(2021, 1, 1).num_days_from_ce() - 1) as u32;
        let utc = DateTime2::new(Date::new(days), Time::new(36000, 0));
        let value = DateTimeOffset::new(utc, 120);

        let converted = convert_column_value(ColumnData::DateTimeOffset(Some(value))).unwrap();

        match converted {
            SqlValue::DateTimeOffset(dto) => {
                assert_eq!(dto.naive_local(), date(2021, 1, 1).and_hms_opt(12, 0, 0).unwrap());
                assert_eq!(dto.naive_utc(), date(2021, 1, 1).and_hms_opt(10, 0, 0).unwrap());
                assert_eq!(dto.offset().local_minus_utc(), 7200);
            }
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn fractional_times_are_scaled() {
        assert_eq!(
            from_increments(1_234_567, 7).unwrap(),
            NaiveTime::from_hms_nano_opt(0, 0, 0, 123_456_700).unwrap()
        );
    }

    #[test]
    fn legacy_fragments_keep_sub_millisecond_precision() {
        assert_eq!(
            from_sec_fragments(2).unwrap(),
            NaiveTime::from_hms_nano_opt(0, 0, 0, 6_666_667).unwrap()
        );
        assert_eq!(
            from_sec_fragments(299).unwrap(),
            NaiveTime::from_hms_nano_opt(0, 0, 0, 996_666_667).unwrap()
        );
        assert_eq!(
            from_sec_fragments(301).unwrap(),
            NaiveTime::from_hms_nano_opt(0, 0, 1, 3_333_333).unwrap()
        );
    }

    #[test]
    fn out_of_range_values_are_errors() {
        assert!(from_increments(24 * 3600, 0).is_err());
        assert!(from_increments(1, 12).is_err());
        assert!(from_minutes(24 * 60).is_err());
        assert!(from_days(i64::MAX / 100_000, 1).is_err());
    }
}
