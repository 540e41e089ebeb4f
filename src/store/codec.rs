//! Conversion between untyped table rows and the typed records.
//!
//! Decoding is where closed enumerations are validated: unknown status, type
//! or source text fails the whole load. Numeric cells are lenient (empty or
//! unreadable text counts as zero) because older sheets were hand edited.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::warn;

use crate::error::{FleetError, FleetResult};
use crate::models::{
    ApprovalStatus, Party, Shift, ShiftStatus, Source, Transaction, TransactionType,
};

use super::table::{Row, Table};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

fn invalid(table: Table, id: &str, column: &str, message: impl Into<String>) -> FleetError {
    FleetError::validation(
        format!("{}.{}", table.name(), column),
        format!("row '{}': {}", id, message.into()),
    )
}

/// Parses a stored timestamp.
///
/// RFC 3339 text is taken as is. Naive wall-clock text (the legacy format)
/// is read in `offset` and normalized to UTC.
pub fn parse_timestamp(text: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
}

/// Formats a timestamp for storage.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_amount(table: Table, id: &str, row: &Row, column: &str) -> Decimal {
    let text = row.get(column);
    if text.is_empty() {
        return Decimal::ZERO;
    }
    match Decimal::from_str(text) {
        Ok(value) => value,
        Err(_) => {
            warn!(table = %table, row_id = id, column, value = text, "unreadable number, counting as zero");
            Decimal::ZERO
        }
    }
}

/// Parses a duration cell: decimal hours or `H:MM[:SS]`.
pub fn parse_duration(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return Some(Decimal::ZERO);
    }
    if !text.contains(':') {
        return Decimal::from_str(text).ok();
    }
    let mut parts = text.split(':').map(|part| Decimal::from_str(part.trim()));
    let hours = parts.next()?.ok()?;
    let minutes = parts.next().transpose().ok()?.unwrap_or_default();
    let seconds = parts.next().transpose().ok()?.unwrap_or_default();
    let total = hours + minutes / Decimal::from(60) + seconds / Decimal::from(3600);
    Some(total.round_dp(2))
}

fn parse_fuel(table: Table, id: &str, row: &Row, column: &str) -> FleetResult<u8> {
    let value = parse_amount(table, id, row, column).round();
    value
        .to_u8()
        .filter(|fuel| *fuel <= 100)
        .ok_or_else(|| {
            invalid(
                table,
                id,
                column,
                format!("fuel level {} is outside 0-100", value),
            )
        })
}

fn parse_enum<T: FromStr>(
    table: Table,
    id: &str,
    row: &Row,
    column: &str,
    default: Option<T>,
) -> FleetResult<T> {
    let text = row.get(column);
    if text.is_empty() {
        return default.ok_or_else(|| invalid(table, id, column, "missing value"));
    }
    T::from_str(text).map_err(|_| invalid(table, id, column, format!("unknown value '{}'", text)))
}

/// Decodes one shifts row.
pub fn shift_from_row(row: &Row, offset: FixedOffset) -> FleetResult<Shift> {
    let table = Table::Shifts;
    let id = row.get("Shift_ID");

    let start_text = row.get("Start_Time");
    let start_time = parse_timestamp(start_text, offset).ok_or_else(|| {
        invalid(
            table,
            id,
            "Start_Time",
            format!("unreadable start time '{}'", start_text),
        )
    })?;
    let end_text = row.get("End_Time");
    let end_time = if end_text.is_empty() {
        None
    } else {
        Some(parse_timestamp(end_text, offset).ok_or_else(|| {
            invalid(
                table,
                id,
                "End_Time",
                format!("unreadable end time '{}'", end_text),
            )
        })?)
    };

    let duration_text = row.get("Duration");
    let duration_hours = parse_duration(duration_text).unwrap_or_else(|| {
        warn!(table = %table, row_id = id, value = duration_text, "unreadable duration, counting as zero");
        Decimal::ZERO
    });

    Ok(Shift {
        id: id.to_string(),
        driver: row.get("Driver").to_string(),
        vehicle: row.get("Car").to_string(),
        status: parse_enum::<ShiftStatus>(table, id, row, "Status", None)?,
        approval: parse_enum(table, id, row, "Approval_Status", Some(ApprovalStatus::Pending))?,
        start_time,
        end_time,
        duration_hours,
        total_earnings: parse_amount(table, id, row, "Total_Earnings"),
        start_wallet: parse_amount(table, id, row, "Start_Wallet"),
        end_wallet: parse_amount(table, id, row, "End_Wallet"),
        cash_collected: parse_amount(table, id, row, "Cash_Collected"),
        start_fuel: parse_fuel(table, id, row, "Start_Fuel")?,
        end_fuel: parse_fuel(table, id, row, "End_Fuel")?,
    })
}

/// Encodes a shift as a row with every shifts column present.
pub fn shift_to_row(shift: &Shift) -> Row {
    let mut row = Row::new();
    row.set("Shift_ID", shift.id.as_str());
    row.set("Driver", shift.driver.as_str());
    row.set("Car", shift.vehicle.as_str());
    row.set("Status", shift.status.as_str());
    row.set("Approval_Status", shift.approval.as_str());
    row.set("Start_Time", format_timestamp(shift.start_time));
    row.set(
        "End_Time",
        shift.end_time.map(format_timestamp).unwrap_or_default(),
    );
    row.set("Duration", shift.duration_hours.normalize().to_string());
    row.set("Total_Earnings", shift.total_earnings.normalize().to_string());
    row.set("Start_Wallet", shift.start_wallet.normalize().to_string());
    row.set("End_Wallet", shift.end_wallet.normalize().to_string());
    row.set("Cash_Collected", shift.cash_collected.normalize().to_string());
    row.set("Start_Fuel", shift.start_fuel.to_string());
    row.set("End_Fuel", shift.end_fuel.to_string());
    row
}

/// Decodes one transactions row.
pub fn transaction_from_row(row: &Row, offset: FixedOffset) -> FleetResult<Transaction> {
    let table = Table::Transactions;
    let id = row.get("Trans_ID");

    let date_text = row.get("Date");
    let timestamp = parse_timestamp(date_text, offset).ok_or_else(|| {
        invalid(table, id, "Date", format!("unreadable date '{}'", date_text))
    })?;

    let amount = parse_amount(table, id, row, "Amount");
    if amount < Decimal::ZERO {
        return Err(invalid(
            table,
            id,
            "Amount",
            format!("negative amount {}", amount),
        ));
    }

    Ok(Transaction {
        id: id.to_string(),
        timestamp,
        party: Party::from_name(row.get("Driver")),
        kind: parse_enum::<TransactionType>(table, id, row, "Type", None)?,
        amount,
        method: row.get("Method").to_string(),
        notes: row.get("Notes").to_string(),
        approval: parse_enum(table, id, row, "Approval_Status", Some(ApprovalStatus::Pending))?,
        source: parse_enum(table, id, row, "Source", Some(Source::Manager))?,
    })
}

/// Encodes a transaction as a row with every transactions column present.
pub fn transaction_to_row(tx: &Transaction) -> Row {
    let mut row = Row::new();
    row.set("Trans_ID", tx.id.as_str());
    row.set("Date", format_timestamp(tx.timestamp));
    row.set("Driver", tx.party.name());
    row.set("Type", tx.kind.as_str());
    row.set("Amount", tx.amount.normalize().to_string());
    row.set("Method", tx.method.as_str());
    row.set("Notes", tx.notes.as_str());
    row.set("Approval_Status", tx.approval.as_str());
    row.set("Source", tx.source.as_str());
    row
}

/// Decodes a whole table, skipping blank rows and keeping the last of any
/// rows that share an ID (at the position of that last row).
pub fn decode_table<T>(
    table: Table,
    rows: &[Row],
    offset: FixedOffset,
    decode: fn(&Row, FixedOffset) -> FleetResult<T>,
) -> FleetResult<Vec<T>> {
    let id_column = table.id_column();
    let rows: Vec<&Row> = rows
        .iter()
        .filter(|row| row.cells().any(|(_, value)| !value.trim().is_empty()))
        .collect();

    let mut last_index: HashMap<&str, usize> = HashMap::new();
    for (index, row) in rows.iter().enumerate() {
        let id = row.get(id_column);
        if id.is_empty() {
            return Err(invalid(table, "", id_column, "missing row identifier"));
        }
        if let Some(previous) = last_index.insert(id, index) {
            warn!(table = %table, row_id = id, first = previous, kept = index, "duplicate row id, keeping the last");
        }
    }

    rows.iter()
        .enumerate()
        .filter(|(index, row)| last_index.get(row.get(id_column)) == Some(index))
        .map(|(_, row)| decode(*row, offset))
        .collect()
}
