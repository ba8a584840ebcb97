//! # Field Padding Rules
//!
//! The regulator layouts fix the width of every field. Numeric identifiers
//! are zero-padded on the left; free text is transliterated to single-byte
//! ASCII and space-padded on the right. Width violations truncate: numeric
//! overflow keeps the least-significant digits, text overflow keeps the
//! leading characters.

use ponto_core::to_single_byte;

use crate::nsr::Nsr;

// ---------------------------------------------------------------------------
// Regulator-fixed widths
// ---------------------------------------------------------------------------

/// Sequence number (NSR) width.
pub const NSR_WIDTH: usize = 9;
/// CNPJ width.
pub const CNPJ_WIDTH: usize = 14;
/// CEI (Cadastro Específico do INSS) width.
pub const CEI_WIDTH: usize = 12;
/// CPF width (11 digits, zero-padded to 12 per the journey layout).
pub const CPF_WIDTH: usize = 12;
/// PIS/PASEP width.
pub const PIS_WIDTH: usize = 11;
/// Free-text name width (employer and employee names).
pub const NAME_WIDTH: usize = 52;
/// Employee registration (matrícula) width.
pub const REGISTRATION_WIDTH: usize = 30;
/// Calendar date width (`YYYYMMDD`).
pub const DATE_WIDTH: usize = 8;
/// Clock time width (`HHMM`).
pub const TIME_WIDTH: usize = 4;
/// Timestamp width (`YYYYMMDDHHMM`).
pub const DATETIME_WIDTH: usize = 12;
/// Minute-count width (daily and period totals).
pub const MINUTES_WIDTH: usize = 6;
/// Day-count and adjustment-count width (period totals).
pub const COUNT_WIDTH: usize = 4;
/// REP device serial number width.
pub const REP_SERIAL_WIDTH: usize = 17;
/// Recording-software version width.
pub const SOFTWARE_VERSION_WIDTH: usize = 8;
/// Adjusted-field label width (adjustment records).
pub const ADJUSTED_FIELD_WIDTH: usize = 12;

// ---------------------------------------------------------------------------
// Padding
// ---------------------------------------------------------------------------

/// Zero-pad a digit string on the left to exactly `width` characters.
///
/// Non-digit characters are dropped before padding; overflow keeps the
/// trailing (least-significant) digits.
pub fn zero_left(value: &str, width: usize) -> String {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() >= width {
        digits[digits.len() - width..].to_string()
    } else {
        format!("{}{}", "0".repeat(width - digits.len()), digits)
    }
}

/// Zero-pad an integer on the left to exactly `width` digits.
pub fn zero_left_u32(value: u32, width: usize) -> String {
    zero_left(&value.to_string(), width)
}

/// Transliterate text to single-byte ASCII and space-pad on the right to
/// exactly `width` characters. Overflow keeps the leading characters.
pub fn space_right(value: &str, width: usize) -> String {
    let ascii = to_single_byte(value);
    let mut out: String = ascii.chars().take(width).collect();
    while out.len() < width {
        out.push(' ');
    }
    out
}

/// Render a calendar date as `YYYYMMDD`.
pub fn date8(date: chrono::NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Render a clock time as `HHMM`.
pub fn time4(time: chrono::NaiveTime) -> String {
    time.format("%H%M").to_string()
}

/// Render a timestamp as `YYYYMMDDHHMM`.
pub fn datetime12(dt: chrono::NaiveDateTime) -> String {
    dt.format("%Y%m%d%H%M").to_string()
}

/// Render one record line: advance the sequence counter, prefix the
/// 9-digit NSR and the 1-digit type code, and tab-join the padded fields.
///
/// The line carries no terminator — CRLF joining is the assembler's
/// concern.
pub fn render_line(nsr: &mut Nsr, type_code: u8, fields: &[String]) -> String {
    let mut parts = Vec::with_capacity(fields.len() + 2);
    parts.push(zero_left_u32(nsr.next(), NSR_WIDTH));
    parts.push(type_code.to_string());
    parts.extend(fields.iter().cloned());
    parts.join("\t")
}
