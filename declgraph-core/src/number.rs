//! Numeric literal interpreter.
//!
//! Handles decimal, hex (`0x`) and binary (`0b`) integers, decimal floats
//! with `e` exponents and hex floats with `p` exponents. `_` separators are
//! ignored inside digit runs. Integer suffixes `u`/`L` are accepted in
//! either order and kept in the source text only.
//!
//! Digits accumulate into a 64-bit primary mantissa. Once that would
//! overflow, further digits go into a secondary mantissa scaled by a running
//! power of the radix, and anything beyond that only shifts the exponent.
//! This keeps float literals precise past 64 bits without big integers.

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::span::Position;
use crate::value::{Value, ValueKind};

/// 10^1, 10^2, 10^4, ... 10^256.
const POSITIVE_POWERS: [f64; 9] = [1e1, 1e2, 1e4, 1e8, 1e16, 1e32, 1e64, 1e128, 1e256];

/// 10^-1, 10^-2, 10^-4, ... 10^-256.
const NEGATIVE_POWERS: [f64; 9] = [
    1e-1, 1e-2, 1e-4, 1e-8, 1e-16, 1e-32, 1e-64, 1e-128, 1e-256,
];

/// 10^0 ..= 10^22, all exact in an f64.
const EXACT_POWERS: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

/// Largest integer below which every integer is an exact f64.
const EXACT_MANTISSA: f64 = 9_007_199_254_740_992.0;

/// Exponents are clamped here; anything larger is already out of range.
const EXPONENT_LIMIT: i32 = 100_000;

#[derive(Debug, Clone)]
struct Mantissa {
    primary: u64,
    secondary: u64,
    /// radix^(digits in `secondary`)
    scale: f64,
    /// Digits that fit in neither mantissa.
    dropped: i32,
    overflowed: bool,
}

impl Mantissa {
    fn new() -> Self {
        Self {
            primary: 0,
            secondary: 0,
            scale: 1.0,
            dropped: 0,
            overflowed: false,
        }
    }

    fn push(&mut self, digit: u32, radix: u32) {
        let (digit, wide_radix) = (u64::from(digit), u64::from(radix));
        if !self.overflowed {
            match self.primary.checked_mul(wide_radix).and_then(|v| v.checked_add(digit)) {
                Some(v) => {
                    self.primary = v;
                    return;
                }
                None => self.overflowed = true,
            }
        }
        if self.dropped == 0 {
            if let Some(v) = self.secondary.checked_mul(wide_radix).and_then(|v| v.checked_add(digit)) {
                self.secondary = v;
                self.scale *= f64::from(radix);
                return;
            }
        }
        self.dropped += 1;
    }

    /// Mantissa as a float; the caller scales by radix^dropped.
    fn to_f64(&self) -> f64 {
        let primary = self.primary as f64;
        if self.overflowed {
            primary * self.scale + self.secondary as f64
        } else {
            primary
        }
    }

    fn to_u64(&self) -> Option<u64> {
        (!self.overflowed).then_some(self.primary)
    }
}

/// Scan a numeric literal starting at the cursor. The cursor must be on a
/// digit, or on a `.` followed by a digit.
pub(crate) fn scan_number(cursor: &mut Cursor<'_>, position: &Position) -> Result<Value> {
    let start = cursor.offset();
    let kind = match (cursor.peek(), cursor.peek_nth(1)) {
        (Some('0'), Some('x' | 'X')) => {
            cursor.advance();
            cursor.advance();
            scan_hex(cursor, position)?
        }
        (Some('0'), Some('b' | 'B')) => {
            cursor.advance();
            cursor.advance();
            scan_binary(cursor, position)?
        }
        _ => scan_decimal(cursor, position)?,
    };

    if let Some(ch) = cursor.peek() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            return Err(Error::lexical(
                position.clone(),
                format!(
                    "invalid character `{}` in numeric literal `{}`",
                    ch,
                    cursor.slice(start, cursor.offset())
                ),
            ));
        }
    }

    let text = cursor.slice(start, cursor.offset());
    Ok(Value::new(kind, text, position.clone()))
}

/// Consume a run of digits in `radix`, skipping `_`. Returns the number of
/// digits (separators excluded).
fn digit_run(cursor: &mut Cursor<'_>, mantissa: &mut Mantissa, radix: u32) -> i32 {
    let mut count = 0;
    loop {
        match cursor.peek() {
            Some('_') => {
                cursor.advance();
            }
            Some(ch) => match ch.to_digit(radix) {
                Some(digit) => {
                    cursor.advance();
                    mantissa.push(digit, radix);
                    count += 1;
                }
                None => break,
            },
            None => break,
        }
    }
    count
}

/// Signed decimal exponent after `e` or `p`.
fn exponent(cursor: &mut Cursor<'_>, position: &Position, marker: char) -> Result<i32> {
    let negative = match cursor.peek() {
        Some('-') => {
            cursor.advance();
            true
        }
        Some('+') => {
            cursor.advance();
            false
        }
        _ => false,
    };

    let mut value: i32 = 0;
    let mut seen = false;
    loop {
        match cursor.peek() {
            Some('_') => {
                cursor.advance();
            }
            Some(ch @ '0'..='9') => {
                cursor.advance();
                seen = true;
                value = (value * 10 + (ch as i32 - '0' as i32)).min(EXPONENT_LIMIT);
            }
            _ => break,
        }
    }

    if !seen {
        return Err(Error::lexical(
            position.clone(),
            format!("missing digits after exponent `{}`", marker),
        ));
    }
    Ok(if negative { -value } else { value })
}

/// Integer suffixes: `u`, `L`, `uL`, `Lu` in any case.
fn suffix(cursor: &mut Cursor<'_>) {
    match cursor.peek() {
        Some('u' | 'U') => {
            cursor.advance();
            if matches!(cursor.peek(), Some('l' | 'L')) {
                cursor.advance();
            }
        }
        Some('l' | 'L') => {
            cursor.advance();
            if matches!(cursor.peek(), Some('u' | 'U')) {
                cursor.advance();
            }
        }
        _ => {}
    }
}

fn integer(mantissa: &Mantissa, cursor: &mut Cursor<'_>, position: &Position) -> Result<ValueKind> {
    suffix(cursor);
    match mantissa.to_u64() {
        Some(v) => Ok(ValueKind::Integer(i128::from(v))),
        None => Err(Error::lexical(
            position.clone(),
            "integer literal does not fit in 64 bits",
        )),
    }
}

fn float(value: f64, position: &Position) -> Result<ValueKind> {
    if value.is_finite() {
        Ok(ValueKind::Float(value))
    } else {
        Err(Error::lexical(
            position.clone(),
            "float literal overflows to infinity",
        ))
    }
}

fn scan_decimal(cursor: &mut Cursor<'_>, position: &Position) -> Result<ValueKind> {
    let mut mantissa = Mantissa::new();
    digit_run(cursor, &mut mantissa, 10);

    let mut exp10: i32 = 0;
    let mut is_float = false;

    if cursor.peek() == Some('.') && matches!(cursor.peek_nth(1), Some('0'..='9')) {
        cursor.advance();
        is_float = true;
        exp10 -= digit_run(cursor, &mut mantissa, 10);
    }

    if let Some(marker @ ('e' | 'E')) = cursor.peek() {
        cursor.advance();
        is_float = true;
        exp10 = exp10.saturating_add(exponent(cursor, position, marker)?);
    }

    if !is_float {
        return integer(&mantissa, cursor, position);
    }

    exp10 = exp10.saturating_add(mantissa.dropped);
    float(scale_by_pow10(mantissa.to_f64(), exp10), position)
}

fn scan_hex(cursor: &mut Cursor<'_>, position: &Position) -> Result<ValueKind> {
    let mut mantissa = Mantissa::new();
    let int_digits = digit_run(cursor, &mut mantissa, 16);

    let mut exp2: i32 = 0;
    let mut is_float = false;

    if cursor.peek() == Some('.') {
        cursor.advance();
        is_float = true;
        let frac_digits = digit_run(cursor, &mut mantissa, 16);
        if frac_digits == 0 {
            let found = cursor
                .peek()
                .map_or_else(|| "end of input".to_string(), |ch| format!("`{}`", ch));
            return Err(Error::lexical(
                position.clone(),
                format!("expected hex digit in hex fraction, found {}", found),
            ));
        }
        exp2 -= 4 * frac_digits;
    } else if int_digits == 0 {
        return Err(Error::lexical(position.clone(), "missing digits after `0x`"));
    }

    if let Some(marker @ ('p' | 'P')) = cursor.peek() {
        cursor.advance();
        is_float = true;
        exp2 = exp2.saturating_add(exponent(cursor, position, marker)?);
    }

    if !is_float {
        return integer(&mantissa, cursor, position);
    }

    exp2 = exp2.saturating_add(4 * mantissa.dropped);
    float(scale_by_pow2(mantissa.to_f64(), exp2), position)
}

fn scan_binary(cursor: &mut Cursor<'_>, position: &Position) -> Result<ValueKind> {
    let mut mantissa = Mantissa::new();
    if digit_run(cursor, &mut mantissa, 2) == 0 {
        return Err(Error::lexical(position.clone(), "missing digits after `0b`"));
    }
    integer(&mantissa, cursor, position)
}

/// `value * 10^exp` by binary decomposition of `exp` over the power tables.
/// Bits past the end of a table reuse its last entry.
fn scale_by_pow10(mut value: f64, exp: i32) -> f64 {
    if value == 0.0 || exp == 0 {
        return value;
    }
    // One exact operation rounds correctly.
    let small = exp.unsigned_abs() as usize;
    if value <= EXACT_MANTISSA && small < EXACT_POWERS.len() {
        return if exp < 0 {
            value / EXACT_POWERS[small]
        } else {
            value * EXACT_POWERS[small]
        };
    }

    let table = if exp < 0 { &NEGATIVE_POWERS } else { &POSITIVE_POWERS };
    let last = table.len() - 1;
    let mut rest = exp.unsigned_abs();
    let mut bit = 0;

    while rest != 0 {
        if rest & 1 == 1 {
            if bit <= last {
                value *= table[bit];
            } else {
                let repeats = 1u32 << (bit - last).min(16);
                for _ in 0..repeats {
                    value *= table[last];
                    if value == 0.0 || value.is_infinite() {
                        return value;
                    }
                }
            }
        }
        rest >>= 1;
        bit += 1;
    }
    value
}

/// `value * 2^exp`, split in two steps so large exponents do not overflow
/// an intermediate.
fn scale_by_pow2(value: f64, exp: i32) -> f64 {
    let half = exp / 2;
    value * 2f64.powi(half) * 2f64.powi(exp - half)
}
