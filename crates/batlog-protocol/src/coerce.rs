//! Free-text value coercion for readout fields.
//!
//! The readout protocol decorates every numeric value with its unit
//! (`"11155 mV"`, `"-21 mA"`, `"45 %"`, `"#0"`). Coercion strips the
//! decoration and parses what remains. A value that still fails to parse
//! produces a [`ConversionError`] naming the field -- the caller leaves the
//! field at zero and keeps scanning; conversion failures are never fatal.

/// A field-level decode failure, recovered locally and surfaced once the
/// readout completes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("conversion error ({field}): {}", detail(.raw, .tags))]
pub struct ConversionError {
    /// Persisted name of the field that failed to convert.
    pub field: &'static str,
    /// The raw value text as scanned.
    pub raw: String,
    /// Per-component tags for the dual-temperature field
    /// (`"[parserr:K]"`, `"[parserr:C]"`, or both, in that order); empty
    /// for plain numeric fields.
    pub tags: String,
}

fn detail(raw: &str, tags: &str) -> String {
    if tags.is_empty() {
        format!("cannot parse {raw:?}")
    } else {
        format!("{tags} in {raw:?}")
    }
}

impl ConversionError {
    fn numeric(field: &'static str, raw: &str) -> Self {
        ConversionError {
            field,
            raw: raw.to_string(),
            tags: String::new(),
        }
    }
}

/// Strip unit decoration from a raw field value.
///
/// Removes every character outside the set `{digits, space, '.', '-'}`.
/// Total and deterministic: already-clean text passes through unchanged.
pub fn strip_units(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ' ' | '.' | '-'))
        .collect()
}

/// Parse a unit-decorated integer field, e.g. `"11155 mV"` -> `11155`.
pub fn parse_count(field: &'static str, raw: &str) -> Result<i32, ConversionError> {
    strip_units(raw)
        .trim()
        .parse::<i32>()
        .map_err(|_| ConversionError::numeric(field, raw))
}

/// Parse a unit-decorated float field, e.g. `"305.3 K"` -> `305.3`.
pub fn parse_measure(field: &'static str, raw: &str) -> Result<f64, ConversionError> {
    strip_units(raw)
        .trim()
        .parse::<f64>()
        .map_err(|_| ConversionError::numeric(field, raw))
}

/// Decode the dual-unit temperature field, `"<kelvin> K  (<celsius> C)"`.
///
/// The value splits on the literal `K` separator; each side is
/// independently stripped and parsed. A side that fails yields `0.0` and
/// contributes its tag to the accumulated error -- both sides are always
/// attempted, so `"305.3 K (bad C)"` still recovers the Kelvin reading.
/// A value with no `K` separator at all fails both components.
pub fn parse_dual_temperature(
    field: &'static str,
    raw: &str,
) -> (f64, f64, Option<ConversionError>) {
    let Some((left, right)) = raw.split_once('K') else {
        return (
            0.0,
            0.0,
            Some(ConversionError {
                field,
                raw: raw.to_string(),
                tags: "[parserr:K][parserr:C]".to_string(),
            }),
        );
    };

    let mut tags = String::new();
    let kelvin = match strip_units(left).trim().parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            tags.push_str("[parserr:K]");
            0.0
        }
    };
    let celsius = match strip_units(right).trim().parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            tags.push_str("[parserr:C]");
            0.0
        }
    };

    let error = if tags.is_empty() {
        None
    } else {
        Some(ConversionError {
            field,
            raw: raw.to_string(),
            tags,
        })
    };
    (kelvin, celsius, error)
}
