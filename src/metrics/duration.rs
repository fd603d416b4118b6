use std::sync::OnceLock;

use regex::Regex;

use crate::error::DurationError;

/// `<digits><letters>`; the letters are checked against `UNITS`.
fn component_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)([a-zA-Z]+)").expect("static regex"))
}

/// Accepted units, largest first, as `value * mul / div` seconds.
const UNITS: [(&str, f64, f64); 6] = [
    ("h", 3600.0, 1.0),
    ("m", 60.0, 1.0),
    ("s", 1.0, 1.0),
    ("ms", 1.0, 1e3),
    ("us", 1.0, 1e6),
    ("ns", 1.0, 1e9),
];

/// Parse an Impala pretty-printed duration (`1h5m`, `1m30s`, `500ms`) into
/// fractional seconds.
///
/// Each unit is optional, but when present units must run from largest to
/// smallest and appear at most once. Digits followed by anything else
/// (`5mins`) are an error. Text without digits is skipped, so `""` and
/// `"n/a"` are both `0.0`.
pub fn parse_duration(input: &str) -> Result<f64, DurationError> {
    let mut total = 0.0;
    let mut next_rank = 0;

    for caps in component_re().captures_iter(input) {
        let component = &caps[0];
        let Some(rank) = UNITS.iter().position(|(unit, ..)| *unit == &caps[2]) else {
            return Err(DurationError::UnknownUnit {
                input: input.to_string(),
                component: component.to_string(),
            });
        };
        if rank < next_rank {
            return Err(DurationError::OutOfOrder {
                input: input.to_string(),
                component: component.to_string(),
            });
        }
        next_rank = rank + 1;

        let value: u64 = caps[1].parse().map_err(|_| DurationError::Overflow {
            input: input.to_string(),
            component: component.to_string(),
        })?;
        let (_, mul, div) = UNITS[rank];
        total += value as f64 * mul / div;
    }

    Ok(total)
}
