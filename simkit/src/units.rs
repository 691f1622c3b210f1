use crate::errors::PanelError;

/// Formats a whole number of seconds as zero-padded "HH:MM:SS".
pub fn seconds_to_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Parses "HH:MM:SS" back into seconds. Exact inverse of `seconds_to_hms`
/// for hours below 24 and minutes/seconds below 60.
pub fn hms_to_seconds(hms: &str) -> Result<u64, PanelError> {
    let fields: Vec<&str> = hms.split(':').collect();
    if fields.len() != 3 {
        return Err(PanelError::Validation(format!(
            "expected HH:MM:SS, got '{}'",
            hms
        )));
    }
    let mut parts = [0u64; 3];
    for (slot, field) in parts.iter_mut().zip(&fields) {
        *slot = field.trim().parse::<u64>().map_err(|_| {
            PanelError::Validation(format!("'{}' is not a whole number", field))
        })?;
    }
    Ok(parts[0] * 3600 + parts[1] * 60 + parts[2])
}

/// Parses a numeric bound typed by the operator.
pub fn parse_bound(raw: &str) -> Result<f64, PanelError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| PanelError::Validation(format!("'{}' is not a valid number", raw)))
}

/// Parses a 1-based index typed into a range field.
pub fn parse_index(raw: &str) -> Result<usize, PanelError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| PanelError::Validation(format!("'{}' is not a valid position", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero_padded() {
        assert_eq!(seconds_to_hms(0), "00:00:00");
        assert_eq!(seconds_to_hms(61), "00:01:01");
        assert_eq!(seconds_to_hms(3600), "01:00:00");
        assert_eq!(seconds_to_hms(23 * 3600 + 59 * 60 + 59), "23:59:59");
    }

    #[test]
    fn round_trips_every_hms_value() {
        for h in 0..24u64 {
            for m in 0..60u64 {
                for s in 0..60u64 {
                    let total = h * 3600 + m * 60 + s;
                    assert_eq!(hms_to_seconds(&seconds_to_hms(total)).unwrap(), total);
                }
            }
        }
    }

    #[test]
    fn rejects_malformed_hms() {
        assert!(hms_to_seconds("12:30").is_err());
        assert!(hms_to_seconds("aa:bb:cc").is_err());
        assert!(hms_to_seconds("1:2:3:4").is_err());
        assert!(hms_to_seconds("").is_err());
    }

    #[test]
    fn accepts_unpadded_fields() {
        assert_eq!(hms_to_seconds("1:2:3").unwrap(), 3723);
    }

    #[test]
    fn bound_parsing() {
        assert_eq!(parse_bound(" 10.5 ").unwrap(), 10.5);
        assert!(parse_bound("abc").is_err());
        assert!(parse_bound("").is_err());
    }

    #[test]
    fn index_parsing() {
        assert_eq!(parse_index("3").unwrap(), 3);
        assert!(parse_index("-1").is_err());
        assert!(parse_index("two").is_err());
    }
}
