//! Transaction label shown in the detail view and embedded in export names
//!
//! A label is display-only. Two opens of the same resident inside the same
//! millisecond window produce the same label, so nothing may key on it.

use chrono::{DateTime, Utc};

use crate::models::Resident;

/// Width of the time slice taken from the millisecond clock
const TIME_DIGITS: usize = 8;
const TIME_MODULUS: i64 = 100_000_000;

/// Derives `{prefix}{8 time digits}{id padded to 3}` labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionIdFormatter {
    prefix: String,
}

impl Default for TransactionIdFormatter {
    fn default() -> Self {
        Self::new("TRX")
    }
}

impl TransactionIdFormatter {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Pure function of `(resident.id, now truncated to milliseconds)`
    pub fn format(&self, resident: &Resident, now: DateTime<Utc>) -> String {
        self.format_id(resident.id, now)
    }

    pub fn format_id(&self, id: u32, now: DateTime<Utc>) -> String {
        let slice = now.timestamp_millis().rem_euclid(TIME_MODULUS);
        format!(
            "{}{:0width$}{:03}",
            self.prefix,
            slice,
            id,
            width = TIME_DIGITS
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn resident(id: u32) -> Resident {
        Resident {
            id,
            name: "Siti Nurhaliza".to_string(),
            address: "Jl. Kalita Blok B No. 8".to_string(),
            amount_due: 175000,
            qr_image_ref: "U2".to_string(),
        }
    }

    fn at_millis(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn test_format_layout() {
        let formatter = TransactionIdFormatter::default();
        let label = formatter.format(&resident(2), at_millis(1_718_000_123_456));
        assert_eq!(label, "TRX00123456002");
    }

    #[test]
    fn test_format_keeps_last_eight_digits() {
        let formatter = TransactionIdFormatter::default();
        let label = formatter.format(&resident(7), at_millis(1_723_456_789_012));
        assert_eq!(label, "TRX56789012007");
    }

    #[test]
    fn test_format_is_deterministic_per_millisecond() {
        let formatter = TransactionIdFormatter::default();
        let t1 = at_millis(1_723_456_789_012);
        // sub-millisecond differences are truncated away
        let t2 = t1 + chrono::Duration::microseconds(400);
        assert_eq!(formatter.format(&resident(3), t1), formatter.format(&resident(3), t2));
    }

    #[test]
    fn test_wide_ids_widen_instead_of_truncating() {
        let formatter = TransactionIdFormatter::default();
        let label = formatter.format_id(1234, at_millis(1_723_456_789_012));
        assert_eq!(label, "TRX567890121234");
        assert_eq!(label.len(), "TRX".len() + 8 + 4);
    }

    #[test]
    fn test_fixed_length_for_small_ids() {
        let formatter = TransactionIdFormatter::default();
        for id in [1, 42, 999] {
            assert_eq!(formatter.format_id(id, Utc::now()).len(), 3 + 8 + 3);
        }
    }

    #[test]
    fn test_custom_prefix() {
        let formatter = TransactionIdFormatter::new("IUR");
        assert!(formatter.format_id(1, at_millis(5)).starts_with("IUR00000005"));
    }
}
