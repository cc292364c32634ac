//! Core data models for the resident directory

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A resident billing record
///
/// Immutable once loaded; the directory hands out shared references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    /// Positive, unique within the directory
    pub id: u32,
    /// Display name
    pub name: String,
    /// Display address
    pub address: String,
    /// Outstanding amount in whole currency units
    pub amount_due: u64,
    /// Locator of the remote QR bitmap; not validated here
    pub qr_image_ref: String,
}

impl Resident {
    /// Check the record-level invariants
    pub fn validate(&self) -> CoreResult<()> {
        if self.id == 0 {
            return Err(CoreError::ValidationError {
                message: format!("resident id must be positive (name: {:?})", self.name),
            });
        }
        if self.name.trim().is_empty() {
            return Err(CoreError::ValidationError {
                message: format!("resident {} has an empty name", self.id),
            });
        }
        if self.address.trim().is_empty() {
            return Err(CoreError::ValidationError {
                message: format!("resident {} has an empty address", self.id),
            });
        }
        Ok(())
    }

    /// Case-insensitive containment test against name or address
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.address.to_lowercase().contains(needle)
    }
}

/// On-disk shape of the resident snapshot
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ResidentFile {
    #[serde(default)]
    pub residents: Vec<Resident>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resident(id: u32, name: &str, address: &str) -> Resident {
        Resident {
            id,
            name: name.to_string(),
            address: address.to_string(),
            amount_due: 175000,
            qr_image_ref: "U1".to_string(),
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(resident(1, "Budi Santoso", "Jl. Kalita Blok A No. 15").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_id() {
        assert!(resident(0, "Budi", "Blok A").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        assert!(resident(1, "  ", "Blok A").validate().is_err());
        assert!(resident(1, "Budi", "").validate().is_err());
    }

    #[test]
    fn test_matches_lowercase() {
        let r = resident(1, "Budi Santoso", "Jl. Kalita Blok A No. 15");
        assert!(r.matches_lowercase("budi"));
        assert!(r.matches_lowercase("blok a"));
        assert!(!r.matches_lowercase("siti"));
    }

    #[test]
    fn test_resident_file_yaml() {
        let yaml = r#"
residents:
  - id: 1
    name: Budi Santoso
    address: Jl. Kalita Blok A No. 15
    amount_due: 175000
    qr_image_ref: https://example.com/1.png
"#;
        let file: ResidentFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.residents.len(), 1);
        assert_eq!(file.residents[0].amount_due, 175000);
    }
}
