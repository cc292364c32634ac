//! Resident directory and free-text filtering
//!
//! The directory is a read-only snapshot loaded once per process. Filtering
//! is a pure, order-preserving view over it.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::models::{Resident, ResidentFile};

/// Ordered, immutable collection of residents
#[derive(Debug, Default, Clone)]
pub struct ResidentDirectory {
    residents: Vec<Arc<Resident>>,
}

impl ResidentDirectory {
    /// Build a directory, enforcing id uniqueness and record invariants
    pub fn new(residents: Vec<Resident>) -> CoreResult<Self> {
        let mut seen = HashSet::new();
        for resident in &residents {
            resident.validate()?;
            if !seen.insert(resident.id) {
                return Err(CoreError::DuplicateEntry {
                    entry: format!("resident id {}", resident.id),
                });
            }
        }
        Ok(Self {
            residents: residents.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parse a YAML snapshot
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let file: ResidentFile = serde_yaml::from_str(content)
            .map_err(|e| CoreError::InvalidFormat { message: e.to_string() })?;
        Self::new(file.residents)
    }

    /// Load the snapshot from disk
    pub async fn load(path: &Path) -> CoreResult<Self> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(CoreError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = tokio::fs::read_to_string(path).await?;
        let directory = Self::from_yaml(&content)?;
        log::info!(
            "Loaded {} residents from {}",
            directory.len(),
            path.display()
        );
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.residents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residents.is_empty()
    }

    /// All residents in directory order
    pub fn residents(&self) -> &[Arc<Resident>] {
        &self.residents
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Resident>> {
        self.residents.iter()
    }

    /// Look up one resident by id
    pub fn get(&self, id: u32) -> Option<Arc<Resident>> {
        self.residents.iter().find(|r| r.id == id).cloned()
    }

    /// Like [`get`](Self::get) but reports a missing id as an error
    pub fn require(&self, id: u32) -> CoreResult<Arc<Resident>> {
        self.get(id).ok_or(CoreError::ResidentNotFound { id })
    }

    /// Filtered view of this directory
    pub fn filter(&self, query: &str) -> Vec<Arc<Resident>> {
        filter_residents(&self.residents, query)
    }

    /// Sum of every resident's outstanding amount
    pub fn total_due(&self) -> u64 {
        self.residents.iter().map(|r| r.amount_due).sum()
    }

    /// The shared per-resident amount, when every resident owes the same
    pub fn uniform_amount(&self) -> Option<u64> {
        let first = self.residents.first()?.amount_due;
        self.residents
            .iter()
            .all(|r| r.amount_due == first)
            .then_some(first)
    }

    pub fn summary(&self) -> DirectorySummary {
        DirectorySummary {
            total_residents: self.len(),
            amount_per_resident: self.uniform_amount(),
            total_due: self.total_due(),
        }
    }
}

/// Figures shown on the summary cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectorySummary {
    pub total_residents: usize,
    pub amount_per_resident: Option<u64>,
    pub total_due: u64,
}

/// Case-insensitive substring filter over name OR address
///
/// Stable: keeps the input order and never mutates it. An empty query
/// matches everything. Case folding uses Unicode default lowercasing, which
/// does not depend on the process locale.
pub fn filter_residents(residents: &[Arc<Resident>], query: &str) -> Vec<Arc<Resident>> {
    if query.is_empty() {
        return residents.to_vec();
    }
    let needle = query.to_lowercase();
    residents
        .iter()
        .filter(|r| r.matches_lowercase(&needle))
        .cloned()
        .collect()
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
            qr_image_ref: format!("U{}", id),
        }
    }

    fn sample() -> ResidentDirectory {
        ResidentDirectory::new(vec![
            resident(1, "Budi Santoso", "Jl. Kalita Blok A No. 15"),
            resident(2, "Siti Nurhaliza", "Jl. Kalita Blok B No. 8"),
            resident(3, "Ahmad Wijaya", "Jl. Kalita Blok C No. 22"),
            resident(4, "Rina Marlina", "Jl. Kalita Blok A No. 7"),
            resident(5, "Dedi Kurniawan", "Jl. Kalita Blok D No. 12"),
        ])
        .unwrap()
    }

    fn ids(residents: &[Arc<Resident>]) -> Vec<u32> {
        residents.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_filter_blok_a_scenario() {
        let directory = ResidentDirectory::new(vec![
            resident(1, "Budi Santoso", "Jl. Kalita Blok A No. 15"),
            resident(2, "Siti Nurhaliza", "Jl. Kalita Blok B No. 8"),
        ])
        .unwrap();
        assert_eq!(ids(&directory.filter("blok a")), vec![1]);
    }

    #[test]
    fn test_filter_empty_query_returns_all_in_order() {
        let directory = sample();
        assert_eq!(ids(&directory.filter("")), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_filter_preserves_order() {
        assert_eq!(ids(&sample().filter("BLOK A")), vec![1, 4]);
    }

    #[test]
    fn test_filter_name_or_address() {
        let directory = sample();
        // name only
        assert_eq!(ids(&directory.filter("wijaya")), vec![3]);
        // address only
        assert_eq!(ids(&directory.filter("no. 12")), vec![5]);
    }

    #[test]
    fn test_filter_no_match() {
        assert!(sample().filter("jakarta").is_empty());
    }

    #[test]
    fn test_filter_empty_directory() {
        assert!(filter_residents(&[], "budi").is_empty());
        assert!(filter_residents(&[], "").is_empty());
    }

    #[test]
    fn test_filter_is_subsequence_with_exact_membership() {
        let directory = sample();
        for query in ["a", "KALITA", "rina", "no. 1", "zz", "i"] {
            let result = directory.filter(query);
            let needle = query.to_lowercase();
            // every kept element matches
            assert!(result.iter().all(|r| r.matches_lowercase(&needle)));
            // every dropped element does not
            for r in directory.residents() {
                if !result.iter().any(|x| x.id == r.id) {
                    assert!(!r.name.to_lowercase().contains(&needle));
                    assert!(!r.address.to_lowercase().contains(&needle));
                }
            }
            // relative order kept
            let kept = ids(&result);
            let mut sorted = kept.clone();
            sorted.sort();
            assert_eq!(kept, sorted);
        }
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let directory = sample();
        let _ = directory.filter("budi");
        assert_eq!(directory.len(), 5);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = ResidentDirectory::new(vec![
            resident(1, "Budi", "Blok A"),
            resident(1, "Siti", "Blok B"),
        ])
        .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateEntry { .. }));
    }

    #[test]
    fn test_get_and_require() {
        let directory = sample();
        assert_eq!(directory.get(2).unwrap().name, "Siti Nurhaliza");
        assert!(directory.get(99).is_none());
        assert!(matches!(
            directory.require(99),
            Err(CoreError::ResidentNotFound { id: 99 })
        ));
    }

    #[test]
    fn test_summary() {
        let summary = sample().summary();
        assert_eq!(summary.total_residents, 5);
        assert_eq!(summary.amount_per_resident, Some(175000));
        assert_eq!(summary.total_due, 875000);
    }

    #[test]
    fn test_iter_matches_directory_order() {
        let directory = sample();
        let ids: Vec<u32> = directory.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_uniform_amount_mixed() {
        let mut other = resident(2, "Siti", "Blok B");
        other.amount_due = 150000;
        let directory = ResidentDirectory::new(vec![resident(1, "Budi", "Blok A"), other]).unwrap();
        assert_eq!(directory.uniform_amount(), None);
        assert_eq!(ResidentDirectory::default().uniform_amount(), None);
    }

    #[test]
    fn test_from_yaml_invalid() {
        let err = ResidentDirectory::from_yaml("residents: 12").unwrap_err();
        assert!(matches!(err, CoreError::InvalidFormat { .. }));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = ResidentDirectory::load(Path::new("/no/such/residents.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("residents.yaml");
        std::fs::write(
            &path,
            "residents:\n  - id: 1\n    name: Budi Santoso\n    address: Jl. Kalita Blok A No. 15\n    amount_due: 175000\n    qr_image_ref: U1\n",
        )
        .unwrap();
        let directory = ResidentDirectory::load(&path).await.unwrap();
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.get(1).unwrap().qr_image_ref, "U1");
    }
}
