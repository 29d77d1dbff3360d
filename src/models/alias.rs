use serde::{Deserialize, Serialize};

use super::ServiceId;

/// Maps a provider-name substring onto a service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasEntry {
    /// Lower-case substring searched for in provider display names
    pub pattern: String,
    pub service: ServiceId,
}

impl AliasEntry {
    pub fn new(pattern: &str, service: ServiceId) -> Self {
        Self {
            pattern: pattern.to_lowercase(),
            service,
        }
    }
}

/// Ordered alias table. Earlier entries take precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
}

impl AliasTable {
    pub fn new(entries: Vec<AliasEntry>) -> Self {
        Self { entries }
    }

    /// Provider names as TMDB reports them for the US region
    pub fn builtin() -> Self {
        use ServiceId::*;
        Self::new(vec![
            AliasEntry::new("netflix", Netflix),
            AliasEntry::new("hulu", Hulu),
            AliasEntry::new("disney plus", Disney),
            AliasEntry::new("max", Max),
            AliasEntry::new("hbo max", Max),
            AliasEntry::new("peacock", Peacock),
            AliasEntry::new("discovery+", Discovery),
            AliasEntry::new("discovery plus", Discovery),
            AliasEntry::new("tubi tv", Tubi),
            AliasEntry::new("pluto tv", Pluto),
            AliasEntry::new("amazon prime video", Prime),
            AliasEntry::new("prime video", Prime),
            AliasEntry::new("apple tv plus", Apple),
            AliasEntry::new("apple tv+", Apple),
            AliasEntry::new("paramount+", Paramount),
            AliasEntry::new("amc+", Amc),
            AliasEntry::new("shudder", Shudder),
            AliasEntry::new("crunchyroll", Crunchyroll),
            AliasEntry::new("starz", Starz),
        ])
    }

    /// Returns the service of the first entry whose pattern occurs in the lower-cased name
    pub fn match_name(&self, provider_name: &str) -> Option<ServiceId> {
        let name = provider_name.to_lowercase();
        self.entries
            .iter()
            .find(|entry| name.contains(entry.pattern.as_str()))
            .map(|entry| entry.service)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_is_case_insensitive() {
        let table = AliasTable::builtin();
        assert_eq!(table.match_name("NETFLIX"), Some(ServiceId::Netflix));
        assert_eq!(table.match_name("Tubi TV"), Some(ServiceId::Tubi));
    }

    #[test]
    fn test_match_is_substring_containment() {
        let table = AliasTable::builtin();
        assert_eq!(
            table.match_name("Netflix basic with Ads"),
            Some(ServiceId::Netflix)
        );
        assert_eq!(
            table.match_name("Peacock Premium Plus"),
            Some(ServiceId::Peacock)
        );
    }

    #[test]
    fn test_first_entry_in_table_order_wins() {
        let table = AliasTable::new(vec![
            AliasEntry::new("prime", ServiceId::Prime),
            AliasEntry::new("amazon", ServiceId::Youtube),
        ]);
        assert_eq!(
            table.match_name("Amazon Prime Video"),
            Some(ServiceId::Prime)
        );

        let reversed = AliasTable::new(vec![
            AliasEntry::new("amazon", ServiceId::Youtube),
            AliasEntry::new("prime", ServiceId::Prime),
        ]);
        assert_eq!(
            reversed.match_name("Amazon Prime Video"),
            Some(ServiceId::Youtube)
        );
    }

    #[test]
    fn test_hbo_max_resolves_to_max() {
        assert_eq!(
            AliasTable::builtin().match_name("HBO Max"),
            Some(ServiceId::Max)
        );
    }

    #[test]
    fn test_no_match_returns_none() {
        let table = AliasTable::builtin();
        assert_eq!(table.match_name("Vudu"), None);
        // Only exact alias substrings count
        assert_eq!(table.match_name("Paramount Plus"), None);
        assert_eq!(AliasTable::default().match_name("Netflix"), None);
    }

    #[test]
    fn test_patterns_are_lowercased_on_construction() {
        let table = AliasTable::new(vec![AliasEntry::new("Shudder", ServiceId::Shudder)]);
        assert_eq!(table.match_name("shudder"), Some(ServiceId::Shudder));
    }
}
