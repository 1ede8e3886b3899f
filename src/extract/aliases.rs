//! Alias table and club-name normalization
//!
//! Maps the many spellings used in market questions onto the short names
//! people actually write in post titles.

/// Built-in Premier League aliases, in declaration order
///
/// Man City and Man United must stay distinct: neither short form may be
/// resolved through a shared prefix like "Manchester".
pub const EPL_ALIASES: &[(&str, &str)] = &[
    ("Arsenal", "Arsenal"),
    ("Aston Villa", "Aston Villa"),
    ("AFC Bournemouth", "Bournemouth"),
    ("Bournemouth", "Bournemouth"),
    ("Brentford", "Brentford"),
    ("Brighton & Hove Albion", "Brighton"),
    ("Brighton and Hove Albion", "Brighton"),
    ("Brighton", "Brighton"),
    ("Burnley", "Burnley"),
    ("Chelsea", "Chelsea"),
    ("Crystal Palace", "Crystal Palace"),
    ("Everton", "Everton"),
    ("Fulham", "Fulham"),
    ("Ipswich Town", "Ipswich"),
    ("Ipswich", "Ipswich"),
    ("Leeds United", "Leeds United"),
    ("Leeds", "Leeds United"),
    ("Leicester City", "Leicester"),
    ("Leicester", "Leicester"),
    ("Liverpool", "Liverpool"),
    ("Luton Town", "Luton"),
    ("Luton", "Luton"),
    ("Manchester City", "Manchester City"),
    ("Man City", "Manchester City"),
    ("Manchester United", "Manchester United"),
    ("Man United", "Manchester United"),
    ("Man Utd", "Manchester United"),
    ("Newcastle United", "Newcastle"),
    ("Newcastle", "Newcastle"),
    ("Nottingham Forest", "Nottingham Forest"),
    ("Nottm Forest", "Nottingham Forest"),
    ("Sheffield United", "Sheffield United"),
    ("Sheffield", "Sheffield United"),
    ("Southampton", "Southampton"),
    ("Sunderland", "Sunderland"),
    ("Tottenham Hotspur", "Tottenham"),
    ("Tottenham", "Tottenham"),
    ("Spurs", "Tottenham"),
    ("West Ham United", "West Ham"),
    ("West Ham", "West Ham"),
    ("Wolverhampton Wanderers", "Wolves"),
    ("Wolverhampton", "Wolves"),
    ("Wolves", "Wolves"),
];

/// Trailing tokens stripped from club names, compared case-insensitively
const CLUB_SUFFIXES: &[&str] = &[
    "fc",
    "afc",
    "f.c",
    "a.f.c",
    "united",
    "city",
    "hotspur",
    "wanderers",
    "athletic",
    "town",
    "rovers",
    "county",
    "albion",
];

#[derive(Debug, Clone)]
struct AliasEntry {
    key_lower: String,
    key_tokens: Vec<String>,
    canonical: String,
}

/// Ordered alias → canonical name table
#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
}

impl AliasTable {
    /// Table with no entries; every name resolves to its stripped form
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Built-in Premier League table
    pub fn epl() -> Self {
        let mut table = Self::empty();
        for (alias, canonical) in EPL_ALIASES {
            table.insert(alias, canonical);
        }
        table
    }

    /// Add an alias after the existing ones, or retarget an existing alias
    pub fn insert(&mut self, alias: &str, canonical: &str) {
        let key_lower = alias.trim().to_lowercase();
        if key_lower.is_empty() || canonical.trim().is_empty() {
            return;
        }

        if let Some(entry) = self.entries.iter_mut().find(|e| e.key_lower == key_lower) {
            entry.canonical = canonical.trim().to_string();
            return;
        }

        self.entries.push(AliasEntry {
            key_tokens: tokens_lower(&key_lower),
            key_lower,
            canonical: canonical.trim().to_string(),
        });
    }

    /// Number of aliases
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no aliases
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive exact lookup
    pub fn exact(&self, name: &str) -> Option<&str> {
        let wanted = tokens_lower(name).join(" ");
        self.entries
            .iter()
            .find(|e| e.key_tokens.join(" ") == wanted)
            .map(|e| e.canonical.as_str())
    }

    /// Longest alias whose words appear contiguously in `name`
    ///
    /// Ties go to the alias declared first.
    pub fn contained(&self, name: &str) -> Option<&str> {
        let haystack = tokens_lower(name);
        let mut best: Option<&AliasEntry> = None;

        for entry in &self.entries {
            if !contains_run(&haystack, &entry.key_tokens) {
                continue;
            }
            match best {
                Some(b) if b.key_lower.len() >= entry.key_lower.len() => {}
                _ => best = Some(entry),
            }
        }

        best.map(|e| e.canonical.as_str())
    }

    /// Resolve a raw captured name to its canonical search term
    ///
    /// Exact match, then suffix stripping with an exact match at every step,
    /// then containment, then the stripped name itself.
    pub fn resolve(&self, name: &str) -> String {
        let name = name.trim();
        if let Some(canonical) = self.exact(name) {
            return canonical.to_string();
        }

        let mut current = tidy(name);
        while let Some(shorter) = strip_one_suffix(&current) {
            current = shorter;
            if let Some(canonical) = self.exact(&current) {
                return canonical.to_string();
            }
        }

        if let Some(canonical) = self.contained(name) {
            return canonical.to_string();
        }

        if current.is_empty() {
            tidy(name)
        } else {
            current
        }
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::epl()
    }
}

/// Strip club suffixes repeatedly until the name stops changing
///
/// A single remaining word is never stripped, so "City" stays "City".
pub fn strip_club_suffixes(name: &str) -> String {
    let mut current = tidy(name);
    while let Some(shorter) = strip_one_suffix(&current) {
        current = shorter;
    }
    current
}

fn strip_one_suffix(name: &str) -> Option<String> {
    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() < 2 {
        return None;
    }
    let last = words[words.len() - 1]
        .trim_end_matches('.')
        .to_lowercase();
    if CLUB_SUFFIXES.contains(&last.as_str()) {
        Some(tidy(&words[..words.len() - 1].join(" ")))
    } else {
        None
    }
}

/// Collapse whitespace and drop trailing punctuation
fn tidy(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(['?', '.', ',', ';', ':', '-'])
        .trim()
        .to_string()
}

fn tokens_lower(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|t| {
            t.trim_matches(|c: char| !c.is_alphanumeric() && c != '&')
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

fn contains_run(haystack: &[String], needle: &[String]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_is_case_insensitive() {
        let table = AliasTable::epl();
        assert_eq!(table.exact("man city"), Some("Manchester City"));
        assert_eq!(table.exact("SPURS"), Some("Tottenham"));
        assert_eq!(table.exact("Real Madrid"), None);
    }

    #[test]
    fn test_strip_club_suffixes_iterates() {
        assert_eq!(strip_club_suffixes("Manchester United FC"), "Manchester");
        assert_eq!(strip_club_suffixes("Brighton & Hove Albion FC"), "Brighton & Hove");
        assert_eq!(strip_club_suffixes("Wolverhampton Wanderers F.C."), "Wolverhampton");
        assert_eq!(strip_club_suffixes("City"), "City");
        assert_eq!(strip_club_suffixes("Arsenal FC?"), "Arsenal");
    }

    #[test]
    fn test_resolve_prefers_exact_after_each_strip() {
        let table = AliasTable::epl();
        assert_eq!(table.resolve("Manchester City FC"), "Manchester City");
        assert_eq!(table.resolve("Manchester United FC"), "Manchester United");
        assert_eq!(table.resolve("West Ham United FC"), "West Ham");
        assert_eq!(table.resolve("Leeds United FC"), "Leeds United");
        assert_eq!(table.resolve("Wolverhampton Wanderers FC"), "Wolves");
    }

    #[test]
    fn test_resolve_containment() {
        let table = AliasTable::epl();
        assert_eq!(table.resolve("Brighton & Hove Albion FC"), "Brighton");
        assert_eq!(table.resolve("Will Arsenal"), "Arsenal");
    }

    #[test]
    fn test_resolve_unknown_keeps_stripped_name() {
        let table = AliasTable::epl();
        assert_eq!(table.resolve("Real Madrid CF"), "Real Madrid CF");
        assert_eq!(table.resolve("Celtic FC"), "Celtic");
    }

    #[test]
    fn test_longest_alias_wins() {
        let mut table = AliasTable::empty();
        table.insert("Manchester", "Manchester City");
        table.insert("Manchester United", "Manchester United");

        assert_eq!(
            table.contained("Manchester United Women"),
            Some("Manchester United")
        );
        assert_eq!(table.resolve("Manchester United Women"), "Manchester United");
    }

    #[test]
    fn test_equal_length_tie_goes_to_first_declared() {
        let mut table = AliasTable::empty();
        table.insert("Leeds", "First");
        table.insert("Luton", "Second");

        assert_eq!(table.contained("Leeds or Luton"), Some("First"));
    }

    #[test]
    fn test_containment_respects_word_boundaries() {
        let table = AliasTable::epl();
        assert_eq!(table.contained("Evertonians united"), None);
    }

    #[test]
    fn test_insert_retargets_existing_alias() {
        let mut table = AliasTable::epl();
        let before = table.len();
        table.insert("spurs", "Spurs");
        assert_eq!(table.len(), before);
        assert_eq!(table.exact("Spurs"), Some("Spurs"));

        table.insert("Gunners", "Arsenal");
        assert_eq!(table.len(), before + 1);
        assert_eq!(table.resolve("The Gunners"), "Arsenal");
    }
}
