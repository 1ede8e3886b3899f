//! Competition-level context terms
//!
//! Season-long markets ("win the league", "finish top 4") are discussed under
//! the competition's name as much as under the club's.

/// Category label and the question phrases that select it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    pub label: &'static str,
    pub phrases: &'static [&'static str],
}

/// Built-in rules, checked in order; the first match wins
///
/// "Top 4" is checked first so "champions league place" is not taken for a
/// title race through "champion".
pub const EPL_CATEGORIES: &[CategoryRule] = &[
    CategoryRule {
        label: "Top 4",
        phrases: &[
            "top 4",
            "top four",
            "top-4",
            "finish top",
            "champions league place",
        ],
    },
    CategoryRule {
        label: "Premier League",
        phrases: &[
            "title",
            "champion",
            "win the league",
            "premier league winner",
            "win the premier league",
        ],
    },
];

/// Label of the first rule with a phrase contained in `question`
pub fn category_for(question: &str, rules: &[CategoryRule]) -> Option<&'static str> {
    let lower = question.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.phrases.iter().any(|p| lower.contains(p)))
        .map(|rule| rule.label)
}
