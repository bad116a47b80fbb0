use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A parsed `.feature` file.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    /// Steps run before every scenario of the feature
    pub background: Vec<Step>,
    pub scenarios: Vec<Scenario>,
    pub path: Option<PathBuf>,
}

/// One ordered sequence of steps exercising a single test case.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub tags: Vec<String>,
    pub line: usize,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub keyword: Keyword,
    pub text: String,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Keyword {
    Given,
    When,
    Then,
    And,
    But,
    #[serde(rename = "*")]
    Star,
}

impl Keyword {
    /// Map a keyword as written in the file, e.g. `"And "`.
    pub fn parse(keyword: &str) -> Option<Keyword> {
        match keyword.trim() {
            "Given" => Some(Keyword::Given),
            "When" => Some(Keyword::When),
            "Then" => Some(Keyword::Then),
            "And" => Some(Keyword::And),
            "But" => Some(Keyword::But),
            "*" => Some(Keyword::Star),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Given => "Given",
            Keyword::When => "When",
            Keyword::Then => "Then",
            Keyword::And => "And",
            Keyword::But => "But",
            Keyword::Star => "*",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Scenario {
    /// Identifier used to key screenshots: the first tag shaped like
    /// `TC001` (scenario tags before feature tags), otherwise the
    /// sanitized scenario name.
    pub fn test_case_id(&self, feature: &Feature) -> String {
        self.tags
            .iter()
            .chain(feature.tags.iter())
            .find(|tag| is_test_case_tag(tag))
            .cloned()
            .unwrap_or_else(|| sanitize_filename(&self.name))
    }

    /// Scenario tags followed by the feature tags it inherits.
    pub fn effective_tags(&self, feature: &Feature) -> Vec<String> {
        let mut tags = self.tags.clone();
        for tag in &feature.tags {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        tags
    }

    pub fn has_tag(&self, feature: &Feature, tag: &str) -> bool {
        let tag = tag.trim_start_matches('@');
        self.tags.iter().chain(feature.tags.iter()).any(|t| t == tag)
    }
}

/// Upper-case letters followed by at least one digit, e.g. `TC002`.
fn is_test_case_tag(tag: &str) -> bool {
    let letters = tag.chars().take_while(|c| c.is_ascii_uppercase()).count();
    let digits = &tag[letters..];
    letters > 0 && !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Sanitize a name into a safe file name.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .to_lowercase()
}
