//! Keyword extraction and rule-based classification of job descriptions.
//!
//! Everything here is pure and deterministic: no I/O, no LLM calls.
//! Classification is cue matching over lower-cased text, so cue ordering
//! doubles as the tie-break policy.

use serde::{Deserialize, Serialize};

pub const MAX_KEYWORDS: usize = 20;

/// Tokens at or below this length are never keywords.
const MIN_KEYWORD_LEN: usize = 2;

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "day", "get", "has", "him", "his", "how", "its", "may", "new", "now",
    "old", "see", "two", "who", "boy", "did", "let", "put", "say", "she", "too", "use", "with",
    "will", "have", "this", "that", "from", "they", "been", "were", "your", "what", "when",
    "where", "which", "their", "there", "about", "would", "these", "other", "into", "more",
    "some", "than", "then", "them", "also", "such", "must", "should", "able", "work", "working",
    "team", "role", "join", "help", "well", "etc",
];

/// Fixed classification order. The first industry with a matching cue wins.
const INDUSTRY_CUES: &[(Industry, &[&str])] = &[
    (
        Industry::Technology,
        &[
            "software",
            "developer",
            "engineer",
            "programming",
            "javascript",
            "python",
            "react",
            "cloud",
            "devops",
            "frontend",
            "backend",
            "full stack",
            "machine learning",
            "tech",
        ],
    ),
    (
        Industry::Healthcare,
        &[
            "healthcare",
            "medical",
            "hospital",
            "clinical",
            "patient",
            "nurse",
            "physician",
            "pharmaceutical",
        ],
    ),
    (
        Industry::Finance,
        &[
            "finance",
            "financial",
            "banking",
            "accounting",
            "investment",
            "trading",
            "audit",
        ],
    ),
    (
        Industry::Education,
        &[
            "education",
            "teacher",
            "teaching",
            "school",
            "university",
            "curriculum",
            "student",
        ],
    ),
    (
        Industry::Marketing,
        &[
            "marketing",
            "brand",
            "advertising",
            "campaign",
            "social media",
            "seo",
        ],
    ),
];

/// Plain substrings: "leadership" and "seniority" count as senior.
const SENIOR_CUES: &[&str] = &["senior", "lead", "principal"];
/// Whole words or phrases only, so "internal" is not "intern".
const JUNIOR_CUES: &[&str] = &[
    "junior",
    "entry level",
    "entry-level",
    "graduate",
    "intern",
    "interns",
    "internship",
    "0-2 years",
];
const MID_CUES: &[&str] = &["mid-level", "mid level", "intermediate"];

/// "N+ years" at or above this is senior.
const SENIOR_MIN_YEARS: u32 = 5;
/// "N+ years" at or above this (and below senior) is mid.
const MID_MIN_YEARS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Technology,
    Healthcare,
    Finance,
    Education,
    Marketing,
    Other,
}

impl Industry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Technology => "technology",
            Industry::Healthcare => "healthcare",
            Industry::Finance => "finance",
            Industry::Education => "education",
            Industry::Marketing => "marketing",
            Industry::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Senior,
    Mid,
    Junior,
    Unknown,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Junior => "junior",
            ExperienceLevel::Unknown => "unknown",
        }
    }
}

/// Returns up to [`MAX_KEYWORDS`] lower-cased tokens in their original order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    normalized
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_KEYWORD_LEN)
        .filter(|token| !STOP_WORDS.contains(token))
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

pub fn detect_industry(text: &str) -> Industry {
    let lower = text.to_lowercase();
    INDUSTRY_CUES
        .iter()
        .find(|(_, cues)| contains_any(&lower, cues))
        .map(|(industry, _)| *industry)
        .unwrap_or(Industry::Other)
}

/// Senior cues are checked before junior ones, so text carrying both is senior.
///
/// An "N+ years" requirement counts toward the level its N falls in: five or
/// more is senior, two to four is mid, below two is junior.
pub fn detect_experience_level(text: &str) -> ExperienceLevel {
    let lower = text.to_lowercase();
    let years = required_years(&lower);
    if contains_any(&lower, SENIOR_CUES) || years.is_some_and(|n| n >= SENIOR_MIN_YEARS) {
        ExperienceLevel::Senior
    } else if contains_any_word(&lower, JUNIOR_CUES) || years.is_some_and(|n| n < MID_MIN_YEARS) {
        ExperienceLevel::Junior
    } else if contains_any_word(&lower, MID_CUES) || years.is_some() {
        ExperienceLevel::Mid
    } else {
        ExperienceLevel::Unknown
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn contains_any_word(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| contains_word(haystack, needle))
}

/// Matches `needle` only where it is not glued to other letters or digits.
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Largest N across every "N+ year(s)" in the text.
fn required_years(haystack: &str) -> Option<u32> {
    haystack
        .match_indices("+ year")
        .filter_map(|(end, _)| {
            let prefix = &haystack[..end];
            let digits_start = prefix
                .char_indices()
                .rev()
                .take_while(|(_, c)| c.is_ascii_digit())
                .last()
                .map(|(i, _)| i)?;
            let glued = prefix[..digits_start]
                .chars()
                .next_back()
                .is_some_and(char::is_alphanumeric);
            if glued {
                return None;
            }
            prefix[digits_start..].parse::<u32>().ok()
        })
        .max()
}

/// Everything derived from a job description before it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobProfile {
    pub keywords: Vec<String>,
    pub industry: Industry,
    pub experience_level: ExperienceLevel,
}

impl JobProfile {
    pub fn analyze(job_text: &str) -> Self {
        Self {
            keywords: extract_keywords(job_text),
            industry: detect_industry(job_text),
            experience_level: detect_experience_level(job_text),
        }
    }

    /// Keywords in the comma-joined form stored alongside events.
    pub fn joined_keywords(&self) -> String {
        self.keywords.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRONTEND_JD: &str = r#"
        Senior Frontend Engineer (React/TypeScript)
        We're looking for an engineer with 5+ years building responsive web apps.
        You will own our component library, mentor junior developers, and partner
        with design on accessibility.
    "#;

    #[test]
    fn test_extract_keywords_lowercases_and_strips_punctuation() {
        let keywords = extract_keywords("React.js, TypeScript & GraphQL!");
        assert_eq!(keywords, vec!["react", "typescript", "graphql"]);
    }

    #[test]
    fn test_extract_keywords_drops_short_tokens_and_stop_words() {
        let keywords = extract_keywords("We are a team of UX and QA people with the best tools");
        assert_eq!(keywords, vec!["people", "best", "tools"]);
    }

    #[test]
    fn test_extract_keywords_caps_at_twenty_in_order() {
        let text = (0..30)
            .map(|i| format!("skill{i}"))
            .collect::<Vec<_>>()
            .join(" ");
        let keywords = extract_keywords(&text);
        assert_eq!(keywords.len(), MAX_KEYWORDS);
        assert_eq!(keywords.first().map(String::as_str), Some("skill0"));
        assert_eq!(keywords.last().map(String::as_str), Some("skill19"));
    }

    #[test]
    fn test_extract_keywords_keeps_duplicates() {
        let keywords = extract_keywords("rust rust rust");
        assert_eq!(keywords, vec!["rust", "rust", "rust"]);
    }

    #[test]
    fn test_extract_keywords_output_invariants() {
        let keywords = extract_keywords(FRONTEND_JD);
        assert!(keywords.len() <= MAX_KEYWORDS);
        for keyword in &keywords {
            assert!(keyword.chars().count() > MIN_KEYWORD_LEN, "{keyword}");
            assert!(!STOP_WORDS.contains(&keyword.as_str()), "{keyword}");
            assert_eq!(keyword, &keyword.to_lowercase());
            assert!(keyword.chars().all(char::is_alphanumeric), "{keyword}");
        }
    }

    #[test]
    fn test_extract_keywords_empty_input() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("!!! ... ,,,").is_empty());
    }

    #[test]
    fn test_senior_software_engineer_example() {
        let job = "Senior Software Engineer, 5+ years, React";
        assert_eq!(detect_industry(job), Industry::Technology);
        assert_eq!(detect_experience_level(job), ExperienceLevel::Senior);
    }

    #[test]
    fn test_detect_industry_each_category() {
        assert_eq!(detect_industry("Registered Nurse, ICU"), Industry::Healthcare);
        assert_eq!(detect_industry("Investment Banking Associate"), Industry::Finance);
        assert_eq!(detect_industry("High School Teacher"), Industry::Education);
        assert_eq!(detect_industry("Brand Manager"), Industry::Marketing);
        assert_eq!(detect_industry("Barista, morning shift"), Industry::Other);
    }

    #[test]
    fn test_detect_industry_first_match_wins() {
        // Matches both healthcare and technology cues; technology is listed first.
        assert_eq!(
            detect_industry("Software developer for a hospital records system"),
            Industry::Technology
        );
    }

    #[test]
    fn test_detect_experience_level_precedence() {
        assert_eq!(
            detect_experience_level("Senior engineer mentoring junior staff"),
            ExperienceLevel::Senior
        );
        assert_eq!(
            detect_experience_level("Junior analyst, intermediate Excel"),
            ExperienceLevel::Junior
        );
        assert_eq!(detect_experience_level("Mid-level designer"), ExperienceLevel::Mid);
        assert_eq!(detect_experience_level("Designer"), ExperienceLevel::Unknown);
    }

    #[test]
    fn test_detect_experience_level_reads_year_counts() {
        assert_eq!(detect_experience_level("Engineer, 11+ years"), ExperienceLevel::Senior);
        assert_eq!(detect_experience_level("Engineer, 12+ years"), ExperienceLevel::Senior);
        assert_eq!(detect_experience_level("Engineer, 20+ years"), ExperienceLevel::Senior);
        assert_eq!(detect_experience_level("Analyst, 3+ years SQL"), ExperienceLevel::Mid);
        assert_eq!(detect_experience_level("Analyst, 1+ year"), ExperienceLevel::Junior);
        assert_eq!(
            detect_experience_level("Analyst, 1+ years Excel, 6+ years overall"),
            ExperienceLevel::Senior
        );
        assert_eq!(detect_experience_level("Model x5+ years"), ExperienceLevel::Unknown);
    }

    #[test]
    fn test_detect_experience_level_ignores_words_containing_cues() {
        assert_eq!(
            detect_experience_level("International sales manager"),
            ExperienceLevel::Unknown
        );
        assert_eq!(
            detect_experience_level("Designer for our internal tools"),
            ExperienceLevel::Unknown
        );
        assert_eq!(
            detect_experience_level("Undergraduate tutoring coordinator"),
            ExperienceLevel::Unknown
        );
        assert_eq!(detect_experience_level("Summer intern, data"), ExperienceLevel::Junior);
        assert_eq!(detect_experience_level("Marketing internship"), ExperienceLevel::Junior);
    }

    #[test]
    fn test_classifiers_are_total_on_empty_input() {
        assert_eq!(detect_industry(""), Industry::Other);
        assert_eq!(detect_experience_level(""), ExperienceLevel::Unknown);
    }

    #[test]
    fn test_job_profile_joined_keywords() {
        let profile = JobProfile::analyze("Senior Rust engineer, tokio + axum");
        assert_eq!(profile.joined_keywords(), "senior,rust,engineer,tokio,axum");
        assert_eq!(profile.industry, Industry::Technology);
        assert_eq!(profile.experience_level, ExperienceLevel::Senior);
    }

    #[test]
    fn test_labels_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&Industry::Technology).unwrap(),
            r#""technology""#
        );
        assert_eq!(ExperienceLevel::Unknown.as_str(), "unknown");
    }
}
