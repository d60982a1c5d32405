use serde::Serialize;

/// Name used when an entry has no title link.
pub const UNKNOWN_NAME: &str = "Unknown";
/// Link placeholder when a detail or image link is absent.
pub const NOT_AVAILABLE: &str = "Not available";
/// Muscle placeholder when an entry carries no muscle metadata.
pub const NOT_SPECIFIED: &str = "Not specified";

/// One (exercise, muscle) pair scraped from a listing page.
///
/// An entry tagged with several muscles becomes several records that share
/// the name and both links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseRecord {
    #[serde(rename = "exercise")]
    pub name: String,
    pub primary_muscle: String,
    #[serde(rename = "exercise_link")]
    pub detail_link: String,
    pub image_link: String,
}
