//! Column names shared by every stage.

/// Header of the scraped `exercises.csv`, in field order of [`ExerciseRecord`].
///
/// [`ExerciseRecord`]: crate::ExerciseRecord
pub const SCRAPED_COLUMNS: [&str; 4] = ["exercise", "primary_muscle", "exercise_link", "image_link"];

pub const MUSCLE_GROUP: &str = "Muscle_Group";
pub const EXERCISE: &str = "Exercise";

pub const DIFFICULTY_LEVEL: &str = "Difficulty_Level";
pub const INJURY_RISK_LEVEL: &str = "Injury_Risk_Level";

/// Attributes appended by the `fill` and `process` stages, in output order.
pub const ENRICHMENT_COLUMNS: [&str; 11] = [
    DIFFICULTY_LEVEL,
    "Equipment_Required",
    "Target_Intensity",
    "Primary_Muscle_Group",
    "Secondary_Muscle_Group",
    "Exercise_Duration",
    "Recovery_Time",
    "Exercise_Type",
    "Calories_Burned",
    "Exercise_Progression",
    INJURY_RISK_LEVEL,
];

/// Rows shorter than this are treated as needing inferred attributes.
pub const FULL_ROW_WIDTH: usize = 13;

/// Position of the exercise name in a source table, used for dedup.
pub const NAME_INDEX: usize = 1;

/// Maps the site's difficulty wording onto Easy/Medium/Hard.
pub fn normalize_difficulty(value: &str) -> &str {
    match value {
        "Beginner" => "Easy",
        "Intermediate" => "Medium",
        "Advanced" => "Hard",
        other => other,
    }
}

pub fn normalize_injury_risk(value: &str) -> &str {
    match value {
        "Moderate" => "Medium",
        other => other,
    }
}
