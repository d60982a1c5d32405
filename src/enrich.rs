//! Keyword heuristics that guess the enrichment attributes of an exercise
//! from its name.

use std::io;

use crate::error::TableError;
use crate::schema::{ENRICHMENT_COLUMNS, FULL_ROW_WIDTH};

/// The eleven inferred attributes, in [`ENRICHMENT_COLUMNS`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredAttributes {
    pub difficulty_level: &'static str,
    pub equipment_required: &'static str,
    pub target_intensity: &'static str,
    pub primary_muscle_group: String,
    pub secondary_muscle_group: &'static str,
    pub exercise_duration: &'static str,
    pub recovery_time: &'static str,
    pub exercise_type: &'static str,
    pub calories_burned: &'static str,
    pub exercise_progression: &'static str,
    pub injury_risk_level: &'static str,
}

impl InferredAttributes {
    pub fn into_fields(self) -> [String; 11] {
        [
            self.difficulty_level.to_string(),
            self.equipment_required.to_string(),
            self.target_intensity.to_string(),
            self.primary_muscle_group,
            self.secondary_muscle_group.to_string(),
            self.exercise_duration.to_string(),
            self.recovery_time.to_string(),
            self.exercise_type.to_string(),
            self.calories_burned.to_string(),
            self.exercise_progression.to_string(),
            self.injury_risk_level.to_string(),
        ]
    }
}

/// Derive the attributes of `exercise` from keywords in its name.
pub fn infer(muscle_group: &str, exercise: &str) -> InferredAttributes {
    let medium = exercise.contains("Pull") || exercise.contains("Row");
    let strength = exercise.contains("Row") || exercise.contains("Squat");

    InferredAttributes {
        difficulty_level: if medium { "Medium" } else { "Easy" },
        equipment_required: if exercise.contains("Dumbbell") { "Dumbbell" } else { "None" },
        target_intensity: if medium { "70%" } else { "N/A" },
        primary_muscle_group: muscle_group.to_string(),
        secondary_muscle_group: if exercise.contains("Pull") { "Biceps" } else { "Triceps" },
        exercise_duration: if medium { "3" } else { "2" },
        recovery_time: if medium { "60" } else { "30" },
        exercise_type: if strength { "Strength" } else { "Cardio" },
        calories_burned: if strength { "8" } else { "5" },
        exercise_progression: if strength { "Increase weight" } else { "Increase reps" },
        injury_risk_level: if medium { "Medium" } else { "Low" },
    }
}

/// Append inferred attributes to `row` when it is shorter than a full row.
///
/// The first cell is read as the muscle group and the second as the
/// exercise name. Returns whether the row was extended.
pub fn complete_row(row: &mut Vec<String>) -> bool {
    if row.len() >= FULL_ROW_WIDTH {
        return false;
    }
    let muscle_group = row.first().map_or("", String::as_str);
    let exercise = row.get(1).map_or("", String::as_str);
    let inferred = infer(muscle_group, exercise);
    row.extend(inferred.into_fields());
    true
}

/// Stream a CSV table from `reader` to `writer`, completing short rows.
///
/// The header gets the enrichment column names appended. Rows are handled in
/// batches of `batch_size` (at least one); the output does not depend on it.
/// Returns the number of rows that were completed.
pub fn process_rows<R: io::Read, W: io::Write>(
    reader: R,
    writer: W,
    batch_size: usize,
) -> Result<usize, TableError> {
    let batch_size = batch_size.max(1);
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    let mut header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    header.extend(ENRICHMENT_COLUMNS.iter().map(|c| c.to_string()));
    writer.write_record(&header)?;

    let mut completed = 0;
    let mut batch: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        batch.push(record?.iter().map(str::to_string).collect());
        if batch.len() == batch_size {
            completed += flush_batch(&mut batch, &mut writer)?;
        }
    }
    completed += flush_batch(&mut batch, &mut writer)?;

    writer.flush()?;
    Ok(completed)
}

fn flush_batch<W: io::Write>(
    batch: &mut Vec<Vec<String>>,
    writer: &mut csv::Writer<W>,
) -> Result<usize, TableError> {
    let mut completed = 0;
    for mut row in batch.drain(..) {
        if complete_row(&mut row) {
            completed += 1;
        }
        writer.write_record(&row)?;
    }
    Ok(completed)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn barbell_row() {
        let attrs = infer("Back", "Barbell Row");
        assert_eq!(attrs.difficulty_level, "Medium");
        assert_eq!(attrs.equipment_required, "None");
        assert_eq!(attrs.target_intensity, "70%");
        assert_eq!(attrs.primary_muscle_group, "Back");
        assert_eq!(attrs.secondary_muscle_group, "Triceps");
        assert_eq!(attrs.exercise_type, "Strength");
        assert_eq!(attrs.calories_burned, "8");
        assert_eq!(attrs.exercise_progression, "Increase weight");
        assert_eq!(attrs.injury_risk_level, "Medium");
    }

    #[test]
    fn jumping_jack() {
        assert_eq!(
            infer("Full Body", "Jumping Jack").into_fields(),
            [
                "Easy",
                "None",
                "N/A",
                "Full Body",
                "Triceps",
                "2",
                "30",
                "Cardio",
                "5",
                "Increase reps",
                "Low",
            ]
            .map(String::from)
        );
    }

    #[rstest]
    #[case("Dumbbell Pullover", "Medium", "Dumbbell", "Biceps", "Cardio")]
    #[case("Goblet Squat", "Easy", "None", "Triceps", "Strength")]
    #[case("Lat Pulldown", "Medium", "None", "Biceps", "Cardio")]
    #[case("pull up", "Easy", "None", "Triceps", "Cardio")]
    fn keyword_rules(
        #[case] exercise: &str,
        #[case] difficulty: &str,
        #[case] equipment: &str,
        #[case] secondary: &str,
        #[case] kind: &str,
    ) {
        let attrs = infer("Any", exercise);
        assert_eq!(attrs.difficulty_level, difficulty);
        assert_eq!(attrs.equipment_required, equipment);
        assert_eq!(attrs.secondary_muscle_group, secondary);
        assert_eq!(attrs.exercise_type, kind);
    }

    #[test]
    fn inference_is_deterministic() {
        assert_eq!(infer("Legs", "Front Squat"), infer("Legs", "Front Squat"));
    }

    #[test]
    fn full_rows_are_left_alone() {
        let mut row: Vec<String> = (0..FULL_ROW_WIDTH).map(|i| i.to_string()).collect();
        let before = row.clone();
        assert!(!complete_row(&mut row));
        assert_eq!(row, before);
    }

    #[test]
    fn short_rows_get_eleven_fields_appended() {
        let mut row = vec!["Back".to_string(), "Seated Row".to_string(), "x".to_string()];
        assert!(complete_row(&mut row));
        assert_eq!(row.len(), 3 + 11);
        assert_eq!(row[3], "Medium");
        assert_eq!(row[6], "Back");
    }

    fn input() -> String {
        let mut csv = String::from("Muscle_Group,Exercise\n");
        for i in 0..23 {
            csv.push_str(&format!("Back,Row {}\n", i));
        }
        csv.push_str(&format!("Legs,Squat{}\n", ",x".repeat(FULL_ROW_WIDTH - 2)));
        csv
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(10)]
    #[case(1000)]
    fn batch_size_does_not_change_output(#[case] batch_size: usize) {
        let mut expected = Vec::new();
        process_rows(input().as_bytes(), &mut expected, usize::MAX).unwrap();

        let mut out = Vec::new();
        let completed = process_rows(input().as_bytes(), &mut out, batch_size).unwrap();

        assert_eq!(completed, 23);
        assert_eq!(String::from_utf8(out).unwrap(), String::from_utf8(expected).unwrap());
    }

    #[test]
    fn header_gains_enrichment_columns() {
        let mut out = Vec::new();
        process_rows("Muscle_Group,Exercise\n".as_bytes(), &mut out, 10).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("Muscle_Group,Exercise,{}\n", ENRICHMENT_COLUMNS.join(","))
        );
    }
}
