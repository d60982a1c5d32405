//! Key-based transforms between tables: dedup split, reconciliation and
//! enrichment fill.
//!
//! All functions are pure; inputs are never modified.

use std::collections::{HashMap, HashSet};

use crate::error::TableError;
use crate::schema::{normalize_difficulty, normalize_injury_risk, DIFFICULTY_LEVEL, INJURY_RISK_LEVEL};
use crate::table::Table;

/// Result of [`split_repeated`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// First row seen for every name, in input order.
    pub unique: Table,
    /// Every later row whose name was already seen.
    pub repeated: Table,
}

/// Split rows by the name at `key_index`, keeping the first occurrence in
/// `unique` and every later one in `repeated`. Both keep the source header.
pub fn split_repeated(table: &Table, key_index: usize) -> Split {
    let mut seen = HashSet::new();
    let mut unique = Table::new(table.headers().iter().cloned());
    let mut repeated = Table::new(table.headers().iter().cloned());

    for row in table.rows() {
        let name = row.get(key_index).map_or("", String::as_str);
        if seen.insert(name) {
            unique.push_row(row.iter().cloned());
        } else {
            repeated.push_row(row.iter().cloned());
        }
    }

    Split { unique, repeated }
}

/// Left-join `primary` onto `fallback` by `join_column`.
///
/// The output has exactly `fallback`'s columns, in its order, and one row per
/// `primary` row. `keep_column` always comes from `primary`; every other
/// column takes `primary`'s value when it is non-empty and otherwise the
/// matching `fallback` row's value, or an empty cell when neither has one.
/// When `fallback` repeats a key, its last row wins.
pub fn reconcile(
    primary: &Table,
    fallback: &Table,
    join_column: &str,
    keep_column: &str,
) -> Result<Table, TableError> {
    let primary_key = primary.require_column(join_column)?;
    let fallback_key = fallback.require_column(join_column)?;

    let by_key: HashMap<&str, &[String]> = fallback
        .rows()
        .iter()
        .map(|row| (cell(row, Some(fallback_key)), row.as_slice()))
        .collect();

    // (column in primary, column in fallback) for every output column.
    let columns: Vec<(&str, Option<usize>, usize)> = fallback
        .headers()
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), primary.column_index(name), i))
        .collect();

    let mut merged = Table::new(fallback.headers().iter().cloned());
    for row in primary.rows() {
        let matched = by_key.get(cell(row, Some(primary_key))).copied();

        merged.push_row(columns.iter().map(|&(name, in_primary, in_fallback)| {
            let own = cell(row, in_primary);
            if name == keep_column || !own.is_empty() {
                own.to_string()
            } else {
                matched.map_or("", |m| cell(m, Some(in_fallback))).to_string()
            }
        }));
    }

    Ok(merged)
}

/// Copy `fields` into `template` rows from the `source` row with the same
/// (`group_column`, `item_column`) key.
///
/// Fields not yet in `template` are appended to its header. Unmatched rows
/// keep whatever `template` had for those fields (empty if nothing). A field
/// missing from the matched `source` row is filled with an empty cell. When
/// `source` repeats a key, its last row wins.
pub fn fill(
    template: &Table,
    source: &Table,
    group_column: &str,
    item_column: &str,
    fields: &[&str],
) -> Result<Table, TableError> {
    let template_key = (
        template.require_column(group_column)?,
        template.require_column(item_column)?,
    );
    let source_key = (
        source.require_column(group_column)?,
        source.require_column(item_column)?,
    );

    let by_key: HashMap<(&str, &str), &[String]> = source
        .rows()
        .iter()
        .map(|row| {
            let key = (cell(row, Some(source_key.0)), cell(row, Some(source_key.1)));
            (key, row.as_slice())
        })
        .collect();

    let mut headers = template.headers().to_vec();
    for field in fields {
        if !headers.iter().any(|h| h == field) {
            headers.push(field.to_string());
        }
    }

    let targets: Vec<(usize, Option<usize>)> = fields
        .iter()
        .filter_map(|field| {
            let out = headers.iter().position(|h| h == field)?;
            Some((out, source.column_index(field)))
        })
        .collect();

    let mut filled = Table::new(headers.iter().cloned());
    for row in template.rows() {
        let mut out: Vec<String> = (0..headers.len())
            .map(|i| cell(row, Some(i)).to_string())
            .collect();

        let key = (cell(row, Some(template_key.0)), cell(row, Some(template_key.1)));
        if let Some(matched) = by_key.get(&key) {
            for &(target, in_source) in &targets {
                out[target] = cell(matched, in_source).to_string();
            }
        }

        filled.push_row(out);
    }

    Ok(filled)
}

/// Rewrite `Difficulty_Level` and `Injury_Risk_Level` onto the
/// Easy/Medium/Hard and Low/Medium/High scales. Other columns are untouched.
pub fn normalize_levels(table: &Table) -> Table {
    let difficulty = table.column_index(DIFFICULTY_LEVEL);
    let injury_risk = table.column_index(INJURY_RISK_LEVEL);

    let mut normalized = Table::new(table.headers().iter().cloned());
    for row in table.rows() {
        normalized.push_row(row.iter().enumerate().map(|(i, value)| {
            if Some(i) == difficulty {
                normalize_difficulty(value).to_string()
            } else if Some(i) == injury_risk {
                normalize_injury_risk(value).to_string()
            } else {
                value.clone()
            }
        }));
    }
    normalized
}

fn cell(row: &[String], index: Option<usize>) -> &str {
    index.and_then(|i| row.get(i)).map_or("", String::as_str)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::schema::{ENRICHMENT_COLUMNS, EXERCISE, MUSCLE_GROUP};

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        let mut table = Table::new(headers.iter().copied());
        for row in rows {
            table.push_row(row.iter().copied());
        }
        table
    }

    #[test]
    fn split_keeps_first_seen_order() {
        let source = table(
            &["Muscle_Group", "Exercise"],
            &[&["A", "Squat"], &["A", "Squat"], &["B", "Lunge"]],
        );

        let split = split_repeated(&source, 1);

        assert_eq!(
            split.unique,
            table(&["Muscle_Group", "Exercise"], &[&["A", "Squat"], &["B", "Lunge"]])
        );
        assert_eq!(split.repeated, table(&["Muscle_Group", "Exercise"], &[&["A", "Squat"]]));
    }

    #[test]
    fn split_of_distinct_rows_has_no_repeats() {
        let source = table(&["g", "n"], &[&["A", "Squat"], &["A", "Lunge"]]);
        let split = split_repeated(&source, 1);
        assert_eq!(split.unique, source);
        assert!(split.repeated.is_empty());
        assert_eq!(split.repeated.headers(), source.headers());
    }

    #[test]
    fn self_reconciliation_is_identity() {
        let t = table(
            &[MUSCLE_GROUP, EXERCISE, "Link"],
            &[&["Legs", "Squat", "/squat"], &["Back", "Row", ""]],
        );

        assert_eq!(reconcile(&t, &t, EXERCISE, MUSCLE_GROUP).unwrap(), t);
    }

    #[test]
    fn primary_wins_unless_empty() {
        let repeated = table(
            &[EXERCISE, MUSCLE_GROUP, "Difficulty_Level", "Extra"],
            &[
                &["Squat", "Glutes", "", "dropped"],
                &["Lunge", "", "Hard", "dropped"],
                &["Plank", "Abs", "", "dropped"],
            ],
        );
        let unique = table(
            &[MUSCLE_GROUP, EXERCISE, "Difficulty_Level", "Image"],
            &[
                &["Legs", "Squat", "Medium", "/squat.gif"],
                &["Legs", "Lunge", "Easy", "/lunge.gif"],
            ],
        );

        let merged = reconcile(&repeated, &unique, EXERCISE, MUSCLE_GROUP).unwrap();

        assert_eq!(
            merged,
            table(
                &[MUSCLE_GROUP, EXERCISE, "Difficulty_Level", "Image"],
                &[
                    &["Glutes", "Squat", "Medium", "/squat.gif"],
                    // The kept column stays empty even though the fallback has a value.
                    &["", "Lunge", "Hard", "/lunge.gif"],
                    &["Abs", "Plank", "", ""],
                ],
            )
        );
    }

    #[test]
    fn reconcile_uses_last_duplicate_in_fallback() {
        let primary = table(&[EXERCISE, "Level"], &[&["Squat", ""]]);
        let fallback = table(&[EXERCISE, "Level"], &[&["Squat", "Easy"], &["Squat", "Hard"]]);

        let merged = reconcile(&primary, &fallback, EXERCISE, MUSCLE_GROUP).unwrap();

        assert_eq!(merged, table(&[EXERCISE, "Level"], &[&["Squat", "Hard"]]));
    }

    #[test]
    fn reconcile_requires_join_column() {
        let primary = table(&["Name"], &[&["Squat"]]);
        let fallback = table(&[EXERCISE], &[]);
        assert!(matches!(
            reconcile(&primary, &fallback, EXERCISE, MUSCLE_GROUP),
            Err(TableError::MissingColumn(_))
        ));
    }

    #[test]
    fn fill_copies_matched_fields_and_keeps_unmatched_rows() {
        let list = table(
            &[MUSCLE_GROUP, EXERCISE, "Sets"],
            &[&["Legs", "Squat", "5"], &["Arms", "Curl", "3"], &["Back", "Squat", "4"]],
        );
        let consolidated = table(
            &[MUSCLE_GROUP, EXERCISE, "Difficulty_Level", "Exercise_Type"],
            &[
                &["Legs", "Squat", "Beginner", "Strength"],
                &["Legs", "Squat", "Advanced", "Strength"],
            ],
        );

        let filled = fill(&list, &consolidated, MUSCLE_GROUP, EXERCISE, &ENRICHMENT_COLUMNS).unwrap();

        let mut expected_headers = vec![MUSCLE_GROUP, EXERCISE, "Sets"];
        expected_headers.extend(ENRICHMENT_COLUMNS);
        assert_eq!(filled.headers(), expected_headers.as_slice());

        assert_eq!(filled.cell(0, "Difficulty_Level"), Some("Advanced"));
        assert_eq!(filled.cell(0, "Exercise_Type"), Some("Strength"));
        assert_eq!(filled.cell(0, "Calories_Burned"), Some(""));
        assert_eq!(filled.cell(0, "Sets"), Some("5"));
        // (Back, Squat) is a different key from (Legs, Squat).
        assert_eq!(filled.cell(2, "Difficulty_Level"), Some(""));
        assert!(filled.rows().iter().all(|row| row.len() == expected_headers.len()));
    }

    #[test]
    fn fill_keeps_existing_template_values_when_unmatched() {
        let list = table(
            &[MUSCLE_GROUP, EXERCISE, "Difficulty_Level"],
            &[&["Arms", "Curl", "Easy"]],
        );
        let source = table(&[MUSCLE_GROUP, EXERCISE, "Difficulty_Level"], &[]);

        let filled = fill(&list, &source, MUSCLE_GROUP, EXERCISE, &["Difficulty_Level"]).unwrap();

        assert_eq!(filled, list);
    }

    #[test]
    fn normalizes_only_level_columns() {
        let filled = table(
            &[EXERCISE, "Difficulty_Level", "Injury_Risk_Level", "Note"],
            &[
                &["Squat", "Beginner", "Moderate", "Advanced"],
                &["Row", "Advanced", "High", "Moderate"],
                &["Curl", "Medium", "", ""],
            ],
        );

        assert_eq!(
            normalize_levels(&filled),
            table(
                &[EXERCISE, "Difficulty_Level", "Injury_Risk_Level", "Note"],
                &[
                    &["Squat", "Easy", "Medium", "Advanced"],
                    &["Row", "Hard", "High", "Moderate"],
                    &["Curl", "Medium", "", ""],
                ],
            )
        );
    }
}
