// Points-per-rep scheme, loaded from a JSON file at startup.
//
// The file maps exercise names to how many points one repetition is worth:
//
//   { "exercises": { "pushup": 1, "pullup": 3, "squat": 1 } }
//
// When the file is missing the built-in defaults are used so the bot can
// boot on a fresh install.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointScheme {
    exercises: HashMap<String, i64>,
}

impl PointScheme {
    /// Load a scheme from the given JSON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let scheme: PointScheme = serde_json::from_str(&raw)?;
        Ok(scheme)
    }

    /// Load a scheme, falling back to the defaults if the file is absent
    /// or unreadable. The fallback is logged so a typo'd path is visible.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(scheme) => {
                tracing::info!(
                    path = %path.as_ref().display(),
                    exercises = scheme.exercises.len(),
                    "Loaded point scheme"
                );
                scheme
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.as_ref().display(),
                    "Falling back to default point scheme: {err}"
                );
                Self::default()
            }
        }
    }

    /// Points one rep of `exercise` is worth, if the exercise is known.
    /// Lookup is case-insensitive.
    pub fn points_for(&self, exercise: &str) -> Option<i64> {
        let wanted = exercise.trim().to_lowercase();
        self.exercises.get(&wanted).copied()
    }

    /// All known exercises with their per-rep value, sorted by name.
    pub fn entries(&self) -> Vec<(&str, i64)> {
        let mut entries: Vec<(&str, i64)> = self
            .exercises
            .iter()
            .map(|(name, points)| (name.as_str(), *points))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl Default for PointScheme {
    fn default() -> Self {
        let exercises = [
            ("pushup", 1),
            ("situp", 1),
            ("squat", 1),
            ("lunge", 1),
            ("burpee", 2),
            ("pullup", 3),
        ]
        .into_iter()
        .map(|(name, points)| (name.to_string(), points))
        .collect();

        Self { exercises }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn resolves_known_exercises_case_insensitively() {
        let scheme = PointScheme::default();
        assert_eq!(scheme.points_for("pullup"), Some(3));
        assert_eq!(scheme.points_for("  PullUp "), Some(3));
    }

    #[test]
    fn unknown_exercise_is_none() {
        let scheme = PointScheme::default();
        assert_eq!(scheme.points_for("underwater basket weaving"), None);
    }

    #[test]
    fn loads_from_json_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, r#"{{"exercises": {{"plank": 5}}}}"#).unwrap();

        let scheme = PointScheme::load(tmp.path()).unwrap();
        assert_eq!(scheme.points_for("plank"), Some(5));
        assert_eq!(scheme.points_for("pushup"), None);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let scheme = PointScheme::load_or_default("/definitely/not/here.json");
        assert_eq!(scheme.points_for("pushup"), Some(1));
    }

    #[test]
    fn entries_are_sorted_by_name() {
        let scheme = PointScheme::default();
        let names: Vec<&str> = scheme.entries().iter().map(|(name, _)| *name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
