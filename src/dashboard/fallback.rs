use chrono::NaiveDate;

use crate::report::{Feedback, Record, Score, Skills, Student};

pub const FALLBACK_NOTICE: &str = "Using demo data. Backend may not be running.";

/// Demo record shown when the service cannot be reached. Its feedback keeps a
/// third suggestion that the classifier never produces.
pub fn fallback_record() -> Record {
    Record {
        student: Student {
            name: "Alex Johnson".to_string(),
            test_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default(),
            test_type: "Speaking Assessment".to_string(),
        },
        overall_score: Score::from(7),
        skills: Skills {
            pronunciation: Score::from(7),
            fluency: Score::from(6),
            vocabulary: Score::from(8),
            grammar: Score::from(6),
        },
        feedback: Feedback {
            title: "Good Performance".to_string(),
            description: "Generally effective command of the language despite some inaccuracies. Can handle complex situations fairly well.".to_string(),
            suggestions: vec![
                "Work on grammatical accuracy".to_string(),
                "Practice speaking on unfamiliar topics".to_string(),
                "Expand vocabulary in specific topic areas".to_string(),
            ],
        },
    }
}
