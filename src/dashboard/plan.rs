use chrono::NaiveDate;
use serde::Serialize;

use crate::report::{Record, Score, Skills};

use super::controls::Slider;

pub const MAX_SCORE: i64 = 9;

const LONG_DATE: &str = "%B %-d, %Y";

pub fn skill_level(score: &Score) -> &'static str {
    let n = score.as_number();
    if n >= 8.0 {
        "Excellent"
    } else if n >= 6.0 {
        "Good"
    } else if n >= 4.0 {
        "Fair"
    } else {
        "Needs Practice"
    }
}

/// Bar width for a skill card. Not clamped: out-of-range scores overflow and
/// a score with no numeric reading gives `NaN`.
pub fn progress_percent(score: &Score) -> f64 {
    (score.as_number() / MAX_SCORE as f64) * 100.0
}

/// Badge text. The band number is the leading integer of the displayed
/// score, so `7.5` shows as `Band 7`.
pub fn badge(score: &Score) -> String {
    match score.leading_integer() {
        Some(v) => format!("Band {v}"),
        None => "Band NaN".to_string(),
    }
}

pub fn long_date(date: NaiveDate) -> String {
    date.format(LONG_DATE).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Initial load: every panel.
    Full,
    /// After an update: scores, skills, feedback and chart only.
    Scores,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentView {
    pub name: String,
    pub test_date: String,
    pub test_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallView {
    pub score: Score,
    pub control_value: i64,
    pub value_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillCard {
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub score: Score,
    pub score_text: String,
    pub progress_percent: f64,
    pub level: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlValues {
    pub pronunciation: i64,
    pub fluency: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackView {
    pub title: String,
    pub description: String,
    pub suggestions: Vec<String>,
    pub badge: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: &'static str,
    pub labels: [&'static str; 4],
    pub dataset_label: &'static str,
    pub data: [Score; 4],
    pub scale_min: i64,
    pub scale_max: i64,
    pub step: i64,
}

impl ChartSpec {
    pub fn radar(skills: &Skills) -> ChartSpec {
        ChartSpec {
            kind: "radar",
            labels: SKILL_LABELS,
            dataset_label: "Skill Scores",
            data: [
                skills.pronunciation.clone(),
                skills.fluency.clone(),
                skills.vocabulary.clone(),
                skills.grammar.clone(),
            ],
            scale_min: 0,
            scale_max: MAX_SCORE,
            step: 1,
        }
    }

    pub fn tooltip(&self, axis: usize) -> Option<String> {
        let label = self.labels.get(axis)?;
        let raw = self.data.get(axis)?;
        Some(format!("{label}: {raw}/{}", self.scale_max))
    }
}

/// Everything the effect layer needs to redraw, computed from one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub student: Option<StudentView>,
    pub overall: OverallView,
    pub skill_cards: Vec<SkillCard>,
    pub controls: ControlValues,
    pub feedback: FeedbackView,
    pub chart: ChartSpec,
    pub footer_date: Option<String>,
}

const SKILL_LABELS: [&str; 4] = ["Pronunciation", "Fluency", "Vocabulary", "Grammar"];

struct SkillMeta {
    name: &'static str,
    icon: &'static str,
    description: &'static str,
}

const SKILL_META: [SkillMeta; 4] = [
    SkillMeta {
        name: "Pronunciation",
        icon: "fas fa-volume-up",
        description: "Clarity and accuracy of speech sounds",
    },
    SkillMeta {
        name: "Fluency",
        icon: "fas fa-tachometer-alt",
        description: "Smoothness and flow of speech",
    },
    SkillMeta {
        name: "Vocabulary",
        icon: "fas fa-book",
        description: "Range and appropriateness of word choice",
    },
    SkillMeta {
        name: "Grammar",
        icon: "fas fa-code",
        description: "Accuracy of sentence structures",
    },
];

pub fn skill_cards(skills: &Skills) -> Vec<SkillCard> {
    let scores = [
        &skills.pronunciation,
        &skills.fluency,
        &skills.vocabulary,
        &skills.grammar,
    ];
    SKILL_META
        .iter()
        .zip(scores)
        .map(|(meta, score)| SkillCard {
            name: meta.name,
            icon: meta.icon,
            description: meta.description,
            score: score.clone(),
            score_text: format!("{score} / {MAX_SCORE}"),
            progress_percent: progress_percent(score),
            level: skill_level(score),
        })
        .collect()
}

pub fn build_plan(record: &Record, scope: Scope, today: NaiveDate) -> RenderPlan {
    let full = scope == Scope::Full;
    RenderPlan {
        student: full.then(|| StudentView {
            name: record.student.name.clone(),
            test_date: long_date(record.student.test_date),
            test_type: record.student.test_type.clone(),
        }),
        overall: OverallView {
            score: record.overall_score.clone(),
            control_value: Slider::from_score(&record.overall_score).value(),
            value_label: record.overall_score.to_string(),
        },
        skill_cards: skill_cards(&record.skills),
        controls: ControlValues {
            pronunciation: Slider::from_score(&record.skills.pronunciation).value(),
            fluency: Slider::from_score(&record.skills.fluency).value(),
        },
        feedback: FeedbackView {
            title: record.feedback.title.clone(),
            description: record.feedback.description.clone(),
            suggestions: record.feedback.suggestions.clone(),
            badge: badge(&record.overall_score),
        },
        chart: ChartSpec::radar(&record.skills),
        footer_date: full.then(|| long_date(today)),
    }
}
