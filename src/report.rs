use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const UPDATE_MESSAGE: &str = "Scores updated successfully";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub name: String,
    pub test_date: NaiveDate,
    pub test_type: String,
}

/// A score as it arrived on the wire. Usually an integer from 0 to 9, but
/// nothing is enforced: any JSON value is stored and served back unchanged.
/// Comparisons coerce it to a number first, so `"8"` ranks like `8` and a
/// value with no numeric reading ranks below every band threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(pub Value);

impl Score {
    /// Numeric reading used for every comparison. `NaN` when there is none.
    pub fn as_number(&self) -> f64 {
        match &self.0 {
            Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
            Value::String(s) => {
                let t = s.trim();
                if t.is_empty() {
                    0.0
                } else {
                    t.parse::<f64>()
                        .ok()
                        .filter(|v| !v.is_nan())
                        .unwrap_or(f64::NAN)
                }
            }
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Null => 0.0,
            Value::Array(_) | Value::Object(_) => f64::NAN,
        }
    }

    /// Leading integer of the displayed text (`"7.5"` gives 7, `"abc"` none).
    pub fn leading_integer(&self) -> Option<i64> {
        let text = self.to_string();
        let t = text.trim_start();
        let (sign, digits) = match t.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, t.strip_prefix('+').unwrap_or(t)),
        };
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        digits[..end].parse::<i64>().ok().map(|v| sign * v)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            Value::Number(n) => match n.as_f64() {
                Some(v) if n.is_f64() && v.is_finite() && v.fract() == 0.0 => {
                    write!(f, "{v:.0}")
                }
                _ => write!(f, "{n}"),
            },
            other => write!(f, "{other}"),
        }
    }
}

impl From<i64> for Score {
    fn from(v: i64) -> Self {
        Score(Value::from(v))
    }
}

macro_rules! score_eq_int {
    ($($t:ty),*) => {
        $(impl PartialEq<$t> for Score {
            fn eq(&self, other: &$t) -> bool {
                self.0.as_i64() == Some(i64::from(*other))
            }
        })*
    };
}

score_eq_int!(i32, i64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    pub pronunciation: Score,
    pub fluency: Score,
    pub vocabulary: Score,
    pub grammar: Score,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub title: String,
    pub description: String,
    pub suggestions: Vec<String>,
}

/// The single assessment record. `feedback` is derived from `overall_score`
/// and is only ever written through [`Record::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub student: Student,
    pub overall_score: Score,
    pub skills: Skills,
    pub feedback: Feedback,
}

/// Partial score update. `null` and a missing key both mean "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall: Option<Score>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<Score>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluency: Option<Score>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<Score>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar: Option<Score>,
}

impl ScoreUpdate {
    /// Names of the fields this update carries, in wire order.
    pub fn fields(&self) -> Vec<&'static str> {
        [
            ("overall", &self.overall),
            ("pronunciation", &self.pronunciation),
            ("fluency", &self.fluency),
            ("vocabulary", &self.vocabulary),
            ("grammar", &self.grammar),
        ]
        .into_iter()
        .filter_map(|(name, v)| v.as_ref().map(|_| name))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub message: String,
    pub data: Record,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Excellent,
    Good,
    NeedsImprovement,
}

impl Band {
    /// No clamping: anything from 8 up is Excellent. Good is the closed range
    /// 6..=7, so 7.5 and values with no numeric reading are Needs Improvement.
    pub fn for_score(score: &Score) -> Band {
        let n = score.as_number();
        if n >= 8.0 {
            Band::Excellent
        } else if (6.0..=7.0).contains(&n) {
            Band::Good
        } else {
            Band::NeedsImprovement
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Band::Excellent => "Excellent Performance",
            Band::Good => "Good Performance",
            Band::NeedsImprovement => "Needs Improvement",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Band::Excellent => "Strong control of language features. Speaks fluently with only rare repetition or self-correction.",
            Band::Good => "Generally effective command of the language despite some inaccuracies. Can handle complex situations fairly well.",
            Band::NeedsImprovement => "Basic competence is limited. Frequent problems with understanding and making meaning clear.",
        }
    }

    pub fn suggestions(self) -> &'static [&'static str] {
        match self {
            Band::Excellent => &[
                "Continue practicing advanced vocabulary",
                "Focus on accent reduction for native-like speech",
            ],
            Band::Good => &[
                "Work on grammatical accuracy",
                "Practice speaking on unfamiliar topics",
            ],
            Band::NeedsImprovement => &[
                "Focus on basic sentence structures",
                "Build essential vocabulary",
                "Practice pronunciation daily",
            ],
        }
    }
}

pub fn classify(score: &Score) -> Feedback {
    let band = Band::for_score(score);
    Feedback {
        title: band.title().to_string(),
        description: band.description().to_string(),
        suggestions: band.suggestions().iter().map(|s| s.to_string()).collect(),
    }
}

impl Record {
    /// Overwrites the fields present in `update`, then recomputes feedback from
    /// the stored overall score whether or not `overall` was part of it.
    pub fn apply(&mut self, update: &ScoreUpdate) {
        if let Some(v) = &update.overall {
            self.overall_score = v.clone();
        }
        if let Some(v) = &update.pronunciation {
            self.skills.pronunciation = v.clone();
        }
        if let Some(v) = &update.fluency {
            self.skills.fluency = v.clone();
        }
        if let Some(v) = &update.vocabulary {
            self.skills.vocabulary = v.clone();
        }
        if let Some(v) = &update.grammar {
            self.skills.grammar = v.clone();
        }
        self.feedback = classify(&self.overall_score);
    }

    pub fn feedback_is_current(&self) -> bool {
        self.feedback == classify(&self.overall_score)
    }
}
