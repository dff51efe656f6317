use crate::report::{Score, ScoreUpdate};

use super::plan::{RenderPlan, MAX_SCORE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlId {
    Overall,
    Pronunciation,
    Fluency,
}

impl ControlId {
    pub fn parse(name: &str) -> Option<ControlId> {
        match name.to_ascii_lowercase().as_str() {
            "overall" => Some(ControlId::Overall),
            "pronunciation" => Some(ControlId::Pronunciation),
            "fluency" => Some(ControlId::Fluency),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ControlId::Overall => "overall",
            ControlId::Pronunciation => "pronunciation",
            ControlId::Fluency => "fluency",
        }
    }
}

/// Integer range slider, 0..=9 step 1. Like a browser range input, values
/// outside the range are pulled to the nearest end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slider {
    value: i64,
}

impl Slider {
    pub const MIN: i64 = 0;
    pub const MAX: i64 = MAX_SCORE;

    pub fn new(value: i64) -> Slider {
        Slider {
            value: value.clamp(Self::MIN, Self::MAX),
        }
    }

    /// Sanitizes a stored score the way a range input does: no numeric
    /// reading gives the midpoint, then clamp, then round to the step with
    /// ties going up.
    pub fn from_score(score: &Score) -> Slider {
        let n = score.as_number();
        let n = if n.is_nan() {
            (Self::MIN + Self::MAX) as f64 / 2.0
        } else {
            n.clamp(Self::MIN as f64, Self::MAX as f64)
        };
        Slider::new((n + 0.5).floor() as i64)
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn label(&self) -> String {
        self.value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub overall: Slider,
    pub pronunciation: Slider,
    pub fluency: Slider,
}

impl Default for Controls {
    fn default() -> Self {
        Controls {
            overall: Slider::new(0),
            pronunciation: Slider::new(0),
            fluency: Slider::new(0),
        }
    }
}

impl Controls {
    pub fn slider(&self, id: ControlId) -> Slider {
        match id {
            ControlId::Overall => self.overall,
            ControlId::Pronunciation => self.pronunciation,
            ControlId::Fluency => self.fluency,
        }
    }

    /// Moves one slider and returns its new (clamped) value for the live label.
    pub fn set(&mut self, id: ControlId, value: i64) -> i64 {
        let slider = Slider::new(value);
        match id {
            ControlId::Overall => self.overall = slider,
            ControlId::Pronunciation => self.pronunciation = slider,
            ControlId::Fluency => self.fluency = slider,
        }
        slider.value()
    }

    pub fn sync(&mut self, plan: &RenderPlan) {
        self.overall = Slider::new(plan.overall.control_value);
        self.pronunciation = Slider::new(plan.controls.pronunciation);
        self.fluency = Slider::new(plan.controls.fluency);
    }

    /// Vocabulary and grammar have no control and are never sent.
    pub fn to_update(&self) -> ScoreUpdate {
        ScoreUpdate {
            overall: Some(Score::from(self.overall.value())),
            pronunciation: Some(Score::from(self.pronunciation.value())),
            fluency: Some(Score::from(self.fluency.value())),
            vocabulary: None,
            grammar: None,
        }
    }
}
