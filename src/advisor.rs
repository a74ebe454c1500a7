//! Turns one classifier answer into a label, a target weight and advice text.

use serde::Serialize;

use crate::error::{AdvisorError, InferenceError};
use crate::model::Classifier;
use crate::types::{PredictionOut, PredictionRequest};

/// BMI ceiling to stay under when the model says non-diabetic.
pub const MAX_SAFE_BMI: f64 = 24.9;
/// BMI threshold quoted to someone predicted diabetic.
pub const MIN_RISKY_BMI: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    NonDiabetic,
    Diabetic,
}

impl Outcome {
    fn from_class(class: i64) -> Result<Self, InferenceError> {
        match class {
            0 => Ok(Outcome::NonDiabetic),
            1 => Ok(Outcome::Diabetic),
            other => Err(InferenceError::UnknownClass(other)),
        }
    }

    pub fn label(self) -> &'static str {
        self.template().label
    }

    pub fn color_tag(self) -> &'static str {
        self.template().color
    }

    pub fn target_bmi(self) -> f64 {
        self.template().target_bmi
    }

    fn template(self) -> &'static AdviceTemplate {
        match self {
            Outcome::NonDiabetic => &TEMPLATES[0],
            Outcome::Diabetic => &TEMPLATES[1],
        }
    }
}

struct AdviceTemplate {
    label: &'static str,
    color: &'static str,
    verdict: &'static str,
    target_bmi: f64,
    weight_line: fn(f64) -> String,
    smoking_clause: &'static str,
}

const TEMPLATES: [AdviceTemplate; 2] = [
    AdviceTemplate {
        label: "Non-Diabetic",
        color: "Green",
        verdict: "non-diabetic",
        target_bmi: MAX_SAFE_BMI,
        weight_line: keep_below,
        smoking_clause: "- **Consider quitting smoking** for better health.",
    },
    AdviceTemplate {
        label: "Diabetic",
        color: "Red",
        verdict: "diabetic",
        target_bmi: MIN_RISKY_BMI,
        weight_line: stay_under,
        smoking_clause: "- **Quit smoking** to reduce health complications.",
    },
];

fn keep_below(weight_kg: f64) -> String {
    format!("- Keep weight below **{:.2} kg**.", weight_kg)
}

fn stay_under(weight_kg: f64) -> String {
    format!(
        "- Recommended weight: **< {:.2} kg** (BMI < {:.1})",
        weight_kg, MIN_RISKY_BMI
    )
}

/// Everything the result page and the JSON endpoint show for one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub outcome: Outcome,
    pub certainty: f64,
    pub target_bmi: f64,
    pub target_weight_kg: f64,
    /// Markdown.
    pub advice_text: String,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        self.outcome.label()
    }

    pub fn color_tag(&self) -> &'static str {
        self.outcome.color_tag()
    }

    pub fn is_diabetic(&self) -> bool {
        self.outcome == Outcome::Diabetic
    }

    pub fn to_out(&self) -> PredictionOut {
        PredictionOut {
            label: self.label().to_string(),
            color: self.color_tag().to_string(),
            is_diabetic: self.is_diabetic(),
            certainty: self.certainty,
            target_bmi: self.target_bmi,
            target_weight_kg: self.target_weight_kg,
            advice: self.advice_text.clone(),
        }
    }
}

/// Weight at which a person of `height_m` sits exactly on `bmi`.
pub fn target_weight_kg(bmi: f64, height_m: f64) -> f64 {
    bmi * height_m.powi(2)
}

/// Asks `model` for a label and a probability, then builds the advice.
///
/// `features` goes to the model untouched; `height_m` and `smokes` only shape
/// the recommendation.
pub fn predict_and_recommend(
    model: &dyn Classifier,
    features: &[f64],
    height_m: f64,
    smokes: bool,
) -> Result<Recommendation, AdvisorError> {
    let [_, p_positive] = model.predict_probability(features)?;
    if !p_positive.is_finite() || !(0.0..=1.0).contains(&p_positive) {
        return Err(InferenceError::InvalidProbability(p_positive).into());
    }
    let outcome = Outcome::from_class(model.predict(features)?)?;

    let certainty = match outcome {
        Outcome::Diabetic => p_positive,
        Outcome::NonDiabetic => 1.0 - p_positive,
    };
    let tpl = outcome.template();
    let target_weight_kg = target_weight_kg(tpl.target_bmi, height_m);

    let mut advice_text = format!(
        "You are likely **{}** with **{:.2}%** certainty.\n\n{}",
        tpl.verdict,
        certainty * 100.0,
        (tpl.weight_line)(target_weight_kg),
    );
    if smokes {
        advice_text.push('\n');
        advice_text.push_str(tpl.smoking_clause);
    }

    Ok(Recommendation {
        outcome,
        certainty,
        target_bmi: tpl.target_bmi,
        target_weight_kg,
        advice_text,
    })
}

/// Validates a typed request and runs [`predict_and_recommend`] on it.
pub fn recommend(
    model: &dyn Classifier,
    req: &PredictionRequest,
) -> Result<Recommendation, AdvisorError> {
    req.validate()?;
    let rec = predict_and_recommend(model, &req.features(), req.height_m, req.smokes)?;
    tracing::info!(
        label = rec.label(),
        certainty = rec.certainty,
        target_weight_kg = rec.target_weight_kg,
        "prediction"
    );
    tracing::debug!(features = ?req.features(), height_m = req.height_m, "prediction input");
    Ok(rec)
}
