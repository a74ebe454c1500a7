use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Model input order. The classifier was fitted on exactly these columns.
pub const FEATURE_NAMES: [&str; 6] = [
    "gender",
    "age",
    "hypertension",
    "heart_disease",
    "smoking_history",
    "bmi",
];

pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

pub const MIN_AGE: f64 = 1.0;
pub const MIN_HEIGHT_M: f64 = 1.0;
pub const MAX_HEIGHT_M: f64 = 2.5;
pub const MIN_BMI: f64 = 10.0;
pub const MAX_BMI: f64 = 60.0;

/// One submission of the prediction form, already typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub is_male: bool,
    pub age: f64,
    pub has_hypertension: bool,
    pub has_heart_disease: bool,
    pub smokes: bool,
    pub bmi: f64,
    pub height_m: f64,
}

impl PredictionRequest {
    /// Checks the same bounds the form widgets enforce.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.age.is_finite() || self.age < MIN_AGE || self.age.fract() != 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "age",
                constraint: "a whole number of years >= 1",
                value: self.age,
            });
        }
        if !self.height_m.is_finite() || !(MIN_HEIGHT_M..=MAX_HEIGHT_M).contains(&self.height_m) {
            return Err(ValidationError::OutOfRange {
                field: "height_m",
                constraint: "between 1.0 and 2.5 m",
                value: self.height_m,
            });
        }
        if !self.bmi.is_finite() || !(MIN_BMI..=MAX_BMI).contains(&self.bmi) {
            return Err(ValidationError::OutOfRange {
                field: "bmi",
                constraint: "between 10.0 and 60.0",
                value: self.bmi,
            });
        }
        Ok(())
    }

    /// Numeric encoding fed to the classifier, in [`FEATURE_NAMES`] order.
    /// Height is deliberately absent; it only feeds the weight arithmetic.
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [
            flag(self.is_male),
            self.age,
            flag(self.has_hypertension),
            flag(self.has_heart_disease),
            flag(self.smokes),
            self.bmi,
        ]
    }
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Raw HTML form body. Every field arrives as text so a bad value turns into
/// an inline message instead of a rejected request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionForm {
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub hypertension: String,
    #[serde(default)]
    pub heart_disease: String,
    #[serde(default)]
    pub smoking: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub bmi: String,
}

impl PredictionForm {
    pub fn parse(&self) -> Result<PredictionRequest, ValidationError> {
        let req = PredictionRequest {
            is_male: choice(&self.gender, "gender", ("Male", "Female"), "Male/Female")?,
            age: number(&self.age, "age")?,
            has_hypertension: choice(&self.hypertension, "hypertension", ("Yes", "No"), "Yes/No")?,
            has_heart_disease: choice(&self.heart_disease, "heart_disease", ("Yes", "No"), "Yes/No")?,
            smokes: choice(&self.smoking, "smoking", ("Yes", "No"), "Yes/No")?,
            bmi: number(&self.bmi, "bmi")?,
            height_m: number(&self.height, "height")?,
        };
        req.validate()?;
        Ok(req)
    }
}

/// The option pair is `(true, false)`; `allowed` is what the error message lists.
fn choice(
    raw: &str,
    field: &'static str,
    (truthy, falsy): (&str, &str),
    allowed: &'static str,
) -> Result<bool, ValidationError> {
    match raw.trim() {
        s if s == truthy => Ok(true),
        s if s == falsy => Ok(false),
        _ => Err(ValidationError::UnknownChoice {
            field,
            allowed,
            raw: raw.to_string(),
        }),
    }
}

fn number(raw: &str, field: &'static str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::NotANumber {
            field,
            raw: raw.to_string(),
        })
}

/// JSON answer of `/api/predict`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictionOut {
    pub label: String,
    pub color: String,
    pub is_diabetic: bool,
    pub certainty: f64,
    pub target_bmi: f64,
    pub target_weight_kg: f64,
    pub advice: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> PredictionForm {
        PredictionForm {
            gender: "Male".into(),
            age: "45".into(),
            hypertension: "Yes".into(),
            heart_disease: "No".into(),
            smoking: "Yes".into(),
            height: "1.75".into(),
            bmi: "28.0".into(),
        }
    }

    #[test]
    fn form_encodes_features_in_model_order() {
        let req = form().parse().unwrap();
        assert_eq!(req.features(), [1.0, 45.0, 1.0, 0.0, 1.0, 28.0]);
        assert_eq!(req.height_m, 1.75);
        assert!(req.smokes);
    }

    #[test]
    fn female_non_smoker_encodes_zeros() {
        let mut f = form();
        f.gender = "Female".into();
        f.hypertension = "No".into();
        f.smoking = "No".into();
        let req = f.parse().unwrap();
        assert_eq!(req.features(), [0.0, 45.0, 0.0, 0.0, 0.0, 28.0]);
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let mut f = form();
        f.height = "2.6".into();
        assert!(matches!(
            f.parse(),
            Err(ValidationError::OutOfRange { field: "height_m", .. })
        ));

        let mut f = form();
        f.bmi = "9.9".into();
        assert!(matches!(
            f.parse(),
            Err(ValidationError::OutOfRange { field: "bmi", .. })
        ));

        let mut f = form();
        f.age = "0".into();
        assert!(matches!(
            f.parse(),
            Err(ValidationError::OutOfRange { field: "age", .. })
        ));
    }

    #[test]
    fn boundaries_are_inclusive() {
        let mut f = form();
        f.height = "1.0".into();
        f.bmi = "60.0".into();
        f.age = "1".into();
        assert!(f.parse().is_ok());
        f.height = "2.5".into();
        f.bmi = "10.0".into();
        assert!(f.parse().is_ok());
    }

    #[test]
    fn rejects_garbage() {
        let mut f = form();
        f.age = "forty".into();
        assert!(matches!(f.parse(), Err(ValidationError::NotANumber { field: "age", .. })));

        let mut f = form();
        f.bmi = "NaN".into();
        assert!(matches!(f.parse(), Err(ValidationError::NotANumber { field: "bmi", .. })));

        let mut f = form();
        f.gender = "Other".into();
        assert!(matches!(
            f.parse(),
            Err(ValidationError::UnknownChoice { field: "gender", .. })
        ));
    }

    #[test]
    fn unknown_choice_names_the_allowed_values() {
        let mut f = form();
        f.gender = "Other".into();
        assert_eq!(
            f.parse().unwrap_err().to_string(),
            r#"gender must be one of Male/Female (got "Other")"#
        );

        let mut f = form();
        f.smoking = "Sometimes".into();
        assert_eq!(
            f.parse(),
            Err(ValidationError::UnknownChoice {
                field: "smoking",
                allowed: "Yes/No",
                raw: "Sometimes".into(),
            })
        );
    }

    #[test]
    fn fractional_age_is_rejected() {
        let mut f = form();
        f.age = "45.5".into();
        assert!(f.parse().is_err());
    }
}
