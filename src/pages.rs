//! Server-side HTML for the three pages.

use pulldown_cmark::{escape::escape_html, html, Parser};

use crate::about::AboutCards;
use crate::advisor::Recommendation;
use crate::types::PredictionForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Prediction,
    About,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Home, Page::Prediction, Page::About];

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Prediction => "Diabetes Prediction",
            Page::About => "About Us",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Prediction => "/predict",
            Page::About => "/about",
        }
    }
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    // Writing into a String never fails.
    let _ = escape_html(&mut out, s);
    out
}

pub fn markdown(md: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, Parser::new(md));
    out
}

const STYLE: &str = r#"<style>
  body { font-family: sans-serif; margin: 0; display: flex; }
  nav { width: 220px; padding: 16px; background: #f0f2f6; min-height: 100vh; }
  main { flex: 1; padding: 24px 48px; }
  .cols { display: flex; gap: 24px; }
  .cols > div { flex: 1; display: flex; flex-direction: column; gap: 8px; }
  .error { background: #ffe5e5; color: #8a1c1c; padding: 12px; border-radius: 6px; }
  .card {
    box-shadow: 0 4px 8px rgba(0,0,0,0.2);
    width: 80%; margin: 10px auto; border-radius:10px; text-align:center; padding:10px;
  }
  .card img { border-radius:50%; width:50%; margin:10px 0; }
  .container { padding:2px 16px; }
  .fa { font-size:20px; margin:0 10px; }
  .fa:hover { color:#1e90ff; }
  .team { display: flex; }
  .team > div { flex: 1; }
</style>
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/4.7.0/css/font-awesome.min.css">"#;

fn layout(current: Page, body: &str) -> String {
    let options: String = Page::ALL
        .iter()
        .map(|p| {
            let selected = if *p == current { " selected" } else { "" };
            format!(r#"<option value="{}"{selected}>{}</option>"#, p.path(), p.title())
        })
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Diabetes Prediction App</title>
<link rel="icon" href="data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>🩺</text></svg>">
{STYLE}
</head>
<body>
<nav>
  <label for="navigate">Navigate</label>
  <select id="navigate" onchange="window.location.href = this.value">
    {options}
  </select>
</nav>
<main>
{body}
</main>
</body>
</html>"#
    )
}

pub fn home() -> String {
    layout(
        Page::Home,
        r#"<h1>🏠 Welcome to the Diabetes Prediction App</h1>
<hr>
<h3>👨‍🔬 About the Project</h3>
<p>This application helps predict whether a person is diabetic or not using machine learning models.
Along with the prediction, it also provides:</p>
<ul>
  <li><b>Prediction Certainty</b>: Shows how confident the model is in its result.</li>
  <li><b>Target Weight Suggestion</b>: Recommends a target weight to help maintain a healthy BMI.</li>
</ul>
<hr>
<h3>📌 How to Use</h3>
<ul>
  <li>Go to the <b>Diabetes Prediction</b> page from the sidebar.</li>
  <li>Enter the required health details.</li>
  <li>Get an instant prediction with certainty level.</li>
  <li>Receive personalized BMI and weight suggestions for a healthier lifestyle.</li>
</ul>"#,
    )
}

/// Outcome of a form submission, if there was one.
pub enum Submission<'a> {
    None,
    Ok(&'a Recommendation),
    Err(String),
}

fn select(name: &str, label: &str, options: [&str; 2], current: &str) -> String {
    let opts: String = options
        .iter()
        .map(|o| {
            let selected = if *o == current.trim() { " selected" } else { "" };
            format!(r#"<option value="{o}"{selected}>{o}</option>"#)
        })
        .collect();
    format!(r#"<label for="{name}">{label}</label><select id="{name}" name="{name}">{opts}</select>"#)
}

/// Submitted text, or the widget's initial value when the field is blank.
fn value_or(raw: &str, initial: &str) -> String {
    match raw.trim() {
        "" => initial.to_string(),
        v => escape(v),
    }
}

/// Renders the form pre-filled from `form` (blank on first visit) and the
/// result of the submission below it.
pub fn prediction(form: &PredictionForm, submission: Submission<'_>) -> String {
    let fields = format!(
        r#"<form method="post" action="/predict">
<div class="cols">
  <div>
    {gender}
    <label for="age">Age</label><input id="age" name="age" type="number" min="1" step="1" value="{age}">
  </div>
  <div>
    {hypertension}
    {heart_disease}
  </div>
  <div>
    {smoking}
    <label for="height">Height (m)</label><input id="height" name="height" type="number" min="1.0" max="2.5" step="0.01" value="{height}">
    <label for="bmi">BMI</label><input id="bmi" name="bmi" type="number" min="10.0" max="60.0" step="0.1" value="{bmi}">
  </div>
</div>
<p><button type="submit">🔍 Predict</button></p>
</form>"#,
        gender = select("gender", "Gender", ["Male", "Female"], &form.gender),
        hypertension = select("hypertension", "Hypertension", ["No", "Yes"], &form.hypertension),
        heart_disease = select(
            "heart_disease",
            "Heart Disease",
            ["No", "Yes"],
            &form.heart_disease
        ),
        smoking = select("smoking", "Smoking History", ["No", "Yes"], &form.smoking),
        age = value_or(&form.age, "1"),
        height = value_or(&form.height, "1.00"),
        bmi = value_or(&form.bmi, "10.0"),
    );

    let result = match submission {
        Submission::None => String::new(),
        Submission::Ok(rec) => format!(
            "<h3 style='color:{};'>Prediction: {}</h3>\n<h3>📝 Recommendation:</h3>\n{}",
            rec.color_tag(),
            rec.label(),
            markdown(&rec.advice_text)
        ),
        Submission::Err(msg) => format!(
            r#"<div class="error">⚠️ An error occurred: {}</div>"#,
            escape(&msg)
        ),
    };

    layout(
        Page::Prediction,
        &format!("<h1>🩺 Diabetes Risk &amp; BMI Advisor</h1>\n<hr>\n{fields}\n{result}"),
    )
}

pub fn about(cards: &AboutCards) -> String {
    let team: String = cards
        .team
        .iter()
        .map(|c| format!("<div>{c}</div>"))
        .collect();
    layout(
        Page::About,
        &format!(
            r#"<h1>About Us</h1>
<h2>Project Guide</h2>
<div style="width: 50%; margin: 0 auto;">{guide}</div>
<h2>Our Team</h2>
<div class="team">{team}</div>"#,
            guide = cards.guide
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::{Outcome, Recommendation};

    #[test]
    fn escape_handles_markup() {
        assert_eq!(escape(r#"<a href="x">&"#), "&lt;a href=&quot;x&quot;&gt;&amp;");
    }

    #[test]
    fn markdown_renders_bold_and_bullets() {
        let html = markdown("You are **diabetic**.\n\n- Quit\n- Walk");
        assert!(html.contains("<strong>diabetic</strong>"));
        assert!(html.contains("<li>Quit</li>"));
    }

    #[test]
    fn nav_marks_current_page() {
        let page = home();
        assert!(page.contains(r#"<option value="/" selected>Home</option>"#));
        assert!(page.contains(r#"<option value="/about">About Us</option>"#));
    }

    #[test]
    fn result_heading_is_colored() {
        let rec = Recommendation {
            outcome: Outcome::Diabetic,
            certainty: 0.82,
            target_bmi: 25.0,
            target_weight_kg: 76.5625,
            advice_text: "You are likely **diabetic**.".into(),
        };
        let page = prediction(&PredictionForm::default(), Submission::Ok(&rec));
        assert!(page.contains("<h3 style='color:Red;'>Prediction: Diabetic</h3>"));
        assert!(page.contains("<strong>diabetic</strong>"));
    }

    #[test]
    fn errors_are_escaped() {
        let page = prediction(&PredictionForm::default(), Submission::Err("<script>".into()));
        assert!(page.contains("⚠️ An error occurred: &lt;script&gt;"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn form_has_widget_bounds() {
        let page = prediction(&PredictionForm::default(), Submission::None);
        assert!(page.contains(r#"min="1.0" max="2.5" step="0.01" value="1.00""#));
        assert!(page.contains(r#"step="1" value="1""#));
        assert!(page.contains(r#"min="10.0" max="60.0" step="0.1""#));
        assert!(page.contains("🔍 Predict"));
    }

    #[test]
    fn form_keeps_submitted_values() {
        let form = PredictionForm {
            gender: "Female".into(),
            age: "52".into(),
            hypertension: "Yes".into(),
            heart_disease: "No".into(),
            smoking: "Yes".into(),
            height: "1.68".into(),
            bmi: "31.4".into(),
        };
        let page = prediction(&form, Submission::Err("bad".into()));
        assert!(page.contains(r#"<option value="Female" selected>Female</option>"#));
        assert!(page.contains(r#"<option value="Male">Male</option>"#));
        assert!(page.contains(r#"step="1" value="52""#));
        assert!(page.contains(r#"step="0.01" value="1.68""#));
        assert!(page.contains(r#"step="0.1" value="31.4""#));
        assert_eq!(page.matches(r#"<option value="Yes" selected>"#).count(), 2);
    }

    #[test]
    fn submitted_values_are_escaped() {
        let form = PredictionForm {
            age: r#""><b>"#.into(),
            ..PredictionForm::default()
        };
        let page = prediction(&form, Submission::None);
        assert!(page.contains(r#"value="&quot;&gt;&lt;b&gt;""#));
    }
}
