//! Extraction instruction sent with every flyer.

use chrono::{Datelike, Utc};

/// Keys the model must return in its JSON object.
pub const REQUIRED_KEYS: [&str; 5] = ["event_name", "venue", "date", "time", "vibe"];

/// Natural-language directive plus the explicit list of required keys.
///
/// The directive can be replaced through configuration; the key list and the
/// JSON template are always appended so the normalizer's expectations hold.
/// The default directive names the current year, read on every render.
#[derive(Debug, Clone)]
pub struct ExtractionPrompt {
    directive: Option<String>,
}

impl ExtractionPrompt {
    /// Builds the prompt, using the default directive when `directive` is
    /// `None`.
    #[must_use]
    pub fn new(directive: Option<String>) -> Self {
        Self { directive }
    }

    /// The full text sent to the model.
    #[must_use]
    pub fn render(&self) -> String {
        self.render_for_year(Utc::now().year())
    }

    fn render_for_year(&self, year: i32) -> String {
        let directive = match &self.directive {
            Some(custom) => custom.trim_end().to_string(),
            None => default_directive(year),
        };
        format!(
            "{}\n\nReturn exactly one JSON object with these keys: {}.\n\n{}",
            directive,
            REQUIRED_KEYS.join(", "),
            TEMPLATE,
        )
    }
}

const TEMPLATE: &str = r#"{
  "event_name": "Name of the event",
  "venue": "Location name",
  "date": "YYYY-MM-DD",
  "time": "Start time",
  "vibe": ["three", "short", "tags"]
}"#;

fn default_directive(year: i32) -> String {
    format!(
        "Extract the event details from this flyer.\n\
         RULES:\n\
         1. If the year is missing, use {year}. Never output a literal \"YYYY\".\n\
         2. Format the date strictly as YYYY-MM-DD.\n\
         3. Describe the vibe with at most three short words.\n\
         4. Output JSON only, with no commentary or markdown."
    )
}
