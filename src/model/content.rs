/// The rendered report handed over by the dispatching side.
#[derive(Debug, Clone, Default)]
pub struct ReportContent {
    pub name: String,
    pub description: Option<String>,
    pub text: Option<String>, // set for error reports
    pub url: String,
    pub csv: Option<Vec<u8>>,
    pub screenshots: Option<Vec<Vec<u8>>>,
}

impl ReportContent {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_csv(mut self, csv: Vec<u8>) -> Self {
        self.csv = Some(csv);
        self
    }

    pub fn with_screenshots(mut self, screenshots: Vec<Vec<u8>>) -> Self {
        self.screenshots = Some(screenshots);
        self
    }

    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Error text, if this is an error report.
    pub fn error_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    /// Files to upload. A CSV wins over screenshots.
    pub fn attachments(&self) -> Vec<&[u8]> {
        if let Some(csv) = self.csv.as_deref().filter(|c| !c.is_empty()) {
            return vec![csv];
        }

        self.screenshots
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(Vec::as_slice)
            .collect()
    }
}
