// common/src/model/template_type.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of visual asset a template can produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateType {
    #[serde(rename = "case-study")]
    CaseStudy,
    #[serde(rename = "testimonial")]
    Testimonial,
    #[default]
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "video")]
    Video,
    #[serde(rename = "rating")]
    Rating,
    #[serde(rename = "rating-summary")]
    RatingSummary,
    #[serde(rename = "multiple-choice")]
    MultipleChoice,
    #[serde(rename = "multiple-choice-individual")]
    MultipleChoiceIndividual,
    #[serde(rename = "multiple-choice-text")]
    MultipleChoiceText,
    #[serde(rename = "google")]
    Google,
    #[serde(rename = "linkedin")]
    LinkedIn,
    #[serde(rename = "youtube")]
    YouTube,
    #[serde(rename = "banner")]
    Banner,
    #[serde(rename = "cover")]
    Cover,
    #[serde(rename = "metrics")]
    Metrics,
    #[serde(rename = "problem")]
    Problem,
    #[serde(rename = "solution")]
    Solution,
    #[serde(rename = "results")]
    Results,
    #[serde(rename = "conclusion")]
    Conclusion,
    #[serde(rename = "about")]
    About,
    #[serde(rename = "moments")]
    Moments,
}

impl TemplateType {
    pub const ALL: [TemplateType; 21] = [
        TemplateType::CaseStudy,
        TemplateType::Testimonial,
        TemplateType::Text,
        TemplateType::Video,
        TemplateType::Rating,
        TemplateType::RatingSummary,
        TemplateType::MultipleChoice,
        TemplateType::MultipleChoiceIndividual,
        TemplateType::MultipleChoiceText,
        TemplateType::Google,
        TemplateType::LinkedIn,
        TemplateType::YouTube,
        TemplateType::Banner,
        TemplateType::Cover,
        TemplateType::Metrics,
        TemplateType::Problem,
        TemplateType::Solution,
        TemplateType::Results,
        TemplateType::Conclusion,
        TemplateType::About,
        TemplateType::Moments,
    ];

    /// Wire value, as stored in the `type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::CaseStudy => "case-study",
            TemplateType::Testimonial => "testimonial",
            TemplateType::Text => "text",
            TemplateType::Video => "video",
            TemplateType::Rating => "rating",
            TemplateType::RatingSummary => "rating-summary",
            TemplateType::MultipleChoice => "multiple-choice",
            TemplateType::MultipleChoiceIndividual => "multiple-choice-individual",
            TemplateType::MultipleChoiceText => "multiple-choice-text",
            TemplateType::Google => "google",
            TemplateType::LinkedIn => "linkedin",
            TemplateType::YouTube => "youtube",
            TemplateType::Banner => "banner",
            TemplateType::Cover => "cover",
            TemplateType::Metrics => "metrics",
            TemplateType::Problem => "problem",
            TemplateType::Solution => "solution",
            TemplateType::Results => "results",
            TemplateType::Conclusion => "conclusion",
            TemplateType::About => "about",
            TemplateType::Moments => "moments",
        }
    }

    /// Human readable name shown in the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            TemplateType::CaseStudy => "Case Study",
            TemplateType::Testimonial => "Testimonial",
            TemplateType::Text => "Text",
            TemplateType::Video => "Video",
            TemplateType::Rating => "Rating",
            TemplateType::RatingSummary => "Rating Summary",
            TemplateType::MultipleChoice => "Multiple Choice",
            TemplateType::MultipleChoiceIndividual => "Multiple Choice Individual",
            TemplateType::MultipleChoiceText => "Multiple Choice Text",
            TemplateType::Google => "Google",
            TemplateType::LinkedIn => "LinkedIn",
            TemplateType::YouTube => "YouTube",
            TemplateType::Banner => "Banner",
            TemplateType::Cover => "Cover",
            TemplateType::Metrics => "Metrics",
            TemplateType::Problem => "Problem",
            TemplateType::Solution => "Solution",
            TemplateType::Results => "Results",
            TemplateType::Conclusion => "Conclusion",
            TemplateType::About => "About",
            TemplateType::Moments => "Moments",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown template type: {}", s))
    }
}
