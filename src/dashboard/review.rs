/// Prescription review and medicine recommendation.
///
/// Both are the same workflow over a different endpoint: validate the text
/// box, show a working message, call the backend, show and retain the
/// result, and enable the download control when the result is non-empty.
/// Medicine results can then be turned into a PDF report.
use super::Dashboard;
use super::request::{Generation, Ticket};
use crate::api::{ApiResult, Backend};

pub const ENTER_PRESCRIPTION: &str = "Please enter prescription details.";
pub const ANALYZING: &str = "Analyzing interactions and safety protocols...";
pub const ANALYSIS_FAILED: &str = "Analysis failed.";

pub const ENTER_CONDITION: &str = "Enter a condition.";
pub const CONSULTING: &str = "Consulting AI...";
pub const RECOMMENDATION_FAILED: &str = "Failed to get recommendations.";

pub const NOTHING_TO_DOWNLOAD: &str = "No recommendation to download.";
pub const PDF_FAILED: &str = "Failed to generate PDF";

/// State of one review form.
#[derive(Debug, Clone, Default)]
pub struct ReviewPanel {
    /// Contents of the text box.
    pub input: String,
    /// Text shown in the result box.
    pub output: String,
    /// Last successful result, kept for the PDF download.
    pub retained: String,
    pub download_enabled: bool,
    generation: Generation,
}

/// An outstanding review request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTicket {
    ticket: Ticket,
    pub text: String,
}

/// The fixed strings that distinguish the two workflows.
struct ReviewCopy {
    empty_alert: &'static str,
    working: &'static str,
    failed: &'static str,
    operation: &'static str,
}

const PRESCRIPTION: ReviewCopy = ReviewCopy {
    empty_alert: ENTER_PRESCRIPTION,
    working: ANALYZING,
    failed: ANALYSIS_FAILED,
    operation: "analyze_prescription",
};

const MEDICINE: ReviewCopy = ReviewCopy {
    empty_alert: ENTER_CONDITION,
    working: CONSULTING,
    failed: RECOMMENDATION_FAILED,
    operation: "get_medicine_recommendations",
};

impl ReviewPanel {
    /// Validate and move to the working state. Returns the alert to raise
    /// when the input is blank.
    fn begin(&mut self, copy: &ReviewCopy) -> Result<ReviewTicket, &'static str> {
        if self.input.trim().is_empty() {
            return Err(copy.empty_alert);
        }
        self.output = copy.working.to_string();
        self.download_enabled = false;
        Ok(ReviewTicket {
            ticket: self.generation.issue(),
            text: self.input.clone(),
        })
    }

    /// Apply a result. Stale tickets are ignored; returns whether it applied.
    fn complete(&mut self, copy: &ReviewCopy, ticket: &ReviewTicket, result: &ApiResult<String>) -> bool {
        if !self.generation.is_current(ticket.ticket) {
            return false;
        }
        match result {
            Ok(text) => {
                self.retained = text.clone();
                self.output = text.clone();
                self.download_enabled = !text.is_empty();
            }
            Err(_) => {
                self.output = copy.failed.to_string();
            }
        }
        true
    }
}

impl<B: Backend> Dashboard<B> {
    pub fn set_prescription_text(&mut self, text: impl Into<String>) {
        self.state.prescription.input = text.into();
    }

    pub fn set_condition(&mut self, text: impl Into<String>) {
        self.state.medicine.input = text.into();
    }

    /// Send the prescription text for an interaction/safety review.
    pub fn analyze_prescription(&mut self) {
        let ticket = match self.state.prescription.begin(&PRESCRIPTION) {
            Ok(ticket) => ticket,
            Err(alert) => return self.alert(alert),
        };
        let result = self.backend.review_prescription(&ticket.text);
        if let Err(err) = &result {
            self.log_failure(PRESCRIPTION.operation, err);
        }
        self.state.prescription.complete(&PRESCRIPTION, &ticket, &result);
    }

    /// Ask the AI for medicines suited to the entered condition.
    pub fn get_medicine_recommendations(&mut self) {
        let Some(ticket) = self.begin_recommendation() else {
            return;
        };
        let result = self.backend.recommend_medicine(&ticket.text);
        self.complete_recommendation(&ticket, result);
    }

    /// First half of [`get_medicine_recommendations`](Self::get_medicine_recommendations).
    /// Blank input raises an alert and returns `None`.
    pub fn begin_recommendation(&mut self) -> Option<ReviewTicket> {
        match self.state.medicine.begin(&MEDICINE) {
            Ok(ticket) => Some(ticket),
            Err(alert) => {
                self.alert(alert);
                None
            }
        }
    }

    /// Second half of [`get_medicine_recommendations`](Self::get_medicine_recommendations).
    /// Only the most recently started request may update the panel.
    pub fn complete_recommendation(&mut self, ticket: &ReviewTicket, result: ApiResult<String>) -> bool {
        if let Err(err) = &result {
            self.log_failure(MEDICINE.operation, err);
        }
        self.state.medicine.complete(&MEDICINE, ticket, &result)
    }

    /// Generate a PDF of the retained recommendation and open it.
    ///
    /// Uses the condition currently in the text box. Requires a prior
    /// successful recommendation.
    pub fn download_medicine_pdf(&mut self) {
        if self.state.medicine.retained.is_empty() {
            return self.alert(NOTHING_TO_DOWNLOAD);
        }

        let condition = self.state.medicine.input.clone();
        let recommendation = self.state.medicine.retained.clone();

        match self.backend.generate_medicine_pdf(&condition, &recommendation) {
            Ok(reply) => match reply.pdf_url.filter(|url| !url.is_empty()) {
                Some(url) => {
                    let url = self.backend.resolve_url(&url);
                    self.state.opened.push(url);
                }
                None => self.alert(PDF_FAILED),
            },
            Err(err) => {
                self.log_failure("download_medicine_pdf", &err);
                self.alert(PDF_FAILED);
            }
        }
    }
}
