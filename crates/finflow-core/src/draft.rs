//! Three-step create-bill / create-invoice wizard
//!
//! Step 1 picks the party, step 2 edits line items, step 3 sets date and
//! terms. A step only advances when it validates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::ledger::{summarize, FieldErrors, LineItems};
use crate::models::{NewFinanceDocument, Party};
use crate::types::DocumentKind;

pub const FIRST_STEP: u8 = 1;
pub const LAST_STEP: u8 = 3;
pub const DEFAULT_TERMS: &str = "Net 30";

/// Payment terms offered in the wizard
pub const TERMS_OPTIONS: &[&str] = &["Due on receipt", "Net 15", "Net 30", "Net 60"];

pub fn is_known_terms(terms: &str) -> bool {
    TERMS_OPTIONS.contains(&terms)
}

/// Days until due for a terms string: "Net 45" is 45, anything unrecognised is 0
pub fn terms_days(terms: &str) -> i64 {
    terms
        .trim()
        .strip_prefix("Net")
        .and_then(|rest| rest.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceDraft {
    pub kind: DocumentKind,
    pub step: u8,
    pub search_term: String,
    pub selected_party: Option<Party>,
    pub items: LineItems,
    pub terms: String,
    /// Due date for bills, issue date for invoices; `None` when cleared
    pub date: Option<NaiveDate>,
    pub errors: FieldErrors,
}

impl FinanceDraft {
    pub fn new(kind: DocumentKind, today: NaiveDate) -> Self {
        Self {
            kind,
            step: FIRST_STEP,
            search_term: String::new(),
            selected_party: None,
            items: LineItems::new(),
            terms: DEFAULT_TERMS.to_string(),
            date: Some(today),
            errors: FieldErrors::new(),
        }
    }

    /// Parties matching the search term by name or email
    pub fn filtered_parties<'a>(&self, parties: &'a [Party]) -> Vec<&'a Party> {
        parties
            .iter()
            .filter(|party| party.matches_search(&self.search_term))
            .collect()
    }

    pub fn select_party(&mut self, party: Party) {
        self.selected_party = Some(party);
        self.errors.remove("party");
    }

    /// Errors for one step, without touching `self.errors`
    pub fn step_errors(&self, step: u8) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match step {
            1 => {
                if self.selected_party.is_none() {
                    errors.insert(
                        "party".to_string(),
                        format!("Please select a {}", self.kind.party_label()),
                    );
                }
            }
            2 => errors = self.items.validate(),
            3 => {
                if self.date.is_none() {
                    errors.insert("date".to_string(), "Date is required".to_string());
                }
                if self.terms.trim().is_empty() {
                    errors.insert("terms".to_string(), "Payment terms are required".to_string());
                } else if !is_known_terms(&self.terms) {
                    errors.insert("terms".to_string(), "Choose one of the listed payment terms".to_string());
                }
            }
            _ => {}
        }
        errors
    }

    /// Validate `step` and record the errors; true when clean
    pub fn validate_step(&mut self, step: u8) -> bool {
        self.errors = self.step_errors(step);
        self.errors.is_empty()
    }

    /// Advance when the current step validates
    pub fn next(&mut self) -> bool {
        if self.step < LAST_STEP && self.validate_step(self.step) {
            self.step += 1;
            true
        } else {
            false
        }
    }

    pub fn back(&mut self) {
        if self.step > FIRST_STEP {
            self.step -= 1;
        }
        self.errors.clear();
    }

    /// Build the document from the last step; every step must validate.
    /// A failing step becomes the current one with its errors recorded.
    pub fn submit(&mut self, is_draft: bool) -> CoreResult<NewFinanceDocument> {
        if self.step != LAST_STEP {
            return Err(CoreError::ValidationError {
                message: format!("Finish step {} of {} before submitting", self.step, LAST_STEP),
            });
        }
        for step in FIRST_STEP..=LAST_STEP {
            if !self.validate_step(step) {
                self.step = step;
                return Err(CoreError::ValidationError {
                    message: summarize(&self.errors),
                });
            }
        }
        let party = self.selected_party.as_ref().ok_or_else(|| CoreError::ValidationError {
            message: format!("Please select a {}", self.kind.party_label()),
        })?;
        let date = self.date.ok_or_else(|| CoreError::ValidationError {
            message: "Date is required".to_string(),
        })?;

        Ok(NewFinanceDocument {
            kind: self.kind,
            party_id: party.id.clone(),
            items: self.items.items().to_vec(),
            terms: self.terms.clone(),
            date,
            is_draft,
        })
    }
}
