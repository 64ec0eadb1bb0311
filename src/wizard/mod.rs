//! The multi-step style form.
//!
//! A [`Wizard`] walks a client through logo, palette and typography choices,
//! then a review step. Advancing from the review step submits the
//! selections exactly once through a [`SubmissionGateway`]; the gateway, not
//! the wizard, decides who wins when two sessions submit for the same client.
//!
//! ```text
//! LogoSelection -> PaletteSelection -> TypographySelection -> Review -> Submitted
//! ```

use std::fmt;

use crate::gateway::{CatalogProvider, GatewayError, SubmissionGateway};
use crate::models::{
    Catalog, ClientStatus, Palette, ResolvedLogoChoice, StyleResponse, StyleSelections,
    TypographyStyle,
};

/// Number of steps shown to the client; `Submitted` is not one of them.
const VISIBLE_STEPS: usize = 4;

/// A position in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    LogoSelection,
    PaletteSelection,
    TypographySelection,
    Review,
    Submitted,
}

impl Step {
    pub fn index(self) -> usize {
        match self {
            Step::LogoSelection => 0,
            Step::PaletteSelection => 1,
            Step::TypographySelection => 2,
            Step::Review => 3,
            Step::Submitted => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::LogoSelection => "Logo styles",
            Step::PaletteSelection => "Colors",
            Step::TypographySelection => "Typography",
            Step::Review => "Review",
            Step::Submitted => "Done",
        }
    }

    fn next(self) -> Option<Step> {
        match self {
            Step::LogoSelection => Some(Step::PaletteSelection),
            Step::PaletteSelection => Some(Step::TypographySelection),
            Step::TypographySelection => Some(Step::Review),
            Step::Review => Some(Step::Submitted),
            Step::Submitted => None,
        }
    }

    fn previous(self) -> Option<Step> {
        match self {
            Step::LogoSelection | Step::Submitted => None,
            Step::PaletteSelection => Some(Step::LogoSelection),
            Step::TypographySelection => Some(Step::PaletteSelection),
            Step::Review => Some(Step::TypographySelection),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A selection is missing or does not exist in the catalog.
///
/// Recovered locally: the wizard stays on its step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("logo option required for category {0}")]
    LogoOptionRequired(String),
    #[error("palette required")]
    PaletteRequired,
    #[error("typography required")]
    TypographyRequired,
    #[error("unknown logo category {0}")]
    UnknownCategory(String),
    #[error("option {option_id} does not belong to category {category_id}")]
    UnknownOption {
        category_id: String,
        option_id: String,
    },
    #[error("unknown palette {0}")]
    UnknownPalette(String),
    #[error("unknown typography style {0}")]
    UnknownTypography(String),
    /// The server refused the submitted payload.
    #[error("submission rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("this form has already been answered")]
    AlreadyCompleted,
    #[error("this form link is invalid or has expired")]
    ClientNotFound,
    #[error("could not reach the server: {0}")]
    Transport(String),
    #[error("already at the first step")]
    NoPreviousStep,
    #[error("the form can no longer be changed")]
    ReadOnly,
}

impl From<GatewayError> for WizardError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::AlreadyCompleted => WizardError::AlreadyCompleted,
            GatewayError::ClientNotFound => WizardError::ClientNotFound,
            GatewayError::Rejected(msg) => ValidationError::Rejected(msg).into(),
            GatewayError::Transport(msg) => WizardError::Transport(msg),
        }
    }
}

/// How a read-only wizard ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// This session's answers were recorded.
    Submitted,
    /// Someone (possibly another tab) answered first.
    AlreadyAnswered,
    /// The link does not point at a client.
    NotFound,
}

/// The chosen ids resolved against the catalog, for the review step.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSummary {
    pub logo_choices: Vec<ResolvedLogoChoice>,
    pub palette: Option<Palette>,
    pub typography: Option<TypographyStyle>,
}

/// In-memory state of one client's pass through the form.
#[derive(Debug, Clone)]
pub struct Wizard {
    client_id: String,
    catalog: Catalog,
    step: Step,
    selections: StyleSelections,
    outcome: Option<Outcome>,
    response: Option<StyleResponse>,
    /// Selections of a submission that failed in transit; it may have been
    /// recorded anyway.
    unconfirmed_submit: Option<StyleSelections>,
}

impl Wizard {
    /// Start a fresh wizard. The catalog is assumed stable for the session.
    pub fn new(client_id: impl Into<String>, catalog: Catalog) -> Self {
        Self {
            client_id: client_id.into(),
            catalog,
            step: Step::LogoSelection,
            selections: StyleSelections::default(),
            outcome: None,
            response: None,
            unconfirmed_submit: None,
        }
    }

    /// Load the client and catalog behind a form link.
    ///
    /// A client who already answered yields a read-only wizard with
    /// [`Outcome::AlreadyAnswered`]; an unknown client is an error.
    pub async fn open<G>(client_id: &str, gateway: &G) -> Result<Self, WizardError>
    where
        G: SubmissionGateway + CatalogProvider,
    {
        let client = gateway.fetch_client(client_id).await?;
        let catalog = gateway.fetch_catalog().await?;

        let mut wizard = Wizard::new(client_id, catalog);
        if client.status == ClientStatus::Completed {
            wizard.outcome = Some(Outcome::AlreadyAnswered);
        }
        Ok(wizard)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn step_index(&self) -> usize {
        self.step.index()
    }

    /// Share of the visible steps reached, 25..=100.
    pub fn progress_percent(&self) -> u8 {
        let reached = (self.step.index() + 1).min(VISIBLE_STEPS);
        (reached * 100 / VISIBLE_STEPS) as u8
    }

    pub fn selections(&self) -> &StyleSelections {
        &self.selections
    }

    /// The recorded response once this session's submission succeeded.
    pub fn response(&self) -> Option<&StyleResponse> {
        self.response.as_ref()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Once an outcome is known no mutation is accepted.
    pub fn is_read_only(&self) -> bool {
        self.outcome.is_some()
    }

    /// Choose an option for a logo category, replacing any earlier choice.
    pub fn select_logo_option(
        &mut self,
        category_id: &str,
        option_id: &str,
    ) -> Result<(), WizardError> {
        self.ensure_mutable()?;

        let category = self
            .catalog
            .category(category_id)
            .ok_or_else(|| ValidationError::UnknownCategory(category_id.to_string()))?;
        if category.option(option_id).is_none() {
            return Err(ValidationError::UnknownOption {
                category_id: category_id.to_string(),
                option_id: option_id.to_string(),
            }
            .into());
        }

        self.selections
            .selected_logo_options
            .insert(category_id.to_string(), option_id.to_string());
        Ok(())
    }

    pub fn select_palette(&mut self, palette_id: &str) -> Result<(), WizardError> {
        self.ensure_mutable()?;

        if self.catalog.palette(palette_id).is_none() {
            return Err(ValidationError::UnknownPalette(palette_id.to_string()).into());
        }
        self.selections.selected_palette = Some(palette_id.to_string());
        Ok(())
    }

    pub fn select_typography(&mut self, typography_id: &str) -> Result<(), WizardError> {
        self.ensure_mutable()?;

        if self.catalog.typography(typography_id).is_none() {
            return Err(ValidationError::UnknownTypography(typography_id.to_string()).into());
        }
        self.selections.selected_typography = Some(typography_id.to_string());
        Ok(())
    }

    /// Go back one step. Selections are kept.
    pub fn retreat(&mut self) -> Result<Step, WizardError> {
        self.ensure_mutable()?;

        let previous = self.step.previous().ok_or(WizardError::NoPreviousStep)?;
        self.step = previous;
        Ok(previous)
    }

    /// Move forward if the current step is complete.
    ///
    /// From [`Step::Review`] this submits the selections. On any failure the
    /// wizard stays where it was.
    pub async fn advance<G: SubmissionGateway>(&mut self, gateway: &G) -> Result<Step, WizardError> {
        self.ensure_mutable()?;

        if self.step == Step::Review {
            return self.submit(gateway).await;
        }

        self.check_step(self.step)?;
        if let Some(next) = self.step.next() {
            tracing::debug!(client_id = %self.client_id, from = %self.step, to = %next, "Wizard advanced");
            self.step = next;
        }
        Ok(self.step)
    }

    /// Resolve the current selections for display.
    pub fn review(&self) -> ReviewSummary {
        let logo_choices = self
            .catalog
            .logo_categories
            .iter()
            .filter_map(|category| {
                let option_id = self.selections.selected_logo_options.get(&category.id)?;
                Some(ResolvedLogoChoice {
                    category_id: category.id.clone(),
                    category_title: category.title.clone(),
                    option: category.option(option_id).cloned(),
                })
            })
            .collect();

        ReviewSummary {
            logo_choices,
            palette: self
                .selections
                .selected_palette
                .as_deref()
                .and_then(|id| self.catalog.palette(id))
                .cloned(),
            typography: self
                .selections
                .selected_typography
                .as_deref()
                .and_then(|id| self.catalog.typography(id))
                .cloned(),
        }
    }

    fn ensure_mutable(&self) -> Result<(), WizardError> {
        if self.is_read_only() {
            Err(WizardError::ReadOnly)
        } else {
            Ok(())
        }
    }

    fn check_step(&self, step: Step) -> Result<(), ValidationError> {
        match step {
            Step::LogoSelection => {
                let missing = self
                    .catalog
                    .logo_categories
                    .iter()
                    .find(|c| !self.selections.selected_logo_options.contains_key(&c.id));
                match missing {
                    Some(category) => Err(ValidationError::LogoOptionRequired(category.id.clone())),
                    None => Ok(()),
                }
            }
            Step::PaletteSelection if self.selections.selected_palette.is_none() => {
                Err(ValidationError::PaletteRequired)
            }
            Step::TypographySelection if self.selections.selected_typography.is_none() => {
                Err(ValidationError::TypographyRequired)
            }
            _ => Ok(()),
        }
    }

    async fn submit<G: SubmissionGateway>(&mut self, gateway: &G) -> Result<Step, WizardError> {
        if self.unconfirmed_submit.is_some() {
            // The last attempt may have landed; never blindly send it again
            match gateway.fetch_response(&self.client_id).await {
                Ok(Some(existing)) => return self.reconcile(existing),
                Ok(None) => self.unconfirmed_submit = None,
                Err(e) => return Err(self.record_failure(e, None)),
            }
        }

        let sent = self.selections.clone();
        match gateway.submit_response(&self.client_id, &sent).await {
            Ok(response) => Ok(self.finish(response)),
            Err(e) => Err(self.record_failure(e, Some(sent))),
        }
    }

    /// Compare a stored response with what the unconfirmed attempt sent,
    /// not with selections edited since.
    fn reconcile(&mut self, existing: StyleResponse) -> Result<Step, WizardError> {
        let recorded = existing.selections();
        if self.unconfirmed_submit.as_ref() == Some(&recorded) {
            self.selections = recorded;
            tracing::info!(client_id = %self.client_id, "Earlier submission was recorded");
            Ok(self.finish(existing))
        } else {
            self.outcome = Some(Outcome::AlreadyAnswered);
            Err(WizardError::AlreadyCompleted)
        }
    }

    fn finish(&mut self, response: StyleResponse) -> Step {
        self.step = Step::Submitted;
        self.outcome = Some(Outcome::Submitted);
        self.response = Some(response);
        self.unconfirmed_submit = None;
        tracing::info!(client_id = %self.client_id, "Style form submitted");
        self.step
    }

    /// `sent` is the payload of a submission attempt, `None` for reads.
    fn record_failure(&mut self, err: GatewayError, sent: Option<StyleSelections>) -> WizardError {
        match &err {
            GatewayError::AlreadyCompleted => self.outcome = Some(Outcome::AlreadyAnswered),
            GatewayError::ClientNotFound => self.outcome = Some(Outcome::NotFound),
            GatewayError::Transport(msg) => {
                tracing::warn!(client_id = %self.client_id, "Submission outcome unknown: {}", msg);
                // A failed read leaves the pending payload as it was
                if sent.is_some() {
                    self.unconfirmed_submit = sent;
                }
            }
            GatewayError::Rejected(_) => {}
        }
        err.into()
    }
}
