//! Cascading selection state machine.
//!
//! [`Cascade`] is a pure reducer: it records choices, decides which catalog
//! list must be fetched next and accepts fetched lists back. It never performs
//! I/O and never touches the page URL; [`SelectionController`] drives it.
//!
//! Every list level carries a generation counter. Starting a fetch hands out a
//! [`FetchTicket`] for the current generation; clearing or re-choosing a level
//! bumps the generation of every list below it, so a response that arrives for
//! a superseded choice is reported as [`Resolution::Stale`] and dropped.
//!
//! [`SelectionController`]: crate::core::controller::SelectionController

use crate::core::fees;
use crate::domain::model::{
    CatalogOptions, FeeResult, FetchRequest, FetchResponse, Level, Selection, Specification,
    Tariff,
};
use crate::utils::error::{CalcError, Result};
use serde::Serialize;

/// A user choice at one level of the cascade.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    MarkChosen(String),
    ModelChosen(String),
    VolumeChosen(u32),
    SpecificationChosen(Specification),
    /// Unset the level and everything below it.
    Cleared(Level),
}

impl SelectionEvent {
    pub fn level(&self) -> Level {
        match self {
            SelectionEvent::MarkChosen(_) => Level::Mark,
            SelectionEvent::ModelChosen(_) => Level::Model,
            SelectionEvent::VolumeChosen(_) => Level::Volume,
            SelectionEvent::SpecificationChosen(_) => Level::Year,
            SelectionEvent::Cleared(level) => *level,
        }
    }
}

/// How far the user got, by contiguous chosen prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CascadeState {
    Empty,
    MarkChosen,
    ModelChosen,
    VolumeChosen,
    YearChosen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    level: Level,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub ticket: FetchTicket,
    pub request: FetchRequest,
}

/// What the driver has to do after an event was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Run the fetch, hand the result to [`Cascade::resolve`], then push the query.
    Fetch(PendingFetch),
    /// Nothing to load; push the query right away.
    Push,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// The ticket was superseded; the response was discarded.
    Stale,
}

/// Fetches needed to render a freshly hydrated selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydratePlan {
    pub marks: PendingFetch,
    pub models: Option<PendingFetch>,
    pub volumes: Option<PendingFetch>,
    pub specifications: Option<PendingFetch>,
}

impl HydratePlan {
    pub fn requests(&self) -> impl Iterator<Item = &FetchRequest> {
        std::iter::once(&self.marks)
            .chain(self.models.as_ref())
            .chain(self.volumes.as_ref())
            .chain(self.specifications.as_ref())
            .map(|pending| &pending.request)
    }
}

#[derive(Debug, Clone)]
pub struct Cascade {
    selection: Selection,
    options: CatalogOptions,
    fees: Option<FeeResult>,
    tariff: Tariff,
    generations: [u64; 4],
}

impl Cascade {
    pub fn new(tariff: Tariff) -> Self {
        Self::from_selection(Selection::default(), tariff)
    }

    /// Seeds the cascade from an externally supplied selection (the page query).
    ///
    /// Values under an unset level are dropped, and `amount` is always left
    /// unset until the specification list confirms the year.
    pub fn from_selection(mut selection: Selection, tariff: Tariff) -> Self {
        selection.truncate_at_gap();
        selection.amount = None;
        Self {
            selection,
            options: CatalogOptions::default(),
            fees: None,
            tariff,
            generations: [0; 4],
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn options(&self) -> &CatalogOptions {
        &self.options
    }

    pub fn fees(&self) -> Option<&FeeResult> {
        self.fees.as_ref()
    }

    pub fn tariff(&self) -> &Tariff {
        &self.tariff
    }

    pub fn state(&self) -> CascadeState {
        match self.selection.depth() {
            0 => CascadeState::Empty,
            1 => CascadeState::MarkChosen,
            2 => CascadeState::ModelChosen,
            3 => CascadeState::VolumeChosen,
            _ => CascadeState::YearChosen,
        }
    }

    /// Marks are always loaded; every other list is loaded when its prefix is set.
    pub fn hydrate_plan(&mut self) -> HydratePlan {
        let marks = self.issue(FetchRequest::Marks);
        let mut plan = HydratePlan {
            marks,
            models: None,
            volumes: None,
            specifications: None,
        };

        for level in [Level::Model, Level::Volume, Level::Year] {
            let Some(request) = FetchRequest::for_level(level, &self.selection) else {
                break;
            };
            let pending = Some(self.issue(request));
            match level {
                Level::Model => plan.models = pending,
                Level::Volume => plan.volumes = pending,
                _ => plan.specifications = pending,
            }
        }

        tracing::debug!(
            "Hydrate plan for {:?}: {} request(s)",
            self.state(),
            plan.requests().count()
        );
        plan
    }

    /// Applies one user choice.
    ///
    /// Choosing a level whose prefix is incomplete, or a specification that is
    /// not in the loaded list, is rejected and leaves the cascade untouched.
    pub fn apply(&mut self, event: SelectionEvent) -> Result<Transition> {
        let level = event.level();
        if !matches!(event, SelectionEvent::Cleared(_)) && !self.selection.prefix_complete_for(level)
        {
            return Err(CalcError::IncompletePrefix { level });
        }
        if let SelectionEvent::SpecificationChosen(specification) = &event {
            if !self.options.specifications.contains(specification) {
                return Err(CalcError::UnlistedSpecification {
                    year: specification.year,
                    amount: specification.amount,
                });
            }
        }

        tracing::debug!("Applying {:?}", event);
        let transition = match event {
            SelectionEvent::MarkChosen(mark) => {
                self.reset_below(Level::Mark);
                self.selection.mark = Some(mark);
                self.next_fetch(Level::Model)
            }
            SelectionEvent::ModelChosen(model) => {
                self.reset_below(Level::Model);
                self.selection.model = Some(model);
                self.next_fetch(Level::Volume)
            }
            SelectionEvent::VolumeChosen(volume) => {
                self.reset_below(Level::Volume);
                self.selection.volume = Some(volume);
                self.next_fetch(Level::Year)
            }
            SelectionEvent::SpecificationChosen(specification) => {
                self.adopt(specification);
                Transition::Push
            }
            SelectionEvent::Cleared(level) => {
                self.selection.clear_from(level);
                self.reset_below(level);
                Transition::Push
            }
        };
        Ok(transition)
    }

    /// Stores a fetched list if its ticket is still current.
    pub fn resolve(&mut self, ticket: FetchTicket, response: FetchResponse) -> Resolution {
        if response.level() != ticket.level || !self.is_current(ticket) {
            tracing::warn!(
                "Dropping stale {} list ({} entries)",
                ticket.level,
                response.len()
            );
            return Resolution::Stale;
        }

        tracing::debug!("Loaded {} {} option(s)", response.len(), ticket.level);
        self.options.replace(response);

        if ticket.level == Level::Year && self.fees.is_none() {
            self.match_hydrated_year();
        }
        Resolution::Applied
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.generations[ticket.level.index()] == ticket.generation
    }

    fn issue(&mut self, request: FetchRequest) -> PendingFetch {
        let level = request.level();
        let slot = &mut self.generations[level.index()];
        *slot += 1;
        PendingFetch {
            ticket: FetchTicket {
                level,
                generation: *slot,
            },
            request,
        }
    }

    fn next_fetch(&mut self, level: Level) -> Transition {
        match FetchRequest::for_level(level, &self.selection) {
            Some(request) => Transition::Fetch(self.issue(request)),
            None => Transition::Push,
        }
    }

    /// Unsets values and lists strictly below `level` and cancels their fetches.
    fn reset_below(&mut self, level: Level) {
        if let Some(next) = Level::ALL.get(level.index() + 1).copied() {
            self.selection.clear_from(next);
        }
        for lower in &Level::ALL[level.index() + 1..] {
            self.options.clear_level(*lower);
            self.generations[lower.index()] += 1;
        }
        self.fees = None;
    }

    fn adopt(&mut self, specification: Specification) {
        self.selection.year = Some(specification.year);
        self.selection.amount = Some(specification.amount);
        self.fees = Some(fees::compute_with_tariff(specification.amount, &self.tariff));
    }

    fn match_hydrated_year(&mut self) {
        let Some(year) = self.selection.year else {
            return;
        };
        match self
            .options
            .specifications
            .iter()
            .find(|specification| specification.year == year)
            .copied()
        {
            Some(specification) => self.adopt(specification),
            None => tracing::debug!("No specification for year {}", year),
        }
    }
}
