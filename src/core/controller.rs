use crate::adapters::query_sync::QuerySync;
use crate::core::fees;
use crate::core::selection::{
    Cascade, CascadeState, HydratePlan, PendingFetch, Resolution, SelectionEvent, Transition,
};
use crate::domain::model::{CatalogOptions, FeeResult, FetchResponse, Selection, Tariff};
use crate::domain::ports::CatalogClient;
use crate::utils::error::{CalcError, Result};
use url::Url;

/// Drives a [`Cascade`] against a catalog and keeps the page URL in sync.
pub struct SelectionController<C: CatalogClient> {
    catalog: C,
    cascade: Cascade,
    location: QuerySync,
}

/// Result of [`SelectionController::hydrate`].
///
/// The controller is always built; lists whose fetch failed stay empty and the
/// errors are kept in `failures`, in request order.
pub struct HydrateOutcome<C: CatalogClient> {
    pub controller: SelectionController<C>,
    pub failures: Vec<CalcError>,
}

impl<C: CatalogClient> HydrateOutcome<C> {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the controller only if every list loaded.
    pub fn into_result(mut self) -> Result<SelectionController<C>> {
        if self.failures.is_empty() {
            Ok(self.controller)
        } else {
            Err(self.failures.remove(0))
        }
    }
}

impl<C: CatalogClient> SelectionController<C> {
    /// Seeds the selection from `page_url` and loads every list it needs.
    ///
    /// The independent list fetches run concurrently. A failed fetch leaves its
    /// list empty without discarding the lists that did load.
    pub async fn hydrate(catalog: C, tariff: Tariff, page_url: Url) -> HydrateOutcome<C> {
        let location = QuerySync::new(page_url);
        let mut cascade = Cascade::from_selection(location.read_selection(), tariff);
        let plan = cascade.hydrate_plan();

        let (marks, models, volumes, specifications) = tokio::join!(
            catalog.fetch(&plan.marks.request),
            fetch_optional(&catalog, plan.models.as_ref()),
            fetch_optional(&catalog, plan.volumes.as_ref()),
            fetch_optional(&catalog, plan.specifications.as_ref()),
        );

        let HydratePlan {
            marks: marks_fetch,
            models: models_fetch,
            volumes: volumes_fetch,
            specifications: specifications_fetch,
        } = plan;
        let mut failures = Vec::new();
        match marks {
            Ok(response) => {
                cascade.resolve(marks_fetch.ticket, response);
            }
            Err(e) => failures.push(e),
        }
        for (pending, response) in [
            (models_fetch, models),
            (volumes_fetch, volumes),
            (specifications_fetch, specifications),
        ] {
            match (pending, response) {
                (Some(pending), Ok(Some(response))) => {
                    cascade.resolve(pending.ticket, response);
                }
                (_, Err(e)) => failures.push(e),
                _ => {}
            }
        }
        for failure in &failures {
            tracing::warn!("Hydrate fetch failed: {}", failure);
        }

        let mut controller = Self {
            catalog,
            cascade,
            location,
        };
        // 正規化後的選擇寫回網址（例如丟棄無效的參數）
        controller.push_location();
        tracing::debug!("Hydrated selection: {:?}", controller.selection());
        HydrateOutcome {
            controller,
            failures,
        }
    }

    /// Applies one user choice, loads the next list and pushes the page URL.
    ///
    /// A failed fetch is returned as-is; the recorded choice stays in place
    /// and the URL is not pushed.
    pub async fn dispatch(&mut self, event: SelectionEvent) -> Result<Resolution> {
        match self.cascade.apply(event)? {
            Transition::Fetch(pending) => {
                let response = self.catalog.fetch(&pending.request).await?;
                let resolution = self.cascade.resolve(pending.ticket, response);
                if resolution == Resolution::Applied {
                    self.push_location();
                }
                Ok(resolution)
            }
            Transition::Push => {
                self.push_location();
                Ok(Resolution::Applied)
            }
        }
    }

    pub fn selection(&self) -> &Selection {
        self.cascade.selection()
    }

    pub fn options(&self) -> &CatalogOptions {
        self.cascade.options()
    }

    pub fn fees(&self) -> Option<&FeeResult> {
        self.cascade.fees()
    }

    pub fn state(&self) -> CascadeState {
        self.cascade.state()
    }

    pub fn tariff(&self) -> &Tariff {
        self.cascade.tariff()
    }

    pub fn page_url(&self) -> &Url {
        self.location.url()
    }

    pub fn delivered_amount_local(&self) -> f64 {
        let tariff = self.tariff();
        fees::delivered_amount_local(tariff.delivered_amount, tariff.usd_to_local_rate)
    }

    fn push_location(&mut self) {
        self.location.write_selection(self.cascade.selection());
    }
}

async fn fetch_optional<C: CatalogClient + ?Sized>(
    catalog: &C,
    pending: Option<&PendingFetch>,
) -> Result<Option<FetchResponse>> {
    match pending {
        Some(pending) => Ok(Some(catalog.fetch(&pending.request).await?)),
        None => Ok(None),
    }
}
