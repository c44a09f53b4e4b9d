use crate::core::controller::SelectionController;
use crate::core::selection::CascadeState;
use crate::domain::model::{CatalogOptions, FeeResult, Selection};
use crate::domain::ports::CatalogClient;
use crate::utils::currency::CurrencyFormatter;
use serde::Serialize;
use std::fmt::Write;

/// Snapshot of a controller for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteReport {
    pub page_url: String,
    pub state: CascadeState,
    pub selection: Selection,
    pub options: CatalogOptions,
    pub fees: Option<FeeResult>,
    pub total: Option<f64>,
    pub delivered_amount_local: f64,
}

impl QuoteReport {
    pub fn from_controller<C: CatalogClient>(controller: &SelectionController<C>) -> Self {
        let fees = controller.fees().copied();
        Self {
            page_url: controller.page_url().to_string(),
            state: controller.state(),
            selection: controller.selection().clone(),
            options: controller.options().clone(),
            total: fees.as_ref().map(FeeResult::total),
            fees,
            delivered_amount_local: controller.delivered_amount_local(),
        }
    }

    pub fn render_text(&self, formatter: &CurrencyFormatter) -> String {
        let mut out = String::new();
        let selection = &self.selection;

        let _ = writeln!(out, "Page:      {}", self.page_url);
        let _ = writeln!(out, "State:     {:?}", self.state);
        let _ = writeln!(out, "Mark:      {}", selection.mark.as_deref().unwrap_or("-"));
        let _ = writeln!(out, "Model:     {}", selection.model.as_deref().unwrap_or("-"));
        let _ = writeln!(
            out,
            "Volume:    {}",
            selection.volume.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
        );
        let _ = writeln!(
            out,
            "Year:      {}",
            selection.year.map(|y| y.to_string()).unwrap_or_else(|| "-".into())
        );

        // 只列出下一步可選的清單
        match self.state {
            CascadeState::Empty => {
                let names: Vec<&str> = self.options.marks.iter().map(|m| m.name.as_str()).collect();
                let _ = writeln!(out, "Marks:     {}", names.join(", "));
            }
            CascadeState::MarkChosen => {
                let names: Vec<&str> = self.options.models.iter().map(|m| m.name.as_str()).collect();
                let _ = writeln!(out, "Models:    {}", names.join(", "));
            }
            CascadeState::ModelChosen => {
                let values: Vec<String> =
                    self.options.volumes.iter().map(|v| v.value.to_string()).collect();
                let _ = writeln!(out, "Volumes:   {}", values.join(", "));
            }
            CascadeState::VolumeChosen | CascadeState::YearChosen => {
                let years: Vec<String> = self
                    .options
                    .specifications
                    .iter()
                    .map(|s| s.year.to_string())
                    .collect();
                let _ = writeln!(out, "Years:     {}", years.join(", "));
            }
        }

        if let Some(fees) = &self.fees {
            let _ = writeln!(out, "Value:              {}", formatter.format(fees.amount_local));
            let _ = writeln!(
                out,
                "Customs collection: {}",
                formatter.format(fees.customs_collection_fee)
            );
            let _ = writeln!(out, "Customs duty:       {}", formatter.format(fees.customs_duty_fee));
            let _ = writeln!(out, "VAT:                {}", formatter.format(fees.vat_fee));
            let _ = writeln!(out, "Total:              {}", formatter.format_optional(self.total));
        }
        let _ = writeln!(
            out,
            "Delivery:           {}",
            formatter.format(self.delivered_amount_local)
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Specification, Tariff};

    fn report(fees: Option<FeeResult>) -> QuoteReport {
        QuoteReport {
            page_url: "https://calc.kz/?mark=Toyota&model=Camry&volume=2000&year=2015".into(),
            state: CascadeState::YearChosen,
            selection: Selection {
                mark: Some("Toyota".into()),
                model: Some("Camry".into()),
                volume: Some(2000),
                year: Some(2015),
                amount: Some(10000.0),
            },
            options: CatalogOptions {
                specifications: vec![Specification {
                    year: 2015,
                    amount: 10000.0,
                }],
                ..Default::default()
            },
            total: fees.as_ref().map(FeeResult::total),
            fees,
            delivered_amount_local: 1008000.0,
        }
    }

    #[test]
    fn test_render_with_fees() {
        let tariff = Tariff::default();
        let fees = crate::core::fees::compute_with_tariff(10000.0, &tariff);
        let text = report(Some(fees)).render_text(&CurrencyFormatter::default());

        assert!(text.contains("Mark:      Toyota"));
        assert!(text.contains("Years:     2015"));
        assert!(text.contains("Customs collection: 22 152 тг."));
        assert!(text.contains("Value:              4 805 500 тг."));
        assert!(text.contains("Delivery:           1 008 000 тг."));
    }

    #[test]
    fn test_render_without_fees_skips_amounts() {
        let text = report(None).render_text(&CurrencyFormatter::default());
        assert!(!text.contains("VAT"));
        assert!(!text.contains("Total"));
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(report(None)).unwrap();
        assert_eq!(json["state"], "YearChosen");
        assert_eq!(json["selection"]["volume"], 2000);
        assert!(json["fees"].is_null());
    }
}
