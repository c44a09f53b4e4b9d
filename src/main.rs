use clap::Parser;
use import_fee_calc::core::ConfigProvider;
use import_fee_calc::utils::error::ErrorSeverity;
use import_fee_calc::utils::logger;
use import_fee_calc::{
    compute_fees, CalcError, CliConfig, Command, CurrencyFormatter, HttpCatalogClient,
    QuoteReport, SelectionController, SelectionEvent, TomlConfig,
};
use url::Url;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli.command, &config).await {
        tracing::error!(
            "Calculation failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 4,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(command: Command, config: &TomlConfig) -> Result<(), CalcError> {
    let formatter = CurrencyFormatter::new(config.currency_suffix());

    match command {
        Command::Hydrate { url, json } => {
            let catalog = HttpCatalogClient::from_config(config)?;
            tracing::info!("Restoring selection from {}", url);
            let outcome =
                SelectionController::hydrate(catalog, config.tariff(), Url::parse(&url)?).await;
            // 已載入的清單仍然輸出，再回報第一個失敗
            print_report(&QuoteReport::from_controller(&outcome.controller), &formatter, json)?;
            outcome.into_result().map(|_| ())
        }
        Command::Select {
            mark,
            model,
            volume,
            year,
            page_url,
            json,
        } => {
            let catalog = HttpCatalogClient::from_config(config)?;
            let mut controller =
                SelectionController::hydrate(catalog, config.tariff(), Url::parse(&page_url)?)
                    .await
                    .controller;

            controller.dispatch(SelectionEvent::MarkChosen(mark)).await?;
            if let Some(model) = model {
                controller.dispatch(SelectionEvent::ModelChosen(model)).await?;
            }
            if let Some(volume) = volume {
                controller.dispatch(SelectionEvent::VolumeChosen(volume)).await?;
            }
            if let Some(year) = year {
                let chosen = controller
                    .options()
                    .specifications
                    .iter()
                    .find(|specification| specification.year == year)
                    .copied();
                match chosen {
                    Some(specification) => {
                        controller
                            .dispatch(SelectionEvent::SpecificationChosen(specification))
                            .await?;
                    }
                    None => tracing::warn!("Year {} is not offered for this selection", year),
                }
            }

            print_report(&QuoteReport::from_controller(&controller), &formatter, json)
        }
        Command::Fees { amount, json } => {
            let tariff = config.tariff();
            let fees = compute_fees(amount, tariff.usd_to_local_rate, tariff.reference_resale_value);
            if json {
                println!("{}", serde_json::to_string_pretty(&fees)?);
            } else {
                println!("Value:              {}", formatter.format(fees.amount_local));
                println!(
                    "Customs collection: {}",
                    formatter.format(fees.customs_collection_fee)
                );
                println!("Customs duty:       {}", formatter.format(fees.customs_duty_fee));
                println!("VAT:                {}", formatter.format(fees.vat_fee));
                println!("Total:              {}", formatter.format(fees.total()));
            }
            Ok(())
        }
    }
}

fn print_report(
    report: &QuoteReport,
    formatter: &CurrencyFormatter,
    json: bool,
) -> Result<(), CalcError> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report.render_text(formatter));
    }
    Ok(())
}
