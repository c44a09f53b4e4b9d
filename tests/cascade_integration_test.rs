use anyhow::Result;
use httpmock::prelude::*;
use httpmock::Mock;
use import_fee_calc::{
    CalcError, CascadeState, CurrencyFormatter, HttpCatalogClient, Level, QuoteReport,
    SelectionController, SelectionEvent, Tariff,
};
use std::collections::BTreeMap;
use url::Url;

/// Catalog mocks, most specific first so that the bare marks request does not
/// shadow the narrowing ones.
struct CatalogMocks<'a> {
    specifications: Mock<'a>,
    volumes: Mock<'a>,
    models: Mock<'a>,
    marks: Mock<'a>,
}

fn mount_catalog(server: &MockServer) -> CatalogMocks<'_> {
    let specifications = server.mock(|when, then| {
        when.method(GET)
            .path("/transport")
            .query_param("mark", "Toyota")
            .query_param("model", "Camry")
            .query_param("volume", "2000");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"Year": 2014, "Amount": 9000},
                {"Year": 2015, "Amount": 10000},
                {"Year": 2016, "Amount": 11500}
            ]));
    });
    let volumes = server.mock(|when, then| {
        when.method(GET)
            .path("/transport")
            .query_param("mark", "Toyota")
            .query_param("model", "Camry");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([{"Value": 2000}, {"Value": 2500}]));
    });
    let models = server.mock(|when, then| {
        when.method(GET).path("/transport").query_param("mark", "Toyota");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([{"Name": "Camry"}, {"Name": "Corolla"}]));
    });
    let marks = server.mock(|when, then| {
        when.method(GET).path("/transport");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([{"Name": "Toyota"}, {"Name": "BMW"}]));
    });

    CatalogMocks {
        specifications,
        volumes,
        models,
        marks,
    }
}

fn query_map(url: &Url) -> BTreeMap<String, String> {
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[tokio::test]
async fn test_hydrate_round_trip_keeps_query() -> Result<()> {
    let server = MockServer::start();
    let mocks = mount_catalog(&server);

    let page = Url::parse("https://calc.kz/?mark=Toyota&model=Camry&volume=2000&year=2015")?;
    let client = HttpCatalogClient::new(&server.url("/transport"))?;
    let controller = SelectionController::hydrate(client, Tariff::default(), page.clone())
        .await
        .into_result()?;

    mocks.marks.assert();
    mocks.models.assert();
    mocks.volumes.assert();
    mocks.specifications.assert();

    assert_eq!(controller.state(), CascadeState::YearChosen);
    assert_eq!(controller.selection().amount, Some(10000.0));
    assert_eq!(query_map(controller.page_url()), query_map(&page));

    let fees = controller.fees().expect("fees after year match");
    assert!((fees.customs_collection_fee - 22152.0).abs() < 1e-6);
    assert!((fees.amount_local - 4805500.0).abs() < 1e-6);
    assert!((fees.customs_duty_fee - 720825.0).abs() < 1e-6);
    assert!((fees.vat_fee - 665817.24).abs() < 1e-6);
    Ok(())
}

#[tokio::test]
async fn test_hydrate_mark_only_fetches_marks_and_models() -> Result<()> {
    let server = MockServer::start();
    let mocks = mount_catalog(&server);

    let client = HttpCatalogClient::new(&server.url("/transport"))?;
    let controller = SelectionController::hydrate(
        client,
        Tariff::default(),
        Url::parse("https://calc.kz/?mark=Toyota")?,
    )
    .await
    .into_result()?;

    mocks.marks.assert_hits(1);
    mocks.models.assert_hits(1);
    mocks.volumes.assert_hits(0);
    mocks.specifications.assert_hits(0);
    assert_eq!(controller.options().models.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_user_walks_cascade_and_gets_quote() -> Result<()> {
    let server = MockServer::start();
    let _mocks = mount_catalog(&server);

    let client = HttpCatalogClient::new(&server.url("/transport"))?;
    let mut controller = SelectionController::hydrate(
        client,
        Tariff::default(),
        Url::parse("https://calc.kz/?utm_source=instagram")?,
    )
    .await
    .into_result()?;
    assert_eq!(controller.options().marks.len(), 2);

    controller
        .dispatch(SelectionEvent::MarkChosen("Toyota".into()))
        .await?;
    controller
        .dispatch(SelectionEvent::ModelChosen("Camry".into()))
        .await?;
    controller.dispatch(SelectionEvent::VolumeChosen(2000)).await?;
    assert_eq!(controller.options().specifications.len(), 3);

    let chosen = controller.options().specifications[2];
    controller
        .dispatch(SelectionEvent::SpecificationChosen(chosen))
        .await?;

    assert_eq!(controller.selection().year, Some(2016));
    assert_eq!(controller.selection().amount, Some(11500.0));

    let query = query_map(controller.page_url());
    assert_eq!(query.get("utm_source").map(String::as_str), Some("instagram"));
    assert_eq!(query.get("year").map(String::as_str), Some("2016"));

    let report = QuoteReport::from_controller(&controller);
    let text = report.render_text(&CurrencyFormatter::default());
    assert!(text.contains("Customs collection: 22 152 тг."));
    assert!(report.total.is_some());
    Ok(())
}

#[tokio::test]
async fn test_clearing_model_drops_dependent_levels() -> Result<()> {
    let server = MockServer::start();
    let _mocks = mount_catalog(&server);

    let client = HttpCatalogClient::new(&server.url("/transport"))?;
    let mut controller = SelectionController::hydrate(
        client,
        Tariff::default(),
        Url::parse("https://calc.kz/?mark=Toyota&model=Camry&volume=2000&year=2015")?,
    )
    .await
    .into_result()?;

    controller.dispatch(SelectionEvent::Cleared(Level::Model)).await?;

    assert_eq!(controller.state(), CascadeState::MarkChosen);
    assert!(controller.fees().is_none());
    assert!(controller.options().volumes.is_empty());
    assert_eq!(controller.options().models.len(), 2);
    assert_eq!(controller.page_url().query(), Some("mark=Toyota"));
    Ok(())
}

#[tokio::test]
async fn test_transport_failure_reaches_caller() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/transport").query_param("mark", "Toyota");
        then.status(503);
    });
    server.mock(|when, then| {
        when.method(GET).path("/transport");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([{"Name": "Toyota"}]));
    });

    let client = HttpCatalogClient::new(&server.url("/transport"))?;
    let mut controller = SelectionController::hydrate(
        client,
        Tariff::default(),
        Url::parse("https://calc.kz/")?,
    )
    .await
    .into_result()?;

    let err = controller
        .dispatch(SelectionEvent::MarkChosen("Toyota".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, CalcError::CatalogStatus { status: 503, .. }));
    assert_eq!(controller.selection().mark.as_deref(), Some("Toyota"));
    assert_eq!(controller.options().marks.len(), 1);
    assert_eq!(controller.page_url().query(), None);
    Ok(())
}

#[tokio::test]
async fn test_hydrate_failure_is_returned() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/transport");
        then.status(500);
    });

    let client = HttpCatalogClient::new(&server.url("/transport"))?;
    let outcome =
        SelectionController::hydrate(client, Tariff::default(), Url::parse("https://calc.kz/")?)
            .await;
    assert!(outcome.controller.options().marks.is_empty());
    assert_eq!(outcome.controller.state(), CascadeState::Empty);
    let result = outcome.into_result();
    assert!(matches!(result, Err(CalcError::CatalogStatus { status: 500, .. })));
    Ok(())
}

#[tokio::test]
async fn test_hydrate_keeps_loaded_lists_when_one_fetch_fails() -> Result<()> {
    let server = MockServer::start();
    let specifications = server.mock(|when, then| {
        when.method(GET)
            .path("/transport")
            .query_param("mark", "Toyota")
            .query_param("model", "Camry")
            .query_param("volume", "2000");
        then.status(502);
    });
    let mocks = mount_catalog(&server);

    let client = HttpCatalogClient::new(&server.url("/transport"))?;
    let outcome = SelectionController::hydrate(
        client,
        Tariff::default(),
        Url::parse("https://calc.kz/?mark=Toyota&model=Camry&volume=2000&year=2015")?,
    )
    .await;

    specifications.assert();
    mocks.marks.assert();
    assert_eq!(outcome.failures.len(), 1);
    assert!(matches!(
        outcome.failures[0],
        CalcError::CatalogStatus { status: 502, .. }
    ));
    let options = outcome.controller.options();
    assert_eq!(options.marks.len(), 2);
    assert_eq!(options.models.len(), 2);
    assert_eq!(options.volumes.len(), 2);
    assert!(options.specifications.is_empty());
    assert!(outcome.controller.fees().is_none());
    Ok(())
}
