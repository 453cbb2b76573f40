use super::*;
use fishysearch::AppError;
use fishysearch::cli::commands;
use fishysearch::models::RunSummary;
use fishysearch::storage::ResultStore;

#[tokio::test]
async fn test_second_run_same_day_is_skipped() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let dir = setup();

    // Only the first run may touch the network
    mount_page(
        &server,
        "/guppies",
        html(r#"<div class="product"><h2>Endler</h2><span class="price">4</span></div>"#),
        1,
    )
    .await;

    let config = write_config(
        dir.path(),
        json!({ "g": shop_json("Guppy Garden", &format!("{}/guppies", server.uri())) }),
    );

    let first = commands::run_aggregation(&config, test_clock()).await?;
    assert_eq!(first.to_string(), "Completed: 1 items aggregated");

    let path = ResultStore::new(&config.paths.results_dir).path_for(run_date());
    let before = std::fs::read(&path)?;

    let second = commands::run_aggregation(&config, test_clock()).await?;
    assert!(matches!(second, RunSummary::Skipped { .. }));
    assert_eq!(second.to_string(), "Aggregation skipped: Results for today already exist.");
    assert_eq!(std::fs::read(&path)?, before);

    Ok(())
}

#[tokio::test]
async fn test_empty_catalog_does_not_stop_later_shops() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let dir = setup();

    mount_page(&server, "/closed", html("<p>Back soon</p>"), 1).await;
    mount_page(
        &server,
        "/open",
        html(r#"
            <div class="product"><h2>Betta</h2></div>
            <div class="product"><h2>Gourami</h2></div>
        "#),
        1,
    )
    .await;

    let config = write_config(
        dir.path(),
        json!({
            "closed": shop_json("Closed Shop", &format!("{}/closed", server.uri())),
            "open": shop_json("Open Shop", &format!("{}/open", server.uri())),
        }),
    );

    let summary = commands::run_aggregation(&config, test_clock()).await?;
    assert_eq!(summary.to_string(), "Completed: 2 items aggregated");

    let records = ResultStore::new(&config.paths.results_dir).load(run_date())?;
    assert!(records.iter().all(|r| r.shop == "Open Shop"));

    let tally = commands::tally_by_shop(&records);
    assert_eq!(tally.len(), 1);
    assert_eq!(tally["Open Shop"].items, 2);
    Ok(())
}

#[tokio::test]
async fn test_catalog_failure_is_critical_and_writes_nothing() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let dir = setup();

    mount_page(
        &server,
        "/first",
        html(r#"<div class="product"><h2>Molly</h2></div>"#),
        1,
    )
    .await;
    mount_status(&server, "/second", 500).await;

    let config = write_config(
        dir.path(),
        json!({
            "first": shop_json("First", &format!("{}/first", server.uri())),
            "second": shop_json("Second", &format!("{}/second", server.uri())),
        }),
    );

    let summary = commands::run_aggregation(&config, test_clock()).await?;
    assert!(summary.is_failure());
    assert!(summary.to_string().starts_with("Critical failure: Network error:"));
    assert!(!ResultStore::new(&config.paths.results_dir).exists(run_date()));
    Ok(())
}

#[tokio::test]
async fn test_invalid_selector_rejected_before_fetching() {
    let server = MockServer::start().await;
    let dir = setup();
    mount_page(&server, "/never", html(""), 0).await;

    let mut shop = shop_json("Broken", &format!("{}/never", server.uri()));
    shop["selectors"]["catalog"] = json!("div[");
    let config = write_config(dir.path(), json!({ "broken": shop }));

    let err = commands::run_aggregation(&config, test_clock())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
    assert!(commands::check_config(&config).is_err());
    assert!(!config.paths.results_dir.exists());
}

#[tokio::test]
async fn test_summary_reads_stored_day() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let dir = setup();

    mount_page(
        &server,
        "/plecos",
        html(r#"<div class="product"><h2>Bristlenose</h2><a class="more" href="/gone">x</a></div>"#),
        1,
    )
    .await;
    mount_status(&server, "/gone", 404).await;

    let config = write_config(
        dir.path(),
        json!({ "p": shop_json("Pleco Place", &format!("{}/plecos", server.uri())) }),
    );
    commands::run_aggregation(&config, test_clock()).await?;

    commands::show_summary(&config, Some(run_date()))?;

    let records = ResultStore::new(&config.paths.results_dir).load(run_date())?;
    let tally = commands::tally_by_shop(&records);
    assert_eq!(tally["Pleco Place"].items, 1);
    assert_eq!(tally["Pleco Place"].failed_subpages, 1);

    let missing_day = NaiveDate::from_ymd_opt(2025, 6, 13).unwrap();
    assert!(commands::show_summary(&config, Some(missing_day)).is_err());
    Ok(())
}

#[tokio::test]
async fn test_reserved_field_and_blank_keyword_rejected_before_fetching() {
    let server = MockServer::start().await;
    let dir = setup();
    mount_page(&server, "/never", html(""), 0).await;

    let mut vendor = shop_json("Vendor", &format!("{}/never", server.uri()));
    vendor["mainpage_attributes"]["shop"] = json!(".vendor");
    let config = write_config(dir.path(), json!({ "vendor": vendor }));
    let err = commands::run_aggregation(&config, test_clock())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("mainpage_attributes.shop"));

    let mut blank = shop_json("Blank", &format!("{}/never", server.uri()));
    blank["excluded_keywords"] = json!([""]);
    let config = write_config(dir.path(), json!({ "blank": blank }));
    let err = commands::run_aggregation(&config, test_clock())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
    assert!(!config.paths.results_dir.exists());
}
