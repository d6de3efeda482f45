use market_catalog::CatalogEntry;
use market_import::{CatalogStatus, FetchError, LoadStats, SilentProgress, index_client, load_cabinets};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARCADE_CSV: &str = "\
Name,Url,Game,CreationDate,Version,RomName,Description,Core,Creator,Notes
Galaga,https://files.example/galaga.zip,galaga,2023-01-02,2.1,galaga.zip,Shooter,mame,Alice,
Pacman,https://files.example/pacman.zip,pacman
Pacman,https://files.example/pacman2.zip,pacman
Broken,https://files.example/broken.zip
";

fn entry(name: &str, url: Option<String>) -> CatalogEntry {
    CatalogEntry {
        catalog_name: Some(name.to_string()),
        description: None,
        url,
    }
}

/// Seed catalogs and run a full load on a blocking thread.
async fn run_load(entries: Vec<CatalogEntry>) -> (LoadStats, Vec<String>) {
    tokio::task::spawn_blocking(move || {
        let conn = market_db::open_memory().unwrap();
        market_db::replace_catalogs(&conn, &entries).unwrap();
        let client = index_client().unwrap();
        let stats = load_cabinets(&conn, &client, Some(&SilentProgress)).unwrap();
        let names = market_db::cabinets_for_catalog(&conn, "Arcade")
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        (stats, names)
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn loads_catalog_rows_and_rejects_bad_ones() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/arcade.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARCADE_CSV))
        .mount(&server)
        .await;

    let (stats, names) = run_load(vec![entry(
        "Arcade",
        Some(format!("{}/arcade.csv", server.uri())),
    )])
    .await;

    assert_eq!(stats.catalogs_found, 1);
    assert_eq!(stats.catalogs_loaded, 1);
    assert_eq!(stats.rows, 4);
    assert_eq!(stats.inserted, 2);
    assert_eq!(stats.rejected, 2);
    assert_eq!(names, vec!["Galaga".to_string(), "Pacman".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_catalogs_do_not_stop_the_others() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/arcade.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARCADE_CSV))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/empty.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  \n"))
        .mount(&server)
        .await;

    let (stats, names) = run_load(vec![
        entry("Arcade", Some(format!("{}/arcade.csv", server.uri()))),
        entry("Blank", Some("   ".to_string())),
        entry("Empty", Some(format!("{}/empty.csv", server.uri()))),
        entry("Missing", Some(format!("{}/missing.csv", server.uri()))),
    ])
    .await;

    assert_eq!(stats.catalogs_found, 4);
    assert_eq!(stats.catalogs_loaded, 1);
    assert_eq!(stats.catalogs_missing_url, 1);
    assert_eq!(stats.catalogs_empty, 1);
    assert_eq!(stats.catalogs_failed_download, 1);
    assert_eq!(names.len(), 2);

    let missing = stats
        .catalogs
        .iter()
        .find(|(name, _)| name == "Missing")
        .map(|(_, status)| status)
        .unwrap();
    assert!(matches!(
        missing,
        CatalogStatus::DownloadFailed(FetchError::Status(404))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn no_catalogs_is_not_an_error() {
    let (stats, names) = run_load(Vec::new()).await;
    assert_eq!(stats.catalogs_found, 0);
    assert!(stats.catalogs.is_empty());
    assert!(names.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn loads_without_a_progress_reporter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/arcade.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARCADE_CSV))
        .mount(&server)
        .await;

    let url = format!("{}/arcade.csv", server.uri());
    let stats = tokio::task::spawn_blocking(move || {
        let conn = market_db::open_memory().unwrap();
        market_db::replace_catalogs(&conn, &[entry("Arcade", Some(url))]).unwrap();
        let client = index_client().unwrap();
        load_cabinets(&conn, &client, None).unwrap()
    })
    .await
    .unwrap();

    assert_eq!(stats.catalogs_loaded, 1);
    assert_eq!(stats.inserted, 2);
}
