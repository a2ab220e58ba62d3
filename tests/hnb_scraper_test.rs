mod common;

use common::{FailPoint, FakeLauncher};
use tariff_scraper::constants::{HNB_PRODUCTS, HNB_TARIFF_URL};
use tariff_scraper::error::ScraperError;
use tariff_scraper::scrapers::HnbTariffScraper;
use tariff_scraper::types::{ScrapeOptions, TariffScraper};

const HNB_PAGE: &str = r#"<html><body>
<div class="cookie-consent"><button>Accept</button></div>
<table class="w-full text-left">
  <thead><tr><th>Description</th><th>Fee</th></tr></thead>
  <tbody>
    <tr><td>Documentation Charges</td><td>Up to Rs. 1,000,000/-</td><td>Rs.&nbsp;10,000/-</td></tr>
    <tr><td>Above Rs. 1,000,000/-</td><td>Rs. 15,000/-</td></tr>
    <tr><td>Early Settlement</td><td>2% of outstanding</td></tr>
    <tr><td>Stamp Duty</td><td>Rs. 200</td></tr>
    <tr><td>All charges are subject to applicable taxes</td></tr>
    <tr></tr>
    <tr><td> </td><td></td></tr>
  </tbody>
</table>
</body></html>"#;

fn launcher() -> FakeLauncher {
    FakeLauncher::new(&[(HNB_TARIFF_URL, HNB_PAGE)])
}

#[tokio::test]
async fn test_hnb_scrape_expands_every_entry_per_product() {
    let launcher = launcher();
    let scraper = HnbTariffScraper::new();

    let rows = scraper.scrape(&launcher, &ScrapeOptions::default()).await.unwrap();

    // Five classified entries, each listed under all four products
    assert_eq!(rows.len(), 5 * HNB_PRODUCTS.len());
    for chunk in rows.chunks(HNB_PRODUCTS.len()) {
        let products: Vec<&str> = chunk.iter().map(|r| r.products[0].as_str()).collect();
        assert_eq!(products, HNB_PRODUCTS.to_vec());
        assert!(chunk.iter().all(|r| r.fee_type == chunk[0].fee_type && r.amount == chunk[0].amount));
    }

    let first = &rows[0];
    assert_eq!(first.bank, "HNB");
    assert_eq!(first.description, "Documentation Charges");
    assert_eq!(first.fee_type, "Up to Rs. 1,000,000/-");
    assert_eq!(first.amount, "Rs. 10,000/-");
    assert_eq!(first.source, HNB_TARIFF_URL);

    let inherited = &rows[4];
    assert_eq!(inherited.fee_type, "Above Rs. 1,000,000/-");
    assert_eq!(inherited.description, "Documentation Charges");

    let settlement = &rows[8];
    assert_eq!(settlement.fee_type, "");
    assert_eq!(settlement.description, "Early Settlement");
    assert_eq!(settlement.amount, "2% of outstanding");

    let stamp = &rows[12];
    assert_eq!(stamp.fee_type, "Stamp Duty");
    assert_eq!(stamp.description, "Early Settlement");

    let note = &rows[16];
    assert_eq!(note.amount, "");
    assert_eq!(note.description, "Early Settlement");
    assert_eq!(note.notes.as_deref(), Some("All charges are subject to applicable taxes"));

    assert!(rows.iter().all(|r| r.updated_at == first.updated_at));
    assert_eq!(launcher.state.closes(), 1);
    assert_eq!(launcher.state.visited(), vec![HNB_TARIFF_URL.to_string()]);
}

#[tokio::test]
async fn test_hnb_scrape_passes_launch_options_through() {
    let launcher = launcher();
    let options = ScrapeOptions::default();

    HnbTariffScraper::new().scrape(&launcher, &options).await.unwrap();

    let seen = launcher.state.launch_options.lock().unwrap().clone();
    assert_eq!(seen, Some(options.launch));
}

#[tokio::test]
async fn test_hnb_closes_browser_once_on_any_failure_after_launch() {
    let points = [
        FailPoint::NewPage,
        FailPoint::Goto(0),
        FailPoint::WaitForSelector(0),
        FailPoint::Content(0),
    ];

    for point in points {
        let launcher = launcher().failing_at(point);
        let result = HnbTariffScraper::new()
            .scrape(&launcher, &ScrapeOptions::default())
            .await;

        assert!(result.is_err(), "expected failure at {:?}", point);
        assert_eq!(launcher.state.closes(), 1, "close count at {:?}", point);
    }
}

#[tokio::test]
async fn test_hnb_launch_failure_has_nothing_to_close() {
    let launcher = launcher().failing_at(FailPoint::Launch);
    let result = HnbTariffScraper::new()
        .scrape(&launcher, &ScrapeOptions::default())
        .await;

    assert!(matches!(result, Err(ScraperError::Browser(_))));
    assert_eq!(launcher.state.closes(), 0);
}

#[tokio::test]
async fn test_hnb_missing_table_is_a_timeout() {
    let launcher = FakeLauncher::new(&[(HNB_TARIFF_URL, "<html><body><p>Down for maintenance</p></body></html>")]);
    let result = HnbTariffScraper::new()
        .scrape(&launcher, &ScrapeOptions::default())
        .await;

    assert!(matches!(result, Err(ScraperError::Timeout { .. })));
    assert_eq!(launcher.state.closes(), 1);
}

#[tokio::test]
async fn test_hnb_cookie_failure_does_not_abort() {
    let launcher = launcher().failing_at(FailPoint::Cookie);
    let rows = HnbTariffScraper::new()
        .scrape(&launcher, &ScrapeOptions::default())
        .await
        .unwrap();

    assert_eq!(rows.len(), 20);
    assert_eq!(launcher.state.cookie_attempts.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(launcher.state.closes(), 1);
}
