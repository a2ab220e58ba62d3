/// Bank name constants to ensure consistency across the codebase
/// These constants define the mapping between CLI bank keys and the names written to records

// CLI bank keys
pub const HNB_KEY: &str = "hnb";
pub const SEYLAN_KEY: &str = "seylan";

// Bank names as they appear in output records
pub const HNB_BANK: &str = "HNB";
pub const SEYLAN_BANK: &str = "Seylan";

// HNB retail tariff: one table, no per-row product column
pub const HNB_TARIFF_URL: &str = "https://www.hnb.lk/tariffs/retail-services-tariff";
pub const HNB_TABLE_SELECTOR: &str = "table.w-full.text-left";
pub const HNB_PRODUCTS: [&str; 4] = ["Home Loan", "LAP", "Personal Loan", "Education Loan"];

// Seylan service charges: one category page per product
pub const SEYLAN_HOME_LOAN_URL: &str =
    "https://www.seylan.lk/service-charges?category=HOUSING_LOAN_CHARGES";
pub const SEYLAN_HOME_LOAN_SELECTOR: &str = "#home .table-responsive table";
pub const SEYLAN_LAP_URL: &str =
    "https://www.seylan.lk/service-charges?category=LAND_ACQUISITION_AND_PROPERTY";
pub const SEYLAN_LAP_SELECTOR: &str = "#lap .table-responsive table";

pub const HOME_LOAN_PRODUCT: &str = "Home Loan";
pub const LAP_PRODUCT: &str = "LAP";

// Seylan marks the description column with this class; a <b> inside it opens a new group
pub const SEYLAN_DESCRIPTION_CELL: &str = ".row-two-value";

// Page acquisition defaults
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1300;
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 900;
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 45;
pub const DEFAULT_SELECTOR_TIMEOUT_SECS: u64 = 8;

// Tried in order before falling back to matching button text
pub const COOKIE_ACCEPT_SELECTORS: [&str; 6] = [
    "#onetrust-accept-btn-handler",
    "#accept-cookies",
    "button.cookie-accept",
    ".cookie-consent button",
    "[data-cookie-accept]",
    "#cookieConsent button",
];

/// Get all supported CLI bank keys
pub fn get_supported_banks() -> Vec<&'static str> {
    vec![HNB_KEY, SEYLAN_KEY]
}
