use std::collections::BTreeSet;

use crate::browser::locator::{LocatorStrategy, StrategyChain};
use crate::browser::page::Page;
use crate::error::StepError;
use crate::steps::expect;

pub const CAREERS_URL: &str = "https://careers.justeattakeaway.com/global/en/home";
pub const EXPECTED_TITLE: &str = "Just Eat Takeaway Careers";

const SEARCH_INPUT: &str = r#"input[placeholder="Search for job title"]"#;
const SEARCH_SUBMIT: &str = "#ph-search-backdrop";
const SEARCH_RESULTS_URL: &str = "**/search-results**";
const JOBS_LIST: &str = r#"[data-ph-at-id="jobs-list"]"#;
const RESULT_ITEMS: &str = r#"div[data-widget="phw-search-results-v1"] div[data-ph-at-id="jobs-list"]"#;
const RESULT_LOCATIONS: &str =
    r#"div[data-widget="phw-search-results-v1"] [data-ph-at-id="job-location"] div[role="text"]"#;
const COUNTRY_FILTER_BUTTON: &str = r#"button[aria-label="Country"]"#;
const COUNTRY_OPTIONS: &str = r#"input[type="checkbox"][aria-label]"#;
const LOCATION_PREFIX: &str = "Location :";

/// Time allowed for a facet selection to re-render the result list.
pub const FILTER_SETTLE_MS: u64 = 1_000;

/// Search, filter and result checks on the careers home and search pages.
pub struct CareersPage<'p> {
    page: &'p mut dyn Page,
}

impl<'p> CareersPage<'p> {
    pub fn new(page: &'p mut dyn Page) -> Self {
        Self { page }
    }

    pub fn navigate(&mut self) -> Result<(), StepError> {
        self.page.goto(CAREERS_URL)?;
        Ok(())
    }

    pub fn verify_title(&mut self) -> Result<(), StepError> {
        let title = self.page.title()?;
        expect::contains(&title, EXPECTED_TITLE, "page title")
    }

    /// Type the job title and submit. Navigation is awaited separately by
    /// `wait_for_search_results` so the caller can capture the page in
    /// between.
    pub fn submit_search(&mut self, job_title: &str) -> Result<(), StepError> {
        self.page.wait_for_selector(SEARCH_INPUT, None)?;
        self.page.fill(SEARCH_INPUT, "")?;
        self.page.fill(SEARCH_INPUT, job_title)?;
        self.page.click(SEARCH_SUBMIT, None)?;
        Ok(())
    }

    pub fn wait_for_search_results(&mut self) -> Result<(), StepError> {
        self.page.wait_for_url(SEARCH_RESULTS_URL, None)?;
        Ok(())
    }

    /// Location text of every result, without the `Location :` prefix.
    pub fn result_locations(&mut self) -> Result<Vec<String>, StepError> {
        let texts = self.page.all_text_contents(RESULT_LOCATIONS)?;
        Ok(texts
            .iter()
            .map(|t| clean_location(t))
            .filter(|t| !t.is_empty())
            .collect())
    }

    pub fn verify_multiple_locations(&mut self) -> Result<(), StepError> {
        self.page.wait_for_selector(JOBS_LIST, None)?;
        let locations = self.result_locations()?;
        expect::greater_than(locations.len(), 0, "number of result locations")?;

        let distinct: BTreeSet<&str> = locations.iter().map(String::as_str).collect();
        expect::greater_than(distinct.len(), 1, "number of distinct result locations")
    }

    pub fn results_count(&mut self) -> Result<usize, StepError> {
        Ok(self.page.count(RESULT_ITEMS)?)
    }

    pub fn open_country_filter(&mut self) -> Result<(), StepError> {
        self.page.click(COUNTRY_FILTER_BUTTON, None)?;
        self.page.wait_for_selector(COUNTRY_OPTIONS, None)?;
        Ok(())
    }

    /// Tick a country checkbox, trying each locator strategy in turn, then
    /// give the result list time to re-render.
    pub fn select_country(&mut self, country: &str) -> Result<(), StepError> {
        country_strategies(country).click_first(&mut *self.page)?;
        self.page.wait_for_timeout(FILTER_SETTLE_MS)?;
        Ok(())
    }

    pub fn verify_count_changed(&mut self, initial: usize) -> Result<(), StepError> {
        let current = self.results_count()?;
        expect::not_equals(current, initial, "result count after filtering")
    }

    pub fn verify_all_results_from(&mut self, country: &str) -> Result<(), StepError> {
        let locations = self.result_locations()?;
        expect::greater_than(locations.len(), 0, "number of result locations")?;
        for location in &locations {
            expect::contains(location, country, "result location")?;
        }
        Ok(())
    }
}

/// Data attributes first, then the accessible label, then any visible text.
pub fn country_strategies(country: &str) -> StrategyChain {
    StrategyChain::new()
        .then(
            LocatorStrategy::new(
                "facet data attributes",
                format!(
                    r#"input[data-ph-at-text="{}"][data-ph-at-facetkey="facet-country"]"#,
                    country
                ),
            )
            .with_timeout(10_000),
        )
        .then(
            LocatorStrategy::new(
                "aria-label",
                format!(r#"input[type="checkbox"][aria-label*="{}"]"#, country),
            )
            .with_timeout(5_000),
        )
        .then(LocatorStrategy::new("visible text", format!("text={}", country)))
}

fn clean_location(text: &str) -> String {
    text.replace(LOCATION_PREFIX, "").trim().to_string()
}
