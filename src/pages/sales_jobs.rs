use std::sync::LazyLock;

use regex::Regex;

use crate::browser::page::Page;
use crate::error::StepError;
use crate::pages::careers::{CAREERS_URL, EXPECTED_TITLE, FILTER_SETTLE_MS};
use crate::steps::expect;

/// Wait bounds used on the category pages.
pub mod timeouts {
    pub const SHORT: u64 = 3_000;
    pub const MEDIUM: u64 = 8_000;
}

const SEARCH_INPUT: &str = r#"input[placeholder="Search for job title"]"#;
const RESULT_COUNT: &str = r#"[data-ph-at-id="search-page-top-job-count"] .result-count"#;
const COUNTRY_HEADING: &str = r#"button[data-ph-at-id="facet-heading-link"][data-ph-at-text="Country"]"#;
const FACET_RESULTS: &str = r#"ul[data-ph-at-id="facet-results-list"]"#;

/// Category landing pages such as `/c/sales-jobs`: category dropdown,
/// facet checkboxes and the displayed job count.
pub struct SalesJobsPage<'p> {
    page: &'p mut dyn Page,
}

impl<'p> SalesJobsPage<'p> {
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

    /// Focus the search input, which opens the category dropdown.
    pub fn click_search_input(&mut self) -> Result<(), StepError> {
        self.page.click(SEARCH_INPUT, None)?;
        Ok(())
    }

    /// Pick a category link and wait for its landing page.
    pub fn select_category(&mut self, category: &str) -> Result<(), StepError> {
        let selector = format!(
            r#"a[data-ph-at-data-text="{}"][data-ph-at-id="category-link"]"#,
            category
        );
        self.page.wait_for_selector(&selector, Some(timeouts::MEDIUM))?;
        self.page.click(&selector, None)?;
        let pattern = format!("**{}", category_path(category));
        self.page.wait_for_url(&pattern, Some(timeouts::MEDIUM))?;
        Ok(())
    }

    pub fn verify_on_category_page(&mut self, category: &str) -> Result<(), StepError> {
        let url = self.page.url()?;
        expect::contains(&url, &category_path(category), "current URL")
    }

    pub fn verify_category_selected(&mut self, category: &str) -> Result<(), StepError> {
        let checked = self.page.is_checked(&facet_checkbox("facet-category", category))?;
        expect::is_true(checked, &format!("category checkbox '{}' should be checked", category))
    }

    pub fn verify_job_count_matches_category(&mut self, category: &str) -> Result<(), StepError> {
        let expected = self.facet_count("facet-category", category)?;
        let actual = self.displayed_count()?;
        expect::equals(actual, expected, &format!("job count for category '{}'", category))
    }

    /// Open the Country facet and tick `country`.
    pub fn select_country(&mut self, country: &str) -> Result<(), StepError> {
        self.page.wait_for_selector(COUNTRY_HEADING, Some(timeouts::MEDIUM))?;
        self.page.click(COUNTRY_HEADING, None)?;
        self.page.wait_for_selector(FACET_RESULTS, Some(timeouts::SHORT))?;

        let checkbox = format!(
            r#"li[data-ph-at-id="facet-results-item"]:has(input[data-ph-at-text="{}"]) span.checkbox"#,
            country
        );
        self.page.wait_for_selector(&checkbox, Some(timeouts::SHORT))?;
        self.page.click(&checkbox, None)?;
        self.page.wait_for_timeout(FILTER_SETTLE_MS)?;
        Ok(())
    }

    pub fn verify_filtered_count_matches_country(&mut self, country: &str) -> Result<(), StepError> {
        let expected = self.facet_count("facet-country", country)?;
        let actual = self.displayed_count()?;
        expect::equals(actual, expected, &format!("job count for country '{}'", country))
    }

    /// Count advertised in a facet checkbox's aria-label, e.g. `Sales 42`.
    fn facet_count(&mut self, facet: &str, text: &str) -> Result<usize, StepError> {
        let label = self
            .page
            .get_attribute(&facet_checkbox(facet, text), "aria-label")?;
        Ok(label.as_deref().and_then(first_number).unwrap_or(0))
    }

    /// Job count shown above the result list.
    fn displayed_count(&mut self) -> Result<usize, StepError> {
        let text = self.page.text_content(RESULT_COUNT)?.unwrap_or_default();
        leading_number(&text).ok_or_else(|| {
            StepError::assertion(format!("result count \"{}\" is not a number", text.trim()))
        })
    }
}

fn facet_checkbox(facet: &str, text: &str) -> String {
    format!(
        r#"input[data-ph-at-text="{}"][data-ph-at-facetkey="{}"]"#,
        text, facet
    )
}

/// `/c/<slug>-jobs`, where the slug is the lower-cased, dash-joined category.
pub fn category_path(category: &str) -> String {
    let slug = category
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    format!("/c/{}-jobs", slug)
}

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid digits pattern"));

/// First run of digits anywhere in `text`.
pub fn first_number(text: &str) -> Option<usize> {
    DIGITS.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Integer at the start of `text` after leading whitespace, like `"12 jobs"`.
pub fn leading_number(text: &str) -> Option<usize> {
    let trimmed = text.trim_start();
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
