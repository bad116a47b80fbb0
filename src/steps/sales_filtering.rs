//! Open a job category from the search dropdown and check the facet counts.

use crate::error::StepError;
use crate::pages::sales_jobs::SalesJobsPage;
use crate::steps::arg;
use crate::steps::registry::{StepContext, StepRegistry};

pub fn register(registry: &mut StepRegistry) -> Result<(), StepError> {
    registry
        .define("I navigate to the Just Eat Takeaway careers page for Sales filtering", navigate)?
        .define("I click on the job search input field to open dropdown", open_dropdown)?
        .define("I select {string} from the dropdown menu", select_category)?
        .define("I should be on the {word} jobs page", on_category_page)?
        .define("I should verify that {string} category is selected", category_selected)?
        .define(
            "I should verify that the job count matches the category count",
            job_count_matches_category,
        )?
        .define("I select {string} from the country filter on Sales page", select_country)?
        .define(
            "I should verify that the filtered job count matches the {string} count",
            filtered_count_matches_country,
        )?;
    Ok(())
}

fn navigate(ctx: &mut StepContext<'_>, _args: &[String]) -> Result<(), StepError> {
    let mut sales = SalesJobsPage::new(ctx.page()?);
    sales.navigate()?;
    sales.verify_title()
}

fn open_dropdown(ctx: &mut StepContext<'_>, _args: &[String]) -> Result<(), StepError> {
    SalesJobsPage::new(ctx.page()?).click_search_input()?;
    // Capture while the dropdown is still open.
    ctx.capture_step()
}

fn select_category(ctx: &mut StepContext<'_>, args: &[String]) -> Result<(), StepError> {
    let category = arg(args, 0)?;
    SalesJobsPage::new(ctx.page()?).select_category(category)?;
    ctx.state.selected_category = Some(category.to_string());
    Ok(())
}

fn on_category_page(ctx: &mut StepContext<'_>, args: &[String]) -> Result<(), StepError> {
    let category = arg(args, 0)?;
    SalesJobsPage::new(ctx.page()?).verify_on_category_page(category)
}

fn category_selected(ctx: &mut StepContext<'_>, args: &[String]) -> Result<(), StepError> {
    let category = arg(args, 0)?;
    SalesJobsPage::new(ctx.page()?).verify_category_selected(category)
}

fn job_count_matches_category(ctx: &mut StepContext<'_>, _args: &[String]) -> Result<(), StepError> {
    let category = ctx
        .state
        .selected_category
        .clone()
        .ok_or_else(|| StepError::MissingState("no category was selected from the dropdown".into()))?;
    SalesJobsPage::new(ctx.page()?).verify_job_count_matches_category(&category)
}

fn select_country(ctx: &mut StepContext<'_>, args: &[String]) -> Result<(), StepError> {
    let country = arg(args, 0)?;
    SalesJobsPage::new(ctx.page()?).select_country(country)
}

fn filtered_count_matches_country(ctx: &mut StepContext<'_>, args: &[String]) -> Result<(), StepError> {
    let country = arg(args, 0)?;
    SalesJobsPage::new(ctx.page()?).verify_filtered_count_matches_country(country)
}
