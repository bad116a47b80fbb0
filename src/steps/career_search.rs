//! Search for a job title and narrow the results by country.

use crate::error::StepError;
use crate::pages::careers::CareersPage;
use crate::steps::arg;
use crate::steps::registry::{StepContext, StepRegistry};

pub fn register(registry: &mut StepRegistry) -> Result<(), StepError> {
    registry
        .define("I navigate to the Just Eat Takeaway careers page", navigate)?
        .define("I search for job title {string}", search_for_job_title)?
        .define("I should see search results from multiple locations", results_from_multiple_locations)?
        .define("I open the country filter", open_country_filter)?
        .define("I select {string} from the country filter", select_country)?
        .define(
            "I should see that the results are filtered to show only {word} locations",
            results_filtered_to_country,
        )?;
    Ok(())
}

fn navigate(ctx: &mut StepContext<'_>, _args: &[String]) -> Result<(), StepError> {
    let mut careers = CareersPage::new(ctx.page()?);
    careers.navigate()?;
    careers.verify_title()
}

fn search_for_job_title(ctx: &mut StepContext<'_>, args: &[String]) -> Result<(), StepError> {
    let job_title = arg(args, 0)?;
    CareersPage::new(ctx.page()?).submit_search(job_title)?;
    // The submitted search form is only visible before the results page loads.
    ctx.capture_step()?;
    CareersPage::new(ctx.page()?).wait_for_search_results()
}

fn results_from_multiple_locations(ctx: &mut StepContext<'_>, _args: &[String]) -> Result<(), StepError> {
    let mut careers = CareersPage::new(ctx.page()?);
    careers.verify_multiple_locations()?;
    let count = careers.results_count()?;
    ctx.state.initial_results_count = Some(count);
    Ok(())
}

fn open_country_filter(ctx: &mut StepContext<'_>, _args: &[String]) -> Result<(), StepError> {
    CareersPage::new(ctx.page()?).open_country_filter()
}

fn select_country(ctx: &mut StepContext<'_>, args: &[String]) -> Result<(), StepError> {
    let country = arg(args, 0)?;
    CareersPage::new(ctx.page()?).select_country(country)
}

fn results_filtered_to_country(ctx: &mut StepContext<'_>, args: &[String]) -> Result<(), StepError> {
    let country = arg(args, 0)?;
    let initial = ctx
        .state
        .initial_results_count
        .ok_or_else(|| StepError::MissingState("no result count was recorded before filtering".into()))?;

    let mut careers = CareersPage::new(ctx.page()?);
    careers.verify_count_changed(initial)?;
    careers.verify_all_results_from(country)
}
