pub mod careers;
pub mod sales_jobs;

pub use careers::CareersPage;
pub use sales_jobs::SalesJobsPage;
