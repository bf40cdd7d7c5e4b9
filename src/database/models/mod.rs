pub mod company;
pub mod job;

pub use company::{Company, CompanyDetail, NewCompany};
pub use job::{Job, JobSummary, NewJob};
