//! Company and job storage.
//!
//! Every operation takes `&impl GenericClient`, so the same calls work on a
//! pooled connection, a [`TracedClient`](crate::TracedClient) or a transaction.

mod company;
mod job;

pub use company::{
    COMPANY_COLUMNS, Company, CompanyDetail, CompanyFilter, CompanyJob, NewCompany,
};
pub use job::{Job, JobFilter, NewJob};
