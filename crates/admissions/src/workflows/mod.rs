pub mod normalization;
pub mod report;
pub mod search;

pub use normalization::{clear, denormalize, normalize};
pub use report::{generate_report, DepartmentReport, DepartmentSummary};
pub use search::{search_candidates, SearchFilter, SearchHit, SearchQuery};
