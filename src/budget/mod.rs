pub mod aggregate;
pub mod currency;

pub use aggregate::{
    preview_estimate, unique_contractors, weight_percentages, ContractTotals, EstimateFilter,
    EstimatePreview, EstimateTotals, WorkItemTotals, VAT_RATE,
};
pub use currency::{format_mxn, format_percent};
