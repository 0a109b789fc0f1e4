pub mod chart_panel;
pub mod company_header;
pub mod dashboard;
