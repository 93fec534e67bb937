pub mod dashboard;

pub use dashboard::{
    export_file_name, parse_ticket_numbers, tickets_for_amount, DashboardStats, SubmissionFilter,
};
