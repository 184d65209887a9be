pub mod console_report;
