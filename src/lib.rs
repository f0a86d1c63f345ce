#![doc = include_str!("../README.md")]

pub mod chart;
pub mod pdf;
pub mod record;
pub mod report;
pub mod usd;

pub use chart::{render_charts, ChartSet};
pub use pdf::{write_pdf, Layout};
pub use record::{read_csv, Record};
pub use report::{Report, TOP_N};
pub use usd::Usd;
