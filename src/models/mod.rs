pub mod bubble;
pub mod chart;
pub mod dashboard;
pub mod level;
pub mod session;
pub mod stats;
