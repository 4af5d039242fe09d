pub mod bubbles;
pub mod db;
pub mod scoring;
pub mod session;
pub mod settings;
