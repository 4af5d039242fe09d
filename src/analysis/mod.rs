pub mod activity;
pub mod feed;
pub mod geometry;
pub mod heatmap;
pub mod level;
pub mod xp;
