pub mod catalog;
pub mod estimate;
pub mod links;
pub mod search;
pub mod setup;
pub mod show;
pub mod ui;
