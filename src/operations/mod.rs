pub mod chart;
pub mod dialog;
pub mod entry_form;
pub mod summary;
pub mod tracker;
