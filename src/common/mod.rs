pub mod file_dialog;
pub mod paths;
