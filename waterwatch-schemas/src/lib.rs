pub mod control;
pub mod file_formats;
pub mod parameter;
pub mod policy;
pub mod reading;
