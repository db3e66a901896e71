pub mod logger_config;
pub mod shim_config;
