use crate::models::report::csv::ExportVariant;

/// Runtime configuration, resolved once at startup from the environment
/// (after `dotenvy` has loaded any `.env` file).
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_path: String,
    pub export_variant: ExportVariant,
    pub operator_username: String,
    pub operator_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "data/haajri.db".to_string());
        let export_variant = match std::env::var("EXPORT_VARIANT").as_deref() {
            Ok("rich") => ExportVariant::Rich,
            Ok("standard") | Err(_) => ExportVariant::Standard,
            Ok(other) => {
                log::warn!("Unknown EXPORT_VARIANT '{other}', using standard");
                ExportVariant::Standard
            }
        };
        let operator_username =
            std::env::var("OPERATOR_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let operator_password = std::env::var("OPERATOR_PASSWORD").ok();

        Config {
            bind_addr,
            database_path,
            export_variant,
            operator_username,
            operator_password,
        }
    }
}
