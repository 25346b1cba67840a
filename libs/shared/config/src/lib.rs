use std::env;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_JWT_ISSUER: &str = "clinic-management";
pub const DEFAULT_JWT_AUDIENCE: &str = "clinic-management-api";
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 168;
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@clinic.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Supabase,
}

impl StorageBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "supabase" => Some(Self::Supabase),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_addr: String,
    pub storage_backend: StorageBackend,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_expiry_hours: i64,
    pub admin_email: String,
    pub admin_password: Option<String>,
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            storage_backend: StorageBackend::Memory,
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            jwt_secret: String::new(),
            jwt_issuer: DEFAULT_JWT_ISSUER.to_string(),
            jwt_audience: DEFAULT_JWT_AUDIENCE.to_string(),
            jwt_expiry_hours: DEFAULT_JWT_EXPIRY_HOURS,
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            admin_password: None,
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => StorageBackend::parse(&value).unwrap_or_else(|| {
                warn!("Unknown STORAGE_BACKEND '{}', using in-memory store", value);
                StorageBackend::Memory
            }),
            Err(_) => StorageBackend::Memory,
        };

        let jwt_expiry_hours = match env::var("JWT_EXPIRY_HOURS") {
            Ok(value) => value.parse::<i64>().ok().filter(|h| *h > 0).unwrap_or_else(|| {
                warn!("Invalid JWT_EXPIRY_HOURS '{}', using default", value);
                DEFAULT_JWT_EXPIRY_HOURS
            }),
            Err(_) => DEFAULT_JWT_EXPIRY_HOURS,
        };

        let config = Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or(defaults.server_addr),
            storage_backend,
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    if storage_backend == StorageBackend::Supabase {
                        warn!("SUPABASE_URL not set, using empty value");
                    }
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_ROLE_KEY")
                .unwrap_or_else(|_| {
                    if storage_backend == StorageBackend::Supabase {
                        warn!("SUPABASE_SERVICE_ROLE_KEY not set, using empty value");
                    }
                    String::new()
                }),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or(defaults.jwt_issuer),
            jwt_audience: env::var("JWT_AUDIENCE").unwrap_or(defaults.jwt_audience),
            jwt_expiry_hours,
            admin_email: env::var("ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
            log_dir: env::var("LOG_DIR").map(PathBuf::from).unwrap_or(defaults.log_dir),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        let storage_ready = match self.storage_backend {
            StorageBackend::Memory => true,
            StorageBackend::Supabase => {
                !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
            }
        };

        storage_ready && !self.jwt_secret.is_empty()
    }

    pub fn is_supabase_backend(&self) -> bool {
        self.storage_backend == StorageBackend::Supabase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_storage_backend_case_insensitively() {
        assert_eq!(StorageBackend::parse("Supabase"), Some(StorageBackend::Supabase));
        assert_eq!(StorageBackend::parse(" memory "), Some(StorageBackend::Memory));
        assert_eq!(StorageBackend::parse("postgres"), None);
    }

    #[test]
    fn memory_backend_only_needs_jwt_secret() {
        let mut config = AppConfig::default();
        assert!(!config.is_configured());

        config.jwt_secret = "secret".to_string();
        assert!(config.is_configured());

        config.storage_backend = StorageBackend::Supabase;
        assert!(!config.is_configured());

        config.supabase_url = "http://localhost:54321".to_string();
        config.supabase_service_key = "service-key".to_string();
        assert!(config.is_configured());
    }

    #[test]
    fn default_expiry_is_seven_days() {
        assert_eq!(AppConfig::default().jwt_expiry_hours, 7 * 24);
    }
}
