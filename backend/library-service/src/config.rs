/// Configuration management for the Library Service
///
/// All settings come from environment variables (a `.env` file is loaded by
/// the binary before this runs).
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Document store configuration
    pub store: StoreConfig,
    /// Feed pagination settings
    pub feed: FeedConfig,
    /// Course listing and department grid settings
    pub catalog: CatalogConfig,
    /// Ad selection settings
    pub ads: AdsConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Appwrite,
    Memory,
}

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub endpoint: String,
    pub project_id: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub database_id: String,
    pub posts_collection: String,
    pub courses_collection: String,
    pub ads_collection: String,
    pub bucket_id: String,
    pub request_timeout_ms: u64,
}

/// Feed pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub timeline_page_size: u32,
    pub pdf_page_size: u32,
    pub max_page_size: u32,
    /// Distance from the bottom of the document that triggers the next page
    pub scroll_threshold_px: f64,
}

/// Course listing and department grid settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Grid rows, in display order
    pub departments: Vec<String>,
    /// Courses shown on the home page
    pub recent_limit: u32,
    /// Courses loaded per department row page
    pub row_page_size: u32,
}

/// Ad selection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdsConfig {
    /// 1-in-N interstitial odds on the home page
    pub home_odds: usize,
    /// 1-in-N interstitial odds on a course page
    pub course_odds: usize,
    /// 1-in-N interstitial odds on the all-courses page
    pub all_courses_odds: usize,
    /// Dwell time of image creatives in carousels
    pub image_dwell_ms: u64,
    /// Number of active campaigns fetched per pool refresh
    pub active_limit: u32,
    /// Creatives per carousel slot group
    pub slot_size: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            timeline_page_size: 5,
            pdf_page_size: 10,
            max_page_size: 100,
            scroll_threshold_px: 200.0,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            departments: [
                "Mechanical Engineering",
                "Electrical Engineering",
                "Civil Engineering",
                "Computer Engineering",
                "Chemical Engineering",
                "Petroleum Engineering",
                "Agricultural Engineering",
                "Marine Engineering",
            ]
            .iter()
            .map(|d| d.to_string())
            .collect(),
            recent_limit: 15,
            row_page_size: 5,
        }
    }
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            home_odds: 3,
            course_odds: 5,
            all_courses_odds: 3,
            image_dwell_ms: 4_000,
            active_limit: 10,
            slot_size: 6,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let feed_defaults = FeedConfig::default();
        let catalog_defaults = CatalogConfig::default();
        let ads_defaults = AdsConfig::default();

        let backend = match std::env::var("DOCUMENT_STORE")
            .unwrap_or_else(|_| "appwrite".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "appwrite" => StoreBackend::Appwrite,
            "memory" if production => {
                return Err("DOCUMENT_STORE=memory is not allowed in production".to_string())
            }
            "memory" => StoreBackend::Memory,
            other => return Err(format!("Unknown DOCUMENT_STORE '{}'", other)),
        };

        let config = Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("LIBRARY_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("LIBRARY_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            store: StoreConfig {
                backend,
                endpoint: std::env::var("APPWRITE_ENDPOINT")
                    .unwrap_or_else(|_| "https://cloud.appwrite.io/v1".to_string()),
                project_id: std::env::var("APPWRITE_PROJECT_ID").unwrap_or_default(),
                api_key: std::env::var("APPWRITE_API_KEY").ok().filter(|k| !k.is_empty()),
                database_id: std::env::var("APPWRITE_DATABASE_ID")
                    .unwrap_or_else(|_| "ed-library".to_string()),
                posts_collection: std::env::var("APPWRITE_POSTS_COLLECTION")
                    .unwrap_or_else(|_| "posts".to_string()),
                courses_collection: std::env::var("APPWRITE_COURSES_COLLECTION")
                    .unwrap_or_else(|_| "courses".to_string()),
                ads_collection: std::env::var("APPWRITE_ADS_COLLECTION")
                    .unwrap_or_else(|_| "ads".to_string()),
                bucket_id: std::env::var("APPWRITE_BUCKET_ID")
                    .unwrap_or_else(|_| "notes".to_string()),
                request_timeout_ms: parse_env_or_default("APPWRITE_TIMEOUT_MS", 10_000)?,
            },
            feed: FeedConfig {
                timeline_page_size: parse_env_or_default(
                    "FEED_TIMELINE_PAGE_SIZE",
                    feed_defaults.timeline_page_size,
                )?,
                pdf_page_size: parse_env_or_default("FEED_PDF_PAGE_SIZE", feed_defaults.pdf_page_size)?,
                max_page_size: parse_env_or_default("FEED_MAX_PAGE_SIZE", feed_defaults.max_page_size)?,
                scroll_threshold_px: parse_env_or_default(
                    "FEED_SCROLL_THRESHOLD_PX",
                    feed_defaults.scroll_threshold_px,
                )?,
            },
            catalog: CatalogConfig {
                departments: match std::env::var("CATALOG_DEPARTMENTS") {
                    Ok(value) => value
                        .split(',')
                        .map(str::trim)
                        .filter(|d| !d.is_empty())
                        .map(String::from)
                        .collect(),
                    Err(_) => catalog_defaults.departments,
                },
                recent_limit: parse_env_or_default(
                    "CATALOG_RECENT_LIMIT",
                    catalog_defaults.recent_limit,
                )?,
                row_page_size: parse_env_or_default(
                    "CATALOG_ROW_PAGE_SIZE",
                    catalog_defaults.row_page_size,
                )?,
            },
            ads: AdsConfig {
                home_odds: parse_env_or_default("ADS_HOME_ODDS", ads_defaults.home_odds)?,
                course_odds: parse_env_or_default("ADS_COURSE_ODDS", ads_defaults.course_odds)?,
                all_courses_odds: parse_env_or_default(
                    "ADS_ALL_COURSES_ODDS",
                    ads_defaults.all_courses_odds,
                )?,
                image_dwell_ms: parse_env_or_default("ADS_IMAGE_DWELL_MS", ads_defaults.image_dwell_ms)?,
                active_limit: parse_env_or_default("ADS_ACTIVE_LIMIT", ads_defaults.active_limit)?,
                slot_size: parse_env_or_default("ADS_SLOT_SIZE", ads_defaults.slot_size)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.store.backend == StoreBackend::Appwrite && self.store.project_id.trim().is_empty() {
            return Err("APPWRITE_PROJECT_ID must be set when DOCUMENT_STORE=appwrite".to_string());
        }
        for (name, size) in [
            ("FEED_TIMELINE_PAGE_SIZE", self.feed.timeline_page_size),
            ("FEED_PDF_PAGE_SIZE", self.feed.pdf_page_size),
            ("CATALOG_RECENT_LIMIT", self.catalog.recent_limit),
            ("CATALOG_ROW_PAGE_SIZE", self.catalog.row_page_size),
        ] {
            if size == 0 || size > self.feed.max_page_size {
                return Err(format!(
                    "{} must be between 1 and {}",
                    name, self.feed.max_page_size
                ));
            }
        }
        for (name, odds) in [
            ("ADS_HOME_ODDS", self.ads.home_odds),
            ("ADS_COURSE_ODDS", self.ads.course_odds),
            ("ADS_ALL_COURSES_ODDS", self.ads.all_courses_odds),
        ] {
            if odds == 0 {
                return Err(format!("{} must be at least 1", name));
            }
        }
        Ok(())
    }

    /// Configuration for tests and local runs against the in-memory store
    pub fn in_memory() -> Self {
        Config {
            app: AppConfig {
                env: "test".to_string(),
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            cors: CorsConfig {
                allowed_origins: "http://localhost:3000".to_string(),
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                endpoint: "http://localhost/v1".to_string(),
                project_id: "local".to_string(),
                api_key: None,
                database_id: "ed-library".to_string(),
                posts_collection: "posts".to_string(),
                courses_collection: "courses".to_string(),
                ads_collection: "ads".to_string(),
                bucket_id: "notes".to_string(),
                request_timeout_ms: 1_000,
            },
            feed: FeedConfig::default(),
            catalog: CatalogConfig::default(),
            ads: AdsConfig::default(),
        }
    }
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}
