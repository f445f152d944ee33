use crate::domain::slot::{SlotSchedule, parse_time};

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,https://da-pakino.vercel.app";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub google_client_id: Option<String>,
    pub cors_origins: Vec<String>,
    pub slots: SlotSchedule,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = var("PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let database_url = var("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let jwt_secret = var("JWT_SECRET").ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let jwt_ttl_hours = var("JWT_TTL_HOURS")
            .unwrap_or_else(|| "24".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid JWT_TTL_HOURS: {}", e))?;
        let google_client_id = var("GOOGLE_CLIENT_ID").filter(|s| !s.trim().is_empty());
        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let open = parse_time(&var("SLOT_OPEN").unwrap_or_else(|| "18:30".into()))
            .map_err(|e| anyhow::anyhow!("invalid SLOT_OPEN: {}", e))?;
        let close = parse_time(&var("SLOT_CLOSE").unwrap_or_else(|| "22:30".into()))
            .map_err(|e| anyhow::anyhow!("invalid SLOT_CLOSE: {}", e))?;
        let step = var("SLOT_STEP_MINUTES")
            .unwrap_or_else(|| "15".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid SLOT_STEP_MINUTES: {}", e))?;
        let capacity = var("SLOT_CAPACITY")
            .unwrap_or_else(|| "5".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid SLOT_CAPACITY: {}", e))?;
        let slots = SlotSchedule::new(open, close, step, capacity)
            .map_err(|e| anyhow::anyhow!("invalid slot schedule: {}", e))?;

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            jwt_ttl_hours,
            google_client_id,
            cors_origins,
            slots,
        })
    }
}
