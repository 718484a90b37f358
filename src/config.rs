use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub booking_timeout_secs: u64,
    pub city_suggest_url: String,
    pub city_suggest_timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set"),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a number"),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            booking_timeout_secs: env::var("BOOKING_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("BOOKING_TIMEOUT_SECS must be a number"),
            city_suggest_url: env::var("CITY_SUGGEST_URL")
                .unwrap_or_else(|_| "https://photon.komoot.io/api".to_string()),
            city_suggest_timeout_ms: env::var("CITY_SUGGEST_TIMEOUT_MS")
                .unwrap_or_else(|_| "2000".to_string())
                .parse()
                .expect("CITY_SUGGEST_TIMEOUT_MS must be a number"),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
