// config.rs
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    pub environment: String,
    // SMS gateway configurations
    pub sms_username: String,
    pub sms_api_key: String,
    pub sms_sender_id: String,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE").expect("JWT_MAXAGE must be set");

        let environment =
            std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        // SMS gateway configurations (with defaults for development)
        let sms_username = std::env::var("SMS_USERNAME").unwrap_or_else(|_| "sandbox".to_string());
        let sms_api_key = std::env::var("SMS_API_KEY").unwrap_or_else(|_| "".to_string());
        let sms_sender_id =
            std::env::var("SMS_SENDER_ID").unwrap_or_else(|_| "JUAKAZI".to_string());

        Config {
            database_url,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().unwrap(),
            port: 8000,
            environment,
            sms_username,
            sms_api_key,
            sms_sender_id,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
