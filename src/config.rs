use std::env;

pub const DEFAULT_THINGSPEAK_URL: &str = "https://api.thingspeak.com/update.json";
pub const DEFAULT_DEVICES_FILE: &str = "devices.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub devices_file: String,
    pub thingspeak_url: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Load environment variables
        dotenv::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL environment variable not set")?;

        let devices_file =
            env::var("DEVICES_FILE").unwrap_or_else(|_| DEFAULT_DEVICES_FILE.to_string());

        let thingspeak_url =
            env::var("THINGSPEAK_URL").unwrap_or_else(|_| DEFAULT_THINGSPEAK_URL.to_string());

        Ok(AppConfig {
            database_url,
            devices_file,
            thingspeak_url,
        })
    }
}
