use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    pub question_bank_url: String,
    pub generative_api_url: String,
    pub generative_model: String,
    pub gemini_api_key: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load environment variables from a local .env file if present
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let config_builder = config::Config::builder()
            // Load base config from TOML file
            .add_source(
                config::File::with_name(&format!("config/{}", env)).required(false), // Allow missing config file, fallback to ENV
            )
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let settings = config_builder.build()?;

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| "0.0.0.0:8081".to_string());

        let question_bank_url = settings
            .get_string("question_bank.url")
            .or_else(|_| env::var("QUESTION_BANK_URL"))
            .unwrap_or_else(|_| "https://www.qbreader.org/api".to_string());

        let generative_api_url = settings
            .get_string("generative.url")
            .or_else(|_| env::var("GENERATIVE_API_URL"))
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string());

        let generative_model = settings
            .get_string("generative.model")
            .or_else(|_| env::var("GENERATIVE_MODEL"))
            .unwrap_or_else(|_| "gemini-2.0-flash".to_string());

        // The key is optional: without it the explanation endpoint answers
        // with a configuration warning instead of refusing to start.
        let gemini_api_key = settings
            .get_string("generative.api_key")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        if gemini_api_key.is_none() {
            eprintln!("WARNING: GEMINI_API_KEY is not set, explanations will be disabled");
        }

        Ok(Config {
            bind_addr,
            question_bank_url,
            generative_api_url,
            generative_model,
            gemini_api_key,
        })
    }
}
