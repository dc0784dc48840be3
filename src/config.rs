use std::env;

#[derive(Clone)]
pub struct Config {
    pub data_file: String,
    pub crm_base_url: String,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            data_file: env::var("DATA_FILE")
                .unwrap_or_else(|_| "crm_data.json".to_string()),
            crm_base_url: env::var("CRM_BASE_URL")
                .unwrap_or_else(|_| "https://crm.example.com".to_string()),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
