pub mod readings;
pub mod sender;
pub mod server;
pub mod storage;

use dotenvy::dotenv;
use std::env;

const SUPABASE_URL: &str = "SUPABASE_URL";
const SUPABASE_KEY: &str = "SUPABASE_ANON_KEY";

pub struct StorageSettings {
    pub url: String,
    pub api_key: String,
}

pub fn get_storage_settings() -> StorageSettings {
    dotenv().ok();
    StorageSettings {
        url: env::var(SUPABASE_URL).expect("SUPABASE_URL must be set"),
        api_key: env::var(SUPABASE_KEY).expect("SUPABASE_ANON_KEY must be set"),
    }
}
