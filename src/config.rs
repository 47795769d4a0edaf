use once_cell::sync::Lazy;
use std::env;

pub static FTP_HOST: Lazy<String> = Lazy::new(|| env::var("FTP_HOST").unwrap_or_default());

pub static FTP_USER: Lazy<String> = Lazy::new(|| env::var("FTP_USER").unwrap_or_default());

pub static FTP_PASSWORD: Lazy<String> =
    Lazy::new(|| env::var("FTP_PASSWORD").unwrap_or_default());

pub static CSV_REMOTE_PATH: Lazy<String> =
    Lazy::new(|| env::var("CSV_REMOTE_PATH").unwrap_or_default());

pub static CSV_LOCAL_FILE: Lazy<String> =
    Lazy::new(|| env::var("CSV_LOCAL_FILE").unwrap_or_else(|_| "giacenze.csv".to_string()));

pub static WC_API_URL: Lazy<String> = Lazy::new(|| env::var("WC_API_URL").unwrap_or_default());

pub static WC_KEY: Lazy<String> = Lazy::new(|| env::var("WC_KEY").unwrap_or_default());

pub static WC_SECRET: Lazy<String> = Lazy::new(|| env::var("WC_SECRET").unwrap_or_default());

pub static ARCHIVE_DIR: Lazy<String> =
    Lazy::new(|| env::var("ARCHIVE_DIR").unwrap_or_else(|_| "archive".to_string()));

pub static ARCHIVE_PREFIX: Lazy<String> =
    Lazy::new(|| env::var("ARCHIVE_PREFIX").unwrap_or_else(|_| "giacenze".to_string()));
