use std::env;
use std::path::PathBuf;

pub const ADDR_VAR: &str = "BLOG_ADDR";
pub const POSTS_FILE_VAR: &str = "BLOG_POSTS_FILE";

const DEFAULT_ADDR: &str = "localhost:3000";
const DEFAULT_POSTS_FILE: &str = "blog_posts.json";

/// Where to listen and where to keep posts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub addr: String,
    pub posts_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Config {
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any variable source. Unset or empty variables
    /// take their default.
    pub fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Config {
            addr: var(ADDR_VAR, DEFAULT_ADDR),
            posts_file: PathBuf::from(var(POSTS_FILE_VAR, DEFAULT_POSTS_FILE)),
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::from_lookup(|_| None)
    }
}
