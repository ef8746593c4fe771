use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Nobat";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Avatar reference every profile starts with, relative to the media dir.
pub const DEFAULT_AVATAR: &str = "avatar.svg";

/// PBKDF2 rounds for password hashing.
pub const PASSWORD_HASH_ROUNDS: u32 = 10_000;

/// Default log filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory.
/// ~/Nobat/ by default, overridable with NOBAT_DATA_DIR.
pub fn app_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("NOBAT_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Nobat")
}

/// Path of the clinic database file.
pub fn database_path() -> PathBuf {
    app_data_dir().join("clinic.db")
}

/// Directory for stored media (avatars).
pub fn media_dir() -> PathBuf {
    app_data_dir().join("media")
}

/// Address the HTTP server binds to (NOBAT_BIND, default 127.0.0.1:8600).
pub fn bind_addr() -> SocketAddr {
    std::env::var("NOBAT_BIND")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8600)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_path_under_data_dir() {
        let db = database_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("clinic.db"));
    }

    #[test]
    fn media_dir_under_data_dir() {
        let media = media_dir();
        assert!(media.starts_with(app_data_dir()));
        assert!(media.ends_with("media"));
    }

    #[test]
    fn default_bind_is_loopback() {
        if std::env::var("NOBAT_BIND").is_err() {
            assert!(bind_addr().ip().is_loopback());
        }
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }
}
