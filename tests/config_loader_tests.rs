use directory::config::{ConfigError, ConfigLoader};
use std::{
    env, fs,
    path::PathBuf,
    sync::{Mutex, MutexGuard, OnceLock},
};
use tempfile::TempDir;

const KEYS: &[&str] = &[
    "DIRECTORY_PROFILE",
    "DIRECTORY_API_BIND_ADDR",
    "DIRECTORY_LOG_LEVEL",
    "DIRECTORY_DATABASE_URL",
    "DIRECTORY_PAGE_SIZE",
    "DIRECTORY_MAX_UPLOAD_KB",
    "DIRECTORY_RUN_MIGRATIONS",
    "DIRECTORY_PUBLIC_ASSET_BASE_URL",
];

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn env_guard() -> MutexGuard<'static, ()> {
    env_lock()
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

fn clear_env() {
    for key in KEYS {
        unsafe {
            env::remove_var(key);
        }
    }
}

fn write_env_file(dir: &TempDir, name: &str, contents: &str) {
    let path = dir.path().join(name);
    fs::write(path, contents).unwrap();
}

fn empty_dir_loader() -> (TempDir, ConfigLoader) {
    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    (temp_dir, loader)
}

#[test]
fn loads_defaults_when_no_env_present() {
    let _guard = env_guard();
    clear_env();

    let (_dir, loader) = empty_dir_loader();
    let cfg = loader.load().expect("config loads with defaults");

    assert_eq!(cfg.profile, "local");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:8080");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.page_size, 5);
    assert_eq!(cfg.max_upload_kb, 2048);
    assert_eq!(cfg.public_asset_base_url, "/storage");
    assert!(cfg.run_migrations);
    cfg.bind_addr().expect("default bind addr parses");
    clear_env();
}

#[test]
fn layered_env_files_apply_in_order() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "DIRECTORY_API_BIND_ADDR=127.0.0.1:3000\n");
    write_env_file(
        &temp_dir,
        ".env.test",
        "DIRECTORY_API_BIND_ADDR=192.168.0.10:5000\nDIRECTORY_PAGE_SIZE=10\n",
    );
    write_env_file(
        &temp_dir,
        ".env.test.local",
        "DIRECTORY_API_BIND_ADDR=10.0.0.5:6000\n",
    );

    // Select profile via .env.local before profile-specific files load.
    write_env_file(
        &temp_dir,
        ".env.local",
        "DIRECTORY_PROFILE=test\nDIRECTORY_API_BIND_ADDR=127.0.0.1:4000\n",
    );

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with layered env files");

    assert_eq!(cfg.profile, "test");
    assert_eq!(cfg.api_bind_addr, "10.0.0.5:6000");
    assert_eq!(cfg.page_size, 10);
    clear_env();
}

#[test]
fn os_environment_has_highest_precedence() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "DIRECTORY_API_BIND_ADDR=127.0.0.1:3000\nDIRECTORY_RUN_MIGRATIONS=true\n",
    );

    unsafe {
        env::set_var("DIRECTORY_API_BIND_ADDR", "0.0.0.0:9090");
        env::set_var("DIRECTORY_RUN_MIGRATIONS", "false");
    }

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with env override");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:9090");
    assert!(!cfg.run_migrations);

    clear_env();
}

#[test]
fn invalid_bind_addr_returns_error() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("DIRECTORY_API_BIND_ADDR", "not-an-addr");
    }
    let (_dir, loader) = empty_dir_loader();
    let err = loader.load().expect_err("invalid bind addr should fail");
    assert!(format!("{}", err).contains("invalid api bind address"));

    clear_env();
}

#[test]
fn unparsable_number_names_the_key() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("DIRECTORY_MAX_UPLOAD_KB", "lots");
    }
    let (_dir, loader) = empty_dir_loader();
    let err = loader.load().expect_err("non-numeric upload limit should fail");
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            key: "MAX_UPLOAD_KB",
            ..
        }
    ));

    clear_env();
}

#[test]
fn page_size_above_cap_is_rejected() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("DIRECTORY_PAGE_SIZE", "500");
    }
    let (_dir, loader) = empty_dir_loader();
    let err = loader.load().expect_err("oversized page size should fail");
    assert!(matches!(err, ConfigError::InvalidPageSize { value: 500 }));

    clear_env();
}
