use sqlbridge_core::err::Result;
pub use env_logger::{init, init_from_env};
pub use log::*;

mod limiting;
pub use limiting::*;
mod warn_once;
pub use warn_once::*;

/// Configures the logger for the process
pub fn init_logging() -> Result<()> {
    env_logger::try_init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    )?;
    Ok(())
}

/// Logging init function for tests
pub fn init_for_tests() {
    let res = env_logger::builder()
        .filter_module("sqlbridge", LevelFilter::Trace)
        .is_test(true)
        .try_init();
    if let Err(err) = res {
        eprintln!("Failed to init logging: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_for_tests_twice() {
        init_for_tests();
        init_for_tests();

        assert!(init_logging().is_err());
    }
}
