/// Constructs a logger for tests. This logger will not print anything to the console, but will instead write to a buffer.
pub fn test_logger() {
    // Ignore double initialisations in tests since tests are ran in parallel.
    let _ = env_logger::builder().is_test(true).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_initialises_twice() {
        test_logger();
        test_logger();
        log::debug!("still logging after the second initialisation");
    }
}
