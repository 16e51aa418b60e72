// defmt needs the target's linker script, hosted builds drop the log calls.

macro_rules! debug {
    ($($arg:tt)*) => {
        #[cfg(target_os = "none")]
        defmt::debug!($($arg)*);
    };
}

macro_rules! info {
    ($($arg:tt)*) => {
        #[cfg(target_os = "none")]
        defmt::info!($($arg)*);
    };
}

macro_rules! warn {
    ($($arg:tt)*) => {
        #[cfg(target_os = "none")]
        defmt::warn!($($arg)*);
    };
}
