//! Operator-facing report for failed driver resolution.

use std::fmt::Write;

use super::classpath::{Classpath, missing_segments};

/// Command-line switch that overrides the driver path.
pub const DRIVER_PATH_SWITCH: &str = "-dp";
/// Command-line switch that enables sibling artifact loading.
pub const LOAD_SIBLINGS_SWITCH: &str = "-loadjars";

/// Build the report shown when no candidate driver could be created.
///
/// Lists the candidates, the driver path, whether siblings were loaded, the
/// resulting classpath, and any driver path segments missing from disk.
pub fn resolution_message(
    candidates: &[String],
    driver_path: &str,
    load_siblings: bool,
    classpath: &Classpath,
) -> String {
    let mut message = String::new();

    let _ = writeln!(
        message,
        "Failed to create any of '{}' driver from driverPath '{}' with sibling artifacts {}.",
        candidates.join(", "),
        driver_path,
        if load_siblings { "yes" } else { "no" }
    );

    message.push_str("Resulting in classpath:");
    if classpath.is_empty() {
        message.push_str(" empty\n");
    } else {
        message.push('\n');
        for url in classpath.iter() {
            let _ = writeln!(message, "\t{}", url);
        }
    }

    let missing = missing_segments(driver_path);
    if !missing.is_empty() {
        message.push_str("There were missing paths in driverPath:\n");
        for path in &missing {
            let _ = writeln!(message, "\t{}", path);
        }
    }

    if !missing.is_empty() || driver_path.is_empty() {
        let _ = writeln!(
            message,
            "Use commandline option '{}' to specify driver location.",
            DRIVER_PATH_SWITCH
        );
        let _ = write!(
            message,
            "If you need to load sibling artifacts use '{}'",
            LOAD_SIBLINGS_SWITCH
        );
    }

    message
}
