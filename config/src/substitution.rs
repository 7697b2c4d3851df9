//! System variable substitution for text documents such as test profiles.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static SYSTEM_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{env\.(.*?)\}").expect("static system variable pattern"));

/// Replace every `${env.NAME}` whose variable is set; leave the rest as written.
pub fn populate_system_variables(text: &str) -> String {
    SYSTEM_VARIABLE
        .replace_all(text, |caps: &Captures<'_>| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}
