//! Small helpers shared by every crate.

/// Shorten a secret for log output, keeping only a short prefix.
///
/// ```
/// assert_eq!(fmdata_domain::utils::redact("0123456789abcdef"), "012345…");
/// assert_eq!(fmdata_domain::utils::redact("abc"), "***");
/// ```
#[must_use]
pub fn redact(secret: &str) -> String {
    const VISIBLE: usize = 6;

    if secret.chars().count() <= VISIBLE {
        return "***".to_string();
    }
    let prefix: String = secret.chars().take(VISIBLE).collect();
    format!("{prefix}…")
}
