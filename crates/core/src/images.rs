//! Profile image defaults and repair rules.

/// Image assigned to accounts that never uploaded one.
pub const DEFAULT_PROFILE_IMAGE: &str =
    "https://res.cloudinary.com/daacjyk3d/image/upload/v1740376690/fitnessApp/gfo0vamcfcurte2gc4jk.jpg";

/// If `url` points into the local upload directory (`{prefix}/<file>`),
/// return the file name.
pub fn local_upload_file<'a>(url: &'a str, public_prefix: &str) -> Option<&'a str> {
    let prefix = public_prefix.trim_end_matches('/');
    let rest = url.strip_prefix(prefix)?.strip_prefix('/')?;
    if rest.is_empty() || rest.contains('/') || rest.contains("..") {
        return None;
    }
    Some(rest)
}

/// Whether a stored image reference should be reset to the default.
///
/// `local_exists` is consulted only for local upload references.
pub fn needs_repair(
    url: Option<&str>,
    public_prefix: &str,
    local_exists: impl Fn(&str) -> bool,
) -> bool {
    match url.map(str::trim) {
        None | Some("") => true,
        Some(u) => match local_upload_file(u, public_prefix) {
            Some(file) => !local_exists(file),
            None => false,
        },
    }
}
