use regex_lite::Regex;
use std::sync::LazyLock;

/// Prefix every stored avatar path starts with.
pub const AVATAR_PATH_PREFIX: &str = "Storage/images";

/// URL path the storage directory is served under.
pub const UPLOADS_ROUTE: &str = "/uploads";

// last path segment, ignoring any query or fragment
static FILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/([^/?#]+)[^/]*$").expect("file name pattern is valid"));

/// Filename component of a stored avatar path, `None` for an empty avatar.
pub fn avatar_file_name(avatar: &str) -> Option<&str> {
    let avatar = avatar.trim();
    if avatar.is_empty() {
        return None;
    }
    match FILE_NAME.captures(avatar) {
        Some(caps) => caps.get(1).map(|m| m.as_str()),
        None if !avatar.contains('/') => Some(avatar),
        None => None,
    }
}

/// Public URL of the avatar, `None` when the user has none.
pub fn image_url(public_base_url: &str, avatar: &str) -> Option<String> {
    avatar_file_name(avatar)
        .map(|name| format!("{}{}/{}", public_base_url, UPLOADS_ROUTE, name))
}

/// Relative path recorded on the user for a freshly stored file.
pub fn avatar_path(file_name: &str) -> String {
    format!("{}/{}", AVATAR_PATH_PREFIX, file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_from_stored_path() {
        assert_eq!(
            avatar_file_name("Storage/images/1700000000000-ab12.png"),
            Some("1700000000000-ab12.png")
        );
        assert_eq!(avatar_file_name("http://cdn.test/a/b.jpg?v=2"), Some("b.jpg"));
        assert_eq!(avatar_file_name("plain.gif"), Some("plain.gif"));
    }

    #[test]
    fn test_empty_avatar_has_no_file_name() {
        assert_eq!(avatar_file_name(""), None);
        assert_eq!(avatar_file_name("   "), None);
        assert_eq!(avatar_file_name("Storage/images/"), None);
    }

    #[test]
    fn test_image_url() {
        assert_eq!(
            image_url("http://localhost:3000", "Storage/images/john.png").as_deref(),
            Some("http://localhost:3000/uploads/john.png")
        );
        assert_eq!(image_url("http://localhost:3000", ""), None);
    }

    #[test]
    fn test_avatar_path() {
        assert_eq!(avatar_path("x.webp"), "Storage/images/x.webp");
    }
}
