//! Resolves a destination folder ID from a Drive folder URL or a raw ID.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{DriveError, Result};

/// Folder link shapes Drive hands out, each capturing the folder ID.
static FOLDER_LINK_REGEXES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"^https?://drive\.google\.com/drive/(?:u/\d+/)?folders/([a-zA-Z0-9_-]+)")
            .expect("Invalid folder link regex"),
        Regex::new(r"^https?://drive\.google\.com/open\?id=([a-zA-Z0-9_-]+)")
            .expect("Invalid open link regex"),
    ]
});

static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("Invalid ID regex"));

/// Extract a folder ID from a Drive folder link, or validate a raw ID.
///
/// ```
/// use drive_upload::url_parser::extract_folder_id;
///
/// let id = extract_folder_id("https://drive.google.com/drive/u/1/folders/1abc?usp=sharing").unwrap();
/// assert_eq!(id, "1abc");
/// assert_eq!(extract_folder_id("1abc").unwrap(), "1abc");
/// ```
pub fn extract_folder_id(link_or_id: &str) -> Result<String> {
    let trimmed = link_or_id.trim();

    let from_link = FOLDER_LINK_REGEXES
        .iter()
        .find_map(|re| re.captures(trimmed))
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string());

    match from_link {
        Some(id) => Ok(id),
        None if ID_REGEX.is_match(trimmed) => Ok(trimmed.to_string()),
        None => Err(DriveError::InvalidUrlOrId(link_or_id.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_link() {
        let url = "https://drive.google.com/drive/folders/1abc123XYZ";
        assert_eq!(extract_folder_id(url).unwrap(), "1abc123XYZ");
    }

    #[test]
    fn test_open_link() {
        let url = "https://drive.google.com/open?id=1abc123XYZ";
        assert_eq!(extract_folder_id(url).unwrap(), "1abc123XYZ");
    }

    #[test]
    fn test_file_link_rejected() {
        let url = "https://drive.google.com/file/d/1abc123XYZ/view";
        assert!(extract_folder_id(url).is_err());
    }

    #[test]
    fn test_blank_rejected() {
        assert!(extract_folder_id("").is_err());
        assert!(extract_folder_id("  ").is_err());
    }
}
