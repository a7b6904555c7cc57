/// An image as the client supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    /// Multipart file field.
    File {
        file_name: Option<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
    /// `data:image/...;base64,...` string.
    DataUrl(String),
    /// An `http(s)` URL that is already hosted and is stored as-is.
    HostedUrl(String),
}

impl ImageInput {
    /// Classify a text value from a form field or JSON body.
    ///
    /// Returns `None` for blank values and for anything that is neither a
    /// data URL nor an absolute `http(s)` URL (such as a relative path the
    /// client echoed back), which callers treat as "no new image".
    pub fn from_text(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.starts_with("data:") {
            Some(Self::DataUrl(value.to_string()))
        } else if value.starts_with("https://") || value.starts_with("http://") {
            Some(Self::HostedUrl(value.to_string()))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_text_values() {
        assert_eq!(
            ImageInput::from_text(" data:image/png;base64,AAAA "),
            Some(ImageInput::DataUrl("data:image/png;base64,AAAA".into()))
        );
        assert_eq!(
            ImageInput::from_text("https://res.cloudinary.com/x.jpg"),
            Some(ImageInput::HostedUrl("https://res.cloudinary.com/x.jpg".into()))
        );
        assert_eq!(ImageInput::from_text(""), None);
        assert_eq!(ImageInput::from_text("/uploads/abc.png"), None);
    }
}
