//! Input resolution: turn whatever the caller supplied into in-memory data.
//!
//! This is the only stage that touches the file system. Everything after it
//! works on [`LoadedInput`] and is pure. Read failures are classified once,
//! here, so the caller gets `FileNotFound` / `PermissionDenied` instead of a
//! bare `io::Error`.

use crate::error::BrochureError;
use image::ImageFormat;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// The three kinds of input the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Html,
    Image,
    Text,
}

impl InputKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InputKind::Html => "html",
            InputKind::Image => "image",
            InputKind::Text => "text",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputKind {
    type Err = BrochureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(InputKind::Html),
            "image" | "img" => Ok(InputKind::Image),
            "text" | "txt" => Ok(InputKind::Text),
            _ => Err(BrochureError::UnsupportedInputKind {
                kind: s.to_string(),
            }),
        }
    }
}

/// A caller-supplied input, before any I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Path to a local HTML document.
    HtmlFile(PathBuf),
    /// An HTML document already in memory.
    Html(String),
    /// Path to a local image; format comes from the extension.
    ImageFile(PathBuf),
    /// Uploaded image bytes with their declared format (`"png"`,
    /// `"image/jpeg"`, ...). `name` is the original file name, if known.
    Image {
        bytes: Vec<u8>,
        format: String,
        name: Option<String>,
    },
    /// Free-form text describing the business.
    Text(String),
}

impl Input {
    /// Build an input from a kind string and a value: a path for `html` and
    /// `image`, the text itself for `text`.
    pub fn from_kind(kind: &str, value: impl Into<String>) -> Result<Self, BrochureError> {
        let value = value.into();
        Ok(match kind.parse::<InputKind>()? {
            InputKind::Html => Input::HtmlFile(PathBuf::from(value)),
            InputKind::Image => Input::ImageFile(PathBuf::from(value)),
            InputKind::Text => Input::Text(value),
        })
    }

    pub fn kind(&self) -> InputKind {
        match self {
            Input::HtmlFile(_) | Input::Html(_) => InputKind::Html,
            Input::ImageFile(_) | Input::Image { .. } => InputKind::Image,
            Input::Text(_) => InputKind::Text,
        }
    }
}

/// An input whose bytes are in memory and whose format is resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedInput {
    Html(String),
    Image {
        bytes: Vec<u8>,
        format: ImageFormat,
        name: Option<String>,
    },
    Text(String),
}

impl LoadedInput {
    pub fn kind(&self) -> InputKind {
        match self {
            LoadedInput::Html(_) => InputKind::Html,
            LoadedInput::Image { .. } => InputKind::Image,
            LoadedInput::Text(_) => InputKind::Text,
        }
    }
}

/// Read and validate `input`.
pub async fn load(input: &Input) -> Result<LoadedInput, BrochureError> {
    match input {
        Input::HtmlFile(path) => {
            let bytes = read_file(path).await?;
            debug!("Read {} bytes of HTML from {}", bytes.len(), path.display());
            // Invalid UTF-8 sequences are replaced rather than rejected.
            Ok(LoadedInput::Html(String::from_utf8_lossy(&bytes).into_owned()))
        }
        Input::Html(html) => Ok(LoadedInput::Html(html.clone())),
        Input::ImageFile(path) => {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default();
            let format = parse_image_format(ext)?;
            let bytes = read_file(path).await?;
            debug!("Read {} bytes of image from {}", bytes.len(), path.display());
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string);
            Ok(LoadedInput::Image {
                bytes,
                format,
                name,
            })
        }
        Input::Image {
            bytes,
            format,
            name,
        } => Ok(LoadedInput::Image {
            bytes: bytes.clone(),
            format: parse_image_format(format)?,
            name: name.as_deref().map(strip_extension),
        }),
        Input::Text(text) => Ok(LoadedInput::Text(text.clone())),
    }
}

/// Resolve a declared image format: an extension (`png`, `.jpg`) or a MIME
/// type (`image/jpeg`). Only formats the crate can decode are accepted.
pub fn parse_image_format(declared: &str) -> Result<ImageFormat, BrochureError> {
    let s = declared.trim().trim_start_matches('.').to_ascii_lowercase();
    let format = if s.contains('/') {
        ImageFormat::from_mime_type(&s)
    } else {
        ImageFormat::from_extension(&s)
    };
    match format {
        Some(f @ (ImageFormat::Png | ImageFormat::Jpeg)) => Ok(f),
        _ => Err(BrochureError::UnsupportedImageFormat {
            format: declared.to_string(),
        }),
    }
}

fn strip_extension(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
        .to_string()
}

async fn read_file(path: &Path) -> Result<Vec<u8>, BrochureError> {
    tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => BrochureError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => BrochureError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => BrochureError::Unreadable {
            path: path.to_path_buf(),
            detail: e.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    #[test]
    fn input_kind_parsing() {
        assert_eq!("html".parse::<InputKind>().unwrap(), InputKind::Html);
        assert_eq!(" Image ".parse::<InputKind>().unwrap(), InputKind::Image);
        assert_eq!("TEXT".parse::<InputKind>().unwrap(), InputKind::Text);

        let err = "pdf".parse::<InputKind>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedInputKind);
    }

    #[test]
    fn from_kind_builds_matching_variant() {
        assert_eq!(
            Input::from_kind("html", "site/index.html").unwrap(),
            Input::HtmlFile(PathBuf::from("site/index.html"))
        );
        assert_eq!(
            Input::from_kind("text", "Great Coffee").unwrap(),
            Input::Text("Great Coffee".into())
        );
        assert!(Input::from_kind("video", "x.mp4").is_err());
    }

    #[test]
    fn image_format_accepts_extensions_and_mime() {
        assert_eq!(parse_image_format("png").unwrap(), ImageFormat::Png);
        assert_eq!(parse_image_format(".JPG").unwrap(), ImageFormat::Jpeg);
        assert_eq!(parse_image_format("image/jpeg").unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn image_format_rejects_unknown() {
        for bad in ["tiff", "", "application/pdf", "gif"] {
            let err = parse_image_format(bad).unwrap_err();
            assert!(
                matches!(err, BrochureError::UnsupportedImageFormat { .. }),
                "{bad}: {err}"
            );
        }
    }

    #[tokio::test]
    async fn missing_html_file_is_file_not_found() {
        let err = load(&Input::HtmlFile("/definitely/not/here.html".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, BrochureError::FileNotFound { .. }), "{err}");
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[tokio::test]
    async fn html_file_is_read_lossily() {
        let mut file = tempfile::Builder::new().suffix(".html").tempfile().unwrap();
        file.write_all(b"<h1>Caf\xff</h1>").unwrap();

        let loaded = load(&Input::HtmlFile(file.path().to_path_buf()))
            .await
            .unwrap();
        match loaded {
            LoadedInput::Html(html) => assert!(html.starts_with("<h1>Caf")),
            other => panic!("expected html, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&Input::HtmlFile(dir.path().to_path_buf()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input, "{err}");
    }

    #[tokio::test]
    async fn uploaded_image_name_loses_extension() {
        let loaded = load(&Input::Image {
            bytes: vec![0; 4],
            format: "image/png".into(),
            name: Some("acme_cloud-logo.png".into()),
        })
        .await
        .unwrap();
        match loaded {
            LoadedInput::Image { format, name, .. } => {
                assert_eq!(format, ImageFormat::Png);
                assert_eq!(name.as_deref(), Some("acme_cloud-logo"));
            }
            other => panic!("expected image, got {other:?}"),
        }
    }
}
