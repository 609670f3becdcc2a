use std::borrow::Cow;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use camino::{Utf8Path as Path, Utf8PathBuf as PathBuf};
use tracing::{debug, instrument, warn};

use crate::model::{
    repository::{asset::AssetStore, CatalogError, CatalogResult},
    util::round_to_hundredths,
    Asset, NewAsset,
};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadContents {
    Bytes(Vec<u8>),
    /// Read when the file is converted
    Path(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub contents: UploadContents,
}

impl UploadFile {
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        UploadFile {
            name: name.into(),
            mime_type: mime_type.into(),
            contents: UploadContents::Bytes(bytes),
        }
    }

    /// MIME type is guessed from the extension, the file is read lazily.
    pub fn from_path(path: &Path) -> Self {
        let mime_type = guess_mime_type_path(path)
            .unwrap_or(Cow::Borrowed("application/octet-stream"))
            .into_owned();
        UploadFile {
            name: path.file_name().unwrap_or(path.as_str()).to_owned(),
            mime_type,
            contents: UploadContents::Path(path.to_owned()),
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    fn read(&self) -> CatalogResult<Cow<'_, [u8]>> {
        match &self.contents {
            UploadContents::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            UploadContents::Path(path) => std::fs::read(path)
                .map(Cow::Owned)
                .map_err(|source| CatalogError::Upload {
                    name: self.name.clone(),
                    source,
                }),
        }
    }

    /// Contents as a base64 `data:` URL plus size in megabytes.
    pub fn to_data_url(&self) -> CatalogResult<(String, f64)> {
        let bytes = self.read()?;
        let url = format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&bytes));
        let size = round_to_hundredths(bytes.len() as f64 / BYTES_PER_MB);
        Ok((url, size))
    }
}

/// Adds every image in `files` to the asset store, skipping anything that is
/// not an image. Stops at the first file that can't be read; assets added
/// before that stay in the store.
#[instrument(skip(assets, files))]
pub fn upload_files(
    assets: &AssetStore,
    files: impl IntoIterator<Item = UploadFile>,
    folder: &str,
    category: &str,
) -> CatalogResult<Vec<Asset>> {
    let mut uploaded = Vec::new();
    for file in files {
        if !file.is_image() {
            warn!(name = %file.name, mime_type = %file.mime_type, "skipping non-image upload");
            continue;
        }
        let (url, size) = file.to_data_url()?;
        let tags = extract_tags(&file.name);
        let asset = assets.add_asset(NewAsset {
            name: file.name,
            url,
            folder: Some(folder.to_owned()),
            category: Some(category.to_owned()),
            size: Some(size),
            tags: Some(tags),
            description: None,
        })?;
        debug!(id = %asset.id, "uploaded");
        uploaded.push(asset);
    }
    Ok(uploaded)
}

/// Default tags from a file name: lower case, last extension removed, split
/// on `-`, `_` and whitespace, tokens of two characters or fewer dropped.
pub fn extract_tags(filename: &str) -> Vec<String> {
    let lower = filename.to_lowercase();
    let stem = match lower.rfind('.') {
        Some(idx) if idx + 1 < lower.len() && !lower[idx + 1..].contains('/') => &lower[..idx],
        _ => lower.as_str(),
    };
    stem.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|token| token.chars().count() > 2)
        .map(str::to_owned)
        .collect()
}

/// `"512 KB"` below one megabyte, `"2.40 MB"` otherwise.
pub fn format_size(mb: f64) -> String {
    if mb < 1.0 {
        format!("{:.0} KB", mb * 1024.0)
    } else {
        format!("{:.2} MB", mb)
    }
}

pub fn guess_mime_type(file_ext: &str) -> Option<Cow<'static, str>> {
    match file_ext {
        "avif" => Some(Cow::Borrowed("image/avif")),
        "webp" => Some(Cow::Borrowed("image/webp")),
        "jpg" | "jpeg" => Some(Cow::Borrowed("image/jpeg")),
        "png" => Some(Cow::Borrowed("image/png")),
        "gif" => Some(Cow::Borrowed("image/gif")),
        "svg" => Some(Cow::Borrowed("image/svg+xml")),
        "heif" => Some(Cow::Borrowed("image/heif")),
        "heic" => Some(Cow::Borrowed("image/heic")),
        "mp4" => Some(Cow::Borrowed("video/mp4")),
        "pdf" => Some(Cow::Borrowed("application/pdf")),
        "json" => Some(Cow::Borrowed("application/json")),
        _ => None,
    }
}

pub fn guess_mime_type_path(path: &Path) -> Option<Cow<'static, str>> {
    let ext = path.extension()?.to_ascii_lowercase();
    match guess_mime_type(&ext) {
        Some(m) => Some(m),
        None => {
            warn!(
                "can't guess MIME type for filename '{}'",
                path.file_name().unwrap_or_default()
            );
            None
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn tags_from_filename() {
        assert_eq!(
            extract_tags("Copper-Plant_Exterior view.JPG"),
            vec!["copper", "plant", "exterior", "view"]
        );
        assert_eq!(extract_tags("sag-mill.jpg"), vec!["sag", "mill"]);
        assert_eq!(extract_tags("a-bc--def.png"), vec!["def"]);
        assert_eq!(extract_tags("archive.tar.gz"), vec!["archive.tar"]);
        assert_eq!(extract_tags("no_extension"), vec!["extension"]);
        assert!(extract_tags("").is_empty());
    }

    #[test]
    fn trailing_dot_is_not_an_extension() {
        assert_eq!(extract_tags("photo."), vec!["photo."]);
    }

    #[test]
    fn formats_sizes() {
        assert_eq!(format_size(0.5), "512 KB");
        assert_eq!(format_size(2.4), "2.40 MB");
        assert_eq!(format_size(1.0), "1.00 MB");
    }

    #[test]
    fn data_url_and_size() {
        let file = UploadFile::from_bytes("x.png", "image/png", vec![0u8; 1024 * 1024 + 10]);
        let (url, size) = file.to_data_url().unwrap();
        assert!(url.starts_with("data:image/png;base64,AAAA"));
        assert_eq!(size, 1.0);
    }

    #[test]
    fn mime_type_from_path() {
        let file = UploadFile::from_path(Path::new("/tmp/photos/Crusher.JPG"));
        assert_eq!(file.name, "Crusher.JPG");
        assert_eq!(file.mime_type, "image/jpeg");
        assert!(!UploadFile::from_path(Path::new("notes.txt")).is_image());
    }

    proptest! {
        #[test]
        fn extracted_tags_are_long_lowercase_tokens(name in "[A-Za-z0-9 _.-]{0,40}") {
            for tag in extract_tags(&name) {
                prop_assert!(tag.chars().count() > 2);
                prop_assert_eq!(tag.to_lowercase(), tag.clone());
                prop_assert!(!tag.contains(['-', '_', ' ']));
            }
        }
    }
}
