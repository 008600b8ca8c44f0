//! 証明書画像の受け付け
//!
//! 1ファイル = 1アップロードとして読み込み、バッチ用にフォルダ走査も行う。

use crate::error::{CertVerifyError, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// アップロードされた証明書画像
#[derive(Debug, Clone)]
pub struct Upload {
    pub path: PathBuf,
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// 画像のSHA-256（16進）
    pub sha256: String,
}

impl Upload {
    /// ファイルから読み込み
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(CertVerifyError::FileNotFound(path.display().to_string()));
        }
        if !is_supported_image(path) {
            return Err(CertVerifyError::UnsupportedImage(path.display().to_string()));
        }

        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self::from_bytes(path.to_path_buf(), file_name, bytes))
    }

    pub fn from_bytes(path: PathBuf, file_name: String, bytes: Vec<u8>) -> Self {
        let sha256 = hex::encode(Sha256::digest(&bytes));
        Self {
            path,
            file_name,
            bytes,
            sha256,
        }
    }
}

/// JPG/JPEG/PNG か（大文字小文字を区別しない）
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// フォルダ内の証明書画像を列挙（ファイル名順）
pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(CertVerifyError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut images: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_supported_image(p))
        .collect();

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("a.jpg")));
        assert!(is_supported_image(Path::new("a.JPG")));
        assert!(is_supported_image(Path::new("a.jpeg")));
        assert!(is_supported_image(Path::new("a.Png")));
        assert!(!is_supported_image(Path::new("a.gif")));
        assert!(!is_supported_image(Path::new("a.pdf")));
        assert!(!is_supported_image(Path::new("noext")));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Upload::from_path(Path::new("/nonexistent/cert.png")).unwrap_err();
        assert!(matches!(err, CertVerifyError::FileNotFound(_)));
    }

    #[test]
    fn test_from_path_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cert.gif");
        fs::write(&path, b"GIF89a").unwrap();

        let err = Upload::from_path(&path).unwrap_err();
        assert!(matches!(err, CertVerifyError::UnsupportedImage(_)));
    }

    #[test]
    fn test_from_path_reads_bytes_and_digest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cert.png");
        fs::write(&path, b"abc").unwrap();

        let upload = Upload::from_path(&path).unwrap();
        assert_eq!(upload.file_name, "cert.png");
        assert_eq!(upload.bytes, b"abc");
        assert_eq!(
            upload.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_scan_folder_not_found() {
        let err = scan_folder(Path::new("/nonexistent/folder"), false).unwrap_err();
        assert!(matches!(err, CertVerifyError::FolderNotFound(_)));
    }

    #[test]
    fn test_scan_folder_filters_and_sorts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("c.jpg"), b"x").unwrap();
        fs::write(dir.path().join("a.PNG"), b"x").unwrap();
        fs::write(dir.path().join("b.jpeg"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("d.jpg"), b"x").unwrap();

        let flat = scan_folder(dir.path(), false).unwrap();
        let names: Vec<_> = flat
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.PNG", "b.jpeg", "c.jpg"]);

        let deep = scan_folder(dir.path(), true).unwrap();
        assert_eq!(deep.len(), 4);
    }
}
