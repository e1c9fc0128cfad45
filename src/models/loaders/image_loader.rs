use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{AppResult, FileError};
use crate::models::sheet::SheetImage;

/// 读取单张答题卡图片
pub async fn load_sheet_image(path: &Path) -> AppResult<SheetImage> {
    let path_str = path.display().to_string();
    if !path.exists() {
        return Err(FileError::NotFound { path: path_str }.into());
    }

    let mime_type = SheetImage::mime_type_for(path)
        .ok_or_else(|| FileError::UnsupportedImage {
            path: path_str.clone(),
        })?;

    let bytes = fs::read(path)
        .await
        .map_err(|e| FileError::read_failed(&path_str, e))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or(path_str);

    Ok(SheetImage::new(file_name, mime_type, bytes))
}

/// 从文件夹中加载所有答题卡图片，按文件名排序
pub async fn load_all_sheet_images(folder_path: &str) -> AppResult<Vec<SheetImage>> {
    let folder = PathBuf::from(folder_path);

    if !folder.is_dir() {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| FileError::read_failed(folder_path, e))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| FileError::read_failed(folder_path, e))?
    {
        let path = entry.path();
        if SheetImage::mime_type_for(&path).is_some() {
            paths.push(path);
        } else {
            tracing::debug!("跳过非图片文件: {}", path.display());
        }
    }
    paths.sort();

    let mut sheets = Vec::with_capacity(paths.len());
    for path in paths {
        match load_sheet_image(&path).await {
            Ok(sheet) => {
                tracing::info!("正在加载: {}", sheet.file_name);
                sheets.push(sheet);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(sheets)
}
