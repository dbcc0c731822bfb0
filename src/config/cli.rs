use crate::domain::model::ItemForm;
use crate::utils::error::{Result, StoreError};
use std::path::Path;

/// 解析 `key=value` 形式的參數
pub fn parse_pair(flag: &str, raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(StoreError::InputError {
            message: format!("{} expects KEY=VALUE, got '{}'", flag, raw),
        }),
    }
}

pub fn guess_content_type(path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "json" => "application/json",
        "csv" => "text/csv",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(mime.to_string())
}

/// 由命令列參數組出 multipart 表單，檔案內容會讀進記憶體
pub async fn load_form(fields: &[String], files: &[String]) -> Result<ItemForm> {
    let mut form = ItemForm::new();

    for raw in fields {
        let (key, value) = parse_pair("--field", raw)?;
        form = form.text(key, value);
    }

    for raw in files {
        let (key, path) = parse_pair("--file", raw)?;
        let path = Path::new(&path);
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        tracing::debug!("Attaching {} ({} bytes) as {}", file_name, bytes.len(), key);
        form = form.file(key, file_name, guess_content_type(path), bytes);
    }

    Ok(form)
}
