//! Content-Type to file extension mapping and the download Content-Disposition.

/// Renders `attachment; filename=icon.<ext>`.
pub fn attachment_disposition(ext: &str) -> String {
    format!("attachment; filename=icon.{}", ext)
}

/// Derives a file extension from a MIME type.
///
/// Known icon and raster types map to their usual extension; anything else
/// uses the subtype with `x-`/`vnd.` prefixes and `+suffix` stripped.
/// Missing or unusable types yield `"bin"`.
pub fn extension_for_content_type(content_type: Option<&str>) -> String {
    let essence = match content_type {
        Some(ct) => ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase(),
        None => return "bin".to_string(),
    };
    let ext = match essence.as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
        "image/x-icon" | "image/vnd.microsoft.icon" | "image/ico" => "ico",
        "image/svg+xml" => "svg",
        _ => {
            let subtype = essence.split_once('/').map(|(_, s)| s).unwrap_or("");
            let subtype = subtype
                .strip_prefix("x-")
                .or_else(|| subtype.strip_prefix("vnd."))
                .unwrap_or(subtype);
            let subtype = subtype.split('+').next().unwrap_or("");
            if !subtype.is_empty() && subtype.chars().all(|c| c.is_ascii_alphanumeric()) {
                return subtype.to_string();
            }
            "bin"
        }
    };
    ext.to_string()
}
