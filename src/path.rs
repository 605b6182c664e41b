/// Replaces the extension of `file_name` with `ext`, keeping the stem.
///
/// `ext` may be given with or without its leading `.`; an empty `ext` strips the extension.
///
/// ```
/// use filestore::path::change_extension;
///
/// assert_eq!(change_extension("foo.jpg", "txt"), "foo.txt");
/// assert_eq!(change_extension("foo.bar.png", ".jpg"), "foo.bar.jpg");
/// assert_eq!(change_extension("foo", "txt"), "foo.txt");
/// assert_eq!(change_extension("foo.txt", ""), "foo");
/// ```
pub fn change_extension(file_name: &str, ext: &str) -> String {
    let ext = if ext.is_empty() || ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    };

    let current = extension(file_name);
    if current == ext {
        return file_name.to_string();
    }
    let stem = &file_name[..file_name.len() - current.len()];
    format!("{}{}", stem, ext)
}

/// Everything from the last `.` of the final path segment onward, dot included.
fn extension(file_name: &str) -> &str {
    match file_name.rfind(['.', '/']) {
        Some(i) if file_name[i..].starts_with('.') => &file_name[i..],
        _ => "",
    }
}
