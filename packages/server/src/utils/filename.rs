use std::fmt;

/// Why an uploaded filename was refused.
#[derive(Debug, PartialEq, Eq)]
pub enum UploadNameError {
    Empty,
    /// Names starting with `.` (including `..`) are never stored.
    Hidden,
    /// Control characters would end up in `Content-Disposition` headers.
    ControlCharacter,
}

impl fmt::Display for UploadNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Empty => "Filename cannot be empty",
            Self::Hidden => "Invalid filename: names may not start with '.'",
            Self::ControlCharacter => "Invalid filename: control characters are not allowed",
        })
    }
}

/// Last component of a client-supplied path (`/` or `\` separated).
pub fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Storage name for a client-supplied upload filename: its trimmed base name.
pub fn upload_name(raw: &str) -> Result<&str, UploadNameError> {
    let name = base_name(raw).trim();
    if name.is_empty() {
        Err(UploadNameError::Empty)
    } else if name.chars().any(char::is_control) {
        Err(UploadNameError::ControlCharacter)
    } else if name.starts_with('.') {
        Err(UploadNameError::Hidden)
    } else {
        Ok(name)
    }
}

/// Whether any `/` or `\` separated segment of `path` is `..`.
pub fn has_parent_segment(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| segment == "..")
}

/// Splits `name` into stem and extension (the extension keeps its dot).
///
/// Leading dots never start an extension, so `.env` has no extension and
/// `archive.tar.gz` splits into `archive.tar` and `.gz`.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if name[..pos].chars().any(|c| c != '.') => (&name[..pos], &name[pos..]),
        _ => (name, ""),
    }
}

/// `name` with a `(counter)` disambiguator inserted before the extension.
pub fn disambiguated_name(name: &str, counter: u32) -> String {
    let (stem, ext) = split_extension(name);
    format!("{stem}({counter}){ext}")
}
