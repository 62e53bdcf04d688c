use std::collections::HashSet;
use std::path::Path;

/// Spreadsheet formats accepted for upload.
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["xlsx", "xlsm", "xlsb", "xls", "ods", "csv"];

/// Turns a raw header cell into a unique column label.
///
/// Labels are for display and diagnostics only; columns are identified by
/// index, so the raw text is kept as much as possible.
pub fn column_label(raw: &str, index: usize, existing_labels: &mut HashSet<String>) -> String {
    let trimmed = raw.trim();
    let base = if trimmed.is_empty() {
        format!("column_{}", index)
    } else {
        trimmed.to_string()
    };

    // If the label already exists, add a numeric suffix
    let mut label = base.clone();
    let mut counter = 1;
    while !existing_labels.insert(label.clone()) {
        label = format!("{}_{}", base, counter);
        counter += 1;
    }

    label
}

/// Makes an uploaded filename safe to store as a record's source tag.
pub fn clean_source_name(name: &str) -> String {
    let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned = file_name
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect::<String>();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Lowercased extension of `name`, if any.
pub fn file_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

pub fn allowed_file(name: &str) -> bool {
    file_extension(name).map_or(false, |ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}
