/// File type categorisation based on file extensions.
///
/// Groups files into broad categories (Documents, Media, Code, Archives,
/// System, Other) and computes size/count totals per category.
use crate::model::FileRecord;
use serde::Serialize;
use std::collections::HashMap;

/// Broad file type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileCategory {
    Documents,
    Images,
    Video,
    Audio,
    Archives,
    Code,
    Executables,
    System,
    Other,
}

impl FileCategory {
    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Documents => "Documents",
            Self::Images => "Images",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Archives => "Archives",
            Self::Code => "Code",
            Self::Executables => "Executables",
            Self::System => "System",
            Self::Other => "Other",
        }
    }
}

/// Size and count totals for a single file category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: FileCategory,
    pub file_count: u64,
    pub total_size: u64,
    /// Share of the analysed files' total size, 0.0–100.0.
    pub percentage: f64,
}

/// Known extensions per category, lowercase and without the dot.
///
/// Every extension appears in at most one row; anything not listed is
/// [`FileCategory::Other`].
const EXTENSIONS: &[(FileCategory, &[&str])] = &[
    (
        FileCategory::Documents,
        &[
            "csv", "doc", "docx", "epub", "md", "odp", "ods", "odt", "pages", "pdf", "ppt",
            "pptx", "rtf", "tex", "txt", "xls", "xlsx",
        ],
    ),
    (
        FileCategory::Images,
        &[
            "avif", "bmp", "cr2", "dng", "gif", "heic", "heif", "ico", "jpeg", "jpg", "nef",
            "png", "psd", "raw", "svg", "tif", "tiff", "webp",
        ],
    ),
    (
        FileCategory::Video,
        &[
            "3gp", "avi", "flv", "m2ts", "m4v", "mkv", "mov", "mp4", "mpeg", "mpg", "webm",
            "wmv",
        ],
    ),
    (
        FileCategory::Audio,
        &["aac", "aiff", "flac", "m4a", "mid", "mp3", "ogg", "opus", "wav", "wma"],
    ),
    (
        FileCategory::Archives,
        &[
            "7z", "bz2", "cab", "dmg", "gz", "iso", "lz4", "rar", "tar", "tgz", "xz", "zip", "zst",
        ],
    ),
    (
        FileCategory::Code,
        &[
            "bat", "c", "cc", "cpp", "cs", "css", "go", "h", "hpp", "html", "java", "js", "json",
            "jsx", "kt", "lua", "php", "ps1", "py", "rb", "rs", "scala", "scss", "sh", "sql",
            "swift", "toml", "ts", "tsx", "xml", "yaml", "yml",
        ],
    ),
    (
        FileCategory::Executables,
        &[
            "apk", "app", "appimage", "bin", "com", "deb", "dll", "dylib", "exe", "msi", "rpm",
            "so",
        ],
    ),
    (
        FileCategory::System,
        &[
            "bak", "cache", "dat", "db", "drv", "etl", "inf", "log", "qcow2", "reg", "sqlite",
            "swp", "sys", "tmp", "vdi", "vmdk",
        ],
    ),
];

/// Longest extension worth looking up; longer ones are always `Other`.
const MAX_EXTENSION_LEN: usize = 16;

/// Categorise a file extension into a broad category.
///
/// Case-insensitive, tolerates a leading dot.
pub fn categorise_extension(ext: &str) -> FileCategory {
    let ext = ext.strip_prefix('.').unwrap_or(ext);
    if ext.is_empty() || ext.len() > MAX_EXTENSION_LEN {
        return FileCategory::Other;
    }
    EXTENSIONS
        .iter()
        .find(|(_, known)| known.iter().any(|k| k.eq_ignore_ascii_case(ext)))
        .map_or(FileCategory::Other, |(category, _)| *category)
}

/// Category label for an extension. Total: unknown extensions are `"Other"`.
pub fn categorize(extension: &str) -> &'static str {
    categorise_extension(extension).label()
}

/// Per-category totals over `files`, largest category first.
pub fn analyse_file_types(files: &[FileRecord]) -> Vec<CategoryStats> {
    let mut map: HashMap<FileCategory, (u64, u64)> = HashMap::with_capacity(9);
    let mut grand_total: u64 = 0;

    for file in files {
        let entry = map
            .entry(categorise_extension(&file.extension))
            .or_insert((0, 0));
        entry.0 += 1;
        entry.1 += file.size;
        grand_total += file.size;
    }

    let mut results: Vec<CategoryStats> = map
        .into_iter()
        .map(|(category, (file_count, total_size))| CategoryStats {
            category,
            file_count,
            total_size,
            percentage: if grand_total > 0 {
                total_size as f64 / grand_total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect();
    results.sort_by(|a, b| b.total_size.cmp(&a.total_size));
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::extension_of;
    use compact_str::CompactString;
    use std::path::PathBuf;

    fn record(name: &str, size: u64) -> FileRecord {
        FileRecord {
            name: CompactString::new(name),
            path: PathBuf::from("/scan").join(name),
            size,
            extension: extension_of(name),
            modified: None,
        }
    }

    // ── categorise_extension ─────────────────────────────────────────────

    #[test]
    fn categorise_known_extensions() {
        for ext in &["jpg", "jpeg", "png", "heic"] {
            assert_eq!(categorise_extension(ext), FileCategory::Images, ".{ext}");
        }
        for ext in &["rs", "py", "toml"] {
            assert_eq!(categorise_extension(ext), FileCategory::Code, ".{ext}");
        }
        for ext in &["zip", "7z", "iso"] {
            assert_eq!(categorise_extension(ext), FileCategory::Archives, ".{ext}");
        }
    }

    #[test]
    fn categorise_unknown_extension_returns_other() {
        assert_eq!(categorise_extension("xyz"), FileCategory::Other);
        assert_eq!(categorise_extension(""), FileCategory::Other);
        assert_eq!(
            categorise_extension("averyveryverylongextension"),
            FileCategory::Other
        );
    }

    /// Matching must be case-insensitive so "JPG" == "jpg".
    #[test]
    fn categorise_case_insensitive_and_dot_tolerant() {
        assert_eq!(categorise_extension("JPG"), FileCategory::Images);
        assert_eq!(categorise_extension(".Rs"), FileCategory::Code);
        assert_eq!(categorize("ZIP"), "Archives");
        assert_eq!(categorize("weird"), "Other");
    }

    #[test]
    fn each_extension_belongs_to_one_category() {
        let mut seen = std::collections::HashSet::new();
        for (category, known) in EXTENSIONS {
            for ext in *known {
                assert!(seen.insert(*ext), ".{ext} listed twice (again under {category:?})");
                assert_eq!(ext.to_ascii_lowercase(), *ext);
                assert!(ext.len() <= MAX_EXTENSION_LEN);
            }
        }
    }

    // ── analyse_file_types ───────────────────────────────────────────────

    #[test]
    fn analyse_aggregates_by_category() {
        let files = vec![
            record("main.rs", 100),
            record("lib.rs", 100),
            record("logo.png", 200),
        ];
        let stats = analyse_file_types(&files);

        let code = stats
            .iter()
            .find(|s| s.category == FileCategory::Code)
            .expect("Code category missing");
        assert_eq!(code.file_count, 2);
        assert_eq!(code.total_size, 200);
        assert!((code.percentage - 50.0).abs() < 1e-9);

        let total_pct: f64 = stats.iter().map(|s| s.percentage).sum();
        assert!((total_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn analyse_sorted_by_size_descending() {
        let files = vec![record("small.rs", 10), record("big.zip", 1_000)];
        let stats = analyse_file_types(&files);
        assert_eq!(stats[0].category, FileCategory::Archives);
        assert!(stats[0].total_size >= stats[1].total_size);
    }

    #[test]
    fn analyse_empty_and_zero_sized_inputs() {
        assert!(analyse_file_types(&[]).is_empty());
        let stats = analyse_file_types(&[record("empty.txt", 0)]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].percentage, 0.0);
    }
}
