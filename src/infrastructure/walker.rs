//! Repository file walker

use std::path::{Path, PathBuf};

use tracing::{instrument, trace};
use walkdir::WalkDir;

/// File selected for scanning
#[derive(Debug, Clone)]
pub struct ScanFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Directory walker shared by the analyzers
///
/// Skips well-known vendored/generated directories, binary-looking files,
/// and anything over the size limit.
pub struct DirectoryScanner {
    max_depth: usize,
    max_file_size: u64,
    max_files: Option<usize>,
    exclude_dirs: Vec<String>,
    extensions: Option<Vec<String>>,
}

impl DirectoryScanner {
    pub fn new(max_depth: usize, max_file_size: u64) -> Self {
        Self {
            max_depth,
            max_file_size,
            max_files: None,
            exclude_dirs: Self::default_excludes(),
            extensions: None,
        }
    }

    pub fn default_excludes() -> Vec<String> {
        [
            "node_modules",
            ".git",
            "target",
            "__pycache__",
            ".venv",
            "venv",
            ".pytest_cache",
            "dist",
            "build",
            "vendor",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    pub fn with_exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.exclude_dirs = dirs;
        self
    }

    /// Cap the number of files returned; `None` means unbounded.
    pub fn with_max_files(mut self, max_files: Option<usize>) -> Self {
        self.max_files = max_files;
        self
    }

    /// Only return files with one of the given extensions.
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = Some(extensions);
        self
    }

    fn is_excluded_dir(&self, entry: &walkdir::DirEntry) -> bool {
        entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .map(|name| self.exclude_dirs.iter().any(|d| d == name))
                .unwrap_or(false)
    }

    fn extension_matches(&self, path: &Path) -> bool {
        match &self.extensions {
            None => true,
            Some(exts) => path
                .extension()
                .and_then(|e| e.to_str())
                .map(|ext| exts.iter().any(|e| e.eq_ignore_ascii_case(ext)))
                .unwrap_or(false),
        }
    }

    /// Walk `root` and collect scannable files.
    #[instrument(skip(self), fields(root = %root.display(), max_depth = self.max_depth))]
    pub fn scan(&self, root: &Path) -> Result<Vec<ScanFile>, std::io::Error> {
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .max_depth(self.max_depth)
            .into_iter()
            .filter_entry(|entry| !self.is_excluded_dir(entry));

        for entry in walker {
            let entry = entry.map_err(std::io::Error::other)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !self.extension_matches(path) || !is_likely_text_file(path) {
                continue;
            }

            let size = entry.metadata().map_err(std::io::Error::other)?.len();
            if size > self.max_file_size {
                trace!(file = %path.display(), size, "Skipping file over size limit");
                continue;
            }

            files.push(ScanFile {
                path: path.to_path_buf(),
                size,
            });

            if let Some(cap) = self.max_files
                && files.len() >= cap
            {
                trace!(cap, "File cap reached, stopping walk");
                break;
            }
        }

        Ok(files)
    }
}

/// Cheap text-file heuristic based on extension and a few well-known names.
fn is_likely_text_file(path: &Path) -> bool {
    const TEXT_EXTENSIONS: &[&str] = &[
        "js", "jsx", "ts", "tsx", "mjs", "cjs", "py", "java", "cs", "go", "rb", "php", "rs", "c",
        "cpp", "h", "hpp", "json", "yaml", "yml", "toml", "xml", "txt", "md", "cfg", "ini", "env",
        "sh", "bash", "sql", "html", "css", "properties", "gradle", "csproj", "config", "mod",
        "sum", "lock", "tf", "tfvars",
    ];
    const TEXT_FILENAMES: &[&str] = &[
        "Gemfile",
        "Pipfile",
        "Dockerfile",
        "Makefile",
        ".env",
        ".npmrc",
        ".gitconfig",
    ];

    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        return TEXT_EXTENSIONS.iter().any(|t| t.eq_ignore_ascii_case(ext));
    }
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| TEXT_FILENAMES.contains(&name))
        .unwrap_or(false)
}
