use std::path::{Path, PathBuf};

const LOCAL_SUFFIX: &str = "_local";

pub trait FileName {
    fn string_file_name(&self) -> &str;
}

impl FileName for Path {
    fn string_file_name(&self) -> &str {
        self.file_name().and_then(|s| s.to_str()).unwrap_or("unknown")
    }
}

/// Sibling files that override values of a record without touching the record itself,
/// e.g. `cam-01_local.toml` next to `cam-01.toml`.
pub trait LocalOverride {
    fn local_override(&self) -> PathBuf;

    fn is_local_override(&self) -> bool;
}

impl LocalOverride for Path {
    fn local_override(&self) -> PathBuf {
        let stem = self.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let file_name = match self.extension().and_then(|e| e.to_str()) {
            Some(extension) => format!("{}{}.{}", stem, LOCAL_SUFFIX, extension),
            None => format!("{}{}", stem, LOCAL_SUFFIX),
        };
        self.with_file_name(file_name)
    }

    fn is_local_override(&self) -> bool {
        self.file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|stem| stem.ends_with(LOCAL_SUFFIX))
    }
}
