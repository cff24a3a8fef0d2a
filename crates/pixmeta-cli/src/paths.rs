use pixmeta_common::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Expands user-supplied paths and glob patterns
pub struct PathResolver {
    current_dir: PathBuf,
}

impl PathResolver {
    pub fn new() -> Result<Self> {
        let current_dir = env::current_dir()?;
        Ok(Self { current_dir })
    }

    pub fn with_base(current_dir: PathBuf) -> Self {
        Self { current_dir }
    }

    /// Shell expansion (~, $HOME, etc.) then anchoring at the current directory
    pub fn resolve(&self, path_str: &str) -> Result<PathBuf> {
        let expanded =
            shellexpand::full(path_str).map_err(|_| Error::InvalidPath(PathBuf::from(path_str)))?;

        let path = PathBuf::from(expanded.as_ref());
        let absolute = if path.is_absolute() {
            path
        } else {
            self.current_dir.join(path)
        };

        tracing::debug!("Resolved '{}' → {:?}", path_str, absolute);
        Ok(absolute)
    }

    /// Regular files matching one glob pattern, in glob order
    pub fn resolve_pattern(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let resolved_pattern = self.resolve(pattern)?;
        let pattern_str = resolved_pattern.to_string_lossy();

        tracing::debug!("Glob pattern: {}", pattern_str);

        let entries =
            glob::glob(&pattern_str).map_err(|_| Error::InvalidPath(resolved_pattern.clone()))?;

        let mut matches = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => matches.push(path),
                Ok(_) => {}
                Err(e) => tracing::warn!("Glob error: {}", e),
            }
        }

        Ok(matches)
    }

    /// Matches of every pattern, concatenated in argument order.
    ///
    /// A file matched by two patterns appears twice; the batch reports the
    /// second one as a duplicate.
    pub fn resolve_patterns(&self, patterns: &[String]) -> Result<Vec<PathBuf>> {
        let mut all = Vec::new();
        for pattern in patterns {
            let matches = self.resolve_pattern(pattern)?;
            if matches.is_empty() {
                tracing::warn!("No files matched pattern: {}", pattern);
            }
            all.extend(matches);
        }
        Ok(all)
    }
}
