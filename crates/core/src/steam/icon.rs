use std::path::{Path, PathBuf};

/// Default placeholder, relative to the plugin's resource dir.
pub const PLACEHOLDER_ICON: &str = "imgs/noiconplaceholder.jpeg";

const ICON_EXT: &str = "jpg";

/// Turns an app's icon reference into an existing local file, or the placeholder.
///
/// Primary scheme is the per-app folder `<root>/appcache/librarycache/<id>/<iconRef>.jpg`.
/// The flat `<root>/appcache/librarycache/<id>_icon.jpg` cache file is checked after it.
#[derive(Debug, Clone)]
pub struct IconResolver {
    placeholder: PathBuf,
}

impl IconResolver {
    pub fn new(placeholder: PathBuf) -> Self {
        Self { placeholder }
    }

    /// Placeholder under the plugin's resource dir.
    pub fn bundled(resource_dir: &Path) -> Self {
        Self::new(resource_dir.join(PLACEHOLDER_ICON))
    }

    pub fn placeholder(&self) -> &Path {
        &self.placeholder
    }

    pub fn placeholder_string(&self) -> String {
        self.placeholder.to_string_lossy().into_owned()
    }

    fn library_cache(root: &Path) -> PathBuf {
        root.join("appcache").join("librarycache")
    }

    /// Candidate for an icon reference; `.jpg` is added when the reference has no extension.
    pub fn per_app_candidate(root: &Path, app_id: &str, icon_ref: &str) -> Option<PathBuf> {
        let icon_ref = icon_ref.trim();
        // references are hashes; anything that would leave the app folder is bogus
        if icon_ref.is_empty() || icon_ref.contains(['/', '\\']) || icon_ref.contains("..") {
            return None;
        }
        let mut p = Self::library_cache(root).join(app_id).join(icon_ref);
        if p.extension().is_none() {
            p.set_extension(ICON_EXT);
        }
        Some(p)
    }

    pub fn flat_candidate(root: &Path, app_id: &str) -> PathBuf {
        Self::library_cache(root).join(format!("{app_id}_icon.{ICON_EXT}"))
    }

    /// Never fails: anything unresolvable ends at the placeholder.
    pub fn resolve(&self, root: &Path, app_id: &str, icon_ref: Option<&str>) -> String {
        let primary = icon_ref.and_then(|r| Self::per_app_candidate(root, app_id, r));
        let found = primary
            .into_iter()
            .chain(std::iter::once(Self::flat_candidate(root, app_id)))
            .find(|p| p.is_file());

        match found {
            Some(p) => p.to_string_lossy().into_owned(),
            None => self.placeholder_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(p: &Path) {
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, b"jpg").unwrap();
    }

    #[test]
    fn resolves_per_app_icon() {
        let root = tempfile::tempdir().unwrap();
        let icon = root.path().join("appcache/librarycache/10/abc123.jpg");
        touch(&icon);
        let r = IconResolver::new(PathBuf::from("ph.jpeg"));

        assert_eq!(
            r.resolve(root.path(), "10", Some("abc123")),
            icon.to_string_lossy()
        );
    }

    #[test]
    fn falls_back_to_flat_cache_then_placeholder() {
        let root = tempfile::tempdir().unwrap();
        let flat = root.path().join("appcache/librarycache/20_icon.jpg");
        touch(&flat);
        let r = IconResolver::new(PathBuf::from("ph.jpeg"));

        assert_eq!(r.resolve(root.path(), "20", Some("missing")), flat.to_string_lossy());
        assert_eq!(r.resolve(root.path(), "20", None), flat.to_string_lossy());
        assert_eq!(r.resolve(root.path(), "30", Some("missing")), "ph.jpeg");
        assert_eq!(r.resolve(root.path(), "30", None), "ph.jpeg");
    }

    #[test]
    fn rejects_path_escapes() {
        let root = Path::new("/steam");
        assert_eq!(IconResolver::per_app_candidate(root, "1", "../../x"), None);
        assert_eq!(IconResolver::per_app_candidate(root, "1", "a/b"), None);
        assert_eq!(
            IconResolver::per_app_candidate(root, "1", "hash.png"),
            Some(root.join("appcache/librarycache/1/hash.png"))
        );
    }
}
