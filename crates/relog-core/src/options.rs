use std::path::Path;

use indexmap::IndexMap;

use crate::{
    error::{Error, Result},
    fs::write_to_file,
};

const MAX_FPS_KEY: &str = "maxFps";
const RENDER_DISTANCE_KEY: &str = "renderDistance";

/// The game's flat `key:value` display options file.
///
/// Another foreign format: the game writes dozens of keys we know
/// nothing about, so the whole file is kept in insertion order and only
/// `maxFps` and `renderDistance` are ever touched. Values containing
/// `:` are written as-is and will be mis-split on the next read; the
/// game does not produce such values.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GameOptions(IndexMap<String, String>);

impl GameOptions {
    /// Parses the file at `path`. Each non-empty line is split on the
    /// first `:`; lines without a separator are dropped. A missing file
    /// is an empty set of options, not an error.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let string = match tokio::fs::read_to_string(path).await {
            Ok(string) => string,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(Error::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let entries = string
            .lines()
            .filter_map(|line| line.split_once(':'))
            .map(|(key, value)| (key.trim().to_owned(), value.trim().to_owned()))
            .collect();

        Ok(Self(entries))
    }

    /// Writes one `key:value` line per entry, in iteration order.
    pub async fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut body = String::new();
        for (key, value) in &self.0 {
            body.push_str(key);
            body.push(':');
            body.push_str(value);
            body.push('\n');
        }

        write_to_file(body.as_bytes(), path).await
    }

    pub fn entries(&self) -> &IndexMap<String, String> {
        &self.0
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn set_max_fps(&mut self, max_fps: u32) {
        self.set(MAX_FPS_KEY, max_fps.to_string());
    }

    pub fn set_render_distance(&mut self, render_distance: u32) {
        self.set(RENDER_DISTANCE_KEY, render_distance.to_string());
    }
}

/// Read-update-write of the two recognized keys; everything else in the
/// file is preserved verbatim.
pub async fn apply_display_settings(
    path: impl AsRef<Path>,
    max_fps: u32,
    render_distance: u32,
) -> Result<()> {
    let path = path.as_ref();

    let mut options = GameOptions::read(path).await?;
    options.set_max_fps(max_fps);
    options.set_render_distance(render_distance);
    options.write(path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("relog-options-{name}.txt"))
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let options = GameOptions::read(test_path("does-not-exist")).await.unwrap();
        assert!(options.entries().is_empty());
    }

    #[tokio::test]
    async fn round_trip_preserves_pairs_and_order() {
        let path = test_path("round-trip");

        let mut options = GameOptions::default();
        options.set("soundCategory_master", "0.7");
        options.set_max_fps(120);
        options.set_render_distance(8);

        options.write(&path).await.unwrap();
        let read_back = GameOptions::read(&path).await.unwrap();

        assert_eq!(read_back, options);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "soundCategory_master:0.7\nmaxFps:120\nrenderDistance:8\n"
        );
    }

    #[tokio::test]
    async fn lines_without_separator_are_dropped() {
        let path = test_path("no-separator");
        std::fs::write(&path, "maxFps:60\nthis line is noise\nfov:90\n").unwrap();

        let options = GameOptions::read(&path).await.unwrap();
        let keys: Vec<_> = options.entries().keys().cloned().collect();
        assert_eq!(keys, ["maxFps", "fov"]);
    }

    #[tokio::test]
    async fn splits_on_the_first_separator_only() {
        let path = test_path("first-separator");
        std::fs::write(&path, "resourcePacks:[\"file:pack.zip\"]\n").unwrap();

        let options = GameOptions::read(&path).await.unwrap();
        assert_eq!(
            options.entries().get("resourcePacks").map(String::as_str),
            Some("[\"file:pack.zip\"]")
        );
    }

    #[tokio::test]
    async fn apply_keeps_unknown_keys() {
        let path = test_path("apply");
        std::fs::write(&path, "fov:90\nmaxFps:60\n").unwrap();

        apply_display_settings(&path, 120, 8).await.unwrap();

        let options = GameOptions::read(&path).await.unwrap();
        assert_eq!(options.entries().get("fov").map(String::as_str), Some("90"));
        assert_eq!(options.entries().get("maxFps").map(String::as_str), Some("120"));
        assert_eq!(
            options.entries().get("renderDistance").map(String::as_str),
            Some("8")
        );
    }

    #[tokio::test]
    async fn apply_on_an_empty_file_writes_only_the_two_keys() {
        let path = test_path("apply-empty");
        std::fs::write(&path, "").unwrap();

        apply_display_settings(&path, 120, 8).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "maxFps:120\nrenderDistance:8\n"
        );
    }
}
