use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Settings shared by every demo, plus demo-specific `extra` fields flattened
/// into the same JSON object.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "E: Deserialize<'de> + Default"))]
pub struct Settings<E = NoExtras> {
    pub fps_cap: u32,
    pub enable_color: bool,
    /// Where captures go; the working directory when unset.
    pub capture_dir: Option<PathBuf>,
    #[serde(flatten)]
    pub extra: E,
}

impl<E: Default> Default for Settings<E> {
    fn default() -> Self {
        Self {
            fps_cap: 30,
            enable_color: true,
            capture_dir: None,
            extra: E::default(),
        }
    }
}

impl<E> Settings<E> {
    pub fn fps(&self) -> u32 {
        self.fps_cap.clamp(10, 240)
    }

    pub fn capture_dir(&self) -> PathBuf {
        self.capture_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoExtras {}

pub struct Paths {
    pub settings_path: PathBuf,
    pub log_path: PathBuf,
}

pub fn project_paths(name: &str) -> Result<Paths> {
    let proj = ProjectDirs::from("org", "softgl", "softgl")
        .context("could not resolve project directories")?;
    let config_dir = proj.config_dir().to_path_buf();
    let data_dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&config_dir)
        .with_context(|| format!("creating {}", config_dir.display()))?;
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;
    Ok(Paths {
        settings_path: config_dir.join(format!("{name}.json")),
        log_path: data_dir.join(format!("{name}.log")),
    })
}

/// Missing or unreadable files fall back to defaults.
pub fn load_settings<E: DeserializeOwned + Default>(path: &Path) -> Settings<E> {
    if let Ok(s) = fs::read_to_string(path) {
        match serde_json::from_str::<Settings<E>>(&s) {
            Ok(v) => return v,
            Err(e) => log::warn!("ignoring malformed {}: {}", path.display(), e),
        }
    }
    Settings::default()
}

/// Loads settings, writing the defaults out first if the file does not exist yet.
pub fn load_or_create<E>(path: &Path) -> Result<Settings<E>>
where
    E: Serialize + DeserializeOwned + Default,
{
    if !path.exists() {
        let defaults = Settings::<E>::default();
        save_settings_atomic(path, &defaults)?;
        log::info!("wrote default settings to {}", path.display());
        return Ok(defaults);
    }
    Ok(load_settings(path))
}

pub fn save_settings_atomic<E: Serialize>(path: &Path, s: &Settings<E>) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

pub(crate) fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // rename-over-existing fails on Windows
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)
        .with_context(|| format!("renaming {} to {}", from.display(), to.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Extra {
        seed: u64,
        warp: f32,
    }

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "softgl-config-{}-{}",
            name,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_fields_take_defaults_and_extras_are_flattened() {
        let s: Settings<Extra> =
            serde_json::from_str(r#"{"fps_cap": 60, "seed": 7}"#).unwrap();
        assert_eq!(s.fps_cap, 60);
        assert!(s.enable_color);
        assert_eq!(s.extra, Extra { seed: 7, warp: 0.0 });
    }

    #[test]
    fn fps_is_clamped() {
        let mut s = Settings::<NoExtras> {
            fps_cap: 1000,
            ..Default::default()
        };
        assert_eq!(s.fps(), 240);
        s.fps_cap = 0;
        assert_eq!(s.fps(), 10);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = scratch("malformed");
        let path = dir.join("demo.json");
        fs::write(&path, "{ not json").unwrap();
        let s: Settings<Extra> = load_settings(&path);
        assert_eq!(s.fps_cap, 30);
        assert_eq!(s.extra, Extra::default());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_or_create_writes_defaults_once() {
        let dir = scratch("create");
        let path = dir.join("demo.json");
        let first: Settings<Extra> = load_or_create(&path).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let mut edited = first.clone();
        edited.extra.seed = 42;
        save_settings_atomic(&path, &edited).unwrap();
        let second: Settings<Extra> = load_or_create(&path).unwrap();
        assert_eq!(second.extra.seed, 42);
        fs::remove_dir_all(&dir).ok();
    }
}
