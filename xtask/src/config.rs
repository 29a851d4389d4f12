//! Repository layout, pinned dependencies and build settings.
//!
//! Everything has a built-in default; `xtask.toml` at the repository root may override any
//! key. Relative paths are resolved against the repository root.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "xtask.toml";

/// Host operating system, as far as the build layout cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
}

impl Platform {
    pub fn host() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    pub fn exe_suffix(self) -> &'static str {
        match self {
            Platform::Windows => ".exe",
            Platform::MacOs | Platform::Linux => "",
        }
    }

    /// Shared library extension, without the dot.
    pub fn dylib_ext(self) -> &'static str {
        match self {
            Platform::MacOs => "dylib",
            Platform::Linux => "so",
            Platform::Windows => "dll",
        }
    }

    /// Variable the dynamic loader searches for extra libraries.
    pub fn library_path_var(self) -> &'static str {
        match self {
            Platform::MacOs => "DYLD_LIBRARY_PATH",
            Platform::Linux => "LD_LIBRARY_PATH",
            Platform::Windows => "PATH",
        }
    }

    pub fn exe(self, name: &str) -> String {
        format!("{name}{}", self.exe_suffix())
    }

    pub fn dylib(self, name: &str) -> String {
        format!("{name}.{}", self.dylib_ext())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Release,
    Debug,
}

/// A component cloned at a pinned commit and built with `make`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dependency {
    pub url: String,
    pub commit: String,
    pub dir: PathBuf,
    /// Extra `make` variables, e.g. `WITH_SDL3=yes`.
    #[serde(default)]
    pub make_args: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ToolchainSource {
    /// `qbsp`, `vis` and `light` are already on `PATH`.
    Path,
    /// Download `<base_url>/<archive for host>` and unpack its executables.
    Prebuilt {
        base_url: String,
        macos: String,
        linux: String,
        windows: String,
    },
    /// Clone and build from source; tools end up in `<dir>/<bin_dir>`.
    Git {
        url: String,
        commit: String,
        #[serde(default)]
        build: Vec<Vec<String>>,
        #[serde(default)]
        bin_dir: PathBuf,
    },
}

impl ToolchainSource {
    pub fn archive_for(&self, platform: Platform) -> Option<&str> {
        match self {
            ToolchainSource::Prebuilt {
                macos,
                linux,
                windows,
                ..
            } => Some(match platform {
                Platform::MacOs => macos,
                Platform::Linux => linux,
                Platform::Windows => windows,
            }),
            ToolchainSource::Path | ToolchainSource::Git { .. } => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Toolchain {
    pub dir: PathBuf,
    pub source: ToolchainSource,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("ericw-tools"),
            source: ToolchainSource::Prebuilt {
                base_url: "https://github.com/ericwa/ericw-tools/releases/download/v0.18.1".into(),
                macos: "ericw-tools-v0.18.1-Darwin.zip".into(),
                linux: "ericw-tools-v0.18.1-Linux.zip".into(),
                windows: "ericw-tools-v0.18.1-win64.zip".into(),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameBuilder {
    #[default]
    Make,
    Odin,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Game {
    pub builder: GameBuilder,
    pub c_dir: PathBuf,
    pub odin_dir: PathBuf,
    /// Library file stem inside `baseq2/`.
    pub library_name: String,
}

impl Default for Game {
    fn default() -> Self {
        Self {
            builder: GameBuilder::Make,
            c_dir: PathBuf::from("game-c"),
            odin_dir: PathBuf::from("game-odin"),
            library_name: "game".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Maps {
    pub dir: PathBuf,
    pub qbsp_args: Vec<String>,
    pub vis_args: Vec<String>,
    pub light_args: Vec<String>,
}

impl Default for Maps {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("base/maps"),
            qbsp_args: vec!["-q2bsp".into()],
            vis_args: Vec::new(),
            light_args: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Assets {
    pub base_dir: PathBuf,
    /// Extracted third-party pak0 data; only `allow_list` is ever read from it.
    pub pak0_dir: PathBuf,
    pub exclude_extensions: Vec<String>,
    pub allow_list: Vec<String>,
}

impl Default for Assets {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("base"),
            pak0_dir: PathBuf::from("tmp/pak0"),
            exclude_extensions: [".aseprite", ".map", ".log", ".prt", ".vis", ".json"]
                .map(String::from)
                .to_vec(),
            allow_list: [
                "pics/colormap.pcx",
                "pics/conchars.pcx",
                "pics/conback.pcx",
                "pics/ch1.pcx",
                "pics/pause.pcx",
                "pics/m_main_*.pcx",
                "pics/quit.pcx",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Run {
    /// Defaults to the platform's loader variable.
    pub library_path_var: Option<String>,
    /// Defaults to MoltenVK on macOS and the release directory elsewhere.
    pub library_path: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrenchBroom {
    /// Defaults to TrenchBroom's per-user games directory.
    pub games_dir: Option<PathBuf>,
    pub game_name: String,
    pub config_dir: PathBuf,
}

impl Default for TrenchBroom {
    fn default() -> Self {
        Self {
            games_dir: None,
            game_name: "MinimalQuake2Base".into(),
            config_dir: PathBuf::from("trenchbroom-config"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Loc {
    pub output: PathBuf,
}

impl Default for Loc {
    fn default() -> Self {
        Self {
            output: PathBuf::from("game-c-loc.txt"),
        }
    }
}

/// On-disk form of the configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub profile: Profile,
    pub release_dir: PathBuf,
    pub tmp_dir: PathBuf,
    pub engine: Dependency,
    pub renderer: Dependency,
    pub toolchain: Toolchain,
    pub game: Game,
    pub maps: Maps,
    pub assets: Assets,
    pub run: Run,
    pub trenchbroom: TrenchBroom,
    pub loc: Loc,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profile: Profile::Release,
            release_dir: PathBuf::from("release"),
            tmp_dir: PathBuf::from("tmp"),
            engine: Dependency {
                url: "https://github.com/yquake2/yquake2.git".into(),
                commit: "d2efa1c9af5ef649a91cf5de4bfa2370c03f69f2".into(),
                dir: PathBuf::from("yquake2"),
                make_args: Vec::new(),
            },
            renderer: Dependency {
                url: "https://github.com/yquake2/ref_vk".into(),
                commit: "21bde3c4bb3ab3af00d41c2fd85b86c0a021732f".into(),
                dir: PathBuf::from("ref_vk"),
                make_args: Vec::new(),
            },
            toolchain: Toolchain::default(),
            game: Game::default(),
            maps: Maps::default(),
            assets: Assets::default(),
            run: Run::default(),
            trenchbroom: TrenchBroom::default(),
            loc: Loc::default(),
        }
    }
}

/// Settings bound to a repository root and host platform.
#[derive(Clone, Debug)]
pub struct Config {
    pub root: PathBuf,
    pub platform: Platform,
    pub settings: Settings,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            root: root.into(),
            platform: Platform::host(),
            settings,
        }
    }

    /// Defaults overridden by `<root>/xtask.toml` when present.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        let settings = if path.is_file() {
            let text =
                fs::read_to_string(&path).with_context(|| format!("Reading {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("Parsing {}", path.display()))?
        } else {
            Settings::default()
        };
        Ok(Self::new(root, settings))
    }

    /// Resolve a configured path against the repository root.
    pub fn path(&self, p: &Path) -> PathBuf {
        self.root.join(p)
    }

    pub fn release_dir(&self) -> PathBuf {
        self.path(&self.settings.release_dir)
    }

    pub fn baseq2_dir(&self) -> PathBuf {
        self.release_dir().join("baseq2")
    }

    pub fn tmp_dir(&self) -> PathBuf {
        self.path(&self.settings.tmp_dir)
    }

    pub fn toolchain_dir(&self) -> PathBuf {
        self.path(&self.settings.toolchain.dir)
    }

    /// Where `qbsp`, `vis` and `light` live; `None` means look them up on `PATH`.
    pub fn toolchain_bin_dir(&self) -> Option<PathBuf> {
        match &self.settings.toolchain.source {
            ToolchainSource::Path => None,
            ToolchainSource::Prebuilt { .. } => Some(self.toolchain_dir()),
            ToolchainSource::Git { bin_dir, .. } => Some(self.toolchain_dir().join(bin_dir)),
        }
    }

    /// Program to spawn for a map compiler stage.
    pub fn map_tool(&self, name: &str) -> PathBuf {
        match self.toolchain_bin_dir() {
            Some(dir) => dir.join(self.platform.exe(name)),
            None => PathBuf::from(name),
        }
    }

    /// Game library file name, e.g. `game.dylib`.
    pub fn game_library(&self) -> String {
        self.platform.dylib(&self.settings.game.library_name)
    }

    pub fn library_path_var(&self) -> String {
        self.settings
            .run
            .library_path_var
            .clone()
            .unwrap_or_else(|| self.platform.library_path_var().to_string())
    }

    pub fn library_path(&self) -> PathBuf {
        match (&self.settings.run.library_path, self.platform) {
            (Some(p), _) => self.path(p),
            (None, Platform::MacOs) => PathBuf::from("/opt/homebrew/opt/molten-vk/lib"),
            (None, Platform::Linux | Platform::Windows) => self.release_dir(),
        }
    }

    pub fn is_debug(&self) -> bool {
        self.settings.profile == Profile::Debug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::load(tmp.path()).unwrap();
        assert_eq!(cfg.settings, Settings::default());
        assert_eq!(cfg.release_dir(), tmp.path().join("release"));
        assert_eq!(cfg.baseq2_dir(), tmp.path().join("release/baseq2"));
    }

    #[test]
    fn test_partial_override() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
profile = "debug"

[engine]
url = "https://example.invalid/yquake2.git"
commit = "abc123"
dir = "deps/yquake2"
make_args = ["WITH_SDL3=yes"]

[toolchain]
dir = "tools"
source = { kind = "path" }

[game]
builder = "odin"
"#,
        )
        .unwrap();

        let cfg = Config::load(tmp.path()).unwrap();
        assert!(cfg.is_debug());
        assert_eq!(cfg.settings.engine.commit, "abc123");
        assert_eq!(cfg.settings.engine.make_args, vec!["WITH_SDL3=yes"]);
        assert_eq!(cfg.settings.renderer, Settings::default().renderer);
        assert_eq!(cfg.settings.game.builder, GameBuilder::Odin);
        assert_eq!(cfg.settings.game.c_dir, PathBuf::from("game-c"));
        assert_eq!(cfg.map_tool("qbsp"), PathBuf::from("qbsp"));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "relase_dir = \"out\"\n").unwrap();
        let err = Config::load(tmp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Parsing"));
    }

    #[test]
    fn test_git_toolchain_tools_resolve_in_bin_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[toolchain]
dir = "ericw-tools"
source = { kind = "git", url = "https://github.com/ericwa/ericw-tools", commit = "0123", bin_dir = "build/bin" }
"#,
        )
        .unwrap();
        let cfg = Config::load(tmp.path()).unwrap();
        let expected = tmp
            .path()
            .join("ericw-tools/build/bin")
            .join(cfg.platform.exe("vis"));
        assert_eq!(cfg.map_tool("vis"), expected);
    }

    #[test]
    fn test_platform_artifacts() {
        assert_eq!(Platform::Windows.exe("quake2"), "quake2.exe");
        assert_eq!(Platform::MacOs.exe("quake2"), "quake2");
        assert_eq!(Platform::MacOs.dylib("ref_vk"), "ref_vk.dylib");
        assert_eq!(Platform::Linux.dylib("game"), "game.so");
        assert_eq!(Platform::Linux.library_path_var(), "LD_LIBRARY_PATH");

        let source = Toolchain::default().source;
        assert_eq!(
            source.archive_for(Platform::MacOs),
            Some("ericw-tools-v0.18.1-Darwin.zip")
        );
        assert_eq!(ToolchainSource::Path.archive_for(Platform::Linux), None);
    }
}
