use std::path::{Path, PathBuf};
use std::result::Result as StdResult;
use std::time::Duration;

use anyhow::Context as _;
use rust_embed::RustEmbed;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Config {
    #[serde(skip)]
    pub source_config_file: Option<PathBuf>,
    #[serde(default)]
    pub test: TestConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    pub time_limit_ms: u64,
    pub display_width: Option<usize>,
    pub color: bool,
    pub command: Vec<TestCommandConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestCommandConfig {
    pub pattern: GlobPattern,
    pub run: Vec<String>,
    #[serde(default)]
    pub debug: Option<Vec<String>>,
}

/// A glob validated when the config is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct GlobPattern(glob::Pattern);

impl GlobPattern {
    pub fn parse(pattern: &str) -> StdResult<Self, glob::PatternError> {
        glob::Pattern::new(pattern).map(Self)
    }

    pub fn matches(&self, filename: &str) -> bool {
        self.0.matches(filename)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for GlobPattern {
    type Error = glob::PatternError;

    fn try_from(s: String) -> StdResult<Self, Self::Error> {
        Self::parse(&s)
    }
}

/// `CPB_TIME_LIMIT_MS`, `CPB_DISPLAY_WIDTH`, `CPB_NO_COLOR`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EnvOverrides {
    pub time_limit_ms: Option<u64>,
    pub display_width: Option<usize>,
    pub no_color: Option<bool>,
}

impl EnvOverrides {
    pub const PREFIX: &str = "CPB_";

    pub fn from_env() -> anyhow::Result<Self> {
        envy::prefixed(Self::PREFIX)
            .from_env::<Self>()
            .context("Invalid CPB_* environment variable")
    }
}

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Asset;

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 4000,
            display_width: None,
            color: true,
            command: Vec::new(),
        }
    }
}

impl Config {
    pub const FILENAME: &str = "cpb.toml";

    pub fn example_toml() -> String {
        Asset::get(Self::FILENAME)
            .map(|file| String::from_utf8_lossy(file.data.as_ref()).into_owned())
            .unwrap_or_default()
    }

    pub fn from_toml(s: &str) -> StdResult<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn from_toml_file(filepath: PathBuf) -> anyhow::Result<Self> {
        let toml = fsutil::read_to_string(&filepath).context("Cannot read a file")?;
        let mut cfg = Self::from_toml(&toml)
            .with_context(|| format!("Invalid config TOML: {:?}", filepath))?;
        cfg.source_config_file = Some(filepath);
        Ok(cfg)
    }

    /// Find config file in ancestor dirs, including current dir.
    pub fn find_file_in_ancestors(cur_dir: impl AsRef<Path>) -> Option<PathBuf> {
        cur_dir
            .as_ref()
            .ancestors()
            .map(|dir| dir.join(Self::FILENAME))
            .find(|path| path.is_file())
    }

    /// Defaults when no config file exists above `cur_dir`.
    pub fn load_or_default(cur_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        match Self::find_file_in_ancestors(cur_dir) {
            Some(path) => {
                log::debug!("Using config {}", path.to_string_lossy());
                Self::from_toml_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn with_env(mut self, env: &EnvOverrides) -> Self {
        let EnvOverrides {
            time_limit_ms,
            display_width,
            no_color,
        } = env;
        if let Some(ms) = time_limit_ms {
            self.test.time_limit_ms = *ms;
        }
        if let Some(w) = display_width {
            self.test.display_width = Some(*w);
        }
        if let Some(no_color) = no_color {
            self.test.color = !no_color;
        }
        self
    }
}

impl TestConfig {
    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }

    pub fn find_command_for_filename(&self, filename: impl AsRef<str>) -> Option<&TestCommandConfig> {
        self.command
            .iter()
            .find(|entry| entry.pattern.matches(filename.as_ref()))
    }
}

impl TestCommandConfig {
    /// The `debug` template, or `run` when none is configured.
    pub fn debug_or_run(&self) -> &[String] {
        self.debug.as_deref().unwrap_or(self.run.as_slice())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn example_toml_should_be_parsable() {
        let toml = Config::example_toml();
        let cfg = dbg!(Config::from_toml(&toml)).unwrap();

        let Config {
            source_config_file,
            test,
        } = cfg;

        assert_eq!(source_config_file, None);
        assert_eq!(test.time_limit(), Duration::from_millis(4000));
        assert_eq!(test.display_width, None);
        assert!(test.color);
        assert_eq!(test.command.len(), 3);
        assert_eq!(
            test.command[0],
            TestCommandConfig {
                pattern: GlobPattern::parse("*.cpp").unwrap(),
                run: vec!["#{fileDir}/#{fileStem}".to_owned()],
                debug: Some(vec!["#{fileDir}/#{fileStem}_debug".to_owned()]),
            }
        );

        let py = test.find_command_for_filename("a.py").unwrap();
        assert_eq!(py.pattern.as_str(), "*.py");
        assert_eq!(py.debug_or_run(), py.run.as_slice());
        assert!(test.find_command_for_filename("a.hs").is_none());
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.test.time_limit_ms, 4000);

        let cfg = Config::from_toml("[test]\ntime_limit_ms = 500\n").unwrap();
        assert_eq!(cfg.test.time_limit(), Duration::from_millis(500));
        assert!(cfg.test.color);
    }

    #[test]
    fn invalid_glob_is_rejected() {
        let toml = "[[test.command]]\npattern = \"[a\"\nrun = [\"x\"]\n";
        assert!(Config::from_toml(toml).is_err());
    }

    #[test]
    fn env_overrides_file() {
        let env: EnvOverrides = envy::prefixed(EnvOverrides::PREFIX)
            .from_iter(vec![
                ("CPB_TIME_LIMIT_MS".to_owned(), "1500".to_owned()),
                ("CPB_NO_COLOR".to_owned(), "true".to_owned()),
                ("UNRELATED".to_owned(), "x".to_owned()),
            ])
            .unwrap();
        assert_eq!(env.display_width, None);

        let cfg = Config::default().with_env(&env);
        assert_eq!(cfg.test.time_limit_ms, 1500);
        assert!(!cfg.test.color);
        assert_eq!(cfg.test.display_width, None);
    }

    #[test]
    fn config_is_found_in_ancestors() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("contest/abc/a");
        fsutil::mkdir_all(&nested).unwrap();
        assert_eq!(Config::find_file_in_ancestors(&nested), None);
        assert_eq!(Config::load_or_default(&nested).unwrap(), Config::default());

        let path = dir.path().join("contest").join(Config::FILENAME);
        fsutil::write(&path, "[test]\ncolor = false\n").unwrap();
        assert_eq!(Config::find_file_in_ancestors(&nested), Some(path.clone()));

        let cfg = Config::load_or_default(&nested).unwrap();
        assert_eq!(cfg.source_config_file, Some(path));
        assert!(!cfg.test.color);
    }
}
