use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::Deserialize;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:4221";
pub const DEFAULT_WORKERS: usize = 16;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// Root directory for the `/files/` routes
    pub directory: PathBuf,
    /// Maximum number of connections served concurrently
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            directory: PathBuf::from("."),
            workers: DEFAULT_WORKERS,
        }
    }
}

impl Config {
    /// Loads from the process arguments and environment.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_args(std::env::args().skip(1))
    }

    /// Builds a config from CLI flags (without the program name).
    ///
    /// Layering, lowest first: defaults, `--config <file>` YAML, the
    /// `LISTEN` environment variable, then the remaining flags.
    pub fn from_args<I, S>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let flags = parse_flags(&args)?;

        let mut cfg = match &flags.config_file {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };

        if let Ok(listen) = std::env::var("LISTEN") {
            cfg.listen_addr = listen;
        }

        if let Some(dir) = flags.directory {
            cfg.directory = dir;
        }
        if let Some(listen) = flags.listen_addr {
            cfg.listen_addr = listen;
        }
        if let Some(workers) = flags.workers {
            cfg.workers = workers;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(text)?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.workers == 0 {
            bail!("workers must be at least 1");
        }
        Ok(())
    }
}

#[derive(Default)]
struct Flags {
    config_file: Option<PathBuf>,
    directory: Option<PathBuf>,
    listen_addr: Option<String>,
    workers: Option<usize>,
}

fn parse_flags(args: &[String]) -> anyhow::Result<Flags> {
    let mut flags = Flags::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .with_context(|| format!("{arg} requires a value"))
        };

        match arg.as_str() {
            "--directory" => flags.directory = Some(PathBuf::from(value()?)),
            "--config" => flags.config_file = Some(PathBuf::from(value()?)),
            "--listen" => flags.listen_addr = Some(value()?),
            "--workers" => {
                let raw = value()?;
                let n = raw
                    .parse()
                    .with_context(|| format!("invalid --workers value `{raw}`"))?;
                flags.workers = Some(n);
            }
            other => tracing::warn!(flag = %other, "Ignoring unknown argument"),
        }
    }

    Ok(flags)
}
