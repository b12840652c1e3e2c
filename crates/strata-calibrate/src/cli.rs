//! Command line options

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use strata_core::config::default_config_path;
use strata_core::export::MergeStrategy;

pub const USAGE: &str = "\
usage: strata-calibrate [DATA.csv] [options]
       strata-calibrate --analyze DRILLING.csv -r REFERENCE.csv -o BANDS.csv

  -r, --reference FILE    reference group order (CSV with a 地层信息 column)
  -c, --config FILE       layout configuration (YAML)
  -d, --dictionary FILE   existing formation dictionary to merge on export
      --replace-all       band data overwrites dictionary entries
      --expanded          start in expanded row mode
      --svg FILE          render DATA to an SVG file and exit
      --analyze FILE      derive a band file from a drilling log and exit
  -o, --output FILE       where --analyze writes the band file
  -h, --help              show this help";

/// Parsed launch options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchOptions {
    pub data: Option<PathBuf>,
    pub reference: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub dictionary: Option<PathBuf>,
    pub merge_strategy: MergeStrategy,
    pub expanded: bool,
    /// Headless mode: write an SVG snapshot here and exit
    pub svg: Option<PathBuf>,
    /// Headless mode: summarize this drilling log into `output` and exit
    pub analyze: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub help: bool,
}

impl LaunchOptions {
    /// Parse arguments (without the program name)
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .map(PathBuf::from)
                    .with_context(|| format!("{flag} needs a file argument"))
            };
            match arg.as_str() {
                "-r" | "--reference" => options.reference = Some(value(&arg)?),
                "-c" | "--config" => options.config = Some(value(&arg)?),
                "-d" | "--dictionary" => options.dictionary = Some(value(&arg)?),
                "--svg" => options.svg = Some(value(&arg)?),
                "--analyze" => options.analyze = Some(value(&arg)?),
                "-o" | "--output" => options.output = Some(value(&arg)?),
                "--replace-all" => options.merge_strategy = MergeStrategy::ReplaceAll,
                "--expanded" => options.expanded = true,
                "-h" | "--help" => options.help = true,
                flag if flag.starts_with('-') => bail!("unknown option {flag}"),
                _ if options.data.is_none() => options.data = Some(PathBuf::from(&arg)),
                _ => bail!("unexpected argument {arg}"),
            }
        }

        if options.svg.is_some() && options.data.is_none() {
            bail!("--svg needs a data file");
        }
        if options.analyze.is_some() {
            if options.svg.is_some() {
                bail!("--analyze and --svg cannot be combined");
            }
            if options.reference.is_none() || options.output.is_none() {
                bail!("--analyze needs --reference and --output");
            }
        } else if options.output.is_some() {
            bail!("--output is only used with --analyze");
        }
        Ok(options)
    }

    /// Explicit config file, else the per-user default
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<LaunchOptions> {
        LaunchOptions::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_full() {
        let options = parse(&[
            "wells.csv",
            "--reference",
            "order.csv",
            "-c",
            "layout.yaml",
            "--replace-all",
            "--expanded",
        ])
        .unwrap();
        assert_eq!(options.data, Some(PathBuf::from("wells.csv")));
        assert_eq!(options.reference, Some(PathBuf::from("order.csv")));
        assert_eq!(options.config, Some(PathBuf::from("layout.yaml")));
        assert_eq!(options.merge_strategy, MergeStrategy::ReplaceAll);
        assert!(options.expanded);
        assert!(options.svg.is_none());
    }

    #[test]
    fn test_parse_defaults() {
        let options = parse(&[]).unwrap();
        assert_eq!(options, LaunchOptions::default());
        assert_eq!(options.merge_strategy, MergeStrategy::KeepExisting);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&["--reference"]).is_err());
        assert!(parse(&["--bogus"]).is_err());
        assert!(parse(&["a.csv", "b.csv"]).is_err());
        assert!(parse(&["--svg", "out.svg"]).is_err());
        assert!(parse(&["a.csv", "--svg", "out.svg"]).is_ok());
        assert!(parse(&["-o", "bands.csv"]).is_err());
    }

    #[test]
    fn test_parse_analyze() {
        let options = parse(&["--analyze", "log.csv", "-r", "ref.csv", "-o", "bands.csv"]).unwrap();
        assert_eq!(options.analyze, Some(PathBuf::from("log.csv")));
        assert_eq!(options.output, Some(PathBuf::from("bands.csv")));
        assert!(options.data.is_none());

        assert!(parse(&["--analyze", "log.csv", "-o", "bands.csv"]).is_err());
        assert!(parse(&["--analyze", "log.csv", "-r", "ref.csv"]).is_err());
        assert!(parse(&[
            "a.csv", "--analyze", "log.csv", "-r", "ref.csv", "-o", "b.csv", "--svg", "x.svg"
        ])
        .is_err());
    }
}
