// (C) COPYRIGHT 2018 TECHNOLUTION BV, GOUDA NL

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::errors::*;
use fault_demos::{RunMode, Step};

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

/// Default configuration file, looked up in the working directory.
pub static DEFAULT_CONFIG_PATH: &str = "buggy.toml";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigFileOptions {
    pub mode: Option<RunMode>,
    pub max_loop_iterations: Option<u64>,
    pub skip: Vec<Step>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    mode: Option<RunMode>,
    max_loop_iterations: Option<u64>,
    skip: Option<Vec<Step>>,
}

impl From<Config> for ConfigFileOptions {
    fn from(toml: Config) -> Self {
        ConfigFileOptions {
            mode: toml.mode,
            max_loop_iterations: toml.max_loop_iterations,
            skip: toml.skip.unwrap_or_default(),
        }
    }
}

fn display_path(path: &Path) -> String {
    path.to_str().unwrap_or("<unknown>").to_string()
}

pub fn parse_config(path: &str, required: bool) -> Result<ConfigFileOptions> {
    let path = Path::new(path);

    if !path.exists() {
        if required {
            return Err(ErrorKind::ConfigLoad(
                display_path(path),
                Some("File does not exist".to_string()),
            ).into());
        }
        debug!(path = %display_path(path), "no configuration file, using defaults");
        return Ok(ConfigFileOptions::default());
    }

    // Read configuration file
    let mut file =
        File::open(path).chain_err(|| ErrorKind::ConfigLoad(display_path(path), None))?;

    let mut file_content = Vec::<u8>::new();
    file.read_to_end(&mut file_content)
        .chain_err(|| ErrorKind::ConfigLoad(display_path(path), None))?;

    let options = parse_config_content(&file_content, &display_path(path))?;
    debug!(path = %display_path(path), ?options, "loaded configuration file");
    Ok(options)
}

/// Parse the TOML content of a configuration file. `origin` is only used in error messages.
pub fn parse_config_content(content: &[u8], origin: &str) -> Result<ConfigFileOptions> {
    let config: Config = toml::de::from_slice(content)
        .map_err(|err| ErrorKind::ConfigLoad(origin.to_string(), Some(err.to_string())))?;

    Ok(ConfigFileOptions::from(config))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_full_config() {
        let content = br#"
            mode = "isolated"
            max_loop_iterations = 5
            skip = ["bounds-check", "dead-branch"]
        "#;

        let options = parse_config_content(content, "buggy.toml").unwrap();

        assert_eq!(
            options,
            ConfigFileOptions {
                mode: Some(RunMode::Isolated),
                max_loop_iterations: Some(5),
                skip: vec![Step::BoundsCheck, Step::DeadBranch],
            }
        );
    }

    #[test]
    fn test_empty_config_is_default() {
        let options = parse_config_content(b"", "buggy.toml").unwrap();
        assert_eq!(options, ConfigFileOptions::default());
    }

    /// Unknown step names are rejected, and the error names the file
    #[test]
    fn test_unknown_step_rejected() {
        let error = parse_config_content(br#"skip = ["segfault"]"#, "custom.toml").unwrap_err();
        assert!(error
            .to_string()
            .starts_with("Unable to read config file `custom.toml`: "));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(parse_config_content(b"loop_cap = 3", "buggy.toml").is_err());
    }

    #[test]
    /// The error names the file and carries the message of the TOML parser
    fn test_malformed_toml_rejected() {
        let parser_message = toml::de::from_slice::<Config>(b"mode = ")
            .err()
            .unwrap()
            .to_string();
        let error = parse_config_content(b"mode = ", "buggy.toml").unwrap_err();

        assert!(error
            .to_string()
            .starts_with("Unable to read config file `buggy.toml`: "));
        assert_eq!(
            error.to_string(),
            format!("Unable to read config file `buggy.toml`: {}", parser_message)
        );
    }

    #[test]
    fn test_missing_optional_file_is_default() {
        let options = parse_config("this/file/does/not/exist.toml", false).unwrap();
        assert_eq!(options, ConfigFileOptions::default());
    }

    #[test]
    fn test_missing_required_file_is_error() {
        let error = parse_config("this/file/does/not/exist.toml", true).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Unable to read config file `this/file/does/not/exist.toml`: File does not exist"
        );
    }
}
