//! User configuration loading and per-tool argument derivation.
//!
//! The config file has two independent sections keyed by tool identity:
//!
//! ```yaml
//! yamllint:
//!   rules:
//!     line-length: disable
//! actionlint:
//!   flags: ["-shellcheck="]
//! ```
//!
//! TOML is accepted as well (chosen by file extension). An absent file or
//! section yields that tool's built-in defaults; a malformed file is a
//! fatal `Config` error surfaced before any linting begins.

use crate::error::WalintError;
use crate::models::ToolConfig;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize, Clone)]
/// Root user configuration. Unknown keys are ignored.
pub struct UserConfig {
    #[serde(default)]
    pub yamllint: Option<YamllintCfg>,
    #[serde(default)]
    pub actionlint: Option<ActionlintCfg>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// `yamllint` section: rule name -> effect (e.g. `disable`, `enable`,
/// or a literal rule setting string).
pub struct YamllintCfg {
    #[serde(default)]
    pub rules: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// `actionlint` section: verbatim flags appended to every invocation.
pub struct ActionlintCfg {
    #[serde(default)]
    pub flags: Vec<String>,
}

/// Rules applied when no `yamllint` section is configured.
fn default_yamllint_rules() -> BTreeMap<String, String> {
    let mut rules = BTreeMap::new();
    rules.insert("line-length".to_string(), "disable".to_string());
    rules
}

/// Load the user config from `path`, or defaults when absent.
///
/// TOML for `.toml` files, YAML otherwise. Parse failures are fatal.
pub fn load_user_config(path: Option<&Path>) -> Result<UserConfig, WalintError> {
    let Some(path) = path else {
        return Ok(UserConfig::default());
    };
    let raw = fs::read_to_string(path).map_err(|e| WalintError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let is_toml = path.extension().is_some_and(|e| e == "toml");
    let cfg = if is_toml {
        toml::from_str::<UserConfig>(&raw).map_err(|e| WalintError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        serde_yaml::from_str::<UserConfig>(&raw).map_err(|e| WalintError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    };
    Ok(cfg)
}

/// Derive the two tool configs from the user configuration.
///
/// The sections are independent: a key only one tool recognizes never
/// affects the other's arguments. `json` requests structured output from
/// actionlint.
pub fn translate(cfg: &UserConfig, json: bool) -> (ToolConfig, ToolConfig) {
    (yamllint_config(cfg), actionlint_config(cfg, json))
}

fn yamllint_config(cfg: &UserConfig) -> ToolConfig {
    let rules = cfg
        .yamllint
        .as_ref()
        .map(|y| y.rules.clone())
        .unwrap_or_else(default_yamllint_rules);
    let rules_str = rules
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join(", ");
    ToolConfig {
        args: vec![
            "-f".to_string(),
            "parsable".to_string(),
            "-d".to_string(),
            format!("{{extends: default, rules: {{{}}}}}", rules_str),
        ],
    }
}

fn actionlint_config(cfg: &UserConfig, json: bool) -> ToolConfig {
    let mut args = if json {
        vec!["-format=json".to_string()]
    } else {
        vec!["-no-color".to_string()]
    };
    if let Some(al) = cfg.actionlint.as_ref() {
        args.extend(al.flags.iter().cloned());
    }
    ToolConfig { args }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_absent_file_yields_defaults() {
        let cfg = load_user_config(None).unwrap();
        let (yaml, act) = translate(&cfg, false);
        assert_eq!(yaml.args[0], "-f");
        assert_eq!(yaml.args[1], "parsable");
        assert!(yaml.args[3].contains("line-length: disable"));
        assert_eq!(act.args, vec!["-no-color".to_string()]);
    }

    #[test]
    fn test_yaml_config_overrides_rules() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("walint.yaml");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(
            f,
            "{}",
            r#"
yamllint:
  rules:
    truthy: disable
    indentation: enable
actionlint:
  flags: ["-shellcheck="]
"#
        )
        .unwrap();

        let cfg = load_user_config(Some(&path)).unwrap();
        let (yaml, act) = translate(&cfg, false);
        // BTreeMap keeps rule order deterministic
        assert!(yaml.args[3].contains("indentation: enable, truthy: disable"));
        // Explicit section replaces defaults entirely
        assert!(!yaml.args[3].contains("line-length"));
        assert_eq!(act.args, vec!["-no-color".to_string(), "-shellcheck=".to_string()]);
    }

    #[test]
    fn test_toml_config_by_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("walint.toml");
        fs::write(
            &path,
            "[yamllint.rules]\n\"line-length\" = \"enable\"\n\n[actionlint]\nflags = []\n",
        )
        .unwrap();

        let cfg = load_user_config(Some(&path)).unwrap();
        let (yaml, _) = translate(&cfg, false);
        assert!(yaml.args[3].contains("line-length: enable"));
    }

    #[test]
    fn test_missing_section_keeps_other_tool_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("walint.yaml");
        fs::write(&path, "actionlint:\n  flags: [\"-pyflakes=\"]\n").unwrap();

        let cfg = load_user_config(Some(&path)).unwrap();
        let (yaml, act) = translate(&cfg, false);
        // yamllint section absent: documented defaults apply, independent
        // of what the actionlint section says.
        assert!(yaml.args[3].contains("line-length: disable"));
        assert!(act.args.contains(&"-pyflakes=".to_string()));
    }

    #[test]
    fn test_malformed_config_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("walint.yaml");
        fs::write(&path, "yamllint: [не: a: mapping\n").unwrap();

        let err = load_user_config(Some(&path)).unwrap_err();
        assert!(matches!(err, WalintError::Config { .. }));
    }

    #[test]
    fn test_json_flag_switches_actionlint_format() {
        let cfg = UserConfig::default();
        let (_, act) = translate(&cfg, true);
        assert_eq!(act.args[0], "-format=json");
    }
}
