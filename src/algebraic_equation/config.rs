//! Output and numerics settings.
//!
//! The settings are a plain value owned by the caller and passed by reference to whatever
//! renders or solves. They can be read from a toml document:
//! ```toml
//! [output]
//! show_code = false
//! human_text = true
//! label = true
//! solve_to_list = false
//!
//! [numerics]
//! integers_as_exact = false
//! ```
//! Every key is optional; missing keys keep their defaults.

use crate::symbolic::symbolic_errors::{AlgebraError, Result};
use std::fs;
use std::path::Path;
use toml::{Table, Value};

/// How equations and solve results are rendered
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputConfig {
    /// prefix every rendering with the code-literal form
    pub show_code: bool,
    /// `lhs = rhs` instead of `Equation(lhs, rhs)`
    pub human_text: bool,
    /// append the name the equation is bound to
    pub label: bool,
    /// solve returns a list instead of a set
    pub solve_to_list: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            show_code: false,
            human_text: true,
            label: true,
            solve_to_list: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NumericsConfig {
    /// integer literals in parsed text stay exact (`1/2` is a rational, not `0.5`)
    pub integers_as_exact: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlgebraConfig {
    pub output: OutputConfig,
    pub numerics: NumericsConfig,
}

fn read_bool(table: &Table, section: &str, key: &str, default: bool) -> Result<bool> {
    match table.get(key) {
        None => Ok(default),
        Some(Value::Boolean(b)) => Ok(*b),
        Some(other) => Err(AlgebraError::ValueError(format!(
            "[{}] {} must be a boolean, got {}",
            section,
            key,
            other.type_str()
        ))),
    }
}

fn check_keys(table: &Table, section: &str, known: &[&str]) -> Result<()> {
    match table.keys().find(|k| !known.contains(&k.as_str())) {
        Some(unknown) => Err(AlgebraError::ValueError(format!(
            "unknown key `{}` in [{}]",
            unknown, section
        ))),
        None => Ok(()),
    }
}

fn section<'a>(root: &'a Table, name: &str) -> Result<Option<&'a Table>> {
    match root.get(name) {
        None => Ok(None),
        Some(Value::Table(t)) => Ok(Some(t)),
        Some(other) => Err(AlgebraError::ValueError(format!(
            "[{}] must be a table, got {}",
            name,
            other.type_str()
        ))),
    }
}

impl AlgebraConfig {
    pub fn from_toml_str(text: &str) -> Result<AlgebraConfig> {
        let root: Table = text
            .parse()
            .map_err(|e: toml::de::Error| AlgebraError::ValueError(format!("invalid config: {}", e)))?;
        check_keys(&root, "root", &["output", "numerics"])?;
        let mut config = AlgebraConfig::default();
        if let Some(output) = section(&root, "output")? {
            check_keys(output, "output", &["show_code", "human_text", "label", "solve_to_list"])?;
            let d = OutputConfig::default();
            config.output = OutputConfig {
                show_code: read_bool(output, "output", "show_code", d.show_code)?,
                human_text: read_bool(output, "output", "human_text", d.human_text)?,
                label: read_bool(output, "output", "label", d.label)?,
                solve_to_list: read_bool(output, "output", "solve_to_list", d.solve_to_list)?,
            };
        }
        if let Some(numerics) = section(&root, "numerics")? {
            check_keys(numerics, "numerics", &["integers_as_exact"])?;
            config.numerics.integers_as_exact =
                read_bool(numerics, "numerics", "integers_as_exact", false)?;
        }
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<AlgebraConfig> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            AlgebraError::ValueError(format!("cannot read config {}: {}", path.display(), e))
        })?;
        AlgebraConfig::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AlgebraConfig::default();
        assert!(config.output.human_text);
        assert!(config.output.label);
        assert!(!config.output.show_code);
        assert!(!config.output.solve_to_list);
        assert!(!config.numerics.integers_as_exact);
    }

    #[test]
    fn test_from_toml_str_partial() {
        let config = AlgebraConfig::from_toml_str(
            "[output]\nshow_code = true\nhuman_text = false\n\n[numerics]\nintegers_as_exact = true\n",
        )
        .unwrap();
        assert!(config.output.show_code);
        assert!(!config.output.human_text);
        assert!(config.output.label);
        assert!(config.numerics.integers_as_exact);
    }

    #[test]
    fn test_bad_keys_and_types() {
        let unknown = AlgebraConfig::from_toml_str("[output]\ncolour = true\n");
        assert!(matches!(unknown, Err(AlgebraError::ValueError(_))));
        let wrong_type = AlgebraConfig::from_toml_str("[output]\nlabel = 1\n");
        assert!(matches!(wrong_type, Err(AlgebraError::ValueError(_))));
        let stray = AlgebraConfig::from_toml_str("verbose = true\n");
        assert!(matches!(stray, Err(AlgebraError::ValueError(_))));
        let broken = AlgebraConfig::from_toml_str("[output\n");
        assert!(matches!(broken, Err(AlgebraError::ValueError(_))));
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nsolve_to_list = true").unwrap();
        let config = AlgebraConfig::from_toml_file(file.path()).unwrap();
        assert!(config.output.solve_to_list);
        assert!(AlgebraConfig::from_toml_file("/nonexistent/algebra.toml").is_err());
    }
}
