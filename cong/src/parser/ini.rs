//! INI documents. `[section]` headers open a nested mapping (dotted section
//! names nest further); keys before the first header or under `[default]`
//! live at the root.

use super::{Parser, text};
use crate::error::BoxError;
use crate::value::Value;

/// `[section]` plus `key = value` parser.
#[derive(Clone, Copy, Debug, Default)]
pub struct IniParser;

impl Parser for IniParser {
    fn parse(&self, data: &[u8]) -> Result<Value, BoxError> {
        let mut tree = Value::mapping();
        let mut section: Vec<String> = Vec::new();
        for (idx, raw) in text(data)?.lines().enumerate() {
            let line = raw.trim();
            let line_no = idx + 1;
            if line.is_empty() || line.starts_with([';', '#']) {
                continue;
            }
            if let Some(header) = line.strip_prefix('[') {
                let name = header
                    .strip_suffix(']')
                    .ok_or_else(|| format!("line {line_no}: unterminated section header"))?
                    .trim();
                section = if name.is_empty() || name.eq_ignore_ascii_case("default") {
                    Vec::new()
                } else {
                    name.split('.').map(|part| part.trim().to_owned()).collect()
                };
                continue;
            }
            let (raw_key, value) = line
                .split_once(['=', ':'])
                .ok_or_else(|| format!("line {line_no}: expected 'key = value'"))?;
            let key = raw_key.trim();
            if key.is_empty() {
                return Err(format!("line {line_no}: missing key").into());
            }
            let mut path: Vec<&str> = section.iter().map(String::as_str).collect();
            path.extend(key.split('.'));
            tree.insert_path(&path, Value::from(unquote(value.trim())));
        }
        Ok(tree)
    }
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|quote| value.strip_prefix(quote)?.strip_suffix(quote))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_nest_and_default_is_root() -> anyhow::Result<()> {
        let tree = IniParser
            .parse(concat!(
                "name = root\n; note\n[DEFAULT]\ntimeout = 5\n",
                "[server]\nport = 80\nname = \"web\"\n[app.meta]\nowner: ops\n"
            ).as_bytes())
            .map_err(|err| anyhow::anyhow!(err))?;
        anyhow::ensure!(tree.lookup("name") == Some(&Value::from("root")), "{tree:?}");
        anyhow::ensure!(tree.lookup("timeout") == Some(&Value::from("5")), "{tree:?}");
        anyhow::ensure!(tree.lookup("server.port") == Some(&Value::from("80")), "{tree:?}");
        anyhow::ensure!(tree.lookup("server.name") == Some(&Value::from("web")), "{tree:?}");
        anyhow::ensure!(tree.lookup("app.meta.owner") == Some(&Value::from("ops")), "{tree:?}");
        Ok(())
    }

    #[test]
    fn lines_without_separator_are_rejected() {
        let err = IniParser.parse(b"[server]\nport\n").err();
        assert_eq!(
            err.map(|e| e.to_string()),
            Some("line 2: expected 'key = value'".to_owned())
        );
    }
}
