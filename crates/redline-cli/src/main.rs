mod session;

use anyhow::{Context, Result};
use redline_config::Config;
use redline_engine::{EditorOptions, InitialValue, SentenceValue, ValueFile};
use session::{Command, Session};
use std::{
    env,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let default_filter = config.log_filter.as_deref().unwrap_or("warn");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    log::info!("Config path: {}", config_path.display());

    let cli_value = match args.len() {
        1 => None,
        2 => Some(PathBuf::from(&args[1])),
        _ => {
            eprintln!("Usage: {} [value.toml]", args[0]);
            process::exit(1);
        }
    };

    let value = match &config.value_file(cli_value) {
        Some(path) => load_value(path)?,
        None => demo_value(),
    };

    let options = EditorOptions {
        history_capacity: config.history.capacity,
    };
    let mut session = Session::new(&value, options)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "redline: type 'help' for commands")?;

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(stdout, "error: {e}")?;
                continue;
            }
        };
        match session.run(command, &mut stdout) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => writeln!(stdout, "error: {e:#}")?,
        }
        stdout.flush()?;
    }

    Ok(())
}

/// Read an initial value from a TOML file of `[[paragraphs]]` tables
fn load_value(path: &Path) -> Result<InitialValue> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read value file {}", path.display()))?;
    let file: ValueFile = toml::from_str(&content)
        .with_context(|| format!("failed to parse value file {}", path.display()))?;
    Ok(file.into())
}

fn demo_value() -> InitialValue {
    InitialValue::new(vec![
        vec![
            SentenceValue::new("Hello world.", true),
            SentenceValue::new("How are you", false),
        ],
        vec![],
        vec![
            SentenceValue::new("Where are you going today?", true),
            SentenceValue::new("To the swimming pool.", true),
        ],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn load_value_reads_paragraph_tables() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("value.toml");
        std::fs::write(
            &path,
            r#"
[[paragraphs]]
sentences = [{ text = "One.", special = true }, { text = "Two." }]

[[paragraphs]]
"#,
        )
        .unwrap();

        let value = load_value(&path).unwrap();

        assert_eq!(
            value,
            InitialValue::new(vec![
                vec![SentenceValue::new("One.", true), SentenceValue::new("Two.", false)],
                vec![],
            ])
        );
    }

    #[test]
    fn load_value_missing_file_mentions_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.toml");

        let err = load_value(&path).unwrap_err();

        assert!(format!("{err:#}").contains("missing.toml"));
    }

    #[test]
    fn demo_value_has_an_empty_paragraph() {
        assert!(demo_value().paragraphs()[1].is_empty());
    }
}
