use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

/// Side channel for progress messages, outputs and the final failure.
pub trait Reporter: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
    /// Writes every output in one batch so callers never see a partial set.
    fn set_outputs(&self, outputs: &[(&str, &str)]) -> io::Result<()>;
    fn set_failed(&self, message: &str);
}

/// Reports through GitHub Actions workflow commands and `$GITHUB_OUTPUT`.
#[derive(Debug, Default)]
pub struct ActionsReporter {
    output_file: Option<PathBuf>,
}

impl ActionsReporter {
    pub fn new(output_file: Option<PathBuf>) -> Self {
        Self { output_file }
    }

    pub fn from_env() -> Self {
        let output_file = std::env::var_os("GITHUB_OUTPUT")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::new(output_file)
    }
}

impl Reporter for ActionsReporter {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
        println!("::error::{}", escape_data(message));
    }

    fn set_outputs(&self, outputs: &[(&str, &str)]) -> io::Result<()> {
        match &self.output_file {
            Some(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                file.write_all(format_outputs(outputs).as_bytes())
            }
            None => {
                for (name, value) in outputs {
                    println!("::set-output name={name}::{}", escape_data(value));
                }
                Ok(())
            }
        }
    }

    fn set_failed(&self, message: &str) {
        self.error(message);
    }
}

const OUTPUT_DELIMITER: &str = "ghadelimiter_ghost_publish";

fn format_outputs(outputs: &[(&str, &str)]) -> String {
    let mut buf = String::new();
    for (name, value) in outputs {
        if value.contains('\n') || value.contains('\r') {
            let mut delimiter = OUTPUT_DELIMITER.to_string();
            while value.contains(&delimiter) {
                delimiter.push('_');
            }
            buf.push_str(&format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"));
        } else {
            buf.push_str(&format!("{name}={value}\n"));
        }
    }
    buf
}

/// Escapes a workflow command payload.
fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
