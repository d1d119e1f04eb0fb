use ghost_publish::action;
use ghost_publish::params::ActionInputs;
use ghost_publish::report::ActionsReporter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Inputs come from a TOML file when one is passed as the only argument,
/// otherwise from the `INPUT_*` environment set by the Actions runner.
fn load_inputs() -> anyhow::Result<ActionInputs> {
    match std::env::args_os().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            let inputs = ActionInputs::from_toml_file(&path)?;
            tracing::info!("Inputs loaded from {}", path.display());
            Ok(inputs)
        }
        None => Ok(ActionInputs::from_env()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let reporter = Arc::new(ActionsReporter::from_env());
    if action::invoke(load_inputs(), reporter).await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
