use std::sync::Arc;

use crate::api::GhostClient;
use crate::error::{GhostError, Result};
use crate::params::{ActionInputs, Target};
use crate::report::Reporter;
use crate::transport::Transport;

/// Caller-visible results of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outputs {
    Post { id: String, url: String },
    Image { url: String },
}

impl Outputs {
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        match self {
            Outputs::Post { id, url } => {
                vec![("post_id", id.as_str()), ("post_url", url.as_str())]
            }
            Outputs::Image { url } => vec![("image_url", url.as_str())],
        }
    }
}

/// Validates inputs, talks to Ghost and writes outputs. Outputs are only
/// written once the remote call has succeeded.
pub async fn run(inputs: ActionInputs, reporter: Arc<dyn Reporter>) -> Result<Outputs> {
    let request = inputs.into_request()?;
    let client = GhostClient::new(&request.ghost_url, &request.admin_api_key, reporter.clone())?;
    tracing::debug!(endpoint = client.config().base_endpoint(), "Ghost client ready");

    let outputs = execute(&client, request.target, reporter.as_ref()).await?;
    reporter
        .set_outputs(&outputs.pairs())
        .map_err(GhostError::Output)?;
    Ok(outputs)
}

/// Runs the whole action and turns any error, including a failed input
/// load, into a single `set_failed` report. Returns whether it succeeded.
pub async fn invoke(inputs: anyhow::Result<ActionInputs>, reporter: Arc<dyn Reporter>) -> bool {
    let outcome = match inputs {
        Ok(inputs) => run(inputs, reporter.clone())
            .await
            .map_err(anyhow::Error::from),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(_) => true,
        Err(e) => {
            reporter.set_failed(&format!("Action failed: {e:#}"));
            false
        }
    }
}

pub async fn execute<T: Transport>(
    client: &GhostClient<T>,
    target: Target,
    reporter: &dyn Reporter,
) -> Result<Outputs> {
    match target {
        Target::Post(input) => {
            let result = client.publish(&input).await?;
            reporter.info(&format!("✅ Post \"{}\" created successfully!", result.title));
            reporter.info(&format!("📝 Post URL: {}", result.url));
            reporter.info(&format!("🆔 Post ID: {}", result.id));
            Ok(Outputs::Post {
                id: result.id,
                url: result.url,
            })
        }
        Target::Image(path) => {
            let url = client.upload_image(&path).await?;
            reporter.info("✅ Image uploaded successfully!");
            reporter.info(&format!("🖼️ Image URL: {url}"));
            Ok(Outputs::Image { url })
        }
    }
}
