use crate::output;
use crate::ux_error;
use anyhow::Result;
use clap::Args;
use config::{
    AppDescriptor, Collaborators, HttpParameterService, Inputs, InputsSettings, load_from_env,
    load_schema,
};
use errors::InputsError;
use inputs_core::ConfigMap;
use std::path::PathBuf;
use std::sync::Arc;
use storage::RedisStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Typed,
    Resolved,
}

#[derive(Args)]
pub struct InputsArgs {
    #[arg(long, help = "JSON file of initial inputs")]
    pub config_file: Option<PathBuf>,

    #[arg(long, help = "App descriptor declaring params and listDelimiter")]
    pub schema: Option<PathBuf>,

    #[arg(long, help = "Seed standard runtime inputs from environment variables")]
    pub env_defaults: bool,

    #[arg(long, default_value = "MainThread", help = "Context id for token registration")]
    pub context_id: String,

    #[arg(long, env = "INPUTS_REDIS_URL", help = "Redis URL for queued params and variables")]
    pub redis_url: Option<String>,

    #[arg(long, help = "Redis context hash used to resolve variables")]
    pub context: Option<String>,

    #[arg(long, default_value_t = 0.0, help = "Seconds to wait for queued params (0 waits forever)")]
    pub queue_timeout: f64,

    #[arg(long, env = "INPUTS_API_URL", help = "Base URL of the secure params API")]
    pub api_url: Option<String>,

    #[arg(last = true, help = "App arguments")]
    pub app_args: Vec<String>
}

pub async fn run(args: InputsArgs, view: View) -> Result<()> {
    let descriptor = match &args.schema {
        Some(path) => load_schema(path)?,
        None => AppDescriptor::default()
    };

    let mut settings = InputsSettings {
        config_file: args.config_file.clone(),
        context_id: args.context_id.clone(),
        ..InputsSettings::default()
    };
    if let Some(delimiter) = &descriptor.list_delimiter {
        settings.list_delimiter = delimiter.clone();
    }

    let base = if args.env_defaults {
        load_from_env()
    } else {
        ConfigMap::new()
    };
    let collaborators = collaborators(&args).await?;

    let mut inputs = Inputs::new(
        settings,
        descriptor.schema(),
        collaborators,
        base,
        args.app_args
    )
    .inspect_err(explain)?;

    let rendered = match view {
        View::Typed => serde_json::to_string_pretty(inputs.parse().await.inspect_err(explain)?)?,
        View::Resolved => {
            serde_json::to_string_pretty(inputs.resolve().await.inspect_err(explain)?)?
        }
    };

    for arg in inputs.unknown_args() {
        output::warn(&format!("Unsupported arg found ({arg})."));
    }
    println!("{rendered}");
    Ok(())
}

async fn collaborators(args: &InputsArgs) -> Result<Collaborators> {
    let mut collaborators = Collaborators::default();

    if let Some(url) = &args.redis_url {
        let redis = RedisStorage::new(url).await?;
        collaborators.queue = Some(Arc::new(redis.queue_broker(args.queue_timeout)));
        match &args.context {
            Some(context) => {
                collaborators.store = Some(Arc::new(redis.key_value_store(context)));
            }
            None => output::info("No --context given; variables are not resolved")
        }
    }

    if let Some(api_url) = &args.api_url {
        collaborators.parameters = Some(Arc::new(HttpParameterService::new(api_url)));
    }

    Ok(collaborators)
}

fn explain(err: &InputsError) {
    if let Some(ux) = ux_error::for_inputs_error(err) {
        ux.display();
    }
}
