use anyhow::Result;
use clap::Args;
use inputs_core::{VariableKind, VariableToken};

#[derive(Args)]
pub struct VariableArgs {
    #[arg(help = "Variable, e.g. #App:9876:http.content!Binary")]
    pub variable: String
}

pub fn method_name(args: VariableArgs) -> Result<()> {
    let token: VariableToken = args.variable.parse()?;
    println!("{}", token.method_name());
    Ok(())
}

pub fn parse_variable(args: VariableArgs) -> Result<()> {
    let token: VariableToken = args.variable.parse()?;
    let kind = match &token.kind {
        VariableKind::Scalar(_) => "scalar",
        VariableKind::Array(_) => "array",
        VariableKind::Custom(_) => "custom"
    };
    let output = serde_json::json!({
        "namespace": token.namespace.to_string(),
        "id": token.id,
        "dotted_name": token.dotted_name,
        "type": token.type_name(),
        "kind": kind,
        "method_name": token.method_name()
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
