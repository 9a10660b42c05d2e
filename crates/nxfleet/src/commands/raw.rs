//! `nxfleet show` and `nxfleet conf`: the transport without an entity.

use nxfleet_api::client::config_lines;
use nxfleet_core::{CoreError, DeviceSession};

use super::Context;
use crate::cli::{ConfArgs, OutputFormat, ShowArgs};
use crate::error::CliError;
use crate::output::{self, row};

pub async fn show(args: ShowArgs, ctx: &Context) -> Result<(), CliError> {
    let command = args.command.join(" ");
    if !command.trim_start().starts_with("show") {
        return Err(CliError::validation("command", "only show commands are accepted"));
    }
    let format = ctx.format;
    let (command, jsonrpc) = (command.as_str(), args.jsonrpc);
    ctx.run(&args.targets, |s| show_lines(s, command, jsonrpc, format))
        .await;
    Ok(())
}

pub async fn conf(args: ConfArgs, ctx: &Context) -> Result<(), CliError> {
    let text = std::fs::read_to_string(&args.file).map_err(|source| CliError::Io {
        path: args.file.display().to_string(),
        source,
    })?;
    let statements = config_lines(&text);
    if statements.is_empty() {
        return Err(CliError::validation("file", "no configuration statements found"));
    }
    let format = ctx.format;
    let statements = statements.as_slice();
    ctx.run(&args.targets, |s| conf_lines(s, statements, format))
        .await;
    Ok(())
}

/// `device: code message`, then each body as pretty JSON.
async fn show_lines(
    mut s: DeviceSession,
    command: &str,
    jsonrpc: bool,
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let response = if jsonrpc {
        s.client.show_json_rpc(command).await?
    } else {
        s.client.show(command).await?
    };
    if format == OutputFormat::Json {
        return Ok(output::render(format, &s.device, response.code, response, Vec::new()));
    }
    let mut lines = vec![format!("{}: {} {}", s.device, response.code, response.message)];
    for body in &response.bodies {
        lines.extend(output::pretty_lines(&s.device, body));
    }
    Ok(lines)
}

/// `device line code message` per statement.
async fn conf_lines(
    mut s: DeviceSession,
    statements: &[String],
    format: OutputFormat,
) -> Result<Vec<String>, CoreError> {
    let response = s.client.conf(statements).await?;
    let code = response
        .codes
        .iter()
        .copied()
        .find(|c| !c.is_success())
        .unwrap_or(nxfleet_api::ResultCode::SUCCESS);
    let rows = statements
        .iter()
        .zip(response.codes.iter().zip(&response.messages))
        .map(|(statement, (code, message))| {
            row![code, format!("\"{statement}\""), format!("\"{message}\"")]
        })
        .collect();
    Ok(output::render(format, &s.device, code, &response, rows))
}
