//! Command implementations

pub mod config;
pub mod run;
pub mod session;

use anyhow::Result;
use predict_studio_core::StudioResult;
use predict_studio_workflow::{SessionContext, StatusLevel, StatusRegion};

use crate::chart::TerminalChart;
use crate::context::Context;

/// Start a workflow session against the configured service
pub fn open_session(ctx: &Context) -> Result<SessionContext> {
    let client = ctx.create_client()?;
    let charts = if ctx.output.is_table() {
        TerminalChart::stdout()
    } else {
        TerminalChart::hidden()
    };
    Ok(SessionContext::new(client, charts))
}

/// Turn the outcome of a workflow action into CLI output.
///
/// A success message left in `region` is printed. On failure the error is
/// labelled with what the user would have seen: the region's error status,
/// else the blocking notice, else the error's own message.
pub fn settle<T>(
    ctx: &Context,
    session: &mut SessionContext,
    region: StatusRegion,
    result: StudioResult<T>,
) -> Result<T> {
    let alert = session.status_mut().take_alert();
    let status = session.status().get(region).cloned();

    match result {
        Ok(value) => {
            if let Some(message) = status.filter(|m| m.level == StatusLevel::Success) {
                ctx.output.status(&message);
            }
            Ok(value)
        }
        Err(err) => {
            let label = status
                .filter(|m| m.level == StatusLevel::Error)
                .map(|m| m.text)
                .or(alert)
                .unwrap_or_else(|| err.user_message());
            Err(anyhow::Error::new(err).context(label))
        }
    }
}

pub fn finish(spinner: Option<indicatif::ProgressBar>) {
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
}

/// Split `column=value` arguments into raw form inputs
pub fn parse_inputs(pairs: &[String]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((column, value)) if !column.trim().is_empty() => {
                Ok((column.trim().to_string(), value.to_string()))
            }
            _ => anyhow::bail!("Expected COLUMN=VALUE, got '{}'", pair),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inputs() {
        let inputs = parse_inputs(&["a=1.5".to_string(), " c =red=blue".to_string(), "b=".to_string()]).unwrap();
        assert_eq!(
            inputs,
            vec![
                ("a".to_string(), "1.5".to_string()),
                ("c".to_string(), "red=blue".to_string()),
                ("b".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_parse_inputs_rejects_missing_separator() {
        assert!(parse_inputs(&["a".to_string()]).is_err());
        assert!(parse_inputs(&["=1".to_string()]).is_err());
    }
}
