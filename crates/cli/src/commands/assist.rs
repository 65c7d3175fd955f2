//! `slugline assist` — Run the agent once against a screenplay file.

use slugline_agent::{AgentRunner, AssistRequest, StreamEvent};
use slugline_config::AppConfig;
use std::path::PathBuf;
use std::sync::Arc;

pub async fn run(
    message: String,
    file: Option<PathBuf>,
    voice: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let system_prompt = match voice {
        None => None,
        Some(name) => Some(
            config
                .voices
                .get(&name)
                .cloned()
                .ok_or_else(|| format!("Unknown voice '{name}' in config"))?,
        ),
    };

    let document = match &file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?,
        None => String::new(),
    };

    let provider = slugline_providers::from_config(&config)?;
    let tools = Arc::new(slugline_tools::default_registry());
    let runner = AgentRunner::new(provider, tools, slugline_gateway::run_config(&config));

    let mut rx = runner.run(AssistRequest {
        message,
        document: document.clone(),
        history: vec![],
        system_prompt,
    });

    let mut final_document: Option<String> = None;
    let mut failed = false;

    while let Some(event) = rx.recv().await {
        if let StreamEvent::ToolResult {
            updated_document: Some(doc),
            ..
        } = &event
        {
            final_document = Some(doc.clone());
        }
        if let StreamEvent::Error { .. } = &event {
            failed = true;
        }
        if json {
            print!("{}", event.to_ndjson_line()?);
            continue;
        }
        match &event {
            StreamEvent::Metadata {
                phase,
                provider,
                model,
            } => {
                eprintln!("  [{phase:?}] {provider} / {model}");
            }
            StreamEvent::Plan { plan } => {
                eprintln!("  Plan: {}", plan.summary);
                for (i, step) in plan.steps.iter().enumerate() {
                    eprintln!("    {}. {step}", i + 1);
                }
            }
            StreamEvent::Step {
                index, description, ..
            } => {
                if let Some(desc) = description {
                    eprintln!("  Step {}: {desc}", index + 1);
                }
            }
            StreamEvent::Text { content } => {
                print!("{content}");
            }
            StreamEvent::ToolCall { name, .. } => {
                eprintln!("  -> {name}");
            }
            StreamEvent::ToolResult { result, patch, .. } => {
                if let Some(patch) = patch {
                    eprintln!("     {} hunk(s) changed", patch.hunks.len());
                } else {
                    eprintln!("     {}", result.lines().next().unwrap_or(""));
                }
            }
            StreamEvent::Done { outcome } => {
                println!();
                eprintln!("  Finished ({outcome:?})");
            }
            StreamEvent::Error { error } => {
                println!();
                eprintln!("  [Error] {error}");
            }
        }
    }

    if let Some(updated) = final_document {
        match &file {
            Some(path) => {
                std::fs::write(path, &updated)
                    .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
                if !json {
                    eprintln!("  Wrote {}", path.display());
                }
            }
            None => {
                println!("{updated}");
            }
        }
    }

    if failed {
        return Err("Agent run failed".into());
    }
    Ok(())
}
