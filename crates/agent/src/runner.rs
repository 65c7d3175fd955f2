//! The plan/execute agent loop.
//!
//! A run has two phases against two independent conversations. The planning
//! phase makes one blocking completion call and parses a step plan out of
//! it. The execution phase then loops: stream a completion with the tool
//! manifest attached, dispatch any tool calls sequentially against the
//! current document snapshot, diff each document change, and feed results
//! back until the model answers without tools or the iteration cap is hit.
//!
//! Progress is reported over an mpsc channel of [`StreamEvent`]s populated
//! by a background task; dropping the receiver cancels the run at the next
//! loop boundary.

use crate::plan::{Plan, parse_plan};
use crate::stream_event::{Phase, RunOutcome, StepStatus, StreamEvent};
use slugline_core::Error;
use slugline_core::message::{Message, MessageToolCall};
use slugline_core::provider::{CompletionProvider, CompletionRequest, ToolDefinition};
use slugline_core::tool::{ToolCall, ToolRegistry};
use slugline_diff::calculate_diff;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Model profile for one phase of the run.
#[derive(Debug, Clone)]
pub struct PhaseProfile {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Settings for a whole run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub plan: PhaseProfile,
    pub execute: PhaseProfile,
    pub max_iterations: u32,
}

/// One assist request: what the user asked, the screenplay as it stands,
/// and prior conversation turns.
#[derive(Debug, Clone)]
pub struct AssistRequest {
    pub message: String,
    pub document: String,
    pub history: Vec<Message>,
    /// Voice/system instructions prepended to both phases
    pub system_prompt: Option<String>,
}

/// The agent loop entry point.
pub struct AgentRunner {
    provider: Arc<dyn CompletionProvider>,
    tools: Arc<ToolRegistry>,
    config: RunConfig,
}

impl AgentRunner {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        tools: Arc<ToolRegistry>,
        config: RunConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Start a run. Events arrive on the returned receiver; the channel
    /// closes after the terminal `done` or `error` event. Dropping the
    /// receiver stops the run at the next iteration boundary.
    pub fn run(&self, request: AssistRequest) -> mpsc::Receiver<StreamEvent> {
        let (tx, rx) = mpsc::channel::<StreamEvent>(128);

        let provider = self.provider.clone();
        let tools = self.tools.clone();
        let config = self.config.clone();

        tokio::spawn(async move {
            match run_inner(provider, tools, config, request, &tx).await {
                Ok(Some(outcome)) => {
                    let _ = tx.send(StreamEvent::Done { outcome }).await;
                }
                // Cancelled: nobody is listening for a terminal event
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "Agent run failed");
                    let _ = tx.send(StreamEvent::Error {
                        error: e.to_string(),
                    })
                    .await;
                }
            }
        });

        rx
    }
}

/// Drive one run to its outcome. `Ok(None)` means the consumer went away
/// and the run was cancelled.
async fn run_inner(
    provider: Arc<dyn CompletionProvider>,
    tools: Arc<ToolRegistry>,
    config: RunConfig,
    request: AssistRequest,
    tx: &mpsc::Sender<StreamEvent>,
) -> Result<Option<RunOutcome>, Error> {
    let tool_defs = tools.definitions();

    // ── Planning phase ──
    let _ = tx
        .send(StreamEvent::Metadata {
            phase: Phase::Plan,
            provider: provider.name().to_string(),
            model: config.plan.model.clone(),
        })
        .await;

    let mut plan_messages = vec![Message::system(planning_system_prompt(&request, &tool_defs))];
    plan_messages.extend(request.history.iter().cloned());
    plan_messages.push(Message::user(&request.message));

    let plan_response = provider
        .complete(CompletionRequest {
            model: config.plan.model.clone(),
            messages: plan_messages,
            temperature: config.plan.temperature,
            max_tokens: Some(config.plan.max_tokens),
            // The plan author sees the tool shapes but is not expected to
            // invoke them
            tools: tool_defs.clone(),
        })
        .await?;

    let plan = match parse_plan(&plan_response.message.content) {
        Some(plan) => plan,
        None => {
            debug!("Planning response had no parseable plan, using fallback");
            Plan::fallback(&request.message)
        }
    };

    info!(steps = plan.steps.len(), "Plan ready");
    let _ = tx.send(StreamEvent::Plan { plan: plan.clone() }).await;

    // The caller sees the model's rationale even though only the parsed
    // plan drives execution
    if !plan_response.message.content.is_empty() {
        let _ = tx
            .send(StreamEvent::Text {
                content: plan_response.message.content.clone(),
            })
            .await;
    }

    // ── Execution phase ──
    let _ = tx
        .send(StreamEvent::Metadata {
            phase: Phase::Execute,
            provider: provider.name().to_string(),
            model: config.execute.model.clone(),
        })
        .await;

    // A fresh conversation: the planning turn is carried over as plain
    // assistant text, never its reasoning trace.
    let mut messages = vec![Message::system(execution_system_prompt(&request, &plan))];
    messages.extend(request.history.iter().cloned());
    messages.push(Message::user(&request.message));
    messages.push(Message::assistant(&plan_response.message.content));
    messages.push(Message::user(
        "Execute the plan now. Use the tools to change the screenplay; when the work is done, reply without calling any tool.",
    ));

    let mut document = request.document.clone();
    let mut current_step = 0usize;
    let mut step_announced = false;

    for iteration in 0..config.max_iterations {
        if tx.is_closed() {
            debug!(iteration, "Consumer went away, stopping run");
            return Ok(None);
        }

        if !step_announced && current_step < plan.steps.len() {
            let _ = tx
                .send(StreamEvent::Step {
                    index: current_step,
                    status: StepStatus::InProgress,
                    description: Some(plan.steps[current_step].clone()),
                })
                .await;
            step_announced = true;
        }

        let mut stream = provider
            .stream(CompletionRequest {
                model: config.execute.model.clone(),
                messages: messages.clone(),
                temperature: config.execute.temperature,
                max_tokens: Some(config.execute.max_tokens),
                tools: tool_defs.clone(),
            })
            .await?;

        // Accumulate the full turn from streaming chunks
        let mut content = String::new();
        let mut reasoning = String::new();
        let mut tool_calls: Vec<MessageToolCall> = Vec::new();

        while let Some(chunk_result) = stream.recv().await {
            let chunk = chunk_result?;

            if let Some(text) = chunk.content {
                if !text.is_empty() {
                    content.push_str(&text);
                    let _ = tx.send(StreamEvent::Text { content: text }).await;
                }
            }
            if let Some(delta) = chunk.reasoning {
                reasoning.push_str(&delta);
            }
            for tc in chunk.tool_calls {
                // Merge or add tool call deltas
                if let Some(existing) = tool_calls.iter_mut().find(|t| t.id == tc.id) {
                    existing.arguments.push_str(&tc.arguments);
                } else {
                    tool_calls.push(tc);
                }
            }
        }

        // ── Final answer: no tools requested ──
        if tool_calls.is_empty() {
            if step_announced {
                let _ = tx
                    .send(StreamEvent::Step {
                        index: current_step,
                        status: StepStatus::Completed,
                        description: None,
                    })
                    .await;
            }
            info!(iterations = iteration + 1, "Run completed");
            return Ok(Some(RunOutcome::Completed));
        }

        let mut assistant_msg = Message::assistant(&content);
        assistant_msg.tool_calls = tool_calls.clone();
        if provider.replays_reasoning() && !reasoning.is_empty() {
            assistant_msg.reasoning = Some(reasoning);
        }
        messages.push(assistant_msg);

        // ── Dispatch tool calls sequentially against the snapshot ──
        for tc in &tool_calls {
            let input: serde_json::Value = serde_json::from_str(&tc.arguments).unwrap_or_default();
            let _ = tx
                .send(StreamEvent::ToolCall {
                    name: tc.name.clone(),
                    input: input.clone(),
                })
                .await;

            let call = ToolCall {
                id: tc.id.clone(),
                name: tc.name.clone(),
                input,
            };

            match tools.dispatch(&call, &document).await {
                Ok(outcome) => {
                    let (patch, updated) = match outcome.updated_document {
                        Some(new_doc) => {
                            let diff = calculate_diff(&document, &new_doc);
                            let patch = if diff.hunks.is_empty() { None } else { Some(diff) };
                            document = new_doc.clone();
                            (patch, Some(new_doc))
                        }
                        None => (None, None),
                    };
                    let _ = tx
                        .send(StreamEvent::ToolResult {
                            name: tc.name.clone(),
                            result: outcome.result.clone(),
                            patch,
                            updated_document: updated,
                        })
                        .await;
                    messages.push(Message::tool_result(&tc.id, &outcome.result));
                }
                Err(e) => {
                    // A failed dispatch may have left the edit half-applied;
                    // the run ends with the terminal error event instead of
                    // handing the failure back to the model
                    warn!(tool = %tc.name, error = %e, "Tool dispatch failed, ending run");
                    return Err(e.into());
                }
            }
        }

        // One step per iteration that made tool calls
        if step_announced {
            let _ = tx
                .send(StreamEvent::Step {
                    index: current_step,
                    status: StepStatus::Completed,
                    description: None,
                })
                .await;
            current_step += 1;
            step_announced = false;
        }
    }

    warn!(max_iterations = config.max_iterations, "Iteration cap reached");
    Ok(Some(RunOutcome::IterationLimit))
}

const PLANNING_INSTRUCTIONS: &str = "You are the planning half of a screenplay writing assistant. \
Read the screenplay and the request, then answer with ONLY a JSON object of the form \
{\"summary\": \"one sentence\", \"steps\": [\"step 1\", \"step 2\"]}. \
Keep steps concrete and few; each step should map to one or two tool uses.";

fn planning_system_prompt(request: &AssistRequest, tool_defs: &[ToolDefinition]) -> String {
    let mut prompt = String::new();
    if let Some(ref voice) = request.system_prompt {
        prompt.push_str(voice);
        prompt.push_str("\n\n");
    }
    prompt.push_str(PLANNING_INSTRUCTIONS);

    prompt.push_str("\n\nAvailable tools:\n");
    for def in tool_defs {
        prompt.push_str(&format!("- {}: {}\n", def.name, def.description));
    }

    prompt.push_str("\nCurrent screenplay:\n---\n");
    if request.document.is_empty() {
        prompt.push_str("(empty)");
    } else {
        prompt.push_str(&request.document);
    }
    prompt.push_str("\n---");
    prompt
}

fn execution_system_prompt(request: &AssistRequest, plan: &Plan) -> String {
    let mut prompt = String::new();
    if let Some(ref voice) = request.system_prompt {
        prompt.push_str(voice);
        prompt.push_str("\n\n");
    }
    prompt.push_str(
        "You are a screenplay writing assistant. Change the screenplay only through the \
provided tools; never paste rewritten scenes into your replies. Keep replies short and \
concrete.",
    );

    prompt.push_str(&format!("\n\nThe plan:\n{}\n", plan.summary));
    for (i, step) in plan.steps.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, step));
    }

    prompt.push_str("\nCurrent screenplay:\n---\n");
    if request.document.is_empty() {
        prompt.push_str("(empty)");
    } else {
        prompt.push_str(&request.document);
    }
    prompt.push_str("\n---");
    prompt
}
