use crate::event::AppEvent;
use crate::workspace::ports::{GenerationDispatcher, GenerationOutput, GenerationRequest};
use crate::workspace::{Engine, VisualTab};
use std::sync::mpsc;
use std::time::Duration;
use tokio::runtime::Handle;

const EXCERPT_CHARS: usize = 40;

/// Stands in for a model backend: waits, then posts a canned result for the
/// request back to the UI thread.
pub struct SimulatedDispatcher {
    tx: mpsc::Sender<AppEvent>,
    runtime_handle: Handle,
    delay: Duration,
}

impl SimulatedDispatcher {
    pub fn new(tx: mpsc::Sender<AppEvent>, runtime_handle: Handle, delay: Duration) -> Self {
        Self {
            tx,
            runtime_handle,
            delay,
        }
    }
}

impl GenerationDispatcher for SimulatedDispatcher {
    fn generate(&self, request: GenerationRequest) {
        let tx = self.tx.clone();
        let delay = self.delay;
        let ticket = request.ticket;
        tracing::debug!(
            side = ticket.side.as_str(),
            seq = ticket.seq,
            delay_ms = delay.as_millis() as u64,
            "simulated generation scheduled"
        );

        self.runtime_handle.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let output = simulated_output(&request);
            if tx
                .send(AppEvent::GenerationFinished {
                    ticket,
                    outcome: Ok(output),
                })
                .is_err()
            {
                tracing::warn!(seq = ticket.seq, "ui channel closed before generation finished");
            }
        });
    }
}

fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "(attachments only)".to_string();
    }
    let mut chars = trimmed.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

pub fn simulated_output(request: &GenerationRequest) -> GenerationOutput {
    let settings = &request.visual_settings;
    match (request.engine, request.visual_tab) {
        (Engine::Visual, VisualTab::ImageGen) => GenerationOutput {
            text: format!(
                "[Result] Generated {} image(s) at {}",
                settings.count,
                settings.ratio.as_str()
            ),
            media: Some(format!("generated://image/{}", request.ticket.seq)),
        },
        (Engine::Visual, VisualTab::VideoGen) => {
            let mut text = format!(
                "[Result] Generated a {} / {} video",
                settings.duration.as_str(),
                settings.resolution.as_str()
            );
            if settings.smart_rewrite {
                text.push_str(" (prompt rewrite enabled)");
            }
            GenerationOutput {
                text,
                media: Some(format!("generated://video/{}", request.ticket.seq)),
            }
        }
        _ => GenerationOutput {
            text: format!(
                "[Result] Generated by {} from your input: {}",
                request.model.brand,
                excerpt(&request.user_text)
            ),
            media: None,
        },
    }
}
