//! The section state machine.
//!
//! One run walks [`Section::ALL`] in order. Per section it builds the prompt,
//! invokes the backend once, parses the response, dispatches searches and
//! emits tokens. Sections never see each other's output; they share only the
//! case facts, the instruction and the run timestamp.

use std::pin::pin;

use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use strategos_core::token::LLM_ERROR_TAG;
use strategos_core::{RunId, Section, StreamToken};
use strategos_search::SearchDispatcher;
use strategos_settings::DirectiveSettings;

use crate::invoker::{BackendInvoker, Invocation};
use crate::pacing::{Pacer, Pause};
use crate::parser::{parse_output, ParsedOutput};
use crate::prompt::{
    build_section_prompt, SectionPrompt, DELIVERABLE_MARKER, QUERIES_MARKER, REASONING_MARKER,
};

/// One directive generation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectiveRequest {
    pub case_facts: String,
    /// Falls back to the configured default instruction when `None`.
    pub instruction: Option<String>,
}

impl DirectiveRequest {
    pub fn new(case_facts: impl Into<String>) -> Self {
        Self {
            case_facts: case_facts.into(),
            instruction: None,
        }
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }
}

/// Parsed output of one section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionResult {
    pub section: Section,
    pub reasoning: String,
    pub queries: Vec<String>,
    pub deliverable: String,
}

impl SectionResult {
    fn from_parsed(section: Section, parsed: ParsedOutput) -> Self {
        Self {
            section,
            reasoning: parsed.reasoning,
            queries: parsed.queries,
            deliverable: parsed.deliverable,
        }
    }

    fn empty(section: Section) -> Self {
        Self {
            section,
            reasoning: String::new(),
            queries: Vec::new(),
            deliverable: String::new(),
        }
    }
}

/// Stand-in backend output used when no backend is configured. Carries real
/// region markers so the parser path runs unchanged.
pub fn placeholder_output(case_facts: &str, section: Section) -> String {
    let n = section.number();
    let lead: String = case_facts
        .split('.')
        .next()
        .unwrap_or_default()
        .chars()
        .take(80)
        .collect();
    let queries = serde_json::json!([format!("{lead} structural defect law India")]);
    format!(
        "{REASONING_MARKER}\n(internal reasoning placeholder for part {n})\n\
         {QUERIES_MARKER}\n{queries}\n\
         {DELIVERABLE_MARKER}\n(Deliverable placeholder for part {n} based on the facts.)"
    )
}

fn assessment_timestamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

#[derive(Clone)]
pub struct Orchestrator {
    invoker: BackendInvoker,
    search: SearchDispatcher,
    settings: DirectiveSettings,
}

impl Orchestrator {
    pub fn new(invoker: BackendInvoker, search: SearchDispatcher, settings: DirectiveSettings) -> Self {
        Self {
            invoker,
            search,
            settings,
        }
    }

    /// Start a run. The returned stream is finite: eleven sections then one
    /// [`StreamToken::Complete`]. Cancelling `cancel` ends it at the next
    /// suspension point without further backend or search calls.
    pub fn run(
        &self,
        request: DirectiveRequest,
        cancel: CancellationToken,
    ) -> impl Stream<Item = StreamToken> + Send + 'static {
        let this = self.clone();
        let run_id = RunId::new();
        let pacer = Pacer::new(self.settings.pacing.clone(), cancel);

        async_stream::stream! {
            let instruction = request
                .instruction
                .filter(|i| !i.trim().is_empty())
                .unwrap_or_else(|| this.settings.default_instruction.clone());
            let timestamp = assessment_timestamp();
            info!(
                run_id = %run_id,
                backend = this.invoker.backend_name(),
                search = this.search.backend_name(),
                facts_chars = request.case_facts.len(),
                "directive run started"
            );

            for section in Section::ALL {
                if pacer.is_cancelled() {
                    info!(run_id = %run_id, section = section.number(), "directive run cancelled");
                    return;
                }
                yield StreamToken::SectionHeader(section);

                let prompt = build_section_prompt(&SectionPrompt {
                    case_facts: &request.case_facts,
                    section,
                    timestamp: &timestamp,
                    instruction: &instruction,
                });
                let invocation = tokio::select! {
                    biased;
                    _ = pacer.cancel_token().cancelled() => {
                        info!(run_id = %run_id, section = section.number(), "directive run cancelled");
                        return;
                    }
                    inv = this.invoker.invoke(&prompt, || placeholder_output(&request.case_facts, section)) => inv,
                };

                let (result, failure) = match invocation {
                    Invocation::Failed(e) => {
                        warn!(run_id = %run_id, section = section.number(), error_kind = e.error_kind(), "section generation failed");
                        (SectionResult::empty(section), Some(StreamToken::error(LLM_ERROR_TAG, e)))
                    }
                    output => {
                        let parsed = parse_output(&output.into_text());
                        debug!(run_id = %run_id, section = section.number(), strategy = parsed.strategy, queries = parsed.queries.len(), "section parsed");
                        (SectionResult::from_parsed(section, parsed), None)
                    }
                };

                if result.reasoning.is_empty() {
                    yield StreamToken::ReasoningNone;
                } else {
                    yield StreamToken::ReasoningBegin;
                    for line in result.reasoning.lines() {
                        yield StreamToken::Line(line.to_string());
                        if !pacer.pause(Pause::Line).await {
                            return;
                        }
                    }
                    yield StreamToken::ReasoningEnd;
                }

                if result.queries.is_empty() {
                    yield StreamToken::QueriesNone;
                } else {
                    yield StreamToken::QueriesBegin;
                    for query in &result.queries {
                        yield StreamToken::Query(query.clone());
                        if !pacer.pause(Pause::Query).await {
                            return;
                        }
                    }

                    let mut outcomes = pin!(this.search.dispatch(result.queries.clone()));
                    loop {
                        let next = tokio::select! {
                            biased;
                            _ = pacer.cancel_token().cancelled() => return,
                            next = outcomes.next() => next,
                        };
                        let Some(outcome) = next else { break };

                        yield StreamToken::ToolResultBegin(outcome.query.clone());
                        if outcome.succeeded {
                            for line in outcome.result_text.lines() {
                                yield StreamToken::Line(line.to_string());
                                if !pacer.pause(Pause::ToolResultLine).await {
                                    return;
                                }
                            }
                        } else {
                            yield StreamToken::Error(outcome.result_text);
                        }
                        yield StreamToken::ToolResultEnd(outcome.query);
                        if !pacer.pause(Pause::Search).await {
                            return;
                        }
                    }
                }

                if let Some(error) = failure {
                    yield StreamToken::DeliverableBegin;
                    yield error;
                    yield StreamToken::DeliverableEnd;
                } else if result.deliverable.is_empty() {
                    yield StreamToken::DeliverableNone;
                } else {
                    yield StreamToken::DeliverableBegin;
                    for line in result.deliverable.lines() {
                        yield StreamToken::Line(line.to_string());
                        if !pacer.pause(Pause::Line).await {
                            return;
                        }
                    }
                    yield StreamToken::DeliverableEnd;
                }

                yield StreamToken::SectionSeparator;
                if !pacer.pause(Pause::Section).await {
                    return;
                }
            }

            info!(run_id = %run_id, "directive run complete");
            yield StreamToken::Complete;
        }
    }
}
