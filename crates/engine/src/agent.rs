//! Loop controller.
//!
//! Orchestrates THOUGHT/ACTION/OBSERVATION turns: call the model, parse an
//! action, dispatch the tool, append the observation, repeat. Terminates
//! exactly once — on the first successful dispatch of the final-answer
//! tool, or when the step budget runs out.

use crate::dispatch::{Observation, dispatch};
use crate::model::{ChatRequest, Message, ModelBackend};
use crate::parser::{ActionParser, MarkerParser};
use crate::tools::{ToolCall, ToolRegistry};
use crate::{Error, Result};
use policy::{Policy, Verdict};
use serde_json::{Map, Value};
use std::time::Duration;
use storage::{Event, EventKind, Role, RunId, TraceStore};
use tracing::{debug, info};

/// Default step budget.
pub const DEFAULT_MAX_STEPS: usize = 6;

/// Everything needed to seed a run: the system instruction, the initial
/// task message, and the starting working artifact.
#[derive(Debug, Clone)]
pub struct Seed {
    pub system: String,
    pub task: String,
    pub artifact: Value,
}

impl Seed {
    pub fn new(system: impl Into<String>, task: impl Into<String>, artifact: Value) -> Self {
        Self {
            system: system.into(),
            task: task.into(),
            artifact,
        }
    }
}

/// One completed cycle of the loop.
#[derive(Debug, Clone)]
pub struct Turn {
    /// The model's reply text.
    pub reply: String,
    /// The parsed action, when parsing succeeded.
    pub action: Option<ToolCall>,
    /// The observation fed back to the model.
    pub observation: Observation,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The final-answer tool was dispatched successfully.
    Completed,
    /// The step budget ran out first.
    BudgetExhausted,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::BudgetExhausted => "budget_exhausted",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// The result of a run.
///
/// On budget exhaustion the best-known artifact is still returned.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: RunId,
    pub status: RunStatus,
    /// Latest version of the working artifact.
    pub artifact: Value,
    /// Payload of the final-answer tool, on success.
    pub answer: Option<Value>,
    /// Every completed cycle, in order.
    pub turns: Vec<Turn>,
    /// Budget units consumed.
    pub steps_used: usize,
}

/// Builder for [`AgentLoop`].
pub struct AgentLoopBuilder<B> {
    backend: B,
    registry: ToolRegistry,
    store: TraceStore,
    parser: Box<dyn ActionParser>,
    policy: Policy,
    final_tool: Option<String>,
    validator_tool: Option<String>,
    max_steps: usize,
    tool_timeout: Option<Duration>,
}

impl<B: ModelBackend> AgentLoopBuilder<B> {
    fn new(backend: B, registry: ToolRegistry, store: TraceStore) -> Self {
        Self {
            backend,
            registry,
            store,
            parser: Box::new(MarkerParser::new()),
            policy: Policy::default(),
            final_tool: None,
            validator_tool: None,
            max_steps: DEFAULT_MAX_STEPS,
            tool_timeout: None,
        }
    }

    /// Swap the action-extraction strategy.
    pub fn parser(mut self, parser: Box<dyn ActionParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Set the termination-guard policy.
    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Designate the tool whose successful dispatch ends the loop.
    pub fn final_tool(mut self, name: impl Into<String>) -> Self {
        self.final_tool = Some(name.into());
        self
    }

    /// Designate the validation tool the guard policy watches for.
    pub fn validator_tool(mut self, name: impl Into<String>) -> Self {
        self.validator_tool = Some(name.into());
        self
    }

    /// Set the step budget.
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Bound each tool invocation; expiry becomes a failure observation.
    pub fn tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = Some(timeout);
        self
    }

    /// Validate the configuration and build the loop.
    pub fn build(self) -> Result<AgentLoop<B>> {
        if self.max_steps == 0 {
            return Err(Error::Config("max_steps must be at least 1".into()));
        }
        let final_tool = self
            .final_tool
            .ok_or_else(|| Error::Config("no final-answer tool designated".into()))?;
        if !self.registry.contains(&final_tool) {
            return Err(Error::Config(format!(
                "final-answer tool '{final_tool}' is not registered"
            )));
        }
        if let Some(validator) = &self.validator_tool
            && !self.registry.contains(validator)
        {
            return Err(Error::Config(format!(
                "validator tool '{validator}' is not registered"
            )));
        }

        Ok(AgentLoop {
            backend: self.backend,
            registry: self.registry,
            store: self.store,
            parser: self.parser,
            policy: self.policy,
            final_tool,
            validator_tool: self.validator_tool,
            max_steps: self.max_steps,
            tool_timeout: self.tool_timeout,
        })
    }
}

/// The bounded ReAct loop.
pub struct AgentLoop<B: ModelBackend> {
    backend: B,
    registry: ToolRegistry,
    store: TraceStore,
    parser: Box<dyn ActionParser>,
    policy: Policy,
    final_tool: String,
    validator_tool: Option<String>,
    max_steps: usize,
    tool_timeout: Option<Duration>,
}

impl<B: ModelBackend> std::fmt::Debug for AgentLoop<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentLoop")
            .field("final_tool", &self.final_tool)
            .field("validator_tool", &self.validator_tool)
            .field("max_steps", &self.max_steps)
            .field("tool_timeout", &self.tool_timeout)
            .finish_non_exhaustive()
    }
}

impl<B: ModelBackend> AgentLoop<B> {
    /// Create a builder.
    pub fn builder(backend: B, registry: ToolRegistry, store: TraceStore) -> AgentLoopBuilder<B> {
        AgentLoopBuilder::new(backend, registry, store)
    }

    /// The registry this loop dispatches against.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run the loop to termination.
    ///
    /// Model-call failures are fatal and surface as `Err`; every other
    /// failure is converted into an observation and the loop continues.
    pub async fn run(&self, seed: Seed) -> Result<RunOutcome> {
        let run_id = RunId::new();
        self.store.append(&Event::new(run_id, EventKind::RunStart))?;
        self.store
            .append(&Event::message(run_id, Role::System, &seed.system))?;
        self.store
            .append(&Event::message(run_id, Role::User, &seed.task))?;

        info!(run = %run_id, budget = self.max_steps, "starting loop");

        let mut messages = vec![Message::user(seed.task)];
        let mut artifact = seed.artifact;
        let mut turns: Vec<Turn> = Vec::new();
        let mut last_dispatched: Option<String> = None;
        let mut steps_used = 0;

        for step in 1..=self.max_steps {
            steps_used = step;

            let response = self
                .backend
                .chat(ChatRequest {
                    messages: &messages,
                    system: Some(&seed.system),
                })
                .await?;
            let reply = response.content;
            self.store
                .append(&Event::message(run_id, Role::Assistant, &reply))?;
            messages.push(Message::assistant(reply.clone()));

            let call = match self.parser.parse(&reply) {
                Ok(call) => call,
                Err(err) => {
                    debug!(run = %run_id, step, error = %err, "action parse failed");
                    let observation = Observation::failure(format!(
                        "Could not parse ACTION: {err}. Reply with a THOUGHT and a single \
                         ACTION JSON object with tool_name and arguments."
                    ));
                    self.observe(run_id, &mut messages, &observation)?;
                    turns.push(Turn {
                        reply,
                        action: None,
                        observation,
                    });
                    continue;
                }
            };

            if call.name == self.final_tool {
                let verdict = self
                    .policy
                    .review_final_answer(last_dispatched.as_deref(), self.validator_tool.as_deref());
                match verdict {
                    Verdict::Accept => {}
                    Verdict::ValidateThenAccept => {
                        if let Some(validator) = self.validator_tool.clone() {
                            self.run_side_validation(
                                run_id,
                                &validator,
                                &mut messages,
                                &mut artifact,
                                &mut last_dispatched,
                            )
                            .await?;
                        }
                    }
                    Verdict::Reject { reason } => {
                        debug!(run = %run_id, step, "final answer rejected by guard");
                        let observation =
                            Observation::failure(format!("Final answer rejected: {reason}"));
                        self.observe(run_id, &mut messages, &observation)?;
                        turns.push(Turn {
                            reply,
                            action: Some(call),
                            observation,
                        });
                        continue;
                    }
                }
            }

            self.store.append(&Event::tool_call(
                run_id,
                &call.name,
                Value::Object(call.arguments.clone()),
            ))?;
            let dispatched = dispatch(&self.registry, &call, &artifact, self.tool_timeout).await;
            if let Some(revision) = dispatched.revision {
                artifact = revision;
            }
            self.observe(run_id, &mut messages, &dispatched.observation)?;

            let succeeded = dispatched.observation.is_success();
            if succeeded {
                last_dispatched = Some(call.name.clone());
            }
            let finished = succeeded && call.name == self.final_tool;
            let answer = finished.then(|| dispatched.observation.output());

            turns.push(Turn {
                reply,
                action: Some(call),
                observation: dispatched.observation,
            });

            if finished {
                info!(run = %run_id, steps = steps_used, "final answer accepted");
                self.store.append(&Event::new(
                    run_id,
                    EventKind::RunEnd {
                        status: RunStatus::Completed.as_str().into(),
                        steps: steps_used,
                    },
                ))?;
                return Ok(RunOutcome {
                    run_id,
                    status: RunStatus::Completed,
                    artifact,
                    answer,
                    turns,
                    steps_used,
                });
            }
        }

        info!(run = %run_id, steps = steps_used, "step budget exhausted");
        self.store.append(&Event::new(
            run_id,
            EventKind::RunEnd {
                status: RunStatus::BudgetExhausted.as_str().into(),
                steps: steps_used,
            },
        ))?;
        Ok(RunOutcome {
            run_id,
            status: RunStatus::BudgetExhausted,
            artifact,
            answer: None,
            turns,
            steps_used,
        })
    }

    /// Soft-guard side step: run the validator now, record its result, and
    /// only then let the final answer through. Does not consume budget.
    async fn run_side_validation(
        &self,
        run_id: RunId,
        validator: &str,
        messages: &mut Vec<Message>,
        artifact: &mut Value,
        last_dispatched: &mut Option<String>,
    ) -> Result<()> {
        info!(run = %run_id, tool = validator, "auto-running validator before final answer");
        let call = ToolCall {
            name: validator.to_string(),
            arguments: Map::new(),
        };
        self.store.append(&Event::tool_call(
            run_id,
            validator,
            Value::Object(call.arguments.clone()),
        ))?;
        let dispatched = dispatch(&self.registry, &call, artifact, self.tool_timeout).await;
        if let Some(revision) = dispatched.revision {
            *artifact = revision;
        }
        if dispatched.observation.is_success() {
            *last_dispatched = Some(validator.to_string());
        }
        self.observe(run_id, messages, &dispatched.observation)
    }

    fn observe(
        &self,
        run_id: RunId,
        messages: &mut Vec<Message>,
        observation: &Observation,
    ) -> Result<()> {
        self.store.append(&Event::observation(
            run_id,
            observation.tool().map(String::from),
            observation.is_success(),
            observation.output(),
        ))?;
        messages.push(Message::user(observation.render()));
        Ok(())
    }
}
