//! Running datasets through the router and the full agent.

use super::dataset::{RouterFunctionCase, RouterParameterCase};
use super::evaluators::{evaluate_router_function_call, ParameterJudge};
use crate::agent::TravelAgentBot;
use crate::error::Result;
use crate::llm::models::LlmMessage;
use crate::router::{RouterReply, ToolRouter};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

/// Score of one dataset row
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub question: String,
    pub expected: String,
    /// Tool chosen by the router, `None` for a text reply or a failed call
    pub actual_tool: Option<String>,
    pub score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    pub name: String,
    pub results: Vec<CaseResult>,
}

impl ExperimentReport {
    /// Mean score over all rows, 0 for an empty report
    pub fn mean_score(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.results.iter().map(|r| r.score as f64).sum::<f64>() / self.results.len() as f64
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|r| r.score == 0)
    }
}

/// Routes each dataset question in a fresh conversation and scores the reply
pub struct RouterExperiment<'a> {
    router: &'a ToolRouter,
}

impl<'a> RouterExperiment<'a> {
    pub fn new(router: &'a ToolRouter) -> Self {
        Self { router }
    }

    async fn route_fresh(&self, question: &str, correlation_id: &str) -> Result<RouterReply> {
        let mut messages = self.router.seed_messages()?;
        messages.push(LlmMessage::user(question));
        self.router.route(&messages, correlation_id).await
    }

    /// Score tool selection for every case
    pub async fn run_functions(&self, cases: &[RouterFunctionCase]) -> ExperimentReport {
        let mut results = Vec::with_capacity(cases.len());

        for case in cases {
            let correlation_id = Uuid::new_v4().to_string();
            let result = match self.route_fresh(&case.question, &correlation_id).await {
                Ok(reply) => CaseResult {
                    question: case.question.clone(),
                    expected: case.expected_output.clone(),
                    actual_tool: reply.tool_call().map(|c| c.name.clone()),
                    score: evaluate_router_function_call(&reply, &case.expected_output),
                    error: None,
                },
                Err(e) => {
                    warn!(question = %case.question, error = %e, "Routing failed");
                    failed(&case.question, &case.expected_output, e.to_string())
                }
            };
            results.push(result);
        }

        let report = ExperimentReport {
            name: "router-functions".to_string(),
            results,
        };
        info!(cases = report.results.len(), mean = report.mean_score(), "Function run done");
        report
    }

    /// Score argument extraction for every case with `judge`
    pub async fn run_parameters(
        &self,
        cases: &[RouterParameterCase],
        judge: &ParameterJudge,
    ) -> ExperimentReport {
        let mut results = Vec::with_capacity(cases.len());

        for case in cases {
            let expected = Value::String(case.parameters.clone());
            let correlation_id = Uuid::new_v4().to_string();
            let scored = match self.route_fresh(&case.question, &correlation_id).await {
                Ok(reply) => judge
                    .evaluate(&reply, &expected, &correlation_id)
                    .await
                    .map(|score| (reply, score)),
                Err(e) => Err(e),
            };

            let result = match scored {
                Ok((reply, score)) => CaseResult {
                    question: case.question.clone(),
                    expected: case.parameters.clone(),
                    actual_tool: reply.tool_call().map(|c| c.name.clone()),
                    score,
                    error: None,
                },
                Err(e) => {
                    warn!(question = %case.question, error = %e, "Parameter case failed");
                    failed(&case.question, &case.parameters, e.to_string())
                }
            };
            results.push(result);
        }

        let report = ExperimentReport {
            name: "router-parameters".to_string(),
            results,
        };
        info!(cases = report.results.len(), mean = report.mean_score(), "Parameter run done");
        report
    }
}

fn failed(question: &str, expected: &str, error: String) -> CaseResult {
    CaseResult {
        question: question.to_string(),
        expected: expected.to_string(),
        actual_tool: None,
        score: 0,
        error: Some(error),
    }
}

/// Outcome of one end-to-end question
#[derive(Debug, Clone)]
pub struct HardQuestionOutcome {
    pub question: String,
    pub response: std::result::Result<String, String>,
}

/// Ask each question in turn, clearing the bot's history after every one
pub async fn run_hard_questions(
    bot: &mut TravelAgentBot,
    questions: &[String],
) -> Vec<HardQuestionOutcome> {
    let mut outcomes = Vec::with_capacity(questions.len());

    for question in questions {
        let response = bot.respond(question).await.map_err(|e| {
            warn!(question = %question, error = %e, "Hard question failed");
            e.to_string()
        });
        bot.clear_history();
        outcomes.push(HardQuestionOutcome {
            question: question.clone(),
            response,
        });
    }

    outcomes
}
