//! Offline evaluation of the router and the agent.
//!
//! - [`QuestionGenerator`] writes CSV datasets of LLM-generated questions
//! - [`RouterExperiment`] scores tool selection and argument extraction on them
//! - [`run_hard_questions`] replays multi-part questions through the full bot

pub mod dataset;
pub mod evaluators;
pub mod experiment;
pub mod question_generator;

pub use dataset::{
    read_csv, write_csv, HardQuestion, RouterFunctionCase, RouterParameterCase,
    DEFAULT_DATASET_DIR, HARD_QUESTIONS_FILE, ROUTER_FUNCTIONS_FILE, ROUTER_PARAMETERS_FILE,
};
pub use evaluators::{evaluate_router_function_call, ParameterJudge};
pub use experiment::{
    run_hard_questions, CaseResult, ExperimentReport, HardQuestionOutcome, RouterExperiment,
};
pub use question_generator::{QuestionGenerator, RouterQuestion, RouterQuestionSet};
