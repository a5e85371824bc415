use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use travel_agent::agent::TravelAgentBot;
use travel_agent::config::AppConfig;
use travel_agent::evaluation::{
    read_csv, run_hard_questions, ExperimentReport, HardQuestion, ParameterJudge,
    QuestionGenerator, RouterExperiment, RouterFunctionCase, RouterParameterCase,
    DEFAULT_DATASET_DIR, HARD_QUESTIONS_FILE, ROUTER_FUNCTIONS_FILE, ROUTER_PARAMETERS_FILE,
};
use travel_agent::llm::gateways::OpenAIGateway;
use travel_agent::llm::LlmGateway;
use travel_agent::tracer::{setup_tracing, TracerSystem};

const PROJECT_NAME: &str = "travel-agent";

/// Travel agent chatbot routing requests to LLM-backed tools
#[derive(Parser)]
#[command(name = "travel-agent", version, about)]
struct Cli {
    /// Print the recorded tracer events when the command finishes
    #[arg(long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive chat; `/clear` resets the conversation, `/quit` exits
    Chat,
    /// Ask a single question and print the answer
    Ask {
        /// The question, as one or more words
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Generate test questions with an LLM and write them as CSV
    GenerateQuestions {
        /// Generate end-to-end agent questions instead of router questions
        #[arg(long)]
        hard: bool,
        #[arg(long, default_value = DEFAULT_DATASET_DIR)]
        out_dir: PathBuf,
    },
    /// Run every question in the hard-questions CSV through the bot
    RunHardQuestions {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Score the router against the generated datasets
    Evaluate {
        /// Only score tool selection
        #[arg(long)]
        functions: bool,
        /// Only score parameter extraction
        #[arg(long)]
        parameters: bool,
        #[arg(long, default_value = DEFAULT_DATASET_DIR)]
        dataset_dir: PathBuf,
    },
    /// Write the prompt templates as JSON files into a directory
    ExportPrompts { dir: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let tracer = setup_tracing(PROJECT_NAME);

    match cli.command {
        Command::Chat => chat(&config, tracer.clone()).await?,
        Command::Ask { text } => {
            let mut bot = bot(&config, tracer.clone())?;
            println!("{}", bot.respond(&text.join(" ")).await?);
        }
        Command::GenerateQuestions { hard, out_dir } => {
            config.validate()?;
            let generator = QuestionGenerator::new(gateway(&config)).with_tracer(tracer.clone());
            if hard {
                let path = generator.write_hard_questions(&out_dir).await?;
                println!("Hard agent questions written to {}", path.display());
            } else {
                for path in generator.write_router_datasets(&out_dir).await? {
                    println!("Test questions written to {}", path.display());
                }
            }
        }
        Command::RunHardQuestions { file } => {
            let path = file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_DIR).join(HARD_QUESTIONS_FILE));
            let rows: Vec<HardQuestion> =
                read_csv(&path).with_context(|| format!("reading {}", path.display()))?;
            let questions: Vec<String> = rows.into_iter().map(|r| r.questions).collect();

            let mut bot = bot(&config, tracer.clone())?;
            for outcome in run_hard_questions(&mut bot, &questions).await {
                println!("Question: {}", outcome.question);
                match outcome.response {
                    Ok(answer) => println!("{}\n", answer),
                    Err(e) => println!("Error: {}\n", e),
                }
            }
        }
        Command::Evaluate {
            functions,
            parameters,
            dataset_dir,
        } => evaluate(&config, tracer.clone(), functions, parameters, &dataset_dir).await?,
        Command::ExportPrompts { dir } => {
            for path in config.prompt_library()?.export_dir(&dir)? {
                println!("{}", path.display());
            }
        }
    }

    if cli.trace {
        print_trace(&tracer);
    }

    Ok(())
}

fn gateway(config: &AppConfig) -> Arc<dyn LlmGateway> {
    Arc::new(OpenAIGateway::with_config(config.openai()))
}

fn bot(config: &AppConfig, tracer: Arc<TracerSystem>) -> Result<TravelAgentBot> {
    config.validate()?;
    Ok(TravelAgentBot::from_config(config, Some(tracer))?)
}

async fn chat(config: &AppConfig, tracer: Arc<TracerSystem>) -> Result<()> {
    let mut bot = bot(config, tracer)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Travel Agent Chatbot");
    println!("Ask me about destinations, travel tips, or help planning your next vacation!");
    println!("(/clear resets the conversation, /quit exits)\n");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "/quit" | "/exit" => break,
            "/clear" => println!("{}\n", bot.clear_history()),
            input => match bot.respond(input).await {
                Ok(answer) => println!("{}\n", answer),
                Err(e) => eprintln!("Error: {}\n", e),
            },
        }
    }

    Ok(())
}

async fn evaluate(
    config: &AppConfig,
    tracer: Arc<TracerSystem>,
    functions: bool,
    parameters: bool,
    dataset_dir: &std::path::Path,
) -> Result<()> {
    let run_all = !functions && !parameters;
    let bot = bot(config, tracer.clone())?;
    let experiment = RouterExperiment::new(bot.router());

    if functions || run_all {
        let path = dataset_dir.join(ROUTER_FUNCTIONS_FILE);
        let cases: Vec<RouterFunctionCase> =
            read_csv(&path).with_context(|| format!("reading {}", path.display()))?;
        print_report(&experiment.run_functions(&cases).await);
    }

    if parameters || run_all {
        let path = dataset_dir.join(ROUTER_PARAMETERS_FILE);
        let cases: Vec<RouterParameterCase> =
            read_csv(&path).with_context(|| format!("reading {}", path.display()))?;
        let judge = ParameterJudge::new(gateway(config)).with_tracer(tracer);
        print_report(&experiment.run_parameters(&cases, &judge).await);
    }

    Ok(())
}

fn print_report(report: &ExperimentReport) {
    println!("=== {} ===", report.name);
    for result in &report.results {
        let actual = result.actual_tool.as_deref().unwrap_or("-");
        println!(
            "[{}] {} (expected: {}, routed to: {})",
            result.score, result.question, result.expected, actual
        );
        if let Some(error) = &result.error {
            println!("    error: {}", error);
        }
    }
    println!("Mean score: {:.2} over {} cases\n", report.mean_score(), report.results.len());
}

fn print_trace(tracer: &TracerSystem) {
    println!("\n=== Trace ({} events) ===", tracer.len());
    for summary in tracer.get_event_summaries(None, None, None) {
        println!("{}\n", summary);
    }
}
