use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;

use fgc_cli::{
    GlossaryAnswerer, display_banner, handle_input_with_history, print_help, render_answer,
};
use fgc_core::{AnswerStyle, LlmProvider, Retriever, VectorStore};
use fgc_index::{
    GlossaryIngestor, GlossaryRetriever, HashEmbedder, IndexConfig, LocalVectorStore,
    csv_files_in, ensure_index,
};
use fgc_llm::{LlmConfig, OpenAiChatClient};

#[derive(Parser)]
#[command(name = "fgc")]
#[command(about = "Grounded finance glossary Q&A using a local LLM", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the snippet index from glossary CSV files
    Build {
        /// CSV files or directories to ingest (defaults to the data directory)
        #[arg(long)]
        data: Vec<PathBuf>,
    },
    /// Ask a single question and exit
    Ask {
        question: String,
        /// Explain like I'm 15
        #[arg(long)]
        eli15: bool,
    },
}

type Answerer =
    GlossaryAnswerer<GlossaryRetriever<LocalVectorStore, HashEmbedder>, OpenAiChatClient>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let index_config = IndexConfig::from_env()?;
    let llm_config = LlmConfig::from_env()?;

    // Shared handles, constructed once for the whole session
    let embedder = Arc::new(HashEmbedder::from_model_name(&index_config.embedding_model)?);
    let store = Arc::new(LocalVectorStore::open(&index_config, embedder.as_ref())?);
    let ingestor = GlossaryIngestor::new(store.clone(), embedder.clone());

    if let Some(Commands::Build { data }) = &cli.command {
        return build_index(&ingestor, store.as_ref(), data, &index_config).await;
    }

    match ensure_index(&ingestor, &index_config.data_dir).await {
        Ok(Some(report)) => println!("✅ Built index with {} snippets", report.indexed),
        Ok(None) => {}
        Err(e) => println!(
            "⚠️  Startup index build failed: {}. Continuing with an empty index.",
            e
        ),
    }

    let retriever = GlossaryRetriever::new(store.clone(), embedder.clone());

    let answerer: Answerer = if llm_config.enabled {
        let llm = OpenAiChatClient::new(llm_config.clone())?;
        if !llm.health_check().await.unwrap_or(false) {
            println!(
                "⚠️  Could not reach the model at {}. Is Ollama running?",
                llm_config.base_url.yellow()
            );
            println!("   {}", format!("ollama pull {}", llm_config.model).dimmed());
        }
        GlossaryAnswerer::with_llm(retriever, llm)
    } else {
        GlossaryAnswerer::new(retriever)
    };

    if let Some(Commands::Ask { question, eli15 }) = cli.command {
        let style = if eli15 {
            AnswerStyle::EliFifteen
        } else {
            AnswerStyle::Concise
        };
        let answer = answerer.answer(&question, style).await?;
        render_answer(&answer);
        return Ok(());
    }

    run_interactive(&answerer, &llm_config).await
}

async fn run_interactive(answerer: &Answerer, llm_config: &LlmConfig) -> Result<()> {
    let model_label = if answerer.has_llm() {
        llm_config.model.as_str()
    } else {
        "retrieval only"
    };
    display_banner(model_label);

    let mut style = AnswerStyle::Concise;
    let mut history = Vec::new();

    loop {
        let input = handle_input_with_history(&mut history).await?;

        if input.is_empty() {
            continue;
        }

        let input_lower = input.to_lowercase();

        if input_lower == "exit" || input_lower == "quit" {
            println!("{}", "👋 Goodbye!".green());
            break;
        }

        if input_lower == "help" {
            print_help();
            continue;
        }

        if input_lower == "eli15 on" {
            style = AnswerStyle::EliFifteen;
            println!("{}", "✅ Simple explanations enabled".green());
            continue;
        }

        if input_lower == "eli15 off" {
            style = AnswerStyle::Concise;
            println!("{}", "✅ Concise answers enabled".green());
            continue;
        }

        if input_lower == "stats" {
            match answerer.retriever().stats().await {
                Ok(stats) => println!("{}", serde_json::to_string_pretty(&stats)?),
                Err(e) => println!("{} Could not read stats: {}", "❌".red(), e),
            }
            continue;
        }

        println!("{} Searching notes…", "🔎".blue());

        match answerer.answer(&input, style).await {
            Ok(answer) => render_answer(&answer),
            Err(e) => println!("{} Could not answer: {}", "❌".red(), e),
        }
    }

    Ok(())
}

async fn build_index(
    ingestor: &GlossaryIngestor<LocalVectorStore, HashEmbedder>,
    store: &LocalVectorStore,
    data: &[PathBuf],
    index_config: &IndexConfig,
) -> Result<()> {
    let mut files: Vec<PathBuf> = Vec::new();
    if data.is_empty() {
        files.extend(csv_files_in(&index_config.data_dir)?);
    } else {
        for path in data {
            if path.is_dir() {
                files.extend(csv_files_in(path)?);
            } else {
                files.push(path.clone());
            }
        }
    }

    if files.is_empty() {
        anyhow::bail!(
            "No CSV files to ingest. Put glossary CSVs in {} or pass --data.",
            index_config.data_dir.display()
        );
    }

    // Full rebuild: drop whatever the collection held before
    store.clear().await?;
    let report = ingestor.ingest_files(&files).await?;

    println!(
        "✅ Index built and saved in {}",
        index_config.index_dir.display()
    );
    for error in &report.errors {
        println!("{} {}", "⚠️ ".yellow(), error);
    }

    Ok(())
}
