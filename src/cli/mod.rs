pub mod commands;

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use crate::analytics::{sheets::SheetsSink, AnalyticsSink};
use crate::chat::{TurnController, TurnOutcome, QUOTA_EXHAUSTED_MESSAGE};
use crate::cli::commands::Commands;
use crate::config::AppConfig;
use crate::knowledge::KnowledgeBase;
use crate::llm::ProviderFactory;
use crate::prompt::PromptComposer;
use crate::session::SessionStore;

pub async fn run_cli(command: Commands, config_path: String) {
    let config = AppConfig::load(&config_path).expect("Failed to load config");

    match command {
        Commands::Serve => {
            panic!("Serve command should be intercepted by main.rs to boot actix-web");
        }
        Commands::Knowledge { full } => {
            let knowledge = match KnowledgeBase::load(Path::new(&config.knowledge.dir)) {
                Ok(kb) => kb,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return;
                }
            };

            if full {
                println!("{}", knowledge.text());
            } else {
                println!(
                    "{} file(s), {} bytes from {}",
                    knowledge.file_count(),
                    knowledge.len(),
                    config.knowledge.dir
                );
            }
        }
        Commands::Chat => {
            run_repl(config).await;
        }
    }
}

async fn run_repl(config: AppConfig) {
    let knowledge = Arc::new(
        KnowledgeBase::load(Path::new(&config.knowledge.dir)).expect("Failed to load knowledge"),
    );
    let composer = PromptComposer::new(config.persona.clone(), knowledge);
    let provider = ProviderFactory::create_default(&config);
    let analytics: Option<Arc<dyn AnalyticsSink>> = config
        .analytics
        .clone()
        .map(|sheets| Arc::new(SheetsSink::new(sheets)) as Arc<dyn AnalyticsSink>);
    let controller = TurnController::new(composer, provider, analytics, config.persona.priming);

    let store = SessionStore::new(config.quota.max_questions);
    let (id, handle) = store.create(None);

    println!("--- Kiosk Terminal Chat ---");
    println!("Session: {}", id);
    if !config.persona.greeting.is_empty() {
        println!("\n{}", config.persona.greeting);
    }
    println!("Type /exit to quit, /clear to start the conversation over.");
    println!("---------------------------");

    loop {
        print!("\nYou> ");
        io::stdout().flush().unwrap();

        let mut input = String::new();
        io::stdin().read_line(&mut input).unwrap();
        let text = input.trim();

        if text == "/exit" || text == "/quit" {
            break;
        }
        if text == "/clear" {
            let mut state = handle.lock().await;
            state.clear_conversation(None);
            println!("Conversation cleared.");
            continue;
        }

        match controller.run_turn(&handle, text).await {
            Ok(TurnOutcome::Ignored) => continue,
            Ok(TurnOutcome::QuotaExhausted) => {
                println!("{}", QUOTA_EXHAUSTED_MESSAGE);
            }
            Ok(TurnOutcome::Answered { reply, remaining }) => {
                println!("{}> {}", config.persona.assistant_name, reply);
                println!("({} question(s) left today)", remaining);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
            }
        }
    }
}
