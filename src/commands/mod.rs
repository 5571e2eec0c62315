/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes two top-level command modules:

- `chat` — Interactive chat mode
- `ask`  — One-shot prompt against the research assistant

These handlers are intentionally small and use the library components:
the gateway, the session store, the sequencer, and the turn runner.
*/

use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
use crate::config::Config;
use crate::error::Result;
use crate::gateway::create_gateway;
use crate::prompts::learning_path_prompt;
use crate::render::{format_citations, format_learning_path, format_message};
use crate::sequencer::HandoffSequencer;
use crate::session::{Attachment, SessionStore};
use crate::turn::{run_turn, TurnOutcome, GATEWAY_FAILURE_NOTICE};

// Special commands parser for the interactive loop
pub mod special_commands;

// Interactive chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Opens a gateway session, creates the first chat session, and runs
    //! a readline-based loop that routes slash commands locally and sends
    //! everything else through the turn runner. Streamed deltas are
    //! printed as they arrive; structured extras (learning path table,
    //! citations) follow once the stream completes.

    use super::*;
    use crate::agents::AgentKind;
    use crate::extractor::extract_learning_path;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::io::Write;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    ///
    /// # Errors
    ///
    /// Returns an error when the gateway credential is missing or the
    /// terminal cannot be initialized. Gateway failures during a turn are
    /// recovered into the session and do not end the loop.
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        // Credential problems surface here, before any session exists
        let mut gateway = create_gateway(&config.gateway)?;

        let mut store = SessionStore::new();
        store.new_session();

        let sequencer = HandoffSequencer::new(config.chat.handoff_interval());
        spawn_step_printer(&sequencer);

        let selection = config.chat.selection();
        let mut rl = DefaultEditor::new()?;
        let mut pending_attachments: Vec<Attachment> = Vec::new();

        print_welcome_banner();

        loop {
            let title = store
                .active_session()
                .map(|s| s.title.clone())
                .unwrap_or_default();
            let prompt = format!("[{}] >> ", title);

            let line = match rl.readline(&prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let input = match parse_special_command(trimmed) {
                Ok(SpecialCommand::NewSession) => {
                    store.new_session();
                    // A fresh session needs a fresh remote context
                    gateway = create_gateway(&config.gateway)?;
                    println!("Started a new session\n");
                    continue;
                }
                Ok(SpecialCommand::ListSessions) => {
                    print_session_list(&store);
                    continue;
                }
                Ok(SpecialCommand::SwitchSession(number)) => {
                    let target = store.sessions().get(number - 1).map(|s| s.id.clone());
                    match target {
                        Some(id) => {
                            store.set_active(&id)?;
                            gateway = create_gateway(&config.gateway)?;
                            println!(
                                "Switched to session {}\n",
                                store.active_session().map(|s| s.title.as_str()).unwrap_or("?")
                            );
                        }
                        None => println!("{}", "No session with that number".yellow()),
                    }
                    continue;
                }
                Ok(SpecialCommand::Attach(path)) => {
                    match Attachment::from_path(&path) {
                        Ok(attachment) => {
                            println!(
                                "{}",
                                format!(
                                    "Queued {} ({}) for the next send",
                                    attachment.name, attachment.mime_type
                                )
                                .green()
                            );
                            pending_attachments.push(attachment);
                        }
                        Err(e) => println!("{}", e.to_string().red()),
                    }
                    continue;
                }
                Ok(SpecialCommand::LearningPath(topic)) => learning_path_prompt(&topic),
                Ok(SpecialCommand::ToggleColor) => {
                    let enabled = store.toggle_color_output();
                    colored::control::set_override(enabled);
                    println!("Colored output {}", if enabled { "on" } else { "off" });
                    continue;
                }
                Ok(SpecialCommand::Help) => {
                    print_help();
                    continue;
                }
                Ok(SpecialCommand::Exit) => break,
                Ok(SpecialCommand::None) => trimmed.to_string(),
                Err(e) => {
                    println!("{}", e.to_string().yellow());
                    continue;
                }
            };

            rl.add_history_entry(trimmed)?;

            let session_id = match store.active_id() {
                Some(id) => id.to_string(),
                None => {
                    store.new_session();
                    store.active_id().unwrap_or_default().to_string()
                }
            };
            let attachments = std::mem::take(&mut pending_attachments);

            let outcome = run_turn(
                &mut store,
                &session_id,
                gateway.as_mut(),
                &sequencer,
                &input,
                &attachments,
                |delta| {
                    print!("{}", delta);
                    let _ = std::io::stdout().flush();
                },
            )
            .await?;

            println!();
            match outcome {
                TurnOutcome::Completed(message) => {
                    // Streamed deltas are already on screen; follow up with
                    // the structured extras.
                    if let Some(path) = extract_learning_path(&message.content, selection) {
                        println!("\n{}", format_learning_path(&path));
                    }
                    if let Some(grounding) = &message.grounding {
                        let citations = format_citations(grounding);
                        if !citations.is_empty() {
                            println!("\n{}", citations);
                        }
                    }
                }
                TurnOutcome::Failed => {
                    println!("{}", GATEWAY_FAILURE_NOTICE.red());
                }
            }
            println!();
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Prints each hand-off phase label as the sequencer publishes it
    fn spawn_step_printer(sequencer: &HandoffSequencer) {
        let mut steps = sequencer.subscribe();
        tokio::spawn(async move {
            while steps.changed().await.is_ok() {
                let label = steps.borrow_and_update().clone();
                if let Some(label) = label {
                    println!("{}", format!("⟳ {}", label).dimmed());
                }
            }
        });
    }

    fn print_welcome_banner() {
        println!("{}", "Research swarm ready.".bold());
        println!("Enter a topic and the team will build a report:");
        for agent in AgentKind::ALL {
            println!("  {:<16} {}", agent.colored_name(), agent.description());
        }
        println!("Type /help for commands.\n");
    }

    fn print_session_list(store: &SessionStore) {
        for (index, session) in store.sessions().iter().enumerate() {
            let marker = if Some(session.id.as_str()) == store.active_id() {
                "*"
            } else {
                " "
            };
            println!(
                "{} {:>2}. {} ({} messages)",
                marker,
                index + 1,
                session.title,
                session.messages.len()
            );
        }
        println!();
    }
}

// One-shot prompt command handler
pub mod ask {
    //! One-shot handler: sends a single prompt, waits for the stream to
    //! finish, and prints the fully formatted response.

    use super::*;
    use colored::Colorize;
    use std::path::PathBuf;

    /// Send one prompt and print the formatted response
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `prompt` - The prompt text
    /// * `attach` - Files to attach; unreadable ones are skipped with a
    ///   warning
    pub async fn run_ask(config: Config, prompt: String, attach: Vec<PathBuf>) -> Result<()> {
        let mut gateway = create_gateway(&config.gateway)?;

        let mut store = SessionStore::new();
        let session_id = store.new_session().id.clone();
        let sequencer = HandoffSequencer::new(config.chat.handoff_interval());
        let selection = config.chat.selection();

        let mut attachments = Vec::new();
        for path in attach {
            match Attachment::from_path(&path) {
                Ok(attachment) => attachments.push(attachment),
                Err(e) => eprintln!("{}", e.to_string().yellow()),
            }
        }

        let outcome = run_turn(
            &mut store,
            &session_id,
            gateway.as_mut(),
            &sequencer,
            &prompt,
            &attachments,
            |_| {},
        )
        .await?;

        match outcome {
            TurnOutcome::Completed(message) => {
                println!("{}", format_message(&message, selection));
                Ok(())
            }
            TurnOutcome::Failed => {
                println!("{}", GATEWAY_FAILURE_NOTICE.red());
                Ok(())
            }
        }
    }
}
