//! Terminal interaction gateway: plan preview table and review prompts.

use std::io::{self, BufRead, Write};

use chrono::{DateTime, Utc};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use taskarena_sync::{EntryChoice, InteractionGateway, PlanDecision, PlanEntry, SyncPlan};

/// Prompt-driven [`InteractionGateway`] over stdin/stdout.
///
/// End of input is treated as a cancel, so a closed stdin can never
/// confirm a plan by accident.
pub struct TerminalGateway;

impl TerminalGateway {
    pub fn new() -> Self {
        TerminalGateway
    }

    /// Print `prompt` and read one trimmed, lowercased input line.
    /// `None` on EOF.
    fn ask(&self, prompt: &str) -> Option<String> {
        print!("{prompt} ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_lowercase()),
        }
    }
}

impl Default for TerminalGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "side")]
    side: String,
    #[tabled(rename = "task")]
    task: String,
    #[tabled(rename = "last modified")]
    modified: String,
    #[tabled(rename = "suggestion")]
    suggestion: String,
}

fn timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

fn choice_menu(choices: &[EntryChoice]) -> (String, String) {
    let mut labels = Vec::new();
    let mut keys = Vec::new();
    for choice in choices {
        let (key, label) = match choice {
            EntryChoice::Upload => ('u', "(u)pload"),
            EntryChoice::Download => ('d', "(d)ownload"),
            EntryChoice::Skip => ('s', "(s)kip"),
            EntryChoice::Cancel => ('c', "(c)ancel sync"),
        };
        labels.push(label);
        keys.push(key.to_string());
    }
    let menu = match labels.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {last}", rest.join(", ")),
        _ => labels.join(", "),
    };
    (menu, keys.join("/"))
}

impl InteractionGateway for TerminalGateway {
    fn review_plan(&mut self, plan: &SyncPlan) -> PlanDecision {
        let mut rows = Vec::with_capacity(plan.len() * 2);
        for entry in &plan.entries {
            rows.push(PlanRow {
                side: "local".to_owned(),
                task: entry.local_description().to_owned(),
                modified: timestamp(entry.local_last_modified()),
                suggestion: String::new(),
            });
            rows.push(PlanRow {
                side: "remote".to_owned(),
                task: entry.remote_description().to_owned(),
                modified: timestamp(entry.remote_last_modified()),
                suggestion: entry.suggestion.to_string(),
            });
        }
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");

        loop {
            let Some(answer) =
                self.ask("Do you want to sync (a)ll, sync (m)anually or (c)ancel? (a/m/c)")
            else {
                return PlanDecision::Cancel;
            };
            match answer.as_str() {
                "a" => return PlanDecision::All,
                "m" => return PlanDecision::Manual,
                "c" => return PlanDecision::Cancel,
                _ => println!("Please answer a, m or c."),
            }
        }
    }

    fn review_entry(&mut self, entry: &PlanEntry, choices: &[EntryChoice]) -> EntryChoice {
        println!("{}", "-".repeat(75));
        println!("Task        : {}", entry.description());
        if let Some(token) = entry
            .local
            .as_ref()
            .or(entry.remote.as_ref())
            .and_then(|t| t.token())
        {
            println!("ArenaTaskID : {token}");
        }

        if entry.is_two_sided() {
            println!("Task exists in both stores.");
            println!(
                "Last modified (local) : {}",
                timestamp(entry.local_last_modified())
            );
            println!(
                "Last modified (remote): {}",
                timestamp(entry.remote_last_modified())
            );
            println!("Suggesting to {}.", entry.suggestion.to_string().bold());
            println!("This would cause the following modifications:");
            let arrow = match entry.suggestion {
                taskarena_sync::SyncAction::Download => "<-",
                _ => "->",
            };
            for field in &entry.fields {
                let local = entry
                    .local
                    .as_ref()
                    .map(|t| t.record.field(*field))
                    .filter(|v| !v.is_empty())
                    .unwrap_or("(empty)");
                let remote = entry
                    .remote
                    .as_ref()
                    .map(|t| t.record.field(*field))
                    .filter(|v| !v.is_empty())
                    .unwrap_or("(empty)");
                println!("  {field}: {local} {arrow} {remote}");
            }
        } else if entry.local.is_some() {
            println!(
                "This task does not yet exist on remote. Suggestion: {}.",
                entry.suggestion.to_string().bold()
            );
        } else {
            println!(
                "This task does not yet exist on local. Suggestion: {}.",
                entry.suggestion.to_string().bold()
            );
        }

        let (menu, keys) = choice_menu(choices);
        loop {
            let Some(answer) = self.ask(&format!("Do you want to {menu}? ({keys})")) else {
                return EntryChoice::Cancel;
            };
            let picked = match answer.as_str() {
                "u" => Some(EntryChoice::Upload),
                "d" => Some(EntryChoice::Download),
                "s" => Some(EntryChoice::Skip),
                "c" => Some(EntryChoice::Cancel),
                _ => None,
            };
            match picked {
                Some(choice) if choices.contains(&choice) => return choice,
                _ => println!("Please answer one of: {keys}."),
            }
        }
    }

    fn notify(&mut self, message: &str) {
        println!("{message}");
    }
}
