use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::api::{CreateTodoRequest, UpdateTodoRequest};
use crate::cli::config::ClientSettings;
use crate::cli::utils::{output_empty_collection, output_json, output_success, todo_line};
use crate::cli::OutputFormat;
use crate::client::{Action, BoardStore, TodoFilter};
use crate::database::models::Priority;

#[derive(Subcommand)]
pub enum TodoCommands {
    #[command(about = "List the todos of a board")]
    List {
        #[arg(help = "Board ID")]
        board_id: Uuid,
        #[arg(long, value_enum, default_value_t = TodoFilter::All)]
        filter: TodoFilter,
    },

    #[command(about = "Show one todo")]
    Show {
        #[arg(help = "Todo ID")]
        id: Uuid,
    },

    #[command(about = "Add a todo to a board")]
    Add {
        #[arg(help = "Board ID")]
        board_id: Uuid,
        #[arg(help = "Todo title")]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, help = "low, medium or high")]
        priority: Option<Priority>,
        #[arg(long, help = "Due date, YYYY-MM-DD or RFC 3339")]
        due: Option<String>,
    },

    #[command(about = "Change fields of a todo; omitted fields are kept")]
    Update {
        #[arg(help = "Todo ID")]
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        completed: Option<bool>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        #[arg(long, help = "Remove the due date")]
        clear_due: bool,
    },

    #[command(about = "Flip a todo between open and completed")]
    Toggle {
        #[arg(help = "Todo ID")]
        id: Uuid,
    },

    #[command(about = "Delete a todo")]
    Delete {
        #[arg(help = "Todo ID")]
        id: Uuid,
    },
}

pub async fn handle(cmd: TodoCommands, settings: &ClientSettings, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = settings.authenticated()?;

    match cmd {
        TodoCommands::List { board_id, filter } => {
            let todos = client.todos_for_board(board_id).await?;

            let mut store = BoardStore::new();
            store.dispatch(Action::TodosLoaded { board_id, todos });
            store.dispatch(Action::FilterChanged(filter));

            let state = store.state();
            let visible = state.visible_todos(board_id);
            if visible.is_empty() {
                return output_empty_collection(&output_format, "No todos");
            }

            match output_format {
                OutputFormat::Json => output_json(&visible),
                OutputFormat::Text => {
                    for todo in &visible {
                        println!("{}", todo_line(todo));
                    }
                    let (done, total) = state.progress(board_id);
                    println!("{}/{} completed", done, total);
                    Ok(())
                }
            }
        }
        TodoCommands::Show { id } => {
            let todo = client.get_todo(id).await?;
            match output_format {
                OutputFormat::Json => output_json(&todo),
                OutputFormat::Text => {
                    println!("{}", todo_line(&todo));
                    if !todo.description.is_empty() {
                        println!("    {}", todo.description);
                    }
                    Ok(())
                }
            }
        }
        TodoCommands::Add { board_id, title, description, priority, due } => {
            let request = CreateTodoRequest {
                title: Some(title),
                description,
                board_id: Some(board_id.to_string()),
                priority: priority.map(|p| p.as_str().to_string()),
                due_date: due,
            };
            let todo = client.create_todo(&request).await?;
            match output_format {
                OutputFormat::Json => output_json(&todo),
                OutputFormat::Text => output_success(&output_format, &format!("Added todo {}", todo.id), None),
            }
        }
        TodoCommands::Update { id, title, description, priority, completed, due, clear_due } => {
            let due_date = if clear_due { Some(None) } else { due.map(Some) };
            let request = UpdateTodoRequest {
                title,
                description,
                completed,
                priority: priority.map(|p| p.as_str().to_string()),
                due_date,
            };
            let todo = client.update_todo(id, &request).await?;
            match output_format {
                OutputFormat::Json => output_json(&todo),
                OutputFormat::Text => output_success(&output_format, &format!("Updated todo {}", todo.id), None),
            }
        }
        TodoCommands::Toggle { id } => {
            let todo = client.toggle_todo(id).await?;
            match output_format {
                OutputFormat::Json => output_json(&todo),
                OutputFormat::Text => {
                    println!("{}", todo_line(&todo));
                    Ok(())
                }
            }
        }
        TodoCommands::Delete { id } => {
            let message = client.delete_todo(id).await?;
            output_success(&output_format, &message.message, Some(json!({ "id": id })))
        }
    }
}
