use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::api::{CreateBoardRequest, UpdateBoardRequest};
use crate::cli::config::ClientSettings;
use crate::cli::utils::{board_line, output_empty_collection, output_json, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum BoardCommands {
    #[command(about = "List your boards, newest first")]
    List,

    #[command(about = "Show one board")]
    Show {
        #[arg(help = "Board ID")]
        id: Uuid,
    },

    #[command(about = "Create a board")]
    Create {
        #[arg(help = "Board title")]
        title: String,
        #[arg(long, help = "Board description")]
        description: Option<String>,
        #[arg(long, help = "Display color, e.g. #3b82f6")]
        color: Option<String>,
    },

    #[command(about = "Change fields of a board; omitted fields are kept")]
    Update {
        #[arg(help = "Board ID")]
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },

    #[command(about = "Delete a board and all of its todos")]
    Delete {
        #[arg(help = "Board ID")]
        id: Uuid,
    },
}

pub async fn handle(cmd: BoardCommands, settings: &ClientSettings, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = settings.authenticated()?;

    match cmd {
        BoardCommands::List => {
            let boards = client.list_boards().await?;
            if boards.is_empty() {
                return output_empty_collection(&output_format, "No boards yet");
            }
            match output_format {
                OutputFormat::Json => output_json(&boards),
                OutputFormat::Text => {
                    for board in &boards {
                        println!("{}", board_line(board));
                    }
                    Ok(())
                }
            }
        }
        BoardCommands::Show { id } => {
            let board = client.get_board(id).await?;
            match output_format {
                OutputFormat::Json => output_json(&board),
                OutputFormat::Text => {
                    println!("{}", board_line(&board));
                    Ok(())
                }
            }
        }
        BoardCommands::Create { title, description, color } => {
            let request = CreateBoardRequest {
                title: Some(title),
                description,
                color,
            };
            let board = client.create_board(&request).await?;
            match output_format {
                OutputFormat::Json => output_json(&board),
                OutputFormat::Text => output_success(&output_format, &format!("Created board {}", board.id), None),
            }
        }
        BoardCommands::Update { id, title, description, color } => {
            let request = UpdateBoardRequest { title, description, color };
            let board = client.update_board(id, &request).await?;
            match output_format {
                OutputFormat::Json => output_json(&board),
                OutputFormat::Text => output_success(&output_format, &format!("Updated board {}", board.id), None),
            }
        }
        BoardCommands::Delete { id } => {
            let message = client.delete_board(id).await?;
            output_success(&output_format, &message.message, Some(json!({ "id": id })))
        }
    }
}
