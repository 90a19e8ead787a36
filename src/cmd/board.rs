//! Board read and replace-order commands: `bangbang board`, `bangbang order`.

use std::sync::Arc;

use anyhow::{Context, Result};

use super::super::OrderCommands;
use bangbang::board::{Board, EndpointKind};
use bangbang::config::BangbangConfig;
use bangbang::sync::{HttpOrderStore, SyncClient, SyncOutcome};

fn client(config: &BangbangConfig) -> SyncClient {
    SyncClient::new(Arc::new(HttpOrderStore::new(config.base_url())))
}

fn print_board(board: &Board) {
    println!("{}", board.title);
    for column in &board.columns {
        println!();
        println!("{} [{}] ({})", column.title, column.id, column.cards.len());
        for card in &column.cards {
            println!("  - {} [{}]", card.title, card.id);
        }
    }
}

pub async fn cmd_board(config: &BangbangConfig, json: bool) -> Result<()> {
    let board = client(config)
        .load()
        .await
        .with_context(|| format!("Failed to load board from {}", config.base_url()))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else {
        print_board(&board);
    }
    Ok(())
}

pub async fn cmd_order(config: &BangbangConfig, command: OrderCommands) -> Result<()> {
    let (kind, column, ids) = match command {
        OrderCommands::Columns { ids } => (EndpointKind::BoardColumns, None, ids),
        OrderCommands::Cards { column, ids } => (EndpointKind::ColumnCards, Some(column), ids),
    };

    let mut client = client(config);
    match client.persist_order(kind, column.as_deref(), ids).await {
        SyncOutcome::Committed => {
            println!("Order saved.");
            Ok(())
        }
        SyncOutcome::Reloaded(board) => {
            eprintln!("Order was not saved; current board on the server:");
            print_board(&board);
            anyhow::bail!("Order rejected by {}", config.base_url())
        }
        SyncOutcome::ReloadFailed(e) => Err::<(), _>(e).with_context(|| {
            format!("Order was not saved and {} is unreachable", config.base_url())
        }),
    }
}
