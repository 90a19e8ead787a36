//! Board authority server command: `bangbang serve`.

use anyhow::Result;

use bangbang::authority::{ServerConfig, start_server};
use bangbang::config::BangbangConfig;

pub async fn cmd_serve(config: BangbangConfig, dev: bool) -> Result<()> {
    start_server(ServerConfig {
        port: config.port(),
        dir: config.dir.clone(),
        board_file: config.toml.server.board_file.clone(),
        dev_mode: dev,
    })
    .await
}
