use std::{path::Path, time::Duration};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt};

pub async fn read_file_lines(path: impl AsRef<Path>) -> eyre::Result<Vec<String>> {
    let file = tokio::fs::read(path).await?;
    let mut lines = file.as_slice().lines();

    let mut contents = vec![];
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if !line.is_empty() {
            contents.push(line.to_string());
        }
    }

    Ok(contents)
}

/// Non-blank trimmed lines of `path`, or an empty list if it cannot be read.
pub async fn load_lines(path: impl AsRef<Path>) -> Vec<String> {
    let path = path.as_ref();

    read_file_lines(path).await.unwrap_or_else(|e| {
        tracing::error!("Error reading file {}: {e}", path.display());
        vec![]
    })
}

pub async fn append_line(path: impl AsRef<Path>, line: &str) -> eyre::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_ref())
        .await?;

    file.write_all(format!("{line}\n").as_bytes()).await?;
    file.flush().await?;

    Ok(())
}

pub async fn delay(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
