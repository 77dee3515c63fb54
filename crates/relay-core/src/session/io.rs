//! Input and output seams of a session

use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tracing::debug;

use super::types::SessionOutput;
use crate::error::Result;

/// Where user lines come from
#[async_trait]
pub trait InputSource: Send {
    /// Next line without its terminator, or `None` once the source is exhausted
    async fn read_line(&mut self) -> Result<Option<String>>;
}

/// Where session events go
pub trait OutputSink: Send + Sync {
    fn emit(&self, output: SessionOutput);
}

impl OutputSink for mpsc::UnboundedSender<SessionOutput> {
    fn emit(&self, output: SessionOutput) {
        // A dropped receiver only means nobody is watching
        if self.send(output).is_err() {
            debug!("Session output receiver dropped");
        }
    }
}

/// Reads lines from any async buffered reader
pub struct LineInput<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin + Send> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl LineInput<BufReader<Stdin>> {
    /// Line input from the process's standard input
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> InputSource for LineInput<R> {
    async fn read_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.next_line().await?)
    }
}

/// Feeds a fixed list of lines, then reports exhaustion
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl InputSource for ScriptedInput {
    async fn read_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}
