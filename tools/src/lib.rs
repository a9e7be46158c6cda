//! Inspection and introspection tools for the ssync protocol.
//!
//! - Decode captured packets with the client or server opcode table
//! - Describe the message catalog and its fingerprint as JSON
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see what went on the wire.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use schema::Schema;
use serde::Serialize;
use tracing::debug;
use wire::MessageFactory;

/// Which peer sent the packets being inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Packets a client sent to the server.
    Client,
    /// Packets the server sent to a client.
    Server,
}

impl Side {
    /// Opcode table that decodes traffic sent by this side.
    pub fn factory(self) -> Result<MessageFactory> {
        let factory = match self {
            Self::Client => messages::client_message_factory(),
            Self::Server => messages::server_message_factory(),
        };
        factory.context("build message factory")
    }
}

/// What a single packet decoded to.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub bytes: usize,
    pub opcode: u8,
    pub message: &'static str,
    /// Bits consumed, opcode included.
    pub bits: usize,
    pub trailing_bits: usize,
    /// Debug rendering of the decoded message.
    pub body: String,
}

/// Decodes `bytes` as one message with `factory`.
pub fn inspect_packet(bytes: &[u8], factory: &MessageFactory) -> Result<InspectReport> {
    let extracted = factory.extract_bytes(bytes).context("decode packet")?;
    let opcode = extracted.message.opcode();
    Ok(InspectReport {
        bytes: bytes.len(),
        opcode: opcode.get(),
        message: extracted.message.name(),
        bits: extracted.bits,
        trailing_bits: extracted.trailing_bits,
        body: format!("{:#?}", extracted.message),
    })
}

/// Human-readable rendering of a report.
pub fn format_report_pretty(report: &InspectReport) -> String {
    let mut out = format!(
        "{} (opcode {}): {} bits in {} bytes",
        report.message, report.opcode, report.bits, report.bytes
    );
    if report.trailing_bits >= 8 {
        out.push_str(&format!(", {} trailing bits", report.trailing_bits));
    }
    out.push('\n');
    out.push_str(&report.body);
    out
}

/// The catalog layouts plus the fingerprint peers compare at handshake.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutReport {
    pub schema_hash: String,
    pub schema: Schema,
}

pub fn layout_report() -> Result<LayoutReport> {
    let schema = messages::catalog_schema().context("build catalog schema")?;
    Ok(LayoutReport {
        schema_hash: format!("0x{:016x}", schema::schema_hash(&schema)),
        schema,
    })
}

/// A captured packet file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketEntry {
    pub path: PathBuf,
    pub size: u64,
}

/// Lists packet files in `dir`, sorted by path, optionally filtered by a glob
/// matched against either the full path or the file name.
pub fn collect_packet_entries(dir: &Path, glob: Option<&str>) -> Result<Vec<PacketEntry>> {
    let pattern = glob
        .map(|value| Pattern::new(value).context("invalid glob pattern"))
        .transpose()?;

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                debug!(path = %path.display(), "skipping packet outside glob");
                continue;
            }
        }
        let size = entry.metadata()?.len();
        entries.push(PacketEntry { path, size });
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}
