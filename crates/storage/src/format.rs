//! Line formats of the code2seq and code2vec datasets
//!
//! A record is one line: the label followed by space separated contexts of
//! the form `start,path,end`. Token subtokens stay joined with `|`; node kinds
//! are percent-escaped so that no kind can break the line structure.

use crate::error::StorageError;
use crate::split_writer::SplitWriter;
use crate::PathContextStorage;
use pathminer_core::{DatasetSplit, Error, LabeledPathContexts, PathContext};
use std::path::PathBuf;
use twox_hash::XxHash3_128;

fn escape(text: &str, escape_pipe: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '%' => out.push_str("%25"),
            ',' => out.push_str("%2C"),
            '|' if escape_pipe => out.push_str("%7C"),
            c if c.is_whitespace() => out.push_str("%20"),
            c => out.push(c),
        }
    }
    out
}

fn escape_token(token: &str) -> String {
    escape(token, false)
}

/// Path encoding used by code2seq: node kinds joined with `|`
pub(crate) fn encode_path(context: &PathContext) -> String {
    context
        .path
        .iter()
        .map(|kind| escape(kind, true))
        .collect::<Vec<_>>()
        .join("|")
}

/// code2vec replaces the path by a fixed-width hash of its code2seq encoding
pub(crate) fn hash_path(context: &PathContext) -> String {
    format!("{:032x}", XxHash3_128::oneshot(encode_path(context).as_bytes()))
}

fn format_line(unit: &LabeledPathContexts, encode: fn(&PathContext) -> String) -> String {
    let mut line = escape_token(&unit.label);
    for context in &unit.contexts {
        line.push(' ');
        line.push_str(&escape_token(&context.start_token));
        line.push(',');
        line.push_str(&encode(context));
        line.push(',');
        line.push_str(&escape_token(&context.end_token));
    }
    line
}

/// `<split>.c2s` files in the code2seq format
#[derive(Debug)]
pub struct Code2SeqStorage {
    writer: SplitWriter,
}

impl Code2SeqStorage {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            writer: SplitWriter::new(output_dir, "c2s"),
        }
    }
}

impl PathContextStorage for Code2SeqStorage {
    fn store(
        &mut self,
        unit: &LabeledPathContexts,
        split: Option<DatasetSplit>,
    ) -> Result<(), Error> {
        self.writer.push(split, format_line(unit, encode_path))?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        self.writer.close().map_err(Error::from)
    }
}

/// `<split>.c2v` files in the code2vec format
#[derive(Debug)]
pub struct Code2VecStorage {
    writer: SplitWriter,
}

impl Code2VecStorage {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            writer: SplitWriter::new(output_dir, "c2v"),
        }
    }
}

impl PathContextStorage for Code2VecStorage {
    fn store(
        &mut self,
        unit: &LabeledPathContexts,
        split: Option<DatasetSplit>,
    ) -> Result<(), Error> {
        self.writer.push(split, format_line(unit, hash_path))?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        self.writer.close().map_err(|e: StorageError| e.into())
    }
}
