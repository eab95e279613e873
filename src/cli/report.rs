//! Request report renderer.
//!
//! Prints the ACTIONS, REVIEWS, ISSUES and DESCRIPTION sections of a request
//! in the order the service returned them. Lines are written as they are
//! produced, so a failing writer leaves a truncated report behind.

use std::io::{self, Write};

use crate::constants;
use crate::state::{PackageSnapshot, Request};

/// Write the full report for `req` to `out`.
///
/// # Errors
///
/// Returns any error raised by the writer.
pub fn render<W: Write>(out: &mut W, req: &Request) -> io::Result<()> {
    section_header(out, constants::LABEL_ACTIONS)?;
    for action in &req.actions {
        writeln!(out)?;
        writeln!(out, "{action}")?;

        if let Some(snapshot) = &action.src_pkg {
            file_listing(out, constants::LABEL_SOURCE_FILES, snapshot)?;
        }
        if let Some(snapshot) = &action.tgt_pkg {
            file_listing(out, constants::LABEL_TARGET_FILES, snapshot)?;
        }
    }

    section_header(out, constants::LABEL_REVIEWS)?;
    for review in &req.reviews {
        writeln!(out, "{review}")?;
    }

    section_header(out, constants::LABEL_ISSUES)?;
    for issue in &req.issues {
        writeln!(out, "{issue}")?;
    }

    section_header(out, constants::LABEL_DESCRIPTION)?;
    out.write_all(req.description.as_bytes())?;
    writeln!(out)?;

    out.flush()
}

// ── Formatting ──────────────────────────────────────────────────────────────

/// Blank line followed by `>>>>> LABEL <<<<<`.
fn section_header<W: Write>(out: &mut W, label: &str) -> io::Result<()> {
    indented_header(out, "", label)
}

/// Sub-section header nested under an action.
fn indented_header<W: Write>(out: &mut W, indent: &str, label: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{indent}>>>>> {label} <<<<<")
}

fn file_listing<W: Write>(out: &mut W, label: &str, snapshot: &PackageSnapshot) -> io::Result<()> {
    let indent = constants::FILES_INDENT;
    indented_header(out, indent, label)?;
    for file in &snapshot.files {
        writeln!(out, "{indent}{} {} {}", file.md5, file.mtime, file.name)?;
    }
    Ok(())
}
