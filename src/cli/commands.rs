//! Report command: fetch, guard on state, render.

use std::io::Write;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;

use super::report;
use crate::core::RequestSource;
use crate::state::RequestState;

/// What happened to the requested report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The report was printed.
    Reported,
    /// The request is closed; only a diagnostic was printed.
    Skipped(RequestState),
}

/// Fetch `request_id` from `source` and print its report to `out`.
///
/// Requests that are no longer `new` or `review` get a single diagnostic line
/// on `err` instead of a report.
///
/// # Errors
///
/// Returns an error if the fetch fails or a writer fails.
pub fn run<S, O, E>(source: &S, request_id: &str, out: &mut O, err: &mut E) -> Result<Outcome>
where
    S: RequestSource + ?Sized,
    O: Write,
    E: Write,
{
    let req = source.fetch_request(request_id)?;
    tracing::debug!(
        request = %req.id,
        state = %req.state,
        creator = ?req.creator,
        actions = req.actions.len(),
        reviews = req.reviews.len(),
        issues = req.issues.len(),
        "fetched request"
    );

    if !req.state.is_actionable() {
        writeln!(
            err,
            "Unable to process request '{request_id}' because it is in the '{}' state",
            req.state
        )?;
        return Ok(Outcome::Skipped(req.state));
    }

    report::render(out, &req).wrap_err("Failed to write report")?;
    Ok(Outcome::Reported)
}
