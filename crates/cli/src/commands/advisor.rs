//! Advisor dashboard commands.
//!
//! Each command first checks that `/advisor` renders for the session; a
//! student is shown their own dashboard instead.

use std::io::Write;

use pass_client::App;
use pass_client::pages::advisor;
use pass_core::StudentId;

use super::{CliError, authorize};
use crate::render;

const ADVISOR_PATH: &str = "/advisor";

/// Print one student's detail panel.
pub async fn student(app: &mut App, out: &mut impl Write, id: StudentId) -> Result<(), CliError> {
    if !authorize(app, out, ADVISOR_PATH).await? {
        return Ok(());
    }
    let detail = advisor::student(app.api(), id).await?;
    render::student_detail(out, &detail)?;
    Ok(())
}

/// Trigger risk scoring and print the refreshed list.
pub async fn predict(app: &mut App, out: &mut impl Write) -> Result<(), CliError> {
    if !authorize(app, out, ADVISOR_PATH).await? {
        return Ok(());
    }
    let outcome = advisor::predict_risk(app.api()).await?;
    match outcome.generated {
        Some(n) => writeln!(out, "Risk scores updated for {n} students")?,
        None => writeln!(out, "Risk scoring finished")?,
    }
    writeln!(out)?;

    let list = advisor::students(app.api()).await?;
    render::student_list(out, &list)?;
    Ok(())
}

/// Log an intervention and print the refreshed detail panel.
pub async fn note(
    app: &mut App,
    out: &mut impl Write,
    id: StudentId,
    text: &str,
) -> Result<(), CliError> {
    if !authorize(app, out, ADVISOR_PATH).await? {
        return Ok(());
    }
    let detail = advisor::add_intervention(app.api(), id, text).await?;
    writeln!(out, "Intervention logged")?;
    writeln!(out)?;
    render::student_detail(out, &detail)?;
    Ok(())
}
