//! Stand-in for camera recognition: every enrolled student not yet marked
//! present gets an independent Bernoulli trial.

use crate::{
    Error, Result,
    catalog::{Class, Student},
};
use rand::Rng;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanOutcome {
    pub present: Vec<Student>,
    pub absent: Vec<Student>,
    /// Students recognised by this scan alone.
    pub recognised: Vec<String>,
}

pub fn simulate_scan<R: Rng + ?Sized>(
    class: &Class,
    already_present: &[String],
    presence_probability: f64,
    rng: &mut R,
) -> Result<ScanOutcome> {
    if !(0.0..=1.0).contains(&presence_probability) {
        return Err(Error::validation(format!(
            "presence probability must lie in [0, 1], got {presence_probability}"
        )));
    }

    let (_, to_scan) = class.partition(already_present)?;

    let recognised: Vec<String> = to_scan
        .iter()
        .filter(|_| rng.gen_bool(presence_probability))
        .map(|s| s.id.clone())
        .collect();

    let (present, absent): (Vec<Student>, Vec<Student>) = class
        .students
        .iter()
        .cloned()
        .partition(|s| already_present.contains(&s.id) || recognised.contains(&s.id));

    debug!(
        "Scan of {} recognised {} of {} remaining students",
        class.id,
        recognised.len(),
        to_scan.len()
    );

    Ok(ScanOutcome {
        present,
        absent,
        recognised,
    })
}
