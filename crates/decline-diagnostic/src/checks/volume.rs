use crate::models::{DiagnosticFlag, FlagCategory, VolumeContext};

const MIN_HEALTH_SCORE: f64 = 30.0;
const DISTRIBUTION_VWAD: f64 = -30.0;
const MAX_CONCENTRATION: f64 = 40.0;
const LOW_RELATIVE_VOLUME: f64 = 0.5;

pub fn check_volume(ctx: &VolumeContext) -> Vec<DiagnosticFlag> {
    let mut flags = Vec::new();

    if let Some(health) = ctx.health_score.filter(|h| *h < MIN_HEALTH_SCORE) {
        flags.push(DiagnosticFlag::red(
            FlagCategory::Volume,
            "Anemic Volume",
            format!("Volume health score {:.0} is below {:.0}", health, MIN_HEALTH_SCORE),
            "Avoid adding until participation returns",
        ));
    }

    if let Some(vwad) = ctx.vwad.filter(|v| *v <= DISTRIBUTION_VWAD) {
        flags.push(DiagnosticFlag::red(
            FlagCategory::Volume,
            "Heavy Distribution",
            format!("Volume-weighted advance/decline at {:.0}; sellers control the tape", vwad),
            "Reduce position into strength",
        ));
    }

    if let Some(conc) = ctx.concentration.filter(|c| *c >= MAX_CONCENTRATION) {
        flags.push(DiagnosticFlag::red(
            FlagCategory::Volume,
            "Volume Concentration",
            format!("{:.0}% of volume came from a few large trades", conc),
            "Watch for block selling",
        ));
    }

    if let Some(rel) = ctx.relative_volume.filter(|r| *r < LOW_RELATIVE_VOLUME) {
        flags.push(DiagnosticFlag::yellow(
            FlagCategory::Volume,
            "Low Relative Volume",
            format!("Trading at {:.2}x normal volume", rel),
            "Moves on thin volume are unreliable",
        ));
    }

    flags
}
