//! Visits command implementation

use crate::cli::VisitsArgs;
use crate::config_loader::load_config_with_overrides;
use crate::errors::{from_anyhow, from_lochist, invalid_location};
use crate::output::OutputWriter;
use crate::output_types::VisitsOutput;
use crate::progress::{finish_success, geocoding_progress};
use anyhow::Result;
use lochist_core::analysis::{ClusterSettings, VisitClusterer};
use lochist_core::config::{require_non_negative, CliConfigOverrides, LayeredConfig};
use lochist_core::formats::load_export;
use lochist_core::geo::GeoPoint;
use lochist_core::models::time::format_duration;
use lochist_core::models::{EpisodeSummary, TimePoint, VisitEpisode, WeekdayLocale};
use lochist_geocode::{AddressResolver, NominatimGeocoder};
use std::path::Path;

pub async fn execute(args: VisitsArgs, config_file: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config_with_overrides(
        config_file,
        CliConfigOverrides {
            min_visit_minutes: args.min_duration_minutes,
            adjacency_hours: args.adjacency_hours,
            ..Default::default()
        },
    )
    .map_err(from_anyhow)?;

    let reference = GeoPoint::checked(args.latitude, args.longitude).map_err(from_lochist)?;
    let radius = require_non_negative("distance", args.distance)
        .map_err(|e| invalid_location(&e.to_string()))?;

    let export = load_export(&args.file).map_err(from_lochist)?;
    let (events, event_diagnostics) = export.visit_events();

    let mut diagnostics = export.diagnostics.clone();
    diagnostics.extend(event_diagnostics);
    for diagnostic in &diagnostics {
        output.warning(diagnostic);
    }

    let settings = ClusterSettings::new(reference, radius)
        .with_min_duration(config.min_visit_duration())
        .with_adjacency_window(config.adjacency_window());
    let episodes = VisitClusterer::new(settings).cluster(&events);

    tracing::info!(
        events = events.len(),
        episodes = episodes.len(),
        "Found visits near {}",
        reference
    );

    let summaries: Vec<EpisodeSummary> = if args.no_geocode {
        episodes.iter().map(|e| EpisodeSummary::new(e, "")).collect()
    } else {
        summarize_with_addresses(&episodes, &config, !output.is_json()).await?
    };

    if output.is_json() {
        return output.result(VisitsOutput {
            file: args.file.display().to_string(),
            latitude: reference.lat,
            longitude: reference.lon,
            distance_meters: radius,
            adjacency_hours: config.adjacency_hours.value,
            min_duration_minutes: config.min_visit_minutes.value,
            episodes: summaries,
            diagnostics,
        });
    }

    if summaries.is_empty() {
        output.info(format!("No visits within {} m of {}", radius, reference));
    }

    let locale = WeekdayLocale::from(args.weekday_locale);
    for summary in &summaries {
        output.line(episode_line(summary, locale));
    }

    Ok(())
}

async fn summarize_with_addresses(
    episodes: &[VisitEpisode],
    config: &LayeredConfig,
    show_progress: bool,
) -> Result<Vec<EpisodeSummary>> {
    let geocoder = NominatimGeocoder::new(
        config.geocoder_url.value.as_str(),
        &config.user_agent.value,
        config.geocoder_timeout(),
    )
    .map_err(from_lochist)?;
    let resolver = AddressResolver::new(
        geocoder,
        config.fallback_language.value.as_str(),
        config.geocode_cache_size.value,
    );

    let progress = geocoding_progress(episodes.len(), show_progress);
    let mut summaries = Vec::with_capacity(episodes.len());

    for episode in episodes {
        let address = resolver.resolve_address(episode.centroid()).await;
        summaries.push(EpisodeSummary::new(episode, address));
        progress.inc(1);
    }

    finish_success(&progress, &format!("Resolved {} addresses", summaries.len()));

    Ok(summaries)
}

fn stamp(time: &TimePoint, locale: WeekdayLocale) -> String {
    format!("{} {}", time.weekday_short(locale), time.format_report())
}

/// `Mon 01.01.2024 10:00 - Mon 01.01.2024 12:30   0 d  2 h 30 m  Address`
fn episode_line(summary: &EpisodeSummary, locale: WeekdayLocale) -> String {
    format!(
        "{} - {}  {}  {}",
        stamp(&summary.start, locale),
        stamp(&summary.end, locale),
        format_duration(summary.duration),
        summary.address
    )
}
