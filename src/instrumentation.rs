//! Wall-clock time per engine phase, enabled with `--features instrumentation`.
//!
//! The controller opens a `phase` span around its shortcut, search and
//! fallback steps, and the search opens one at every quiescence entry. This
//! layer adds up the time spent inside each phase and prints the totals when
//! the command finishes. Quiescence time is also part of search time.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::field::{Field, Visit};
use tracing::span;
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

#[derive(Clone, Copy, Default, Debug, PartialEq)]
struct PhaseTotals {
    entries: u64,
    total: Duration,
    longest: Duration,
}

/// Shared handle to the per-phase totals.
#[derive(Clone, Default)]
pub struct PhaseTimings {
    totals: Arc<Mutex<BTreeMap<String, PhaseTotals>>>,
}

impl PhaseTimings {
    fn record(&self, phase: &str, elapsed: Duration) {
        if let Ok(mut totals) = self.totals.lock() {
            let entry = totals.entry(phase.to_string()).or_default();
            entry.entries += 1;
            entry.total += elapsed;
            entry.longest = entry.longest.max(elapsed);
        }
    }

    fn snapshot(&self) -> BTreeMap<String, PhaseTotals> {
        self.totals
            .lock()
            .map(|totals| totals.clone())
            .unwrap_or_default()
    }

    pub fn print(&self) {
        let totals = self.snapshot();
        if totals.is_empty() {
            eprintln!("\nNo phases were timed.");
            return;
        }

        eprintln!(
            "\n{:<12} {:>10} {:>12} {:>12} {:>12}",
            "phase", "entries", "total ms", "avg µs", "longest ms"
        );
        for (phase, t) in totals.iter() {
            let avg_micros = t.total.as_secs_f64() * 1e6 / t.entries as f64;
            eprintln!(
                "{:<12} {:>10} {:>12.2} {:>12.2} {:>12.2}",
                phase,
                t.entries,
                t.total.as_secs_f64() * 1e3,
                avg_micros,
                t.longest.as_secs_f64() * 1e3
            );
        }
    }
}

/// Name of the phase a span times.
struct Phase(String);

/// When the span was last entered.
struct Entered(Instant);

#[derive(Default)]
struct PhaseVisitor(Option<String>);

impl Visit for PhaseVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "phase" {
            self.0 = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "phase" && self.0.is_none() {
            self.0 = Some(format!("{:?}", value));
        }
    }
}

struct PhaseLayer {
    timings: PhaseTimings,
}

impl<S> Layer<S> for PhaseLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
        let mut visitor = PhaseVisitor::default();
        attrs.record(&mut visitor);
        if let (Some(phase), Some(span)) = (visitor.0, ctx.span(id)) {
            span.extensions_mut().insert(Phase(phase));
        }
    }

    fn on_enter(&self, id: &span::Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            let mut extensions = span.extensions_mut();
            if extensions.get_mut::<Phase>().is_some() {
                extensions.remove::<Entered>();
                extensions.insert(Entered(Instant::now()));
            }
        }
    }

    fn on_exit(&self, id: &span::Id, ctx: Context<'_, S>) {
        let span = match ctx.span(id) {
            Some(span) => span,
            None => return,
        };
        let mut extensions = span.extensions_mut();
        let entered = match extensions.remove::<Entered>() {
            Some(Entered(at)) => at,
            None => return,
        };
        if let Some(Phase(phase)) = extensions.get_mut::<Phase>() {
            self.timings.record(phase, entered.elapsed());
        }
    }
}

fn phase_subscriber(timings: PhaseTimings) -> impl Subscriber + Send + Sync {
    tracing_subscriber::registry().with(PhaseLayer { timings })
}

/// Installs the phase timer as the global subscriber. `log` output is left
/// to `env_logger`.
pub fn init_tracing() -> PhaseTimings {
    let timings = PhaseTimings::default();
    let subscriber = phase_subscriber(timings.clone());
    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", error);
    }
    timings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_spans_are_totalled() {
        let timings = PhaseTimings::default();

        tracing::subscriber::with_default(phase_subscriber(timings.clone()), || {
            for _ in 0..2 {
                let _span = tracing::info_span!("phase", phase = "search").entered();
                let _inner = tracing::info_span!("phase", phase = "quiescence").entered();
            }
            let _span = tracing::info_span!("phase", phase = "shortcut").entered();
            // spans without a phase are not timed
            let _other = tracing::info_span!("evaluate").entered();
        });

        let totals = timings.snapshot();
        assert_eq!(totals.len(), 3);
        assert_eq!(totals["search"].entries, 2);
        assert_eq!(totals["quiescence"].entries, 2);
        assert_eq!(totals["shortcut"].entries, 1);
        assert!(totals["search"].total >= totals["search"].longest);
    }
}
