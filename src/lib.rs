/// Opens a span timing one engine phase when the `instrumentation` feature
/// is on; otherwise just evaluates to the phase name.
#[cfg(feature = "instrumentation")]
macro_rules! phase_span {
    ($phase:expr) => {
        tracing::info_span!("phase", phase = $phase).entered()
    };
}

#[cfg(not(feature = "instrumentation"))]
macro_rules! phase_span {
    ($phase:expr) => {
        $phase
    };
}

pub mod alpha_beta_searcher;
pub mod board;
pub mod book;
pub mod cache;
pub mod evaluate;
pub mod game;
pub mod gomoku_search;
pub mod input_handler;
pub mod pattern;
pub mod prelude;
pub mod threat;
